// src/noyau/jetons.rs
//
// Briques du moteur shunting-yard:
// - TypeOperateur / Operateur : descripteurs (priorité, associativité)
// - Permissions : masque des catégories de jetons légales à la position courante
// - EntreeRpn : élément du flux postfix (opérande déjà construite, ou opérateur)

use super::arbre::Noeud;
use super::erreurs::ErreurParse;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeOperateur {
    ParentheseGauche,
    Inverse,

    Plus,
    Moins,
    Multiplier,
    Diviser,
    Modulo,
    Puissance,

    Racine,
    Exp,
    Sin,
    Cos,
    Tg,
    Ctg,

    // Réservés: connus du constructeur d'arbre mais jamais émis par
    // l'analyse. Refusés avec « opération non supportée ».
    ASin,
    ACos,
    ATg,
    ACtg,
}

impl TypeOperateur {
    /// Opérateurs "fonction" (moins unaire compris) : priorité maximale,
    /// jamais dépilés par comparaison de priorité, seulement par ')' ou
    /// en fin de flux.
    pub fn est_fonction(self) -> bool {
        use TypeOperateur::*;
        matches!(self, Inverse | Racine | Exp | Sin | Cos | Tg | Ctg)
    }

    pub fn nom(self) -> &'static str {
        use TypeOperateur::*;
        match self {
            ParentheseGauche => "(",
            Inverse => "-",
            Plus => "+",
            Moins => "-",
            Multiplier => "*",
            Diviser => "/",
            Modulo => "%",
            Puissance => "^",
            Racine => "sqrt",
            Exp => "exp",
            Sin => "sin",
            Cos => "cos",
            Tg => "tg",
            Ctg => "ctg",
            ASin => "asin",
            ACos => "acos",
            ATg => "atg",
            ACtg => "actg",
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Operateur {
    pub sorte: TypeOperateur,
    pub priorite: i32,
    pub associatif_gauche: bool,
}

/* ------------------------ Masque de permissions ------------------------ */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum JetonPermis {
    /// Début d'opérande: chiffre, lettre, fonction, '(' ou moins unaire.
    Operande,
    /// Opérateur additif binaire ('+', '-' binaire).
    Algebrique,
    /// Opérateur multiplicatif ou puissance ('*', '/', '%', '^').
    Multiplicatif,
}

impl JetonPermis {
    fn bit(self) -> u8 {
        match self {
            JetonPermis::Operande => 1 << 0,
            JetonPermis::Algebrique => 1 << 1,
            JetonPermis::Multiplicatif => 1 << 2,
        }
    }
}

/// Invariant: avant de consommer un jeton, sa catégorie doit être permise,
/// sinon l'analyse échoue immédiatement (JetonInterdit).
#[derive(Clone, Copy, Debug)]
pub struct Permissions {
    masque: u8,
}

impl Permissions {
    /// État initial: seul un début d'opérande est légal.
    pub fn initiales() -> Permissions {
        Permissions {
            masque: JetonPermis::Operande.bit(),
        }
    }

    /// Après une opérande complète: tout peut suivre.
    pub fn tout_permettre(&mut self) {
        self.masque = JetonPermis::Operande.bit()
            | JetonPermis::Algebrique.bit()
            | JetonPermis::Multiplicatif.bit();
    }

    /// Après un opérateur: seule une opérande peut suivre.
    pub fn seulement_operande(&mut self) {
        self.masque = JetonPermis::Operande.bit();
    }

    /// Après ')': seule une continuation algébrique ou multiplicative
    /// est légale ("(2)(3)" est refusé).
    pub fn suite_de_groupe(&mut self) {
        self.masque = JetonPermis::Algebrique.bit() | JetonPermis::Multiplicatif.bit();
    }

    pub fn est_permis(&self, jeton: JetonPermis) -> bool {
        (self.masque & jeton.bit()) != 0
    }

    pub fn exiger(
        &self,
        jeton: JetonPermis,
        caractere: char,
        indice: usize,
    ) -> Result<(), ErreurParse> {
        if self.est_permis(jeton) {
            Ok(())
        } else {
            Err(ErreurParse::JetonInterdit { caractere, indice })
        }
    }
}

/* ------------------------ Flux postfix ------------------------ */

/// Élément du flux RPN produit par le moteur et consommé par le
/// constructeur d'arbre: soit une opérande déjà montée en Noeud,
/// soit un opérateur en attente de ses opérandes.
#[derive(Clone, Debug)]
pub enum EntreeRpn {
    Operande(Noeud),
    Operateur(TypeOperateur),
}

#[cfg(test)]
mod tests {
    use super::{JetonPermis, Permissions};

    #[test]
    fn masque_initial_puis_transitions() {
        let mut p = Permissions::initiales();
        assert!(p.est_permis(JetonPermis::Operande));
        assert!(!p.est_permis(JetonPermis::Algebrique));
        assert!(!p.est_permis(JetonPermis::Multiplicatif));

        p.tout_permettre();
        assert!(p.est_permis(JetonPermis::Operande));
        assert!(p.est_permis(JetonPermis::Algebrique));
        assert!(p.est_permis(JetonPermis::Multiplicatif));

        p.seulement_operande();
        assert!(p.est_permis(JetonPermis::Operande));
        assert!(!p.est_permis(JetonPermis::Multiplicatif));

        p.suite_de_groupe();
        assert!(!p.est_permis(JetonPermis::Operande));
        assert!(p.est_permis(JetonPermis::Algebrique));
        assert!(p.est_permis(JetonPermis::Multiplicatif));
    }

    #[test]
    fn exiger_refuse_avec_position() {
        let p = Permissions::initiales();
        let erreur = p.exiger(JetonPermis::Multiplicatif, '*', 3).unwrap_err();
        assert_eq!(
            erreur,
            crate::noyau::erreurs::ErreurParse::JetonInterdit {
                caractere: '*',
                indice: 3
            }
        );
    }
}
