// src/noyau/rpn.rs
//
// Analyse d'un terme -> flux RPN -> Noeud (shunting-yard).
//
// Règles:
// - Un seul passage gauche-droite, sans retour arrière; la reconnaissance
//   des noms (sin, sqrt, cos, ctg, tg, exp, pi, e) se fait par regard avant
//   de longueur fixe, insensible à la casse, avec bornes explicites de fin
//   d'entrée. Le plus long match gagne: "sin(0)" est la fonction sinus,
//   jamais les variables s, i, n; un "s" isolé est la variable s.
// - Le masque de permissions (jetons.rs) décide de la légalité de chaque
//   catégorie avant consommation; c'est lui qui tranche le '-' unaire
//   (Algebrique non permis) du '-' binaire.
// - Priorités: additif 0 < multiplicatif 1 < puissance 2 < fonctions (max).
//   Additif et multiplicatif associent à gauche, la puissance à droite.
//   Les fonctions ne sont jamais dépilées par comparaison: elles sortent
//   sur ')' (collées à leur groupe) ou à la vidange finale.
// - Le moins unaire est poussé comme une fonction: il enveloppe tout ce
//   qui se réduit avant lui ("-3^2" vaut -(3^2)).

use super::arbre::Noeud;
use super::erreurs::ErreurParse;
use super::jetons::{EntreeRpn, JetonPermis, Operateur, Permissions, TypeOperateur};
use super::valeur::Valeur;

/// Séparateur décimal unique (convention fixe du noyau).
pub const SEPARATEUR_DECIMAL: char = '.';

/// Garde-fou: imbrication maximale de parenthèses.
pub(crate) const PROFONDEUR_MAX: usize = 4096;

const PRIORITE_FONCTION: i32 = i32::MAX;

/* ------------------------ Contexte shunting-yard ------------------------ */

// Pile d'opérateurs + file de sortie, possédées par un seul appel d'analyse
// et jetées une fois le flux produit.
struct Contexte {
    sortie: Vec<EntreeRpn>,
    operateurs: Vec<Operateur>,
}

impl Contexte {
    fn nouveau() -> Contexte {
        Contexte {
            sortie: Vec::new(),
            operateurs: Vec::new(),
        }
    }

    fn pousser_operande(&mut self, noeud: Noeud) {
        self.sortie.push(EntreeRpn::Operande(noeud));
    }

    fn pousser_constante(&mut self, valeur: Valeur) {
        self.pousser_operande(Noeud::Constante(valeur));
    }

    fn pousser_variable(&mut self, nom: char) {
        self.pousser_operande(Noeud::Variable(nom));
    }

    fn pousser_fonction(&mut self, sorte: TypeOperateur) {
        self.operateurs.push(Operateur {
            sorte,
            priorite: PRIORITE_FONCTION,
            associatif_gauche: false,
        });
    }

    /// Réduction standard: dépile vers la sortie tant que le sommet n'est
    /// ni '(' ni une fonction, et que sa priorité est strictement plus
    /// grande, ou égale avec associativité gauche.
    fn pousser_operateur(&mut self, pousse: Operateur) {
        while let Some(&haut) = self.operateurs.last() {
            if matches!(haut.sorte, TypeOperateur::ParentheseGauche) || haut.sorte.est_fonction() {
                break;
            }
            let depiler = haut.priorite > pousse.priorite
                || (haut.priorite == pousse.priorite && haut.associatif_gauche);
            if !depiler {
                break;
            }
            self.operateurs.pop();
            self.sortie.push(EntreeRpn::Operateur(haut.sorte));
        }
        self.operateurs.push(pousse);
    }

    fn pousser_parenthese_gauche(&mut self) {
        self.operateurs.push(Operateur {
            sorte: TypeOperateur::ParentheseGauche,
            priorite: PRIORITE_FONCTION,
            associatif_gauche: false,
        });
    }

    /// Dépile et émet jusqu'au marqueur '(' (erreur s'il n'existe pas),
    /// le retire, puis sort une éventuelle fonction collée au groupe.
    fn pousser_parenthese_droite(&mut self) -> Result<(), ErreurParse> {
        loop {
            match self.operateurs.pop() {
                None => return Err(ErreurParse::ParenthesesDesequilibrees),
                Some(haut) if matches!(haut.sorte, TypeOperateur::ParentheseGauche) => break,
                Some(haut) => self.sortie.push(EntreeRpn::Operateur(haut.sorte)),
            }
        }

        if let Some(&haut) = self.operateurs.last() {
            if haut.sorte.est_fonction() {
                self.operateurs.pop();
                self.sortie.push(EntreeRpn::Operateur(haut.sorte));
            }
        }

        Ok(())
    }

    /// Vidange finale: un '(' survivant signale une parenthèse non refermée.
    fn vider(mut self) -> Result<Vec<EntreeRpn>, ErreurParse> {
        while let Some(haut) = self.operateurs.pop() {
            if matches!(haut.sorte, TypeOperateur::ParentheseGauche) {
                return Err(ErreurParse::ParenthesesDesequilibrees);
            }
            self.sortie.push(EntreeRpn::Operateur(haut.sorte));
        }
        Ok(self.sortie)
    }
}

/* ------------------------ Analyse d'un terme ------------------------ */

/// Convertit le texte d'un terme (déjà nettoyé des blancs) en flux RPN.
pub fn en_rpn(terme: &str) -> Result<Vec<EntreeRpn>, ErreurParse> {
    let caracteres: Vec<char> = terme.chars().collect();
    let longueur = caracteres.len();

    let mut contexte = Contexte::nouveau();
    let mut permissions = Permissions::initiales();
    let mut profondeur: usize = 0;

    let mut i: usize = 0;
    while i < longueur {
        let c = caracteres[i];
        match c {
            '0'..='9' => {
                permissions.exiger(JetonPermis::Operande, c, i)?;
                i = numeral(&mut contexte, &caracteres, i)?;
                permissions.tout_permettre();
            }

            // séparateur sans chiffre devant
            SEPARATEUR_DECIMAL => return Err(ErreurParse::SeparateurOrphelin { indice: i }),

            '+' => {
                permissions.exiger(JetonPermis::Algebrique, c, i)?;
                contexte.pousser_operateur(Operateur {
                    sorte: TypeOperateur::Plus,
                    priorite: 0,
                    associatif_gauche: true,
                });
                permissions.seulement_operande();
                i += 1;
            }

            '-' => {
                if permissions.est_permis(JetonPermis::Algebrique) {
                    contexte.pousser_operateur(Operateur {
                        sorte: TypeOperateur::Moins,
                        priorite: 0,
                        associatif_gauche: true,
                    });
                } else {
                    permissions.exiger(JetonPermis::Operande, c, i)?;
                    contexte.pousser_fonction(TypeOperateur::Inverse);
                }
                permissions.seulement_operande();
                i += 1;
            }

            '*' | '/' | '%' => {
                permissions.exiger(JetonPermis::Multiplicatif, c, i)?;
                let sorte = match c {
                    '*' => TypeOperateur::Multiplier,
                    '/' => TypeOperateur::Diviser,
                    _ => TypeOperateur::Modulo,
                };
                contexte.pousser_operateur(Operateur {
                    sorte,
                    priorite: 1,
                    associatif_gauche: true,
                });
                permissions.seulement_operande();
                i += 1;
            }

            '^' => {
                permissions.exiger(JetonPermis::Multiplicatif, c, i)?;
                contexte.pousser_operateur(Operateur {
                    sorte: TypeOperateur::Puissance,
                    priorite: 2,
                    associatif_gauche: false,
                });
                permissions.seulement_operande();
                i += 1;
            }

            '(' => {
                permissions.exiger(JetonPermis::Operande, c, i)?;
                profondeur += 1;
                if profondeur > PROFONDEUR_MAX {
                    return Err(ErreurParse::ProfondeurExcessive);
                }
                contexte.pousser_parenthese_gauche();
                permissions.seulement_operande();
                i += 1;
            }

            ')' => {
                contexte.pousser_parenthese_droite()?;
                profondeur = profondeur.saturating_sub(1);
                permissions.suite_de_groupe();
                i += 1;
            }

            _ if c.is_ascii_alphabetic() => {
                i = lettre(&mut contexte, &mut permissions, &caracteres, i)?;
            }

            _ => {
                return Err(ErreurParse::CaractereInattendu {
                    caractere: c,
                    indice: i,
                })
            }
        }
    }

    contexte.vider()
}

/// Numéral: course maximale de chiffres, puis au plus un séparateur décimal
/// suivi d'une course de chiffres obligatoire. Retourne l'indice suivant.
fn numeral(contexte: &mut Contexte, caracteres: &[char], debut: usize) -> Result<usize, ErreurParse> {
    let mut i = debut;
    while i < caracteres.len() && caracteres[i].is_ascii_digit() {
        i += 1;
    }

    if i < caracteres.len() && caracteres[i] == SEPARATEUR_DECIMAL {
        let indice_separateur = i;
        i += 1;
        let debut_fraction = i;
        while i < caracteres.len() && caracteres[i].is_ascii_digit() {
            i += 1;
        }
        if i == debut_fraction {
            return Err(ErreurParse::SeparateurOrphelin {
                indice: indice_separateur,
            });
        }
    }

    let texte: String = caracteres[debut..i].iter().collect();
    let valeur =
        Valeur::depuis_texte(&texte).ok_or(ErreurParse::NombreInvalide { indice: debut })?;
    contexte.pousser_constante(valeur);

    Ok(i)
}

/// Vrai si les caractères à partir de `depuis` épellent `nom` en entier
/// (insensible à la casse). Faux dès que l'entrée est trop courte.
fn suite(caracteres: &[char], depuis: usize, nom: &str) -> bool {
    nom.chars().enumerate().all(|(k, attendu)| {
        caracteres
            .get(depuis + k)
            .is_some_and(|c| c.eq_ignore_ascii_case(&attendu))
    })
}

/// Lettres: fonction ou constante si le nom complet tient dans ce qui
/// reste, sinon variable d'une lettre (telle quelle, casse comprise).
fn lettre(
    contexte: &mut Contexte,
    permissions: &mut Permissions,
    caracteres: &[char],
    i: usize,
) -> Result<usize, ErreurParse> {
    let c = caracteres[i];
    permissions.exiger(JetonPermis::Operande, c, i)?;

    match c.to_ascii_lowercase() {
        's' => {
            if suite(caracteres, i + 1, "in") {
                contexte.pousser_fonction(TypeOperateur::Sin);
                permissions.seulement_operande();
                return Ok(i + 3);
            }
            if suite(caracteres, i + 1, "qrt") {
                contexte.pousser_fonction(TypeOperateur::Racine);
                permissions.seulement_operande();
                return Ok(i + 4);
            }
        }
        'c' => {
            if suite(caracteres, i + 1, "os") {
                contexte.pousser_fonction(TypeOperateur::Cos);
                permissions.seulement_operande();
                return Ok(i + 3);
            }
            if suite(caracteres, i + 1, "tg") {
                contexte.pousser_fonction(TypeOperateur::Ctg);
                permissions.seulement_operande();
                return Ok(i + 3);
            }
        }
        't' => {
            if suite(caracteres, i + 1, "g") {
                contexte.pousser_fonction(TypeOperateur::Tg);
                permissions.seulement_operande();
                return Ok(i + 2);
            }
        }
        'e' => {
            if suite(caracteres, i + 1, "xp") {
                contexte.pousser_fonction(TypeOperateur::Exp);
                permissions.seulement_operande();
                return Ok(i + 3);
            }
            // constante e
            contexte.pousser_constante(Valeur::e());
            permissions.tout_permettre();
            return Ok(i + 1);
        }
        'p' => {
            if suite(caracteres, i + 1, "i") {
                contexte.pousser_constante(Valeur::pi());
                permissions.tout_permettre();
                return Ok(i + 2);
            }
        }
        _ => {}
    }

    contexte.pousser_variable(c);
    permissions.tout_permettre();
    Ok(i + 1)
}

/* ------------------------ RPN -> arbre ------------------------ */

/// Monte le flux postfix en arbre avec une pile d'opérandes.
///
/// Binaires: l'opérande droite sort en premier (ordre de pile), l'ordre
/// textuel gauche/droite est donc préservé. Exp se désucre en e^x.
pub fn depuis_rpn(flux: Vec<EntreeRpn>) -> Result<Noeud, ErreurParse> {
    if flux.is_empty() {
        return Err(ErreurParse::SousExpressionVide);
    }

    let mut pile: Vec<Noeud> = Vec::new();

    for entree in flux {
        match entree {
            EntreeRpn::Operande(noeud) => pile.push(noeud),
            EntreeRpn::Operateur(sorte) => {
                let noeud = construire(sorte, &mut pile)?;
                pile.push(noeud);
            }
        }
    }

    let racine = pile.pop().ok_or(ErreurParse::OperandeManquante)?;
    if !pile.is_empty() {
        return Err(ErreurParse::OperateurManquant);
    }
    Ok(racine)
}

fn depiler(pile: &mut Vec<Noeud>) -> Result<Box<Noeud>, ErreurParse> {
    match pile.pop() {
        Some(noeud) => Ok(Box::new(noeud)),
        None => Err(ErreurParse::OperandeManquante),
    }
}

fn construire(sorte: TypeOperateur, pile: &mut Vec<Noeud>) -> Result<Noeud, ErreurParse> {
    use TypeOperateur::*;

    Ok(match sorte {
        // invariant interne violé: un marqueur '(' a survécu à la vidange
        ParentheseGauche => return Err(ErreurParse::ParenthesesDesequilibrees),

        Inverse => Noeud::Inverse(depiler(pile)?),
        Racine => Noeud::Racine(depiler(pile)?),
        Sin => Noeud::Sin(depiler(pile)?),
        Cos => Noeud::Cos(depiler(pile)?),
        Tg => Noeud::Tg(depiler(pile)?),
        Ctg => Noeud::Ctg(depiler(pile)?),

        // exp(x) = e^x
        Exp => Noeud::Puissance(
            Box::new(Noeud::Constante(Valeur::e())),
            depiler(pile)?,
        ),

        Plus | Moins | Multiplier | Diviser | Modulo | Puissance => {
            let droite = depiler(pile)?;
            let gauche = depiler(pile)?;
            match sorte {
                Plus => Noeud::Plus(gauche, droite),
                Moins => Noeud::Moins(gauche, droite),
                Multiplier => Noeud::Multiplier(gauche, droite),
                Diviser => Noeud::Diviser(gauche, droite),
                Modulo => Noeud::Modulo(gauche, droite),
                Puissance => Noeud::Puissance(gauche, droite),
                _ => unreachable!(),
            }
        }

        ASin | ACos | ATg | ACtg => {
            return Err(ErreurParse::OperationNonSupportee { nom: sorte.nom() })
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{depuis_rpn, en_rpn};
    use crate::noyau::arbre::Noeud;
    use crate::noyau::erreurs::ErreurParse;
    use crate::noyau::jetons::{EntreeRpn, TypeOperateur};
    use crate::noyau::valeur::Valeur;
    use crate::noyau::variables::Environnement;

    fn eval_terme(terme: &str) -> Valeur {
        let flux = en_rpn(terme).unwrap_or_else(|e| panic!("terme={terme:?} erreur: {e}"));
        let arbre = depuis_rpn(flux).unwrap_or_else(|e| panic!("terme={terme:?} erreur: {e}"));
        arbre
            .evaluer(&Environnement::vide())
            .unwrap_or_else(|e| panic!("terme={terme:?} erreur: {e}"))
    }

    fn erreur_terme(terme: &str) -> ErreurParse {
        let resultat = en_rpn(terme).and_then(depuis_rpn);
        match resultat {
            Ok(arbre) => panic!("terme={terme:?} aurait dû être refusé, arbre={arbre}"),
            Err(e) => e,
        }
    }

    #[test]
    fn priorites_standards() {
        assert_eq!(eval_terme("2+3*4"), Valeur::entiere(14));
        assert_eq!(eval_terme("(2+3)*4"), Valeur::entiere(20));
        assert_eq!(eval_terme("20/4/5"), Valeur::entiere(1));
        assert_eq!(eval_terme("7%4%2"), Valeur::entiere(1));
    }

    #[test]
    fn puissance_associe_a_droite() {
        assert_eq!(eval_terme("2^3^2"), Valeur::entiere(512));
        assert_eq!(eval_terme("(2^3)^2"), Valeur::entiere(64));
    }

    #[test]
    fn moins_unaire_enveloppe_la_reduction() {
        assert_eq!(eval_terme("2*-3"), Valeur::entiere(-6));
        assert_eq!(eval_terme("(-2)^2"), Valeur::entiere(4));
        // le moins unaire sort après la puissance: -(3^2)
        assert_eq!(eval_terme("(-3^2)"), Valeur::entiere(-9));
    }

    #[test]
    fn fonctions_collees_a_leur_groupe() {
        assert_eq!(eval_terme("sqrt(16)"), Valeur::entiere(4));
        assert_eq!(eval_terme("sqrt(16)*2"), Valeur::entiere(8));
        assert_eq!(eval_terme("sin(0)"), Valeur::entiere(0));
        assert_eq!(eval_terme("cos(0)"), Valeur::entiere(1));
        assert_eq!(eval_terme("tg(0)"), Valeur::entiere(0));
        assert_eq!(eval_terme("exp(0)"), Valeur::entiere(1));
    }

    #[test]
    fn reconnaissance_gloutonne_et_repli_variable() {
        // "s" isolé est une variable, pas un début de sinus
        let flux = en_rpn("s").unwrap();
        let arbre = depuis_rpn(flux).unwrap();
        assert_eq!(arbre, Noeud::Variable('s'));

        // insensible à la casse pour les noms de fonctions
        assert_eq!(eval_terme("SIN(0)"), Valeur::entiere(0));
        assert_eq!(eval_terme("SqRt(9)"), Valeur::entiere(3));

        // "ct" n'épelle ni cos ni ctg: variables c puis t, refusées faute
        // d'opérateur entre elles
        assert_eq!(erreur_terme("ct*1"), ErreurParse::OperateurManquant);
    }

    #[test]
    fn constantes_nommees() {
        let pi = eval_terme("pi").en_flottant();
        assert!((pi - std::f64::consts::PI).abs() < 1e-12);

        let e = eval_terme("e").en_flottant();
        assert!((e - std::f64::consts::E).abs() < 1e-12);

        // exp(1) = e^1
        let e1 = eval_terme("exp(1)").en_flottant();
        assert!((e1 - std::f64::consts::E).abs() < 1e-12);
    }

    #[test]
    fn masque_refuse_les_sequences_invalides() {
        assert!(matches!(
            erreur_terme("2*+3"),
            ErreurParse::JetonInterdit { caractere: '+', .. }
        ));
        assert!(matches!(
            erreur_terme("2^*3"),
            ErreurParse::JetonInterdit { caractere: '*', .. }
        ));
        // après ')', une opérande ne peut pas enchaîner
        assert!(matches!(
            erreur_terme("(2)(3)"),
            ErreurParse::JetonInterdit { caractere: '(', .. }
        ));
        assert!(matches!(
            erreur_terme("(2)3"),
            ErreurParse::JetonInterdit { caractere: '3', .. }
        ));
    }

    #[test]
    fn separateur_decimal_orphelin() {
        assert!(matches!(
            erreur_terme("2..5"),
            ErreurParse::SeparateurOrphelin { indice: 1 }
        ));
        assert!(matches!(
            erreur_terme("2."),
            ErreurParse::SeparateurOrphelin { indice: 1 }
        ));
        assert!(matches!(
            erreur_terme("."),
            ErreurParse::SeparateurOrphelin { indice: 0 }
        ));
    }

    #[test]
    fn parentheses_desequilibrees() {
        assert_eq!(erreur_terme("(2+3"), ErreurParse::ParenthesesDesequilibrees);
        assert_eq!(erreur_terme("((2)"), ErreurParse::ParenthesesDesequilibrees);
        assert_eq!(erreur_terme("2+3)"), ErreurParse::ParenthesesDesequilibrees);
    }

    #[test]
    fn flux_incomplets() {
        assert_eq!(erreur_terme(""), ErreurParse::SousExpressionVide);
        assert_eq!(erreur_terme("()"), ErreurParse::SousExpressionVide);
        assert_eq!(erreur_terme("2*"), ErreurParse::OperandeManquante);
        assert_eq!(erreur_terme("2(3)"), ErreurParse::OperateurManquant);
    }

    #[test]
    fn caractere_inattendu() {
        assert!(matches!(
            erreur_terme("2&3"),
            ErreurParse::CaractereInattendu { caractere: '&', .. }
        ));
        assert!(matches!(
            erreur_terme("2,5"),
            ErreurParse::CaractereInattendu { caractere: ',', .. }
        ));
    }

    #[test]
    fn operation_reservee_refusee() {
        let flux = vec![
            EntreeRpn::Operande(Noeud::Constante(Valeur::entiere(1))),
            EntreeRpn::Operateur(TypeOperateur::ASin),
        ];
        assert_eq!(
            depuis_rpn(flux),
            Err(ErreurParse::OperationNonSupportee { nom: "asin" })
        );
    }

    #[test]
    fn garde_fou_profondeur() {
        let profonde = format!("{}1{}", "(".repeat(5000), ")".repeat(5000));
        assert_eq!(en_rpn(&profonde).unwrap_err(), ErreurParse::ProfondeurExcessive);
    }
}
