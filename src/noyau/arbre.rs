// src/noyau/arbre.rs
//
// Arbre d'opérations.
// - Ensemble fermé de variantes (exhaustivité vérifiée à la compilation),
//   chaque noeud possède exclusivement ses enfants (aucun partage).
// - Immuable une fois construit: évaluable autant de fois que voulu,
//   avec des environnements différents, sans mutation ni effet de bord.
//
// Protocole d'évaluation: ordre postfixe, enfant gauche avant enfant droit,
// fail-fast (le premier échec remonte sans que le noeud applique sa logique).

use std::fmt;

use super::erreurs::ErreurEval;
use super::valeur::Valeur;
use super::variables::Environnement;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Noeud {
    Constante(Valeur),
    Variable(char),

    Inverse(Box<Noeud>),
    Racine(Box<Noeud>),
    Sin(Box<Noeud>),
    Cos(Box<Noeud>),
    Tg(Box<Noeud>),
    Ctg(Box<Noeud>),

    Plus(Box<Noeud>, Box<Noeud>),
    Moins(Box<Noeud>, Box<Noeud>),
    Multiplier(Box<Noeud>, Box<Noeud>),
    Diviser(Box<Noeud>, Box<Noeud>),
    Modulo(Box<Noeud>, Box<Noeud>),
    Puissance(Box<Noeud>, Box<Noeud>),

    /// Somme n-aire des termes de surface (évite un peigne de Plus binaires
    /// sur les longues expressions). Chaque enfant porte déjà son signe.
    Somme(Vec<Noeud>),
}

impl Noeud {
    /// Évalue l'arbre contre un environnement de variables.
    ///
    /// Plus/Moins/Multiplier/Diviser/Modulo sont exacts; Puissance, Racine
    /// et la trig passent par l'approximation flottante et produisent
    /// Valeur::Indefinie (jamais une erreur) hors du domaine mathématique.
    /// Les seules erreurs sont division/modulo par zéro et variable inconnue.
    pub fn evaluer(&self, env: &Environnement) -> Result<Valeur, ErreurEval> {
        use Noeud::*;

        Ok(match self {
            Constante(valeur) => valeur.clone(),

            Variable(nom) => match env.valeur(*nom) {
                Some(valeur) => valeur.clone(),
                None => return Err(ErreurEval::VariableInconnue { nom: *nom }),
            },

            Inverse(x) => x.evaluer(env)?.opposee(),

            Racine(x) => Valeur::depuis_flottant(x.evaluer(env)?.en_flottant().sqrt()),
            Sin(x) => Valeur::depuis_flottant(x.evaluer(env)?.en_flottant().sin()),
            Cos(x) => Valeur::depuis_flottant(x.evaluer(env)?.en_flottant().cos()),
            Tg(x) => Valeur::depuis_flottant(x.evaluer(env)?.en_flottant().tan()),
            // cotangente = inverse de la tangente, sans contrôle de domaine
            Ctg(x) => Valeur::depuis_flottant(x.evaluer(env)?.en_flottant().tan().recip()),

            Plus(a, b) => {
                let gauche = a.evaluer(env)?;
                let droite = b.evaluer(env)?;
                gauche.ajouter(&droite)
            }
            Moins(a, b) => {
                let gauche = a.evaluer(env)?;
                let droite = b.evaluer(env)?;
                gauche.soustraire(&droite)
            }
            Multiplier(a, b) => {
                let gauche = a.evaluer(env)?;
                let droite = b.evaluer(env)?;
                gauche.multiplier(&droite)
            }

            Diviser(a, b) => {
                let gauche = a.evaluer(env)?;
                let droite = b.evaluer(env)?;
                if droite.est_nulle() {
                    return Err(ErreurEval::DivisionParZero);
                }
                gauche.diviser(&droite)
            }
            Modulo(a, b) => {
                let gauche = a.evaluer(env)?;
                let droite = b.evaluer(env)?;
                if droite.est_nulle() {
                    return Err(ErreurEval::ModuloParZero);
                }
                gauche.modulo(&droite)
            }

            // opération approchée assumée, même sur exposant entier
            Puissance(a, b) => {
                let gauche = a.evaluer(env)?;
                let droite = b.evaluer(env)?;
                Valeur::depuis_flottant(gauche.en_flottant().powf(droite.en_flottant()))
            }

            Somme(enfants) => {
                let mut total = Valeur::zero();
                for enfant in enfants {
                    total = total.ajouter(&enfant.evaluer(env)?);
                }
                total
            }
        })
    }
}

/* ------------------------ Affichage debug ------------------------ */

impl fmt::Display for Noeud {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Noeud::*;
        match self {
            Constante(v) => write!(f, "{v}"),
            Variable(nom) => write!(f, "{nom}"),
            Inverse(x) => write!(f, "-({x})"),
            Racine(x) => write!(f, "sqrt({x})"),
            Sin(x) => write!(f, "sin({x})"),
            Cos(x) => write!(f, "cos({x})"),
            Tg(x) => write!(f, "tg({x})"),
            Ctg(x) => write!(f, "ctg({x})"),
            Plus(a, b) => write!(f, "({a}+{b})"),
            Moins(a, b) => write!(f, "({a}-{b})"),
            Multiplier(a, b) => write!(f, "({a}*{b})"),
            Diviser(a, b) => write!(f, "({a}/{b})"),
            Modulo(a, b) => write!(f, "({a}%{b})"),
            Puissance(a, b) => write!(f, "({a}^{b})"),
            Somme(enfants) => {
                write!(f, "(")?;
                for (i, enfant) in enfants.iter().enumerate() {
                    if i > 0 {
                        write!(f, "+")?;
                    }
                    write!(f, "{enfant}")?;
                }
                write!(f, ")")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Noeud;
    use crate::noyau::erreurs::ErreurEval;
    use crate::noyau::valeur::Valeur;
    use crate::noyau::variables::Environnement;

    fn constante(n: i64) -> Box<Noeud> {
        Box::new(Noeud::Constante(Valeur::entiere(n)))
    }

    #[test]
    fn gauche_evaluee_avant_droite() {
        // l'échec de l'enfant gauche gagne, même si le diviseur droit est nul
        let arbre = Noeud::Diviser(Box::new(Noeud::Variable('x')), constante(0));
        assert_eq!(
            arbre.evaluer(&Environnement::vide()),
            Err(ErreurEval::VariableInconnue { nom: 'x' })
        );
    }

    #[test]
    fn division_et_modulo_par_zero() {
        let division = Noeud::Diviser(constante(5), constante(0));
        assert_eq!(
            division.evaluer(&Environnement::vide()),
            Err(ErreurEval::DivisionParZero)
        );

        let modulo = Noeud::Modulo(constante(5), constante(0));
        assert_eq!(
            modulo.evaluer(&Environnement::vide()),
            Err(ErreurEval::ModuloParZero)
        );
    }

    #[test]
    fn somme_naire_dans_l_ordre() {
        let arbre = Noeud::Somme(vec![
            Noeud::Constante(Valeur::entiere(10)),
            Noeud::Inverse(constante(3)),
            Noeud::Inverse(constante(2)),
        ]);
        assert_eq!(arbre.evaluer(&Environnement::vide()), Ok(Valeur::entiere(5)));
    }

    #[test]
    fn racine_negative_indefinie_sans_erreur() {
        let arbre = Noeud::Racine(Box::new(Noeud::Inverse(constante(4))));
        assert_eq!(arbre.evaluer(&Environnement::vide()), Ok(Valeur::Indefinie));
    }

    #[test]
    fn affichage_infixe() {
        let arbre = Noeud::Multiplier(
            Box::new(Noeud::Plus(constante(2), constante(3))),
            constante(4),
        );
        assert_eq!(arbre.to_string(), "((2+3)*4)");
    }
}
