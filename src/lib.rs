//! Évaluateur Q-var
//!
//! Compile une ligne de texte ("2 + 3*x - sin(pi/6)") en un arbre
//! d'opérations immuable, puis l'évalue contre un environnement de
//! variables, sur un domaine rationnel exact.
//!
//! Le pilote interactif (invite, lecture des variables au terminal,
//! codes de sortie) vit hors de cette crate; les seuls points d'entrée
//! sont [`compiler_expression`] et [`Noeud::evaluer`].
//!
//! ```
//! use evaluateur_qvar::{compiler_expression, Environnement, Valeur};
//!
//! let arbre = compiler_expression("2*x + 1").unwrap();
//! let env = Environnement::vide().avec('x', Valeur::entiere(5));
//! assert_eq!(arbre.evaluer(&env), Ok(Valeur::entiere(11)));
//! ```

pub mod noyau;

pub use noyau::{compiler_expression, Environnement, ErreurEval, ErreurParse, Noeud, Valeur};
