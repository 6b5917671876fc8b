// src/noyau/compile.rs
//
// Compilateur d'expressions (pipeline complet):
//   texte -> nettoyage des blancs -> termes -> [RPN -> arbre] par terme
//         -> combinaison en une racine unique
//
// Combinaison: 0 terme -> erreur; 1 terme -> son sous-arbre (signé);
// 2 termes -> Plus (chaque sous-arbre encode déjà son signe via Inverse);
// 3 termes et plus -> Somme n-aire dans l'ordre textuel.

use super::arbre::Noeud;
use super::erreurs::ErreurParse;
use super::rpn::{depuis_rpn, en_rpn};
use super::termes::{decouper_termes, Terme};

/// API publique: compile une ligne de texte en arbre d'opérations.
///
/// Tous les blancs (de tête, de queue, intercalés) sont retirés avant
/// analyse. Aucun arbre partiel n'est retourné en cas d'échec.
pub fn compiler_expression(texte: &str) -> Result<Noeud, ErreurParse> {
    let nettoye: String = texte.chars().filter(|c| !c.is_whitespace()).collect();

    let termes = decouper_termes(&nettoye)?;

    match termes.len() {
        0 => Err(ErreurParse::SousExpressionVide),
        1 => compiler_terme(&termes[0]),
        2 => {
            let gauche = compiler_terme(&termes[0])?;
            let droite = compiler_terme(&termes[1])?;
            Ok(Noeud::Plus(Box::new(gauche), Box::new(droite)))
        }
        _ => {
            let mut enfants = Vec::with_capacity(termes.len());
            for terme in &termes {
                enfants.push(compiler_terme(terme)?);
            }
            Ok(Noeud::Somme(enfants))
        }
    }
}

/// Un terme: RPN puis arbre; le signe accumulé au découpage enveloppe
/// le sous-arbre dans Inverse.
fn compiler_terme(terme: &Terme<'_>) -> Result<Noeud, ErreurParse> {
    let flux = en_rpn(terme.texte)?;
    let noeud = depuis_rpn(flux)?;
    Ok(if terme.negatif {
        Noeud::Inverse(Box::new(noeud))
    } else {
        noeud
    })
}

#[cfg(test)]
mod tests {
    use super::compiler_expression;
    use crate::noyau::arbre::Noeud;
    use crate::noyau::erreurs::ErreurEval;
    use crate::noyau::valeur::Valeur;
    use crate::noyau::variables::Environnement;

    fn compile_ok(texte: &str) -> Noeud {
        compiler_expression(texte).unwrap_or_else(|e| panic!("expr={texte:?} erreur: {e}"))
    }

    fn eval_ok(texte: &str, env: &Environnement) -> Valeur {
        compile_ok(texte)
            .evaluer(env)
            .unwrap_or_else(|e| panic!("expr={texte:?} erreur: {e}"))
    }

    fn assert_entiere(texte: &str, attendu: i64) {
        assert_eq!(
            eval_ok(texte, &Environnement::vide()),
            Valeur::entiere(attendu),
            "expr={texte:?}"
        );
    }

    #[test]
    fn arithmetique_standard() {
        assert_entiere("2+3*4", 14);
        assert_entiere("(2+3)*4", 20);
        assert_entiere("10-3-2", 5);
        assert_entiere("20/4/5", 1);
    }

    #[test]
    fn combinaison_des_termes() {
        // 1 terme
        assert_entiere("6", 6);
        // 2 termes -> Plus
        assert!(matches!(compile_ok("1+2"), Noeud::Plus(_, _)));
        // 3 termes et plus -> Somme n-aire
        assert!(matches!(compile_ok("1+2+3"), Noeud::Somme(_)));
        assert_entiere("1+2+3+4", 10);
    }

    #[test]
    fn moins_unaire() {
        assert_entiere("-(3+4)", -7);
        assert_entiere("2*-3", -6);
        assert_entiere("--3", 3);
        assert_entiere("3--4", 7);
        assert_entiere("-3+4", 1);
    }

    #[test]
    fn blancs_ignores() {
        assert_entiere("  2 + 3 * 4 ", 14);
        assert_entiere("1 0 - 3", 7);
    }

    #[test]
    fn variables_liees_et_inconnues() {
        let arbre = compile_ok("x+1");

        assert_eq!(
            arbre.evaluer(&Environnement::vide()),
            Err(ErreurEval::VariableInconnue { nom: 'x' })
        );

        // le même arbre, ré-évalué après liaison, réussit (pureté)
        let env = Environnement::vide().avec('x', Valeur::entiere(5));
        assert_eq!(arbre.evaluer(&env), Ok(Valeur::entiere(6)));
    }

    #[test]
    fn echec_a_la_compilation_jamais_a_moitie() {
        for texte in ["2++", "(2+3", "2..5", "", "()", "2+", "*2", "2*/3", "5)", "2&3"] {
            assert!(
                compiler_expression(texte).is_err(),
                "expr={texte:?} aurait dû être refusée"
            );
        }
    }

    #[test]
    fn idempotence_de_la_compilation() {
        let a = compile_ok("2*x + sin(pi/6) - 4");
        let b = compile_ok("2*x + sin(pi/6) - 4");
        assert_eq!(a, b);

        let env = Environnement::vide().avec('x', Valeur::entiere(3));
        assert_eq!(a.evaluer(&env), b.evaluer(&env));
        assert_eq!(a.evaluer(&env), a.evaluer(&env));
    }
}
