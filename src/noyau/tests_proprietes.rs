//! Tests de propriétés (campagne) : arithmétique standard + erreurs + pureté.
//!
//! But : vérifier le contrat de bout en bout (texte -> arbre -> valeur)
//! sans dépendre du détail des structures internes.
//!
//! Notes importantes (aligné avec l'état actuel du noyau) :
//! - Puissance, racine et trig passent par l'approximation flottante;
//!   on ne compare donc ces résultats qu'à un epsilon près, sauf quand
//!   le flottant est exact (sin(0), 2^9, sqrt(16)…).
//! - Indefinie n'est pas une erreur : sqrt(-4) évalue vers « indéfini »
//!   et se propage par absorption.

use super::arbre::Noeud;
use super::compile::compiler_expression;
use super::erreurs::ErreurEval;
use super::valeur::Valeur;
use super::variables::Environnement;

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

fn assert_proche(texte: &str, attendu: f64) {
    let valeur = eval_ok(texte, &Environnement::vide()).en_flottant();
    assert!(
        (valeur - attendu).abs() < 1e-9,
        "expr={texte:?} valeur={valeur} attendu={attendu}"
    );
}

fn assert_erreur_eval(texte: &str, attendu: ErreurEval) {
    let arbre = compile_ok(texte);
    assert_eq!(arbre.evaluer(&Environnement::vide()), Err(attendu), "expr={texte:?}");
}

/* ------------------------ Arithmétique infixe standard ------------------------ */

#[test]
fn prop_precedence() {
    assert_entiere("2+3*4", 14);
    assert_entiere("(2+3)*4", 20);
    assert_entiere("2*3+4*5", 26);
    assert_entiere("2+3*4+5", 19);
}

#[test]
fn prop_associativite_gauche() {
    assert_entiere("10-3-2", 5);
    assert_entiere("20/4/5", 1);
    assert_entiere("100/5/2/2", 5);
    assert_entiere("10-2-3-4", 1);
}

#[test]
fn prop_puissance() {
    assert_entiere("2^10", 1024);
    // associe à droite: 2^(3^2)
    assert_entiere("2^3^2", 512);
    assert_proche("2^0.5", std::f64::consts::SQRT_2);
    // jamais une erreur, même hors domaine: (-4)^0.5 est indéfini
    assert_eq!(
        eval_ok("(0-4)^0.5", &Environnement::vide()),
        Valeur::Indefinie
    );
}

#[test]
fn prop_moins_unaire() {
    assert_entiere("-(3+4)", -7);
    assert_entiere("2*-3", -6);
    assert_entiere("--3", 3);
    assert_entiere("5--2", 7);
    assert_entiere("-2^2", -4);
}

#[test]
fn prop_decimaux() {
    assert_proche("0.5+0.25", 0.75);
    assert_entiere("2.5*4", 10);
    assert_proche("7.5%2", 1.5);
}

/* ------------------------ Fonctions et constantes ------------------------ */

#[test]
fn prop_fonctions_usuelles() {
    assert_entiere("sin(0)", 0);
    assert_entiere("cos(0)", 1);
    assert_entiere("tg(0)", 0);
    assert_entiere("sqrt(16)", 4);
    assert_entiere("exp(0)", 1);

    assert_proche("sin(pi/6)", 0.5);
    assert_proche("cos(pi/3)", 0.5);
    assert_proche("tg(pi/4)", 1.0);
    assert_proche("ctg(pi/4)", 1.0);
    assert_proche("sqrt(2)", std::f64::consts::SQRT_2);
    assert_proche("exp(1)", std::f64::consts::E);
}

#[test]
fn prop_match_glouton_fonctions_contre_variables() {
    // sin(0) est la fonction sinus, pas les variables s, i, n
    assert_entiere("sin(0)", 0);

    // un "s" isolé est la variable s
    let env = Environnement::vide().avec('s', Valeur::entiere(9));
    assert_eq!(eval_ok("s", &env), Valeur::entiere(9));
    assert_eq!(eval_ok("s*2", &env), Valeur::entiere(18));

    // idem pour t (devant un non-g) et c (devant un non-os/tg)
    let env = Environnement::vide()
        .avec('t', Valeur::entiere(2))
        .avec('c', Valeur::entiere(3));
    assert_eq!(eval_ok("t*c", &env), Valeur::entiere(6));
}

#[test]
fn prop_constantes_nommees() {
    assert_proche("pi", std::f64::consts::PI);
    assert_proche("e", std::f64::consts::E);
    assert_proche("2*pi", std::f64::consts::TAU);
    // e^x via exp et via puissance donnent la même approximation
    let a = eval_ok("exp(2)", &Environnement::vide());
    let b = eval_ok("e^2", &Environnement::vide());
    assert_eq!(a, b);
}

/* ------------------------ Erreurs d'évaluation ------------------------ */

#[test]
fn prop_division_modulo_par_zero() {
    assert_erreur_eval("5/0", ErreurEval::DivisionParZero);
    assert_erreur_eval("5%0", ErreurEval::ModuloParZero);
    assert_erreur_eval("1/(2-2)", ErreurEval::DivisionParZero);
    // l'échec est porté par l'évaluation, pas la compilation
    assert!(compiler_expression("5/0").is_ok());
}

#[test]
fn prop_variable_inconnue_nommee() {
    assert_erreur_eval("x+1", ErreurEval::VariableInconnue { nom: 'x' });

    let arbre = compile_ok("x+1");
    let env = Environnement::vide().avec('x', Valeur::entiere(5));
    assert_eq!(arbre.evaluer(&env), Ok(Valeur::entiere(6)));
}

#[test]
fn prop_echec_gauche_avant_droite() {
    // y est rencontré avant la division par zéro du sous-arbre droit
    let arbre = compile_ok("y/0 + 1/0");
    assert_eq!(
        arbre.evaluer(&Environnement::vide()),
        Err(ErreurEval::VariableInconnue { nom: 'y' })
    );
}

/* ------------------------ Indéfini (absorption, pas d'erreur) ------------------------ */

#[test]
fn prop_indefini_absorbant() {
    assert_eq!(eval_ok("sqrt(0-4)", &Environnement::vide()), Valeur::Indefinie);
    assert_eq!(eval_ok("sqrt(0-4)+1", &Environnement::vide()), Valeur::Indefinie);
    assert_eq!(eval_ok("2*sqrt(0-9)", &Environnement::vide()), Valeur::Indefinie);
}

/* ------------------------ Rejet avant toute évaluation ------------------------ */

#[test]
fn prop_malformes_refuses_a_la_compilation() {
    for texte in [
        "2++", "(2+3", "2..5", "2.", ".5", "", "   ", "()", "2+", "*2", "2*/3", "5)",
        "2,5", "x y +",
    ] {
        assert!(
            compiler_expression(texte).is_err(),
            "expr={texte:?} aurait dû être refusée"
        );
    }
}

/* ------------------------ Pureté / idempotence ------------------------ */

#[test]
fn prop_purete_et_idempotence() {
    let texte = "2*x^2 - sqrt(x) + sin(pi/4)";
    let a = compile_ok(texte);
    let b = compile_ok(texte);
    assert_eq!(a, b, "deux compilations du même texte divergent");

    let env = Environnement::vide().avec('x', Valeur::entiere(4));
    let v1 = a.evaluer(&env);
    let v2 = a.evaluer(&env);
    assert_eq!(v1, v2, "deux évaluations du même arbre divergent");
    assert_eq!(v1, b.evaluer(&env));

    // un échec ne laisse aucune trace: le même arbre reste réutilisable
    let arbre = compile_ok("z+1");
    assert!(arbre.evaluer(&Environnement::vide()).is_err());
    let env = Environnement::vide().avec('z', Valeur::entiere(1));
    assert_eq!(arbre.evaluer(&env), Ok(Valeur::entiere(2)));
}
