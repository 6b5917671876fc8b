//! Tests fuzz safe : robustesse + déterminisme + limites contrôlées.
//!
//! But : marteler le pipeline sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - profondeur bornée
//! - budget temps global
//! - on accepte certaines erreurs attendues (division/modulo par zéro)
//! - invariants clés : compiler deux fois donne le même arbre, évaluer
//!   deux fois donne la même valeur, et aucune entrée ne fait paniquer.

use std::time::{Duration, Instant};

use super::compile::compiler_expression;
use super::erreurs::ErreurEval;
use super::valeur::Valeur;
use super::variables::Environnement;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: u32) -> u32 {
        if n == 0 {
            0
        } else {
            self.next_u32() % n
        }
    }
    fn coin(&mut self) -> bool {
        (self.next_u32() & 1) == 1
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers fuzz ------------------------ */

fn est_erreur_eval_attendue(erreur: &ErreurEval) -> bool {
    // Liste blanche : le générateur structuré peut produire /0 et %0,
    // jamais de variable non liée (x et y sont liées dans l'environnement).
    matches!(
        erreur,
        ErreurEval::DivisionParZero | ErreurEval::ModuloParZero
    )
}

/* ------------------------ Génération d'expressions (bornée) ------------------------ */

fn gen_atome(rng: &mut Rng) -> String {
    // zéro sur-représenté: utile pour provoquer /0 et %0
    match rng.pick(8) {
        0 => "0".to_string(),
        1 => format!("{}", rng.pick(10)),
        2 => format!("{}.{}", rng.pick(10), rng.pick(100)),
        3 => "x".to_string(),
        4 => "y".to_string(),
        5 => "pi".to_string(),
        6 => "e".to_string(),
        _ => format!("{}", 1 + rng.pick(9)),
    }
}

fn gen_expr(rng: &mut Rng, depth: usize) -> String {
    if depth == 0 {
        return gen_atome(rng);
    }

    match rng.pick(10) {
        0 => gen_atome(rng),
        1 => format!("({}+{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        2 => format!("({}-{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        3 => format!("({}*{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        4 => format!("({}/{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        5 => format!("({}%{})", gen_expr(rng, depth - 1), gen_expr(rng, depth - 1)),
        6 => format!("-({})", gen_expr(rng, depth - 1)),
        7 => format!("sin({})", gen_expr(rng, depth - 1)),
        8 => format!("sqrt({})", gen_expr(rng, depth - 1)),
        _ => format!("({})^{}", gen_expr(rng, depth - 1), rng.pick(4)),
    }
}

/* ------------------------ Tests ------------------------ */

#[test]
fn fuzz_safe_determinisme_et_purete() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    // Même seed => mêmes expressions => mêmes sorties (déterminisme)
    let mut rng = Rng::new(0xC0FFEE_u64);

    let env = Environnement::vide()
        .avec('x', Valeur::entiere(3))
        .avec('y', Valeur::depuis_texte("0.5").unwrap_or(Valeur::Indefinie));

    let mut vus_ok = 0usize;
    let mut vus_err = 0usize;

    for _ in 0..150 {
        budget(t0, max);

        let texte = gen_expr(&mut rng, 4);

        // le générateur structuré ne produit que des textes bien formés
        let arbre = compiler_expression(&texte)
            .unwrap_or_else(|e| panic!("texte={texte:?} erreur d'analyse: {e}"));
        let arbre_bis = compiler_expression(&texte)
            .unwrap_or_else(|e| panic!("texte={texte:?} erreur d'analyse: {e}"));
        assert_eq!(arbre, arbre_bis, "compilation non déterministe: {texte:?}");

        match arbre.evaluer(&env) {
            Ok(valeur) => {
                // pureté: la ré-évaluation rend exactement la même valeur
                assert_eq!(arbre.evaluer(&env), Ok(valeur), "texte={texte:?}");
                vus_ok += 1;
            }
            Err(erreur) => {
                assert!(
                    est_erreur_eval_attendue(&erreur),
                    "erreur non attendue: texte={texte:?} erreur={erreur}"
                );
                // un échec n'use pas l'arbre
                assert_eq!(arbre.evaluer(&env), Err(erreur), "texte={texte:?}");
                vus_err += 1;
            }
        }
    }

    // On veut voir un mix des deux, sinon le fuzz ne "balaye" rien.
    assert!(vus_ok > 20, "trop peu de succès: {vus_ok}");
    assert!(vus_err > 0, "aucune erreur vue: fuzz trop sage");
}

#[test]
fn fuzz_safe_soupe_de_caracteres_sans_panique() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    let mut rng = Rng::new(0xBADC0DE_u64);

    // alphabet volontairement vicieux: opérateurs, séparateurs, débuts de
    // noms de fonctions, parenthèses orphelines
    let alphabet: Vec<char> = "0123456789+-*/%^()..,sqrtincoget xpE".chars().collect();

    let env = Environnement::vide().avec('x', Valeur::entiere(2));

    for _ in 0..600 {
        budget(t0, max);

        let longueur = 1 + rng.pick(24) as usize;
        let texte: String = (0..longueur)
            .map(|_| alphabet[rng.pick(alphabet.len() as u32) as usize])
            .collect();

        // tout droit de refuser, interdit de paniquer
        if let Ok(arbre) = compiler_expression(&texte) {
            let _ = arbre.evaluer(&env);
        }
    }
}

#[test]
fn fuzz_safe_somme_large_sans_debordement() {
    let t0 = Instant::now();
    let max = Duration::from_millis(400);

    // 800 termes de surface: la Somme n-aire reste plate, pas de peigne
    let texte = vec!["1"; 800].join("+");
    budget(t0, max);

    let arbre = compiler_expression(&texte).unwrap_or_else(|e| panic!("erreur: {e}"));
    assert_eq!(
        arbre.evaluer(&Environnement::vide()),
        Ok(Valeur::entiere(800))
    );
}
