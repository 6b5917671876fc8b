// src/noyau/termes.rs
//
// Découpage en termes additifs de surface.
//
// Règles:
// - '+' et '-' ne séparent qu'à profondeur de parenthèses zéro; tout ce qui
//   est entre parenthèses appartient au terme englobant.
// - Signes adjacents sur un terme encore vide: cumul par XOR du drapeau
//   negatif ("3--4" vaut 3 + 4, "--3" vaut 3). Pas de terme vide émis.
// - Un groupe parenthésé couvrant tout le terme perd ses parenthèses
//   englobantes, y compris "((…))".
// - ')' à profondeur zéro: erreur immédiate avec son indice.
// - Signe final sans opérande: « opérande droite manquante » ("2+").

use super::erreurs::ErreurParse;
use super::rpn::PROFONDEUR_MAX;

/// Tranche du texte d'origine à profondeur zéro, avec le signe accumulé
/// sur ses bornes. Jeté une fois le terme compilé.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Terme<'a> {
    pub texte: &'a str,
    pub negatif: bool,
}

pub fn decouper_termes(expression: &str) -> Result<Vec<Terme<'_>>, ErreurParse> {
    let mut termes = Vec::new();

    let mut profondeur: usize = 0;
    // indice (octets) du début du terme courant
    let mut debut: usize = 0;
    let mut vide = true;
    let mut negatif = false;
    let mut signe_en_attente = false;

    for (i, c) in expression.char_indices() {
        if profondeur == 0 {
            match c {
                ')' => return Err(ErreurParse::ParentheseFermanteOrpheline { indice: i }),
                '(' => {
                    profondeur = 1;
                    vide = false;
                }
                '+' | '-' => {
                    let moins = c == '-';
                    if vide {
                        negatif ^= moins;
                    } else {
                        termes.push(Terme {
                            texte: depouiller(&expression[debut..i]),
                            negatif,
                        });
                        vide = true;
                        negatif = moins;
                    }
                    debut = i + c.len_utf8();
                    signe_en_attente = true;
                }
                _ => vide = false,
            }
        } else {
            match c {
                '(' => {
                    profondeur += 1;
                    if profondeur > PROFONDEUR_MAX {
                        return Err(ErreurParse::ProfondeurExcessive);
                    }
                }
                ')' => profondeur -= 1,
                _ => {}
            }
        }
    }

    if profondeur != 0 {
        return Err(ErreurParse::ParenthesesDesequilibrees);
    }

    if !vide {
        termes.push(Terme {
            texte: depouiller(&expression[debut..]),
            negatif,
        });
    } else if signe_en_attente {
        return Err(ErreurParse::OperandeDroiteManquante);
    }

    Ok(termes)
}

/// Retire les parenthèses englobantes tant que le groupe couvre le terme
/// en entier.
fn depouiller(mut texte: &str) -> &str {
    while texte.len() >= 2 && texte.starts_with('(') && texte.ends_with(')') && englobe(texte) {
        texte = &texte[1..texte.len() - 1];
    }
    texte
}

/// Vrai si la parenthèse ouvrante initiale se referme sur le dernier
/// caractère (appelé sur un texte aux parenthèses équilibrées).
fn englobe(texte: &str) -> bool {
    let mut profondeur: usize = 0;
    for (i, c) in texte.char_indices() {
        match c {
            '(' => profondeur += 1,
            ')' => {
                profondeur -= 1;
                if profondeur == 0 {
                    return i == texte.len() - 1;
                }
            }
            _ => {}
        }
    }
    false
}
