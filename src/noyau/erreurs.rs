// src/noyau/erreurs.rs
//
// Deux taxonomies disjointes, propagées par retour anticipé (fail-fast,
// la première faute gagne, aucune agrégation):
// - ErreurParse : structure du texte; terminale pour la compilation,
//   aucun arbre partiel n'est retourné.
// - ErreurEval  : sémantique à l'évaluation; terminale pour cet appel
//   seulement, l'arbre reste réutilisable avec un autre environnement.
//
// Les indices sont relatifs au terme analysé (texte déjà nettoyé des blancs).

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErreurParse {
    /// '(' jamais refermée, ou marqueur de parenthèse retrouvé dans le flux RPN.
    ParenthesesDesequilibrees,
    /// ')' rencontrée à profondeur zéro lors du découpage en termes.
    ParentheseFermanteOrpheline { indice: usize },
    /// Séparateur décimal sans chiffre avant ou après.
    SeparateurOrphelin { indice: usize },
    /// Numéral capturé mais inconvertible (ne devrait pas arriver).
    NombreInvalide { indice: usize },
    CaractereInattendu { caractere: char, indice: usize },
    /// Jeton refusé par le masque de permissions (ex: "2*+3").
    JetonInterdit { caractere: char, indice: usize },
    /// Trop peu d'opérandes pour un opérateur du flux RPN.
    OperandeManquante,
    /// Signe final sans opérande à droite (ex: "2+").
    OperandeDroiteManquante,
    /// Deux opérandes adjacentes sans opérateur entre elles.
    OperateurManquant,
    SousExpressionVide,
    /// Opérateur réservé mais jamais implémenté (trig inverse).
    OperationNonSupportee { nom: &'static str },
    /// Garde-fou: imbrication de parenthèses au-delà de la limite.
    ProfondeurExcessive,
}

impl fmt::Display for ErreurParse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ErreurParse::*;
        match self {
            ParenthesesDesequilibrees => write!(f, "parenthèses déséquilibrées"),
            ParentheseFermanteOrpheline { indice } => {
                write!(f, "parenthèse fermante orpheline à l'indice {indice}")
            }
            SeparateurOrphelin { indice } => {
                write!(f, "séparateur décimal orphelin à l'indice {indice}")
            }
            NombreInvalide { indice } => write!(f, "nombre invalide à l'indice {indice}"),
            CaractereInattendu { caractere, indice } => {
                write!(f, "caractère inattendu '{caractere}' à l'indice {indice}")
            }
            JetonInterdit { caractere, indice } => {
                write!(f, "jeton '{caractere}' interdit à l'indice {indice}")
            }
            OperandeManquante => write!(f, "opérande manquante"),
            OperandeDroiteManquante => write!(f, "opérande droite manquante"),
            OperateurManquant => write!(f, "opérateur manquant entre deux opérandes"),
            SousExpressionVide => write!(f, "sous-expression vide"),
            OperationNonSupportee { nom } => write!(f, "opération non supportée: {nom}"),
            ProfondeurExcessive => write!(f, "profondeur de parenthèses excessive"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErreurEval {
    DivisionParZero,
    ModuloParZero,
    VariableInconnue { nom: char },
}

impl fmt::Display for ErreurEval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErreurEval::DivisionParZero => write!(f, "division par zéro"),
            ErreurEval::ModuloParZero => write!(f, "modulo par zéro"),
            ErreurEval::VariableInconnue { nom } => write!(f, "variable inconnue: {nom}"),
        }
    }
}
