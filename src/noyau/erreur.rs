// src/noyau/erreur.rs
//
// Erreurs du noyau.
// Les deux erreurs de calcul remontent à l’observateur sous la même forme
// (résultat absent) ; le type sert aux journaux et aux tests.

use thiserror::Error;

/// Échec d’évaluation d’une formule postfixée.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ErreurCalcul {
    /// Parenthèses non équilibrées, opérande manquant, opérandes en trop.
    #[error("expression invalide")]
    Malformee,

    #[error("division par zéro")]
    DivisionParZero,
}

/// Échec de lecture d’un nombre décimal.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ErreurNombre {
    #[error("nombre vide")]
    Vide,

    #[error("caractère inattendu: '{0}'")]
    Caractere(char),

    #[error("nombre invalide: {0:?}")]
    Invalide(String),
}
