//! Noyau exact de la calculatrice RPN
//!
//! Organisation interne :
//! - decimal.rs  : décimal exact (rationnel) + affichage canonique 15 décimales
//! - erreur.rs   : erreurs typées (calcul, lecture de nombre)
//! - jetons.rs   : jetons + table de précédence
//! - tampon.rs   : formule en cours de saisie (nombre ouvert, chiffres)
//! - rpn.rs      : shunting-yard
//! - eval.rs     : évaluation de la RPN
//! - minuteur.rs : anti-rebond (un fil, un travail en attente)
//! - solveur.rs  : façade + observateur

pub mod decimal;
pub mod erreur;
pub mod eval;
pub mod jetons;
pub mod minuteur;
pub mod rpn;
pub mod solveur;
pub mod tampon;


#[cfg(test)]
mod tests_solveur;

// API publique minimale
pub use decimal::Decimal;
pub use erreur::{ErreurCalcul, ErreurNombre};
pub use eval::{eval_rpn, evaluate, resoudre};
pub use jetons::{format_tokens, Action, Tok};
pub use rpn::to_rpn;
pub use solveur::{Observateur, Reglages, Solveur};
