//! Calculatrice RPN : noyau exact, évaluation différée.
//!
//! Le binaire (src/main.rs) n’est qu’un pavé numérique au-dessus de
//! `noyau::Solveur`.

pub mod noyau;
