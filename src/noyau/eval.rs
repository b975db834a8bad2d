//! Noyau — évaluation d’une RPN
//!
//! formule -> to_rpn -> eval_rpn -> Option<Decimal>
//!
//! Deux échecs possibles (ErreurCalcul) : expression mal formée, division par
//! zéro. Vers l’extérieur, les deux deviennent un résultat absent.

use tracing::debug;

use super::decimal::Decimal;
use super::erreur::ErreurCalcul;
use super::jetons::{format_tokens, Tok};
use super::rpn::to_rpn;

/// Évalue une RPN avec une pile de valeurs.
///
/// - Num : empilé
/// - opérateur : dépile droite puis gauche (l’ordre compte), applique, empile
/// - parenthèse : ne doit pas apparaître en RPN => Malformee
/// - fin : exactement une valeur, sinon Malformee
pub fn eval_rpn(rpn: &[Tok]) -> Result<Decimal, ErreurCalcul> {
    let mut st: Vec<Decimal> = Vec::with_capacity(rpn.len());

    for tok in rpn {
        match tok {
            Tok::Num(v) => st.push(v.clone()),
            Tok::Op(action) => {
                if action.is_parenthese() {
                    return Err(ErreurCalcul::Malformee);
                }
                let right = st.pop().ok_or(ErreurCalcul::Malformee)?;
                let left = st.pop().ok_or(ErreurCalcul::Malformee)?;
                st.push(action.apply(&left, &right)?);
            }
        }
    }

    match (st.pop(), st.is_empty()) {
        (Some(v), true) => Ok(v),
        _ => Err(ErreurCalcul::Malformee),
    }
}

/// Comme eval_rpn, mais sans distinguer les causes d’échec.
pub fn evaluate(rpn: &[Tok]) -> Option<Decimal> {
    match eval_rpn(rpn) {
        Ok(v) => Some(v),
        Err(e) => {
            debug!(rpn = %format_tokens(rpn), erreur = %e, "évaluation impossible");
            None
        }
    }
}

/// Pipeline complet sur une formule infixe.
pub fn resoudre(formule: &[Tok]) -> Option<Decimal> {
    let rpn = to_rpn(formule);
    debug!(rpn = %format_tokens(&rpn), "formule convertie");
    evaluate(&rpn)
}
