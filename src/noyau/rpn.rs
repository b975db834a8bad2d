// src/noyau/rpn.rs
//
// Shunting-yard : formule infixe -> RPN (postfix)
//
// Règles:
// - Num : sortie directe
// - '(' : empilée
// - ')' : dépile jusqu’à '(' (jetée). Sans '(' dans la pile : on s’arrête,
//         la ')' est avalée sans erreur.
// - opérateur : dépile tant que le sommet lie au moins aussi fort
//         (égalité => le sommet sort d’abord, associativité à gauche)
// - fin : tout ce qui reste sort, y compris une '(' orpheline
//
// La conversion ne refuse jamais rien : une formule mal formée donne une RPN
// mal formée, rejetée plus tard par eval_rpn.

use super::jetons::{Action, Tok};

/// Convertit une formule infixe en RPN (notation polonaise inversée).
///
/// Exemple:
///   formule: [LPar, 5, Add, 2, RPar, Mul, 3]
///   rpn:     [5, 2, Add, 3, Mul]
pub fn to_rpn(tokens: &[Tok]) -> Vec<Tok> {
    let mut out: Vec<Tok> = Vec::with_capacity(tokens.len());
    let mut ops: Vec<Action> = Vec::new();

    for tok in tokens {
        let action = match tok {
            Tok::Num(_) => {
                out.push(tok.clone());
                continue;
            }
            Tok::Op(a) => *a,
        };

        match action {
            Action::LPar => ops.push(action),

            Action::RPar => {
                while let Some(top) = ops.pop() {
                    if top == Action::LPar {
                        break;
                    }
                    out.push(Tok::Op(top));
                }
            }

            _ => {
                while let Some(&top) = ops.last() {
                    if top.is_parenthese() || action.precedence() > top.precedence() {
                        break;
                    }
                    out.push(Tok::Op(top));
                    ops.pop();
                }
                ops.push(action);
            }
        }
    }

    // vide la pile ops (ordre de dépilement)
    while let Some(op) = ops.pop() {
        out.push(Tok::Op(op));
    }

    out
}
