// src/noyau/tampon.rs
//
// Formule en cours de saisie.
//
// Contrat :
// - `dernier_nombre` est vrai ssi la formule finit par un Num encore “ouvert”
//   (aucun opérateur saisi après lui).
// - Un nombre ouvert est remplacé (push_number) ou prolongé (push_digit),
//   jamais dupliqué.
// - Un opérateur ferme toujours le nombre courant.

use super::decimal::Decimal;
use super::jetons::{Action, Tok};

#[derive(Clone, Debug, Default)]
pub struct Formule {
    jetons: Vec<Tok>,
    dernier_nombre: bool,
    // décimales déjà saisies après le point du nombre ouvert (None: partie entière)
    fraction: Option<u32>,
}

impl Formule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn jetons(&self) -> &[Tok] {
        &self.jetons
    }

    /// Copie indépendante, lue par l’évaluation différée.
    pub fn snapshot(&self) -> Vec<Tok> {
        self.jetons.clone()
    }

    pub fn is_empty(&self) -> bool {
        self.jetons.is_empty()
    }

    pub fn len(&self) -> usize {
        self.jetons.len()
    }

    pub fn dernier_nombre(&self) -> bool {
        self.dernier_nombre
    }

    /// Nombre complet : remplace le nombre ouvert, sinon ajoute.
    pub fn push_number(&mut self, value: Decimal) {
        // une valeur à développement infini ne se prolonge qu’en partie entière
        self.fraction = match value.decimales() {
            Some(0) | None => None,
            Some(k) => Some(k),
        };
        self.remplace_ou_ajoute(value);
    }

    /// Chiffre tapé au clavier. Refuse tout ce qui n’est pas 0..=9.
    pub fn push_digit(&mut self, chiffre: u8) -> bool {
        if chiffre > 9 {
            return false;
        }

        let value = match self.nombre_ouvert() {
            Some(courant) => courant.avec_chiffre(chiffre, self.fraction),
            None => Decimal::from(u32::from(chiffre)),
        };
        if self.dernier_nombre {
            if let Some(k) = self.fraction.as_mut() {
                *k += 1;
            }
        } else {
            self.fraction = None;
        }

        self.remplace_ou_ajoute(value);
        true
    }

    /// Point décimal : ouvre la partie fractionnaire du nombre courant.
    /// Sans nombre ouvert, commence "0.". Un second point est ignoré.
    pub fn push_point(&mut self) -> bool {
        if !self.dernier_nombre {
            self.remplace_ou_ajoute(Decimal::zero());
            self.fraction = Some(0);
            return true;
        }
        if self.fraction.is_some() {
            return false;
        }
        self.fraction = Some(0);
        true
    }

    pub fn push_action(&mut self, action: Action) {
        self.dernier_nombre = false;
        self.fraction = None;
        self.jetons.push(Tok::Op(action));
    }

    pub fn clear(&mut self) {
        self.jetons.clear();
        self.dernier_nombre = false;
        self.fraction = None;
    }

    fn nombre_ouvert(&self) -> Option<&Decimal> {
        if !self.dernier_nombre {
            return None;
        }
        match self.jetons.last() {
            Some(Tok::Num(v)) => Some(v),
            _ => None,
        }
    }

    fn remplace_ou_ajoute(&mut self, value: Decimal) {
        if self.dernier_nombre {
            self.jetons.pop();
        }
        self.jetons.push(Tok::Num(value));
        self.dernier_nombre = true;
    }
}
