// src/noyau/jetons.rs

use super::decimal::Decimal;
use super::erreur::ErreurCalcul;

/// Opérateurs du pavé : quatre opérations + parenthèses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Add,
    Sub,
    Mul,
    Div,
    LPar,
    RPar,
}

impl Action {
    pub const TOUTES: [Action; 6] = [
        Action::Add,
        Action::Sub,
        Action::Mul,
        Action::Div,
        Action::LPar,
        Action::RPar,
    ];

    /// Table de précédence.
    ///
    /// NOTE: Sub est classé au-dessus de Add, et Div au-dessus de Mul.
    /// Avec une arithmétique exacte, le résultat reste celui de l’ordre usuel
    /// (a + b - c == a + (b - c), a * b / c == a * (b / c)).
    /// Parenthèses : 0, jamais comparées.
    pub fn precedence(self) -> i32 {
        match self {
            Action::Add => 1,
            Action::Sub => 2,
            Action::Mul => 3,
            Action::Div => 4,
            Action::LPar | Action::RPar => 0,
        }
    }

    pub fn is_parenthese(self) -> bool {
        matches!(self, Action::LPar | Action::RPar)
    }

    /// Applique un opérateur binaire. Une parenthèse ici => expression invalide.
    pub fn apply(self, left: &Decimal, right: &Decimal) -> Result<Decimal, ErreurCalcul> {
        match self {
            Action::Add => Ok(left + right),
            Action::Sub => Ok(left - right),
            Action::Mul => Ok(left * right),
            Action::Div => left.checked_div(right).ok_or(ErreurCalcul::DivisionParZero),
            Action::LPar | Action::RPar => Err(ErreurCalcul::Malformee),
        }
    }

    pub fn symbole(self) -> &'static str {
        match self {
            Action::Add => "+",
            Action::Sub => "-",
            Action::Mul => "*",
            Action::Div => "/",
            Action::LPar => "(",
            Action::RPar => ")",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tok {
    Num(Decimal),
    Op(Action),
}

/// Format utilitaire (journaux / affichage) : liste de jetons en texte.
pub fn format_tokens(tokens: &[Tok]) -> String {
    let mut out = Vec::with_capacity(tokens.len());
    for t in tokens {
        let s = match t {
            Tok::Num(v) => v.format_court(),
            Tok::Op(a) => a.symbole().to_string(),
        };
        out.push(s);
    }
    out.join(" ")
}
