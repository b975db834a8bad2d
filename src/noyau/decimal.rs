// src/noyau/decimal.rs
//
// Décimal exact (base 10) adossé à un rationnel.
// - arithmétique exacte : 0.1 + 0.2 == 0.3, sans artefact binaire
// - division : None si diviseur nul (pas de panique)
// - affichage : 15 décimales arrondies, zéros finaux retirés sauf un pour
//   un entier ("4.0", jamais "4." ni "4.000000000000000")

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

use super::erreur::ErreurNombre;

/// Nombre de décimales de la forme canonique d’affichage.
pub const DECIMALES_AFFICHAGE: usize = 15;

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Decimal(BigRational);

pub(crate) fn pow10(n: u32) -> BigInt {
    BigInt::from(10).pow(n)
}

impl Decimal {
    pub fn zero() -> Self {
        Self(BigRational::zero())
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_negative()
    }

    /// Forme courte, sans ".0" pour un entier (formule affichée, journaux).
    pub fn format_court(&self) -> String {
        self.formater(false)
    }

    fn formater(&self, garder_zero: bool) -> String {
        let scale = BigRational::from_integer(pow10(DECIMALES_AFFICHAGE as u32));
        // round() : demi-cas arrondis loin de zéro
        let scaled = (&self.0 * &scale).round().to_integer();
        scaled_to_decimal(scaled, DECIMALES_AFFICHAGE, garder_zero)
    }

    /// left / right, ou None si right == 0.
    pub fn checked_div(&self, right: &Decimal) -> Option<Decimal> {
        if right.is_zero() {
            return None;
        }
        Some(Self(&self.0 / &right.0))
    }

    /// Nombre de décimales d’un développement fini (0 pour un entier).
    /// None si le développement ne se termine pas (ex: 1/3).
    pub fn decimales(&self) -> Option<u32> {
        let mut d = self.0.denom().clone();
        let deux = BigInt::from(2);
        let cinq = BigInt::from(5);

        let mut a = 0u32;
        while (&d % &deux).is_zero() {
            d /= &deux;
            a += 1;
        }
        let mut b = 0u32;
        while (&d % &cinq).is_zero() {
            d /= &cinq;
            b += 1;
        }

        if d.is_one() {
            Some(a.max(b))
        } else {
            None
        }
    }

    /// Ajoute un chiffre à droite, comme au clavier.
    ///
    /// - `fraction == None` : partie entière, v*10 + c
    /// - `fraction == Some(k)` : k décimales déjà saisies, v + c/10^(k+1)
    ///
    /// Le chiffre prend le signe de la valeur (-3 puis 4 => -34).
    pub fn avec_chiffre(&self, chiffre: u8, fraction: Option<u32>) -> Decimal {
        let mut c = BigRational::from_integer(BigInt::from(chiffre));
        if self.is_negative() {
            c = -c;
        }

        match fraction {
            None => Self(&self.0 * BigRational::from_integer(BigInt::from(10)) + c),
            Some(k) => Self(&self.0 + c / BigRational::from_integer(pow10(k + 1))),
        }
    }
}

/* ------------------------ Affichage canonique ------------------------ */

/// Entier “scalé” (×10^digits) -> texte décimal, zéros finaux retirés.
/// `garder_zero` : un entier garde une décimale ("4.0", "0.0").
fn scaled_to_decimal(mut scaled: BigInt, digits: usize, garder_zero: bool) -> String {
    let entier = if garder_zero { ".0" } else { "" };
    if scaled.is_zero() {
        return format!("0{entier}");
    }

    let neg = scaled.is_negative();
    if neg {
        scaled = -scaled;
    }

    let scale = pow10(digits as u32);
    let int_part = &scaled / &scale;
    let frac_part = &scaled % &scale;

    let mut frac = frac_part.to_str_radix(10);
    while frac.len() < digits {
        frac.insert(0, '0');
    }
    while frac.ends_with('0') {
        frac.pop();
    }

    let signe = if neg { "-" } else { "" };
    if frac.is_empty() {
        format!("{signe}{int_part}{entier}")
    } else {
        format!("{signe}{int_part}.{frac}")
    }
}

/// Forme canonique : 15 décimales au plus, "4.0" pour un entier.
impl fmt::Display for Decimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formater(true))
    }
}

/* ------------------------ Lecture ------------------------ */

/// Accepte `-?chiffres(.chiffres)?`, ainsi que ".5" et "5.".
impl FromStr for Decimal {
    type Err = ErreurNombre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ErreurNombre::Vide);
        }

        let (neg, corps) = match s.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, s),
        };

        let mut entier = String::new();
        let mut fraction = String::new();
        let mut point = false;

        for c in corps.chars() {
            match c {
                '0'..='9' if point => fraction.push(c),
                '0'..='9' => entier.push(c),
                '.' if !point => point = true,
                _ => return Err(ErreurNombre::Caractere(c)),
            }
        }

        if entier.is_empty() && fraction.is_empty() {
            return Err(ErreurNombre::Invalide(s.to_string()));
        }

        let chiffres = format!("{entier}{fraction}");
        let n = BigInt::parse_bytes(chiffres.as_bytes(), 10)
            .ok_or_else(|| ErreurNombre::Invalide(s.to_string()))?;
        let r = BigRational::new(n, pow10(fraction.len() as u32));

        Ok(Self(if neg { -r } else { r }))
    }
}

/* ------------------------ Conversions ------------------------ */

impl From<BigInt> for Decimal {
    fn from(n: BigInt) -> Self {
        Self(BigRational::from_integer(n))
    }
}

impl From<i64> for Decimal {
    fn from(n: i64) -> Self {
        Self::from(BigInt::from(n))
    }
}

impl From<u32> for Decimal {
    fn from(n: u32) -> Self {
        Self::from(BigInt::from(n))
    }
}

/* ------------------------ Opérateurs ------------------------ */

impl Add<&Decimal> for &Decimal {
    type Output = Decimal;
    fn add(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 + &rhs.0)
    }
}

impl Sub<&Decimal> for &Decimal {
    type Output = Decimal;
    fn sub(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 - &rhs.0)
    }
}

impl Mul<&Decimal> for &Decimal {
    type Output = Decimal;
    fn mul(self, rhs: &Decimal) -> Decimal {
        Decimal(&self.0 * &rhs.0)
    }
}

impl Add for Decimal {
    type Output = Decimal;
    fn add(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 + rhs.0)
    }
}

impl Sub for Decimal {
    type Output = Decimal;
    fn sub(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 - rhs.0)
    }
}

impl Mul for Decimal {
    type Output = Decimal;
    fn mul(self, rhs: Decimal) -> Decimal {
        Decimal(self.0 * rhs.0)
    }
}

impl Neg for Decimal {
    type Output = Decimal;
    fn neg(self) -> Decimal {
        Decimal(-self.0)
    }
}
