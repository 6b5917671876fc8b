// src/noyau/valeur.rs
//
// Domaine numérique du noyau.
// - Exacte : rationnel arbitraire (aucune perte sur + - * / %)
// - Indefinie : résultat d'une opération approchée sortie du domaine
//   (NaN ou infini flottant, ex: sqrt(-4), 0^(-1))
//
// IMPORTANT: Indefinie n'est PAS une erreur d'évaluation. Elle se propage
// par absorption à travers toutes les opérations; seules division/modulo
// par zéro et variable inconnue sont des erreurs (voir erreurs.rs).

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::{One, ToPrimitive, Zero};

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Valeur {
    Exacte(BigRational),
    Indefinie,
}

impl Valeur {
    pub fn zero() -> Valeur {
        Valeur::Exacte(BigRational::zero())
    }

    pub fn entiere(n: i64) -> Valeur {
        Valeur::Exacte(BigRational::from_integer(BigInt::from(n)))
    }

    /// Constante e, approchée en double puis relevée en rationnel.
    pub fn e() -> Valeur {
        Valeur::depuis_flottant(std::f64::consts::E)
    }

    /// Constante π, approchée en double puis relevée en rationnel.
    pub fn pi() -> Valeur {
        Valeur::depuis_flottant(std::f64::consts::PI)
    }

    /// Construit depuis un numéral décimal ("12", "12.5").
    ///
    /// Les deux moitiés doivent être des suites de chiffres ASCII; tout
    /// autre texte retourne None (l'analyseur garantit déjà la forme, le
    /// contrôle ici évite de dépendre de cette garantie).
    pub fn depuis_texte(texte: &str) -> Option<Valeur> {
        fn chiffres(part: &str) -> bool {
            !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
        }

        match texte.split_once('.') {
            None => {
                if !chiffres(texte) {
                    return None;
                }
                let n = BigInt::parse_bytes(texte.as_bytes(), 10)?;
                Some(Valeur::Exacte(BigRational::from_integer(n)))
            }
            Some((entier, frac)) => {
                if !chiffres(entier) || !chiffres(frac) {
                    return None;
                }
                let e = BigInt::parse_bytes(entier.as_bytes(), 10)?;
                let f = BigInt::parse_bytes(frac.as_bytes(), 10)?;
                let echelle = BigInt::from(10).pow(frac.len() as u32);
                Some(Valeur::Exacte(BigRational::new(e * &echelle + f, echelle)))
            }
        }
    }

    /// Test d'égalité au zéro du domaine (Indefinie n'est pas nulle).
    pub fn est_nulle(&self) -> bool {
        match self {
            Valeur::Exacte(r) => r.is_zero(),
            Valeur::Indefinie => false,
        }
    }

    pub fn ajouter(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a + b),
            _ => Valeur::Indefinie,
        }
    }

    pub fn soustraire(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a - b),
            _ => Valeur::Indefinie,
        }
    }

    pub fn multiplier(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a * b),
            _ => Valeur::Indefinie,
        }
    }

    /// Quotient exact. Contrat: l'appelant a refusé un diviseur nul.
    pub fn diviser(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a / b),
            _ => Valeur::Indefinie,
        }
    }

    /// Reste exact (signe du dividende). Contrat: diviseur non nul.
    pub fn modulo(&self, autre: &Valeur) -> Valeur {
        match (self, autre) {
            (Valeur::Exacte(a), Valeur::Exacte(b)) => Valeur::Exacte(a % b),
            _ => Valeur::Indefinie,
        }
    }

    pub fn opposee(&self) -> Valeur {
        match self {
            Valeur::Exacte(a) => Valeur::Exacte(-a.clone()),
            Valeur::Indefinie => Valeur::Indefinie,
        }
    }

    /// Approximation flottante (avec perte). Indefinie devient NaN.
    pub fn en_flottant(&self) -> f64 {
        match self {
            Valeur::Exacte(r) => r.to_f64().unwrap_or(f64::NAN),
            Valeur::Indefinie => f64::NAN,
        }
    }

    /// Relève un flottant en rationnel exact; NaN et infinis donnent Indefinie.
    pub fn depuis_flottant(f: f64) -> Valeur {
        if !f.is_finite() {
            return Valeur::Indefinie;
        }
        match BigRational::from_float(f) {
            Some(r) => Valeur::Exacte(r),
            None => Valeur::Indefinie,
        }
    }
}

impl fmt::Display for Valeur {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Valeur::Exacte(r) => {
                let n = r.numer();
                let d = r.denom();
                if d.is_one() {
                    write!(f, "{n}")
                } else {
                    write!(f, "{n}/{d}")
                }
            }
            Valeur::Indefinie => write!(f, "indéfini"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Valeur;

    #[test]
    fn numeral_entier_et_decimal() {
        assert_eq!(Valeur::depuis_texte("12"), Some(Valeur::entiere(12)));

        let douze_et_demi = Valeur::entiere(25).diviser(&Valeur::entiere(2));
        assert_eq!(Valeur::depuis_texte("12.5"), Some(douze_et_demi));

        assert_eq!(Valeur::depuis_texte("0.25").map(|v| v.en_flottant()), Some(0.25));
    }

    #[test]
    fn numeral_invalide() {
        assert_eq!(Valeur::depuis_texte(""), None);
        assert_eq!(Valeur::depuis_texte("12."), None);
        assert_eq!(Valeur::depuis_texte(".5"), None);
        assert_eq!(Valeur::depuis_texte("1.2.3"), None);
        assert_eq!(Valeur::depuis_texte("-3"), None);
        assert_eq!(Valeur::depuis_texte("1x"), None);
    }

    #[test]
    fn modulo_exact() {
        let sept = Valeur::entiere(7);
        let trois = Valeur::entiere(3);
        assert_eq!(sept.modulo(&trois), Valeur::entiere(1));

        // 15/2 mod 2 = 3/2 (reste du côté du dividende)
        let quinze_demis = Valeur::depuis_texte("7.5").unwrap();
        let attendu = Valeur::depuis_texte("1.5").unwrap();
        assert_eq!(quinze_demis.modulo(&Valeur::entiere(2)), attendu);
    }

    #[test]
    fn indefinie_absorbante() {
        let un = Valeur::entiere(1);
        assert_eq!(un.ajouter(&Valeur::Indefinie), Valeur::Indefinie);
        assert_eq!(Valeur::Indefinie.multiplier(&un), Valeur::Indefinie);
        assert_eq!(Valeur::Indefinie.opposee(), Valeur::Indefinie);
        assert!(!Valeur::Indefinie.est_nulle());
    }

    #[test]
    fn pont_flottant() {
        assert_eq!(Valeur::depuis_flottant(f64::NAN), Valeur::Indefinie);
        assert_eq!(Valeur::depuis_flottant(f64::INFINITY), Valeur::Indefinie);
        assert_eq!(Valeur::depuis_flottant(0.5), Valeur::depuis_texte("0.5").unwrap());
        assert!(Valeur::Indefinie.en_flottant().is_nan());
    }

    #[test]
    fn affichage() {
        assert_eq!(Valeur::entiere(3).to_string(), "3");
        assert_eq!(Valeur::depuis_texte("0.5").unwrap().to_string(), "1/2");
        assert_eq!(Valeur::Indefinie.to_string(), "indéfini");
    }
}
