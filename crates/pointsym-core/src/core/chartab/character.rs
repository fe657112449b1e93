use nalgebra::Complex;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Invalid character token '{0}'")]
pub struct CharacterParseError(pub String);

/// A single entry of a character table.
///
/// Finite groups have real or complex characters. The continuous classes of the linear
/// groups carry angular characters `c·cos(mφ)`, which are only evaluated for a concrete angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Character {
    Value(Complex<f64>),
    Angular { coefficient: f64, multiple: u32 },
}

/// `ε = exp(2πi/3)`.
pub fn epsilon() -> Complex<f64> {
    Complex::from_polar(1.0, 2.0 * PI / 3.0)
}

impl Character {
    pub fn real(value: f64) -> Self {
        Self::Value(Complex::new(value, 0.0))
    }

    /// The numeric value, `None` for angular characters.
    pub fn value(&self) -> Option<Complex<f64>> {
        match self {
            Self::Value(v) => Some(*v),
            Self::Angular { .. } => None,
        }
    }

    /// Evaluates the character for a rotation angle `phi` (ignored for numeric characters).
    pub fn evaluate(&self, phi: f64) -> Complex<f64> {
        match self {
            Self::Value(v) => *v,
            Self::Angular {
                coefficient,
                multiple,
            } => Complex::new(coefficient * (f64::from(*multiple) * phi).cos(), 0.0),
        }
    }

    pub fn is_angular(&self) -> bool {
        matches!(self, Self::Angular { .. })
    }
}

impl FromStr for Character {
    type Err = CharacterParseError;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        let err = || CharacterParseError(token.to_string());
        let (sign, body) = match token.strip_prefix('-') {
            Some(rest) => (-1.0, rest),
            None => (1.0, token),
        };

        if let Some(rest) = body.strip_prefix('ε') {
            let value = match rest {
                "" => epsilon(),
                "*" => epsilon().conj(),
                _ => return Err(err()),
            };
            return Ok(Self::Value(value * sign));
        }

        if let Some((coefficient, angle)) = body.split_once("cos") {
            let coefficient: f64 = if coefficient.is_empty() {
                1.0
            } else {
                coefficient.parse().map_err(|_| err())?
            };
            let multiple = angle.strip_suffix('φ').ok_or_else(err)?;
            let multiple: u32 = if multiple.is_empty() {
                1
            } else {
                multiple.parse().map_err(|_| err())?
            };
            return Ok(Self::Angular {
                coefficient: sign * coefficient,
                multiple,
            });
        }

        let value: f64 = body.parse().map_err(|_| err())?;
        Ok(Self::real(sign * value))
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) if v.im.abs() < 1e-9 => write!(f, "{}", format_real(v.re)),
            Self::Value(v) => {
                let eps = epsilon();
                let candidates = [
                    (eps, "ε"),
                    (eps.conj(), "ε*"),
                    (-eps, "-ε"),
                    (-eps.conj(), "-ε*"),
                ];
                match candidates.iter().find(|(c, _)| (c - v).norm() < 1e-9) {
                    Some((_, symbol)) => write!(f, "{symbol}"),
                    None => write!(f, "{}{:+}i", format_real(v.re), v.im),
                }
            }
            Self::Angular {
                coefficient,
                multiple,
            } => {
                let angle = if *multiple == 1 {
                    "φ".to_string()
                } else {
                    format!("{multiple}φ")
                };
                write!(f, "{}cos{angle}", format_real(*coefficient))
            }
        }
    }
}

fn format_real(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{value:.3}")
    }
}

/// Parses a whitespace separated row of characters.
pub fn parse_row(row: &str) -> Result<Vec<Character>, CharacterParseError> {
    row.split_whitespace().map(str::parse).collect()
}
