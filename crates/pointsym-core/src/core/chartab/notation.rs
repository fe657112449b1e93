//! Normalization of the user-facing names used by character tables: point-group identifiers,
//! class labels, and the basis functions listed next to each irreducible representation.

use std::fmt;
use std::str::FromStr;

/// Normalizes a point-group identifier to its catalog spelling.
///
/// Whitespace and underscores are dropped, `inf` becomes `∞`, the first letter is uppercased
/// and the rest lowercased: `c2v`, `C2V`, `Dinfh` and `d_∞_h` map to `C2v` and `D∞h`.
pub fn normalize_point_group_id(id: &str) -> String {
    let compact: String = id
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect::<String>()
        .to_lowercase()
        .replace("inf", "∞");

    let mut chars = compact.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Normalizes an operation class label for matching user input against table labels.
///
/// `sigma` becomes `σ`, subscript digits become ASCII digits, typographic primes become `'`
/// and whitespace is removed. Letter case is preserved.
pub fn normalize_class_label(label: &str) -> String {
    let mut out = String::with_capacity(label.len());
    for c in label.replace("sigma", "σ").chars() {
        match c {
            '₀'..='₉' => {
                let digit = c as u32 - '₀' as u32;
                out.push(char::from_digit(digit, 10).unwrap_or(c));
            }
            '′' | '’' | 'ʹ' => out.push('\''),
            '″' => out.push_str("''"),
            c if c.is_whitespace() => {}
            c => out.push(c),
        }
    }
    out
}

/// Drops the leading class-size multiplier of a class label (`2C3` becomes `C3`).
pub fn strip_class_multiplier(label: &str) -> &str {
    label.trim_start_matches(|c: char| c.is_ascii_digit() || c == '∞')
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A linear basis function attached to an irreducible representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BasisFunction {
    /// `x`, `y`, `z`: transforms as a translation and marks the irrep IR-active.
    Translation(Axis),
    /// `Rx`, `Ry`, `Rz`: transforms as a rotation.
    Rotation(Axis),
}

impl FromStr for BasisFunction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "x" => Ok(Self::Translation(Axis::X)),
            "y" => Ok(Self::Translation(Axis::Y)),
            "z" => Ok(Self::Translation(Axis::Z)),
            "Rx" => Ok(Self::Rotation(Axis::X)),
            "Ry" => Ok(Self::Rotation(Axis::Y)),
            "Rz" => Ok(Self::Rotation(Axis::Z)),
            other => Err(other.to_string()),
        }
    }
}

impl fmt::Display for BasisFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (prefix, axis) = match self {
            Self::Translation(axis) => ("", axis),
            Self::Rotation(axis) => ("R", axis),
        };
        let axis = match axis {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        };
        write!(f, "{prefix}{axis}")
    }
}
