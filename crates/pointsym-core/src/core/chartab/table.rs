use super::catalog::CatalogError;
use super::character::Character;
use super::notation::{Axis, BasisFunction};
use crate::core::models::operation::{OperationClass, OperationSummary, SymmetryOperation};
use itertools::Itertools;
use nalgebra::Complex;
use serde::Serialize;

/// An irreducible representation: one row of a character table.
#[derive(Debug, Clone, PartialEq)]
pub struct Irrep {
    pub label: String,
    /// One character per class, in table column order.
    pub characters: Vec<Character>,
    /// Linear basis functions (`x`, `y`, `z`, `Rx`, `Ry`, `Rz`).
    pub linear: Vec<BasisFunction>,
    /// Quadratic basis functions (`x²`, `xy`, ...). Non-empty means Raman-active.
    pub quadratic: Vec<String>,
    /// Label under which a separably-degenerate complex pair is reported (`¹E`, `²E` → `E`).
    pub pair: Option<String>,
}

impl Irrep {
    /// Dimension, read from the identity-class character.
    pub fn dimension(&self) -> usize {
        self.characters
            .first()
            .and_then(Character::value)
            .map_or(0, |v| v.re.round().max(0.0) as usize)
    }

    /// The label under which this irrep is reported after folding complex pairs.
    pub fn folded_label(&self) -> &str {
        self.pair.as_deref().unwrap_or(&self.label)
    }

    pub fn is_ir_active(&self) -> bool {
        self.linear
            .iter()
            .any(|b| matches!(b, BasisFunction::Translation(_)))
    }

    pub fn is_raman_active(&self) -> bool {
        !self.quadratic.is_empty()
    }

    /// Number of translational basis functions listed for this irrep.
    pub fn translation_functions(&self) -> usize {
        self.linear
            .iter()
            .filter(|b| matches!(b, BasisFunction::Translation(_)))
            .count()
    }

    /// Number of rotational basis functions listed for this irrep. A linear molecule has no
    /// rotation about its own axis, so `Rz` is not counted for it.
    pub fn rotation_functions(&self, linear_molecule: bool) -> usize {
        self.linear
            .iter()
            .filter(|b| match b {
                BasisFunction::Rotation(Axis::Z) => !linear_molecule,
                BasisFunction::Rotation(_) => true,
                BasisFunction::Translation(_) => false,
            })
            .count()
    }
}

/// Correlation of a linear-group irrep onto irreps of its descent subgroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Correlation {
    pub irrep: String,
    pub components: Vec<String>,
}

/// The finite subgroup in which the representations of a linear group are reduced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Descent {
    pub subgroup: String,
    pub correlation: Vec<Correlation>,
}

/// Display-ready summary of a character table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterTableData {
    pub point_group: String,
    /// The group order, or `"∞"` for the linear groups.
    pub order: String,
    pub operations: Vec<OperationSummary>,
    pub irreps: Vec<String>,
}

/// The character table of a point group with its operations in standard orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacterTable {
    pub id: String,
    pub classes: Vec<OperationClass>,
    pub irreps: Vec<Irrep>,
    pub descent: Option<Descent>,
}

impl CharacterTable {
    /// Group order `h`, `None` for the infinite linear groups.
    pub fn order(&self) -> Option<usize> {
        self.classes.iter().map(OperationClass::size).sum()
    }

    pub fn is_linear(&self) -> bool {
        self.order().is_none()
    }

    pub fn is_centrosymmetric(&self) -> bool {
        self.classes.iter().any(OperationClass::contains_inversion)
    }

    pub fn class_index(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c.label == label)
    }

    pub fn irrep(&self, label: &str) -> Option<&Irrep> {
        self.irreps.iter().find(|i| i.label == label)
    }

    /// The first irrep reported under `label`, the pair label of complex pairs included.
    pub fn folded_irrep(&self, label: &str) -> Option<&Irrep> {
        self.irreps.iter().find(|i| i.folded_label() == label)
    }

    /// Combined dimension of the irreps reported under `label`.
    pub fn folded_dimension(&self, label: &str) -> usize {
        self.irreps
            .iter()
            .filter(|i| i.folded_label() == label)
            .map(Irrep::dimension)
            .sum()
    }

    /// Irrep labels after folding complex pairs, in table order.
    pub fn folded_labels(&self) -> Vec<&str> {
        self.irreps.iter().map(Irrep::folded_label).unique().collect()
    }

    pub fn operations(&self) -> impl Iterator<Item = &SymmetryOperation> {
        self.classes.iter().flat_map(|c| c.operations.iter())
    }

    pub fn summary(&self) -> CharacterTableData {
        CharacterTableData {
            point_group: self.id.clone(),
            order: self
                .order()
                .map_or_else(|| "∞".to_string(), |h| h.to_string()),
            operations: self.classes.iter().map(OperationClass::summary).collect(),
            irreps: self.irreps.iter().map(|i| i.label.clone()).collect(),
        }
    }

    /// Checks the internal consistency of the table.
    ///
    /// Every table must start with the identity class, list one character per class and
    /// have integral identity characters. Finite tables must in addition be square, satisfy
    /// `Σ dim² = h` and the orthogonality relations, have a group-closed operation list and
    /// respect mutual exclusion when centrosymmetric. Linear tables must carry a descent.
    pub fn validate(&self, tolerance: f64) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::Invalid {
            table: self.id.clone(),
            reason,
        };

        match self.classes.first() {
            Some(first) if first.operations == [SymmetryOperation::Identity] => {}
            _ => return Err(invalid("first class must be the identity".to_string())),
        }

        for irrep in &self.irreps {
            if irrep.characters.len() != self.classes.len() {
                return Err(invalid(format!(
                    "irrep {} has {} characters for {} classes",
                    irrep.label,
                    irrep.characters.len(),
                    self.classes.len()
                )));
            }
            let identity = irrep.characters[0].value().unwrap_or(Complex::new(-1.0, 0.0));
            let integral = identity.im.abs() < tolerance
                && identity.re >= 1.0
                && (identity.re - identity.re.round()).abs() < tolerance;
            if !integral {
                return Err(invalid(format!(
                    "irrep {} has a non-integral identity character",
                    irrep.label
                )));
            }
            let dimension = self.folded_dimension(irrep.folded_label());
            if irrep.translation_functions() % dimension != 0
                || irrep.rotation_functions(false) % dimension != 0
            {
                return Err(invalid(format!(
                    "irrep {} lists basis functions that do not fill whole copies",
                    irrep.label
                )));
            }
        }

        self.validate_pairs(tolerance).map_err(invalid)?;

        let Some(order) = self.order() else {
            return match self.descent {
                Some(_) => Ok(()),
                None => Err(invalid("linear group without descent subgroup".to_string())),
            };
        };

        if self.irreps.len() != self.classes.len() {
            return Err(invalid(format!(
                "{} irreps for {} classes",
                self.irreps.len(),
                self.classes.len()
            )));
        }
        if self
            .irreps
            .iter()
            .flat_map(|i| i.characters.iter())
            .any(Character::is_angular)
        {
            return Err(invalid("angular character in a finite group".to_string()));
        }

        let dimension_squares: usize = self.irreps.iter().map(|i| i.dimension().pow(2)).sum();
        if dimension_squares != order {
            return Err(invalid(format!(
                "sum of squared dimensions is {dimension_squares}, expected order {order}"
            )));
        }

        let h = order as f64;
        for (i, a) in self.irreps.iter().enumerate() {
            for (j, b) in self.irreps.iter().enumerate().skip(i) {
                let product = self.weighted_inner_product(a, b);
                let expected = if i == j { h } else { 0.0 };
                if (product - Complex::new(expected, 0.0)).norm() > tolerance * h {
                    return Err(invalid(format!(
                        "irreps {} and {} violate orthogonality",
                        a.label, b.label
                    )));
                }
            }
        }

        let matrices: Vec<_> = self.operations().map(SymmetryOperation::matrix).collect();
        for (a, b) in matrices.iter().cartesian_product(matrices.iter()) {
            let product = a * b;
            if !matrices.iter().any(|m| (m - product).norm() < tolerance) {
                return Err(invalid("operations are not closed under composition".to_string()));
            }
        }

        if self.is_centrosymmetric() {
            if let Some(irrep) = self
                .irreps
                .iter()
                .find(|i| i.is_ir_active() && i.is_raman_active())
            {
                return Err(invalid(format!(
                    "irrep {} is IR and Raman active in a centrosymmetric group",
                    irrep.label
                )));
            }
        }

        Ok(())
    }

    fn weighted_inner_product(&self, a: &Irrep, b: &Irrep) -> Complex<f64> {
        self.classes
            .iter()
            .zip(a.characters.iter().zip(&b.characters))
            .map(|(class, (x, y))| {
                let size = class.size().unwrap_or(0) as f64;
                x.evaluate(0.0) * y.evaluate(0.0).conj() * size
            })
            .sum()
    }

    fn validate_pairs(&self, tolerance: f64) -> Result<(), String> {
        let paired = self.irreps.iter().filter(|i| i.pair.is_some());
        for (label, members) in &paired.chunk_by(|i| i.folded_label().to_string()) {
            let members: Vec<&Irrep> = members.collect();
            let [first, second] = members.as_slice() else {
                return Err(format!("pair {label} must have exactly two members"));
            };
            let conjugate = first
                .characters
                .iter()
                .zip(&second.characters)
                .all(|(x, y)| (x.evaluate(0.0) - y.evaluate(0.0).conj()).norm() < tolerance);
            if !conjugate {
                return Err(format!(
                    "pair {label} members {} and {} are not complex conjugates",
                    first.label, second.label
                ));
            }
        }
        Ok(())
    }
}
