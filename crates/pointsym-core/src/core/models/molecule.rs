use super::atom::Atom;
use nalgebra::{Point3, Vector3};
use std::collections::BTreeMap;
use thiserror::Error;

/// Default distance (Angstroms) within which atoms are considered to lie on a common line.
pub const DEFAULT_LINEARITY_TOLERANCE: f64 = 1e-3;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MoleculeError {
    #[error("Molecule '{name}' has {count} atom(s); at least 2 are required to vibrate")]
    TooFewAtoms { name: String, count: usize },

    #[error("Atom {index} of molecule '{name}' has unknown element '{element}' and no isotope mass")]
    UnknownElement {
        name: String,
        index: usize,
        element: String,
    },

    #[error("Atom {index} of molecule '{name}' has a non-finite position or mass")]
    NonFinite { name: String, index: usize },

    #[error("Molecule '{name}' has linear = {flagged_linear}, which contradicts its geometry")]
    LinearityMismatch { name: String, flagged_linear: bool },
}

/// An immutable, validated molecule.
///
/// A `Molecule` can only be obtained through [`MoleculeBuilder`], which guarantees that:
///
/// - it has at least two atoms, so the vibrational degree-of-freedom count is never negative;
/// - every atom has a known mass (standard weight or explicit isotope mass);
/// - the `linear` flag agrees with the geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    name: String,
    formula: String,
    atoms: Vec<Atom>,
    linear: bool,
    point_group: Option<String>,
}

impl Molecule {
    /// Starts building a molecule with the given display name.
    pub fn builder(name: &str) -> MoleculeBuilder {
        MoleculeBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn formula(&self) -> &str {
        &self.formula
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_linear(&self) -> bool {
        self.linear
    }

    /// The explicit point-group identifier supplied with the molecule, if any.
    pub fn point_group_override(&self) -> Option<&str> {
        self.point_group.as_deref()
    }

    /// Number of vibrational degrees of freedom: `3N - 5` for linear, `3N - 6` otherwise.
    pub fn vibrational_degrees_of_freedom(&self) -> usize {
        let cartesian = 3 * self.atoms.len();
        if self.linear {
            cartesian - 5
        } else {
            cartesian - 6
        }
    }

    /// Mass-weighted center of the molecule.
    pub fn center_of_mass(&self) -> Point3<f64> {
        let mut total_mass = 0.0;
        let mut weighted = Vector3::zeros();
        for atom in &self.atoms {
            // Masses were checked when the molecule was built.
            let mass = atom.mass().unwrap_or(0.0);
            total_mass += mass;
            weighted += atom.position.coords * mass;
        }
        Point3::from(weighted / total_mass)
    }

    /// Atom positions relative to the center of mass, in atom order.
    pub fn centered_positions(&self) -> Vec<Vector3<f64>> {
        let center = self.center_of_mass();
        self.atoms.iter().map(|a| a.position - center).collect()
    }

    /// Returns a copy of this molecule with a different point-group override.
    pub fn with_point_group(&self, point_group: Option<&str>) -> Molecule {
        Molecule {
            point_group: point_group.map(str::to_string),
            ..self.clone()
        }
    }
}

/// Builder for [`Molecule`] performing all input validation in [`MoleculeBuilder::build`].
#[derive(Debug, Clone, Default)]
pub struct MoleculeBuilder {
    name: String,
    formula: Option<String>,
    atoms: Vec<Atom>,
    linear: Option<bool>,
    point_group: Option<String>,
    tolerance: Option<f64>,
}

impl MoleculeBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn formula(mut self, formula: &str) -> Self {
        self.formula = Some(formula.to_string());
        self
    }
    pub fn atom(mut self, atom: Atom) -> Self {
        self.atoms.push(atom);
        self
    }
    pub fn atoms(mut self, atoms: impl IntoIterator<Item = Atom>) -> Self {
        self.atoms.extend(atoms);
        self
    }
    /// Declares the molecule linear or non-linear. When omitted, linearity is inferred.
    pub fn linear(mut self, linear: bool) -> Self {
        self.linear = Some(linear);
        self
    }
    pub fn point_group(mut self, point_group: &str) -> Self {
        self.point_group = Some(point_group.to_string());
        self
    }
    /// Distance tolerance for the collinearity test, in Angstroms.
    pub fn tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    pub fn build(self) -> Result<Molecule, MoleculeError> {
        if self.atoms.len() < 2 {
            return Err(MoleculeError::TooFewAtoms {
                name: self.name,
                count: self.atoms.len(),
            });
        }

        for (index, atom) in self.atoms.iter().enumerate() {
            let Some(mass) = atom.mass() else {
                return Err(MoleculeError::UnknownElement {
                    name: self.name,
                    index,
                    element: atom.element.clone(),
                });
            };
            let finite = mass.is_finite()
                && mass > 0.0
                && atom.position.coords.iter().all(|c| c.is_finite());
            if !finite {
                return Err(MoleculeError::NonFinite {
                    name: self.name,
                    index,
                });
            }
        }

        let tolerance = self.tolerance.unwrap_or(DEFAULT_LINEARITY_TOLERANCE);
        let collinear = is_collinear(&self.atoms, tolerance);
        let linear = match self.linear {
            Some(flag) if flag != collinear => {
                return Err(MoleculeError::LinearityMismatch {
                    name: self.name,
                    flagged_linear: flag,
                });
            }
            Some(flag) => flag,
            None => collinear,
        };

        let formula = self.formula.unwrap_or_else(|| hill_formula(&self.atoms));

        Ok(Molecule {
            name: self.name,
            formula,
            atoms: self.atoms,
            linear,
            point_group: self.point_group,
        })
    }
}

fn is_collinear(atoms: &[Atom], tolerance: f64) -> bool {
    let origin = atoms[0].position;
    let Some(far) = atoms
        .iter()
        .map(|a| a.position - origin)
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))
    else {
        return true;
    };
    if far.norm() < tolerance {
        return true;
    }
    let direction = far.normalize();
    atoms.iter().all(|a| {
        let offset = a.position - origin;
        (offset - direction * offset.dot(&direction)).norm() < tolerance
    })
}

/// Builds a formula in Hill order: carbon, then hydrogen, then the rest alphabetically.
/// Without carbon every element is alphabetical.
pub fn hill_formula(atoms: &[Atom]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for atom in atoms {
        *counts.entry(atom.element.as_str()).or_default() += 1;
    }

    let mut order: Vec<&str> = Vec::with_capacity(counts.len());
    if counts.contains_key("C") {
        order.push("C");
        if counts.contains_key("H") {
            order.push("H");
        }
    }
    let rest: Vec<&str> = counts
        .keys()
        .copied()
        .filter(|e| !order.contains(e))
        .collect();
    order.extend(rest);

    order
        .into_iter()
        .map(|element| match counts[element] {
            1 => element.to_string(),
            n => format!("{element}{n}"),
        })
        .collect()
}
