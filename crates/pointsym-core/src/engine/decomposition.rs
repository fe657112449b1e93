use super::error::AnalysisError;
use super::reducible::ReducibleRepresentation;
use crate::core::chartab::catalog::catalog;
use crate::core::chartab::table::{CharacterTable, Descent};
use nalgebra::Complex;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, instrument};

/// One irreducible component of a decomposed representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IrrepComponent {
    pub label: String,
    pub multiplicity: usize,
    /// Dimension of the irrep; a folded complex pair counts as one irrep of dimension 2.
    pub dimension: usize,
}

/// A representation written as a sum of irreducible representations, in table order.
///
/// Every irrep of the table is listed, including those with zero multiplicity.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Decomposition {
    pub components: Vec<IrrepComponent>,
}

impl Decomposition {
    pub fn multiplicity(&self, label: &str) -> usize {
        self.components
            .iter()
            .find(|c| c.label == label)
            .map_or(0, |c| c.multiplicity)
    }

    /// Components with non-zero multiplicity.
    pub fn present(&self) -> impl Iterator<Item = &IrrepComponent> {
        self.components.iter().filter(|c| c.multiplicity > 0)
    }

    /// Total dimension `Σ nᵢ dᵢ`.
    pub fn total_dimension(&self) -> usize {
        self.components
            .iter()
            .map(|c| c.multiplicity * c.dimension)
            .sum()
    }

    /// Number of irreducible species `Σ nᵢ`.
    pub fn species_count(&self) -> usize {
        self.components.iter().map(|c| c.multiplicity).sum()
    }

    /// Subtracts `other` component-wise. A negative remainder is an inconsistency.
    pub fn checked_sub(&self, other: &Decomposition) -> Result<Decomposition, AnalysisError> {
        let components = self
            .components
            .iter()
            .map(|c| {
                let removed = other.multiplicity(&c.label);
                c.multiplicity
                    .checked_sub(removed)
                    .map(|multiplicity| IrrepComponent {
                        multiplicity,
                        ..c.clone()
                    })
                    .ok_or_else(|| AnalysisError::DecompositionInconsistency {
                        irrep: c.label.clone(),
                        value: c.multiplicity as f64 - removed as f64,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Decomposition { components })
    }
}

impl fmt::Display for Decomposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut any = false;
        for c in self.present() {
            if any {
                write!(f, " + ")?;
            }
            any = true;
            match c.multiplicity {
                1 => write!(f, "{}", c.label)?,
                n => write!(f, "{n}{}", c.label)?,
            }
        }
        if !any {
            write!(f, "0")?;
        }
        Ok(())
    }
}

/// Reduces a representation into irreducible components of `table`.
///
/// Uses `nᵢ = (1/h) Σ_c g_c χ(c) χᵢ(c)*` over the classes of `table`, or of its descent
/// subgroup for the linear groups; the subgroup result is then correlated back onto the
/// linear irreps. Each `nᵢ` must be real and within `tolerance` of a non-negative integer,
/// and members of a complex pair must have equal multiplicities before they are folded.
#[instrument(skip_all, name = "decomposition", fields(point_group = %table.id))]
pub fn decompose(
    reducible: &ReducibleRepresentation,
    table: &CharacterTable,
    tolerance: f64,
) -> Result<Decomposition, AnalysisError> {
    let reduction = catalog()
        .reduction_table(table)
        .ok_or_else(|| AnalysisError::UnsupportedPointGroup {
            id: table
                .descent
                .as_ref()
                .map_or_else(|| table.id.clone(), |d| d.subgroup.clone()),
        })?;
    let counts = reduce(reducible, reduction, tolerance)?;

    let counts = match &table.descent {
        Some(descent) => correlate(counts, descent)?,
        None => counts,
    };
    debug!(?counts, "Reduction formula evaluated.");
    fold(&counts, table)
}

/// Evaluates the reduction formula over a finite table.
fn reduce(
    reducible: &ReducibleRepresentation,
    table: &CharacterTable,
    tolerance: f64,
) -> Result<Vec<(String, usize)>, AnalysisError> {
    let mismatch = || AnalysisError::RepresentationMismatch {
        point_group: table.id.clone(),
    };
    let order = table.order().ok_or_else(mismatch)?;
    let same_classes = reducible.traces.len() == table.classes.len()
        && reducible
            .traces
            .iter()
            .zip(&table.classes)
            .all(|(t, c)| t.label == c.label && Some(t.size) == c.size());
    if !same_classes {
        return Err(mismatch());
    }

    let h = order as f64;
    table
        .irreps
        .iter()
        .map(|irrep| {
            let n: Complex<f64> = reducible
                .traces
                .iter()
                .zip(&irrep.characters)
                .map(|(t, chi)| chi.evaluate(0.0).conj() * (t.size as f64 * t.character))
                .sum::<Complex<f64>>()
                / h;
            let rounded = n.re.round();
            if n.im.abs() > tolerance || (n.re - rounded).abs() > tolerance || rounded < 0.0 {
                return Err(AnalysisError::DecompositionInconsistency {
                    irrep: irrep.label.clone(),
                    value: n.re,
                });
            }
            Ok((irrep.label.clone(), rounded as usize))
        })
        .collect()
}

/// Maps subgroup multiplicities back onto the irreps of a linear group.
///
/// Non-degenerate (Σ) correlations are assigned first, then the degenerate ones in table
/// order; every component of a degenerate correlation must have the same remaining count.
fn correlate(
    counts: Vec<(String, usize)>,
    descent: &Descent,
) -> Result<Vec<(String, usize)>, AnalysisError> {
    let mut remaining: HashMap<String, usize> = counts.into_iter().collect();

    let mut ordered: Vec<_> = descent.correlation.iter().collect();
    ordered.sort_by_key(|c| c.components.len());

    let mut assigned = HashMap::new();
    for correlation in ordered {
        let available: Vec<usize> = correlation
            .components
            .iter()
            .map(|c| remaining.get(c).copied().unwrap_or(0))
            .collect();
        let multiplicity = available.iter().copied().min().unwrap_or(0);
        if available.iter().any(|&a| a != multiplicity) {
            return Err(AnalysisError::DecompositionInconsistency {
                irrep: correlation.irrep.clone(),
                value: available.iter().sum::<usize>() as f64 / available.len() as f64,
            });
        }
        for component in &correlation.components {
            if let Some(count) = remaining.get_mut(component) {
                *count -= multiplicity;
            }
        }
        assigned.insert(correlation.irrep.clone(), multiplicity);
    }

    if let Some((label, &count)) = remaining.iter().find(|(_, c)| **c > 0) {
        return Err(AnalysisError::DecompositionInconsistency {
            irrep: label.clone(),
            value: count as f64,
        });
    }

    Ok(descent
        .correlation
        .iter()
        .map(|c| (c.irrep.clone(), assigned.get(&c.irrep).copied().unwrap_or(0)))
        .collect())
}

/// Folds complex pairs and attaches dimensions, in the order of `table`.
fn fold(counts: &[(String, usize)], table: &CharacterTable) -> Result<Decomposition, AnalysisError> {
    let count_of = |label: &str| {
        counts
            .iter()
            .find(|(l, _)| l == label)
            .map_or(0, |(_, n)| *n)
    };

    let mut components = Vec::new();
    for label in table.folded_labels() {
        let members: Vec<usize> = table
            .irreps
            .iter()
            .filter(|i| i.folded_label() == label)
            .map(|i| count_of(&i.label))
            .collect();
        let multiplicity = members.first().copied().unwrap_or(0);
        if members.iter().any(|&m| m != multiplicity) {
            return Err(AnalysisError::DecompositionInconsistency {
                irrep: label.to_string(),
                value: members.iter().sum::<usize>() as f64 / members.len() as f64,
            });
        }
        components.push(IrrepComponent {
            label: label.to_string(),
            multiplicity,
            dimension: table.folded_dimension(label),
        });
    }
    Ok(Decomposition { components })
}

/// The irreps spanned by rigid-body motion: translations (`x`, `y`, `z`) and rotations
/// (`Rx`, `Ry`, `Rz`, without `Rz` for a linear molecule).
pub fn rigid_body(table: &CharacterTable, linear_molecule: bool) -> Decomposition {
    let components = table
        .folded_labels()
        .into_iter()
        .filter_map(|label| {
            let irrep = table.folded_irrep(label)?;
            let dimension = table.folded_dimension(label);
            let functions =
                irrep.translation_functions() + irrep.rotation_functions(linear_molecule);
            Some(IrrepComponent {
                label: label.to_string(),
                multiplicity: functions / dimension.max(1),
                dimension,
            })
        })
        .collect();
    Decomposition { components }
}

/// Removes the translational and rotational components from Γ3N.
pub fn vibrational(
    full: &Decomposition,
    table: &CharacterTable,
    linear_molecule: bool,
) -> Result<Decomposition, AnalysisError> {
    full.checked_sub(&rigid_body(table, linear_molecule))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::reducible::ClassTrace;

    fn gamma(table: &CharacterTable, characters: &[f64]) -> ReducibleRepresentation {
        ReducibleRepresentation {
            traces: table
                .classes
                .iter()
                .zip(characters)
                .map(|(c, &character)| ClassTrace {
                    label: c.label.clone(),
                    size: c.operations.len(),
                    unmoved_atoms: 0,
                    character,
                })
                .collect(),
        }
    }

    #[test]
    fn water_gamma_3n_reduces_to_known_components() {
        let c2v = catalog().get("C2v").unwrap();
        let full = decompose(&gamma(c2v, &[9.0, -1.0, 1.0, 3.0]), c2v, 1e-6).unwrap();
        assert_eq!(full.to_string(), "3A1 + A2 + 2B1 + 3B2");
        assert_eq!(full.total_dimension(), 9);

        let vib = vibrational(&full, c2v, false).unwrap();
        assert_eq!(vib.to_string(), "2A1 + B2");
        assert_eq!(vib.total_dimension(), 3);
    }

    #[test]
    fn rigid_body_modes_of_nonlinear_molecule_span_six() {
        for table in catalog().tables().iter().filter(|t| !t.is_linear()) {
            assert_eq!(rigid_body(table, false).total_dimension(), 6, "{}", table.id);
        }
    }

    #[test]
    fn rigid_body_modes_of_linear_molecule_span_five() {
        for id in ["C∞v", "D∞h"] {
            let table = catalog().get(id).unwrap();
            assert_eq!(rigid_body(table, true).total_dimension(), 5, "{id}");
        }
    }

    #[test]
    fn non_integral_multiplicity_is_an_error() {
        let c2v = catalog().get("C2v").unwrap();
        let err = decompose(&gamma(c2v, &[9.0, -1.0, 1.0, 2.0]), c2v, 1e-6).unwrap_err();
        assert!(matches!(err, AnalysisError::DecompositionInconsistency { .. }));
    }

    #[test]
    fn negative_multiplicity_is_an_error() {
        let c2v = catalog().get("C2v").unwrap();
        let err = decompose(&gamma(c2v, &[1.0, -3.0, 1.0, 1.0]), c2v, 1e-6).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DecompositionInconsistency { value, .. } if value < 0.0
        ));
    }

    #[test]
    fn mismatched_classes_are_rejected() {
        let c2v = catalog().get("C2v").unwrap();
        let c3v = catalog().get("C3v").unwrap();
        let err = decompose(&gamma(c3v, &[12.0, 0.0, 2.0]), c2v, 1e-6).unwrap_err();
        assert!(matches!(err, AnalysisError::RepresentationMismatch { .. }));
    }

    #[test]
    fn complex_pair_is_folded() {
        let c3 = catalog().get("C3").unwrap();
        // Regular representation: every irrep once.
        let full = decompose(&gamma(c3, &[3.0, 0.0, 0.0]), c3, 1e-6).unwrap();
        assert_eq!(full.to_string(), "A + E");
        assert_eq!(full.multiplicity("E"), 1);
        assert_eq!(full.total_dimension(), 3);
    }

    #[test]
    fn carbon_dioxide_is_correlated_from_d2h() {
        let d2h = catalog().get("D2h").unwrap();
        let dinfh = catalog().get("D∞h").unwrap();
        // CO2 along z: E, C2(z), C2(y), C2(x), i, σ(xy), σ(xz), σ(yz)
        let full = decompose(
            &gamma(d2h, &[9.0, -3.0, -1.0, -1.0, -3.0, 1.0, 3.0, 3.0]),
            dinfh,
            1e-6,
        )
        .unwrap();
        assert_eq!(full.to_string(), "Σg+ + Πg + 2Σu+ + 2Πu");

        let vib = vibrational(&full, dinfh, true).unwrap();
        assert_eq!(vib.to_string(), "Σg+ + Σu+ + Πu");
        assert_eq!(vib.total_dimension(), 4);
    }

    #[test]
    fn unequal_pi_components_are_inconsistent() {
        let d2h = catalog().get("D2h").unwrap();
        let dinfh = catalog().get("D∞h").unwrap();
        // A single B2u with no matching B3u.
        let err = decompose(
            &gamma(d2h, &[1.0, -1.0, 1.0, -1.0, -1.0, 1.0, -1.0, 1.0]),
            dinfh,
            1e-6,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::DecompositionInconsistency { ref irrep, .. } if irrep == "Πu"
        ));
    }

    #[test]
    fn checked_sub_rejects_negative_remainder() {
        let c2v = catalog().get("C2v").unwrap();
        let full = decompose(&gamma(c2v, &[3.0, 3.0, 3.0, 3.0]), c2v, 1e-6).unwrap();
        assert_eq!(full.to_string(), "3A1");
        let err = vibrational(&full, c2v, false).unwrap_err();
        assert!(matches!(err, AnalysisError::DecompositionInconsistency { .. }));
    }

    #[test]
    fn empty_decomposition_displays_as_zero() {
        assert_eq!(Decomposition::default().to_string(), "0");
    }
}
