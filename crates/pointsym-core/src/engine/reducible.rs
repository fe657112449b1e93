use super::error::AnalysisError;
use crate::core::geometry::alignment::atom_permutation;
use crate::core::models::molecule::Molecule;
use crate::core::models::operation::{OperationClass, SymmetryOperation};
use nalgebra::DMatrix;
use serde::Serialize;
use std::fmt;
use tracing::{debug, instrument};

/// Character of the 3N Cartesian representation for one operation class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassTrace {
    pub label: String,
    pub size: usize,
    pub unmoved_atoms: usize,
    pub character: f64,
}

/// The reducible representation Γ3N spanned by the Cartesian displacements of all atoms.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ReducibleRepresentation {
    pub traces: Vec<ClassTrace>,
}

impl ReducibleRepresentation {
    pub fn characters(&self) -> impl Iterator<Item = f64> + '_ {
        self.traces.iter().map(|t| t.character)
    }

    /// Dimension of the representation: the identity-class character, `3N`.
    pub fn dimension(&self) -> f64 {
        self.traces.first().map_or(0.0, |t| t.character)
    }
}

impl fmt::Display for ReducibleRepresentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, t) in self.traces.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            let character = if (t.character - t.character.round()).abs() < 1e-9 {
                format!("{}", t.character.round() as i64)
            } else {
                format!("{:.3}", t.character)
            };
            write!(f, "{} {}", t.label, character)?;
        }
        Ok(())
    }
}

/// Builds Γ3N for a molecule over operation classes expressed in the molecule's frame.
///
/// Every member of every class must map the molecule onto itself within `tolerance`;
/// the first member then supplies the count of unmoved atoms and the class character.
#[instrument(skip_all, name = "reducible_representation")]
pub fn build(
    molecule: &Molecule,
    classes: &[OperationClass],
    tolerance: f64,
) -> Result<ReducibleRepresentation, AnalysisError> {
    let atoms = molecule.atoms();
    let positions = molecule.centered_positions();

    let mut traces = Vec::with_capacity(classes.len());
    for class in classes {
        let Some(representative) = class.representative() else {
            return Err(AnalysisError::RepresentationMismatch {
                point_group: class.label.clone(),
            });
        };

        let mut unmoved_atoms = 0;
        for (k, op) in class.operations.iter().enumerate() {
            let permutation = atom_permutation(atoms, &positions, op, tolerance)?;
            if k == 0 {
                unmoved_atoms = permutation
                    .iter()
                    .enumerate()
                    .filter(|(i, j)| i == *j)
                    .count();
            }
        }

        let character = unmoved_atoms as f64 * representative.character_per_unmoved_atom();
        debug!(class = %class.label, unmoved_atoms, character, "Class character computed.");
        traces.push(ClassTrace {
            label: class.label.clone(),
            size: class.operations.len(),
            unmoved_atoms,
            character,
        });
    }

    Ok(ReducibleRepresentation { traces })
}

/// The full 3N×3N Cartesian transformation matrix of an operation.
///
/// Block `(p(j), j)` holds the 3×3 operation matrix, where `p(j)` is the atom that atom `j`
/// is carried onto. Its trace equals the class character computed by [`build`].
pub fn cartesian_matrix(
    molecule: &Molecule,
    operation: &SymmetryOperation,
    tolerance: f64,
) -> Result<DMatrix<f64>, AnalysisError> {
    let positions = molecule.centered_positions();
    let permutation = atom_permutation(molecule.atoms(), &positions, operation, tolerance)?;
    let block = operation.matrix();

    let n = 3 * molecule.atom_count();
    let mut matrix = DMatrix::zeros(n, n);
    for (j, &target) in permutation.iter().enumerate() {
        matrix
            .fixed_view_mut::<3, 3>(3 * target, 3 * j)
            .copy_from(&block);
    }
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;
    use nalgebra::{Point3, Vector3};

    fn water() -> Molecule {
        Molecule::builder("Water")
            .atom(Atom::new("O", Point3::new(0.0, 0.0, 0.1173)))
            .atom(Atom::new("H", Point3::new(0.0, 0.7572, -0.4692)))
            .atom(Atom::new("H", Point3::new(0.0, -0.7572, -0.4692)))
            .build()
            .unwrap()
    }

    fn c2v_classes() -> Vec<OperationClass> {
        vec![
            OperationClass::new("E", vec![SymmetryOperation::Identity]),
            OperationClass::new("C2", vec![SymmetryOperation::rotation(Vector3::z(), 2, 1)]),
            OperationClass::new("σv(xz)", vec![SymmetryOperation::reflection(Vector3::y())]),
            OperationClass::new("σv'(yz)", vec![SymmetryOperation::reflection(Vector3::x())]),
        ]
    }

    #[test]
    fn water_traces_follow_unmoved_atom_formula() {
        let gamma = build(&water(), &c2v_classes(), 1e-3).unwrap();
        let characters: Vec<f64> = gamma.characters().collect();
        let expected = [9.0, -1.0, 1.0, 3.0];
        for (actual, expected) in characters.iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-9, "{characters:?}");
        }
        assert_eq!(gamma.traces[3].unmoved_atoms, 3);
        assert_eq!(gamma.traces[1].unmoved_atoms, 1);
        assert_eq!(gamma.dimension(), 9.0);
        assert_eq!(gamma.to_string(), "E 9, C2 -1, σv(xz) 1, σv'(yz) 3");
    }

    #[test]
    fn mismatched_geometry_is_reported() {
        let mut classes = c2v_classes();
        classes[1] = OperationClass::new("C2", vec![SymmetryOperation::rotation(Vector3::x(), 2, 1)]);
        let err = build(&water(), &classes, 1e-3).unwrap_err();
        assert!(matches!(
            err,
            AnalysisError::GeometryMismatch { ref operation, .. } if operation == "C2"
        ));
    }

    #[test]
    fn continuous_class_cannot_be_traced() {
        let classes = vec![OperationClass::continuous("2C∞^φ")];
        assert!(matches!(
            build(&water(), &classes, 1e-3),
            Err(AnalysisError::RepresentationMismatch { .. })
        ));
    }

    #[test]
    fn cartesian_matrix_trace_matches_class_character() {
        let molecule = water();
        let gamma = build(&molecule, &c2v_classes(), 1e-3).unwrap();
        for (class, trace) in c2v_classes().iter().zip(&gamma.traces) {
            let op = class.representative().unwrap();
            let matrix = cartesian_matrix(&molecule, op, 1e-3).unwrap();
            assert_eq!(matrix.nrows(), 9);
            assert!((matrix.trace() - trace.character).abs() < 1e-9, "{}", class.label);
        }
    }

    #[test]
    fn cartesian_matrix_is_orthogonal() {
        let sigma = SymmetryOperation::reflection(Vector3::y());
        let m = cartesian_matrix(&water(), &sigma, 1e-3).unwrap();
        let identity = DMatrix::<f64>::identity(9, 9);
        assert!((&m * m.transpose() - identity).norm() < 1e-9);
    }
}
