use crate::core::models::atom::Atom;
use crate::core::models::molecule::Molecule;
use crate::core::models::operation::{OperationClass, SymmetryOperation};
use itertools::Itertools;
use nalgebra::{Matrix3, Rotation3, Vector3};
use thiserror::Error;
use tracing::{debug, trace};

/// Norm below which a candidate direction is discarded as degenerate.
const MIN_DIRECTION_NORM: f64 = 1e-6;
/// Cosine above which two candidate directions are the same line.
const SAME_LINE_COSINE: f64 = 1.0 - 1e-8;

/// An atom whose image under an operation does not land on an atom of the same species.
#[derive(Debug, Error, Clone, PartialEq)]
#[error("operation {operation} moves atom {atom_index} {deviation:.4} Å away from any equivalent atom")]
pub struct SymmetryMismatch {
    pub operation: String,
    pub atom_index: usize,
    pub deviation: f64,
}

/// The molecule's symmetry frame and the group's operations expressed in it.
#[derive(Debug, Clone)]
pub struct Alignment {
    /// Columns are the frame's x, y and z axes in input coordinates.
    pub rotation: Rotation3<f64>,
    /// The operation classes re-expressed in input coordinates, about the center of mass.
    pub classes: Vec<OperationClass>,
}

/// Maps every atom to the atom its image lands on under `operation`.
///
/// `positions` are relative to the symmetry center. Only atoms of the same species (element
/// and mass) may be exchanged. Fails with the first atom whose image is farther than
/// `tolerance` from every candidate.
pub fn atom_permutation(
    atoms: &[Atom],
    positions: &[Vector3<f64>],
    operation: &SymmetryOperation,
    tolerance: f64,
) -> Result<Vec<usize>, SymmetryMismatch> {
    let matrix = operation.matrix();
    atoms
        .iter()
        .zip(positions)
        .enumerate()
        .map(|(index, (atom, position))| {
            let image = matrix * position;
            let nearest = atoms
                .iter()
                .zip(positions)
                .enumerate()
                .filter(|(_, (other, _))| atom.is_same_species(other))
                .map(|(j, (_, p))| (j, (p - image).norm()))
                .min_by(|a, b| a.1.total_cmp(&b.1));
            match nearest {
                Some((j, deviation)) if deviation <= tolerance => Ok(j),
                other => Err(SymmetryMismatch {
                    operation: operation.symbol(),
                    atom_index: index,
                    deviation: other.map_or(f64::INFINITY, |(_, d)| d),
                }),
            }
        })
        .collect()
}

/// Finds the orientation in which the molecule realizes the given operation classes.
///
/// The classes are written in a standard frame with the principal axis along `z`. Candidate
/// directions are taken from the molecule itself: atom vectors, midpoints and differences
/// of equivalent atoms, cross products of atom vectors, principal axes of inertia and the
/// input axes. A `z` is accepted when every operation anchored on `z` maps the molecule onto
/// itself; an `x` perpendicular to it is accepted when the whole group does.
///
/// Among valid frames the Mulliken convention decides. When the only operation anchored on
/// `z` is a reflection (Cs), a planar molecule takes its own plane as σh, so `z` is the plane
/// normal. Otherwise a planar molecule prefers `x` normal to its plane. Then come `z` through
/// the most atoms and `x` through the most atoms. Remaining ties go to the first candidate
/// found.
pub fn align(
    molecule: &Molecule,
    classes: &[OperationClass],
    tolerance: f64,
) -> Result<Alignment, SymmetryMismatch> {
    let atoms = molecule.atoms();
    let positions = molecule.centered_positions();
    let operations: Vec<SymmetryOperation> = classes
        .iter()
        .flat_map(|c| c.operations.iter().copied())
        .filter(|op| *op != SymmetryOperation::Identity)
        .collect();
    let axial: Vec<SymmetryOperation> = operations
        .iter()
        .filter(|op| op.is_anchored_to(&Vector3::z()))
        .copied()
        .collect();

    let candidates = candidate_directions(atoms, &positions);
    let z_candidates: Vec<Vector3<f64>> = if molecule.is_linear() {
        molecular_axis(&positions).into_iter().collect()
    } else {
        candidates.clone()
    };
    let plane_normal = plane_normal(&positions, tolerance).filter(|_| !molecule.is_linear());
    let mirror_only = !axial.is_empty()
        && axial
            .iter()
            .all(|op| matches!(op, SymmetryOperation::Reflection { .. }));
    let normal_to_plane =
        |v: &Vector3<f64>| plane_normal.is_some_and(|n| n.dot(v).abs() > SAME_LINE_COSINE);

    let mut best: Option<(FrameScore, Rotation3<f64>)> = None;
    let mut closest_failure: Option<SymmetryMismatch> = None;
    let mut record_failure = |mismatch: SymmetryMismatch| {
        if closest_failure
            .as_ref()
            .is_none_or(|f| mismatch.deviation < f.deviation)
        {
            closest_failure = Some(mismatch);
        }
    };

    for z in &z_candidates {
        let trial = frame(&any_perpendicular(z), z);
        if let Err(mismatch) = check_operations(atoms, &positions, &axial, &trial, tolerance) {
            trace!(?z, %mismatch, "Rejected principal axis candidate.");
            record_failure(mismatch);
            continue;
        }

        for x in perpendicular_directions(z, &candidates) {
            let rotation = frame(&x, z);
            match check_operations(atoms, &positions, &operations, &rotation, tolerance) {
                Ok(()) => {
                    let score = FrameScore {
                        z_normal_to_plane: mirror_only && normal_to_plane(z),
                        x_normal_to_plane: !mirror_only && normal_to_plane(&x),
                        atoms_on_z: atoms_on_line(&positions, z, tolerance),
                        atoms_on_x: atoms_on_line(&positions, &x, tolerance),
                    };
                    if best.as_ref().is_none_or(|(b, _)| score > *b) {
                        best = Some((score, rotation));
                    }
                }
                Err(mismatch) => record_failure(mismatch),
            }
        }
    }

    match best {
        Some((score, rotation)) => {
            debug!(?score, "Aligned molecule with the standard symmetry frame.");
            Ok(Alignment {
                classes: classes.iter().map(|c| c.rotated(&rotation)).collect(),
                rotation,
            })
        }
        None => Err(closest_failure.unwrap_or(SymmetryMismatch {
            operation: "E".to_string(),
            atom_index: 0,
            deviation: f64::INFINITY,
        })),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrameScore {
    z_normal_to_plane: bool,
    x_normal_to_plane: bool,
    atoms_on_z: usize,
    atoms_on_x: usize,
}

fn check_operations(
    atoms: &[Atom],
    positions: &[Vector3<f64>],
    operations: &[SymmetryOperation],
    rotation: &Rotation3<f64>,
    tolerance: f64,
) -> Result<(), SymmetryMismatch> {
    for op in operations {
        atom_permutation(atoms, positions, &op.rotated(rotation), tolerance)?;
    }
    Ok(())
}

/// Right-handed frame with the given `x` and `z` axes as columns.
fn frame(x: &Vector3<f64>, z: &Vector3<f64>) -> Rotation3<f64> {
    let y = z.cross(x);
    Rotation3::from_matrix_unchecked(Matrix3::from_columns(&[*x, y, *z]))
}

fn any_perpendicular(v: &Vector3<f64>) -> Vector3<f64> {
    let helper = if v.x.abs() < 0.9 {
        Vector3::x()
    } else {
        Vector3::y()
    };
    (helper - v * v.dot(&helper)).normalize()
}

fn push_direction(directions: &mut Vec<Vector3<f64>>, v: Vector3<f64>) {
    let norm = v.norm();
    if norm < MIN_DIRECTION_NORM {
        return;
    }
    let unit = v / norm;
    if directions
        .iter()
        .all(|d| d.dot(&unit).abs() < SAME_LINE_COSINE)
    {
        directions.push(unit);
    }
}

fn candidate_directions(atoms: &[Atom], positions: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut directions = Vec::new();
    for p in positions {
        push_direction(&mut directions, *p);
    }
    for ((i, a), (j, b)) in atoms.iter().enumerate().tuple_combinations() {
        if a.is_same_species(b) {
            push_direction(&mut directions, (positions[i] + positions[j]) / 2.0);
            push_direction(&mut directions, positions[j] - positions[i]);
        }
    }
    for (a, b) in positions.iter().tuple_combinations() {
        push_direction(&mut directions, a.cross(b));
    }
    let eigen = second_moment(positions).symmetric_eigen();
    for column in eigen.eigenvectors.column_iter() {
        push_direction(&mut directions, column.into_owned());
    }
    for axis in [Vector3::x(), Vector3::y(), Vector3::z()] {
        push_direction(&mut directions, axis);
    }
    directions
}

/// Candidates projected onto the plane perpendicular to `z`, plus one fallback direction.
fn perpendicular_directions(z: &Vector3<f64>, candidates: &[Vector3<f64>]) -> Vec<Vector3<f64>> {
    let mut directions = Vec::new();
    for c in candidates {
        push_direction(&mut directions, c - z * z.dot(c));
    }
    push_direction(&mut directions, any_perpendicular(z));
    directions
}

fn second_moment(positions: &[Vector3<f64>]) -> Matrix3<f64> {
    positions
        .iter()
        .fold(Matrix3::zeros(), |acc, p| acc + p * p.transpose())
}

fn molecular_axis(positions: &[Vector3<f64>]) -> Option<Vector3<f64>> {
    positions
        .iter()
        .max_by(|a, b| a.norm_squared().total_cmp(&b.norm_squared()))
        .filter(|p| p.norm() > MIN_DIRECTION_NORM)
        .map(|p| p.normalize())
}

/// Normal of the plane through the center containing every atom, if there is one.
fn plane_normal(positions: &[Vector3<f64>], tolerance: f64) -> Option<Vector3<f64>> {
    let eigen = second_moment(positions).symmetric_eigen();
    let smallest = eigen.eigenvalues.imin();
    let normal = eigen.eigenvectors.column(smallest).into_owned();
    positions
        .iter()
        .all(|p| p.dot(&normal).abs() < tolerance)
        .then_some(normal)
}

fn atoms_on_line(positions: &[Vector3<f64>], direction: &Vector3<f64>, tolerance: f64) -> usize {
    positions
        .iter()
        .filter(|p| (*p - direction * direction.dot(p)).norm() < tolerance)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn water() -> Molecule {
        // Deliberately placed in the xy plane with the C2 axis along x.
        Molecule::builder("Water")
            .atom(Atom::new("O", Point3::new(0.0, 0.0, 0.0)))
            .atom(Atom::new("H", Point3::new(-0.586, 0.757, 0.0)))
            .atom(Atom::new("H", Point3::new(-0.586, -0.757, 0.0)))
            .build()
            .unwrap()
    }

    fn c2v_classes() -> Vec<OperationClass> {
        vec![
            OperationClass::new("E", vec![SymmetryOperation::Identity]),
            OperationClass::new("C2", vec!["C2@z".parse().unwrap()]),
            OperationClass::new("σv(xz)", vec!["sigma@y".parse().unwrap()]),
            OperationClass::new("σv'(yz)", vec!["sigma@x".parse().unwrap()]),
        ]
    }

    #[test]
    fn permutation_swaps_equivalent_atoms() {
        let molecule = water();
        let positions = molecule.centered_positions();
        let sigma = SymmetryOperation::reflection(Vector3::y());
        let permutation = atom_permutation(molecule.atoms(), &positions, &sigma, 1e-3).unwrap();
        assert_eq!(permutation, [0, 2, 1]);
        let identity =
            atom_permutation(molecule.atoms(), &positions, &SymmetryOperation::Identity, 1e-3)
                .unwrap();
        assert_eq!(identity, [0, 1, 2]);
    }

    #[test]
    fn permutation_reports_mismatch() {
        let molecule = water();
        let positions = molecule.centered_positions();
        let c2 = SymmetryOperation::rotation(Vector3::z(), 2, 1);
        let err = atom_permutation(molecule.atoms(), &positions, &c2, 1e-3).unwrap_err();
        assert_eq!(err.operation, "C2");
        assert_eq!(err.atom_index, 0);
        assert!(err.deviation > 0.1);
    }

    #[test]
    fn water_is_aligned_with_plane_normal_as_x() {
        let alignment = align(&water(), &c2v_classes(), 1e-3).unwrap();
        let x = alignment.rotation * Vector3::x();
        let z = alignment.rotation * Vector3::z();
        assert!(z.x.abs() > 1.0 - 1e-9, "C2 axis must follow the input x axis");
        assert!(x.z.abs() > 1.0 - 1e-9, "x must be normal to the molecular plane");
        let c2 = alignment.classes[1].representative().unwrap();
        assert!(c2.is_anchored_to(&Vector3::x()));
    }

    #[test]
    fn aligned_rotation_is_proper() {
        let alignment = align(&water(), &c2v_classes(), 1e-3).unwrap();
        assert!((alignment.rotation.matrix().determinant() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn asymmetric_molecule_fails_alignment() {
        let hod = Molecule::builder("HOD")
            .atom(Atom::new("O", Point3::new(0.0, 0.0, 0.0)))
            .atom(Atom::new("H", Point3::new(-0.586, 0.757, 0.0)))
            .atom(Atom::new("H", Point3::new(-0.586, -0.757, 0.0)).with_isotope_mass(2.014))
            .build()
            .unwrap();
        let err = align(&hod, &c2v_classes(), 1e-3).unwrap_err();
        assert!(err.deviation > 1e-3);
    }

    #[test]
    fn mirror_only_group_uses_the_molecular_plane() {
        let classes = vec![
            OperationClass::new("E", vec![SymmetryOperation::Identity]),
            OperationClass::new("σh", vec!["sigma@z".parse().unwrap()]),
        ];
        let alignment = align(&water(), &classes, 1e-3).unwrap();
        let z = alignment.rotation * Vector3::z();
        assert!(z.z.abs() > 1.0 - 1e-9, "σh must be the molecular plane");
        let sigma = alignment.classes[1].representative().unwrap();
        assert!(sigma.is_anchored_to(&Vector3::z()));
    }

    #[test]
    fn trivial_group_accepts_any_frame() {
        let classes = vec![OperationClass::new("E", vec![SymmetryOperation::Identity])];
        assert!(align(&water(), &classes, 1e-3).is_ok());
    }
}
