use crate::core::geometry::alignment::SymmetryMismatch;
use crate::core::models::molecule::MoleculeError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Unsupported point group '{id}'")]
    UnsupportedPointGroup { id: String },

    #[error(
        "No point group is assigned to molecule '{molecule}'; supply one explicitly or use a known molecule name"
    )]
    UnassignedPointGroup { molecule: String },

    #[error(
        "Geometry does not realize the point group: operation {operation} moves atom {atom_index} {deviation:.4} Å from any equivalent atom"
    )]
    GeometryMismatch {
        operation: String,
        atom_index: usize,
        deviation: f64,
    },

    #[error("Inconsistent decomposition for {irrep}: multiplicity {value} is not a non-negative integer")]
    DecompositionInconsistency { irrep: String, value: f64 },

    #[error("Invalid molecule: {0}")]
    InvalidMolecule(#[from] MoleculeError),

    #[error("Representation does not match the operation classes of point group {point_group}")]
    RepresentationMismatch { point_group: String },
}

impl From<SymmetryMismatch> for AnalysisError {
    fn from(mismatch: SymmetryMismatch) -> Self {
        Self::GeometryMismatch {
            operation: mismatch.operation,
            atom_index: mismatch.atom_index,
            deviation: mismatch.deviation,
        }
    }
}
