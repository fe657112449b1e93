use crate::core::chartab::catalog::catalog;
use crate::core::chartab::table::CharacterTable;
use crate::core::geometry::alignment::{self, Alignment};
use crate::core::library::assignments;
use crate::core::models::molecule::Molecule;
use crate::core::models::operation::OperationClass;
use crate::engine::config::AnalysisConfig;
use crate::engine::decomposition::{self, Decomposition};
use crate::engine::error::AnalysisError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::reducible::{self, ReducibleRepresentation};
use crate::engine::selection::{self, SelectionResult};
use nalgebra::Rotation3;
use serde::Serialize;
use tracing::{info, instrument};

/// Everything derived from one molecule: its point group, the symmetry frame, Γ3N and the
/// vibrational selection rules.
#[derive(Debug, Clone, Serialize)]
pub struct VibrationalAnalysis {
    pub molecule: String,
    pub formula: String,
    pub point_group: String,
    /// The finite group the characters were evaluated in; differs from `point_group` only
    /// for the linear groups.
    pub reduction_group: String,
    pub linear: bool,
    pub atom_count: usize,
    pub vibrational_degrees_of_freedom: usize,
    /// Γ3N characters per class of `reduction_group`.
    pub reducible: ReducibleRepresentation,
    /// Γ3N reduced onto the irreps of `point_group`.
    pub full: Decomposition,
    pub rigid_body: Decomposition,
    pub vibrational: Decomposition,
    pub selection: SelectionResult,
    /// Operation classes of `reduction_group` in the molecule's coordinates.
    #[serde(skip)]
    pub classes: Vec<OperationClass>,
    /// Rotation from the standard orientation to the molecule's coordinates.
    #[serde(skip)]
    pub frame: Rotation3<f64>,
}

/// Resolves the character table for a molecule: the explicit override if present, otherwise
/// the curated assignment for its name or formula.
pub fn resolve_point_group(molecule: &Molecule) -> Result<&'static CharacterTable, AnalysisError> {
    let id = molecule
        .point_group_override()
        .or_else(|| assignments::point_group_for(molecule.name()))
        .or_else(|| assignments::point_group_for(molecule.formula()))
        .ok_or_else(|| AnalysisError::UnassignedPointGroup {
            molecule: molecule.name().to_string(),
        })?;
    catalog().lookup(id)
}

#[instrument(skip_all, name = "analysis_workflow", fields(molecule = %molecule.name()))]
pub fn run(
    molecule: &Molecule,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<VibrationalAnalysis, AnalysisError> {
    // === Phase 1: Point group ===
    let table = resolve_point_group(molecule)?;
    if table.is_linear() != molecule.is_linear() {
        return Err(AnalysisError::RepresentationMismatch {
            point_group: table.id.clone(),
        });
    }
    let reduction = catalog()
        .reduction_table(table)
        .ok_or_else(|| AnalysisError::UnsupportedPointGroup {
            id: table.id.clone(),
        })?;
    info!(point_group = %table.id, reduction_group = %reduction.id, "Point group resolved.");
    reporter.report(Progress::Message(format!(
        "{} assigned to {}",
        molecule.name(),
        table.id
    )));

    // === Phase 2: Frame alignment ===
    reporter.report(Progress::PhaseStart { name: "Alignment" });
    let Alignment { rotation, classes } =
        alignment::align(molecule, &reduction.classes, config.geometry_tolerance)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 3: Reducible representation ===
    reporter.report(Progress::PhaseStart {
        name: "Reducible Representation",
    });
    let gamma = reducible::build(molecule, &classes, config.geometry_tolerance)?;
    reporter.report(Progress::PhaseFinish);

    // === Phase 4: Decomposition and selection rules ===
    reporter.report(Progress::PhaseStart {
        name: "Decomposition",
    });
    let full = decomposition::decompose(&gamma, table, config.numeric_tolerance)?;
    let rigid_body = decomposition::rigid_body(table, molecule.is_linear());
    let vibrational = full.checked_sub(&rigid_body)?;
    let selection = selection::classify(&vibrational, table);
    reporter.report(Progress::PhaseFinish);
    reporter.report(Progress::Message(format!("Γvib = {vibrational}")));

    let cartesian = 3 * molecule.atom_count();
    if full.total_dimension() != cartesian
        || vibrational.total_dimension() != molecule.vibrational_degrees_of_freedom()
    {
        return Err(AnalysisError::RepresentationMismatch {
            point_group: table.id.clone(),
        });
    }

    info!(
        vibrational = %vibrational,
        modes = selection.total_modes,
        "Analysis complete."
    );
    Ok(VibrationalAnalysis {
        molecule: molecule.name().to_string(),
        formula: molecule.formula().to_string(),
        point_group: table.id.clone(),
        reduction_group: reduction.id.clone(),
        linear: molecule.is_linear(),
        atom_count: molecule.atom_count(),
        vibrational_degrees_of_freedom: molecule.vibrational_degrees_of_freedom(),
        reducible: gamma,
        full,
        rigid_body,
        vibrational,
        selection,
        classes,
        frame: rotation,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::library::molecules;
    use crate::core::models::atom::Atom;
    use nalgebra::Point3;

    fn library(name: &str) -> Molecule {
        molecules::find(name).unwrap().build().unwrap()
    }

    #[test]
    fn water_end_to_end() {
        let result = run(&library("water"), &AnalysisConfig::default(), &ProgressReporter::new())
            .unwrap();
        assert_eq!(result.point_group, "C2v");
        assert_eq!(result.reduction_group, "C2v");
        assert_eq!(result.full.to_string(), "3A1 + A2 + 2B1 + 3B2");
        assert_eq!(result.vibrational.to_string(), "2A1 + B2");
        assert_eq!(result.selection.total_modes, 3);
        assert_eq!(result.classes.len(), 4);
    }

    #[test]
    fn override_takes_precedence_over_assignment() {
        let water = library("water").with_point_group(Some("Cs"));
        let result = run(&water, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
        assert_eq!(result.point_group, "Cs");
        assert_eq!(result.vibrational.to_string(), "3A'");
    }

    #[test]
    fn unknown_molecule_without_override_is_unassigned() {
        let molecule = Molecule::builder("Mystery")
            .atom(Atom::new("Xe", Point3::new(0.0, 0.0, 0.0)))
            .atom(Atom::new("Kr", Point3::new(0.0, 0.5, 2.0)))
            .atom(Atom::new("Ar", Point3::new(0.0, 1.5, 0.0)))
            .build()
            .unwrap();
        assert!(matches!(
            resolve_point_group(&molecule),
            Err(AnalysisError::UnassignedPointGroup { .. })
        ));
    }

    #[test]
    fn unsupported_override_is_reported() {
        let water = library("water").with_point_group(Some("T"));
        assert!(matches!(
            resolve_point_group(&water),
            Err(AnalysisError::UnsupportedPointGroup { ref id }) if id == "T"
        ));
    }

    #[test]
    fn wrong_group_is_a_geometry_mismatch() {
        let water = library("water").with_point_group(Some("C3v"));
        let err = run(&water, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::GeometryMismatch { .. }));
    }

    #[test]
    fn linear_group_on_bent_molecule_is_rejected() {
        let water = library("water").with_point_group(Some("D∞h"));
        let err = run(&water, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap_err();
        assert!(matches!(err, AnalysisError::RepresentationMismatch { .. }));
    }

    #[test]
    fn phases_are_reported() {
        let phases = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::PhaseStart { name } = event {
                phases.lock().unwrap().push(name);
            }
        }));
        run(&library("ammonia"), &AnalysisConfig::default(), &reporter).unwrap();
        drop(reporter);
        assert_eq!(
            phases.into_inner().unwrap(),
            ["Alignment", "Reducible Representation", "Decomposition"]
        );
    }

    #[test]
    fn assignment_and_result_are_announced() {
        let messages = std::sync::Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(text) = event {
                messages.lock().unwrap().push(text);
            }
        }));
        run(&library("water"), &AnalysisConfig::default(), &reporter).unwrap();
        drop(reporter);
        assert_eq!(
            messages.into_inner().unwrap(),
            ["Water assigned to C2v", "Γvib = 2A1 + B2"]
        );
    }
}
