use super::analyze::{self, VibrationalAnalysis};
use crate::core::library::molecules;
use crate::core::models::molecule::Molecule;
use crate::engine::config::AnalysisConfig;
use crate::engine::error::AnalysisError;
use crate::engine::progress::{Progress, ProgressReporter};
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of analyzing one molecule of a batch.
#[derive(Debug, Clone)]
pub struct SurveyEntry {
    pub molecule: String,
    pub outcome: Result<VibrationalAnalysis, AnalysisError>,
}

/// Results of a batch, in input order.
#[derive(Debug, Clone, Default)]
pub struct SurveyReport {
    pub entries: Vec<SurveyEntry>,
}

impl SurveyReport {
    pub fn analyses(&self) -> impl Iterator<Item = &VibrationalAnalysis> {
        self.entries.iter().filter_map(|e| e.outcome.as_ref().ok())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &AnalysisError)> {
        self.entries
            .iter()
            .filter_map(|e| e.outcome.as_ref().err().map(|err| (e.molecule.as_str(), err)))
    }

    pub fn succeeded(&self) -> usize {
        self.analyses().count()
    }

    pub fn failed(&self) -> usize {
        self.entries.len() - self.succeeded()
    }

    /// Total vibrational modes over all successful analyses.
    pub fn total_modes(&self) -> usize {
        self.analyses().map(|a| a.selection.total_modes).sum()
    }
}

/// Analyzes every molecule independently; one failure does not stop the batch.
#[instrument(skip_all, name = "survey_workflow", fields(molecules = molecules.len()))]
pub fn run(
    molecules: &[Molecule],
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> SurveyReport {
    reporter.report(Progress::PhaseStart { name: "Survey" });
    reporter.report(Progress::TaskStart {
        total_steps: molecules.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = molecules.iter();

    #[cfg(feature = "parallel")]
    let iterator = molecules.par_iter();

    let silent = ProgressReporter::new();
    let entries: Vec<SurveyEntry> = iterator
        .map(|molecule| {
            let outcome = analyze::run(molecule, config, &silent);
            if let Err(e) = &outcome {
                warn!(molecule = %molecule.name(), error = %e, "Analysis failed.");
            }
            reporter.report(Progress::MoleculeDone {
                name: molecule.name().to_string(),
                succeeded: outcome.is_ok(),
            });
            reporter.report(Progress::TaskIncrement);
            SurveyEntry {
                molecule: molecule.name().to_string(),
                outcome,
            }
        })
        .collect();

    reporter.report(Progress::TaskFinish);
    reporter.report(Progress::PhaseFinish);

    let report = SurveyReport { entries };
    info!(
        succeeded = report.succeeded(),
        failed = report.failed(),
        "Survey finished."
    );
    report
}

/// Surveys the whole built-in molecule library.
pub fn run_library(config: &AnalysisConfig, reporter: &ProgressReporter) -> SurveyReport {
    let mut built = Vec::new();
    let mut invalid = Vec::new();
    for entry in molecules::all() {
        match entry.build() {
            Ok(molecule) => built.push(molecule),
            Err(e) => invalid.push(SurveyEntry {
                molecule: entry.name.to_string(),
                outcome: Err(AnalysisError::from(e)),
            }),
        }
    }
    let mut report = run(&built, config, reporter);
    report.entries.extend(invalid);
    report
}
