//! Plain-text rendering of analyses, character tables and transformation matrices.

use nalgebra::Matrix4;
use pointsym::core::chartab::table::CharacterTable;
use pointsym::workflows::analyze::VibrationalAnalysis;
use pointsym::workflows::survey::SurveyReport;
use std::fmt;

/// Magnitudes below this are printed as zero.
const MATRIX_ZERO: f64 = 5e-5;

struct AnalysisView<'a>(&'a VibrationalAnalysis);

impl fmt::Display for AnalysisView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let a = self.0;
        writeln!(f, "Molecule:        {} ({})", a.molecule, a.formula)?;
        writeln!(f, "Atoms:           {}", a.atom_count)?;
        if a.reduction_group == a.point_group {
            writeln!(f, "Point group:     {}", a.point_group)?;
        } else {
            writeln!(
                f,
                "Point group:     {} (reduced in {})",
                a.point_group, a.reduction_group
            )?;
        }
        writeln!(f, "Γ3N characters:  {}", a.reducible)?;
        writeln!(f, "Γ3N:             {}", a.full)?;
        writeln!(f, "Γtrans + Γrot:   {}", a.rigid_body)?;
        writeln!(
            f,
            "Γvib:            {}  ({} modes)",
            a.vibrational, a.vibrational_degrees_of_freedom
        )?;
        writeln!(f)?;
        writeln!(f, "{:<8} {:>4} {:>6}  Activity", "Species", "n", "Modes")?;
        for mode in &a.selection.modes {
            writeln!(
                f,
                "{:<8} {:>4} {:>6}  {}",
                mode.irrep, mode.multiplicity, mode.modes, mode.activity
            )?;
        }
        let s = &a.selection;
        writeln!(f)?;
        writeln!(
            f,
            "IR-active: {}   Raman-active: {}   Silent: {}   Observable: {}/{} ({:.0}%)",
            s.ir_count,
            s.raman_count,
            s.silent_count,
            s.unique_observable,
            s.total_modes,
            s.ratio * 100.0
        )
    }
}

struct TableView<'a>(&'a CharacterTable);

impl fmt::Display for TableView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0;
        let summary = table.summary();
        writeln!(f, "{}  (order {})", summary.point_group, summary.order)?;

        let label_width = table
            .irreps
            .iter()
            .map(|i| i.label.chars().count())
            .max()
            .unwrap_or(1)
            .max(4);
        let class_width = table
            .classes
            .iter()
            .map(|c| c.label.chars().count())
            .max()
            .unwrap_or(1)
            .max(6);

        write!(f, "{:<label_width$}", "")?;
        for class in &table.classes {
            write!(f, " {:>class_width$}", class.label)?;
        }
        writeln!(f, "   Linear   Quadratic")?;

        for irrep in &table.irreps {
            write!(f, "{:<label_width$}", irrep.label)?;
            for character in &irrep.characters {
                write!(f, " {:>class_width$}", character.to_string())?;
            }
            let linear: Vec<String> = irrep.linear.iter().map(ToString::to_string).collect();
            writeln!(
                f,
                "   {:<8} {}",
                linear.join(", "),
                irrep.quadratic.join(", ")
            )?;
        }

        if let Some(descent) = &table.descent {
            writeln!(f)?;
            writeln!(f, "Reduced in {} via:", descent.subgroup)?;
            for c in &descent.correlation {
                writeln!(f, "  {} → {}", c.irrep, c.components.join(" + "))?;
            }
        }
        Ok(())
    }
}

struct SurveyView<'a>(&'a SurveyReport);

impl fmt::Display for SurveyView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let report = self.0;
        writeln!(
            f,
            "{:<24} {:<5} {:>5} {:>3} {:>5} {:>6}  Γvib",
            "Molecule", "Group", "Modes", "IR", "Raman", "Silent"
        )?;
        for entry in &report.entries {
            match &entry.outcome {
                Ok(a) => {
                    let s = &a.selection;
                    writeln!(
                        f,
                        "{:<24} {:<5} {:>5} {:>3} {:>5} {:>6}  {}",
                        a.molecule,
                        a.point_group,
                        s.total_modes,
                        s.ir_count,
                        s.raman_count,
                        s.silent_count,
                        a.vibrational
                    )?;
                }
                Err(e) => writeln!(f, "{:<24} failed: {e}", entry.molecule)?,
            }
        }
        writeln!(f)?;
        writeln!(
            f,
            "{} analyzed, {} failed, {} vibrational modes in total.",
            report.succeeded(),
            report.failed(),
            report.total_modes()
        )
    }
}

struct MatrixView<'a>(&'a Matrix4<f64>);

impl fmt::Display for MatrixView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.0.row_iter() {
            write!(f, "  [")?;
            for (j, &v) in row.iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{:>9.4}", if v.abs() < MATRIX_ZERO { 0.0 } else { v })?;
            }
            writeln!(f, "]")?;
        }
        Ok(())
    }
}

pub fn analysis(a: &VibrationalAnalysis) -> String {
    AnalysisView(a).to_string()
}

pub fn character_table(table: &CharacterTable) -> String {
    TableView(table).to_string()
}

pub fn survey(report: &SurveyReport) -> String {
    SurveyView(report).to_string()
}

pub fn matrix(m: &Matrix4<f64>) -> String {
    MatrixView(m).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pointsym::core::chartab::catalog::catalog;
    use pointsym::core::library::molecules;
    use pointsym::engine::config::AnalysisConfig;
    use pointsym::engine::progress::ProgressReporter;
    use pointsym::workflows::{analyze, survey as survey_workflow};

    fn water() -> VibrationalAnalysis {
        let molecule = molecules::find("water").unwrap().build().unwrap();
        analyze::run(&molecule, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap()
    }

    #[test]
    fn analysis_lists_every_species() {
        let text = analysis(&water());
        assert!(text.contains("Point group:     C2v"));
        assert!(text.contains("Γvib:            2A1 + B2  (3 modes)"));
        assert!(text.contains("IR + Raman"));
        assert!(text.contains("Observable: 3/3 (100%)"));
    }

    #[test]
    fn linear_analysis_names_the_reduction_group() {
        let molecule = molecules::find("CO2").unwrap().build().unwrap();
        let a = analyze::run(&molecule, &AnalysisConfig::default(), &ProgressReporter::new())
            .unwrap();
        assert!(analysis(&a).contains("D∞h (reduced in D2h)"));
    }

    #[test]
    fn character_table_shows_characters_and_functions() {
        let text = character_table(catalog().get("C3v").unwrap());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "C3v  (order 6)");
        assert!(lines[1].contains("2C3"));
        assert!(lines.iter().any(|l| l.starts_with("E ") && l.contains("x, y, Rx, Ry")));
    }

    #[test]
    fn linear_table_shows_descent() {
        let text = character_table(catalog().get("Dinfh").unwrap());
        assert!(text.contains("(order ∞)"));
        assert!(text.contains("Reduced in D2h via:"));
        assert!(text.contains("Πu → B2u + B3u"));
    }

    #[test]
    fn survey_summarizes_failures() {
        let water = molecules::find("water").unwrap().build().unwrap();
        let broken = water.with_point_group(Some("Oh"));
        let report = survey_workflow::run(
            &[water, broken],
            &AnalysisConfig::default(),
            &ProgressReporter::new(),
        );
        let text = survey(&report);
        assert!(text.contains("failed:"));
        assert!(text.contains("1 analyzed, 1 failed, 3 vibrational modes in total."));
    }

    #[test]
    fn identity_matrix_renders_without_negative_zero() {
        let text = matrix(&Matrix4::identity());
        assert_eq!(text.lines().count(), 4);
        assert!(!text.contains("-0.0000"));
        assert!(text.starts_with("  [   1.0000"));
    }
}
