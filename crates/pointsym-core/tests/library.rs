use nalgebra::Point3;
use pointsym::core::chartab::catalog::catalog;
use pointsym::core::library::molecules;
use pointsym::core::models::atom::Atom;
use pointsym::core::models::molecule::Molecule;
use pointsym::engine::config::AnalysisConfig;
use pointsym::engine::error::AnalysisError;
use pointsym::engine::progress::ProgressReporter;
use pointsym::engine::reducible::cartesian_matrix;
use pointsym::engine::selection::ModeActivity;
use pointsym::workflows::analyze::{self, VibrationalAnalysis};
use pointsym::workflows::survey;

struct Expected {
    name: &'static str,
    point_group: &'static str,
    vibrational: &'static str,
    /// (ir, raman, silent, total, unique observable)
    counts: (usize, usize, usize, usize, usize),
}

const EXPECTED: &[Expected] = &[
    Expected { name: "Water", point_group: "C2v", vibrational: "2A1 + B2", counts: (3, 3, 0, 3, 3) },
    Expected { name: "Ammonia", point_group: "C3v", vibrational: "2A1 + 2E", counts: (6, 6, 0, 6, 6) },
    Expected { name: "Methane", point_group: "Td", vibrational: "A1 + E + 2T2", counts: (6, 9, 0, 9, 9) },
    Expected { name: "Hydrogen Fluoride", point_group: "C∞v", vibrational: "Σ+", counts: (1, 1, 0, 1, 1) },
    Expected { name: "Hydrogen Cyanide", point_group: "C∞v", vibrational: "2Σ+ + Π", counts: (4, 4, 0, 4, 4) },
    Expected { name: "Carbon Dioxide", point_group: "D∞h", vibrational: "Σg+ + Σu+ + Πu", counts: (3, 1, 0, 4, 4) },
    Expected { name: "Acetylene", point_group: "D∞h", vibrational: "2Σg+ + Πg + Σu+ + Πu", counts: (3, 4, 0, 7, 7) },
    Expected { name: "Cyanogen", point_group: "D∞h", vibrational: "2Σg+ + Πg + Σu+ + Πu", counts: (3, 4, 0, 7, 7) },
    Expected { name: "Sulfur Dioxide", point_group: "C2v", vibrational: "2A1 + B2", counts: (3, 3, 0, 3, 3) },
    Expected { name: "Formaldehyde", point_group: "C2v", vibrational: "3A1 + B1 + 2B2", counts: (6, 6, 0, 6, 6) },
    Expected { name: "Boron Trifluoride", point_group: "D3h", vibrational: "A1' + 2E' + A2''", counts: (5, 5, 0, 6, 6) },
    Expected { name: "Carbon Tetrachloride", point_group: "Td", vibrational: "A1 + E + 2T2", counts: (6, 9, 0, 9, 9) },
    Expected { name: "Chloroform", point_group: "C3v", vibrational: "3A1 + 3E", counts: (9, 9, 0, 9, 9) },
    Expected { name: "Ethylene", point_group: "D2h", vibrational: "3Ag + B2g + 2B3g + Au + 2B1u + 2B2u + B3u", counts: (5, 6, 1, 12, 11) },
    Expected { name: "Allene", point_group: "D2d", vibrational: "3A1 + B1 + 3B2 + 4E", counts: (11, 15, 0, 15, 15) },
    Expected { name: "Sulfur Hexafluoride", point_group: "Oh", vibrational: "A1g + Eg + T2g + 2T1u + T2u", counts: (6, 6, 3, 15, 12) },
    Expected {
        name: "Benzene",
        point_group: "D6h",
        vibrational: "2A1g + A2g + 2B2g + E1g + 4E2g + A2u + 2B1u + 2B2u + 3E1u + 2E2u",
        counts: (7, 12, 11, 30, 19),
    },
    Expected { name: "Hydrogen Peroxide", point_group: "C2", vibrational: "4A + 2B", counts: (6, 6, 0, 6, 6) },
    Expected { name: "trans-Dichloroethylene", point_group: "C2h", vibrational: "5Ag + Bg + 2Au + 4Bu", counts: (6, 6, 0, 12, 12) },
    Expected { name: "Ethane (staggered)", point_group: "D3d", vibrational: "3A1g + 3Eg + A1u + 2A2u + 3Eu", counts: (8, 9, 1, 18, 17) },
    Expected { name: "Xenon Tetrafluoride", point_group: "D4h", vibrational: "A1g + B1g + B2g + A2u + B2u + 2Eu", counts: (5, 3, 1, 9, 8) },
    Expected { name: "Hypochlorous Acid", point_group: "Cs", vibrational: "3A'", counts: (3, 3, 0, 3, 3) },
];

fn analyze(name: &str) -> (Molecule, VibrationalAnalysis) {
    let molecule = molecules::find(name)
        .unwrap_or_else(|| panic!("{name} is not in the library"))
        .build()
        .unwrap();
    let analysis = analyze::run(&molecule, &AnalysisConfig::default(), &ProgressReporter::new())
        .unwrap_or_else(|e| panic!("{name}: {e}"));
    (molecule, analysis)
}

#[test]
fn expectations_cover_the_whole_library() {
    assert_eq!(EXPECTED.len(), molecules::all().len());
    for entry in molecules::all() {
        assert!(EXPECTED.iter().any(|e| e.name == entry.name), "{}", entry.name);
    }
}

#[test]
fn library_molecules_have_known_vibrational_species() {
    for expected in EXPECTED {
        let (_, analysis) = analyze(expected.name);
        assert_eq!(analysis.point_group, expected.point_group, "{}", expected.name);
        assert_eq!(
            analysis.vibrational.to_string(),
            expected.vibrational,
            "{}",
            expected.name
        );
        let s = &analysis.selection;
        assert_eq!(
            (s.ir_count, s.raman_count, s.silent_count, s.total_modes, s.unique_observable),
            expected.counts,
            "{}",
            expected.name
        );
    }
}

#[test]
fn benzene_has_twenty_vibrational_species() {
    let (_, analysis) = analyze("benzene");
    assert_eq!(analysis.vibrational.species_count(), 20);
    assert_eq!(analysis.selection.total_modes, 30);
}

#[test]
fn full_representation_splits_into_rigid_body_and_vibrations() {
    for expected in EXPECTED {
        let (molecule, analysis) = analyze(expected.name);
        let rigid = if molecule.is_linear() { 5 } else { 6 };
        assert_eq!(analysis.rigid_body.total_dimension(), rigid, "{}", expected.name);
        assert_eq!(
            analysis.full.total_dimension(),
            3 * molecule.atom_count(),
            "{}",
            expected.name
        );
        assert_eq!(
            analysis.rigid_body.total_dimension() + analysis.vibrational.total_dimension(),
            analysis.full.total_dimension(),
            "{}",
            expected.name
        );
        assert_eq!(
            analysis.selection.total_modes,
            molecule.vibrational_degrees_of_freedom(),
            "{}",
            expected.name
        );
    }
}

#[test]
fn centrosymmetric_molecules_obey_mutual_exclusion() {
    for expected in EXPECTED {
        let table = catalog().get(expected.point_group).unwrap();
        if !table.is_centrosymmetric() {
            continue;
        }
        let (_, analysis) = analyze(expected.name);
        let s = &analysis.selection;
        assert!(
            s.modes.iter().all(|m| m.activity != ModeActivity::Both),
            "{}",
            expected.name
        );
        assert_eq!(s.ir_count + s.raman_count + s.silent_count, s.total_modes);
    }
}

#[test]
fn cartesian_matrix_traces_match_characters() {
    for name in ["Water", "Ammonia", "Methane", "Carbon Dioxide", "Benzene"] {
        let (molecule, analysis) = analyze(name);
        for (class, trace) in analysis.classes.iter().zip(&analysis.reducible.traces) {
            for op in &class.operations {
                let matrix = cartesian_matrix(&molecule, op, 1e-3).unwrap();
                assert!(
                    (matrix.trace() - trace.character).abs() < 1e-6,
                    "{name} {}",
                    class.label
                );
            }
        }
    }
}

#[test]
fn isotopic_substitution_breaks_the_assignment() {
    let hod = Molecule::builder("Water")
        .atom(Atom::new("O", Point3::new(0.0, 0.0, 0.1173)))
        .atom(Atom::new("H", Point3::new(0.0, 0.7572, -0.4692)))
        .atom(Atom::new("H", Point3::new(0.0, -0.7572, -0.4692)).with_isotope_mass(2.014))
        .build()
        .unwrap();
    let err = analyze::run(&hod, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap_err();
    assert!(matches!(err, AnalysisError::GeometryMismatch { .. }), "{err}");

    let hod = hod.with_point_group(Some("Cs"));
    let analysis = analyze::run(&hod, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
    assert_eq!(analysis.vibrational.to_string(), "3A'");
}

#[test]
fn rotated_and_translated_input_gives_the_same_result() {
    let ammonia = molecules::find("ammonia").unwrap();
    let rotation = nalgebra::Rotation3::from_euler_angles(0.3, -1.1, 2.0);
    let offset = nalgebra::Vector3::new(4.0, -2.5, 7.25);
    let moved = Molecule::builder("Ammonia")
        .atoms(ammonia.atoms.iter().map(|(element, [x, y, z])| {
            Atom::new(element, rotation * Point3::new(*x, *y, *z) + offset)
        }))
        .build()
        .unwrap();
    let analysis =
        analyze::run(&moved, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
    assert_eq!(analysis.vibrational.to_string(), "2A1 + 2E");
}

#[test]
fn library_survey_succeeds_for_every_molecule() {
    let report = survey::run_library(&AnalysisConfig::default(), &ProgressReporter::new());
    assert_eq!(report.entries.len(), molecules::all().len());
    for (name, error) in report.failures() {
        panic!("{name}: {error}");
    }
    let expected_modes: usize = EXPECTED.iter().map(|e| e.counts.3).sum();
    assert_eq!(report.total_modes(), expected_modes);
}
