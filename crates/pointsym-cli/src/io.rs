//! Molecule input: built-in library lookups, XYZ files and TOML molecule files.

use crate::cli::MoleculeSource;
use crate::error::{CliError, Result};
use anyhow::{Context, anyhow, bail};
use nalgebra::Point3;
use pointsym::core::library::molecules;
use pointsym::core::models::atom::Atom;
use pointsym::core::models::molecule::Molecule;
use pointsym::engine::error::AnalysisError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct MoleculeFile {
    name: String,
    formula: Option<String>,
    linear: Option<bool>,
    point_group: Option<String>,
    atoms: Vec<AtomEntry>,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct AtomEntry {
    element: String,
    position: [f64; 3],
    mass: Option<f64>,
}

/// Resolves the molecule named on the command line.
pub fn load_molecule(source: &MoleculeSource) -> Result<Molecule> {
    match (&source.molecule, &source.input) {
        (Some(name), _) => {
            let entry = molecules::find(name).ok_or_else(|| {
                CliError::Argument(format!(
                    "'{name}' is not a built-in molecule; run 'pointsym list' to see the library"
                ))
            })?;
            info!("Using built-in molecule '{}'.", entry.name);
            entry.build().map_err(|e| AnalysisError::from(e).into())
        }
        (None, Some(path)) => read_molecule(path),
        (None, None) => Err(CliError::Argument(
            "either --molecule or --input is required".to_string(),
        )),
    }
}

/// Reads a molecule file, choosing the format by extension (`.xyz` or `.toml`).
pub fn read_molecule(path: &Path) -> Result<Molecule> {
    info!("Loading molecule from {:?}", path);
    let content = std::fs::read_to_string(path)?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    let parsed = match extension.as_deref() {
        Some("xyz") => {
            let fallback = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or("molecule");
            parse_xyz(&content, fallback)
        }
        Some("toml") => parse_molecule_toml(&content),
        _ => {
            return Err(CliError::Argument(format!(
                "unsupported molecule file '{}'; expected .xyz or .toml",
                path.display()
            )));
        }
    };
    parsed.map_err(|source| CliError::FileParsing {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses the XYZ format: an atom count, a comment line used as the molecule name, then one
/// `element x y z` line per atom.
pub fn parse_xyz(content: &str, fallback_name: &str) -> anyhow::Result<Molecule> {
    let mut lines = content.lines();
    let count: usize = lines
        .next()
        .context("file is empty")?
        .trim()
        .parse()
        .context("first line must be the atom count")?;
    let comment = lines.next().map(str::trim).unwrap_or_default();
    let name = if comment.is_empty() {
        fallback_name
    } else {
        comment
    };

    let mut atoms = Vec::new();
    for (i, line) in lines.filter(|l| !l.trim().is_empty()).take(count).enumerate() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [element, x, y, z, ..] = fields.as_slice() else {
            bail!("atom line {} needs an element and three coordinates", i + 1);
        };
        let coordinate = |s: &str| -> anyhow::Result<f64> {
            s.parse()
                .with_context(|| format!("atom line {}: invalid coordinate '{s}'", i + 1))
        };
        atoms.push(Atom::new(
            element,
            Point3::new(coordinate(*x)?, coordinate(*y)?, coordinate(*z)?),
        ));
    }
    if atoms.len() != count {
        bail!("expected {count} atoms, found {}", atoms.len());
    }

    debug!(name, atoms = atoms.len(), "Parsed XYZ molecule.");
    Molecule::builder(name)
        .atoms(atoms)
        .build()
        .map_err(|e| anyhow!(e))
}

pub fn parse_molecule_toml(content: &str) -> anyhow::Result<Molecule> {
    let file: MoleculeFile = toml::from_str(content)?;
    let mut builder = Molecule::builder(&file.name).atoms(file.atoms.into_iter().map(|a| {
        let [x, y, z] = a.position;
        let atom = Atom::new(&a.element, Point3::new(x, y, z));
        match a.mass {
            Some(mass) => atom.with_isotope_mass(mass),
            None => atom,
        }
    }));
    if let Some(formula) = &file.formula {
        builder = builder.formula(formula);
    }
    if let Some(linear) = file.linear {
        builder = builder.linear(linear);
    }
    if let Some(point_group) = &file.point_group {
        builder = builder.point_group(point_group);
    }
    builder.build().map_err(|e| anyhow!(e))
}
