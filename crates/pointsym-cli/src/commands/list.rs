use crate::error::Result;
use pointsym::core::chartab::catalog::catalog;
use pointsym::core::library::{assignments, molecules};
use pointsym::engine::error::AnalysisError;

pub async fn run() -> Result<()> {
    println!("{:<24} {:<10} {:>5}  Point group", "Molecule", "Formula", "Atoms");
    for entry in molecules::all() {
        let molecule = entry.build().map_err(AnalysisError::from)?;
        println!(
            "{:<24} {:<10} {:>5}  {}",
            entry.name,
            molecule.formula(),
            molecule.atom_count(),
            assignments::point_group_for(entry.name).unwrap_or("-")
        );
    }
    println!();
    println!(
        "Supported point groups: {}",
        catalog().ids().collect::<Vec<_>>().join(", ")
    );
    Ok(())
}
