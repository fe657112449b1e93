use super::assignments::normalize_name;
use crate::core::models::atom::Atom;
use crate::core::models::molecule::{Molecule, MoleculeError};
use nalgebra::Point3;

/// A built-in molecule with an idealized equilibrium geometry (Angstroms).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LibraryMolecule {
    pub name: &'static str,
    /// Alternative names and formulas accepted by [`find`].
    pub aliases: &'static [&'static str],
    pub atoms: &'static [(&'static str, [f64; 3])],
}

impl LibraryMolecule {
    pub fn build(&self) -> Result<Molecule, MoleculeError> {
        Molecule::builder(self.name)
            .atoms(
                self.atoms
                    .iter()
                    .map(|(element, [x, y, z])| Atom::new(element, Point3::new(*x, *y, *z))),
            )
            .build()
    }

    fn matches(&self, key: &str) -> bool {
        normalize_name(self.name) == key || self.aliases.iter().any(|a| normalize_name(a) == key)
    }
}

static LIBRARY: &[LibraryMolecule] = &[
    LibraryMolecule {
        name: "Water",
        aliases: &["H2O"],
        atoms: &[
            ("O", [0.0, 0.0, 0.1173]),
            ("H", [0.0, 0.7572, -0.4692]),
            ("H", [0.0, -0.7572, -0.4692]),
        ],
    },
    LibraryMolecule {
        name: "Ammonia",
        aliases: &["NH3"],
        atoms: &[
            ("N", [0.0, 0.0, 0.1162]),
            ("H", [0.9377, 0.0, -0.2711]),
            ("H", [-0.46885, 0.812072, -0.2711]),
            ("H", [-0.46885, -0.812072, -0.2711]),
        ],
    },
    LibraryMolecule {
        name: "Methane",
        aliases: &["CH4"],
        atoms: &[
            ("C", [0.0, 0.0, 0.0]),
            ("H", [0.6291, 0.6291, 0.6291]),
            ("H", [0.6291, -0.6291, -0.6291]),
            ("H", [-0.6291, 0.6291, -0.6291]),
            ("H", [-0.6291, -0.6291, 0.6291]),
        ],
    },
    LibraryMolecule {
        name: "Hydrogen Fluoride",
        aliases: &["HF"],
        atoms: &[
            ("H", [0.0, 0.0, 0.0]),
            ("F", [0.0, 0.0, 0.9168]),
        ],
    },
    LibraryMolecule {
        name: "Hydrogen Cyanide",
        aliases: &["HCN"],
        atoms: &[
            ("H", [0.0, 0.0, -1.064]),
            ("C", [0.0, 0.0, 0.0]),
            ("N", [0.0, 0.0, 1.156]),
        ],
    },
    LibraryMolecule {
        name: "Carbon Dioxide",
        aliases: &["CO2"],
        atoms: &[
            ("C", [0.0, 0.0, 0.0]),
            ("O", [0.0, 0.0, 1.16]),
            ("O", [0.0, 0.0, -1.16]),
        ],
    },
    LibraryMolecule {
        name: "Acetylene",
        aliases: &["Ethyne", "C2H2"],
        atoms: &[
            ("C", [0.0, 0.0, 0.6015]),
            ("C", [0.0, 0.0, -0.6015]),
            ("H", [0.0, 0.0, 1.6615]),
            ("H", [0.0, 0.0, -1.6615]),
        ],
    },
    LibraryMolecule {
        name: "Cyanogen",
        aliases: &["C2N2"],
        atoms: &[
            ("C", [0.0, 0.0, 0.69]),
            ("C", [0.0, 0.0, -0.69]),
            ("N", [0.0, 0.0, 1.844]),
            ("N", [0.0, 0.0, -1.844]),
        ],
    },
    LibraryMolecule {
        name: "Sulfur Dioxide",
        aliases: &["SO2"],
        atoms: &[
            ("S", [0.0, 0.0, 0.0]),
            ("O", [0.0, 1.2349, -0.7226]),
            ("O", [0.0, -1.2349, -0.7226]),
        ],
    },
    LibraryMolecule {
        name: "Formaldehyde",
        aliases: &["Methanal", "H2CO", "CH2O"],
        atoms: &[
            ("C", [0.0, 0.0, 0.0]),
            ("O", [0.0, 0.0, 1.205]),
            ("H", [0.0, 0.9429, -0.5876]),
            ("H", [0.0, -0.9429, -0.5876]),
        ],
    },
    LibraryMolecule {
        name: "Boron Trifluoride",
        aliases: &["BF3"],
        atoms: &[
            ("B", [0.0, 0.0, 0.0]),
            ("F", [1.307, 0.0, 0.0]),
            ("F", [-0.6535, 1.131895, 0.0]),
            ("F", [-0.6535, -1.131895, 0.0]),
        ],
    },
    LibraryMolecule {
        name: "Carbon Tetrachloride",
        aliases: &["CCl4"],
        atoms: &[
            ("C", [0.0, 0.0, 0.0]),
            ("Cl", [1.0219, 1.0219, 1.0219]),
            ("Cl", [1.0219, -1.0219, -1.0219]),
            ("Cl", [-1.0219, 1.0219, -1.0219]),
            ("Cl", [-1.0219, -1.0219, 1.0219]),
        ],
    },
    LibraryMolecule {
        name: "Chloroform",
        aliases: &["Trichloromethane", "CHCl3"],
        atoms: &[
            ("C", [0.0, 0.0, 0.0]),
            ("H", [0.0, 0.0, 1.073]),
            ("Cl", [1.6843, 0.0, -0.5342]),
            ("Cl", [-0.84215, 1.458647, -0.5342]),
            ("Cl", [-0.84215, -1.458647, -0.5342]),
        ],
    },
    LibraryMolecule {
        name: "Ethylene",
        aliases: &["Ethene", "C2H4"],
        atoms: &[
            ("C", [0.0, 0.0, 0.6695]),
            ("C", [0.0, 0.0, -0.6695]),
            ("H", [0.0, 0.9289, 1.2321]),
            ("H", [0.0, -0.9289, 1.2321]),
            ("H", [0.0, 0.9289, -1.2321]),
            ("H", [0.0, -0.9289, -1.2321]),
        ],
    },
    LibraryMolecule {
        name: "Allene",
        aliases: &["Propadiene"],
        atoms: &[
            ("C", [0.0, 0.0, 0.0]),
            ("C", [0.0, 0.0, 1.3082]),
            ("C", [0.0, 0.0, -1.3082]),
            ("H", [0.659427, 0.659427, 1.86645]),
            ("H", [-0.659427, -0.659427, 1.86645]),
            ("H", [0.659427, -0.659427, -1.86645]),
            ("H", [-0.659427, 0.659427, -1.86645]),
        ],
    },
    LibraryMolecule {
        name: "Sulfur Hexafluoride",
        aliases: &["SF6"],
        atoms: &[
            ("S", [0.0, 0.0, 0.0]),
            ("F", [1.561, 0.0, 0.0]),
            ("F", [-1.561, 0.0, 0.0]),
            ("F", [0.0, 1.561, 0.0]),
            ("F", [0.0, -1.561, 0.0]),
            ("F", [0.0, 0.0, 1.561]),
            ("F", [0.0, 0.0, -1.561]),
        ],
    },
    LibraryMolecule {
        name: "Benzene",
        aliases: &["C6H6"],
        atoms: &[
            ("C", [1.397, 0.0, 0.0]),
            ("C", [0.6985, 1.209837, 0.0]),
            ("C", [-0.6985, 1.209837, 0.0]),
            ("C", [-1.397, 0.0, 0.0]),
            ("C", [-0.6985, -1.209837, 0.0]),
            ("C", [0.6985, -1.209837, 0.0]),
            ("H", [2.481, 0.0, 0.0]),
            ("H", [1.2405, 2.148609, 0.0]),
            ("H", [-1.2405, 2.148609, 0.0]),
            ("H", [-2.481, 0.0, 0.0]),
            ("H", [-1.2405, -2.148609, 0.0]),
            ("H", [1.2405, -2.148609, 0.0]),
        ],
    },
    LibraryMolecule {
        name: "Hydrogen Peroxide",
        aliases: &["H2O2"],
        atoms: &[
            ("O", [0.0, 0.7375, -0.0583]),
            ("O", [0.0, -0.7375, -0.0583]),
            ("H", [0.8986, 0.8549, 0.4665]),
            ("H", [-0.8986, -0.8549, 0.4665]),
        ],
    },
    LibraryMolecule {
        name: "trans-Dichloroethylene",
        aliases: &["trans-1,2-Dichloroethene"],
        atoms: &[
            ("C", [0.665, 0.0, 0.0]),
            ("C", [-0.665, 0.0, 0.0]),
            ("Cl", [1.516, 1.464, 0.0]),
            ("Cl", [-1.516, -1.464, 0.0]),
            ("H", [1.235, -0.922, 0.0]),
            ("H", [-1.235, 0.922, 0.0]),
        ],
    },
    LibraryMolecule {
        name: "Ethane (staggered)",
        aliases: &["Ethane", "C2H6"],
        atoms: &[
            ("C", [0.0, 0.0, 0.768]),
            ("C", [0.0, 0.0, -0.768]),
            ("H", [0.0, 1.02001, 1.16354]),
            ("H", [-0.883355, -0.510005, 1.16354]),
            ("H", [0.883355, -0.510005, 1.16354]),
            ("H", [0.0, -1.02001, -1.16354]),
            ("H", [0.883355, 0.510005, -1.16354]),
            ("H", [-0.883355, 0.510005, -1.16354]),
        ],
    },
    LibraryMolecule {
        name: "Xenon Tetrafluoride",
        aliases: &["XeF4"],
        atoms: &[
            ("Xe", [0.0, 0.0, 0.0]),
            ("F", [1.95, 0.0, 0.0]),
            ("F", [-1.95, 0.0, 0.0]),
            ("F", [0.0, 1.95, 0.0]),
            ("F", [0.0, -1.95, 0.0]),
        ],
    },
    LibraryMolecule {
        name: "Hypochlorous Acid",
        aliases: &["HOCl"],
        atoms: &[
            ("O", [0.0, 0.0, 0.0]),
            ("H", [0.964, 0.0, 0.0]),
            ("Cl", [-0.3658, 1.64994, 0.0]),
        ],
    },
];

/// Every built-in molecule, in display order.
pub fn all() -> &'static [LibraryMolecule] {
    LIBRARY
}

/// Finds a built-in molecule by name, alias or formula, ignoring case and punctuation.
pub fn find(name: &str) -> Option<&'static LibraryMolecule> {
    let key = normalize_name(name);
    LIBRARY.iter().find(|m| m.matches(&key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_entry_builds() {
        for entry in all() {
            let molecule = entry.build().unwrap();
            assert_eq!(molecule.atom_count(), entry.atoms.len(), "{}", entry.name);
        }
    }

    #[test]
    fn names_and_aliases_are_unique() {
        let mut seen = HashSet::new();
        for entry in all() {
            for key in std::iter::once(&entry.name).chain(entry.aliases) {
                assert!(seen.insert(normalize_name(key)), "duplicate key {key}");
            }
        }
    }

    #[test]
    fn find_accepts_names_aliases_and_formulas() {
        assert_eq!(find("water").unwrap().name, "Water");
        assert_eq!(find("H2O").unwrap().name, "Water");
        assert_eq!(find("sulfur-hexafluoride").unwrap().name, "Sulfur Hexafluoride");
        assert_eq!(find("ethane").unwrap().name, "Ethane (staggered)");
        assert!(find("unobtainium").is_none());
    }

    #[test]
    fn linear_molecules_are_detected() {
        let linear: Vec<&str> = all()
            .iter()
            .filter(|e| e.build().unwrap().is_linear())
            .map(|e| e.name)
            .collect();
        assert_eq!(
            linear,
            [
                "Hydrogen Fluoride",
                "Hydrogen Cyanide",
                "Carbon Dioxide",
                "Acetylene",
                "Cyanogen"
            ]
        );
    }

    #[test]
    fn formulas_follow_hill_order() {
        assert_eq!(find("chloroform").unwrap().build().unwrap().formula(), "CHCl3");
        assert_eq!(find("benzene").unwrap().build().unwrap().formula(), "C6H6");
        assert_eq!(find("xef4").unwrap().build().unwrap().formula(), "F4Xe");
    }
}
