use crate::core::library::elements;
use nalgebra::Point3;

/// Mass difference, in daltons, below which two atoms count as the same isotope.
const MASS_MATCH_TOLERANCE: f64 = 1e-6;

/// Represents an atom of a molecule with its element and Cartesian position.
///
/// Atoms are immutable once the owning molecule has been built. The optional isotope mass
/// overrides the standard atomic weight of the element; isotopically substituted atoms are
/// treated as a distinct species when matching atoms under symmetry operations.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol with canonical capitalization (e.g. "C", "Cl").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// Isotope mass in daltons, if the atom is not at natural abundance.
    pub isotope_mass: Option<f64>,
}

impl Atom {
    /// Creates a new `Atom` at natural isotopic abundance.
    ///
    /// The element symbol is canonicalized, so `"cl"`, `"CL"` and `"Cl"` are equivalent.
    ///
    /// # Arguments
    ///
    /// * `element` - The element symbol.
    /// * `position` - The 3D coordinates of the atom in Angstroms.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: elements::canonical_symbol(element),
            position,
            isotope_mass: None,
        }
    }

    /// Returns a copy of this atom carrying an explicit isotope mass.
    pub fn with_isotope_mass(mut self, mass: f64) -> Self {
        self.isotope_mass = Some(mass);
        self
    }

    /// Returns the mass used for the center of mass: the isotope mass if present, otherwise
    /// the standard atomic weight. `None` for unknown elements without an isotope mass.
    pub fn mass(&self) -> Option<f64> {
        self.isotope_mass
            .or_else(|| elements::standard_mass(&self.element))
    }

    /// Returns `true` if both atoms are the same element with the same effective mass.
    ///
    /// Only atoms of the same species may be exchanged by a symmetry operation.
    pub fn is_same_species(&self, other: &Atom) -> bool {
        if self.element != other.element {
            return false;
        }
        match (self.mass(), other.mass()) {
            (Some(a), Some(b)) => (a - b).abs() < MASS_MATCH_TOLERANCE,
            (None, None) => true,
            _ => false,
        }
    }
}
