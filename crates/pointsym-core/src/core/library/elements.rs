use phf::{Map, phf_map};

/// Standard atomic weights (daltons) of the elements that occur in small molecules.
static STANDARD_MASSES: Map<&'static str, f64> = phf_map! {
    "H" => 1.008,
    "He" => 4.0026,
    "Li" => 6.94,
    "Be" => 9.0122,
    "B" => 10.811,
    "C" => 12.011,
    "N" => 14.007,
    "O" => 15.999,
    "F" => 18.998,
    "Ne" => 20.180,
    "Na" => 22.990,
    "Mg" => 24.305,
    "Al" => 26.982,
    "Si" => 28.086,
    "P" => 30.974,
    "S" => 32.065,
    "Cl" => 35.453,
    "Ar" => 39.948,
    "K" => 39.098,
    "Ca" => 40.078,
    "Ge" => 72.630,
    "As" => 74.922,
    "Se" => 78.971,
    "Br" => 79.904,
    "Kr" => 83.798,
    "Sn" => 118.71,
    "Sb" => 121.76,
    "Te" => 127.60,
    "I" => 126.90,
    "Xe" => 131.29,
    "U" => 238.03,
};

/// Canonicalizes an element symbol: first letter uppercase, the rest lowercase.
pub fn canonical_symbol(symbol: &str) -> String {
    let trimmed = symbol.trim();
    let mut chars = trimmed.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Returns the standard atomic weight of an element, if known.
pub fn standard_mass(symbol: &str) -> Option<f64> {
    STANDARD_MASSES.get(symbol).copied()
}

/// Returns `true` if the symbol names an element with a known standard weight.
pub fn is_known(symbol: &str) -> bool {
    STANDARD_MASSES.contains_key(symbol)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_symbol_fixes_capitalization() {
        assert_eq!(canonical_symbol("cl"), "Cl");
        assert_eq!(canonical_symbol("CL"), "Cl");
        assert_eq!(canonical_symbol(" h "), "H");
        assert_eq!(canonical_symbol(""), "");
    }

    #[test]
    fn standard_mass_returns_known_weights() {
        assert_eq!(standard_mass("C"), Some(12.011));
        assert_eq!(standard_mass("Cl"), Some(35.453));
        assert_eq!(standard_mass("cl"), None);
        assert!(is_known("Xe"));
        assert!(!is_known("Zz"));
    }
}
