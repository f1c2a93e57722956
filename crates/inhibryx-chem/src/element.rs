//! Element data: symbols, atomic numbers, masses, default valences.

/// Static element record.
#[derive(Debug, Clone, Copy)]
pub struct Element {
    pub symbol: &'static str,
    pub atomic_number: u8,
    /// Standard (average) atomic weight.
    pub mass: f64,
    /// Monoisotopic mass of the most abundant isotope.
    pub exact_mass: f64,
    /// Default valences in ascending order; empty for metals and
    /// anything else that never carries implicit hydrogens.
    pub valences: &'static [u8],
}

/// Elements the SMILES parser accepts. Covers the organic subset plus
/// the counter-ion elements common in pharmaceutical salts.
pub const ELEMENTS: &[Element] = &[
    Element { symbol: "H",  atomic_number: 1,  mass: 1.008,   exact_mass: 1.007825,   valences: &[1] },
    Element { symbol: "B",  atomic_number: 5,  mass: 10.811,  exact_mass: 11.009305,  valences: &[3] },
    Element { symbol: "C",  atomic_number: 6,  mass: 12.011,  exact_mass: 12.0,       valences: &[4] },
    Element { symbol: "N",  atomic_number: 7,  mass: 14.007,  exact_mass: 14.003074,  valences: &[3, 5] },
    Element { symbol: "O",  atomic_number: 8,  mass: 15.999,  exact_mass: 15.994915,  valences: &[2] },
    Element { symbol: "F",  atomic_number: 9,  mass: 18.998,  exact_mass: 18.998403,  valences: &[1] },
    Element { symbol: "Na", atomic_number: 11, mass: 22.990,  exact_mass: 22.989770,  valences: &[] },
    Element { symbol: "Mg", atomic_number: 12, mass: 24.305,  exact_mass: 23.985042,  valences: &[] },
    Element { symbol: "Si", atomic_number: 14, mass: 28.086,  exact_mass: 27.976927,  valences: &[4] },
    Element { symbol: "P",  atomic_number: 15, mass: 30.974,  exact_mass: 30.973762,  valences: &[3, 5] },
    Element { symbol: "S",  atomic_number: 16, mass: 32.066,  exact_mass: 31.972071,  valences: &[2, 4, 6] },
    Element { symbol: "Cl", atomic_number: 17, mass: 35.453,  exact_mass: 34.968853,  valences: &[1] },
    Element { symbol: "K",  atomic_number: 19, mass: 39.098,  exact_mass: 38.963707,  valences: &[] },
    Element { symbol: "Ca", atomic_number: 20, mass: 40.078,  exact_mass: 39.962591,  valences: &[] },
    Element { symbol: "Fe", atomic_number: 26, mass: 55.845,  exact_mass: 55.934942,  valences: &[] },
    Element { symbol: "Zn", atomic_number: 30, mass: 65.38,   exact_mass: 63.929147,  valences: &[] },
    Element { symbol: "Se", atomic_number: 34, mass: 78.971,  exact_mass: 79.916522,  valences: &[2, 4, 6] },
    Element { symbol: "Br", atomic_number: 35, mass: 79.904,  exact_mass: 78.918338,  valences: &[1] },
    Element { symbol: "I",  atomic_number: 53, mass: 126.904, exact_mass: 126.904468, valences: &[1] },
    Element { symbol: "Li", atomic_number: 3,  mass: 6.941,   exact_mass: 7.016004,   valences: &[] },
];

/// Look up an element by its symbol (case-sensitive).
pub fn element_by_symbol(symbol: &str) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.symbol == symbol)
}

/// Look up an element by atomic number.
pub fn element_by_number(atomic_number: u8) -> Option<&'static Element> {
    ELEMENTS.iter().find(|e| e.atomic_number == atomic_number)
}

/// Number of valence electrons for the neutral atom, by main group.
pub fn valence_electrons(atomic_number: u8) -> u32 {
    match atomic_number {
        1 => 1,
        3 | 11 | 19 => 1,
        12 | 20 => 2,
        5 => 3,
        6 | 14 => 4,
        7 | 15 => 5,
        8 | 16 | 34 => 6,
        9 | 17 | 35 | 53 => 7,
        26 => 8,
        30 => 12,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_symbol() {
        assert_eq!(element_by_symbol("Cl").unwrap().atomic_number, 17);
        assert_eq!(element_by_symbol("C").unwrap().valences, &[4]);
        assert!(element_by_symbol("Xx").is_none());
    }

    #[test]
    fn test_lookup_by_number() {
        assert_eq!(element_by_number(8).unwrap().symbol, "O");
    }

    #[test]
    fn test_carbon_mass() {
        let c = element_by_symbol("C").unwrap();
        assert!((c.mass - 12.011).abs() < 1e-9);
        assert!((c.exact_mass - 12.0).abs() < 1e-9);
    }
}
