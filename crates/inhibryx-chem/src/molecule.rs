//! Molecular graph representation.

use std::collections::BTreeMap;

use inhibryx_common::{InhibryxError, Result};

use crate::element::{element_by_number, element_by_symbol};
use crate::smiles;

/// Bond order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BondOrder {
    Single,
    Double,
    Triple,
    Aromatic,
}

impl BondOrder {
    /// Numeric bond order for valence calculations.
    pub fn as_f64(self) -> f64 {
        match self {
            BondOrder::Single => 1.0,
            BondOrder::Double => 2.0,
            BondOrder::Triple => 3.0,
            BondOrder::Aromatic => 1.5,
        }
    }
}

/// An atom in a molecular graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Atom {
    pub atomic_number: u8,
    pub formal_charge: i8,
    pub isotope: Option<u16>,
    pub is_aromatic: bool,
    /// Hydrogen count fixed by a bracket atom (`[NH2+]`), if any.
    pub explicit_hydrogens: Option<u8>,
    /// Hydrogens assigned from default valences after parsing.
    pub implicit_hydrogens: u8,
}

impl Atom {
    /// Total hydrogens attached to this atom.
    pub fn hydrogens(&self) -> u8 {
        self.explicit_hydrogens.unwrap_or(self.implicit_hydrogens)
    }
}

/// A bond between two atoms.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Bond {
    pub atom1: usize,
    pub atom2: usize,
    pub order: BondOrder,
}

/// A molecular graph with atoms, bonds, and adjacency information.
#[derive(Debug, Clone)]
pub struct Molecule {
    smiles: String,
    pub atoms: Vec<Atom>,
    pub bonds: Vec<Bond>,
    /// adjacency[atom_idx] = Vec<(neighbor_atom_idx, bond_idx)>
    pub adjacency: Vec<Vec<(usize, usize)>>,
}

impl Molecule {
    /// Parse a SMILES string. Fails closed with `InvalidInput` for
    /// anything the parser cannot interpret.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(InhibryxError::InvalidInput("empty SMILES".to_string()));
        }
        let (atoms, bonds) = smiles::parse(trimmed)?;
        Ok(Self::from_parts(trimmed.to_string(), atoms, bonds))
    }

    /// Whether a SMILES string parses. Never panics, never propagates.
    pub fn validate(input: &str) -> bool {
        Molecule::parse(input).is_ok()
    }

    pub(crate) fn from_parts(smiles: String, atoms: Vec<Atom>, bonds: Vec<Bond>) -> Self {
        let mut adjacency = vec![Vec::new(); atoms.len()];
        for (bi, bond) in bonds.iter().enumerate() {
            adjacency[bond.atom1].push((bond.atom2, bi));
            adjacency[bond.atom2].push((bond.atom1, bi));
        }
        let mut mol = Self { smiles, atoms, bonds, adjacency };
        mol.assign_implicit_hydrogens();
        mol
    }

    pub fn smiles(&self) -> &str {
        &self.smiles
    }

    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn bond_count(&self) -> usize {
        self.bonds.len()
    }

    /// Heavy-atom degree of an atom.
    pub fn degree(&self, idx: usize) -> usize {
        self.adjacency[idx].len()
    }

    /// Sum of bond orders at an atom (aromatic bonds count 1.5).
    pub fn bond_order_sum(&self, idx: usize) -> f64 {
        self.adjacency[idx]
            .iter()
            .map(|&(_, bi)| self.bonds[bi].order.as_f64())
            .sum()
    }

    /// Assign implicit hydrogens from default valences. Bracket atoms
    /// keep their explicit count; metals and unknown valence states get
    /// none.
    fn assign_implicit_hydrogens(&mut self) {
        for idx in 0..self.atoms.len() {
            if self.atoms[idx].explicit_hydrogens.is_some() {
                self.atoms[idx].implicit_hydrogens = 0;
                continue;
            }
            let used = self.bond_order_sum(idx).ceil() as u8;
            let implicit = match element_by_number(self.atoms[idx].atomic_number) {
                Some(el) => el
                    .valences
                    .iter()
                    .find(|&&v| v >= used)
                    .map(|&v| v - used)
                    .unwrap_or(0),
                None => 0,
            };
            self.atoms[idx].implicit_hydrogens = implicit;
        }
    }

    /// Average molecular weight including hydrogens.
    pub fn molecular_weight(&self) -> f64 {
        let h_mass = element_by_symbol("H").map(|e| e.mass).unwrap_or(1.008);
        self.atoms
            .iter()
            .map(|a| {
                let atom_mass = element_by_number(a.atomic_number).map(|e| e.mass).unwrap_or(0.0);
                atom_mass + a.hydrogens() as f64 * h_mass
            })
            .sum()
    }

    /// Monoisotopic molecular weight.
    pub fn exact_molecular_weight(&self) -> f64 {
        let h_mass = element_by_symbol("H").map(|e| e.exact_mass).unwrap_or(1.007825);
        self.atoms
            .iter()
            .map(|a| {
                let atom_mass =
                    element_by_number(a.atomic_number).map(|e| e.exact_mass).unwrap_or(0.0);
                atom_mass + a.hydrogens() as f64 * h_mass
            })
            .sum()
    }

    /// Hill-order molecular formula of the heavy atoms plus hydrogens.
    pub fn formula(&self) -> String {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut hydrogens = 0usize;
        for atom in &self.atoms {
            let symbol = element_by_number(atom.atomic_number).map(|e| e.symbol).unwrap_or("?");
            *counts.entry(symbol).or_insert(0) += 1;
            hydrogens += atom.hydrogens() as usize;
        }

        let mut out = String::new();
        let mut push = |sym: &str, n: usize, out: &mut String| {
            if n == 1 {
                out.push_str(sym);
            } else if n > 1 {
                out.push_str(&format!("{}{}", sym, n));
            }
        };

        if let Some(&c) = counts.get("C") {
            push("C", c, &mut out);
            push("H", hydrogens, &mut out);
            counts.remove("C");
        } else {
            push("H", hydrogens, &mut out);
        }
        for (sym, n) in counts {
            push(sym, n, &mut out);
        }
        out
    }

    /// Split into connected components, one `Molecule` per fragment.
    /// Fragment SMILES are inherited from the parent, so fragments are
    /// only meaningful as computation inputs, not for display.
    pub fn fragments(&self) -> Vec<Molecule> {
        let n = self.atoms.len();
        let mut component = vec![usize::MAX; n];
        let mut count = 0;
        for start in 0..n {
            if component[start] != usize::MAX {
                continue;
            }
            let mut stack = vec![start];
            component[start] = count;
            while let Some(curr) = stack.pop() {
                for &(nb, _) in &self.adjacency[curr] {
                    if component[nb] == usize::MAX {
                        component[nb] = count;
                        stack.push(nb);
                    }
                }
            }
            count += 1;
        }

        if count <= 1 {
            return vec![self.clone()];
        }

        (0..count)
            .map(|c| {
                let mut remap = vec![usize::MAX; n];
                let mut atoms = Vec::new();
                for (i, atom) in self.atoms.iter().enumerate() {
                    if component[i] == c {
                        remap[i] = atoms.len();
                        atoms.push(atom.clone());
                    }
                }
                let bonds = self
                    .bonds
                    .iter()
                    .filter(|b| component[b.atom1] == c)
                    .map(|b| Bond { atom1: remap[b.atom1], atom2: remap[b.atom2], order: b.order })
                    .collect();
                Molecule::from_parts(self.smiles.clone(), atoms, bonds)
            })
            .collect()
    }

    /// Remove counter-ion/salt fragments, keeping the parent species.
    /// If every fragment matches the salt table, the largest fragment
    /// is kept so stripping never removes the whole structure.
    pub fn strip_salts(&self) -> Molecule {
        let fragments = self.fragments();
        if fragments.len() <= 1 {
            return self.clone();
        }

        let kept: Vec<&Molecule> = fragments.iter().filter(|f| !is_salt_fragment(f)).collect();
        match kept.len() {
            0 => fragments
                .iter()
                .max_by_key(|f| f.atom_count())
                .cloned()
                .unwrap_or_else(|| self.clone()),
            1 => kept[0].clone(),
            _ => {
                // Several non-salt fragments: rebuild a molecule holding all of them.
                let mut atoms = Vec::new();
                let mut bonds = Vec::new();
                for frag in &kept {
                    let offset = atoms.len();
                    atoms.extend(frag.atoms.iter().cloned());
                    bonds.extend(frag.bonds.iter().map(|b| Bond {
                        atom1: b.atom1 + offset,
                        atom2: b.atom2 + offset,
                        order: b.order,
                    }));
                }
                Molecule::from_parts(self.smiles.clone(), atoms, bonds)
            }
        }
    }

    pub fn heavy_atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn total_hydrogens(&self) -> usize {
        self.atoms.iter().map(|a| a.hydrogens() as usize).sum()
    }
}

/// Small salt/counter-ion fragments, identified by molecular formula.
const SALT_FORMULAS: &[&str] = &[
    "HCl", "HBr", "HI", "HF",      // hydrohalides
    "H2O", "H3N", "H4N",           // water, ammonia, ammonium
    "HNO3", "NO3",                 // nitrate
    "H2O4S", "O4S",                // sulfate
    "H3O4P", "O4P",                // phosphate
    "C2H4O2", "C2H3O2",            // acetate
    "CH4O3S", "CH3O3S",            // mesylate
    "C2H2O4", "C2HO4",             // oxalate
    "C4H4O4", "C4H3O4",            // maleate / fumarate
    "C4H6O6", "C4H5O6",            // tartrate
];

fn is_salt_fragment(fragment: &Molecule) -> bool {
    if fragment.atom_count() == 1 {
        // Bare halide, alkali/alkaline-earth ion, water, ammonia.
        return matches!(
            fragment.atoms[0].atomic_number,
            3 | 7 | 8 | 9 | 11 | 12 | 17 | 19 | 20 | 30 | 35 | 53
        );
    }
    SALT_FORMULAS.contains(&fragment.formula().as_str())
}
