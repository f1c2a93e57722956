//! Morgan (ECFP) circular fingerprints.
//!
//! Radius-2, 2048-bit fingerprints in the Morgan/ECFP scheme: every atom
//! starts from an invariant of its immediate properties, then grows its
//! environment one bond shell per iteration; each environment identifier
//! from every iteration is folded into the bit vector. Exposed as 2048
//! named binary features `Morgan_1`..`Morgan_2048` in positional order.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashSet;
use std::hash::{Hash, Hasher};

use crate::molecule::{BondOrder, Molecule};
use crate::ring;

pub const FINGERPRINT_BITS: usize = 2048;
pub const RADIUS: usize = 2;

/// Compute the fingerprint as named binary features, salt-stripping
/// first. Always exactly `FINGERPRINT_BITS` entries, each 0 or 1, in
/// fixed `Morgan_1`..`Morgan_2048` order.
pub fn compute(molecule: &Molecule) -> Vec<(String, u8)> {
    let bits = bit_vector(&molecule.strip_salts());
    bits.iter()
        .enumerate()
        .map(|(i, &on)| (format!("Morgan_{}", i + 1), on))
        .collect()
}

/// Raw bit vector of the radius-2 Morgan fingerprint.
pub fn bit_vector(mol: &Molecule) -> Vec<u8> {
    let mut bits = vec![0u8; FINGERPRINT_BITS];
    let rings = ring::perceive(mol);

    // Iteration 0: atom invariants.
    let mut invariants: Vec<u64> = (0..mol.atom_count())
        .map(|i| {
            let atom = &mol.atoms[i];
            hash_tuple(&[
                atom.atomic_number as u64,
                mol.degree(i) as u64,
                atom.hydrogens() as u64,
                (atom.formal_charge as i64 + 8) as u64,
                atom.is_aromatic as u64,
                rings.atom_in_ring[i] as u64,
            ])
        })
        .collect();

    let mut seen: HashSet<u64> = HashSet::new();
    for &inv in &invariants {
        seen.insert(inv);
        set_bit(&mut bits, inv);
    }

    // Iterations 1..=RADIUS: mix in sorted neighbor environments.
    for _ in 0..RADIUS {
        let mut next = Vec::with_capacity(invariants.len());
        for i in 0..mol.atom_count() {
            let mut env: Vec<(u64, u64)> = mol.adjacency[i]
                .iter()
                .map(|&(nb, bi)| (bond_code(mol.bonds[bi].order), invariants[nb]))
                .collect();
            env.sort_unstable();

            let mut parts = vec![invariants[i]];
            for (code, inv) in env {
                parts.push(code);
                parts.push(inv);
            }
            next.push(hash_tuple(&parts));
        }
        invariants = next;
        for &inv in &invariants {
            if seen.insert(inv) {
                set_bit(&mut bits, inv);
            }
        }
    }

    bits
}

fn bond_code(order: BondOrder) -> u64 {
    match order {
        BondOrder::Single => 1,
        BondOrder::Double => 2,
        BondOrder::Triple => 3,
        BondOrder::Aromatic => 4,
    }
}

fn hash_tuple(parts: &[u64]) -> u64 {
    let mut hasher = DefaultHasher::new();
    parts.hash(&mut hasher);
    hasher.finish()
}

fn set_bit(bits: &mut [u8], identifier: u64) {
    bits[(identifier % FINGERPRINT_BITS as u64) as usize] = 1;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Molecule;

    #[test]
    fn test_exactly_2048_named_binary_features() {
        let mol = Molecule::parse("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let fp = compute(&mol);
        assert_eq!(fp.len(), 2048);
        assert_eq!(fp[0].0, "Morgan_1");
        assert_eq!(fp[2047].0, "Morgan_2048");
        assert!(fp.iter().all(|(_, v)| *v == 0 || *v == 1));
    }

    #[test]
    fn test_name_order_is_positional() {
        let mol = Molecule::parse("CCO").unwrap();
        let fp = compute(&mol);
        for (i, (name, _)) in fp.iter().enumerate() {
            assert_eq!(name, &format!("Morgan_{}", i + 1));
        }
    }

    #[test]
    fn test_deterministic_across_calls() {
        let mol = Molecule::parse("c1ccc2ccccc2c1").unwrap();
        assert_eq!(compute(&mol), compute(&mol));
    }

    #[test]
    fn test_some_bits_set_for_nontrivial_molecule() {
        let mol = Molecule::parse("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let on = compute(&mol).iter().filter(|(_, v)| *v == 1).count();
        assert!(on > 5, "expected several bits set, got {}", on);
        assert!(on < 2048);
    }

    #[test]
    fn test_different_molecules_differ() {
        let a = compute(&Molecule::parse("CCO").unwrap());
        let b = compute(&Molecule::parse("c1ccccc1").unwrap());
        assert_ne!(a, b);
    }

    #[test]
    fn test_salt_does_not_change_fingerprint() {
        let plain = compute(&Molecule::parse("CCO").unwrap());
        let salted = compute(&Molecule::parse("CCO.[Na+].[Cl-]").unwrap());
        assert_eq!(plain, salted);
    }
}
