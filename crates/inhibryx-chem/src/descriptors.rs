//! Physicochemical descriptors.
//!
//! A fixed, named descriptor set computed from the molecular graph.
//! Salt fragments are stripped before computation. The `Ipc` graph
//! information index is computed internally but excluded from the
//! returned table: it grows without bound for large molecules and
//! poisons downstream scaling.

use std::collections::VecDeque;

use crate::element::valence_electrons;
use crate::molecule::{BondOrder, Molecule};
use crate::ring::{self, RingInfo};

/// Names of the returned descriptors, in output order.
pub const DESCRIPTOR_NAMES: &[&str] = &[
    "MolWt",
    "ExactMolWt",
    "HeavyAtomMolWt",
    "HeavyAtomCount",
    "NumValenceElectrons",
    "NumHAcceptors",
    "NumHDonors",
    "NHOHCount",
    "NOCount",
    "NumHeteroatoms",
    "NumRotatableBonds",
    "RingCount",
    "NumAromaticRings",
    "NumAliphaticRings",
    "FractionCSP3",
    "TPSA",
    "MolLogP",
    "MolMR",
    "BalabanJ",
    "Chi0",
    "Chi1",
];

/// Compute the full descriptor table for a molecule. Counter-ion
/// fragments are stripped first; `Ipc` never appears in the output.
pub fn compute(molecule: &Molecule) -> Vec<(String, f64)> {
    let mol = molecule.strip_salts();
    let rings = ring::perceive(&mol);
    let (logp, mr) = crippen(&mol);

    let values: Vec<f64> = vec![
        mol.molecular_weight(),
        mol.exact_molecular_weight(),
        heavy_atom_mol_wt(&mol),
        mol.heavy_atom_count() as f64,
        num_valence_electrons(&mol) as f64,
        num_h_acceptors(&mol) as f64,
        num_h_donors(&mol) as f64,
        nhoh_count(&mol) as f64,
        no_count(&mol) as f64,
        num_heteroatoms(&mol) as f64,
        num_rotatable_bonds(&mol, &rings) as f64,
        rings.ring_count() as f64,
        rings.aromatic_ring_count(&mol) as f64,
        rings.aliphatic_ring_count(&mol) as f64,
        fraction_csp3(&mol),
        tpsa(&mol),
        logp,
        mr,
        balaban_j(&mol),
        chi0(&mol),
        chi1(&mol),
    ];

    DESCRIPTOR_NAMES
        .iter()
        .map(|s| s.to_string())
        .zip(values)
        .collect()
}

fn heavy_atom_mol_wt(mol: &Molecule) -> f64 {
    let h_mass = 1.008;
    mol.molecular_weight() - mol.total_hydrogens() as f64 * h_mass
}

fn num_valence_electrons(mol: &Molecule) -> i64 {
    let heavy: i64 = mol
        .atoms
        .iter()
        .map(|a| valence_electrons(a.atomic_number) as i64 - a.formal_charge as i64)
        .sum();
    heavy + mol.total_hydrogens() as i64
}

/// Lipinski-style acceptor count: every N and O.
fn num_h_acceptors(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| matches!(a.atomic_number, 7 | 8))
        .count()
}

/// Lipinski-style donor count: every N or O carrying at least one H.
fn num_h_donors(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| matches!(a.atomic_number, 7 | 8) && a.hydrogens() > 0)
        .count()
}

fn nhoh_count(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| matches!(a.atomic_number, 7 | 8))
        .map(|a| a.hydrogens() as usize)
        .sum()
}

fn no_count(mol: &Molecule) -> usize {
    num_h_acceptors(mol)
}

fn num_heteroatoms(mol: &Molecule) -> usize {
    mol.atoms
        .iter()
        .filter(|a| !matches!(a.atomic_number, 1 | 6))
        .count()
}

/// Non-ring single bonds between two non-terminal heavy atoms. Amide
/// C–N bonds do not rotate and are excluded.
fn num_rotatable_bonds(mol: &Molecule, rings: &RingInfo) -> usize {
    mol.bonds
        .iter()
        .enumerate()
        .filter(|(bi, bond)| {
            bond.order == BondOrder::Single
                && !rings.bond_in_ring[*bi]
                && mol.degree(bond.atom1) > 1
                && mol.degree(bond.atom2) > 1
                && !is_amide_bond(mol, bond.atom1, bond.atom2)
        })
        .count()
}

fn is_amide_bond(mol: &Molecule, a: usize, b: usize) -> bool {
    let carbon = match (mol.atoms[a].atomic_number, mol.atoms[b].atomic_number) {
        (6, 7) => a,
        (7, 6) => b,
        _ => return false,
    };
    mol.adjacency[carbon].iter().any(|&(nb, bi)| {
        mol.atoms[nb].atomic_number == 8 && mol.bonds[bi].order == BondOrder::Double
    })
}

fn fraction_csp3(mol: &Molecule) -> f64 {
    let carbons: Vec<usize> = (0..mol.atom_count())
        .filter(|&i| mol.atoms[i].atomic_number == 6)
        .collect();
    if carbons.is_empty() {
        return 0.0;
    }
    let sp3 = carbons
        .iter()
        .filter(|&&i| {
            !mol.atoms[i].is_aromatic
                && mol.adjacency[i]
                    .iter()
                    .all(|&(_, bi)| mol.bonds[bi].order == BondOrder::Single)
        })
        .count();
    sp3 as f64 / carbons.len() as f64
}

/// Topological polar surface area (Ertl 2000), N/O/S/P contributions.
pub fn tpsa(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .map(|i| tpsa_contribution(mol, i))
        .sum()
}

fn tpsa_contribution(mol: &Molecule, idx: usize) -> f64 {
    let atom = &mol.atoms[idx];
    let degree = mol.degree(idx);
    let h = atom.hydrogens();
    let has_double = mol.adjacency[idx]
        .iter()
        .any(|&(_, bi)| mol.bonds[bi].order == BondOrder::Double);

    match atom.atomic_number {
        7 => {
            if atom.formal_charge > 0 {
                if h >= 3 {
                    return 27.64;
                }
                if h == 2 {
                    return 25.59;
                }
                if h == 1 {
                    return 23.47;
                }
                return 0.0;
            }
            if atom.is_aromatic {
                return if h >= 1 { 15.79 } else { 12.89 };
            }
            match (degree, h, has_double) {
                (1, 2, _) => 26.02,
                (2, 1, false) => 19.15,
                (2, 1, true) => 23.85,
                (2, 0, true) => 12.36,
                (2, 0, false) => 19.15,
                (3, 0, _) => 3.24,
                (1, 0, true) => 23.79,
                _ => {
                    if h >= 2 {
                        26.02
                    } else if h == 1 {
                        19.15
                    } else {
                        3.24
                    }
                }
            }
        }
        8 => {
            if atom.formal_charge < 0 {
                return 23.06;
            }
            if atom.is_aromatic {
                return 13.14;
            }
            match (degree, h, has_double) {
                (1, 1, false) => 20.23,
                (1, 0, true) => 17.07,
                (2, 0, false) => 9.23,
                (1, 0, false) => 17.07,
                _ => {
                    if h >= 1 {
                        20.23
                    } else if has_double {
                        17.07
                    } else {
                        9.23
                    }
                }
            }
        }
        16 => {
            if h >= 1 {
                return 38.80;
            }
            if has_double {
                return 25.30;
            }
            if degree >= 2 {
                return 25.30;
            }
            0.0
        }
        15 => {
            if has_double {
                return 34.14;
            }
            if h >= 1 {
                return 23.47;
            }
            9.81
        }
        _ => 0.0,
    }
}

/// Coarse Wildman–Crippen atomic contribution estimate.
/// Returns (logP, molar refractivity).
fn crippen(mol: &Molecule) -> (f64, f64) {
    let mut logp = 0.0;
    let mut mr = 0.0;

    for (i, atom) in mol.atoms.iter().enumerate() {
        let hetero_neighbor = mol.adjacency[i]
            .iter()
            .any(|&(nb, _)| !matches!(mol.atoms[nb].atomic_number, 1 | 6));
        let (lp, m) = match atom.atomic_number {
            6 => {
                if atom.is_aromatic {
                    if hetero_neighbor {
                        (0.1581, 3.350)
                    } else {
                        (0.2955, 3.509)
                    }
                } else if hetero_neighbor {
                    (-0.2035, 2.433)
                } else {
                    (0.1441, 2.503)
                }
            }
            7 => {
                if atom.is_aromatic {
                    (-0.3239, 2.202)
                } else if atom.formal_charge > 0 {
                    (-1.9500, 2.262)
                } else {
                    (-1.0190, 2.262)
                }
            }
            8 => {
                if atom.is_aromatic {
                    (0.1552, 1.080)
                } else if atom.hydrogens() > 0 {
                    (-0.3567, 1.673)
                } else if atom.formal_charge < 0 {
                    (-1.1890, 1.750)
                } else {
                    (-0.1526, 1.750)
                }
            }
            9 => (0.4202, 1.108),
            15 => (0.8612, 6.920),
            16 => (0.6482, 7.591),
            17 => (0.6895, 5.853),
            35 => (0.8456, 8.927),
            53 => (0.8857, 14.02),
            _ => (0.0, 0.0),
        };
        logp += lp;
        mr += m;

        let h_count = atom.hydrogens() as f64;
        if atom.atomic_number == 6 {
            logp += h_count * 0.1230;
        } else {
            logp += h_count * -0.2677;
        }
        mr += h_count * 1.057;
    }

    (logp, mr)
}

fn shortest_path_matrix(mol: &Molecule) -> Vec<Vec<usize>> {
    let n = mol.atom_count();
    let mut dist = vec![vec![usize::MAX; n]; n];

    for start in 0..n {
        dist[start][start] = 0;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        while let Some(curr) = queue.pop_front() {
            for &(neighbor, _) in &mol.adjacency[curr] {
                if dist[start][neighbor] == usize::MAX {
                    dist[start][neighbor] = dist[start][curr] + 1;
                    queue.push_back(neighbor);
                }
            }
        }
    }
    dist
}

/// Balaban J index.
fn balaban_j(mol: &Molecule) -> f64 {
    let n = mol.atom_count();
    let m = mol.bond_count();
    if n < 2 || m == 0 {
        return 0.0;
    }

    let dist = shortest_path_matrix(mol);
    let s: Vec<f64> = (0..n)
        .map(|i| {
            (0..n)
                .filter(|&j| j != i && dist[i][j] != usize::MAX)
                .map(|j| dist[i][j] as f64)
                .sum()
        })
        .collect();

    let components = mol.fragments().len();
    let mu = m as f64 - n as f64 + components as f64;

    let mut edge_sum = 0.0;
    for bond in &mol.bonds {
        let si = s[bond.atom1];
        let sj = s[bond.atom2];
        if si > 0.0 && sj > 0.0 {
            edge_sum += (si * sj).powf(-0.5);
        }
    }

    m as f64 / (mu + 1.0) * edge_sum
}

/// Randić-style connectivity index of order 0.
fn chi0(mol: &Molecule) -> f64 {
    (0..mol.atom_count())
        .map(|i| mol.degree(i))
        .filter(|&d| d > 0)
        .map(|d| 1.0 / (d as f64).sqrt())
        .sum()
}

/// Randić-style connectivity index of order 1.
fn chi1(mol: &Molecule) -> f64 {
    mol.bonds
        .iter()
        .map(|b| {
            let d1 = mol.degree(b.atom1) as f64;
            let d2 = mol.degree(b.atom2) as f64;
            1.0 / (d1 * d2).sqrt()
        })
        .sum()
}

/// Graph information index on the distance distribution. Unbounded in
/// molecule size, which is why it is not part of the descriptor table
/// returned by [`compute`].
pub fn ipc(mol: &Molecule) -> f64 {
    let n = mol.atom_count();
    if n < 2 {
        return 0.0;
    }
    let dist = shortest_path_matrix(mol);
    let mut counts: std::collections::HashMap<usize, f64> = std::collections::HashMap::new();
    let mut total = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            if dist[i][j] != usize::MAX {
                *counts.entry(dist[i][j]).or_insert(0.0) += 1.0;
                total += 1.0;
            }
        }
    }
    if total == 0.0 {
        return 0.0;
    }
    let entropy: f64 = counts
        .values()
        .map(|&g| {
            let p = g / total;
            -p * p.log2()
        })
        .sum();
    total * entropy
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Molecule;

    fn get(desc: &[(String, f64)], name: &str) -> f64 {
        desc.iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("descriptor {} missing", name))
            .1
    }

    #[test]
    fn test_fixed_name_order() {
        let mol = Molecule::parse("CCO").unwrap();
        let desc = compute(&mol);
        let names: Vec<&str> = desc.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, DESCRIPTOR_NAMES);
    }

    #[test]
    fn test_ipc_never_present() {
        let mol = Molecule::parse("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let desc = compute(&mol);
        assert!(desc.iter().all(|(n, _)| n != "Ipc"));
    }

    #[test]
    fn test_ethanol_counts() {
        let mol = Molecule::parse("CCO").unwrap();
        let desc = compute(&mol);
        assert_eq!(get(&desc, "HeavyAtomCount"), 3.0);
        assert_eq!(get(&desc, "NumHDonors"), 1.0);
        assert_eq!(get(&desc, "NumHAcceptors"), 1.0);
        assert_eq!(get(&desc, "NumHeteroatoms"), 1.0);
        assert_eq!(get(&desc, "RingCount"), 0.0);
        assert!((get(&desc, "TPSA") - 20.23).abs() < 1e-6);
    }

    #[test]
    fn test_benzene_ring_descriptors() {
        let mol = Molecule::parse("c1ccccc1").unwrap();
        let desc = compute(&mol);
        assert_eq!(get(&desc, "NumAromaticRings"), 1.0);
        assert_eq!(get(&desc, "NumAliphaticRings"), 0.0);
        assert_eq!(get(&desc, "FractionCSP3"), 0.0);
        assert_eq!(get(&desc, "TPSA"), 0.0);
    }

    #[test]
    fn test_salts_stripped_before_computation() {
        let plain = compute(&Molecule::parse("CCO").unwrap());
        let salted = compute(&Molecule::parse("CCO.[Na+].[Cl-]").unwrap());
        assert_eq!(get(&plain, "HeavyAtomCount"), get(&salted, "HeavyAtomCount"));
        assert!((get(&plain, "MolWt") - get(&salted, "MolWt")).abs() < 1e-9);
    }

    #[test]
    fn test_rotatable_bonds_butane() {
        // butane: one rotatable C-C bond (the central one)
        let mol = Molecule::parse("CCCC").unwrap();
        let desc = compute(&mol);
        assert_eq!(get(&desc, "NumRotatableBonds"), 1.0);
    }

    #[test]
    fn test_amide_bond_not_rotatable() {
        // N-methylacetamide: C-N amide bond excluded, leaving none
        let mol = Molecule::parse("CC(=O)NC").unwrap();
        let desc = compute(&mol);
        assert_eq!(get(&desc, "NumRotatableBonds"), 0.0);
    }

    #[test]
    fn test_ipc_grows_with_molecule_size() {
        let small = ipc(&Molecule::parse("CCO").unwrap());
        let large = ipc(&Molecule::parse("CCCCCCCCCCCCCCCCCCCC").unwrap());
        assert!(large > small);
    }

    #[test]
    fn test_logp_orders_hydrophobicity() {
        let hexane = compute(&Molecule::parse("CCCCCC").unwrap());
        let glycerol = compute(&Molecule::parse("OCC(O)CO").unwrap());
        assert!(get(&hexane, "MolLogP") > get(&glycerol, "MolLogP"));
    }
}
