//! Ring perception.
//!
//! Finds a smallest-set-of-smallest-rings approximation: for every bond,
//! the shortest cycle through that bond (BFS with the bond removed),
//! deduplicated and truncated to the cyclomatic number.

use std::collections::VecDeque;

use crate::molecule::Molecule;

/// Ring membership summary for a molecule.
#[derive(Debug, Clone)]
pub struct RingInfo {
    /// Atom index sets, one per perceived ring, smallest rings first.
    pub rings: Vec<Vec<usize>>,
    /// Per-atom ring membership.
    pub atom_in_ring: Vec<bool>,
    /// Per-bond ring membership.
    pub bond_in_ring: Vec<bool>,
}

impl RingInfo {
    pub fn ring_count(&self) -> usize {
        self.rings.len()
    }

    /// Rings whose atoms are all aromatic.
    pub fn aromatic_ring_count(&self, mol: &Molecule) -> usize {
        self.rings
            .iter()
            .filter(|ring| ring.iter().all(|&i| mol.atoms[i].is_aromatic))
            .count()
    }

    pub fn aliphatic_ring_count(&self, mol: &Molecule) -> usize {
        self.ring_count() - self.aromatic_ring_count(mol)
    }
}

/// Perceive rings for a molecule.
pub fn perceive(mol: &Molecule) -> RingInfo {
    let n_atoms = mol.atom_count();
    let n_bonds = mol.bond_count();
    let components = count_components(mol);
    let cyclomatic = (n_bonds + components).saturating_sub(n_atoms);

    let mut rings: Vec<Vec<usize>> = Vec::new();
    if cyclomatic > 0 {
        let mut candidates: Vec<Vec<usize>> = (0..n_bonds)
            .filter_map(|bi| shortest_cycle_through(mol, bi))
            .collect();
        candidates.sort_by_key(|r| r.len());
        for cycle in candidates {
            let mut sorted = cycle.clone();
            sorted.sort_unstable();
            if rings.iter().any(|r: &Vec<usize>| {
                let mut rs = r.clone();
                rs.sort_unstable();
                rs == sorted
            }) {
                continue;
            }
            rings.push(cycle);
            if rings.len() == cyclomatic {
                break;
            }
        }
    }

    let mut atom_in_ring = vec![false; n_atoms];
    let mut bond_in_ring = vec![false; n_bonds];
    for ring in &rings {
        for &a in ring {
            atom_in_ring[a] = true;
        }
        for w in 0..ring.len() {
            let a = ring[w];
            let b = ring[(w + 1) % ring.len()];
            if let Some(&(_, bi)) = mol.adjacency[a].iter().find(|&&(nb, _)| nb == b) {
                bond_in_ring[bi] = true;
            }
        }
    }

    RingInfo { rings, atom_in_ring, bond_in_ring }
}

/// Shortest cycle containing bond `bi`, as an ordered atom walk, found
/// by BFS between the bond's endpoints with the bond itself removed.
fn shortest_cycle_through(mol: &Molecule, bi: usize) -> Option<Vec<usize>> {
    let bond = &mol.bonds[bi];
    let (src, dst) = (bond.atom1, bond.atom2);

    let mut parent = vec![usize::MAX; mol.atom_count()];
    let mut seen = vec![false; mol.atom_count()];
    let mut queue = VecDeque::new();
    seen[src] = true;
    queue.push_back(src);

    while let Some(curr) = queue.pop_front() {
        if curr == dst {
            break;
        }
        for &(nb, nbi) in &mol.adjacency[curr] {
            if nbi == bi || seen[nb] {
                continue;
            }
            seen[nb] = true;
            parent[nb] = curr;
            queue.push_back(nb);
        }
    }

    if !seen[dst] {
        return None;
    }

    let mut walk = vec![dst];
    let mut curr = dst;
    while curr != src {
        curr = parent[curr];
        walk.push(curr);
    }
    Some(walk)
}

fn count_components(mol: &Molecule) -> usize {
    let n = mol.atom_count();
    let mut visited = vec![false; n];
    let mut count = 0;
    for start in 0..n {
        if visited[start] {
            continue;
        }
        count += 1;
        let mut queue = VecDeque::new();
        queue.push_back(start);
        visited[start] = true;
        while let Some(curr) = queue.pop_front() {
            for &(neighbor, _) in &mol.adjacency[curr] {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Molecule;

    #[test]
    fn test_acyclic_has_no_rings() {
        let mol = Molecule::parse("CCO").unwrap();
        let info = perceive(&mol);
        assert_eq!(info.ring_count(), 0);
        assert!(info.atom_in_ring.iter().all(|&b| !b));
    }

    #[test]
    fn test_benzene_one_aromatic_ring() {
        let mol = Molecule::parse("c1ccccc1").unwrap();
        let info = perceive(&mol);
        assert_eq!(info.ring_count(), 1);
        assert_eq!(info.rings[0].len(), 6);
        assert_eq!(info.aromatic_ring_count(&mol), 1);
        assert!(info.bond_in_ring.iter().all(|&b| b));
    }

    #[test]
    fn test_naphthalene_two_rings() {
        let mol = Molecule::parse("c1ccc2ccccc2c1").unwrap();
        let info = perceive(&mol);
        assert_eq!(info.ring_count(), 2);
        assert!(info.rings.iter().all(|r| r.len() == 6));
        assert_eq!(info.aromatic_ring_count(&mol), 2);
    }

    #[test]
    fn test_cyclohexane_aliphatic() {
        let mol = Molecule::parse("C1CCCCC1").unwrap();
        let info = perceive(&mol);
        assert_eq!(info.ring_count(), 1);
        assert_eq!(info.aromatic_ring_count(&mol), 0);
        assert_eq!(info.aliphatic_ring_count(&mol), 1);
    }

    #[test]
    fn test_toluene_substituent_outside_ring() {
        let mol = Molecule::parse("Cc1ccccc1").unwrap();
        let info = perceive(&mol);
        assert_eq!(info.ring_count(), 1);
        assert!(!info.atom_in_ring[0]);
    }
}
