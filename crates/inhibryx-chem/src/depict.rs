//! Best-effort 2D depiction.
//!
//! Assigns approximate 2D coordinates (BFS placement with collision
//! avoidance, 120-degree preferred bond angles) and renders the graph to
//! an SVG string. Output is meant for the result page's structure panel,
//! not for publication-quality drawing.

use crate::element::element_by_number;
use crate::molecule::{BondOrder, Molecule};

const BOND_PX: f64 = 38.0;
const PADDING: f64 = 28.0;

/// Render a molecule to an SVG document string.
pub fn to_svg(mol: &Molecule) -> String {
    let coords = layout(mol);

    let xs: Vec<f64> = coords.iter().map(|c| c.0 * BOND_PX).collect();
    let ys: Vec<f64> = coords.iter().map(|c| c.1 * BOND_PX).collect();
    let min_x = xs.iter().cloned().fold(f64::INFINITY, f64::min) - PADDING;
    let min_y = ys.iter().cloned().fold(f64::INFINITY, f64::min) - PADDING;
    let max_x = xs.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + PADDING;
    let max_y = ys.iter().cloned().fold(f64::NEG_INFINITY, f64::max) + PADDING;
    let width = (max_x - min_x).max(2.0 * PADDING);
    let height = (max_y - min_y).max(2.0 * PADDING);

    let mut body = String::new();

    for bond in &mol.bonds {
        let (x1, y1) = (xs[bond.atom1] - min_x, ys[bond.atom1] - min_y);
        let (x2, y2) = (xs[bond.atom2] - min_x, ys[bond.atom2] - min_y);
        match bond.order {
            BondOrder::Single => body.push_str(&line(x1, y1, x2, y2, false)),
            BondOrder::Aromatic => {
                body.push_str(&line(x1, y1, x2, y2, false));
                let (ox, oy) = offset(x1, y1, x2, y2, 4.0);
                body.push_str(&line(x1 + ox, y1 + oy, x2 + ox, y2 + oy, true));
            }
            BondOrder::Double => {
                let (ox, oy) = offset(x1, y1, x2, y2, 2.5);
                body.push_str(&line(x1 + ox, y1 + oy, x2 + ox, y2 + oy, false));
                body.push_str(&line(x1 - ox, y1 - oy, x2 - ox, y2 - oy, false));
            }
            BondOrder::Triple => {
                body.push_str(&line(x1, y1, x2, y2, false));
                let (ox, oy) = offset(x1, y1, x2, y2, 4.0);
                body.push_str(&line(x1 + ox, y1 + oy, x2 + ox, y2 + oy, false));
                body.push_str(&line(x1 - ox, y1 - oy, x2 - ox, y2 - oy, false));
            }
        }
    }

    for (i, atom) in mol.atoms.iter().enumerate() {
        if atom.atomic_number == 6 && atom.formal_charge == 0 {
            continue;
        }
        let symbol = element_by_number(atom.atomic_number)
            .map(|e| e.symbol)
            .unwrap_or("?");
        let mut label = symbol.to_string();
        let h = atom.hydrogens();
        if h == 1 {
            label.push('H');
        } else if h > 1 {
            label.push_str(&format!("H{}", h));
        }
        match atom.formal_charge {
            0 => {}
            1 => label.push('+'),
            -1 => label.push('-'),
            c if c > 1 => label.push_str(&format!("{}+", c)),
            c => label.push_str(&format!("{}-", -c)),
        }
        let (x, y) = (xs[i] - min_x, ys[i] - min_y);
        body.push_str(&format!(
            r##"<circle cx="{:.1}" cy="{:.1}" r="10" fill="white"/><text x="{:.1}" y="{:.1}" text-anchor="middle" dominant-baseline="central" font-size="13" font-family="sans-serif" fill="#1a3c6e">{}</text>"##,
            x, y, x, y, label
        ));
    }

    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {:.0} {:.0}" width="{:.0}" height="{:.0}">{}</svg>"#,
        width, height, width, height, body
    )
}

fn line(x1: f64, y1: f64, x2: f64, y2: f64, dashed: bool) -> String {
    let dash = if dashed { r#" stroke-dasharray="4 3""# } else { "" };
    format!(
        r##"<line x1="{:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="#333" stroke-width="1.6"{}/>"##,
        x1, y1, x2, y2, dash
    )
}

/// Perpendicular offset of magnitude `d` for drawing parallel bond lines.
fn offset(x1: f64, y1: f64, x2: f64, y2: f64, d: f64) -> (f64, f64) {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len = (dx * dx + dy * dy).sqrt().max(1e-6);
    (-dy / len * d, dx / len * d)
}

/// Assign approximate 2D coordinates in bond-length units.
fn layout(mol: &Molecule) -> Vec<(f64, f64)> {
    let n = mol.atom_count();
    let mut coords: Vec<Option<(f64, f64)>> = vec![None; n];
    let mut fragment_right_edge = 0.0f64;

    for start in 0..n {
        if coords[start].is_some() {
            continue;
        }
        // New fragment: root to the right of everything placed so far.
        let origin_x = if fragment_right_edge == 0.0 { 0.0 } else { fragment_right_edge + 1.8 };
        coords[start] = Some((origin_x, 0.0));
        let mut queue = std::collections::VecDeque::new();
        queue.push_back(start);

        while let Some(curr) = queue.pop_front() {
            let (cx, cy) = coords[curr].unwrap();
            // Direction back to an already-placed neighbor, if any.
            let incoming = mol.adjacency[curr]
                .iter()
                .filter_map(|&(nb, _)| coords[nb])
                .map(|(px, py)| (py - cy).atan2(px - cx))
                .next()
                .unwrap_or(std::f64::consts::PI);

            let preferred = [
                incoming + 2.0 * std::f64::consts::FRAC_PI_3,
                incoming - 2.0 * std::f64::consts::FRAC_PI_3,
                incoming + std::f64::consts::FRAC_PI_3,
                incoming - std::f64::consts::FRAC_PI_3,
                incoming + std::f64::consts::PI,
                incoming + std::f64::consts::FRAC_PI_2,
                incoming - std::f64::consts::FRAC_PI_2,
            ];

            for &(nb, _) in &mol.adjacency[curr] {
                if coords[nb].is_some() {
                    continue;
                }
                let placed: Vec<(f64, f64)> = coords.iter().flatten().cloned().collect();
                let position = preferred
                    .iter()
                    .map(|&angle| (cx + angle.cos(), cy + angle.sin()))
                    .find(|&(x, y)| {
                        placed
                            .iter()
                            .all(|&(px, py)| ((px - x).powi(2) + (py - y).powi(2)).sqrt() > 0.45)
                    })
                    .unwrap_or((cx + incoming.cos() * -1.0, cy + incoming.sin() * -1.0));
                coords[nb] = Some(position);
                queue.push_back(nb);
            }
        }

        fragment_right_edge = coords
            .iter()
            .flatten()
            .map(|&(x, _)| x)
            .fold(fragment_right_edge, f64::max);
    }

    coords.into_iter().map(|c| c.unwrap_or((0.0, 0.0))).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::Molecule;

    #[test]
    fn test_svg_document_shape() {
        let mol = Molecule::parse("CCO").unwrap();
        let svg = to_svg(&mol);
        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        // two bonds, one heteroatom label
        assert_eq!(svg.matches("<line").count(), 2);
        assert!(svg.contains(">OH</text>"));
    }

    #[test]
    fn test_every_atom_gets_coordinates() {
        let mol = Molecule::parse("CC(=O)Oc1ccccc1C(=O)O").unwrap();
        let coords = layout(&mol);
        assert_eq!(coords.len(), mol.atom_count());
        // no two atoms on the same point
        for i in 0..coords.len() {
            for j in (i + 1)..coords.len() {
                let d = ((coords[i].0 - coords[j].0).powi(2)
                    + (coords[i].1 - coords[j].1).powi(2))
                .sqrt();
                assert!(d > 0.1, "atoms {} and {} overlap", i, j);
            }
        }
    }

    #[test]
    fn test_double_bond_draws_two_lines() {
        let mol = Molecule::parse("C=C").unwrap();
        let svg = to_svg(&mol);
        assert_eq!(svg.matches("<line").count(), 2);
    }

    #[test]
    fn test_charged_atom_label() {
        let mol = Molecule::parse("[NH4+]").unwrap();
        let svg = to_svg(&mol);
        assert!(svg.contains("NH4+"));
    }
}
