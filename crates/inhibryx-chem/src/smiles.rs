//! SMILES parser.
//!
//! Covers the organic subset, bracket atoms (isotope, charge, explicit
//! hydrogens, chirality tags), branches, ring closures including `%nn`,
//! and dot-separated fragments. Anything outside that subset is a parse
//! error; callers treat every parse error as invalid input.

use std::collections::HashMap;

use inhibryx_common::{InhibryxError, Result};

use crate::element::element_by_symbol;
use crate::molecule::{Atom, Bond, BondOrder};

fn err(msg: impl Into<String>) -> InhibryxError {
    InhibryxError::InvalidInput(msg.into())
}

pub(crate) fn parse(input: &str) -> Result<(Vec<Atom>, Vec<Bond>)> {
    let chars: Vec<char> = input.chars().collect();
    let mut atoms: Vec<Atom> = Vec::new();
    let mut bonds: Vec<Bond> = Vec::new();

    let mut prev: Option<usize> = None;
    let mut pending_bond: Option<BondOrder> = None;
    let mut branch_stack: Vec<Option<usize>> = Vec::new();
    // ring closure number -> (open atom, explicit bond order at open)
    let mut ring_open: HashMap<u16, (usize, Option<BondOrder>)> = HashMap::new();

    let mut i = 0usize;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '[' => {
                let (atom, consumed) = parse_bracket_atom(&chars[i..])?;
                i += consumed;
                let idx = push_atom(&mut atoms, &mut bonds, atom, &mut prev, &mut pending_bond)?;
                prev = Some(idx);
            }
            'A'..='Z' => {
                // Two-letter organic-subset symbols first.
                let symbol = if c == 'C' && chars.get(i + 1) == Some(&'l') {
                    i += 2;
                    "Cl"
                } else if c == 'B' && chars.get(i + 1) == Some(&'r') {
                    i += 2;
                    "Br"
                } else {
                    i += 1;
                    match c {
                        'B' => "B",
                        'C' => "C",
                        'N' => "N",
                        'O' => "O",
                        'P' => "P",
                        'S' => "S",
                        'F' => "F",
                        'I' => "I",
                        _ => return Err(err(format!("atom {:?} must be written in brackets", c))),
                    }
                };
                let atom = organic_atom(symbol, false)?;
                let idx = push_atom(&mut atoms, &mut bonds, atom, &mut prev, &mut pending_bond)?;
                prev = Some(idx);
            }
            'b' | 'c' | 'n' | 'o' | 'p' | 's' => {
                let symbol = match c {
                    'b' => "B",
                    'c' => "C",
                    'n' => "N",
                    'o' => "O",
                    'p' => "P",
                    's' => "S",
                    _ => unreachable!(),
                };
                i += 1;
                let atom = organic_atom(symbol, true)?;
                let idx = push_atom(&mut atoms, &mut bonds, atom, &mut prev, &mut pending_bond)?;
                prev = Some(idx);
            }
            '-' | '/' | '\\' => {
                set_pending(&mut pending_bond, BondOrder::Single)?;
                i += 1;
            }
            '=' => {
                set_pending(&mut pending_bond, BondOrder::Double)?;
                i += 1;
            }
            '#' => {
                set_pending(&mut pending_bond, BondOrder::Triple)?;
                i += 1;
            }
            ':' => {
                set_pending(&mut pending_bond, BondOrder::Aromatic)?;
                i += 1;
            }
            '(' => {
                if prev.is_none() {
                    return Err(err("branch with no preceding atom"));
                }
                branch_stack.push(prev);
                i += 1;
            }
            ')' => {
                prev = branch_stack.pop().ok_or_else(|| err("unbalanced ')'"))?;
                i += 1;
            }
            '.' => {
                if pending_bond.is_some() {
                    return Err(err("bond before fragment separator"));
                }
                if prev.is_none() {
                    return Err(err("fragment separator with no preceding atom"));
                }
                prev = None;
                i += 1;
            }
            '0'..='9' => {
                close_ring(
                    c.to_digit(10).unwrap() as u16,
                    &mut atoms,
                    &mut bonds,
                    prev,
                    &mut pending_bond,
                    &mut ring_open,
                )?;
                i += 1;
            }
            '%' => {
                let d1 = chars.get(i + 1).and_then(|c| c.to_digit(10));
                let d2 = chars.get(i + 2).and_then(|c| c.to_digit(10));
                match (d1, d2) {
                    (Some(a), Some(b)) => {
                        close_ring(
                            (a * 10 + b) as u16,
                            &mut atoms,
                            &mut bonds,
                            prev,
                            &mut pending_bond,
                            &mut ring_open,
                        )?;
                        i += 3;
                    }
                    _ => return Err(err("'%' must be followed by two digits")),
                }
            }
            _ => return Err(err(format!("unexpected character {:?}", c))),
        }
    }

    if !branch_stack.is_empty() {
        return Err(err("unbalanced '('"));
    }
    if !ring_open.is_empty() {
        let mut numbers: Vec<u16> = ring_open.keys().copied().collect();
        numbers.sort_unstable();
        return Err(err(format!("unclosed ring closure {:?}", numbers)));
    }
    if pending_bond.is_some() {
        return Err(err("dangling bond symbol"));
    }
    if atoms.is_empty() {
        return Err(err("no atoms"));
    }

    Ok((atoms, bonds))
}

fn organic_atom(symbol: &str, aromatic: bool) -> Result<Atom> {
    let element = element_by_symbol(symbol)
        .ok_or_else(|| err(format!("unknown element {:?}", symbol)))?;
    Ok(Atom {
        atomic_number: element.atomic_number,
        formal_charge: 0,
        isotope: None,
        is_aromatic: aromatic,
        explicit_hydrogens: None,
        implicit_hydrogens: 0,
    })
}

fn push_atom(
    atoms: &mut Vec<Atom>,
    bonds: &mut Vec<Bond>,
    atom: Atom,
    prev: &mut Option<usize>,
    pending_bond: &mut Option<BondOrder>,
) -> Result<usize> {
    let idx = atoms.len();
    let aromatic = atom.is_aromatic;
    atoms.push(atom);
    if let Some(p) = *prev {
        let order = pending_bond.take().unwrap_or({
            if aromatic && atoms[p].is_aromatic {
                BondOrder::Aromatic
            } else {
                BondOrder::Single
            }
        });
        bonds.push(Bond { atom1: p, atom2: idx, order });
    } else if pending_bond.is_some() {
        return Err(err("bond with no preceding atom"));
    }
    Ok(idx)
}

fn set_pending(pending: &mut Option<BondOrder>, order: BondOrder) -> Result<()> {
    if pending.is_some() {
        return Err(err("two consecutive bond symbols"));
    }
    *pending = Some(order);
    Ok(())
}

fn close_ring(
    number: u16,
    atoms: &mut [Atom],
    bonds: &mut Vec<Bond>,
    prev: Option<usize>,
    pending_bond: &mut Option<BondOrder>,
    ring_open: &mut HashMap<u16, (usize, Option<BondOrder>)>,
) -> Result<()> {
    let current = prev.ok_or_else(|| err("ring closure digit with no preceding atom"))?;
    match ring_open.remove(&number) {
        None => {
            ring_open.insert(number, (current, pending_bond.take()));
            Ok(())
        }
        Some((open_atom, open_order)) => {
            if open_atom == current {
                return Err(err("ring closure bonds an atom to itself"));
            }
            let explicit = pending_bond.take().or(open_order);
            let order = explicit.unwrap_or({
                if atoms[open_atom].is_aromatic && atoms[current].is_aromatic {
                    BondOrder::Aromatic
                } else {
                    BondOrder::Single
                }
            });
            bonds.push(Bond { atom1: open_atom, atom2: current, order });
            Ok(())
        }
    }
}

/// Parse one bracket atom starting at `chars[0] == '['`. Returns the
/// atom and the number of characters consumed, brackets included.
fn parse_bracket_atom(chars: &[char]) -> Result<(Atom, usize)> {
    let close = chars
        .iter()
        .position(|&c| c == ']')
        .ok_or_else(|| err("unclosed bracket atom"))?;
    let body: &[char] = &chars[1..close];
    if body.is_empty() {
        return Err(err("empty bracket atom"));
    }

    let mut j = 0usize;

    // Isotope
    let mut isotope: Option<u16> = None;
    let iso_start = j;
    while j < body.len() && body[j].is_ascii_digit() {
        j += 1;
    }
    if j > iso_start {
        let digits: String = body[iso_start..j].iter().collect();
        isotope = Some(
            digits
                .parse()
                .map_err(|_| err(format!("invalid isotope {:?}", digits)))?,
        );
    }

    // Element symbol, possibly aromatic (lowercase)
    if j >= body.len() {
        return Err(err("bracket atom with no element"));
    }
    let (symbol, aromatic) = if body[j].is_ascii_uppercase() {
        let mut sym = body[j].to_string();
        if j + 1 < body.len() && body[j + 1].is_ascii_lowercase() && body[j + 1] != 'h' {
            let two: String = format!("{}{}", body[j], body[j + 1]);
            if element_by_symbol(&two).is_some() {
                sym = two;
            }
        }
        j += sym.len();
        (sym, false)
    } else if body[j].is_ascii_lowercase() {
        let sym = if j + 1 < body.len() && body[j] == 's' && body[j + 1] == 'e' {
            j += 2;
            "Se".to_string()
        } else {
            let s = match body[j] {
                'b' => "B",
                'c' => "C",
                'n' => "N",
                'o' => "O",
                'p' => "P",
                's' => "S",
                other => return Err(err(format!("invalid aromatic symbol {:?}", other))),
            };
            j += 1;
            s.to_string()
        };
        (sym, true)
    } else {
        return Err(err(format!("invalid element start {:?}", body[j])));
    };

    let element = element_by_symbol(&symbol)
        .ok_or_else(|| err(format!("unknown element {:?}", symbol)))?;

    // Chirality tags, parsed and discarded
    while j < body.len() && body[j] == '@' {
        j += 1;
    }

    // Explicit hydrogens
    let mut hydrogens: u8 = 0;
    if j < body.len() && body[j] == 'H' {
        j += 1;
        hydrogens = 1;
        if j < body.len() && body[j].is_ascii_digit() {
            hydrogens = body[j].to_digit(10).unwrap() as u8;
            j += 1;
        }
    }

    // Formal charge: '+', '-', possibly repeated or followed by a digit
    let mut charge: i8 = 0;
    if j < body.len() && (body[j] == '+' || body[j] == '-') {
        let sign: i8 = if body[j] == '+' { 1 } else { -1 };
        let symbol_char = body[j];
        j += 1;
        if j < body.len() && body[j].is_ascii_digit() {
            charge = sign * body[j].to_digit(10).unwrap() as i8;
            j += 1;
        } else {
            charge = sign;
            while j < body.len() && body[j] == symbol_char {
                charge += sign;
                j += 1;
            }
        }
    }

    // Atom class, discarded
    if j < body.len() && body[j] == ':' {
        j += 1;
        let class_start = j;
        while j < body.len() && body[j].is_ascii_digit() {
            j += 1;
        }
        if j == class_start {
            return Err(err("':' in bracket atom must be followed by digits"));
        }
    }

    if j != body.len() {
        return Err(err(format!(
            "trailing characters in bracket atom: {:?}",
            body[j..].iter().collect::<String>()
        )));
    }

    Ok((
        Atom {
            atomic_number: element.atomic_number,
            formal_charge: charge,
            isotope,
            is_aromatic: aromatic,
            explicit_hydrogens: Some(hydrogens),
            implicit_hydrogens: 0,
        },
        close + 1,
    ))
}
