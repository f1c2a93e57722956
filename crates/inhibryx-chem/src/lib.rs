//! inhibryx-chem — Molecule representation and chemistry for Inhibryx.
//!
//! This crate carries the cheminformatics layer of the application:
//! 1. SMILES parsing into a molecular graph
//! 2. Salt stripping (counter-ion removal)
//! 3. Physicochemical descriptor computation
//! 4. Morgan (ECFP, radius 2) fingerprints, 2048 bits
//! 5. Best-effort 2D SVG depiction
//! 6. Structural similarity lookup against ChEMBL

pub mod depict;
pub mod descriptors;
pub mod element;
pub mod fingerprint;
pub mod molecule;
pub mod ring;
pub mod similarity;
pub mod smiles;

pub use molecule::{Atom, Bond, BondOrder, Molecule};
pub use similarity::{ChemblClient, SimilarCompound};

pub type Result<T> = inhibryx_common::Result<T>;
