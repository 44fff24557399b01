pub mod atom;
pub mod molecule;

pub use atom::Atom;
pub use molecule::{Molecule, MoleculeError};
