use super::atom::Atom;
use nalgebra::{Point3, Vector3};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum MoleculeError {
    #[error("multiplicity must be at least 1, got {value}")]
    InvalidMultiplicity { value: u32 },

    #[error("expected {expected} coordinates, got {actual}")]
    CoordinateCountMismatch { expected: usize, actual: usize },

    #[error("a molecule must contain at least one atom")]
    Empty,
}

/// One molecular geometry: an ordered atom sequence plus molecular charge state.
///
/// The atom count and ordering are fixed at construction. Coordinates can only
/// be replaced wholesale via [`Molecule::with_coordinates`], which produces a
/// new geometry with identical elements and charge state; this is how
/// optimized geometries and rigid transforms are applied without ever
/// disturbing the atom order the least-squares system is built on.
#[derive(Debug, Clone, PartialEq)]
pub struct Molecule {
    atoms: Vec<Atom>,
    charge: i32,
    multiplicity: u32,
}

impl Molecule {
    /// Creates a neutral singlet molecule from an ordered atom sequence.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::Empty`] for an empty atom list.
    pub fn new(atoms: Vec<Atom>) -> Result<Self, MoleculeError> {
        if atoms.is_empty() {
            return Err(MoleculeError::Empty);
        }
        Ok(Self {
            atoms,
            charge: 0,
            multiplicity: 1,
        })
    }

    /// Creates a molecule with an explicit charge and multiplicity.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty atom list or a multiplicity of zero.
    pub fn with_charge_state(
        atoms: Vec<Atom>,
        charge: i32,
        multiplicity: u32,
    ) -> Result<Self, MoleculeError> {
        let mut molecule = Self::new(atoms)?;
        molecule.set_charge_state(charge, multiplicity)?;
        Ok(molecule)
    }

    pub fn n_atoms(&self) -> usize {
        self.atoms.len()
    }

    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn charge(&self) -> i32 {
        self.charge
    }

    pub fn multiplicity(&self) -> u32 {
        self.multiplicity
    }

    /// Returns the element symbols in atom order.
    pub fn symbols(&self) -> Vec<&str> {
        self.atoms.iter().map(|a| a.element.as_str()).collect()
    }

    /// Returns a snapshot of the atom coordinates in atom order.
    pub fn coordinates(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|a| a.position).collect()
    }

    /// Updates charge and multiplicity together as one validated transition.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::InvalidMultiplicity`] for a multiplicity of
    /// zero; neither field is modified in that case.
    pub fn set_charge_state(&mut self, charge: i32, multiplicity: u32) -> Result<(), MoleculeError> {
        if multiplicity < 1 {
            return Err(MoleculeError::InvalidMultiplicity {
                value: multiplicity,
            });
        }
        self.charge = charge;
        self.multiplicity = multiplicity;
        Ok(())
    }

    /// Builds a new molecule with the same elements and charge state but
    /// replaced coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MoleculeError::CoordinateCountMismatch`] if the coordinate
    /// count differs from the atom count.
    pub fn with_coordinates(&self, coordinates: &[Point3<f64>]) -> Result<Self, MoleculeError> {
        if coordinates.len() != self.atoms.len() {
            return Err(MoleculeError::CoordinateCountMismatch {
                expected: self.atoms.len(),
                actual: coordinates.len(),
            });
        }
        let atoms = self
            .atoms
            .iter()
            .zip(coordinates)
            .map(|(atom, &position)| Atom {
                element: atom.element.clone(),
                position,
            })
            .collect();
        Ok(Self {
            atoms,
            charge: self.charge,
            multiplicity: self.multiplicity,
        })
    }

    /// Builds a new molecule rigidly translated by `shift`.
    pub fn translated(&self, shift: Vector3<f64>) -> Self {
        let atoms = self
            .atoms
            .iter()
            .map(|atom| Atom {
                element: atom.element.clone(),
                position: atom.position + shift,
            })
            .collect();
        Self {
            atoms,
            charge: self.charge,
            multiplicity: self.multiplicity,
        }
    }
}
