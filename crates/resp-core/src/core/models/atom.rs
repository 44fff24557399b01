use nalgebra::Point3;

/// Represents a single atom in a molecular geometry.
///
/// Atoms carry only what the ESP sampling pipeline needs: an element symbol
/// (used to look up van der Waals radii) and Cartesian coordinates in
/// Angstroms. The atom's position in its parent [`Molecule`](super::Molecule)
/// is significant: atom order defines the unknown order of the least-squares
/// charge system and must never be permuted.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The element symbol (e.g. "C", "Cl").
    pub element: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
}

impl Atom {
    /// Creates a new `Atom` from an element symbol and position.
    pub fn new(element: &str, position: Point3<f64>) -> Self {
        Self {
            element: element.to_string(),
            position,
        }
    }
}
