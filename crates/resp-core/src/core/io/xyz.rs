use crate::core::models::{Atom, Molecule, MoleculeError};
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum XyzError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("invalid molecule: {0}")]
    Molecule(#[from] MoleculeError),
}

/// Reads one molecule from XYZ text: an atom count line, a title line, then
/// one `element x y z` record per atom.
pub fn read_from(reader: &mut impl BufRead) -> Result<(Molecule, String), XyzError> {
    let mut lines = reader.lines().enumerate();

    let (_, count_line) = lines.next().ok_or(XyzError::Parse {
        line: 1,
        message: "missing atom count line".to_string(),
    })?;
    let count_line = count_line?;
    let n_atoms: usize = count_line.trim().parse().map_err(|_| XyzError::Parse {
        line: 1,
        message: format!("invalid atom count '{}'", count_line.trim()),
    })?;

    let (_, title) = lines.next().ok_or(XyzError::Parse {
        line: 2,
        message: "missing title line".to_string(),
    })?;
    let title = title?;

    let mut atoms = Vec::with_capacity(n_atoms);
    for _ in 0..n_atoms {
        let (index, record) = lines.next().ok_or_else(|| XyzError::Parse {
            line: atoms.len() + 3,
            message: format!("expected {n_atoms} atom records, got {}", atoms.len()),
        })?;
        let record = record?;
        let line = index + 1;
        let fields: Vec<&str> = record.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(XyzError::Parse {
                line,
                message: format!("expected 'element x y z', got '{}'", record.trim()),
            });
        }
        let mut xyz = [0.0_f64; 3];
        for (slot, field) in xyz.iter_mut().zip(&fields[1..4]) {
            *slot = field.parse().map_err(|_| XyzError::Parse {
                line,
                message: format!("invalid coordinate '{field}'"),
            })?;
        }
        atoms.push(Atom::new(fields[0], Point3::new(xyz[0], xyz[1], xyz[2])));
    }

    Ok((Molecule::new(atoms)?, title.trim().to_string()))
}

pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<(Molecule, String), XyzError> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    read_from(&mut reader)
}

/// Writes one molecule as XYZ text.
pub fn write_to(
    molecule: &Molecule,
    title: &str,
    writer: &mut impl Write,
) -> Result<(), XyzError> {
    writeln!(writer, "{}", molecule.n_atoms())?;
    writeln!(writer, "{title}")?;
    for atom in molecule.atoms() {
        writeln!(
            writer,
            "{:<2} {:>15.8} {:>15.8} {:>15.8}",
            atom.element, atom.position.x, atom.position.y, atom.position.z
        )?;
    }
    Ok(())
}

pub fn write_to_path<P: AsRef<Path>>(
    molecule: &Molecule,
    title: &str,
    path: P,
) -> Result<(), XyzError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_to(molecule, title, &mut writer)
}

#[cfg(test)]
mod tests {
    use super::*;

    const METHANE: &str = "\
5
methane
C    0.00000000   0.00000000   0.00000000
H    0.62911800   0.62911800   0.62911800
H   -0.62911800  -0.62911800   0.62911800
H   -0.62911800   0.62911800  -0.62911800
H    0.62911800  -0.62911800  -0.62911800
";

    #[test]
    fn read_parses_count_title_and_records() {
        let (molecule, title) = read_from(&mut METHANE.as_bytes()).unwrap();
        assert_eq!(title, "methane");
        assert_eq!(molecule.n_atoms(), 5);
        assert_eq!(molecule.symbols(), vec!["C", "H", "H", "H", "H"]);
        assert_eq!(
            molecule.atoms()[1].position,
            Point3::new(0.629118, 0.629118, 0.629118)
        );
    }

    #[test]
    fn round_trip_through_a_file_preserves_the_geometry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mol.xyz");

        let (molecule, _) = read_from(&mut METHANE.as_bytes()).unwrap();
        write_to_path(&molecule, "methane", &path).unwrap();
        let (reread, title) = read_from_path(&path).unwrap();

        assert_eq!(title, "methane");
        assert_eq!(reread.symbols(), molecule.symbols());
        for (a, b) in reread.atoms().iter().zip(molecule.atoms()) {
            assert!((a.position - b.position).norm() < 1e-8);
        }
    }

    #[test]
    fn truncated_input_reports_the_missing_records() {
        let err = read_from(&mut "3\ntitle\nC 0 0 0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, XyzError::Parse { .. }));
    }

    #[test]
    fn malformed_count_is_rejected() {
        let err = read_from(&mut "many\ntitle\n".as_bytes()).unwrap_err();
        assert!(matches!(err, XyzError::Parse { line: 1, .. }));
    }

    #[test]
    fn malformed_coordinate_is_rejected_with_its_line() {
        let err = read_from(&mut "1\ntitle\nC 0.0 oops 0.0\n".as_bytes()).unwrap_err();
        assert!(matches!(err, XyzError::Parse { line: 3, .. }));
    }
}
