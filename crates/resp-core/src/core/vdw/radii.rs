use phf::{Map, phf_map};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

/// Merz-Singh-Kollman radii (Angstroms), the set used by the classic ESP
/// charge protocol.
static MSK_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.20, "He" => 1.20,
    "Li" => 1.37, "Be" => 1.45, "B" => 1.45, "C" => 1.50,
    "N" => 1.50, "O" => 1.40, "F" => 1.35, "Ne" => 1.30,
    "Na" => 1.57, "Mg" => 1.36, "Al" => 1.24, "Si" => 1.17,
    "P" => 1.80, "S" => 1.75, "Cl" => 1.70,
};

/// Bondi radii (Angstroms).
static BONDI_RADII: Map<&'static str, f64> = phf_map! {
    "H" => 1.20, "He" => 1.40,
    "Li" => 1.82, "C" => 1.70, "N" => 1.55, "O" => 1.52,
    "F" => 1.47, "Ne" => 1.54,
    "Na" => 2.27, "Mg" => 1.73, "Si" => 2.10, "P" => 1.80,
    "S" => 1.80, "Cl" => 1.75, "Ar" => 1.88,
    "K" => 2.75, "Ni" => 1.63, "Cu" => 1.40, "Zn" => 1.39,
    "Ga" => 1.87, "As" => 1.85, "Se" => 1.90, "Br" => 1.85, "Kr" => 2.02,
    "Pd" => 1.63, "Ag" => 1.72, "Cd" => 1.58, "In" => 1.93, "Sn" => 2.17,
    "Te" => 2.06, "I" => 1.98, "Xe" => 2.16,
    "Pt" => 1.75, "Au" => 1.66, "Hg" => 1.55, "Tl" => 1.96, "Pb" => 2.02,
    "U" => 1.86,
};

/// Which built-in van der Waals radius table to draw from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RadiiSet {
    /// Merz-Singh-Kollman radii.
    #[default]
    Msk,
    /// Bondi radii.
    Bondi,
}

impl RadiiSet {
    fn table(self) -> &'static Map<&'static str, f64> {
        match self {
            RadiiSet::Msk => &MSK_RADII,
            RadiiSet::Bondi => &BONDI_RADII,
        }
    }
}

impl FromStr for RadiiSet {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "msk" => Ok(RadiiSet::Msk),
            "bondi" => Ok(RadiiSet::Bondi),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Error)]
pub enum RadiiError {
    #[error(
        "no van der Waals radius for element '{element}' in the {set:?} set; supply an override"
    )]
    UnknownElement { element: String, set: RadiiSet },

    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },

    #[error("non-positive radius {radius} for element '{element}' in '{path}'")]
    InvalidRadius {
        path: String,
        element: String,
        radius: f64,
    },
}

#[derive(Debug, Deserialize)]
struct RadiusRecord {
    element: String,
    radius: f64,
}

/// Normalizes an element symbol to its canonical capitalization ("CL" -> "Cl").
fn canonical_symbol(symbol: &str) -> String {
    let mut chars = symbol.trim().chars();
    match chars.next() {
        Some(first) => {
            let mut out: String = first.to_uppercase().collect();
            out.extend(chars.flat_map(|c| c.to_lowercase()));
            out
        }
        None => String::new(),
    }
}

/// A base radius set plus per-element overrides.
///
/// Lookups never fall back to a guessed radius: an element absent from both
/// the override map and the base table is an error, because silently using a
/// wrong radius corrupts the sampling surface.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RadiiConfig {
    pub set: RadiiSet,
    pub overrides: HashMap<String, f64>,
}

impl RadiiConfig {
    pub fn new(set: RadiiSet) -> Self {
        Self {
            set,
            overrides: HashMap::new(),
        }
    }

    /// Adds or replaces a per-element override radius (Angstroms).
    pub fn with_override(mut self, element: &str, radius: f64) -> Self {
        self.overrides.insert(canonical_symbol(element), radius);
        self
    }

    /// Loads per-element overrides from a two-column `element,radius` CSV.
    ///
    /// # Errors
    ///
    /// Returns a [`RadiiError`] if the file cannot be read, a record fails to
    /// parse, or a radius is non-positive.
    pub fn load_overrides(&mut self, path: &Path) -> Result<(), RadiiError> {
        let mut reader = csv::Reader::from_path(path).map_err(|e| RadiiError::Csv {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        for result in reader.deserialize::<RadiusRecord>() {
            let record = result.map_err(|e| RadiiError::Csv {
                path: path.to_string_lossy().to_string(),
                source: e,
            })?;
            if record.radius <= 0.0 {
                return Err(RadiiError::InvalidRadius {
                    path: path.to_string_lossy().to_string(),
                    element: record.element,
                    radius: record.radius,
                });
            }
            self.overrides
                .insert(canonical_symbol(&record.element), record.radius);
        }
        Ok(())
    }

    /// Looks up the unscaled radius for one element.
    ///
    /// # Errors
    ///
    /// Returns [`RadiiError::UnknownElement`] if the element is in neither the
    /// override map nor the base table.
    pub fn radius(&self, element: &str) -> Result<f64, RadiiError> {
        let symbol = canonical_symbol(element);
        if let Some(&radius) = self.overrides.get(&symbol) {
            return Ok(radius);
        }
        self.set
            .table()
            .get(symbol.as_str())
            .copied()
            .ok_or(RadiiError::UnknownElement {
                element: symbol,
                set: self.set,
            })
    }

    /// Resolves one scaled radius per atom, in atom order.
    ///
    /// # Errors
    ///
    /// Returns [`RadiiError::UnknownElement`] on the first symbol without a
    /// radius.
    pub fn scaled(&self, symbols: &[&str], scale_factor: f64) -> Result<Vec<f64>, RadiiError> {
        symbols
            .iter()
            .map(|symbol| self.radius(symbol).map(|r| r * scale_factor))
            .collect()
    }
}
