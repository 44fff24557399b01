use crate::core::vdw::{RadiiConfig, RadiiSet};
use nalgebra::Vector3;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    #[error("Invalid parameter {name}: {reason}")]
    InvalidParameter {
        name: &'static str,
        reason: String,
    },
}

/// Parameters controlling van der Waals surface sampling.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GridConfig {
    /// Radius table selection and per-element overrides.
    pub radii: RadiiConfig,
    /// One Connolly shell is generated per scale factor.
    pub scale_factors: Vec<f64>,
    /// Surface point density (points per square Angstrom).
    pub density: f64,
    /// Inner exclusion bound as a multiple of each atom's scaled radius.
    pub rmin: f64,
    /// Outer bound as a multiple of each atom's scaled radius; negative means
    /// unbounded.
    pub rmax: f64,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            radii: RadiiConfig::default(),
            scale_factors: vec![1.4, 1.6, 1.8, 2.0],
            density: 1.0,
            rmin: 0.0,
            rmax: -1.0,
        }
    }
}

impl GridConfig {
    pub fn builder() -> GridConfigBuilder {
        GridConfigBuilder::default()
    }
}

#[derive(Default)]
pub struct GridConfigBuilder {
    radii_set: Option<RadiiSet>,
    radii: Option<RadiiConfig>,
    scale_factors: Option<Vec<f64>>,
    density: Option<f64>,
    rmin: Option<f64>,
    rmax: Option<f64>,
}

impl GridConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn radii_set(mut self, set: RadiiSet) -> Self {
        self.radii_set = Some(set);
        self
    }

    pub fn radii(mut self, radii: RadiiConfig) -> Self {
        self.radii = Some(radii);
        self
    }

    pub fn scale_factors(mut self, factors: &[f64]) -> Self {
        self.scale_factors = Some(factors.to_vec());
        self
    }

    pub fn density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    pub fn rmin(mut self, rmin: f64) -> Self {
        self.rmin = Some(rmin);
        self
    }

    pub fn rmax(mut self, rmax: f64) -> Self {
        self.rmax = Some(rmax);
        self
    }

    pub fn build(self) -> Result<GridConfig, ConfigError> {
        let defaults = GridConfig::default();
        let mut radii = self.radii.unwrap_or(defaults.radii);
        if let Some(set) = self.radii_set {
            radii.set = set;
        }
        let config = GridConfig {
            radii,
            scale_factors: self.scale_factors.unwrap_or(defaults.scale_factors),
            density: self.density.unwrap_or(defaults.density),
            rmin: self.rmin.unwrap_or(defaults.rmin),
            rmax: self.rmax.unwrap_or(defaults.rmax),
        };
        if config.scale_factors.is_empty() {
            return Err(ConfigError::InvalidParameter {
                name: "scale_factors",
                reason: "at least one scale factor is required".to_string(),
            });
        }
        if config.density <= 0.0 {
            return Err(ConfigError::InvalidParameter {
                name: "density",
                reason: format!("must be positive, got {}", config.density),
            });
        }
        if config.rmax >= 0.0 && config.rmax < config.rmin {
            return Err(ConfigError::InvalidParameter {
                name: "rmax",
                reason: format!(
                    "must be negative (unbounded) or >= rmin, got rmin={} rmax={}",
                    config.rmin, config.rmax
                ),
            });
        }
        Ok(config)
    }
}

/// Which rigid transforms to generate orientations from.
///
/// Atom indices are 0-based. The generated orientation order is fixed:
/// the original geometry first (when kept), then every reorientation, then
/// every rotation, then every translation, each in its configured order.
/// Orientation names embed a 1-based index in this order, so the ordering is
/// part of the caching contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OrientationConfig {
    /// Atom triples (i, j, k) passed to rigid reorientation.
    pub reorientations: Vec<(usize, usize, usize)>,
    /// Atom triples (i, j, k) passed to rigid rotation.
    pub rotations: Vec<(usize, usize, usize)>,
    /// Cartesian shifts applied to the base geometry.
    pub translations: Vec<Vector3<f64>>,
    /// Whether the untransformed geometry is included as the first
    /// orientation. Defaults to true; when disabled with no transforms
    /// configured, the original is still generated so that a conformer never
    /// has zero orientations.
    #[serde(default = "default_keep_original")]
    pub keep_original: bool,
}

fn default_keep_original() -> bool {
    true
}

impl Default for OrientationConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl OrientationConfig {
    pub fn new() -> Self {
        Self {
            reorientations: Vec::new(),
            rotations: Vec::new(),
            translations: Vec::new(),
            keep_original: true,
        }
    }

    /// Number of configured transforms, excluding the original.
    pub fn n_transforms(&self) -> usize {
        self.reorientations.len() + self.rotations.len() + self.translations.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grid_defaults_match_the_msk_protocol() {
        let config = GridConfig::default();
        assert_eq!(config.scale_factors, vec![1.4, 1.6, 1.8, 2.0]);
        assert_eq!(config.density, 1.0);
        assert_eq!(config.rmin, 0.0);
        assert_eq!(config.rmax, -1.0);
        assert_eq!(config.radii.set, RadiiSet::Msk);
    }

    #[test]
    fn builder_overrides_selected_fields() {
        let config = GridConfig::builder()
            .radii_set(RadiiSet::Bondi)
            .scale_factors(&[1.4])
            .density(2.0)
            .build()
            .unwrap();
        assert_eq!(config.radii.set, RadiiSet::Bondi);
        assert_eq!(config.scale_factors, vec![1.4]);
        assert_eq!(config.density, 2.0);
        assert_eq!(config.rmax, -1.0);
    }

    #[test]
    fn builder_rejects_empty_scale_factors() {
        let err = GridConfig::builder().scale_factors(&[]).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter {
                name: "scale_factors",
                ..
            }
        ));
    }

    #[test]
    fn builder_rejects_non_positive_density() {
        assert!(GridConfig::builder().density(0.0).build().is_err());
        assert!(GridConfig::builder().density(-1.0).build().is_err());
    }

    #[test]
    fn builder_rejects_inverted_bounds() {
        let err = GridConfig::builder().rmin(1.4).rmax(1.2).build().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidParameter { name: "rmax", .. }
        ));
    }

    #[test]
    fn orientation_config_counts_transforms() {
        let config = OrientationConfig {
            reorientations: vec![(0, 1, 2), (1, 2, 0)],
            rotations: vec![(0, 2, 1)],
            translations: vec![Vector3::new(1.0, 0.0, 0.0)],
            keep_original: true,
        };
        assert_eq!(config.n_transforms(), 4);
    }

    #[test]
    fn orientation_config_deserializes_from_toml() {
        let config: OrientationConfig = toml::from_str(
            r#"
reorientations = [[0, 1, 2], [2, 1, 0]]
rotations = [[0, 2, 1]]
translations = [[0.0, 0.0, 5.0]]
keep_original = false
"#,
        )
        .unwrap();
        assert_eq!(config.reorientations, vec![(0, 1, 2), (2, 1, 0)]);
        assert_eq!(config.rotations, vec![(0, 2, 1)]);
        assert_eq!(config.translations, vec![Vector3::new(0.0, 0.0, 5.0)]);
        assert!(!config.keep_original);
    }
}
