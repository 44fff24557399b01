use super::sphere::connolly_sphere;
use crate::core::vdw::{RadiiConfig, RadiiError};
use nalgebra::Point3;
use std::sync::Arc;
use thiserror::Error;

/// Slack applied to the distance bounds so that points lying exactly on a
/// boundary (a shell point is exactly one radius from its own atom) are not
/// dropped by floating-point noise.
const BOUNDS_EPSILON: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("shell supplies {points} point sets and {radii} radii for {atoms} atom coordinates")]
    ShapeMismatch {
        points: usize,
        radii: usize,
        atoms: usize,
    },

    #[error("rmax ({rmax}) must be negative (unbounded) or >= rmin ({rmin})")]
    InvalidBounds { rmin: f64, rmax: f64 },
}

/// One Connolly shell: per-atom sphere points (centered on the origin) and
/// the scaled radius each sphere was generated at.
///
/// Atoms sharing a scaled radius share one generated point set. Shells built
/// for different scale factors are independent; their filtered surfaces are
/// concatenated, never merged.
#[derive(Debug, Clone)]
pub struct ConnollyShell {
    points: Vec<Arc<Vec<Point3<f64>>>>,
    radii: Vec<f64>,
}

impl ConnollyShell {
    /// Builds one shell from per-atom scaled radii.
    pub fn from_radii(radii: Vec<f64>, density: f64) -> Self {
        let mut generated: Vec<(f64, Arc<Vec<Point3<f64>>>)> = Vec::new();
        let points = radii
            .iter()
            .map(|&radius| {
                match generated.iter().find(|(r, _)| *r == radius) {
                    Some((_, sphere)) => Arc::clone(sphere),
                    None => {
                        let sphere = Arc::new(connolly_sphere(radius, density));
                        generated.push((radius, Arc::clone(&sphere)));
                        sphere
                    }
                }
            })
            .collect();
        Self { points, radii }
    }

    pub fn n_atoms(&self) -> usize {
        self.radii.len()
    }

    /// The origin-centered sphere points for atom `i`.
    pub fn atom_points(&self, i: usize) -> &[Point3<f64>] {
        &self.points[i]
    }

    /// Scaled radii in atom order.
    pub fn radii(&self) -> &[f64] {
        &self.radii
    }
}

/// Generates one Connolly shell per scale factor for the given atoms.
///
/// For each scale factor, every element's base radius is multiplied by the
/// factor and a sphere of the configured density is generated per atom.
///
/// # Errors
///
/// Returns [`RadiiError::UnknownElement`] if any element has no radius in the
/// configured table or its overrides.
pub fn connolly_shells(
    symbols: &[&str],
    radii_config: &RadiiConfig,
    scale_factors: &[f64],
    density: f64,
) -> Result<Vec<ConnollyShell>, RadiiError> {
    scale_factors
        .iter()
        .map(|&factor| {
            let radii = radii_config.scaled(symbols, factor)?;
            Ok(ConnollyShell::from_radii(radii, density))
        })
        .collect()
}

/// Filters one shell against the full atom set and returns the surviving
/// surface points.
///
/// Each atom's sphere is translated onto that atom, and a point is kept only
/// if its distance to every atom center `j` lies within
/// `[max(radii[j]*rmin, radii[j]), radii[j]*rmax]` (a negative `rmax` removes
/// the outer bound). Points buried inside a neighbor's exclusion radius or
/// beyond an outer bound are discarded. Output order is atom order, then
/// generation order within an atom.
///
/// # Errors
///
/// Returns [`SurfaceError::ShapeMismatch`] if the shell's per-atom arrays do
/// not match the coordinate count, and [`SurfaceError::InvalidBounds`] if
/// `0 <= rmax < rmin`.
pub fn vdw_surface(
    shell: &ConnollyShell,
    coordinates: &[Point3<f64>],
    rmin: f64,
    rmax: f64,
) -> Result<Vec<Point3<f64>>, SurfaceError> {
    if rmax >= 0.0 && rmax < rmin {
        return Err(SurfaceError::InvalidBounds { rmin, rmax });
    }
    if shell.points.len() != coordinates.len() || shell.radii.len() != coordinates.len() {
        return Err(SurfaceError::ShapeMismatch {
            points: shell.points.len(),
            radii: shell.radii.len(),
            atoms: coordinates.len(),
        });
    }

    let inner: Vec<f64> = shell.radii.iter().map(|&r| (r * rmin).max(r)).collect();
    let outer: Vec<f64> = shell
        .radii
        .iter()
        .map(|&r| if rmax < 0.0 { f64::INFINITY } else { r * rmax })
        .collect();

    let mut surface = Vec::new();
    for (i, center) in coordinates.iter().enumerate() {
        for dot in shell.points[i].iter() {
            let point = center + dot.coords;
            let visible = coordinates.iter().enumerate().all(|(j, other)| {
                let dist = (point - other).norm();
                dist >= inner[j] - BOUNDS_EPSILON && dist <= outer[j] + BOUNDS_EPSILON
            });
            if visible {
                surface.push(point);
            }
        }
    }
    Ok(surface)
}

/// Filters every shell and concatenates the results in shell order.
///
/// # Errors
///
/// Propagates the first [`SurfaceError`] from any shell.
pub fn sample_vdw_surface(
    shells: &[ConnollyShell],
    coordinates: &[Point3<f64>],
    rmin: f64,
    rmax: f64,
) -> Result<Vec<Point3<f64>>, SurfaceError> {
    let mut surface = Vec::new();
    for shell in shells {
        surface.extend(vdw_surface(shell, coordinates, rmin, rmax)?);
    }
    Ok(surface)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn shell_count(radius: f64, density: f64) -> usize {
        (radius * radius * 4.0 * PI * density).round() as usize
    }

    #[test]
    fn shell_shares_points_between_atoms_of_equal_radius() {
        let shell = ConnollyShell::from_radii(vec![1.5, 1.2, 1.5], 1.0);
        assert_eq!(shell.n_atoms(), 3);
        assert_eq!(shell.atom_points(0), shell.atom_points(2));
        assert_eq!(shell.atom_points(0).len(), shell_count(1.5, 1.0));
        assert_eq!(shell.atom_points(1).len(), shell_count(1.2, 1.0));
    }

    #[test]
    fn connolly_shells_builds_one_shell_per_scale_factor() {
        let config = RadiiConfig::default();
        let shells = connolly_shells(&["C", "H"], &config, &[1.4, 2.0], 1.0).unwrap();
        assert_eq!(shells.len(), 2);
        assert_eq!(shells[0].radii(), &[1.5 * 1.4, 1.2 * 1.4]);
        assert_eq!(shells[1].radii(), &[1.5 * 2.0, 1.2 * 2.0]);
        assert_eq!(shells[0].atom_points(0).len(), shell_count(1.5 * 1.4, 1.0));
    }

    #[test]
    fn connolly_shells_propagates_unknown_elements() {
        let config = RadiiConfig::default();
        assert!(connolly_shells(&["C", "Zz"], &config, &[1.4], 1.0).is_err());
    }

    #[test]
    fn isolated_atom_keeps_its_full_shell_under_default_bounds() {
        let shell = ConnollyShell::from_radii(vec![1.4], 1.0);
        let surface = vdw_surface(&shell, &[Point3::origin()], 0.0, -1.0).unwrap();
        assert_eq!(surface.len(), shell_count(1.4, 1.0));
    }

    #[test]
    fn isolated_atom_surface_is_empty_when_rmin_exceeds_the_shell() {
        let shell = ConnollyShell::from_radii(vec![1.4], 1.0);
        let surface = vdw_surface(&shell, &[Point3::origin()], 1.5, -1.0).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn overlapping_neighbor_excludes_buried_points() {
        // Two atoms of radius 1.0 separated by 1.0: each sphere dips well
        // inside the other, so the buried caps must be filtered out.
        let shell = ConnollyShell::from_radii(vec![1.0, 1.0], 4.0);
        let centers = [Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)];
        let surface = vdw_surface(&shell, &centers, 1.0, -1.0).unwrap();

        let full = 2 * shell_count(1.0, 4.0);
        assert!(!surface.is_empty());
        assert!(surface.len() < full, "no points were excluded");
        for point in &surface {
            for center in &centers {
                assert!((point - center).norm() >= 1.0 - 1e-6);
            }
        }
    }

    #[test]
    fn outer_bound_discards_far_points() {
        // Second atom far away: with a finite rmax, the first atom's shell
        // violates the neighbor's outer bound and vice versa.
        let shell = ConnollyShell::from_radii(vec![1.0, 1.0], 1.0);
        let centers = [Point3::new(0.0, 0.0, 0.0), Point3::new(50.0, 0.0, 0.0)];
        let surface = vdw_surface(&shell, &centers, 0.0, 2.0).unwrap();
        assert!(surface.is_empty());
    }

    #[test]
    fn shape_mismatch_is_rejected() {
        let shell = ConnollyShell::from_radii(vec![1.0, 1.0], 1.0);
        let err = vdw_surface(&shell, &[Point3::origin()], 0.0, -1.0).unwrap_err();
        assert!(matches!(
            err,
            SurfaceError::ShapeMismatch {
                points: 2,
                radii: 2,
                atoms: 1
            }
        ));
    }

    #[test]
    fn inverted_bounds_are_rejected() {
        let shell = ConnollyShell::from_radii(vec![1.0], 1.0);
        let err = vdw_surface(&shell, &[Point3::origin()], 1.4, 1.2).unwrap_err();
        assert!(matches!(err, SurfaceError::InvalidBounds { .. }));
    }

    #[test]
    fn sample_vdw_surface_concatenates_shells_in_order() {
        let config = RadiiConfig::default();
        let shells = connolly_shells(&["C"], &config, &[1.4, 2.0], 1.0).unwrap();
        let centers = [Point3::origin()];

        let combined = sample_vdw_surface(&shells, &centers, 0.0, -1.0).unwrap();
        let first = vdw_surface(&shells[0], &centers, 0.0, -1.0).unwrap();
        let second = vdw_surface(&shells[1], &centers, 0.0, -1.0).unwrap();

        assert_eq!(combined.len(), first.len() + second.len());
        assert_eq!(&combined[..first.len()], &first[..]);
        assert_eq!(&combined[first.len()..], &second[..]);
    }
}
