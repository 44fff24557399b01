use nalgebra::Point3;
use std::f64::consts::PI;

/// Guards against `sin(phi) * n_lat` landing one ulp below an integer.
const BAND_COUNT_EPSILON: f64 = 1e-10;

/// Places points on the unit sphere using latitude/longitude banding.
///
/// Latitude bands are spaced evenly in polar angle; each band holds a point
/// count proportional to its circular cross-section (with a floor of one), and
/// longitudes within a band are evenly spaced starting at zero. The scheme
/// follows the GAMESS surface generator.
fn banded_sphere(n_lat: usize) -> Vec<Point3<f64>> {
    let n_long = (n_lat / 2).max(1);
    let mut dots = Vec::with_capacity(n_lat * n_long / 2 + 2);
    for band in 0..=n_long {
        let phi = band as f64 * PI / n_long as f64;
        let (xy, z) = phi.sin_cos();
        let count = (((xy * n_lat as f64 + BAND_COUNT_EPSILON) as usize).max(1)) as u32;
        for step in 0..count {
            let theta = 2.0 * PI * f64::from(step) / f64::from(count);
            dots.push(Point3::new(theta.cos() * xy, theta.sin() * xy, z));
        }
    }
    dots
}

/// Returns exactly `n` points placed approximately uniformly on the unit
/// sphere.
///
/// Deterministic for a fixed `n`: the banded set is generated (growing the
/// band density until it can cover `n`) and truncated to its first `n`
/// points. No resampling is involved.
pub fn unit_sphere_points(n: usize) -> Vec<Point3<f64>> {
    if n == 0 {
        return Vec::new();
    }
    let mut n_lat = ((PI * n as f64).sqrt() as usize).max(1);
    loop {
        let mut dots = banded_sphere(n_lat);
        if dots.len() >= n {
            dots.truncate(n);
            return dots;
        }
        n_lat += 1;
    }
}

/// Generates a Connolly sphere of the given radius.
///
/// The point count is `round(radius² · 4π · density)`, i.e. the requested
/// area density of points over the sphere's surface.
pub fn connolly_sphere(radius: f64, density: f64) -> Vec<Point3<f64>> {
    let n = (radius * radius * 4.0 * PI * density).round() as usize;
    unit_sphere_points(n)
        .into_iter()
        .map(|p| p * radius)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-12;

    #[test]
    fn unit_sphere_returns_exactly_n_points() {
        for n in [1, 2, 3, 7, 10, 32, 100, 255, 500] {
            assert_eq!(unit_sphere_points(n).len(), n, "wrong count for n={n}");
        }
    }

    #[test]
    fn unit_sphere_of_one_point_is_the_north_pole() {
        let dots = unit_sphere_points(1);
        assert_eq!(dots.len(), 1);
        assert!((dots[0] - Point3::new(0.0, 0.0, 1.0)).norm() < TOLERANCE);
    }

    #[test]
    fn unit_sphere_points_lie_on_the_unit_sphere() {
        for point in unit_sphere_points(200) {
            assert!((point.coords.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn unit_sphere_is_deterministic() {
        assert_eq!(unit_sphere_points(137), unit_sphere_points(137));
    }

    #[test]
    fn unit_sphere_of_zero_points_is_empty() {
        assert!(unit_sphere_points(0).is_empty());
    }

    #[test]
    fn connolly_sphere_count_matches_area_density() {
        for (radius, density) in [(1.0, 1.0), (1.4, 1.0), (2.0, 2.5), (1.68, 3.0)] {
            let expected = (radius * radius * 4.0 * PI * density).round() as usize;
            let points = connolly_sphere(radius, density);
            assert_eq!(points.len(), expected, "r={radius} d={density}");
            for point in &points {
                assert!((point.coords.norm() - radius).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn connolly_sphere_with_vanishing_density_is_empty() {
        assert!(connolly_sphere(0.5, 0.1).is_empty());
    }
}
