use nalgebra::Point3;
use thiserror::Error;

/// Below this, an alignment hypotenuse (or separation) is treated as zero.
const DEGENERATE_TOLERANCE: f64 = 1e-10;

#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("atom indices must be pairwise distinct, got ({i}, {j}, {k})")]
    IndicesNotDistinct { i: usize, j: usize, k: usize },

    #[error("atom index {index} is out of bounds for {len} atoms")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("atoms {i} and {other} coincide; the alignment is undefined")]
    CoincidentAtoms { i: usize, other: usize },

    #[error("atoms ({i}, {j}, {k}) are collinear; the reference plane is undefined")]
    CollinearAtoms { i: usize, j: usize, k: usize },

    #[error("atom {index} coincides with the rotation origin; the alignment angle is undefined")]
    DegenerateAxis { index: usize },
}

/// Rotates `coords` about the x-axis so that atom `n` lands in the xy-plane
/// with a non-negative y-component.
///
/// The angle is `arccos(|y| / sqrt(y² + z²))` with a four-quadrant correction
/// on the signs of y and z, following the R.E.D. convention. An atom already
/// on the x-axis leaves the coordinates untouched.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateAxis`] if atom `n` sits at the origin,
/// where no rotation angle is defined.
pub fn rotate_about_x(n: usize, coords: &mut [Point3<f64>]) -> Result<(), GeometryError> {
    let p = *coords.get(n).ok_or(GeometryError::IndexOutOfBounds {
        index: n,
        len: coords.len(),
    })?;
    let (y, z) = (p.y, p.z);
    let hypotenuse = (y * y + z * z).sqrt();
    if hypotenuse < DEGENERATE_TOLERANCE {
        if p.coords.norm() < DEGENERATE_TOLERANCE {
            return Err(GeometryError::DegenerateAxis { index: n });
        }
        // Already on the x-axis.
        return Ok(());
    }

    // The ratio can exceed 1 by one ulp when z is exactly zero.
    let mut angle = (y.abs() / hypotenuse).min(1.0).acos();
    if z >= 0.0 {
        if y < 0.0 {
            angle = std::f64::consts::PI - angle;
        }
    } else if y >= 0.0 {
        angle = 2.0 * std::f64::consts::PI - angle;
    } else {
        angle = std::f64::consts::PI + angle;
    }

    let (sin_angle, cos_angle) = angle.sin_cos();
    for point in coords.iter_mut() {
        let (py, pz) = (point.y, point.z);
        point.y = pz * sin_angle + py * cos_angle;
        point.z = pz * cos_angle - py * sin_angle;
    }
    Ok(())
}

/// Rotates `coords` about the z-axis so that atom `n` lands in the xz-plane
/// with a non-negative x-component.
///
/// Same angle convention as [`rotate_about_x`], computed from the x and y
/// components. An atom already on the z-axis must sit away from the origin or
/// the rotation is undefined.
///
/// # Errors
///
/// Returns [`GeometryError::DegenerateAxis`] if atom `n` sits at the origin.
pub fn rotate_about_z(n: usize, coords: &mut [Point3<f64>]) -> Result<(), GeometryError> {
    let p = *coords.get(n).ok_or(GeometryError::IndexOutOfBounds {
        index: n,
        len: coords.len(),
    })?;
    let (x, y) = (p.x, p.y);
    let hypotenuse = (x * x + y * y).sqrt();
    if hypotenuse < DEGENERATE_TOLERANCE {
        if p.coords.norm() < DEGENERATE_TOLERANCE {
            return Err(GeometryError::DegenerateAxis { index: n });
        }
        return Ok(());
    }

    let mut angle = (x.abs() / hypotenuse).min(1.0).acos();
    if y >= 0.0 {
        if x < 0.0 {
            angle = std::f64::consts::PI - angle;
        }
    } else if x >= 0.0 {
        angle = 2.0 * std::f64::consts::PI - angle;
    } else {
        angle = std::f64::consts::PI + angle;
    }

    let (sin_angle, cos_angle) = angle.sin_cos();
    for point in coords.iter_mut() {
        let (px, py) = (point.x, point.y);
        point.x = px * cos_angle + py * sin_angle;
        point.y = py * cos_angle - px * sin_angle;
    }
    Ok(())
}

fn check_triple(
    i: usize,
    j: usize,
    k: usize,
    coords: &[Point3<f64>],
) -> Result<(), GeometryError> {
    if i == j || j == k || i == k {
        return Err(GeometryError::IndicesNotDistinct { i, j, k });
    }
    for index in [i, j, k] {
        if index >= coords.len() {
            return Err(GeometryError::IndexOutOfBounds {
                index,
                len: coords.len(),
            });
        }
    }
    let ij = coords[j] - coords[i];
    let ik = coords[k] - coords[i];
    if ij.norm() < DEGENERATE_TOLERANCE {
        return Err(GeometryError::CoincidentAtoms { i, other: j });
    }
    if ik.norm() < DEGENERATE_TOLERANCE {
        return Err(GeometryError::CoincidentAtoms { i, other: k });
    }
    if ij.cross(&ik).norm() < DEGENERATE_TOLERANCE {
        return Err(GeometryError::CollinearAtoms { i, j, k });
    }
    Ok(())
}

/// Rigid-body reorientation: atom `i` becomes the origin, atom `j` defines
/// the positive x-axis, and atom `k` fixes the xy-plane.
///
/// The input is not mutated; a freshly oriented coordinate set is returned.
/// Applying the same reorientation to an already-reoriented set is the
/// identity.
///
/// # Errors
///
/// Returns a [`GeometryError`] if the indices are not pairwise distinct, out
/// of bounds, or describe a coincident/collinear atom triple.
pub fn orient_rigid(
    i: usize,
    j: usize,
    k: usize,
    coords: &[Point3<f64>],
) -> Result<Vec<Point3<f64>>, GeometryError> {
    check_triple(i, j, k, coords)?;
    let origin = coords[i];
    let mut xyz: Vec<Point3<f64>> = coords.iter().map(|p| Point3::from(p - origin)).collect();
    rotate_about_x(j, &mut xyz)?;
    rotate_about_z(j, &mut xyz)?;
    rotate_about_x(k, &mut xyz)?;
    Ok(xyz)
}

/// Rigid-body rotation: the same alignment as [`orient_rigid`], but atom `i`
/// keeps its original position (rotation only, no net translation).
///
/// # Errors
///
/// Same failure modes as [`orient_rigid`].
pub fn rotate_rigid(
    i: usize,
    j: usize,
    k: usize,
    coords: &[Point3<f64>],
) -> Result<Vec<Point3<f64>>, GeometryError> {
    let origin = coords
        .get(i)
        .copied()
        .ok_or(GeometryError::IndexOutOfBounds {
            index: i,
            len: coords.len(),
        })?;
    let mut xyz = orient_rigid(i, j, k, coords)?;
    for point in xyz.iter_mut() {
        *point += origin.coords;
    }
    Ok(xyz)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOLERANCE: f64 = 1e-8;

    fn approx_zero(v: f64) -> bool {
        v.abs() < TOLERANCE
    }

    fn quadrant_case(y: f64, z: f64) {
        let mut coords = vec![Point3::new(0.5, y, z), Point3::new(1.0, -2.0, 0.7)];
        let norm_before = coords[0].coords.norm();
        rotate_about_x(0, &mut coords).unwrap();
        assert!(approx_zero(coords[0].z), "z not zeroed for ({y}, {z})");
        assert!(coords[0].y >= 0.0, "y negative for ({y}, {z})");
        assert!(approx_zero(coords[0].coords.norm() - norm_before));
    }

    #[test]
    fn rotate_about_x_handles_all_four_quadrants() {
        quadrant_case(1.0, 1.0);
        quadrant_case(-1.0, 1.0);
        quadrant_case(1.0, -1.0);
        quadrant_case(-1.0, -1.0);
    }

    #[test]
    fn rotate_about_x_is_a_no_op_for_an_atom_on_the_axis() {
        let mut coords = vec![Point3::new(2.0, 0.0, 0.0), Point3::new(0.0, 1.0, 1.0)];
        let before = coords.clone();
        rotate_about_x(0, &mut coords).unwrap();
        assert_eq!(coords, before);
    }

    #[test]
    fn rotate_about_x_rejects_an_atom_at_the_origin() {
        let mut coords = vec![Point3::origin(), Point3::new(1.0, 0.0, 0.0)];
        assert_eq!(
            rotate_about_x(0, &mut coords).unwrap_err(),
            GeometryError::DegenerateAxis { index: 0 }
        );
    }

    #[test]
    fn rotate_about_z_handles_all_four_quadrants() {
        for (x, y) in [(1.0, 1.0), (-1.0, 1.0), (1.0, -1.0), (-1.0, -1.0)] {
            let mut coords = vec![Point3::new(x, y, 0.3)];
            let norm_before = coords[0].coords.norm();
            rotate_about_z(0, &mut coords).unwrap();
            assert!(approx_zero(coords[0].y), "y not zeroed for ({x}, {y})");
            assert!(coords[0].x >= 0.0, "x negative for ({x}, {y})");
            assert!(approx_zero(coords[0].coords.norm() - norm_before));
        }
    }

    fn bent_triatomic() -> Vec<Point3<f64>> {
        vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(2.5, 2.2, 4.1),
            Point3::new(0.7, 3.4, 2.8),
            Point3::new(-1.0, 0.5, 0.2),
        ]
    }

    #[test]
    fn orient_rigid_aligns_the_atom_triple() {
        let coords = bent_triatomic();
        let oriented = orient_rigid(0, 1, 2, &coords).unwrap();

        assert!(approx_zero(oriented[0].coords.norm()));
        assert!(approx_zero(oriented[1].y));
        assert!(approx_zero(oriented[1].z));
        assert!(oriented[1].x > 0.0);
        assert!(approx_zero(oriented[2].z));
    }

    #[test]
    fn orient_rigid_preserves_internal_distances() {
        let coords = bent_triatomic();
        let oriented = orient_rigid(0, 1, 2, &coords).unwrap();
        for a in 0..coords.len() {
            for b in 0..coords.len() {
                let before = (coords[a] - coords[b]).norm();
                let after = (oriented[a] - oriented[b]).norm();
                assert!(approx_zero(before - after));
            }
        }
    }

    #[test]
    fn orient_rigid_is_idempotent() {
        let coords = bent_triatomic();
        let once = orient_rigid(0, 1, 2, &coords).unwrap();
        let twice = orient_rigid(0, 1, 2, &once).unwrap();
        for (a, b) in once.iter().zip(&twice) {
            assert!((a - b).norm() < TOLERANCE);
        }
    }

    #[test]
    fn orient_rigid_does_not_mutate_its_input() {
        let coords = bent_triatomic();
        let snapshot = coords.clone();
        orient_rigid(0, 1, 2, &coords).unwrap();
        assert_eq!(coords, snapshot);
    }

    #[test]
    fn rotate_rigid_keeps_the_pivot_atom_fixed() {
        let coords = bent_triatomic();
        let rotated = rotate_rigid(0, 1, 2, &coords).unwrap();
        assert_eq!(rotated[0], coords[0]);
        assert!(approx_zero((rotated[1] - coords[0]).y));
        assert!(approx_zero((rotated[1] - coords[0]).z));
    }

    #[test]
    fn duplicate_indices_are_rejected() {
        let coords = bent_triatomic();
        assert_eq!(
            orient_rigid(0, 0, 2, &coords).unwrap_err(),
            GeometryError::IndicesNotDistinct { i: 0, j: 0, k: 2 }
        );
        assert_eq!(
            rotate_rigid(1, 2, 1, &coords).unwrap_err(),
            GeometryError::IndicesNotDistinct { i: 1, j: 2, k: 1 }
        );
    }

    #[test]
    fn collinear_triples_are_rejected() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 2.0, 0.0),
        ];
        assert_eq!(
            orient_rigid(0, 1, 2, &coords).unwrap_err(),
            GeometryError::CollinearAtoms { i: 0, j: 1, k: 2 }
        );
    }

    #[test]
    fn coincident_atoms_are_rejected() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 1.0),
        ];
        assert_eq!(
            orient_rigid(0, 1, 2, &coords).unwrap_err(),
            GeometryError::CoincidentAtoms { i: 0, other: 1 }
        );
    }

    #[test]
    fn out_of_bounds_index_is_rejected() {
        let coords = bent_triatomic();
        assert_eq!(
            orient_rigid(0, 1, 9, &coords).unwrap_err(),
            GeometryError::IndexOutOfBounds { index: 9, len: 4 }
        );
    }
}
