//! Matrix construction helpers for transform nodes
//!
//! Euler angles are in radians and follow the XYZ convention: X is applied
//! first, Z last, so the rotation matrix is `Rz * Ry * Rx`.

use glam::{EulerRot, Mat4, Vec3};

/// Builds `T * R * Sx * Sy * Sz`: scale first, then rotation, then translation
pub fn compose_matrix(location: Vec3, rotation: Vec3, scale: Vec3) -> Mat4 {
    Mat4::from_translation(location)
        * rotation_matrix(rotation)
        * Mat4::from_scale(Vec3::new(scale.x, 1.0, 1.0))
        * Mat4::from_scale(Vec3::new(1.0, scale.y, 1.0))
        * Mat4::from_scale(Vec3::new(1.0, 1.0, scale.z))
}

/// Rebuilds a pure rotation matrix from the Euler angles of `matrix`.
///
/// Translation and scale are dropped. Near gimbal lock the angles chosen by
/// the decomposition may differ from the ones the matrix was built from.
pub fn extract_rotation(matrix: &Mat4) -> Mat4 {
    rotation_matrix(to_euler(matrix))
}

/// Builds `Rz * Ry * Rx` from an Euler vector
pub fn rotation_matrix(rotation: Vec3) -> Mat4 {
    Mat4::from_rotation_z(rotation.z)
        * Mat4::from_rotation_y(rotation.y)
        * Mat4::from_rotation_x(rotation.x)
}

/// XYZ Euler angles of the rotation part of `matrix`.
///
/// A matrix with a collapsed axis has no recoverable rotation and yields
/// zero angles.
pub fn to_euler(matrix: &Mat4) -> Vec3 {
    let axis_lengths = Vec3::new(
        matrix.x_axis.truncate().length(),
        matrix.y_axis.truncate().length(),
        matrix.z_axis.truncate().length(),
    );
    if axis_lengths.min_element() == 0.0 {
        return Vec3::ZERO;
    }
    let (_, rotation, _) = matrix.to_scale_rotation_translation();
    let (z, y, x) = rotation.to_euler(EulerRot::ZYX);
    let angles = Vec3::new(x, y, z);
    if angles.is_finite() { angles } else { Vec3::ZERO }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn assert_matrix_eq(a: Mat4, b: Mat4) {
        assert!(a.abs_diff_eq(b, 1e-5), "{:?} != {:?}", a, b);
    }

    #[test]
    fn test_zero_rotation_is_identity() {
        assert_eq!(rotation_matrix(Vec3::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn test_neutral_compose_is_identity() {
        assert_eq!(compose_matrix(Vec3::ZERO, Vec3::ZERO, Vec3::ONE), Mat4::IDENTITY);
    }

    #[test]
    fn test_rotation_order() {
        // X first: +Y goes to +Z, then Z turns +Z into itself
        let m = rotation_matrix(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        let p = m.transform_point3(Vec3::Y);
        assert!(p.abs_diff_eq(Vec3::Z, 1e-5), "{:?}", p);

        // +X stays on X under Rx, then Rz sends it to +Y
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::Y, 1e-5), "{:?}", p);
    }

    #[test]
    fn test_compose_applies_scale_rotation_translation() {
        let m = compose_matrix(
            Vec3::new(10.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, FRAC_PI_2),
            Vec3::new(2.0, 1.0, 1.0),
        );
        // (1,0,0) -> scaled (2,0,0) -> rotated (0,2,0) -> moved (10,2,0)
        let p = m.transform_point3(Vec3::X);
        assert!(p.abs_diff_eq(Vec3::new(10.0, 2.0, 0.0), 1e-5), "{:?}", p);
    }

    #[test]
    fn test_extract_rotation_drops_translation_and_scale() {
        let rotation = Vec3::new(0.3, -0.2, 1.1);
        let m = compose_matrix(Vec3::new(4.0, 5.0, 6.0), rotation, Vec3::new(2.0, 3.0, 0.5));
        assert_matrix_eq(extract_rotation(&m), rotation_matrix(rotation));
    }

    #[test]
    fn test_extract_rotation_is_idempotent() {
        let m = compose_matrix(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.7, 0.4, -2.5), Vec3::splat(1.5));
        let once = extract_rotation(&m);
        let twice = extract_rotation(&once);
        assert_matrix_eq(once, twice);
    }

    #[test]
    fn test_to_euler_recovers_angles() {
        let rotation = Vec3::new(0.5, -0.4, 2.0);
        let recovered = to_euler(&rotation_matrix(rotation));
        assert!(recovered.abs_diff_eq(rotation, 1e-5), "{:?}", recovered);
    }

    #[test]
    fn test_extract_rotation_of_zero_scale_is_identity() {
        let collapsed = compose_matrix(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.3, 0.2, 0.1), Vec3::ZERO);
        let rotation = extract_rotation(&collapsed);
        assert!(rotation.is_finite());
        assert_matrix_eq(rotation, Mat4::IDENTITY);

        let flattened = compose_matrix(Vec3::ZERO, Vec3::new(0.3, 0.2, 0.1), Vec3::new(1.0, 0.0, 1.0));
        assert_matrix_eq(extract_rotation(&flattened), Mat4::IDENTITY);
        assert_eq!(to_euler(&Mat4::ZERO), Vec3::ZERO);
    }
}
