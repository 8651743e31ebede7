//! Geometry primitives.
//!
//! Every primitive appends vertices and triangle indices to a
//! [`VertexBuffers`](crate::VertexBuffers) and advances its `idx` cursor by
//! the number of vertices added. None of them touches GPU state, so models
//! can be built and tested entirely on the CPU.
//!
//! Primitives that need an in-plane orientation and are not given one sample
//! a random direction, so their surface texture varies call-to-call; pass
//! explicit orientation vectors for deterministic output.

mod cone;
mod flat;
mod line;
mod sphere;
mod tube;

use glam::Vec3;
use rand::Rng;

/// A deterministic pair of unit vectors orthogonal to `axis` and each other.
#[must_use]
pub fn orthonormal_pair(axis: Vec3) -> (Vec3, Vec3) {
    let axis = axis.normalize_or_zero();
    let seed = if axis.x.abs() < 0.9 { Vec3::X } else { Vec3::Y };
    let ux = axis.cross(seed).normalize_or_zero();
    let uy = axis.cross(ux).normalize_or_zero();
    (ux, uy)
}

/// A randomly rotated pair of unit vectors orthogonal to `axis`.
#[must_use]
pub fn random_inplane_pair(axis: Vec3) -> (Vec3, Vec3) {
    let (ux, uy) = orthonormal_pair(axis);
    let phi: f32 = rand::thread_rng().gen_range(0.0..std::f32::consts::TAU);
    let (s, c) = phi.sin_cos();
    (ux * c + uy * s, uy * c - ux * s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_orthonormal_pair_is_orthogonal() {
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, Vec3::new(1.0, 2.0, -0.5)] {
            let (ux, uy) = orthonormal_pair(axis);
            let a = axis.normalize();
            assert!(ux.dot(a).abs() < 1e-6);
            assert!(uy.dot(a).abs() < 1e-6);
            assert!(ux.dot(uy).abs() < 1e-6);
            assert!((ux.length() - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_random_inplane_pair_stays_in_plane() {
        let axis = Vec3::new(0.3, -1.0, 2.0);
        let (ux, uy) = random_inplane_pair(axis);
        let a = axis.normalize();
        assert!(ux.dot(a).abs() < 1e-5);
        assert!(uy.dot(a).abs() < 1e-5);
        assert!(ux.dot(uy).abs() < 1e-5);
    }
}
