//! Core units, constants, and shared primitives for the uvlambert workspace.

/// Physical constants in the km / s unit system used throughout the workspace.
pub mod constants {
    /// Earth's gravitational parameter (km³/s²).
    pub const MU_EARTH: f64 = 398_600.441_8;
    /// Mean Earth radius (km).
    pub const EARTH_RADIUS_KM: f64 = 6_371.0;
    /// Geostationary altitude above the mean radius (km).
    pub const GEO_ALTITUDE_KM: f64 = 35_786.0;
    /// Mean Earth-Moon distance (km).
    pub const MOON_DISTANCE_KM: f64 = 384_400.0;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert seconds to hours.
    #[inline]
    pub fn seconds_to_hours(seconds: f64) -> f64 {
        seconds / 3_600.0
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in kilometres or km/s depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector. Zero for the zero vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Right-handed cross product `a × b`.
    #[inline]
    pub fn cross(a: &Vector3, b: &Vector3) -> Vector3 {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    /// Vector addition.
    #[inline]
    pub fn add(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
    }

    /// Vector subtraction.
    #[inline]
    pub fn sub(a: &Vector3, b: &Vector3) -> Vector3 {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Distance between two points.
    #[inline]
    pub fn distance(a: &Vector3, b: &Vector3) -> f64 {
        norm(&sub(a, b))
    }

    /// True when every component is finite.
    #[inline]
    pub fn is_finite(v: &Vector3) -> bool {
        v.iter().all(|c| c.is_finite())
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn cross_follows_right_hand_rule() {
            assert_eq!(cross(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
            assert_eq!(cross(&[0.0, 1.0, 0.0], &[1.0, 0.0, 0.0]), [0.0, 0.0, -1.0]);
        }

        #[test]
        fn cross_is_orthogonal_to_inputs() {
            let a = [-6045.0, -3490.0, 2500.0];
            let b = [-3738.0, 3000.0, 5000.0];
            let c = cross(&a, &b);
            assert!(dot(&c, &a).abs() < 1e-3);
            assert!(dot(&c, &b).abs() < 1e-3);
        }

        #[test]
        fn norm_of_zero_vector_is_zero() {
            assert_eq!(norm(&[0.0, 0.0, 0.0]), 0.0);
            assert_eq!(norm(&[3.0, 4.0, 12.0]), 13.0);
        }

        #[test]
        fn arithmetic_helpers_compose() {
            let a = [1.0, 2.0, 3.0];
            let b = [4.0, 5.0, 6.0];
            assert_eq!(sub(&add(&a, &b), &b), a);
            assert_eq!(scale(&a, 2.0), [2.0, 4.0, 6.0]);
            assert_eq!(distance(&a, &a), 0.0);
            assert!(!is_finite(&[f64::NAN, 0.0, 0.0]));
        }
    }
}
