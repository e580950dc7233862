#![warn(missing_docs)]

//! Math types for tube placement and joint geometry.
//!
//! Thin wrappers around nalgebra providing the domain types used by the
//! joint detector: points, vectors, placement transforms, the fixed
//! XYZ Euler convention, half-up rounding and segment proximity.
//!
//! # Rotation convention
//!
//! Every rotation in the workspace goes through [`Transform::euler_xyz`]:
//! intrinsic X, then Y, then Z, in radians. The resulting matrix is
//! `Rx * Ry * Rz`, so a local vector is rotated about Z first, then Y,
//! then X in the fixed world frame.

use nalgebra::{Matrix4, Vector3, Vector4};

/// A point in 3D space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// The local forward axis of a tube. Its length runs along this direction.
pub fn forward_axis() -> Vec3 {
    Vec3::z()
}

/// A 4x4 affine transformation matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Transform {
    /// The underlying 4x4 matrix.
    pub matrix: Matrix4<f64>,
}

impl Transform {
    /// Translation by `(dx, dy, dz)`.
    pub fn translation(dx: f64, dy: f64, dz: f64) -> Self {
        let mut m = Matrix4::identity();
        m[(0, 3)] = dx;
        m[(1, 3)] = dy;
        m[(2, 3)] = dz;
        Self { matrix: m }
    }

    /// Rotation about the X axis by `angle` radians.
    pub fn rotation_x(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(1, 1)] = c;
        m[(1, 2)] = -s;
        m[(2, 1)] = s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Y axis by `angle` radians.
    pub fn rotation_y(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 2)] = s;
        m[(2, 0)] = -s;
        m[(2, 2)] = c;
        Self { matrix: m }
    }

    /// Rotation about the Z axis by `angle` radians.
    pub fn rotation_z(angle: f64) -> Self {
        let (s, c) = angle.sin_cos();
        let mut m = Matrix4::identity();
        m[(0, 0)] = c;
        m[(0, 1)] = -s;
        m[(1, 0)] = s;
        m[(1, 1)] = c;
        Self { matrix: m }
    }

    /// Intrinsic X-then-Y-then-Z Euler rotation, angles in radians.
    ///
    /// Equivalent to `Rx * Ry * Rz`.
    pub fn euler_xyz(x: f64, y: f64, z: f64) -> Self {
        Self::rotation_x(x)
            .then(&Self::rotation_y(y))
            .then(&Self::rotation_z(z))
    }

    /// Placement of a body: rotate by `euler_xyz(rotation)`, then move to `position`.
    pub fn placement(position: &Point3, rotation: &Vec3) -> Self {
        Self::translation(position.x, position.y, position.z)
            .then(&Self::euler_xyz(rotation.x, rotation.y, rotation.z))
    }

    /// Compose: `self` then `other` (self * other).
    ///
    /// Applying the result to a point applies `other` first.
    pub fn then(&self, other: &Transform) -> Self {
        Self {
            matrix: self.matrix * other.matrix,
        }
    }

    /// Transform a point.
    pub fn apply_point(&self, p: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(p.x, p.y, p.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Transform a direction vector (ignores translation).
    pub fn apply_vec(&self, v: &Vec3) -> Vec3 {
        let r = self.matrix * Vector4::new(v.x, v.y, v.z, 0.0);
        Vec3::new(r.x, r.y, r.z)
    }
}

/// World-space orientation axis for a body with the given Euler rotation.
pub fn orientation_axis(rotation: &Vec3) -> Vec3 {
    Transform::euler_xyz(rotation.x, rotation.y, rotation.z).apply_vec(&forward_axis())
}

/// Angle between two vectors in degrees, in `[0, 180]`.
///
/// The cosine is clamped to `[-1, 1]` before `acos`. Zero-length input
/// yields 90, matching a zero dot product.
pub fn angle_between_deg(a: &Vec3, b: &Vec3) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 {
        return 90.0;
    }
    let cos = (a.dot(b) / denom).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

/// Round to `places` decimals, ties toward positive infinity.
///
/// `floor(value * 10^places + 0.5) / 10^places`.
pub fn round_half_up(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor + 0.5).floor() / factor
}

/// True if every component is finite.
pub fn is_finite3(v: &Vec3) -> bool {
    v.iter().all(|c| c.is_finite())
}

/// Closest points between segments `p1..q1` and `p2..q2`.
///
/// Returns `(on_first, on_second)`. Degenerate segments are treated as
/// points. For parallel segments the point pair sits at the centre of
/// their overlap along the first segment.
pub fn closest_points_on_segments(
    p1: &Point3,
    q1: &Point3,
    p2: &Point3,
    q2: &Point3,
) -> (Point3, Point3) {
    const EPS: f64 = 1e-12;

    let d1 = q1 - p1;
    let d2 = q2 - p2;
    let r = p1 - p2;
    let a = d1.dot(&d1);
    let e = d2.dot(&d2);
    let f = d2.dot(&r);

    if a <= EPS && e <= EPS {
        return (*p1, *p2);
    }
    if a <= EPS {
        let t = (f / e).clamp(0.0, 1.0);
        return (*p1, p2 + d2 * t);
    }

    let c = d1.dot(&r);
    if e <= EPS {
        let s = (-c / a).clamp(0.0, 1.0);
        return (p1 + d1 * s, *p2);
    }

    let b = d1.dot(&d2);
    let denom = a * e - b * b;

    let (s, t) = if denom <= EPS * a * e {
        let s0 = ((p2 - p1).dot(&d1) / a).clamp(0.0, 1.0);
        let s1 = ((q2 - p1).dot(&d1) / a).clamp(0.0, 1.0);
        let s = 0.5 * (s0 + s1);
        let t = ((p1 + d1 * s - p2).dot(&d2) / e).clamp(0.0, 1.0);
        (s, t)
    } else {
        let mut s = ((b * f - c * e) / denom).clamp(0.0, 1.0);
        let mut t = (b * s + f) / e;
        if t < 0.0 {
            t = 0.0;
            s = (-c / a).clamp(0.0, 1.0);
        } else if t > 1.0 {
            t = 1.0;
            s = ((b - c) / a).clamp(0.0, 1.0);
        }
        (s, t)
    };

    (p1 + d1 * s, p2 + d2 * t)
}
