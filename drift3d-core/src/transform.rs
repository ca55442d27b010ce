//! Rotation state and the fixed X -> Y -> Z rotation pipeline
use nalgebra::{Point3, Rotation3, Vector3};

/// Rotation around three axes (in radians)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    pub fn zero() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        }
    }

    /// Rotate by delta amounts (in radians). Angles are never wrapped.
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }

    /// Accumulate one tick of angular velocity
    pub fn advance(&mut self, velocity: &RotationState) {
        self.rotate(velocity.x, velocity.y, velocity.z);
    }

    /// Precompute the combined rotation for a whole vertex batch
    pub fn rotation(&self) -> Rotation3<f32> {
        let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), self.x);
        let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), self.y);
        let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), self.z);

        // Applied to a point: X first, then Y, then Z
        rz * ry * rx
    }

    /// Rotate a single point; the input is left untouched
    pub fn apply(&self, point: &Point3<f32>) -> Point3<f32> {
        self.rotation() * point
    }
}

impl Default for RotationState {
    fn default() -> Self {
        Self::zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: &Point3<f32>, b: &Point3<f32>) -> bool {
        (a - b).norm() < 1e-4
    }

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::zero();
        assert_eq!(state.x, 0.0);
        assert_eq!(state.y, 0.0);
        assert_eq!(state.z, 0.0);

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);

        state.advance(&RotationState::new(0.1, 0.0, -0.3));
        assert!((state.x - 0.2).abs() < 1e-6);
        assert!(state.z.abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let p = Point3::new(1.0, -2.0, 3.0);
        assert!(close(&RotationState::zero().apply(&p), &p));
    }

    #[test]
    fn test_quarter_turns_apply_x_then_y_then_z() {
        // (0,1,0) -X90-> (0,0,1) -Y90-> (1,0,0) -Z90-> (0,1,0)
        let state = RotationState::new(FRAC_PI_2, FRAC_PI_2, FRAC_PI_2);
        let out = state.apply(&Point3::new(0.0, 1.0, 0.0));
        assert!(close(&out, &Point3::new(0.0, 1.0, 0.0)), "got {out:?}");

        // (1,0,0): X leaves it, Y90 -> (0,0,-1), Z leaves it
        let out = state.apply(&Point3::new(1.0, 0.0, 0.0));
        assert!(close(&out, &Point3::new(0.0, 0.0, -1.0)), "got {out:?}");
    }

    #[test]
    fn test_matches_hand_computed_sequence() {
        let (ax, ay, az) = (0.3_f32, -0.7_f32, 1.1_f32);
        let p = Point3::new(1.0_f32, 2.0, 3.0);

        let (sx, cx) = ax.sin_cos();
        let (y1, z1) = (p.y * cx - p.z * sx, p.y * sx + p.z * cx);
        let x1 = p.x;

        let (sy, cy) = ay.sin_cos();
        let (x2, z2) = (x1 * cy + z1 * sy, -x1 * sy + z1 * cy);
        let y2 = y1;

        let (sz, cz) = az.sin_cos();
        let (x3, y3) = (x2 * cz - y2 * sz, x2 * sz + y2 * cz);

        let out = RotationState::new(ax, ay, az).apply(&p);
        assert!(close(&out, &Point3::new(x3, y3, z2)), "got {out:?}");

        // The opposite order lands somewhere else
        let reversed = Rotation3::from_axis_angle(&Vector3::x_axis(), ax)
            * Rotation3::from_axis_angle(&Vector3::y_axis(), ay)
            * Rotation3::from_axis_angle(&Vector3::z_axis(), az)
            * p;
        assert!(!close(&out, &reversed));
    }
}
