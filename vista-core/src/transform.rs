//! Tilt transform value and its matrix/CSS forms
use nalgebra::{Matrix4, Vector3, Vector4};

use crate::geometry::Point;

/// Rotation around the X and Y axes, in degrees
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rotation {
    pub x_deg: f32,
    pub y_deg: f32,
}

impl Rotation {
    pub fn new(x_deg: f32, y_deg: f32) -> Self {
        Self { x_deg, y_deg }
    }

    pub fn zero() -> Self {
        Self::default()
    }
}

/// A perspective rotation plus uniform scale, ready to hand to a renderer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TiltTransform {
    pub rotation: Rotation,
    pub scale: f32,
    /// Perspective distance; `None` for the untransformed identity
    pub perspective: Option<f32>,
}

impl TiltTransform {
    pub fn new(rotation: Rotation, scale: f32, perspective: f32) -> Self {
        Self {
            rotation,
            scale,
            perspective: Some(perspective),
        }
    }

    /// The untransformed state: no rotation, no scale change
    pub fn identity() -> Self {
        Self {
            rotation: Rotation::zero(),
            scale: 1.0,
            perspective: None,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.perspective.is_none() && self.rotation == Rotation::zero() && self.scale == 1.0
    }

    /// CSS `transform` value. The identity serializes to an empty string,
    /// which clears an inline style.
    pub fn to_css(&self) -> String {
        let Some(perspective) = self.perspective else {
            return String::new();
        };
        format!(
            "perspective({}px) rotateX({}deg) rotateY({}deg) scale({})",
            perspective, self.rotation.x_deg, self.rotation.y_deg, self.scale
        )
    }

    /// Homogeneous matrix applying scale, then Y and X rotation, then perspective
    pub fn matrix(&self) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(self.rotation.x_deg.to_radians(), 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, self.rotation.y_deg.to_radians(), 0.0));
        let scale = Matrix4::new_scaling(self.scale);

        let mut projection = Matrix4::identity();
        if let Some(distance) = self.perspective {
            projection[(3, 2)] = -1.0 / distance;
        }

        projection * rx * ry * scale
    }

    /// Project a point in the element's plane, given relative to its center,
    /// to where it lands on screen. `None` when the point falls behind the
    /// viewer.
    pub fn project(&self, offset: Point) -> Option<Point> {
        let clip = self.matrix() * Vector4::new(offset.x, offset.y, 0.0, 1.0);
        if clip.w < 1e-6 {
            return None;
        }
        Some(Point::new(clip.x / clip.w, clip.y / clip.w))
    }
}

impl Default for TiltTransform {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_matrix() {
        let matrix = TiltTransform::identity().matrix();
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_identity_css_is_empty() {
        assert_eq!(TiltTransform::identity().to_css(), "");
        assert!(TiltTransform::identity().is_identity());
    }

    #[test]
    fn test_css_format() {
        let transform = TiltTransform::new(Rotation::new(1.5, -3.0), 1.02, 900.0);
        assert_eq!(
            transform.to_css(),
            "perspective(900px) rotateX(1.5deg) rotateY(-3deg) scale(1.02)"
        );
        assert!(!transform.is_identity());
    }

    #[test]
    fn test_project_near_edge_grows() {
        // Positive rotateY turns the right edge away from the viewer
        let transform = TiltTransform::new(Rotation::new(0.0, 3.0), 1.0, 900.0);
        let left = transform.project(Point::new(-150.0, 0.0)).unwrap();
        let right = transform.project(Point::new(150.0, 0.0)).unwrap();
        assert!(left.x < -150.0 * 3f32.to_radians().cos());
        assert!(right.x < 150.0);
        assert!(left.x + right.x < 0.0);

        let flat = TiltTransform::identity().project(Point::new(40.0, -25.0)).unwrap();
        assert!((flat.x - 40.0).abs() < 1e-4 && (flat.y + 25.0).abs() < 1e-4);
    }

    #[test]
    fn test_project_behind_viewer() {
        let transform = TiltTransform::new(Rotation::new(0.0, 80.0), 1.0, 100.0);
        assert!(transform.project(Point::new(-500.0, 0.0)).is_none());
    }

    #[test]
    fn test_perspective_term() {
        let transform = TiltTransform::new(Rotation::zero(), 1.0, 900.0);
        let matrix = transform.matrix();
        assert!((matrix[(3, 2)] + 1.0 / 900.0).abs() < 1e-9);
        assert!((matrix[(0, 0)] - 1.0).abs() < 1e-6);
    }
}
