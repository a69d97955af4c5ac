//! Infinite surfaces that bound CSG half-spaces.
//!
//! Every surface is described by an implicit function $f(\mathbf{r})$; the
//! negative half-space is $f < 0$ (below a plane, inside a cylinder) and the
//! positive half-space is $f \ge 0$. Points lying exactly on a surface
//! therefore belong to the positive side, so a half-space and its
//! complement always partition space.

use serde::{Deserialize, Serialize};

/// Boundary condition applied where particles cross a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryCondition {
    /// Particles pass through (no boundary).
    #[default]
    Transmission,
    Reflective,
    Vacuum,
    White,
}

impl BoundaryCondition {
    pub fn as_str(self) -> &'static str {
        match self {
            BoundaryCondition::Transmission => "transmission",
            BoundaryCondition::Reflective => "reflective",
            BoundaryCondition::Vacuum => "vacuum",
            BoundaryCondition::White => "white",
        }
    }
}

/// Geometric kind and parameters of a surface (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SurfaceKind {
    XPlane { x0: f64 },
    YPlane { y0: f64 },
    ZPlane { z0: f64 },
    /// Infinite cylinder parallel to the z axis.
    ZCylinder { x0: f64, y0: f64, r: f64 },
}

/// Index of a surface in a [`Geometry`](crate::geometry::Geometry).
///
/// The exported id is the index plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SurfaceId(pub usize);

impl SurfaceId {
    pub fn export_id(self) -> usize {
        self.0 + 1
    }
}

/// An infinite surface with its boundary condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub kind: SurfaceKind,
    #[serde(default)]
    pub boundary: BoundaryCondition,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Surface {
    pub fn new(kind: SurfaceKind) -> Self {
        Self {
            kind,
            boundary: BoundaryCondition::Transmission,
            name: None,
        }
    }

    pub fn x_plane(x0: f64) -> Self {
        Self::new(SurfaceKind::XPlane { x0 })
    }

    pub fn y_plane(y0: f64) -> Self {
        Self::new(SurfaceKind::YPlane { y0 })
    }

    pub fn z_plane(z0: f64) -> Self {
        Self::new(SurfaceKind::ZPlane { z0 })
    }

    /// Cylinder of radius `r` about the z-parallel axis through `(x0, y0)`.
    pub fn z_cylinder(x0: f64, y0: f64, r: f64) -> Self {
        Self::new(SurfaceKind::ZCylinder { x0, y0, r })
    }

    pub fn with_boundary(mut self, boundary: BoundaryCondition) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Evaluate the implicit surface function at a point.
    pub fn evaluate(&self, point: &[f64; 3]) -> f64 {
        match self.kind {
            SurfaceKind::XPlane { x0 } => point[0] - x0,
            SurfaceKind::YPlane { y0 } => point[1] - y0,
            SurfaceKind::ZPlane { z0 } => point[2] - z0,
            SurfaceKind::ZCylinder { x0, y0, r } => {
                let dx = point[0] - x0;
                let dy = point[1] - y0;
                dx * dx + dy * dy - r * r
            }
        }
    }

    /// Engine type keyword, e.g. `"z-cylinder"`.
    pub fn type_name(&self) -> &'static str {
        match self.kind {
            SurfaceKind::XPlane { .. } => "x-plane",
            SurfaceKind::YPlane { .. } => "y-plane",
            SurfaceKind::ZPlane { .. } => "z-plane",
            SurfaceKind::ZCylinder { .. } => "z-cylinder",
        }
    }

    /// Coefficients in the engine's order for this surface type.
    pub fn coefficients(&self) -> Vec<f64> {
        match self.kind {
            SurfaceKind::XPlane { x0 } => vec![x0],
            SurfaceKind::YPlane { y0 } => vec![y0],
            SurfaceKind::ZPlane { z0 } => vec![z0],
            SurfaceKind::ZCylinder { x0, y0, r } => vec![x0, y0, r],
        }
    }

    /// Whether the surface parameters are finite and (for cylinders) the
    /// radius is positive.
    pub fn is_well_formed(&self) -> bool {
        let finite = self.coefficients().iter().all(|c| c.is_finite());
        match self.kind {
            SurfaceKind::ZCylinder { r, .. } => finite && r > 0.0,
            _ => finite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_sign() {
        let s = Surface::z_plane(12.0);
        assert!(s.evaluate(&[0.0, 0.0, 11.0]) < 0.0);
        assert!(s.evaluate(&[0.0, 0.0, 13.0]) > 0.0);
        assert_eq!(s.evaluate(&[5.0, -3.0, 12.0]), 0.0);
    }

    #[test]
    fn test_cylinder_sign() {
        let s = Surface::z_cylinder(1.0, 1.0, 0.5);
        assert!(s.evaluate(&[1.2, 1.0, 100.0]) < 0.0);
        assert!(s.evaluate(&[0.0, 0.0, 0.0]) > 0.0);
        assert_eq!(s.type_name(), "z-cylinder");
        assert_eq!(s.coefficients(), vec![1.0, 1.0, 0.5]);
    }

    #[test]
    fn test_boundary_default_is_transmission() {
        let s = Surface::x_plane(0.0);
        assert_eq!(s.boundary, BoundaryCondition::Transmission);
        let s = s.with_boundary(BoundaryCondition::Reflective);
        assert_eq!(s.boundary.as_str(), "reflective");
    }

    #[test]
    fn test_well_formed() {
        assert!(Surface::z_cylinder(0.0, 0.0, 4.0).is_well_formed());
        assert!(!Surface::z_cylinder(0.0, 0.0, 0.0).is_well_formed());
        assert!(!Surface::y_plane(f64::NAN).is_well_formed());
    }
}
