//! Placement offsets for universe fills.
//!
//! A cell filled with a universe may translate it: the universe's local
//! origin sits at the translation vector in the parent frame. Points are
//! mapped into the child frame by subtracting the offset.

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// A rigid translation (cm).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Translation {
    #[serde(with = "vector3_serde")]
    pub offset: Vector3<f64>,
}

impl Default for Translation {
    fn default() -> Self {
        Self {
            offset: Vector3::zeros(),
        }
    }
}

impl Translation {
    pub fn new(dx: f64, dy: f64, dz: f64) -> Self {
        Self {
            offset: Vector3::new(dx, dy, dz),
        }
    }

    /// Map a parent-frame point into the translated universe's frame.
    pub fn to_local(&self, point: &[f64; 3]) -> [f64; 3] {
        let v = Vector3::new(point[0], point[1], point[2]) - self.offset;
        [v.x, v.y, v.z]
    }

    /// Compose two placements: `self` nested inside `outer`.
    pub fn then(&self, outer: &Translation) -> Translation {
        Translation {
            offset: self.offset + outer.offset,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.offset.x, self.offset.y, self.offset.z]
    }
}

mod vector3_serde {
    use nalgebra::Vector3;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &Vector3<f64>, s: S) -> Result<S::Ok, S::Error> {
        [v.x, v.y, v.z].serialize(s)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Vector3<f64>, D::Error> {
        let [x, y, z] = <[f64; 3]>::deserialize(d)?;
        Ok(Vector3::new(x, y, z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_is_zero_offset() {
        let t = Translation::default();
        let p = [1.0, 2.0, 3.0];
        assert_eq!(t.to_local(&p), p);
        assert_eq!(t.as_array(), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_to_local_subtracts_offset() {
        let local = Translation::new(1.5, -0.5, 0.0).to_local(&[1.0, 1.0, 1.0]);
        assert_relative_eq!(local[0], -0.5, epsilon = 1e-12);
        assert_relative_eq!(local[1], 1.5, epsilon = 1e-12);
        assert_relative_eq!(local[2], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_compose() {
        let inner = Translation::new(1.0, 0.0, 0.0);
        let outer = Translation::new(0.0, 2.0, 0.0);
        let t = inner.then(&outer);
        assert_eq!(t.as_array(), [1.0, 2.0, 0.0]);
        assert_eq!(t.to_local(&[1.0, 2.0, 5.0]), [0.0, 0.0, 5.0]);
    }
}
