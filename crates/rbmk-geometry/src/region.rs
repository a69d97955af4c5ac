//! Boolean regions over surface half-spaces.
//!
//! Regions are pure values built with operators:
//!
//! | Expression | Meaning |
//! |-----------|---------|
//! | `-s` | negative half-space of surface `s` |
//! | `s.positive()` | positive half-space of `s` |
//! | `a & b` | intersection |
//! | `a \| b` | union |
//! | `!a` | complement |
//!
//! Complementing a single half-space flips its sense, so `!(-s)` is the same
//! region as `s.positive()`. The [`Display`](std::fmt::Display)
//! implementation renders the engine's region syntax using exported surface
//! ids (`-3 4 ~(-7 9 -10)`).

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{BitAnd, BitAndAssign, BitOr, Neg, Not};

use serde::{Deserialize, Serialize};

use crate::surface::{Surface, SurfaceId};

/// Side of a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sense {
    Negative,
    Positive,
}

impl Sense {
    pub fn flip(self) -> Self {
        match self {
            Sense::Negative => Sense::Positive,
            Sense::Positive => Sense::Negative,
        }
    }
}

/// A boolean expression over half-spaces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Region {
    Halfspace { surface: SurfaceId, sense: Sense },
    Intersection(Vec<Region>),
    Union(Vec<Region>),
    Complement(Box<Region>),
}

impl SurfaceId {
    /// Negative half-space (`-s`).
    pub fn negative(self) -> Region {
        Region::Halfspace {
            surface: self,
            sense: Sense::Negative,
        }
    }

    /// Positive half-space (`+s`).
    pub fn positive(self) -> Region {
        Region::Halfspace {
            surface: self,
            sense: Sense::Positive,
        }
    }
}

impl Neg for SurfaceId {
    type Output = Region;

    fn neg(self) -> Region {
        self.negative()
    }
}

impl Region {
    /// Test whether a point lies in the region.
    ///
    /// `surfaces` is indexed by [`SurfaceId`]; a dangling id is treated as
    /// not containing the point.
    pub fn contains(&self, surfaces: &[Surface], point: &[f64; 3]) -> bool {
        match self {
            Region::Halfspace { surface, sense } => match surfaces.get(surface.0) {
                Some(s) => {
                    let negative = s.evaluate(point) < 0.0;
                    match sense {
                        Sense::Negative => negative,
                        Sense::Positive => !negative,
                    }
                }
                None => false,
            },
            Region::Intersection(nodes) => nodes.iter().all(|n| n.contains(surfaces, point)),
            Region::Union(nodes) => nodes.iter().any(|n| n.contains(surfaces, point)),
            Region::Complement(node) => !node.contains(surfaces, point),
        }
    }

    /// All surfaces referenced by the region, in id order.
    pub fn surfaces(&self) -> BTreeSet<SurfaceId> {
        let mut out = BTreeSet::new();
        self.collect_surfaces(&mut out);
        out
    }

    fn collect_surfaces(&self, out: &mut BTreeSet<SurfaceId>) {
        match self {
            Region::Halfspace { surface, .. } => {
                out.insert(*surface);
            }
            Region::Intersection(nodes) | Region::Union(nodes) => {
                for n in nodes {
                    n.collect_surfaces(out);
                }
            }
            Region::Complement(node) => node.collect_surfaces(out),
        }
    }

    fn fmt_node(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            Region::Halfspace { surface, sense } => match sense {
                Sense::Negative => write!(f, "-{}", surface.export_id()),
                Sense::Positive => write!(f, "{}", surface.export_id()),
            },
            Region::Intersection(nodes) => {
                if nested {
                    write!(f, "(")?;
                }
                for (i, n) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    n.fmt_node(f, true)?;
                }
                if nested {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Region::Union(nodes) => {
                if nested {
                    write!(f, "(")?;
                }
                for (i, n) in nodes.iter().enumerate() {
                    if i > 0 {
                        write!(f, " | ")?;
                    }
                    n.fmt_node(f, true)?;
                }
                if nested {
                    write!(f, ")")?;
                }
                Ok(())
            }
            Region::Complement(node) => {
                write!(f, "~")?;
                match node.as_ref() {
                    Region::Halfspace { .. } => {
                        write!(f, "(")?;
                        node.fmt_node(f, false)?;
                        write!(f, ")")
                    }
                    _ => node.fmt_node(f, true),
                }
            }
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_node(f, false)
    }
}

impl BitAnd for Region {
    type Output = Region;

    fn bitand(self, rhs: Region) -> Region {
        match (self, rhs) {
            (Region::Intersection(mut a), Region::Intersection(b)) => {
                a.extend(b);
                Region::Intersection(a)
            }
            (Region::Intersection(mut a), r) => {
                a.push(r);
                Region::Intersection(a)
            }
            (l, Region::Intersection(mut b)) => {
                b.insert(0, l);
                Region::Intersection(b)
            }
            (l, r) => Region::Intersection(vec![l, r]),
        }
    }
}

impl BitAndAssign for Region {
    fn bitand_assign(&mut self, rhs: Region) {
        let lhs = std::mem::replace(self, Region::Intersection(Vec::new()));
        *self = lhs & rhs;
    }
}

impl BitOr for Region {
    type Output = Region;

    fn bitor(self, rhs: Region) -> Region {
        match (self, rhs) {
            (Region::Union(mut a), Region::Union(b)) => {
                a.extend(b);
                Region::Union(a)
            }
            (Region::Union(mut a), r) => {
                a.push(r);
                Region::Union(a)
            }
            (l, Region::Union(mut b)) => {
                b.insert(0, l);
                Region::Union(b)
            }
            (l, r) => Region::Union(vec![l, r]),
        }
    }
}

impl Not for Region {
    type Output = Region;

    fn not(self) -> Region {
        match self {
            Region::Halfspace { surface, sense } => Region::Halfspace {
                surface,
                sense: sense.flip(),
            },
            Region::Complement(inner) => *inner,
            other => Region::Complement(Box::new(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surfaces() -> Vec<Surface> {
        vec![
            Surface::z_cylinder(0.0, 0.0, 1.0),
            Surface::z_plane(-1.0),
            Surface::z_plane(1.0),
            Surface::z_cylinder(0.5, 0.0, 0.2),
        ]
    }

    #[test]
    fn test_operators_and_display() {
        let cyl = SurfaceId(0);
        let lo = SurfaceId(1);
        let hi = SurfaceId(2);
        let region = -cyl & lo.positive() & -hi;
        assert_eq!(region.to_string(), "-1 2 -3");

        let union = -cyl | hi.positive();
        assert_eq!(union.to_string(), "-1 | 3");

        let nested = lo.positive() & union;
        assert_eq!(nested.to_string(), "2 (-1 | 3)");
    }

    #[test]
    fn test_complement_display() {
        let cyl = SurfaceId(0);
        let lo = SurfaceId(1);
        let hi = SurfaceId(2);
        let mut region = -cyl;
        region &= !(-SurfaceId(3) & lo.positive() & -hi);
        assert_eq!(region.to_string(), "-1 ~(-4 2 -3)");
    }

    #[test]
    fn test_halfspace_complement_flips_sense() {
        let s = SurfaceId(0);
        assert_eq!(!(-s), s.positive());
        assert_eq!(!!(-s & s.positive()), -s & s.positive());
    }

    #[test]
    fn test_contains() {
        let s = surfaces();
        let slab = -SurfaceId(0) & SurfaceId(1).positive() & -SurfaceId(2);
        assert!(slab.contains(&s, &[0.0, 0.0, 0.0]));
        assert!(!slab.contains(&s, &[0.0, 0.0, 2.0]));
        assert!(!slab.contains(&s, &[2.0, 0.0, 0.0]));

        let holed = slab.clone() & !(-SurfaceId(3));
        assert!(!holed.contains(&s, &[0.5, 0.0, 0.0]));
        assert!(holed.contains(&s, &[-0.5, 0.0, 0.0]));
    }

    #[test]
    fn test_complement_partitions_space() {
        let s = surfaces();
        let r = -SurfaceId(0) & SurfaceId(1).positive();
        let c = !r.clone();
        for p in [[0.0, 0.0, -1.0], [1.0, 0.0, 0.0], [0.3, 0.3, 5.0]] {
            assert_ne!(r.contains(&s, &p), c.contains(&s, &p));
        }
    }

    #[test]
    fn test_surfaces_collected() {
        let r = -SurfaceId(2) & !(SurfaceId(0).positive() | -SurfaceId(1));
        let ids: Vec<usize> = r.surfaces().into_iter().map(|s| s.0).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(r.to_string(), "-3 ~(1 | -2)");
    }
}
