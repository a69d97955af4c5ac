//! # RBMK Geometry
//!
//! Constructive solid geometry for RBMK channel models. This crate provides:
//!
//! - **Surfaces** ([`surface`]) — Planes and z-cylinders with boundary
//!   conditions.
//! - **Regions** ([`region`]) — Boolean half-space expressions built with
//!   `-`, `&`, `|` and `!`.
//! - **Cells and universes** ([`universe`]) — Material or universe fills,
//!   placed with [`transform::Translation`]s.
//! - **Geometry arena** ([`geometry`]) — Owns surfaces and universes,
//!   validates references and numbers cells for export.
//! - **Ring layout** ([`layout`]) — Closed-form pin placement on the
//!   6 + 12 RBMK rings.
//! - **Coverage** ([`coverage`]) — Lattice sampling for gaps and overlaps.

pub mod coverage;
pub mod geometry;
pub mod layout;
pub mod region;
pub mod surface;
pub mod transform;
pub mod universe;

pub use geometry::{CellRef, Geometry, GeometryError};
pub use region::{Region, Sense};
pub use surface::{BoundaryCondition, Surface, SurfaceId, SurfaceKind};
pub use transform::Translation;
pub use universe::{Cell, Fill, Universe, UniverseId};
