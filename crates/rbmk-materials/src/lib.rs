//! # RBMK Materials
//!
//! Material compositions for RBMK channel models. Materials are declared
//! from nuclides and natural elements, frozen on construction, and expanded
//! to nuclide lists when exported to the transport engine.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`material`] | [`Material`](material::Material), builder, [`Materials`](material::Materials) collection |
//! | [`nuclides`] | Natural abundance table, atomic masses, uranium enrichment |
//! | [`catalog`] | Fuel, water, zircaloy, helium and carrier rod definitions |
//!
//! Element and nuclide names (`"U"`, `"O16"`, `"c_H_in_H2O"`) are passed to
//! the engine verbatim and must match its nuclear data library.

pub mod catalog;
pub mod material;
pub mod nuclides;

pub use material::{
    Constituent, Density, DensityUnit, Material, MaterialBuilder, MaterialError, MaterialId,
    Materials, NuclideFraction, Percent,
};
