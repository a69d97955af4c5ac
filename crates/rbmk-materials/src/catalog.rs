//! Standard materials of the RBMK fuel channel.
//!
//! | Name | Composition | Density (g/cm³) |
//! |------|-------------|-----------------|
//! | `{e}% Fuel` | U (enriched, e wt%) 1.0, O16 2.0 | 10.400 |
//! | `Water` | H1 2.0, O16 1.0, S(α,β) `c_H_in_H2O` | 1.0 |
//! | `Zircaloy` | Zr 0.99, Nb 0.1 | 8.59 |
//! | `Helium` | He 1.0 | 0.178 |
//! | `Carrier Rod Material` | Zr 0.975, Nb 0.025 | 8.59 |
//!
//! The collection order above is the export order (ids 1–5).

use crate::material::{DensityUnit, Material, MaterialError, MaterialId, Materials};

/// Reference fuel enrichment (wt% U235).
pub const DEFAULT_ENRICHMENT: f64 = 2.0;

/// Name of the fuel material at a given enrichment, e.g. `"2.0% Fuel"`.
pub fn fuel_name(enrichment: f64) -> String {
    format!("{:.1}% Fuel", enrichment)
}

/// Uranium dioxide fuel.
pub fn fuel(enrichment: f64) -> Result<Material, MaterialError> {
    Material::builder(fuel_name(enrichment))
        .enriched_element("U", 1.0, enrichment)
        .nuclide("O16", 2.0)
        .density(DensityUnit::GramPerCm3, 10.4)
        .build()
}

/// Light-water coolant/moderator with bound-hydrogen scattering.
pub fn water() -> Result<Material, MaterialError> {
    Material::builder("Water")
        .nuclide("H1", 2.0)
        .nuclide("O16", 1.0)
        .sab("c_H_in_H2O")
        .density(DensityUnit::GramPerCm3, 1.0)
        .build()
}

/// Zirconium-niobium cladding alloy.
pub fn zircaloy() -> Result<Material, MaterialError> {
    Material::builder("Zircaloy")
        .element("Zr", 0.99)
        .element("Nb", 0.1)
        .density(DensityUnit::GramPerCm3, 8.59)
        .build()
}

/// Helium fill gas for pellet gaps, sleeves and the carrier rod bore.
pub fn helium() -> Result<Material, MaterialError> {
    Material::builder("Helium")
        .element("He", 1.0)
        .density(DensityUnit::GramPerCm3, 0.178)
        .build()
}

/// Zr-2.5Nb carrier rod wall.
pub fn carrier_rod() -> Result<Material, MaterialError> {
    Material::builder("Carrier Rod Material")
        .element("Zr", 0.975)
        .element("Nb", 0.025)
        .density(DensityUnit::GramPerCm3, 8.59)
        .build()
}

/// Ids of the standard materials within their [`Materials`] collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StandardIds {
    pub fuel: MaterialId,
    pub water: MaterialId,
    pub zircaloy: MaterialId,
    pub helium: MaterialId,
    pub carrier_rod: MaterialId,
}

/// Build the full standard collection for a fuel enrichment.
pub fn standard_materials(enrichment: f64) -> Result<(Materials, StandardIds), MaterialError> {
    let mut materials = Materials::new();
    let ids = StandardIds {
        fuel: materials.add(fuel(enrichment)?)?,
        water: materials.add(water()?)?,
        zircaloy: materials.add(zircaloy()?)?,
        helium: materials.add(helium()?)?,
        carrier_rod: materials.add(carrier_rod()?)?,
    };
    Ok((materials, ids))
}
