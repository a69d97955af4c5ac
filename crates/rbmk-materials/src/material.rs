//! Material compositions.
//!
//! A [`Material`] is a named mixture of nuclides and elements with a density
//! and optional thermal scattering tables. Materials are assembled with a
//! [`MaterialBuilder`] and are immutable afterwards; [`Materials`] holds the
//! ordered collection that is exported to the transport engine, and hands
//! out the [`MaterialId`]s that cells use to refer to their fill.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nuclides::{enriched_uranium, natural_isotopes};

/// Errors from material construction and element expansion.
#[derive(Debug, Error, PartialEq)]
pub enum MaterialError {
    #[error("Fraction of '{constituent}' must be positive and finite, got {fraction}")]
    InvalidFraction { constituent: String, fraction: f64 },

    #[error("Density of material '{material}' must be positive and finite, got {value}")]
    InvalidDensity { material: String, value: f64 },

    #[error("Material '{0}' has no density")]
    MissingDensity(String),

    #[error("Material '{0}' has no constituents")]
    Empty(String),

    #[error("Element '{0}' is not in the natural abundance table")]
    UnknownElement(String),

    #[error("Enrichment {enrichment} is not valid for element '{element}'")]
    InvalidEnrichment { element: String, enrichment: f64 },

    #[error("Material '{0}' mixes atom and weight fractions")]
    MixedPercentTypes(String),

    #[error("Duplicate material name: {0}")]
    DuplicateName(String),
}

/// How a constituent fraction is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Percent {
    /// Atom fraction.
    Ao,
    /// Weight fraction.
    Wo,
}

impl Percent {
    /// Attribute name used in `materials.xml`.
    pub fn attribute(self) -> &'static str {
        match self {
            Percent::Ao => "ao",
            Percent::Wo => "wo",
        }
    }
}

/// Density units understood by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DensityUnit {
    #[serde(rename = "g/cm3")]
    GramPerCm3,
    #[serde(rename = "kg/m3")]
    KilogramPerM3,
    #[serde(rename = "atom/b-cm")]
    AtomPerBarnCm,
}

impl DensityUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            DensityUnit::GramPerCm3 => "g/cm3",
            DensityUnit::KilogramPerM3 => "kg/m3",
            DensityUnit::AtomPerBarnCm => "atom/b-cm",
        }
    }
}

/// A material density with its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Density {
    pub unit: DensityUnit,
    pub value: f64,
}

/// One entry of a material's composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Constituent {
    /// A single nuclide, e.g. `O16`.
    Nuclide {
        name: String,
        fraction: f64,
        percent: Percent,
    },
    /// A natural element, e.g. `Zr`, optionally enriched (uranium only).
    Element {
        symbol: String,
        fraction: f64,
        percent: Percent,
        /// U235 enrichment in weight percent.
        enrichment: Option<f64>,
    },
}

impl Constituent {
    pub fn fraction(&self) -> f64 {
        match self {
            Constituent::Nuclide { fraction, .. } | Constituent::Element { fraction, .. } => {
                *fraction
            }
        }
    }

    pub fn percent(&self) -> Percent {
        match self {
            Constituent::Nuclide { percent, .. } | Constituent::Element { percent, .. } => {
                *percent
            }
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Constituent::Nuclide { name, .. } => name,
            Constituent::Element { symbol, .. } => symbol,
        }
    }
}

/// A nuclide entry after element expansion, ready for export.
#[derive(Debug, Clone, PartialEq)]
pub struct NuclideFraction {
    pub name: String,
    pub fraction: f64,
    pub percent: Percent,
}

/// A named, immutable material composition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    name: String,
    constituents: Vec<Constituent>,
    density: Density,
    sab: Vec<String>,
}

impl Material {
    /// Start building a material with the given name.
    pub fn builder(name: impl Into<String>) -> MaterialBuilder {
        MaterialBuilder {
            name: name.into(),
            constituents: Vec::new(),
            density: None,
            sab: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn constituents(&self) -> &[Constituent] {
        &self.constituents
    }

    pub fn density(&self) -> Density {
        self.density
    }

    /// Thermal scattering (S(α,β)) table names, e.g. `c_H_in_H2O`.
    pub fn sab(&self) -> &[String] {
        &self.sab
    }

    /// Expand every element into its isotopes.
    ///
    /// Natural elements use tabulated abundances; enriched uranium uses
    /// [`enriched_uranium`]. Weight-fraction elements distribute their
    /// fraction by isotope mass share. Nuclides are passed through
    /// unchanged. The output preserves constituent order.
    pub fn expanded_nuclides(&self) -> Result<Vec<NuclideFraction>, MaterialError> {
        let mut out = Vec::new();
        for constituent in &self.constituents {
            match constituent {
                Constituent::Nuclide {
                    name,
                    fraction,
                    percent,
                } => out.push(NuclideFraction {
                    name: name.clone(),
                    fraction: *fraction,
                    percent: *percent,
                }),
                Constituent::Element {
                    symbol,
                    fraction,
                    percent,
                    enrichment,
                } => {
                    let isotopes = natural_isotopes(symbol)
                        .ok_or_else(|| MaterialError::UnknownElement(symbol.clone()))?;

                    let atom_fractions: Vec<(&str, f64)> = match enrichment {
                        Some(e) => enriched_uranium(*e)?,
                        None => isotopes.iter().map(|i| (i.name, i.abundance)).collect(),
                    };

                    let shares = match percent {
                        Percent::Ao => atom_fractions,
                        Percent::Wo => to_weight_shares(&atom_fractions),
                    };

                    for (name, share) in shares {
                        if share > 0.0 {
                            out.push(NuclideFraction {
                                name: name.to_string(),
                                fraction: fraction * share,
                                percent: *percent,
                            });
                        }
                    }
                }
            }
        }
        Ok(out)
    }

    /// Whether the material contains a fissile uranium or plutonium nuclide.
    pub fn is_fissionable(&self) -> bool {
        self.constituents.iter().any(|c| match c {
            Constituent::Nuclide { name, .. } => {
                matches!(name.as_str(), "U233" | "U235" | "Pu239" | "Pu241")
            }
            Constituent::Element { symbol, .. } => symbol == "U",
        })
    }
}

fn to_weight_shares(atom_fractions: &[(&'static str, f64)]) -> Vec<(&'static str, f64)> {
    let weighted: Vec<(&'static str, f64)> = atom_fractions
        .iter()
        .map(|&(name, f)| {
            let mass = crate::nuclides::atomic_mass(name).unwrap_or(1.0);
            (name, f * mass)
        })
        .collect();
    let total: f64 = weighted.iter().map(|(_, w)| w).sum();
    weighted.into_iter().map(|(n, w)| (n, w / total)).collect()
}

/// Builder for [`Material`]; validation happens in [`MaterialBuilder::build`].
#[derive(Debug, Clone)]
pub struct MaterialBuilder {
    name: String,
    constituents: Vec<Constituent>,
    density: Option<Density>,
    sab: Vec<String>,
}

impl MaterialBuilder {
    /// Add a nuclide by atom fraction.
    pub fn nuclide(self, name: impl Into<String>, fraction: f64) -> Self {
        self.nuclide_with(name, fraction, Percent::Ao)
    }

    pub fn nuclide_with(mut self, name: impl Into<String>, fraction: f64, percent: Percent) -> Self {
        self.constituents.push(Constituent::Nuclide {
            name: name.into(),
            fraction,
            percent,
        });
        self
    }

    /// Add a natural element by atom fraction.
    pub fn element(mut self, symbol: impl Into<String>, fraction: f64) -> Self {
        self.constituents.push(Constituent::Element {
            symbol: symbol.into(),
            fraction,
            percent: Percent::Ao,
            enrichment: None,
        });
        self
    }

    /// Add an element with a U235 enrichment (weight percent).
    pub fn enriched_element(
        mut self,
        symbol: impl Into<String>,
        fraction: f64,
        enrichment: f64,
    ) -> Self {
        self.constituents.push(Constituent::Element {
            symbol: symbol.into(),
            fraction,
            percent: Percent::Ao,
            enrichment: Some(enrichment),
        });
        self
    }

    pub fn constituent(mut self, constituent: Constituent) -> Self {
        self.constituents.push(constituent);
        self
    }

    pub fn density(mut self, unit: DensityUnit, value: f64) -> Self {
        self.density = Some(Density { unit, value });
        self
    }

    pub fn sab(mut self, table: impl Into<String>) -> Self {
        self.sab.push(table.into());
        self
    }

    /// Validate and freeze the material.
    pub fn build(self) -> Result<Material, MaterialError> {
        if self.constituents.is_empty() {
            return Err(MaterialError::Empty(self.name));
        }

        let density = self
            .density
            .ok_or_else(|| MaterialError::MissingDensity(self.name.clone()))?;
        if !(density.value.is_finite() && density.value > 0.0) {
            return Err(MaterialError::InvalidDensity {
                material: self.name,
                value: density.value,
            });
        }

        let first_percent = self.constituents[0].percent();
        for c in &self.constituents {
            let fraction = c.fraction();
            if !(fraction.is_finite() && fraction > 0.0) {
                return Err(MaterialError::InvalidFraction {
                    constituent: c.label().to_string(),
                    fraction,
                });
            }
            if c.percent() != first_percent {
                return Err(MaterialError::MixedPercentTypes(self.name));
            }
            if let Constituent::Element {
                symbol, enrichment, ..
            } = c
            {
                if natural_isotopes(symbol).is_none() {
                    return Err(MaterialError::UnknownElement(symbol.clone()));
                }
                if let Some(e) = enrichment {
                    if symbol != "U" {
                        return Err(MaterialError::InvalidEnrichment {
                            element: symbol.clone(),
                            enrichment: *e,
                        });
                    }
                    enriched_uranium(*e)?;
                }
            }
        }

        log::debug!(
            "Material '{}': {} constituents, {} {}",
            self.name,
            self.constituents.len(),
            density.value,
            density.unit.as_str()
        );

        Ok(Material {
            name: self.name,
            constituents: self.constituents,
            density,
            sab: self.sab,
        })
    }
}

/// Index of a material in a [`Materials`] collection.
///
/// The exported id is the index plus one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MaterialId(pub usize);

impl MaterialId {
    /// Identifier written to the engine input files.
    pub fn export_id(self) -> usize {
        self.0 + 1
    }
}

/// Ordered collection of uniquely named materials.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Materials {
    items: Vec<Material>,
}

impl Materials {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a material and return its id.
    pub fn add(&mut self, material: Material) -> Result<MaterialId, MaterialError> {
        if self.find(material.name()).is_some() {
            return Err(MaterialError::DuplicateName(material.name().to_string()));
        }
        self.items.push(material);
        Ok(MaterialId(self.items.len() - 1))
    }

    pub fn get(&self, id: MaterialId) -> Option<&Material> {
        self.items.get(id.0)
    }

    /// Look up a material by name.
    pub fn find(&self, name: &str) -> Option<MaterialId> {
        self.items
            .iter()
            .position(|m| m.name() == name)
            .map(MaterialId)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.items
            .iter()
            .enumerate()
            .map(|(i, m)| (MaterialId(i), m))
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn water() -> Material {
        Material::builder("Water")
            .nuclide("H1", 2.0)
            .nuclide("O16", 1.0)
            .sab("c_H_in_H2O")
            .density(DensityUnit::GramPerCm3, 1.0)
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_water() {
        let m = water();
        assert_eq!(m.name(), "Water");
        assert_eq!(m.constituents().len(), 2);
        assert_eq!(m.sab(), &["c_H_in_H2O".to_string()]);
        assert!(!m.is_fissionable());
    }

    #[test]
    fn test_missing_density() {
        let err = Material::builder("Helium").element("He", 1.0).build().unwrap_err();
        assert_eq!(err, MaterialError::MissingDensity("Helium".into()));
    }

    #[test]
    fn test_non_positive_density() {
        let err = Material::builder("Helium")
            .element("He", 1.0)
            .density(DensityUnit::GramPerCm3, 0.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, MaterialError::InvalidDensity { .. }));
    }

    #[test]
    fn test_negative_fraction() {
        let err = Material::builder("Bad")
            .nuclide("O16", -1.0)
            .density(DensityUnit::GramPerCm3, 1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, MaterialError::InvalidFraction { .. }));
    }

    #[test]
    fn test_enrichment_only_for_uranium() {
        let err = Material::builder("Bad")
            .enriched_element("Zr", 1.0, 2.0)
            .density(DensityUnit::GramPerCm3, 1.0)
            .build()
            .unwrap_err();
        assert!(matches!(err, MaterialError::InvalidEnrichment { .. }));
    }

    #[test]
    fn test_mixed_percent_types_rejected() {
        let err = Material::builder("Mixed")
            .nuclide("O16", 1.0)
            .nuclide_with("H1", 1.0, Percent::Wo)
            .density(DensityUnit::GramPerCm3, 1.0)
            .build()
            .unwrap_err();
        assert_eq!(err, MaterialError::MixedPercentTypes("Mixed".into()));
    }

    #[test]
    fn test_element_expansion_preserves_fraction() {
        let m = Material::builder("Zircaloy")
            .element("Zr", 0.99)
            .element("Nb", 0.1)
            .density(DensityUnit::GramPerCm3, 8.59)
            .build()
            .unwrap();
        let nuclides = m.expanded_nuclides().unwrap();
        assert_eq!(nuclides.len(), 6);
        let zr: f64 = nuclides
            .iter()
            .filter(|n| n.name.starts_with("Zr"))
            .map(|n| n.fraction)
            .sum();
        assert_relative_eq!(zr, 0.99, epsilon = 1e-12);
        assert_eq!(nuclides[5].name, "Nb93");
        assert_relative_eq!(nuclides[5].fraction, 0.1);
    }

    #[test]
    fn test_weight_fraction_expansion() {
        let m = Material::builder("Boron")
            .constituent(Constituent::Element {
                symbol: "B".into(),
                fraction: 1.0,
                percent: Percent::Wo,
                enrichment: None,
            })
            .density(DensityUnit::GramPerCm3, 2.34)
            .build()
            .unwrap();
        let nuclides = m.expanded_nuclides().unwrap();
        assert!(nuclides.iter().all(|n| n.percent == Percent::Wo));
        // B10 carries a smaller mass share than its atom share.
        assert!(nuclides[0].fraction < 0.199);
        let total: f64 = nuclides.iter().map(|n| n.fraction).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let mut materials = Materials::new();
        let id = materials.add(water()).unwrap();
        assert_eq!(id, MaterialId(0));
        assert_eq!(id.export_id(), 1);
        assert_eq!(
            materials.add(water()).unwrap_err(),
            MaterialError::DuplicateName("Water".into())
        );
        assert_eq!(materials.find("Water"), Some(id));
    }
}
