//! Cells and universes.
//!
//! A [`Cell`] pairs a region with what fills it. A [`Universe`] is a named
//! set of cells sharing one local frame; a universe can be placed many times
//! by filling cells with it.

use rbmk_materials::MaterialId;
use serde::{Deserialize, Serialize};

use crate::region::Region;
use crate::transform::Translation;

/// Index of a universe in a [`Geometry`](crate::geometry::Geometry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UniverseId(pub usize);

impl UniverseId {
    pub fn export_id(self) -> usize {
        self.0 + 1
    }
}

/// What occupies a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    Material(MaterialId),
    Universe(UniverseId),
    Void,
}

/// A region together with its fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    /// Explicit exported id; cells without one are numbered at export.
    pub id: Option<usize>,
    pub name: Option<String>,
    /// `None` means the cell covers all of space.
    pub region: Option<Region>,
    pub fill: Fill,
    /// Offset of a universe fill. Only meaningful for [`Fill::Universe`].
    pub translation: Option<Translation>,
}

impl Cell {
    pub fn new(fill: Fill) -> Self {
        Self {
            id: None,
            name: None,
            region: None,
            fill,
            translation: None,
        }
    }

    pub fn material(material: MaterialId) -> Self {
        Self::new(Fill::Material(material))
    }

    pub fn universe(universe: UniverseId) -> Self {
        Self::new(Fill::Universe(universe))
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_region(mut self, region: Region) -> Self {
        self.region = Some(region);
        self
    }

    pub fn with_id(mut self, id: usize) -> Self {
        self.id = Some(id);
        self
    }

    pub fn translated(mut self, translation: Translation) -> Self {
        self.translation = Some(translation);
        self
    }

    /// Point membership against the owning geometry's surfaces.
    pub fn contains(&self, surfaces: &[crate::surface::Surface], point: &[f64; 3]) -> bool {
        self.region
            .as_ref()
            .map_or(true, |r| r.contains(surfaces, point))
    }
}

/// A named set of cells in a shared local frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub name: String,
    pub cells: Vec<Cell>,
}

impl Universe {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cells: Vec::new(),
        }
    }
}
