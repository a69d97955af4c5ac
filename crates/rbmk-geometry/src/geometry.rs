//! The geometry arena.
//!
//! [`Geometry`] owns every surface and universe of a model. Regions refer to
//! surfaces by [`SurfaceId`] and cells refer to nested universes by
//! [`UniverseId`], so the fill graph is a plain index graph with no shared
//! ownership. Exported ids are derived from arena indices, which keeps
//! export deterministic.

use std::collections::{BTreeSet, HashSet};

use rbmk_materials::{MaterialId, Materials};
use thiserror::Error;

use crate::surface::{Surface, SurfaceId};
use crate::transform::Translation;
use crate::universe::{Cell, Fill, Universe, UniverseId};

/// Errors detected while assembling or validating a geometry.
#[derive(Debug, Error, PartialEq)]
pub enum GeometryError {
    #[error("Geometry has no root universe")]
    NoRoot,

    #[error("Universe {0:?} does not exist")]
    UnknownUniverse(UniverseId),

    #[error("Universe '{0}' has no cells")]
    EmptyUniverse(String),

    #[error("Cell {cell} references missing surface {surface:?}")]
    UnknownSurface { cell: String, surface: SurfaceId },

    #[error("Surface {0:?} has non-finite or non-positive parameters")]
    MalformedSurface(SurfaceId),

    #[error("Cell {cell} is filled with missing material {material:?}")]
    UnknownMaterial { cell: String, material: MaterialId },

    #[error("Cell {0} has a translation but is not filled with a universe")]
    TranslationWithoutUniverse(String),

    #[error("Universe '{0}' contains itself through its fills")]
    Cycle(String),

    #[error("Cell id {0} is used more than once")]
    DuplicateCellId(usize),

    #[error("Cell id must be positive")]
    ZeroCellId,
}

/// Position of a cell inside the arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellRef {
    pub universe: UniverseId,
    pub index: usize,
}

/// Surfaces, universes and the root universe of a model.
#[derive(Debug, Clone, Default)]
pub struct Geometry {
    surfaces: Vec<Surface>,
    universes: Vec<Universe>,
    root: Option<UniverseId>,
}

impl Geometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_surface(&mut self, surface: Surface) -> SurfaceId {
        self.surfaces.push(surface);
        SurfaceId(self.surfaces.len() - 1)
    }

    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    pub fn add_universe(&mut self, name: impl Into<String>) -> UniverseId {
        self.universes.push(Universe::new(name));
        UniverseId(self.universes.len() - 1)
    }

    pub fn universe(&self, id: UniverseId) -> Option<&Universe> {
        self.universes.get(id.0)
    }

    pub fn universes(&self) -> impl Iterator<Item = (UniverseId, &Universe)> {
        self.universes
            .iter()
            .enumerate()
            .map(|(i, u)| (UniverseId(i), u))
    }

    /// Append a cell to a universe.
    pub fn add_cell(&mut self, universe: UniverseId, cell: Cell) -> Result<CellRef, GeometryError> {
        let u = self
            .universes
            .get_mut(universe.0)
            .ok_or(GeometryError::UnknownUniverse(universe))?;
        u.cells.push(cell);
        Ok(CellRef {
            universe,
            index: u.cells.len() - 1,
        })
    }

    pub fn cell(&self, at: CellRef) -> Option<&Cell> {
        self.universes.get(at.universe.0)?.cells.get(at.index)
    }

    pub fn cell_mut(&mut self, at: CellRef) -> Option<&mut Cell> {
        self.universes.get_mut(at.universe.0)?.cells.get_mut(at.index)
    }

    pub fn set_root(&mut self, root: UniverseId) -> Result<(), GeometryError> {
        if root.0 >= self.universes.len() {
            return Err(GeometryError::UnknownUniverse(root));
        }
        self.root = Some(root);
        Ok(())
    }

    pub fn root(&self) -> Option<UniverseId> {
        self.root
    }

    /// Check references, fills and id uniqueness against a material set.
    pub fn validate(&self, materials: &Materials) -> Result<(), GeometryError> {
        self.root.ok_or(GeometryError::NoRoot)?;

        for (sid, surface) in self.surfaces.iter().enumerate() {
            if !surface.is_well_formed() {
                return Err(GeometryError::MalformedSurface(SurfaceId(sid)));
            }
        }

        for (uid, universe) in self.universes() {
            if universe.cells.is_empty() {
                return Err(GeometryError::EmptyUniverse(universe.name.clone()));
            }
            for (index, cell) in universe.cells.iter().enumerate() {
                let label = || cell_label(universe, uid, index, cell);

                if let Some(region) = &cell.region {
                    if let Some(missing) = region
                        .surfaces()
                        .into_iter()
                        .find(|s| s.0 >= self.surfaces.len())
                    {
                        return Err(GeometryError::UnknownSurface {
                            cell: label(),
                            surface: missing,
                        });
                    }
                }

                match cell.fill {
                    Fill::Material(m) => {
                        if materials.get(m).is_none() {
                            return Err(GeometryError::UnknownMaterial {
                                cell: label(),
                                material: m,
                            });
                        }
                    }
                    Fill::Universe(child) => {
                        if child.0 >= self.universes.len() {
                            return Err(GeometryError::UnknownUniverse(child));
                        }
                    }
                    Fill::Void => {}
                }

                if cell.translation.is_some() && !matches!(cell.fill, Fill::Universe(_)) {
                    return Err(GeometryError::TranslationWithoutUniverse(label()));
                }
            }
        }

        // Unreachable universes are still exported, so every one is walked.
        for (uid, _) in self.universes() {
            self.check_acyclic(uid, &mut Vec::new())?;
        }
        self.cell_ids()?;
        Ok(())
    }

    fn check_acyclic(
        &self,
        universe: UniverseId,
        stack: &mut Vec<UniverseId>,
    ) -> Result<(), GeometryError> {
        let u = self
            .universe(universe)
            .ok_or(GeometryError::UnknownUniverse(universe))?;
        if stack.contains(&universe) {
            return Err(GeometryError::Cycle(u.name.clone()));
        }
        stack.push(universe);
        let children: BTreeSet<UniverseId> = u
            .cells
            .iter()
            .filter_map(|c| match c.fill {
                Fill::Universe(child) => Some(child),
                _ => None,
            })
            .collect();
        for child in children {
            self.check_acyclic(child, stack)?;
        }
        stack.pop();
        Ok(())
    }

    /// Exported cell ids, indexed `[universe][cell]`.
    ///
    /// Explicit ids are kept; every other cell receives the lowest positive
    /// id not yet taken, in universe then cell order.
    pub fn cell_ids(&self) -> Result<Vec<Vec<usize>>, GeometryError> {
        let mut taken = HashSet::new();
        for universe in &self.universes {
            for cell in &universe.cells {
                if let Some(id) = cell.id {
                    if id == 0 {
                        return Err(GeometryError::ZeroCellId);
                    }
                    if !taken.insert(id) {
                        return Err(GeometryError::DuplicateCellId(id));
                    }
                }
            }
        }

        let mut next = 1;
        let mut ids = Vec::with_capacity(self.universes.len());
        for universe in &self.universes {
            let mut row = Vec::with_capacity(universe.cells.len());
            for cell in &universe.cells {
                let id = match cell.id {
                    Some(id) => id,
                    None => {
                        while taken.contains(&next) {
                            next += 1;
                        }
                        taken.insert(next);
                        next
                    }
                };
                row.push(id);
            }
            ids.push(row);
        }
        Ok(ids)
    }

    /// Indices of the cells of `universe` whose regions contain `point`
    /// (in that universe's frame).
    pub fn cells_at(&self, universe: UniverseId, point: &[f64; 3]) -> Vec<usize> {
        self.universe(universe)
            .map(|u| {
                u.cells
                    .iter()
                    .enumerate()
                    .filter(|(_, c)| c.contains(&self.surfaces, point))
                    .map(|(i, _)| i)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Descend from the root to the material at a global point.
    ///
    /// The first matching cell wins at each level, as in the transport
    /// engine. Returns `None` in a gap or a void cell.
    pub fn material_at(&self, point: &[f64; 3]) -> Option<MaterialId> {
        let mut universe = self.root?;
        // Accumulated offset of the current universe in the root frame.
        let mut placement = Translation::default();
        // Depth is bounded by the universe count on an acyclic geometry.
        for _ in 0..=self.universes.len() {
            let local = placement.to_local(point);
            let u = self.universe(universe)?;
            let cell = u.cells.iter().find(|c| c.contains(&self.surfaces, &local))?;
            match cell.fill {
                Fill::Material(m) => return Some(m),
                Fill::Void => return None,
                Fill::Universe(child) => {
                    if let Some(t) = &cell.translation {
                        placement = t.then(&placement);
                    }
                    universe = child;
                }
            }
        }
        None
    }
}

fn cell_label(universe: &Universe, uid: UniverseId, index: usize, cell: &Cell) -> String {
    match &cell.name {
        Some(name) => format!("'{}'", name),
        None => format!("#{} of universe '{}' ({:?})", index, universe.name, uid),
    }
}
