//! The complete channel model: materials, geometry and run settings.

use std::path::Path;

use rbmk_geometry::coverage::{check_universe, CoverageReport};
use rbmk_geometry::{Geometry, GeometryError};
use rbmk_materials::catalog::{fuel_name, standard_materials, StandardIds, DEFAULT_ENRICHMENT};
use rbmk_materials::{MaterialError, Materials};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::assembly::{build_channel, AssemblyError, AssemblyParams, ChannelAssembly};
use crate::engine::{EngineError, TransportEngine};
use crate::export::{export_all, ExportError, ExportedFiles};
use crate::settings::{Settings, SettingsError};

/// Any failure while building, exporting or running a model.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Material(#[from] MaterialError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Assembly(#[from] AssemblyError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

/// Everything needed to construct one case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaseParams {
    /// U235 weight percent in the fuel.
    pub enrichment: f64,
    pub assembly: AssemblyParams,
    pub settings: Settings,
}

impl Default for CaseParams {
    fn default() -> Self {
        Self {
            enrichment: DEFAULT_ENRICHMENT,
            assembly: AssemblyParams::default(),
            settings: Settings::default(),
        }
    }
}

/// Coverage results for the three universes of the channel.
#[derive(Debug, Clone)]
pub struct ModelCoverage {
    pub pin: CoverageReport,
    pub rod: CoverageReport,
    pub root: CoverageReport,
}

impl ModelCoverage {
    pub fn is_clean(&self) -> bool {
        self.pin.is_clean() && self.rod.is_clean() && self.root.is_clean()
    }
}

/// A fully built channel model.
#[derive(Debug, Clone)]
pub struct ChannelModel {
    pub params: CaseParams,
    pub materials: Materials,
    pub material_ids: StandardIds,
    pub assembly: ChannelAssembly,
}

impl ChannelModel {
    /// Build materials, geometry and settings, then validate the result.
    pub fn build(params: &CaseParams) -> Result<Self, ModelError> {
        let (materials, material_ids) = standard_materials(params.enrichment)?;
        let assembly = build_channel(
            &params.assembly,
            &material_ids,
            &fuel_name(params.enrichment),
        )?;
        let model = Self {
            params: params.clone(),
            materials,
            material_ids,
            assembly,
        };
        model.validate()?;
        log::debug!(
            "Model built: {} materials, {} universes",
            model.materials.len(),
            model.geometry().universes().count()
        );
        Ok(model)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.assembly.geometry
    }

    pub fn settings(&self) -> &Settings {
        &self.params.settings
    }

    /// Check cross references and run settings.
    pub fn validate(&self) -> Result<(), ModelError> {
        self.geometry().validate(&self.materials)?;
        self.settings().validate()?;
        Ok(())
    }

    /// Write `materials.xml`, `geometry.xml` and `settings.xml` into `dir`.
    pub fn export(&self, dir: &Path) -> Result<ExportedFiles, ModelError> {
        Ok(export_all(
            &self.materials,
            self.geometry(),
            self.settings(),
            dir,
        )?)
    }

    /// Export into `dir` and hand the inputs to `engine`.
    pub fn run(
        &self,
        engine: &dyn TransportEngine,
        dir: &Path,
    ) -> Result<ExportedFiles, ModelError> {
        let files = self.export(dir)?;
        log::info!("Invoking {} on {}", engine.name(), dir.display());
        engine.run(dir)?;
        Ok(files)
    }

    /// Sample the pin, rod and root universes for gaps and overlaps.
    ///
    /// `spacing` is the radial lattice step (cm). Axially the fuel span is
    /// sampled on nine planes. The rod universe is only sampled inside the
    /// rod tube, the root only inside the channel's fuel span.
    pub fn check_coverage(&self, spacing: f64) -> ModelCoverage {
        let a = &self.assembly;
        let g = &a.geometry;
        let half = self.params.assembly.channel.element_half_height;
        let step = [spacing, spacing, half / 4.0];

        let e = a.layout.element_radius;
        let pin = check_universe(g, a.pin_universe, None, [-e, -e, -half], [e, e, half], step);

        let rod_domain = g.cell(a.rod_cells[1]).and_then(|cell| cell.region.clone());
        let rod = check_universe(
            g,
            a.rod_universe,
            rod_domain.as_ref(),
            [-e, -e, -half],
            [e, e, half],
            step,
        );

        let r = a.layout.channel_radius;
        let root = check_universe(
            g,
            a.lattice,
            Some(&a.fuel_span),
            [-r, -r, -half],
            [r, r, half],
            step,
        );
        ModelCoverage { pin, rod, root }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_case_builds() {
        let model = ChannelModel::build(&CaseParams::default()).unwrap();
        assert_eq!(model.materials.len(), 5);
        assert_eq!(model.assembly.pin_cells.len(), 18);
        assert_eq!(model.geometry().root(), Some(model.assembly.lattice));
    }

    #[test]
    fn test_invalid_enrichment_rejected() {
        let params = CaseParams {
            enrichment: 120.0,
            ..Default::default()
        };
        let err = ChannelModel::build(&params).unwrap_err();
        assert!(matches!(
            err,
            ModelError::Material(MaterialError::InvalidEnrichment { .. })
        ));
    }

    #[test]
    fn test_reference_coverage_clean() {
        let model = ChannelModel::build(&CaseParams::default()).unwrap();
        let coverage = model.check_coverage(0.1);
        assert!(coverage.pin.sampled > 0);
        assert!(coverage.rod.sampled > 0);
        assert!(coverage.root.sampled > 0);
        assert!(coverage.is_clean(), "{:?}", coverage);
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let mut params = CaseParams::default();
        params.settings.inactive = params.settings.batches;
        let err = ChannelModel::build(&params).unwrap_err();
        assert!(matches!(err, ModelError::Settings(_)));
    }

    #[test]
    fn test_validate_rejects_duplicate_cell_id() {
        let mut model = ChannelModel::build(&CaseParams::default()).unwrap();
        let channel = model.assembly.channel_cell;
        model.assembly.geometry.cell_mut(channel).unwrap().id = Some(100);
        assert!(matches!(
            model.validate(),
            Err(ModelError::Geometry(GeometryError::DuplicateCellId(100)))
        ));
    }
}
