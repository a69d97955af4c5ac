//! Case runner: builds the model, writes engine inputs and invokes the engine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use rbmk_core::{ChannelModel, ExportedFiles, TransportEngine};
use rbmk_geometry::layout::{PinPosition, RingLayout};
use rbmk_materials::catalog::{fuel_name, standard_materials};
use rbmk_materials::Materials;

use crate::config::CaseConfig;

/// Radial lattice step used by `validate` (cm).
pub const COVERAGE_SPACING: f64 = 0.05;

/// Build and validate the model described by a case.
pub fn build_model(case: &CaseConfig) -> Result<ChannelModel> {
    let params = case.case_params();
    log::debug!("Case parameters: {:?}", params);
    let model = ChannelModel::build(&params).context("Failed to build channel model")?;
    println!(
        "  {} materials, {} surfaces, {} pins",
        model.materials.len(),
        model.geometry().surfaces().len(),
        model.assembly.pin_cells.len()
    );
    Ok(model)
}

/// Output directory: the command-line override, else the case setting.
pub fn output_dir(case: &CaseConfig, overridden: Option<PathBuf>) -> PathBuf {
    overridden.unwrap_or_else(|| PathBuf::from(&case.output.directory))
}

/// Write the three engine input files.
pub fn export_model(model: &ChannelModel, dir: &Path) -> Result<ExportedFiles> {
    let files = model
        .export(dir)
        .with_context(|| format!("Failed to export model to {}", dir.display()))?;
    for path in files.all() {
        println!("  wrote {}", path.display());
    }
    Ok(files)
}

/// Export the model and run the engine on it.
pub fn run_case(model: &ChannelModel, engine: &dyn TransportEngine, dir: &Path) -> Result<()> {
    export_model(model, dir)?;
    log::debug!("Engine {} with inputs in {}", engine.name(), dir.display());
    println!("Running {} in {}", engine.name(), dir.display());
    engine
        .run(dir)
        .with_context(|| format!("{} run failed", engine.name()))?;
    Ok(())
}

/// Run the coverage check and print a summary. Returns whether it was clean.
pub fn check_coverage(model: &ChannelModel) -> bool {
    let coverage = model.check_coverage(COVERAGE_SPACING);
    if !coverage.is_clean() {
        log::warn!("Coverage check found gaps or overlaps at spacing {}", COVERAGE_SPACING);
    }
    for (label, report) in [
        ("pin", &coverage.pin),
        ("carrier rod", &coverage.rod),
        ("channel", &coverage.root),
    ] {
        println!(
            "  {:<12} {:>8} points, {} gaps, {} overlaps",
            label,
            report.sampled,
            report.gaps.len(),
            report.overlaps.len()
        );
        if let Some(first) = report.gaps.first().or_else(|| report.overlaps.first()) {
            println!("    first finding at {:?} (cells {:?})", first.position, first.cells);
        }
    }
    coverage.is_clean()
}

/// Pin positions for the case's channel, without building the full model.
pub fn pin_layout(case: &CaseConfig) -> Result<Vec<PinPosition>> {
    let layout = RingLayout::rbmk(case.channel.radius, case.channel.element_radius)
        .context("Invalid channel dimensions")?;
    Ok(layout.positions())
}

/// Print pin positions as an aligned table.
pub fn print_layout(pins: &[PinPosition]) {
    println!("{:>5} {:>5} {:>10} {:>10} {:>10}", "id", "ring", "angle_deg", "x_cm", "y_cm");
    for pin in pins {
        println!(
            "{:>5} {:>5} {:>10.3} {:>10.5} {:>10.5}",
            pin.id,
            pin.ring,
            pin.angle.to_degrees(),
            pin.x,
            pin.y
        );
    }
}

/// Print pin positions as JSON.
pub fn print_layout_json(pins: &[PinPosition]) -> Result<()> {
    let json = serde_json::to_string_pretty(pins)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    println!("{}", json);
    Ok(())
}

/// Print the standard materials for an enrichment.
pub fn print_materials(enrichment: f64) -> Result<()> {
    let (materials, _) = standard_materials(enrichment)
        .with_context(|| format!("Cannot build {}", fuel_name(enrichment)))?;
    print_material_table(&materials)
}

fn print_material_table(materials: &Materials) -> Result<()> {
    for (id, material) in materials.iter() {
        let density = material.density();
        println!(
            "  [{}] {:<22} {} {}",
            id.export_id(),
            material.name(),
            density.value,
            density.unit.as_str()
        );
        for nuclide in material.expanded_nuclides()? {
            println!(
                "        {:<6} {:.6e} {}",
                nuclide.name,
                nuclide.fraction,
                nuclide.percent.attribute()
            );
        }
        for table in material.sab() {
            println!("        S(a,b) {}", table);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rbmk_core::EngineError;

    struct NoopEngine;

    impl TransportEngine for NoopEngine {
        fn name(&self) -> &str {
            "noop"
        }

        fn run(&self, dir: &Path) -> Result<(), EngineError> {
            assert!(dir.join("geometry.xml").is_file());
            Ok(())
        }
    }

    #[test]
    fn test_output_dir_override_wins() {
        let case = CaseConfig::default();
        assert_eq!(output_dir(&case, None), PathBuf::from("./openmc"));
        assert_eq!(
            output_dir(&case, Some(PathBuf::from("/tmp/rbmk"))),
            PathBuf::from("/tmp/rbmk")
        );
    }

    #[test]
    fn test_pin_layout_reference() {
        let pins = pin_layout(&CaseConfig::default()).unwrap();
        assert_eq!(pins.len(), 18);
        assert_eq!(pins[0].id, 100);
        assert_eq!(pins.iter().filter(|p| p.ring == 0).count(), 6);
    }

    #[test]
    fn test_pin_layout_rejects_small_channel() {
        let mut case = CaseConfig::default();
        case.channel.radius = case.channel.element_radius * 0.5;
        assert!(pin_layout(&case).is_err());
    }

    #[test]
    fn test_reference_model_coverage_is_clean() {
        let model = build_model(&CaseConfig::default()).unwrap();
        assert!(check_coverage(&model));
    }

    #[test]
    fn test_run_case_exports_before_running() {
        let model = build_model(&CaseConfig::default()).unwrap();
        let dir = std::env::temp_dir().join(format!("rbmk-run-{}", std::process::id()));
        run_case(&model, &NoopEngine, &dir).unwrap();
        std::fs::remove_dir_all(&dir).ok();
    }
}
