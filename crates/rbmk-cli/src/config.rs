//! TOML case file deserialisation.
//!
//! Every field defaults to the reference case, so an empty file (or no file
//! at all) reproduces it.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use rbmk_core::assembly::{ChannelParams, PinParams, RodParams};
use rbmk_core::settings::{Source, SourceSpace};
use rbmk_core::{AssemblyParams, CaseParams, OpenMcExecutable, Settings};
use rbmk_materials::catalog::DEFAULT_ENRICHMENT;

/// Top-level case configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CaseConfig {
    pub materials: MaterialsConfig,
    pub pin: PinParams,
    pub rod: RodParams,
    pub channel: ChannelParams,
    pub settings: SettingsConfig,
    pub engine: EngineConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MaterialsConfig {
    /// U235 weight percent.
    pub enrichment: f64,
}

impl Default for MaterialsConfig {
    fn default() -> Self {
        Self {
            enrichment: DEFAULT_ENRICHMENT,
        }
    }
}

/// Run settings from TOML.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SettingsConfig {
    pub batches: usize,
    pub inactive: usize,
    pub particles: u64,
    pub seed: Option<u64>,
    pub source_lower: [f64; 3],
    pub source_upper: [f64; 3],
    pub only_fissionable: bool,
    pub source_strength: f64,
}

impl Default for SettingsConfig {
    fn default() -> Self {
        let settings = Settings::default();
        let (lower, upper, only_fissionable) = match settings.source.space {
            SourceSpace::Box {
                lower,
                upper,
                only_fissionable,
            } => (lower, upper, only_fissionable),
            SourceSpace::Point { xyz } => (xyz, xyz, false),
        };
        Self {
            batches: settings.batches,
            inactive: settings.inactive,
            particles: settings.particles,
            seed: settings.seed,
            source_lower: lower,
            source_upper: upper,
            only_fissionable,
            source_strength: settings.source.strength,
        }
    }
}

/// Engine invocation options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Path or name of the `openmc` executable.
    pub executable: PathBuf,
    pub threads: Option<usize>,
    pub geometry_debug: bool,
    pub cross_sections: Option<PathBuf>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            executable: PathBuf::from("openmc"),
            threads: None,
            geometry_debug: false,
            cross_sections: None,
        }
    }
}

/// Output configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory for the engine input files (default: "./openmc").
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "./openmc".into(),
        }
    }
}

impl CaseConfig {
    pub fn case_params(&self) -> CaseParams {
        let s = &self.settings;
        CaseParams {
            enrichment: self.materials.enrichment,
            assembly: AssemblyParams {
                pin: self.pin.clone(),
                rod: self.rod.clone(),
                channel: self.channel.clone(),
            },
            settings: Settings {
                batches: s.batches,
                inactive: s.inactive,
                particles: s.particles,
                seed: s.seed,
                source: Source {
                    space: SourceSpace::Box {
                        lower: s.source_lower,
                        upper: s.source_upper,
                        only_fissionable: s.only_fissionable,
                    },
                    strength: s.source_strength,
                },
            },
        }
    }

    pub fn engine(&self) -> OpenMcExecutable {
        OpenMcExecutable {
            executable: self.engine.executable.clone(),
            threads: self.engine.threads,
            geometry_debug: self.engine.geometry_debug,
            cross_sections: self.engine.cross_sections.clone(),
            extra_args: Vec::new(),
        }
    }
}

/// Parse a TOML case file.
pub fn parse_config(content: &str) -> anyhow::Result<CaseConfig> {
    let config: CaseConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load a case file, or the reference case when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<CaseConfig> {
    match path {
        Some(path) => {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read case file {}", path.display()))?;
            parse_config(&content)
                .with_context(|| format!("Invalid case file {}", path.display()))
        }
        None => Ok(CaseConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_reference_case() {
        let config = parse_config("").unwrap();
        assert_eq!(config.case_params(), CaseParams::default());
        assert_eq!(config.output.directory, "./openmc");
        assert_eq!(config.engine(), OpenMcExecutable::default());
    }

    #[test]
    fn test_partial_sections() {
        let config = parse_config(
            r#"
            [materials]
            enrichment = 2.4

            [pin]
            fuel_radius = 0.57

            [settings]
            particles = 20000
            seed = 7

            [engine]
            threads = 4
            geometry_debug = true
            "#,
        )
        .unwrap();
        let params = config.case_params();
        assert_eq!(params.enrichment, 2.4);
        assert_eq!(params.assembly.pin.fuel_radius, 0.57);
        assert_eq!(params.assembly.pin.void_radius, 0.566);
        assert_eq!(params.settings.particles, 20000);
        assert_eq!(params.settings.seed, Some(7));
        assert_eq!(params.settings.batches, 100);
        assert_eq!(config.engine().args(), vec!["-s", "4", "-g"]);
    }

    #[test]
    fn test_unknown_type_rejected() {
        assert!(parse_config("[settings]\nparticles = \"many\"\n").is_err());
    }

    #[test]
    fn test_reference_case_file_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../cases/rbmk_reference.toml");
        let config = load_config(Some(path.as_path())).unwrap();
        assert_eq!(config.case_params(), CaseParams::default());
    }
}
