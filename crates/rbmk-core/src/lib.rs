//! # RBMK Core
//!
//! Builds a single RBMK fuel channel model and hands it to an external
//! Monte Carlo transport engine.
//!
//! ## Architecture
//!
//! [`model::ChannelModel::build`] composes the standard material catalog,
//! the channel geometry from [`assembly`] and the eigenvalue run
//! [`settings`]. The model is then written out by [`export`] as the three
//! OpenMC input documents and run through a [`engine::TransportEngine`].
//! Transport results are never read back.
//!
//! ## Modules
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`assembly`] | Pin universe, carrier rod, circular lattice |
//! | [`settings`] | Batches, particles, initial source |
//! | [`export`] | `materials.xml`, `geometry.xml`, `settings.xml` writers |
//! | [`engine`] | Engine trait and the `openmc` executable driver |
//! | [`model`] | Case parameters and the assembled model |

pub mod assembly;
pub mod engine;
pub mod export;
pub mod model;
pub mod settings;

pub use assembly::{AssemblyError, AssemblyParams, ChannelAssembly};
pub use engine::{EngineError, OpenMcExecutable, TransportEngine};
pub use export::{ExportError, ExportedFiles};
pub use model::{CaseParams, ChannelModel, ModelCoverage, ModelError};
pub use settings::{Settings, SettingsError, Source, SourceSpace};
