//! Experiment pipeline.
//!
//! One run takes a circuit from its source to files on disk:
//!
//! | Stage | Component | Failure |
//! |-------|-----------|---------|
//! | load | [`CircuitSource`] | `SourceNotFound`, `MalformedCircuit` |
//! | resolve | [`BackendResolver`] | never; falls back to the local simulator |
//! | lower | [`lowering::lower_for`] | `UnsupportedOperation` |
//! | execute | [`engine::execute`] | `ExecutionFailure`, `ResultUnavailable` |
//! | persist | [`ResultPersister`] | `PersistenceFailure` |
//!
//! # Example
//!
//! ```ignore
//! use qexp_runner::{CircuitSource, ExperimentConfig, Pipeline};
//!
//! let pipeline = Pipeline::new(ExperimentConfig::default());
//! let report = pipeline.run(&CircuitSource::file("circuits/srfm_exp_a.qasm")).await?;
//! println!("{:?}", report.dominant);
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod lowering;
pub mod persist;
pub mod pipeline;
pub mod report;
pub mod resolver;
pub mod source;

pub use config::{ConfigError, ExperimentConfig, MAX_OPTIMIZATION_LEVEL};
pub use error::{PipelineError, PipelineResult, Stage};
pub use persist::{PersistedPaths, ResultPersister};
pub use pipeline::{Pipeline, RunReport};
pub use report::{Dominant, render_histogram};
#[cfg(feature = "ibm")]
pub use resolver::IbmConnector;
pub use resolver::{
    BackendResolver, Connector, ExecutorHandle, ExecutorKind, NoRemote, RemoteFallbackWarning,
    Resolution, default_connector,
};
pub use source::CircuitSource;
