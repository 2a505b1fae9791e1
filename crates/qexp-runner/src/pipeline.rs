//! The experiment pipeline.
//!
//! ```text
//!   load ──→ resolve ──→ lower ──→ execute ──→ persist
//! ```
//!
//! Any error aborts the run before persistence. Remote connection failure
//! is not an error: the resolver substitutes the local executor.

use std::path::PathBuf;

use qexp_compile::LoweringStats;
use qexp_hal::Counts;
use qexp_ir::CircuitDescription;
use tracing::{info, instrument};

use crate::config::ExperimentConfig;
use crate::engine;
use crate::error::PipelineResult;
use crate::lowering::{Lowered, lower_for};
use crate::persist::{PersistedPaths, ResultPersister};
use crate::report::Dominant;
use crate::resolver::{BackendResolver, ExecutorKind, RemoteFallbackWarning, Resolution};
use crate::source::CircuitSource;

/// Everything a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub source_id: String,
    pub num_qubits: u32,
    /// Depth of the circuit as loaded.
    pub depth: usize,
    pub executor: ExecutorKind,
    pub fallback: Option<RemoteFallbackWarning>,
    pub stats: LoweringStats,
    /// Operation count before and after lowering.
    pub ops: (usize, usize),
    pub shots: u32,
    pub counts: Counts,
    pub dominant: Option<Dominant>,
    pub execution_time_ms: Option<u64>,
    pub paths: PersistedPaths,
}

/// Runs experiments with one configuration.
pub struct Pipeline {
    config: ExperimentConfig,
    resolver: BackendResolver,
    persister: ResultPersister,
}

impl Pipeline {
    /// Build a pipeline with the connector this build ships with.
    pub fn new(config: ExperimentConfig) -> Self {
        let resolver = BackendResolver::default();
        Self::with_resolver(config, resolver)
    }

    /// Build a pipeline around a given resolver. The configured seed is
    /// applied to it.
    pub fn with_resolver(config: ExperimentConfig, resolver: BackendResolver) -> Self {
        let persister =
            ResultPersister::new(config.output_dir.clone()).with_histogram(config.histogram);
        Self {
            resolver: resolver.with_seed(config.seed),
            persister,
            config,
        }
    }

    pub fn config(&self) -> &ExperimentConfig {
        &self.config
    }

    /// Load stage.
    pub fn load(&self, source: &CircuitSource) -> PipelineResult<CircuitDescription> {
        source.load()
    }

    /// Resolve stage.
    pub async fn resolve(&self) -> Resolution {
        self.resolver
            .resolve(self.config.prefer_remote, &self.config.device_id)
            .await
    }

    /// Lower stage.
    pub fn lower(
        &self,
        circuit: &CircuitDescription,
        resolution: &Resolution,
    ) -> PipelineResult<Lowered> {
        lower_for(circuit, resolution.handle(), self.config.optimization_level)
    }

    /// Execute stage.
    pub async fn execute(
        &self,
        lowered: &CircuitDescription,
        resolution: &Resolution,
    ) -> PipelineResult<qexp_hal::ExecutionResult> {
        engine::execute(
            resolution.handle(),
            lowered,
            self.config.shots,
            self.config.poll_interval(),
        )
        .await
    }

    /// Persist stage.
    pub fn persist(&self, source_id: &str, counts: &Counts) -> PipelineResult<PersistedPaths> {
        self.persister.persist(source_id, counts, self.config.shots)
    }

    /// Paths a run of `source` would write.
    pub fn output_paths(&self, source: &CircuitSource) -> (PathBuf, PathBuf) {
        let id = source.id();
        (
            self.persister.record_path(&id),
            self.persister.histogram_path(&id),
        )
    }

    /// Run all stages for `source`.
    #[instrument(skip(self, source), fields(source = %source.id()))]
    pub async fn run(&self, source: &CircuitSource) -> PipelineResult<RunReport> {
        let circuit = self.load(source)?;
        info!(
            "loaded {} ({} qubits, depth {})",
            circuit.name(),
            circuit.num_qubits(),
            circuit.depth()
        );

        let resolution = self.resolve().await;
        let lowered = self.lower(&circuit, &resolution)?;
        let result = self.execute(&lowered.circuit, &resolution).await?;

        let source_id = source.id();
        let paths = self.persist(&source_id, &result.counts)?;
        let dominant = Dominant::of(&result.counts, self.config.shots);
        if let Some(d) = &dominant {
            info!("dominant state {d}");
        }

        let ops = (circuit.num_ops(), lowered.circuit.num_ops());
        let (handle, fallback) = resolution.into_parts();
        Ok(RunReport {
            source_id,
            num_qubits: circuit.num_qubits(),
            depth: circuit.depth(),
            executor: handle.kind().clone(),
            fallback,
            stats: lowered.stats,
            ops,
            shots: self.config.shots,
            counts: result.counts,
            dominant,
            execution_time_ms: result.execution_time_ms,
            paths,
        })
    }
}
