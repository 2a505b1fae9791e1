//! Circuit sources.

use std::path::{Path, PathBuf};

use qexp_ir::CircuitDescription;
use tracing::{debug, instrument};

use crate::error::{PipelineError, PipelineResult};

/// Where a circuit comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CircuitSource {
    /// Program text held in memory, identified by `name`.
    Inline { name: String, text: String },
    /// A QASM file, identified by its stem.
    File(PathBuf),
}

impl CircuitSource {
    pub fn inline(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Inline {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Identifier used for the circuit name and the output file names.
    pub fn id(&self) -> String {
        match self {
            Self::Inline { name, .. } => name.clone(),
            Self::File(path) => path
                .file_stem()
                .map_or_else(|| "circuit".to_string(), |s| s.to_string_lossy().into_owned()),
        }
    }

    /// Read and parse the circuit.
    ///
    /// A file that does not exist is [`PipelineError::SourceNotFound`] and
    /// nothing is read. Read and parse errors are
    /// [`PipelineError::MalformedCircuit`].
    #[instrument(skip(self), fields(source = %self.id()))]
    pub fn load(&self) -> PipelineResult<CircuitDescription> {
        let id = self.id();
        let text = match self {
            Self::Inline { text, .. } => text.clone(),
            Self::File(path) => read_source(path, &id)?,
        };

        let circuit = qexp_qasm::parse_named(&id, &text).map_err(|e| {
            PipelineError::MalformedCircuit {
                id: id.clone(),
                cause: e.to_string(),
            }
        })?;
        debug!(
            "loaded {} qubits, {} clbits, {} ops",
            circuit.num_qubits(),
            circuit.num_clbits(),
            circuit.num_ops()
        );
        Ok(circuit)
    }
}

fn read_source(path: &Path, id: &str) -> PipelineResult<String> {
    if !path.exists() {
        return Err(PipelineError::SourceNotFound {
            path: path.to_path_buf(),
        });
    }
    std::fs::read_to_string(path).map_err(|e| PipelineError::MalformedCircuit {
        id: id.to_string(),
        cause: e.to_string(),
    })
}
