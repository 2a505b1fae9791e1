//! Backend resolution with unconditional local fallback.
//!
//! ```text
//!   resolve(prefer_remote = false, _)  ──→ Connected(local)
//!   resolve(prefer_remote = true, dev) ──→ Connected(remote dev)
//!                                      └─→ Fallback(local, warning)
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use qexp_adapter_sim::SimulatorBackend;
use qexp_hal::{Backend, HalError, HalResult};
use tracing::{info, instrument, warn};

/// What kind of executor a handle wraps.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorKind {
    Local,
    Remote { device_id: String },
}

impl fmt::Display for ExecutorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutorKind::Local => write!(f, "local simulator"),
            ExecutorKind::Remote { device_id } => write!(f, "remote device {device_id}"),
        }
    }
}

/// A resolved executor, owned by one experiment run.
#[derive(Clone)]
pub struct ExecutorHandle {
    kind: ExecutorKind,
    backend: Arc<dyn Backend>,
}

impl fmt::Debug for ExecutorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutorHandle")
            .field("kind", &self.kind)
            .field("backend", &self.backend.name())
            .finish()
    }
}

impl ExecutorHandle {
    pub fn local(backend: Arc<dyn Backend>) -> Self {
        Self {
            kind: ExecutorKind::Local,
            backend,
        }
    }

    pub fn remote(device_id: impl Into<String>, backend: Arc<dyn Backend>) -> Self {
        Self {
            kind: ExecutorKind::Remote {
                device_id: device_id.into(),
            },
            backend,
        }
    }

    pub fn kind(&self) -> &ExecutorKind {
        &self.kind
    }

    pub fn is_remote(&self) -> bool {
        matches!(self.kind, ExecutorKind::Remote { .. })
    }

    pub fn backend(&self) -> &dyn Backend {
        self.backend.as_ref()
    }
}

/// The remote path failed and the local executor took over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFallbackWarning {
    /// Device the run asked for.
    pub device_id: String,
    /// Why the connection failed.
    pub cause: String,
}

impl fmt::Display for RemoteFallbackWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "could not connect to {} ({}); running on the local simulator",
            self.device_id, self.cause
        )
    }
}

/// Outcome of [`BackendResolver::resolve`].
#[derive(Debug)]
pub enum Resolution {
    Connected(ExecutorHandle),
    Fallback {
        handle: ExecutorHandle,
        warning: RemoteFallbackWarning,
    },
}

impl Resolution {
    pub fn handle(&self) -> &ExecutorHandle {
        match self {
            Resolution::Connected(handle) | Resolution::Fallback { handle, .. } => handle,
        }
    }

    pub fn warning(&self) -> Option<&RemoteFallbackWarning> {
        match self {
            Resolution::Connected(_) => None,
            Resolution::Fallback { warning, .. } => Some(warning),
        }
    }

    pub fn into_parts(self) -> (ExecutorHandle, Option<RemoteFallbackWarning>) {
        match self {
            Resolution::Connected(handle) => (handle, None),
            Resolution::Fallback { handle, warning } => (handle, Some(warning)),
        }
    }
}

/// Opens a connection to a remote device.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self, device_id: &str) -> HalResult<Arc<dyn Backend>>;
}

/// Connects to IBM Quantum with credentials from the environment.
#[cfg(feature = "ibm")]
#[derive(Debug, Default, Clone, Copy)]
pub struct IbmConnector;

#[cfg(feature = "ibm")]
#[async_trait]
impl Connector for IbmConnector {
    async fn connect(&self, device_id: &str) -> HalResult<Arc<dyn Backend>> {
        let backend = qexp_adapter_ibm::IbmBackend::connect(device_id).await?;
        Ok(Arc::new(backend))
    }
}

/// Stand-in when no remote support is compiled in. Every attempt fails, so
/// every remote request falls back.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoRemote;

#[async_trait]
impl Connector for NoRemote {
    async fn connect(&self, device_id: &str) -> HalResult<Arc<dyn Backend>> {
        Err(HalError::Unsupported(format!(
            "remote execution on {device_id} is not compiled in"
        )))
    }
}

/// The connector this build ships with.
pub fn default_connector() -> Arc<dyn Connector> {
    #[cfg(feature = "ibm")]
    {
        Arc::new(IbmConnector)
    }
    #[cfg(not(feature = "ibm"))]
    {
        Arc::new(NoRemote)
    }
}

/// Picks the executor for a run.
pub struct BackendResolver {
    connector: Arc<dyn Connector>,
    seed: Option<u64>,
}

impl BackendResolver {
    pub fn new(connector: Arc<dyn Connector>) -> Self {
        Self {
            connector,
            seed: None,
        }
    }

    /// Seed the local simulator this resolver hands out.
    #[must_use]
    pub fn with_seed(mut self, seed: Option<u64>) -> Self {
        self.seed = seed;
        self
    }

    /// A fresh local executor.
    pub fn local(&self) -> ExecutorHandle {
        let simulator = match self.seed {
            Some(seed) => SimulatorBackend::new().with_seed(seed),
            None => SimulatorBackend::new(),
        };
        ExecutorHandle::local(Arc::new(simulator))
    }

    /// Resolve an executor. Never fails.
    ///
    /// With `prefer_remote` unset the local executor is returned without
    /// touching the connector. Otherwise a connection to `device_id` is
    /// attempted; any failure is logged once and turned into a fallback to
    /// the local executor.
    #[instrument(skip(self))]
    pub async fn resolve(&self, prefer_remote: bool, device_id: &str) -> Resolution {
        if !prefer_remote {
            return Resolution::Connected(self.local());
        }

        match self.connector.connect(device_id).await {
            Ok(backend) => {
                info!("real-device execution active on {device_id}");
                Resolution::Connected(ExecutorHandle::remote(device_id, backend))
            }
            Err(e) => {
                let warning = RemoteFallbackWarning {
                    device_id: device_id.to_string(),
                    cause: e.to_string(),
                };
                warn!("{warning}");
                Resolution::Fallback {
                    handle: self.local(),
                    warning,
                }
            }
        }
    }
}

impl Default for BackendResolver {
    fn default() -> Self {
        Self::new(default_connector())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    /// Counts attempts and always fails.
    #[derive(Default)]
    struct Refusing {
        attempts: AtomicUsize,
    }

    #[async_trait]
    impl Connector for Refusing {
        async fn connect(&self, _device_id: &str) -> HalResult<Arc<dyn Backend>> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            Err(HalError::AuthenticationFailed("no token".into()))
        }
    }

    /// Hands out a simulator as if it were the device.
    struct Loopback;

    #[async_trait]
    impl Connector for Loopback {
        async fn connect(&self, _device_id: &str) -> HalResult<Arc<dyn Backend>> {
            Ok(Arc::new(SimulatorBackend::new()))
        }
    }

    #[tokio::test]
    async fn test_local_never_touches_connector() {
        let connector = Arc::new(Refusing::default());
        let resolver = BackendResolver::new(connector.clone());

        let resolution = resolver.resolve(false, "ibm_marrakesh").await;
        assert!(matches!(resolution, Resolution::Connected(_)));
        assert_eq!(resolution.handle().kind(), &ExecutorKind::Local);
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_failed_remote_falls_back() {
        let connector = Arc::new(Refusing::default());
        let resolver = BackendResolver::new(connector.clone());

        let resolution = resolver.resolve(true, "ibm_marrakesh").await;
        let (handle, warning) = resolution.into_parts();
        assert!(!handle.is_remote());
        let warning = warning.unwrap();
        assert_eq!(warning.device_id, "ibm_marrakesh");
        assert!(warning.cause.contains("no token"));
        assert_eq!(connector.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_successful_remote() {
        let resolver = BackendResolver::new(Arc::new(Loopback));
        let resolution = resolver.resolve(true, "ibm_fez").await;
        assert!(resolution.warning().is_none());
        assert_eq!(
            resolution.handle().kind(),
            &ExecutorKind::Remote {
                device_id: "ibm_fez".into()
            }
        );
    }

    #[tokio::test]
    async fn test_no_remote_always_falls_back() {
        let resolver = BackendResolver::new(Arc::new(NoRemote));
        let resolution = resolver.resolve(true, "ibm_fez").await;
        assert!(resolution.warning().is_some());
    }
}
