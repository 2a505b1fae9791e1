//! IBM Quantum failures and their mapping onto executor errors.

use qexp_hal::HalError;
use thiserror::Error;

/// Result alias for the IBM adapter.
pub type IbmResult<T> = Result<T, IbmError>;

/// Errors raised while talking to IBM Quantum.
#[derive(Debug, Error)]
pub enum IbmError {
    /// No credentials in the environment.
    #[error(
        "no IBM Quantum credentials: set IBM_API_KEY and IBM_SERVICE_CRN, or IBM_QUANTUM_TOKEN"
    )]
    MissingToken,

    /// The token cannot be used as a header value.
    #[error("token is not a valid header value")]
    InvalidToken,

    /// An API key was given without its service instance.
    #[error("IBM_API_KEY needs IBM_SERVICE_CRN to name the service instance")]
    MissingServiceCrn,

    #[error("IAM token exchange failed: {0}")]
    IamTokenExchange(String),

    #[error("request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Non-success response from the service.
    #[error("IBM Quantum: {message}")]
    ApiError {
        code: Option<String>,
        message: String,
    },

    #[error("unknown job {0}")]
    JobNotFound(String),

    #[error("job failed on device: {0}")]
    JobFailed(String),

    #[error("job cancelled: {0}")]
    JobCancelled(String),

    /// The circuit could not be turned into a Sampler payload.
    #[error("cannot build Sampler payload: {0}")]
    CircuitError(String),

    /// Unknown or offline device.
    #[error("device {0} is unknown or offline")]
    BackendUnavailable(String),

    #[error("circuit needs {required} qubits, device has {available}")]
    TooManyQubits { required: u32, available: u32 },

    #[error("malformed response: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl From<IbmError> for HalError {
    fn from(e: IbmError) -> Self {
        match e {
            IbmError::MissingToken
            | IbmError::InvalidToken
            | IbmError::IamTokenExchange(_)
            | IbmError::MissingServiceCrn => HalError::AuthenticationFailed(e.to_string()),
            IbmError::JobNotFound(id) => HalError::JobNotFound(id),
            IbmError::JobFailed(msg) => HalError::JobFailed(msg),
            IbmError::JobCancelled(_) => HalError::JobCancelled,
            IbmError::BackendUnavailable(msg) => HalError::BackendUnavailable(msg),
            IbmError::HttpError(_) => HalError::BackendUnavailable(e.to_string()),
            IbmError::CircuitError(msg) => HalError::InvalidCircuit(msg),
            IbmError::TooManyQubits { .. } => HalError::CircuitTooLarge(e.to_string()),
            _ => HalError::Backend(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_token_names_both_variables() {
        let msg = IbmError::MissingToken.to_string();
        assert!(msg.contains("IBM_API_KEY"));
        assert!(msg.contains("IBM_QUANTUM_TOKEN"));
    }

    #[test]
    fn test_api_error_display() {
        let err = IbmError::ApiError {
            code: Some("ERR_401".into()),
            message: "Unauthorized".into(),
        };
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_too_many_qubits_display() {
        let msg = IbmError::TooManyQubits {
            required: 200,
            available: 156,
        }
        .to_string();
        assert!(msg.contains("200"));
        assert!(msg.contains("156"));
    }

    #[test]
    fn test_credential_errors_are_authentication_failures() {
        for err in [
            IbmError::MissingToken,
            IbmError::InvalidToken,
            IbmError::MissingServiceCrn,
            IbmError::IamTokenExchange("401".into()),
        ] {
            let hal: HalError = err.into();
            assert!(matches!(hal, HalError::AuthenticationFailed(_)));
        }
    }

    #[test]
    fn test_job_errors_to_hal() {
        let hal: HalError = IbmError::JobNotFound("j1".into()).into();
        assert!(matches!(hal, HalError::JobNotFound(id) if id == "j1"));

        let hal: HalError = IbmError::JobFailed("boom".into()).into();
        assert!(matches!(hal, HalError::JobFailed(msg) if msg == "boom"));

        let hal: HalError = IbmError::JobCancelled("user".into()).into();
        assert!(matches!(hal, HalError::JobCancelled));
    }

    #[test]
    fn test_backend_unavailable_to_hal() {
        let hal: HalError = IbmError::BackendUnavailable("ibm_kyoto".into()).into();
        assert!(matches!(hal, HalError::BackendUnavailable(msg) if msg == "ibm_kyoto"));
    }

    #[test]
    fn test_transport_error_is_unavailable() {
        let transport = reqwest::Client::new()
            .get("not a url")
            .build()
            .unwrap_err();
        let hal: HalError = IbmError::HttpError(transport).into();
        assert!(matches!(hal, HalError::BackendUnavailable(_)));
    }

    #[test]
    fn test_circuit_errors_to_hal() {
        let hal: HalError = IbmError::CircuitError("bad".into()).into();
        assert!(matches!(hal, HalError::InvalidCircuit(_)));

        let hal: HalError = IbmError::TooManyQubits {
            required: 200,
            available: 156,
        }
        .into();
        assert!(matches!(hal, HalError::CircuitTooLarge(_)));
    }

    #[test]
    fn test_api_error_to_hal_backend() {
        let hal: HalError = IbmError::ApiError {
            code: None,
            message: "server error".into(),
        }
        .into();
        assert!(matches!(hal, HalError::Backend(_)));
    }
}
