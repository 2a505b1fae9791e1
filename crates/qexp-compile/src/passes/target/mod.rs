//! Passes that depend on the target's gate basis.

mod decompose;
mod translation;
mod verification;

pub use translation::{BasisTranslation, MAX_DECOMPOSITION_DEPTH};
pub use verification::BasisVerification;
