//! Built-in lowering passes.
//!
//! - [`agnostic`]: rewrites that do not consult the target
//! - [`target`]: basis translation and verification

pub mod agnostic;
pub mod target;

pub use agnostic::{CancelInverses, FixedPoint, MergeRotations, RemoveIdentities};
pub use target::{BasisTranslation, BasisVerification, MAX_DECOMPOSITION_DEPTH};
