//! Target-agnostic passes.
//!
//! These passes only look at operation names, wires and angles. They are
//! safe to run on any circuit, before or after basis translation.

pub mod fixpoint;
pub mod optimization;

pub use fixpoint::FixedPoint;
pub use optimization::{CancelInverses, MergeRotations, RemoveIdentities};
