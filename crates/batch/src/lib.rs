#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! Batched tensor exchange layer.
//!
//! This crate is the data currency between a task/environment and a training
//! harness: shaped named tensors batched over the parallel-instance
//! dimension. It provides three pieces:
//!
//! -   [`Tensor`]: a row-major `f32` buffer with an explicit shape.
//! -   [`Batch`]: an ordered dictionary of tensors addressed by dotted keys
//!     such as `agents.observation.obs_self`.
//! -   [`TensorSpec`]/[`CompositeSpec`]: shape declarations agreed upon with
//!     the consumer, fixed for the lifetime of an environment, used both to
//!     materialize zeroed batches and to validate produced ones.

use thiserror::Error;

pub mod dict;
pub mod spec;
pub mod tensor;

pub use dict::Batch;
pub use spec::{CompositeSpec, TensorSpec};
pub use tensor::Tensor;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("missing entry `{0}`")]
    MissingKey(String),
    #[error("shape mismatch for `{key}`: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        key: String,
        expected: Vec<usize>,
        got: Vec<usize>,
    },
}
