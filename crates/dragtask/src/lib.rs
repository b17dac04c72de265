#![deny(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
//! # Rope-payload dragging task
//!
//! A cooperative multi-agent task: N rope-linked quadrotors drag a rigid
//! payload to a target pose. This crate is the task definition layered on a
//! simulator facade ([`rig::RigView`]) and the batched tensor exchange layer
//! ([`batch`]).
//!
//! ## Observation
//!
//! Each agent receives:
//!
//! -   `obs_self`: its own kinematic state with the position expressed
//!     relative to the payload, plus a one-hot identity vector.
//! -   `obs_others`: relative position, distance, rotation and velocities of
//!     every other vehicle.
//! -   `obs_payload`: the payload state shared by all agents — pose relative
//!     to the target, rotation, velocities, heading and up axes, and optional
//!     time-progress features.
//!
//! A centralized `state_drones`/`state_payload` view is produced alongside
//! for centralized critics.
//!
//! ## Reward
//!
//! A separation factor gates a pose reward, pose-gated uprightness/spin/swing
//! bonuses, a joint-limit term, an action-smoothness term, and an effort
//! term. Episodes terminate when a vehicle drops below minimum altitude or
//! its state turns non-finite, and truncate at the episode length limit.
//!
//! Stages communicate through an explicit [`StepContext`]: state is
//! aggregated once per step, then the observation builder and the
//! reward/termination evaluator both read the same context.

pub mod aggregate;
pub mod config;
pub mod env;
pub mod observation;
pub mod ops;
pub mod reward;
pub mod sample;
pub mod stats;

pub use aggregate::{aggregate, StepContext};
pub use config::{RewardWeights, SamplingConfig, TaskConfig};
pub use env::{AgentSpec, DragEnv};
pub use reward::StepOutcome;
pub use sample::Sample;
pub use stats::EpisodeStats;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskError {
    #[error("unknown vehicle model `{0}`")]
    UnknownVehicle(String),
    #[error("rig has {rig} vehicles but the task is configured for {config}")]
    VehicleCount { config: usize, rig: usize },
    #[error(transparent)]
    Batch(#[from] batch::BatchError),
}
