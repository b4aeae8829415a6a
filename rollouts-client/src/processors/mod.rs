//! Builds tree nodes out of fetched cluster objects.
//!
//! Processors are pure: they take a [`Snapshot`] and a reference time and
//! never talk to the cluster.

pub mod analysisrun;
pub mod experiment;
pub mod job;
pub mod pod;
pub mod processor;
pub mod replicaset;
pub mod rollout;

pub use experiment::ExperimentProcessor;
pub use processor::{Processor, Snapshot};
pub use rollout::RolloutProcessor;
