//! Cluster backed implementations of the tree source and the name lister.

pub mod complete;
pub mod get;
pub mod utils;

pub use complete::KubeNameLister;
pub use get::KubeTreeSource;
