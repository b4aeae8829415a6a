//! Tree view of a parent resource and the resources it created.
//!
//! ```text
//! NAME                        KIND        STATUS     AGE  INFO
//! ⟳guestbook                  Rollout     ✔ Healthy  5m
//! └──#revision:1
//!    └──⧉guestbook-789        ReplicaSet  ✔ Healthy  5m   stable
//!       └──□guestbook-789-ab  Pod         ✔ Running  5m   ready:1/1
//! ```

mod node;
mod prefix;
mod render;

pub use node::{
    Kind, NodeStatus, ResourceNode, StatusIcon, INFO_TAG_ACTIVE, INFO_TAG_CANARY, INFO_TAG_PING,
    INFO_TAG_PONG, INFO_TAG_PREVIEW, INFO_TAG_STABLE,
};
pub use prefix::prefix_for;
pub use render::{render, TreeRenderer, HEADER};
