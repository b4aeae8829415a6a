use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::ReplicaSet;

use crate::resources::{Rollout, POD_TEMPLATE_HASH_LABEL, SCALE_DOWN_DEADLINE_ANNOTATION};
use crate::tree::{
    Kind, ResourceNode, StatusIcon, INFO_TAG_ACTIVE, INFO_TAG_CANARY, INFO_TAG_PING,
    INFO_TAG_PONG, INFO_TAG_PREVIEW, INFO_TAG_STABLE,
};

use super::pod::PodProcessor;
use super::processor::{name_of, Processor, Snapshot};

/// Which pod template hashes the owning rollout currently points at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RolloutTags {
    stable: Option<String>,
    canary: Option<String>,
    active: Option<String>,
    preview: Option<String>,
    /// Ping pong tags for the stable and the canary side, in that order.
    ping_pong: Option<(&'static str, &'static str)>,
}

impl RolloutTags {
    pub fn from_rollout(ro: &Rollout) -> Self {
        let status = &ro.status;
        let stable = status.stable_rs.clone();

        if ro.is_blue_green() {
            return Self {
                stable,
                active: status.blue_green.active_selector.clone(),
                preview: status.blue_green.preview_selector.clone(),
                ..Default::default()
            };
        }

        let canary = status
            .current_pod_hash
            .clone()
            .filter(|hash| Some(hash) != stable.as_ref());
        let ping_pong = ro
            .spec
            .strategy
            .canary
            .as_ref()
            .and_then(|c| c.ping_pong.as_ref())
            .map(|_| match status.canary.stable_ping_pong.as_deref() {
                Some(INFO_TAG_PONG) => (INFO_TAG_PONG, INFO_TAG_PING),
                _ => (INFO_TAG_PING, INFO_TAG_PONG),
            });

        Self {
            stable,
            canary,
            ping_pong,
            ..Default::default()
        }
    }

    fn tags_for(&self, hash: &str) -> Vec<&'static str> {
        let is = |slot: &Option<String>| slot.as_deref() == Some(hash);
        let mut tags = Vec::new();
        if is(&self.stable) {
            tags.push(INFO_TAG_STABLE);
            if let Some((stable, _)) = self.ping_pong {
                tags.push(stable);
            }
        }
        if is(&self.canary) {
            tags.push(INFO_TAG_CANARY);
            if let Some((_, canary)) = self.ping_pong {
                tags.push(canary);
            }
        }
        if is(&self.active) {
            tags.push(INFO_TAG_ACTIVE);
        }
        if is(&self.preview) && !is(&self.active) {
            tags.push(INFO_TAG_PREVIEW);
        }
        tags
    }
}

#[derive(Debug, Clone)]
pub struct ReplicaSetProcessor {
    now: DateTime<Utc>,
    tags: RolloutTags,
}

impl ReplicaSetProcessor {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self::with_tags(now, RolloutTags::default())
    }

    pub fn with_tags(now: DateTime<Utc>, tags: RolloutTags) -> Self {
        Self { now, tags }
    }

    /// `delay:` tag while an old replica set waits out its scale down delay.
    fn scale_down_delay(&self, rs: &ReplicaSet) -> Option<String> {
        let deadline = rs
            .metadata
            .annotations
            .as_ref()?
            .get(SCALE_DOWN_DEADLINE_ANNOTATION)?;
        let deadline = deadline.parse::<DateTime<Utc>>().ok()?;
        let remaining = deadline.signed_duration_since(self.now).num_seconds();
        Some(if remaining > 0 {
            format!("delay:{remaining}s")
        } else {
            "delay:passed".to_string()
        })
    }
}

impl Processor for ReplicaSetProcessor {
    type Object = ReplicaSet;

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn build_node(&self, rs: &ReplicaSet, snapshot: &Snapshot) -> ResourceNode {
        let (icon, status) = replica_set_status(rs);
        let mut node = ResourceNode::new(Kind::ReplicaSet, name_of(&rs.metadata))
            .with_status(icon, status)
            .with_age(self.get_age(&rs.metadata));

        let hash = rs
            .metadata
            .labels
            .as_ref()
            .and_then(|labels| labels.get(POD_TEMPLATE_HASH_LABEL));
        if let Some(hash) = hash {
            for tag in self.tags.tags_for(hash) {
                node = node.with_info(tag);
            }
        }
        if let Some(delay) = self.scale_down_delay(rs) {
            node = node.with_info(delay);
        }

        let uid = rs.metadata.uid.as_deref().unwrap_or_default();
        let pods = snapshot.pods_owned_by(uid);
        node.with_children(PodProcessor::new(self.now).process(&pods, snapshot))
    }
}

fn replica_set_status(rs: &ReplicaSet) -> (StatusIcon, &'static str) {
    let desired = rs.spec.as_ref().and_then(|s| s.replicas).unwrap_or(1);
    let status = rs.status.as_ref();
    let available = status.and_then(|s| s.available_replicas).unwrap_or(0);
    let failed = status
        .and_then(|s| s.conditions.as_ref())
        .is_some_and(|conds| {
            conds
                .iter()
                .any(|c| c.type_ == "ReplicaFailure" && c.status == "True")
        });

    if failed {
        (StatusIcon::Bad, "Degraded")
    } else if desired == 0 {
        (StatusIcon::Neutral, "ScaledDown")
    } else if available < desired {
        (StatusIcon::Progressing, "Progressing")
    } else {
        (StatusIcon::Ok, "Healthy")
    }
}
