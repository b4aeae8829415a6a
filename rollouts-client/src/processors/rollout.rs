use std::cmp::Reverse;
use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::resources::{revision_of, Rollout};
use crate::tree::{Kind, ResourceNode, StatusIcon};

use super::analysisrun::AnalysisRunProcessor;
use super::experiment::ExperimentProcessor;
use super::processor::{name_of, Processor, Snapshot};
use super::replicaset::{ReplicaSetProcessor, RolloutTags};

/// Rollout with its owned objects grouped under one row per revision,
/// newest revision first.
#[derive(Debug, Clone)]
pub struct RolloutProcessor {
    now: DateTime<Utc>,
}

impl RolloutProcessor {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Processor for RolloutProcessor {
    type Object = Rollout;

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[tracing::instrument(skip_all, fields(rollout = ?ro.metadata.name))]
    fn build_node(&self, ro: &Rollout, snapshot: &Snapshot) -> ResourceNode {
        let uid = ro.metadata.uid.as_deref().unwrap_or_default();
        let replica_sets = ReplicaSetProcessor::with_tags(self.now, RolloutTags::from_rollout(ro));
        let experiments = ExperimentProcessor::new(self.now);
        let analysis_runs = AnalysisRunProcessor::new(self.now);

        let mut revisions: BTreeMap<Reverse<u64>, Vec<ResourceNode>> = BTreeMap::new();
        let mut add = |revision: Option<u64>, node: ResourceNode| {
            revisions
                .entry(Reverse(revision.unwrap_or(0)))
                .or_default()
                .push(node);
        };

        for rs in snapshot.replica_sets_owned_by(uid) {
            add(revision_of(&rs.metadata), replica_sets.build_node(rs, snapshot));
        }
        for exp in snapshot.experiments_owned_by(uid) {
            add(revision_of(&exp.metadata), experiments.build_node(exp, snapshot));
        }
        for ar in snapshot.analysis_runs_owned_by(uid) {
            add(revision_of(&ar.metadata), analysis_runs.build_node(ar, snapshot));
        }

        let children = revisions
            .into_iter()
            .map(|(Reverse(revision), nodes)| {
                ResourceNode::new(Kind::Revision, format!("revision:{revision}"))
                    .with_children(nodes)
            })
            .collect();

        let (icon, status) = rollout_status(ro);
        ResourceNode::new(Kind::Rollout, name_of(&ro.metadata))
            .with_status(icon, status)
            .with_age(self.get_age(&ro.metadata))
            .with_children(children)
    }
}

fn rollout_status(ro: &Rollout) -> (StatusIcon, String) {
    match ro.status.phase.as_deref().filter(|p| !p.is_empty()) {
        Some(phase) => (StatusIcon::for_phase(phase), phase.to_string()),
        None if ro.status.abort => (StatusIcon::Bad, "Degraded".to_string()),
        None if ro.spec.paused || !ro.status.pause_conditions.is_empty() => {
            (StatusIcon::Paused, "Paused".to_string())
        }
        None => (StatusIcon::Unknown, "Unknown".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::super::processor::fixtures::{now, owner, pod, replica_set};
    use super::*;
    use crate::resources::{dynamic_to_typed, AnalysisRun};
    use crate::structs::RenderOptions;
    use crate::tree::TreeRenderer;
    use k8s_openapi::serde_json::{from_value, json, Value};
    use kube::api::DynamicObject;

    fn rollout(status: Value) -> Rollout {
        let obj: DynamicObject = from_value(json!({
            "apiVersion": "argoproj.io/v1alpha1",
            "kind": "Rollout",
            "metadata": {
                "name": "guestbook",
                "uid": "ro-1",
                "creationTimestamp": "2024-05-10T10:00:00Z"
            },
            "spec": {"strategy": {"canary": {}}},
            "status": status
        }))
        .unwrap();
        dynamic_to_typed(&obj).unwrap()
    }

    fn snapshot() -> Snapshot {
        let ar: AnalysisRun = from_value(json!({
            "metadata": {
                "name": "guestbook-bbb-2",
                "uid": "ar-1",
                "annotations": {"rollout.argoproj.io/revision": "2"},
                "ownerReferences": owner("ro-1")
            },
            "status": {"phase": "Running"}
        }))
        .unwrap();
        Snapshot {
            replica_sets: vec![
                replica_set("guestbook-aaa", "rs-1", "ro-1", 1, "aaa"),
                replica_set("guestbook-bbb", "rs-2", "ro-1", 2, "bbb"),
                replica_set("unrelated", "rs-3", "other", 9, "zzz"),
            ],
            pods: vec![pod("guestbook-aaa-1", "rs-1"), pod("guestbook-bbb-1", "rs-2")],
            analysis_runs: vec![ar],
            ..Default::default()
        }
    }

    #[test]
    fn test_revisions_newest_first() {
        let ro = rollout(json!({"phase": "Progressing", "stableRS": "aaa", "currentPodHash": "bbb"}));

        let node = RolloutProcessor::new(now()).build_node(&ro, &snapshot());

        assert_eq!(node.age, "2h0m");
        let revisions: Vec<&str> = node.children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(revisions, vec!["revision:2", "revision:1"]);

        let newest = &node.children[0];
        assert_eq!(newest.kind, Kind::Revision);
        assert!(newest.status.is_none());
        let kinds: Vec<Kind> = newest.children.iter().map(|c| c.kind).collect();
        assert_eq!(kinds, vec![Kind::ReplicaSet, Kind::AnalysisRun]);
        assert_eq!(newest.children[0].info, vec!["canary"]);
        assert_eq!(node.children[1].children[0].info, vec!["stable"]);
    }

    #[test]
    fn test_rollout_status_fallbacks() {
        assert_eq!(
            rollout_status(&rollout(json!({"phase": "Healthy"}))),
            (StatusIcon::Ok, "Healthy".to_string())
        );
        assert_eq!(
            rollout_status(&rollout(json!({"abort": true}))),
            (StatusIcon::Bad, "Degraded".to_string())
        );
        assert_eq!(
            rollout_status(&rollout(json!({"pauseConditions": [{"reason": "CanaryPauseStep"}]}))),
            (StatusIcon::Paused, "Paused".to_string())
        );
        assert_eq!(
            rollout_status(&rollout(json!({}))),
            (StatusIcon::Unknown, "Unknown".to_string())
        );
    }

    #[test]
    fn test_rendered_rollout_tree() {
        let ro = rollout(json!({"phase": "Healthy", "stableRS": "bbb", "currentPodHash": "bbb"}));
        let node = RolloutProcessor::new(now()).build_node(&ro, &snapshot());
        let options = RenderOptions {
            no_color: true,
            ..Default::default()
        };

        let lines = TreeRenderer::new(&options).lines(&node);

        assert!(lines[1].starts_with("⟳guestbook"));
        assert!(lines[2].starts_with("├──#revision:2"));
        assert!(lines[3].starts_with("│  ├──⧉guestbook-bbb"));
        assert!(lines[4].starts_with("│  │  └──□guestbook-bbb-1"));
        assert!(lines[5].starts_with("│  └──αguestbook-bbb-2"));
        assert!(lines[6].starts_with("└──#revision:1"));
        assert!(lines[7].starts_with("   └──⧉guestbook-aaa"));
        assert!(lines[8].starts_with("      └──□guestbook-aaa-1"));
        assert_eq!(lines.len(), 9);
    }
}
