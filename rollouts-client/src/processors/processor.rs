use chrono::{DateTime, Utc};
use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;

use crate::resources::{AnalysisRun, Experiment};
use crate::tree::ResourceNode;
use crate::utils::{age_at, is_owned_by};

/// Turns one fetched object into a tree node, pulling its children out of
/// the snapshot.
pub trait Processor {
    type Object;

    /// Reference time for ages and deadlines.
    fn now(&self) -> DateTime<Utc>;

    fn build_node(&self, obj: &Self::Object, snapshot: &Snapshot) -> ResourceNode;

    fn get_age(&self, meta: &ObjectMeta) -> String {
        age_at(meta, self.now())
    }

    fn process(&self, items: &[&Self::Object], snapshot: &Snapshot) -> Vec<ResourceNode> {
        items
            .iter()
            .map(|obj| self.build_node(*obj, snapshot))
            .collect()
    }
}

/// Everything fetched for one render of a parent resource.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub replica_sets: Vec<ReplicaSet>,
    pub pods: Vec<Pod>,
    pub jobs: Vec<Job>,
    pub experiments: Vec<Experiment>,
    pub analysis_runs: Vec<AnalysisRun>,
}

impl Snapshot {
    pub fn replica_sets_owned_by(&self, uid: &str) -> Vec<&ReplicaSet> {
        owned_by(&self.replica_sets, |rs| &rs.metadata, uid)
    }

    pub fn pods_owned_by(&self, uid: &str) -> Vec<&Pod> {
        owned_by(&self.pods, |pod| &pod.metadata, uid)
    }

    pub fn jobs_owned_by(&self, uid: &str) -> Vec<&Job> {
        owned_by(&self.jobs, |job| &job.metadata, uid)
    }

    pub fn experiments_owned_by(&self, uid: &str) -> Vec<&Experiment> {
        owned_by(&self.experiments, |exp| &exp.metadata, uid)
    }

    pub fn analysis_runs_owned_by(&self, uid: &str) -> Vec<&AnalysisRun> {
        owned_by(&self.analysis_runs, |ar| &ar.metadata, uid)
    }
}

/// Objects owned by `uid`, ordered by name.
fn owned_by<'a, T>(items: &'a [T], meta: impl Fn(&T) -> &ObjectMeta, uid: &str) -> Vec<&'a T> {
    let mut owned: Vec<&T> = items
        .iter()
        .filter(|item| is_owned_by(meta(*item), uid))
        .collect();
    owned.sort_by(|a, b| meta(*a).name.cmp(&meta(*b).name));
    owned
}

pub fn name_of(meta: &ObjectMeta) -> String {
    meta.name.clone().unwrap_or_default()
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::TimeZone;
    use k8s_openapi::serde_json::{from_value, json, Value};

    use super::*;

    pub fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 10, 12, 0, 0).unwrap()
    }

    pub fn owner(uid: &str) -> Value {
        json!([{"apiVersion": "v1", "kind": "Owner", "name": "owner", "uid": uid}])
    }

    pub fn replica_set(name: &str, uid: &str, owner_uid: &str, revision: u64, hash: &str) -> ReplicaSet {
        from_value(json!({
            "metadata": {
                "name": name,
                "uid": uid,
                "creationTimestamp": "2024-05-10T11:50:00Z",
                "labels": {"rollouts-pod-template-hash": hash},
                "annotations": {"rollout.argoproj.io/revision": revision.to_string()},
                "ownerReferences": owner(owner_uid)
            },
            "spec": {"replicas": 1, "selector": {}},
            "status": {"replicas": 1, "readyReplicas": 1, "availableReplicas": 1}
        }))
        .unwrap()
    }

    pub fn pod(name: &str, owner_uid: &str) -> Pod {
        from_value(json!({
            "metadata": {
                "name": name,
                "creationTimestamp": "2024-05-10T11:58:00Z",
                "ownerReferences": owner(owner_uid)
            },
            "status": {
                "phase": "Running",
                "containerStatuses": [{
                    "name": "app", "image": "app:1", "imageID": "", "ready": true,
                    "restartCount": 0, "state": {"running": {}}
                }]
            }
        }))
        .unwrap()
    }
}
