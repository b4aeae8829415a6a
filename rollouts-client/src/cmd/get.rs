use chrono::Utc;
use k8s_openapi::api::apps::v1::ReplicaSet;
use k8s_openapi::api::batch::v1::Job;
use k8s_openapi::api::core::v1::Pod;
use kube::api::{Api, ApiResource, DynamicObject};
use kube::Client;
use serde::de::DeserializeOwned;
use tracing::warn;

use super::utils::{list_or_empty, namespaced};
use crate::errors::FetchError;
use crate::processors::{ExperimentProcessor, Processor, RolloutProcessor, Snapshot};
use crate::resources::{
    analysis_run_resource, dynamic_to_typed, experiment_resource, rollout_resource, Experiment,
    Rollout,
};
use crate::structs::ParentKind;
use crate::tree::ResourceNode;
use crate::watch::TreeSource;

/// Fetches a rollout or experiment and everything it owns from the cluster.
#[derive(Clone)]
pub struct KubeTreeSource {
    client: Client,
    namespace: Option<String>,
    parent: ParentKind,
    name: String,
}

impl KubeTreeSource {
    /// `namespace` of `None` uses the namespace of the active kubeconfig context.
    pub fn new(client: Client, namespace: Option<String>, parent: ParentKind, name: String) -> Self {
        Self {
            client,
            namespace,
            parent,
            name,
        }
    }

    fn dynamic(&self, ar: &ApiResource) -> Api<DynamicObject> {
        match self.namespace.as_deref() {
            Some(ns) => Api::namespaced_with(self.client.clone(), ns, ar),
            None => Api::default_namespaced_with(self.client.clone(), ar),
        }
    }

    async fn fetch_parent(&self) -> Result<DynamicObject, FetchError> {
        let ar = match self.parent {
            ParentKind::Rollout => rollout_resource(),
            ParentKind::Experiment => experiment_resource(),
        };
        Ok(self.dynamic(&ar).get(&self.name).await?)
    }

    async fn fetch_snapshot(&self) -> Result<Snapshot, FetchError> {
        let ns = self.namespace.as_deref();
        let replica_sets: Api<ReplicaSet> = namespaced(self.client.clone(), ns);
        let pods: Api<Pod> = namespaced(self.client.clone(), ns);
        let jobs: Api<Job> = namespaced(self.client.clone(), ns);
        let experiments = self.dynamic(&experiment_resource());
        let analysis_runs = self.dynamic(&analysis_run_resource());

        let (replica_sets, pods, jobs, experiments, analysis_runs) = futures::try_join!(
            list_or_empty(&replica_sets),
            list_or_empty(&pods),
            list_or_empty(&jobs),
            list_or_empty(&experiments),
            list_or_empty(&analysis_runs),
        )?;

        Ok(Snapshot {
            replica_sets,
            pods,
            jobs,
            experiments: decode_all(&experiments),
            analysis_runs: decode_all(&analysis_runs),
        })
    }
}

impl TreeSource for KubeTreeSource {
    #[tracing::instrument(skip(self), fields(kind = self.parent.kind(), name = %self.name))]
    async fn fetch(&self) -> Result<ResourceNode, FetchError> {
        let (parent, snapshot) = futures::try_join!(self.fetch_parent(), self.fetch_snapshot())?;
        let now = Utc::now();

        // the parent itself must decode, otherwise there is nothing to show
        let node = match self.parent {
            ParentKind::Rollout => {
                let ro: Rollout = dynamic_to_typed(&parent).map_err(FetchError::fatal)?;
                RolloutProcessor::new(now).build_node(&ro, &snapshot)
            }
            ParentKind::Experiment => {
                let exp: Experiment = dynamic_to_typed(&parent).map_err(FetchError::fatal)?;
                ExperimentProcessor::new(now).build_node(&exp, &snapshot)
            }
        };
        Ok(node)
    }
}

/// Decodes dynamic children, dropping the ones that do not fit the typed view.
fn decode_all<T: DeserializeOwned>(objs: &[DynamicObject]) -> Vec<T> {
    objs.iter()
        .filter_map(|obj| match dynamic_to_typed(obj) {
            Ok(typed) => Some(typed),
            Err(err) => {
                warn!(name = ?obj.metadata.name, error = %err, "skipping undecodable object");
                None
            }
        })
        .collect()
}
