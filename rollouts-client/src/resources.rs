//! Typed views over the Argo Rollouts custom resources.
//!
//! Only the fields the tree needs are modelled. Objects are fetched as
//! [`DynamicObject`]s and converted with [`dynamic_to_typed`], so unknown
//! fields and newer controller versions are tolerated.

use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::serde_json::{from_value, to_value};
use kube::api::{ApiResource, DynamicObject};
use kube::core::GroupVersionKind;
use serde::de::DeserializeOwned;
use serde::Deserialize;

pub const ARGO_GROUP: &str = "argoproj.io";
pub const ARGO_VERSION: &str = "v1alpha1";

pub const ANALYSIS_PHASE_PENDING: &str = "Pending";
pub const ANALYSIS_PHASE_RUNNING: &str = "Running";

/// Annotation carrying the rollout revision on replica sets, experiments
/// and analysis runs.
pub const REVISION_ANNOTATION: &str = "rollout.argoproj.io/revision";
/// Label holding the pod template hash on rollout owned replica sets.
pub const POD_TEMPLATE_HASH_LABEL: &str = "rollouts-pod-template-hash";
/// Annotation set on an old replica set while its scale down is delayed.
pub const SCALE_DOWN_DEADLINE_ANNOTATION: &str = "argo-rollouts.argoproj.io/scale-down-deadline";

/// Argo kinds this tool knows about, as `(kind, plural)`.
const ARGO_KINDS: [(&str, &str); 3] = [
    ("Rollout", "rollouts"),
    ("Experiment", "experiments"),
    ("AnalysisRun", "analysisruns"),
];

fn argo_resource(kind: &str, plural: &str) -> ApiResource {
    ApiResource::from_gvk_with_plural(
        &GroupVersionKind::gvk(ARGO_GROUP, ARGO_VERSION, kind),
        plural,
    )
}

pub fn rollout_resource() -> ApiResource {
    argo_resource("Rollout", "rollouts")
}

pub fn experiment_resource() -> ApiResource {
    argo_resource("Experiment", "experiments")
}

pub fn analysis_run_resource() -> ApiResource {
    argo_resource("AnalysisRun", "analysisruns")
}

/// Resolves a user supplied Argo kind name (`rollout`, `rollouts`, `ro`,
/// `Rollout`) without a discovery round trip.
pub fn argo_resource_for(name: &str) -> Option<ApiResource> {
    let lower = name.to_ascii_lowercase();
    let short = match lower.as_str() {
        "ro" => "rollouts",
        "exp" => "experiments",
        "ar" => "analysisruns",
        other => other,
    };
    ARGO_KINDS
        .iter()
        .find(|(kind, plural)| short == *plural || short == kind.to_ascii_lowercase())
        .map(|(kind, plural)| argo_resource(kind, plural))
}

/// Converts a dynamic object into one of the typed views.
pub fn dynamic_to_typed<T: DeserializeOwned>(
    obj: &DynamicObject,
) -> Result<T, k8s_openapi::serde_json::Error> {
    from_value(to_value(obj)?)
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Rollout {
    pub metadata: ObjectMeta,
    pub spec: RolloutSpec,
    pub status: RolloutStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolloutSpec {
    pub replicas: Option<i32>,
    pub paused: bool,
    pub strategy: RolloutStrategy,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolloutStrategy {
    pub canary: Option<CanaryStrategy>,
    pub blue_green: Option<BlueGreenStrategy>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanaryStrategy {
    pub ping_pong: Option<PingPongSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PingPongSpec {
    pub ping_service: String,
    pub pong_service: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlueGreenStrategy {
    pub active_service: String,
    pub preview_service: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RolloutStatus {
    pub phase: Option<String>,
    pub message: Option<String>,
    pub abort: bool,
    pub current_pod_hash: Option<String>,
    #[serde(rename = "stableRS")]
    pub stable_rs: Option<String>,
    pub blue_green: BlueGreenStatus,
    pub canary: CanaryStatus,
    pub pause_conditions: Vec<PauseCondition>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlueGreenStatus {
    pub active_selector: Option<String>,
    pub preview_selector: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CanaryStatus {
    pub stable_ping_pong: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PauseCondition {
    pub reason: String,
}

impl Rollout {
    pub fn is_blue_green(&self) -> bool {
        self.spec.strategy.blue_green.is_some()
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Experiment {
    pub metadata: ObjectMeta,
    pub status: ExperimentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperimentStatus {
    pub phase: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisRun {
    pub metadata: ObjectMeta,
    pub status: AnalysisRunStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisRunStatus {
    pub phase: Option<String>,
    pub message: Option<String>,
    pub metric_results: Vec<MetricResult>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricResult {
    pub name: String,
    pub successful: i32,
    pub failed: i32,
    pub error: i32,
    pub inconclusive: i32,
}

impl AnalysisRunStatus {
    /// Totals across all metrics as `(successful, failed, inconclusive, error)`.
    pub fn totals(&self) -> (i32, i32, i32, i32) {
        self.metric_results
            .iter()
            .fold((0, 0, 0, 0), |(s, f, i, e), m| {
                (s + m.successful, f + m.failed, i + m.inconclusive, e + m.error)
            })
    }
}

/// Revision annotation of an object, when present and numeric.
pub fn revision_of(meta: &ObjectMeta) -> Option<u64> {
    meta.annotations
        .as_ref()?
        .get(REVISION_ANNOTATION)?
        .parse()
        .ok()
}
