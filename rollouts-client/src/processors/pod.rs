use chrono::{DateTime, Utc};
use k8s_openapi::api::core::v1::{ContainerStatus, Pod};

use crate::tree::{Kind, ResourceNode, StatusIcon};

use super::processor::{name_of, Processor, Snapshot};

#[derive(Debug, Clone)]
pub struct PodProcessor {
    now: DateTime<Utc>,
}

impl PodProcessor {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Processor for PodProcessor {
    type Object = Pod;

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn build_node(&self, pod: &Pod, _snapshot: &Snapshot) -> ResourceNode {
        let statuses = pod
            .status
            .as_ref()
            .and_then(|s| s.container_statuses.as_deref())
            .unwrap_or_default();
        let total = statuses.len();
        let ready = statuses.iter().filter(|cs| cs.ready).count();
        let restarts: i32 = statuses.iter().map(|cs| cs.restart_count).sum();

        let status = pod_status(pod);
        let mut node = ResourceNode::new(Kind::Pod, name_of(&pod.metadata))
            .with_status(pod_icon(&status, ready, total), status)
            .with_age(self.get_age(&pod.metadata))
            .with_info(format!("ready:{ready}/{total}"));
        if restarts > 0 {
            node = node.with_info(format!("restarts:{restarts}"));
        }
        node
    }
}

/// Pod status as `kubectl get pods` reports it.
fn pod_status(pod: &Pod) -> String {
    if pod.metadata.deletion_timestamp.is_some() {
        return "Terminating".to_string();
    }
    let Some(status) = pod.status.as_ref() else {
        return "Unknown".to_string();
    };

    let init = status.init_container_statuses.as_deref().unwrap_or_default();
    for cs in init {
        if let Some(reason) = container_reason(cs) {
            if reason != "Completed" {
                return format!("Init:{reason}");
            }
        }
    }

    let containers = status.container_statuses.as_deref().unwrap_or_default();
    for cs in containers.iter().rev() {
        if let Some(reason) = container_reason(cs) {
            return reason;
        }
    }

    status
        .reason
        .clone()
        .or_else(|| status.phase.clone())
        .unwrap_or_else(|| "Unknown".to_string())
}

fn container_reason(cs: &ContainerStatus) -> Option<String> {
    let state = cs.state.as_ref()?;
    if let Some(waiting) = &state.waiting {
        return waiting.reason.clone();
    }
    let terminated = state.terminated.as_ref()?;
    terminated.reason.clone().or_else(|| {
        Some(match terminated.signal {
            Some(signal) if signal != 0 => format!("Signal:{signal}"),
            _ => format!("ExitCode:{}", terminated.exit_code),
        })
    })
}

fn pod_icon(status: &str, ready: usize, total: usize) -> StatusIcon {
    match status {
        "Running" if total > 0 && ready == total => StatusIcon::Ok,
        "Running" | "ContainerCreating" | "PodInitializing" => StatusIcon::Progressing,
        "Pending" => StatusIcon::Waiting,
        "Succeeded" | "Completed" => StatusIcon::Ok,
        "Terminating" => StatusIcon::Neutral,
        "Failed" | "Error" | "CrashLoopBackOff" | "ImagePullBackOff" | "ErrImagePull"
        | "OOMKilled" | "ContainerCannotRun" | "InvalidImageName" => StatusIcon::Bad,
        s if s.starts_with("Init:") => {
            if s.ends_with("Error") || s.ends_with("BackOff") {
                StatusIcon::Bad
            } else {
                StatusIcon::Progressing
            }
        }
        _ => StatusIcon::Unknown,
    }
}

#[cfg(test)]
mod tests {
    use super::super::processor::fixtures::{now, pod};
    use super::*;
    use k8s_openapi::serde_json::{from_value, json};

    fn build(pod: &Pod) -> ResourceNode {
        PodProcessor::new(now()).build_node(pod, &Snapshot::default())
    }

    #[test]
    fn test_running_ready_pod() {
        let node = build(&pod("guestbook-abc-1", "rs-1"));

        assert_eq!(node.kind, Kind::Pod);
        assert_eq!(node.age, "2m");
        let status = node.status.unwrap();
        assert_eq!(status.icon, StatusIcon::Ok);
        assert_eq!(status.text, "Running");
        assert_eq!(node.info, vec!["ready:1/1"]);
    }

    #[test]
    fn test_crash_looping_pod() {
        let pod: Pod = from_value(json!({
            "metadata": {"name": "guestbook-abc-2"},
            "status": {
                "phase": "Running",
                "containerStatuses": [{
                    "name": "app", "image": "app:1", "imageID": "", "ready": false,
                    "restartCount": 4,
                    "state": {"waiting": {"reason": "CrashLoopBackOff"}}
                }]
            }
        }))
        .unwrap();

        let node = build(&pod);
        let status = node.status.unwrap();
        assert_eq!(status.text, "CrashLoopBackOff");
        assert_eq!(status.icon, StatusIcon::Bad);
        assert_eq!(node.info, vec!["ready:0/1", "restarts:4"]);
    }

    #[test]
    fn test_pending_and_terminating() {
        let pending: Pod = from_value(json!({
            "metadata": {"name": "p"},
            "status": {"phase": "Pending"}
        }))
        .unwrap();
        assert_eq!(build(&pending).status.unwrap().icon, StatusIcon::Waiting);

        let terminating: Pod = from_value(json!({
            "metadata": {"name": "t", "deletionTimestamp": "2024-05-10T11:59:00Z"},
            "status": {"phase": "Running"}
        }))
        .unwrap();
        let status = build(&terminating).status.unwrap();
        assert_eq!(status.text, "Terminating");
        assert_eq!(status.icon, StatusIcon::Neutral);
    }

    #[test]
    fn test_init_container_status() {
        let pod: Pod = from_value(json!({
            "metadata": {"name": "i"},
            "status": {
                "phase": "Pending",
                "initContainerStatuses": [{
                    "name": "init", "image": "init:1", "imageID": "", "ready": false,
                    "restartCount": 0, "state": {"waiting": {"reason": "PodInitializing"}}
                }]
            }
        }))
        .unwrap();
        let status = build(&pod).status.unwrap();
        assert_eq!(status.text, "Init:PodInitializing");
        assert_eq!(status.icon, StatusIcon::Progressing);
    }
}
