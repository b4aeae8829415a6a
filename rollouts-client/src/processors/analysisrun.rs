use chrono::{DateTime, Utc};

use crate::resources::{AnalysisRun, ANALYSIS_PHASE_PENDING};
use crate::tree::{Kind, ResourceNode, StatusIcon};

use super::job::JobProcessor;
use super::processor::{name_of, Processor, Snapshot};

#[derive(Debug, Clone)]
pub struct AnalysisRunProcessor {
    now: DateTime<Utc>,
}

impl AnalysisRunProcessor {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Processor for AnalysisRunProcessor {
    type Object = AnalysisRun;

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn build_node(&self, ar: &AnalysisRun, snapshot: &Snapshot) -> ResourceNode {
        let phase = ar
            .status
            .phase
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(ANALYSIS_PHASE_PENDING);

        let mut node = ResourceNode::new(Kind::AnalysisRun, name_of(&ar.metadata))
            .with_status(StatusIcon::for_phase(phase), phase)
            .with_age(self.get_age(&ar.metadata));

        let (successful, failed, inconclusive, error) = ar.status.totals();
        let counters = [
            (StatusIcon::Ok, successful),
            (StatusIcon::Bad, failed),
            (StatusIcon::Unknown, inconclusive),
            (StatusIcon::Warning, error),
        ];
        for (icon, count) in counters {
            if count > 0 {
                node = node.with_info(format!("{} {count}", icon.glyph()));
            }
        }

        let uid = ar.metadata.uid.as_deref().unwrap_or_default();
        let jobs = snapshot.jobs_owned_by(uid);
        node.with_children(JobProcessor::new(self.now).process(&jobs, snapshot))
    }
}

#[cfg(test)]
mod tests {
    use super::super::processor::fixtures::{now, owner};
    use super::*;
    use k8s_openapi::api::batch::v1::Job;
    use k8s_openapi::serde_json::{from_value, json};

    #[test]
    fn test_analysis_run_with_counters_and_jobs() {
        let ar: AnalysisRun = from_value(json!({
            "metadata": {"name": "guestbook-abc-2", "uid": "ar-1"},
            "status": {
                "phase": "Running",
                "metricResults": [{"name": "success-rate", "successful": 3, "failed": 1}]
            }
        }))
        .unwrap();
        let job: Job = from_value(json!({
            "metadata": {"name": "guestbook-job", "ownerReferences": owner("ar-1")},
            "status": {"active": 1}
        }))
        .unwrap();
        let snapshot = Snapshot {
            jobs: vec![job],
            ..Default::default()
        };

        let node = AnalysisRunProcessor::new(now()).build_node(&ar, &snapshot);

        let status = node.status.unwrap();
        assert_eq!(status.icon, StatusIcon::Progressing);
        assert_eq!(status.text, "Running");
        assert_eq!(node.info, vec!["✔ 3", "✖ 1"]);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].kind, Kind::Job);
    }

    #[test]
    fn test_empty_phase_is_pending() {
        let ar: AnalysisRun = from_value(json!({"metadata": {"name": "new-run"}})).unwrap();

        let node = AnalysisRunProcessor::new(now()).build_node(&ar, &Snapshot::default());
        let status = node.status.unwrap();
        assert_eq!(status.text, "Pending");
        assert_eq!(status.icon, StatusIcon::Waiting);
        assert!(node.info.is_empty());
    }
}
