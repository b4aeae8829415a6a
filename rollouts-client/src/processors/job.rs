use chrono::{DateTime, Utc};
use k8s_openapi::api::batch::v1::Job;

use crate::tree::{Kind, ResourceNode, StatusIcon};

use super::processor::{name_of, Processor, Snapshot};

/// Jobs launched by analysis runs.
#[derive(Debug, Clone)]
pub struct JobProcessor {
    now: DateTime<Utc>,
}

impl JobProcessor {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Processor for JobProcessor {
    type Object = Job;

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn build_node(&self, job: &Job, _snapshot: &Snapshot) -> ResourceNode {
        let (icon, status) = job_status(job);
        ResourceNode::new(Kind::Job, name_of(&job.metadata))
            .with_status(icon, status)
            .with_age(self.get_age(&job.metadata))
    }
}

fn job_status(job: &Job) -> (StatusIcon, &'static str) {
    let Some(status) = job.status.as_ref() else {
        return (StatusIcon::Waiting, "Pending");
    };
    let condition = |type_: &str| {
        status
            .conditions
            .as_ref()
            .is_some_and(|conds| conds.iter().any(|c| c.type_ == type_ && c.status == "True"))
    };

    if condition("Failed") {
        (StatusIcon::Bad, "Failed")
    } else if condition("Complete") || status.succeeded.unwrap_or(0) > 0 {
        (StatusIcon::Ok, "Successful")
    } else if status.active.unwrap_or(0) > 0 {
        (StatusIcon::Progressing, "Running")
    } else {
        (StatusIcon::Waiting, "Pending")
    }
}
