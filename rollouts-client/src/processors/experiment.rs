use chrono::{DateTime, Utc};

use crate::resources::{Experiment, ANALYSIS_PHASE_PENDING};
use crate::tree::{Kind, ResourceNode, StatusIcon};

use super::analysisrun::AnalysisRunProcessor;
use super::processor::{name_of, Processor, Snapshot};
use super::replicaset::ReplicaSetProcessor;

/// Experiment with its replica sets followed by its analysis runs.
#[derive(Debug, Clone)]
pub struct ExperimentProcessor {
    now: DateTime<Utc>,
}

impl ExperimentProcessor {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self { now }
    }
}

impl Processor for ExperimentProcessor {
    type Object = Experiment;

    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    #[tracing::instrument(skip_all, fields(experiment = ?exp.metadata.name))]
    fn build_node(&self, exp: &Experiment, snapshot: &Snapshot) -> ResourceNode {
        let phase = exp
            .status
            .phase
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or(ANALYSIS_PHASE_PENDING);

        let uid = exp.metadata.uid.as_deref().unwrap_or_default();
        let replica_sets = snapshot.replica_sets_owned_by(uid);
        let analysis_runs = snapshot.analysis_runs_owned_by(uid);

        let mut children = ReplicaSetProcessor::new(self.now).process(&replica_sets, snapshot);
        children.extend(AnalysisRunProcessor::new(self.now).process(&analysis_runs, snapshot));

        ResourceNode::new(Kind::Experiment, name_of(&exp.metadata))
            .with_status(StatusIcon::for_phase(phase), phase)
            .with_age(self.get_age(&exp.metadata))
            .with_children(children)
    }
}
