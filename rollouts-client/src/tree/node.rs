//! Resource hierarchy handed to the renderer.

pub const INFO_TAG_CANARY: &str = "canary";
pub const INFO_TAG_STABLE: &str = "stable";
pub const INFO_TAG_ACTIVE: &str = "active";
pub const INFO_TAG_PREVIEW: &str = "preview";
pub const INFO_TAG_PING: &str = "ping";
pub const INFO_TAG_PONG: &str = "pong";

/// Kind of a node in the tree. Each kind is drawn with a fixed icon in
/// front of the node name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Rollout,
    Revision,
    ReplicaSet,
    Pod,
    Job,
    Service,
    Experiment,
    AnalysisRun,
}

impl Kind {
    pub fn icon(self) -> &'static str {
        match self {
            Kind::Rollout => "⟳",
            Kind::Revision => "#",
            Kind::ReplicaSet => "⧉",
            Kind::Pod => "□",
            Kind::Job => "⊞",
            Kind::Service => "⑃",
            Kind::Experiment => "Σ",
            Kind::AnalysisRun => "α",
        }
    }

    /// Text for the KIND column. Revisions are grouping rows and leave it empty.
    pub fn label(self) -> &'static str {
        match self {
            Kind::Rollout => "Rollout",
            Kind::Revision => "",
            Kind::ReplicaSet => "ReplicaSet",
            Kind::Pod => "Pod",
            Kind::Job => "Job",
            Kind::Service => "Service",
            Kind::Experiment => "Experiment",
            Kind::AnalysisRun => "AnalysisRun",
        }
    }
}

/// Health icon shown in the STATUS column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusIcon {
    Waiting,
    Progressing,
    Warning,
    Unknown,
    Ok,
    Bad,
    Paused,
    Neutral,
}

impl StatusIcon {
    pub fn glyph(self) -> &'static str {
        match self {
            StatusIcon::Waiting => "◷",
            StatusIcon::Progressing => "◌",
            StatusIcon::Warning => "⚠",
            StatusIcon::Unknown => "?",
            StatusIcon::Ok => "✔",
            StatusIcon::Bad => "✖",
            StatusIcon::Paused => "॥",
            StatusIcon::Neutral => "•",
        }
    }

    /// Icon for a controller reported phase (rollouts, experiments, analysis runs).
    pub fn for_phase(phase: &str) -> Self {
        match phase {
            "Healthy" | "Successful" | "Completed" => StatusIcon::Ok,
            "Progressing" | "Running" => StatusIcon::Progressing,
            "Pending" => StatusIcon::Waiting,
            "Paused" => StatusIcon::Paused,
            "Degraded" | "Failed" | "Error" => StatusIcon::Bad,
            "Inconclusive" => StatusIcon::Warning,
            "ScaledDown" => StatusIcon::Neutral,
            _ => StatusIcon::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeStatus {
    pub icon: StatusIcon,
    /// Display text, also used as the color token for the text itself.
    pub text: String,
}

/// One entity in the rendered hierarchy.
///
/// Children are rendered in the order they are stored; the last child
/// gets the closing branch glyph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceNode {
    pub name: String,
    pub kind: Kind,
    pub status: Option<NodeStatus>,
    pub age: String,
    pub info: Vec<String>,
    pub children: Vec<ResourceNode>,
}

impl ResourceNode {
    pub fn new(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            status: None,
            age: String::new(),
            info: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_status(mut self, icon: StatusIcon, text: impl Into<String>) -> Self {
        self.status = Some(NodeStatus {
            icon,
            text: text.into(),
        });
        self
    }

    pub fn with_age(mut self, age: impl Into<String>) -> Self {
        self.age = age.into();
        self
    }

    pub fn with_info(mut self, tag: impl Into<String>) -> Self {
        self.info.push(tag.into());
        self
    }

    pub fn with_children(mut self, children: Vec<ResourceNode>) -> Self {
        self.children = children;
        self
    }

    /// Number of nodes in this subtree, the node itself included.
    pub fn len(&self) -> usize {
        1 + self.children.iter().map(ResourceNode::len).sum::<usize>()
    }
}
