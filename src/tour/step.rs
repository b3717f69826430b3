use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StepId(pub String);

impl StepId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StepId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    Hotspot,
    WorkflowReveal,
    Finale,
}

impl StepKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Hotspot => "hotspot",
            Self::WorkflowReveal => "workflow",
            Self::Finale => "finale",
        }
    }
}

/// Where on the page a step lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TargetRef {
    /// A named page section.
    Section { id: String },
    /// A point on a diagram, in percent of the diagram's box.
    DiagramPoint { section: String, x: f32, y: f32 },
}

impl TargetRef {
    pub fn section(id: impl Into<String>) -> Self {
        Self::Section { id: id.into() }
    }

    pub fn diagram_point(section: impl Into<String>, x: f32, y: f32) -> Self {
        Self::DiagramPoint {
            section: section.into(),
            x,
            y,
        }
    }

    pub fn section_id(&self) -> &str {
        match self {
            Self::Section { id } => id,
            Self::DiagramPoint { section, .. } => section,
        }
    }
}

impl fmt::Display for TargetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Section { id } => write!(f, "#{id}"),
            Self::DiagramPoint { section, x, y } => write!(f, "#{section}@({x:.0}%,{y:.0}%)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StepContent {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl StepContent {
    /// Blank title and body; such a step has nothing to show.
    pub fn is_empty(&self) -> bool {
        self.title.trim().is_empty() && self.body.trim().is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TourStep {
    pub id: StepId,
    pub kind: StepKind,
    pub target: TargetRef,
    pub content: StepContent,
    pub base_dwell: Duration,
}

impl TourStep {
    pub fn is_finale(&self) -> bool {
        self.kind == StepKind::Finale
    }

    /// Catalog id the step was built from: `touchscreen` for `hotspot:touchscreen`.
    pub fn entry_id(&self) -> &str {
        let id = self.id.as_str();
        id.split_once(':').map_or(id, |(_, entry)| entry)
    }

    pub fn label(&self) -> &str {
        if self.content.title.trim().is_empty() {
            self.id.as_str()
        } else {
            &self.content.title
        }
    }
}
