use std::time::Duration;

use crate::config::TourConfig;

use super::catalog::{ADVANTAGES_SECTION, Catalog, SCANNER_SECTION, WORKFLOW_SECTION};
use super::step::{StepContent, StepId, StepKind, TargetRef, TourStep};

/// Ordered, read-only list of tour steps: hotspots, then workflow stages, then the finale.
#[derive(Debug, Clone)]
pub struct StepRegistry {
    steps: Vec<TourStep>,
    hotspot_count: usize,
    workflow_count: usize,
}

impl StepRegistry {
    pub fn build(catalog: &Catalog, config: &TourConfig) -> Self {
        let hotspots: Vec<TourStep> = catalog
            .hotspots
            .iter()
            .take(config.max_hotspot_steps)
            .map(|entry| TourStep {
                id: StepId::new(format!("hotspot:{}", entry.id)),
                kind: StepKind::Hotspot,
                target: TargetRef::diagram_point(SCANNER_SECTION, entry.x, entry.y),
                content: StepContent {
                    title: entry.name.clone(),
                    body: entry.description.clone(),
                    tags: entry.features.clone(),
                },
                base_dwell: config.hotspot_dwell(),
            })
            .collect();

        let workflow: Vec<TourStep> = catalog
            .workflow
            .iter()
            .map(|entry| TourStep {
                id: StepId::new(format!("workflow:{}", entry.id)),
                kind: StepKind::WorkflowReveal,
                target: TargetRef::section(WORKFLOW_SECTION),
                content: StepContent {
                    title: entry.title.clone(),
                    body: join_body(&entry.description, &entry.detail),
                    tags: entry.tags.clone(),
                },
                base_dwell: Duration::from_millis(config.workflow_base_dwell_ms),
            })
            .collect();

        let finale = TourStep {
            id: StepId::new("finale"),
            kind: StepKind::Finale,
            target: TargetRef::section(ADVANTAGES_SECTION),
            content: StepContent {
                title: catalog.finale.title.clone(),
                body: String::new(),
                tags: catalog.finale.highlights.clone(),
            },
            base_dwell: Duration::ZERO,
        };

        let hotspot_count = hotspots.len();
        let workflow_count = workflow.len();
        let mut steps = hotspots;
        steps.extend(workflow);
        steps.push(finale);

        Self {
            steps,
            hotspot_count,
            workflow_count,
        }
    }

    pub fn get(&self, index: usize) -> Option<&TourStep> {
        self.steps.get(index)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn steps(&self) -> &[TourStep] {
        &self.steps
    }

    pub fn hotspot_count(&self) -> usize {
        self.hotspot_count
    }

    pub fn workflow_count(&self) -> usize {
        self.workflow_count
    }

    /// Index of the finale marker, always the last entry.
    pub fn finale_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    pub fn finale(&self) -> Option<&TourStep> {
        self.steps.last().filter(|step| step.is_finale())
    }

    /// True for the workflow step that hands over to the finale instead of a gap.
    pub fn is_terminal_workflow(&self, index: usize) -> bool {
        self.workflow_count > 0 && index + 1 == self.finale_index()
    }
}

fn join_body(description: &str, detail: &str) -> String {
    match (description.trim(), detail.trim()) {
        ("", detail) => detail.to_string(),
        (description, "") => description.to_string(),
        (description, detail) => format!("{description} {detail}"),
    }
}

#[cfg(test)]
mod tests {
    use crate::config::TourConfig;
    use crate::tour::catalog::Catalog;
    use crate::tour::step::StepKind;

    use super::StepRegistry;

    #[test]
    fn registry_orders_hotspots_workflow_then_finale() {
        let registry = StepRegistry::build(&Catalog::builtin(), &TourConfig::default());
        let kinds: Vec<StepKind> = registry.steps().iter().map(|step| step.kind).collect();
        assert_eq!(
            kinds,
            [
                StepKind::Hotspot,
                StepKind::Hotspot,
                StepKind::Hotspot,
                StepKind::WorkflowReveal,
                StepKind::WorkflowReveal,
                StepKind::WorkflowReveal,
                StepKind::WorkflowReveal,
                StepKind::Finale,
            ]
        );
        assert_eq!(registry.finale_index(), 7);
        assert!(registry.is_terminal_workflow(6));
        assert!(!registry.is_terminal_workflow(5));
        assert_eq!(registry.finale().map(|f| f.content.tags.len()), Some(6));
    }

    #[test]
    fn registry_caps_hotspot_steps() {
        let mut catalog = Catalog::builtin();
        let extra = catalog.hotspots[0].clone();
        catalog.hotspots.push(extra.clone());
        catalog.hotspots.push(extra);

        let registry = StepRegistry::build(&catalog, &TourConfig::default());
        assert_eq!(registry.hotspot_count(), 3);

        let config = TourConfig {
            max_hotspot_steps: 1,
            ..TourConfig::default()
        };
        let registry = StepRegistry::build(&catalog, &config);
        assert_eq!(registry.hotspot_count(), 1);
        assert_eq!(registry.len(), 1 + 4 + 1);
    }

    #[test]
    fn workflow_body_joins_description_and_detail() {
        let registry = StepRegistry::build(&Catalog::builtin(), &TourConfig::default());
        let excision = registry.get(3).expect("first workflow step");
        assert!(excision.content.body.starts_with("Excise the tumor"));
        assert!(excision.content.body.ends_with("protocols."));
        assert_eq!(excision.content.tags, ["Standard BCS Protocol"]);
    }
}
