use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

pub const SCANNER_SECTION: &str = "scanner";
pub const WORKFLOW_SECTION: &str = "workflow";
pub const ADVANTAGES_SECTION: &str = "advantages";

/// A point of interest on the scanner diagram.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HotspotEntry {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub x: f32,
    pub y: f32,
}

/// One stage of the specimen workflow.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkflowEntry {
    pub id: String,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub detail: String,
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FinaleEntry {
    pub title: String,
    #[serde(default)]
    pub highlights: Vec<String>,
}

/// Page content the tour walks through.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Catalog {
    /// Product name shown at the top of the page.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub hotspots: Vec<HotspotEntry>,
    #[serde(default)]
    pub workflow: Vec<WorkflowEntry>,
    pub finale: FinaleEntry,
}

impl Catalog {
    pub fn load_from_path(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| {
            AppError::io_with_context(
                source,
                format!("failed to read catalog: {}", path.display()),
            )
        })?;
        let catalog = toml::from_str::<Self>(&raw).map_err(|source| {
            AppError::invalid_catalog(format!("{}: {source}", path.display()))
        })?;
        catalog.validate()?;
        Ok(catalog)
    }

    fn validate(&self) -> AppResult<()> {
        if self.workflow.is_empty() {
            return Err(AppError::invalid_catalog(
                "catalog needs at least one workflow stage",
            ));
        }
        for hotspot in &self.hotspots {
            if !(0.0..=100.0).contains(&hotspot.x) || !(0.0..=100.0).contains(&hotspot.y) {
                return Err(AppError::invalid_catalog(format!(
                    "hotspot {} lies outside the diagram",
                    hotspot.id
                )));
            }
        }
        Ok(())
    }

    /// The Histolog scanner page.
    pub fn builtin() -> Self {
        Self {
            title: "Histolog® Scanner".to_string(),
            hotspots: vec![
                HotspotEntry {
                    id: "touchscreen".to_string(),
                    name: "Touchscreen Interface".to_string(),
                    description: "The intuitive touchscreen allows clinicians to instantly \
                                  access special features such as reporting & annotation \
                                  tools during surgery."
                        .to_string(),
                    features: strings(&[
                        "High-resolution display",
                        "User-friendly interface",
                        "Instant access to imaging controls",
                        "Annotation and reporting tools",
                    ]),
                    x: 55.0,
                    y: 25.0,
                },
                HotspotEntry {
                    id: "imaging-window".to_string(),
                    name: "Imaging Window".to_string(),
                    description: "Large 17cm² imaging window enables comprehensive specimen \
                                  assessment with a single scan."
                        .to_string(),
                    features: strings(&[
                        "17cm² large field of view",
                        "High-resolution imaging",
                        "Non-destructive scanning",
                        "Compatible with fresh tissue",
                    ]),
                    x: 51.0,
                    y: 39.0,
                },
                HotspotEntry {
                    id: "optical-system".to_string(),
                    name: "Optical System".to_string(),
                    description: "Ultra-fast confocal microscopy technology provides \
                                  real-time morphology information during surgery."
                        .to_string(),
                    features: strings(&[
                        "Confocal laser scanning microscopy",
                        "Large field-of-view (4.8cm x 3.6cm)",
                        "50s imaging time per surface",
                        "Digital images for remote assessment",
                    ]),
                    x: 48.0,
                    y: 40.0,
                },
            ],
            workflow: vec![
                WorkflowEntry {
                    id: "excision".to_string(),
                    title: "Excision".to_string(),
                    description: "Excise the tumor from the patient.".to_string(),
                    detail: "Surgical removal of the tumor tissue following standard breast \
                             conserving surgery protocols."
                        .to_string(),
                    time: String::new(),
                    tags: strings(&["Standard BCS Protocol"]),
                },
                WorkflowEntry {
                    id: "preparation".to_string(),
                    title: "Preparation".to_string(),
                    description: "Immerse in Histolog Dip and rinse in saline solution."
                        .to_string(),
                    detail: "Quick 10-second specimen preparation using Histolog Dip \
                             fluorescent stain followed by saline rinse."
                        .to_string(),
                    time: "10 sec".to_string(),
                    tags: strings(&["Non-destructive", "Compatible with downstream testing"]),
                },
                WorkflowEntry {
                    id: "imaging".to_string(),
                    title: "Imaging".to_string(),
                    description: "Map the whole specimen surface in minutes.".to_string(),
                    detail: "Ultra-fast confocal microscopy captures high-resolution images \
                             of the entire specimen surface with 4.8cm × 3.6cm field of view."
                        .to_string(),
                    time: "~50 sec".to_string(),
                    tags: strings(&["17cm² imaging window", "High resolution"]),
                },
                WorkflowEntry {
                    id: "evaluation".to_string(),
                    title: "Evaluation".to_string(),
                    description: "Assess images on the device or remotely while preserving \
                                  the specimen."
                        .to_string(),
                    detail: "Real-time morphology analysis enables immediate decision-making \
                             while preserving tissue integrity for downstream testing."
                        .to_string(),
                    time: "Real-time".to_string(),
                    tags: strings(&["DICOM compatible", "Remote consultation"]),
                },
            ],
            finale: FinaleEntry {
                title: "Histolog® Scanner Advantages".to_string(),
                highlights: strings(&[
                    "Cost-Efficient Technique",
                    "Plug-and-Play Operation",
                    "Dedicated Implementation Support",
                    "Rapid Turnaround",
                    "Digital Pathology Integration",
                    "Non-Destructive Testing",
                ]),
            },
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

fn default_title() -> String {
    "Product tour".to_string()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| (*item).to_string()).collect()
}
