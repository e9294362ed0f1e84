use serde::Serialize;

use crate::error::Result;
use crate::report::{Report, ReportSection, SectionItem, SectionOutcome};

use super::Renderer;

/// Machine-readable report: one JSON object per section (JSON Lines)
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

#[derive(Serialize)]
struct SectionView<'a> {
    id: &'static str,
    title: &'static str,
    leaf: u32,
    supported: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    unsupported: Option<UnsupportedView>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    capabilities: Vec<CapabilityView<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    fields: Vec<FieldView>,
}

#[derive(Serialize)]
struct UnsupportedView {
    message: String,
    max_kind: &'static str,
    observed_max: u32,
}

#[derive(Serialize)]
struct CapabilityView<'a> {
    leaf: u32,
    subleaf: u32,
    register: &'static str,
    bit: u8,
    name: &'a str,
    description: &'a str,
    usage: &'a str,
    present: bool,
}

#[derive(Serialize)]
struct FieldView {
    leaf: u32,
    subleaf: u32,
    name: &'static str,
    value: u32,
}

impl JsonRenderer {
    pub fn new() -> Self {
        Self
    }

    fn view<'a>(section: &'a ReportSection<'_>) -> SectionView<'a> {
        let mut view = SectionView {
            id: section.id.name(),
            title: section.title,
            leaf: section.leaf,
            supported: section.is_supported(),
            unsupported: None,
            capabilities: Vec::new(),
            fields: Vec::new(),
        };

        match &section.outcome {
            SectionOutcome::Unsupported(placeholder) => {
                view.unsupported = Some(UnsupportedView {
                    message: placeholder.to_string(),
                    max_kind: placeholder.kind.label(),
                    observed_max: placeholder.observed_max,
                });
            }
            SectionOutcome::Decoded(items) => {
                for item in items {
                    match item {
                        SectionItem::Capabilities {
                            source, judgments, ..
                        } => {
                            view.capabilities
                                .extend(judgments.iter().map(|j| CapabilityView {
                                    leaf: source.leaf,
                                    subleaf: source.subleaf,
                                    register: source.register.name(),
                                    bit: j.entry.bit_index,
                                    name: j.entry.short_name,
                                    description: j.entry.long_name,
                                    usage: j.entry.usage_note,
                                    present: j.present,
                                }));
                        }
                        SectionItem::Summary {
                            leaf,
                            subleaf,
                            summary,
                        } => {
                            view.fields
                                .extend(summary.fields().into_iter().map(|(name, value)| {
                                    FieldView {
                                        leaf: *leaf,
                                        subleaf: *subleaf,
                                        name,
                                        value,
                                    }
                                }));
                        }
                        SectionItem::Heading(_) => {}
                    }
                }
            }
        }

        view
    }
}

impl Renderer for JsonRenderer {
    fn render(&self, report: &Report<'_>) -> Result<Vec<String>> {
        report
            .sections
            .iter()
            .map(|section| serde_json::to_string(&Self::view(section)).map_err(Into::into))
            .collect()
    }
}
