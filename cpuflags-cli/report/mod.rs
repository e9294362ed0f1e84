// Report generation: gate each section, query, decode

pub mod layout;

use std::collections::BTreeMap;

use cpuflags_raw::{LeafQueryResult, Registry, SourceTriple};

use crate::common::cpuid::CpuidSource;
use crate::decode::{decode, Judgment};
use crate::error::Result;
use crate::gate::{Placeholder, SupportedLeafBounds};

pub use layout::{Block, ReportLayout, SectionId, SectionSpec, Summary, SummaryKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionItem<'r> {
    Capabilities {
        source: SourceTriple,
        value: u32,
        judgments: Vec<Judgment<'r>>,
    },
    Heading(&'static str),
    Summary {
        leaf: u32,
        subleaf: u32,
        summary: Summary,
    },
}

/// Either the full decoded section or the single placeholder line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionOutcome<'r> {
    Unsupported(Placeholder),
    Decoded(Vec<SectionItem<'r>>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportSection<'r> {
    pub id: SectionId,
    pub title: &'static str,
    pub leaf: u32,
    pub outcome: SectionOutcome<'r>,
}

impl ReportSection<'_> {
    pub fn is_supported(&self) -> bool {
        matches!(self.outcome, SectionOutcome::Decoded(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report<'r> {
    pub bounds: SupportedLeafBounds,
    pub sections: Vec<ReportSection<'r>>,
}

impl<'r> Report<'r> {
    pub fn section(&self, id: SectionId) -> Option<&ReportSection<'r>> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Every judgment in the report, in report order
    pub fn judgments(&self) -> impl Iterator<Item = &Judgment<'r>> {
        self.sections
            .iter()
            .filter_map(|s| match &s.outcome {
                SectionOutcome::Decoded(items) => Some(items),
                SectionOutcome::Unsupported(_) => None,
            })
            .flatten()
            .filter_map(|item| match item {
                SectionItem::Capabilities { judgments, .. } => Some(judgments),
                _ => None,
            })
            .flatten()
    }
}

/// Build every section of `layout`, in order
///
/// `bounds` must come from [`SupportedLeafBounds::discover`] on the same
/// source. A section whose leaf is out of bounds yields a placeholder and
/// issues no query at all; otherwise each (leaf, sub-leaf) it needs is
/// queried exactly once.
///
/// # Errors
///
/// Returns [`cpuflags_raw::RegistryError::UnknownSource`] when a
/// capabilities block names a register with no registered table.
pub fn generate_report<'r, S: CpuidSource>(
    registry: &'r Registry,
    source: &mut S,
    bounds: &SupportedLeafBounds,
    layout: &ReportLayout,
) -> Result<Report<'r>> {
    let mut sections = Vec::with_capacity(layout.sections().len());

    for spec in layout.sections() {
        let outcome = if bounds.supports(spec.leaf) {
            SectionOutcome::Decoded(generate_section(registry, source, spec)?)
        } else {
            let placeholder = Placeholder::new(spec.reason, spec.leaf, bounds);
            tracing::warn!("Skipping section {}: {}", spec.id, placeholder);
            SectionOutcome::Unsupported(placeholder)
        };

        sections.push(ReportSection {
            id: spec.id,
            title: spec.title,
            leaf: spec.leaf,
            outcome,
        });
    }

    Ok(Report {
        bounds: *bounds,
        sections,
    })
}

fn generate_section<'r, S: CpuidSource>(
    registry: &'r Registry,
    source: &mut S,
    spec: &SectionSpec,
) -> Result<Vec<SectionItem<'r>>> {
    let results: BTreeMap<u32, LeafQueryResult> = spec
        .subleaves()
        .into_iter()
        .map(|subleaf| (subleaf, source.query(spec.leaf, subleaf)))
        .collect();
    let result_for = |subleaf: &u32| results.get(subleaf).copied().unwrap_or_default();

    let mut items = Vec::new();
    for block in &spec.blocks {
        match block {
            Block::Capabilities { subleaf, registers } => {
                let result = result_for(subleaf);
                for &register in registers.iter() {
                    let triple = SourceTriple::new(spec.leaf, *subleaf, register);
                    let table = registry.lookup(&triple)?;
                    let value = result.register(register);
                    let unlisted = value & !table.known_mask();
                    if unlisted != 0 {
                        tracing::debug!("{} has unlisted bits set: {:#010x}", triple, unlisted);
                    }
                    items.push(SectionItem::Capabilities {
                        source: triple,
                        value,
                        judgments: decode(table, value).collect(),
                    });
                }
            }
            Block::Heading(title) => items.push(SectionItem::Heading(title)),
            Block::Summary { subleaf, kind } => {
                let result = result_for(subleaf);
                items.push(SectionItem::Summary {
                    leaf: spec.leaf,
                    subleaf: *subleaf,
                    summary: kind.extract(&result),
                });
            }
        }
    }

    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::cpuid::StaticCpuid;
    use crate::error::CpuflagsError;
    use cpuflags_raw::{CpuidRegister, RegistryError};

    fn registry() -> &'static Registry {
        Registry::builtin().unwrap()
    }

    fn run<'r>(
        registry: &'r Registry,
        source: &mut StaticCpuid,
        layout: &ReportLayout,
    ) -> Report<'r> {
        let bounds = SupportedLeafBounds::discover(source);
        source.clear_issued();
        generate_report(registry, source, &bounds, layout).unwrap()
    }

    #[test]
    fn test_leaf7_unsupported_issues_no_queries() {
        let mut source = StaticCpuid::new().with_bounds(6, 0x8000_0008);
        let layout = ReportLayout::only(&[SectionId::Structured]);

        let report = run(registry(), &mut source, &layout);

        let section = report.section(SectionId::Structured).unwrap();
        match &section.outcome {
            SectionOutcome::Unsupported(p) => {
                assert_eq!(p.to_string(), "CPUID(7,0) not supported (max leaf = 6)");
            }
            other => panic!("expected placeholder, got {other:?}"),
        }
        assert!(!source.was_queried(7));
        assert!(source.issued().is_empty());
    }

    #[test]
    fn test_leaf7_supported_is_decoded() {
        let mut source = StaticCpuid::new()
            .with_bounds(7, 0x8000_0008)
            .with(7, 0, LeafQueryResult::new(0, 1 << 5, 0, 0))
            .with(7, 1, LeafQueryResult::new(0, 0xAA, 0xBB, 0xCC));
        let layout = ReportLayout::only(&[SectionId::Structured]);

        let report = run(registry(), &mut source, &layout);

        let section = report.section(SectionId::Structured).unwrap();
        let SectionOutcome::Decoded(items) = &section.outcome else {
            panic!("expected decoded section");
        };
        // EBX, ECX, EDX tables, the 7/1 heading and the 7/1 raw values
        assert_eq!(items.len(), 5);
        assert_eq!(source.issued(), &[(7, 0), (7, 1)]);

        let avx2 = report
            .judgments()
            .find(|j| j.entry.short_name == "AVX2")
            .unwrap();
        assert!(avx2.present);
        assert_eq!(
            items[4],
            SectionItem::Summary {
                leaf: 7,
                subleaf: 1,
                summary: Summary::RawRegisters {
                    ebx: 0xAA,
                    ecx: 0xBB,
                    edx: 0xCC
                },
            }
        );
    }

    #[test]
    fn test_extended_gate_uses_extended_max() {
        let mut source = StaticCpuid::new().with_bounds(0x20, 0x8000_0004);
        let layout = ReportLayout::only(&[SectionId::Extended, SectionId::AddressSize]);

        let report = run(registry(), &mut source, &layout);

        assert!(report.section(SectionId::Extended).unwrap().is_supported());
        let address = report.section(SectionId::AddressSize).unwrap();
        assert_eq!(
            address.outcome,
            SectionOutcome::Unsupported(Placeholder {
                reason: "CPUID(0x80000008)".to_string(),
                kind: crate::gate::LeafKind::Extended,
                observed_max: 0x8000_0004,
            })
        );
        assert!(!source.was_queried(0x8000_0008));
    }

    #[test]
    fn test_each_subleaf_queried_once() {
        let mut source = StaticCpuid::new().with_bounds(0x14, 0);
        let layout = ReportLayout::only(&[SectionId::Trace]);

        run(registry(), &mut source, &layout);

        assert_eq!(source.issued(), &[(0x14, 0)]);
    }

    #[test]
    fn test_full_report_section_order() {
        let mut source = StaticCpuid::new().with_bounds(0x1F, 0x8000_0008);
        let report = run(registry(), &mut source, ReportLayout::standard());

        let ids: Vec<_> = report.sections.iter().map(|s| s.id).collect();
        assert_eq!(ids, SectionId::all());
        assert!(report.sections.iter().all(|s| s.is_supported()));
        assert_eq!(report.judgments().count(), registry().capability_count());
    }

    #[test]
    fn test_unknown_source_propagates() {
        let layout = ReportLayout::new(vec![SectionSpec {
            id: SectionId::Basic,
            title: "CPUID(1) Basic Features",
            leaf: 1,
            reason: "CPUID(1)",
            blocks: vec![Block::Capabilities {
                subleaf: 0,
                registers: &[CpuidRegister::Eax],
            }],
        }]);
        let mut source = StaticCpuid::new().with_bounds(1, 0);
        let bounds = SupportedLeafBounds::discover(&mut source);

        let err = generate_report(registry(), &mut source, &bounds, &layout).unwrap_err();
        assert!(matches!(
            err,
            CpuflagsError::RegistryError(RegistryError::UnknownSource(triple))
                if triple == SourceTriple::new(1, 0, CpuidRegister::Eax)
        ));
    }
}
