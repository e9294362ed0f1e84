// Which leaves the report covers, in what order, under which titles

use once_cell::sync::Lazy;

use cpuflags_raw::leaves::extended::AddressSizes;
use cpuflags_raw::leaves::{basic, extended, structured, trace, xsave};
use cpuflags_raw::{CpuidRegister, LeafQueryResult, RegisterLayout};

use crate::named_enum;

named_enum! {
    pub enum SectionId {
        Basic => "basic",
        Structured => "structured",
        Extended => "extended",
        AddressSize => "address-size",
        Xsave => "xsave",
        Trace => "trace",
    }
}

/// Multi-bit values reported verbatim instead of as capability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryKind {
    /// EBX/ECX/EDX as hex words
    RawRegisters,
    /// Leaf 0x8000_0008 EAX address widths
    AddressSizes,
    /// Leaf 0xD sub-leaf 0 EAX, the XCR0 bits the processor supports
    XsaveComponents,
    /// Leaf 0x14 sub-leaf 0 EAX
    TraceCapabilities,
}

/// Values extracted by a [`SummaryKind`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Summary {
    RawRegisters { ebx: u32, ecx: u32, edx: u32 },
    AddressSizes(AddressSizes),
    XsaveComponents(u32),
    TraceCapabilities(u32),
}

impl SummaryKind {
    /// Pull this summary out of `result`; implausible values are logged, not dropped
    pub fn extract(&self, result: &LeafQueryResult) -> Summary {
        let summary = match self {
            SummaryKind::RawRegisters => Summary::RawRegisters {
                ebx: result.ebx,
                ecx: result.ecx,
                edx: result.edx,
            },
            SummaryKind::AddressSizes => {
                Summary::AddressSizes(AddressSizes::from_register_value(result.eax))
            }
            SummaryKind::XsaveComponents => Summary::XsaveComponents(result.eax),
            SummaryKind::TraceCapabilities => Summary::TraceCapabilities(result.eax),
        };
        if let Err(reason) = summary.validate() {
            tracing::warn!("Implausible {:?} summary {:?}: {}", self, summary, reason);
        }
        summary
    }
}

impl Summary {
    /// Check multi-bit fields against their architectural limits
    pub fn validate(&self) -> Result<(), &'static str> {
        match self {
            Summary::AddressSizes(sizes) => sizes.validate(),
            _ => Ok(()),
        }
    }

    /// Named numeric fields, for machine-readable output
    pub fn fields(&self) -> Vec<(&'static str, u32)> {
        match *self {
            Summary::RawRegisters { ebx, ecx, edx } => vec![("ebx", ebx), ("ecx", ecx), ("edx", edx)],
            Summary::AddressSizes(sizes) => vec![
                ("physical_address_bits", sizes.physical_bits as u32),
                ("linear_address_bits", sizes.linear_bits as u32),
            ],
            Summary::XsaveComponents(eax) => vec![("xcr0_supported_bits", eax)],
            Summary::TraceCapabilities(eax) => vec![("pt_capabilities_eax", eax)],
        }
    }
}

/// One unit of work inside a section; all blocks share the section's leaf
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Decode each register of `(leaf, subleaf)` against its registry table
    Capabilities {
        subleaf: u32,
        registers: &'static [CpuidRegister],
    },
    /// Nested sub-header
    Heading(&'static str),
    Summary { subleaf: u32, kind: SummaryKind },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSpec {
    pub id: SectionId,
    pub title: &'static str,
    /// Leaf every block of this section queries; also the gate
    pub leaf: u32,
    /// Prefix of the placeholder line when `leaf` is unsupported
    pub reason: &'static str,
    pub blocks: Vec<Block>,
}

impl SectionSpec {
    /// Distinct sub-leaves this section queries, in first-use order
    pub fn subleaves(&self) -> Vec<u32> {
        let mut subleaves = Vec::new();
        for block in &self.blocks {
            let subleaf = match block {
                Block::Capabilities { subleaf, .. } | Block::Summary { subleaf, .. } => *subleaf,
                Block::Heading(_) => continue,
            };
            if !subleaves.contains(&subleaf) {
                subleaves.push(subleaf);
            }
        }
        subleaves
    }
}

/// Ordered list of report sections
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLayout {
    sections: Vec<SectionSpec>,
}

static STANDARD: Lazy<ReportLayout> = Lazy::new(|| ReportLayout {
    sections: vec![
        SectionSpec {
            id: SectionId::Basic,
            title: "CPUID(1) Basic Features",
            leaf: basic::LEAF_FEATURES,
            reason: "CPUID(1)",
            blocks: vec![Block::Capabilities {
                subleaf: 0,
                registers: &[CpuidRegister::Edx, CpuidRegister::Ecx],
            }],
        },
        SectionSpec {
            id: SectionId::Structured,
            title: "CPUID(7,0) Extended Features",
            leaf: structured::LEAF,
            reason: "CPUID(7,0)",
            blocks: vec![
                Block::Capabilities {
                    subleaf: structured::SUBLEAF_FEATURES,
                    registers: &[CpuidRegister::Ebx, CpuidRegister::Ecx, CpuidRegister::Edx],
                },
                Block::Heading("CPUID(7,1) Sub-leaf 1 Raw Values"),
                Block::Summary {
                    subleaf: structured::SUBLEAF_EXTRA,
                    kind: SummaryKind::RawRegisters,
                },
            ],
        },
        SectionSpec {
            id: SectionId::Extended,
            title: "CPUID(0x80000001) AMD Extended",
            leaf: extended::LEAF_FEATURES,
            reason: "CPUID(0x80000001)",
            blocks: vec![Block::Capabilities {
                subleaf: 0,
                registers: &[CpuidRegister::Ecx, CpuidRegister::Edx],
            }],
        },
        SectionSpec {
            id: SectionId::AddressSize,
            title: "CPUID(0x80000008) Address Size Info",
            leaf: extended::LEAF_ADDRESS_SIZES,
            reason: "CPUID(0x80000008)",
            blocks: vec![Block::Summary {
                subleaf: 0,
                kind: SummaryKind::AddressSizes,
            }],
        },
        SectionSpec {
            id: SectionId::Xsave,
            title: "CPUID(0xD,0) XSAVE Info",
            leaf: xsave::LEAF,
            reason: "CPUID(0xD,0)",
            blocks: vec![
                Block::Summary {
                    subleaf: xsave::SUBLEAF_COMPONENTS,
                    kind: SummaryKind::XsaveComponents,
                },
                Block::Capabilities {
                    subleaf: xsave::SUBLEAF_EXTENSIONS,
                    registers: &[CpuidRegister::Eax],
                },
            ],
        },
        SectionSpec {
            id: SectionId::Trace,
            title: "CPUID(0x14,0) Processor Trace Info",
            leaf: trace::LEAF,
            reason: "CPUID(0x14,0)",
            blocks: vec![
                Block::Summary {
                    subleaf: trace::SUBLEAF_MAIN,
                    kind: SummaryKind::TraceCapabilities,
                },
                Block::Capabilities {
                    subleaf: trace::SUBLEAF_MAIN,
                    registers: &[CpuidRegister::Ebx],
                },
            ],
        },
    ],
});

impl ReportLayout {
    pub fn new(sections: Vec<SectionSpec>) -> Self {
        Self { sections }
    }

    /// Every section, in report order
    pub fn standard() -> &'static ReportLayout {
        &STANDARD
    }

    /// The standard layout restricted to `ids`; order stays the standard one
    pub fn only(ids: &[SectionId]) -> ReportLayout {
        if ids.is_empty() {
            return STANDARD.clone();
        }
        ReportLayout {
            sections: STANDARD
                .sections
                .iter()
                .filter(|s| ids.contains(&s.id))
                .cloned()
                .collect(),
        }
    }

    pub fn sections(&self) -> &[SectionSpec] {
        &self.sections
    }

    pub fn section(&self, id: SectionId) -> Option<&SectionSpec> {
        self.sections.iter().find(|s| s.id == id)
    }
}
