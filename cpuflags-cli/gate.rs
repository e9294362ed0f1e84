// Leaf-availability gating
//
// CPUID answers garbage (often a copy of the highest basic leaf) for leaves
// beyond the processor's maximum, so every section checks its leaf against
// the bounds discovered from leaves 0x0 and 0x8000_0000 first.

use std::fmt;

use cpuflags_raw::leaves::basic;
use cpuflags_raw::EXTENDED_BASE;

use crate::common::cpuid::CpuidSource;

/// Which numbering space a leaf belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeafKind {
    Basic,
    Extended,
}

impl LeafKind {
    pub fn of(leaf: u32) -> Self {
        if leaf >= EXTENDED_BASE {
            LeafKind::Extended
        } else {
            LeafKind::Basic
        }
    }

    /// Label used in placeholder lines
    pub fn label(&self) -> &'static str {
        match self {
            LeafKind::Basic => "leaf",
            LeafKind::Extended => "ext",
        }
    }

    /// Format a leaf number the way placeholders show it for this kind
    pub fn format_leaf(&self, leaf: u32) -> String {
        match self {
            LeafKind::Basic => leaf.to_string(),
            LeafKind::Extended => format!("0x{leaf:X}"),
        }
    }
}

/// Highest basic and extended leaves the running processor implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedLeafBounds {
    pub max_basic: u32,
    pub max_extended: u32,
}

impl SupportedLeafBounds {
    pub fn new(max_basic: u32, max_extended: u32) -> Self {
        Self {
            max_basic,
            max_extended,
        }
    }

    /// Issue the two discovery queries; must precede any gated query
    pub fn discover<S: CpuidSource>(source: &mut S) -> Self {
        let max_basic = source.query(basic::LEAF_VENDOR, 0).eax;
        let max_extended = source.query(EXTENDED_BASE, 0).eax;

        let bounds = Self::new(max_basic, max_extended);
        tracing::info!(
            "Supported leaves: basic <= 0x{:X}, extended <= 0x{:X}",
            bounds.max_basic,
            bounds.max_extended
        );
        bounds
    }

    /// Maximum leaf for the numbering space `kind`
    pub fn max_for(&self, kind: LeafKind) -> u32 {
        match kind {
            LeafKind::Basic => self.max_basic,
            LeafKind::Extended => self.max_extended,
        }
    }

    pub fn supports(&self, leaf: u32) -> bool {
        leaf <= self.max_for(LeafKind::of(leaf))
    }
}

/// Report line standing in for a section whose leaf is unsupported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub reason: String,
    pub kind: LeafKind,
    pub observed_max: u32,
}

impl Placeholder {
    pub fn new(reason: impl Into<String>, leaf: u32, bounds: &SupportedLeafBounds) -> Self {
        let kind = LeafKind::of(leaf);
        Self {
            reason: reason.into(),
            kind,
            observed_max: bounds.max_for(kind),
        }
    }
}

impl fmt::Display for Placeholder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} not supported (max {} = {})",
            self.reason,
            self.kind.label(),
            self.kind.format_leaf(self.observed_max)
        )
    }
}
