//! Built-in CPUID capability tables, one module per leaf
//!
//! ## Leaves
//!
//! - [`basic`] - leaf 0x0 vendor, leaf 0x1 version and feature flags
//! - [`structured`] - leaf 0x7 structured extended features
//! - [`xsave`] - leaf 0xD extended state enumeration
//! - [`trace`] - leaf 0x14 Intel Processor Trace
//! - [`extended`] - leaves 0x8000_0001 and 0x8000_0008

pub mod basic;
pub mod extended;
pub mod structured;
pub mod trace;
pub mod xsave;

use crate::register::{CpuidRegister, SourceTriple};
use crate::table::EntryDef;

pub use extended::EXTENDED_BASE;

/// Every built-in table with the triple it is read from
pub const BUILTIN_TABLES: &[(SourceTriple, &[EntryDef])] = &[
    (
        SourceTriple::new(basic::LEAF_FEATURES, 0, CpuidRegister::Edx),
        basic::FEATURES_EDX,
    ),
    (
        SourceTriple::new(basic::LEAF_FEATURES, 0, CpuidRegister::Ecx),
        basic::FEATURES_ECX,
    ),
    (
        SourceTriple::new(structured::LEAF, structured::SUBLEAF_FEATURES, CpuidRegister::Ebx),
        structured::FEATURES_EBX,
    ),
    (
        SourceTriple::new(structured::LEAF, structured::SUBLEAF_FEATURES, CpuidRegister::Ecx),
        structured::FEATURES_ECX,
    ),
    (
        SourceTriple::new(structured::LEAF, structured::SUBLEAF_FEATURES, CpuidRegister::Edx),
        structured::FEATURES_EDX,
    ),
    (
        SourceTriple::new(xsave::LEAF, xsave::SUBLEAF_EXTENSIONS, CpuidRegister::Eax),
        xsave::EXTENSIONS_EAX,
    ),
    (
        SourceTriple::new(trace::LEAF, trace::SUBLEAF_MAIN, CpuidRegister::Ebx),
        trace::CAPABILITIES_EBX,
    ),
    (
        SourceTriple::new(extended::LEAF_FEATURES, 0, CpuidRegister::Ecx),
        extended::FEATURES_ECX,
    ),
    (
        SourceTriple::new(extended::LEAF_FEATURES, 0, CpuidRegister::Edx),
        extended::FEATURES_EDX,
    ),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_names_unique_per_table() {
        for (source, defs) in BUILTIN_TABLES {
            let mut names: Vec<_> = defs.iter().map(|d| d.short).collect();
            names.sort_unstable();
            let before = names.len();
            names.dedup();
            assert_eq!(before, names.len(), "duplicate short name in {source}");
        }
    }
}
