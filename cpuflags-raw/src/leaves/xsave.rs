//! Leaf 0xD: processor extended state enumeration
//!
//! Sub-leaf 0 EAX is the XCR0 mask of state components the processor can
//! manage, reported raw. Sub-leaf 1 EAX carries the XSAVE instruction
//! variants.

use crate::capability_table;

pub const LEAF: u32 = 0xD;

/// Sub-leaf reporting the supported XCR0 bits
pub const SUBLEAF_COMPONENTS: u32 = 0;

/// Sub-leaf reporting XSAVE instruction extensions
pub const SUBLEAF_EXTENSIONS: u32 = 1;

capability_table! {
    /// CPUID(0xD,1).EAX
    pub EXTENSIONS_EAX = [
        0 => ("XSAVEOPT",    "Optimized XSAVE",         "Skips unmodified state components on save."),
        1 => ("XSAVEC",      "Compacted XSAVE",         "Compact save area for smaller context switches."),
        2 => ("XGETBV_ECX1", "XGETBV with ECX=1",       "Query which state components are in use."),
        3 => ("XSAVES",      "Supervisor XSAVE",        "Saves supervisor state components (PT, CET)."),
        4 => ("XFD",         "Extended Feature Disable", "Lazy allocation of large state such as AMX tiles."),
    ];
}
