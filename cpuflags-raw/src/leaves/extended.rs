//! Extended leaves (0x8000_0000 and up)
//!
//! The extended range is numbered from [`EXTENDED_BASE`]; leaf
//! `0x8000_0000` reports the highest extended leaf in EAX.
//!
//! ## References
//!
//! - AMD64 Architecture Programmer's Manual, Volume 3, Appendix E
//! - Intel® 64 and IA-32 Architectures Software Developer's Manual, Volume 2A

use crate::capability_table;
use crate::register::RegisterLayout;

/// First leaf of the extended range
pub const EXTENDED_BASE: u32 = 0x8000_0000;

/// Extended feature flags
pub const LEAF_FEATURES: u32 = 0x8000_0001;

/// Physical and linear address sizes
pub const LEAF_ADDRESS_SIZES: u32 = 0x8000_0008;

capability_table! {
    /// CPUID(0x80000001).ECX
    pub FEATURES_ECX = [
        0  => ("LAHF_LM",   "LAHF/SAHF in Long Mode",   "Flag load/store used by some 64-bit JITs and emulators."),
        5  => ("LZCNT",     "Leading Zero Count",       "Counts leading zeros for bit scanning in compression/crypto."),
        6  => ("SSE4a",     "SSE4a Instructions (AMD)", "AMD-specific SIMD instructions with unique shuffle ops."),
        8  => ("PREFETCHW", "Prefetch Write Hint",      "Prefetch data into cache for write-heavy workloads."),
        11 => ("XOP",       "Extended Operations (AMD)", "AMD three-operand SIMD extensions."),
        16 => ("FMA4",      "4-Operand FMA (AMD)",      "Non-destructive fused multiply-add."),
        21 => ("TBM",       "Trailing Bit Manipulation", "Advanced bitfield ops for crypto and data structures."),
    ];

    /// CPUID(0x80000001).EDX
    pub FEATURES_EDX = [
        11 => ("SYSCALL",  "SYSCALL/SYSRET",            "Fast 64-bit system call entry."),
        20 => ("NX",       "No-Execute Page Protection", "Marks data pages non-executable."),
        26 => ("PDPE1GB",  "1GB Pages",                 "Gigabyte pages for huge mappings and hypervisors."),
        27 => ("RDTSCP",   "RDTSCP Instruction",        "Timestamp read with processor ID, ordered after prior loads."),
        29 => ("LM",       "Long Mode (64-bit)",        "Enables 64-bit mode, required for modern OS and apps."),
        30 => ("3DNOWEXT", "3DNow! Extensions",         "Legacy AMD SIMD, mostly obsolete but present on older CPUs."),
        31 => ("3DNOW",    "3DNow! Instructions",       "Legacy AMD packed-float SIMD."),
    ];
}

/// Leaf 0x8000_0008 EAX address widths
///
/// ## Register Format
///
/// | Bits   | Field         | Description                    |
/// |--------|---------------|--------------------------------|
/// | 0-7    | physical_bits | Physical address width in bits |
/// | 8-15   | linear_bits   | Linear address width in bits   |
/// | 16-31  | reserved      |                                |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddressSizes {
    pub physical_bits: u8,
    pub linear_bits: u8,
}

impl RegisterLayout for AddressSizes {
    fn from_register_value(value: u32) -> Self {
        Self {
            physical_bits: (value & 0xFF) as u8,
            linear_bits: ((value >> 8) & 0xFF) as u8,
        }
    }

    fn to_register_value(&self) -> u32 {
        self.physical_bits as u32 | ((self.linear_bits as u32) << 8)
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.physical_bits > 64 || self.linear_bits > 64 {
            return Err("Address widths cannot exceed 64 bits");
        }
        Ok(())
    }
}
