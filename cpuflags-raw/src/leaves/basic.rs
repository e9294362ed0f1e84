//! Leaf 0x0 (vendor) and leaf 0x1 (version and basic feature flags)
//!
//! ## References
//!
//! - Intel® 64 and IA-32 Architectures Software Developer's Manual, Volume 2A,
//!   CPUID: Table 3-10 (EAX) and Tables 3-11/3-12 (ECX/EDX)

use crate::capability_table;
use crate::register::{LeafQueryResult, RegisterLayout};

/// Vendor and maximum basic leaf
pub const LEAF_VENDOR: u32 = 0x0;

/// Version information and basic feature flags
pub const LEAF_FEATURES: u32 = 0x1;

capability_table! {
    /// CPUID(1).EDX
    pub FEATURES_EDX = [
        0  => ("FPU",     "Floating Point Unit",                        "Required for all floating-point math operations."),
        1  => ("VME",     "Virtual 8086 Mode Enhancements",             "Legacy 16-bit mode virtualization support."),
        2  => ("DE",      "Debug Extensions",                           "Enhanced debugging capabilities for trap handling."),
        3  => ("PSE",     "Page Size Extension",                        "4MB pages support to reduce TLB pressure."),
        4  => ("TSC",     "Timestamp Counter",                          "High-res cycle counter for profiling and timing."),
        5  => ("MSR",     "Model Specific Registers",                   "Access to performance and control registers."),
        6  => ("PAE",     "Physical Address Extension",                 ">4GB RAM addressing on 32-bit systems."),
        7  => ("MCE",     "Machine Check Exception",                    "Hardware error detection and reporting."),
        8  => ("CX8",     "CMPXCHG8 Instruction",                       "Atomic compare-and-swap on 64-bit values."),
        9  => ("APIC",    "Advanced Programmable Interrupt Controller", "SMP interrupt routing and management."),
        11 => ("SEP",     "SYSENTER/SYSEXIT",                           "Fast system calls for low-overhead transitions."),
        12 => ("MTRR",    "Memory Type Range Registers",                "Cache policy control per memory region."),
        13 => ("PGE",     "Page Global Enable",                         "Global TLB entries persist across context switches."),
        14 => ("MCA",     "Machine Check Architecture",                 "Advanced machine-check error reporting."),
        15 => ("CMOV",    "Conditional Move",                           "Branch-free data-dependent moves for pipelining."),
        16 => ("PAT",     "Page Attribute Table",                       "Extended cache attribute control."),
        17 => ("PSE-36",  "36-bit Page Size Extension",                 "Large pages on >4GB RAM for legacy systems."),
        19 => ("CLFLUSH", "CLFLUSH Instruction",                        "Explicit cache line flush, used in device drivers."),
        23 => ("MMX",     "MMX Instructions",                           "Legacy 64-bit SIMD for multimedia workloads."),
        24 => ("FXSR",    "FXSAVE/FXRSTOR Instructions",                "Fast FPU/SIMD context save/restore."),
        25 => ("SSE",     "Streaming SIMD Extensions",                  "128-bit float SIMD for graphics and audio."),
        26 => ("SSE2",    "Streaming SIMD Extensions 2",                "Double-precision SIMD and integer SIMD ops."),
        28 => ("HTT",     "Hyper-Threading Technology",                 "Logical cores per physical core for parallelism."),
    ];

    /// CPUID(1).ECX
    pub FEATURES_ECX = [
        0  => ("SSE3",       "Streaming SIMD Extensions 3",   "Horizontal add/sub and complex arithmetic enhancements."),
        1  => ("PCLMULQDQ",  "Carry-less Multiplication",     "Crypto acceleration (GCM/AES-GCM)."),
        9  => ("SSSE3",      "Supplemental SSE3",             "Sub-byte shuffles and improved vector math."),
        12 => ("FMA",        "Fused Multiply-Add",            "Single-instruction multiply-and-add for ML/DSP."),
        13 => ("CX16",       "CMPXCHG16B Instruction",        "Atomic compare-and-swap on 128-bit values."),
        19 => ("SSE4.1",     "Streaming SIMD Extensions 4.1", "Dot-product and blend ops for media processing."),
        20 => ("SSE4.2",     "Streaming SIMD Extensions 4.2", "String and CRC32 acceleration."),
        22 => ("MOVBE",      "MOVBE Instruction",             "Byte-swapping loads/stores for network byte order."),
        23 => ("POPCNT",     "Population Count",              "Fast bit-counting used in compression and crypto."),
        25 => ("AES",        "AES Instructions",              "Hardware AES encryption for secure communications."),
        26 => ("XSAVE",      "XSAVE/XRSTOR Instructions",     "Extended processor state save/restore."),
        27 => ("OSXSAVE",    "OS-Enabled XSAVE",              "OS has enabled XGETBV and extended state management."),
        28 => ("AVX",        "Advanced Vector Extensions",    "256-bit float SIMD for heavy numeric/ML workloads."),
        29 => ("F16C",       "Half-Precision Conversion",     "FP16 <-> FP32 conversion for compact ML storage."),
        30 => ("RDRAND",     "Hardware Random Number",        "On-chip random numbers for key and nonce generation."),
        31 => ("HYPERVISOR", "Hypervisor Present",            "Running under a hypervisor; feature bits may be masked."),
    ];
}

/// Vendor identification string from leaf 0x0 (EBX, EDX, ECX byte order)
pub fn vendor_id(leaf0: &LeafQueryResult) -> String {
    let bytes: Vec<u8> = [leaf0.ebx, leaf0.edx, leaf0.ecx]
        .iter()
        .flat_map(|r| r.to_le_bytes())
        .collect();
    String::from_utf8_lossy(&bytes)
        .trim_end_matches('\0')
        .to_string()
}

/// Leaf 0x1 EAX version information
///
/// ## Register Format
///
/// | Bits   | Field           |
/// |--------|-----------------|
/// | 0-3    | stepping        |
/// | 4-7    | model           |
/// | 8-11   | family          |
/// | 12-13  | processor type  |
/// | 16-19  | extended_model  |
/// | 20-27  | extended_family |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VersionInfo {
    pub stepping: u8,
    pub model: u8,
    pub family: u8,
    pub processor_type: u8,
    pub extended_model: u8,
    pub extended_family: u8,
}

impl RegisterLayout for VersionInfo {
    fn from_register_value(value: u32) -> Self {
        Self {
            stepping: (value & 0xF) as u8,
            model: ((value >> 4) & 0xF) as u8,
            family: ((value >> 8) & 0xF) as u8,
            processor_type: ((value >> 12) & 0x3) as u8,
            extended_model: ((value >> 16) & 0xF) as u8,
            extended_family: ((value >> 20) & 0xFF) as u8,
        }
    }

    fn to_register_value(&self) -> u32 {
        (self.stepping as u32 & 0xF)
            | ((self.model as u32 & 0xF) << 4)
            | ((self.family as u32 & 0xF) << 8)
            | ((self.processor_type as u32 & 0x3) << 12)
            | ((self.extended_model as u32 & 0xF) << 16)
            | ((self.extended_family as u32) << 20)
    }

    fn validate(&self) -> Result<(), &'static str> {
        if self.stepping > 0xF || self.model > 0xF || self.family > 0xF {
            return Err("Stepping, model and family are 4-bit fields");
        }
        if self.processor_type > 0x3 {
            return Err("Processor type is a 2-bit field");
        }
        if self.extended_model > 0xF {
            return Err("Extended model is a 4-bit field");
        }
        Ok(())
    }
}

impl VersionInfo {
    /// Family as displayed by the vendor (extended family added for family 0xF)
    pub fn display_family(&self) -> u32 {
        if self.family == 0xF {
            self.family as u32 + self.extended_family as u32
        } else {
            self.family as u32
        }
    }

    /// Model as displayed by the vendor (extended model prefixed for families 0x6 and 0xF)
    pub fn display_model(&self) -> u32 {
        if self.family == 0x6 || self.family == 0xF {
            ((self.extended_model as u32) << 4) + self.model as u32
        } else {
            self.model as u32
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vendor_id() {
        // "GenuineIntel"
        let leaf0 = LeafQueryResult::new(0x16, 0x756E_6547, 0x6C65_746E, 0x4965_6E69);
        assert_eq!(vendor_id(&leaf0), "GenuineIntel");
    }

    #[test]
    fn test_version_info_skylake_sp() {
        // Family 6, model 0x55, stepping 4
        let info = VersionInfo::from_register_value(0x0005_0654);
        assert_eq!(info.stepping, 4);
        assert_eq!(info.display_family(), 0x6);
        assert_eq!(info.display_model(), 0x55);
        assert!(info.validate().is_ok());
    }

    #[test]
    fn test_version_info_zen() {
        // Family 0xF + 0x8 = 0x17, model 0x31
        let info = VersionInfo::from_register_value(0x0083_0F10);
        assert_eq!(info.display_family(), 0x17);
        assert_eq!(info.display_model(), 0x31);
    }

    #[test]
    fn test_version_info_round_trip() {
        let info = VersionInfo {
            stepping: 0xA,
            model: 0xE,
            family: 0x6,
            processor_type: 0,
            extended_model: 0x9,
            extended_family: 0,
        };
        assert_eq!(VersionInfo::from_register_value(info.to_register_value()), info);
    }
}
