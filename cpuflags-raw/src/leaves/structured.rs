//! Leaf 0x7: structured extended feature flags
//!
//! Sub-leaf 0 carries the flag words decoded below; sub-leaf 1 is reported
//! as raw register values.
//!
//! ## References
//!
//! - Intel® 64 and IA-32 Architectures Software Developer's Manual, Volume 2A,
//!   CPUID: Table 3-8, leaf 07H

use crate::capability_table;

pub const LEAF: u32 = 0x7;

/// Sub-leaf carrying the EBX/ECX/EDX flag words
pub const SUBLEAF_FEATURES: u32 = 0;

/// Sub-leaf 1 (AVX-VNNI, AVX512_BF16, LAM and friends)
pub const SUBLEAF_EXTRA: u32 = 1;

capability_table! {
    /// CPUID(7,0).EBX
    pub FEATURES_EBX = [
        0  => ("FSGSBASE",   "RDFSBASE/WRFSBASE Instructions",       "User-mode FS/GS base access for faster TLS and context switching."),
        1  => ("TSC_ADJUST", "TSC Adjustment MSR",                   "Adjust timestamp counter for hypervisor sync."),
        2  => ("SGX",        "Software Guard Extensions",            "Hardware enclaves for secure computation."),
        3  => ("BMI1",       "Bit Manipulation Instructions 1",      "ANDN/BEXTR/TZCNT for fast bitfield operations."),
        4  => ("HLE",        "Hardware Lock Elision",                "Transactional memory hint for optimistic concurrency."),
        5  => ("AVX2",       "Advanced Vector Extensions 2",         "256-bit integer SIMD for graphics, ML, crypto."),
        7  => ("SMEP",       "Supervisor Mode Execution Protection", "Prevents kernel from executing user-mode code."),
        8  => ("BMI2",       "Bit Manipulation Instructions 2",      "PEXT/PDEP for parallel bitfield extract/deposit."),
        9  => ("ERMS",       "Enhanced REP MOVSB/STOSB",             "Optimized block memory copy/set instructions."),
        10 => ("INVPCID",    "Invalidate Process-Context ID",        "Fine-grained TLB invalidation for virtualization."),
        11 => ("RTM",        "Restricted Transactional Memory",      "User-level Intel TSX transactional support."),
        16 => ("AVX512F",    "AVX-512 Foundation",                   "512-bit SIMD for HPC and ML."),
        17 => ("AVX512DQ",   "AVX-512 Double/Quad",                  "Extended vector integer ops for data crunching."),
        18 => ("RDSEED",     "Hardware Random Seed",                 "Secure seed generation for RNG initialization."),
        19 => ("ADX",        "Multi-Precision Add-Carry",            "ADCX/ADOX for fast big-integer arithmetic."),
        20 => ("SMAP",       "Supervisor Mode Access Prevention",    "Blocks kernel access to user pages outside STAC/CLAC."),
        21 => ("AVX512IFMA", "Integer FMA",                          "Multiprecision math and deep learning integer kernels."),
        23 => ("CLFLUSHOPT", "Optimized Cache Flush",                "Non-blocking cache flush for high-performance persistence."),
        24 => ("CLWB",       "Cache Line Write Back",                "Writes back cache lines to memory without invalidation."),
        26 => ("AVX512PF",   "Prefetch",                             "Prefetch hints for large-data streaming workloads."),
        27 => ("AVX512ER",   "Exponential & Reciprocal",             "Specialized math functions for scientific computation."),
        28 => ("AVX512CD",   "Conflict Detection",                   "Conflict hints for gather/scatter operations."),
        29 => ("SHA",        "SHA Instruction Extensions",           "Hardware SHA-1/SHA-256 hashing acceleration."),
        30 => ("AVX512BW",   "Byte & Word",                          "8/16-bit data operations in 512-bit registers."),
        31 => ("AVX512VL",   "Vector Length Extensions",             "128/256-bit variants of AVX-512 instructions."),
    ];

    /// CPUID(7,0).ECX
    pub FEATURES_ECX = [
        0  => ("PREFETCHWT1",     "Prefetch With Intent To Write T1", "Write prefetch into the L2 for producer/consumer loops."),
        1  => ("AVX512VBMI",      "Vector Bit Manipulation",          "Byte/word permute and mask operations in 512-bit registers."),
        2  => ("UMIP",            "User Mode Instruction Prevention", "Prevents certain privileged instructions in user mode."),
        3  => ("PKU",             "Protection Keys for Userspace",    "Memory protection domains in user-space without syscalls."),
        4  => ("OSPKE",           "OS-Based PKU Enable",              "OS permission for user-space PKU usage."),
        6  => ("AVX512VBMI2",     "Vector Bit Manipulation 2",        "Compress/expand and concatenated shifts for parsing."),
        8  => ("GFNI",            "Galois Field Instructions",        "GF(2^8) arithmetic for erasure coding and crypto."),
        9  => ("VAES",            "Vector AES",                       "AES rounds on 256/512-bit vectors."),
        10 => ("VPCLMULQDQ",      "Vector Carry-less Multiply",       "Wide GHASH/CRC folding."),
        11 => ("AVX512VNNI",      "Vector Neural Network Instr.",     "INT8/INT16 dot products for inference."),
        12 => ("AVX512BITALG",    "Bit Algorithms",                   "Per-byte popcount and bit shuffles."),
        14 => ("AVX512VPOPCNTDQ", "Vector Population Count",          "Dword/qword popcount across 512-bit registers."),
        22 => ("RDPID",           "Read Processor ID",                "Cheap current-CPU lookup for per-CPU data."),
    ];

    /// CPUID(7,0).EDX
    pub FEATURES_EDX = [
        4  => ("FSRM",               "Fast Short REP MOV",              "Fast REP MOVSB for short copies."),
        8  => ("AVX512VP2INTERSECT", "Vector Pair Intersection",        "Mask pairs for sparse set intersection."),
        10 => ("MD_CLEAR",           "VERW Buffer Clearing",            "MDS mitigation via VERW on kernel exit."),
        14 => ("SERIALIZE",          "SERIALIZE Instruction",           "Cheap instruction-stream serialization."),
        15 => ("HYBRID",             "Hybrid Processor",                "Mixed core types; CPUID may differ per core."),
        20 => ("CET_IBT",            "Indirect Branch Tracking",        "ENDBR landing pads against JOP/COP attacks."),
        22 => ("AMX-BF16",           "AMX BFloat16",                    "Tile matrix multiply on bfloat16."),
        24 => ("AMX-TILE",           "AMX Tile Architecture",           "Tile registers for matrix workloads."),
        25 => ("AMX-INT8",           "AMX INT8",                        "Tile matrix multiply on 8-bit integers."),
        26 => ("IBRS_IBPB",          "Indirect Branch Restriction",     "Spectre v2 mitigation controls."),
        27 => ("STIBP",              "Single Thread Indirect Predictor", "Isolates branch prediction between SMT siblings."),
        29 => ("ARCH_CAPABILITIES",  "IA32_ARCH_CAPABILITIES MSR",      "Enumerates hardware vulnerability immunities."),
        31 => ("SSBD",               "Speculative Store Bypass Disable", "Spectre v4 mitigation control."),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bit_of(table: &[crate::EntryDef], short: &str) -> Option<i32> {
        table.iter().find(|d| d.short == short).map(|d| d.bit)
    }

    #[test]
    fn test_well_known_bits() {
        assert_eq!(bit_of(FEATURES_EBX, "AVX2"), Some(5));
        assert_eq!(bit_of(FEATURES_EBX, "AVX512F"), Some(16));
        assert_eq!(bit_of(FEATURES_EBX, "SHA"), Some(29));
        assert_eq!(bit_of(FEATURES_ECX, "PKU"), Some(3));
        assert_eq!(bit_of(FEATURES_EDX, "HYBRID"), Some(15));
    }

    #[test]
    fn test_declared_in_ascending_order() {
        for table in [FEATURES_EBX, FEATURES_ECX, FEATURES_EDX] {
            assert!(table.windows(2).all(|w| w[0].bit < w[1].bit));
        }
    }
}
