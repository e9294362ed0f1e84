//! Leaf 0x14: Intel Processor Trace enumeration

use crate::capability_table;

pub const LEAF: u32 = 0x14;

/// Main enumeration sub-leaf
pub const SUBLEAF_MAIN: u32 = 0;

capability_table! {
    /// CPUID(0x14,0).EBX
    pub CAPABILITIES_EBX = [
        0 => ("CR3_FILTER",  "CR3 Filtering",              "Trace only a single address space."),
        1 => ("PSB_CYC",     "Configurable PSB and CYC",   "Tunable packet frequency and cycle-accurate mode."),
        2 => ("IP_FILTER",   "IP Filtering",               "Restrict tracing to address ranges."),
        3 => ("MTC",         "MTC Timing Packets",         "Wall-clock timing packets for trace correlation."),
        4 => ("PTWRITE",     "PTWRITE Instruction",        "Software-injected payloads in the trace stream."),
        5 => ("PWR_EVT",     "Power Event Trace",          "C-state and frequency transitions in the trace."),
    ];
}
