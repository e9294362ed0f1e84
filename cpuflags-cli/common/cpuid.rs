use std::collections::HashMap;

use cpuflags_raw::LeafQueryResult;

use crate::error::Result;

/// Anything that can answer a `CPUID` (leaf, sub-leaf) query
///
/// Queries are assumed infallible; for leaves beyond the processor's
/// maximum the hardware returns undefined data, so callers gate first.
pub trait CpuidSource {
    fn query(&mut self, leaf: u32, subleaf: u32) -> LeafQueryResult;
}

#[cfg(target_arch = "x86_64")]
pub fn cpuid(eax: u32, ecx: u32) -> (u32, u32, u32, u32) {
    let mut ebx: u32;
    let mut edx: u32;
    let mut eax_out = eax;
    let mut ecx_out = ecx;

    // rbx is reserved by LLVM, so it is saved around the instruction by hand
    unsafe {
        std::arch::asm!(
            "mov {0:r}, rbx",
            "cpuid",
            "xchg {0:r}, rbx",
            out(reg) ebx,
            inout("eax") eax_out,
            inout("ecx") ecx_out,
            out("edx") edx,
            options(nostack, preserves_flags)
        );
    }

    (eax_out, ebx, ecx_out, edx)
}

/// The `CPUID` instruction of the processor this thread runs on
#[derive(Debug)]
pub struct NativeCpuid {
    _private: (),
}

impl NativeCpuid {
    #[cfg(target_arch = "x86_64")]
    pub fn new() -> Result<Self> {
        Ok(Self { _private: () })
    }

    #[cfg(not(target_arch = "x86_64"))]
    pub fn new() -> Result<Self> {
        Err(crate::error::CpuflagsError::UnsupportedArchitecture(
            std::env::consts::ARCH.to_string(),
        ))
    }
}

#[cfg(target_arch = "x86_64")]
impl CpuidSource for NativeCpuid {
    fn query(&mut self, leaf: u32, subleaf: u32) -> LeafQueryResult {
        let result = LeafQueryResult::from(cpuid(leaf, subleaf));
        tracing::debug!(
            "CPUID(0x{:08X},{}): EAX={:08X} EBX={:08X} ECX={:08X} EDX={:08X}",
            leaf,
            subleaf,
            result.eax,
            result.ebx,
            result.ecx,
            result.edx
        );
        result
    }
}

#[cfg(not(target_arch = "x86_64"))]
impl CpuidSource for NativeCpuid {
    fn query(&mut self, _leaf: u32, _subleaf: u32) -> LeafQueryResult {
        LeafQueryResult::default()
    }
}

/// Canned `CPUID` answers that record every query issued
///
/// Unset (leaf, sub-leaf) pairs answer all-zero, as real hardware commonly
/// does for reserved sub-leaves.
#[derive(Debug, Clone, Default)]
pub struct StaticCpuid {
    answers: HashMap<(u32, u32), LeafQueryResult>,
    issued: Vec<(u32, u32)>,
}

impl StaticCpuid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Canned answer for `(leaf, subleaf)`
    pub fn with(mut self, leaf: u32, subleaf: u32, result: LeafQueryResult) -> Self {
        self.answers.insert((leaf, subleaf), result);
        self
    }

    /// Set the maximum basic and extended leaves reported by leaves 0x0 and 0x8000_0000
    pub fn with_bounds(self, max_basic: u32, max_extended: u32) -> Self {
        self.with(0, 0, LeafQueryResult::new(max_basic, 0, 0, 0))
            .with(
                cpuflags_raw::EXTENDED_BASE,
                0,
                LeafQueryResult::new(max_extended, 0, 0, 0),
            )
    }

    /// Every (leaf, sub-leaf) queried so far, in issue order
    pub fn issued(&self) -> &[(u32, u32)] {
        &self.issued
    }

    /// Whether any sub-leaf of `leaf` has been queried
    pub fn was_queried(&self, leaf: u32) -> bool {
        self.issued.iter().any(|&(l, _)| l == leaf)
    }

    pub fn clear_issued(&mut self) {
        self.issued.clear();
    }
}

impl CpuidSource for StaticCpuid {
    fn query(&mut self, leaf: u32, subleaf: u32) -> LeafQueryResult {
        self.issued.push((leaf, subleaf));
        self.answers
            .get(&(leaf, subleaf))
            .copied()
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[cfg(target_arch = "x86_64")]
    #[allow(clippy::similar_names)] // CPU register names are standard
    fn test_cpuid() {
        let (eax, ebx, ecx, edx) = cpuid(0, 0);
        println!("CPUID(0,0): EAX={eax:08X} EBX={ebx:08X} ECX={ecx:08X} EDX={edx:08X}");
        assert!(eax >= 1, "every x86_64 processor implements leaf 1");
    }

    #[test]
    #[cfg(target_arch = "x86_64")]
    fn test_native_matches_raw_instruction() {
        let mut native = NativeCpuid::new().unwrap();
        let result = native.query(0, 0);
        assert_eq!(result, LeafQueryResult::from(cpuid(0, 0)));
    }

    #[test]
    fn test_static_records_queries() {
        let mut source = StaticCpuid::new().with(1, 0, LeafQueryResult::new(1, 2, 3, 4));
        assert_eq!(source.query(1, 0).ecx, 3);
        assert_eq!(source.query(7, 1), LeafQueryResult::default());
        assert_eq!(source.issued(), &[(1, 0), (7, 1)]);
        assert!(source.was_queried(7));
        assert!(!source.was_queried(0xD));

        source.clear_issued();
        assert!(source.issued().is_empty());
    }

    #[test]
    fn test_static_bounds() {
        let mut source = StaticCpuid::new().with_bounds(0x16, 0x8000_0008);
        assert_eq!(source.query(0, 0).eax, 0x16);
        assert_eq!(source.query(0x8000_0000, 0).eax, 0x8000_0008);
    }
}
