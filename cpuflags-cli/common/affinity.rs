use nix::sched::{sched_getaffinity, sched_setaffinity, CpuSet};
use nix::unistd::Pid;

use crate::error::{CpuflagsError, Result};

/// Pins the calling thread to one logical CPU until dropped
///
/// CPUID answers for the core it executes on; on hybrid parts the
/// performance and efficiency cores report different feature sets.
pub struct AffinityGuard {
    cpu: usize,
    old_affinity: CpuSet,
}

impl AffinityGuard {
    pub fn new(cpu: i32) -> Result<Self> {
        if cpu < 0 {
            return Err(CpuflagsError::AffinityError(format!(
                "Invalid CPU ID: {cpu}"
            )));
        }
        let cpu = cpu as usize;

        let old_affinity = sched_getaffinity(Pid::from_raw(0))?;

        let mut new_affinity = CpuSet::new();
        new_affinity.set(cpu).map_err(|e| {
            CpuflagsError::AffinityError(format!("Failed to set CPU {cpu} in set: {e}"))
        })?;

        sched_setaffinity(Pid::from_raw(0), &new_affinity).map_err(|e| {
            CpuflagsError::AffinityError(format!("Failed to set affinity to CPU {cpu}: {e}"))
        })?;

        tracing::debug!("Pinned to CPU {}", cpu);

        Ok(Self { cpu, old_affinity })
    }

    pub fn cpu(&self) -> usize {
        self.cpu
    }
}

impl Drop for AffinityGuard {
    fn drop(&mut self) {
        if let Err(e) = sched_setaffinity(Pid::from_raw(0), &self.old_affinity) {
            tracing::warn!("Failed to restore affinity after CPU {}: {}", self.cpu, e);
        }
    }
}
