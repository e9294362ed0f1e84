pub mod affinity;
pub mod cpuid;
pub mod ident;

pub use affinity::AffinityGuard;
pub use cpuid::{CpuidSource, NativeCpuid, StaticCpuid};
pub use ident::{identify, Identification};
