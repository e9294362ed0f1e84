//! # cpuflags-raw
//!
//! CPUID capability registry for x86 processors.
//!
//! This crate maps (leaf, sub-leaf, register, bit) positions to named
//! processor capabilities. It holds data and validation only: issuing
//! `CPUID`, gating on supported leaves and rendering reports live in the
//! `cpuflags` tool.
//!
//! Tables are declared with [`capability_table!`] in [`leaves`] and checked
//! once when the registry is built, so a typo in a bit index fails at
//! startup instead of misreporting a feature.
//!
//! ## Usage
//!
//! ```
//! use cpuflags_raw::{CpuidRegister, Registry, SourceTriple};
//!
//! let registry = Registry::builtin()?;
//! let table = registry.lookup(&SourceTriple::new(0x7, 0, CpuidRegister::Ebx))?;
//! let avx2 = table.find("AVX2").unwrap();
//! assert_eq!(avx2.bit_index, 5);
//! # Ok::<(), cpuflags_raw::RegistryError>(())
//! ```

#[macro_use]
pub mod macros;

pub mod leaves;
pub mod register;
pub mod registry;
pub mod table;

// Re-export for convenience
pub use leaves::EXTENDED_BASE;
pub use register::{CpuidRegister, LeafQueryResult, RegisterLayout, SourceTriple};
pub use registry::{MalformedReason, Registry, RegistryBuilder, RegistryError, Result};
pub use table::{CapabilityEntry, CapabilityTable, EntryDef};
