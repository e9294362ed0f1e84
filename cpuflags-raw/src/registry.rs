//! The capability registry: validated tables keyed by source triple

use std::collections::BTreeMap;
use std::fmt;

use once_cell::sync::Lazy;

use crate::leaves;
use crate::register::SourceTriple;
use crate::table::{CapabilityTable, EntryDef};

/// Why a capability declaration was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedReason {
    /// Bit index outside `0..=31`
    OutOfRange,
    /// Bit index already claimed by an earlier entry of the same table
    Duplicate,
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::OutOfRange => f.write_str("outside 0..=31"),
            MalformedReason::Duplicate => f.write_str("already claimed in this table"),
        }
    }
}

/// Errors raised while building or querying the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Malformed entry {name} in {table}: bit {bit} is {reason}")]
    MalformedEntry {
        table: SourceTriple,
        bit: i32,
        name: &'static str,
        reason: MalformedReason,
    },

    #[error("A capability table for {0} is already registered")]
    DuplicateSource(SourceTriple),

    #[error("No capability table registered for {0}")]
    UnknownSource(SourceTriple),
}

pub type Result<T> = std::result::Result<T, RegistryError>;

/// Immutable mapping from source triple to its capability table
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tables: BTreeMap<SourceTriple, CapabilityTable>,
}

static BUILTIN: Lazy<Result<Registry>> = Lazy::new(|| {
    leaves::BUILTIN_TABLES
        .iter()
        .try_fold(RegistryBuilder::new(), |builder, (source, defs)| {
            builder.table(*source, defs)
        })
        .map(RegistryBuilder::build)
});

impl Registry {
    /// The validated built-in registry, shared for the life of the process
    ///
    /// # Errors
    ///
    /// Returns the first validation failure among the built-in tables. The
    /// same error is returned on every call.
    pub fn builtin() -> Result<&'static Registry> {
        BUILTIN.as_ref().map_err(|e| e.clone())
    }

    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Table registered for `source`
    pub fn lookup(&self, source: &SourceTriple) -> Result<&CapabilityTable> {
        self.tables
            .get(source)
            .ok_or(RegistryError::UnknownSource(*source))
    }

    pub fn contains(&self, source: &SourceTriple) -> bool {
        self.tables.contains_key(source)
    }

    /// All tables, ordered by source triple
    pub fn tables(&self) -> impl Iterator<Item = &CapabilityTable> {
        self.tables.values()
    }

    /// Number of registered tables
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Total number of capabilities across all tables
    pub fn capability_count(&self) -> usize {
        self.tables.values().map(CapabilityTable::len).sum()
    }
}

/// Eagerly validating builder for [`Registry`]
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    tables: BTreeMap<SourceTriple, CapabilityTable>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate `defs` and register them under `source`
    pub fn table(mut self, source: SourceTriple, defs: &[EntryDef]) -> Result<Self> {
        if self.tables.contains_key(&source) {
            return Err(RegistryError::DuplicateSource(source));
        }
        let table = CapabilityTable::new(source, defs)?;
        self.tables.insert(source, table);
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            tables: self.tables,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::CpuidRegister;

    const EDX1: SourceTriple = SourceTriple::new(1, 0, CpuidRegister::Edx);
    const ECX1: SourceTriple = SourceTriple::new(1, 0, CpuidRegister::Ecx);

    const SMALL: &[EntryDef] = &[
        EntryDef::new(0, "FPU", "Floating Point Unit", "x87 math"),
        EntryDef::new(9, "APIC", "Advanced Programmable Interrupt Controller", "SMP"),
    ];

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = Registry::builtin().unwrap();
        assert_eq!(registry.len(), leaves::BUILTIN_TABLES.len());
        assert!(registry.tables().all(|t| !t.is_empty()));
    }

    #[test]
    fn test_builtin_is_shared() {
        let a = Registry::builtin().unwrap();
        let b = Registry::builtin().unwrap();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_lookup_registered_table() {
        let registry = Registry::builder().table(EDX1, SMALL).unwrap().build();
        let table = registry.lookup(&EDX1).unwrap();
        assert_eq!(table.source(), EDX1);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_lookup_unknown_source() {
        let registry = Registry::builder().table(EDX1, SMALL).unwrap().build();
        assert_eq!(
            registry.lookup(&ECX1).unwrap_err(),
            RegistryError::UnknownSource(ECX1)
        );
    }

    #[test]
    fn test_rejects_duplicate_source() {
        let err = Registry::builder()
            .table(EDX1, SMALL)
            .unwrap()
            .table(EDX1, SMALL)
            .unwrap_err();
        assert_eq!(err, RegistryError::DuplicateSource(EDX1));
    }

    #[test]
    fn test_malformed_table_fails_build() {
        let bad = &[EntryDef::new(3, "A", "a", "a"), EntryDef::new(3, "B", "b", "b")];
        let err = Registry::builder().table(EDX1, bad).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MalformedEntry {
                reason: MalformedReason::Duplicate,
                ..
            }
        ));
    }

    #[test]
    fn test_tables_in_triple_order() {
        let registry = Registry::builder()
            .table(EDX1, SMALL)
            .unwrap()
            .table(ECX1, SMALL)
            .unwrap()
            .build();
        let sources: Vec<_> = registry.tables().map(|t| t.source()).collect();
        assert_eq!(sources, vec![ECX1, EDX1]);
        assert_eq!(registry.capability_count(), 4);
    }
}
