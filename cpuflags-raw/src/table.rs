//! Capability entries and the validated tables that own them

use crate::register::SourceTriple;
use crate::registry::{MalformedReason, RegistryError};

/// Highest bit position in a 32-bit CPUID register
pub const MAX_BIT_INDEX: u8 = 31;

/// Unvalidated capability declaration, as written in the static tables
///
/// `bit` is signed so that a typo such as `-1` survives until validation
/// and is reported instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntryDef {
    pub bit: i32,
    pub short: &'static str,
    pub long: &'static str,
    pub usage: &'static str,
}

impl EntryDef {
    pub const fn new(bit: i32, short: &'static str, long: &'static str, usage: &'static str) -> Self {
        Self {
            bit,
            short,
            long,
            usage,
        }
    }
}

/// One named processor capability at a fixed bit of its source register
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityEntry {
    pub bit_index: u8,
    pub short_name: &'static str,
    pub long_name: &'static str,
    pub usage_note: &'static str,
}

impl CapabilityEntry {
    /// Single-bit mask selecting this capability
    pub fn mask(&self) -> u32 {
        1u32 << self.bit_index
    }

    /// Whether this capability's bit is set in `value`
    pub fn is_set_in(&self, value: u32) -> bool {
        (value >> self.bit_index) & 1 != 0
    }
}

/// Ordered capability entries read from exactly one source triple
///
/// Entry order is display order. Bit indices are distinct within a table and
/// always in `0..=31`; both are checked once, in [`CapabilityTable::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityTable {
    source: SourceTriple,
    entries: Vec<CapabilityEntry>,
}

impl CapabilityTable {
    /// Validate `defs` and build the table for `source`
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::MalformedEntry`] if a declaration names a bit
    /// outside `0..=31`, or a bit already claimed by an earlier declaration.
    pub fn new(source: SourceTriple, defs: &[EntryDef]) -> Result<Self, RegistryError> {
        let mut claimed: u32 = 0;
        let mut entries = Vec::with_capacity(defs.len());

        for def in defs {
            let bit_index = u8::try_from(def.bit)
                .ok()
                .filter(|&bit| bit <= MAX_BIT_INDEX)
                .ok_or(RegistryError::MalformedEntry {
                    table: source,
                    bit: def.bit,
                    name: def.short,
                    reason: MalformedReason::OutOfRange,
                })?;

            let mask = 1u32 << bit_index;
            if claimed & mask != 0 {
                return Err(RegistryError::MalformedEntry {
                    table: source,
                    bit: def.bit,
                    name: def.short,
                    reason: MalformedReason::Duplicate,
                });
            }
            claimed |= mask;

            entries.push(CapabilityEntry {
                bit_index,
                short_name: def.short,
                long_name: def.long,
                usage_note: def.usage,
            });
        }

        Ok(Self { source, entries })
    }

    pub fn source(&self) -> SourceTriple {
        self.source
    }

    pub fn entries(&self) -> &[CapabilityEntry] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CapabilityEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Look up an entry by its short name
    pub fn find(&self, short_name: &str) -> Option<&CapabilityEntry> {
        self.entries.iter().find(|e| e.short_name == short_name)
    }

    /// Union of every bit this table describes
    pub fn known_mask(&self) -> u32 {
        self.entries.iter().fold(0, |acc, e| acc | e.mask())
    }
}

impl<'a> IntoIterator for &'a CapabilityTable {
    type Item = &'a CapabilityEntry;
    type IntoIter = std::slice::Iter<'a, CapabilityEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::CpuidRegister;

    const SOURCE: SourceTriple = SourceTriple::new(1, 0, CpuidRegister::Edx);

    fn def(bit: i32, short: &'static str) -> EntryDef {
        EntryDef::new(bit, short, "long", "usage")
    }

    #[test]
    fn test_accepts_boundary_bits() {
        let table = CapabilityTable::new(SOURCE, &[def(0, "LOW"), def(31, "HIGH")]).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.entries()[0].bit_index, 0);
        assert_eq!(table.entries()[1].bit_index, 31);
        assert_eq!(table.known_mask(), 0x8000_0001);
    }

    #[test]
    fn test_rejects_bit_32() {
        let err = CapabilityTable::new(SOURCE, &[def(32, "OVER")]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MalformedEntry {
                bit: 32,
                reason: MalformedReason::OutOfRange,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_negative_bit() {
        let err = CapabilityTable::new(SOURCE, &[def(-1, "UNDER")]).unwrap_err();
        assert!(matches!(
            err,
            RegistryError::MalformedEntry {
                bit: -1,
                reason: MalformedReason::OutOfRange,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_duplicate_bit() {
        let err = CapabilityTable::new(SOURCE, &[def(9, "APIC"), def(0, "FPU"), def(9, "DUP")])
            .unwrap_err();
        match err {
            RegistryError::MalformedEntry {
                table,
                bit,
                name,
                reason,
            } => {
                assert_eq!(table, SOURCE);
                assert_eq!(bit, 9);
                assert_eq!(name, "DUP");
                assert_eq!(reason, MalformedReason::Duplicate);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_preserves_declaration_order() {
        let table =
            CapabilityTable::new(SOURCE, &[def(9, "APIC"), def(0, "FPU"), def(4, "TSC")]).unwrap();
        let names: Vec<_> = table.iter().map(|e| e.short_name).collect();
        assert_eq!(names, vec!["APIC", "FPU", "TSC"]);
    }

    #[test]
    fn test_find_and_is_set_in() {
        let table = CapabilityTable::new(SOURCE, &[def(0, "FPU"), def(9, "APIC")]).unwrap();
        let apic = table.find("APIC").unwrap();
        assert!(apic.is_set_in(0x200));
        assert!(!apic.is_set_in(0x1));
        assert!(table.find("SSE").is_none());
    }

    #[test]
    fn test_error_display_names_source() {
        let err = CapabilityTable::new(SOURCE, &[def(40, "BAD")]).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("CPUID(0x1,0).EDX"));
        assert!(msg.contains("BAD"));
        assert!(msg.contains("40"));
    }
}
