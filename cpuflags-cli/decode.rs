// Bitfield decoding: register value + capability table -> presence flags

use std::iter::FusedIterator;

use cpuflags_raw::{CapabilityEntry, CapabilityTable};

/// Presence judgment for one capability
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgment<'r> {
    pub entry: &'r CapabilityEntry,
    pub present: bool,
}

/// Lazy decode of one register against one table
///
/// Yields one [`Judgment`] per table entry in table order. Cloning restarts
/// from the clone point; the table is only borrowed.
#[derive(Debug, Clone)]
pub struct Decoded<'r> {
    entries: std::slice::Iter<'r, CapabilityEntry>,
    value: u32,
}

/// Decode `value` against every entry of `table`
pub fn decode(table: &CapabilityTable, value: u32) -> Decoded<'_> {
    Decoded {
        entries: table.iter(),
        value,
    }
}

impl<'r> Decoded<'r> {
    /// The register value being decoded
    pub fn value(&self) -> u32 {
        self.value
    }

    /// Only the capabilities whose bit is clear
    pub fn missing(self) -> impl Iterator<Item = &'r CapabilityEntry> {
        self.filter(|j| !j.present).map(|j| j.entry)
    }

    /// Only the capabilities whose bit is set
    pub fn present(self) -> impl Iterator<Item = &'r CapabilityEntry> {
        self.filter(|j| j.present).map(|j| j.entry)
    }
}

impl<'r> Iterator for Decoded<'r> {
    type Item = Judgment<'r>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(|entry| Judgment {
            entry,
            present: entry.is_set_in(self.value),
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.entries.size_hint()
    }
}

impl ExactSizeIterator for Decoded<'_> {}

impl FusedIterator for Decoded<'_> {}
