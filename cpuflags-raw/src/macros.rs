//! Declarative macros for writing capability tables

/// Declare a static capability table as a `&[EntryDef]` constant
///
/// Each line maps a bit index to `(short name, long name, usage note)`.
/// Nothing is checked here; tables are validated when registered.
///
/// # Example
/// ```
/// use cpuflags_raw::capability_table;
/// use cpuflags_raw::{CapabilityTable, CpuidRegister, SourceTriple};
///
/// capability_table! {
///     pub DEMO_EDX = [
///         0 => ("FPU", "Floating Point Unit", "x87 math"),
///         9 => ("APIC", "Advanced Programmable Interrupt Controller", "SMP"),
///     ];
/// }
///
/// let source = SourceTriple::new(1, 0, CpuidRegister::Edx);
/// let table = CapabilityTable::new(source, DEMO_EDX).unwrap();
/// assert_eq!(table.len(), 2);
/// assert_eq!(table.entries()[1].short_name, "APIC");
/// ```
#[macro_export]
macro_rules! capability_table {
    (
        $(
            $(#[$meta:meta])*
            $vis:vis $name:ident = [
                $($bit:literal => ($short:literal, $long:literal, $usage:literal)),* $(,)?
            ];
        )+
    ) => {
        $(
            $(#[$meta])*
            $vis const $name: &[$crate::table::EntryDef] = &[
                $($crate::table::EntryDef::new($bit, $short, $long, $usage),)*
            ];
        )+
    };
}
