//! CPUID output registers, source triples and typed register layouts

use std::fmt;

/// One of the four registers written by `CPUID`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CpuidRegister {
    Eax,
    Ebx,
    Ecx,
    Edx,
}

impl CpuidRegister {
    pub fn name(&self) -> &'static str {
        match self {
            CpuidRegister::Eax => "EAX",
            CpuidRegister::Ebx => "EBX",
            CpuidRegister::Ecx => "ECX",
            CpuidRegister::Edx => "EDX",
        }
    }

    pub fn all() -> [CpuidRegister; 4] {
        [
            CpuidRegister::Eax,
            CpuidRegister::Ebx,
            CpuidRegister::Ecx,
            CpuidRegister::Edx,
        ]
    }
}

impl fmt::Display for CpuidRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The (leaf, sub-leaf, register) triple a capability table is read from
///
/// Triples order by leaf, then sub-leaf, then register, which is also the
/// order [`crate::Registry::tables`] yields them in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceTriple {
    pub leaf: u32,
    pub subleaf: u32,
    pub register: CpuidRegister,
}

impl SourceTriple {
    pub const fn new(leaf: u32, subleaf: u32, register: CpuidRegister) -> Self {
        Self {
            leaf,
            subleaf,
            register,
        }
    }
}

impl fmt::Display for SourceTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CPUID(0x{:X},{}).{}",
            self.leaf, self.subleaf, self.register
        )
    }
}

/// Register values returned by one `CPUID` (leaf, sub-leaf) query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LeafQueryResult {
    pub eax: u32,
    pub ebx: u32,
    pub ecx: u32,
    pub edx: u32,
}

impl LeafQueryResult {
    pub const fn new(eax: u32, ebx: u32, ecx: u32, edx: u32) -> Self {
        Self { eax, ebx, ecx, edx }
    }

    /// Value of a single output register
    pub fn register(&self, register: CpuidRegister) -> u32 {
        match register {
            CpuidRegister::Eax => self.eax,
            CpuidRegister::Ebx => self.ebx,
            CpuidRegister::Ecx => self.ecx,
            CpuidRegister::Edx => self.edx,
        }
    }
}

impl From<(u32, u32, u32, u32)> for LeafQueryResult {
    fn from((eax, ebx, ecx, edx): (u32, u32, u32, u32)) -> Self {
        Self { eax, ebx, ecx, edx }
    }
}

/// Trait for multi-bit fields packed into a single CPUID output register
///
/// Capability tables cover single-bit flags; this covers the wider fields
/// (address widths, family/model numbers) some leaves report instead.
///
/// # Example
///
/// ```
/// use cpuflags_raw::register::RegisterLayout;
///
/// #[derive(Debug, Default)]
/// struct CacheLine {
///     size_in_qwords: u8,
/// }
///
/// impl RegisterLayout for CacheLine {
///     fn from_register_value(value: u32) -> Self {
///         Self {
///             size_in_qwords: ((value >> 8) & 0xFF) as u8,
///         }
///     }
///
///     fn to_register_value(&self) -> u32 {
///         (self.size_in_qwords as u32) << 8
///     }
/// }
///
/// assert_eq!(CacheLine::from_register_value(0x0800).size_in_qwords, 8);
/// ```
pub trait RegisterLayout: Sized {
    /// Parse a raw register value into this layout
    fn from_register_value(value: u32) -> Self;

    /// Pack this layout back into a raw register value
    fn to_register_value(&self) -> u32;

    /// Validate that the field values fit their bit widths
    ///
    /// Returns `Ok(())` if valid, or an error message if invalid.
    fn validate(&self) -> Result<(), &'static str> {
        Ok(())
    }
}
