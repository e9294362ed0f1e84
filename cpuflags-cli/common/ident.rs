// Processor identification, logged ahead of the report

use cpuflags_raw::leaves::basic::{self, VersionInfo};
use cpuflags_raw::RegisterLayout;

use crate::common::cpuid::CpuidSource;
use crate::gate::SupportedLeafBounds;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identification {
    pub vendor: String,
    pub version: Option<VersionInfo>,
}

/// Read the vendor string and, when leaf 0x1 is available, the version info
pub fn identify<S: CpuidSource>(source: &mut S, bounds: &SupportedLeafBounds) -> Identification {
    let leaf0 = source.query(basic::LEAF_VENDOR, 0);
    let vendor = basic::vendor_id(&leaf0);

    let version = bounds.supports(basic::LEAF_FEATURES).then(|| {
        let leaf1 = source.query(basic::LEAF_FEATURES, 0);
        VersionInfo::from_register_value(leaf1.eax)
    });

    let ident = Identification { vendor, version };
    ident.log();
    ident
}

impl Identification {
    fn log(&self) {
        tracing::info!("CPU vendor: {}", self.vendor);
        match self.version {
            Some(v) => {
                if let Err(reason) = v.validate() {
                    tracing::warn!("Unexpected version info {:?}: {}", v, reason);
                }
                tracing::info!(
                    "CPU: Family {:X}, Model {:X}, Stepping {:X}",
                    v.display_family(),
                    v.display_model(),
                    v.stepping
                )
            }
            None => tracing::warn!("CPUID leaf 0x1 not available, version unknown"),
        }
    }
}
