// Macros (must be first for visibility)
#[macro_use]
pub mod macros;

pub mod common;
pub mod config;
pub mod decode;
pub mod error;
pub mod gate;
pub mod render;
pub mod report;

pub use config::{ColorChoice, OutputFormat, ReportConfig};
pub use decode::{decode, Decoded, Judgment};
pub use error::{CpuflagsError, Result};
pub use gate::{LeafKind, Placeholder, SupportedLeafBounds};
pub use render::{render, Palette, Renderer};
pub use report::{generate_report, Report, ReportLayout, SectionId};
