// Rendering: decoded judgments -> report lines
//
// Nothing here writes to a sink; renderers only produce lines.

pub mod json;
pub mod text;

use cpuflags_raw::CapabilityEntry;

use crate::decode::Judgment;
use crate::error::Result;
use crate::report::Report;

pub use json::JsonRenderer;
pub use text::TextRenderer;

const YELLOW: &str = "\x1b[33m";
const RESET: &str = "\x1b[0m";

/// Appended to absent capability lines when no color is available
pub const ABSENT_MARKER: &str = " (absent)";

/// Styling applied to finished lines
///
/// Absence is what gets highlighted: the report exists to spot missing
/// capabilities, so present ones keep the default style. `Plain` marks
/// absence with a trailing [`ABSENT_MARKER`] so the line prefix stays
/// scrapeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Palette {
    Plain,
    Ansi,
}

impl Palette {
    pub fn present(&self, line: String) -> String {
        line
    }

    pub fn absent(&self, line: String) -> String {
        match self {
            Palette::Plain => format!("{line}{ABSENT_MARKER}"),
            Palette::Ansi => self.highlight(line),
        }
    }

    pub fn placeholder(&self, line: String) -> String {
        self.highlight(line)
    }

    fn highlight(&self, line: String) -> String {
        match self {
            Palette::Plain => line,
            Palette::Ansi => format!("{YELLOW}{line}{RESET}"),
        }
    }
}

/// `[bit] SHORT : Long name - usage note`, unstyled
pub fn format_capability_line(entry: &CapabilityEntry) -> String {
    format!(
        "[{:2}] {:<12} : {:<30} - {}",
        entry.bit_index, entry.short_name, entry.long_name, entry.usage_note
    )
}

/// One styled line per judgment, in order
pub fn render<'r, I>(judgments: I, palette: Palette) -> Vec<String>
where
    I: IntoIterator<Item = Judgment<'r>>,
{
    judgments
        .into_iter()
        .map(|j| {
            let line = format_capability_line(j.entry);
            if j.present {
                palette.present(line)
            } else {
                palette.absent(line)
            }
        })
        .collect()
}

/// Turns a whole report into output lines
pub trait Renderer {
    fn render(&self, report: &Report<'_>) -> Result<Vec<String>>;
}
