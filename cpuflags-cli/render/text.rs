use crate::error::Result;
use crate::report::{Report, ReportSection, SectionItem, SectionOutcome, Summary};

use super::{render, Palette, Renderer};

/// Human-readable report, one `== title ==` block per section
#[derive(Debug, Clone, Copy)]
pub struct TextRenderer {
    palette: Palette,
}

impl TextRenderer {
    pub fn new(palette: Palette) -> Self {
        Self { palette }
    }

    fn section_lines(&self, section: &ReportSection<'_>, lines: &mut Vec<String>) {
        lines.push(header(section.title));

        match &section.outcome {
            SectionOutcome::Unsupported(placeholder) => {
                lines.push(self.palette.placeholder(placeholder.to_string()));
            }
            SectionOutcome::Decoded(items) => {
                for item in items {
                    match item {
                        SectionItem::Capabilities { judgments, .. } => {
                            lines.extend(render(judgments.iter().copied(), self.palette));
                        }
                        SectionItem::Heading(title) => {
                            lines.push(String::new());
                            lines.push(header(title));
                        }
                        SectionItem::Summary { summary, .. } => {
                            lines.extend(summary_lines(summary));
                        }
                    }
                }
            }
        }
    }
}

impl Renderer for TextRenderer {
    fn render(&self, report: &Report<'_>) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for (i, section) in report.sections.iter().enumerate() {
            if i > 0 {
                lines.push(String::new());
            }
            self.section_lines(section, &mut lines);
        }
        Ok(lines)
    }
}

fn header(title: &str) -> String {
    format!("== {title} ==")
}

fn summary_lines(summary: &Summary) -> Vec<String> {
    match summary {
        Summary::RawRegisters { ebx, ecx, edx } => {
            vec![format!("EBX: 0x{ebx:08X}, ECX: 0x{ecx:08X}, EDX: 0x{edx:08X}")]
        }
        Summary::AddressSizes(sizes) => vec![
            format!("Physical Address Bits: {}", sizes.physical_bits),
            format!("Linear Address Bits : {}", sizes.linear_bits),
        ],
        Summary::XsaveComponents(eax) => vec![format!("XCR0 supported bits: 0x{eax:08X}")],
        Summary::TraceCapabilities(eax) => vec![format!("PT capabilities (EAX): 0x{eax:08X}")],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::cpuid::StaticCpuid;
    use crate::gate::SupportedLeafBounds;
    use crate::report::{generate_report, ReportLayout, SectionId};
    use cpuflags_raw::{LeafQueryResult, Registry};

    fn lines_for(source: &mut StaticCpuid, ids: &[SectionId], palette: Palette) -> Vec<String> {
        let registry = Registry::builtin().unwrap();
        let bounds = SupportedLeafBounds::discover(source);
        let layout = ReportLayout::only(ids);
        let report = generate_report(registry, source, &bounds, &layout).unwrap();
        TextRenderer::new(palette).render(&report).unwrap()
    }

    #[test]
    fn test_unsupported_extended_section_is_one_placeholder() {
        let mut source = StaticCpuid::new().with_bounds(0x16, 0x8000_0004);
        let lines = lines_for(&mut source, &[SectionId::AddressSize], Palette::Plain);
        assert_eq!(
            lines,
            vec![
                "== CPUID(0x80000008) Address Size Info ==".to_string(),
                "CPUID(0x80000008) not supported (max ext = 0x80000004)".to_string(),
            ]
        );
    }

    #[test]
    fn test_placeholder_is_highlighted() {
        let mut source = StaticCpuid::new().with_bounds(6, 0);
        let lines = lines_for(&mut source, &[SectionId::Structured], Palette::Ansi);
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[1],
            "\x1b[33mCPUID(7,0) not supported (max leaf = 6)\x1b[0m"
        );
    }

    #[test]
    fn test_address_sizes_and_raw_values() {
        let mut source = StaticCpuid::new()
            .with_bounds(7, 0x8000_0008)
            .with(7, 1, LeafQueryResult::new(0, 0x10, 0, 0xDEAD_BEEF))
            .with(0x8000_0008, 0, LeafQueryResult::new(0x3027, 0, 0, 0));
        let lines = lines_for(
            &mut source,
            &[SectionId::Structured, SectionId::AddressSize],
            Palette::Plain,
        );

        assert!(lines.contains(&"== CPUID(7,1) Sub-leaf 1 Raw Values ==".to_string()));
        assert!(lines.contains(&"EBX: 0x00000010, ECX: 0x00000000, EDX: 0xDEADBEEF".to_string()));
        assert!(lines.contains(&"Physical Address Bits: 39".to_string()));
        assert!(lines.contains(&"Linear Address Bits : 48".to_string()));
    }

    #[test]
    fn test_sections_separated_by_blank_line() {
        let mut source = StaticCpuid::new().with_bounds(1, 0);
        let lines = lines_for(
            &mut source,
            &[SectionId::Basic, SectionId::Extended],
            Palette::Plain,
        );
        let basic_len = 1 + Registry::builtin()
            .unwrap()
            .tables()
            .filter(|t| t.source().leaf == 1)
            .map(|t| t.len())
            .sum::<usize>();

        assert_eq!(lines[0], "== CPUID(1) Basic Features ==");
        assert_eq!(lines[basic_len], "");
        assert_eq!(lines[basic_len + 1], "== CPUID(0x80000001) AMD Extended ==");
        assert_eq!(lines.len(), basic_len + 3);
    }

    #[test]
    fn test_xsave_summary_line() {
        let mut source = StaticCpuid::new()
            .with_bounds(0xD, 0)
            .with(0xD, 0, LeafQueryResult::new(0x2E7, 0, 0, 0));
        let lines = lines_for(&mut source, &[SectionId::Xsave], Palette::Plain);
        assert_eq!(lines[1], "XCR0 supported bits: 0x000002E7");
        assert!(lines[2].starts_with("[ 0] XSAVEOPT"));
    }
}
