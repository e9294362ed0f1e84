use clap::ValueEnum;

use crate::error::{CpuflagsError, Result};
use crate::render::{JsonRenderer, Palette, Renderer, TextRenderer};
use crate::report::{ReportLayout, SectionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// ANSI styling when stdout is a terminal
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn use_ansi(&self, is_terminal: bool) -> bool {
        match self {
            ColorChoice::Auto => is_terminal,
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    /// One JSON object per section
    Json,
}

#[derive(Debug, Clone, Default)]
pub struct ReportConfig {
    pub color: ColorChoice,
    pub format: OutputFormat,
    /// Sections to report; empty means all
    pub sections: Vec<SectionId>,
    /// Logical CPU to pin to before querying
    pub cpu: Option<i32>,
}

impl ReportConfig {
    pub fn new(
        color: ColorChoice,
        format: OutputFormat,
        sections: Vec<SectionId>,
        cpu: Option<i32>,
    ) -> Self {
        let mut sections = sections;
        // Order comes from the layout, so only membership matters here
        sections.sort_by_key(|id| id.name());
        sections.dedup();

        Self {
            color,
            format,
            sections,
            cpu,
        }
    }

    /// Check `cpu` against the online CPUs, when the kernel tells us
    pub fn validate(&self) -> Result<()> {
        let Some(cpu) = self.cpu else {
            return Ok(());
        };

        if cpu < 0 {
            return Err(CpuflagsError::ConfigError(format!("Invalid CPU ID: {cpu}")));
        }

        match Self::detect_online_cpus() {
            Some(online) if !online.contains(&cpu) => Err(CpuflagsError::ConfigError(format!(
                "CPU {cpu} is not online (online: {})",
                Self::format_cpu_list(&online)
            ))),
            Some(_) => Ok(()),
            None => {
                tracing::warn!("Failed to detect online CPUs, not validating --cpu {}", cpu);
                Ok(())
            }
        }
    }

    pub fn layout(&self) -> ReportLayout {
        ReportLayout::only(&self.sections)
    }

    pub fn palette(&self, is_terminal: bool) -> Palette {
        if self.color.use_ansi(is_terminal) {
            Palette::Ansi
        } else {
            Palette::Plain
        }
    }

    pub fn renderer(&self, is_terminal: bool) -> Box<dyn Renderer> {
        match self.format {
            OutputFormat::Text => Box::new(TextRenderer::new(self.palette(is_terminal))),
            OutputFormat::Json => Box::new(JsonRenderer::new()),
        }
    }

    /// Online CPUs from /sys/devices/system/cpu/online
    pub fn detect_online_cpus() -> Option<Vec<i32>> {
        std::fs::read_to_string("/sys/devices/system/cpu/online")
            .ok()
            .and_then(|s| Self::parse_cpu_list(&s))
    }

    /// Parse CPU list like "0-3,8-11" into Vec<i32>
    fn parse_cpu_list(s: &str) -> Option<Vec<i32>> {
        let mut cpus = Vec::new();
        for part in s.trim().split(',') {
            if let Some((start, end)) = part.split_once('-') {
                let start: i32 = start.parse().ok()?;
                let end: i32 = end.parse().ok()?;
                cpus.extend(start..=end);
            } else {
                cpus.push(part.parse().ok()?);
            }
        }
        Some(cpus)
    }

    /// Inverse of `parse_cpu_list` for sorted input
    fn format_cpu_list(cpus: &[i32]) -> String {
        let mut ranges: Vec<String> = Vec::new();
        let mut iter = cpus.iter().copied().peekable();
        while let Some(start) = iter.next() {
            let mut end = start;
            while iter.peek() == Some(&(end + 1)) {
                end += 1;
                iter.next();
            }
            if start == end {
                ranges.push(start.to_string());
            } else {
                ranges.push(format!("{start}-{end}"));
            }
        }
        ranges.join(",")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cpu_list() {
        assert_eq!(
            ReportConfig::parse_cpu_list("0-3,8-11\n"),
            Some(vec![0, 1, 2, 3, 8, 9, 10, 11])
        );
        assert_eq!(ReportConfig::parse_cpu_list("0"), Some(vec![0]));
        assert_eq!(ReportConfig::parse_cpu_list("0-x"), None);
    }

    #[test]
    fn test_format_cpu_list() {
        assert_eq!(ReportConfig::format_cpu_list(&[0, 1, 2, 3, 8, 10, 11]), "0-3,8,10-11");
        assert_eq!(ReportConfig::format_cpu_list(&[]), "");
    }

    #[test]
    fn test_color_choice() {
        assert!(ColorChoice::Auto.use_ansi(true));
        assert!(!ColorChoice::Auto.use_ansi(false));
        assert!(ColorChoice::Always.use_ansi(false));
        assert!(!ColorChoice::Never.use_ansi(true));
    }

    #[test]
    fn test_palette_follows_color_choice() {
        let config = ReportConfig::new(ColorChoice::Never, OutputFormat::Text, vec![], None);
        assert_eq!(config.palette(true), Palette::Plain);

        let config = ReportConfig::new(ColorChoice::Auto, OutputFormat::Text, vec![], None);
        assert_eq!(config.palette(true), Palette::Ansi);
    }

    #[test]
    fn test_negative_cpu_rejected() {
        let config = ReportConfig::new(ColorChoice::Auto, OutputFormat::Text, vec![], Some(-2));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_no_cpu_is_valid() {
        assert!(ReportConfig::default().validate().is_ok());
    }

    #[test]
    fn test_layout_respects_sections() {
        let config = ReportConfig::new(
            ColorChoice::Auto,
            OutputFormat::Json,
            vec![SectionId::Xsave, SectionId::Xsave],
            None,
        );
        assert_eq!(config.sections, vec![SectionId::Xsave]);
        assert_eq!(config.layout().sections().len(), 1);
    }

    #[test]
    fn test_non_adjacent_duplicate_sections_collapse() {
        let config = ReportConfig::new(
            ColorChoice::Auto,
            OutputFormat::Text,
            vec![SectionId::Xsave, SectionId::Basic, SectionId::Xsave],
            None,
        );
        assert_eq!(config.sections.len(), 2);
        assert!(config.sections.contains(&SectionId::Basic));
        assert!(config.sections.contains(&SectionId::Xsave));
    }

    #[test]
    fn test_default_piped_output_keeps_presence() {
        let palette = ReportConfig::default().palette(false);
        assert_eq!(palette, Palette::Plain);

        let line = "[ 9] APIC         : APIC - SMP".to_string();
        assert_ne!(palette.absent(line.clone()), palette.present(line));
    }
}
