use std::io::{self, BufWriter, IsTerminal, Write};

use anyhow::Context;
use clap::Parser;
use cpuflags_raw::Registry;

use cpuflags::common::{identify, AffinityGuard, NativeCpuid};
use cpuflags::{
    generate_report, ColorChoice, OutputFormat, ReportConfig, ReportLayout, SectionId,
    SupportedLeafBounds,
};

#[derive(Parser, Debug)]
#[command(name = "cpuflags")]
#[command(about = "Report which x86 CPUID capabilities this processor exposes")]
struct Args {
    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, help = "Highlight missing capabilities")]
    color: ColorChoice,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text, help = "Output format")]
    format: OutputFormat,

    #[arg(
        long = "section",
        help = "Sections to report (can be specified multiple times, default: all)",
        value_parser = parse_section,
        action = clap::ArgAction::Append
    )]
    sections: Vec<SectionId>,

    #[arg(long, help = "Pin to this logical CPU before querying CPUID")]
    cpu: Option<i32>,

    #[arg(long, help = "List section ids and exit")]
    list_sections: bool,

    #[arg(short, long, help = "Enable verbose logging (shows every CPUID query)")]
    verbose: bool,
}

fn parse_section(s: &str) -> Result<SectionId, String> {
    SectionId::from_name(s).ok_or_else(|| {
        let known: Vec<_> = SectionId::all().iter().map(|id| id.name()).collect();
        format!("unknown section '{s}' (expected one of: {})", known.join(", "))
    })
}

fn write_lines(lines: &[String]) -> io::Result<()> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Setup logging based on verbose flag
    let log_level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_writer(io::stderr)
        .init();

    if args.list_sections {
        let lines: Vec<String> = ReportLayout::standard()
            .sections()
            .iter()
            .map(|s| format!("{:<14} {}", s.id.name(), s.title))
            .collect();
        write_lines(&lines).context("Failed to write section list")?;
        return Ok(());
    }

    let registry = Registry::builtin().context("Built-in capability registry is invalid")?;
    tracing::info!(
        "Loaded {} capability tables ({} capabilities)",
        registry.len(),
        registry.capability_count()
    );

    let config = ReportConfig::new(args.color, args.format, args.sections, args.cpu);
    config.validate()?;

    let _affinity = config.cpu.map(AffinityGuard::new).transpose()?;

    let mut source = NativeCpuid::new()?;
    let bounds = SupportedLeafBounds::discover(&mut source);
    identify(&mut source, &bounds);

    let report = generate_report(registry, &mut source, &bounds, &config.layout())?;

    let renderer = config.renderer(io::stdout().is_terminal());
    let lines = renderer.render(&report)?;
    write_lines(&lines).context("Failed to write report")?;

    Ok(())
}
