mod common;
mod logic;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use rkb_game::{BUILTIN_EXPANSIONS, ExpansionRegistry, MAX_PLAYERS, MIN_PLAYERS};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::time::Instant;

use common::{parse_seeds, split_csv};
use logic::{RunConfig, SeedResult, SetupRunner};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for the terminal
    Console,
    /// Per-seed results including the last setup
    Json,
    Markdown,
    /// The in-memory page of the last run
    Html,
}

#[derive(Debug, Parser)]
#[command(name = "rkb-tester", version = "0.1.0")]
#[command(about = "Seeded sweeps over the Kingdom Builder setup randomizer")]
struct Args {
    /// Expansions to register (comma-separated)
    #[arg(long, default_value_t = BUILTIN_EXPANSIONS.join(","))]
    expansions: String,

    /// Checkboxes to uncheck before drawing (comma-separated ids)
    #[arg(long, default_value = "")]
    disable: String,

    /// Mini expansions to switch to odds mode (comma-separated)
    #[arg(long, default_value = "")]
    odds: String,

    /// Odds percentage for the minis named in --odds
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=100))]
    percent: Option<u32>,

    /// Player count typed into the form
    #[arg(long, value_parser = clap::value_parser!(u32).range(i64::from(MIN_PLAYERS)..=i64::from(MAX_PLAYERS)))]
    players: Option<u32>,

    /// Seeds to run (comma-separated)
    #[arg(long, default_value = "1337")]
    seeds: String,

    /// Number of setups drawn per seed
    #[arg(long, default_value_t = 10)]
    iterations: usize,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// List the registered expansions and exit
    #[arg(long)]
    list_expansions: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    fn run_config(&self) -> RunConfig {
        RunConfig {
            expansions: split_csv(&self.expansions),
            disable: split_csv(&self.disable),
            odds: split_csv(&self.odds),
            percent: self.percent,
            players: self.players,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    if maybe_list_expansions(&args)? {
        return Ok(());
    }

    if args.report == ReportFormat::Console {
        announce_banner();
    }

    let start_time = Instant::now();
    let seeds = parse_seeds(&args.seeds)?;
    let mut runner = SetupRunner::new(args.run_config(), args.verbose)?;
    let results = runner.run_seeds(&seeds, args.iterations);

    write_reports(&args, &results, &runner, start_time)?;

    if results.iter().any(|r| !r.passed) {
        std::process::exit(1);
    }

    Ok(())
}

fn maybe_list_expansions(args: &Args) -> Result<bool> {
    if !args.list_expansions {
        return Ok(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    writeln!(output_target.writer(), "Available expansions:")?;
    for id in ExpansionRegistry::with_builtin().ids() {
        writeln!(output_target.writer(), "  {id}")?;
    }
    output_target.flush_inner()?;
    Ok(true)
}

fn announce_banner() {
    println!("{}", "🏰 Kingdom Builder Setup Tester".bright_cyan().bold());
    println!("{}", "===============================".cyan());
}

fn write_reports(
    args: &Args,
    results: &[SeedResult],
    runner: &SetupRunner,
    start_time: Instant,
) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report {
        ReportFormat::Json => logic::reports::generate_json_report(&mut output_target, results)?,
        ReportFormat::Markdown => {
            logic::reports::generate_markdown_report(&mut output_target, results)?;
        }
        ReportFormat::Html => {
            logic::reports::generate_html_report(&mut output_target, runner.last_page())?;
        }
        ReportFormat::Console => {
            let duration = start_time.elapsed();
            if results.is_empty() {
                writeln!(&mut output_target, "No seeds executed.")?;
            } else {
                logic::reports::generate_console_report(&mut output_target, results, duration)?;
            }
            writeln!(&mut output_target, "🏁 Total time: {duration:?}")?;
        }
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
