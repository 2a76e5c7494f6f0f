use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use log::info;
use readify_lib::config::{load_rules, ReadifyConfig};
use readify_lib::pipeline;
use readify_lib::report::{generate_report, OutputFormat, PageReport, RunReport};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "readify")]
#[command(version, about = "Add missing ARIA roles and attributes to static HTML pages")]
struct Args {
    /// Input HTML file or directory of pages.
    input: PathBuf,

    /// Output file, or output directory when the input is a directory.
    #[arg(short, long, conflicts_with = "in_place")]
    output: Option<PathBuf>,

    /// Rewrite the input page(s) in place.
    #[arg(long)]
    in_place: bool,

    /// JSON config file with `defaults` and `rules`.
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON rule table merged over (or replacing) the builtin rules.
    #[arg(long)]
    rules: Option<PathBuf>,

    /// Selector of the site header (gets role="banner").
    #[arg(long)]
    header: Option<String>,

    /// Selector of the site footer (gets role="contentinfo").
    #[arg(long)]
    footer: Option<String>,

    /// Selector of the main content (gets role="main").
    #[arg(long)]
    main: Option<String>,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: FormatArg,

    /// Write the report to this file instead of the terminal.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Exit with status 1 if any rule failed.
    #[arg(long)]
    strict: bool,

    /// Enable debug logging.
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    /// Human-readable text
    Text,
    /// Structured JSON
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => OutputFormat::Text,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_target(false)
        .init();
}

/// Merges the config file and command-line flags; flags win.
fn build_config(args: &Args) -> anyhow::Result<ReadifyConfig> {
    let mut config = match &args.config {
        Some(path) => ReadifyConfig::from_path(path)?,
        None => ReadifyConfig::default(),
    };
    if let Some(path) = &args.rules {
        config.overrides = Some(load_rules(path)?);
    }
    if args.header.is_some() {
        config.defaults.header = args.header.clone();
    }
    if args.footer.is_some() {
        config.defaults.footer = args.footer.clone();
    }
    if args.main.is_some() {
        config.defaults.main = args.main.clone();
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = build_config(&args)?;
    let format: OutputFormat = args.format.into();

    let (run_report, html_on_stdout) = if args.input.is_dir() {
        let output_dir = match (&args.output, args.in_place) {
            (Some(dir), _) => dir.clone(),
            (None, true) => args.input.clone(),
            (None, false) => bail!("directory input needs --output <DIR> or --in-place"),
        };
        (pipeline::process_tree(&args.input, &output_dir, &config), false)
    } else {
        let dest = match (&args.output, args.in_place) {
            (Some(file), _) => Some(file.clone()),
            (None, true) => Some(args.input.clone()),
            (None, false) => None,
        };
        let (html, result) = pipeline::process_file(&args.input, dest.as_deref(), &config)
            .with_context(|| format!("failed to process {}", args.input.display()))?;
        if dest.is_none() {
            print!("{}", html);
        }
        let report = RunReport {
            pages: vec![PageReport {
                path: args.input.clone(),
                result,
            }],
            failures: Vec::new(),
        };
        (report, dest.is_none())
    };

    info!("writing {} report", format);
    let report_text = generate_report(&run_report, format);
    write_report(&report_text, args.report.as_deref(), html_on_stdout)?;

    if !run_report.failures.is_empty() || (args.strict && run_report.has_failures()) {
        std::process::exit(1);
    }
    Ok(())
}

/// Writes the report to a file, or to the terminal. stderr is used when
/// stdout already carries the rewritten page.
fn write_report(content: &str, path: Option<&Path>, html_on_stdout: bool) -> anyhow::Result<()> {
    match path {
        Some(p) => {
            fs::write(p, content)
                .with_context(|| format!("failed to write report to {}", p.display()))?;
            info!("report written to {}", p.display());
        }
        None if html_on_stdout => eprintln!("{}", content),
        None => println!("{}", content),
    }
    Ok(())
}
