use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use lpsn_genus::app::App;
use lpsn_genus::config::{ConfigLoader, DEFAULT_MAP_FILE, UpdateOptions, default_outfile};
use lpsn_genus::error::LpsnError;
use lpsn_genus::lpsn::LpsnHttpClient;
use lpsn_genus::output::{JsonOutput, OutputMode, TextOutput};

#[derive(Parser)]
#[command(name = "lpsn-genus")]
#[command(about = "Update taxon by LPSN with Genus Name")]
#[command(version, author)]
struct Cli {
    /// LPSN genus list file; scraped and saved here when missing
    #[arg(short = 'l', long = "lpsn")]
    lpsn: Option<PathBuf>,

    /// Input taxon file, if not provided, output LPSN file only
    #[arg(short = 'i', long)]
    infile: Option<PathBuf>,

    /// Output new taxon file [default: <infile>-lpsn.csv]
    #[arg(short = 'o', long)]
    outfile: Option<PathBuf>,

    /// Output mapfile map_taxon_lpsn.csv for check
    #[arg(short = 'm', long)]
    mapfile: bool,

    /// Directory holding cached LPSN pages
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// JSON config file [default: lpsn-genus.json when present]
    #[arg(long)]
    config: Option<PathBuf>,

    /// HTTP timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(err) = report.downcast_ref::<LpsnError>() {
            return ExitCode::from(map_exit_code(err));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &LpsnError) -> u8 {
    match error {
        LpsnError::MissingInput(_)
        | LpsnError::MissingColumn { .. }
        | LpsnError::ConfigRead(_)
        | LpsnError::ConfigParse(_) => 2,
        err if err.is_network() => 3,
        _ => 1,
    }
}

fn run() -> miette::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let output_mode = if cli.json {
        OutputMode::Json
    } else {
        OutputMode::Text
    };

    let file_config = ConfigLoader::load(cli.config.as_deref())?;
    let config = ConfigLoader::resolve(
        file_config,
        cli.lpsn,
        cli.cache_dir,
        cli.timeout,
        chrono::Local::now().date_naive(),
    );

    let update = cli.infile.map(|infile| UpdateOptions {
        outfile: cli.outfile.unwrap_or_else(|| default_outfile(&infile)),
        map_file: cli.mapfile.then(|| PathBuf::from(DEFAULT_MAP_FILE)),
        infile,
    });

    let fetcher = LpsnHttpClient::new(config.timeout)?;
    let app = App::new(config, fetcher);
    let summary = app.run(update.as_ref())?;

    match output_mode {
        OutputMode::Json => JsonOutput::print_summary(&summary).into_diagnostic(),
        OutputMode::Text => TextOutput::print_summary(&summary).into_diagnostic(),
    }
}
