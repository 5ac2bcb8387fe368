use clap::Parser;
use service_search::config::{Overrides, SearchConfig};
use service_search::runtime::Runtime;
use service_search::source::CandidateFetch;
use service_search::state::{AppState, Outcome};
use service_search::terminal::Terminal;
use service_search::widgets::components::SearchInput;
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "service-search", version, about = "Search services with inline autosuggest")]
struct Cli {
    /// YAML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Zone whose services are loaded.
    #[arg(short, long)]
    zone: Option<String>,
    /// Base URL of the service API (`GET <url>/api/services?zoneId=<zone>`).
    #[arg(long, conflicts_with = "file")]
    url: Option<String>,
    /// JSON file with `[{"id": .., "name": ..}]` records.
    #[arg(long)]
    file: Option<PathBuf>,
    #[arg(long)]
    placeholder: Option<String>,
    /// Rows shown in the dropdown before it scrolls.
    #[arg(long)]
    max_visible: Option<usize>,
    /// Use the alternate screen instead of drawing inline.
    #[arg(long)]
    altscreen: bool,
    /// Write logs here; logging is off otherwise.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            zone_id: self.zone.clone(),
            base_url: self.url.clone(),
            file: self.file.clone(),
            placeholder: self.placeholder.clone(),
            max_visible: self.max_visible,
            altscreen: self.altscreen,
            log_file: self.log_file.clone(),
        }
    }
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(Outcome::Selected(_)) => ExitCode::SUCCESS,
        Ok(Outcome::Cancelled) => ExitCode::from(130),
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<Outcome, Box<dyn Error>> {
    let config = SearchConfig::load_or_default(cli.config.as_deref())?.apply(cli.overrides());
    let source = config.build_source()?;
    if let Some(path) = &config.log_file {
        init_logging(path)?;
    }
    info!(zone = %config.zone_id, source = %source.describe(), "starting service search");

    let fetch = CandidateFetch::spawn(source, config.zone_id.clone());
    let view = SearchInput::new("service", "")
        .with_placeholder(config.placeholder.clone())
        .with_max_visible(config.max_visible);
    let state = AppState::new(view).with_fetch(fetch);
    let terminal = Terminal::new()?.with_mode(config.render_mode);

    let outcome = Runtime::new(state, terminal).run()?;
    if let Outcome::Selected(candidate) = &outcome {
        println!("{}", serde_json::to_string(candidate)?);
    }
    Ok(outcome)
}

fn init_logging(path: &Path) -> Result<(), Box<dyn Error>> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}
