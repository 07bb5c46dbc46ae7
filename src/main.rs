use std::fs::File;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

mod command;
mod controller;
mod domain;
mod export;
mod import;
mod inputter;
mod model;
mod record;
mod sheet;
mod ui;

use controller::Controller;
use domain::{SheetConfig, SheetError};
use model::{Model, Status};
use sheet::{Sheet, ViewPolicy};
use ui::TableUI;

/// Terminal job request sheet: sort, filter, search, select, add and export rows.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// csv, parquet, arrow or json file to open. Without it the built in job list is shown.
    data: Option<String>,

    /// Directory exports are written to
    #[arg(long, default_value = ".")]
    export_dir: String,

    #[arg(long, default_value_t = 40)]
    max_column_width: usize,

    /// Milliseconds to wait for terminal events per frame
    #[arg(long, default_value_t = 100)]
    event_poll_time: u64,

    /// Keep the active sort applied after filtering and searching
    #[arg(long)]
    keep_sort: bool,

    /// Keep filters, search and sort applied after adding a row
    #[arg(long)]
    keep_view_on_add: bool,

    /// Write logs to this file (also read from JOBSHEET_LOG)
    #[arg(long, env = "JOBSHEET_LOG")]
    log_file: Option<String>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(log_file) = args.log_file.as_deref() {
        if let Err(e) = init_tracing(log_file) {
            eprintln!("Warning: could not set up logging to {log_file}: {e}");
        }
    }

    match run(args) {
        Err(e) => {
            error!("Exiting with error: {:?}", e);
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
    }
}

// The terminal belongs to the ui, so logs only ever go to a file.
fn init_tracing(log_file: &str) -> Result<(), SheetError> {
    let file = File::create(expand_path(log_file)?)?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let file_layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_level(true);

    tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(tracing_error::ErrorLayer::default())
        .init();
    Ok(())
}

fn expand_path(path: &str) -> Result<PathBuf, SheetError> {
    shellexpand::full(path)
        .map(|expanded| PathBuf::from(expanded.as_ref()))
        .map_err(|e| SheetError::LoadingFailed(format!("cannot expand {path}: {e}")))
}

fn build_config(args: &Args) -> Result<SheetConfig, SheetError> {
    let policy = ViewPolicy {
        resort_after_filter: args.keep_sort,
        reset_view_on_add: !args.keep_view_on_add,
    };
    Ok(SheetConfig::default()
        .event_poll_time(args.event_poll_time)
        .max_column_width(args.max_column_width)
        .export_dir(expand_path(&args.export_dir)?)
        .view_policy(policy))
}

fn run(args: Args) -> Result<(), SheetError> {
    let cfg = build_config(&args)?;
    info!("Starting jobsheet with {:?}", cfg);

    let sheet = match args.data.as_deref() {
        Some(path) => Sheet::new(import::load_data_file(expand_path(path)?)?),
        None => Sheet::seeded(),
    };
    let mut model = Model::init(&cfg, sheet);
    let mut ui = TableUI::new();
    let controller = Controller::new(&cfg);

    let mut terminal = ratatui::init();
    let result = (|| -> Result<(), SheetError> {
        let size = terminal.size()?;
        model.update(Some(domain::Message::Resize(
            size.width as usize,
            size.height as usize,
        )))?;

        while model.status != Status::Quitting {
            // Render the current view
            terminal.draw(|f| ui.draw(&model, f))?;

            // Handle events and map to a Message
            let message = controller.handle_event(&model)?;
            model.update(message)?;
        }
        Ok(())
    })();
    ratatui::restore();

    info!("Quitting jobsheet");
    result
}
