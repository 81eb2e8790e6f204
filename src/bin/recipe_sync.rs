use std::process::ExitCode;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use miette::IntoDiagnostic;
use tracing_subscriber::EnvFilter;

use recipe_sync::app::App;
use recipe_sync::assets::{AssetClient, AssetHttpClient};
use recipe_sync::config::{AssetConfig, ConfigLoader};
use recipe_sync::domain::SheetUrl;
use recipe_sync::error::SyncError;
use recipe_sync::fetch::{SheetClient, SheetHttpClient};
use recipe_sync::output::{JsonOutput, OutputMode, assets_summary, import_summary};
use recipe_sync::store::{DEFAULT_STORE_PATH, RecipeStore};

#[derive(Parser)]
#[command(name = "recipe-sync")]
#[command(about = "Import recipes from a spreadsheet export and fetch recipe page assets")]
#[command(version, author)]
struct Cli {
    /// Print a JSON summary on stdout.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(about = "Fetch the sheet export and append its recipes to the store")]
    Import(ImportArgs),
    #[command(about = "Download static assets for the recipe pages")]
    Assets(AssetsArgs),
}

#[derive(Args)]
struct ImportArgs {
    #[arg(long)]
    url_file: Option<String>,

    #[arg(long, default_value = DEFAULT_STORE_PATH)]
    store: Utf8PathBuf,
}

#[derive(Args)]
struct AssetsArgs {
    #[arg(long)]
    out_dir: Option<Utf8PathBuf>,

    /// Replaces the built-in asset list; repeatable.
    #[arg(long = "url")]
    urls: Vec<String>,
}

fn main() -> ExitCode {
    if let Err(report) = run() {
        eprintln!("{report:?}");
        if let Some(error) = report.downcast_ref::<SyncError>() {
            return ExitCode::from(map_exit_code(error));
        }
        return ExitCode::from(1);
    }
    ExitCode::SUCCESS
}

fn map_exit_code(error: &SyncError) -> u8 {
    match error {
        SyncError::MissingConfig(_) | SyncError::ConfigRead(_) => 2,
        SyncError::SheetHttp(_)
        | SyncError::SheetStatus { .. }
        | SyncError::AssetHttp(_)
        | SyncError::AssetStatus { .. } => 3,
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
        OutputMode::Human
    };

    match cli.command {
        Commands::Import(args) => run_import(args, output_mode),
        Commands::Assets(args) => run_assets(args, output_mode),
    }
}

fn run_import(args: ImportArgs, output_mode: OutputMode) -> miette::Result<()> {
    let url = ConfigLoader::resolve(args.url_file.as_deref())?;
    let sheet = SheetHttpClient::new()?;
    let app = App::new(RecipeStore::new(args.store), sheet, NopAssets);
    let result = app.import(&url)?;

    match output_mode {
        OutputMode::Json => JsonOutput::print_import(&result).into_diagnostic(),
        OutputMode::Human => {
            println!("{}", import_summary(&result));
            Ok(())
        }
    }
}

fn run_assets(args: AssetsArgs, output_mode: OutputMode) -> miette::Result<()> {
    let config = AssetConfig::resolve(args.out_dir, args.urls);
    let assets = AssetHttpClient::new()?;
    let app = App::new(
        RecipeStore::new(DEFAULT_STORE_PATH),
        NopSheet,
        assets,
    );
    let result = app.fetch_assets(&config)?;

    match output_mode {
        OutputMode::Json => JsonOutput::print_assets(&result).into_diagnostic(),
        OutputMode::Human => {
            println!("{}", assets_summary(&result));
            Ok(())
        }
    }
}

struct NopSheet;
struct NopAssets;

impl SheetClient for NopSheet {
    fn fetch_text(&self, _url: &SheetUrl) -> Result<String, SyncError> {
        Err(SyncError::SheetHttp("sheet client not configured".to_string()))
    }
}

impl AssetClient for NopAssets {
    fn download(&self, _url: &str, _destination: &std::path::Path) -> Result<(), SyncError> {
        Err(SyncError::AssetHttp("asset client not configured".to_string()))
    }
}
