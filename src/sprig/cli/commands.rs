//! # CLI Layer
//!
//! This module is **one possible UI client** for sprig, not the application itself.
//!
//! The CLI layer is the **only** place in the codebase that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Reads the environment and decides where the home directory is
//! - Installs the log subscriber
//! - Formats output for human consumption
//!
//! ## Structure
//!
//! - `run()`: Main dispatch logic (called by `main.rs`)
//! - `init_context()`: Resolves paths, loads config, builds the API
//! - `handle_*()`: Per-command handlers that call the API and print the result

use super::render::Renderer;
use super::setup::{Cli, Commands, OutputMode};
use clap::Parser;
use directories::ProjectDirs;
use sprig::api::{CmdResult, ConfigAction, SprigApi, SprigPaths};
use sprig::config::{ConfigKey, SprigConfig};
use sprig::error::{Result, SprigError};
use sprig::images::Upload;
use sprig::optimizer::TinifyOptimizer;
use sprig::store::fs_backend::FsBackend;
use std::path::{Path, PathBuf};
use tracing::debug;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "SPRIG_LOG";

struct AppContext {
    api: SprigApi<FsBackend>,
    output: OutputMode,
    renderer: Renderer,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let ctx = init_context(&cli)?;

    match cli.command.unwrap_or(Commands::List) {
        Commands::List => handle_list(&ctx),
        Commands::Add { name } => handle_add(&ctx, name),
        Commands::Water { id, on } => emit(&ctx, ctx.api.water_plant(&id, on)?),
        Commands::Show { id } => handle_show(&ctx, &id),
        Commands::Rename { id, name } => {
            let name = name.join(" ");
            emit(&ctx, ctx.api.rename_plant(&id, Some(&name))?)
        }
        Commands::Image { id, file } => handle_image(&ctx, &id, &file),
        Commands::Rm { id } => emit(&ctx, ctx.api.delete_plant(&id)?),
        Commands::Labels { base_url } => handle_labels(&ctx, base_url.as_deref()),
        Commands::Config { key, value } => handle_config(&ctx, key, value),
        Commands::Paths => handle_paths(&ctx),
    }
}

/// Logs go to stderr so stdout only ever carries rendered output.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn init_context(cli: &Cli) -> Result<AppContext> {
    let home = resolve_home(cli.home.as_deref())?;
    let paths = SprigPaths::from_home(&home);
    paths.ensure_dirs()?;
    debug!(home = %home.display(), "using sprig home");

    let mut config = SprigConfig::load(&paths.config_dir)?;
    if let Some(key) = &cli.optimizer_key {
        config.optimizer.api_key = Some(key.clone());
    }
    let optimizer = TinifyOptimizer::from_config(&config.optimizer)?;

    let mut api = SprigApi::open(paths, config);
    if let Some(optimizer) = optimizer {
        debug!("image optimization enabled");
        api = api.with_optimizer(Box::new(optimizer));
    }

    Ok(AppContext {
        api,
        output: cli.output,
        renderer: Renderer::detect(cli.no_color),
    })
}

fn resolve_home(flag: Option<&Path>) -> Result<PathBuf> {
    if let Some(home) = flag {
        return Ok(home.to_path_buf());
    }
    ProjectDirs::from("org", "sprig", "sprig")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| {
            SprigError::Config("could not determine a home directory, pass --home".into())
        })
}

fn handle_list(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.list_plants()?;
    if ctx.output == OutputMode::Text {
        print!("{}", ctx.renderer.plant_list(&result.listed_plants));
    }
    emit(ctx, result)
}

fn handle_add(ctx: &AppContext, name: Vec<String>) -> Result<()> {
    let name = if name.is_empty() {
        None
    } else {
        Some(name.join(" "))
    };
    emit(ctx, ctx.api.create_plant(name)?)
}

fn handle_show(ctx: &AppContext, id: &str) -> Result<()> {
    let result = ctx.api.plant_status(id)?;
    if ctx.output == OutputMode::Text {
        print!("{}", ctx.renderer.plant_details(&result.listed_plants));
    }
    emit(ctx, result)
}

fn handle_image(ctx: &AppContext, id: &str, file: &Path) -> Result<()> {
    let upload = Upload::from_path(file)?;
    emit(ctx, ctx.api.set_plant_image(id, Some(&upload))?)
}

fn handle_labels(ctx: &AppContext, base_url: Option<&str>) -> Result<()> {
    let result = ctx.api.labels(base_url)?;
    if ctx.output == OutputMode::Text {
        if let Some(sheet) = &result.labels {
            print!("{}", ctx.renderer.label_sheet(sheet));
        }
    }
    emit(ctx, result)
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(key), None) => ConfigAction::Show(key.parse::<ConfigKey>()?),
        (Some(key), Some(value)) => ConfigAction::Set(key.parse::<ConfigKey>()?, value),
    };
    let show = !matches!(action, ConfigAction::Set(..));

    let result = ctx.api.config(action)?;
    if show && ctx.output == OutputMode::Text {
        print!("{}", ctx.renderer.settings(&result.settings));
    }
    emit(ctx, result)
}

fn handle_paths(ctx: &AppContext) -> Result<()> {
    let result = ctx.api.show_paths()?;
    if ctx.output == OutputMode::Text {
        print!("{}", ctx.renderer.paths(&result.paths));
    }
    emit(ctx, result)
}

/// Print the messages of a result, or the whole result as JSON.
fn emit(ctx: &AppContext, result: CmdResult) -> Result<()> {
    match ctx.output {
        OutputMode::Json => println!("{}", serde_json::to_string_pretty(&result)?),
        OutputMode::Text => print!("{}", ctx.renderer.messages(&result.messages)),
    }
    Ok(())
}
