//! desktop-replay
//!
//! Replays a JSON script of shell input (launches, pointer gestures, chrome and taskbar clicks)
//! against the window manager core and prints the resulting window layout as JSON.

mod script;

use std::io::Read;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use anyhow::{Context, Result};
use clap::Parser;
use desktop_wm::{
    AppCatalog, DesktopRuntime, DesktopState, ShellConfig, TaskbarEntry, WindowLayout,
};
use platform_host::{FixedViewport, HostServices, MemoryExternalUrlService, Viewport};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::script::{replay, ReplayScript};

const DEFAULT_WIDTH: i32 = 1280;
const DEFAULT_HEIGHT: i32 = 800;

#[derive(Parser)]
#[command(name = "desktop-replay")]
#[command(author, version, about = "Replay shell input against the desktop window manager")]
struct Cli {
    /// Script to replay (`-` reads stdin)
    #[arg(short, long)]
    script: PathBuf,

    /// Viewport width, overriding the script
    #[arg(long)]
    width: Option<i32>,

    /// Viewport height, overriding the script
    #[arg(long)]
    height: Option<i32>,

    /// Shell config TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Start from an empty desktop instead of the boot apps
    #[arg(long)]
    no_boot: bool,

    /// Include the full desktop state in the output
    #[arg(long)]
    dump_state: bool,

    /// More logging (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Serialize)]
struct Report {
    events: usize,
    changed: usize,
    viewport: Viewport,
    opened_urls: Vec<String>,
    windows: Vec<WindowLayout>,
    taskbar: Vec<TaskbarEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    state: Option<DesktopState>,
}

fn init_logging(verbose: u8) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to install log subscriber: {err}"))
}

fn read_script(path: &Path) -> Result<ReplayScript> {
    let raw = if path == Path::new("-") {
        let mut raw = String::new();
        std::io::stdin()
            .read_to_string(&mut raw)
            .context("failed to read script from stdin")?;
        raw
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("failed to read script {}", path.display()))?
    };
    serde_json::from_str(&raw).with_context(|| format!("invalid replay script {}", path.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    let config = match &cli.config {
        Some(path) => ShellConfig::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => ShellConfig::default(),
    };
    let script = read_script(&cli.script)?;

    let width = cli
        .width
        .or(script.viewport.map(|v| v.width))
        .unwrap_or(DEFAULT_WIDTH);
    let height = cli
        .height
        .or(script.viewport.map(|v| v.height))
        .unwrap_or(DEFAULT_HEIGHT);
    let viewport = FixedViewport::new(Viewport::new(width, height));
    let urls = MemoryExternalUrlService::default();
    let host = HostServices::new(Rc::new(viewport.clone()), Rc::new(urls.clone()));

    let catalog = AppCatalog::builtin();
    let mut runtime = if cli.no_boot {
        let state = DesktopState::with_icons(catalog.icons().to_vec());
        DesktopRuntime::new(host, catalog, config, state)
    } else {
        DesktopRuntime::boot(host, catalog, config)
    };
    tracing::info!(width, height, events = script.events.len(), "replaying script");

    let changed = replay(&mut runtime, &viewport, &script.events);
    let report = Report {
        events: script.events.len(),
        changed,
        viewport: runtime.viewport(),
        opened_urls: urls.opened(),
        windows: runtime.window_layouts(),
        taskbar: runtime.taskbar_entries(),
        state: cli.dump_state.then(|| DesktopState::clone(runtime.state())),
    };
    let out = serde_json::to_string_pretty(&report).context("failed to serialize report")?;
    println!("{out}");
    Ok(())
}
