mod scene;

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use lemmings_assets::MeshManifest;
use lemmings_input::KeyBindings;
use lemmings_kernel::SimConfig;
use lemmings_tools::PopulationInspector;
use tracing_subscriber::EnvFilter;

use crate::scene::{Session, default_lemming_manifest};

#[derive(Parser)]
#[command(name = "lemmings-cli", about = "Run the lemmings scene headless")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version and crate info
    Info,
    /// Print the key bindings in effect
    Keys {
        /// YAML file mapping keys to action lists
        #[arg(short, long)]
        bindings: Option<PathBuf>,
    },
    /// Simulate a number of frames and report on the population
    Run {
        /// Number of frames to simulate
        #[arg(short, long, default_value = "600")]
        ticks: u64,
        /// Frame time in seconds
        #[arg(long, default_value = "0.016666668")]
        dt: f32,
        /// RNG seed, overrides the config file
        #[arg(short, long)]
        seed: Option<u64>,
        /// YAML simulation config
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Mesh manifest (.json) or glTF document (.gltf) for the template
        #[arg(short, long)]
        manifest: Option<PathBuf>,
        /// YAML file mapping keys to action lists
        #[arg(short, long)]
        bindings: Option<PathBuf>,
        #[arg(long)]
        max_lemmings: Option<usize>,
        #[arg(long)]
        spawn_interval: Option<f32>,
        /// Keys held down for the whole run (repeatable)
        #[arg(long = "hold")]
        hold: Vec<String>,
        /// Print a population summary every N frames (0 disables)
        #[arg(long, default_value = "60")]
        report_every: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    match cli.command {
        Commands::Info => {
            println!("lemmings-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("kernel: {}", lemmings_kernel::crate_info());
            println!("assets: {}", lemmings_assets::crate_info());
            println!("input: {}", lemmings_input::crate_info());
            println!("tools: {}", lemmings_tools::crate_info());
        }
        Commands::Keys { bindings } => {
            let bindings = load_bindings(bindings.as_deref())?;
            println!("Keys:");
            for (key, actions) in bindings.iter() {
                println!("{key:>14} -> {}", actions.join(", "));
            }
            println!("Actions:");
            for action in bindings.action_names() {
                println!("{action:>14} <- {}", bindings.keys_for_action(action).join(", "));
            }
        }
        Commands::Run {
            ticks,
            dt,
            seed,
            config,
            manifest,
            bindings,
            max_lemmings,
            spawn_interval,
            hold,
            report_every,
        } => {
            let mut config = match config {
                Some(path) => SimConfig::load(&path)
                    .with_context(|| format!("loading config {}", path.display()))?,
                None => SimConfig::default(),
            };
            if let Some(seed) = seed {
                config.seed = seed;
            }
            if let Some(max) = max_lemmings {
                config.population.max_lemmings = max;
            }
            if let Some(interval) = spawn_interval {
                config.population.spawn_interval = interval;
            }
            let manifest = load_manifest(manifest.as_deref())?;
            let bindings = load_bindings(bindings.as_deref())?;

            let mut session = Session::new(&config, bindings, &manifest)?;
            for key in &hold {
                session.key(key, true, false);
            }

            println!("Running {ticks} frames: dt={dt}, seed={}", config.seed);
            let mut removed = 0usize;
            for frame in 1..=ticks {
                let report = session.frame(dt);
                removed += report.removed.len();
                if report_every > 0 && frame % report_every == 0 {
                    println!(
                        "[{frame:>6}] {}",
                        PopulationInspector::summary(session.population())
                    );
                }
            }

            println!("Final: {}", PopulationInspector::summary(session.population()));
            println!("Finished lemmings removed: {removed}");
            println!(
                "Frames: {} nodes={} control={:?} muted={} camera={}",
                session.frames(),
                session.scene().len(),
                session.control(),
                session.muted(),
                session.camera()
            );
            if session.debug().inspector_visible() {
                tracing::debug!(bindings = session.router().bindings().len(), "inspector open at exit");
            }
            if let Some(viewer) = session.debug().physics_viewer() {
                println!("Physics viewer showing {} bodies", viewer.shown().len());
            }
            if let Some(p) = session.player_position() {
                println!("Player at ({:.2}, {:.2}, {:.2})", p.x, p.y, p.z);
            }
            for info in PopulationInspector::list_agents(session.population(), session.physics()) {
                println!("  {info}");
            }
        }
    }

    Ok(())
}

fn load_bindings(path: Option<&Path>) -> anyhow::Result<KeyBindings> {
    let Some(path) = path else {
        return Ok(KeyBindings::wasd());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading bindings {}", path.display()))?;
    let bindings: KeyBindings = serde_yaml::from_str(&text)
        .with_context(|| format!("parsing bindings {}", path.display()))?;
    Ok(bindings)
}

fn load_manifest(path: Option<&Path>) -> anyhow::Result<MeshManifest> {
    let Some(path) = path else {
        return Ok(default_lemming_manifest());
    };
    let manifest = if path.extension().is_some_and(|ext| ext == "gltf") {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading glTF {}", path.display()))?;
        MeshManifest::from_gltf_str(&text)?
    } else {
        MeshManifest::load(path)?
    };
    Ok(manifest)
}
