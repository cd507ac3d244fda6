#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Lone Tower experience.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use glam::Vec2;
use lone_tower_core::GAME_TITLE;
use lone_tower_rendering::{Color, Hud, Presentation, RenderingBackend, Scene, UpgradeFeedback};
use lone_tower_rendering_macroquad::MacroquadBackend;
use lone_tower_session::{Session, SessionConfig, SessionStats};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lone-tower")]
#[command(about = "Defend a single tower against endless waves")]
struct Args {
    /// TOML file overriding the default tuning
    #[arg(long)]
    config: Option<PathBuf>,

    /// Seed for wave placement, overriding the configuration
    #[arg(long)]
    seed: Option<u64>,

    /// Simulate this many frames without a window and print statistics as JSON
    #[arg(long, value_name = "TICKS")]
    headless: Option<u32>,

    /// Synchronise presentation with the display refresh rate
    #[arg(long)]
    vsync: bool,

    /// Log frame rate metrics once per second
    #[arg(long)]
    show_fps: bool,

    /// Log filter directive, e.g. `debug` or `lone_tower_session=debug`
    #[arg(long)]
    log_filter: Option<String>,
}

/// Entry point for the Lone Tower command-line interface.
fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(&args)?;

    let config = load_config(&args)?;

    match args.headless {
        Some(ticks) => {
            let stats = run_headless(config, ticks)?;
            let json =
                serde_json::to_string_pretty(&stats).context("failed to serialise statistics")?;
            println!("{json}");
            Ok(())
        }
        None => run_windowed(config, &args),
    }
}

fn init_tracing(args: &Args) -> Result<()> {
    let filter = match &args.log_filter {
        Some(directive) => EnvFilter::try_new(directive)
            .with_context(|| format!("invalid log filter `{directive}`"))?,
        None => EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(default_filter(args.show_fps))),
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();
    Ok(())
}

fn default_filter(show_fps: bool) -> &'static str {
    if show_fps {
        "info,lone_tower_rendering_macroquad=debug"
    } else {
        "info"
    }
}

fn load_config(args: &Args) -> Result<SessionConfig> {
    let mut config = match &args.config {
        Some(path) => SessionConfig::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => SessionConfig::default(),
    };

    if let Some(seed) = args.seed {
        config.waves.seed = seed;
    }

    Ok(config)
}

fn run_headless(config: SessionConfig, ticks: u32) -> Result<SessionStats> {
    let mut session = Session::new(config).context("invalid session configuration")?;

    for _ in 0..ticks {
        let _ = session.update();
        if session.status().game_over {
            break;
        }
    }

    let status = session.status();
    let stats = session.stats();
    info!(
        tick = status.tick,
        wave = status.wave,
        game_over = status.game_over,
        kills = stats.enemies_killed,
        accuracy = stats.accuracy().unwrap_or(0.0),
        "headless run finished"
    );

    Ok(session.stats().clone())
}

fn run_windowed(config: SessionConfig, args: &Args) -> Result<()> {
    let mut session = Session::new(config).context("invalid session configuration")?;
    let presentation = presentation(&session);

    let mut backend = MacroquadBackend::new().with_show_fps(args.show_fps);
    if args.vsync {
        backend = backend.with_vsync(true);
    }

    backend.run(presentation, move |dt, input, scene| {
        scene.feedback = scene
            .feedback
            .and_then(|mut feedback| feedback.tick().then_some(feedback));

        if input.reset {
            session.reset();
        }
        if input.toggle_pause {
            let _ = session.toggle_pause();
        }
        if let Some(kind) = input.upgrade {
            scene.feedback = Some(UpgradeFeedback::new(kind, session.upgrade(kind)));
        }

        let _ = session.advance(dt);
        scene.refresh(capture_scene(&session));
    })
}

fn presentation(session: &Session) -> Presentation {
    Presentation::new(
        GAME_TITLE,
        Color::from_rgb_u8(16, 16, 22),
        capture_scene(session),
    )
}

fn capture_scene(session: &Session) -> Scene {
    let arena = &session.tuning().arena;
    let tower = session.tower();
    let hud = Hud::new(&session.status(), &tower, session.upgrade_costs());

    Scene::capture(
        Vec2::new(arena.width, arena.height),
        &tower,
        &session.enemies(),
        &session.projectiles(),
        hud,
    )
}
