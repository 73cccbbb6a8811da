mod command;
mod config;
mod providers;
mod render;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use tracing_subscriber::EnvFilter;
use wall::collab::{CollabError, StoryFetchService, TileDataProvider};
use wall::dispatch::Action;
use wall::engine::EngineCore;
use wall::input::WheelDelta;
use wall::layout::LayoutError;

use command::Command;
use config::{AppConfig, Cli, ConfigError, TileSource};
use providers::assets::FsAssetLoader;
use providers::labels::MetricLabelFactory;
use providers::stories::HttpStoryService;
use providers::tiles::{FileTileData, HttpTileData};
use render::LogRenderer;

/// Rendered frames between two frame summaries in the log.
const LOG_EVERY_FRAMES: u64 = 60;

#[derive(Debug, thiserror::Error)]
enum AppError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("wall build failed: {0}")]
    Layout(#[from] LayoutError),
    #[error("collaborator setup failed: {0}")]
    Collab(#[from] CollabError),
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "lockwall exited with an error");
            ExitCode::FAILURE
        }
    }
}

/// Collaborators the command loop needs after startup.
struct Host {
    tiles: Box<dyn TileDataProvider>,
    labels: MetricLabelFactory,
    stories: Option<HttpStoryService>,
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = AppConfig::from_cli(cli)?;
    let http = providers::http_client()?;
    let host = Host {
        tiles: match &config.tiles {
            TileSource::File(path) => Box::new(FileTileData::new(path)),
            TileSource::Http(base) => Box::new(HttpTileData::new(http.clone(), base)),
        },
        labels: MetricLabelFactory::new(config.font_path.clone()),
        stories: config.story_base.as_deref().map(|base| HttpStoryService::new(http.clone(), base)),
    };

    let mut engine = EngineCore::new(config.engine_config());
    engine.set_viewport(config.viewport.width, config.viewport.height);
    engine.load_models(&FsAssetLoader::new(&config.asset_root)).await?;
    let summary = engine.regenerate(host.tiles.as_ref(), &host.labels).await?;
    tracing::info!(
        tiles = summary.tiles,
        stories = summary.affordances,
        fallbacks = summary.fallbacks,
        "wall ready"
    );

    let clock = Instant::now();
    let now = || clock.elapsed().as_secs_f64() * 1000.0;

    let opening = match config.focus {
        Some(id) => engine.focus_tile(id, now()),
        None => engine.intro(now()),
    };
    match opening {
        Ok(id) => tracing::info!(tile_id = id, "opening flight"),
        Err(e) => tracing::warn!(error = %e, "no opening flight"),
    }

    let (tx, mut rx) = mpsc::channel(32);
    tokio::spawn(read_commands(tx));
    let mut stdin_open = true;

    let mut ticker = tokio::time::interval(Duration::from_millis(config.tick_ms()));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut renderer = LogRenderer::new(LOG_EVERY_FRAMES);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                engine.frame(now(), &mut renderer);
                if config.frames.is_some_and(|limit| renderer.frames() >= limit) {
                    tracing::info!(frames = renderer.frames(), "frame limit reached");
                    break;
                }
            }
            cmd = rx.recv(), if stdin_open => {
                match cmd {
                    Some(Command::Quit) => break,
                    Some(cmd) => apply(&mut engine, &host, cmd, now()).await,
                    None => {
                        stdin_open = false;
                        if config.frames.is_none() {
                            tracing::info!("stdin closed");
                            break;
                        }
                    }
                }
            }
        }
    }

    let removed = engine.destroy(&host.labels);
    tracing::info!(
        frames = renderer.frames(),
        removed,
        live_textures = host.labels.live_count(),
        "shutdown"
    );
    Ok(())
}

async fn read_commands(tx: mpsc::Sender<Command>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "stdin read failed");
                break;
            }
        };
        match Command::parse(&line) {
            Ok(Some(cmd)) => {
                if tx.send(cmd).await.is_err() {
                    break;
                }
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "ignored input"),
        }
    }
}

async fn apply(engine: &mut EngineCore, host: &Host, cmd: Command, now: f64) {
    tracing::debug!(?cmd, "command");
    let actions = match cmd {
        Command::FindStory => {
            if let Err(e) = engine.find_new_story(now) {
                tracing::debug!(error = %e, "find rejected");
            }
            Vec::new()
        }
        Command::Intro => {
            if let Err(e) = engine.intro(now) {
                tracing::debug!(error = %e, "intro rejected");
            }
            Vec::new()
        }
        Command::Goto(id) => {
            match engine.focus_tile(id, now) {
                Ok(chosen) => tracing::info!(requested = id, tile_id = chosen, "flying to story"),
                Err(e) => tracing::debug!(error = %e, "goto rejected"),
            }
            Vec::new()
        }
        Command::Cancel => {
            engine.cancel();
            Vec::new()
        }
        Command::Regenerate => {
            match engine.regenerate(host.tiles.as_ref(), &host.labels).await {
                Ok(summary) => tracing::info!(tiles = summary.tiles, stories = summary.affordances, "wall regenerated"),
                Err(e) => tracing::error!(error = %e, "regenerate failed"),
            }
            Vec::new()
        }
        Command::Wheel(dy) => {
            engine.on_wheel(WheelDelta::vertical(dy));
            Vec::new()
        }
        Command::Click(at) => {
            engine.on_pointer_down(at);
            engine.on_pointer_up();
            engine.on_click(at)
        }
        Command::Hover(at) => engine.on_pointer_move(at),
        Command::Drag { from, to } => {
            engine.on_pointer_down(from);
            let actions = engine.on_pointer_move(to);
            engine.on_pointer_up();
            actions
        }
        Command::Quit => Vec::new(),
    };
    for action in actions {
        handle_action(host, action).await;
    }
}

async fn handle_action(host: &Host, action: Action) {
    match action {
        Action::StorySelected { tile_id, tile_name } => {
            tracing::info!(tile_id, name = %tile_name, "story selected");
            let Some(stories) = &host.stories else {
                return;
            };
            match stories.fetch_story(tile_id).await {
                Ok(Some(story)) => tracing::info!(tile_id, title = %story.title, author = ?story.author, "story loaded"),
                Ok(None) => tracing::warn!(tile_id, "no story found for tile"),
                Err(e) => tracing::warn!(tile_id, error = %e, "story lookup failed"),
            }
        }
        Action::SetCursor(cursor) => tracing::debug!(cursor = cursor.as_css(), "cursor"),
        Action::HoverChanged(tile) => tracing::debug!(hovered = ?tile, "hover"),
    }
}
