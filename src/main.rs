use anyhow::{Context, Result};
use clap::Parser;
use reelfeed::{
    config::Config,
    images::ImageFetcher,
    player::{HeadlessBackend, MediaBackend, PlayerEvent},
    repository::AssetRepository,
    screen::{FeedScreen, ScreenSettings},
};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{info, warn};
use tracing_subscriber::filter::{EnvFilter, LevelFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the config file
    #[arg(short, long)]
    config: Option<String>,

    /// Directory holding video_data.json and comments_data.json
    #[arg(short, long)]
    assets: Option<PathBuf>,

    /// Number of pages to swipe through
    #[arg(short, long, default_value_t = 3)]
    pages: usize,

    /// Comment to post on the first page
    #[arg(long)]
    comment: Option<String>,
}

fn get_config_path(args: &Args) -> Option<String> {
    if let Some(path) = &args.config {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var("CONFIG_FILE") {
        return Some(path);
    }

    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        let config_path = format!("{}/reelfeed/config.toml", xdg_config_home);
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let config_path = format!("{}/.config/reelfeed/config.toml", home.display());
        if std::path::Path::new(&config_path).exists() {
            return Some(config_path);
        }
    }

    None
}

fn load_config(args: &Args) -> Result<Config> {
    let mut config = match get_config_path(args) {
        Some(path) => Config::from_file(&path)
            .with_context(|| format!("Failed to load config from {}", path))?,
        None => Config::default(),
    };

    if let Some(dir) = &args.assets {
        config.assets.dir = dir.clone();
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = load_config(&args)?;

    let env_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    if config.get_logging_format() == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(env_filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    info!("Starting reelfeed preview...");
    info!("Reading assets from: {}", config.assets.dir.display());

    let fetcher = ImageFetcher::new(config.image_timeout())
        .context("Failed to initialize image fetcher")?;

    let mut screen = FeedScreen::new(
        Box::new(AssetRepository::from_config(&config.assets)),
        Box::new(|| Box::new(HeadlessBackend::new()) as Box<dyn MediaBackend>),
        Some(fetcher),
        ScreenSettings::from_config(&config),
    );

    screen.load().await;

    if screen.feed().is_empty() {
        warn!(
            "Feed is empty (videos: {:?}, comments: {:?})",
            screen.videos_status(),
            screen.comments_status()
        );
        return Ok(());
    }

    if let Some(text) = &args.comment {
        if let Some(cell) = screen.dequeue(0) {
            if cell.submit_comment(text) {
                info!("Posted comment on video 0");
            }
        }
    }

    let pages = args.pages.min(screen.feed().len());
    for index in 0..pages {
        screen.scroll_to(index);

        if let Some(cell) = screen.cell_mut(index) {
            let video = cell.video();
            info!(
                index,
                username = video.display_username(),
                topic = video.display_topic(),
                viewers = %cell.viewers_label(),
                likes = %cell.likes_label(),
                playing = cell.player().is_playing(),
                "Showing video"
            );

            cell.handle_player_event(PlayerEvent::ReachedEnd);
            cell.on_double_tap(Instant::now());

            for row in cell.comment_rows() {
                info!(
                    highlighted = row.highlighted,
                    avatar = row.image.is_loaded(),
                    "{}: {}",
                    row.username,
                    row.text
                );
            }
            cell.mark_rendered();
        }

        while screen.next_image(Duration::from_millis(500)).await {}
        screen.drain_images();

        if index > 0 {
            screen.recycle(index - 1);
        }
    }

    info!("Preview finished with {} live cells", screen.live_cells());
    Ok(())
}
