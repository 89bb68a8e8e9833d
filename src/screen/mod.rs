use crate::{
    cell::VideoCell,
    comments::LocalAuthor,
    config::{AnimationConfig, Config},
    error::Error,
    feed::{FeedState, PlaybackState, PlaybackTransition},
    images::{delivery_channel, ImageDelivery, ImageFetcher, ImageLoader},
    models::Comment,
    player::MediaBackend,
    repository::FeedSource,
};
use std::collections::HashMap;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, error, info, warn};

/// Creates the platform player for each cell that gets dequeued.
pub type BackendFactory = Box<dyn Fn() -> Box<dyn MediaBackend> + Send>;

/// Outcome of the last load, so the caller can pick the right fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    NotLoaded,
    Ready,
    Missing,
    Invalid,
}

impl LoadStatus {
    fn from_error(err: &Error) -> Self {
        if err.is_not_found() {
            LoadStatus::Missing
        } else {
            LoadStatus::Invalid
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ScreenSettings {
    pub author: LocalAuthor,
    pub animation: AnimationConfig,
}

impl ScreenSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            author: LocalAuthor {
                username: config.comments.local_author.clone(),
                pic_url: config.comments.local_pic_url.clone(),
            },
            animation: config.animation.clone(),
        }
    }
}

/// Paged feed screen. Owns all view state and is driven from a single task; background
/// work only reaches it through [`FeedScreen::drain_images`].
pub struct FeedScreen {
    feed: FeedState,
    comments: Vec<Comment>,
    cells: HashMap<usize, VideoCell>,
    source: Box<dyn FeedSource>,
    backends: BackendFactory,
    loader: Option<ImageLoader>,
    deliveries: UnboundedReceiver<ImageDelivery>,
    settings: ScreenSettings,
    videos_status: LoadStatus,
    comments_status: LoadStatus,
}

impl FeedScreen {
    /// Pass `None` for `images` to keep every row on its placeholder. Image fetches run on
    /// the tokio runtime current at construction; without one, rows keep their placeholders.
    pub fn new(
        source: Box<dyn FeedSource>,
        backends: BackendFactory,
        images: Option<ImageFetcher>,
        settings: ScreenSettings,
    ) -> Self {
        let images = match (images, Handle::try_current()) {
            (Some(fetcher), Ok(runtime)) => Some((fetcher, runtime)),
            (Some(_), Err(e)) => {
                warn!("Profile images disabled, no tokio runtime: {}", e);
                None
            }
            (None, _) => None,
        };
        Self::build(source, backends, images, settings)
    }

    /// Like [`FeedScreen::new`], spawning image fetches on `runtime` explicitly.
    pub fn with_runtime(
        source: Box<dyn FeedSource>,
        backends: BackendFactory,
        images: ImageFetcher,
        settings: ScreenSettings,
        runtime: Handle,
    ) -> Self {
        Self::build(source, backends, Some((images, runtime)), settings)
    }

    fn build(
        source: Box<dyn FeedSource>,
        backends: BackendFactory,
        images: Option<(ImageFetcher, Handle)>,
        settings: ScreenSettings,
    ) -> Self {
        let (deliver, deliveries) = delivery_channel();
        let loader =
            images.map(|(fetcher, runtime)| ImageLoader::new(fetcher, deliver, runtime));

        Self {
            feed: FeedState::new(),
            comments: Vec::new(),
            cells: HashMap::new(),
            source,
            backends,
            loader,
            deliveries,
            settings,
            videos_status: LoadStatus::NotLoaded,
            comments_status: LoadStatus::NotLoaded,
        }
    }

    /// Loads videos and comments from the source. Failures are logged and leave the
    /// corresponding list empty; the first page starts playing when there is one.
    pub async fn load(&mut self) {
        info!("Loading feed from {}", self.source.name());

        // Recycle everything; cells are rebuilt against the new data.
        self.cells.clear();

        let videos = match self.source.load_videos().await {
            Ok(videos) => {
                self.videos_status = LoadStatus::Ready;
                videos
            }
            Err(e) => {
                error!("Failed to load videos: {}", e);
                self.videos_status = LoadStatus::from_error(&e);
                Vec::new()
            }
        };

        self.comments = match self.source.load_comments().await {
            Ok(comments) => {
                self.comments_status = LoadStatus::Ready;
                comments
            }
            Err(e) => {
                error!("Failed to load comments: {}", e);
                self.comments_status = LoadStatus::from_error(&e);
                Vec::new()
            }
        };

        self.feed.set_videos(videos);

        if let Some(active) = self.feed.active_index() {
            if let Some(cell) = self.dequeue(active) {
                cell.set_playback(PlaybackState::Playing);
            }
        }
    }

    /// Returns the cell for `index`, building it the first time it is displayed.
    pub fn dequeue(&mut self, index: usize) -> Option<&mut VideoCell> {
        let video = self.feed.get(index)?.clone();

        let cell = self.cells.entry(index).or_insert_with(|| {
            debug!("Dequeuing cell {}", index);
            let loader = self.loader.as_ref().map(|loader| loader.for_cell(index));
            let mut cell = VideoCell::new(
                index,
                video,
                (self.backends)(),
                self.settings.author.clone(),
                &self.settings.animation,
                loader,
            );
            cell.load_comments(self.comments.clone());
            cell
        });

        Some(cell)
    }

    /// Reports a page that became fully visible or hidden and applies the resulting
    /// playback changes to the cells.
    pub fn set_visible(&mut self, index: usize, visible: bool) {
        let transitions = self.feed.on_visibility_changed(index, visible);
        self.apply(transitions);
    }

    /// Pages the viewport to `index`: the new page plays, the previous one is hidden.
    pub fn scroll_to(&mut self, index: usize) {
        if index >= self.feed.len() {
            warn!("Cannot scroll to {} (feed has {} videos)", index, self.feed.len());
            return;
        }

        let previous = self.feed.active_index();
        self.set_visible(index, true);
        if let Some(previous) = previous.filter(|&previous| previous != index) {
            self.set_visible(previous, false);
        }
    }

    /// Discards the cell at `index`. Its player is paused and its image fetches cancelled.
    pub fn recycle(&mut self, index: usize) {
        self.set_visible(index, false);
        if let Some(mut cell) = self.cells.remove(&index) {
            cell.set_playback(PlaybackState::Paused);
            debug!("Recycled cell {}", index);
        }
    }

    fn apply(&mut self, transitions: Vec<PlaybackTransition>) {
        for transition in transitions {
            match transition.state {
                PlaybackState::Playing => {
                    if let Some(cell) = self.dequeue(transition.index) {
                        cell.set_playback(transition.state);
                    }
                }
                PlaybackState::Paused => {
                    if let Some(cell) = self.cells.get_mut(&transition.index) {
                        cell.set_playback(transition.state);
                    }
                }
            }
        }
    }

    /// Applies every image result that has arrived so far without waiting.
    pub fn drain_images(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(delivery) = self.deliveries.try_recv() {
            if self.deliver(delivery) {
                applied += 1;
            }
        }
        applied
    }

    /// Waits up to `timeout` for the next image result and applies it.
    pub async fn next_image(&mut self, timeout: Duration) -> bool {
        match tokio::time::timeout(timeout, self.deliveries.recv()).await {
            Ok(Some(delivery)) => self.deliver(delivery),
            _ => false,
        }
    }

    fn deliver(&mut self, delivery: ImageDelivery) -> bool {
        match self.cells.get_mut(&delivery.cell) {
            Some(cell) => cell.apply_image(delivery.slot, delivery.outcome),
            None => {
                debug!("Discarding image for recycled cell {}", delivery.cell);
                false
            }
        }
    }

    pub fn feed(&self) -> &FeedState {
        &self.feed
    }

    pub fn cell(&self, index: usize) -> Option<&VideoCell> {
        self.cells.get(&index)
    }

    pub fn cell_mut(&mut self, index: usize) -> Option<&mut VideoCell> {
        self.cells.get_mut(&index)
    }

    pub fn live_cells(&self) -> usize {
        self.cells.len()
    }

    pub fn videos_status(&self) -> LoadStatus {
        self.videos_status
    }

    pub fn comments_status(&self) -> LoadStatus {
        self.comments_status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images::RowImage;
    use crate::models::Video;
    use crate::player::HeadlessBackend;
    use crate::repository::{AssetRepository, StaticSource};
    use std::sync::Arc;
    use tempfile::TempDir;

    fn videos(count: usize) -> Vec<Video> {
        (0..count)
            .map(|i| Video {
                id: Some(i as i64),
                video: Some(format!("https://example.com/{i}.mp4")),
                ..Video::default()
            })
            .collect()
    }

    fn comments() -> Vec<Comment> {
        vec![Comment {
            id: Some(1),
            username: Some("a".to_string()),
            pic_url: None,
            comment: Some("hi".to_string()),
        }]
    }

    fn screen(source: Box<dyn FeedSource>) -> FeedScreen {
        FeedScreen::new(
            source,
            Box::new(|| Box::new(HeadlessBackend::new()) as Box<dyn MediaBackend>),
            None,
            ScreenSettings::default(),
        )
    }

    fn playing_cells(screen: &FeedScreen) -> Vec<usize> {
        let mut playing: Vec<usize> = (0..screen.feed().len())
            .filter(|&i| screen.cell(i).is_some_and(|cell| cell.player().is_playing()))
            .collect();
        playing.sort_unstable();
        playing
    }

    #[tokio::test]
    async fn test_load_starts_first_page() {
        let mut screen = screen(Box::new(StaticSource::new(videos(3), comments())));
        screen.load().await;

        assert_eq!(screen.videos_status(), LoadStatus::Ready);
        assert_eq!(screen.comments_status(), LoadStatus::Ready);
        assert_eq!(screen.feed().len(), 3);
        assert_eq!(playing_cells(&screen), vec![0]);
        assert_eq!(screen.cell(0).unwrap().comment_rows().len(), 1);
    }

    #[tokio::test]
    async fn test_paging_keeps_one_player_running() {
        let mut screen = screen(Box::new(StaticSource::new(videos(3), comments())));
        screen.load().await;

        screen.set_visible(1, true);
        screen.set_visible(0, false);
        assert_eq!(screen.feed().playback_state(1), PlaybackState::Playing);
        assert_eq!(screen.feed().playback_state(0), PlaybackState::Paused);
        assert_eq!(playing_cells(&screen), vec![1]);

        screen.scroll_to(2);
        assert_eq!(playing_cells(&screen), vec![2]);
        assert_eq!(screen.feed().active_index(), Some(2));

        screen.scroll_to(7);
        assert_eq!(screen.feed().active_index(), Some(2));
    }

    #[tokio::test]
    async fn test_recycle_drops_cell() {
        let mut screen = screen(Box::new(StaticSource::new(videos(3), comments())));
        screen.load().await;
        screen.scroll_to(1);
        assert_eq!(screen.live_cells(), 2);

        screen.recycle(0);
        assert!(screen.cell(0).is_none());
        assert_eq!(screen.live_cells(), 1);
        assert_eq!(playing_cells(&screen), vec![1]);

        screen.recycle(1);
        assert!(playing_cells(&screen).is_empty());
        assert_eq!(screen.feed().active_index(), None);
    }

    #[tokio::test]
    async fn test_missing_assets_leave_feed_empty() {
        let dir = TempDir::new().unwrap();
        let repo = AssetRepository::new(
            dir.path().join("video_data.json"),
            dir.path().join("comments_data.json"),
        );
        let mut screen = screen(Box::new(repo));
        screen.load().await;

        assert_eq!(screen.videos_status(), LoadStatus::Missing);
        assert_eq!(screen.comments_status(), LoadStatus::Missing);
        assert!(screen.feed().is_empty());
        assert_eq!(screen.feed().active_index(), None);
        assert_eq!(screen.live_cells(), 0);
        assert!(screen.dequeue(0).is_none());
    }

    #[tokio::test]
    async fn test_malformed_assets_are_invalid() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("video_data.json"), "{oops").unwrap();
        std::fs::write(
            dir.path().join("comments_data.json"),
            r#"{"comments": [{"id": 1, "comment": "hi"}]}"#,
        )
        .unwrap();
        let repo = AssetRepository::new(
            dir.path().join("video_data.json"),
            dir.path().join("comments_data.json"),
        );

        let mut screen = screen(Box::new(repo));
        screen.load().await;

        assert_eq!(screen.videos_status(), LoadStatus::Invalid);
        assert_eq!(screen.comments_status(), LoadStatus::Ready);
        assert!(screen.feed().is_empty());
    }

    #[tokio::test]
    async fn test_local_comment_on_active_cell() {
        let mut screen = screen(Box::new(StaticSource::new(videos(2), comments())));
        screen.load().await;

        let cell = screen.cell_mut(0).unwrap();
        assert!(cell.submit_comment("yo"));
        let rows = cell.comment_rows();
        assert_eq!(rows[0].text, "yo");
        assert!(rows[0].highlighted);
        assert_eq!(rows[1].text, "hi");
    }

    #[tokio::test]
    async fn test_failed_image_fetch_keeps_placeholder() {
        let fetcher = ImageFetcher::new(Duration::from_secs(1)).unwrap();
        let mut source_videos = videos(2);
        source_videos[1].profile_pic_url = Some("not a url".to_string());

        let mut screen = FeedScreen::new(
            Box::new(StaticSource::new(source_videos, Vec::new())),
            Box::new(|| Box::new(HeadlessBackend::new()) as Box<dyn MediaBackend>),
            Some(fetcher),
            ScreenSettings::default(),
        );
        screen.load().await;
        screen.scroll_to(1);

        // The invalid URL fails fast and keeps the placeholder.
        assert!(screen.next_image(Duration::from_secs(2)).await);
        assert!(matches!(
            screen.cell(1).unwrap().avatar(),
            RowImage::Placeholder
        ));
        assert_eq!(screen.drain_images(), 0);
    }

    fn image_screen(videos: Vec<Video>, fetcher: ImageFetcher) -> FeedScreen {
        FeedScreen::new(
            Box::new(StaticSource::new(videos, Vec::new())),
            Box::new(|| Box::new(HeadlessBackend::new()) as Box<dyn MediaBackend>),
            Some(fetcher),
            ScreenSettings::default(),
        )
    }

    #[test]
    fn test_scroll_from_outside_the_runtime() {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        let mut source_videos = videos(2);
        for video in &mut source_videos {
            video.profile_pic_url = Some("not a url".to_string());
        }

        let mut screen = rt.block_on(async {
            let fetcher = ImageFetcher::new(Duration::from_secs(1)).unwrap();
            let mut screen = image_screen(source_videos, fetcher);
            screen.load().await;
            screen
        });

        // Called from the plain test thread, outside `block_on`.
        screen.scroll_to(1);
        assert_eq!(playing_cells(&screen), vec![1]);

        assert!(rt.block_on(screen.next_image(Duration::from_secs(2))));
        assert!(matches!(
            screen.cell(1).unwrap().avatar(),
            RowImage::Placeholder
        ));
    }

    #[test]
    fn test_new_without_runtime_disables_images() {
        let fetcher = ImageFetcher::new(Duration::from_secs(1)).unwrap();
        let mut source_videos = videos(1);
        source_videos[0].profile_pic_url = Some("https://example.com/a.png".to_string());

        let mut screen = image_screen(source_videos, fetcher);
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(screen.load());

        assert_eq!(playing_cells(&screen), vec![0]);
        assert!(!screen.cell(0).unwrap().avatar().is_loaded());
        assert_eq!(screen.drain_images(), 0);
    }

    #[tokio::test]
    async fn test_recycled_cell_never_receives_stale_images() {
        // Holds every connection open, so real fetches never complete.
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = reqwest::Client::builder().no_proxy().build().unwrap();
        let mut source_videos = videos(2);
        source_videos[1].profile_pic_url = Some(format!("http://{addr}/avatar.png"));
        let mut screen = image_screen(source_videos, ImageFetcher::with_client(client));
        screen.load().await;

        screen.scroll_to(1);
        let stale = screen.cell(1).unwrap().avatar_slot();
        let image = Arc::new(image::RgbaImage::new(1, 1));

        screen.recycle(1);
        assert!(!screen.deliver(ImageDelivery {
            cell: 1,
            slot: stale,
            outcome: Ok(image.clone()),
        }));

        screen.dequeue(1);
        assert_ne!(screen.cell(1).unwrap().avatar_slot(), stale);
        assert!(!screen.deliver(ImageDelivery {
            cell: 1,
            slot: stale,
            outcome: Ok(image),
        }));
        assert!(matches!(
            screen.cell(1).unwrap().avatar(),
            RowImage::Placeholder
        ));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(screen.drain_images(), 0);
    }

    #[tokio::test]
    async fn test_reload_replaces_state() {
        let mut screen = screen(Box::new(StaticSource::new(videos(3), comments())));
        screen.load().await;
        screen.scroll_to(2);

        screen.load().await;
        assert_eq!(screen.feed().active_index(), Some(2));
        assert_eq!(playing_cells(&screen), vec![2]);
        assert_eq!(screen.live_cells(), 1);
    }
}
