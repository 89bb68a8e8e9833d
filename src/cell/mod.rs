mod heart;

pub use heart::{HeartAnimation, HeartFrame};

use crate::{
    comments::{CommentOrigin, CommentState, LocalAuthor},
    config::AnimationConfig,
    error::{Error, Result},
    feed::PlaybackState,
    images::{ImageLoader, ImageSlot, ProfileImage, RowImage, SlotId},
    models::{Comment, Video},
    player::{LoopingPlayer, MediaBackend, PlayerEvent},
};
use std::time::Instant;
use tracing::{debug, info};

/// What the list UI needs to draw one comment row.
#[derive(Debug)]
pub struct CommentRowView<'a> {
    pub username: &'a str,
    pub text: &'a str,
    pub image: &'a RowImage,
    pub highlighted: bool,
    pub origin: CommentOrigin,
}

/// One page of the feed: the video, its player, the comment list and the gestures on top.
pub struct VideoCell {
    index: usize,
    video: Video,
    player: LoopingPlayer,
    comments: CommentState,
    avatar: ImageSlot,
    comment_images: Vec<ImageSlot>,
    hearts: HeartAnimation,
    loader: Option<ImageLoader>,
}

impl VideoCell {
    pub fn new(
        index: usize,
        video: Video,
        backend: Box<dyn MediaBackend>,
        author: LocalAuthor,
        animation: &AnimationConfig,
        loader: Option<ImageLoader>,
    ) -> Self {
        let player = LoopingPlayer::new(backend, video.video.as_deref());
        let avatar = Self::request_image(&loader, video.profile_pic_url.as_deref());

        Self {
            index,
            video,
            player,
            comments: CommentState::new(author),
            avatar,
            comment_images: Vec::new(),
            hearts: HeartAnimation::from_config(animation),
            loader,
        }
    }

    fn request_image(loader: &Option<ImageLoader>, url: Option<&str>) -> ImageSlot {
        match loader {
            Some(loader) => loader.request(url),
            None => ImageSlot::placeholder(),
        }
    }

    pub fn load_comments(&mut self, comments: Vec<Comment>) {
        // Old slots are dropped here, which cancels their fetches.
        self.comment_images = comments
            .iter()
            .map(|comment| Self::request_image(&self.loader, comment.pic_url.as_deref()))
            .collect();
        self.comments.load(comments);
    }

    /// Echoes the user's comment at the top of the list. Blank input is dropped quietly.
    pub fn submit_comment(&mut self, text: &str) -> bool {
        match self.comments.append_local(text) {
            Ok(comment) => {
                let slot = Self::request_image(&self.loader, comment.pic_url.as_deref());
                self.comment_images.insert(0, slot);
                true
            }
            Err(Error::EmptyInput) => {
                debug!("Ignoring empty comment on video {}", self.index);
                false
            }
            Err(e) => {
                debug!("Comment rejected on video {}: {}", self.index, e);
                false
            }
        }
    }

    /// Rows in display order. Call [`VideoCell::mark_rendered`] once they have been drawn.
    pub fn comment_rows(&self) -> Vec<CommentRowView<'_>> {
        self.comments
            .rows()
            .iter()
            .zip(&self.comment_images)
            .enumerate()
            .map(|(i, (row, slot))| CommentRowView {
                username: row.comment.display_username(),
                text: row.comment.text(),
                image: slot.image(),
                highlighted: self.comments.is_highlighted(i),
                origin: row.origin,
            })
            .collect()
    }

    /// The highlighted row is shown once; drawing it clears the mark.
    pub fn mark_rendered(&mut self) {
        self.comments.clear_highlight();
    }

    pub fn set_playback(&mut self, state: PlaybackState) {
        match state {
            PlaybackState::Playing => self.player.play(),
            PlaybackState::Paused => self.player.pause(),
        }
    }

    pub fn on_tap(&mut self) -> bool {
        self.player.toggle()
    }

    pub fn on_double_tap(&mut self, now: Instant) -> bool {
        self.hearts.spawn(now);
        info!("Liked video {}", self.index);
        self.player.toggle()
    }

    pub fn handle_player_event(&mut self, event: PlayerEvent) {
        self.player.handle_event(event);
    }

    pub fn tick(&mut self, now: Instant) -> Vec<HeartFrame> {
        self.hearts.tick(now)
    }

    /// Routes a finished fetch to the slot it was issued for. Returns `false` when the
    /// slot no longer exists.
    pub fn apply_image(&mut self, slot: SlotId, outcome: Result<ProfileImage>) -> bool {
        let target = std::iter::once(&mut self.avatar)
            .chain(self.comment_images.iter_mut())
            .find(|candidate| candidate.id() == slot);

        match target {
            Some(target) => {
                target.apply(outcome);
                true
            }
            None => false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn video(&self) -> &Video {
        &self.video
    }

    pub fn player(&self) -> &LoopingPlayer {
        &self.player
    }

    pub fn comments(&self) -> &CommentState {
        &self.comments
    }

    pub fn avatar(&self) -> &RowImage {
        self.avatar.image()
    }

    pub fn avatar_slot(&self) -> SlotId {
        self.avatar.id()
    }

    pub fn comment_slot(&self, row: usize) -> Option<SlotId> {
        self.comment_images.get(row).map(ImageSlot::id)
    }

    pub fn viewers_label(&self) -> String {
        self.video.viewers_label()
    }

    pub fn likes_label(&self) -> String {
        self.video.likes_label()
    }
}
