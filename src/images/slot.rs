use super::fetch::{ImageFetcher, ProfileImage};
use crate::error::Result;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::runtime::Handle;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tracing::debug;

static NEXT_SLOT_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one bound image slot. Rebinding or recycling a row yields a fresh id, so
/// results addressed to the old one are discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(u64);

impl SlotId {
    fn next() -> Self {
        Self(NEXT_SLOT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Default)]
pub enum RowImage {
    #[default]
    Placeholder,
    Loaded(ProfileImage),
}

impl RowImage {
    pub fn is_loaded(&self) -> bool {
        matches!(self, RowImage::Loaded(_))
    }
}

/// Completed fetch travelling back to the owner of the view state.
#[derive(Debug)]
pub struct ImageDelivery {
    pub cell: usize,
    pub slot: SlotId,
    pub outcome: Result<ProfileImage>,
}

pub fn delivery_channel() -> (
    UnboundedSender<ImageDelivery>,
    UnboundedReceiver<ImageDelivery>,
) {
    tokio::sync::mpsc::unbounded_channel()
}

/// Issues fire-and-forget fetches on behalf of one cell.
///
/// Tasks run on the runtime the loader was built with, so requests may come from a thread
/// that is not itself inside that runtime.
#[derive(Clone)]
pub struct ImageLoader {
    fetcher: ImageFetcher,
    deliver: UnboundedSender<ImageDelivery>,
    runtime: Handle,
    cell: usize,
}

impl ImageLoader {
    pub fn new(
        fetcher: ImageFetcher,
        deliver: UnboundedSender<ImageDelivery>,
        runtime: Handle,
    ) -> Self {
        Self {
            fetcher,
            deliver,
            runtime,
            cell: 0,
        }
    }

    pub fn for_cell(&self, cell: usize) -> Self {
        Self {
            cell,
            ..self.clone()
        }
    }

    /// Binds a new slot and starts fetching `url` into it. Missing or blank URLs leave the
    /// slot on its placeholder without spawning anything.
    pub fn request(&self, url: Option<&str>) -> ImageSlot {
        let mut slot = ImageSlot::placeholder();

        let Some(url) = url.map(str::trim).filter(|url| !url.is_empty()) else {
            return slot;
        };

        let fetcher = self.fetcher.clone();
        let deliver = self.deliver.clone();
        let delivery_slot = slot.id;
        let cell = self.cell;
        let url = url.to_string();

        slot.task = Some(self.runtime.spawn(async move {
            let outcome = fetcher.fetch(&url).await;
            // The receiver is gone once the screen is torn down.
            let _ = deliver.send(ImageDelivery {
                cell,
                slot: delivery_slot,
                outcome,
            });
        }));

        slot
    }
}

/// Image shown next to one row. Dropping the slot aborts its in-flight fetch.
#[derive(Debug)]
pub struct ImageSlot {
    id: SlotId,
    image: RowImage,
    task: Option<JoinHandle<()>>,
}

impl ImageSlot {
    pub fn placeholder() -> Self {
        Self {
            id: SlotId::next(),
            image: RowImage::Placeholder,
            task: None,
        }
    }

    pub fn id(&self) -> SlotId {
        self.id
    }

    pub fn image(&self) -> &RowImage {
        &self.image
    }

    pub fn is_pending(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Applies a finished fetch. Failures keep the placeholder.
    pub fn apply(&mut self, outcome: Result<ProfileImage>) {
        self.task = None;
        match outcome {
            Ok(image) => self.image = RowImage::Loaded(image),
            Err(e) => debug!("Keeping placeholder for slot {:?}: {}", self.id, e),
        }
    }
}

impl Drop for ImageSlot {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
