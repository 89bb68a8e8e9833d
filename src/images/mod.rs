mod fetch;
mod slot;

pub use fetch::{decode_image, ImageFetcher, ProfileImage};
pub use slot::{delivery_channel, ImageDelivery, ImageLoader, ImageSlot, RowImage, SlotId};
