mod assets;
mod memory;
mod source;

pub use assets::AssetRepository;
pub use memory::StaticSource;
pub use source::FeedSource;
