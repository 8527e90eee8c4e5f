//! Harvest core: pure keyword progress tracking, credential rotation and
//! the channel registry.
mod progress;
mod registry;
mod rotation;

pub use progress::{apply_page, HarvestState, KeywordProgress, PageDisposition};
pub use registry::{channel_url, ChannelRegistry, CHANNEL_URL_BASE};
pub use rotation::next_key;
