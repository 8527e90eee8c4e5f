use std::collections::BTreeMap;

use crate::registry::ChannelRegistry;

/// Pagination position and accounting for one keyword.
///
/// `fetched_count` only ever grows, and `completed` is never unset once
/// reached; a resumed run trusts both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordProgress {
    /// Cursor for the next page to fetch; `None` before the first fetch and
    /// after pagination is exhausted.
    pub last_page_token: Option<String>,
    /// Cumulative items retrieved for this keyword across all runs.
    pub fetched_count: u64,
    /// Terminal flag; a completed keyword is skipped on future runs.
    pub completed: bool,
}

/// Progress for every keyword seen so far, keyed by keyword text.
///
/// A `BTreeMap` keeps serialization key order stable for reproducible state
/// file diffs.
pub type HarvestState = BTreeMap<String, KeywordProgress>;

/// What the caller should do with a keyword after one page was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDisposition {
    /// More pages remain below the result cap.
    MorePages,
    /// The keyword reached its result cap or ran out of pages.
    Completed,
}

/// Applies one fetched page to a keyword's progress and the registry.
///
/// Channel ids are merged into `registry` as derived URLs, the cumulative
/// count advances by `item_count`, and the stored cursor is replaced by
/// `next_page_token`. Completion is decided in the same mutation, so a
/// single save after this call makes the whole page durable.
pub fn apply_page(
    progress: &mut KeywordProgress,
    registry: &mut ChannelRegistry,
    channel_ids: &[String],
    item_count: u64,
    next_page_token: Option<String>,
    max_results: u64,
) -> PageDisposition {
    for channel_id in channel_ids {
        registry.insert_channel(channel_id);
    }
    progress.fetched_count += item_count;
    progress.last_page_token = next_page_token;

    if progress.fetched_count >= max_results || progress.last_page_token.is_none() {
        progress.completed = true;
        PageDisposition::Completed
    } else {
        PageDisposition::MorePages
    }
}
