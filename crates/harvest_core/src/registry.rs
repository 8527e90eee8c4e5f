use std::collections::BTreeSet;

/// Base under which channel pages live; channel ids are appended verbatim.
pub const CHANNEL_URL_BASE: &str = "https://www.youtube.com/channel";

/// Derives the channel URL for a channel id.
pub fn channel_url(channel_id: &str) -> String {
    format!("{CHANNEL_URL_BASE}/{channel_id}")
}

/// Deduplicated set of discovered channel URLs.
///
/// Dedup is by exact string match; iteration is lexicographic, which is the
/// order the persisted output format requires.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChannelRegistry {
    urls: BTreeSet<String>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a registry from previously persisted URLs.
    pub fn from_urls<I>(urls: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        Self {
            urls: urls.into_iter().collect(),
        }
    }

    /// Inserts the derived URL for `channel_id`; returns false when the
    /// channel was already known.
    pub fn insert_channel(&mut self, channel_id: &str) -> bool {
        self.urls.insert(channel_url(channel_id))
    }

    pub fn contains(&self, url: &str) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// URLs in lexicographic order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.urls.iter().map(String::as_str)
    }
}
