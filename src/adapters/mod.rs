//! Per-platform extraction grammars
//!
//! The proxy renders every trending list as markdown-like text, but the layout differs per
//! platform. A [`PlatformAdapter`] knows one layout and turns raw text into [`RankedItem`]s.
//! Text that does not fit the grammar is skipped; extraction never fails.

mod ne_news;
mod xhs;

pub use ne_news::NeNewsAdapter;
pub use xhs::XhsAdapter;

use crate::types::{Platform, RankedItem};

/// Extracts ranked items from one platform's raw text
///
/// # Examples
///
/// ```
/// use hotlist_dl::adapters::{PlatformAdapter, XhsAdapter};
///
/// let text = "*   1\n[标题](https://example.com/a)\n12w\n";
/// let items = XhsAdapter.extract(text, 10);
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].heat, Some(120_000));
/// ```
pub trait PlatformAdapter: Send + Sync {
    /// Short name of the grammar, for logs
    fn name(&self) -> &'static str;

    /// Extract at most `limit` items, in source order
    fn extract(&self, text: &str, limit: usize) -> Vec<RankedItem>;
}

static XHS: XhsAdapter = XhsAdapter;
static NE_NEWS: NeNewsAdapter = NeNewsAdapter;

/// Pick the grammar for a platform
///
/// NetEase News has its own layout; every other platform uses the rank/title/heat block
/// layout first seen on Xiaohongshu.
pub fn adapter_for(platform: Platform) -> &'static dyn PlatformAdapter {
    match platform {
        Platform::NeNews => &NE_NEWS,
        _ => &XHS,
    }
}

/// Extract items for a platform given by code
///
/// An unknown code yields no items.
pub fn extract_for_code(code: &str, text: &str, limit: usize) -> Vec<RankedItem> {
    match Platform::from_code(code) {
        Some(platform) => adapter_for(platform).extract(text, limit),
        None => {
            tracing::warn!(platform = code, "no adapter for platform, returning no items");
            Vec::new()
        }
    }
}

/// Remove a trailing run of `-` and the whitespace around it
pub(crate) fn strip_trailing_dashes(title: &str) -> &str {
    title.trim_end_matches('-').trim()
}
