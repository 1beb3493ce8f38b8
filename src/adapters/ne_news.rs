//! NetEase News grammar
//!
//! ```text
//! * [![Image 3](https://cms-bucket.ws.126.net/a.jpg)](https://c.m.163.com/news/a/JH1.html) [标题](https://c.m.163.com/news/a/JH1.html "标题")摘要
//! 来源 1234人跟贴
//! ```
//!
//! Each title link owns the text up to the next title link. The comment count is only looked
//! up inside that span, so a missing count can never shift counts onto neighbouring items.

use super::{PlatformAdapter, strip_trailing_dashes};
use crate::heat::parse_heat;
use crate::types::{RankedItem, Trend};
use regex::Regex;
use std::sync::LazyLock;

/// Titles shorter than this are image or icon links, not headlines
const MIN_TITLE_CHARS: usize = 5;

#[allow(clippy::expect_used)]
static TITLE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"\[([^\]]+)\]\((https://c\.m\.163\.com/news/a/[^)\s]+)(?:\s+"[^"]*")?\)"#)
        .expect("title pattern is valid")
});

#[allow(clippy::expect_used)]
static COMMENTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"([\d.]+(?:万|[wW])?)\s*人跟贴").expect("comment pattern is valid")
});

/// Headline links followed by a comment count
#[derive(Debug, Clone, Copy, Default)]
pub struct NeNewsAdapter;

impl PlatformAdapter for NeNewsAdapter {
    fn name(&self) -> &'static str {
        "ne-news"
    }

    fn extract(&self, text: &str, limit: usize) -> Vec<RankedItem> {
        let mut items = Vec::new();
        let mut links = TITLE.captures_iter(text).peekable();

        while items.len() < limit {
            let Some(caps) = links.next() else { break };
            let raw_title = caps[1].trim();
            if is_placeholder(raw_title) {
                continue;
            }
            let title = strip_trailing_dashes(raw_title);
            if title.is_empty() {
                continue;
            }

            let span_start = caps.get(0).map_or(0, |m| m.end());
            let span_end = links
                .peek()
                .and_then(|next| next.get(0))
                .map_or(text.len(), |m| m.start());
            let heat = comment_count(&text[span_start..span_end]);
            if heat.is_none() {
                tracing::debug!(title, "no comment count next to headline");
            }

            items.push(RankedItem {
                rank: items.len() as u32 + 1,
                title: title.to_string(),
                url: caps[2].to_string(),
                heat,
                trend: Trend::Normal,
            });
        }

        items
    }
}

fn is_placeholder(title: &str) -> bool {
    title.contains("Image") || title.chars().count() < MIN_TITLE_CHARS
}

fn comment_count(span: &str) -> Option<u64> {
    let caps = COMMENTS.captures(span)?;
    parse_heat(&caps[1])
}
