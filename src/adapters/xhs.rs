//! Rank / title / heat block grammar
//!
//! ```text
//! *   1
//! [棋圣聂卫平病逝 新 ----------](https://www.xiaohongshu.com/search_result?keyword=%E6%A3%8B... "棋圣聂卫平病逝")
//! 948.1w
//! ```

use super::{PlatformAdapter, strip_trailing_dashes};
use crate::heat::parse_heat;
use crate::types::{RankedItem, Trend};
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static ITEM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\*\s+(\d+)\s*\n\[([^\]]+)\]\((\S+?)(?:\s+"[^"]*")?\)\s*\n\s*([\d.]+(?:千万|[wW万千kK])?)"#,
    )
    .expect("item pattern is valid")
});

#[allow(clippy::expect_used)]
static KEYWORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"keyword=([^&#\s]+)").expect("keyword pattern is valid"));

#[allow(clippy::expect_used)]
static NEW_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+新\s*-*$").expect("new marker pattern is valid"));

#[allow(clippy::expect_used)]
static HOT_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+热\s*-*$").expect("hot marker pattern is valid"));

/// Default grammar: one item per three-line block
#[derive(Debug, Clone, Copy, Default)]
pub struct XhsAdapter;

impl PlatformAdapter for XhsAdapter {
    fn name(&self) -> &'static str {
        "xhs"
    }

    fn extract(&self, text: &str, limit: usize) -> Vec<RankedItem> {
        ITEM.captures_iter(text)
            .filter_map(|caps| {
                let rank: u32 = caps[1].parse().ok().filter(|&rank| rank > 0)?;
                let url = caps[3].trim();
                let (trend, title) = split_trend(caps[2].trim());
                let title = keyword_title(url)
                    .unwrap_or_else(|| strip_trailing_dashes(title).to_string());
                if title.is_empty() {
                    return None;
                }

                Some(RankedItem {
                    rank,
                    title,
                    url: url.to_string(),
                    heat: parse_heat(&caps[4]),
                    trend,
                })
            })
            .take(limit)
            .collect()
    }
}

/// Detect a trend marker and strip it when it trails the title
fn split_trend(title: &str) -> (Trend, &str) {
    let markers: [(&Regex, &str, Trend); 2] = [
        (&*NEW_SUFFIX, " 新 ", Trend::New),
        (&*HOT_SUFFIX, " 热 ", Trend::Hot),
    ];

    for (suffix, inner, trend) in markers {
        if let Some(found) = suffix.find(title) {
            return (trend, &title[..found.start()]);
        }
        if title.contains(inner) {
            return (trend, title);
        }
    }
    (Trend::Normal, title)
}

/// Search-redirect links carry the real topic in `keyword=`
fn keyword_title(url: &str) -> Option<String> {
    let encoded = KEYWORD.captures(url)?.get(1)?.as_str();
    match urlencoding::decode(encoded) {
        Ok(decoded) => {
            let decoded = decoded.trim();
            (!decoded.is_empty()).then(|| decoded.to_string())
        }
        Err(e) => {
            tracing::debug!(url, error = %e, "keyword is not valid UTF-8, keeping link text");
            None
        }
    }
}
