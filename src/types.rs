//! Core types for hotlist-dl

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::Error;

/// A trending-list source the proxy knows about
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Platform {
    /// Xiaohongshu (小红书)
    #[serde(rename = "xhs")]
    Xhs,
    /// NetEase News (网易新闻)
    #[serde(rename = "ne-news")]
    NeNews,
    /// Zhihu (知乎)
    #[serde(rename = "zhihu")]
    Zhihu,
    /// Weibo (微博)
    #[serde(rename = "weibo")]
    Weibo,
    /// Douyin (抖音)
    #[serde(rename = "douyin")]
    Douyin,
    /// Bilibili (哔哩哔哩)
    #[serde(rename = "bilibili")]
    Bilibili,
    /// 36Kr (36氪)
    #[serde(rename = "36kr")]
    Kr36,
    /// Toutiao (今日头条)
    #[serde(rename = "toutiao")]
    Toutiao,
    /// IT Home (IT之家)
    #[serde(rename = "ithome")]
    Ithome,
}

impl Platform {
    /// Every supported platform, in CLI listing order
    pub const ALL: [Platform; 9] = [
        Platform::Xhs,
        Platform::NeNews,
        Platform::Zhihu,
        Platform::Weibo,
        Platform::Douyin,
        Platform::Bilibili,
        Platform::Kr36,
        Platform::Toutiao,
        Platform::Ithome,
    ];

    /// Short code used on the command line and in output
    pub fn code(&self) -> &'static str {
        match self {
            Platform::Xhs => "xhs",
            Platform::NeNews => "ne-news",
            Platform::Zhihu => "zhihu",
            Platform::Weibo => "weibo",
            Platform::Douyin => "douyin",
            Platform::Bilibili => "bilibili",
            Platform::Kr36 => "36kr",
            Platform::Toutiao => "toutiao",
            Platform::Ithome => "ithome",
        }
    }

    /// Tab parameter understood by the proxy; reported as `platform_name`
    pub fn tab(&self) -> &'static str {
        match self {
            Platform::Xhs => "xiaohongshu",
            other => other.code(),
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Xhs => "小红书",
            Platform::NeNews => "网易新闻",
            Platform::Zhihu => "知乎",
            Platform::Weibo => "微博",
            Platform::Douyin => "抖音",
            Platform::Bilibili => "哔哩哔哩",
            Platform::Kr36 => "36氪",
            Platform::Toutiao => "今日头条",
            Platform::Ithome => "IT之家",
        }
    }

    /// All platform codes
    pub fn codes() -> impl Iterator<Item = &'static str> {
        Self::ALL.iter().map(Platform::code)
    }

    /// Look up a platform by its code
    pub fn from_code(code: &str) -> Option<Platform> {
        Self::ALL.into_iter().find(|p| p.code() == code)
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl std::str::FromStr for Platform {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::from_code(s).ok_or_else(|| Error::UnsupportedPlatform(s.to_string()))
    }
}

/// Trend marker attached to an item by the source list
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    /// No marker
    #[default]
    Normal,
    /// Currently popular (热)
    Hot,
    /// Newly surfaced (新)
    New,
}

/// One normalized entry of a trending list
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedItem {
    /// Position in the list, starting at 1
    pub rank: u32,
    /// Cleaned title
    pub title: String,
    /// Link target
    pub url: String,
    /// Popularity magnitude, absent when the source value could not be read
    pub heat: Option<u64>,
    /// Trend marker
    pub trend: Trend,
}

/// Parsed trending list plus fetch metadata
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedEnvelope {
    /// Platform code
    pub platform: String,
    /// Platform name as used by the proxy
    pub platform_name: String,
    /// When the list was aggregated
    pub fetch_time: DateTime<Local>,
    /// Number of items
    pub count: usize,
    /// Items in source order
    #[serde(rename = "data")]
    pub items: Vec<RankedItem>,
}

impl FeedEnvelope {
    /// Whether no items were extracted
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Outcome of fetching a single resource
#[must_use]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadResult {
    /// Requested URL
    pub url: String,
    /// Whether the file was written
    pub success: bool,
    /// Reason of the last failure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Number of fetch attempts made
    pub attempts: u32,
    /// Written file, on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

/// Aggregate outcome of a batch download
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    /// Number of input URLs
    pub total: usize,
    /// Number of files written
    pub success: usize,
    /// Number of URLs that failed after all attempts
    pub failed: usize,
    /// Failed URLs in input order
    pub failed_urls: Vec<String>,
}

impl BatchReport {
    /// Fold per-URL results, given in input order, into a report
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a DownloadResult>) -> Self {
        let mut report = BatchReport::default();
        for result in results {
            report.total += 1;
            if result.success {
                report.success += 1;
            } else {
                report.failed += 1;
                report.failed_urls.push(result.url.clone());
            }
        }
        report
    }

    /// Whether every URL was downloaded
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0
    }
}
