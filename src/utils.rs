//! Utility functions for URL and file name handling

use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

#[allow(clippy::expect_used)]
static INDEX_SLOT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{0?(?::(0?)(\d*)d?)?\}").expect("index slot pattern is valid")
});

/// Derive a file extension from a resource URL
///
/// The query string and fragment are ignored, as is everything but the last path segment.
/// When the segment has no extension, or the extension is longer than `max_len` or contains
/// anything but ASCII letters and digits, `default` is returned. Extensions are lower-cased.
///
/// # Examples
///
/// ```
/// use hotlist_dl::utils::extension_from_url;
///
/// assert_eq!(extension_from_url("https://cdn.example.com/a/photo.JPG?w=640", "bin", 5), "jpg");
/// assert_eq!(extension_from_url("https://cdn.example.com/a/photo", "bin", 5), "bin");
/// assert_eq!(extension_from_url("c.verylongext", "bin", 5), "bin");
/// ```
#[must_use]
pub fn extension_from_url(url: &str, default: &str, max_len: usize) -> String {
    let path = match url::Url::parse(url) {
        Ok(parsed) => parsed.path().to_string(),
        // Relative or otherwise unparsable input: cut at the query/fragment by hand
        Err(_) => url.split(['?', '#']).next().unwrap_or_default().to_string(),
    };

    let segment = path.rsplit('/').next().unwrap_or_default();
    segment
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| {
            !ext.is_empty()
                && ext.chars().count() <= max_len
                && ext.chars().all(|c| c.is_ascii_alphanumeric())
        })
        .map_or_else(|| default.to_string(), str::to_ascii_lowercase)
}

/// Fill the index slot of a file name template
///
/// The template must contain exactly one slot: `{}`, `{:d}`, `{:3}` (space padded) or
/// `{:03d}` (zero padded). The positional forms `{0}` and `{0:03d}` are accepted too. The
/// result is a bare file name, so path separators and `..` are rejected.
///
/// # Examples
///
/// ```
/// use hotlist_dl::utils::render_index_template;
///
/// assert_eq!(render_index_template("file_{:03d}", 7).unwrap(), "file_007");
/// assert_eq!(render_index_template("image_{}", 12).unwrap(), "image_12");
/// assert_eq!(render_index_template("image_{0:02d}", 3).unwrap(), "image_03");
/// assert!(render_index_template("no_slot", 1).is_err());
/// assert!(render_index_template("../file_{}", 1).is_err());
/// ```
pub fn render_index_template(template: &str, index: usize) -> Result<String> {
    if template.contains(['/', '\\']) || template.contains("..") {
        return Err(Error::InvalidTemplate(format!(
            "'{}' must be a file name without path separators or '..'",
            template
        )));
    }

    let mut slots = INDEX_SLOT.captures_iter(template);
    let caps = slots.next().ok_or_else(|| {
        Error::InvalidTemplate(format!("'{}' has no index slot such as {{:03d}}", template))
    })?;
    if slots.next().is_some() {
        return Err(Error::InvalidTemplate(format!(
            "'{}' has more than one index slot",
            template
        )));
    }

    // Both groups sit inside the optional format spec, so `{}` leaves them unset
    let zero_pad = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
    let width_digits = caps.get(2).map_or("", |m| m.as_str());
    let width: usize = if width_digits.is_empty() {
        0
    } else {
        width_digits
            .parse()
            .map_err(|_| Error::InvalidTemplate(format!("'{}' has an unusable width", template)))?
    };
    let rendered = if zero_pad {
        format!("{:0width$}", index, width = width)
    } else {
        format!("{:>width$}", index, width = width)
    };

    let slot = caps.get(0).map_or(0..0, |m| m.range());
    let mut name = String::with_capacity(template.len() + rendered.len());
    name.push_str(&template[..slot.start]);
    name.push_str(&rendered);
    name.push_str(&template[slot.end..]);
    Ok(name)
}
