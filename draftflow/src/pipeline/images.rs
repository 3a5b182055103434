//! Image path normalization and in-body image injection.

use serde::{Deserialize, Serialize};

use crate::core::ImageAsset;
use crate::errors::ContractViolation;
use crate::text::{collapse_whitespace, parse_heading, strip_markdown};

/// Where stored images are served from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Public path prefix of the image store, e.g. `/images/`.
    pub storage_prefix: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            storage_prefix: "/images/".to_string(),
        }
    }
}

/// Rewrites a stored image path so it lives under `prefix`.
///
/// Backslashes become slashes, paths that contain the storage directory are
/// re-rooted at it, and bare relative paths are prefixed. Anything that
/// cannot be made to conform is a contract violation: an empty path, a URL,
/// a `..` segment, or an absolute path outside the store.
pub fn normalize_image_path(path: &str, prefix: &str) -> Result<String, ContractViolation> {
    let violation = |detail: String| ContractViolation::new("image_path", detail);

    let path = path.trim().replace('\\', "/");
    if path.is_empty() {
        return Err(violation("empty image path".to_string()));
    }
    if path.contains("://") || path.starts_with("data:") {
        return Err(violation(format!("'{path}' is not a local storage path")));
    }
    if path.split('/').any(|segment| segment == "..") {
        return Err(violation(format!("'{path}' escapes the storage directory")));
    }

    let segment = prefix.trim_matches('/');
    let root = if segment.is_empty() {
        "/".to_string()
    } else {
        format!("/{segment}/")
    };

    let normalized = if segment.is_empty() {
        format!("/{}", path.trim_start_matches('/'))
    } else if path.starts_with(&root) {
        path.clone()
    } else if let Some(rest) = path.strip_prefix(&root[1..]) {
        format!("{root}{rest}")
    } else if let Some(at) = path.find(&root) {
        format!("{root}{}", &path[at + root.len()..])
    } else if path.starts_with('/') || path.get(1..3) == Some(":/") {
        return Err(violation(format!("'{path}' is outside the storage prefix '{root}'")));
    } else {
        format!("{root}{}", path.trim_start_matches("./"))
    };

    Ok(squeeze_slashes(&normalized))
}

fn squeeze_slashes(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    for c in path.chars() {
        if c == '/' && out.ends_with('/') {
            continue;
        }
        out.push(c);
    }
    out
}

/// Inserts `![alt](path)` right after the level-2 heading each image
/// belongs to.
///
/// Hero images, images without a path, images whose heading is missing and
/// images already referenced in the body are skipped.
pub fn inject_images(
    body: &str,
    images: &[ImageAsset],
    prefix: &str,
) -> Result<String, ContractViolation> {
    let mut lines: Vec<String> = body.lines().map(str::to_string).collect();
    let mut injected = 0;

    for image in images.iter().filter(|i| !i.is_hero && i.has_path()) {
        let path = normalize_image_path(&image.local_path, prefix)?;
        let reference = format!("]({path})");
        if lines.iter().any(|line| line.contains(&reference)) {
            tracing::debug!(path = %path, "Image already in body");
            continue;
        }
        let Some(index) = find_section(&lines, &image.heading) else {
            tracing::debug!(heading = %image.heading, "No matching section for image");
            continue;
        };
        let alt = collapse_whitespace(&image.alt_text).replace(['[', ']'], "");
        let at = after_section_images(&lines, index + 1);
        lines.insert(at, String::new());
        lines.insert(at + 1, format!("![{alt}]({path})"));
        injected += 1;
    }

    tracing::debug!(injected, "Injected images");
    Ok(lines.join("\n"))
}

// Skips the blank-line/image pairs already placed under a heading, so images
// sharing a section keep their input order.
fn after_section_images(lines: &[String], mut at: usize) -> usize {
    while lines.get(at).is_some_and(|l| l.trim().is_empty())
        && lines.get(at + 1).is_some_and(|l| is_image_line(l))
    {
        at += 2;
    }
    at
}

fn is_image_line(line: &str) -> bool {
    let line = line.trim();
    line.starts_with("![") && line.ends_with(')')
}

fn heading_key(text: &str) -> String {
    collapse_whitespace(&strip_markdown(text)).to_lowercase()
}

fn find_section(lines: &[String], heading: &str) -> Option<usize> {
    let wanted = heading_key(heading);
    if wanted.is_empty() {
        return None;
    }
    let mut in_fence = false;
    lines.iter().position(|line| {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            return false;
        }
        !in_fence
            && matches!(parse_heading(line), Some((2, text)) if heading_key(text) == wanted)
    })
}
