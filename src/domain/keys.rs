//! Local path to remote object mapping for the publish pass.

use std::path::{Component, Path};

/// `prefix/<path relative to root>`, always `/`-separated.
///
/// Returns `None` if `path` is not under `root`.
pub fn remote_key(root: &Path, path: &Path, prefix: &str) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<_> = relative
        .components()
        .map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Option<_>>()?;
    if parts.is_empty() {
        return None;
    }

    let relative = parts.join("/");
    let prefix = prefix.trim_end_matches('/');
    if prefix.is_empty() {
        Some(relative)
    } else {
        Some(format!("{prefix}/{relative}"))
    }
}

/// Best-effort content type from the file name. HLS types are pinned since
/// generic tables disagree on `.ts`.
pub fn content_type_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "m3u8" => Some("application/vnd.apple.mpegurl"),
        "ts" => Some("video/mp2t"),
        "m4s" => Some("video/iso.segment"),
        _ => mime_guess::from_ext(&ext).first_raw(),
    }
}
