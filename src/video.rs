//! Hosted-video link normalization.
//!
//! Short links, shorts pages, watch pages and embed links all collapse to the embed
//! form `https://www.youtube.com/embed/<id>`. Anything else passes through unchanged.

use std::sync::LazyLock;

use regex::Regex;

pub const EMBED_BASE: &str = "https://www.youtube.com/embed/";

static VIDEO_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
  // Scheme and host match case-insensitively; ids are case-sensitive.
  vec![
    // youtu.be/<id>
    Regex::new(r"^(?i:(?:https?://)?(?:www\.)?youtu\.be/)([A-Za-z0-9_-]{6,})").unwrap(),
    // youtube.com/shorts/<id>
    Regex::new(r"^(?i:(?:https?://)?(?:www\.|m\.)?youtube\.com/shorts/)([A-Za-z0-9_-]{6,})").unwrap(),
    // youtube.com/watch?...v=<id>
    Regex::new(r"^(?i:(?:https?://)?(?:www\.|m\.)?youtube\.com/watch\?)(?:[^#]*&)?v=([A-Za-z0-9_-]{6,})").unwrap(),
    // youtube.com/embed/<id>, youtube-nocookie.com/embed/<id>
    Regex::new(r"^(?i:(?:https?://)?(?:www\.)?youtube(?:-nocookie)?\.com/embed/)([A-Za-z0-9_-]{6,})").unwrap(),
  ]
});

/// Extract the video id from any recognized link shape.
pub fn video_id(url: &str) -> Option<&str> {
  let url = url.trim();
  VIDEO_PATTERNS
    .iter()
    .find_map(|re| re.captures(url))
    .and_then(|caps| caps.get(1))
    .map(|m| m.as_str())
}

/// Canonical embed URL for recognized video links; the input unchanged otherwise.
pub fn normalize_video_url(url: &str) -> String {
  match video_id(url) {
    Some(id) => format!("{EMBED_BASE}{id}"),
    None => url.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const CANONICAL: &str = "https://www.youtube.com/embed/abc123XYZ";

  #[test]
  fn known_shapes_collapse_to_one_embed_url() {
    for url in [
      "https://youtu.be/abc123XYZ",
      "https://www.youtube.com/shorts/abc123XYZ",
      "https://www.youtube.com/watch?v=abc123XYZ",
      "https://m.youtube.com/watch?feature=share&v=abc123XYZ&t=42",
      "youtube.com/embed/abc123XYZ?start=10",
      "https://www.youtube-nocookie.com/embed/abc123XYZ",
      "  https://youtu.be/abc123XYZ?si=xyz  ",
    ] {
      assert_eq!(normalize_video_url(url), CANONICAL, "{url}");
    }
  }

  #[test]
  fn canonical_form_is_a_fixed_point() {
    assert_eq!(normalize_video_url(CANONICAL), CANONICAL);
  }

  #[test]
  fn unrecognized_links_pass_through() {
    for url in [
      "https://example.com/earth-orbit-distance.png",
      "https://www.youtube.com/channel/UCabcdefgh",
      "https://vimeo.com/123456789",
      "not a url",
      "",
    ] {
      assert_eq!(normalize_video_url(url), url);
    }
  }

  #[test]
  fn video_id_extraction() {
    assert_eq!(video_id("https://youtu.be/seasonsdemo1"), Some("seasonsdemo1"));
    assert_eq!(video_id("https://example.com/watch?v=abc123XYZ"), None);
  }

  #[test]
  fn host_and_scheme_case_is_ignored_but_id_case_is_kept() {
    assert_eq!(normalize_video_url("https://YouTu.be/abc123XYZ"), CANONICAL);
    assert_eq!(normalize_video_url("HTTPS://WWW.YOUTUBE.COM/watch?v=abc123XYZ"), CANONICAL);
    assert_eq!(normalize_video_url("https://m.YouTube.com/shorts/abc123XYZ"), CANONICAL);
    assert_eq!(video_id("https://youtu.be/ABC123xyz"), Some("ABC123xyz"));
  }
}
