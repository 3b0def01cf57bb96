//! # Yt Parser
//!
//! Helpers for reading YouTube watch pages and for turning user supplied video
//! references (bare ids or any of the usual YouTube URL shapes) into video ids.

use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use url::Url;

static INNERTUBE_API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap()
});

static CONSENT_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"name="v" value="(.*?)""#).unwrap());

const CONSENT_FORM_ACTION: &str = r#"action="https://consent.youtube.com/s""#;
const RECAPTCHA_MARKER: &str = r#"class="g-recaptcha""#;

/// Returns `true` if `host` belongs to YouTube
pub fn is_youtube_host(host: &str) -> bool {
    let h = host.to_ascii_lowercase();
    h == "youtube.com" || h == "youtu.be" || h.ends_with(".youtube.com")
}

/// Extracts a video id from a YouTube URL.
///
/// Supports `watch?v=<id>`, `youtu.be/<id>`, `shorts/<id>` and `embed/<id>`.
pub fn youtube_video_id(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    if !is_youtube_host(host) {
        return None;
    }

    if host.eq_ignore_ascii_case("youtu.be") {
        let seg = url.path_segments()?.next()?.trim();
        return (!seg.is_empty()).then(|| seg.to_string());
    }

    if url.path().starts_with("/watch") {
        return url
            .query_pairs()
            .find(|(k, _)| k == "v")
            .map(|(_, v)| v.trim().to_string())
            .filter(|v| !v.is_empty());
    }

    let mut segs = url.path_segments()?;
    let kind = segs.next().unwrap_or_default();
    let id = segs.next().unwrap_or_default().trim();
    if (kind == "shorts" || kind == "embed") && !id.is_empty() {
        return Some(id.to_string());
    }

    None
}

/// Normalises a configured video reference into a bare video id.
///
/// Anything that does not parse as a YouTube URL is taken as an id verbatim
/// (after trimming), including the empty string.
pub fn normalize_video_id(input: &str) -> String {
    let input = input.trim();
    Url::parse(input)
        .ok()
        .and_then(|url| youtube_video_id(&url))
        .unwrap_or_else(|| input.to_string())
}

/// Raw html of a `https://www.youtube.com/watch?v=<id>` page
pub struct YtHtmlDocument(String);

impl Deref for YtHtmlDocument {
    type Target = String;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl YtHtmlDocument {
    pub fn new(doc: String) -> Self {
        YtHtmlDocument(doc)
    }

    /// The public innertube key embedded in the page's `ytcfg`
    pub fn innertube_api_key(&self) -> Option<&str> {
        INNERTUBE_API_KEY_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }

    /// `Some(token)` if the page is the EU cookie consent interstitial
    pub fn consent_token(&self) -> Option<&str> {
        if !self.contains(CONSENT_FORM_ACTION) {
            return None;
        }
        CONSENT_VALUE_RE
            .captures(self)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str())
    }

    pub fn is_consent_page(&self) -> bool {
        self.contains(CONSENT_FORM_ACTION)
    }

    pub fn has_recaptcha(&self) -> bool {
        self.contains(RECAPTCHA_MARKER)
    }
}

impl From<String> for YtHtmlDocument {
    fn from(value: String) -> Self {
        YtHtmlDocument(value)
    }
}
