use reqwest::{
    header::{ACCEPT_LANGUAGE, COOKIE},
    Client, Response,
};
use url::Url;

use crate::{
    error::Error,
    parser::YtHtmlDocument,
    types::{CaptionTrack, Json3Captions, PlayerResponse},
    yt::{FetchedTranscript, TranscriptEntry, TranscriptFetcher, YOUTUBE_BASE_URL},
};

#[derive(Debug, thiserror::Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error(transparent)]
    Parse(#[from] Error),
    #[error("Failed to automatically give consent to saving cookies")]
    ConsentCookie,
    #[error("YouTube is blocking requests from this IP")]
    IpBlocked,
    #[error("The video {video_id} is no longer available")]
    VideoUnavailable { video_id: String },
    #[error("The video {video_id} is unplayable ({status}): {reason}")]
    VideoUnplayable {
        video_id: String,
        status: String,
        reason: String,
    },
    #[error("Subtitles are disabled for the video {video_id}")]
    TranscriptsDisabled { video_id: String },
    #[error("No transcript found for {video_id} in {requested:?}, available: {available:?}")]
    NoTranscriptFound {
        video_id: String,
        requested: Vec<String>,
        available: Vec<String>,
    },
}

/// Caption retrieval through YouTube's innertube player API
#[derive(Debug, Clone)]
pub struct YouTubeTranscripts {
    client: Client,
    base_url: String,
}

impl Default for YouTubeTranscripts {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

impl YouTubeTranscripts {
    const ANDROID_CLIENT_VERSION: &str = "20.10.38";

    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: YOUTUBE_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    async fn ensure_success(resp: Response) -> Result<Response, TranscriptError> {
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TranscriptError::Api { status, message });
        }
        Ok(resp)
    }

    async fn get_watch_page(
        &self,
        video_id: &str,
        cookie: Option<&str>,
    ) -> Result<YtHtmlDocument, TranscriptError> {
        let mut request = self
            .client
            .get(format!("{}/watch", self.base_url))
            .query(&[("v", video_id)])
            .header(ACCEPT_LANGUAGE, "en-US");

        if let Some(cookie) = cookie {
            request = request.header(COOKIE, cookie);
        }

        let resp = request
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch watch page"))?;

        let html = Self::ensure_success(resp).await?.text().await?;
        Ok(html.into())
    }

    /// Loads the watch page, accepting the cookie consent interstitial once if
    /// YouTube serves it
    #[tracing::instrument(skip(self))]
    async fn fetch_watch_page(&self, video_id: &str) -> Result<YtHtmlDocument, TranscriptError> {
        let doc = self.get_watch_page(video_id, None).await?;
        if !doc.is_consent_page() {
            return Ok(doc);
        }

        let token = doc
            .consent_token()
            .ok_or(TranscriptError::ConsentCookie)?
            .to_string();
        tracing::debug!("Accepting cookie consent");

        let doc = self
            .get_watch_page(video_id, Some(&format!("CONSENT=YES+{token}")))
            .await?;
        if doc.is_consent_page() {
            return Err(TranscriptError::ConsentCookie);
        }

        Ok(doc)
    }

    #[tracing::instrument(skip(self, api_key))]
    async fn fetch_player_response(
        &self,
        video_id: &str,
        api_key: &str,
    ) -> Result<PlayerResponse, TranscriptError> {
        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": Self::ANDROID_CLIENT_VERSION
                }
            },
            "videoId": video_id
        });

        let resp = self
            .client
            .post(format!("{}/youtubei/v1/player", self.base_url))
            .query(&[("key", api_key)])
            .header(ACCEPT_LANGUAGE, "en-US")
            .json(&body)
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        Ok(Self::ensure_success(resp)
            .await?
            .json::<PlayerResponse>()
            .await?)
    }

    #[tracing::instrument(skip(self, track), fields(language = %track.language_code))]
    async fn fetch_entries(
        &self,
        track: &CaptionTrack,
    ) -> Result<Vec<TranscriptEntry>, TranscriptError> {
        let url = json3_caption_url(&track.base_url)?;

        let resp = self
            .client
            .get(url)
            .header(ACCEPT_LANGUAGE, "en-US")
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch captions"))?;

        let captions = Self::ensure_success(resp)
            .await?
            .json::<Json3Captions>()
            .await?;

        Ok(entries_from_json3(captions))
    }
}

impl TranscriptFetcher for YouTubeTranscripts {
    type Error = TranscriptError;

    #[tracing::instrument(skip(self))]
    async fn fetch_transcript(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<FetchedTranscript, Self::Error> {
        let doc = self.fetch_watch_page(video_id).await?;

        let api_key = match doc.innertube_api_key() {
            Some(key) => key.to_string(),
            None if doc.has_recaptcha() => return Err(TranscriptError::IpBlocked),
            None => {
                return Err(Error::ParseError(
                    "Failed to extract INNERTUBE_API_KEY from the watch page",
                )
                .into())
            }
        };

        let player = self.fetch_player_response(video_id, &api_key).await?;
        let tracks = caption_tracks(video_id, player)?;

        let track = select_track(&tracks, languages).ok_or_else(|| {
            TranscriptError::NoTranscriptFound {
                video_id: video_id.to_string(),
                requested: languages.to_vec(),
                available: tracks.iter().map(|t| t.language_code.clone()).collect(),
            }
        })?;

        let entries = self.fetch_entries(track).await?;
        tracing::info!(
            language = %track.language_code,
            generated = track.is_generated(),
            count = entries.len(),
            "Fetched transcript"
        );

        Ok(FetchedTranscript {
            video_id: video_id.to_string(),
            language_code: track.language_code.clone(),
            is_generated: track.is_generated(),
            entries,
        })
    }
}

/// Validates the playability status and returns the caption tracks of `player`
fn caption_tracks(
    video_id: &str,
    player: PlayerResponse,
) -> Result<Vec<CaptionTrack>, TranscriptError> {
    if let Some(status) = player.playability_status {
        match status.status.as_str() {
            "OK" => {}
            "ERROR" => {
                return Err(TranscriptError::VideoUnavailable {
                    video_id: video_id.to_string(),
                })
            }
            _ => {
                return Err(TranscriptError::VideoUnplayable {
                    video_id: video_id.to_string(),
                    status: status.status,
                    reason: status.reason.unwrap_or_default(),
                })
            }
        }
    }

    let tracks = player
        .captions
        .and_then(|c| c.player_captions_tracklist_renderer)
        .map(|r| r.caption_tracks)
        .unwrap_or_default();

    if tracks.is_empty() {
        return Err(TranscriptError::TranscriptsDisabled {
            video_id: video_id.to_string(),
        });
    }

    Ok(tracks)
}

/// Picks the first requested language that has a track, preferring manually
/// created captions over auto-generated ones for the same language.
pub fn select_track<'a>(
    tracks: &'a [CaptionTrack],
    languages: &[String],
) -> Option<&'a CaptionTrack> {
    languages.iter().find_map(|lang| {
        let mut matching = tracks.iter().filter(|t| &t.language_code == lang);
        let manual = matching.clone().find(|t| !t.is_generated());
        manual.or_else(|| matching.next())
    })
}

/// Rewrites a caption `baseUrl` to request the `json3` format
fn json3_caption_url(base_url: &str) -> Result<Url, Error> {
    let mut url = Url::parse(base_url)?;
    let pairs = url
        .query_pairs()
        .filter(|(k, _)| k != "fmt")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect::<Vec<_>>();

    url.query_pairs_mut()
        .clear()
        .extend_pairs(pairs)
        .append_pair("fmt", "json3");

    Ok(url)
}

fn entries_from_json3(captions: Json3Captions) -> Vec<TranscriptEntry> {
    captions
        .events
        .into_iter()
        .filter_map(|event| {
            let text = event
                .segs?
                .into_iter()
                .map(|seg| seg.utf8)
                .collect::<String>();

            // window/append events only carry line breaks
            if text.trim().is_empty() {
                return None;
            }

            Some(TranscriptEntry {
                text,
                start: event.t_start_ms as f64 / 1000.0,
                duration: event.d_duration_ms as f64 / 1000.0,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};
    use serde_json::json;

    fn track(lang: &str, kind: Option<&str>) -> CaptionTrack {
        CaptionTrack {
            base_url: format!("https://www.youtube.com/api/timedtext?v=abc123&lang={lang}"),
            language_code: lang.into(),
            kind: kind.map(String::from),
        }
    }

    fn langs(codes: &[&str]) -> Vec<String> {
        codes.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_select_track_follows_language_order() {
        let tracks = vec![track("en", None), track("ko", None)];
        let selected = select_track(&tracks, &langs(&["ko", "en"])).unwrap();
        assert_eq!(selected.language_code, "ko");
    }

    #[test]
    fn test_select_track_prefers_manual_over_generated() {
        let tracks = vec![track("ko", Some("asr")), track("ko", None)];
        let selected = select_track(&tracks, &langs(&["ko"])).unwrap();
        assert!(!selected.is_generated());
    }

    #[test]
    fn test_select_track_falls_back_to_generated() {
        let tracks = vec![track("ko", Some("asr")), track("en", None)];
        let selected = select_track(&tracks, &langs(&["ko", "en"])).unwrap();
        assert_eq!(selected.language_code, "ko");
        assert!(selected.is_generated());
    }

    #[test]
    fn test_select_track_none_matching() {
        let tracks = vec![track("de", None)];
        assert!(select_track(&tracks, &langs(&["ko", "en"])).is_none());
    }

    #[test]
    fn test_json3_caption_url_replaces_format() {
        let url = json3_caption_url(
            "https://www.youtube.com/api/timedtext?v=abc123&fmt=srv3&lang=en",
        )
        .unwrap();
        let pairs = url.query_pairs().into_owned().collect::<Vec<_>>();

        assert_eq!(
            pairs,
            vec![
                ("v".to_string(), "abc123".to_string()),
                ("lang".to_string(), "en".to_string()),
                ("fmt".to_string(), "json3".to_string()),
            ]
        );
    }

    #[test]
    fn test_entries_skip_events_without_text() {
        let captions: Json3Captions = serde_json::from_value(json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 5000},
                {"tStartMs": 0, "dDurationMs": 2500, "segs": [{"utf8": "First, "}, {"utf8": "chop the onions."}]},
                {"tStartMs": 2500, "dDurationMs": 10, "aAppend": 1, "segs": [{"utf8": "\n"}]},
                {"tStartMs": 2500, "dDurationMs": 2000, "segs": [{"utf8": "Then fry until golden."}]}
            ]
        }))
        .unwrap();

        let entries = entries_from_json3(captions);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "First, chop the onions.");
        assert_eq!(entries[0].duration, 2.5);
        assert_eq!(entries[1].text, "Then fry until golden.");
        assert_eq!(entries[1].start, 2.5);
    }

    #[test]
    fn test_unplayable_and_disabled_videos() {
        let player: PlayerResponse = serde_json::from_value(json!({
            "playabilityStatus": {"status": "ERROR", "reason": "This video is unavailable"}
        }))
        .unwrap();
        assert!(matches!(
            caption_tracks("abc123", player),
            Err(TranscriptError::VideoUnavailable { .. })
        ));

        let player: PlayerResponse = serde_json::from_value(json!({
            "playabilityStatus": {"status": "LOGIN_REQUIRED", "reason": "Sign in to confirm your age"}
        }))
        .unwrap();
        assert!(matches!(
            caption_tracks("abc123", player),
            Err(TranscriptError::VideoUnplayable { status, .. }) if status == "LOGIN_REQUIRED"
        ));

        let player: PlayerResponse =
            serde_json::from_value(json!({"playabilityStatus": {"status": "OK"}})).unwrap();
        assert!(matches!(
            caption_tracks("abc123", player),
            Err(TranscriptError::TranscriptsDisabled { .. })
        ));
    }

    const WATCH_HTML: &str =
        r#"<html><script>ytcfg.set({"INNERTUBE_API_KEY": "test-key"});</script></html>"#;

    async fn mock_watch_page(server: &mut Server, body: &str) -> mockito::Mock {
        server
            .mock("GET", Matcher::Regex(r"^/watch".into()))
            .match_query(Matcher::UrlEncoded("v".into(), "abc123".into()))
            .with_status(200)
            .with_body(body)
            .create_async()
            .await
    }

    #[tokio::test]
    async fn test_fetch_transcript_end_to_end() {
        let mut server = Server::new_async().await;
        let _watch = mock_watch_page(&mut server, WATCH_HTML).await;

        let player = json!({
            "playabilityStatus": {"status": "OK"},
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {"baseUrl": format!("{}/api/timedtext?v=abc123&lang=en", server.url()), "languageCode": "en"},
                        {"baseUrl": format!("{}/api/timedtext?v=abc123&lang=ko&kind=asr", server.url()), "languageCode": "ko", "kind": "asr"}
                    ]
                }
            }
        });
        let _player = server
            .mock("POST", Matcher::Regex(r"^/youtubei/v1/player".into()))
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::PartialJson(json!({"videoId": "abc123"})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(player.to_string())
            .create_async()
            .await;

        let captions = json!({
            "events": [
                {"tStartMs": 0, "dDurationMs": 2000, "segs": [{"utf8": "First, chop the onions."}]},
                {"tStartMs": 2000, "dDurationMs": 2000, "segs": [{"utf8": "Then fry until golden."}]}
            ]
        });
        let _captions = server
            .mock("GET", Matcher::Regex(r"^/api/timedtext".into()))
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lang".into(), "en".into()),
                Matcher::UrlEncoded("fmt".into(), "json3".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(captions.to_string())
            .create_async()
            .await;

        let fetcher = YouTubeTranscripts::default().with_base_url(server.url());
        let transcript = fetcher
            .fetch_transcript("abc123", &langs(&["ja", "en"]))
            .await
            .expect("transcript should be fetched");

        assert_eq!(transcript.language_code, "en");
        assert!(!transcript.is_generated);
        assert_eq!(
            transcript.to_text(),
            "First, chop the onions. Then fry until golden."
        );
    }

    #[tokio::test]
    async fn test_fetch_transcript_no_matching_language() {
        let mut server = Server::new_async().await;
        let _watch = mock_watch_page(&mut server, WATCH_HTML).await;

        let player = json!({
            "playabilityStatus": {"status": "OK"},
            "captions": {
                "playerCaptionsTracklistRenderer": {
                    "captionTracks": [
                        {"baseUrl": format!("{}/api/timedtext?lang=de", server.url()), "languageCode": "de"}
                    ]
                }
            }
        });
        let _player = server
            .mock("POST", Matcher::Regex(r"^/youtubei/v1/player".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(player.to_string())
            .create_async()
            .await;

        let fetcher = YouTubeTranscripts::default().with_base_url(server.url());
        let err = fetcher
            .fetch_transcript("abc123", &langs(&["ko", "en"]))
            .await
            .unwrap_err();

        match err {
            TranscriptError::NoTranscriptFound {
                requested,
                available,
                ..
            } => {
                assert_eq!(requested, langs(&["ko", "en"]));
                assert_eq!(available, langs(&["de"]));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_transcript_blocked_by_recaptcha() {
        let mut server = Server::new_async().await;
        let _watch = mock_watch_page(
            &mut server,
            r#"<html><div class="g-recaptcha"></div></html>"#,
        )
        .await;

        let fetcher = YouTubeTranscripts::default().with_base_url(server.url());
        let err = fetcher
            .fetch_transcript("abc123", &langs(&["en"]))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::IpBlocked));
    }

    #[tokio::test]
    async fn test_fetch_transcript_consent_page_twice_fails() {
        let mut server = Server::new_async().await;
        let consent = r#"<form action="https://consent.youtube.com/s"><input name="v" value="tok"></form>"#;
        let watch = server
            .mock("GET", Matcher::Regex(r"^/watch".into()))
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(consent)
            .expect(2)
            .create_async()
            .await;

        let fetcher = YouTubeTranscripts::default().with_base_url(server.url());
        let err = fetcher
            .fetch_transcript("abc123", &langs(&["en"]))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::ConsentCookie));
        watch.assert_async().await;
    }

    #[tokio::test]
    async fn test_fetch_transcript_http_error() {
        let mut server = Server::new_async().await;
        let _watch = server
            .mock("GET", Matcher::Regex(r"^/watch".into()))
            .match_query(Matcher::Any)
            .with_status(429)
            .with_body("Too Many Requests")
            .create_async()
            .await;

        let fetcher = YouTubeTranscripts::default().with_base_url(server.url());
        let err = fetcher
            .fetch_transcript("abc123", &langs(&["en"]))
            .await
            .unwrap_err();

        assert!(matches!(err, TranscriptError::Api { status: 429, .. }));
    }
}
