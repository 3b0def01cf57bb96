use std::{fmt, path::PathBuf, str::FromStr};

use clap::Args;

use crate::{
    llm::openai::{ApiStyle, DEFAULT_MODEL},
    parser::normalize_video_id,
};

/// Where video metadata is read from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MetadataBackend {
    #[default]
    YtDlp,
    OEmbed,
}

impl FromStr for MetadataBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yt-dlp" | "ytdlp" => Ok(MetadataBackend::YtDlp),
            "oembed" => Ok(MetadataBackend::OEmbed),
            other => Err(format!(
                "unknown metadata backend '{other}', expected 'yt-dlp' or 'oembed'"
            )),
        }
    }
}

impl fmt::Display for MetadataBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataBackend::YtDlp => f.write_str("yt-dlp"),
            MetadataBackend::OEmbed => f.write_str("oembed"),
        }
    }
}

/// Command line / environment surface of [`Settings`]
#[derive(Debug, Clone, Args)]
pub struct SettingsArgs {
    /// Base URL of the OpenAI compatible API (empty for api.openai.com)
    #[arg(long, env = "OPENAI_BASE_URL", default_value = "")]
    pub openai_base_url: String,

    /// OpenAI API key
    #[arg(long, env = "OPENAI_API_KEY", default_value = "", hide_env_values = true)]
    pub openai_api_key: String,

    /// Model used for recipe extraction
    #[arg(long, env = "OPENAI_MODEL", default_value = DEFAULT_MODEL)]
    pub openai_model: String,

    /// Endpoint flavour: responses | chat-completions
    #[arg(long, env = "OPENAI_API_STYLE", default_value = "responses")]
    pub openai_api_style: ApiStyle,

    /// YouTube video id or URL
    #[arg(long, env = "VIDEO_ID", default_value = "")]
    pub video_id: String,

    /// Comma separated transcript languages, most preferred first
    #[arg(long, env = "PREFERRED_LANGUAGES", default_value = "ko")]
    pub preferred_languages: String,

    /// Video metadata source: yt-dlp | oembed
    #[arg(long, env = "METADATA_BACKEND", default_value = "yt-dlp")]
    pub metadata_backend: MetadataBackend,

    /// Path to the yt-dlp executable
    #[arg(long, env = "YTDLP_PATH", default_value = "yt-dlp")]
    pub ytdlp_path: PathBuf,
}

/// Resolved, immutable configuration of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub openai_base_url: String,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_api_style: ApiStyle,
    pub video_id: String,
    pub preferred_languages: String,
    /// `preferred_languages` split on `,`, trimmed, empty entries dropped
    pub preferred_languages_list: Vec<String>,
    pub metadata_backend: MetadataBackend,
    pub ytdlp_path: PathBuf,
}

impl From<SettingsArgs> for Settings {
    fn from(args: SettingsArgs) -> Self {
        let preferred_languages_list = parse_languages(&args.preferred_languages);

        Settings {
            openai_base_url: args.openai_base_url.trim().to_string(),
            openai_api_key: args.openai_api_key,
            openai_model: args.openai_model,
            openai_api_style: args.openai_api_style,
            video_id: normalize_video_id(&args.video_id),
            preferred_languages: args.preferred_languages,
            preferred_languages_list,
            metadata_backend: args.metadata_backend,
            ytdlp_path: args.ytdlp_path,
        }
    }
}

fn parse_languages(languages: &str) -> Vec<String> {
    languages
        .split(',')
        .map(str::trim)
        .filter(|lang| !lang.is_empty())
        .map(String::from)
        .collect()
}
