use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;

use recipe_pulse::{
    openai::OpenAIClient,
    settings::{MetadataBackend, Settings, SettingsArgs},
    tracing::init_tracing_subscriber,
    yt::{
        transcript::YouTubeTranscripts,
        video_info::{OEmbed, VideoInfoBackend, YtDlp},
    },
    RecipeProcessorBuilder,
};

#[derive(Parser)]
#[command(
    name = "recipe-pulse",
    about = "Extracts a schema.org recipe from a YouTube cooking video",
    version
)]
struct Cli {
    #[command(flatten)]
    settings: SettingsArgs,

    /// Pretty-print the JSON-LD document
    #[arg(long)]
    pretty: bool,

    /// Also write the JSON-LD document to this file
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let settings = Settings::from(cli.settings);
    tracing::info!(
        video_id = %settings.video_id,
        languages = ?settings.preferred_languages_list,
        model = %settings.openai_model,
        metadata_backend = %settings.metadata_backend,
        "Starting recipe extraction"
    );

    let http_client = reqwest::Client::new();

    let video_info_fetcher = match settings.metadata_backend {
        MetadataBackend::YtDlp => VideoInfoBackend::YtDlp(YtDlp::new(&settings.ytdlp_path)),
        MetadataBackend::OEmbed => VideoInfoBackend::OEmbed(OEmbed::new(http_client.clone())),
    };

    let extractor = OpenAIClient::new(&settings.openai_api_key)
        .with_base_url(&settings.openai_base_url)
        .with_model(&settings.openai_model)
        .with_api_style(settings.openai_api_style);

    let processor = RecipeProcessorBuilder::new()
        .transcript_fetcher(YouTubeTranscripts::new(http_client))
        .video_info_fetcher(video_info_fetcher)
        .extractor(extractor)
        .preferred_languages(settings.preferred_languages_list.clone())
        .build();

    let recipe = match processor.run(&settings.video_id).await {
        Ok(recipe) => recipe,
        Err(e) => {
            println!("{e}");
            return Ok(());
        }
    };

    let json_ld = if cli.pretty {
        recipe.to_json_ld_pretty()?
    } else {
        recipe.to_json_ld()?
    };
    println!("{json_ld}");

    if let Some(path) = cli.output {
        tokio::fs::write(&path, &json_ld)
            .await
            .with_context(|| format!("Failed to write recipe to {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote recipe");
    }

    Ok(())
}
