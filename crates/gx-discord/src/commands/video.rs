//! /grok video command - one-shot video generation

use poise::CreateReply;
use serenity::all::{Colour, CreateAttachment, CreateEmbed};
use tracing::{error, info};

use gx_core::xai::{models, VideoRequest};

use crate::commands::{Context, Error};
use crate::embeds;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum VideoAspectChoice {
    #[name = "16:9 (Landscape)"]
    Landscape,
    #[name = "9:16 (Portrait)"]
    Portrait,
    #[name = "1:1 (Square)"]
    Square,
    #[name = "4:3"]
    FourThree,
    #[name = "3:4"]
    ThreeFour,
}

impl VideoAspectChoice {
    pub fn ratio(self) -> &'static str {
        match self {
            VideoAspectChoice::Landscape => "16:9",
            VideoAspectChoice::Portrait => "9:16",
            VideoAspectChoice::Square => "1:1",
            VideoAspectChoice::FourThree => "4:3",
            VideoAspectChoice::ThreeFour => "3:4",
        }
    }
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum VideoResolutionChoice {
    #[name = "720p"]
    R720p,
    #[name = "480p"]
    R480p,
}

impl VideoResolutionChoice {
    pub fn id(self) -> &'static str {
        match self {
            VideoResolutionChoice::R720p => "720p",
            VideoResolutionChoice::R480p => "480p",
        }
    }
}

/// Generates a video from a prompt.
#[poise::command(slash_command, rename = "video")]
pub async fn video(
    ctx: Context<'_>,
    #[description = "Prompt"] prompt: String,
    #[description = "Aspect ratio of the video. (default: 16:9)"] aspect_ratio: Option<
        VideoAspectChoice,
    >,
    #[description = "Duration of the video in seconds. (default: 5)"]
    #[min = 1]
    #[max = 15]
    duration: Option<u32>,
    #[description = "Resolution of the video. (default: 720p)"] resolution: Option<
        VideoResolutionChoice,
    >,
) -> Result<(), Error> {
    ctx.defer().await?;

    let aspect_ratio = aspect_ratio.unwrap_or(VideoAspectChoice::Landscape);
    let duration = duration.unwrap_or(5);
    let resolution = resolution.unwrap_or(VideoResolutionChoice::R720p);
    info!("Starting video generation with {}", models::VIDEO_MODEL);

    let request = VideoRequest {
        model: models::VIDEO_MODEL.to_string(),
        prompt: prompt.clone(),
        aspect_ratio: Some(aspect_ratio.ratio().to_string()),
        duration: Some(duration),
        resolution: Some(resolution.id().to_string()),
    };

    let bytes = match generate_bytes(&ctx, &request).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Video generation failed: {e}");
            ctx.send(CreateReply::default().embed(embeds::error_embed(&e.to_string())))
                .await?;
            return Ok(());
        }
    };

    let mut description = format!(
        "**Prompt:** {}\n",
        embeds::truncate_text(&prompt, 2000)
    );
    description.push_str(&format!("**Aspect Ratio:** {}\n", aspect_ratio.ratio()));
    description.push_str(&format!("**Duration:** {duration}s\n"));
    description.push_str(&format!("**Resolution:** {}\n", resolution.id()));

    let embed = CreateEmbed::new()
        .title("Video Generation")
        .description(description)
        .colour(Colour::DARK_TEAL);

    ctx.send(
        CreateReply::default()
            .embed(embed)
            .attachment(CreateAttachment::bytes(bytes, "video.mp4")),
    )
    .await?;
    info!("Successfully generated and sent video");

    Ok(())
}

async fn generate_bytes(ctx: &Context<'_>, request: &VideoRequest) -> gx_core::Result<Vec<u8>> {
    let data = ctx.data();
    let video = data.client.generate_video(request).await?;
    data.client.download(&video.url).await
}
