//! /grok image command - one-shot image generation

use poise::CreateReply;
use serenity::all::{Colour, CreateAttachment, CreateEmbed};
use tracing::{error, info};

use gx_core::xai::ImageRequest;
use gx_core::Error as CoreError;

use crate::commands::{Context, Error};
use crate::embeds;

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ImageModelChoice {
    #[name = "Grok Imagine Image Pro"]
    GrokImagineImagePro,
    #[name = "Grok Imagine Image"]
    GrokImagineImage,
    #[name = "Grok 2 Image (1212)"]
    Grok2Image,
}

impl ImageModelChoice {
    pub fn id(self) -> &'static str {
        match self {
            ImageModelChoice::GrokImagineImagePro => "grok-imagine-image-pro",
            ImageModelChoice::GrokImagineImage => "grok-imagine-image",
            ImageModelChoice::Grok2Image => "grok-2-image-1212",
        }
    }
}

#[derive(Debug, Clone, Copy, poise::ChoiceParameter)]
pub enum ImageAspectChoice {
    #[name = "1:1 (Square)"]
    Square,
    #[name = "16:9 (Landscape)"]
    Landscape,
    #[name = "9:16 (Portrait)"]
    Portrait,
    #[name = "4:3"]
    FourThree,
    #[name = "3:4"]
    ThreeFour,
    #[name = "3:2"]
    ThreeTwo,
    #[name = "2:3"]
    TwoThree,
}

impl ImageAspectChoice {
    pub fn ratio(self) -> &'static str {
        match self {
            ImageAspectChoice::Square => "1:1",
            ImageAspectChoice::Landscape => "16:9",
            ImageAspectChoice::Portrait => "9:16",
            ImageAspectChoice::FourThree => "4:3",
            ImageAspectChoice::ThreeFour => "3:4",
            ImageAspectChoice::ThreeTwo => "3:2",
            ImageAspectChoice::TwoThree => "2:3",
        }
    }
}

/// Generates an image from a prompt.
#[poise::command(slash_command, rename = "image")]
pub async fn image(
    ctx: Context<'_>,
    #[description = "Prompt"] prompt: String,
    #[description = "Choose an image generation model. (default: Grok Imagine Image)"]
    model: Option<ImageModelChoice>,
    #[description = "Aspect ratio of the image. (default: 1:1)"] aspect_ratio: Option<
        ImageAspectChoice,
    >,
) -> Result<(), Error> {
    ctx.defer().await?;

    let model = model.unwrap_or(ImageModelChoice::GrokImagineImage);
    let aspect_ratio = aspect_ratio.unwrap_or(ImageAspectChoice::Square);
    info!("Generating image with model {}", model.id());

    let request = ImageRequest {
        model: model.id().to_string(),
        prompt: prompt.clone(),
        aspect_ratio: Some(aspect_ratio.ratio().to_string()),
    };

    let bytes = match generate_bytes(&ctx, &request).await {
        Ok(bytes) => bytes,
        Err(e) => {
            error!("Image generation failed: {e}");
            ctx.send(CreateReply::default().embed(embeds::error_embed(&e.to_string())))
                .await?;
            return Ok(());
        }
    };

    let mut description = format!(
        "**Prompt:** {}\n",
        embeds::truncate_text(&prompt, 2000)
    );
    description.push_str(&format!("**Model:** {}\n", model.id()));
    description.push_str(&format!("**Aspect Ratio:** {}\n", aspect_ratio.ratio()));

    let embed = CreateEmbed::new()
        .title("Image Generation")
        .description(description)
        .colour(Colour::DARK_TEAL)
        .image("attachment://image.png");

    ctx.send(
        CreateReply::default()
            .embed(embed)
            .attachment(CreateAttachment::bytes(bytes, "image.png")),
    )
    .await?;
    info!("Successfully generated and sent image");

    Ok(())
}

/// Resolve a generation result to raw bytes, from either delivery form
async fn generate_bytes(ctx: &Context<'_>, request: &ImageRequest) -> gx_core::Result<Vec<u8>> {
    let data = ctx.data();
    let image = data.client.generate_image(request).await?;

    if let Some(url) = &image.url {
        return data.client.download(url).await;
    }
    if let Some(bytes) = image.decode_b64() {
        return Ok(bytes);
    }

    Err(CoreError::Provider(
        "no image data returned from the API".to_string(),
    ))
}
