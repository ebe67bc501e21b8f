pub mod gemini;

use crate::options::{InputType, Length, Platform, Tone};
use async_trait::async_trait;
use thiserror::Error;

/// Request descriptor for a social post generation. The controller
/// guarantees `input_value` is non-blank before this is built.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub input_type: InputType,
    pub input_value: String,
    pub platform: Platform,
    pub tone: Tone,
    pub length: Length,
}

/// Completion of a background generation task, keyed back to the tool
/// that issued it.
#[derive(Debug, Clone)]
pub struct GenerationMessage {
    pub tool_id: String,
    pub data: GenerationData,
}

#[derive(Debug, Clone)]
pub enum GenerationData {
    Post(String),
    PostFailed(String),
    HeroImage(HeroImage),
    HeroImageFailed(String),
}

/// A generated hero image: the data URL the backend contract promises,
/// plus the decoded bytes for the terminal preview.
#[derive(Debug, Clone)]
pub struct HeroImage {
    pub data_url: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request to the generation service failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generation service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("generation service returned an empty response")]
    EmptyResponse,

    #[error("could not parse the generation service response: {0}")]
    MalformedResponse(String),
}

#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate the post body for the given descriptor.
    async fn generate_social_post(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError>;

    /// Generate a hero image illustrating already-generated content.
    async fn generate_blog_hero_image(&self, content: &str)
        -> Result<HeroImage, GenerationError>;
}
