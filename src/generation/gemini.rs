use super::{GenerationError, GenerationRequest, Generator, HeroImage};
use crate::config::Config;
use crate::options::{InputType, Length, Platform};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct GeminiGenerator {
    api_key: String,
    model: String,
    image_model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

#[derive(Debug, Serialize)]
struct PredictRequest {
    instances: Vec<PredictInstance>,
    parameters: PredictParameters,
}

#[derive(Debug, Serialize)]
struct PredictInstance {
    prompt: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct PredictParameters {
    sample_count: u32,
    aspect_ratio: &'static str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    #[serde(default)]
    predictions: Vec<Prediction>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Prediction {
    bytes_base64_encoded: Option<String>,
}

impl GeminiGenerator {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent("postsmith/0.1 (+https://github.com/muk2/postsmith)")
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            client,
        }
    }

    async fn post_json<B: Serialize>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Response, GenerationError> {
        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl Generator for GeminiGenerator {
    async fn generate_social_post(
        &self,
        request: &GenerationRequest,
    ) -> Result<String, GenerationError> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, self.model);
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: build_post_prompt(request),
                }],
            }],
        };

        let response = self.post_json(&url, &body).await?;
        let parsed: GenerateContentResponse = response.json().await?;

        extract_candidate_text(&parsed).ok_or(GenerationError::EmptyResponse)
    }

    async fn generate_blog_hero_image(
        &self,
        content: &str,
    ) -> Result<HeroImage, GenerationError> {
        let url = format!("{}/models/{}:predict", GEMINI_API_BASE, self.image_model);
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: build_hero_image_prompt(content),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
            },
        };

        let response = self.post_json(&url, &body).await?;
        let parsed: PredictResponse = response.json().await?;

        let encoded = parsed
            .predictions
            .into_iter()
            .find_map(|p| p.bytes_base64_encoded)
            .ok_or(GenerationError::EmptyResponse)?;

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(encoded.trim())
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        Ok(HeroImage {
            data_url: format!("data:image/png;base64,{}", encoded.trim()),
            bytes,
        })
    }
}

/// Build the text-generation prompt from the request descriptor.
fn build_post_prompt(request: &GenerationRequest) -> String {
    let context = match request.input_type {
        InputType::Topic => format!("about the following subject: {}", request.input_value),
        InputType::Url => format!(
            "summarizing the content found at this URL: {}",
            request.input_value
        ),
    };

    format!(
        "Write a {length} {platform} post in a {tone} tone, {context}\n\n{guidance}\n\nReturn only the post text, ready to publish, with no preamble.",
        length = length_guidance(request.length),
        platform = request.platform.label(),
        tone = request.tone.label(),
        context = context,
        guidance = platform_guidance(request.platform),
    )
}

/// Platform-specific formatting guidance appended to every post prompt.
fn platform_guidance(platform: Platform) -> &'static str {
    match platform {
        Platform::LinkedIn => {
            "Format it for LinkedIn: a strong opening line, short paragraphs, and 3-5 relevant hashtags at the end."
        }
        Platform::Twitter => {
            "Format it for X (Twitter): stay under 280 characters and include at most 2 hashtags."
        }
        Platform::Instagram => {
            "Format it as an Instagram caption: engaging first line, line breaks between thoughts, and a block of hashtags at the end."
        }
        Platform::Facebook => {
            "Format it for Facebook: conversational, with a question or call to action at the end."
        }
        Platform::Blog => {
            "Format it as a blog article in markdown with a title line, section headings, and a closing paragraph."
        }
    }
}

fn length_guidance(length: Length) -> &'static str {
    match length {
        Length::Short => "short (2-3 sentences)",
        Length::Medium => "medium-length (1-2 paragraphs)",
        Length::Long => "long-form (3 or more paragraphs)",
    }
}

/// Build the image prompt from already-generated article text. The article
/// is truncated so very long posts don't blow the prompt budget.
fn build_hero_image_prompt(content: &str) -> String {
    const MAX_CONTENT_CHARS: usize = 2000;

    let excerpt: String = content.chars().take(MAX_CONTENT_CHARS).collect();
    format!(
        "Create a wide hero image for a blog article, photographic style, no text or lettering in the image. The article begins:\n\n{}",
        excerpt
    )
}

/// Concatenate the text parts of the first candidate, if any.
fn extract_candidate_text(response: &GenerateContentResponse) -> Option<String> {
    let candidate = response.candidates.first()?;
    let content = candidate.content.as_ref()?;

    let text: String = content
        .parts
        .iter()
        .filter_map(|p| p.text.as_deref())
        .collect::<Vec<_>>()
        .join("");

    let text = text.trim().to_string();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Error bodies can be multi-kilobyte JSON blobs; keep the first line only.
fn truncate_error_body(body: &str) -> String {
    let line = body.lines().next().unwrap_or("").trim();
    let truncated: String = line.chars().take(200).collect();
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::Tone;

    fn example_request() -> GenerationRequest {
        GenerationRequest {
            input_type: InputType::Topic,
            input_value: "benefits of a productivity app".to_string(),
            platform: Platform::LinkedIn,
            tone: Tone::Professional,
            length: Length::Medium,
        }
    }

    #[test]
    fn test_post_prompt_contains_every_attribute() {
        let prompt = build_post_prompt(&example_request());
        assert!(prompt.contains("benefits of a productivity app"));
        assert!(prompt.contains("LinkedIn"));
        assert!(prompt.contains("Professional"));
        assert!(prompt.contains("medium-length"));
    }

    #[test]
    fn test_post_prompt_url_framing() {
        let mut request = example_request();
        request.input_type = InputType::Url;
        request.input_value = "https://example.com/features".to_string();
        let prompt = build_post_prompt(&request);
        assert!(prompt.contains("URL: https://example.com/features"));
        assert!(!prompt.contains("subject:"));
    }

    #[test]
    fn test_platform_guidance_twitter_limits() {
        assert!(platform_guidance(Platform::Twitter).contains("280"));
    }

    #[test]
    fn test_hero_image_prompt_embeds_content() {
        let prompt = build_hero_image_prompt("Remote work is here to stay.");
        assert!(prompt.contains("Remote work is here to stay."));
        assert!(prompt.contains("no text"));
    }

    #[test]
    fn test_hero_image_prompt_truncates_long_content() {
        let long = "x".repeat(5000);
        let prompt = build_hero_image_prompt(&long);
        assert!(prompt.len() < 2300);
    }

    #[test]
    fn test_extract_candidate_text_joins_parts() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_candidate_text(&parsed), Some("Hello world".to_string()));
    }

    #[test]
    fn test_extract_candidate_text_empty_candidates() {
        let parsed: GenerateContentResponse = serde_json::from_str(r#"{"candidates":[]}"#).unwrap();
        assert_eq!(extract_candidate_text(&parsed), None);
    }

    #[test]
    fn test_extract_candidate_text_blank_text() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":"   "}]}}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(extract_candidate_text(&parsed), None);
    }

    #[test]
    fn test_predict_response_parses_image_bytes() {
        let json = r#"{"predictions":[{"bytesBase64Encoded":"aGVsbG8="}]}"#;
        let parsed: PredictResponse = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed.predictions[0].bytes_base64_encoded.as_deref(),
            Some("aGVsbG8=")
        );
    }

    #[test]
    fn test_predict_request_serializes_camel_case() {
        let body = PredictRequest {
            instances: vec![PredictInstance {
                prompt: "a sunrise".to_string(),
            }],
            parameters: PredictParameters {
                sample_count: 1,
                aspect_ratio: "16:9",
            },
        };
        let json = serde_json::to_string(&body).unwrap();
        assert!(json.contains("\"sampleCount\":1"));
        assert!(json.contains("\"aspectRatio\":\"16:9\""));
    }

    #[test]
    fn test_truncate_error_body_first_line() {
        assert_eq!(truncate_error_body("bad key\ndetails"), "bad key");
    }

    #[test]
    fn test_truncate_error_body_caps_length() {
        let long = "e".repeat(500);
        assert_eq!(truncate_error_body(&long).chars().count(), 200);
    }
}
