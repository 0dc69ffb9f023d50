use async_trait::async_trait;
use base64::Engine;
use serde::Serialize;

/// Recognition parameters for one attempt. Two fixed configurations exist:
/// browser-captured WEBM/Opus as the primary, LINEAR16 as the one retry.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    pub encoding: &'static str,
    pub sample_rate_hertz: u32,
    pub language_code: &'static str,
    pub alternative_language_codes: &'static [&'static str],
    pub enable_automatic_punctuation: bool,
    pub model: &'static str,
    pub use_enhanced: bool,
}

const ALTERNATE_LANGUAGES: &[&str] = &["hi-IN", "en-IN"];

impl RecognitionConfig {
    pub fn webm_opus() -> Self {
        Self {
            encoding: "WEBM_OPUS",
            sample_rate_hertz: 48_000,
            language_code: "en-US",
            alternative_language_codes: ALTERNATE_LANGUAGES,
            enable_automatic_punctuation: true,
            model: "latest_long",
            use_enhanced: true,
        }
    }

    pub fn linear16() -> Self {
        Self {
            sample_rate_hertz: 16_000,
            encoding: "LINEAR16",
            ..Self::webm_opus()
        }
    }
}

/// One recognized result: the top alternative's transcript and confidence.
#[derive(Debug, Clone)]
pub struct SpeechSegment {
    pub transcript: String,
    pub confidence: f32,
}

/// Audio-in/text-out seam over the speech provider.
#[async_trait]
pub trait SpeechProvider: Send + Sync {
    async fn recognize(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> anyhow::Result<Vec<SpeechSegment>>;
}

/// Google Cloud Speech client over the REST `speech:recognize` method.
pub struct GoogleSpeechClient {
    http: reqwest::Client,
    api_key: String,
}

impl GoogleSpeechClient {
    pub fn new(api_key: String) -> Self {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");
        Self { http, api_key }
    }
}

#[async_trait]
impl SpeechProvider for GoogleSpeechClient {
    async fn recognize(
        &self,
        audio: &[u8],
        config: &RecognitionConfig,
    ) -> anyhow::Result<Vec<SpeechSegment>> {
        let content = base64::engine::general_purpose::STANDARD.encode(audio);

        let response = self
            .http
            .post("https://speech.googleapis.com/v1/speech:recognize")
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&serde_json::json!({
                "config": config,
                "audio": { "content": content }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Speech API error {}: {}", status, body);
        }

        let body: serde_json::Value = response.json().await?;
        let segments = body["results"]
            .as_array()
            .map(|results| {
                results
                    .iter()
                    .filter_map(|result| {
                        let top = &result["alternatives"][0];
                        top["transcript"].as_str().map(|transcript| SpeechSegment {
                            transcript: transcript.to_string(),
                            confidence: top["confidence"].as_f64().unwrap_or(0.0) as f32,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(segments)
    }
}

/// A completed transcription: space-joined top transcripts plus the first
/// result's confidence.
#[derive(Debug, Clone)]
pub struct Transcription {
    pub text: String,
    pub confidence: f32,
}

fn join_segments(segments: &[SpeechSegment]) -> Option<Transcription> {
    if segments.is_empty() {
        return None;
    }
    let text = segments
        .iter()
        .map(|s| s.transcript.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string();
    if text.is_empty() {
        return None;
    }
    let first = segments[0].confidence;
    Some(Transcription {
        text,
        // Providers omit confidence for some models; 0.9 stands in.
        confidence: if first > 0.0 { first } else { 0.9 },
    })
}

/// Primary WEBM/Opus attempt, then exactly one LINEAR16 retry when the
/// result set comes back empty. A transport error ends the attempt chain;
/// the caller substitutes the placeholder transcript.
pub async fn transcribe(provider: &dyn SpeechProvider, audio: &[u8]) -> Option<Transcription> {
    match provider.recognize(audio, &RecognitionConfig::webm_opus()).await {
        Ok(segments) => {
            if let Some(transcription) = join_segments(&segments) {
                return Some(transcription);
            }
            tracing::info!("No transcription with WEBM_OPUS, retrying with LINEAR16");
            match provider.recognize(audio, &RecognitionConfig::linear16()).await {
                Ok(segments) => join_segments(&segments),
                Err(e) => {
                    tracing::warn!(error = %e, "Speech retry failed");
                    None
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "Speech recognition failed");
            None
        }
    }
}
