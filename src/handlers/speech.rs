use axum::{extract::State, Json};
use base64::Engine;

use crate::dto::{
    SpeechToTextRequest, SpeechToTextResponse, TextToSpeechRequest, TextToSpeechResponse,
};
use crate::services::speech::{transcribe, SpeechProvider};
use crate::AppState;

/// Hard ceiling on decoded audio, checked before any provider call.
const MAX_AUDIO_BYTES: usize = 10 * 1024 * 1024;

const DEFAULT_TRANSCRIPT: &str = "I'd like to talk about my feelings";
const FALLBACK_TRANSCRIPT: &str = "Sorry, I couldn't catch that. Please try again.";
const FAILURE_NOTE: &str = "Voice input failed. Please speak clearly or type your message.";
const ISSUE_NOTE: &str = "Voice input had an issue. Please type your message or try again.";

fn fallback(note: &'static str) -> SpeechToTextResponse {
    SpeechToTextResponse {
        transcription: FALLBACK_TRANSCRIPT.into(),
        confidence: None,
        note: Some(note),
        fallback: Some(true),
        error: None,
    }
}

/// Core speech-to-text flow, provider injected so tests can count
/// invocations. Local validation rejects empty and oversized payloads
/// before any provider cost; every path returns a usable transcript.
pub(crate) async fn transcribe_request(
    provider: Option<&dyn SpeechProvider>,
    body: &SpeechToTextRequest,
) -> SpeechToTextResponse {
    let Some(encoded) = body.audio_data.as_deref().filter(|s| !s.is_empty()) else {
        return SpeechToTextResponse {
            transcription: DEFAULT_TRANSCRIPT.into(),
            confidence: None,
            note: None,
            fallback: None,
            error: None,
        };
    };

    // Bound the encoded payload before decoding; base64 inflates by 4/3.
    if encoded.len() / 4 * 3 > MAX_AUDIO_BYTES {
        tracing::warn!(encoded_len = encoded.len(), "Audio payload over size limit");
        return fallback(FAILURE_NOTE);
    }

    let audio = match base64::engine::general_purpose::STANDARD.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::warn!(error = %e, "Audio payload was not valid base64");
            return SpeechToTextResponse {
                transcription: FALLBACK_TRANSCRIPT.into(),
                confidence: None,
                note: Some(ISSUE_NOTE),
                fallback: None,
                error: Some(true),
            };
        }
    };

    if audio.is_empty() || audio.len() > MAX_AUDIO_BYTES {
        return fallback(FAILURE_NOTE);
    }

    tracing::debug!(
        audio_bytes = audio.len(),
        audio_type = ?body.audio_type,
        "Processing speech-to-text request"
    );

    let Some(provider) = provider else {
        tracing::warn!("Speech API not configured, returning placeholder transcript");
        return fallback(FAILURE_NOTE);
    };

    match transcribe(provider, &audio).await {
        Some(result) => SpeechToTextResponse::transcribed(result.text, result.confidence),
        None => fallback(FAILURE_NOTE),
    }
}

pub async fn speech_to_text(
    State(state): State<AppState>,
    Json(body): Json<SpeechToTextRequest>,
) -> Json<SpeechToTextResponse> {
    Json(transcribe_request(state.speech.as_deref(), &body).await)
}

/// Deliberate no-op passthrough: synthesis happens on the client, which
/// avoids a round of provider latency for every bot reply.
pub async fn text_to_speech(Json(body): Json<TextToSpeechRequest>) -> Json<TextToSpeechResponse> {
    let message = body
        .text
        .as_deref()
        .filter(|t| !t.trim().is_empty())
        .map(|_| "Using browser text-to-speech for optimal performance");

    Json(TextToSpeechResponse {
        audio_content: None,
        use_browser_tts: true,
        message,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::speech::tests::ScriptedProvider;
    use crate::services::speech::SpeechSegment;
    use base64::Engine;
    use std::sync::atomic::Ordering;

    fn request(audio_data: Option<&str>) -> SpeechToTextRequest {
        SpeechToTextRequest {
            audio_data: audio_data.map(String::from),
            audio_type: Some("audio/webm".into()),
        }
    }

    #[tokio::test]
    async fn missing_audio_skips_provider_and_returns_default() {
        let provider = ScriptedProvider::new(vec![]);

        for audio in [None, Some("")] {
            let response = transcribe_request(Some(&provider), &request(audio)).await;
            assert_eq!(response.transcription, DEFAULT_TRANSCRIPT);
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn oversized_audio_skips_provider() {
        let provider = ScriptedProvider::new(vec![]);
        let encoded = "A".repeat(16 * 1024 * 1024);

        let response = transcribe_request(Some(&provider), &request(Some(&encoded))).await;

        assert_eq!(response.transcription, FALLBACK_TRANSCRIPT);
        assert_eq!(response.fallback, Some(true));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn invalid_base64_skips_provider() {
        let provider = ScriptedProvider::new(vec![]);

        let response = transcribe_request(Some(&provider), &request(Some("!!not-base64!!"))).await;

        assert_eq!(response.transcription, FALLBACK_TRANSCRIPT);
        assert_eq!(response.error, Some(true));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn recognized_audio_returns_transcript_and_confidence() {
        let provider = ScriptedProvider::new(vec![Ok(vec![SpeechSegment {
            transcript: "hello world".into(),
            confidence: 0.92,
        }])]);
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"tiny audio clip");

        let response = transcribe_request(Some(&provider), &request(Some(&encoded))).await;

        assert_eq!(response.transcription, "hello world");
        assert_eq!(response.confidence, Some(0.92));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn missing_provider_returns_placeholder() {
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"tiny audio clip");

        let response = transcribe_request(None, &request(Some(&encoded))).await;

        assert_eq!(response.transcription, FALLBACK_TRANSCRIPT);
        assert_eq!(response.fallback, Some(true));
    }

    #[tokio::test]
    async fn provider_failure_returns_placeholder() {
        let provider = ScriptedProvider::new(vec![Err(anyhow::anyhow!("unreachable"))]);
        let encoded = base64::engine::general_purpose::STANDARD.encode(b"tiny audio clip");

        let response = transcribe_request(Some(&provider), &request(Some(&encoded))).await;

        assert_eq!(response.transcription, FALLBACK_TRANSCRIPT);
        assert_eq!(response.note, Some(FAILURE_NOTE));
    }

    #[tokio::test]
    async fn text_to_speech_always_defers_to_browser() {
        let response = text_to_speech(Json(TextToSpeechRequest {
            text: Some("read this aloud".into()),
        }))
        .await;
        assert!(response.0.use_browser_tts);
        assert!(response.0.audio_content.is_none());
        assert!(response.0.message.is_some());

        let empty = text_to_speech(Json(TextToSpeechRequest { text: None })).await;
        assert!(empty.0.use_browser_tts);
        assert!(empty.0.message.is_none());
    }
}
