use axum::{extract::State, Json};

use crate::dto::{ChatRequest, ChatResponse, CurrentMood};
use crate::services::gemini::{GenerationParams, GenerativeProvider};
use crate::AppState;

const CHAT_PARAMS: GenerationParams = GenerationParams {
    max_output_tokens: 300,
    temperature: 0.75,
    top_p: 0.9,
};

/// Case-insensitive substring triggers for the crisis path.
const EMERGENCY_KEYWORDS: [&str; 6] = [
    "suicide",
    "kill myself",
    "hurt myself",
    "end it all",
    "want to die",
    "no point living",
];

/// Fixed crisis payload. Deterministic and provider-independent: this path
/// must keep working through any provider outage.
const EMERGENCY_RESPONSE: &str = "I'm very concerned about you and want you to know that you matter. Please reach out for immediate help:\n\n🆘 National Suicide Prevention Lifeline: 988\n📱 Crisis Text Line: Text HOME to 741741\n🚨 Emergency Services: 911\n\nYou don't have to go through this alone. There are people who want to help you right now. Please consider reaching out to a trusted friend, family member, or mental health professional.";

const LISTENING_PROMPT: &str = "I'm here to listen. What's on your mind today?";

const GENERIC_FALLBACK: &str =
    "I'm here to support you, though I'm experiencing some technical difficulties right now.";

const CRISIS_FOOTER: &str = "Remember, if you're in crisis, please contact 988 (Suicide & Crisis Lifeline) or text HOME to 741741. You matter, and help is available.";

fn is_emergency(text: &str) -> bool {
    let lowered = text.to_lowercase();
    EMERGENCY_KEYWORDS
        .iter()
        .any(|keyword| lowered.contains(keyword))
}

/// Extra prompt line selected by exact mood value. Unrecognized values get
/// no guidance line.
fn mood_guidance(value: &str) -> Option<&'static str> {
    match value {
        "sad" => Some("User feels sad. Acknowledge their feelings, offer gentle support and practical suggestions."),
        "anxious" => Some("User is anxious. Provide calming techniques and reassurance in a balanced way."),
        "angry" => Some("User is angry. Validate their feelings and suggest healthy ways to process anger."),
        "tired" => Some("User is tired. Show understanding and suggest rest or energy-boosting activities."),
        "happy" => Some("User is happy. Celebrate with them and encourage maintaining positive momentum."),
        "neutral" => Some("User feels neutral. Engage warmly and explore what they might want to discuss."),
        _ => None,
    }
}

/// Locally computed response body for provider failures, keyed on the same
/// six mood values as the guidance table.
fn mood_fallback(value: &str) -> Option<&'static str> {
    match value {
        "sad" => Some("I can sense you're going through a difficult time. Remember that it's okay to feel sad, and these feelings will pass. Consider reaching out to someone you trust or doing something small that usually brings you comfort."),
        "anxious" => Some("I understand you're feeling anxious. Try taking slow, deep breaths - in for 4 counts, hold for 4, out for 6. Anxiety is temporary, and you have the strength to get through this moment."),
        "angry" => Some("It sounds like you're feeling frustrated or angry. Those feelings are valid. Consider taking a few minutes to step away, breathe deeply, or do some physical activity to help process these emotions."),
        "tired" => Some("I hear that you're feeling tired. Rest is important for both your body and mind. Be gentle with yourself and consider what you need right now - whether that's sleep, a break, or just some quiet time."),
        "happy" => Some("I'm glad to hear you're feeling good! It's wonderful when we can appreciate positive moments. What's been contributing to your happiness today?"),
        "neutral" => Some("Thank you for sharing with me. Sometimes feeling neutral is perfectly okay too. Is there anything specific you'd like to talk about or explore today?"),
        _ => None,
    }
}

/// Persona preamble + literal user text + optional mood context. Prior
/// conversation turns are accepted on the wire but never composed in.
fn compose_prompt(text: &str, mood: Option<&CurrentMood>) -> String {
    let mut prompt = format!(
        r#"You are MannMitra, a supportive AI wellness companion. Provide helpful, balanced responses.

Guidelines:
- Keep responses 3-5 sentences (50-80 words)
- Be warm and understanding but not overly dramatic
- Provide practical advice when appropriate
- Ask thoughtful follow-up questions
- Sound natural and conversational
- Focus on being genuinely helpful

User's message: "{}""#,
        text
    );

    if let Some(mood) = mood {
        prompt.push_str(&format!(
            "\n\nUser's current mood: {} {}",
            mood.label, mood.emoji
        ));
        if let Some(guidance) = mood_guidance(&mood.value) {
            prompt.push_str(&format!("\n\nGuidance: {}", guidance));
        }
    }

    prompt.push_str(
        "\n\nProvide a balanced, helpful response that shows you care while being practical.",
    );
    prompt
}

/// Fallback text: mood-keyed sentence (or the generic one) plus the fixed
/// crisis-resource footer.
fn fallback_response(mood: Option<&CurrentMood>) -> String {
    let body = mood
        .and_then(|m| mood_fallback(&m.value))
        .unwrap_or(GENERIC_FALLBACK);
    format!("{}\n\n{}", body, CRISIS_FOOTER)
}

/// Core chat flow, provider injected so tests can count invocations.
/// Every path returns a success-shaped response.
pub(crate) async fn chat_reply(
    ai: Option<&dyn GenerativeProvider>,
    req: &ChatRequest,
) -> ChatResponse {
    let text = match req.text.as_deref().map(str::trim) {
        Some(text) if !text.is_empty() => text,
        _ => {
            return ChatResponse {
                response: LISTENING_PROMPT.into(),
                success: true,
                source: "fallback",
            }
        }
    };

    // The crisis check precedes the credential check so it holds even when
    // no provider is configured.
    if is_emergency(text) {
        tracing::warn!("Emergency keywords detected, returning crisis resources");
        return ChatResponse {
            response: EMERGENCY_RESPONSE.into(),
            success: true,
            source: "emergency_protocol",
        };
    }

    let mood = req.current_mood.as_ref();

    let Some(ai) = ai else {
        return ChatResponse {
            response: fallback_response(mood),
            success: true,
            source: "fallback_no_api",
        };
    };

    match ai.generate(&compose_prompt(text, mood), &CHAT_PARAMS).await {
        Ok(response) => ChatResponse {
            response: response.trim().to_string(),
            success: true,
            source: "gemini_ai",
        },
        Err(e) => {
            tracing::warn!(error = %e, "Chat generation failed, using fallback response");
            ChatResponse {
                response: fallback_response(mood),
                success: true,
                source: "fallback",
            }
        }
    }
}

pub async fn get_chat_response(
    State(state): State<AppState>,
    Json(body): Json<ChatRequest>,
) -> Json<ChatResponse> {
    tracing::debug!(
        user_id = body.user_id.as_deref().unwrap_or("anonymous"),
        history_turns = body.history.len(),
        "Processing chat message"
    );
    Json(chat_reply(state.ai.as_deref(), &body).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct CountingProvider {
        calls: AtomicUsize,
        prompts: Mutex<Vec<String>>,
        response: Option<&'static str>,
    }

    impl CountingProvider {
        fn succeeding(response: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                response: Some(response),
            }
        }

        fn failing() -> Self {
            Self {
                calls: AtomicUsize::new(0),
                prompts: Mutex::new(Vec::new()),
                response: None,
            }
        }
    }

    #[async_trait]
    impl GenerativeProvider for CountingProvider {
        async fn generate(
            &self,
            prompt: &str,
            _params: &GenerationParams,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.prompts.lock().unwrap().push(prompt.to_string());
            match self.response {
                Some(text) => Ok(text.to_string()),
                None => Err(anyhow::anyhow!("provider unreachable")),
            }
        }
    }

    fn request(text: &str, mood_value: Option<&str>) -> ChatRequest {
        ChatRequest {
            text: Some(text.to_string()),
            current_mood: mood_value.map(|value| CurrentMood {
                value: value.to_string(),
                label: value.to_string(),
                emoji: "🙂".to_string(),
            }),
            user_id: Some("u1".into()),
            session_id: Some("s1".into()),
            history: vec![],
        }
    }

    #[tokio::test]
    async fn emergency_phrases_bypass_the_provider() {
        for text in [
            "I think about suicide",
            "I want to KILL MYSELF",
            "some days there is no point living anymore",
        ] {
            let provider = CountingProvider::succeeding("should not be used");
            let reply = chat_reply(Some(&provider), &request(text, None)).await;

            assert_eq!(reply.source, "emergency_protocol");
            assert!(reply.response.contains("988"));
            assert_eq!(
                provider.calls.load(Ordering::SeqCst),
                0,
                "provider must never be invoked for {:?}",
                text
            );
        }
    }

    #[tokio::test]
    async fn emergency_protocol_works_without_credentials() {
        let reply = chat_reply(None, &request("I want to end it all", None)).await;
        assert_eq!(reply.source, "emergency_protocol");
    }

    #[tokio::test]
    async fn empty_text_returns_listening_prompt() {
        let provider = CountingProvider::succeeding("unused");
        for text in ["", "   "] {
            let reply = chat_reply(Some(&provider), &request(text, None)).await;
            assert_eq!(reply.response, LISTENING_PROMPT);
            assert_eq!(reply.source, "fallback");
        }
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_success_is_tagged_gemini_ai() {
        let provider = CountingProvider::succeeding("  A warm reply.  ");
        let reply = chat_reply(Some(&provider), &request("hello", None)).await;

        assert_eq!(reply.source, "gemini_ai");
        assert_eq!(reply.response, "A warm reply.");
        assert!(reply.success);
    }

    #[tokio::test]
    async fn provider_failure_uses_mood_fallback_with_footer() {
        for value in ["sad", "anxious", "angry", "tired", "happy", "neutral"] {
            let provider = CountingProvider::failing();
            let reply = chat_reply(Some(&provider), &request("rough day", Some(value))).await;

            assert_eq!(reply.source, "fallback");
            let expected = format!("{}\n\n{}", mood_fallback(value).unwrap(), CRISIS_FOOTER);
            assert_eq!(reply.response, expected, "wrong fallback for mood {}", value);
        }
    }

    #[tokio::test]
    async fn unknown_mood_falls_back_to_generic_sentence() {
        let provider = CountingProvider::failing();
        let reply = chat_reply(Some(&provider), &request("rough day", Some("confused"))).await;

        assert!(reply.response.starts_with(GENERIC_FALLBACK));
        assert!(reply.response.ends_with(CRISIS_FOOTER));
    }

    #[tokio::test]
    async fn missing_credential_is_tagged_fallback_no_api() {
        let reply = chat_reply(None, &request("hello", Some("sad"))).await;

        assert_eq!(reply.source, "fallback_no_api");
        assert!(reply.response.ends_with(CRISIS_FOOTER));
    }

    #[tokio::test]
    async fn prompt_embeds_text_and_mood_guidance_but_not_history() {
        let provider = CountingProvider::succeeding("ok");
        let mut req = request("I had a hard week", Some("sad"));
        req.history = vec![crate::dto::ChatTurn {
            role: crate::dto::ChatRole::User,
            text: "earlier private message".into(),
            timestamp: None,
        }];

        chat_reply(Some(&provider), &req).await;

        let prompts = provider.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.contains("I had a hard week"));
        assert!(prompt.contains("Guidance: User feels sad."));
        assert!(
            !prompt.contains("earlier private message"),
            "prior turns are advisory only and must not reach the prompt"
        );
    }

    #[test]
    fn unknown_mood_has_no_guidance_line() {
        let mood = CurrentMood {
            value: "bewildered".into(),
            label: "Bewildered".into(),
            emoji: "🤨".into(),
        };
        let prompt = compose_prompt("hi", Some(&mood));
        assert!(prompt.contains("User's current mood: Bewildered 🤨"));
        assert!(!prompt.contains("Guidance:"));
    }
}
