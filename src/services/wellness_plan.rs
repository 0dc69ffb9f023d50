use crate::models::wellness::{HealthMetrics, WellnessPlan};
use crate::services::gemini::{GenerationParams, GenerativeProvider};

const PLAN_PARAMS: GenerationParams = GenerationParams {
    max_output_tokens: 2048,
    temperature: 0.7,
    top_p: 0.9,
};

pub const HEMOGLOBIN_WARNING: &str =
    "Your hemoglobin appears low. Please consult a doctor for proper evaluation.";

const EXERCISE_PLAN: [&str; 5] = [
    "30 minutes of brisk walking 5 days a week to improve circulation",
    "Yoga or stretching for 15 minutes daily to reduce stress",
    "Light strength training 2-3 times per week for bone health",
    "Deep breathing exercises for 5 minutes twice daily",
    "Outdoor activities for natural vitamin D synthesis",
];

const SLEEP_PLAN: [&str; 4] = [
    "Maintain 7-8 hours of consistent sleep schedule",
    "Create a dark, cool sleeping environment",
    "Avoid screens 1 hour before bedtime",
    "Practice relaxation techniques before sleep",
];

const LOCAL_FOODS_PLAN: [&str; 5] = [
    "Jaggery (gur) as natural iron source instead of refined sugar",
    "Moong dal and masoor dal for protein and iron absorption",
    "Sprouted grains and legumes for enhanced nutrition",
    "Amla for vitamin C to improve iron absorption",
    "Turmeric milk before bed for better sleep and immunity",
];

/// Metric values arrive under the report's original heading or the
/// extraction step's normalized key; both are accepted.
fn metric<'a>(metrics: &'a HealthMetrics, names: &[&str]) -> Option<&'a str> {
    names
        .iter()
        .find_map(|name| metrics.get(*name).map(String::as_str))
}

fn value_matches(value: &str, markers: &[&str]) -> bool {
    markers.iter().any(|marker| value.contains(marker))
}

/// Rule-based wellness plan. Pure and total: the last line of defense in the
/// fallback chain, so it must always produce a well-formed four-key plan.
///
/// First applicable rule per metric wins; metrics absent from the map are
/// silently skipped.
pub fn structured_plan(metrics: &HealthMetrics) -> WellnessPlan {
    let mut diet = Vec::new();

    let hemoglobin = metric(metrics, &["Hemoglobin", "hemoglobin"]);
    let hemoglobin_low = hemoglobin.is_some_and(|v| value_matches(v, &["10.", "Below"]));

    if hemoglobin_low {
        diet.push("Increase iron-rich foods like spinach, lentils, and lean red meat".to_string());
        diet.push("Combine iron foods with vitamin C sources like oranges and tomatoes".to_string());
    } else {
        diet.push("Maintain balanced iron intake with leafy greens and legumes".to_string());
    }

    if metric(metrics, &["Vitamin D", "vitaminD"])
        .is_some_and(|v| value_matches(v, &["15", "Low"]))
    {
        diet.push("Add vitamin D rich foods like fortified milk, eggs, and fatty fish".to_string());
        diet.push("Consider 15-20 minutes of morning sunlight exposure daily".to_string());
    }

    if metric(metrics, &["Cholesterol", "cholesterol"]).is_some_and(|v| v.contains("220")) {
        diet.push("Reduce saturated fats and increase fiber-rich foods like oats".to_string());
    }

    if metric(metrics, &["Blood Glucose (Fasting)", "bloodSugar"])
        .is_some_and(|v| value_matches(v, &["126", "High"]))
    {
        diet.push("Cut refined carbohydrates and prefer whole grains and millets".to_string());
    }

    diet.push("Stay hydrated with 8-10 glasses of water daily".to_string());

    // The safety-critical warning always leads the diet list.
    if hemoglobin_low {
        diet.insert(0, HEMOGLOBIN_WARNING.to_string());
    }

    WellnessPlan {
        diet,
        exercise: EXERCISE_PLAN.iter().map(|s| s.to_string()).collect(),
        sleep: SLEEP_PLAN.iter().map(|s| s.to_string()).collect(),
        local_foods: LOCAL_FOODS_PLAN.iter().map(|s| s.to_string()).collect(),
    }
}

fn plan_prompt(metrics: &HealthMetrics) -> String {
    format!(
        r#"Based on this health report data: {}

Generate a personalized wellness plan with these sections:
- diet: Array of 4-5 specific dietary recommendations
- exercise: Array of 4-5 exercise suggestions
- sleep: Array of 3-4 sleep improvement tips
- localFoods: Array of 4-5 Indian/local food recommendations

Return ONLY a valid JSON object with these 4 arrays. Each recommendation should be specific and actionable.
Format each array item as a complete sentence.
Focus on practical, achievable recommendations.
If any health values seem concerning, include appropriate warnings.
Make recommendations culturally appropriate for Indian context where applicable.

Example format:
{{
  "diet": ["Increase iron-rich foods like spinach and lentils", "..."],
  "exercise": ["30 minutes of brisk walking daily", "..."],
  "sleep": ["Maintain 7-8 hours of consistent sleep", "..."],
  "localFoods": ["Include jaggery instead of refined sugar", "..."]
}}

Return as valid JSON only, no additional text or formatting."#,
        serde_json::to_string(metrics).unwrap_or_default()
    )
}

/// Greedy span: first `{` through the last `}`. Model responses often wrap
/// the object in prose or code fences.
fn extract_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

fn parse_plan(text: &str) -> Option<WellnessPlan> {
    let span = extract_json_object(text)?;
    // Deserializing into WellnessPlan doubles as the shape check: an object
    // missing any of the four keys is a parse failure.
    serde_json::from_str(span).ok()
}

/// AI wellness-plan adapter. Schema-guided generation with the structured
/// generator as the fallback on missing credential, provider error, or an
/// unparseable response.
pub async fn generate_plan(
    ai: Option<&dyn GenerativeProvider>,
    metrics: &HealthMetrics,
) -> WellnessPlan {
    let Some(ai) = ai else {
        tracing::info!("Gemini AI not configured, using structured wellness plan");
        return structured_plan(metrics);
    };

    match ai.generate(&plan_prompt(metrics), &PLAN_PARAMS).await {
        Ok(text) => match parse_plan(&text) {
            Some(plan) => plan,
            None => {
                tracing::warn!("Wellness plan response was not valid JSON, using structured fallback");
                structured_plan(metrics)
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "Wellness plan generation failed, using structured fallback");
            structured_plan(metrics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CannedProvider {
        calls: AtomicUsize,
        response: anyhow::Result<String>,
    }

    impl CannedProvider {
        fn ok(response: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Ok(response.to_string()),
            }
        }

        fn err(message: &str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                response: Err(anyhow::anyhow!(message.to_string())),
            }
        }
    }

    #[async_trait]
    impl GenerativeProvider for CannedProvider {
        async fn generate(
            &self,
            _prompt: &str,
            _params: &GenerationParams,
        ) -> anyhow::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.response {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(anyhow::anyhow!(e.to_string())),
            }
        }
    }

    fn metrics(pairs: &[(&str, &str)]) -> HealthMetrics {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn assert_well_formed(plan: &WellnessPlan) {
        assert!(!plan.diet.is_empty());
        assert!(!plan.exercise.is_empty());
        assert!(!plan.sleep.is_empty());
        assert!(!plan.local_foods.is_empty());
    }

    #[test]
    fn structured_plan_is_total_on_empty_input() {
        assert_well_formed(&structured_plan(&HealthMetrics::new()));
    }

    #[test]
    fn structured_plan_ignores_unknown_metrics() {
        let plan = structured_plan(&metrics(&[("Platelets", "250,000 /μL")]));
        assert_well_formed(&plan);
        assert_eq!(
            plan.diet,
            vec![
                "Maintain balanced iron intake with leafy greens and legumes",
                "Stay hydrated with 8-10 glasses of water daily",
            ]
        );
    }

    #[test]
    fn low_hemoglobin_puts_doctor_warning_first() {
        let plan = structured_plan(&metrics(&[("Hemoglobin", "10.2 g/dL")]));
        assert_eq!(plan.diet[0], HEMOGLOBIN_WARNING);
        assert!(plan.diet[1].starts_with("Increase iron-rich foods"));
    }

    #[test]
    fn below_marker_also_counts_as_low_hemoglobin() {
        let plan = structured_plan(&metrics(&[("hemoglobin", "Below normal range")]));
        assert_eq!(plan.diet[0], HEMOGLOBIN_WARNING);
    }

    #[test]
    fn normal_hemoglobin_gets_maintenance_guidance() {
        let plan = structured_plan(&metrics(&[("Hemoglobin", "13.5 g/dL")]));
        assert!(plan.diet[0].starts_with("Maintain balanced iron intake"));
    }

    #[test]
    fn low_vitamin_d_and_high_cholesterol_rules_fire() {
        let plan = structured_plan(&metrics(&[
            ("Vitamin D", "15 ng/mL"),
            ("Cholesterol", "220 mg/dL"),
        ]));
        assert!(plan
            .diet
            .iter()
            .any(|line| line.starts_with("Add vitamin D rich foods")));
        assert!(plan
            .diet
            .iter()
            .any(|line| line.starts_with("Reduce saturated fats")));
    }

    #[test]
    fn hydration_line_closes_the_diet_list() {
        let plan = structured_plan(&metrics(&[("Hemoglobin", "12.5 g/dL")]));
        assert_eq!(
            plan.diet.last().map(String::as_str),
            Some("Stay hydrated with 8-10 glasses of water daily")
        );
    }

    #[test]
    fn extract_json_object_spans_first_to_last_brace() {
        assert_eq!(
            extract_json_object("prose {\"a\": {\"b\": 1}} trailing"),
            Some("{\"a\": {\"b\": 1}}")
        );
        assert_eq!(extract_json_object("no braces here"), None);
        assert_eq!(extract_json_object("} reversed {"), None);
    }

    #[tokio::test]
    async fn no_credential_uses_structured_plan_without_provider_call() {
        let plan = generate_plan(None, &metrics(&[("Hemoglobin", "10.2 g/dL")])).await;
        assert_eq!(plan.diet[0], HEMOGLOBIN_WARNING);
    }

    #[tokio::test]
    async fn valid_json_response_is_parsed() {
        let provider = CannedProvider::ok(
            r#"Here is your plan:
{"diet":["a"],"exercise":["b"],"sleep":["c"],"localFoods":["d"]}"#,
        );
        let plan = generate_plan(Some(&provider), &HealthMetrics::new()).await;
        assert_eq!(plan.diet, vec!["a"]);
        assert_eq!(plan.local_foods, vec!["d"]);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn response_missing_a_key_falls_back_to_structured() {
        let provider = CannedProvider::ok(r#"{"diet":["a"],"exercise":["b"],"sleep":["c"]}"#);
        let plan = generate_plan(Some(&provider), &HealthMetrics::new()).await;
        assert_eq!(plan.local_foods.len(), LOCAL_FOODS_PLAN.len());
    }

    #[tokio::test]
    async fn unparseable_response_falls_back_to_structured() {
        let provider = CannedProvider::ok("I am unable to produce JSON today.");
        let plan = generate_plan(Some(&provider), &HealthMetrics::new()).await;
        assert_well_formed(&plan);
    }

    #[tokio::test]
    async fn provider_error_falls_back_to_structured() {
        let provider = CannedProvider::err("quota exceeded");
        let plan = generate_plan(Some(&provider), &metrics(&[("Hemoglobin", "10.1 g/dL")])).await;
        assert_eq!(plan.diet[0], HEMOGLOBIN_WARNING);
    }
}
