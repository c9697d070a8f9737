//! Personalized nutrition advice.
//!
//! Builds a full health-context prompt from the profile and the latest
//! assessment, cleans the generated prose for plain-text display, and
//! degrades to canned local guidance when the collaborator fails.

use std::sync::Arc;

use crate::adapters::text::clean_markdown;
use crate::adapters::StorageError;
use crate::domain::{Assessment, UserProfile};
use crate::ports::{ProfileStore, TextGenerator};
use crate::{GlucoguardError, Result};

/// Questions touching these topics get a medical disclaimer appended.
const MEDICAL_KEYWORDS: [&str; 6] = [
    "medicine",
    "medication",
    "insulin",
    "doctor",
    "treatment",
    "diagnosis",
];

const DISCLAIMER: &str = "\n\nPlease note: This advice is for informational purposes only and \
     should not replace medical guidance. Always consult your healthcare provider before making \
     changes to your diet or diabetes management plan.";

const EMPTY_GENERATION_APOLOGY: &str = "I'm sorry, I couldn't generate a response. \
     Please try rephrasing your question or ask something else.";

/// Service for generative nutrition advice.
pub struct AdviceService<G, P>
where
    G: TextGenerator,
    P: ProfileStore,
{
    generator: Arc<G>,
    profiles: Arc<P>,
}

impl<G, P> AdviceService<G, P>
where
    G: TextGenerator,
    P: ProfileStore,
    P::Error: Into<StorageError>,
{
    /// Create a new advice service.
    pub fn new(generator: Arc<G>, profiles: Arc<P>) -> Self {
        Self {
            generator,
            profiles,
        }
    }

    /// Answer a nutrition question with the user's full health context.
    ///
    /// # Errors
    /// Returns `Validation` for an empty message and `Storage` if the
    /// profile store fails. Generator failures do not error; the reply
    /// degrades to fixed local guidance.
    pub fn advise(&self, user_id: &str, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(GlucoguardError::Validation("message is required".into()));
        }

        let profile = self
            .profiles
            .profile(user_id)
            .map_err(|e| GlucoguardError::Storage(e.into()))?
            .unwrap_or_default();
        let assessment = self
            .profiles
            .last_assessment(user_id)
            .map_err(|e| GlucoguardError::Storage(e.into()))?;

        let prompt = advice_prompt(message, &profile, assessment.as_ref());

        let mut reply = match self.generator.generate(&prompt, false) {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    tracing::warn!("Empty response from the advice generator");
                    EMPTY_GENERATION_APOLOGY.to_string()
                } else {
                    clean_markdown(text)
                }
            }
            Err(e) => {
                tracing::warn!("Advice generation failed, serving local fallback: {e}");
                fallback_advice(message)
            }
        };

        let lowered = message.to_lowercase();
        if MEDICAL_KEYWORDS
            .iter()
            .any(|keyword| lowered.contains(keyword))
        {
            reply.push_str(DISCLAIMER);
        }

        Ok(reply)
    }
}

fn fallback_advice(message: &str) -> String {
    format!(
        "I understand you're asking about '{message}'. I'm currently unable to connect to the \
         nutrition advice service. Here's some general advice: Focus on low glycemic index foods \
         like whole grains (brown rice, quinoa), legumes, and non-starchy vegetables. Monitor \
         portion sizes and include protein-rich foods to stabilize blood sugar. Please try again \
         or consult a dietitian for personalized advice."
    )
}

fn advice_prompt(message: &str, profile: &UserProfile, assessment: Option<&Assessment>) -> String {
    let unknown = || "unknown".to_string();
    let age = profile.age.map_or_else(unknown, |v| v.to_string());
    let gender = profile.gender.clone().unwrap_or_else(unknown);
    let weight = profile.weight.map_or_else(unknown, |v| v.to_string());
    let height = profile.height.map_or_else(unknown, |v| v.to_string());
    let activity_level = profile.activity_level.as_deref().unwrap_or("moderate");
    let diet_type = profile.diet_type;
    let allergies = if profile.allergies.is_empty() {
        "None reported".to_string()
    } else {
        profile.allergies.join(", ")
    };
    let diabetes_type = profile.diabetes_type.as_deref().unwrap_or("Type 2");
    let blood_sugar = profile.blood_sugar_levels.as_deref().unwrap_or("normal");
    let medications = profile.medication_details.as_deref().unwrap_or("none");
    let glucose = assessment.map_or_else(unknown, |a| format!("{:.0}", a.record.glucose));
    let bmi = assessment.map_or_else(unknown, |a| format!("{:.1}", a.record.bmi));

    format!(
        "You are a nutrition assistant specializing in diabetes management for Indian users. \
         Provide personalized nutrition advice based on this user's complete profile:\n\
         USER PROFILE:\n\
         - Age: {age}\n\
         - Gender: {gender}\n\
         - Weight: {weight}\n\
         - Height: {height}\n\
         - Activity level: {activity_level}\n\
         - Diet type: {diet_type}\n\
         - Allergies/Intolerances: {allergies}\n\
         - Diabetes type: {diabetes_type}\n\
         - Recent blood sugar levels: {blood_sugar}\n\
         - Latest glucose reading: {glucose}\n\
         - BMI: {bmi}\n\
         - Current medications: {medications}\n\
         USER QUESTION: {message}\n\
         Guidelines for your response:\n\
         1. Focus on Indian cuisine and dietary patterns\n\
         2. Provide practical, culturally appropriate advice\n\
         3. Include specific food recommendations and alternatives\n\
         4. Be concise but thorough (150-250 words)\n\
         5. When relevant, include glycemic index information\n\
         6. Emphasize how specific food choices affect blood sugar\n\
         7. Return plain text without any Markdown formatting\n\
         If you don't have enough information to provide personalized advice, ask relevant \
         follow-up questions first, then provide general diabetes nutrition guidelines."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryProfileStore;
    use crate::ports::ExternalServiceError;

    struct FakeGenerator {
        response: Option<&'static str>,
    }

    impl TextGenerator for FakeGenerator {
        fn generate(
            &self,
            _prompt: &str,
            _expect_structured: bool,
        ) -> std::result::Result<String, ExternalServiceError> {
            match self.response {
                Some(text) => Ok(text.to_string()),
                None => Err(ExternalServiceError::Transport("down".into())),
            }
        }
    }

    fn service(
        response: Option<&'static str>,
    ) -> AdviceService<FakeGenerator, InMemoryProfileStore> {
        AdviceService::new(
            Arc::new(FakeGenerator { response }),
            Arc::new(InMemoryProfileStore::new()),
        )
    }

    #[test]
    fn test_markdown_is_stripped_from_reply() {
        let svc = service(Some("**Eat** more *greens*."));
        let reply = svc.advise("u1", "what should I eat?").expect("advise");
        assert_eq!(reply, "Eat more greens.");
    }

    #[test]
    fn test_disclaimer_appended_for_medical_keywords() {
        let svc = service(Some("Talk to your care team."));
        let reply = svc
            .advise("u1", "Should I change my insulin dose?")
            .expect("advise");
        assert!(reply.contains("informational purposes only"));

        let plain = svc.advise("u1", "best breakfast ideas?").expect("advise");
        assert!(!plain.contains("informational purposes only"));
    }

    #[test]
    fn test_generator_failure_serves_fallback() {
        let svc = service(None);
        let reply = svc.advise("u1", "snack ideas").expect("advise");
        assert!(reply.contains("asking about 'snack ideas'"));
        assert!(reply.contains("low glycemic index"));
    }

    #[test]
    fn test_empty_generation_gets_apology() {
        let svc = service(Some("   "));
        let reply = svc.advise("u1", "help").expect("advise");
        assert!(reply.starts_with("I'm sorry"));
    }

    #[test]
    fn test_empty_message_is_rejected() {
        let svc = service(Some("hi"));
        let err = svc.advise("u1", "  ").expect_err("must fail");
        assert_eq!(err.code(), "validation_error");
    }
}
