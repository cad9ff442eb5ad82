//! Canned coaching replies used when the backend is unreachable.
//!
//! [`fallback_reply`] is the last line of defence for the chat feature: it is
//! a pure function over the user's text and cannot fail.

/// Topic detected in a user's message for picking a canned reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackTopic {
    Greeting,
    Experience,
    Strength,
    Weakness,
    General,
}

const GREETING_REPLY: &str = "Hello! I'm your HireMate interview coach. I'm having trouble \
reaching the server right now, but you can still practise: tell me which role you're \
preparing for and try answering \"Tell me about yourself\" in under two minutes.";

const EXPERIENCE_REPLY: &str = "When describing your experience, use the STAR method: set the \
Situation, explain the Task, walk through the Actions you took, and finish with a measurable \
Result. Pick examples that match the job description.";

const STRENGTH_REPLY: &str = "For strengths, choose two or three that the role actually needs \
and back each one with a concrete example. \"I'm a fast learner\" lands better with a story \
about ramping up on something new under a deadline.";

const WEAKNESS_REPLY: &str = "For weaknesses, pick a real but non-critical area, explain how it \
showed up, and spend most of your answer on the steps you're taking to improve. Avoid \
disguised strengths like \"I work too hard\".";

const GENERAL_REPLY: &str = "I couldn't reach the interview coach service just now. Please try \
again in a moment. Meanwhile, keep your answers structured, specific and tied to the role \
you're applying for.";

impl FallbackTopic {
    /// Classify free text by case-insensitive keyword containment.
    ///
    /// Checked in order: greeting, experience, strength, weakness. The short
    /// greetings `hi` and `hey` only count as whole words.
    pub fn classify(text: &str) -> Self {
        let lower = text.to_lowercase();
        let has_word = |needle: &str| {
            lower
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == needle)
        };

        if lower.contains("hello") || has_word("hi") || has_word("hey") {
            FallbackTopic::Greeting
        } else if lower.contains("experience") {
            FallbackTopic::Experience
        } else if lower.contains("strength") {
            FallbackTopic::Strength
        } else if lower.contains("weakness") {
            FallbackTopic::Weakness
        } else {
            FallbackTopic::General
        }
    }

    /// The canned reply for this topic.
    pub fn reply(&self) -> &'static str {
        match self {
            FallbackTopic::Greeting => GREETING_REPLY,
            FallbackTopic::Experience => EXPERIENCE_REPLY,
            FallbackTopic::Strength => STRENGTH_REPLY,
            FallbackTopic::Weakness => WEAKNESS_REPLY,
            FallbackTopic::General => GENERAL_REPLY,
        }
    }

    pub fn all() -> [FallbackTopic; 5] {
        [
            FallbackTopic::Greeting,
            FallbackTopic::Experience,
            FallbackTopic::Strength,
            FallbackTopic::Weakness,
            FallbackTopic::General,
        ]
    }
}

/// Pick a canned reply for the user's text.
pub fn fallback_reply(text: &str) -> &'static str {
    FallbackTopic::classify(text).reply()
}
