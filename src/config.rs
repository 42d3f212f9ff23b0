//! Gate configuration
//!
//! Timing windows and user-facing text. All values are fixed at construction;
//! nothing is derived at runtime.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use turn_gate::GateConfig;
//!
//! let config = GateConfig::default()
//!     .with_cooldown(Duration::from_secs(2))
//!     .with_prompt_timeout(Some(Duration::from_secs(30)));
//! ```

use std::time::Duration;

use crate::types::InputSources;

/// Grace window after a correct answer.
pub const GRACE_WINDOW: Duration = Duration::from_millis(500);
/// Cooldown after an incorrect answer.
pub const COOLDOWN: Duration = Duration::from_millis(1200);
/// How long the "turn skipped" notice stays up.
pub const NOTICE_DURATION: Duration = Duration::from_millis(900);
/// Feedback shown before a correct answer resolves.
pub const CORRECT_FEEDBACK_DELAY: Duration = Duration::from_millis(240);
/// Feedback shown before an incorrect answer resolves.
pub const INCORRECT_FEEDBACK_DELAY: Duration = Duration::from_millis(600);

/// Gate configuration
#[derive(Debug, Clone, PartialEq)]
pub struct GateConfig {
    pub grace_window: Duration,
    pub cooldown: Duration,
    pub notice_duration: Duration,
    pub correct_feedback_delay: Duration,
    pub incorrect_feedback_delay: Duration,
    /// `None` means prompts never expire.
    pub prompt_timeout: Option<Duration>,
    /// Channels the interceptor gates.
    pub sources: InputSources,
    pub skip_notice: String,
    /// Persistent line shown while the gate is attached. `None` for none.
    pub hint: Option<String>,
    pub title: String,
    pub correct_feedback: String,
    pub incorrect_feedback: String,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            grace_window: GRACE_WINDOW,
            cooldown: COOLDOWN,
            notice_duration: NOTICE_DURATION,
            correct_feedback_delay: CORRECT_FEEDBACK_DELAY,
            incorrect_feedback_delay: INCORRECT_FEEDBACK_DELAY,
            prompt_timeout: None,
            sources: InputSources::GATED,
            skip_notice: "Turn skipped".to_string(),
            hint: Some("Answer a question to take each turn".to_string()),
            title: "Answer to take your turn".to_string(),
            correct_feedback: "Correct ✓".to_string(),
            incorrect_feedback: "Incorrect — turn skipped.".to_string(),
        }
    }
}

impl GateConfig {
    pub fn with_grace_window(mut self, grace_window: Duration) -> Self {
        self.grace_window = grace_window;
        self
    }

    pub fn with_cooldown(mut self, cooldown: Duration) -> Self {
        self.cooldown = cooldown;
        self
    }

    pub fn with_notice_duration(mut self, notice_duration: Duration) -> Self {
        self.notice_duration = notice_duration;
        self
    }

    /// Set both feedback delays at once (correct, incorrect).
    pub fn with_feedback_delays(mut self, correct: Duration, incorrect: Duration) -> Self {
        self.correct_feedback_delay = correct;
        self.incorrect_feedback_delay = incorrect;
        self
    }

    pub fn with_prompt_timeout(mut self, prompt_timeout: Option<Duration>) -> Self {
        self.prompt_timeout = prompt_timeout;
        self
    }

    pub fn with_sources(mut self, sources: InputSources) -> Self {
        self.sources = sources;
        self
    }

    pub fn with_skip_notice(mut self, text: impl Into<String>) -> Self {
        self.skip_notice = text.into();
        self
    }

    pub fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
