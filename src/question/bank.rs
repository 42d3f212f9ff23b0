//! Question bank
//!
//! Questions are validated on construction and never change afterwards.
//! Picking clones one out of the bank so each prompt session owns its copy.

use rand::Rng;

use crate::error::GateError;

// =============================================================================
// QUESTION
// =============================================================================

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    prompt: String,
    choices: Vec<String>,
    correct_index: usize,
}

impl Question {
    /// Build a question. Needs at least two choices and a correct index
    /// inside them.
    pub fn new<I, S>(
        prompt: impl Into<String>,
        choices: I,
        correct_index: usize,
    ) -> Result<Self, GateError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let prompt = prompt.into();
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();

        if choices.len() < 2 {
            return Err(GateError::InvalidQuestion(format!(
                "{prompt:?} has {} choice(s), need at least 2",
                choices.len()
            )));
        }
        if correct_index >= choices.len() {
            return Err(GateError::InvalidQuestion(format!(
                "{prompt:?} marks choice {correct_index} correct but has {}",
                choices.len()
            )));
        }

        Ok(Self {
            prompt,
            choices,
            correct_index,
        })
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Choices in display order. Indices are stable.
    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn is_correct(&self, index: usize) -> bool {
        index == self.correct_index
    }
}

// =============================================================================
// BANK
// =============================================================================

/// Non-empty, ordered, immutable collection of questions.
#[derive(Debug, Clone)]
pub struct QuestionBank {
    questions: Vec<Question>,
}

impl QuestionBank {
    pub fn new(questions: Vec<Question>) -> Result<Self, GateError> {
        if questions.is_empty() {
            return Err(GateError::EmptyBank);
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    /// Always false: construction rejects empty banks.
    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Index of a uniformly random question.
    pub fn pick_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        rng.gen_range(0..self.questions.len())
    }

    /// Uniformly random question.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> &Question {
        &self.questions[self.pick_index(rng)]
    }
}

impl Default for QuestionBank {
    fn default() -> Self {
        default_bank()
    }
}

// =============================================================================
// BUILT-IN CONTENT
// =============================================================================

const DEFAULT_QUESTIONS: &[(&str, [&str; 4], usize)] = &[
    (
        "What is a force?",
        [
            "A push or a pull (measured in Newtons)",
            "A type of energy (measured in Joules)",
            "A type of mass",
            "A speed measurement",
        ],
        0,
    ),
    (
        "Which is a non-contact force?",
        ["Pushing a block", "Friction", "Gravity", "Tension from a rope"],
        2,
    ),
    (
        "Which reduces air resistance (drag)?",
        [
            "Rough surface",
            "Aerodynamic design (streamlining)",
            "Increasing mass",
            "Adding fins randomly",
        ],
        1,
    ),
    (
        "What is centre of mass?",
        [
            "The point where aerodynamic forces act",
            "The rocket's balance point",
            "The point of highest pressure",
            "A point outside the rocket only",
        ],
        1,
    ),
    (
        "How many fins is the minimum for stable flight?",
        ["1", "2", "3", "4"],
        2,
    ),
    (
        "1 kJ equals how many joules?",
        ["10 J", "100 J", "1000 J", "0.001 J"],
        2,
    ),
    (
        "Which is kinetic energy?",
        [
            "Stored energy due to height",
            "Energy of motion",
            "Energy in chemical bonds only",
            "Energy that can't be transferred",
        ],
        1,
    ),
    (
        "Convection works because heated liquids/gases:",
        [
            "Become denser and sink",
            "Become less dense and rise",
            "Stop moving entirely",
            "Change chemically",
        ],
        1,
    ),
    (
        "Which rock forms from cooling magma?",
        ["Sedimentary", "Metamorphic", "Igneous", "Organic"],
        2,
    ),
    (
        "Friction is observed when:",
        [
            "Two surfaces rub together",
            "Objects do not touch",
            "In vacuum only",
            "When electricity flows",
        ],
        0,
    ),
];

/// The built-in ten-question science bank.
pub fn default_bank() -> QuestionBank {
    let questions = DEFAULT_QUESTIONS
        .iter()
        .filter_map(|(prompt, choices, correct)| Question::new(*prompt, *choices, *correct).ok())
        .collect();
    QuestionBank { questions }
}

// =============================================================================
// TESTS
// =============================================================================
