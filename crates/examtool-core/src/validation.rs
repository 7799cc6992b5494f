//! Exam validation.
//!
//! The parser accepts anything that is structurally well formed. Before an
//! exam is imported it must also satisfy the exam service's rules, checked
//! here over the whole exam at once.

use thiserror::Error;

use crate::model::Exam;

/// A rule the exam service would reject.
///
/// `section` and `question` are 0-based indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("section {section} ({name}): lotteryOn and lotteryItemCount must be set together")]
    LotteryMismatch { section: usize, name: String },

    #[error("section {section} ({name}): lottery item count must be greater than 0")]
    LotteryCountZero { section: usize, name: String },

    #[error("section {section} ({name}): lottery item count {count} exceeds {questions} question(s)")]
    LotteryCountExceedsQuestions {
        section: usize,
        name: String,
        count: u32,
        questions: usize,
    },

    #[error("section {section} ({name}), question {question}: needs at least 2 options, found {options}")]
    TooFewOptions {
        section: usize,
        name: String,
        question: usize,
        options: usize,
    },

    #[error("section {section} ({name}), question {question}: no correct option")]
    NoCorrectOption {
        section: usize,
        name: String,
        question: usize,
    },
}

/// Check every section and question, collecting all issues.
pub fn validate_exam(exam: &Exam) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for (si, section) in exam.sections.iter().enumerate() {
        let name = || section.name.clone();

        match (section.lottery_on, section.lottery_item_count) {
            (None, None) => {}
            (Some(true), Some(count)) => {
                if count == 0 {
                    errors.push(ValidationError::LotteryCountZero {
                        section: si,
                        name: name(),
                    });
                } else if count as usize > section.questions.len() {
                    errors.push(ValidationError::LotteryCountExceedsQuestions {
                        section: si,
                        name: name(),
                        count,
                        questions: section.questions.len(),
                    });
                }
            }
            _ => errors.push(ValidationError::LotteryMismatch {
                section: si,
                name: name(),
            }),
        }

        for (qi, question) in section.questions.iter().enumerate() {
            if question.options.len() < 2 {
                errors.push(ValidationError::TooFewOptions {
                    section: si,
                    name: name(),
                    question: qi,
                    options: question.options.len(),
                });
            }
            if !question.has_correct_option() {
                errors.push(ValidationError::NoCorrectOption {
                    section: si,
                    name: name(),
                    question: qi,
                });
            }
        }
    }

    errors
}
