//! Step-through tutorials and their quizzes.

use std::collections::BTreeMap;

use rocket_config::{QuizQuestionConfig, TutorialConfig, TutorialStepConfig};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TutorialError {
    #[error("tutorial `{0}` not found")]
    UnknownTutorial(String),
    #[error("tutorial `{tutorial}` has no step {step}")]
    UnknownStep { tutorial: String, step: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TutorialSummary {
    pub title: String,
    pub steps: usize,
}

/// A step plus its position in the tutorial.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TutorialStep {
    #[serde(flatten)]
    pub step: TutorialStepConfig,
    /// 1-based.
    pub step_number: usize,
    pub total_steps: usize,
    pub is_last: bool,
}

#[derive(Debug, Clone, Default)]
pub struct TutorialLibrary {
    tutorials: Vec<TutorialConfig>,
}

impl TutorialLibrary {
    pub fn new(tutorials: Vec<TutorialConfig>) -> Self {
        Self { tutorials }
    }

    pub fn tutorial(&self, id: &str) -> Option<&TutorialConfig> {
        self.tutorials.iter().find(|t| t.id == id)
    }

    pub fn summaries(&self) -> BTreeMap<String, TutorialSummary> {
        self.tutorials
            .iter()
            .map(|t| {
                (
                    t.id.clone(),
                    TutorialSummary {
                        title: t.title.clone(),
                        steps: t.steps.len(),
                    },
                )
            })
            .collect()
    }

    /// Step `index` (0-based) of tutorial `id`.
    pub fn step(&self, id: &str, index: usize) -> Result<TutorialStep, TutorialError> {
        let tutorial = self
            .tutorial(id)
            .ok_or_else(|| TutorialError::UnknownTutorial(id.to_string()))?;
        let step = tutorial
            .steps
            .get(index)
            .ok_or_else(|| TutorialError::UnknownStep {
                tutorial: id.to_string(),
                step: index,
            })?;
        let total_steps = tutorial.steps.len();
        Ok(TutorialStep {
            step: step.clone(),
            step_number: index + 1,
            total_steps,
            is_last: index + 1 == total_steps,
        })
    }

    /// Quiz for a tutorial; unknown tutorials and tutorials without a quiz give none.
    pub fn quiz(&self, id: &str) -> &[QuizQuestionConfig] {
        self.tutorial(id).map(|t| t.quiz.as_slice()).unwrap_or_default()
    }
}
