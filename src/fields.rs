//! Enumerations and field types for overlay tasks.
//!
//! This module defines the task kinds understood by the overlay and the
//! interaction family each kind belongs to.

use serde::{Deserialize, Serialize};

/// The seven task kinds, serialized under the `type` key of a task object.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum TaskKind {
    Text,
    ImageText,
    QuestionQuiz,
    ImageQuiz,
    ImageQuestionQuiz,
    ImageInput,
    QuestionInput,
}

/// How a task is interacted with, shared by several kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFamily {
    /// Body copy only; checking acknowledges.
    Display,
    /// Option rows with single or multi select.
    Quiz,
    /// One free-text field, optionally graded by a pattern.
    FreeText,
}

impl TaskKind {
    pub const ALL: [TaskKind; 7] = [
        TaskKind::Text,
        TaskKind::ImageText,
        TaskKind::QuestionQuiz,
        TaskKind::ImageQuiz,
        TaskKind::ImageQuestionQuiz,
        TaskKind::ImageInput,
        TaskKind::QuestionInput,
    ];

    /// The wire name of the kind, as it appears in task JSON.
    pub fn as_str(self) -> &'static str {
        match self {
            TaskKind::Text => "text",
            TaskKind::ImageText => "imageText",
            TaskKind::QuestionQuiz => "questionQuiz",
            TaskKind::ImageQuiz => "imageQuiz",
            TaskKind::ImageQuestionQuiz => "imageQuestionQuiz",
            TaskKind::ImageInput => "imageInput",
            TaskKind::QuestionInput => "questionInput",
        }
    }

    /// Whether the kind may show an image slot.
    pub fn is_image(self) -> bool {
        self.as_str().starts_with("image")
    }

    pub fn family(self) -> TaskFamily {
        match self {
            TaskKind::Text | TaskKind::ImageText => TaskFamily::Display,
            TaskKind::QuestionQuiz | TaskKind::ImageQuiz | TaskKind::ImageQuestionQuiz => {
                TaskFamily::Quiz
            }
            TaskKind::ImageInput | TaskKind::QuestionInput => TaskFamily::FreeText,
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip_through_serde() {
        for kind in TaskKind::ALL {
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
            let back: TaskKind = serde_json::from_str(&json).unwrap();
            assert_eq!(back, kind);
        }
    }

    #[test]
    fn test_image_kinds() {
        let image: Vec<_> = TaskKind::ALL.iter().filter(|k| k.is_image()).collect();
        assert_eq!(
            image,
            vec![
                &TaskKind::ImageText,
                &TaskKind::ImageQuiz,
                &TaskKind::ImageQuestionQuiz,
                &TaskKind::ImageInput
            ]
        );
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        assert!(serde_json::from_str::<TaskKind>("\"video\"").is_err());
    }
}
