//! Card rendering decisions.
//!
//! [`render_task`] maps a task and the theme to a [`RenderModel`]: a plain
//! description of what the card shows. Mounting the model on a surface is the
//! terminal UI's job; keeping the decisions here lets them be tested without
//! one.

use serde::Serialize;

use crate::fields::{TaskFamily, TaskKind};
use crate::locale::{labels_for, Labels};
use crate::progress::progress_label;
use crate::task::Task;
use crate::theme::Theme;

pub const DEFAULT_PLACEHOLDER: &str = "Type the answer…";

/// Selection control used by every option row of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlKind {
    Radio,
    Checkbox,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRow {
    /// Index into the task's options, reported back when selected.
    pub index: usize,
    pub label: String,
}

/// The card body, one shape per task family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "camelCase")]
pub enum Body {
    Paragraph {
        text: String,
    },
    Quiz {
        question: Option<String>,
        control: ControlKind,
        options: Vec<OptionRow>,
    },
    Input {
        question: Option<String>,
        placeholder: String,
    },
}

/// Everything the card shows for one open task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderModel {
    pub index: usize,
    pub kind: TaskKind,
    /// Image URL; the image slot is hidden when `None`.
    pub image: Option<String>,
    pub labels: Labels,
    pub body: Body,
    pub progress: String,
    /// Neon emphasis on both card regions. Set by the theme, not the task.
    pub neon: bool,
}

impl RenderModel {
    pub fn title(&self) -> &'static str {
        self.labels.heading
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn render_body(task: &Task) -> Body {
    match task.kind.family() {
        TaskFamily::Display => Body::Paragraph { text: task.text.clone().unwrap_or_default() },
        TaskFamily::Quiz => Body::Quiz {
            question: non_empty(task.question.as_deref()),
            control: if task.is_multi_select() { ControlKind::Checkbox } else { ControlKind::Radio },
            options: task
                .options()
                .iter()
                .enumerate()
                .map(|(index, label)| OptionRow { index, label: label.clone() })
                .collect(),
        },
        TaskFamily::FreeText => Body::Input {
            question: non_empty(task.question.as_deref()),
            placeholder: non_empty(task.prompt.as_deref())
                .unwrap_or_else(|| DEFAULT_PLACEHOLDER.to_string()),
        },
    }
}

/// Describe the card for task `index` of a list of `count` tasks.
pub fn render_task(task: &Task, index: usize, count: usize, theme: &Theme) -> RenderModel {
    RenderModel {
        index,
        kind: task.kind,
        image: task.image_url().map(str::to_string),
        labels: labels_for(task),
        body: render_body(task),
        progress: progress_label(Some(index), count),
        neon: theme.neon,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::default_task;
    use crate::task::answer_indices;

    #[test]
    fn test_default_quiz_renders_radio_rows() {
        let model = render_task(&default_task(), 0, 1, &Theme::default());
        assert_eq!(model.title(), "Question");
        assert_eq!(model.progress, "1/1");
        assert_eq!(model.image, None);
        assert!(!model.neon);
        match model.body {
            Body::Quiz { question, control, options } => {
                assert_eq!(question.as_deref(), Some("Where is the armchair?"));
                assert_eq!(control, ControlKind::Radio);
                assert_eq!(options.len(), 3);
                assert_eq!(options[1], OptionRow { index: 1, label: "In the living room".into() });
            }
            other => panic!("unexpected body {other:?}"),
        }
    }

    #[test]
    fn test_multiple_answers_use_checkboxes() {
        let task = Task {
            options: Some(vec!["a".into(), "b".into(), "c".into()]),
            answers: Some(answer_indices(&[0, 2])),
            ..Task::new(TaskKind::ImageQuestionQuiz)
        };
        assert!(matches!(render_body(&task), Body::Quiz { control: ControlKind::Checkbox, .. }));
    }

    #[test]
    fn test_image_slot_visibility() {
        let mut task = Task { image: Some("https://img.test/a.png".into()), ..Task::new(TaskKind::ImageQuiz) };
        assert_eq!(
            render_task(&task, 0, 1, &Theme::default()).image.as_deref(),
            Some("https://img.test/a.png")
        );

        task.kind = TaskKind::QuestionQuiz;
        assert_eq!(render_task(&task, 0, 1, &Theme::default()).image, None);

        let bare = Task::new(TaskKind::ImageText);
        assert_eq!(render_task(&bare, 0, 1, &Theme::default()).image, None);
    }

    #[test]
    fn test_display_body_is_single_paragraph() {
        let task = Task { text: Some("Read carefully".into()), ..Task::new(TaskKind::Text) };
        assert_eq!(render_body(&task), Body::Paragraph { text: "Read carefully".into() });
        assert_eq!(render_body(&Task::new(TaskKind::ImageText)), Body::Paragraph { text: String::new() });
    }

    #[test]
    fn test_input_placeholder_and_optional_question() {
        let bare = Task::new(TaskKind::QuestionInput);
        assert_eq!(
            render_body(&bare),
            Body::Input { question: None, placeholder: DEFAULT_PLACEHOLDER.into() }
        );

        let prompted = Task {
            question: Some("Capital of France?".into()),
            prompt: Some("City name".into()),
            ..Task::new(TaskKind::ImageInput)
        };
        assert_eq!(
            render_body(&prompted),
            Body::Input { question: Some("Capital of France?".into()), placeholder: "City name".into() }
        );

        let empty_question = Task { question: Some(String::new()), ..Task::new(TaskKind::QuestionQuiz) };
        assert!(matches!(render_body(&empty_question), Body::Quiz { question: None, .. }));
    }

    #[test]
    fn test_neon_follows_theme_not_task() {
        let theme = Theme { neon: true, ..Theme::default() };
        for kind in TaskKind::ALL {
            assert!(render_task(&Task::new(kind), 0, 1, &theme).neon);
        }
    }

    #[test]
    fn test_labels_follow_task_language() {
        let task = Task { question: Some("Где кресло?".into()), ..default_task() };
        let model = render_task(&task, 2, 5, &Theme::default());
        assert_eq!(model.title(), "Вопрос");
        assert_eq!(model.labels.check, "Проверить");
        assert_eq!(model.progress, "3/5");
    }

    #[test]
    fn test_model_serializes_for_scripting() {
        let model = render_task(&default_task(), 0, 1, &Theme::default());
        let json = serde_json::to_value(&model).unwrap();
        assert_eq!(json["kind"], "questionQuiz");
        assert_eq!(json["body"]["shape"], "quiz");
        assert_eq!(json["body"]["control"], "radio");
        assert_eq!(json["labels"]["heading"], "Question");
    }
}
