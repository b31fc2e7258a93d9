//! Label language selection.
//!
//! The card labels (heading, hint and check buttons) follow the script of the
//! task text: any Cyrillic character selects Russian, everything else English.
//! The choice is made per task on every open.

use serde::Serialize;

use crate::fields::TaskKind;
use crate::task::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    Russian,
}

/// Localized labels for one open task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Labels {
    pub language: Language,
    pub heading: &'static str,
    pub hint: &'static str,
    pub check: &'static str,
}

fn is_cyrillic(c: char) -> bool {
    matches!(c, '\u{0400}'..='\u{04FF}')
}

/// Detect the label language from the task's text and question.
pub fn detect_language(task: &Task) -> Language {
    if task.localizable_text().chars().any(is_cyrillic) {
        Language::Russian
    } else {
        Language::English
    }
}

pub fn heading(kind: TaskKind, language: Language) -> &'static str {
    let ru = language == Language::Russian;
    match kind {
        TaskKind::Text => if ru { "Задание" } else { "Task" },
        TaskKind::ImageText => if ru { "Опиши картинку" } else { "Describe the picture" },
        TaskKind::QuestionQuiz => if ru { "Вопрос" } else { "Question" },
        TaskKind::ImageQuiz => "Quiz",
        TaskKind::ImageQuestionQuiz => if ru { "Вопрос + квиз" } else { "Question + quiz" },
        TaskKind::ImageInput => if ru { "Впиши ответ" } else { "Type the answer" },
        TaskKind::QuestionInput => if ru { "Вопрос" } else { "Question" },
    }
}

pub fn labels_for(task: &Task) -> Labels {
    let language = detect_language(task);
    let (hint, check) = match language {
        Language::Russian => ("Подсказка", "Проверить"),
        Language::English => ("Hint", "Check"),
    };
    Labels { language, heading: heading(task.kind, language), hint, check }
}
