//! Overlay session state.
//!
//! A `Session` owns the task list for the lifetime of the overlay along with
//! the only mutable state there is: which task is open, whether the card is
//! visible, and the input collected for the open task. Only [`Session::open`]
//! changes the open index.

use thiserror::Error;
use tracing::debug;

use crate::checker::{check, CheckOutcome, Response, HINT_MESSAGE};
use crate::fields::TaskFamily;
use crate::progress::{bubbles, progress_label, Bubble};
use crate::render::{render_task, RenderModel};
use crate::task::Task;
use crate::theme::Theme;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("There is no task {number}; the list has {count}")]
    NoSuchTask { number: usize, count: usize },

    #[error("No task is open")]
    NoTaskOpen,

    #[error("Task {number} is not a quiz")]
    NotAQuiz { number: usize },

    #[error("Task {number} has no option {option}")]
    NoSuchOption { number: usize, option: usize },

    #[error("Task {number} has no answer field")]
    NotAnInput { number: usize },
}

pub struct Session {
    tasks: Vec<Task>,
    theme: Theme,
    current: Option<usize>,
    visible: bool,
    response: Response,
}

impl Session {
    pub fn new(tasks: Vec<Task>, theme: Theme) -> Self {
        Session { tasks, theme, current: None, visible: false, response: Response::Empty }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn current(&self) -> Option<usize> {
        self.current
    }

    pub fn current_task(&self) -> Option<&Task> {
        self.current.and_then(|i| self.tasks.get(i))
    }

    /// Whether the card is showing.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn bubbles(&self) -> Vec<Bubble> {
        bubbles(self.tasks.len())
    }

    pub fn progress(&self) -> String {
        progress_label(self.current, self.tasks.len())
    }

    /// Open task `index`, replacing whatever was open and clearing its input.
    pub fn open(&mut self, index: usize) -> Result<RenderModel, SessionError> {
        let Some(task) = self.tasks.get(index) else {
            return Err(SessionError::NoSuchTask { number: index + 1, count: self.tasks.len() });
        };
        let model = render_task(task, index, self.tasks.len(), &self.theme);
        debug!(task = index + 1, kind = %task.kind, "opened task");
        self.current = Some(index);
        self.visible = true;
        self.response = Response::Empty;
        Ok(model)
    }

    /// Render model of the open task.
    pub fn render(&self) -> Option<RenderModel> {
        let index = self.current?;
        let task = self.tasks.get(index)?;
        Some(render_task(task, index, self.tasks.len(), &self.theme))
    }

    /// Hide the card. The open index is kept for the progress display.
    pub fn close(&mut self) {
        self.visible = false;
    }

    fn open_task(&self) -> Result<(usize, &Task), SessionError> {
        let index = self.current.ok_or(SessionError::NoTaskOpen)?;
        let task = self.tasks.get(index).ok_or(SessionError::NoTaskOpen)?;
        Ok((index, task))
    }

    /// Select option `option` of the open quiz. Single-select quizzes replace
    /// the selection; multi-select quizzes toggle the option.
    pub fn select_option(&mut self, option: usize) -> Result<(), SessionError> {
        let (index, task) = self.open_task()?;
        let number = index + 1;
        if task.kind.family() != TaskFamily::Quiz {
            return Err(SessionError::NotAQuiz { number });
        }
        if option >= task.options().len() {
            return Err(SessionError::NoSuchOption { number, option });
        }
        let multi = task.is_multi_select();

        let mut selected = match std::mem::take(&mut self.response) {
            Response::Choices(selected) => selected,
            _ => Default::default(),
        };
        if !multi {
            selected.clear();
            selected.insert(option);
        } else if !selected.remove(&option) {
            selected.insert(option);
        }
        self.response = Response::Choices(selected);
        Ok(())
    }

    pub fn is_selected(&self, option: usize) -> bool {
        matches!(&self.response, Response::Choices(selected) if selected.contains(&option))
    }

    /// Replace the free-text answer of the open task.
    pub fn set_answer(&mut self, text: &str) -> Result<(), SessionError> {
        let (index, task) = self.open_task()?;
        if task.kind.family() != TaskFamily::FreeText {
            return Err(SessionError::NotAnInput { number: index + 1 });
        }
        self.response = Response::Text(text.to_string());
        Ok(())
    }

    /// Check the open task against the collected input.
    pub fn check(&self) -> CheckOutcome {
        let Ok((index, task)) = self.open_task() else {
            return CheckOutcome::NoTaskOpen;
        };
        let outcome = check(task, &self.response);
        debug!(task = index + 1, ?outcome, "checked answer");
        outcome
    }

    pub fn hint(&self) -> &'static str {
        HINT_MESSAGE
    }
}
