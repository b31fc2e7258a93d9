//! Enumerations for TUI state management.

use crate::checker::CheckOutcome;

/// Which screen the terminal user interface shows.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum AppState {
    /// Bubble row only; the card is closed.
    Board,
    /// The card is open over the bubble row.
    Card,
    Help,
}

/// Clickable controls on the card.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum CardButton {
    Hint,
    Check,
    Close,
}

/// Message shown in the card's result line until the next open.
#[derive(Clone, PartialEq, Debug)]
pub enum Notice {
    Hint(&'static str),
    Result(CheckOutcome),
}

impl Notice {
    pub fn text(&self) -> String {
        match self {
            Notice::Hint(message) => message.to_string(),
            Notice::Result(CheckOutcome::PatternError(detail)) => format!("Pattern error: {detail}"),
            Notice::Result(outcome) => outcome.message().to_string(),
        }
    }
}
