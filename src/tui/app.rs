//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which mounts the overlay on the
//! terminal: the bubble row, the task card built from a render model, and the
//! inline result line. All task decisions are delegated to the `Session`.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::debug;

use crate::checker::CheckOutcome;
use crate::render::{Body, ControlKind, OptionRow, RenderModel};
use crate::session::Session;
use crate::source::SourceKind;
use crate::tui::{
    colors::{CardPalette, BUBBLE, BUBBLE_ACTIVE, BUBBLE_BLANK, RESULT_FAIL, RESULT_PASS},
    enums::{AppState, CardButton, Notice},
    input::InputField,
    utils::{centered_rect, hit, wrapped_height},
};

const BUBBLE_WIDTH: u16 = 5;
const BUBBLE_GAP: u16 = 1;

/// One vertical slice of the card's content column.
enum Piece<'a> {
    Title,
    Gap,
    Text(&'a str),
    Choice(&'a OptionRow, ControlKind),
    Answer(&'a str),
    Result,
    Buttons,
}

/// Terminal overlay state.
///
/// Owns the session plus everything that only matters to the terminal:
/// cursors, the answer field being edited, and the screen areas recorded on
/// the last draw for mouse hit-testing.
pub struct App {
    state: AppState,
    help_return: AppState,
    session: Session,
    source: SourceKind,
    palette: CardPalette,
    selected_bubble: usize,
    option_cursor: usize,
    answer: InputField,
    notice: Option<Notice>,
    status_message: String,
    bubble_areas: Vec<(Rect, usize)>,
    option_areas: Vec<(Rect, usize)>,
    button_areas: Vec<(Rect, CardButton)>,
}

impl App {
    pub fn new(session: Session, source: SourceKind) -> Self {
        let palette = CardPalette::from_theme(session.theme());
        App {
            state: AppState::Board,
            help_return: AppState::Board,
            session,
            source,
            palette,
            selected_bubble: 0,
            option_cursor: 0,
            answer: InputField::new(),
            notice: None,
            status_message: String::new(),
            bubble_areas: Vec::new(),
            option_areas: Vec::new(),
            button_areas: Vec::new(),
        }
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    fn task_count(&self) -> usize {
        self.session.tasks().len()
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Open task `index` on the card, discarding the previous task's input.
    pub fn open_task(&mut self, index: usize) {
        match self.session.open(index) {
            Ok(_) => {
                self.state = AppState::Card;
                self.selected_bubble = index;
                self.option_cursor = 0;
                self.answer.clear();
                self.notice = None;
            }
            Err(e) => self.set_status_message(e.to_string()),
        }
    }

    fn close_card(&mut self) {
        self.session.close();
        self.state = AppState::Board;
    }

    fn toggle_option(&mut self, option: usize) {
        self.option_cursor = option;
        if let Err(e) = self.session.select_option(option) {
            self.set_status_message(e.to_string());
        }
    }

    fn sync_answer(&mut self) {
        if let Err(e) = self.session.set_answer(&self.answer.value) {
            self.set_status_message(e.to_string());
        }
    }

    pub fn press(&mut self, button: CardButton) {
        match button {
            CardButton::Hint => self.notice = Some(Notice::Hint(self.session.hint())),
            CardButton::Check => {
                let outcome = self.session.check();
                debug!(?outcome, "check pressed");
                self.notice = Some(Notice::Result(outcome));
            }
            CardButton::Close => self.close_card(),
        }
    }

    fn move_bubble(&mut self, forward: bool) {
        let count = self.task_count();
        if count == 0 {
            return;
        }
        self.selected_bubble = if forward {
            (self.selected_bubble + 1).min(count - 1)
        } else {
            self.selected_bubble.saturating_sub(1)
        };
    }

    fn open_digit(&mut self, c: char) {
        if let Some(n) = c.to_digit(10).filter(|&n| n > 0) {
            let index = n as usize - 1;
            if index < self.task_count() {
                self.open_task(index);
            }
        }
    }

    fn handle_board_input(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Left | KeyCode::Char('h') => self.move_bubble(false),
            KeyCode::Right | KeyCode::Char('l') => self.move_bubble(true),
            KeyCode::Enter | KeyCode::Char(' ') => {
                if self.selected_bubble < self.task_count() {
                    self.open_task(self.selected_bubble);
                }
            }
            KeyCode::Char(c) if c.is_ascii_digit() => self.open_digit(c),
            KeyCode::Char('?') | KeyCode::F(1) => self.show_help(),
            _ => {}
        }
        false
    }

    fn handle_card_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        let Some(model) = self.session.render() else {
            self.close_card();
            return false;
        };

        match key {
            KeyCode::Esc => {
                self.close_card();
                return false;
            }
            KeyCode::Enter => {
                self.press(CardButton::Check);
                return false;
            }
            KeyCode::F(2) => {
                self.press(CardButton::Hint);
                return false;
            }
            KeyCode::F(1) => {
                self.show_help();
                return false;
            }
            KeyCode::PageUp => {
                if let Some(prev) = model.index.checked_sub(1) {
                    self.open_task(prev);
                }
                return false;
            }
            KeyCode::PageDown => {
                if model.index + 1 < self.task_count() {
                    self.open_task(model.index + 1);
                }
                return false;
            }
            _ => {}
        }

        match &model.body {
            Body::Quiz { options, .. } => match key {
                KeyCode::Up | KeyCode::Char('k') => {
                    self.option_cursor = self.option_cursor.saturating_sub(1);
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    if self.option_cursor + 1 < options.len() {
                        self.option_cursor += 1;
                    }
                }
                KeyCode::Char(' ') | KeyCode::Char('x') => {
                    if self.option_cursor < options.len() {
                        self.toggle_option(self.option_cursor);
                    }
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if let Some(n) = c.to_digit(10).filter(|&n| n > 0) {
                        if (n as usize) <= options.len() {
                            self.toggle_option(n as usize - 1);
                        }
                    }
                }
                KeyCode::Char('h') => self.press(CardButton::Hint),
                KeyCode::Char('c') => self.press(CardButton::Check),
                _ => {}
            },
            Body::Input { .. } => match key {
                KeyCode::Char(c) if !modifiers.contains(KeyModifiers::CONTROL) => {
                    self.answer.handle_char(c);
                    self.sync_answer();
                }
                KeyCode::Backspace => {
                    self.answer.handle_backspace();
                    self.sync_answer();
                }
                KeyCode::Delete => {
                    self.answer.handle_delete();
                    self.sync_answer();
                }
                KeyCode::Left => self.answer.move_cursor_left(),
                KeyCode::Right => self.answer.move_cursor_right(),
                KeyCode::Home => self.answer.move_home(),
                KeyCode::End => self.answer.move_end(),
                _ => {}
            },
            Body::Paragraph { .. } => match key {
                KeyCode::Char('h') => self.press(CardButton::Hint),
                KeyCode::Char('c') | KeyCode::Char(' ') => self.press(CardButton::Check),
                KeyCode::Char('q') => self.close_card(),
                _ => {}
            },
        }
        false
    }

    fn show_help(&mut self) {
        self.help_return = self.state;
        self.state = AppState::Help;
    }

    /// Handle one key press. Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            return true;
        }
        match self.state {
            AppState::Board => self.handle_board_input(key),
            AppState::Card => self.handle_card_input(key, modifiers),
            AppState::Help => {
                self.state = self.help_return;
                false
            }
        }
    }

    /// Handle a left click at a screen cell, using the areas of the last draw.
    pub fn handle_click(&mut self, column: u16, row: u16) {
        if self.state == AppState::Help {
            return;
        }
        if let Some(&(_, index)) = self.bubble_areas.iter().find(|(area, _)| hit(*area, column, row)) {
            self.open_task(index);
            return;
        }
        if self.state != AppState::Card {
            return;
        }
        if let Some(&(_, button)) = self.button_areas.iter().find(|(area, _)| hit(*area, column, row)) {
            self.press(button);
            return;
        }
        if let Some(&(_, option)) = self.option_areas.iter().find(|(area, _)| hit(*area, column, row)) {
            self.toggle_option(option);
        }
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    self.clear_status_message();
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
                Event::Mouse(mouse) => {
                    if let MouseEventKind::Down(MouseButton::Left) = mouse.kind {
                        self.clear_status_message();
                        self.handle_click(mouse.column, mouse.row);
                    }
                }
                _ => {}
            }
        }
        Ok(false)
    }

    /// Render the title line with the progress counter on the right.
    fn render_header(&mut self, f: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled("taskcard", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(
                format!("  ({})", self.source),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
        f.render_widget(title, area);

        let progress = Paragraph::new(self.session.progress())
            .style(Style::default().add_modifier(Modifier::BOLD))
            .alignment(Alignment::Right);
        f.render_widget(progress, area);
    }

    /// Render the bubble row, scrolled so the selected bubble stays visible.
    fn render_bubbles(&mut self, f: &mut Frame, area: Rect) {
        self.bubble_areas.clear();
        let slot_width = BUBBLE_WIDTH + BUBBLE_GAP;
        let visible = usize::from((area.width / slot_width).max(1));
        let first = (self.selected_bubble + 1).saturating_sub(visible);
        let current = self.session.current();

        for (offset, bubble) in self.session.bubbles().iter().skip(first).take(visible).enumerate() {
            let rect = Rect::new(
                area.x + offset as u16 * slot_width,
                area.y,
                BUBBLE_WIDTH.min(area.width),
                area.height.min(3),
            );

            let border = if !bubble.is_clickable() {
                Style::default().fg(BUBBLE_BLANK)
            } else if bubble.slot == self.selected_bubble {
                Style::default().fg(BUBBLE_ACTIVE).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let mut label = Style::default().add_modifier(Modifier::BOLD);
            if bubble.task.is_some() && bubble.task == current {
                label = label.bg(BUBBLE).fg(BUBBLE_ACTIVE);
            }

            let widget = Paragraph::new(bubble.label())
                .style(label)
                .alignment(Alignment::Center)
                .block(Block::default().borders(Borders::ALL).border_style(border));
            f.render_widget(widget, rect);

            if let Some(index) = bubble.task {
                self.bubble_areas.push((rect, index));
            }
        }
    }

    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let text = if self.task_count() == 0 {
            "No tasks were loaded."
        } else {
            "Click a bubble or press its number to open a task."
        };
        let paragraph = Paragraph::new(vec![Line::from(""), Line::from(text)])
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray));
        f.render_widget(paragraph, area);
    }

    /// Render the open task as a card: optional image slot on the left,
    /// content column on the right.
    fn render_card(&mut self, f: &mut Frame, area: Rect, model: &RenderModel) {
        self.option_areas.clear();
        self.button_areas.clear();

        let card_area = centered_rect(80, 90, area);
        f.render_widget(Clear, card_area);

        let mut card = Block::default().style(self.palette.body());
        if self.palette.has_frame() {
            card = card.borders(Borders::ALL).border_style(self.palette.region_border());
        }
        let inner = card.inner(card_area);
        f.render_widget(card, card_area);

        let right = match &model.image {
            Some(url) => {
                let columns = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
                    .split(inner);
                self.render_image_slot(f, columns[0], url);
                columns[1]
            }
            None => inner,
        };

        let mut region = Block::default().style(self.palette.body());
        region = if model.neon {
            region.borders(Borders::ALL).border_style(self.palette.region_border())
        } else {
            region.padding(Padding::horizontal(1))
        };
        let content = region.inner(right);
        f.render_widget(region, right);
        self.render_card_content(f, content, model);

        let close = Rect::new(card_area.right().saturating_sub(4), card_area.y, 3, 1);
        f.render_widget(Paragraph::new("[x]").style(self.palette.body()), close);
        self.button_areas.push((close, CardButton::Close));
    }

    fn render_image_slot(&mut self, f: &mut Frame, area: Rect, url: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" image ")
            .border_style(Style::default().fg(Color::DarkGray))
            .style(self.palette.body());
        let paragraph = Paragraph::new(vec![
            Line::from(""),
            Line::from("🖼").alignment(Alignment::Center),
            Line::from(""),
            Line::from(Span::styled(url.to_string(), Style::default().fg(Color::Gray))),
        ])
        .wrap(Wrap { trim: true })
        .block(block);
        f.render_widget(paragraph, area);
    }

    fn render_card_content(&mut self, f: &mut Frame, area: Rect, model: &RenderModel) {
        let width = area.width;
        let mut pieces: Vec<(Constraint, Piece)> = vec![
            (Constraint::Length(1), Piece::Title),
            (Constraint::Length(1), Piece::Gap),
        ];

        match &model.body {
            Body::Paragraph { text } => {
                pieces.push((Constraint::Length(wrapped_height(text, width)), Piece::Text(text)));
            }
            Body::Quiz { question, control, options } => {
                if let Some(question) = question {
                    pieces.push((Constraint::Length(wrapped_height(question, width)), Piece::Text(question)));
                    pieces.push((Constraint::Length(1), Piece::Gap));
                }
                for row in options {
                    pieces.push((Constraint::Length(1), Piece::Choice(row, *control)));
                }
            }
            Body::Input { question, placeholder } => {
                if let Some(question) = question {
                    pieces.push((Constraint::Length(wrapped_height(question, width)), Piece::Text(question)));
                    pieces.push((Constraint::Length(1), Piece::Gap));
                }
                pieces.push((Constraint::Length(3), Piece::Answer(placeholder)));
            }
        }

        pieces.push((Constraint::Min(0), Piece::Gap));
        pieces.push((Constraint::Length(1), Piece::Result));
        pieces.push((Constraint::Length(1), Piece::Buttons));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(pieces.iter().map(|(c, _)| *c).collect::<Vec<_>>())
            .split(area);

        let body = self.palette.body();
        for ((_, piece), chunk) in pieces.iter().zip(chunks.iter().copied()) {
            match piece {
                Piece::Title => {
                    let title = Paragraph::new(Span::styled(
                        model.title(),
                        body.add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                    ));
                    f.render_widget(title, chunk);
                }
                Piece::Gap => {}
                Piece::Text(text) => {
                    let paragraph = Paragraph::new(text.to_string()).style(body).wrap(Wrap { trim: false });
                    f.render_widget(paragraph, chunk);
                }
                Piece::Choice(row, control) => self.render_choice(f, chunk, row, *control),
                Piece::Answer(placeholder) => self.render_answer(f, chunk, placeholder),
                Piece::Result => self.render_result(f, chunk),
                Piece::Buttons => self.render_buttons(f, chunk, model),
            }
        }
    }

    fn render_choice(&mut self, f: &mut Frame, area: Rect, row: &OptionRow, control: ControlKind) {
        let selected = self.session.is_selected(row.index);
        let marker = match (control, selected) {
            (ControlKind::Radio, true) => "(•)",
            (ControlKind::Radio, false) => "( )",
            (ControlKind::Checkbox, true) => "[x]",
            (ControlKind::Checkbox, false) => "[ ]",
        };
        let mut style = self.palette.body();
        if selected {
            style = style.add_modifier(Modifier::BOLD);
        }
        if row.index == self.option_cursor {
            style = style.add_modifier(Modifier::REVERSED);
        }
        let line = Paragraph::new(format!("{marker} {}", row.label)).style(style);
        f.render_widget(line, area);
        self.option_areas.push((area, row.index));
    }

    fn render_answer(&mut self, f: &mut Frame, area: Rect, placeholder: &str) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .style(self.palette.body());
        let inner = block.inner(area);
        let (shown, column) = self.answer.viewport(inner.width as usize);
        let text = if self.answer.value.is_empty() {
            Span::styled(
                placeholder.to_string(),
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::raw(shown)
        };
        f.render_widget(Paragraph::new(text).block(block), area);

        let cursor_x = (column as u16).min(inner.width.saturating_sub(1));
        f.set_cursor_position((inner.x + cursor_x, inner.y));
    }

    fn render_result(&mut self, f: &mut Frame, area: Rect) {
        let Some(notice) = &self.notice else {
            return;
        };
        let color = match notice {
            Notice::Result(outcome) if outcome.is_pass() => RESULT_PASS,
            Notice::Result(CheckOutcome::NoTaskOpen) => Color::Gray,
            Notice::Result(_) => RESULT_FAIL,
            Notice::Hint(_) => BUBBLE_ACTIVE,
        };
        let line = Paragraph::new(notice.text())
            .style(self.palette.body().fg(color).add_modifier(Modifier::BOLD));
        f.render_widget(line, area);
    }

    fn render_buttons(&mut self, f: &mut Frame, area: Rect, model: &RenderModel) {
        let mut x = area.x;
        for (button, label) in [(CardButton::Hint, model.labels.hint), (CardButton::Check, model.labels.check)] {
            let text = format!("[ {label} ]");
            let width = (text.chars().count() as u16).min(area.right().saturating_sub(x));
            let rect = Rect::new(x, area.y, width, 1);
            let style = match button {
                CardButton::Check => Style::default().fg(Color::Black).bg(BUBBLE_ACTIVE),
                _ => Style::default().fg(BUBBLE_ACTIVE).bg(BUBBLE),
            };
            f.render_widget(Paragraph::new(text).style(style.add_modifier(Modifier::BOLD)), rect);
            self.button_areas.push((rect, button));
            x = rect.right().saturating_add(2);
        }
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(Span::styled("Bubble Row:", bold)),
            Line::from("  ←/→ h/l      Move between bubbles"),
            Line::from("  Enter/Space  Open the selected task"),
            Line::from("  1-9          Open a task by number"),
            Line::from("  Mouse        Click a bubble to open it"),
            Line::from("  q/Esc        Quit"),
            Line::from(""),
            Line::from(Span::styled("Task Card:", bold)),
            Line::from("  ↑/↓ k/j      Move between options"),
            Line::from("  Space/x/1-9  Select an option"),
            Line::from("  Type         Enter a free-text answer"),
            Line::from("  Enter        Check the answer"),
            Line::from("  F2 (h)       Show a hint"),
            Line::from("  PgUp/PgDn    Open the previous/next task"),
            Line::from("  Esc          Close the card"),
            Line::from(""),
            Line::from("  Ctrl+C       Quit from anywhere"),
        ];
        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: false });
        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            match self.state {
                AppState::Board => format!("Tasks: {} | Press '?' for help | q to quit", self.task_count()),
                AppState::Card => "Enter check | F2 hint | Esc close | PgUp/PgDn switch task".to_string(),
                AppState::Help => "Help".to_string(),
            }
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(BUBBLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    /// Main render function that dispatches to the view for the current state.
    pub fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_bubbles(f, chunks[1]);

        match self.state {
            AppState::Board => self.render_board(f, chunks[2]),
            AppState::Card => match self.session.render().filter(|_| self.session.is_visible()) {
                Some(model) => self.render_card(f, chunks[2], &model),
                None => self.render_board(f, chunks[2]),
            },
            AppState::Help => self.render_help(f, chunks[2]),
        }

        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
