use anyhow::Result;
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use std::cell::Cell;
use std::io;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::action::Action;
use crate::async_patch::{PatchRequest, PatchResult, PatchWorker};
use crate::components::command_bar::{command_bar_areas, CommandBar};
use crate::components::header::HeaderBar;
use crate::components::patch_view::PatchView;
use crate::components::reference_list::{row_at, ReferenceList};
use crate::components::status_bar::StatusBar;
use crate::components::Component;
use crate::config::{self, VdiffConfig};
use crate::event::{map_key_to_action, Event, EventReader, KeyContext};
use crate::git::extract::parse_output;
use crate::git::{CommandRunner, GitCommands, PatchFetcher, Reference, VdiffError};
use crate::highlight::{highlight_patch, HighlightEngine};
use crate::state::{AppState, DetailContent, FocusPanel};
use crate::theme::next_theme;
use crate::tui::Tui;

/// Rows taken by everything but the patch text: header, command bar,
/// status bar and the patch view's own borders.
const CHROME_HEIGHT: u16 = 1 + 3 + 1 + 2;

pub type SharedRunner = Arc<dyn CommandRunner + Send + Sync>;

pub struct App {
    state: AppState,
    worker: PatchWorker,
    runner: SharedRunner,
    commands: GitCommands,
    config: VdiffConfig,
    highlight_engine: HighlightEngine,
    /// Raw text behind the published patch, kept to re-highlight on theme change.
    shown_patch: Option<(Reference, Arc<str>)>,
    status_clear_countdown: u32,
    list_area: Cell<Rect>,
    command_area: Cell<Rect>,
}

impl App {
    pub fn new(
        references: Vec<Reference>,
        runner: SharedRunner,
        commands: GitCommands,
        config: VdiffConfig,
        theme_name: &str,
    ) -> io::Result<Self> {
        let fetcher = PatchFetcher::new(Arc::clone(&runner), commands.clone());
        let worker = PatchWorker::new(fetcher)?;
        let state = AppState::new(&config.command, config.theme(theme_name));

        let mut app = Self {
            state,
            worker,
            runner,
            commands,
            config,
            highlight_engine: HighlightEngine::new(),
            shown_patch: None,
            status_clear_countdown: 0,
            list_area: Cell::new(Rect::default()),
            command_area: Cell::new(Rect::default()),
        };
        app.load_references(references);
        if app.state.selection.references().is_empty() {
            app.state.focus = FocusPanel::Command;
        }
        Ok(app)
    }

    pub async fn run(&mut self, terminal: &mut Tui) -> Result<()> {
        let mut events = EventReader::new(Duration::from_millis(50));

        let header = HeaderBar;
        let command_bar = CommandBar;
        let reference_list = ReferenceList;
        let patch_view = PatchView;
        let status_bar = StatusBar;

        loop {
            self.poll_patch_results();

            let term_size = terminal.size()?;
            self.state.detail.viewport_height =
                term_size.height.saturating_sub(CHROME_HEIGHT).max(1) as usize;

            terminal.draw(|frame| {
                let outer = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([
                        Constraint::Length(1),
                        Constraint::Length(3),
                        Constraint::Min(3),
                        Constraint::Length(1),
                    ])
                    .split(frame.area());

                let main = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Length(24), Constraint::Min(20)])
                    .split(outer[2]);

                self.command_area.set(outer[1]);
                self.list_area.set(main[0]);

                header.render(frame, outer[0], &self.state);
                command_bar.render(frame, outer[1], &self.state);
                reference_list.render(frame, main[0], &self.state);
                patch_view.render(frame, main[1], &self.state);
                status_bar.render(frame, outer[3], &self.state);
            })?;

            // Wait for at least one event, then drain all pending events
            // to avoid input lag from buffered scroll/key events.
            let first = events.next().await;
            let mut pending = Vec::new();
            if let Some(ev) = first {
                pending.push(ev);
            }
            while let Some(ev) = events.try_next() {
                pending.push(ev);
            }

            // Coalesce: collapse consecutive scroll actions into net movement
            let mut scroll_delta: i32 = 0;
            let mut actions: Vec<Action> = Vec::new();

            for event in pending {
                let ctx = KeyContext {
                    focus: self.state.focus,
                };
                let action = match event {
                    Event::Key(key) => map_key_to_action(key, &ctx),
                    Event::Mouse(mouse) => self.handle_mouse(mouse),
                    Event::Resize => Some(Action::Resize),
                    Event::Tick => Some(Action::Tick),
                };
                match action {
                    Some(Action::ScrollUp) => scroll_delta -= 1,
                    Some(Action::ScrollDown) => scroll_delta += 1,
                    Some(other) => actions.push(other),
                    None => {}
                }
            }

            if scroll_delta < 0 {
                self.state.detail.scroll_up(scroll_delta.unsigned_abs() as usize);
            } else if scroll_delta > 0 {
                self.state.detail.scroll_down(scroll_delta as usize);
            }

            for action in actions {
                self.update(action);
            }

            if self.state.should_quit {
                break;
            }
        }

        info!("quitting");
        Ok(())
    }

    fn update(&mut self, action: Action) {
        match action {
            Action::Quit => self.state.should_quit = true,
            Action::Tick => {
                if self.status_clear_countdown > 0 {
                    self.status_clear_countdown -= 1;
                    if self.status_clear_countdown == 0 {
                        self.state.status_message = None;
                    }
                }
            }
            Action::Resize => {}

            Action::FocusNext => self.state.focus = self.state.focus.next(),
            Action::FocusPrev => self.state.focus = self.state.focus.prev(),
            Action::FocusCommand => self.state.focus = FocusPanel::Command,

            Action::SelectUp => {
                let request = self.state.selection.select_up();
                self.dispatch(request);
            }
            Action::SelectDown => {
                let request = self.state.selection.select_down();
                self.dispatch(request);
            }
            Action::SelectFirst => {
                let request = self.state.selection.select_first();
                self.dispatch(request);
            }
            Action::SelectLast => {
                let request = self.state.selection.select_last();
                self.dispatch(request);
            }
            Action::SelectReference(index) => {
                self.state.focus = FocusPanel::References;
                let request = self.state.selection.highlight(index);
                self.dispatch(request);
            }
            Action::Retry => {
                let request = self.state.selection.refetch();
                self.dispatch(request);
            }

            Action::ScrollUp => self.state.detail.scroll_up(1),
            Action::ScrollDown => self.state.detail.scroll_down(1),
            Action::ScrollPageUp => {
                let page = self.state.detail.viewport_height;
                self.state.detail.scroll_up(page);
            }
            Action::ScrollPageDown => {
                let page = self.state.detail.viewport_height;
                self.state.detail.scroll_down(page);
            }
            Action::ScrollToTop => self.state.detail.scroll_to_top(),
            Action::ScrollToBottom => self.state.detail.scroll_to_bottom(),

            Action::RunCommand => self.run_command(),
            Action::CommandChar(c) => self.state.command.insert_char(c),
            Action::CommandBackspace => self.state.command.delete_back(),
            Action::CommandDeleteWord => self.state.command.delete_word_back(),
            Action::CommandLeft => self.state.command.move_left(),
            Action::CommandRight => self.state.command.move_right(),
            Action::CommandHome => self.state.command.move_home(),
            Action::CommandEnd => self.state.command.move_end(),
            Action::HistoryPrev => self.state.command.history_prev(),
            Action::HistoryNext => self.state.command.history_next(),

            Action::YankReference => self.yank_reference(),
            Action::CycleTheme => self.cycle_theme(),
        }
    }

    fn dispatch(&mut self, request: Option<PatchRequest>) {
        let Some(request) = request else {
            return;
        };
        debug!(
            generation = request.generation,
            reference = %request.reference,
            "requesting patch"
        );
        self.state.detail.set_loading(request.reference.clone());
        if let Err(request) = self.worker.request(request) {
            warn!(reference = %request.reference, "patch worker is not running");
            self.state
                .detail
                .publish_error(request.reference, "patch worker stopped".to_string());
            self.shown_patch = None;
            self.set_status("Patch worker stopped; restart vdiff".to_string(), true);
        }
    }

    fn load_references(&mut self, references: Vec<Reference>) {
        info!(count = references.len(), "loading references");
        let request = self.state.selection.load(references);
        if request.is_none() {
            self.state.detail.clear();
            self.shown_patch = None;
        }
        self.dispatch(request);
    }

    fn poll_patch_results(&mut self) {
        while let Some(result) = self.worker.try_recv() {
            self.handle_patch_result(result);
        }
    }

    fn handle_patch_result(&mut self, result: PatchResult) {
        self.state.cached_patches = result.cached_patches;
        if !self.state.selection.accepts(&result) {
            debug!(
                generation = result.generation,
                reference = %result.reference,
                "discarding stale patch"
            );
            return;
        }

        match result.patch {
            Ok(patch) => {
                let text = highlight_patch(&patch, &self.highlight_engine, &self.state.theme);
                self.state
                    .detail
                    .publish_patch(result.reference.clone(), text);
                self.shown_patch = Some((result.reference, patch));
            }
            Err(e) => {
                warn!(reference = %result.reference, error = %e, "patch fetch failed");
                self.state
                    .detail
                    .publish_error(result.reference, e.to_string());
                self.shown_patch = None;
            }
        }
    }

    /// Run the command bar's query and replace the list with what it prints.
    /// On failure the current list stays.
    fn run_command(&mut self) {
        let line = self.state.command.text().trim().to_string();
        if line.is_empty() {
            self.set_status("Type a git command that lists commits".to_string(), true);
            return;
        }
        self.state.command.commit();

        match self.query(&line) {
            Ok(references) => {
                let count = references.len();
                self.load_references(references);
                if count > 0 {
                    self.state.focus = FocusPanel::References;
                }
                self.set_status(format!("{count} commits from `{line}`"), false);
            }
            Err(e) => {
                warn!(command = %line, error = %e, "query failed");
                self.set_status(e.to_string(), true);
            }
        }
    }

    fn query(&self, line: &str) -> Result<Vec<Reference>, VdiffError> {
        let argv = self.commands.query_args(line)?;
        let output = self.runner.run(&argv)?;
        Ok(parse_output(&output))
    }

    fn yank_reference(&mut self) {
        let Some(reference) = self.state.selection.active().cloned() else {
            return;
        };
        match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(reference.as_str())) {
            Ok(()) => self.set_status(format!("Copied {reference} to clipboard"), false),
            Err(e) => {
                warn!(error = %e, "clipboard unavailable");
                self.set_status(format!("Clipboard error: {e}"), true);
            }
        }
    }

    fn cycle_theme(&mut self) {
        let name = next_theme(&self.state.theme.name);
        self.apply_theme(name);
        if let Err(e) = config::save_theme(name) {
            warn!(error = %e, "failed to save theme");
        }
        self.set_status(format!("Theme: {name}"), false);
    }

    fn apply_theme(&mut self, name: &str) {
        self.state.theme = self.config.theme(name);

        // Patch colours are baked into the styled text.
        if let Some((reference, patch)) = &self.shown_patch {
            if matches!(&self.state.detail.content, DetailContent::Patch { reference: shown, .. } if shown == reference)
            {
                let text = highlight_patch(patch, &self.highlight_engine, &self.state.theme);
                self.state.detail.publish_patch(reference.clone(), text);
            }
        }
    }

    fn handle_mouse(&self, mouse: MouseEvent) -> Option<Action> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Action::ScrollUp),
            MouseEventKind::ScrollDown => Some(Action::ScrollDown),
            MouseEventKind::Down(MouseButton::Left) => {
                let (col, row) = (mouse.column, mouse.row);
                let (input, button) = command_bar_areas(self.command_area.get());
                if contains(button, col, row) {
                    return Some(Action::RunCommand);
                }
                if contains(input, col, row) {
                    return Some(Action::FocusCommand);
                }
                row_at(
                    self.list_area.get(),
                    col,
                    row,
                    self.state.selection.selected(),
                    self.state.selection.references().len(),
                )
                .map(Action::SelectReference)
            }
            _ => None,
        }
    }

    fn set_status(&mut self, msg: String, is_error: bool) {
        self.state.status_message = Some((msg, is_error));
        // ~3 seconds at 50ms tick rate
        self.status_clear_countdown = 60;
    }
}

fn contains(area: Rect, col: u16, row: u16) -> bool {
    col >= area.x && col < area.x + area.width && row >= area.y && row < area.y + area.height
}
