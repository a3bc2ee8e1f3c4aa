//! Application core — event loop, focus management, action dispatch.
//!
//! One page: three cascading selection lists (community → province →
//! municipality), two search inputs (postal code + street name), and a
//! results table. Controller state arrives through the data bridge as
//! actions; user intents go back out as controller operations.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{Event as CrosstermEvent, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Position, Rect},
    text::{Line, Span},
    widgets::{
        Block, BorderType, Borders, Cell, List, ListItem, ListState, Paragraph, Row, Table,
        TableState,
    },
};
use throbber_widgets_tui::{Throbber, ThrobberState};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};
use tui_input::Input;
use tui_input::backend::crossterm::EventHandler;

use callejero_core::{
    Controller, Municipality, NO_RESULTS_MESSAGE, Province, Region, SearchState, Selection,
    can_search,
};

use crate::action::Action;
use crate::bridge;
use crate::event::{Event, EventReader};
use crate::theme;
use crate::tui::Tui;

// ── Focus ────────────────────────────────────────────────────────────

/// Input zones on the page, in Tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Regions,
    Provinces,
    Municipalities,
    PostalCode,
    StreetName,
    Results,
}

impl Focus {
    /// All zones in Tab order.
    pub const ALL: [Focus; 6] = [
        Self::Regions,
        Self::Provinces,
        Self::Municipalities,
        Self::PostalCode,
        Self::StreetName,
        Self::Results,
    ];

    /// Next zone in Tab order (wraps around).
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous zone in Tab order (wraps around).
    pub fn prev(self) -> Self {
        let idx = Self::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Panel label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Regions => "Comunidad autónoma",
            Self::Provinces => "Provincia",
            Self::Municipalities => "Municipio",
            Self::PostalCode => "Código postal",
            Self::StreetName => "Nombre de vía",
            Self::Results => "Vías",
        }
    }

    fn is_text_input(self) -> bool {
        matches!(self, Self::PostalCode | Self::StreetName)
    }
}

// ── App ──────────────────────────────────────────────────────────────

/// Top-level application state and event loop.
pub struct App {
    controller: Controller,
    /// Zone holding input focus.
    focus: Focus,
    /// Whether the app should keep running.
    running: bool,
    /// Terminal size for responsive layout.
    terminal_size: (u16, u16),

    // Mirrors of controller state, updated through bridge actions.
    regions: Arc<Vec<Region>>,
    provinces: Arc<Vec<Province>>,
    municipalities: Arc<Vec<Municipality>>,
    selection: Selection,
    search: SearchState,

    // Page-local widget state.
    region_list: ListState,
    province_list: ListState,
    municipality_list: ListState,
    results_table: TableState,
    postal_input: Input,
    street_input: Input,
    throbber: ThrobberState,

    /// Action sender — the bridge and key handler dispatch through this.
    action_tx: mpsc::UnboundedSender<Action>,
    /// Action receiver — main loop drains this.
    action_rx: mpsc::UnboundedReceiver<Action>,
}

impl App {
    pub fn new(controller: Controller) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();

        Self {
            controller,
            focus: Focus::default(),
            running: true,
            terminal_size: (0, 0),
            regions: Arc::new(Vec::new()),
            provinces: Arc::new(Vec::new()),
            municipalities: Arc::new(Vec::new()),
            selection: Selection::default(),
            search: SearchState::default(),
            region_list: ListState::default(),
            province_list: ListState::default(),
            municipality_list: ListState::default(),
            results_table: TableState::default(),
            postal_input: Input::default(),
            street_input: Input::default(),
            throbber: ThrobberState::default(),
            action_tx,
            action_rx,
        }
    }

    /// Run the main event loop. This is the heart of the TUI.
    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        self.terminal_size = tui.size().unwrap_or((80, 24));

        // Bridge task: startup regions fetch + state forwarding.
        let cancel = CancellationToken::new();
        tokio::spawn(bridge::run_data_bridge(
            self.controller.clone(),
            self.action_tx.clone(),
            cancel.clone(),
        ));

        let mut events = EventReader::new(
            Duration::from_millis(250), // 4 Hz tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            // 1. Wait for the next event
            let Some(event) = events.next().await else {
                break;
            };

            // 2. Map event → action(s)
            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key) {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => {
                    self.action_tx.send(Action::Resize(w, h))?;
                }
                Event::Tick => {
                    self.action_tx.send(Action::Tick)?;
                }
                Event::Render => {
                    self.action_tx.send(Action::Render)?;
                }
            }

            // 3. Drain and process all queued actions
            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action);

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        cancel.cancel();
        events.stop();
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Key handling ─────────────────────────────────────────────────

    /// Map a key event to an action. Text-input zones swallow most keys;
    /// list zones mutate their own highlight state directly.
    fn handle_key_event(&mut self, key: KeyEvent) -> Option<Action> {
        // Ctrl+C always quits, regardless of focus.
        if key.modifiers == KeyModifiers::CONTROL && key.code == KeyCode::Char('c') {
            return Some(Action::Quit);
        }

        if self.focus.is_text_input() {
            return match key.code {
                KeyCode::Tab => Some(Action::FocusNext),
                KeyCode::BackTab => Some(Action::FocusPrev),
                KeyCode::Enter => Some(Action::SubmitSearch),
                KeyCode::Esc => Some(Action::Quit),
                _ => {
                    self.feed_focused_input(key);
                    None
                }
            };
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Some(Action::Quit),
            KeyCode::Tab => Some(Action::FocusNext),
            KeyCode::BackTab => Some(Action::FocusPrev),
            KeyCode::Up | KeyCode::Char('k') => {
                self.move_selection(-1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.move_selection(1);
                None
            }
            KeyCode::Enter => self.choose_highlighted(),
            // Clear the focused axis (the blank option of a select).
            KeyCode::Backspace | KeyCode::Delete => match self.focus {
                Focus::Regions => Some(Action::ChooseRegion(String::new())),
                Focus::Provinces => Some(Action::ChooseProvince(String::new())),
                Focus::Municipalities => Some(Action::ChooseMunicipality(String::new())),
                _ => None,
            },
            _ => None,
        }
    }

    /// Feed a key into the focused text input and sync the controller.
    fn feed_focused_input(&mut self, key: KeyEvent) {
        match self.focus {
            Focus::PostalCode => {
                self.postal_input.handle_event(&CrosstermEvent::Key(key));
                self.controller.set_postal_code(self.postal_input.value());
            }
            Focus::StreetName => {
                self.street_input.handle_event(&CrosstermEvent::Key(key));
                self.controller.set_street_query(self.street_input.value());
            }
            _ => {}
        }
    }

    /// Move the highlight in the focused list or table.
    fn move_selection(&mut self, delta: isize) {
        match self.focus {
            Focus::Regions => {
                move_list_selection(&mut self.region_list, self.regions.len(), delta);
            }
            Focus::Provinces => {
                move_list_selection(&mut self.province_list, self.provinces.len(), delta);
            }
            Focus::Municipalities => {
                move_list_selection(
                    &mut self.municipality_list,
                    self.municipalities.len(),
                    delta,
                );
            }
            Focus::Results => {
                move_table_selection(&mut self.results_table, self.search.streets.len(), delta);
            }
            Focus::PostalCode | Focus::StreetName => {}
        }
    }

    /// Enter on a list applies the highlighted entry as the selection.
    fn choose_highlighted(&mut self) -> Option<Action> {
        match self.focus {
            Focus::Regions => self
                .region_list
                .selected()
                .and_then(|i| self.regions.get(i))
                .map(|r| Action::ChooseRegion(r.code.clone())),
            Focus::Provinces => self
                .province_list
                .selected()
                .and_then(|i| self.provinces.get(i))
                .map(|p| Action::ChooseProvince(p.code.clone())),
            Focus::Municipalities => self
                .municipality_list
                .selected()
                .and_then(|i| self.municipalities.get(i))
                .map(|m| Action::ChooseMunicipality(m.code.to_string())),
            Focus::Results | Focus::PostalCode | Focus::StreetName => Some(Action::SubmitSearch),
        }
    }

    // ── Action processing ────────────────────────────────────────────

    /// Process a single action — update app state and drive the controller.
    fn process_action(&mut self, action: &Action) {
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::Resize(w, h) => {
                self.terminal_size = (*w, *h);
            }

            Action::Tick => {
                if self.search.loading {
                    self.throbber.calc_next();
                }
            }

            Action::FocusNext => {
                self.focus = self.focus.next();
            }

            Action::FocusPrev => {
                self.focus = self.focus.prev();
            }

            // ── User intents → controller operations ─────────────────
            Action::ChooseRegion(code) => {
                debug!(ccom = %code, "choosing region");
                let controller = self.controller.clone();
                let code = code.clone();
                tokio::spawn(async move { controller.select_region(&code).await });
            }

            Action::ChooseProvince(code) => {
                debug!(cpro = %code, "choosing province");
                let controller = self.controller.clone();
                let code = code.clone();
                tokio::spawn(async move { controller.select_province(&code).await });
            }

            Action::ChooseMunicipality(code) => {
                // No fetch downstream of a municipality — synchronous.
                self.controller.select_municipality(code);
            }

            Action::SubmitSearch => {
                let controller = self.controller.clone();
                tokio::spawn(async move { controller.search_streets().await });
            }

            // ── Controller state → page mirrors ──────────────────────
            Action::RegionsUpdated(regions) => {
                self.regions = Arc::clone(regions);
                clamp_list_selection(&mut self.region_list, self.regions.len());
            }

            Action::ProvincesUpdated(provinces) => {
                self.provinces = Arc::clone(provinces);
                clamp_list_selection(&mut self.province_list, self.provinces.len());
            }

            Action::MunicipalitiesUpdated(municipalities) => {
                self.municipalities = Arc::clone(municipalities);
                clamp_list_selection(&mut self.municipality_list, self.municipalities.len());
            }

            Action::SelectionChanged(selection) => {
                self.selection = selection.clone();
            }

            Action::SearchUpdated(search) => {
                self.search = search.clone();
                if self.search.streets.is_empty() {
                    self.results_table.select(None);
                } else {
                    self.results_table.select(Some(0));
                }
            }

            // Render is handled in the main loop, not here
            Action::Render => {}
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Render the full page.
    fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::vertical([
            Constraint::Length(1),  // Title
            Constraint::Length(12), // Cascading selects
            Constraint::Length(3),  // Search inputs
            Constraint::Min(1),     // Results
            Constraint::Length(1),  // Status bar
        ])
        .split(area);

        self.render_title(frame, layout[0]);
        self.render_selects(frame, layout[1]);
        self.render_search_inputs(frame, layout[2]);
        self.render_results(frame, layout[3]);
        self.render_status_bar(frame, layout[4]);
    }

    fn render_title(&self, frame: &mut Frame, area: Rect) {
        let line = Line::from(vec![
            Span::styled(" Callejero ", theme::title_style()),
            Span::styled("· consulta del callejero postal", theme::key_hint()),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_selects(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .split(area);

        let region_items: Vec<ListItem> = self
            .regions
            .iter()
            .map(|r| {
                let applied = self.selection.region.as_deref() == Some(r.code.as_str());
                list_item(format!("{}  {}", r.code, r.name), applied)
            })
            .collect();
        let province_items: Vec<ListItem> = self
            .provinces
            .iter()
            .map(|p| {
                let applied = self.selection.province.as_deref() == Some(p.code.as_str());
                list_item(format!("{}  {}", p.code, p.name), applied)
            })
            .collect();
        let municipality_items: Vec<ListItem> = self
            .municipalities
            .iter()
            .map(|m| {
                let code = m.code.to_string();
                let applied = self.selection.municipality.as_deref() == Some(code.as_str());
                list_item(format!("{code}  {}", m.name), applied)
            })
            .collect();

        render_select_list(
            frame,
            columns[0],
            Focus::Regions,
            self.focus,
            region_items,
            &mut self.region_list,
        );
        render_select_list(
            frame,
            columns[1],
            Focus::Provinces,
            self.focus,
            province_items,
            &mut self.province_list,
        );
        render_select_list(
            frame,
            columns[2],
            Focus::Municipalities,
            self.focus,
            municipality_items,
            &mut self.municipality_list,
        );
    }

    fn render_search_inputs(&self, frame: &mut Frame, area: Rect) {
        let columns =
            Layout::horizontal([Constraint::Length(20), Constraint::Min(10)]).split(area);

        render_text_input(
            frame,
            columns[0],
            Focus::PostalCode,
            self.focus,
            &self.postal_input,
        );
        render_text_input(
            frame,
            columns[1],
            Focus::StreetName,
            self.focus,
            &self.street_input,
        );
    }

    fn render_results(&mut self, frame: &mut Frame, area: Rect) {
        let title = if self.search.streets.is_empty() {
            format!(" {} ", Focus::Results.label())
        } else {
            format!(" {} ({}) ", Focus::Results.label(), self.search.streets.len())
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if self.focus == Focus::Results {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.search.loading {
            let throbber = Throbber::default()
                .label("Buscando vías…")
                .style(theme::info_style());
            frame.render_stateful_widget(throbber, inner, &mut self.throbber);
            return;
        }

        if let Some(message) = &self.search.error {
            // "No results" is informational; anything else is a failure.
            let style = if message == NO_RESULTS_MESSAGE {
                theme::info_style()
            } else {
                theme::error_style()
            };
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(format!(" {message}"), style))),
                inner,
            );
            return;
        }

        if self.search.streets.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    " Introduce un código postal y parte del nombre de la vía",
                    theme::key_hint(),
                ))),
                inner,
            );
            return;
        }

        let header = Row::new([
            Cell::from("Tipo"),
            Cell::from("Nombre"),
            Cell::from("CP"),
            Cell::from("Municipio"),
        ])
        .style(theme::title_style());

        let rows: Vec<Row> = self
            .search
            .streets
            .iter()
            .map(|s| {
                Row::new([
                    Cell::from(s.kind.clone()),
                    Cell::from(s.name.clone()),
                    Cell::from(format!("{:05}", s.postal_code)),
                    Cell::from(s.municipality_name.clone()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(10),
                Constraint::Min(20),
                Constraint::Length(6),
                Constraint::Min(15),
            ],
        )
        .header(header)
        .row_highlight_style(theme::highlight());

        frame.render_stateful_widget(table, inner, &mut self.results_table);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let gate_ok = can_search(self.postal_input.value(), self.street_input.value());
        let gate_hint = if self.focus.is_text_input() && !gate_ok {
            Span::styled(
                " CP ≥ 5 y nombre ≥ 3 para buscar │",
                theme::info_style(),
            )
        } else {
            Span::raw("")
        };

        let line = Line::from(vec![
            Span::raw(" "),
            gate_hint,
            Span::styled(
                " tab campo  ↑↓ mover  enter seleccionar/buscar  supr limpiar  q salir",
                theme::key_hint(),
            ),
        ]);
        frame.render_widget(Paragraph::new(line), area);
    }
}

// ── Render helpers ───────────────────────────────────────────────────

fn list_item(text: String, applied: bool) -> ListItem<'static> {
    if applied {
        ListItem::new(format!("▸ {text}")).style(theme::selected_item())
    } else {
        ListItem::new(format!("  {text}"))
    }
}

fn render_select_list(
    frame: &mut Frame,
    area: Rect,
    zone: Focus,
    focus: Focus,
    items: Vec<ListItem>,
    state: &mut ListState,
) {
    let block = Block::default()
        .title(format!(" {} ", zone.label()))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focus == zone {
            theme::border_focused()
        } else {
            theme::border_default()
        });

    let list = List::new(items)
        .block(block)
        .highlight_style(theme::highlight());

    frame.render_stateful_widget(list, area, state);
}

fn render_text_input(frame: &mut Frame, area: Rect, zone: Focus, focus: Focus, input: &Input) {
    let focused = focus == zone;
    let block = Block::default()
        .title(format!(" {} ", zone.label()))
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(if focused {
            theme::border_focused()
        } else {
            theme::border_default()
        });

    let inner_width = usize::from(area.width.saturating_sub(2));
    let scroll = input.visual_scroll(inner_width.saturating_sub(1));
    let paragraph = Paragraph::new(input.value())
        .scroll((0, u16::try_from(scroll).unwrap_or(0)))
        .block(block);
    frame.render_widget(paragraph, area);

    if focused {
        let cursor = input.visual_cursor().saturating_sub(scroll);
        let x = area.x + 1 + u16::try_from(cursor).unwrap_or(0);
        frame.set_cursor_position(Position::new(
            x.min(area.x + area.width.saturating_sub(2)),
            area.y + 1,
        ));
    }
}

fn clamp_list_selection(state: &mut ListState, len: usize) {
    if len == 0 {
        state.select(None);
    } else {
        let idx = state.selected().unwrap_or(0).min(len - 1);
        state.select(Some(idx));
    }
}

fn move_list_selection(state: &mut ListState, len: usize, delta: isize) {
    if len == 0 {
        return;
    }
    let current = state.selected().map_or(0, |i| i as isize);
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(usize::try_from(next).unwrap_or(0)));
}

fn move_table_selection(state: &mut TableState, len: usize, delta: isize) {
    if len == 0 {
        return;
    }
    let current = state.selected().map_or(0, |i| i as isize);
    let next = (current + delta).clamp(0, len as isize - 1);
    state.select(Some(usize::try_from(next).unwrap_or(0)));
}
