use crate::config::ExportConfig;
use crate::export::DirectorySink;
use crate::model::{ElementSummary, Selection};
use crate::parser::ModelRegistry;
use crate::qto::{QtoTreeRow, QuantityTakeoff, TakeoffStats};
use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use tokio::runtime::Runtime;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FocusPanel {
    Elements,
    Quantities,
}

/// One rendered line of the quantities table.
#[derive(Debug, Clone, PartialEq)]
pub enum QtoLine {
    Set { name: String, count: usize },
    Quantity { name: String, value: f64 },
}

pub struct App {
    pub registry: ModelRegistry,
    pub takeoff: QuantityTakeoff,
    pub elements: Vec<ElementSummary>,
    pub selection: Selection,
    pub focus_panel: FocusPanel,
    pub selected_element: usize,
    pub quantity_scroll_offset: usize,
    pub last_stats: Option<TakeoffStats>,
    pub status: String,
    pub should_quit: bool,
    export: ExportConfig,
    runtime: Runtime,
}

impl App {
    #[must_use]
    pub fn new(
        registry: ModelRegistry,
        takeoff: QuantityTakeoff,
        export: ExportConfig,
        runtime: Runtime,
    ) -> Self {
        let elements = registry.elements().cloned().collect();
        Self {
            registry,
            takeoff,
            elements,
            selection: Selection::new(),
            focus_panel: FocusPanel::Elements,
            selected_element: 0,
            quantity_scroll_offset: 0,
            last_stats: None,
            status: String::new(),
            should_quit: false,
            export,
            runtime,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_events()?;
        }
        self.takeoff.dispose();
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        super::dashboard::draw_dashboard(frame, self);
    }

    fn handle_events(&mut self) -> Result<()> {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key.code);
        }
        Ok(())
    }

    fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.navigate_up(),
            KeyCode::Down | KeyCode::Char('j') => self.navigate_down(),
            KeyCode::Left | KeyCode::Char('h') => self.focus_panel = FocusPanel::Elements,
            KeyCode::Right | KeyCode::Char('l') => self.focus_panel = FocusPanel::Quantities,
            KeyCode::Char(' ') | KeyCode::Enter => self.toggle_current(),
            KeyCode::Char('a') => self.select_current_fragment(),
            KeyCode::Char('c') => self.clear_selection(),
            KeyCode::Char('e') => self.export_json(),
            _ => {}
        }
    }

    fn navigate_up(&mut self) {
        match self.focus_panel {
            FocusPanel::Elements => {
                self.selected_element = self.selected_element.saturating_sub(1);
            }
            FocusPanel::Quantities => {
                self.quantity_scroll_offset = self.quantity_scroll_offset.saturating_sub(1);
            }
        }
    }

    fn navigate_down(&mut self) {
        match self.focus_panel {
            FocusPanel::Elements => {
                if self.selected_element < self.elements.len().saturating_sub(1) {
                    self.selected_element += 1;
                }
            }
            FocusPanel::Quantities => {
                if self.quantity_scroll_offset < self.quantity_lines().len().saturating_sub(1) {
                    self.quantity_scroll_offset += 1;
                }
            }
        }
    }

    #[must_use]
    pub fn current_element(&self) -> Option<&ElementSummary> {
        self.elements.get(self.selected_element)
    }

    #[must_use]
    pub fn is_highlighted(&self, element: &ElementSummary) -> bool {
        self.selection
            .contains(&element.model, &element.fragment(), element.id)
    }

    /// Highlights or un-highlights the element under the cursor.
    fn toggle_current(&mut self) {
        let Some(element) = self.current_element().cloned() else {
            return;
        };
        let fragment = element.fragment();
        if !self
            .selection
            .remove(&element.model, &fragment, element.id)
        {
            self.selection.insert(element.model, fragment, element.id);
        }
        self.selection_changed();
    }

    /// Highlights every element sharing the cursor element's fragment.
    fn select_current_fragment(&mut self) {
        let Some(current) = self.current_element().cloned() else {
            return;
        };
        let fragment = current.fragment();
        let ids: Vec<_> = self
            .elements
            .iter()
            .filter(|e| e.model == current.model && e.entity_type == current.entity_type)
            .map(|e| e.id)
            .collect();
        self.selection.extend(&current.model, &fragment, ids);
        self.selection_changed();
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.selection_changed();
    }

    /// Every change starts a new take-off session; an empty selection only clears.
    fn selection_changed(&mut self) {
        self.quantity_scroll_offset = 0;
        if self.selection.is_empty() {
            self.takeoff.clear();
            self.last_stats = None;
            self.status = "Selection cleared".to_string();
            return;
        }

        let pass = self
            .takeoff
            .aggregate_selection(&self.registry, &self.selection);
        match self.runtime.block_on(pass) {
            Ok(stats) => {
                self.status = format!(
                    "{} elements, {} quantities summed",
                    stats.elements_visited, stats.quantities_added
                );
                self.last_stats = Some(stats);
            }
            Err(err) => {
                warn!(error = %err, "take-off failed");
                self.status = format!("Take-off failed: {err}");
                self.last_stats = None;
            }
        }
    }

    fn export_json(&mut self) {
        let mut sink = DirectorySink::new(&self.export.directory);
        self.status = match self
            .takeoff
            .export_to(&mut sink, Some(&self.export.file_name))
        {
            Ok(name) => format!("Exported {}", sink.dir().join(name).display()),
            Err(err) => format!("Export failed: {err}"),
        };
    }

    #[must_use]
    pub fn tree_report(&self) -> Vec<QtoTreeRow> {
        self.takeoff.tree_report()
    }

    /// Tree report flattened into set headers followed by their quantities.
    #[must_use]
    pub fn quantity_lines(&self) -> Vec<QtoLine> {
        let mut lines = Vec::new();
        for row in self.tree_report() {
            lines.push(QtoLine::Set {
                name: row.name,
                count: row.children.len(),
            });
            lines.extend(row.children.into_iter().map(|leaf| QtoLine::Quantity {
                name: leaf.name,
                value: leaf.value,
            }));
        }
        lines
    }

    /// Names of the loaded projects, for the header.
    #[must_use]
    pub fn project_names(&self) -> String {
        let names: Vec<&str> = self.registry.models().map(|m| m.project_name()).collect();
        if names.is_empty() {
            "No models".to_string()
        } else {
            names.join(", ")
        }
    }
}
