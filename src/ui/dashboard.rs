use crate::ui::app::{App, FocusPanel, QtoLine};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, List, ListItem, ListState, Paragraph, Row, Scrollbar,
        ScrollbarOrientation, ScrollbarState, Table,
    },
    Frame,
};

// Brandbook colors
const BRAND_DARK: Color = Color::Rgb(0x1F, 0x2F, 0x3C); // #1f2f3c - main dark
const BRAND_SELECT_BG: Color = Color::Rgb(0xC3, 0xD3, 0xE0); // #c3d3e0 - selection background
const BRAND_GREEN: Color = Color::Rgb(0x82, 0x9A, 0x68); // #829a68 - values
const BRAND_ORANGE: Color = Color::Rgb(0x9E, 0x68, 0x3C); // #9e683c - highlight
const BRAND_MUTED: Color = Color::Rgb(0x71, 0x65, 0x65); // #716565 - footer

// Styles
const HEADER_STYLE: Style = Style::new().fg(BRAND_DARK).add_modifier(Modifier::BOLD);
const SELECTED_STYLE: Style = Style::new()
    .bg(BRAND_SELECT_BG)
    .fg(BRAND_DARK)
    .add_modifier(Modifier::BOLD);
const HIGHLIGHT_COLOR: Color = BRAND_ORANGE;
const VALUE_COLOR: Color = BRAND_GREEN;

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(10),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " IFC QTO | {} | {} models | {} selected ",
        app.project_names(),
        app.registry.len(),
        app.selection.element_count()
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(40), // Elements
        Constraint::Percentage(60), // Quantities
    ])
    .split(area);

    draw_elements(frame, chunks[0], app);
    draw_quantities(frame, chunks[1], app);
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(BRAND_ORANGE)
    } else {
        Style::default()
    }
}

fn draw_elements(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Elements;
    let multi_model = app.registry.len() > 1;

    let items: Vec<ListItem> = app
        .elements
        .iter()
        .enumerate()
        .map(|(i, element)| {
            let is_cursor = i == app.selected_element;
            let highlighted = app.is_highlighted(element);

            let style = if is_cursor && is_focused {
                SELECTED_STYLE
            } else if highlighted {
                Style::default().fg(HIGHLIGHT_COLOR)
            } else {
                Style::default()
            };

            let marker = if highlighted { "● " } else { "  " };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(HIGHLIGHT_COLOR)),
                Span::styled(element.display_name(), style),
                Span::styled(
                    format!(" {}", element.entity_type),
                    Style::default().fg(BRAND_MUTED),
                ),
            ];
            if multi_model {
                spans.push(Span::styled(
                    format!(" [{}]", element.model),
                    Style::default().fg(BRAND_MUTED),
                ));
            }

            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = format!(" Elements ({}) ", app.elements.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    let mut state = ListState::default().with_selected(Some(app.selected_element));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_quantities(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus_panel == FocusPanel::Quantities;
    let lines = app.quantity_lines();

    // Borders and header row
    let visible_rows = (area.height as usize).saturating_sub(3);

    let header = Row::new(vec!["Name", "Quantity"])
        .style(HEADER_STYLE)
        .height(1);

    let rows: Vec<Row> = lines
        .iter()
        .skip(app.quantity_scroll_offset)
        .take(visible_rows)
        .map(|line| match line {
            QtoLine::Set { name, count } => Row::new(vec![
                format!("▾ {name}"),
                format!("{count} quantities"),
            ])
            .style(Style::default().add_modifier(Modifier::BOLD)),
            QtoLine::Quantity { name, value } => {
                Row::new(vec![format!("    {name}"), format_value(*value)])
                    .style(Style::default().fg(VALUE_COLOR))
            }
        })
        .collect();

    let widths = [Constraint::Percentage(65), Constraint::Percentage(35)];

    let sets = lines
        .iter()
        .filter(|l| matches!(l, QtoLine::Set { .. }))
        .count();
    let title = format!(" Quantities ({sets} sets) ");
    let table = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style(is_focused)),
    );

    frame.render_widget(table, area);

    if lines.len() > visible_rows && area.height > 3 {
        let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .begin_symbol(Some("↑"))
            .end_symbol(Some("↓"));
        let mut scrollbar_state =
            ScrollbarState::new(lines.len()).position(app.quantity_scroll_offset);

        let scrollbar_area = Rect {
            x: area.x + area.width - 1,
            y: area.y + 2,
            width: 1,
            height: area.height - 3,
        };
        frame.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
    }
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = " ↑↓ Move | Space Highlight | a Type | c Clear | e Export | q Quit ";
    let text = if app.status.is_empty() {
        help.to_string()
    } else {
        format!("{help}| {}", app.status)
    };

    let footer = Paragraph::new(text)
        .style(Style::default().fg(BRAND_MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.3}")
    }
}
