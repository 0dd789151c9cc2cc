use super::{centered_rect, Frame};
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

/// Render the modal create/edit form over the current view.
///
pub fn form(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let Some(form) = state.form() else {
        return;
    };

    let editor_height: u16 = if form.value_editor.is_some() { 6 } else { 0 };
    let height = (form.fields.len() as u16) * 3
        + editor_height
        + u16::from(form.is_active.is_some())
        + 4;
    let area = centered_rect(64, height, size);

    frame.render_widget(Clear, area);
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            form.title.clone(),
            styling::active_block_title_style(),
        ))
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, area);

    let mut constraints: Vec<Constraint> =
        form.fields.iter().map(|_| Constraint::Length(3)).collect();
    if form.value_editor.is_some() {
        constraints.push(Constraint::Length(editor_height));
    }
    if form.is_active.is_some() {
        constraints.push(Constraint::Length(1));
    }
    constraints.push(Constraint::Length(1)); // error line
    constraints.push(Constraint::Min(0));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .margin(1)
        .split(area);

    for (index, field) in form.fields.iter().enumerate() {
        let active = form.focus == index;
        let field_block = Block::default()
            .borders(Borders::ALL)
            .title(field.label)
            .border_style(if active {
                styling::active_block_border_style(theme)
            } else {
                styling::normal_block_border_style(theme)
            });
        let shown = if field.masked {
            "*".repeat(field.value.chars().count())
        } else {
            field.value.clone()
        };
        frame.render_widget(
            Paragraph::new(shown)
                .style(styling::normal_text_style(theme))
                .block(field_block),
            chunks[index],
        );
    }

    let mut slot = form.fields.len();
    if let Some(editor) = form.value_editor.as_ref() {
        let editor_block = Block::default()
            .borders(Borders::ALL)
            .title("Value (Ctrl+S to save)")
            .border_style(if form.on_value_editor() {
                styling::active_block_border_style(theme)
            } else {
                styling::normal_block_border_style(theme)
            });
        let inner = editor_block.inner(chunks[slot]);
        frame.render_widget(editor_block, chunks[slot]);
        frame.render_widget(editor.widget(), inner);
        slot += 1;
    }

    if let Some(enabled) = form.is_active {
        let marker = if enabled { "[x] Enabled" } else { "[ ] Enabled" };
        let style = if form.on_switch() {
            styling::active_row_style(theme)
        } else {
            styling::normal_text_style(theme)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(marker.to_string(), style))),
            chunks[slot],
        );
        slot += 1;
    }

    if let Some(error) = &form.error {
        frame.render_widget(
            Paragraph::new(error.clone()).style(Style::default().fg(theme.error.to_color())),
            chunks[slot],
        );
    }
}
