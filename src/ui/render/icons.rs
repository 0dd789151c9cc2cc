use super::Frame;
use crate::state::{Focus, State};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Row, Table, TableState},
};

/// Render the paginated bookmark icon table.
///
pub fn icons(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let focused = state.current_focus() == Focus::View;
    let title = format!(
        "Bookmark Icons - page {}/{} ({} total)",
        state.icons_page(),
        state.icons_page_count(),
        state.icons_total(),
    );

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme))
        .title(title.clone());
    if focused {
        block = Block::default()
            .borders(Borders::ALL)
            .border_style(styling::active_block_border_style(theme))
            .title(Span::styled(title, styling::active_block_title_style()));
    }

    if state.icons().is_empty() && state.is_loading() {
        frame.render_widget(spinner::widget(state, size.height).block(block), size);
        return;
    }

    let header = Row::new(vec!["ID", "Title", "URL", "Color", "Categories", "Active"])
        .style(styling::table_header_style(theme));

    let rows: Vec<Row> = state
        .icons()
        .iter()
        .map(|icon| {
            let categories = icon
                .categories
                .iter()
                .map(|category| category.name.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            Row::new(vec![
                icon.id.to_string(),
                icon.title.clone(),
                icon.url.clone(),
                icon.bg_color.clone(),
                categories,
                if icon.is_active { "yes" } else { "no" }.to_string(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Min(24),
        Constraint::Length(8),
        Constraint::Min(14),
        Constraint::Length(7),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .style(styling::normal_text_style(theme))
        .highlight_style(if focused {
            styling::active_row_style(theme)
        } else {
            styling::current_row_style(theme)
        })
        .block(block);

    let mut table_state = TableState::default();
    table_state.select(Some(state.selected_row()));
    frame.render_stateful_widget(table, size, &mut table_state);
}
