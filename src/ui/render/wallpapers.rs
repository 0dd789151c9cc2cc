use super::Frame;
use crate::state::{Focus, State};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Rect},
    text::Span,
    widgets::{Block, Borders, Row, Table, TableState},
};

/// Render the paginated wallpaper table.
///
pub fn wallpapers(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let focused = state.current_focus() == Focus::View;
    let title = format!(
        "Wallpapers - page {}/{} ({} total)",
        state.wallpapers_page(),
        state.wallpapers_page_count(),
        state.wallpapers_total(),
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

    if state.wallpapers().is_empty() && state.is_loading() {
        frame.render_widget(spinner::widget(state, size.height).block(block), size);
        return;
    }

    let header = Row::new(vec!["ID", "Title", "URL", "Source", "Active"])
        .style(styling::table_header_style(theme));

    let rows: Vec<Row> = state
        .wallpapers()
        .iter()
        .map(|wallpaper| {
            Row::new(vec![
                wallpaper.id.to_string(),
                wallpaper.title.clone(),
                wallpaper.url.clone(),
                wallpaper.source.clone(),
                if wallpaper.is_active { "yes" } else { "no" }.to_string(),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Min(30),
        Constraint::Length(10),
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
