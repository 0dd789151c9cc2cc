use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState},
};

/// Render the in-app log pane.
///
pub fn log(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!("Log ({})", state.debug_entries().len()),
            styling::active_block_title_style(),
        ))
        .border_style(styling::active_block_border_style(theme));

    let items: Vec<ListItem> = state
        .debug_entries()
        .iter()
        .map(|entry| ListItem::new(entry.clone()))
        .collect();

    let list = List::new(items)
        .style(styling::muted_text_style(theme))
        .highlight_style(styling::active_row_style(theme))
        .block(block);

    let mut list_state = ListState::default();
    if !state.debug_entries().is_empty() {
        list_state.select(Some(state.debug_index()));
    }
    frame.render_stateful_widget(list, size, &mut list_state);
}
