use super::Frame;
use crate::state::{Focus, State, View};
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::Span,
    widgets::{Block, Borders, List, ListItem, ListState},
};

const BLOCK_TITLE: &str = "Views";

/// Render sidebar menu widget according to state.
///
pub fn menu(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(styling::normal_block_border_style(theme));

    let row_style;
    if state.current_focus() == Focus::Menu {
        row_style = styling::active_row_style(theme);
        block = block
            .border_style(styling::active_block_border_style(theme))
            .title(Span::styled(
                BLOCK_TITLE,
                styling::active_block_title_style(),
            ));
    } else {
        row_style = styling::current_row_style(theme);
        block = block.title(BLOCK_TITLE);
    }

    let items: Vec<ListItem> = View::MENU
        .iter()
        .map(|view| {
            let marker = if *view == state.current_view() {
                "● "
            } else {
                "  "
            };
            ListItem::new(format!("{}{}", marker, view.title()))
        })
        .collect();

    let list = List::new(items)
        .style(styling::normal_text_style(theme))
        .highlight_style(row_style)
        .block(block);

    let mut list_state = ListState::default();
    list_state.select(Some(state.menu_index()));
    frame.render_stateful_widget(list, size, &mut list_state);
}
