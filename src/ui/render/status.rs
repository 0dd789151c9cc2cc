use super::Frame;
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Render session summary widget.
///
pub fn status(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Session")
        .border_style(styling::normal_block_border_style(theme));

    let user_line = match state.user() {
        Some(user) => Line::from(vec![
            Span::styled("User: ", styling::muted_text_style(theme)),
            Span::styled(user.username.clone(), styling::normal_text_style(theme)),
        ]),
        None => Line::from(Span::styled(
            "Not signed in",
            styling::muted_text_style(theme),
        )),
    };

    let activity_line = if state.is_loading() {
        Line::from(Span::styled(
            "Syncing...",
            styling::normal_text_style(theme),
        ))
    } else {
        Line::from(Span::styled("Idle", styling::muted_text_style(theme)))
    };

    let theme_line = Line::from(vec![
        Span::styled("Theme: ", styling::muted_text_style(theme)),
        Span::styled(theme.name.clone(), styling::normal_text_style(theme)),
    ]);

    let widget = Paragraph::new(vec![user_line, activity_line, theme_line]).block(block);
    frame.render_widget(widget, size);
}
