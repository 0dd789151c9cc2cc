use super::{centered_rect, Frame};
use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Render the delete confirmation dialog.
///
pub fn confirm(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let Some(pending) = state.pending_delete() else {
        return;
    };

    let area = centered_rect(56, 7, size);
    frame.render_widget(Clear, area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            "Confirm Delete",
            Style::default().fg(theme.error.to_color()),
        ))
        .border_style(Style::default().fg(theme.error.to_color()));

    let lines = vec![
        Line::from(pending.description()),
        Line::from(""),
        Line::from(Span::styled(
            "y: delete    n: cancel",
            styling::muted_text_style(theme),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .style(styling::normal_text_style(theme))
            .wrap(Wrap { trim: true })
            .block(block),
        area,
    );
}
