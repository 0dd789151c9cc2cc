use super::Frame;
use crate::state::{Focus, NotificationKind, State, View};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Key hints for the focused view.
///
fn hints_for_view(view: View) -> &'static str {
    match view {
        View::Login => " Tab: switch field, Enter: sign in, Ctrl+C: quit",
        View::Categories | View::SearchEngines => {
            " j k: rows, J K: reorder, n: new, e: edit, d: delete, r: refresh, Tab: menu, q: quit"
        }
        View::Icons | View::Wallpapers => {
            " j k: rows, [ ]: page, n: new, e: edit, d: delete, r: refresh, Tab: menu, q: quit"
        }
        View::Settings => {
            " j k: rows, n: new, e: edit, d: delete, p: password, r: refresh, Tab: menu, q: quit"
        }
    }
}

/// Render footer widget: mode label, notification or key hints, and
/// version.
///
pub fn footer(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();

    let (label, label_bg) = if state.form().is_some() {
        ("EDIT:", theme.footer_edit.to_color())
    } else if state.pending_delete().is_some() {
        ("DELETE:", theme.footer_delete.to_color())
    } else if state.is_debug_mode() {
        ("DEBUG:", theme.footer_debug.to_color())
    } else if state.current_view() == View::Login {
        ("LOGIN:", theme.footer_normal.to_color())
    } else {
        ("NORMAL:", theme.footer_normal.to_color())
    };

    // A live notification replaces the hints so failures are
    // unmissable, e.g. when a reorder snapped back.
    let message = if let Some(notification) = state.notification() {
        let color = match notification.kind {
            NotificationKind::Success => theme.success.to_color(),
            NotificationKind::Error => theme.error.to_color(),
        };
        Span::styled(
            format!(" {}", notification.text),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )
    } else if state.form().is_some() {
        Span::styled(
            " Tab: next field, Space: toggle, Enter: save, Esc: cancel",
            Style::default().fg(theme.warning.to_color()),
        )
    } else if state.pending_delete().is_some() {
        Span::styled(
            " y: confirm delete, n: cancel",
            Style::default().fg(theme.warning.to_color()),
        )
    } else if state.is_debug_mode() {
        Span::styled(
            " j k: navigate log, `: close",
            Style::default().fg(theme.warning.to_color()),
        )
    } else {
        let hints = if state.current_focus() == Focus::Menu
            && state.current_view() != View::Login
        {
            " j k: views, Enter: open, `: log, q: quit"
        } else {
            hints_for_view(state.current_view())
        };
        Span::styled(hints, Style::default().fg(theme.warning.to_color()))
    };

    let controls_content = Line::from(vec![
        Span::styled(
            label,
            Style::default()
                .fg(theme.text.to_color())
                .bg(label_bg)
                .add_modifier(Modifier::BOLD),
        ),
        message,
    ]);
    let controls_widget = Paragraph::new(controls_content).alignment(Alignment::Left);

    let right_content = Line::from(vec![Span::styled(
        format!(" {}", env!("CARGO_PKG_VERSION")),
        Style::default().fg(theme.secondary.to_color()),
    )]);
    let right_content_width = right_content.width();
    let right_widget = Paragraph::new(right_content).alignment(Alignment::Right);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(right_content_width.try_into().unwrap_or(0)),
        ])
        .split(size);

    frame.render_widget(controls_widget, columns[0]);
    frame.render_widget(right_widget, columns[1]);
}
