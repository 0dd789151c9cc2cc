use super::Frame;
use crate::state::{State, View};
use ratatui::layout::{Constraint, Direction, Layout};

/// Render the whole frame according to state: sidebar, active view,
/// footer, and any modal on top.
///
pub fn all(frame: &mut Frame, state: &mut State) {
    let size = frame.size();

    if state.current_view() == View::Login {
        super::login::login(frame, size, state);
        super::footer::footer(
            frame,
            Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(size)[1],
            state,
        );
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(size);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(26), Constraint::Min(0)])
        .split(rows[0]);

    let sidebar = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(columns[0]);

    super::status::status(frame, sidebar[0], state);
    super::menu::menu(frame, sidebar[1], state);

    // The log pane claims the lower part of the main area when open.
    let main = if state.is_debug_mode() {
        let split = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(columns[1]);
        super::log::log(frame, split[1], state);
        split[0]
    } else {
        columns[1]
    };

    match state.current_view() {
        View::Categories => super::categories::categories(frame, main, state),
        View::SearchEngines => super::search_engines::search_engines(frame, main, state),
        View::Icons => super::icons::icons(frame, main, state),
        View::Wallpapers => super::wallpapers::wallpapers(frame, main, state),
        View::Settings => super::settings::settings(frame, main, state),
        View::Login => {}
    }

    super::footer::footer(frame, rows[1], state);

    if state.pending_delete().is_some() {
        super::confirm::confirm(frame, size, state);
    }
    if state.form().is_some() {
        super::form::form(frame, size, state);
    }
}
