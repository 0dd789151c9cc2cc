use super::Frame;
use crate::state::{Focus, State};
use crate::ui::widgets::{spinner, styling};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Row, Table, TableState, Wrap},
};

/// Render the system configuration table plus the backend's known-key
/// reference.
///
pub fn settings(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let focused = state.current_focus() == Focus::View;

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(6), Constraint::Length(8)])
        .split(size);

    let title = format!("System Config ({})", state.configs().len());
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

    if state.configs().is_empty() && state.is_loading() {
        frame.render_widget(
            spinner::widget(state, sections[0].height).block(block),
            sections[0],
        );
    } else {
        let header = Row::new(vec!["Key", "Value", "Remark"])
            .style(styling::table_header_style(theme));

        let rows: Vec<Row> = state
            .configs()
            .iter()
            .map(|config| {
                // Multi-line values collapse to their first line here;
                // the editor shows the rest.
                let value = config.value.lines().next().unwrap_or("").to_string();
                Row::new(vec![config.key.clone(), value, config.remark.clone()])
            })
            .collect();

        let widths = [
            Constraint::Min(22),
            Constraint::Min(24),
            Constraint::Min(20),
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
        table_state.select(Some(state.configs_index()));
        frame.render_stateful_widget(table, sections[0], &mut table_state);
    }

    let keys_block = Block::default()
        .borders(Borders::ALL)
        .title("Known Keys")
        .border_style(styling::normal_block_border_style(theme));

    let lines: Vec<Line> = if state.config_keys().is_empty() {
        vec![Line::from(Span::styled(
            "No key descriptions published by the backend.",
            styling::muted_text_style(theme),
        ))]
    } else {
        state
            .config_keys()
            .iter()
            .map(|info| {
                Line::from(vec![
                    Span::styled(info.key.clone(), styling::normal_text_style(theme)),
                    Span::styled(
                        format!(" - {} (e.g. {})", info.description, info.example),
                        styling::muted_text_style(theme),
                    ),
                ])
            })
            .collect()
    };

    let keys_widget = Paragraph::new(lines)
        .block(keys_block)
        .wrap(Wrap { trim: true });
    frame.render_widget(keys_widget, sections[1]);
}
