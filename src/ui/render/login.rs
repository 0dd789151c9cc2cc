use super::Frame;
use crate::state::{LoginField, State};
use crate::ui::widgets::styling;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::Text,
    widgets::{Block, Borders, Paragraph, Wrap},
};

pub const BANNER: &str = "
  ___              _ _____     _
 |   \\ _  _  __ _ | |_   _|_ _| |__
 | |) | || |/ _` || | | |/ _` | '_ \\
 |___/ \\_,_|\\__,_||_| |_|\\__,_|_.__/
";

const INSTRUCTIONS: &str = "
Sign in with your DualTab admin account. The session token is stored
in the configuration file and reused on the next start.
";

/// Render the login screen.
///
pub fn login(frame: &mut Frame, size: Rect, state: &State) {
    let theme = state.theme();
    let block = Block::default()
        .borders(Borders::ALL)
        .title("DualTab Admin - Sign In")
        .border_style(styling::active_block_border_style(theme));
    frame.render_widget(block, size);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Banner
            Constraint::Length(4), // Instructions
            Constraint::Length(3), // Username
            Constraint::Length(3), // Password
            Constraint::Length(3), // Error
            Constraint::Min(0),
        ])
        .margin(2)
        .split(size);

    let banner = Text::from(BANNER).patch_style(styling::banner_style(theme));
    frame.render_widget(
        Paragraph::new(banner).alignment(Alignment::Center),
        chunks[0],
    );

    frame.render_widget(
        Paragraph::new(INSTRUCTIONS)
            .style(styling::muted_text_style(theme))
            .wrap(Wrap { trim: true }),
        chunks[1],
    );

    let username_block = Block::default()
        .borders(Borders::ALL)
        .title("Username")
        .border_style(if state.login_field() == LoginField::Username {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });
    frame.render_widget(
        Paragraph::new(state.login_username().to_string())
            .style(styling::normal_text_style(theme))
            .block(username_block),
        chunks[2],
    );

    let password_block = Block::default()
        .borders(Borders::ALL)
        .title("Password (Tab to switch, Enter to sign in)")
        .border_style(if state.login_field() == LoginField::Password {
            styling::active_block_border_style(theme)
        } else {
            styling::normal_block_border_style(theme)
        });
    frame.render_widget(
        Paragraph::new("*".repeat(state.login_password().chars().count()))
            .style(styling::normal_text_style(theme))
            .block(password_block),
        chunks[3],
    );

    if let Some(error) = state.auth_error() {
        frame.render_widget(
            Paragraph::new(error.to_string())
                .style(ratatui::style::Style::default().fg(theme.error.to_color()))
                .wrap(Wrap { trim: true }),
            chunks[4],
        );
    }
}
