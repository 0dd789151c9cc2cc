mod all;
mod categories;
mod confirm;
mod footer;
mod form;
mod icons;
mod log;
mod login;
mod menu;
mod search_engines;
mod settings;
mod status;
mod wallpapers;

use super::*;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

pub use all::all as render;

/// Return a centered rectangle of the given size within `r`, clamped
/// to fit.
///
fn centered_rect(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((r.height - height) / 2),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((r.width - width) / 2),
            Constraint::Length(width),
            Constraint::Min(0),
        ])
        .split(vertical[1]);
    horizontal[1]
}
