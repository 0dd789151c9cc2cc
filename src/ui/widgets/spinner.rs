use crate::state::State;
use crate::ui::widgets::styling;
use ratatui::{
    layout::Alignment,
    widgets::Paragraph,
};

/// Frames cycled while waiting on the network.
///
pub const FRAMES: [&str; 8] = ["⣾", "⣽", "⣻", "⢿", "⡿", "⣟", "⣯", "⣷"];

/// Return a centered spinner paragraph for an in-flight fetch, padded
/// down to roughly the vertical middle of the containing block.
///
pub fn widget(state: &State, height: u16) -> Paragraph<'static> {
    let frame = FRAMES[state.spinner_index() % FRAMES.len()];
    let padding = "\n".repeat(usize::from(height / 2).saturating_sub(1));
    Paragraph::new(format!("{}{} Loading...", padding, frame))
        .style(styling::normal_text_style(state.theme()))
        .alignment(Alignment::Center)
}
