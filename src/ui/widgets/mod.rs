pub mod social_post;

use crate::generation::GenerationData;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};
use std::any::Any;

/// A single-purpose content-generation screen, driven by the app loop.
pub trait ToolWidget {
    fn id(&self) -> String;

    fn title(&self) -> &str;

    /// One-line description shown on the dashboard list.
    fn tagline(&self) -> &str;

    fn render(&self, frame: &mut Frame, area: Rect);

    /// Apply a background generation completion to this tool's state.
    fn update_data(&mut self, data: GenerationData);

    /// Advance time-based state (spinner frames, transient feedback).
    fn tick(&mut self);

    fn scroll_up(&mut self);

    fn scroll_down(&mut self);

    fn as_any(&self) -> Option<&dyn Any>;

    fn as_any_mut(&mut self) -> Option<&mut dyn Any>;
}

const SPINNER_FRAMES: [&str; 8] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧"];

pub fn spinner_frame(tick: usize) -> &'static str {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Stateless option row: renders every label in an enumerated set with the
/// selected one highlighted. Holds no state of its own.
pub fn option_row<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    selected_label: &str,
    focused: bool,
) -> Line<'a> {
    let mut spans = Vec::new();

    for label in labels {
        if !spans.is_empty() {
            spans.push(Span::raw(" "));
        }

        let style = if label == selected_label {
            let base = Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD);
            if focused {
                base
            } else {
                base.bg(Color::DarkGray).fg(Color::White)
            }
        } else {
            Style::default().fg(Color::Gray)
        };

        spans.push(Span::styled(format!(" {} ", label), style));
    }

    Line::from(spans)
}

/// Numbered section heading in the form pane.
pub fn section_title(number: usize, text: &str, focused: bool) -> Line<'static> {
    let accent = if focused { Color::Cyan } else { Color::DarkGray };
    Line::from(vec![
        Span::styled(format!("{}. ", number), Style::default().fg(accent)),
        Span::styled(
            text.to_string(),
            Style::default()
                .fg(if focused { Color::White } else { Color::Gray })
                .add_modifier(Modifier::BOLD),
        ),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spinner_frame_wraps() {
        assert_eq!(spinner_frame(0), spinner_frame(SPINNER_FRAMES.len()));
    }

    #[test]
    fn test_option_row_highlights_selected_only() {
        let line = option_row(["Short", "Medium", "Long"], "Medium", true);
        let highlighted: Vec<_> = line
            .spans
            .iter()
            .filter(|s| s.style.bg == Some(Color::Cyan))
            .collect();
        assert_eq!(highlighted.len(), 1);
        assert_eq!(highlighted[0].content.as_ref(), " Medium ");
    }

    #[test]
    fn test_option_row_unfocused_dims_selection() {
        let line = option_row(["A", "B"], "A", false);
        assert!(line.spans.iter().all(|s| s.style.bg != Some(Color::Cyan)));
    }
}
