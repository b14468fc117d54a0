use crate::models::QuickReply;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Draws the quick-reply keys and the quit hint.
pub fn draw_footer(f: &mut Frame<'_>, area: Rect, quick_replies: &[QuickReply]) {
    let mut spans = Vec::new();
    for (i, reply) in quick_replies.iter().take(9).enumerate() {
        spans.push(Span::styled(
            format!("F{} {}", i + 1, reply.label),
            Style::default().fg(Color::LightCyan),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled("Esc quit", Style::default().fg(Color::DarkGray)));

    let footer = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    f.render_widget(footer, area);
}
