use crate::models::{Message, Sender};
use crate::transcript::Transcript;
use crate::ui::ViewState;
use ratatui::{
    layout::{Position, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use textwrap::wrap;

pub fn draw_transcript(f: &mut Frame<'_>, area: Rect, view: &ViewState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Chat")
        .style(Style::default().fg(Color::LightYellow));
    let inner = block.inner(area);

    let lines = transcript_lines(&view.transcript, inner.width as usize);
    let total_lines = lines.len() as u16;
    let max_scroll = total_lines.saturating_sub(inner.height);
    let offset = max_scroll.saturating_sub(view.scroll.min(max_scroll));

    f.render_widget(Paragraph::new(lines).block(block).scroll((offset, 0)), area);
}

/// Lays the transcript out as styled lines wrapped to `width` columns.
pub fn transcript_lines(transcript: &Transcript, width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for message in transcript.messages() {
        if !lines.is_empty() {
            lines.push(Line::from(""));
        }
        render_message(&mut lines, message, width);
    }
    lines
}

fn render_message(lines: &mut Vec<Line<'static>>, message: &Message, width: usize) {
    let (name, color, indent) = match message.sender {
        Sender::User => ("You", Color::Rgb(255, 223, 128), "  "),
        Sender::Bot => ("Bot", Color::Rgb(144, 238, 144), ""),
    };
    let mut style = Style::default().fg(color);
    if message.temporary {
        style = style.add_modifier(Modifier::DIM | Modifier::ITALIC);
    }

    lines.push(Line::from(vec![
        Span::styled(indent.to_string(), style),
        Span::styled("┌─ ".to_string(), style),
        Span::styled(name.to_string(), style.add_modifier(Modifier::BOLD)),
        Span::styled(format!(" {}", message.timestamp), style.add_modifier(Modifier::DIM)),
    ]));

    let wrap_width = width.saturating_sub(indent.len() + 2).max(1);
    for text_line in message.text.lines() {
        for wrapped in wrap(text_line, wrap_width) {
            lines.push(Line::from(vec![
                Span::styled(indent.to_string(), style),
                Span::styled("│ ".to_string(), style),
                Span::styled(wrapped.into_owned(), style),
            ]));
        }
    }
}

pub fn draw_input(f: &mut Frame<'_>, area: Rect, view: &ViewState) {
    let (prefix, prefix_style) = if view.input_enabled {
        ("→ ", Style::default().fg(Color::DarkGray))
    } else {
        ("… ", Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM))
    };
    let send_style = if view.submit_enabled {
        Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let input = Paragraph::new(Line::from(vec![
        Span::styled(prefix, prefix_style),
        Span::styled(view.input.clone(), Style::default().fg(Color::White)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Message")
            .title_bottom(Line::styled(" Enter ⏎ send ", send_style).right_aligned()),
    );
    f.render_widget(input, area);

    if view.input_enabled && view.focused {
        let x = area.x + 1 + 2 + view.input.chars().count() as u16;
        f.set_cursor_position(Position::new(x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn messages_are_separated_and_labelled() {
        let mut transcript = Transcript::new();
        transcript.append(Message::user("Hello"));
        transcript.append(Message::bot("Hi there"));

        let lines: Vec<String> = transcript_lines(&transcript, 40)
            .iter()
            .map(line_text)
            .collect();

        assert!(lines[0].contains("You"));
        assert_eq!(lines[1], "  │ Hello");
        assert_eq!(lines[2], "");
        assert!(lines[3].contains("Bot"));
        assert_eq!(lines[4], "│ Hi there");
    }

    #[test]
    fn long_text_wraps_to_width() {
        let mut transcript = Transcript::new();
        transcript.append(Message::bot("one two three four five six"));

        let lines = transcript_lines(&transcript, 12);
        assert!(lines.len() > 2);
        assert!(lines.iter().skip(1).all(|l| line_text(l).chars().count() <= 12));
    }
}
