use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use crate::app::{App, InputMode};
use crate::session::ChatRole;

pub fn render(app: &mut App, frame: &mut Frame) {
    let area = frame.area();

    // The input box grows with its wrapped content, back to one row once the
    // draft is cleared on submit.
    let input_width = area.width.saturating_sub(2).max(1) as usize;
    let input_height = wrap_input(&app.input, input_width).len() as u16;

    let [header_area, chat_area, input_area, footer_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(input_height + 2),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(app, frame, header_area);
    render_chat(app, frame, chat_area);
    render_input(app, frame, input_area);
    render_footer(app, frame, footer_area);
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            " petchat ",
            Style::default().fg(app.palette.accent_fg).bold(),
        ),
        Span::styled(
            format!("v{}", env!("CARGO_PKG_VERSION")),
            Style::default().fg(app.palette.accent_fg),
        ),
    ]);

    let header = Paragraph::new(title).style(Style::default().bg(app.palette.accent));
    frame.render_widget(header, area);
}

fn render_chat(app: &mut App, frame: &mut Frame, area: Rect) {
    // Store geometry for mouse hit-testing and scroll calculations
    // (inner size minus borders)
    app.chat_area = Some(area);
    app.chat_height = area.height.saturating_sub(2);
    app.chat_width = area.width.saturating_sub(2);

    let wrap_width = app.chat_width.max(1) as usize;
    app.chat_lines = app.total_chat_lines(wrap_width);

    let chat_focused = app.input_mode == InputMode::Normal;
    let border_color = if chat_focused {
        app.palette.accent
    } else {
        app.palette.chrome_fg
    };

    let mut lines: Vec<Line> = Vec::new();

    for msg in app.session.messages() {
        let style = app.palette.message_style(msg.role);
        let label = match msg.role {
            ChatRole::User => "You:",
            ChatRole::Assistant => "Assistant:",
        };
        lines.push(Line::from(Span::styled(
            label,
            style.add_modifier(Modifier::BOLD),
        )));
        for line in msg.content.lines() {
            lines.push(Line::from(Span::styled(line.to_string(), style)));
        }
        lines.push(Line::default());
    }

    if app.session.is_busy() {
        // Animated ellipsis: cycles through ".", "..", "..."
        let dots = ".".repeat((app.animation_frame as usize) + 1);
        lines.push(Line::from(Span::styled(
            format!("typing{dots}"),
            app.palette
                .indicator_style()
                .add_modifier(Modifier::ITALIC),
        )));
    }

    let chat_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(" Conversation ");

    let chat = Paragraph::new(Text::from(lines))
        .block(chat_block)
        .wrap(Wrap { trim: true })
        .scroll((app.chat_scroll, 0));

    frame.render_widget(chat, area);
}

fn render_input(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.input_mode == InputMode::Editing;
    let busy = app.session.is_busy();

    let border_color = if busy || !editing {
        app.palette.chrome_fg
    } else {
        app.palette.accent
    };
    let title = if busy {
        " Message (waiting for reply) "
    } else {
        " Message (Enter sends, Shift+Enter for a newline) "
    };

    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title);

    let inner_width = area.width.saturating_sub(2).max(1) as usize;
    let wrapped = wrap_input(&app.input, inner_width);
    let text: Vec<Line> = wrapped.into_iter().map(Line::from).collect();

    let input = Paragraph::new(text)
        .style(app.palette.input_style())
        .block(input_block);

    frame.render_widget(input, area);

    // Show cursor while the input accepts keystrokes
    if editing && !busy {
        let (cursor_row, cursor_col) = input_cursor_position(&app.input, app.input_cursor, inner_width);
        frame.set_cursor_position((
            area.x + cursor_col + 1,
            area.y + cursor_row + 1,
        ));
    }
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    // Key style: dark background with bright text for visibility on both light/dark terminals
    let key_style = Style::default().bg(ratatui::style::Color::DarkGray).fg(ratatui::style::Color::White);
    let label_style = Style::default().bg(ratatui::style::Color::Black).fg(ratatui::style::Color::White);

    let hints = match app.input_mode {
        InputMode::Editing => vec![
            Span::styled(" Enter ", key_style),
            Span::styled(" send ", label_style),
            Span::styled(" Shift+Enter ", key_style),
            Span::styled(" newline ", label_style),
            Span::styled(" Esc ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" Ctrl-C ", key_style),
            Span::styled(" quit ", label_style),
        ],
        InputMode::Normal => vec![
            Span::styled(" j/k ", key_style),
            Span::styled(" scroll ", label_style),
            Span::styled(" g/G ", key_style),
            Span::styled(" top/bottom ", label_style),
            Span::styled(" i ", key_style),
            Span::styled(" write ", label_style),
            Span::styled(" q ", key_style),
            Span::styled(" quit ", label_style),
        ],
    };

    let footer = Paragraph::new(Line::from(hints));
    frame.render_widget(footer, area);
}

/// Wrap the input draft into display rows: hard breaks at newlines, soft
/// breaks once a row fills. Always yields at least one (possibly empty) row.
fn wrap_input(input: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = vec![String::new()];
    let mut col = 0;

    for c in input.chars() {
        if c == '\n' {
            rows.push(String::new());
            col = 0;
            continue;
        }
        if col >= width {
            rows.push(String::new());
            col = 0;
        }
        if let Some(row) = rows.last_mut() {
            row.push(c);
        }
        col += 1;
    }

    rows
}

/// Cursor cell for a char index, under the same wrap rules as `wrap_input`.
fn input_cursor_position(input: &str, cursor: usize, width: usize) -> (u16, u16) {
    let width = width.max(1);
    let mut row: u16 = 0;
    let mut col: usize = 0;

    for (i, c) in input.chars().enumerate() {
        if i == cursor {
            return (row, col as u16);
        }
        if c == '\n' {
            row += 1;
            col = 0;
            continue;
        }
        if col >= width {
            row += 1;
            col = 0;
        }
        col += 1;
    }

    (row, col as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_one_row() {
        assert_eq!(wrap_input("", 10), vec![String::new()]);
    }

    #[test]
    fn hard_newlines_break_rows() {
        assert_eq!(wrap_input("a\nb", 10), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn long_rows_soft_wrap_at_width() {
        assert_eq!(
            wrap_input("abcde", 2),
            vec!["ab".to_string(), "cd".to_string(), "e".to_string()]
        );
    }

    #[test]
    fn cursor_follows_wraps() {
        // "abc" at width 2 renders as ["ab", "c"]
        assert_eq!(input_cursor_position("abc", 0, 2), (0, 0));
        assert_eq!(input_cursor_position("abc", 2, 2), (1, 0));
        assert_eq!(input_cursor_position("abc", 3, 2), (1, 1));
        // after a hard newline
        assert_eq!(input_cursor_position("a\nb", 2, 10), (1, 0));
    }

    #[test]
    fn cursor_and_wrap_agree_on_row_count() {
        let input = "first line\nsecond somewhat longer line\n\nlast";
        for width in [1usize, 2, 5, 8, 80] {
            let rows = wrap_input(input, width);
            let (cursor_row, _) =
                input_cursor_position(input, input.chars().count(), width);
            assert_eq!(rows.len() as u16, cursor_row + 1);
        }
    }
}
