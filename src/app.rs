use ratatui::layout::Rect;
use tokio::sync::mpsc;

use crate::client::ChatClient;
use crate::config::Config;
use crate::session::ChatSession;
use crate::theme::{Palette, Theme};
use crate::tui::AppEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Editing,
}

pub struct App {
    // Core state
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub session: ChatSession,

    // Input state
    pub input: String,
    pub input_cursor: usize, // cursor position in input, in chars

    // Chat viewport state
    pub chat_scroll: u16,
    pub chat_height: u16, // Height of chat area for scroll calculations
    pub chat_width: u16,  // Width of chat area for wrap calculations
    pub chat_lines: u16,  // Total rendered lines, updated during render

    // Animation state
    pub animation_frame: u8, // 0-2 for ellipsis animation

    // Palette for the theme resolved at startup
    pub palette: Palette,

    // Chat area for mouse hit-testing (updated during render)
    pub chat_area: Option<Rect>,

    pub client: ChatClient,
    pub events_tx: mpsc::UnboundedSender<AppEvent>,
}

impl App {
    pub fn new(config: &Config, events_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let theme = Theme::resolve(config.theme.as_deref());

        Self {
            should_quit: false,
            input_mode: InputMode::Editing,
            session: ChatSession::new(),

            input: String::new(),
            input_cursor: 0,

            chat_scroll: 0,
            chat_height: 0,
            chat_width: 0,
            chat_lines: 0,

            animation_frame: 0,

            palette: Palette::for_theme(theme),

            chat_area: None,

            client: ChatClient::new(config.server_url()),
            events_tx,
        }
    }

    /// Tick animation frame (called by Tick event)
    pub fn tick_animation(&mut self) {
        if self.session.is_busy() {
            self.animation_frame = (self.animation_frame + 1) % 3;
        }
    }

    /// Lines the chat transcript occupies at the given wrap width, matching
    /// how the render pass lays messages out (label, wrapped content, blank
    /// separator, trailing typing indicator while busy).
    pub fn total_chat_lines(&self, wrap_width: usize) -> u16 {
        let mut total: u16 = 0;

        for msg in self.session.messages() {
            total += 1; // Role label line
            // Calculate wrapped lines for each line of content
            for line in msg.content.lines() {
                // Use character count, not byte length, for proper UTF-8 handling
                let char_count = line.chars().count();
                if char_count == 0 {
                    total += 1; // Empty line still takes one line
                } else {
                    total += ((char_count / wrap_width) + 1) as u16;
                }
            }
            total += 1; // Blank line after message
        }

        if self.session.is_busy() {
            total += 1; // Typing indicator
        }

        total
    }

    /// Scroll the chat so the newest content is visible.
    pub fn scroll_chat_to_bottom(&mut self) {
        // Use actual chat width for wrap calculation, default to 50 if not set
        let wrap_width = if self.chat_width > 0 {
            self.chat_width as usize
        } else {
            50
        };

        let total_lines = self.total_chat_lines(wrap_width);

        let visible_height = if self.chat_height > 0 {
            self.chat_height
        } else {
            20
        };

        self.chat_scroll = total_lines.saturating_sub(visible_height);
    }

    // Manual chat scrolling
    pub fn scroll_down(&mut self) {
        if self.chat_scroll < self.chat_lines.saturating_sub(self.chat_height) {
            self.chat_scroll = self.chat_scroll.saturating_add(1);
        }
    }

    pub fn scroll_up(&mut self) {
        self.chat_scroll = self.chat_scroll.saturating_sub(1);
    }

    pub fn scroll_half_page_down(&mut self) {
        let half_page = self.chat_height / 2;
        let max_scroll = self.chat_lines.saturating_sub(self.chat_height);
        self.chat_scroll = (self.chat_scroll + half_page).min(max_scroll);
    }

    pub fn scroll_half_page_up(&mut self) {
        let half_page = self.chat_height / 2;
        self.chat_scroll = self.chat_scroll.saturating_sub(half_page);
    }

    pub fn scroll_to_top(&mut self) {
        self.chat_scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.chat_scroll = self.chat_lines.saturating_sub(self.chat_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_app() -> App {
        let (tx, _rx) = mpsc::unbounded_channel();
        App::new(&Config::new(), tx)
    }

    #[test]
    fn chat_lines_count_wrapped_content() {
        let mut app = test_app();
        app.session.begin("0123456789012345").expect("accepted"); // 16 chars
        app.session.apply_update("short".to_string());

        // Each message contributes label + wrapped content + blank; busy adds
        // the indicator line.
        let total = app.total_chat_lines(10);
        // greeting: 1 + (85 chars / 10 + 1 = 9) + 1 = 11
        // user:     1 + (16 / 10 + 1 = 2) + 1 = 4
        // reply:    1 + 1 + 1 = 3
        // indicator: 1
        assert_eq!(total, 19);
    }

    #[test]
    fn empty_placeholder_takes_only_its_label() {
        let mut app = test_app();
        app.session.begin("hi").expect("accepted");
        // placeholder: label + no content lines + blank
        let total = app.total_chat_lines(80);
        // greeting: 1 + 2 + 1, user: 1 + 1 + 1, placeholder: 1 + 1, indicator: 1
        assert_eq!(total, 10);
    }

    #[test]
    fn scroll_to_bottom_reveals_newest_lines() {
        let mut app = test_app();
        app.chat_width = 80;
        app.chat_height = 5;
        app.session.begin("question").expect("accepted");
        app.session
            .apply_update("one\ntwo\nthree\nfour\nfive\nsix".to_string());

        app.scroll_chat_to_bottom();
        let total = app.total_chat_lines(80);
        assert_eq!(app.chat_scroll, total - 5);
    }

    #[test]
    fn short_transcript_does_not_scroll() {
        let mut app = test_app();
        app.chat_width = 80;
        app.chat_height = 40;
        app.scroll_chat_to_bottom();
        assert_eq!(app.chat_scroll, 0);
    }

    #[test]
    fn animation_only_advances_while_busy() {
        let mut app = test_app();
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);

        app.session.begin("hi").expect("accepted");
        app.tick_animation();
        app.tick_animation();
        assert_eq!(app.animation_frame, 2);
        app.tick_animation();
        assert_eq!(app.animation_frame, 0);
    }
}
