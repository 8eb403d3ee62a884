use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

/// What a key press did to the search input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchResult {
  /// Input is open and consumed the key
  Active,
  /// User submitted the query (input closed)
  Submitted(String),
  /// User dismissed the input
  Cancelled,
  /// Input is closed; key not handled
  NotHandled,
}

/// `/` search input drawn as an overlay
#[derive(Debug, Clone, Default)]
pub struct SearchInput {
  buffer: String,
  active: bool,
}

impl SearchInput {
  pub fn new() -> Self {
    Self::default()
  }

  /// Check if search is currently active
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// Handle a key event.
  /// Call this regardless of active state - it handles activation too.
  pub fn handle_key(&mut self, key: KeyEvent) -> SearchResult {
    if !self.active {
      if key.code == KeyCode::Char('/') {
        self.active = true;
        self.buffer.clear();
        return SearchResult::Active;
      }
      return SearchResult::NotHandled;
    }

    match key.code {
      KeyCode::Esc => {
        self.active = false;
        self.buffer.clear();
        SearchResult::Cancelled
      }
      KeyCode::Enter => {
        self.active = false;
        SearchResult::Submitted(std::mem::take(&mut self.buffer))
      }
      KeyCode::Backspace => {
        self.buffer.pop();
        SearchResult::Active
      }
      KeyCode::Char(c) => {
        self.buffer.push(c);
        SearchResult::Active
      }
      _ => SearchResult::Active,
    }
  }

  /// Render the search overlay if active
  pub fn render_overlay(&self, frame: &mut Frame, area: Rect) {
    if !self.active {
      return;
    }

    let width = (area.width * 60 / 100).clamp(30, 60);
    let height = 3; // Just input line with borders

    // Position at top-left of content area with small margin
    let x = area.x + 1;
    let y = area.y + 1;

    let overlay_area = Rect::new(x, y, width.min(area.width.saturating_sub(2)), height);

    // Clear the area behind the overlay
    frame.render_widget(Clear, overlay_area);

    let block = Block::default()
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Yellow))
      .title(" Search ");

    let inner = block.inner(overlay_area);
    frame.render_widget(block, overlay_area);

    if inner.height == 0 {
      return;
    }

    let input_line = Line::from(vec![
      Span::styled("/", Style::default().fg(Color::Yellow)),
      Span::raw(self.buffer.as_str()),
      Span::styled("_", Style::default().fg(Color::Yellow)), // Cursor
    ]);
    frame.render_widget(Paragraph::new(input_line), inner);
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crossterm::event::{KeyEvent, KeyModifiers};

  fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
  }

  #[test]
  fn slash_activates_and_keys_accumulate() {
    let mut search = SearchInput::new();

    assert_eq!(search.handle_key(press(KeyCode::Char('j'))), SearchResult::NotHandled);
    assert_eq!(search.handle_key(press(KeyCode::Char('/'))), SearchResult::Active);
    assert!(search.is_active());

    search.handle_key(press(KeyCode::Char('p')));
    search.handle_key(press(KeyCode::Char('i')));

    assert_eq!(
      search.handle_key(press(KeyCode::Enter)),
      SearchResult::Submitted("pi".to_string())
    );
    assert!(!search.is_active());
  }

  #[test]
  fn escape_cancels_and_clears() {
    let mut search = SearchInput::new();
    search.handle_key(press(KeyCode::Char('/')));
    search.handle_key(press(KeyCode::Char('x')));

    assert_eq!(search.handle_key(press(KeyCode::Esc)), SearchResult::Cancelled);
    assert!(!search.is_active());

    // Reopening starts from an empty buffer.
    search.handle_key(press(KeyCode::Char('/')));
    assert_eq!(
      search.handle_key(press(KeyCode::Enter)),
      SearchResult::Submitted(String::new())
    );
  }

  #[test]
  fn backspace_edits_the_buffer() {
    let mut search = SearchInput::new();
    search.handle_key(press(KeyCode::Char('/')));
    search.handle_key(press(KeyCode::Char('p')));
    search.handle_key(press(KeyCode::Char('i')));
    search.handle_key(press(KeyCode::Backspace));
    search.handle_key(press(KeyCode::Char('d')));

    assert_eq!(
      search.handle_key(press(KeyCode::Enter)),
      SearchResult::Submitted("pd".to_string())
    );
  }
}
