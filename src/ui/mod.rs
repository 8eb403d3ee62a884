pub mod components;
pub mod view;
pub mod views;

use crate::app::{App, Mode};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph};

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app);

  // Draw current view
  if let Some(view) = app.current_view_mut() {
    view.render(frame, chunks[1]);
  }

  draw_status_bar(frame, chunks[2], app);

  if *app.mode() == Mode::Command {
    draw_command_overlay(frame, chunks[1], app);
  }
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
  let breadcrumb = app.breadcrumb().join(" > ");

  let left = Line::from(vec![
    Span::styled(
      format!(" {} ", app.title()),
      Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
    ),
    Span::styled(breadcrumb, Style::default().fg(Color::DarkGray)),
  ]);
  frame.render_widget(Paragraph::new(left), area);

  if let Some(view) = app.current_view() {
    let hints: Vec<String> = view
      .shortcuts()
      .iter()
      .map(|s| format!("{}:{}", s.key, s.label))
      .collect();
    let right = Paragraph::new(Line::from(Span::styled(
      format!("{} ", hints.join("  ")),
      Style::default().fg(Color::DarkGray),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(right, area);
  }
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let (content, style) = match app.mode() {
    Mode::Normal => {
      let hint = " :command  /search  j/k:nav  Enter:select  q:back  Ctrl-C:quit";
      (hint.to_string(), Style::default().fg(Color::DarkGray))
    }
    Mode::Command => {
      let cmd = format!(":{}", app.command_input());
      (cmd, Style::default().fg(Color::Yellow))
    }
  };

  frame.render_widget(Paragraph::new(content).style(style), area);
}

fn draw_command_overlay(frame: &mut Frame, area: Rect, app: &App) {
  let suggestions = app.suggestions();

  let width = 44u16.min(area.width.saturating_sub(2));
  let height = (suggestions.len() as u16 + 3).min(area.height);
  let overlay_area = Rect::new(area.x + 1, area.y + 1, width, height);

  frame.render_widget(Clear, overlay_area);

  let block = Block::default()
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Yellow))
    .title(" Command ");
  let inner = block.inner(overlay_area);
  frame.render_widget(block, overlay_area);

  if inner.height == 0 {
    return;
  }

  let mut lines = vec![Line::from(vec![
    Span::styled(":", Style::default().fg(Color::Yellow)),
    Span::raw(app.command_input()),
    Span::styled("_", Style::default().fg(Color::Yellow)),
  ])];

  for (i, cmd) in suggestions.iter().enumerate() {
    let style = if i == app.selected_suggestion() {
      Style::default().fg(Color::Black).bg(Color::Yellow)
    } else {
      Style::default().fg(Color::Gray)
    };
    lines.push(Line::from(Span::styled(
      format!("{:<12} {}", cmd.name, cmd.description),
      style,
    )));
  }

  frame.render_widget(Paragraph::new(lines), inner);
}

/// Keep a list selection inside the current bounds
pub fn ensure_valid_selection(state: &mut ListState, len: usize) {
  if len == 0 {
    state.select(None);
    return;
  }
  match state.selected() {
    Some(i) if i < len => {}
    _ => state.select(Some(0)),
  }
}

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.len() <= max_len {
    s.to_string()
  } else {
    format!("{}...", &s[..max_len.saturating_sub(3)])
  }
}

/// National dex number formatted the classic way: #025
pub fn dex_number(id: u32) -> String {
  format!("#{:03}", id)
}

/// Display color for a Pokémon type
pub fn type_color(type_name: &str) -> Color {
  match type_name {
    "fire" => Color::Red,
    "water" => Color::Blue,
    "grass" | "bug" => Color::Green,
    "electric" => Color::Yellow,
    "ice" => Color::Cyan,
    "fighting" => Color::LightRed,
    "poison" | "ghost" => Color::Magenta,
    "psychic" | "fairy" => Color::LightMagenta,
    "ground" | "rock" => Color::LightYellow,
    "flying" | "dragon" => Color::LightBlue,
    "dark" => Color::DarkGray,
    "steel" => Color::Gray,
    _ => Color::White,
  }
}

/// Short label for a canonical stat name
pub fn stat_label(stat_name: &str) -> &str {
  match stat_name {
    "hp" => "HP",
    "attack" => "ATK",
    "defense" => "DEF",
    "special-attack" => "Sp.ATK",
    "special-defense" => "Sp.DEF",
    "speed" => "SPD",
    other => other,
  }
}

/// Render a selectable list with the shared highlight styling
pub fn render_list(
  frame: &mut Frame,
  area: Rect,
  block: Block,
  items: Vec<ListItem>,
  state: &mut ListState,
) {
  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  frame.render_stateful_widget(list, area, state);
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_dex_number_pads_to_three() {
    assert_eq!(dex_number(1), "#001");
    assert_eq!(dex_number(25), "#025");
    assert_eq!(dex_number(1000), "#1000");
  }

  #[test]
  fn test_stat_labels() {
    assert_eq!(stat_label("hp"), "HP");
    assert_eq!(stat_label("special-attack"), "Sp.ATK");
    assert_eq!(stat_label("speed"), "SPD");
    // Unknown stats pass through untouched.
    assert_eq!(stat_label("evasion"), "evasion");
  }

  #[test]
  fn test_selection_is_clamped() {
    let mut state = ListState::default();
    state.select(Some(7));

    ensure_valid_selection(&mut state, 3);
    assert_eq!(state.selected(), Some(0));

    ensure_valid_selection(&mut state, 0);
    assert_eq!(state.selected(), None);
  }
}
