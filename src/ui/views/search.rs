use crate::api::{types::Pokemon, CachedClient};
use crate::favorites::Favorites;
use crate::query::{Query, QueryState};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::PokemonDetailView;
use crate::ui::{dex_number, ensure_valid_selection, render_list, truncate, type_color};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, ListItem, ListState, Paragraph};

/// Results of a name search over the bounded universe.
pub struct SearchView {
  term: String,
  client: CachedClient,
  favorites: Favorites,
  query: Query<Vec<Pokemon>>,
  list_state: ListState,
}

impl SearchView {
  pub fn new(term: String, client: CachedClient, favorites: Favorites) -> Self {
    let mut query = {
      let client = client.clone();
      let term = term.clone();
      Query::new(move || {
        let client = client.clone();
        let term = term.clone();
        async move { client.search(&term).await.map_err(|e| e.to_string()) }
      })
    };
    query.fetch();

    Self {
      term,
      client,
      favorites,
      query,
      list_state: ListState::default(),
    }
  }

  fn pokemon(&self) -> &[Pokemon] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn render_results(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.pokemon().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.query.state() {
      QueryState::Loading => format!(" Search \"{}\" (loading...) ", self.term),
      QueryState::Error(e) => format!(" Search \"{}\" (error: {}) ", self.term, e),
      _ => format!(" Search \"{}\" ({}) ", self.term, len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let content = if self.query.is_error() {
        "Search failed. Press 'r' to retry."
      } else if self.query.is_loading() {
        "Searching..."
      } else {
        "No Pokémon matched."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let items: Vec<ListItem> = self
      .pokemon()
      .iter()
      .map(|p| {
        let mut spans = vec![
          Span::styled(
            format!("{:<6}", dex_number(p.id)),
            Style::default().fg(Color::Cyan),
          ),
          Span::raw(format!("{:<14}", truncate(&p.name, 14))),
        ];
        for slot in &p.types {
          spans.push(Span::styled(
            format!("{:<10}", slot.kind.name),
            Style::default().fg(type_color(&slot.kind.name)),
          ));
        }
        ListItem::new(Line::from(spans))
      })
      .collect();

    render_list(frame, area, block, items, &mut self.list_state);
  }
}

impl View for SearchView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Char('j') | KeyCode::Down => {
        self.list_state.select_next();
      }
      KeyCode::Char('k') | KeyCode::Up => {
        self.list_state.select_previous();
      }
      KeyCode::Char('r') => {
        self.query.refetch();
      }
      KeyCode::Enter => {
        if let Some(idx) = self.list_state.selected() {
          if let Some(pokemon) = self.pokemon().get(idx) {
            return ViewAction::Push(Box::new(PokemonDetailView::new(
              pokemon.name.clone(),
              self.client.clone(),
              self.favorites.clone(),
            )));
          }
        }
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_results(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    format!("Search \"{}\"", self.term)
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("enter", "details"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
