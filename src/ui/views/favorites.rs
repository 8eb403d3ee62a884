use crate::api::{types::Pokemon, CachedClient};
use crate::favorites::Favorites;
use crate::query::{Query, QueryState};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::PokemonDetailView;
use crate::ui::{dex_number, ensure_valid_selection, render_list, truncate, type_color};
use crossterm::event::{KeyCode, KeyEvent};
use futures::future::try_join_all;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, ListItem, ListState, Paragraph};

/// View listing every favorite with full entity data.
pub struct FavoritesView {
  client: CachedClient,
  favorites: Favorites,
  query: Query<Vec<Pokemon>>,
  list_state: ListState,
}

impl FavoritesView {
  pub fn new(client: CachedClient, favorites: Favorites) -> Self {
    let mut query = Self::favorites_query(client.clone(), favorites.clone());
    query.fetch();

    Self {
      client,
      favorites,
      query,
      list_state: ListState::default(),
    }
  }

  /// The id set is re-read on every (re)fetch, so toggles made elsewhere
  /// show up after a refresh. Resolution is concurrent and fail-fast.
  fn favorites_query(client: CachedClient, favorites: Favorites) -> Query<Vec<Pokemon>> {
    Query::new(move || {
      let client = client.clone();
      let favorites = favorites.clone();
      async move {
        let ids = favorites.ids();
        let id_strings: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
        try_join_all(id_strings.iter().map(|id| client.pokemon(id)))
          .await
          .map_err(|e| e.to_string())
      }
    })
  }

  fn pokemon(&self) -> &[Pokemon] {
    self.query.data().map(|v| v.as_slice()).unwrap_or(&[])
  }

  fn render_favorites(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.pokemon().len();
    ensure_valid_selection(&mut self.list_state, len);

    let title = match self.query.state() {
      QueryState::Loading => " Favorites (loading...) ".to_string(),
      QueryState::Error(e) => format!(" Favorites (error: {}) ", e),
      _ => format!(" Favorites ({}) ", len),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let content = if self.query.is_error() {
        "Failed to load favorites. Press 'r' to retry."
      } else if self.query.is_loading() {
        "Loading..."
      } else {
        "No favorites yet. Press 'f' on a Pokémon's page to add one."
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
          Span::styled("♥ ", Style::default().fg(Color::Red)),
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

impl View for FavoritesView {
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
    self.render_favorites(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Favorites".to_string()
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
