use crate::api::{types::Pokemon, CachedClient};
use crate::favorites::Favorites;
use crate::query::{Query, QueryState};
use crate::ui::components::{SearchInput, SearchResult};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::views::{PokemonDetailView, SearchView};
use crate::ui::{dex_number, ensure_valid_selection, render_list, truncate, type_color};
use crossterm::event::{KeyCode, KeyEvent};
use futures::future::try_join_all;
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, ListItem, ListState, Paragraph};

/// One loaded page of the catalog.
struct CatalogPage {
  pokemon: Vec<Pokemon>,
  /// Whether the listing reports a further page.
  has_more: bool,
}

/// The paginated catalog: the app's root view.
pub struct PokedexView {
  client: CachedClient,
  favorites: Favorites,
  page_size: u32,
  offset: u32,
  query: Query<CatalogPage>,
  list_state: ListState,
  search: SearchInput,
}

impl PokedexView {
  pub fn new(client: CachedClient, favorites: Favorites, page_size: u32) -> Self {
    let mut query = Self::page_query(client.clone(), page_size, 0);
    query.fetch();

    Self {
      client,
      favorites,
      page_size,
      offset: 0,
      query,
      list_state: ListState::default(),
      search: SearchInput::new(),
    }
  }

  /// A page is the summary listing plus full entity data for every row,
  /// resolved concurrently (types are shown per row).
  fn page_query(client: CachedClient, limit: u32, offset: u32) -> Query<CatalogPage> {
    Query::new(move || {
      let client = client.clone();
      async move {
        let page = client
          .list(limit, offset)
          .await
          .map_err(|e| e.to_string())?;
        let has_more = page.next.is_some();

        let pokemon = try_join_all(page.results.iter().map(|entry| client.pokemon(&entry.name)))
          .await
          .map_err(|e| e.to_string())?;

        Ok(CatalogPage { pokemon, has_more })
      }
    })
  }

  fn turn_page(&mut self, new_offset: u32) {
    self.offset = new_offset;
    self.query = Self::page_query(self.client.clone(), self.page_size, new_offset);
    self.query.fetch();
    self.list_state.select(Some(0));
  }

  fn pokemon(&self) -> &[Pokemon] {
    self
      .query
      .data()
      .map(|page| page.pokemon.as_slice())
      .unwrap_or(&[])
  }

  fn has_more(&self) -> bool {
    self.query.data().map(|page| page.has_more).unwrap_or(false)
  }

  fn render_catalog(&mut self, frame: &mut Frame, area: Rect) {
    let len = self.pokemon().len();
    ensure_valid_selection(&mut self.list_state, len);

    let range = format!(
      "#{}-{}",
      self.offset + 1,
      self.offset + self.page_size.max(1)
    );
    let title = match self.query.state() {
      QueryState::Loading => format!(" Pokédex {} (loading...) ", range),
      QueryState::Error(e) => format!(" Pokédex {} (error: {}) ", range, e),
      _ => format!(" Pokédex {} ", range),
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    if len == 0 {
      let content = if self.query.is_error() {
        "Failed to load the Pokédex. Press 'r' to retry."
      } else if self.query.is_loading() {
        "Loading..."
      } else {
        "Nothing here."
      };
      let paragraph = Paragraph::new(content)
        .block(block)
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let favorite_ids = self.favorites.ids();

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

        if favorite_ids.contains(&p.id) {
          spans.push(Span::styled("♥", Style::default().fg(Color::Red)));
        }

        ListItem::new(Line::from(spans))
      })
      .collect();

    render_list(frame, area, block, items, &mut self.list_state);
  }
}

impl View for PokedexView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    // Let the search overlay try the key first
    match self.search.handle_key(key) {
      SearchResult::Active | SearchResult::Cancelled => return ViewAction::None,
      SearchResult::Submitted(query) => {
        let query = query.trim().to_string();
        // Two characters minimum before a search launches; shorter input is
        // dropped silently.
        if query.len() >= 2 {
          return ViewAction::Push(Box::new(SearchView::new(
            query,
            self.client.clone(),
            self.favorites.clone(),
          )));
        }
        return ViewAction::None;
      }
      SearchResult::NotHandled => {}
    }

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
      KeyCode::Char('n') | KeyCode::Char(']') => {
        if self.has_more() {
          self.turn_page(self.offset + self.page_size);
        }
      }
      KeyCode::Char('p') | KeyCode::Char('[') => {
        if self.offset > 0 {
          self.turn_page(self.offset.saturating_sub(self.page_size));
        }
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
    self.render_catalog(frame, area);
    self.search.render_overlay(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    "Pokédex".to_string()
  }

  fn wants_input(&self) -> bool {
    self.search.is_active()
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("enter", "details"),
      Shortcut::new("n/p", "page"),
      Shortcut::new("/", "search"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "quit"),
    ]
  }
}
