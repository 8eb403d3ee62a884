use crate::api::{
  types::{Pokemon, PokemonSpecies},
  CachedClient,
};
use crate::favorites::Favorites;
use crate::query::{Query, QueryState};
use crate::ui::view::{Shortcut, View, ViewAction};
use crate::ui::{dex_number, stat_label, type_color};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use tracing::warn;

/// Everything the detail view shows for one Pokémon.
///
/// The entity itself is required; species and evolution degrade to their
/// tabs' empty states when unavailable.
struct DetailBundle {
  pokemon: Pokemon,
  species: Option<PokemonSpecies>,
  evolution: Vec<Pokemon>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
  About,
  Stats,
  Evolution,
}

impl Tab {
  fn label(self) -> &'static str {
    match self {
      Tab::About => "About",
      Tab::Stats => "Stats",
      Tab::Evolution => "Evolution",
    }
  }

  fn next(self) -> Self {
    match self {
      Tab::About => Tab::Stats,
      Tab::Stats => Tab::Evolution,
      Tab::Evolution => Tab::About,
    }
  }
}

/// View for displaying one Pokémon's details
pub struct PokemonDetailView {
  id_or_name: String,
  client: CachedClient,
  favorites: Favorites,
  tab: Tab,
  query: Query<DetailBundle>,
}

impl PokemonDetailView {
  pub fn new(id_or_name: String, client: CachedClient, favorites: Favorites) -> Self {
    let mut query = Self::bundle_query(client.clone(), id_or_name.clone());
    query.fetch();

    Self {
      id_or_name,
      client,
      favorites,
      tab: Tab::About,
      query,
    }
  }

  fn bundle_query(client: CachedClient, id_or_name: String) -> Query<DetailBundle> {
    Query::new(move || {
      let client = client.clone();
      let id_or_name = id_or_name.clone();
      async move {
        let pokemon = client
          .pokemon(&id_or_name)
          .await
          .map_err(|e| e.to_string())?;

        // Species and evolution degrade independently: their tabs fall back
        // to empty states instead of failing the whole view.
        let species = match client.species(&pokemon.id.to_string()).await {
          Ok(species) => Some(species),
          Err(e) => {
            warn!("species for {} unavailable: {}", pokemon.name, e);
            None
          }
        };

        let mut evolution = Vec::new();
        if let Some(chain_ref) = species.as_ref().and_then(|s| s.evolution_chain.as_ref()) {
          match client.evolution_chain(&chain_ref.url).await {
            Ok(chain) => match client.evolution_line(&chain).await {
              Ok(line) => evolution = line,
              Err(e) => warn!("evolution line for {} unavailable: {}", pokemon.name, e),
            },
            Err(e) => warn!("evolution chain for {} unavailable: {}", pokemon.name, e),
          }
        }

        Ok(DetailBundle {
          pokemon,
          species,
          evolution,
        })
      }
    })
  }

  /// Jump to another entity by dex id (prev/next navigation).
  fn open(&mut self, id: u32) {
    self.id_or_name = id.to_string();
    self.tab = Tab::About;
    self.query = Self::bundle_query(self.client.clone(), self.id_or_name.clone());
    self.query.fetch();
  }

  fn current_id(&self) -> Option<u32> {
    self.query.data().map(|bundle| bundle.pokemon.id)
  }

  fn render_tabs(&self, frame: &mut Frame, area: Rect) {
    let mut spans = Vec::new();
    for tab in [Tab::About, Tab::Stats, Tab::Evolution] {
      let style = if tab == self.tab {
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
      } else {
        Style::default().fg(Color::DarkGray)
      };
      spans.push(Span::styled(format!(" {} ", tab.label()), style));
      spans.push(Span::raw(" "));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
  }

  fn render_about(&self, bundle: &DetailBundle, frame: &mut Frame, area: Rect) {
    let pokemon = &bundle.pokemon;

    let description = bundle
      .species
      .as_ref()
      .and_then(|s| s.english_flavor_text())
      .unwrap_or_else(|| "No description available.".to_string());

    let abilities = if pokemon.abilities.is_empty() {
      "unknown".to_string()
    } else {
      pokemon
        .abilities
        .iter()
        .map(|a| a.ability.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
    };

    let mut lines = vec![Line::raw(description), Line::raw("")];
    lines.push(Line::from(vec![
      Span::styled("Height    ", Style::default().fg(Color::DarkGray)),
      Span::raw(format!("{:.1} m", pokemon.height_m())),
    ]));
    lines.push(Line::from(vec![
      Span::styled("Weight    ", Style::default().fg(Color::DarkGray)),
      Span::raw(format!("{:.1} kg", pokemon.weight_kg())),
    ]));
    lines.push(Line::from(vec![
      Span::styled("Abilities ", Style::default().fg(Color::DarkGray)),
      Span::raw(abilities),
    ]));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
  }

  fn render_stats(&self, bundle: &DetailBundle, frame: &mut Frame, area: Rect) {
    let color = bundle
      .pokemon
      .primary_type()
      .map(type_color)
      .unwrap_or(Color::White);

    let bar_width = area.width.saturating_sub(20).max(10) as u32;

    let lines: Vec<Line> = bundle
      .pokemon
      .stats
      .iter()
      .map(|slot| {
        // Stats are scaled against the 255 ceiling.
        let filled = (slot.base_stat.min(255) * bar_width / 255) as usize;
        Line::from(vec![
          Span::raw(format!("{:<8}", stat_label(&slot.stat.name))),
          Span::styled("█".repeat(filled), Style::default().fg(color)),
          Span::styled(
            "░".repeat(bar_width as usize - filled),
            Style::default().fg(Color::DarkGray),
          ),
          Span::raw(format!(" {:>3}", slot.base_stat)),
        ])
      })
      .collect();

    frame.render_widget(Paragraph::new(lines), area);
  }

  fn render_evolution(&self, bundle: &DetailBundle, frame: &mut Frame, area: Rect) {
    if bundle.evolution.is_empty() {
      let paragraph = Paragraph::new("No evolution data available.")
        .style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, area);
      return;
    }

    let lines: Vec<Line> = bundle
      .evolution
      .iter()
      .enumerate()
      .map(|(i, evo)| {
        let marker = if i == 0 { "  " } else { "> " };
        let style = if evo.id == bundle.pokemon.id {
          Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
          Style::default()
        };
        Line::from(vec![
          Span::styled(marker, Style::default().fg(Color::DarkGray)),
          Span::styled(format!("{:<6}", dex_number(evo.id)), Style::default().fg(Color::Cyan)),
          Span::styled(evo.name.clone(), style),
        ])
      })
      .collect();

    frame.render_widget(Paragraph::new(lines), area);
  }

  fn render_detail(&mut self, frame: &mut Frame, area: Rect) {
    let title = match self.query.state() {
      QueryState::Loading => format!(" {} (loading...) ", self.id_or_name),
      QueryState::Error(e) => format!(" {} (error: {}) ", self.id_or_name, e),
      _ => match self.query.data() {
        Some(bundle) => format!(
          " {} {} ",
          bundle.pokemon.name,
          dex_number(bundle.pokemon.id)
        ),
        None => format!(" {} ", self.id_or_name),
      },
    };

    let block = Block::default()
      .title(title)
      .title_alignment(Alignment::Center)
      .borders(Borders::ALL)
      .border_style(Style::default().fg(Color::Blue));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if self.query.is_loading() {
      let paragraph =
        Paragraph::new("Loading details...").style(Style::default().fg(Color::DarkGray));
      frame.render_widget(paragraph, inner);
      return;
    }

    if let Some(error) = self.query.error() {
      let paragraph = Paragraph::new(format!("Error: {}\n\nPress 'r' to retry.", error))
        .style(Style::default().fg(Color::Red));
      frame.render_widget(paragraph, inner);
      return;
    }

    let bundle = match self.query.data() {
      Some(bundle) => bundle,
      None => return,
    };

    let chunks = Layout::default()
      .direction(Direction::Vertical)
      .constraints([
        Constraint::Length(2), // Types, generation, favorite marker
        Constraint::Length(1), // Tab bar
        Constraint::Min(1),    // Tab content
      ])
      .split(inner);

    // Header line: types, generation tag, favorite marker
    let mut header = Vec::new();
    for slot in &bundle.pokemon.types {
      header.push(Span::styled(
        format!("{} ", slot.kind.name),
        Style::default().fg(type_color(&slot.kind.name)),
      ));
    }
    if let Some(species) = &bundle.species {
      header.push(Span::styled(
        format!(" {}", species.generation_label()),
        Style::default().fg(Color::DarkGray),
      ));
    }
    if self.favorites.contains(bundle.pokemon.id) {
      header.push(Span::styled("  ♥ favorite", Style::default().fg(Color::Red)));
    }
    frame.render_widget(Paragraph::new(Line::from(header)), chunks[0]);

    self.render_tabs(frame, chunks[1]);

    match self.tab {
      Tab::About => self.render_about(bundle, frame, chunks[2]),
      Tab::Stats => self.render_stats(bundle, frame, chunks[2]),
      Tab::Evolution => self.render_evolution(bundle, frame, chunks[2]),
    }
  }
}

impl View for PokemonDetailView {
  fn handle_key(&mut self, key: KeyEvent) -> ViewAction {
    match key.code {
      KeyCode::Tab => {
        self.tab = self.tab.next();
      }
      KeyCode::Char('1') => self.tab = Tab::About,
      KeyCode::Char('2') => self.tab = Tab::Stats,
      KeyCode::Char('3') => self.tab = Tab::Evolution,
      KeyCode::Char('f') => {
        if let Some(id) = self.current_id() {
          self.favorites.toggle(id);
        }
      }
      KeyCode::Char('h') | KeyCode::Left => {
        if let Some(id) = self.current_id() {
          if id > 1 {
            self.open(id - 1);
          }
        }
      }
      KeyCode::Char('l') | KeyCode::Right => {
        if let Some(id) = self.current_id() {
          self.open(id + 1);
        }
      }
      KeyCode::Char('r') => {
        self.query.refetch();
      }
      KeyCode::Char('q') | KeyCode::Esc => return ViewAction::Pop,
      _ => {}
    }
    ViewAction::None
  }

  fn render(&mut self, frame: &mut Frame, area: Rect) {
    self.render_detail(frame, area);
  }

  fn breadcrumb_label(&self) -> String {
    match self.query.data() {
      Some(bundle) => bundle.pokemon.name.clone(),
      None => self.id_or_name.clone(),
    }
  }

  fn tick(&mut self) {
    self.query.poll();
  }

  fn shortcuts(&self) -> Vec<Shortcut> {
    vec![
      Shortcut::new("tab", "tabs"),
      Shortcut::new("f", "favorite"),
      Shortcut::new("h/l", "prev/next"),
      Shortcut::new("r", "refresh"),
      Shortcut::new("q", "back"),
    ]
  }
}
