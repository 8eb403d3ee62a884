/// Available commands and autocomplete logic

#[derive(Debug, Clone)]
pub struct Command {
  pub name: &'static str,
  pub aliases: &'static [&'static str],
  pub description: &'static str,
}

/// All available commands
pub const COMMANDS: &[Command] = &[
  Command {
    name: "pokedex",
    aliases: &["p", "dex", "list", "home"],
    description: "Browse the Pokédex catalog",
  },
  Command {
    name: "favorites",
    aliases: &["f", "favs"],
    description: "View your favorite Pokémon",
  },
  Command {
    name: "quit",
    aliases: &["q", "exit"],
    description: "Exit rotom",
  },
];

/// How well a command matches the typed input; lower is better.
fn rank(cmd: &Command, input: &str) -> Option<u32> {
  if cmd.name == input {
    return Some(0);
  }
  if cmd.aliases.contains(&input) {
    return Some(1);
  }
  if cmd.name.starts_with(input) {
    return Some(2);
  }
  if cmd.aliases.iter().any(|a| a.starts_with(input)) {
    return Some(3);
  }
  if cmd.name.contains(input) {
    return Some(4);
  }
  if cmd.aliases.iter().any(|a| a.contains(input)) {
    return Some(5);
  }
  None
}

/// Get autocomplete suggestions for a given input
pub fn get_suggestions(input: &str) -> Vec<&'static Command> {
  let input = input.trim().to_lowercase();

  if input.is_empty() {
    return COMMANDS.iter().collect();
  }

  let mut matches: Vec<(&Command, u32)> = COMMANDS
    .iter()
    .filter_map(|cmd| rank(cmd, &input).map(|r| (cmd, r)))
    .collect();

  // Sort by priority
  matches.sort_by_key(|(_, rank)| *rank);

  matches.into_iter().map(|(cmd, _)| cmd).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_input_returns_all() {
    let suggestions = get_suggestions("");
    assert_eq!(suggestions.len(), COMMANDS.len());
  }

  #[test]
  fn test_exact_match() {
    let suggestions = get_suggestions("pokedex");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "pokedex");
  }

  #[test]
  fn test_alias_match() {
    let suggestions = get_suggestions("f");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "favorites");
  }

  #[test]
  fn test_prefix_match() {
    let suggestions = get_suggestions("pok");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "pokedex");
  }

  #[test]
  fn test_fuzzy_match() {
    let suggestions = get_suggestions("vor");
    assert!(!suggestions.is_empty());
    assert_eq!(suggestions[0].name, "favorites");
  }

  #[test]
  fn test_no_match() {
    assert!(get_suggestions("xyzzy").is_empty());
  }
}
