mod favorites;
mod pokedex;
mod pokemon_detail;
mod search;

pub use favorites::FavoritesView;
pub use pokedex::PokedexView;
pub use pokemon_detail::PokemonDetailView;
pub use search::SearchView;
