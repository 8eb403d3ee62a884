mod search_input;

pub use search_input::{SearchInput, SearchResult};
