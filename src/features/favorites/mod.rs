pub mod store;

pub use store::{FAVORITES_KEY, FavoritesStore};
