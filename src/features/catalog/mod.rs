pub mod index;
pub mod normalizer;
pub mod service;

pub use index::{ALL_CATEGORIES, CatalogIndex};
pub use normalizer::normalize;
pub use service::CatalogService;
