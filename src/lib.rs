//! Bilingual prompt catalog: normalization of heterogeneous prompt records,
//! Chinese/English content resolution, favorites, and the JSON API that
//! serves them to the static front-end.

pub mod app;
pub mod config;
pub mod data;
pub mod features;
pub mod handlers;
pub mod schema;
pub mod utils;
