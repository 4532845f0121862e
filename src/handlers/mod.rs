pub mod catalog;
pub mod error_responses;
pub mod extractors;
pub mod favorites;
