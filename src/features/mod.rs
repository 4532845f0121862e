pub mod bilingual;
pub mod catalog;
pub mod favorites;
