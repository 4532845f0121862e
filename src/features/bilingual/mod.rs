pub mod resolver;
pub mod source;

pub use resolver::{AUTO_TRANSLATED_MARKER, looks_english, resolve};
pub use source::BilingualSource;
