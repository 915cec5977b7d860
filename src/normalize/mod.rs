pub mod fallback;
pub mod rules;
pub mod table;

pub use fallback::RegexNormalizer;
pub use table::TableNormalizer;
