pub mod alignment;
pub mod config;
pub mod error;
pub mod normalize;
pub mod pipeline;
pub mod providers;
pub mod types;

pub use alignment::report::{
    ChapterReport, ChapterVerseReport, CharOpRecord, Normalization, SpellCheckData, SpellRecord,
    VerseReport, WordOpRecord,
};
pub use alignment::score::Grade;
pub use config::{NormalizeOptions, VerifierConfig};
pub use error::VerifyError;
pub use pipeline::builder::RecitationVerifierBuilder;
pub use pipeline::runtime::RecitationVerifier;
pub use pipeline::traits::{Normalizer, ReferenceProvider};
pub use providers::JsonReferenceProvider;
pub use types::{ChapterInput, NormalizedText, OpKind, VerseInput, WordToken};
