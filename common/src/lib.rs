//! Reef ID Common Library
//!
//! CLIとHTTPサーバで共有される型と魚種照合ロジック

pub mod catalog;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod pattern;
pub mod prompts;
pub mod refusal;
pub mod storage;
pub mod trigram;
pub mod types;

pub use catalog::{CatalogQuery, InMemoryCatalog, SpeciesCatalog};
pub use error::{Error, Result};
pub use matcher::{match_species, MatchFailure, CANDIDATE_LIMIT, MIN_CONFIDENCE};
pub use parser::clean_species_answer;
pub use refusal::is_refusal;
pub use storage::ImageStore;
pub use trigram::{similarity, TrigramScheme};
pub use types::{CatalogRecord, Distribution, MatchResult, RecordId, ScoredCandidate, SpeciesResponse};
