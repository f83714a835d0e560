//! # Research Cite
//!
//! Turn a URL, DOI, ISBN or YouTube link into bibliographic metadata and a
//! formatted citation in APA, MLA, Chicago, Harvard or IEEE style.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (DetectedInput, Metadata)
//! - [`sources`]: Metadata providers with an extensible trait-based architecture
//! - [`extract`]: Classification, provider dispatch and fallback chains
//! - [`utils`]: Classifier, citation formatter, HTTP client and retry
//! - [`config`]: Configuration management
//!
//! ```rust,no_run
//! use research_cite::config::Config;
//! use research_cite::extract::Extractor;
//! use research_cite::utils::CitationStyle;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let extractor = Extractor::from_config(&Config::default())?;
//! let extraction = extractor.extract("10.1038/nature12373").await?;
//! println!("{}", extraction.citation(CitationStyle::Apa));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod extract;
pub mod models;
pub mod sources;
pub mod ui;
pub mod utils;

// Re-export commonly used types
pub use extract::{CitationSession, ExtractError, Extraction, Extractor};
pub use models::{DetectedInput, InputKind, Metadata};
pub use sources::{Source, SourceRegistry};
pub use utils::CitationStyle;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
