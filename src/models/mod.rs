//! Core data models for classified input and extracted metadata.

mod input;
mod metadata;

pub use input::{DetectedInput, InputKind};
pub use metadata::{
    BookDetails, Metadata, MetadataBuilder, PaperDetails, SourceDetails, VideoDetails,
    DEFAULT_AUTHOR, DEFAULT_SITE_NAME, DEFAULT_TITLE, NO_DATE,
};
