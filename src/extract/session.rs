//! Interactive extraction session.
//!
//! A session holds the state one front end needs between user actions: the
//! text typed so far, the selected style, the last record or error. Each
//! extraction moves through `Idle → Classifying → Extracting → Formatting →
//! Done | Failed`. Starting a new extraction while one is in flight
//! supersedes it: the older result is dropped when it arrives.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::{Extraction, Extractor};
use crate::models::{DetectedInput, Metadata};
use crate::utils::{classify, validate_input, CitationStyle, ValidationError};

/// Where a session is in its extraction lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Idle,
    Classifying,
    Extracting,
    Formatting,
    Done,
    Failed,
}

/// How an extraction request ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// Citation in the selected style
    Done(String),

    /// User-facing failure reason
    Failed(String),

    /// A newer request or a reset replaced this one; its result was dropped
    Superseded,
}

#[derive(Debug)]
struct SessionInner {
    state: SessionState,
    style: CitationStyle,
    input: String,
    detected: Option<DetectedInput>,
    current: Option<Extraction>,
    error: Option<String>,
}

/// Stateful wrapper around an [`Extractor`]
#[derive(Debug)]
pub struct CitationSession {
    extractor: Extractor,
    inner: Mutex<SessionInner>,
    generation: AtomicU64,
}

impl CitationSession {
    pub fn new(extractor: Extractor, style: CitationStyle) -> Self {
        Self {
            extractor,
            inner: Mutex::new(SessionInner {
                state: SessionState::Idle,
                style,
                input: String::new(),
                detected: None,
                current: None,
                error: None,
            }),
            generation: AtomicU64::new(0),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state
    }

    pub fn style(&self) -> CitationStyle {
        self.lock().style
    }

    /// The text of the last extraction request, kept after failures
    pub fn input(&self) -> String {
        self.lock().input.clone()
    }

    pub fn error(&self) -> Option<String> {
        self.lock().error.clone()
    }

    pub fn detected(&self) -> Option<DetectedInput> {
        self.lock().detected.clone()
    }

    pub fn metadata(&self) -> Option<Metadata> {
        self.lock().current.as_ref().map(|e| e.metadata.clone())
    }

    /// Run an extraction for `raw`.
    ///
    /// Empty input is rejected without touching the session state.
    pub async fn extract(&self, raw: &str) -> Result<ExtractOutcome, ValidationError> {
        let trimmed = validate_input(raw)?;

        let (generation, detected) = {
            let mut inner = self.lock();
            let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            inner.state = SessionState::Classifying;
            inner.input = raw.to_string();
            inner.detected = None;
            inner.current = None;
            inner.error = None;

            let detected = classify(trimmed);
            inner.detected = Some(detected.clone());
            inner.state = SessionState::Extracting;
            (generation, detected)
        };

        let result = self.extractor.lookup(detected).await;

        let mut inner = self.lock();
        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(generation, "Dropping superseded extraction result");
            return Ok(ExtractOutcome::Superseded);
        }

        match result {
            Ok(extraction) => {
                inner.state = SessionState::Formatting;
                let citation = extraction.citation(inner.style);
                inner.detected = Some(extraction.input.clone());
                inner.current = Some(extraction);
                inner.state = SessionState::Done;
                Ok(ExtractOutcome::Done(citation))
            }
            Err(e) => {
                let message = e.user_message();
                inner.error = Some(message.clone());
                inner.state = SessionState::Failed;
                Ok(ExtractOutcome::Failed(message))
            }
        }
    }

    /// Change the selected style; returns the re-rendered citation when one exists
    pub fn set_style(&self, style: CitationStyle) -> Option<String> {
        let mut inner = self.lock();
        inner.style = style;
        inner.current.as_ref().map(|e| e.citation(style))
    }

    /// Current citation in the selected style
    pub fn citation(&self) -> Option<String> {
        let inner = self.lock();
        inner.current.as_ref().map(|e| e.citation(inner.style))
    }

    /// Text to place on the clipboard
    pub fn copy_text(&self) -> Option<String> {
        self.citation()
    }

    /// Text to hand to a share sheet
    pub fn share_text(&self) -> Option<String> {
        self.citation()
    }

    /// Return to `Idle`, discarding input, record and error.
    ///
    /// An extraction still in flight is superseded.
    pub fn reset(&self) {
        let mut inner = self.lock();
        self.generation.fetch_add(1, Ordering::SeqCst);

        inner.state = SessionState::Idle;
        inner.input.clear();
        inner.detected = None;
        inner.current = None;
        inner.error = None;
    }
}
