//! Lookup session state and the submit workflow.
//!
//! Every submission takes a fresh sequence number. Only the outcome of the
//! latest submission is applied; responses to superseded submissions are
//! dropped when they settle, so a slow early response can never overwrite a
//! newer one.

use std::sync::Arc;

use crate::{client::RecordSource, error::LookupError, model::WeatherRecord};

/// Where the current lookup stands.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Pending,
    Resolved(Box<WeatherRecord>),
    Failed(String),
}

impl Phase {
    pub fn record(&self) -> Option<&WeatherRecord> {
        match self {
            Self::Resolved(record) => Some(&**record),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Handle for one in-flight retrieval, returned by [`LookupController::begin`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    seq: u64,
    id: String,
}

impl Ticket {
    /// The trimmed identifier to fetch.
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug)]
pub struct LookupController {
    source: Arc<dyn RecordSource>,
    query: String,
    phase: Phase,
    issued: u64,
    in_flight: Option<u64>,
}

impl LookupController {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source, query: String::new(), phase: Phase::Idle, issued: 0, in_flight: None }
    }

    /// Text as last entered, untrimmed.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    /// Shared handle to the source, for callers that fetch outside the controller.
    pub fn source(&self) -> Arc<dyn RecordSource> {
        Arc::clone(&self.source)
    }

    /// Start a submission of `raw`.
    ///
    /// Blank input fails immediately and returns `None`; no request may be
    /// issued for it. Otherwise the phase becomes `Pending` and the returned
    /// ticket names the single request to make. Either way any earlier
    /// in-flight submission is superseded.
    pub fn begin(&mut self, raw: &str) -> Option<Ticket> {
        self.query = raw.to_string();
        self.issued += 1;
        let seq = self.issued;

        let id = raw.trim();
        if id.is_empty() {
            self.in_flight = None;
            self.phase = Phase::Failed(LookupError::EmptyIdentifier.to_string());
            return None;
        }

        // drops any previous result or error
        self.in_flight = Some(seq);
        self.phase = Phase::Pending;
        tracing::debug!(seq, id, "lookup submitted");

        Some(Ticket { seq, id: id.to_string() })
    }

    /// Apply the outcome of `ticket`'s request.
    ///
    /// Returns `false` and leaves the state untouched when the ticket has been
    /// superseded or already settled.
    pub fn settle(&mut self, ticket: &Ticket, outcome: Result<WeatherRecord, LookupError>) -> bool {
        if self.in_flight != Some(ticket.seq) {
            tracing::debug!(
                seq = ticket.seq,
                latest = self.issued,
                id = ticket.id.as_str(),
                "discarding stale lookup response"
            );
            return false;
        }

        self.in_flight = None;
        self.phase = match outcome {
            Ok(record) => Phase::Resolved(Box::new(record)),
            Err(err) => Phase::Failed(err.to_string()),
        };
        true
    }

    /// Begin, fetch and settle in one step.
    pub async fn submit(&mut self, raw: &str) -> &Phase {
        if let Some(ticket) = self.begin(raw) {
            let outcome = self.source.fetch_record(ticket.id()).await;
            self.settle(&ticket, outcome);
        }
        &self.phase
    }
}
