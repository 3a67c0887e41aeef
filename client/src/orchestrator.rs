//! Single in-flight prediction request: build, dispatch, interpret.
//!
//! The orchestrator never awaits anything itself. [`PredictionOrchestrator::begin`]
//! hands out a [`Dispatch`] that the host sends however it schedules work, and
//! the resulting [`Completion`] is fed back through
//! [`PredictionOrchestrator::complete`]. Completions from a cancelled or
//! superseded dispatch are ignored.

use crate::error::PredictError;
use crate::fallback::FallbackPolicy;
use crate::results::ResultSet;
use crate::transport::{HttpReply, PredictRequest, PredictionTransport, TransportError};
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use shared::{ErrorBody, PredictionResponse};

pub const GENERIC_PROCESSING_ERROR: &str = "Error processing image";
pub const GENERIC_UNKNOWN_ERROR: &str = "Unknown error occurred";
pub const INVALID_RESPONSE_ERROR: &str = "Invalid response from server";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Dispatching,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Succeeded,
    Failed,
    /// The transport failed and the fallback policy supplied results.
    Synthesized,
}

/// Service metadata reported alongside a successful result set.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionMeta {
    pub processing_time: f64,
    pub model_version: String,
    pub config: String,
    pub image_size: Option<u32>,
    pub device: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
}

/// A request that has been admitted and is ready to be sent.
#[derive(Debug)]
pub struct Dispatch {
    pub request: PredictRequest,
    pub ticket: Ticket,
    registration: AbortRegistration,
}

impl Dispatch {
    /// Sends the request. Yields `None` if the dispatch was cancelled first.
    pub async fn send<T: PredictionTransport>(self, transport: &T) -> Option<Completion> {
        let Dispatch {
            request,
            ticket,
            registration,
        } = self;
        match Abortable::new(transport.send(request), registration).await {
            Ok(reply) => Some(Completion { ticket, reply }),
            Err(_aborted) => {
                log::debug!("Prediction request {} aborted", ticket.generation);
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub ticket: Ticket,
    pub reply: Result<HttpReply, TransportError>,
}

/// Turns an HTTP reply into results or a server error.
pub fn interpret(reply: &HttpReply) -> Result<(ResultSet, PredictionMeta), PredictError> {
    if !reply.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&reply.body)
            .ok()
            .and_then(ErrorBody::message)
            .unwrap_or_else(|| GENERIC_PROCESSING_ERROR.to_string());
        return Err(PredictError::Server(message));
    }

    let response: PredictionResponse = serde_json::from_str(&reply.body).map_err(|e| {
        log::error!("Failed to parse prediction response: {}", e);
        PredictError::Server(INVALID_RESPONSE_ERROR.to_string())
    })?;

    if !response.success {
        let message = response
            .error
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| GENERIC_UNKNOWN_ERROR.to_string());
        return Err(PredictError::Server(message));
    }

    let results = ResultSet::from_wire(&response.results)?;
    let meta = PredictionMeta {
        processing_time: response.processing_time,
        model_version: response.model_version,
        config: response.config,
        image_size: response.image_size,
        device: response.device,
    };
    Ok((results, meta))
}

pub struct PredictionOrchestrator {
    phase: Phase,
    generation: u64,
    abort: Option<AbortHandle>,
    results: Option<ResultSet>,
    meta: Option<PredictionMeta>,
    error: Option<String>,
    synthetic: bool,
    fallback: Box<dyn FallbackPolicy>,
}

impl PredictionOrchestrator {
    pub fn new(fallback: Box<dyn FallbackPolicy>) -> Self {
        log::debug!("Prediction fallback policy: {}", fallback.name());
        Self {
            phase: Phase::Idle,
            generation: 0,
            abort: None,
            results: None,
            meta: None,
            error: None,
            synthetic: false,
            fallback,
        }
    }

    /// Admits `request` unless one is already in flight.
    pub fn begin(&mut self, request: PredictRequest) -> Option<Dispatch> {
        if self.phase == Phase::Dispatching {
            log::debug!("Prediction already in flight; ignoring request");
            return None;
        }

        self.generation += 1;
        let (handle, registration) = AbortHandle::new_pair();
        self.abort = Some(handle);
        self.phase = Phase::Dispatching;
        self.error = None;

        log::info!(
            "Dispatching prediction for {} with model {} ({})",
            request.file_name,
            request.model,
            request.config
        );
        Some(Dispatch {
            request,
            ticket: Ticket {
                generation: self.generation,
            },
            registration,
        })
    }

    /// Applies a completion. Returns `None` when it belongs to a stale dispatch.
    pub fn complete(&mut self, completion: Completion) -> Option<Outcome> {
        if self.phase != Phase::Dispatching || completion.ticket.generation != self.generation {
            log::debug!("Ignoring stale prediction completion {}", completion.ticket.generation);
            return None;
        }
        self.phase = Phase::Idle;
        self.abort = None;

        let outcome = match completion.reply {
            Ok(reply) => match interpret(&reply) {
                Ok((results, meta)) => {
                    self.succeed(results, Some(meta), None);
                    Outcome::Succeeded
                }
                Err(e) => {
                    log::error!("Prediction failed: {}", e);
                    self.fail(e);
                    Outcome::Failed
                }
            },
            Err(transport) => {
                log::error!("Prediction request failed: {}", transport);
                match self.fallback.on_unavailable(&transport) {
                    Some(results) => {
                        self.succeed(results, None, Some(transport.to_string()));
                        self.synthetic = true;
                        Outcome::Synthesized
                    }
                    None => {
                        self.fail(PredictError::Transport(transport.to_string()));
                        Outcome::Failed
                    }
                }
            }
        };
        Some(outcome)
    }

    fn succeed(&mut self, results: ResultSet, meta: Option<PredictionMeta>, error: Option<String>) {
        self.results = Some(results);
        self.meta = meta;
        self.error = error;
        self.synthetic = false;
    }

    fn fail(&mut self, error: PredictError) {
        self.results = None;
        self.meta = None;
        self.error = Some(error.to_string());
        self.synthetic = false;
    }

    /// Aborts an in-flight request. Its completion, if it still arrives, is ignored.
    pub fn cancel(&mut self) -> bool {
        if self.phase != Phase::Dispatching {
            return false;
        }
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
        self.generation += 1;
        self.phase = Phase::Idle;
        log::debug!("Prediction cancelled");
        true
    }

    /// Cancels any request and forgets results and errors.
    pub fn clear(&mut self) {
        self.cancel();
        self.results = None;
        self.meta = None;
        self.error = None;
        self.synthetic = false;
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Dispatching
    }

    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    pub fn meta(&self) -> Option<&PredictionMeta> {
        self.meta.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True when the current results came from the fallback policy.
    pub fn is_synthetic(&self) -> bool {
        self.synthetic
    }
}

impl Drop for PredictionOrchestrator {
    fn drop(&mut self) {
        if let Some(handle) = self.abort.take() {
            handle.abort();
        }
    }
}
