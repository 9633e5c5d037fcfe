//! A calculator session: engine state, history and at most one delayed
//! natural-language translation in flight.
//!
//! Translations run on a tokio task that sleeps for the configured delay and
//! then reports back over a channel. Each request gets a ticket; a completion
//! whose ticket no longer matches the in-flight request is stale and ignored.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine::{self, Action, Calculation, EngineState, Outcome};
use crate::error::CalcError;
use crate::history::History;
use crate::translate::translate;

/// Message sent by a translation task once its delay has elapsed.
#[derive(Debug)]
pub struct TranslationDone {
    pub ticket: u64,
    pub phrase: String,
    pub outcome: Result<String, CalcError>,
}

struct InFlight {
    ticket: u64,
    handle: JoinHandle<()>,
}

pub struct Session {
    state: EngineState,
    history: History,
    delay: Duration,
    in_flight: Option<InFlight>,
    next_ticket: u64,
    completions: mpsc::UnboundedSender<TranslationDone>,
}

impl Session {
    /// Creates a session and the receiver its translations report to.
    pub fn new(config: &Config) -> (Self, mpsc::UnboundedReceiver<TranslationDone>) {
        let (completions, receiver) = mpsc::unbounded_channel();
        let session = Session {
            state: EngineState::new(),
            history: History::new(config.history_limit),
            delay: config.translation_delay(),
            in_flight: None,
            next_ticket: 0,
            completions,
        };
        (session, receiver)
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }

    pub fn is_translating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Applies a keypad action. All-clear also abandons a pending translation.
    pub fn dispatch(&mut self, action: Action) -> Result<Outcome, CalcError> {
        if action == Action::ClearAll {
            self.cancel_translation();
        }

        let outcome = engine::dispatch(&mut self.state, action);
        if let Ok(Outcome::Finalized(calculation)) = &outcome {
            self.history
                .record(&calculation.expression, &calculation.result);
        }
        outcome
    }

    /// Schedules `phrase` for translation after the configured delay,
    /// superseding any earlier request. Must be called inside a tokio runtime.
    pub fn request_translation(&mut self, phrase: &str) -> Result<u64, CalcError> {
        if phrase.trim().is_empty() {
            return Err(CalcError::EmptyPhrase);
        }
        self.cancel_translation();

        self.next_ticket += 1;
        let ticket = self.next_ticket;
        let phrase = phrase.to_string();
        let delay = self.delay;
        let completions = self.completions.clone();

        debug!(ticket, %phrase, ?delay, "translation scheduled");
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let outcome = translate(&phrase);
            // The session may already be gone; nobody is left to tell.
            let _ = completions.send(TranslationDone {
                ticket,
                phrase,
                outcome,
            });
        });

        self.in_flight = Some(InFlight { ticket, handle });
        Ok(ticket)
    }

    /// Aborts the in-flight translation, if any. Returns whether one existed.
    pub fn cancel_translation(&mut self) -> bool {
        match self.in_flight.take() {
            Some(in_flight) => {
                in_flight.handle.abort();
                debug!(ticket = in_flight.ticket, "translation cancelled");
                true
            }
            None => false,
        }
    }

    /// Applies a finished translation.
    ///
    /// Returns `None` for stale completions. On success the result is shown as
    /// if `=` had been pressed and recorded in history; on failure the engine
    /// state is left untouched.
    pub fn complete(&mut self, done: TranslationDone) -> Option<Result<Calculation, CalcError>> {
        match &self.in_flight {
            Some(in_flight) if in_flight.ticket == done.ticket => {}
            _ => {
                debug!(ticket = done.ticket, "discarding stale translation");
                return None;
            }
        }
        self.in_flight = None;

        match done.outcome {
            Ok(result) => {
                self.state.load_result(&result);
                self.history.record(&done.phrase, &result);
                info!(phrase = %done.phrase, %result, "translation applied");
                Some(Ok(Calculation {
                    expression: done.phrase,
                    result,
                }))
            }
            Err(err) => {
                warn!(phrase = %done.phrase, %err, "translation failed");
                Some(Err(err))
            }
        }
    }
}
