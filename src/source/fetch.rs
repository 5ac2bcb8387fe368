use super::CandidateSource;
use crate::core::{Candidate, ZoneId};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use tracing::{info, warn};

/// The one-shot startup load. The source runs on its own thread and the event
/// loop picks the result up with [`CandidateFetch::poll`]. Dropping the handle
/// first discards the result.
pub struct CandidateFetch {
    rx: Option<Receiver<Vec<Candidate>>>,
}

impl CandidateFetch {
    pub fn spawn(source: Box<dyn CandidateSource>, zone: ZoneId) -> Self {
        let (tx, rx) = mpsc::channel::<Vec<Candidate>>();
        std::thread::spawn(move || {
            let candidates = resolve(source.as_ref(), &zone);
            let _ = tx.send(candidates);
        });
        Self { rx: Some(rx) }
    }

    pub fn is_pending(&self) -> bool {
        self.rx.is_some()
    }

    /// Non-blocking. Yields the candidate set once; failures arrive as an
    /// empty set.
    pub fn poll(&mut self) -> Option<Vec<Candidate>> {
        let rx = self.rx.as_ref()?;
        match rx.try_recv() {
            Ok(candidates) => {
                self.rx = None;
                Some(candidates)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.rx = None;
                warn!("candidate fetch ended without a result");
                Some(Vec::new())
            }
        }
    }
}

fn resolve(source: &dyn CandidateSource, zone: &ZoneId) -> Vec<Candidate> {
    match source.fetch(zone) {
        Ok(candidates) => {
            info!(
                source = %source.describe(),
                %zone,
                count = candidates.len(),
                "candidates loaded"
            );
            candidates
        }
        Err(err) => {
            warn!(
                source = %source.describe(),
                %zone,
                error = %err,
                "candidate fetch failed, continuing without candidates"
            );
            Vec::new()
        }
    }
}
