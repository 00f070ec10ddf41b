// Turning encoded snapshots back into pixels, off the input path.
//
// Each request gets a token from a monotonically increasing counter. Decoding
// happens on a worker thread; only the completion for the newest token is
// handed back, anything older is dropped on arrival.

use easel_store::{CodecError, DecodedImage, Snapshot};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RepaintToken(u64);

impl RepaintToken {
    pub fn value(self) -> u64 {
        self.0
    }
}

/// Why a repaint was requested; decides what happens once it lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepaintReason {
    /// Saved canvas loaded at startup.
    Restore,
    /// Saved canvas reloaded after the bitmap was resized.
    Resize,
    Undo,
    Redo,
}

struct RepaintJob {
    token: RepaintToken,
    reason: RepaintReason,
    snapshot: Snapshot,
}

#[derive(Debug)]
pub struct RepaintCompletion {
    pub token: RepaintToken,
    pub reason: RepaintReason,
    pub result: Result<DecodedImage, CodecError>,
}

pub struct RepaintPipeline {
    next_token: u64,
    /// Newest request that has not been handed back yet.
    latest: Option<RepaintToken>,
    jobs: Option<Sender<RepaintJob>>,
    done_tx: Sender<RepaintCompletion>,
    done_rx: Receiver<RepaintCompletion>,
    worker: Option<JoinHandle<()>>,
}

impl RepaintPipeline {
    pub fn new() -> Self {
        let (done_tx, done_rx) = mpsc::channel();
        let (jobs_tx, jobs_rx) = mpsc::channel::<RepaintJob>();
        let worker_done = done_tx.clone();

        let spawned = thread::Builder::new()
            .name("easel-decode".into())
            .spawn(move || {
                for job in jobs_rx {
                    trace!(token = job.token.0, "decoding snapshot");
                    let completion = RepaintCompletion {
                        token: job.token,
                        reason: job.reason,
                        result: job.snapshot.decode(),
                    };
                    if worker_done.send(completion).is_err() {
                        break;
                    }
                }
            });

        let (jobs, worker) = match spawned {
            Ok(handle) => (Some(jobs_tx), Some(handle)),
            Err(e) => {
                warn!(error = %e, "could not start decode thread, decoding inline");
                (None, None)
            }
        };

        Self {
            next_token: 1,
            latest: None,
            jobs,
            done_tx,
            done_rx,
            worker,
        }
    }

    /// Queue `snapshot` for decoding. Any earlier request still in flight
    /// becomes stale.
    pub fn request(&mut self, snapshot: Snapshot, reason: RepaintReason) -> RepaintToken {
        let token = RepaintToken(self.next_token);
        self.next_token += 1;

        if let Some(stale) = self.latest.replace(token) {
            debug!(stale = stale.0, token = token.0, "superseding pending repaint");
        }

        let job = RepaintJob {
            token,
            reason,
            snapshot,
        };

        let job = if let Some(jobs) = &self.jobs {
            match jobs.send(job) {
                Ok(()) => return token,
                Err(mpsc::SendError(job)) => job,
            }
        } else {
            job
        };

        if self.jobs.take().is_some() {
            warn!("decode thread is gone, decoding inline");
        }
        self.decode_inline(job);
        token
    }

    fn decode_inline(&self, job: RepaintJob) {
        let completion = RepaintCompletion {
            token: job.token,
            reason: job.reason,
            result: job.snapshot.decode(),
        };
        // We hold the receiver, so this cannot fail.
        let _ = self.done_tx.send(completion);
    }

    /// Non-blocking: the newest completion if it has arrived.
    pub fn poll(&mut self) -> Option<RepaintCompletion> {
        loop {
            match self.done_rx.try_recv() {
                Ok(completion) => {
                    if let Some(done) = self.accept(completion) {
                        return Some(done);
                    }
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return None,
            }
        }
    }

    /// Block until the newest request completes. None if nothing is pending.
    pub fn wait(&mut self) -> Option<RepaintCompletion> {
        while self.latest.is_some() {
            match self.done_rx.recv() {
                Ok(completion) => {
                    if let Some(done) = self.accept(completion) {
                        return Some(done);
                    }
                }
                Err(_) => return None,
            }
        }
        None
    }

    fn accept(&mut self, completion: RepaintCompletion) -> Option<RepaintCompletion> {
        if Some(completion.token) == self.latest {
            self.latest = None;
            Some(completion)
        } else {
            debug!(token = completion.token.0, "discarding stale repaint");
            None
        }
    }

    pub fn is_pending(&self) -> bool {
        self.latest.is_some()
    }

    pub fn pending_token(&self) -> Option<RepaintToken> {
        self.latest
    }
}

impl Drop for RepaintPipeline {
    fn drop(&mut self) {
        // Closing the job channel ends the worker loop.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

impl std::fmt::Debug for RepaintPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepaintPipeline")
            .field("next_token", &self.next_token)
            .field("latest", &self.latest)
            .field("threaded", &self.worker.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(value: u8) -> Snapshot {
        Snapshot::encode(2, 2, &[value; 16]).unwrap()
    }

    #[test]
    fn tokens_increase() {
        let mut pipeline = RepaintPipeline::new();
        let a = pipeline.request(solid(1), RepaintReason::Undo);
        let b = pipeline.request(solid(2), RepaintReason::Redo);
        assert!(b > a);
        assert_eq!(pipeline.pending_token(), Some(b));
    }

    #[test]
    fn only_newest_completion_is_delivered() {
        let mut pipeline = RepaintPipeline::new();
        pipeline.request(solid(10), RepaintReason::Undo);
        pipeline.request(solid(20), RepaintReason::Undo);
        let newest = pipeline.request(solid(30), RepaintReason::Redo);

        let done = pipeline.wait().unwrap();
        assert_eq!(done.token, newest);
        assert_eq!(done.reason, RepaintReason::Redo);
        assert_eq!(done.result.unwrap().rgba, vec![30; 16]);

        assert!(!pipeline.is_pending());
        assert!(pipeline.wait().is_none());
        assert!(pipeline.poll().is_none());
    }

    #[test]
    fn wait_without_request_returns_none() {
        let mut pipeline = RepaintPipeline::new();
        assert!(pipeline.wait().is_none());
    }
}
