//! Background feed fetching.
//!
//! Requests run on a [`tokio`] blocking pool and report back to the UI thread
//! over an [`mpsc`] channel, tagged with the [`RequestToken`] they were
//! issued under.
//!
//! ## Superseded requests
//!
//! Every query or page change issues a new token.  Submitting a new request
//! aborts the previous task if it has not started yet; if it already has, its
//! result still arrives, and the app drops it because its token is no longer
//! the latest one (see [`RequestTokens::is_current`]).  A slow early request
//! can therefore never overwrite the result of a later one.

use std::sync::mpsc;
use std::sync::Arc;

use tokio::runtime::{self, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::error::FetchError;
use crate::source::{FeedClient, FeedPage, FeedQuery};

/// Identifies one issued request.  Later requests have larger tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// Monotonic token source that remembers the latest issued token.
#[derive(Debug, Default)]
pub struct RequestTokens {
    latest: u64,
}

impl RequestTokens {
    pub fn issue(&mut self) -> RequestToken {
        self.latest += 1;
        RequestToken(self.latest)
    }

    /// Only the most recently issued token is current.
    pub fn is_current(&self, token: RequestToken) -> bool {
        token.0 == self.latest
    }
}

/// A request handed to the worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    pub query: FeedQuery,
}

/// A finished request, sent back to the UI thread.
#[derive(Debug)]
pub struct FetchMsg {
    pub token: RequestToken,
    pub result: Result<FeedPage, FetchError>,
}

/// Owns the runtime and the in-flight request.
pub struct FetchWorker {
    runtime: Option<Runtime>,
    client: Arc<dyn FeedClient>,
    tx: mpsc::Sender<FetchMsg>,
    in_flight: Option<JoinHandle<()>>,
}

impl FetchWorker {
    /// Start a worker for `client`.
    ///
    /// Returns the worker and the receiver the main loop should drain on
    /// every tick.
    pub fn spawn(client: Arc<dyn FeedClient>) -> std::io::Result<(Self, mpsc::Receiver<FetchMsg>)> {
        let runtime = runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .thread_name("infosphere-fetch")
            .enable_all()
            .build()?;
        let (tx, rx) = mpsc::channel();
        let worker = Self {
            runtime: Some(runtime),
            client,
            tx,
            in_flight: None,
        };
        Ok((worker, rx))
    }

    /// Run `request`, superseding whatever was in flight.
    pub fn submit(&mut self, request: FetchRequest) {
        let Some(runtime) = self.runtime.as_ref() else {
            return;
        };
        if let Some(previous) = self.in_flight.take() {
            if !previous.is_finished() {
                debug!("aborting superseded fetch");
                previous.abort();
            }
        }

        info!(token = request.token.0, query = ?request.query, "fetch issued");
        let client = Arc::clone(&self.client);
        let tx = self.tx.clone();
        let FetchRequest { token, query } = request;

        self.in_flight = Some(runtime.spawn(async move {
            let result = tokio::task::spawn_blocking(move || client.fetch(&query))
                .await
                .unwrap_or_else(|e| Err(FetchError::Worker(e.to_string())));
            // If the receiver is gone the main thread has exited.
            let _ = tx.send(FetchMsg { token, result });
        }));
    }
}

impl Drop for FetchWorker {
    fn drop(&mut self) {
        // Don't block exit on a request that is still waiting on the network.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::QuerySpec;
    use crate::source::{FeedItem, PageRequest};
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers with one item whose id is the requested page number.
    struct PageEcho {
        delays: Mutex<Vec<Duration>>,
    }

    impl FeedClient for PageEcho {
        fn name(&self) -> &str {
            "echo"
        }

        fn fetch_page(&self, request: &PageRequest) -> Result<FeedPage, FetchError> {
            let delay = self.delays.lock().unwrap().pop().unwrap_or_default();
            std::thread::sleep(delay);
            Ok(FeedPage {
                items: vec![FeedItem {
                    id: request.page.to_string(),
                    ..Default::default()
                }],
                count: Some(1),
            })
        }

        fn fetch_all(&self) -> Result<FeedPage, FetchError> {
            Err(FetchError::Status(503))
        }
    }

    fn page(n: usize) -> FeedQuery {
        FeedQuery::Page(PageRequest {
            page: n,
            page_size: 10,
            spec: QuerySpec::default(),
        })
    }

    #[test]
    fn tokens_increase_and_only_latest_is_current() {
        let mut tokens = RequestTokens::default();
        let a = tokens.issue();
        let b = tokens.issue();
        assert!(b > a);
        assert!(!tokens.is_current(a));
        assert!(tokens.is_current(b));
    }

    #[test]
    fn delivers_results_tagged_with_their_token() {
        let client = Arc::new(PageEcho { delays: Mutex::new(Vec::new()) });
        let (mut worker, rx) = FetchWorker::spawn(client).unwrap();
        let mut tokens = RequestTokens::default();

        let token = tokens.issue();
        worker.submit(FetchRequest { token, query: page(3) });

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(msg.token, token);
        assert_eq!(msg.result.unwrap().items[0].id, "3");
    }

    #[test]
    fn slow_stale_result_is_recognisable_as_stale() {
        // Popped in reverse: first request sleeps, second returns at once.
        let client = Arc::new(PageEcho {
            delays: Mutex::new(vec![Duration::ZERO, Duration::from_millis(300)]),
        });
        let (mut worker, rx) = FetchWorker::spawn(client).unwrap();
        let mut tokens = RequestTokens::default();

        let first = tokens.issue();
        worker.submit(FetchRequest { token: first, query: page(1) });
        std::thread::sleep(Duration::from_millis(50));
        let second = tokens.issue();
        worker.submit(FetchRequest { token: second, query: page(2) });

        let mut current = Vec::new();
        while let Ok(msg) = rx.recv_timeout(Duration::from_secs(2)) {
            if tokens.is_current(msg.token) {
                current.push(msg.result.unwrap().items[0].id.clone());
            }
        }
        assert_eq!(current, ["2"]);
    }

    #[test]
    fn errors_are_delivered_too() {
        let client = Arc::new(PageEcho { delays: Mutex::new(Vec::new()) });
        let (mut worker, rx) = FetchWorker::spawn(client).unwrap();
        let token = RequestTokens::default().issue();
        worker.submit(FetchRequest { token, query: FeedQuery::Everything });

        let msg = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(matches!(msg.result, Err(FetchError::Status(503))));
    }
}
