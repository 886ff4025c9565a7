//! A scripted, recording stand-in for the upstream services.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use open_data::{FetchError, HttpFetcher, UpstreamRequest};

type Scripted = Result<Bytes, FetchError>;

/// [`HttpFetcher`] that answers from scripted responses and records every call.
///
/// Responses are matched by URL prefix, first registration wins. Each route
/// replays its queue in order and then keeps repeating the last entry. A
/// request with no matching route fails with [`FetchError::Transport`].
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<Vec<(String, VecDeque<Scripted>)>>,
    calls: Mutex<Vec<UpstreamRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests under `url_prefix` with a 2xx `body`.
    pub fn respond(self, url_prefix: &str, body: impl Into<Bytes>) -> Self {
        self.push(url_prefix, Ok(body.into()));
        self
    }

    /// Answer requests under `url_prefix` with `error`.
    pub fn fail(self, url_prefix: &str, error: FetchError) -> Self {
        self.push(url_prefix, Err(error));
        self
    }

    fn push(&self, url_prefix: &str, response: Scripted) {
        let mut routes = self.routes.lock().unwrap();
        match routes.iter_mut().find(|(prefix, _)| prefix == url_prefix) {
            Some((_, queue)) => queue.push_back(response),
            None => routes.push((url_prefix.to_string(), VecDeque::from([response]))),
        }
    }

    /// Every request seen so far, in order.
    pub fn calls(&self) -> Vec<UpstreamRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests whose URL starts with `url_prefix`.
    pub fn call_count(&self, url_prefix: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.url.starts_with(url_prefix))
            .count()
    }
}

#[async_trait]
impl HttpFetcher for MockFetcher {
    async fn fetch(&self, request: &UpstreamRequest) -> Result<Bytes, FetchError> {
        self.calls.lock().unwrap().push(request.clone());

        let mut routes = self.routes.lock().unwrap();
        let Some((_, queue)) = routes
            .iter_mut()
            .find(|(prefix, _)| request.url.starts_with(prefix.as_str()))
        else {
            return Err(FetchError::Transport(format!(
                "no scripted response for {}",
                request.url
            )));
        };

        if queue.len() > 1 {
            queue
                .pop_front()
                .unwrap_or_else(|| Err(FetchError::Transport("empty script".to_string())))
        } else {
            queue
                .front()
                .cloned()
                .unwrap_or_else(|| Err(FetchError::Transport("empty script".to_string())))
        }
    }
}
