//! Scripted transport for unit tests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::http::transport::{Transport, TransportError, TransportRequest, TransportResponse};

#[derive(Debug, Clone)]
pub(crate) struct MockReply {
    pub status: u16,
    pub body: String,
    pub headers: HashMap<String, String>,
    pub delay: Duration,
}

impl MockReply {
    pub fn ok(body: Value) -> Self {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: Value) -> Self {
        Self {
            status,
            body: if body.is_null() { String::new() } else { body.to_string() },
            headers: HashMap::new(),
            delay: Duration::ZERO,
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

type Responder =
    Box<dyn Fn(&TransportRequest, usize) -> Result<MockReply, TransportError> + Send + Sync>;

/// Records every request and answers from a closure given the call index.
pub(crate) struct MockTransport {
    calls: Mutex<Vec<TransportRequest>>,
    responder: Responder,
}

impl MockTransport {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&TransportRequest, usize) -> Result<MockReply, TransportError> + Send + Sync + 'static,
    {
        Self {
            calls: Mutex::new(Vec::new()),
            responder: Box::new(responder),
        }
    }

    pub fn always(reply: MockReply) -> Self {
        Self::new(move |_, _| Ok(reply.clone()))
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl Transport for MockTransport {
    fn send(&self, request: TransportRequest) -> BoxFuture<'_, Result<TransportResponse, TransportError>> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(request.clone());
            calls.len() - 1
        };
        let reply = (self.responder)(&request, index);

        Box::pin(async move {
            let reply = reply?;
            if !reply.delay.is_zero() {
                tokio::time::sleep(reply.delay).await;
            }
            Ok(TransportResponse {
                status: reply.status,
                status_text: String::new(),
                headers: reply.headers,
                body: reply.body,
            })
        })
    }
}
