//! Shared helpers for integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use zgs_node_client::{Client, Provider, Result};

/// A call as seen by the provider
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Vec<Value>,
}

type Responder = Box<dyn Fn(&str, &[Value]) -> Result<Value> + Send + Sync>;

/// Provider that records every call and answers from a closure
pub struct RecordingProvider {
    responder: Responder,
    delays: HashMap<String, Duration>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl RecordingProvider {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            delays: HashMap::new(),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Answer every call with `value`
    pub fn returning(value: Value) -> Self {
        Self::new(move |_, _| Ok(value.clone()))
    }

    /// Hold calls to `method` for `delay` before answering
    pub fn with_delay(mut self, method: &str, delay: Duration) -> Self {
        self.delays.insert(method.to_string(), delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RecordedCall {
        self.calls().pop().expect("no call recorded")
    }
}

#[async_trait]
impl Provider for RecordingProvider {
    async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        self.calls.lock().unwrap().push(RecordedCall {
            method: method.to_string(),
            params: params.clone(),
        });
        if let Some(delay) = self.delays.get(method) {
            tokio::time::sleep(*delay).await;
        }
        (self.responder)(method, &params)
    }
}

pub const ROOT: &str = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
pub const STREAM: &str = "0x000000000000000000000000000000000000000000000000000000000000f2bd";
pub const ACCOUNT: &str = "0x0460aa47b41a66694c0a73f667a1b795a5ed3556";

pub fn client_with(provider: &Arc<RecordingProvider>) -> Client {
    Client::with_provider("http://mock-node:5678", provider.clone())
}
