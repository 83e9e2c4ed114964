//! Scripted `Fetcher` for unit tests

use crate::services::fetcher::Fetcher;
use crate::types::TransportError;
use serde_json::Value;
use std::cell::RefCell;
use std::collections::VecDeque;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch {
        path: String,
        query: Vec<(String, String)>,
    },
    Submit {
        path: String,
        body: Value,
    },
}

/// Replays queued responses in order; records every call it receives.
/// An exhausted queue answers `null`.
#[derive(Default)]
pub struct StubFetcher {
    responses: RefCell<VecDeque<Result<Value, TransportError>>>,
    calls: RefCell<Vec<Call>>,
}

impl StubFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, payload: Value) -> Self {
        self.responses.borrow_mut().push_back(Ok(payload));
        self
    }

    pub fn fail_with_status(self, status: u16) -> Self {
        self.responses
            .borrow_mut()
            .push_back(Err(TransportError::Status {
                url: "http://stub.invalid".into(),
                status,
                body: "stubbed failure".into(),
            }));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    fn next(&self) -> Result<Value, TransportError> {
        self.responses.borrow_mut().pop_front().unwrap_or(Ok(Value::Null))
    }
}

impl Fetcher for StubFetcher {
    fn fetch(&self, path: &str, query: &[(&str, String)]) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push(Call::Fetch {
            path: path.to_string(),
            query: query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        });
        self.next()
    }

    fn submit(&self, path: &str, body: &Value) -> Result<Value, TransportError> {
        self.calls.borrow_mut().push(Call::Submit {
            path: path.to_string(),
            body: body.clone(),
        });
        self.next()
    }
}
