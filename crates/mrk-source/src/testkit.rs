//! Scripted page source and sale completer for tests.
//!
//! Compiled only with the `testkit` feature (or in this crate's own unit
//! tests). MUST NOT be activated from a production [dependencies] table.

use std::collections::{BTreeMap, VecDeque};
use std::sync::Mutex;

use mrk_record::{CanonicalRecord, SourceNode};
use serde_json::Value;

use crate::{
    Acknowledgement, FetchError, Page, PageRequest, PagedSource, SaleCompleter,
};

/// What a [`ScriptedSource`] saw for one `fetch_page` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub page_number: u32,
    pub page_size: u32,
    pub filter: Option<String>,
    pub params: BTreeMap<String, String>,
}

/// Replays a fixed script of pages/errors, one entry per call, then reports
/// end of data. Every call is recorded.
#[derive(Debug)]
pub struct ScriptedSource {
    name: String,
    script: Mutex<VecDeque<Result<Page, FetchError>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            script: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Successful page of JSON items.
    pub fn page(self, items: Vec<Value>, has_more: bool) -> Self {
        let items = items.into_iter().map(SourceNode::from).collect();
        self.push(Ok(Page::success(items, has_more)))
    }

    /// Non-success acknowledgement.
    pub fn failure(self, messages: &[&str]) -> Self {
        let messages = messages.iter().map(|m| m.to_string()).collect();
        self.push(Ok(Page::failure(messages)))
    }

    /// Transport-level error.
    pub fn transport_error(self, msg: &str) -> Self {
        self.push(Err(FetchError::Transport(msg.to_string())))
    }

    /// Arbitrary scripted entry.
    pub fn push(self, entry: Result<Page, FetchError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(entry);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl PagedSource for ScriptedSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_page(&self, req: &PageRequest<'_>) -> Result<Page, FetchError> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedCall {
                page_number: req.page_number,
                page_size: req.page_size,
                filter: req.query.filter.clone(),
                params: req.query.params.clone(),
            });
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(Page::end()))
    }
}

/// Replays scripted acknowledgements and keeps every submitted request.
/// Once the script runs out every request is accepted.
#[derive(Debug)]
pub struct RecordingCompleter {
    script: Mutex<VecDeque<Result<Acknowledgement, FetchError>>>,
    requests: Mutex<Vec<CanonicalRecord>>,
}

impl RecordingCompleter {
    pub fn new() -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn reject(self, messages: &[&str]) -> Self {
        let messages = messages.iter().map(|m| m.to_string()).collect();
        self.push(Ok(Acknowledgement::failure(messages)))
    }

    pub fn transport_error(self, msg: &str) -> Self {
        self.push(Err(FetchError::Transport(msg.to_string())))
    }

    pub fn push(self, entry: Result<Acknowledgement, FetchError>) -> Self {
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(entry);
        self
    }

    pub fn requests(&self) -> Vec<CanonicalRecord> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl Default for RecordingCompleter {
    fn default() -> Self {
        Self::new()
    }
}

impl SaleCompleter for RecordingCompleter {
    fn name(&self) -> &str {
        "recording"
    }

    fn complete_sale(&self, request: &CanonicalRecord) -> Result<Acknowledgement, FetchError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request.clone());
        self.script
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Ok(Acknowledgement::success()))
    }
}
