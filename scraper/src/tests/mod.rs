use anyhow::Result;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::fetch::{RawResponse, RetryPolicy, Transport, TransportError};

pub mod fixtures;

/// Helper function to log and save failed HTML for future regression testing
pub fn save_failed_html(html: &str, test_name: &str) -> Result<()> {
    let failures_dir = Path::new("src/tests/fixtures/failures");
    fs::create_dir_all(failures_dir)?;

    let file_path = failures_dir.join(format!("{}.html", test_name));
    fs::write(&file_path, html)?;

    println!("Saved failed HTML to {}", file_path.display());
    Ok(())
}

/// Replays canned replies in order, then fails every further request.
pub struct FakeTransport {
    replies: RefCell<VecDeque<Result<RawResponse, String>>>,
    requested: RefCell<Vec<String>>,
    calls: Cell<u32>,
}

impl FakeTransport {
    pub fn new(replies: Vec<Result<RawResponse, String>>) -> Self {
        Self {
            replies: RefCell::new(replies.into()),
            requested: RefCell::new(Vec::new()),
            calls: Cell::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::new(Vec::new())
    }

    pub fn ok(body: &str) -> Result<RawResponse, String> {
        Self::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Result<RawResponse, String> {
        Ok(RawResponse {
            status,
            body: body.to_string(),
        })
    }

    pub fn calls(&self) -> u32 {
        self.calls.get()
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn get(
        &self,
        url: &str,
        _headers: &[(String, String)],
        _timeout: Duration,
    ) -> Result<RawResponse, TransportError> {
        self.calls.set(self.calls.get() + 1);
        self.requested.borrow_mut().push(url.to_string());
        match self.replies.borrow_mut().pop_front() {
            Some(reply) => reply.map_err(TransportError::Other),
            None => Err(TransportError::Other("connection refused".to_string())),
        }
    }
}

/// Retries without sleeping between attempts.
pub fn quick_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy {
        max_attempts,
        delay: Duration::ZERO,
        ..RetryPolicy::default()
    }
}
