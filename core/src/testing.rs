//! In-memory transport for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::io::{Cursor, Read};
use std::rc::Rc;

use http::StatusCode;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::Transport;

/// Replays queued outcomes in order and records every request it sees.
/// Once the queue is empty every call fails with a connection error.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    outcomes: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: &str) -> Self {
        let status = StatusCode::from_u16(status).unwrap();
        self.push(Ok(HttpResponse::from_bytes(status, body)))
    }

    /// Queue a response whose body reports how it was consumed.
    pub(crate) fn respond_tracked(self, status: u16, body: &str) -> (Self, BodyProbe) {
        let probe = BodyProbe::default();
        let response = HttpResponse {
            status: StatusCode::from_u16(status).unwrap(),
            headers: http::HeaderMap::new(),
            body: Box::new(ProbedBody {
                inner: Cursor::new(body.as_bytes().to_vec()),
                probe: probe.clone(),
            }),
        };
        (self.push(Ok(response)), probe)
    }

    pub(crate) fn fail(self, err: TransportError) -> Self {
        self.push(Err(err))
    }

    pub(crate) fn fail_times(mut self, times: usize) -> Self {
        for _ in 0..times {
            self = self.fail(TransportError::Connection("connection refused".into()));
        }
        self
    }

    fn push(self, outcome: Result<HttpResponse, TransportError>) -> Self {
        self.outcomes.borrow_mut().push_back(outcome);
        self
    }

    pub(crate) fn attempts(&self) -> usize {
        self.requests.borrow().len()
    }

    pub(crate) fn last_request(&self) -> HttpRequest {
        self.requests
            .borrow()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.borrow_mut().push(request);
        self.outcomes
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(TransportError::Connection("no scripted outcome left".into())))
    }
}

/// Shared view of how a response body was consumed.
#[derive(Clone, Default)]
pub(crate) struct BodyProbe {
    bytes_read: Rc<Cell<usize>>,
    dropped: Rc<Cell<bool>>,
}

impl BodyProbe {
    pub(crate) fn bytes_read(&self) -> usize {
        self.bytes_read.get()
    }

    pub(crate) fn dropped(&self) -> bool {
        self.dropped.get()
    }
}

struct ProbedBody {
    inner: Cursor<Vec<u8>>,
    probe: BodyProbe,
}

impl Read for ProbedBody {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.probe.bytes_read.set(self.probe.bytes_read.get() + n);
        Ok(n)
    }
}

impl Drop for ProbedBody {
    fn drop(&mut self) {
        self.probe.dropped.set(true);
    }
}
