use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};

use super::{
    BoxFuture, CcaiClient, Credentials, HttpRequest, HttpResponse, HttpTransport, SendError,
};

pub(crate) const CLIENT_ID: &str = "test-client-id";
pub(crate) const API_KEY: &str = "test-api-key";

/// Transport answering from a scripted queue and recording every request.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeTransport {
    state: Arc<Mutex<FakeTransportState>>,
}

#[derive(Debug, Default)]
struct FakeTransportState {
    requests: Vec<HttpRequest>,
    responses: VecDeque<Result<HttpResponse, SendError>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(&self, status: u16, body: impl Into<String>) {
        self.push(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
    }

    pub(crate) fn fail_without_response(&self, message: &str) {
        self.push(Err(SendError::NoResponse(Box::new(io::Error::other(
            message.to_owned(),
        )))));
    }

    pub(crate) fn fail_to_build(&self, message: &str) {
        self.push(Err(SendError::Build(Box::new(io::Error::other(
            message.to_owned(),
        )))));
    }

    pub(crate) fn requests(&self) -> Vec<HttpRequest> {
        self.state.lock().unwrap().requests.clone()
    }

    fn push(&self, response: Result<HttpResponse, SendError>) {
        self.state.lock().unwrap().responses.push_back(response);
    }
}

impl HttpTransport for FakeTransport {
    fn send<'a>(&'a self, request: HttpRequest) -> BoxFuture<'a, Result<HttpResponse, SendError>> {
        Box::pin(async move {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state.responses.pop_front().unwrap_or_else(|| {
                Err(SendError::NoResponse(Box::new(io::Error::other(
                    "no scripted response",
                ))))
            })
        })
    }
}

pub(crate) fn fake_client(transport: &FakeTransport) -> CcaiClient {
    CcaiClient::with_transport(
        Credentials::new(CLIENT_ID, API_KEY).unwrap(),
        Arc::new(transport.clone()),
    )
}

pub(crate) fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request
        .headers
        .get(name)
        .and_then(|value| value.to_str().ok())
}

pub(crate) fn json_body(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().unwrap_or(b"null")).unwrap()
}

pub(crate) fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(&str) + Send + Sync + 'static) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    (seen, move |status: &str| {
        sink.lock().unwrap().push(status.to_owned())
    })
}
