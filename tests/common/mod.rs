//! Local stand-in for the Toggl API.
//!
//! Serves one canned response for every route on an ephemeral port and records
//! each request so tests can assert on what went over the wire.

#![allow(dead_code)]

use std::net::TcpListener;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use axum::Router;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};

#[derive(Debug, Clone)]
pub struct FixtureResponse {
    status: StatusCode,
    body: String,
    delay: Option<Duration>,
}

impl FixtureResponse {
    /// Serves the literal contents of `testdata/<name>`.
    pub fn json_file(status: u16, name: &str) -> Self {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("testdata")
            .join(name);
        let body = std::fs::read_to_string(&path)
            .unwrap_or_else(|err| panic!("reading {}: {err}", path.display()));
        Self::raw(status, &body)
    }

    pub fn raw(status: u16, body: &str) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            body: body.to_string(),
            delay: None,
        }
    }

    /// Holds the response back for `delay` after the request is recorded.
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<String> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let query = self.query.as_deref().unwrap_or_default();
        url::form_urlencoded::parse(query.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }
}

struct FixtureState {
    response: FixtureResponse,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct FixtureServer {
    pub url: String,
    state: Arc<FixtureState>,
}

impl FixtureServer {
    pub fn start(response: FixtureResponse) -> Self {
        let std_listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = std_listener.local_addr().unwrap();
        std_listener.set_nonblocking(true).unwrap();

        let state = Arc::new(FixtureState {
            response,
            requests: Mutex::new(Vec::new()),
        });
        let app = Router::new()
            .fallback(serve_fixture)
            .with_state(Arc::clone(&state));

        thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async {
                let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
                axum::serve(listener, app).await
            })
            .unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            state,
        }
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("fixture server received no requests")
    }
}

async fn serve_fixture(
    State(state): State<Arc<FixtureState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(header::HeaderName, &'static str); 1], String) {
    state.requests.lock().unwrap().push(RecordedRequest {
        method,
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        headers,
        body,
    });

    if let Some(delay) = state.response.delay {
        tokio::time::sleep(delay).await;
    }

    (
        state.response.status,
        [(header::CONTENT_TYPE, "application/json")],
        state.response.body.clone(),
    )
}
