use std::fmt;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use reqwest::StatusCode;
use reqwest::blocking::{Client, Request};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::form_urlencoded;

use crate::config::Config;
use crate::context::Context;
use crate::dates::format_date;
use crate::error::TogglError;
use crate::models::{Dashboard, DetailedReport, DetailedReportRequest, Workspace};

/// Sent as `user_agent` on report queries when the caller leaves it empty.
pub const DEFAULT_USER_AGENT: &str = "toggl-client";

const CANCEL_POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }

    fn to_reqwest(self) -> reqwest::Method {
        match self {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle for the Toggl REST API.
///
/// Holds only resolved, read-only settings. Clones share the underlying
/// connection pool and the handle can be used from several threads at once.
#[derive(Clone)]
pub struct TogglClient {
    client: Client,
    client_timeout: Option<Duration>,
    host: String,
    credentials: String,
    debug: bool,
}

impl fmt::Debug for TogglClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TogglClient")
            .field("host", &self.host)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl TogglClient {
    pub fn new(config: &Config) -> Result<Self, TogglError> {
        config.validate()?;
        let client = config.build_http_client()?;
        let client_timeout = config.http_client.is_none().then(|| config.effective_timeout());
        let credentials = STANDARD.encode(format!("{}:api_token", config.api_token));
        Ok(Self {
            client,
            client_timeout,
            host: config.host.trim().to_string(),
            credentials,
            debug: config.debug,
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn fetch_workspaces(&self, ctx: &Context) -> Result<Vec<Workspace>, TogglError> {
        self.get(ctx, "/api/v8/workspaces".to_string())
    }

    pub fn fetch_workspace(&self, ctx: &Context, workspace_id: u64) -> Result<Workspace, TogglError> {
        self.get(ctx, format!("/api/v8/workspaces/{workspace_id}"))
    }

    pub fn fetch_dashboard(&self, ctx: &Context, workspace_id: u64) -> Result<Dashboard, TogglError> {
        self.get(ctx, format!("/api/v8/dashboard/{workspace_id}"))
    }

    pub fn fetch_detailed_report(
        &self,
        ctx: &Context,
        request: &DetailedReportRequest,
    ) -> Result<DetailedReport, TogglError> {
        self.get(ctx, detailed_report_path(request))
    }

    fn get<T>(&self, ctx: &Context, path: String) -> Result<T, TogglError>
    where
        T: DeserializeOwned + fmt::Debug,
    {
        self.call::<(), T>(ctx, HttpMethod::Get, &path, None)
            .map_err(|err| TogglError::Call {
                method: HttpMethod::Get,
                url: format!("{}{}", self.host, path),
                source: Box::new(err),
            })
    }

    /// Performs one authenticated round trip and decodes the JSON response.
    ///
    /// `path` is appended to the configured host as is, so it must start with
    /// `/`. A `None` body is sent as the JSON literal `null`. Only status 200
    /// is treated as success.
    pub fn call<B, T>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, TogglError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned + fmt::Debug,
    {
        let payload = serde_json::to_vec(&body).map_err(TogglError::Serialize)?;
        if self.debug {
            debug!(%method, path, payload = %String::from_utf8_lossy(&payload), "request");
        }

        let request = self.build_request(ctx, method, path, payload)?;
        let (status, raw) = self.dispatch(ctx, request)?;
        if status != StatusCode::OK {
            return Err(TogglError::Remote {
                status: status.as_u16(),
                body: String::from_utf8_lossy(&raw).into_owned(),
            });
        }

        let response: T = serde_json::from_slice(&raw).map_err(TogglError::Decode)?;
        if self.debug {
            debug!(%method, path, ?response, "response");
        }
        Ok(response)
    }

    /// A context deadline caps the request timeout so the worker gives up with
    /// the caller. A shorter timeout on a client built from `Config` still
    /// applies.
    fn build_request(
        &self,
        ctx: &Context,
        method: HttpMethod,
        path: &str,
        payload: Vec<u8>,
    ) -> Result<Request, TogglError> {
        let endpoint = format!("{}{}", self.host, path);
        let mut builder = self
            .client
            .request(method.to_reqwest(), endpoint)
            .header(AUTHORIZATION, format!("Basic {}", self.credentials))
            .header(CONTENT_TYPE, "application/json")
            .body(payload);
        if let Some(remaining) = ctx.remaining() {
            let timeout = match self.client_timeout {
                Some(client_timeout) => remaining.min(client_timeout),
                None => remaining,
            };
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(TogglError::Request)
    }

    /// Runs the round trip on a worker thread so the caller can give up as soon
    /// as `ctx` is cancelled or expires. A late result is discarded.
    fn dispatch(&self, ctx: &Context, request: Request) -> Result<(StatusCode, Vec<u8>), TogglError> {
        ctx.check()?;

        let client = self.client.clone();
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let outcome = client.execute(request).and_then(|response| {
                let status = response.status();
                response.bytes().map(|body| (status, body.to_vec()))
            });
            let _ = sender.send(outcome);
        });

        loop {
            match receiver.recv_timeout(CANCEL_POLL_INTERVAL) {
                Ok(outcome) => {
                    return outcome.map_err(|err| {
                        if err.is_timeout() {
                            if let Err(ctx_err) = ctx.check() {
                                return ctx_err;
                            }
                        }
                        TogglError::Transport(err)
                    });
                }
                Err(RecvTimeoutError::Timeout) => ctx.check()?,
                Err(RecvTimeoutError::Disconnected) => {
                    return Err(TogglError::Network(
                        "request worker exited without a response".to_string(),
                    ));
                }
            }
        }
    }
}

fn detailed_report_path(request: &DetailedReportRequest) -> String {
    let user_agent = if request.user_agent.trim().is_empty() {
        DEFAULT_USER_AGENT
    } else {
        request.user_agent.as_str()
    };
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("workspace_id", &request.workspace_id.to_string())
        .append_pair("since", &format_date(request.since))
        .append_pair("until", &format_date(request.until))
        .append_pair("user_agent", user_agent)
        .finish();
    format!("/reports/api/v2/details/?{query}")
}
