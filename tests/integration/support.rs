// Scripted transport: replays queued responses and records every request

use async_trait::async_trait;
use oanda_client::config::{ClientConfig, Credentials, Environment};
use oanda_client::oanda::{HttpRequest, HttpResponse, HttpTransport, TransportError};
use oanda_client::OandaClient;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const ACCOUNT_ID: &str = "101-004-1234567-001";
pub const API_KEY: &str = "test-token-0123456789";
pub const BASE_URL: &str = "http://oanda.test";

#[derive(Default)]
pub struct ScriptedTransport {
    responses: Mutex<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, status: u16, body: &str) {
        let response = HttpResponse {
            status: StatusCode::from_u16(status).expect("valid status"),
            headers: HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        };
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn fail(&self, error: TransportError) {
        self.responses.lock().unwrap().push_back(Err(error));
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests().pop().expect("no request was sent")
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}

pub fn client(transport: &Arc<ScriptedTransport>) -> OandaClient {
    let config = ClientConfig::new(Environment::Practice, Credentials::new(ACCOUNT_ID, API_KEY))
        .with_base_url(BASE_URL);
    OandaClient::with_transport(config, transport.clone())
}

pub fn header<'a>(request: &'a HttpRequest, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

pub fn body_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::from_slice(request.body.as_deref().expect("request has a body"))
        .expect("request body is JSON")
}
