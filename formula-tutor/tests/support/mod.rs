//! Test doubles shared by the integration suites.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use formula_tutor::adapters::traits::{
    AdapterError, AdapterMetadata, AdapterResult, GenerationRequest, GenerationResponse,
    GeneratorFactory, TextGenerator,
};
use formula_tutor::config::{ConfigResult, CredentialSource, StaticCredentials};
use formula_tutor::kernel::{Composer, Controller};
use formula_tutor::primitives::{ApiCredential, GradeLevel};
use hyper::service::{make_service_fn, service_fn};
use hyper::{Body, Request, Response, Server, StatusCode};
use tokio::sync::Notify;

/// Scripted backend: replies are consumed in order, optionally held behind a gate.
#[derive(Default)]
pub struct Backend {
    replies: Mutex<VecDeque<AdapterResult<String>>>,
    gate: Notify,
    gated: AtomicBool,
    pub connects: AtomicUsize,
    pub prompts: Mutex<Vec<String>>,
}

impl Backend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn reply(&self, reply: AdapterResult<String>) -> &Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    /// Holds every subsequent call until [`Backend::release`].
    pub fn hold(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }
}

struct ScriptedGenerator {
    backend: Arc<Backend>,
    metadata: AdapterMetadata,
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn generate(&self, request: GenerationRequest) -> AdapterResult<GenerationResponse> {
        self.backend
            .prompts
            .lock()
            .unwrap()
            .push(request.prompt().to_owned());
        if self.backend.gated.load(Ordering::SeqCst) {
            self.backend.gate.notified().await;
        }
        let reply = self
            .backend
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(AdapterError::transport("no scripted reply")));
        reply.map(GenerationResponse::new)
    }
}

pub struct ScriptedFactory(pub Arc<Backend>);

impl GeneratorFactory for ScriptedFactory {
    fn connect(&self, _credential: &ApiCredential) -> AdapterResult<Arc<dyn TextGenerator>> {
        self.0.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::new(ScriptedGenerator {
            backend: Arc::clone(&self.0),
            metadata: AdapterMetadata::new("scripted", "test-model"),
        }))
    }
}

/// Counts how often the controller asks for a credential.
pub struct CountingCredentials {
    inner: Option<StaticCredentials>,
    pub resolves: AtomicUsize,
}

impl CountingCredentials {
    pub fn with_key(key: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: Some(StaticCredentials::from_key(key).unwrap()),
            resolves: AtomicUsize::new(0),
        })
    }

    pub fn missing() -> Arc<Self> {
        Arc::new(Self {
            inner: None,
            resolves: AtomicUsize::new(0),
        })
    }

    pub fn resolve_count(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

impl CredentialSource for CountingCredentials {
    fn resolve(&self) -> ConfigResult<ApiCredential> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        match &self.inner {
            Some(inner) => inner.resolve(),
            None => Err(formula_tutor::config::ConfigError::MissingCredential {
                vars: vec!["API_KEY"],
            }),
        }
    }
}

pub fn scripted_controller(
    backend: &Arc<Backend>,
    credentials: Arc<CountingCredentials>,
) -> Arc<Controller> {
    let composer = Composer::new(Arc::new(ScriptedFactory(Arc::clone(backend))), "test-model");
    Arc::new(Controller::new(composer, credentials, GradeLevel::default()))
}

/// A request captured by the stub Gemini server.
#[derive(Debug, Clone)]
pub struct Captured {
    pub path: String,
    pub api_key: Option<String>,
    pub body: serde_json::Value,
}

/// Canned answer served by [`serve_stub`].
#[derive(Clone, Copy)]
pub struct Canned {
    pub status: StatusCode,
    pub body: &'static str,
    pub retry_after: Option<&'static str>,
}

impl Canned {
    pub const fn ok(body: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            body,
            retry_after: None,
        }
    }

    pub const fn status(status: StatusCode, body: &'static str) -> Self {
        Self {
            status,
            body,
            retry_after: None,
        }
    }
}

/// Starts an HTTP server on a random local port answering every request with `canned`.
pub fn serve_stub(canned: Canned) -> (SocketAddr, Arc<Mutex<Vec<Captured>>>) {
    let captured = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&captured);

    let make_svc = make_service_fn(move |_conn| {
        let sink = Arc::clone(&sink);
        async move {
            Ok::<_, Infallible>(service_fn(move |req: Request<Body>| {
                let sink = Arc::clone(&sink);
                async move {
                    let path = req.uri().path().to_owned();
                    let api_key = req
                        .headers()
                        .get("x-goog-api-key")
                        .and_then(|value| value.to_str().ok())
                        .map(str::to_owned);
                    let bytes = hyper::body::to_bytes(req.into_body()).await?;
                    let body = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
                    sink.lock().unwrap().push(Captured {
                        path,
                        api_key,
                        body,
                    });

                    let mut response = Response::builder()
                        .status(canned.status)
                        .header("content-type", "application/json");
                    if let Some(retry_after) = canned.retry_after {
                        response = response.header("retry-after", retry_after);
                    }
                    Ok::<_, hyper::Error>(response.body(Body::from(canned.body)).unwrap())
                }
            }))
        }
    });

    let server = Server::bind(&SocketAddr::from(([127, 0, 0, 1], 0))).serve(make_svc);
    let addr = server.local_addr();
    tokio::spawn(server);
    (addr, captured)
}
