use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use dirgraph_core::{
    ConfirmationPrompt, DefaultObjectFactory, DirectoryContext, DirectoryObject, HttpMethod,
    HttpRequest, HttpResponse, ObjectFactory, Transport,
};
use dirgraph_domain::{DirectoryError, ObjectType, Properties, Result};
use serde_json::Value;

type RouteKey = (HttpMethod, String);

/// Scripted transport keyed by method and URL.
///
/// Each route holds a queue of responses; the last one repeats. Unrouted
/// requests get a 404 so a wrong URL shows up as an `Http` error.
#[derive(Default, Clone)]
pub struct MockTransport {
    routes: Arc<Mutex<HashMap<RouteKey, VecDeque<Result<HttpResponse>>>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, method: HttpMethod, url: impl Into<String>, response: HttpResponse) -> &Self {
        self.push(method, url.into(), Ok(response));
        self
    }

    pub fn respond_json(&self, method: HttpMethod, url: impl Into<String>, body: Value) -> &Self {
        self.respond(method, url, HttpResponse::json(200, &body))
    }

    pub fn fail(&self, method: HttpMethod, url: impl Into<String>, error: DirectoryError) -> &Self {
        self.push(method, url.into(), Err(error));
        self
    }

    fn push(&self, method: HttpMethod, url: String, outcome: Result<HttpResponse>) {
        self.routes.lock().unwrap().entry((method, url)).or_default().push_back(outcome);
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn count(&self, method: HttpMethod) -> usize {
        self.requests.lock().unwrap().iter().filter(|r| r.method == method).count()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        let key = (request.method, request.url.clone());
        self.requests.lock().unwrap().push(request);

        let mut routes = self.routes.lock().unwrap();
        match routes.get_mut(&key) {
            Some(queue) if queue.len() > 1 => queue.pop_front().unwrap(),
            Some(queue) => queue.front().cloned().unwrap(),
            None => Ok(HttpResponse::new(404, format!("no route for {} {}", key.0, key.1))),
        }
    }
}

/// Prompt with a fixed answer that records every question.
#[derive(Clone)]
pub struct ScriptedPrompt {
    answer: bool,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedPrompt {
    pub fn answering(answer: bool) -> Self {
        Self { answer, asked: Arc::default() }
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl ConfirmationPrompt for ScriptedPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        self.asked.lock().unwrap().push(message.to_string());
        Ok(self.answer)
    }
}

/// Default dispatch that counts constructions.
#[derive(Default, Clone)]
pub struct CountingFactory {
    constructed: Arc<AtomicUsize>,
}

impl CountingFactory {
    pub fn constructed(&self) -> usize {
        self.constructed.load(Ordering::SeqCst)
    }
}

impl ObjectFactory for CountingFactory {
    fn construct(
        &self,
        context: Arc<DirectoryContext>,
        raw: Properties,
        hint: Option<ObjectType>,
    ) -> DirectoryObject {
        self.constructed.fetch_add(1, Ordering::SeqCst);
        DefaultObjectFactory.construct(context, raw, hint)
    }
}
