//! Canned hosting API responses for fetcher tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use hpm_tags::{Error, HttpResponse, Result, TagTransport};

pub const API: &str = "https://api.test";

/// What the fake API answers to one request.
#[derive(Debug, Clone)]
pub enum Reply {
    Tags(Vec<String>),
    Status(u16),
    Offline,
}

/// `count` tags named `{prefix}{n}`.
pub fn page(prefix: &str, count: usize) -> Reply {
    Reply::Tags((0..count).map(|n| format!("{prefix}{n}")).collect())
}

pub fn tags(names: &[&str]) -> Reply {
    Reply::Tags(names.iter().map(|n| n.to_string()).collect())
}

/// Serves replies per URL in request order and records every request.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    routes: HashMap<String, Vec<Reply>>,
    requests: Arc<Mutex<Vec<(String, Vec<(String, String)>)>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies for `{API}/repos/{repo}/tags`.
    pub fn route(mut self, repo: &str, replies: Vec<Reply>) -> Self {
        self.routes.insert(format!("{API}/repos/{repo}/tags"), replies);
        self
    }

    pub fn requests(&self) -> Vec<(String, Vec<(String, String)>)> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl TagTransport for MockTransport {
    fn get(&self, url: &str, query: &[(&str, String)]) -> Result<HttpResponse> {
        let mut requests = self.requests.lock().unwrap();
        let served = requests.iter().filter(|(u, _)| u == url).count();
        requests.push((
            url.to_string(),
            query.iter().map(|(k, v)| (k.to_string(), v.clone())).collect(),
        ));

        let reply = self
            .routes
            .get(url)
            .and_then(|replies| replies.get(served))
            .cloned()
            .unwrap_or(Reply::Status(404));

        match reply {
            Reply::Tags(names) => {
                let body: Vec<_> = names
                    .iter()
                    .map(|name| serde_json::json!({"name": name, "commit": {"sha": "abc"}}))
                    .collect();
                Ok(HttpResponse::new(200, serde_json::to_string(&body).unwrap()))
            }
            Reply::Status(status) => Ok(HttpResponse::new(status, "{\"message\": \"error\"}")),
            Reply::Offline => Err(Error::Connection {
                url: url.to_string(),
                message: "connection refused".to_string(),
            }),
        }
    }
}
