//! Shared fixtures: a scripted in-process chat backend and question builders.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use mad_agents::{ChatBackend, ChatRequest, GatewayClient, GatewayError};
use scoring::QuestionRecord;

pub type Reply = Result<String, GatewayError>;

type Responder = Box<dyn Fn(usize, &ChatRequest) -> Reply + Send + Sync>;

/// Backend that answers from a closure over `(call index, request)` and
/// records every request it sees.
pub struct ScriptedBackend {
    responder: Responder,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedBackend {
    pub fn new(responder: impl Fn(usize, &ChatRequest) -> Reply + Send + Sync + 'static) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Same reply to every call.
    pub fn replying(reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |_, _| Ok(reply.clone()))
    }

    /// Replies in order; calls past the end of the script fail.
    pub fn script(replies: &[&str]) -> Arc<Self> {
        let replies: Vec<String> = replies.iter().map(|r| r.to_string()).collect();
        Self::new(move |i, _| {
            replies
                .get(i)
                .cloned()
                .ok_or_else(|| GatewayError::RequestFailed(format!("no scripted reply for call {}", i)))
        })
    }

    /// Every call succeeds with `reply` except the 0-based call `failing`.
    pub fn failing_at(failing: usize, reply: &str) -> Arc<Self> {
        let reply = reply.to_string();
        Self::new(move |i, _| {
            if i == failing {
                Err(GatewayError::Status {
                    status: 500,
                    body: "upstream error".into(),
                })
            } else {
                Ok(reply.clone())
            }
        })
    }

    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatBackend for ScriptedBackend {
    async fn complete(&self, request: &ChatRequest) -> Result<String, GatewayError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        (self.responder)(index, request)
    }
}

pub fn client_for(backend: &Arc<ScriptedBackend>) -> Arc<GatewayClient> {
    Arc::new(GatewayClient::new(backend.clone(), Duration::from_secs(5)))
}

/// A six-option question in `category` whose correct option is `answer`.
pub fn question(category: &str, answer: u8) -> QuestionRecord {
    QuestionRecord::new(
        "Which planet is largest?",
        ["Mercury", "Venus", "Earth", "Mars", "Jupiter", "Saturn"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
    )
    .with_category(category)
    .with_answer(answer)
}
