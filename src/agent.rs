//! The LLM agent seam. The core treats an agent as an opaque prompt/response
//! capability: `generate(messages) -> AgentReply { text }` with no guaranteed
//! structure in the reply, hence the defensive parsing in `extract`.

use crate::types::{CuratorError, Result};
use async_trait::async_trait;
use backoff::backoff::{Backoff, Constant};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentMessage {
    pub role: String,
    pub content: String,
}

impl AgentMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentReply {
    pub text: String,
}

#[async_trait]
pub trait Agent: Send + Sync {
    /// Name of the remote agent this handle talks to.
    fn name(&self) -> &str;

    /// Run one completion against the agent.
    async fn generate(&self, messages: &[AgentMessage]) -> Result<AgentReply>;
}

#[derive(Debug, Clone)]
pub struct AgentClientConfig {
    pub base_url: String,
    pub timeout_seconds: u64,
    pub max_retries: u32,
    pub retry_backoff_ms: u64,
}

impl Default for AgentClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4112".to_string(),
            timeout_seconds: 120,
            max_retries: 3,
            retry_backoff_ms: 300,
        }
    }
}

/// HTTP client for one named agent on an agent-orchestration server.
pub struct HttpAgentClient {
    client: Client,
    config: AgentClientConfig,
    agent_name: String,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    messages: &'a [AgentMessage],
}

impl HttpAgentClient {
    pub fn new(agent_name: impl Into<String>, config: AgentClientConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            config,
            agent_name: agent_name.into(),
        }
    }

    /// Check that the agent server responds on its health endpoint.
    pub async fn health_check(&self) -> Result<bool> {
        let url = format!("{}/health", self.config.base_url);
        let response = self.client.get(&url).send().await?;
        Ok(response.status().is_success())
    }

    async fn generate_once(&self, messages: &[AgentMessage]) -> Result<AgentReply> {
        let url = format!(
            "{}/api/agents/{}/generate",
            self.config.base_url, self.agent_name
        );
        let response = self
            .client
            .post(&url)
            .json(&GenerateRequest { messages })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CuratorError::Agent(format!(
                "agent {} returned HTTP {}",
                self.agent_name, status
            )));
        }

        let reply: AgentReply = response.json().await?;
        Ok(reply)
    }
}

#[async_trait]
impl Agent for HttpAgentClient {
    fn name(&self) -> &str {
        &self.agent_name
    }

    /// Fixed retry count with a constant backoff step; no exponential growth.
    async fn generate(&self, messages: &[AgentMessage]) -> Result<AgentReply> {
        let mut backoff = Constant::new(Duration::from_millis(self.config.retry_backoff_ms));
        let mut last_error = None;

        for attempt in 0..=self.config.max_retries {
            match self.generate_once(messages).await {
                Ok(reply) => {
                    debug!(
                        "Agent {} replied ({} chars)",
                        self.agent_name,
                        reply.text.len()
                    );
                    return Ok(reply);
                }
                Err(e) => {
                    warn!(
                        "Agent {} attempt {} failed: {}",
                        self.agent_name,
                        attempt + 1,
                        e
                    );
                    last_error = Some(e);
                    if attempt < self.config.max_retries {
                        if let Some(delay) = backoff.next_backoff() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }

        Err(last_error
            .unwrap_or_else(|| CuratorError::Agent("agent call failed".to_string())))
    }
}

/// Scripted agent for tests: replies are dequeued in order, and every call
/// is counted. An empty queue yields a generic reply.
pub struct MockAgent {
    name: String,
    replies: Mutex<VecDeque<std::result::Result<String, String>>>,
    calls: AtomicUsize,
}

impl MockAgent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            replies: Mutex::new(VecDeque::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn push_reply(&self, text: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock reply queue poisoned")
            .push_back(Ok(text.into()));
    }

    pub fn push_error(&self, message: impl Into<String>) {
        self.replies
            .lock()
            .expect("mock reply queue poisoned")
            .push_back(Err(message.into()));
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Agent for MockAgent {
    fn name(&self) -> &str {
        &self.name
    }

    async fn generate(&self, _messages: &[AgentMessage]) -> Result<AgentReply> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self
            .replies
            .lock()
            .expect("mock reply queue poisoned")
            .pop_front();
        match next {
            Some(Ok(text)) => Ok(AgentReply { text }),
            Some(Err(message)) => Err(CuratorError::Agent(message)),
            None => Ok(AgentReply {
                text: "Mock reply".to_string(),
            }),
        }
    }
}
