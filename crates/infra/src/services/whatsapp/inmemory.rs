use super::IMessenger;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub phone: String,
    pub body: String,
}

/// Messenger fake for tests. Records every send and can be toggled to
/// fail so dispatcher failure handling can be exercised.
pub struct InMemoryMessenger {
    sent: Mutex<Vec<SentMessage>>,
    failing: AtomicBool,
}

impl InMemoryMessenger {
    pub fn new() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl IMessenger for InMemoryMessenger {
    async fn send(&self, phone: &str, body: &str) -> anyhow::Result<String> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(anyhow::Error::msg("Message channel is down"));
        }

        let mut sent = self.sent.lock().unwrap();
        sent.push(SentMessage {
            phone: phone.to_string(),
            body: body.to_string(),
        });
        Ok(format!("SM{:032x}", sent.len()))
    }
}
