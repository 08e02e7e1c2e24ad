use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use approvalgate_approval::{MailError, MailMessage, MailTransport};

/// Captures outgoing mail in memory.
///
/// With [`RecordingMailTransport::set_failing`] every send is rejected (and
/// not captured), which simulates a transport outage.
#[derive(Debug, Default)]
pub struct RecordingMailTransport {
    sent: Mutex<Vec<MailMessage>>,
    failing: AtomicBool,
}

impl RecordingMailTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn sent(&self) -> Vec<MailMessage> {
        self.sent.lock().map(|m| m.clone()).unwrap_or_default()
    }

    pub fn sent_to(&self, to: &str) -> Vec<MailMessage> {
        self.sent().into_iter().filter(|m| m.to == to).collect()
    }

    /// Number of captured messages to `to` with exactly this subject.
    pub fn count(&self, to: &str, subject: &str) -> usize {
        self.sent_to(to).iter().filter(|m| m.subject == subject).count()
    }
}

impl MailTransport for RecordingMailTransport {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(MailError::Transport("recording transport set to fail".to_string()));
        }
        self.sent
            .lock()
            .map_err(|_| MailError::Transport("outbox lock poisoned".to_string()))?
            .push(message.clone());
        Ok(())
    }
}
