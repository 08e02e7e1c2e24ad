use approvalgate_approval::{MailError, MailMessage, MailTransport};

/// Writes every message to the tracing log instead of delivering it.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailTransport;

impl MailTransport for LogMailTransport {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        if message.to.trim().is_empty() {
            return Err(MailError::Rejected("empty recipient".to_string()));
        }
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            bytes = message.html_body.len(),
            "mail (log transport)"
        );
        tracing::debug!(body = %message.html_body, "mail body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_recipient() {
        let msg = MailMessage {
            to: " ".to_string(),
            subject: "hi".to_string(),
            html_body: String::new(),
        };
        assert!(matches!(LogMailTransport.send(&msg), Err(MailError::Rejected(_))));
    }
}
