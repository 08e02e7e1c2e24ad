//! Notifier: registration emails and the edge-triggered approval email.

use std::sync::Arc;

use serde::Serialize;

use approvalgate_core::{GateResult, UserId};
use approvalgate_events::{AccountEvent, ApprovalUpdated, CustomerRegistered, Event};

use crate::templates::{self, MailKind, Passthrough, SiteInfo, Translator};
use crate::{ApprovalStore, MailMessage, MailTransport, UserDirectory};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifierConfig {
    pub site: SiteInfo,
    /// Recipient of new-registration alerts.
    pub admin_email: String,
}

/// What to do with the shadow flag after an approval write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeAction {
    /// false→true edge: send the approval email, then arm the shadow flag.
    SendApproval,
    /// Approval already announced.
    Nothing,
    /// Approval withdrawn: clear the shadow flag so a re-approval mails again.
    Rearm,
}

/// Decide the notifier action from the written value and the shadow flag.
pub fn approval_edge(approved: bool, previously_approved: bool) -> EdgeAction {
    match (approved, previously_approved) {
        (true, false) => EdgeAction::SendApproval,
        (true, true) => EdgeAction::Nothing,
        (false, _) => EdgeAction::Rearm,
    }
}

/// Mail dispatched while handling one event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
    pub sent: Vec<MailKind>,
    pub failed: Vec<MailKind>,
}

impl NotifyReport {
    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed.len()
    }
}

#[derive(Clone)]
pub struct Notifier {
    config: NotifierConfig,
    directory: Arc<dyn UserDirectory>,
    approvals: ApprovalStore,
    mailer: Arc<dyn MailTransport>,
    translator: Arc<dyn Translator>,
}

impl Notifier {
    pub fn new(
        config: NotifierConfig,
        directory: Arc<dyn UserDirectory>,
        approvals: ApprovalStore,
        mailer: Arc<dyn MailTransport>,
    ) -> Self {
        Self {
            config,
            directory,
            approvals,
            mailer,
            translator: Arc::new(Passthrough),
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn handle(&self, event: &AccountEvent) -> GateResult<NotifyReport> {
        let span = tracing::info_span!(
            "notify",
            event_type = event.event_type(),
            version = event.version(),
            user_id = %event.subject(),
            occurred_at = %event.occurred_at(),
        );
        let _entered = span.enter();

        match event {
            AccountEvent::CustomerRegistered(e) => self.on_registered(e),
            AccountEvent::ApprovalUpdated(e) => self.on_approval_updated(e),
        }
    }

    fn on_registered(&self, event: &CustomerRegistered) -> GateResult<NotifyReport> {
        let profile = self.directory.get_profile(event.user_id)?;
        let t = self.translator.as_ref();

        let mut report = NotifyReport::default();
        self.dispatch(
            MailKind::Welcome,
            event.user_id,
            &templates::welcome(t, &self.config.site, &profile),
            &mut report,
        );
        self.dispatch(
            MailKind::AdminAlert,
            event.user_id,
            &templates::admin_alert(t, &self.config.site, &self.config.admin_email, &profile),
            &mut report,
        );
        Ok(report)
    }

    fn on_approval_updated(&self, event: &ApprovalUpdated) -> GateResult<NotifyReport> {
        let mut report = NotifyReport::default();

        match approval_edge(event.approved, event.previously_approved) {
            EdgeAction::SendApproval => {
                let profile = self.directory.get_profile(event.user_id)?;
                let message =
                    templates::approval(self.translator.as_ref(), &self.config.site, &profile);
                self.dispatch(MailKind::Approval, event.user_id, &message, &mut report);
                // Armed even when the send failed: at most one email per edge.
                self.approvals.set_previously_approved(event.user_id, true)?;
            }
            EdgeAction::Rearm => {
                self.approvals.set_previously_approved(event.user_id, false)?;
            }
            EdgeAction::Nothing => {}
        }

        Ok(report)
    }

    // Failures are logged and swallowed; nothing is retried here.
    fn dispatch(
        &self,
        kind: MailKind,
        user_id: UserId,
        message: &MailMessage,
        report: &mut NotifyReport,
    ) {
        match self.mailer.send(message) {
            Ok(()) => {
                tracing::info!(%kind, %user_id, to = %message.to, "mail sent");
                report.sent.push(kind);
            }
            Err(e) => {
                tracing::warn!(%kind, %user_id, to = %message.to, error = %e, "mail send failed");
                report.failed.push(kind);
            }
        }
    }
}
