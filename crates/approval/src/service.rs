//! Explicit account pipeline: registration, sign-in, approval writes and the
//! per-request gate, each wired to the notifier by direct calls.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde::Serialize;

use approvalgate_auth::{authorize, Actor, Permission, Role};
use approvalgate_core::{GateError, GateResult, SessionId, UserId};
use approvalgate_events::{AccountEvent, ApprovalUpdated, CustomerRegistered};

use crate::commands::into_new_user;
use crate::{
    AccessGate, ApprovalRecord, ApprovalRepository, ApprovalStore, GateDecision, GateRequest,
    MailTransport, NewCustomer, Notifier, NotifierConfig, NotifyReport, Passthrough,
    SessionProvider, Translator, UpdateApproval, UserDirectory, UserRow,
};

/// External capabilities the service is built from.
#[derive(Clone)]
pub struct Collaborators {
    pub directory: Arc<dyn UserDirectory>,
    pub sessions: Arc<dyn SessionProvider>,
    pub approvals: Arc<dyn ApprovalRepository>,
    pub mailer: Arc<dyn MailTransport>,
}

/// Outcome of an approval write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApprovalOutcome {
    pub user_id: UserId,
    pub record: ApprovalRecord,
    pub notified: NotifyReport,
}

pub struct ApprovalGateService {
    directory: Arc<dyn UserDirectory>,
    sessions: Arc<dyn SessionProvider>,
    approvals: ApprovalStore,
    gate: AccessGate,
    notifier: Notifier,
    translator: Arc<dyn Translator>,
    // Serializes write → edge check → shadow flag update.
    approval_writes: Mutex<()>,
}

impl ApprovalGateService {
    pub fn new(collaborators: Collaborators, config: NotifierConfig) -> Self {
        Self::with_translator(collaborators, config, Arc::new(Passthrough))
    }

    pub fn with_translator(
        collaborators: Collaborators,
        config: NotifierConfig,
        translator: Arc<dyn Translator>,
    ) -> Self {
        let Collaborators {
            directory,
            sessions,
            approvals,
            mailer,
        } = collaborators;

        let approvals = ApprovalStore::new(approvals);
        let gate = AccessGate::new(sessions.clone(), directory.clone(), approvals.clone());
        let notifier = Notifier::new(config, directory.clone(), approvals.clone(), mailer)
            .with_translator(translator.clone());

        Self {
            directory,
            sessions,
            approvals,
            gate,
            notifier,
            translator,
            approval_writes: Mutex::new(()),
        }
    }

    /// Create a customer account in the pending state and send the welcome
    /// and admin-alert emails. No session is started.
    pub fn register_customer(&self, request: NewCustomer) -> GateResult<UserId> {
        let new_user = request.into_new_user()?;
        let user = self.directory.create(new_user)?;
        self.approvals.initialize(user.id)?;
        tracing::info!(user_id = %user.id, username = %user.username, "customer registered");

        let event = AccountEvent::CustomerRegistered(CustomerRegistered {
            user_id: user.id,
            occurred_at: Utc::now(),
        });
        // Notification problems never undo the account.
        if let Err(e) = self.notifier.handle(&event) {
            tracing::warn!(user_id = %user.id, error = %e, "registration notification failed");
        }

        Ok(user.id)
    }

    /// Make sure the bootstrap administrator exists; returns its id.
    pub fn ensure_administrator(&self, username: &str, email: &str) -> GateResult<UserId> {
        if let Some(existing) = self.directory.find_by_username(username.trim())? {
            return Ok(existing.id);
        }
        let new_user = into_new_user(
            username.to_string(),
            email.to_string(),
            None,
            Role::ADMINISTRATOR,
        )?;
        let user = self.directory.create(new_user)?;
        self.approvals.initialize(user.id)?;
        tracing::info!(user_id = %user.id, username = %user.username, "administrator created");
        Ok(user.id)
    }

    /// Open a session for a known username.
    ///
    /// Credentials are verified by the host identity system before this is
    /// called. Unapproved customers still get a session; the gate ends it on
    /// their next page view.
    pub fn sign_in(&self, username: &str) -> GateResult<SessionId> {
        let user = self
            .directory
            .find_by_username(username.trim())?
            .ok_or(GateError::NotFound)?;
        let session = self.sessions.open(user.id)?;
        tracing::info!(user_id = %user.id, "signed in");
        Ok(session)
    }

    pub fn sign_out(&self, session: &SessionId) -> GateResult<()> {
        self.sessions.logout(session)
    }

    pub fn current_user(&self, session: &SessionId) -> GateResult<Option<UserId>> {
        self.sessions.resolve(session)
    }

    /// Resolve the acting user and their permissions from the directory.
    pub fn actor_for(&self, user_id: UserId) -> GateResult<Actor> {
        let role = self.directory.get_role(user_id)?;
        Ok(Actor::from_role(user_id, role.as_deref().and_then(Role::parse)))
    }

    pub fn evaluate(&self, request: &GateRequest) -> GateResult<GateDecision> {
        self.gate.evaluate(request)
    }

    pub fn approval(&self, user_id: UserId) -> GateResult<ApprovalRecord> {
        self.approvals.get(user_id)
    }

    /// Write the approval flag and run the approval notifier.
    ///
    /// A denied write changes nothing and sends nothing.
    pub fn update_approval(
        &self,
        actor: &Actor,
        command: UpdateApproval,
    ) -> GateResult<ApprovalOutcome> {
        let _guard = self
            .approval_writes
            .lock()
            .map_err(|_| GateError::storage("approval write lock poisoned"))?;

        let change = self
            .approvals
            .set_approved(actor, command.user_id, command.approved)?;
        tracing::info!(
            user_id = %change.user_id,
            actor = %actor.user_id,
            approved = change.approved,
            "approval updated"
        );

        let event = AccountEvent::ApprovalUpdated(ApprovalUpdated {
            user_id: change.user_id,
            approved: change.approved,
            previously_approved: change.previously_approved,
            occurred_at: Utc::now(),
        });
        // The write is committed; a notifier failure must not report it as failed.
        let notified = match self.notifier.handle(&event) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(user_id = %change.user_id, error = %e, "approval notification failed");
                NotifyReport::default()
            }
        };

        Ok(ApprovalOutcome {
            user_id: change.user_id,
            record: self.approvals.get(change.user_id)?,
            notified,
        })
    }

    /// Admin listing, oldest account first.
    pub fn user_rows(&self, actor: &Actor) -> GateResult<Vec<UserRow>> {
        authorize(actor, &Permission::LIST_USERS)?;

        let records: HashMap<UserId, ApprovalRecord> = self.approvals.list()?.into_iter().collect();
        let mut users = self.directory.list()?;
        // Stable: accounts created in the same instant keep directory order.
        users.sort_by_key(|u| u.created_at);

        Ok(users
            .into_iter()
            .map(|u| {
                let record = records.get(&u.id).copied();
                UserRow::new(u, record, self.translator.as_ref())
            })
            .collect())
    }

    pub fn user_row(&self, actor: &Actor, user_id: UserId) -> GateResult<UserRow> {
        authorize(actor, &Permission::LIST_USERS)?;

        let user = self
            .directory
            .list()?
            .into_iter()
            .find(|u| u.id == user_id)
            .ok_or(GateError::NotFound)?;
        let record = match self.approvals.get(user_id) {
            Ok(r) => Some(r),
            Err(GateError::NotFound) => None,
            Err(e) => return Err(e),
        };
        Ok(UserRow::new(user, record, self.translator.as_ref()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fakes::{FakeApprovals, FakeDirectory, FakeMailer, FakeSessions};
    use crate::{MailKind, SiteInfo};
    use proptest::prelude::*;

    struct Harness {
        service: ApprovalGateService,
        directory: Arc<FakeDirectory>,
        mailer: Arc<FakeMailer>,
        admin: Actor,
    }

    fn harness_with(mailer: FakeMailer) -> Harness {
        let mailer = Arc::new(mailer);
        let directory = Arc::new(FakeDirectory::default());
        let service = ApprovalGateService::new(
            Collaborators {
                directory: directory.clone(),
                sessions: Arc::new(FakeSessions::default()),
                approvals: Arc::new(FakeApprovals::default()),
                mailer: mailer.clone(),
            },
            NotifierConfig {
                site: SiteInfo::new("Our Store", "http://localhost:8080"),
                admin_email: "owner@example.com".to_string(),
            },
        );
        let admin_id = service.ensure_administrator("admin", "admin@example.com").unwrap();
        let admin = service.actor_for(admin_id).unwrap();
        Harness {
            service,
            directory,
            mailer,
            admin,
        }
    }

    fn harness() -> Harness {
        harness_with(FakeMailer::default())
    }

    fn alice() -> NewCustomer {
        NewCustomer {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            display_name: Some("Alice".to_string()),
        }
    }

    fn approval_mails(h: &Harness) -> usize {
        h.mailer
            .subjects_to("alice@example.com")
            .iter()
            .filter(|s| s.as_str() == "Your account has been approved")
            .count()
    }

    fn page(h: &Harness, session: SessionId) -> GateDecision {
        h.service
            .evaluate(&GateRequest::new("/my-account/", Some(session)))
            .unwrap()
    }

    #[test]
    fn alice_registers_and_is_turned_away() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();

        assert_eq!(h.service.approval(alice).unwrap(), ApprovalRecord::pending());
        assert_eq!(h.mailer.subjects_to("alice@example.com"), vec!["Welcome to Our Store!"]);
        assert_eq!(
            h.mailer.subjects_to("owner@example.com"),
            vec!["New user registered on Our Store"]
        );

        let session = h.service.sign_in("alice").unwrap();
        assert_eq!(page(&h, session), GateDecision::ForcedLogout);
        assert_eq!(h.service.current_user(&session).unwrap(), None);
    }

    #[test]
    fn approved_alice_gets_email_and_access() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();

        let outcome = h
            .service
            .update_approval(&h.admin, UpdateApproval { user_id: alice, approved: true })
            .unwrap();
        assert_eq!(outcome.notified.sent, vec![MailKind::Approval]);
        assert!(outcome.record.previously_approved);

        let session = h.service.sign_in("alice").unwrap();
        assert_eq!(page(&h, session), GateDecision::Allow { user_id: Some(alice) });
    }

    #[test]
    fn double_approval_sends_one_email() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();
        let approve = UpdateApproval { user_id: alice, approved: true };

        h.service.update_approval(&h.admin, approve).unwrap();
        h.service.update_approval(&h.admin, approve).unwrap();

        assert_eq!(approval_mails(&h), 1);
    }

    #[test]
    fn revoke_and_reapprove_sends_two_emails() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();

        for approved in [true, false, true] {
            h.service
                .update_approval(&h.admin, UpdateApproval { user_id: alice, approved })
                .unwrap();
        }

        assert_eq!(approval_mails(&h), 2);
    }

    #[test]
    fn unprivileged_write_is_rejected_silently() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();
        let before = h.mailer.count();
        let customer = h.service.actor_for(alice).unwrap();

        let err = h
            .service
            .update_approval(&customer, UpdateApproval { user_id: alice, approved: true })
            .unwrap_err();

        assert!(matches!(err, GateError::PermissionDenied(_)));
        assert_eq!(h.mailer.count(), before);
        assert!(!h.service.approval(alice).unwrap().approved);
    }

    #[test]
    fn concurrent_approvals_send_one_email() {
        let Harness {
            service, mailer, admin, ..
        } = harness();
        let alice = service.register_customer(alice()).unwrap();
        let service = Arc::new(service);
        let barrier = Arc::new(std::sync::Barrier::new(8));

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                let barrier = barrier.clone();
                let admin = admin.clone();
                std::thread::spawn(move || {
                    barrier.wait();
                    service
                        .update_approval(&admin, UpdateApproval { user_id: alice, approved: true })
                        .unwrap()
                })
            })
            .collect();
        let sent: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap().notified.sent.len())
            .sum();

        let approvals = mailer
            .subjects_to("alice@example.com")
            .into_iter()
            .filter(|s| s == "Your account has been approved")
            .count();
        assert_eq!(approvals, 1);
        assert_eq!(sent, 1);
        assert_eq!(
            service.approval(alice).unwrap(),
            ApprovalRecord { approved: true, previously_approved: true }
        );
    }

    #[test]
    fn committed_write_survives_notifier_failure() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();
        h.directory.forget(alice);

        let outcome = h
            .service
            .update_approval(&h.admin, UpdateApproval { user_id: alice, approved: true })
            .unwrap();

        assert!(outcome.record.approved);
        assert_eq!(outcome.notified.attempted(), 0);
        assert!(h.service.approval(alice).unwrap().approved);
    }

    #[test]
    fn unknown_user_write_is_not_found() {
        let h = harness();
        let err = h
            .service
            .update_approval(&h.admin, UpdateApproval { user_id: UserId::new(), approved: true })
            .unwrap_err();
        assert_eq!(err, GateError::NotFound);
    }

    #[test]
    fn registration_survives_mail_outage() {
        let h = harness_with(FakeMailer::failing());
        let alice = h.service.register_customer(alice()).unwrap();
        assert_eq!(h.service.approval(alice).unwrap(), ApprovalRecord::pending());

        let outcome = h
            .service
            .update_approval(&h.admin, UpdateApproval { user_id: alice, approved: true })
            .unwrap();
        assert_eq!(outcome.notified.failed, vec![MailKind::Approval]);
        assert!(outcome.record.approved && outcome.record.previously_approved);
    }

    #[test]
    fn duplicate_username_conflicts() {
        let h = harness();
        h.service.register_customer(alice()).unwrap();
        let err = h.service.register_customer(alice()).unwrap_err();
        assert!(matches!(err, GateError::Conflict(_)));
    }

    #[test]
    fn administrator_is_never_gated() {
        let h = harness();
        let session = h.service.sign_in("admin").unwrap();
        assert!(page(&h, session).is_allowed());
    }

    #[test]
    fn listing_labels_approval() {
        let h = harness();
        let alice = h.service.register_customer(alice()).unwrap();
        h.service
            .update_approval(&h.admin, UpdateApproval { user_id: alice, approved: true })
            .unwrap();
        h.service
            .register_customer(NewCustomer {
                username: "bob".to_string(),
                email: "bob@example.com".to_string(),
                display_name: None,
            })
            .unwrap();

        let rows = h.service.user_rows(&h.admin).unwrap();
        let labels: Vec<(&str, &str)> = rows
            .iter()
            .map(|r| (r.username.as_str(), r.approved_label.as_str()))
            .collect();
        assert_eq!(labels, vec![("admin", "No"), ("alice", "Yes"), ("bob", "No")]);

        let customer = h.service.actor_for(alice).unwrap();
        assert!(matches!(
            h.service.user_rows(&customer),
            Err(GateError::PermissionDenied(_))
        ));
    }

    proptest! {
        /// Property: approval emails equal the number of false→true edges in
        /// any sequence of admin writes.
        #[test]
        fn one_email_per_rising_edge(writes in prop::collection::vec(any::<bool>(), 0..24)) {
            let h = harness();
            let alice = h.service.register_customer(alice()).unwrap();

            let mut expected = 0;
            let mut current = false;
            for approved in writes {
                if approved && !current {
                    expected += 1;
                }
                current = approved;
                h.service
                    .update_approval(&h.admin, UpdateApproval { user_id: alice, approved })
                    .unwrap();
            }

            prop_assert_eq!(approval_mails(&h), expected);
        }
    }
}
