use std::sync::Arc;

use approvalgate_approval::{ApprovalGateService, Collaborators, MailTransport};
use approvalgate_core::GateResult;
use approvalgate_infra::{InMemoryApprovalRepository, InMemorySessionStore, InMemoryUserDirectory};

use crate::config::{GateConfig, SignInPolicy};

/// Shared handler state.
pub struct AppServices {
    pub accounts: ApprovalGateService,
    pub sign_in: SignInPolicy,
}

/// Wire the account pipeline over the in-memory stack and seed the
/// bootstrap administrator.
pub fn build_services(
    config: &GateConfig,
    mailer: Arc<dyn MailTransport>,
) -> GateResult<AppServices> {
    let collaborators = Collaborators {
        directory: Arc::new(InMemoryUserDirectory::new()),
        sessions: Arc::new(InMemorySessionStore::new(chrono::Duration::hours(
            config.session_ttl_hours,
        ))),
        approvals: Arc::new(InMemoryApprovalRepository::new()),
        mailer,
    };
    let accounts = ApprovalGateService::new(collaborators, config.notifier());

    let admin = accounts.ensure_administrator(&config.admin_username, &config.admin_email)?;
    tracing::info!(user_id = %admin, username = %config.admin_username, "administrator ready");

    match &config.sign_in {
        SignInPolicy::Disabled => tracing::warn!("sign-in disabled; set GATE_IDENTITY_HEADER"),
        SignInPolicy::TrustedHeader(header) => tracing::info!(%header, "sign-in via trusted header"),
        SignInPolicy::AssertedUsername => {
            tracing::warn!("sign-in trusts the submitted username; development only")
        }
    }

    Ok(AppServices {
        accounts,
        sign_in: config.sign_in.clone(),
    })
}
