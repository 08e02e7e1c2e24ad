use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use approvalgate_approval::{UpdateApproval, UserRow};
use approvalgate_core::UserId;

/// Body accepted as JSON, or as an urlencoded form when the content type says so.
pub struct JsonOrForm<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonOrForm<T>
where
    S: Send + Sync,
    T: DeserializeOwned + 'static,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(value) = Form::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        } else {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(IntoResponse::into_response)?;
            Ok(Self(value))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub username: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: UserId,
    pub approved: bool,
}

/// Approval write: `{"approved": bool}` from API clients, or the profile
/// form's `user_approval` checkbox (absent when unchecked).
#[derive(Debug, Default, Deserialize)]
pub struct ApprovalBody {
    pub approved: Option<bool>,
    pub user_approval: Option<String>,
}

impl ApprovalBody {
    pub fn into_command(self, user_id: UserId) -> UpdateApproval {
        match self.approved {
            Some(approved) => UpdateApproval { user_id, approved },
            None => UpdateApproval::from_checkbox(user_id, self.user_approval.as_deref()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserRow>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_flag_wins_over_checkbox() {
        let id = UserId::new();
        let body = ApprovalBody {
            approved: Some(false),
            user_approval: Some("1".into()),
        };
        assert!(!body.into_command(id).approved);
    }

    #[test]
    fn missing_checkbox_revokes() {
        let id = UserId::new();
        assert!(!ApprovalBody::default().into_command(id).approved);

        let checked = ApprovalBody {
            approved: None,
            user_approval: Some("1".into()),
        };
        assert!(checked.into_command(id).approved);
    }
}
