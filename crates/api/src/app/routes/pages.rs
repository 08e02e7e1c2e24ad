use axum::{extract::Extension, http::Uri, response::Html};

use approvalgate_approval::templates::escape_html;

use crate::context::CurrentUser;

/// Placeholder for storefront pages; reaching it means the gate admitted the request.
pub async fn storefront(Extension(current): Extension<CurrentUser>, uri: Uri) -> Html<String> {
    let who = match current.user_id() {
        Some(id) => format!("signed in as {id}"),
        None => "anonymous".to_string(),
    };
    Html(format!(
        "<!DOCTYPE html>\n<html><body><h1>{}</h1><p>{}</p></body></html>\n",
        escape_html(uri.path()),
        who
    ))
}
