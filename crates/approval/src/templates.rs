//! Account email templates.
//!
//! Every user-visible string passes through a [`Translator`] before values are
//! interpolated; interpolated values are HTML-escaped.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

use crate::{MailMessage, UserProfile};

/// String lookup hook for localisation.
pub trait Translator: Send + Sync {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str>;
}

/// Returns every string unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct Passthrough;

impl Translator for Passthrough {
    fn translate<'a>(&self, text: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(text)
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MailKind {
    Welcome,
    AdminAlert,
    Approval,
}

impl core::fmt::Display for MailKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            MailKind::Welcome => "welcome",
            MailKind::AdminAlert => "admin_alert",
            MailKind::Approval => "approval",
        })
    }
}

/// Site identity used in every template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteInfo {
    pub name: String,
    /// Base URL without trailing slash, e.g. `https://shop.example.com`.
    pub url: String,
}

impl SiteInfo {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            name: name.into(),
            url: url.trim_end_matches('/').to_string(),
        }
    }

    pub fn login_url(&self) -> String {
        format!("{}/login/", self.url)
    }
}

const WELCOME_SUBJECT: &str = "Welcome to {site}!";
const WELCOME_BODY: &str = "Hello {username},<br><br>Thank you for creating an account on {site}. \
Your username is <strong>{username}</strong>. You will be able to access your account area to view \
orders, change your password, and more at: <a href=\"{login_url}\">{login_url}</a> once the store \
administrator approves your account.";

const APPROVAL_SUBJECT: &str = "Your account has been approved";
const APPROVAL_HEADING: &str = "Account Approval";
const APPROVAL_BODY: &str = "Hello {display_name},<br><br>Your account on {site} has been approved. \
You can access your account area to view orders, change your password, and more at: \
<a href=\"{login_url}\">{login_url}</a>.";

const ADMIN_ALERT_SUBJECT: &str = "New user registered on {site}";
const ADMIN_ALERT_BODY: &str = "A new user has registered on {site}. User details:<br><br>\
Username: {username}<br>Email: {email}";

/// "Welcome, pending approval" email to a new customer.
pub fn welcome(t: &dyn Translator, site: &SiteInfo, customer: &UserProfile) -> MailMessage {
    let vars = vars(site, customer);
    let subject = fill(&t.translate(WELCOME_SUBJECT), &vars);
    let body = fill(&t.translate(WELCOME_BODY), &vars);
    MailMessage {
        to: customer.email.clone(),
        html_body: wrap_message(&subject, &body),
        subject: unescape_subject(subject),
    }
}

/// Sent once per false→true transition of the approval flag.
pub fn approval(t: &dyn Translator, site: &SiteInfo, customer: &UserProfile) -> MailMessage {
    let vars = vars(site, customer);
    let heading = t.translate(APPROVAL_HEADING);
    let body = fill(&t.translate(APPROVAL_BODY), &vars);
    MailMessage {
        to: customer.email.clone(),
        subject: t.translate(APPROVAL_SUBJECT).into_owned(),
        html_body: wrap_message(&escape_html(&heading), &body),
    }
}

/// "New registration" alert to the site administrator.
pub fn admin_alert(
    t: &dyn Translator,
    site: &SiteInfo,
    admin_email: &str,
    customer: &UserProfile,
) -> MailMessage {
    let vars = vars(site, customer);
    let subject = fill(&t.translate(ADMIN_ALERT_SUBJECT), &vars);
    MailMessage {
        to: admin_email.to_string(),
        subject: unescape_subject(subject),
        html_body: fill(&t.translate(ADMIN_ALERT_BODY), &vars),
    }
}

/// Shared HTML layout: heading above the message body.
pub fn wrap_message(heading: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html><body>\
<div class=\"email-container\"><h1>{heading}</h1><div class=\"email-body\">{body}</div></div>\
</body></html>"
    )
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn vars(site: &SiteInfo, customer: &UserProfile) -> [(&'static str, String); 5] {
    [
        ("site", escape_html(&site.name)),
        ("login_url", escape_html(&site.login_url())),
        ("username", escape_html(&customer.username)),
        ("display_name", escape_html(&customer.display_name)),
        ("email", escape_html(&customer.email)),
    ]
}

// Single pass, so values containing `{...}` are never expanded again.
fn fill(template: &str, vars: &[(&'static str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        let value = tail.find('}').and_then(|end| {
            let key = &tail[1..end];
            vars.iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (v, end))
        });
        match value {
            Some((v, end)) => {
                out.push_str(v);
                rest = &tail[end + 1..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

// Subjects are plain text headers; undo the escaping done for the HTML body.
fn unescape_subject(subject: String) -> String {
    subject
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
