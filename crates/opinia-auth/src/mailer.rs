//! Outbound mail for the email-PIN scheme.

use async_trait::async_trait;
use serde::Serialize;

use crate::error::AuthError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Delivers a single message. Delivery is fire-once; callers decide whether
/// to offer a resend.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthError>;
}

/// Posts messages as JSON to an HTTP mail relay.
#[derive(Debug, Clone)]
pub struct RelayMailer {
    http: reqwest::Client,
    url: String,
    token: Option<String>,
    sender: Option<String>,
}

#[derive(Serialize)]
struct RelayPayload<'a> {
    #[serde(flatten)]
    message: &'a MailMessage,
    #[serde(skip_serializing_if = "Option::is_none")]
    from: Option<&'a str>,
}

impl RelayMailer {
    #[must_use]
    pub fn new(url: impl Into<String>, token: Option<String>, sender: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: url.into(),
            token,
            sender,
        }
    }
}

#[async_trait]
impl Mailer for RelayMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthError> {
        let payload = RelayPayload {
            message,
            from: self.sender.as_deref(),
        };
        let mut request = self.http.post(&self.url).json(&payload);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(AuthError::Mail(format!("relay returned {status}: {body}")));
        }
        tracing::debug!(to = %message.to, "verification mail handed to relay");
        Ok(())
    }
}

/// Writes messages to the log instead of sending them. For local runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &MailMessage) -> Result<(), AuthError> {
        tracing::info!(
            to = %message.to,
            subject = %message.subject,
            body = %message.body,
            "mail relay not configured; message logged only"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn message() -> MailMessage {
        MailMessage {
            to: "alice@example.edu".into(),
            subject: "code".into(),
            body: "123456".into(),
        }
    }

    #[tokio::test]
    async fn relay_posts_json_with_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/send"))
            .and(header("authorization", "Bearer secret"))
            .and(body_json(json!({
                "to": "alice@example.edu",
                "subject": "code",
                "body": "123456",
                "from": "noreply@example.edu"
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let mailer = RelayMailer::new(
            format!("{}/send", server.uri()),
            Some("secret".into()),
            Some("noreply@example.edu".into()),
        );
        mailer.send(&message()).await.unwrap();
    }

    #[tokio::test]
    async fn relay_failure_is_mail_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let mailer = RelayMailer::new(server.uri(), None, None);
        let err = mailer.send(&message()).await.unwrap_err();
        assert!(matches!(err, AuthError::Mail(ref m) if m.contains("down")));
    }

    #[tokio::test]
    async fn log_mailer_always_succeeds() {
        LogMailer.send(&message()).await.unwrap();
    }
}
