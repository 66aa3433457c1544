//! Student ID + password scheme.

use crate::VerifiedCredential;
use crate::allowlist::Allowlist;
use crate::error::AuthError;
use crate::upstream::{REJECTED_LOGIN, UpstreamClient};

#[derive(Debug, Clone)]
pub struct PasswordLogin {
    client: UpstreamClient,
    allowlist: Allowlist,
}

impl PasswordLogin {
    #[must_use]
    pub const fn new(client: UpstreamClient, allowlist: Allowlist) -> Self {
        Self { client, allowlist }
    }

    /// Verify a student ID and password.
    ///
    /// IDs outside the allowlist get the same rejection as a wrong password
    /// and never reach the upstream.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidArgument` for blank input,
    /// `AuthError::Rejected` for refused credentials, or a transport error.
    pub async fn verify(&self, uid: &str, password: &str) -> Result<VerifiedCredential, AuthError> {
        let uid = uid.trim();
        if uid.is_empty() || password.is_empty() {
            return Err(AuthError::InvalidArgument(
                "student ID and password are both required".into(),
            ));
        }
        if !self.allowlist.permits(uid) {
            tracing::info!("login attempt for an ID outside the allowlist");
            return Err(AuthError::Rejected(REJECTED_LOGIN.into()));
        }

        let token = self.client.login(uid, password).await?;
        tracing::debug!("upstream login accepted");
        Ok(VerifiedCredential {
            subject: uid.to_string(),
            token: Some(token),
        })
    }

    /// Enrolled course names for a verified credential. Empty without a token.
    ///
    /// # Errors
    ///
    /// Propagates [`UpstreamClient::fetch_enrolled_courses`] failures.
    pub async fn enrolled_courses(
        &self,
        credential: &VerifiedCredential,
    ) -> Result<Vec<String>, AuthError> {
        match &credential.token {
            Some(token) => self.client.fetch_enrolled_courses(token).await,
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn login_for(server: &MockServer, allowlist: Allowlist) -> PasswordLogin {
        let client = UpstreamClient::new(
            format!("{}/api/login/", server.uri()),
            format!("{}/api/course/score", server.uri()),
            Duration::from_secs(5),
        )
        .expect("client builds");
        PasswordLogin::new(client, allowlist)
    }

    #[tokio::test]
    async fn id_outside_allowlist_never_reaches_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let login = login_for(&server, Allowlist::respondents(["2000012345"]));
        let err = login.verify("2000099999", "pw").await.unwrap_err();
        assert!(err.is_rejection());
        assert_eq!(err.to_string(), "authentication failed: invalid account or password");
    }

    #[tokio::test]
    async fn blank_input_is_invalid() {
        let server = MockServer::start().await;
        let login = login_for(&server, Allowlist::Anyone);
        assert!(matches!(
            login.verify("  ", "pw").await,
            Err(AuthError::InvalidArgument(_))
        ));
        assert!(matches!(
            login.verify("2000012345", "").await,
            Err(AuthError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn accepted_login_carries_token() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/login/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"jwt": "tok"}
            })))
            .mount(&server)
            .await;

        let login = login_for(&server, Allowlist::Anyone);
        let credential = login.verify(" 2000012345 ", "pw").await.unwrap();
        assert_eq!(credential.subject, "2000012345");
        assert_eq!(credential.token.as_deref(), Some("tok"));
        assert!(!format!("{credential:?}").contains("tok\""));
    }

    #[tokio::test]
    async fn no_token_means_no_enrolled_courses() {
        let server = MockServer::start().await;
        let login = login_for(&server, Allowlist::Anyone);
        let credential = VerifiedCredential {
            subject: "a@b.c".into(),
            token: None,
        };
        assert!(login.enrolled_courses(&credential).await.unwrap().is_empty());
    }
}
