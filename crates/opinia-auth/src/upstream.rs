//! Client for the upstream campus login and course-score API.
//!
//! ```text
//! POST {login_url}   form: uid, password
//!   200 {"success": true, "data": {"jwt": "..."}}
//! GET  {score_url}   Authorization: Bearer <jwt>
//!   200 {"success": true, "data": {"score": {"cjxx": [{"kcmc": "..."}]}}}
//! ```
//!
//! Any non-200 status or `success: false` is a rejection. Nothing is retried.

use std::time::Duration;

use serde::Deserialize;

use crate::error::AuthError;

/// Shown to respondents for every rejected login, whatever the cause.
pub(crate) const REJECTED_LOGIN: &str = "invalid account or password";

#[derive(Deserialize)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
}

#[derive(Deserialize)]
struct LoginData {
    jwt: String,
}

#[derive(Deserialize)]
struct ScoreData {
    score: ScoreTable,
}

#[derive(Deserialize)]
struct ScoreTable {
    #[serde(default)]
    cjxx: Vec<ScoreEntry>,
}

#[derive(Deserialize)]
struct ScoreEntry {
    kcmc: String,
}

#[derive(Debug, Clone)]
pub struct UpstreamClient {
    http: reqwest::Client,
    login_url: String,
    score_url: String,
}

impl UpstreamClient {
    /// # Errors
    ///
    /// Returns `AuthError::Transport` if the HTTP client cannot be built.
    pub fn new(
        login_url: impl Into<String>,
        score_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AuthError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            login_url: login_url.into(),
            score_url: score_url.into(),
        })
    }

    /// Check a student ID and password; returns the upstream bearer token.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` for non-200 answers or `success: false`,
    /// `AuthError::Transport` if the request cannot be made.
    pub async fn login(&self, uid: &str, password: &str) -> Result<String, AuthError> {
        let resp = self
            .http
            .post(&self.login_url)
            .form(&[("uid", uid), ("password", password)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            tracing::info!(status = status.as_u16(), "upstream login rejected");
            return Err(AuthError::Rejected(REJECTED_LOGIN.into()));
        }

        let envelope: Envelope<LoginData> = resp
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("parse login response: {e}")))?;
        match envelope {
            Envelope {
                success: true,
                data: Some(LoginData { jwt }),
            } if !jwt.is_empty() => Ok(jwt),
            _ => {
                tracing::info!("upstream login answered success=false");
                Err(AuthError::Rejected(REJECTED_LOGIN.into()))
            }
        }
    }

    /// Names of the courses the token holder has a score for.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Rejected` if the token is not accepted and
    /// `AuthError::Upstream` if the body has an unexpected shape.
    pub async fn fetch_enrolled_courses(&self, token: &str) -> Result<Vec<String>, AuthError> {
        let resp = self
            .http
            .get(&self.score_url)
            .bearer_auth(token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AuthError::Rejected(format!(
                "course lookup refused with status {status}"
            )));
        }

        let envelope: Envelope<ScoreData> = resp
            .json()
            .await
            .map_err(|e| AuthError::Upstream(format!("parse score response: {e}")))?;
        if !envelope.success {
            return Err(AuthError::Rejected("course lookup refused".into()));
        }
        let data = envelope
            .data
            .ok_or_else(|| AuthError::Upstream("score response missing 'data'".into()))?;

        Ok(data.score.cjxx.into_iter().map(|entry| entry.kcmc).collect())
    }
}
