//! Respondent and administrator authentication settings.

use serde::{Deserialize, Serialize};

fn default_login_url() -> String {
    "https://treehole.pku.edu.cn/api/login/".to_string()
}

fn default_score_url() -> String {
    "https://treehole.pku.edu.cn/api/course/score".to_string()
}

const fn default_timeout_secs() -> u64 {
    15
}

/// Which verification scheme respondents go through. One per deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthMethod {
    /// Student ID + password checked against the upstream login API.
    #[default]
    Password,
    /// Email address + emailed PIN.
    EmailPin,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub method: AuthMethod,

    /// Upstream login endpoint (form POST of `uid` + `password`).
    #[serde(default = "default_login_url")]
    pub login_url: String,

    /// Upstream enrolled-course endpoint (bearer token GET).
    #[serde(default = "default_score_url")]
    pub score_url: String,

    /// Request timeout for upstream calls, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Student IDs allowed to respond. Empty allows everyone the upstream accepts.
    #[serde(default)]
    pub allowed_uids: Vec<String>,

    /// Student IDs allowed to use `opn admin`.
    #[serde(default)]
    pub admins: Vec<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            method: AuthMethod::default(),
            login_url: default_login_url(),
            score_url: default_score_url(),
            timeout_secs: default_timeout_secs(),
            allowed_uids: Vec::new(),
            admins: Vec::new(),
        }
    }
}
