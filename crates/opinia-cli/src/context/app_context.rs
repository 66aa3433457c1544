use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use opinia_auth::{
    Allowlist, LogMailer, Mailer, PasswordLogin, PinLogin, RelayMailer, UpstreamClient,
};
use opinia_config::OpiniaConfig;
use opinia_core::{CourseCatalog, DirectorySource, IdentityResolver};
use opinia_store::FileStore;
use opinia_survey::{PairSampler, SurveyService};

/// Shared application resources initialized once at startup.
pub struct AppContext {
    pub config: OpiniaConfig,
    pub catalog: Arc<CourseCatalog>,
    pub survey: SurveyService,
}

impl AppContext {
    /// Open the artifact store and catalog named by `config`.
    pub fn init(config: OpiniaConfig) -> anyhow::Result<Self> {
        config.survey.validate()?;

        let store = FileStore::open(&config.storage.data_dir).with_context(|| {
            format!(
                "failed to open data directory {}",
                config.storage.data_dir.display()
            )
        })?;
        let catalog = Arc::new(CourseCatalog::new(DirectorySource::new(
            config.catalog.dir.clone(),
        )));
        let sampler = PairSampler::new(config.survey.exploration_floor)?;
        let survey = SurveyService::new(Arc::new(store), Arc::clone(&catalog), sampler);

        Ok(Self {
            config,
            catalog,
            survey,
        })
    }

    /// Identifier resolution needs the full config, not just the catalog.
    pub fn resolver(&self) -> anyhow::Result<IdentityResolver> {
        self.config
            .validate()
            .context("configuration is incomplete")?;
        Ok(IdentityResolver::new(self.config.identity.salts.clone())?)
    }

    /// Password login gated by `allowlist`.
    pub fn password_login(&self, allowlist: Allowlist) -> anyhow::Result<PasswordLogin> {
        let auth = &self.config.auth;
        let client = UpstreamClient::new(
            auth.login_url.clone(),
            auth.score_url.clone(),
            Duration::from_secs(auth.timeout_secs),
        )?;
        Ok(PasswordLogin::new(client, allowlist))
    }

    /// Password login for survey respondents.
    pub fn respondent_login(&self) -> anyhow::Result<PasswordLogin> {
        self.password_login(Allowlist::respondents(
            self.config.auth.allowed_uids.iter().cloned(),
        ))
    }

    /// Password login for `opn admin`.
    pub fn admin_login(&self) -> anyhow::Result<PasswordLogin> {
        self.password_login(Allowlist::admins(self.config.auth.admins.iter().cloned()))
    }

    /// PIN issue/check, mailing through the relay when one is configured.
    pub fn pin_login(&self) -> anyhow::Result<PinLogin> {
        let pin = &self.config.pin;
        if !pin.is_configured() {
            anyhow::bail!("PIN salts are not configured (set pin.salts)");
        }
        let mailer: Arc<dyn Mailer> = if pin.has_relay() {
            Arc::new(RelayMailer::new(
                pin.relay_url.clone(),
                non_empty(&pin.relay_token),
                non_empty(&pin.sender),
            ))
        } else {
            tracing::warn!("pin.relay_url is not set; PIN mail will only be logged");
            Arc::new(LogMailer)
        };
        Ok(PinLogin::new(pin.salts.clone(), mailer, pin.subject.clone())?)
    }
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}
