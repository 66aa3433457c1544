use opinia_config::{AuthMethod, OpiniaConfig};

/// Emit warnings for likely mistyped env var keys that silently fell back to defaults.
pub fn warn_unconfigured(config: &OpiniaConfig) {
    for warning in collect_unconfigured_warnings(config, std::env::vars()) {
        tracing::warn!("{warning}");
    }
}

fn collect_unconfigured_warnings<I>(config: &OpiniaConfig, env: I) -> Vec<String>
where
    I: IntoIterator<Item = (String, String)>,
{
    let env_keys = env.into_iter().map(|(key, _)| key).collect::<Vec<_>>();

    let mut warnings = Vec::new();

    if !config.identity.is_configured() && has_env_prefix(&env_keys, "OPINIA_IDENTITY") {
        warnings.push(
            "Identity salts appear unset while OPINIA_IDENTITY* env vars exist. Use double underscores (example: OPINIA_IDENTITY__SALTS)."
                .to_string(),
        );
    }

    if !config.pin.is_configured() && has_env_prefix(&env_keys, "OPINIA_PIN") {
        warnings.push(
            "PIN salts appear unset while OPINIA_PIN* env vars exist. Use double underscores (example: OPINIA_PIN__SALTS)."
                .to_string(),
        );
    }

    if config.auth.method == AuthMethod::Password && config.pin.is_configured() {
        warnings.push(
            "pin.salts is set but auth.method is \"password\"; PIN login is not offered to respondents."
                .to_string(),
        );
    }

    warnings
}

fn has_env_prefix(keys: &[String], prefix: &str) -> bool {
    keys.iter().any(|key| key.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use opinia_config::{IdentityConfig, OpiniaConfig, PinConfig};

    use super::collect_unconfigured_warnings;

    #[test]
    fn warns_for_unconfigured_sections_with_env_prefixes() {
        let config = OpiniaConfig::default();
        let warnings = collect_unconfigured_warnings(
            &config,
            vec![
                ("OPINIA_IDENTITY_SALTS".to_string(), "[\"a\"]".to_string()),
                ("OPINIA_PIN_SALTS".to_string(), "[\"b\"]".to_string()),
            ],
        );

        assert_eq!(warnings.len(), 2);
    }

    #[test]
    fn does_not_warn_when_sections_are_configured() {
        let config = OpiniaConfig {
            identity: IdentityConfig {
                salts: vec!["a".to_string()],
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(
            &config,
            vec![(
                "OPINIA_IDENTITY__SALTS".to_string(),
                "[\"a\"]".to_string(),
            )],
        );

        assert!(warnings.is_empty());
    }

    #[test]
    fn warns_when_pin_salts_are_unused() {
        let config = OpiniaConfig {
            pin: PinConfig {
                salts: vec!["p".to_string()],
                ..Default::default()
            },
            ..Default::default()
        };

        let warnings = collect_unconfigured_warnings(&config, Vec::new());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("auth.method"));
    }
}
