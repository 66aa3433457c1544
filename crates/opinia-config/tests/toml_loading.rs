//! Project-level TOML files flow through the figment chain.

use std::path::PathBuf;

use figment::Jail;
use opinia_config::{AuthMethod, OpiniaConfig};
use pretty_assertions::assert_eq;

fn write_project_config(jail: &Jail, contents: &str) {
    let dir = jail.directory().join(".opinia");
    std::fs::create_dir_all(&dir).expect("mkdir .opinia");
    std::fs::write(dir.join("config.toml"), contents).expect("write config.toml");
}

#[test]
fn project_config_sets_sections() {
    Jail::expect_with(|jail| {
        write_project_config(
            jail,
            r#"
            [storage]
            data_dir = "/srv/opinia/data"

            [catalog]
            dir = "/srv/opinia/static"

            [identity]
            salts = ["b", "a"]

            [auth]
            method = "email_pin"
            admins = ["1900011111"]

            [pin]
            salts = ["pin-salt"]

            [survey]
            exploration_floor = 0.25
            "#,
        );

        let config = OpiniaConfig::load().expect("config loads");
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/opinia/data"));
        assert_eq!(config.catalog.dir, PathBuf::from("/srv/opinia/static"));
        assert_eq!(config.identity.salts, vec!["b", "a"]);
        assert_eq!(config.auth.method, AuthMethod::EmailPin);
        assert_eq!(config.auth.admins, vec!["1900011111"]);
        assert!(config.auth.allowed_uids.is_empty());
        assert!((config.survey.exploration_floor - 0.25).abs() < f64::EPSILON);
        config.validate().expect("valid");
        Ok(())
    });
}

#[test]
fn missing_sections_fall_back_to_defaults() {
    Jail::expect_with(|jail| {
        write_project_config(jail, "[identity]\nsalts = [\"only\"]\n");

        let config = OpiniaConfig::load().expect("config loads");
        assert_eq!(config.storage.data_dir, PathBuf::from("data"));
        assert_eq!(config.auth.method, AuthMethod::Password);
        assert!(config.auth.login_url.starts_with("https://"));
        assert!(config.survey.seed_from_enrolled);
        Ok(())
    });
}

#[test]
fn malformed_toml_is_an_error() {
    Jail::expect_with(|jail| {
        write_project_config(jail, "[survey\nexploration_floor = ");
        assert!(OpiniaConfig::load().is_err());
        Ok(())
    });
}
