use crate::commands::{CmdMessage, CmdResult, Setting, SprigPaths};
use crate::config::{ConfigKey, SprigConfig};
use crate::error::Result;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigAction {
    /// Every settable key plus the derived listen address and label URL base.
    ShowAll,
    Show(ConfigKey),
    Set(ConfigKey, String),
}

pub fn run(paths: &SprigPaths, action: ConfigAction) -> Result<CmdResult> {
    let mut config = SprigConfig::load(&paths.config_dir)?;

    match action {
        ConfigAction::ShowAll => {
            let mut settings: Vec<Setting> = ConfigKey::ALL
                .into_iter()
                .map(|key| setting(&config, key))
                .collect();
            settings.push(Setting {
                key: "listen-address".to_string(),
                value: config.bind.host().to_string(),
            });
            settings.push(Setting {
                key: "label-url".to_string(),
                value: config.label_base_url(),
            });
            settings.push(Setting {
                key: "optimizer".to_string(),
                value: if config.optimizer.api_key.is_some() {
                    "enabled".to_string()
                } else {
                    "disabled".to_string()
                },
            });
            Ok(CmdResult::default().with_settings(settings))
        }
        ConfigAction::Show(key) => Ok(CmdResult::default().with_settings(vec![setting(&config, key)])),
        ConfigAction::Set(key, value) => {
            config.set(key, &value)?;
            config.save(&paths.config_dir)?;
            let updated = setting(&config, key);
            info!(key = %updated.key, value = %updated.value, "config updated");

            let mut result = CmdResult::default();
            result.add_message(CmdMessage::success(format!(
                "{} set to {:?}",
                updated.key, updated.value
            )));
            Ok(result.with_settings(vec![updated]))
        }
    }
}

fn setting(config: &SprigConfig, key: ConfigKey) -> Setting {
    Setting {
        key: key.name().to_string(),
        value: config.get(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn paths() -> (TempDir, SprigPaths) {
        let dir = TempDir::new().unwrap();
        let paths = SprigPaths::from_home(dir.path());
        (dir, paths)
    }

    #[test]
    fn show_all_uses_defaults_without_a_file() {
        let (_dir, paths) = paths();
        let result = run(&paths, ConfigAction::ShowAll).unwrap();

        let port = result.settings.iter().find(|s| s.key == "port").unwrap();
        assert_eq!(port.value, "5000");
        let listen = result.settings.iter().find(|s| s.key == "listen-address").unwrap();
        assert_eq!(listen.value, "0.0.0.0");
        let url = result.settings.iter().find(|s| s.key == "label-url").unwrap();
        assert!(url.value.ends_with(":5000"));
        assert!(!url.value.contains("0.0.0.0"));
    }

    #[test]
    fn set_persists_and_show_reads_back() {
        let (_dir, paths) = paths();
        run(&paths, ConfigAction::Set(ConfigKey::Port, "8080".into())).unwrap();

        let result = run(&paths, ConfigAction::Show(ConfigKey::Port)).unwrap();
        assert_eq!(
            result.settings,
            vec![Setting {
                key: "port".into(),
                value: "8080".into()
            }]
        );
        assert_eq!(SprigConfig::load(&paths.config_dir).unwrap().port, 8080);
    }

    #[test]
    fn invalid_value_is_an_error_and_saves_nothing() {
        let (_dir, paths) = paths();
        assert!(run(&paths, ConfigAction::Set(ConfigKey::Port, "lots".into())).is_err());
        assert!(!paths.config_dir.join(crate::config::CONFIG_FILENAME).exists());
    }

    #[test]
    fn base_url_overrides_label_url() {
        let (_dir, paths) = paths();
        run(
            &paths,
            ConfigAction::Set(ConfigKey::BaseUrl, "https://plants.example".into()),
        )
        .unwrap();

        let result = run(&paths, ConfigAction::ShowAll).unwrap();
        let url = result.settings.iter().find(|s| s.key == "label-url").unwrap();
        assert_eq!(url.value, "https://plants.example");
    }
}
