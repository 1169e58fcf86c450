use crate::errors::ConfigError;
use crate::store::sheets::SheetTarget;
use std::{env, fmt, path::PathBuf};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REFRESH_SECS: u64 = 60;
const DEFAULT_DATA_PATH: &str = "data/moods.json";

#[derive(Clone)]
pub enum CredentialSource {
    KeyFile(PathBuf),
    KeyJson(String),
    AccessToken(String),
}

impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyFile(path) => f.debug_tuple("KeyFile").field(path).finish(),
            Self::KeyJson(_) => f.write_str("KeyJson(<redacted>)"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
        }
    }
}

#[derive(Debug, Clone)]
pub enum StoreBackend {
    Sheets {
        target: SheetTarget,
        credentials: CredentialSource,
    },
    File(PathBuf),
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub backend: StoreBackend,
    pub refresh_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let port = match var("PORT") {
            Some(value) => value
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidValue { name: "PORT", value })?,
            None => DEFAULT_PORT,
        };

        let refresh_secs = match var("MOOD_REFRESH_SECS") {
            Some(value) => match value.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "MOOD_REFRESH_SECS",
                        value,
                    });
                }
            },
            None => DEFAULT_REFRESH_SECS,
        };

        let sheet = var("MOOD_SHEET_ID")
            .map(SheetTarget::Id)
            .or_else(|| var("MOOD_SHEET_NAME").map(SheetTarget::Name));

        let kind = var("MOOD_STORE").map(|kind| kind.to_lowercase());
        let backend = match kind.as_deref() {
            Some("sheets") => sheets_backend(sheet, &var)?,
            None if sheet.is_some() => sheets_backend(sheet, &var)?,
            Some("file") | None => StoreBackend::File(
                var("MOOD_DATA_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH)),
            ),
            Some("memory") => StoreBackend::Memory,
            Some(other) => return Err(ConfigError::UnknownBackend(other.to_string())),
        };

        Ok(Self {
            port,
            backend,
            refresh_secs,
        })
    }
}

fn sheets_backend(
    sheet: Option<SheetTarget>,
    var: &impl Fn(&str) -> Option<String>,
) -> Result<StoreBackend, ConfigError> {
    let target = sheet.ok_or(ConfigError::MissingSheet)?;
    let credentials = var("MOOD_SERVICE_ACCOUNT_JSON")
        .map(CredentialSource::KeyJson)
        .or_else(|| var("GOOGLE_APPLICATION_CREDENTIALS").map(|p| CredentialSource::KeyFile(p.into())))
        .or_else(|| var("MOOD_ACCESS_TOKEN").map(CredentialSource::AccessToken))
        .ok_or(ConfigError::MissingCredentials)?;
    Ok(StoreBackend::Sheets {
        target,
        credentials,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_to_local_file() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.refresh_secs, 60);
        assert!(matches!(cfg.backend, StoreBackend::File(ref p) if p == &PathBuf::from("data/moods.json")));
    }

    #[test]
    fn sheet_settings_select_sheets_backend() {
        let cfg = config(&[
            ("MOOD_SHEET_NAME", "Mood of the Queue"),
            ("GOOGLE_APPLICATION_CREDENTIALS", "/secrets/key.json"),
        ])
        .unwrap();
        match cfg.backend {
            StoreBackend::Sheets {
                target,
                credentials: CredentialSource::KeyFile(path),
            } => {
                assert_eq!(target, SheetTarget::Name("Mood of the Queue".to_string()));
                assert_eq!(path, PathBuf::from("/secrets/key.json"));
            }
            other => panic!("unexpected backend {other:?}"),
        }
    }

    #[test]
    fn sheet_id_wins_over_name() {
        let cfg = config(&[
            ("MOOD_SHEET_ID", "abc"),
            ("MOOD_SHEET_NAME", "ignored"),
            ("MOOD_ACCESS_TOKEN", "tok"),
        ])
        .unwrap();
        assert!(matches!(
            cfg.backend,
            StoreBackend::Sheets { target: SheetTarget::Id(ref id), .. } if id == "abc"
        ));
    }

    #[test]
    fn sheets_without_credentials_fails() {
        let err = config(&[("MOOD_STORE", "sheets"), ("MOOD_SHEET_ID", "abc")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredentials));

        let err = config(&[("MOOD_STORE", "sheets")]).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSheet));
    }

    #[test]
    fn explicit_file_backend_overrides_sheet() {
        let cfg = config(&[
            ("MOOD_STORE", "file"),
            ("MOOD_SHEET_ID", "abc"),
            ("MOOD_DATA_PATH", "/tmp/m.json"),
        ])
        .unwrap();
        assert!(matches!(cfg.backend, StoreBackend::File(ref p) if p == &PathBuf::from("/tmp/m.json")));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            config(&[("PORT", "eighty")]),
            Err(ConfigError::InvalidValue { name: "PORT", .. })
        ));
        assert!(matches!(
            config(&[("MOOD_REFRESH_SECS", "0")]),
            Err(ConfigError::InvalidValue { name: "MOOD_REFRESH_SECS", .. })
        ));
        assert!(matches!(
            config(&[("MOOD_STORE", "postgres")]),
            Err(ConfigError::UnknownBackend(_))
        ));
    }

    #[test]
    fn debug_output_hides_secrets() {
        let shown = format!("{:?}", CredentialSource::AccessToken("secret".to_string()));
        assert!(!shown.contains("secret"));
    }
}
