use crate::domain::interface::ITranslator;
use crate::error::*;
use serde_json::Value;

const EN: &str = include_str!("../../locales/en.json");
const ES: &str = include_str!("../../locales/es.json");

#[derive(Debug)]
pub enum LocaleError {
    UnsupportedLocale,
    InvalidCatalog,
}

impl IServiceError for LocaleError {
    fn error_type(&self) -> String {
        use LocaleError::*;

        match self {
            UnsupportedLocale => "unsupported_locale",
            InvalidCatalog => "invalid_catalog",
        }
        .to_string()
    }
}

/// Message catalog keyed by dotted paths, e.g. `errors.user.userNotExists`.
#[derive(Debug, Clone)]
pub struct JsonCatalog {
    messages: Value,
}

impl JsonCatalog {
    /// One of the catalogs shipped with the binary.
    pub fn builtin(locale: &str) -> Result<Self> {
        match locale {
            "en" => Self::from_json(EN),
            "es" => Self::from_json(ES),
            other => Err(ServiceError::new(
                LocaleError::UnsupportedLocale,
                anyhow::anyhow!("no message catalog for locale {:?}", other),
            )),
        }
    }

    pub fn from_json(source: &str) -> Result<Self> {
        let messages = serde_json::from_str(source)
            .map_err(|err| ServiceError::new(LocaleError::InvalidCatalog, err))?;
        Ok(JsonCatalog { messages })
    }
}

impl ITranslator for JsonCatalog {
    fn translate(&self, key: &str) -> String {
        key.split('.')
            .try_fold(&self.messages, |node, segment| node.get(segment))
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| {
                tracing::warn!(key, "missing translation");
                key.to_string()
            })
    }
}
