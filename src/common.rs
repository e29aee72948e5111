//! Localisation support shared by the renderer and the binary.

use std::{borrow::Cow, collections::HashMap, path::Path, sync::LazyLock};

/// The bundled English dictionary, which is also the fallback for every other
/// language.
static MESSAGES_EN: LazyLock<Messages> = LazyLock::new(|| {
    Messages::from_json(include_str!("../res/i18n/en.json"))
        .expect("bundled en.json should be valid")
});

/// Bundled dictionaries by language code.
static BUNDLED: phf::Map<&'static str, &'static str> = phf::phf_map! {
    "en" => include_str!("../res/i18n/en.json"),
    "zh-hans" => include_str!("../res/i18n/zh-hans.json"),
};

/// A message dictionary loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The dictionary file could not be read.
    #[error("could not read messages: {0}")]
    Io(#[from] std::io::Error),

    /// The dictionary is not a JSON object of strings.
    #[error("invalid messages: {0}")]
    Json(#[from] serde_json::Error),
}

/// Resolves message keys to user-facing text.
pub trait Localizer {
    /// Returns the unescaped text for the message `key`.
    fn plain(&self, key: &str) -> Cow<'_, str>;

    /// Returns the text for the message `key`, HTML-escaped so it can be
    /// embedded in element content or a quoted attribute.
    fn escaped(&self, key: &str) -> String {
        escape(&self.plain(key)).into_owned()
    }
}

/// A flat message dictionary in the MediaWiki i18n JSON format.
#[derive(Clone, Debug, Default)]
pub struct Messages {
    /// Messages by lowercase key.
    messages: HashMap<String, String>,
    /// The dictionary to consult when a key is missing.
    fallback: Option<&'static Messages>,
}

impl Messages {
    /// Parses a dictionary from MediaWiki i18n JSON. Non-string values, like
    /// `@metadata`, are ignored.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let value = serde_json::from_str::<serde_json::Map<String, serde_json::Value>>(json)?;
        let messages = value
            .into_iter()
            .filter_map(|(key, value)| match value {
                serde_json::Value::String(value) => Some((key.to_lowercase(), value)),
                _ => None,
            })
            .collect();
        Ok(Self {
            messages,
            fallback: None,
        })
    }

    /// Loads a dictionary from a JSON file, falling back to English for any
    /// missing key.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        let mut messages = Self::from_json(&std::fs::read_to_string(path)?)?;
        messages.fallback = Some(&*MESSAGES_EN);
        Ok(messages)
    }

    /// Returns the bundled dictionary for the given language code, or English
    /// if there is no such dictionary.
    pub fn bundled(lang: &str) -> Self {
        let lang = lang.to_ascii_lowercase();
        match BUNDLED.get(lang.as_str()) {
            Some(json) if lang != "en" => match Self::from_json(json) {
                Ok(mut messages) => {
                    messages.fallback = Some(&*MESSAGES_EN);
                    messages
                }
                Err(err) => {
                    log::warn!("bundled dictionary '{lang}' is broken: {err}");
                    Self::english()
                }
            },
            Some(_) => Self::english(),
            None => {
                log::debug!("no dictionary for '{lang}', using English");
                Self::english()
            }
        }
    }

    /// Returns the bundled English dictionary.
    pub fn english() -> Self {
        MESSAGES_EN.clone()
    }

    /// Finds a message by key, without falling back to a placeholder.
    fn find(&self, key: &str) -> Option<&str> {
        self.messages
            .get(key)
            .map(String::as_str)
            .filter(|message| !matches!(*message, "" | "-"))
            .or_else(|| self.fallback.and_then(|fallback| fallback.find(key)))
    }
}

impl Localizer for Messages {
    fn plain(&self, key: &str) -> Cow<'_, str> {
        let key = key.to_lowercase();
        match self.find(&key) {
            Some(message) => Cow::Borrowed(message),
            None => Cow::Owned(format!("⧼{key}⧽")),
        }
    }
}

/// Escapes text for embedding in HTML element content or in a single- or
/// double-quoted attribute value.
#[inline]
pub fn escape(text: &str) -> Cow<'_, str> {
    html_escape::encode_quoted_attribute(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup() {
        let messages = Messages::english();
        assert_eq!(messages.plain("sm2shim-track"), "Track");
        assert_eq!(messages.plain("SM2Shim-Next"), "Next");
        assert_eq!(messages.plain("sm2shim-nope"), "⧼sm2shim-nope⧽");
        assert_eq!(messages.escaped("sm2shim-playpause"), "Play/Pause");
    }

    #[test]
    fn fallback() {
        let messages = Messages::bundled("zh-Hans");
        assert_eq!(messages.plain("sm2shim-track"), "音轨");

        let mut partial = Messages::from_json(r#"{ "sm2shim-next": "Weiter" }"#).unwrap();
        partial.fallback = Some(&*MESSAGES_EN);
        assert_eq!(partial.plain("sm2shim-next"), "Weiter");
        assert_eq!(partial.plain("sm2shim-menu"), "Menu");

        assert_eq!(Messages::bundled("xx").plain("sm2shim-menu"), "Menu");
    }

    #[test]
    fn escaping() {
        let messages = Messages::from_json(r#"{ "x": "<b>\"Tom & 'Jerry'\"</b>" }"#).unwrap();
        let escaped = messages.escaped("x");
        assert!(escaped.starts_with("&lt;b&gt;&quot;Tom &amp; "));
        assert!(escaped.ends_with("&quot;&lt;/b&gt;"));
        assert!(!escaped.contains('\''));
    }
}
