//! Media file repositories.

use crate::title::{Namespace, Title};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;
use std::{borrow::Cow, collections::HashSet, path::Path};

/// Characters which are left alone when building a file URL path, like
/// PHP `rawurlencode`.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// A repository loading error.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The manifest could not be read.
    #[error("could not read file manifest: {0}")]
    Io(#[from] std::io::Error),

    /// The manifest is not valid JSON, or has the wrong shape.
    #[error("invalid file manifest: {0}")]
    Json(#[from] serde_json::Error),
}

/// An uploaded media file.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct File {
    /// The canonical title of the file, in the file namespace.
    pub title: Title,
    /// The public URL of the file.
    pub url: String,
}

impl File {
    /// The database key of the file, used for dependency tracking.
    #[inline]
    pub fn db_key(&self) -> Cow<'_, str> {
        self.title.db_key()
    }
}

/// A source of uploaded media files.
pub trait FileRepo {
    /// Finds the file with the given title. Titles outside of the file and
    /// media namespaces never match.
    ///
    /// In MediaWiki, this is like `wfFindFile`.
    fn find_file(&self, title: &Title) -> Option<File>;
}

/// The on-disk form of a [`LocalRepo`].
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Manifest {
    /// The URL prefix for all files.
    base_url: String,
    /// The names of all files in the repository, with or without a namespace
    /// prefix.
    files: Vec<String>,
}

/// A repository whose contents are known up front and whose files are all
/// served from one base URL.
#[derive(Debug, Default)]
pub struct LocalRepo {
    /// The URL prefix for all files, without a trailing slash.
    base_url: String,
    /// The normalised text of every file title.
    files: HashSet<String>,
}

impl LocalRepo {
    /// Creates a repository containing the given files.
    pub fn new<I, S>(base_url: &str, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let files = files
            .into_iter()
            .filter_map(|name| {
                let title = Title::new_from_text(name.as_ref(), Namespace::file());
                if title.is_none() {
                    log::warn!("ignoring invalid file name '{}'", name.as_ref());
                }
                title
            })
            .filter(|title| title.namespace().is_media())
            .map(|title| title.text().to_string())
            .collect();

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            files,
        }
    }

    /// Parses a repository from a JSON manifest.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let manifest = serde_json::from_str::<Manifest>(json)?;
        Ok(Self::new(&manifest.base_url, manifest.files))
    }

    /// Loads a repository from a JSON manifest file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, Error> {
        Self::from_json(&std::fs::read_to_string(path)?)
    }

    /// The number of files in the repository.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Returns true if the repository has no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl FileRepo for LocalRepo {
    fn find_file(&self, title: &Title) -> Option<File> {
        if !title.namespace().is_media() || !self.files.contains(title.text()) {
            return None;
        }

        let title = title.with_namespace(Namespace::file());
        let url = format!(
            "{}/{}",
            self.base_url,
            utf8_percent_encode(&title.db_key(), PATH_SEGMENT)
        );
        Some(File { title, url })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn title(text: &str) -> Title {
        Title::new_from_text(text, Namespace::file()).unwrap()
    }

    #[test]
    fn find() {
        let repo = LocalRepo::new(
            "https://example.com/images/",
            ["Foo bar.mp3", "File:Ünï.ogg", "Live (1999), take~2!.mp3"],
        );
        assert_eq!(repo.len(), 3);

        let file = repo.find_file(&title("foo_bar.mp3")).unwrap();
        assert_eq!(file.title.full_text(), "File:Foo bar.mp3");
        assert_eq!(file.db_key(), "Foo_bar.mp3");
        assert_eq!(file.url, "https://example.com/images/Foo_bar.mp3");

        let file = repo.find_file(&title("Media:Ünï.ogg")).unwrap();
        assert_eq!(file.title.full_text(), "File:Ünï.ogg");
        assert_eq!(file.url, "https://example.com/images/%C3%9Cn%C3%AF.ogg");

        let file = repo.find_file(&title("Live (1999), take~2!.mp3")).unwrap();
        assert_eq!(
            file.url,
            "https://example.com/images/Live_%281999%29%2C_take~2%21.mp3"
        );

        assert!(repo.find_file(&title("Missing.mp3")).is_none());
        assert!(repo.find_file(&title("Help:Foo bar.mp3")).is_none());
    }

    #[test]
    fn manifest() {
        let repo = LocalRepo::from_json(
            r#"{ "base_url": "/images", "files": ["A.mp3", "bad|name.mp3", "Help:B.mp3"] }"#,
        )
        .unwrap();
        assert_eq!(repo.len(), 1);
        assert!(LocalRepo::from_json(r#"{ "files": [] }"#).is_err());
    }
}
