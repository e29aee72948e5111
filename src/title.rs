//! Types and functions for parsing and normalising MediaWiki title strings.

use html_escape::decode_html_entities;
use std::borrow::Cow;

/// An article namespace.
#[derive(Debug, Eq)]
pub struct Namespace {
    /// The namespace ID.
    pub id: i32,
    /// The display name of the namespace.
    pub name: &'static str,
    /// Named aliases for the namespace.
    pub aliases: &'static [&'static str],
}

impl PartialEq for Namespace {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

/// The namespaces known to the shim. Only `File` and `Media` can hold audio,
/// but the others must be recognised so that e.g. `Help:Foo.mp3` is not
/// looked up as a file called 'Help:Foo.mp3'.
static NAMESPACES: &[Namespace] = &[
    Namespace {
        id: Namespace::MEDIA,
        name: "Media",
        aliases: &[],
    },
    Namespace {
        id: Namespace::SPECIAL,
        name: "Special",
        aliases: &[],
    },
    Namespace {
        id: Namespace::MAIN,
        name: "",
        aliases: &[],
    },
    Namespace {
        id: 1,
        name: "Talk",
        aliases: &[],
    },
    Namespace {
        id: 2,
        name: "User",
        aliases: &[],
    },
    Namespace {
        id: 4,
        name: "Project",
        aliases: &[],
    },
    Namespace {
        id: Namespace::FILE,
        name: "File",
        aliases: &["Image"],
    },
    Namespace {
        id: 8,
        name: "MediaWiki",
        aliases: &[],
    },
    Namespace {
        id: 10,
        name: "Template",
        aliases: &[],
    },
    Namespace {
        id: 12,
        name: "Help",
        aliases: &[],
    },
    Namespace {
        id: 14,
        name: "Category",
        aliases: &[],
    },
];

impl Namespace {
    /// The special namespace ID used for direct links to media files.
    pub const MEDIA: i32 = -2;
    /// The special namespace ID used for dynamic pages.
    pub const SPECIAL: i32 = -1;
    /// The main namespace ID.
    pub const MAIN: i32 = 0;
    /// The file namespace ID.
    pub const FILE: i32 = 6;

    /// Finds the namespace with the given case-insensitive name. Searches the
    /// name and all aliases.
    pub fn find_by_name(name: &str) -> Option<&'static Self> {
        let name = normalize(name);
        NAMESPACES.iter().find(|ns| {
            (!ns.name.is_empty() && ns.name.eq_ignore_ascii_case(&name))
                || ns
                    .aliases
                    .iter()
                    .any(|alias| alias.eq_ignore_ascii_case(&name))
        })
    }

    /// Returns the main namespace.
    pub fn main() -> &'static Self {
        &NAMESPACES[2]
    }

    /// Returns the file namespace.
    pub fn file() -> &'static Self {
        &NAMESPACES[6]
    }

    /// Returns true if titles in this namespace refer to uploaded media.
    #[inline]
    pub const fn is_media(&self) -> bool {
        self.id == Namespace::FILE || self.id == Namespace::MEDIA
    }
}

/// A normalised article title.
#[derive(Clone, Debug, Eq)]
pub struct Title {
    /// The namespace of the title.
    namespace: &'static Namespace,

    /// The location of the namespace delimiter in the title, if one exists.
    ///
    /// ```text
    /// Namespace:Title/Sub/Page
    ///          ^
    /// ```
    ns_delimiter: Option<usize>,

    /// The full title text.
    text: String,
}

impl PartialEq for Title {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Title {
    /// The longest allowed title, in bytes, excluding the namespace.
    const MAX_LEN: usize = 255;

    /// Creates a title from a known namespace plus already-validated text,
    /// capitalising the first letter.
    fn from_parts(namespace: &'static Namespace, title: &str) -> Self {
        let mut text = String::with_capacity(namespace.name.len() + 1 + title.len());

        let ns_delimiter = (!namespace.name.is_empty()).then(|| {
            text += namespace.name;
            let ns_delimiter = text.len();
            text.push(':');
            ns_delimiter
        });

        if let Some(first) = title.chars().next()
            && first.is_lowercase()
        {
            let rest = &title[first.len_utf8()..];
            text.extend(first.to_uppercase());
            text += rest;
        } else {
            text += title;
        }

        Self {
            namespace,
            ns_delimiter,
            text,
        }
    }

    /// Creates a new [`Title`] from user-supplied text, resolving any
    /// namespace prefix and using `default_ns` when there is none. Returns
    /// `None` if the text cannot form a valid title.
    ///
    /// In MediaWiki, this is like `newFromText`.
    pub fn new_from_text(text: &str, default_ns: &'static Namespace) -> Option<Self> {
        let text = normalize(text);

        // A leading colon forces the main namespace, but only when it is not
        // followed by another prefix.
        let (mut ns, text) = match text.strip_prefix(':') {
            Some(rest) => (Namespace::main(), rest.trim_start()),
            None => (default_ns, &*text),
        };

        let text = match text.split_once(':') {
            Some((lhs, rhs)) => match Namespace::find_by_name(lhs) {
                Some(found) => {
                    ns = found;
                    rhs.trim_start()
                }
                None => text,
            },
            None => text,
        };

        // Fragments are meaningless for files; MW drops them too.
        let text = text.split_once('#').map_or(text, |(text, _)| text.trim_end());

        is_valid(text).then(|| Self::from_parts(ns, text))
    }

    /// The title’s namespace object.
    pub fn namespace(&self) -> &'static Namespace {
        self.namespace
    }

    /// The path of the page, without the namespace.
    ///
    /// ```text
    /// Namespace:Title/Sub/Page
    ///           ^^^^^^^^^^^^^^
    /// ```
    pub fn text(&self) -> &str {
        let start_at = self.ns_delimiter.map_or(0, |d| d + 1);
        &self.text[start_at..]
    }

    /// The database key form of the page text, with spaces replaced by
    /// underscores.
    ///
    /// ```text
    /// Namespace:Title Sub/Page
    ///           ^^^^^^^^^^^^^^
    ///          (Title_Sub/Page)
    /// ```
    pub fn db_key(&self) -> Cow<'_, str> {
        let text = self.text();
        if text.contains(' ') {
            Cow::Owned(text.replace(' ', "_"))
        } else {
            Cow::Borrowed(text)
        }
    }

    /// The full text of the title, including the namespace.
    ///
    /// ```text
    /// Namespace:Title/Sub/Page
    /// ^^^^^^^^^^^^^^^^^^^^^^^^
    /// ```
    pub fn full_text(&self) -> &str {
        &self.text
    }

    /// Returns the same title moved into the given namespace.
    pub fn with_namespace(&self, namespace: &'static Namespace) -> Self {
        Self::from_parts(namespace, self.text())
    }
}

impl core::fmt::Display for Title {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.full_text())
    }
}

/// Returns true if the normalised title `text` is acceptable as a page name.
fn is_valid(text: &str) -> bool {
    !text.is_empty()
        && text.len() <= Title::MAX_LEN
        && !text.contains(|c: char| {
            matches!(c, '<' | '>' | '[' | ']' | '{' | '}' | '|') || c.is_control()
        })
        && !text.contains("~~~")
        && text != "."
        && text != ".."
        && !text.starts_with("./")
        && !text.starts_with("../")
        && !text.contains("/./")
        && !text.contains("/../")
        && !text.ends_with("/.")
        && !text.ends_with("/..")
}

/// Returns true if the given character `c` is a bidirectional text control
/// character.
fn bidi(c: char) -> bool {
    ('\u{200e}'..='\u{200f}').contains(&c) || ('\u{202a}'..='\u{202e}').contains(&c)
}

/// Normalises a title text part by decoding HTML entities and converting
/// runs of whitespace + underscore to a single space character.
pub fn normalize(text: &str) -> Cow<'_, str> {
    let decoded = decode_html_entities(text);
    let mut out = String::new();
    let mut flushed = 0;
    let mut iter = decoded.char_indices().peekable();

    while let Some((index, c)) = iter.next() {
        // Peek to avoid switching to owned-mode when encountering a single
        // space
        if trimmable(c) && (c != ' ' || matches!(iter.peek(), Some((_, c)) if trimmable(*c))) {
            // Non-space whitespace + underscores are converted to space and
            // runs of whitespace are collapsed into a single character
            while iter.next_if(|(_, c)| trimmable(*c)).is_some() {}

            // This acts like `trim`, not emitting a space at the start
            // (`index == 0`) or end (`peek().is_none()`) of the text.
            if let Some((next_index, _)) = iter.peek() {
                out += &decoded[flushed..index];
                flushed = *next_index;
                // Bidi markers get stripped because “Sometimes they slip
                // into cut-n-pasted page titles”
                if index != 0 && spacelike(c) {
                    out.push(' ');
                }
            }
        }
    }

    if flushed == 0 {
        match decoded {
            Cow::Borrowed(b) => Cow::Borrowed(b.trim_matches(trimmable)),
            Cow::Owned(o) => Cow::Owned(o.trim_matches(trimmable).to_string()),
        }
    } else {
        out += decoded[flushed..].trim_end_matches(trimmable);
        Cow::Owned(out)
    }
}

/// Returns true if the character `c` is considered like whitespace in title
/// text.
fn spacelike(c: char) -> bool {
    c == '_' || c.is_whitespace()
}

/// Returns true if the character `c` is trimmable in title text.
fn trimmable(c: char) -> bool {
    bidi(c) || spacelike(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        assert_eq!(super::normalize("A b"), Cow::Borrowed("A b"));
        assert_eq!(super::normalize("A_b"), "A b");
        assert_eq!(super::normalize("A__  __b"), "A b");
        assert_eq!(super::normalize("   A b   "), Cow::Borrowed("A b"));
        assert_eq!(super::normalize("\u{200e}A b   \u{202e}"), "A b");
    }

    #[test]
    fn file_titles() {
        let title = Title::new_from_text("foo_bar.mp3", Namespace::file()).unwrap();
        assert_eq!(title.full_text(), "File:Foo bar.mp3");
        assert_eq!(title.text(), "Foo bar.mp3");
        assert_eq!(title.db_key(), "Foo_bar.mp3");
        assert!(title.namespace().is_media());

        let title = Title::new_from_text("image:Song.ogg", Namespace::file()).unwrap();
        assert_eq!(title.full_text(), "File:Song.ogg");

        let title = Title::new_from_text("Media:Song.ogg", Namespace::file()).unwrap();
        assert_eq!(title.namespace().id, Namespace::MEDIA);
        assert_eq!(title.with_namespace(Namespace::file()).full_text(), "File:Song.ogg");

        let title = Title::new_from_text("Help:Song.ogg", Namespace::file()).unwrap();
        assert!(!title.namespace().is_media());

        let title = Title::new_from_text("Unknown:Song.ogg", Namespace::file()).unwrap();
        assert_eq!(title.full_text(), "File:Unknown:Song.ogg");
    }

    #[test]
    fn invalid_titles() {
        for text in ["", "   ", "__", "a<b.mp3", "a|b", "[x]", "..", "./a", "a/../b", "File:"] {
            assert!(
                Title::new_from_text(text, Namespace::file()).is_none(),
                "{text:?} should be rejected"
            );
        }
        assert!(Title::new_from_text(&"a".repeat(256), Namespace::file()).is_none());
    }
}
