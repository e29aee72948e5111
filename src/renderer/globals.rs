//! Collections for page-level data produced by tags.

use indexmap::IndexSet;
use serde::Serialize;

/// Everything a page learns about itself while its tags render.
///
/// All collections keep insertion order and ignore duplicates, so a page with
/// five players using the same CDN assets injects them once.
#[derive(Debug, Default, Serialize)]
pub struct ParserOutput {
    /// External URLs referenced by the page.
    external_links: IndexSet<String>,
    /// Database keys of the files used by the page.
    images: IndexSet<String>,
    /// Titles of internal pages linked by the page.
    links: IndexSet<String>,
    /// Resource loader modules whose scripts the page needs.
    modules: IndexSet<String>,
    /// Resource loader modules whose styles the page needs.
    module_styles: IndexSet<String>,
    /// Raw HTML to inject into the page `<head>`.
    head_items: IndexSet<String>,
}

impl ParserOutput {
    /// Records a reference to an external URL.
    pub fn add_external_link(&mut self, url: &str) {
        self.external_links.insert(url.to_string());
    }

    /// Records that the page uses the file with the given database key.
    pub fn add_image(&mut self, db_key: &str) {
        self.images.insert(db_key.to_string());
    }

    /// Records a link to an internal page.
    pub fn add_link(&mut self, title: &str) {
        self.links.insert(title.to_string());
    }

    /// Requests the scripts of a resource loader module.
    pub fn add_modules(&mut self, name: &str) {
        self.modules.insert(name.to_string());
    }

    /// Requests the styles of a resource loader module.
    pub fn add_module_styles(&mut self, name: &str) {
        self.module_styles.insert(name.to_string());
    }

    /// Adds raw HTML to the page head.
    pub fn add_head_item(&mut self, html: &str) {
        self.head_items.insert(html.to_string());
    }

    /// External URLs referenced by the page, in first-use order.
    pub fn external_links(&self) -> impl Iterator<Item = &str> {
        self.external_links.iter().map(String::as_str)
    }

    /// Database keys of the files used by the page, in first-use order.
    pub fn images(&self) -> impl Iterator<Item = &str> {
        self.images.iter().map(String::as_str)
    }

    /// Titles of internal pages linked by the page, in first-use order.
    pub fn links(&self) -> impl Iterator<Item = &str> {
        self.links.iter().map(String::as_str)
    }

    /// Resource loader modules whose scripts the page needs.
    pub fn modules(&self) -> impl Iterator<Item = &str> {
        self.modules.iter().map(String::as_str)
    }

    /// Resource loader modules whose styles the page needs.
    pub fn module_styles(&self) -> impl Iterator<Item = &str> {
        self.module_styles.iter().map(String::as_str)
    }

    /// Raw HTML for the page head.
    pub fn head_items(&self) -> impl Iterator<Item = &str> {
        self.head_items.iter().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deduplicates_in_order() {
        let mut output = ParserOutput::default();
        output.add_external_link("http://b");
        output.add_external_link("http://a");
        output.add_external_link("http://b");
        assert_eq!(output.external_links().collect::<Vec<_>>(), ["http://b", "http://a"]);

        output.add_head_item("<x>");
        output.add_head_item("<x>");
        assert_eq!(output.head_items().count(), 1);
    }
}
