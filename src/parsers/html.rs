use scraper::{ElementRef, Html, Selector};

/// Parsed HTML document that supports selector queries and subtree removal
pub struct Document {
    html: Html,
}

impl Document {
    /// Parses markup into a best-effort tree; malformed input never fails
    pub fn parse(markup: &str) -> Self {
        let html = Html::parse_document(markup);
        if !html.errors.is_empty() {
            ::log::trace!("HTML parser recovered from {} errors", html.errors.len());
        }
        Self { html }
    }

    /// All elements matching the selector, in document order
    pub fn select(&self, selector: &Selector) -> Vec<ElementRef<'_>> {
        self.html.select(selector).collect()
    }

    /// First element matching the selector
    pub fn first(&self, selector: &Selector) -> Option<ElementRef<'_>> {
        self.html.select(selector).next()
    }

    /// Attribute of the root `<html>` element
    pub fn root_attr(&self, name: &str) -> Option<&str> {
        self.html.root_element().value().attr(name)
    }

    /// Detaches every subtree matching any of the selectors, returning how many were removed
    pub fn remove_matching(&mut self, selectors: &[Selector]) -> usize {
        let ids: Vec<_> = selectors
            .iter()
            .flat_map(|selector| self.html.select(selector).map(|el| el.id()))
            .collect();

        let mut removed = 0;
        for id in ids {
            if let Some(mut node) = self.html.tree.get_mut(id) {
                node.detach();
                removed += 1;
            }
        }
        removed
    }

    /// Serializes the (possibly pruned) document
    pub fn html(&self) -> String {
        self.html.html()
    }
}
