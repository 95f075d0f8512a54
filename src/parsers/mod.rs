pub mod html;

/// An anchor element extracted from a listing page
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLink {
    /// Raw `href` attribute, exactly as written in the page
    pub href: String,
    /// Whitespace-separated tokens of the `class` attribute
    pub classes: Vec<String>,
    /// Normalized text content of the anchor
    pub text: String,
    /// Whether the anchor wraps an `<img>` element
    pub has_image: bool,
}

impl PageLink {
    /// Creates a link with only an href
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            ..Self::default()
        }
    }

    /// Adds class tokens, splitting on whitespace like the `class` attribute does
    pub fn with_class(mut self, class_attr: &str) -> Self {
        self.classes
            .extend(class_attr.split_whitespace().map(|s| s.to_string()));
        self
    }

    pub fn with_image(mut self) -> Self {
        self.has_image = true;
        self
    }

    /// True if `token` is one of the anchor's class tokens
    pub fn has_class(&self, token: &str) -> bool {
        self.classes.iter().any(|c| c == token)
    }
}
