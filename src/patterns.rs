use crate::parsers::PageLink;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Something that decides whether an anchor belongs to a link category
pub trait LinkPredicate: Send + Sync {
    fn matches(&self, link: &PageLink) -> bool;
}

impl<F> LinkPredicate for F
where
    F: Fn(&PageLink) -> bool + Send + Sync,
{
    fn matches(&self, link: &PageLink) -> bool {
        self(link)
    }
}

/// Declarative description of a site-specific link predicate.
///
/// Every condition that is set must hold; an empty config matches any anchor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkPatternConfig {
    /// Substrings that must all appear in the href
    #[serde(default)]
    pub href_contains: Vec<String>,

    /// Substrings that must not appear in the href
    #[serde(default)]
    pub href_excludes: Vec<String>,

    /// Required href prefix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href_prefix: Option<String>,

    /// Regex the href must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub href_regex: Option<String>,

    /// Token that must be present in the anchor's class list
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub class_token: Option<String>,

    /// Whether the anchor must wrap an image
    #[serde(default)]
    pub requires_image: bool,
}

impl LinkPatternConfig {
    pub fn containing<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            href_contains: parts.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn excluding(mut self, part: impl Into<String>) -> Self {
        self.href_excludes.push(part.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.href_prefix = Some(prefix.into());
        self
    }

    pub fn with_class(mut self, token: impl Into<String>) -> Self {
        self.class_token = Some(token.into());
        self
    }

    pub fn with_image(mut self) -> Self {
        self.requires_image = true;
        self
    }
}

/// Compiled form of a [`LinkPatternConfig`]
#[derive(Debug, Clone)]
pub struct LinkPattern {
    config: LinkPatternConfig,
    href_regex: Option<Regex>,
}

impl LinkPattern {
    pub fn new(config: LinkPatternConfig) -> Result<Self, regex::Error> {
        let href_regex = match &config.href_regex {
            Some(pattern) => Some(Regex::new(pattern)?),
            None => None,
        };
        Ok(Self { config, href_regex })
    }

    fn href_matches(&self, href: &str) -> bool {
        if !self.config.href_contains.iter().all(|p| href.contains(p)) {
            return false;
        }
        if self.config.href_excludes.iter().any(|p| href.contains(p)) {
            return false;
        }
        if let Some(prefix) = &self.config.href_prefix {
            if !href.starts_with(prefix) {
                return false;
            }
        }
        match &self.href_regex {
            Some(regex) => regex.is_match(href),
            None => true,
        }
    }
}

impl LinkPredicate for LinkPattern {
    fn matches(&self, link: &PageLink) -> bool {
        if let Some(token) = &self.config.class_token {
            if !link.has_class(token) {
                return false;
            }
        }
        if self.config.requires_image && !link.has_image {
            return false;
        }
        self.href_matches(&link.href)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(config: LinkPatternConfig) -> LinkPattern {
        LinkPattern::new(config).unwrap()
    }

    #[test]
    fn test_empty_pattern_matches_everything() {
        let p = pattern(LinkPatternConfig::default());
        assert!(p.matches(&PageLink::new("/anything")));
        assert!(p.matches(&PageLink::new("")));
    }

    #[test]
    fn test_contains_and_excludes() {
        let p = pattern(LinkPatternConfig::containing(["/recipes/"]).excluding("/recipes-a-z/"));

        assert!(p.matches(&PageLink::new("https://site.test/recipes/pie")));
        assert!(!p.matches(&PageLink::new("https://site.test/recipes/recipes-a-z/b")));
        assert!(!p.matches(&PageLink::new("https://site.test/about")));
    }

    #[test]
    fn test_all_substrings_required() {
        let p = pattern(LinkPatternConfig::containing(["/recipes-a-z/", "/p/"]));

        assert!(p.matches(&PageLink::new("/recipes/recipes-a-z/a/p/2")));
        assert!(!p.matches(&PageLink::new("/recipes/recipes-a-z/a")));
    }

    #[test]
    fn test_class_token_is_exact() {
        let p = pattern(LinkPatternConfig::containing(["/recipes/"]).with_class("taxonomy-nodes__link"));

        let tagged = PageLink::new("/recipes/desserts").with_class("link taxonomy-nodes__link");
        assert!(p.matches(&tagged));

        // Substring of a token is not a token
        let lookalike = PageLink::new("/recipes/desserts").with_class("taxonomy-nodes__link--big");
        assert!(!p.matches(&lookalike));

        let untagged = PageLink::new("/recipes/desserts");
        assert!(!p.matches(&untagged));
    }

    #[test]
    fn test_prefix_and_image() {
        let p = pattern(
            LinkPatternConfig::default()
                .with_prefix("https://www.budgetbytes.com/")
                .with_image(),
        );

        let card = PageLink::new("https://www.budgetbytes.com/pie/").with_image();
        assert!(p.matches(&card));

        let text_link = PageLink::new("https://www.budgetbytes.com/pie/");
        assert!(!p.matches(&text_link));

        let offsite = PageLink::new("https://example.com/pie/").with_image();
        assert!(!p.matches(&offsite));
    }

    #[test]
    fn test_href_regex() {
        let p = pattern(LinkPatternConfig {
            href_regex: Some(r"/p/[0-9]+$".to_string()),
            ..LinkPatternConfig::default()
        });
        assert!(p.matches(&PageLink::new("/list/p/3")));
        assert!(!p.matches(&PageLink::new("/list/p/next")));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let config = LinkPatternConfig {
            href_regex: Some("(unclosed".to_string()),
            ..LinkPatternConfig::default()
        };
        assert!(LinkPattern::new(config).is_err());
    }

    #[test]
    fn test_closure_predicate() {
        let p = |link: &PageLink| link.text == "Next";
        let mut link = PageLink::new("/p/2");
        assert!(!p.matches(&link));
        link.text = "Next".to_string();
        assert!(LinkPredicate::matches(&p, &link));
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{"href_contains": ["/recipe/"], "class_token": "card"}"#;
        let config: LinkPatternConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.href_contains, vec!["/recipe/"]);
        assert_eq!(config.class_token.as_deref(), Some("card"));
        assert!(!config.requires_image);
    }
}
