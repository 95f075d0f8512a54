use crate::parsers::PageLink;
use crate::patterns::{LinkPattern, LinkPatternConfig, LinkPredicate};
use std::sync::Arc;

/// How a category page should be treated by the tree crawler
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageKind {
    /// The page links to further listings; recipe links on it are ignored
    Branch(Vec<String>),
    /// The page has no further listings; these are its recipe links
    Leaf(Vec<String>),
}

/// Both link groups of a page, each in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkPartition {
    /// Links to follow: sub-categories or pagination links
    pub follow: Vec<String>,
    pub recipes: Vec<String>,
}

/// Splits a page's anchors using site-specific predicates. Never fetches.
#[derive(Clone)]
pub struct LinkClassifier {
    follow: Arc<dyn LinkPredicate>,
    recipe: Arc<dyn LinkPredicate>,
}

impl std::fmt::Debug for LinkClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkClassifier").finish_non_exhaustive()
    }
}

impl LinkClassifier {
    pub fn new(follow: Arc<dyn LinkPredicate>, recipe: Arc<dyn LinkPredicate>) -> Self {
        Self { follow, recipe }
    }

    /// Builds a classifier from two declarative patterns
    pub fn from_patterns(
        follow: LinkPatternConfig,
        recipe: LinkPatternConfig,
    ) -> Result<Self, regex::Error> {
        Ok(Self::new(
            Arc::new(LinkPattern::new(follow)?),
            Arc::new(LinkPattern::new(recipe)?),
        ))
    }

    /// Returns follow and recipe links. An anchor may land in both groups.
    pub fn partition(&self, links: &[PageLink]) -> LinkPartition {
        let mut partition = LinkPartition::default();
        for link in links {
            if self.follow.matches(link) {
                partition.follow.push(link.href.clone());
            }
            if self.recipe.matches(link) {
                partition.recipes.push(link.href.clone());
            }
        }
        partition
    }

    /// Leaf status depends only on whether any follow link exists
    pub fn classify(&self, links: &[PageLink]) -> PageKind {
        let follow = links
            .iter()
            .filter(|l| self.follow.matches(l))
            .map(|l| l.href.clone())
            .collect::<Vec<_>>();

        if !follow.is_empty() {
            return PageKind::Branch(follow);
        }

        PageKind::Leaf(
            links
                .iter()
                .filter(|l| self.recipe.matches(l))
                .map(|l| l.href.clone())
                .collect(),
        )
    }
}
