use crate::classifier::LinkClassifier;
use crate::crawlers::{CategoryTreeCrawler, Crawler, PaginatedListCrawler};
use crate::errors::CrawlError;
use crate::patterns::LinkPatternConfig;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

/// How a site's recipe catalogue is discovered
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    /// Recursive walk over taxonomy pages
    CategoryTree {
        seed_url: String,
        category: LinkPatternConfig,
        recipe: LinkPatternConfig,
    },
    /// Sequential walk over numbered listing pages
    Paginated {
        url_template: String,
        #[serde(default)]
        partitions: Vec<String>,
        page_pattern: String,
        pagination: LinkPatternConfig,
        recipe: LinkPatternConfig,
    },
}

/// A site the crawler knows how to enumerate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub name: String,
    /// Base for resolving site-relative links in the output
    pub base_url: String,
    #[serde(flatten)]
    pub strategy: Strategy,
}

impl SiteConfig {
    /// Builds the crawler for this site
    pub fn crawler(&self, max_concurrency: usize) -> Result<Box<dyn Crawler>, CrawlError> {
        match &self.strategy {
            Strategy::CategoryTree {
                seed_url,
                category,
                recipe,
            } => {
                let classifier = LinkClassifier::from_patterns(category.clone(), recipe.clone())?;
                Ok(Box::new(
                    CategoryTreeCrawler::new(seed_url.clone(), classifier)
                        .with_max_concurrency(max_concurrency),
                ))
            }
            Strategy::Paginated {
                url_template,
                partitions,
                page_pattern,
                pagination,
                recipe,
            } => {
                let classifier =
                    LinkClassifier::from_patterns(pagination.clone(), recipe.clone())?;
                Ok(Box::new(
                    PaginatedListCrawler::new(
                        url_template.clone(),
                        partitions.clone(),
                        page_pattern,
                        classifier,
                    )?
                    .with_max_concurrency(max_concurrency),
                ))
            }
        }
    }

    /// Checks patterns and templates without crawling
    pub fn validate(&self) -> Result<(), CrawlError> {
        Url::parse(&self.base_url)
            .map_err(|e| CrawlError::Config(format!("{}: base_url: {}", self.name, e)))?;
        self.crawler(1).map(|_| ())
    }

    /// True if `host` is this site's host or a subdomain of it
    pub fn serves_host(&self, host: &str) -> bool {
        let Some(own) = Url::parse(&self.base_url)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        else {
            return false;
        };
        host == own || host.ends_with(&format!(".{}", own))
    }
}

/// Sites with a built-in definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    AllRecipes,
    FoodAndWine,
    FoodNetwork,
    BudgetBytes,
}

impl Site {
    pub const ALL: [Site; 4] = [
        Site::AllRecipes,
        Site::FoodAndWine,
        Site::FoodNetwork,
        Site::BudgetBytes,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Site::AllRecipes => "allrecipes",
            Site::FoodAndWine => "foodandwine",
            Site::FoodNetwork => "foodnetwork",
            Site::BudgetBytes => "budgetbytes",
        }
    }

    /// Finds the built-in site serving `url`'s host
    pub fn from_url(url: &str) -> Option<Site> {
        let host = Url::parse(url).ok()?.host_str()?.to_string();
        Site::ALL
            .into_iter()
            .find(|site| site.config().serves_host(&host))
    }

    pub fn config(&self) -> SiteConfig {
        match self {
            Site::AllRecipes => SiteConfig {
                name: self.name().to_string(),
                base_url: "https://www.allrecipes.com/".to_string(),
                strategy: Strategy::CategoryTree {
                    seed_url: "https://www.allrecipes.com/recipes/".to_string(),
                    category: LinkPatternConfig::containing(["/recipes/"])
                        .with_class("taxonomy-nodes__link"),
                    recipe: LinkPatternConfig::containing(["/recipe/"])
                        .with_class("mntl-card-list-items"),
                },
            },
            Site::FoodAndWine => SiteConfig {
                name: self.name().to_string(),
                base_url: "https://www.foodandwine.com/".to_string(),
                strategy: Strategy::CategoryTree {
                    seed_url: "https://www.foodandwine.com/recipes/".to_string(),
                    category: LinkPatternConfig::default().with_class("taxonomy-nodes__link"),
                    recipe: LinkPatternConfig::containing(["/recipes/"])
                        .with_class("mntl-card-list-items"),
                },
            },
            Site::FoodNetwork => SiteConfig {
                name: self.name().to_string(),
                base_url: "https://www.foodnetwork.com/".to_string(),
                strategy: Strategy::Paginated {
                    url_template:
                        "https://www.foodnetwork.com/recipes/recipes-a-z/{partition}/p/{page}"
                            .to_string(),
                    partitions: food_network_partitions(),
                    page_pattern: r"/p/(?P<page>[0-9]+)".to_string(),
                    pagination: LinkPatternConfig::containing(["/recipes-a-z/", "/p/"]),
                    recipe: LinkPatternConfig::containing(["/recipes/"]).excluding("/recipes-a-z/"),
                },
            },
            Site::BudgetBytes => SiteConfig {
                name: self.name().to_string(),
                base_url: "https://www.budgetbytes.com/".to_string(),
                strategy: Strategy::Paginated {
                    url_template: "https://www.budgetbytes.com/recipe-catalog/page/{page}/"
                        .to_string(),
                    partitions: Vec::new(),
                    page_pattern: r"catalog/page/(?P<page>[0-9]+)".to_string(),
                    pagination: LinkPatternConfig::containing(["/recipe-catalog/page/"]),
                    recipe: LinkPatternConfig::default()
                        .with_prefix("https://www.budgetbytes.com/")
                        .with_image(),
                },
            },
        }
    }
}

impl FromStr for Site {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Site::ALL
            .into_iter()
            .find(|site| site.name() == wanted)
            .ok_or_else(|| CrawlError::UnknownSite(s.to_string()))
    }
}

/// "123", "a" through "w", then "xyz"
fn food_network_partitions() -> Vec<String> {
    std::iter::once("123".to_string())
        .chain(('a'..='w').map(|c| c.to_string()))
        .chain(std::iter::once("xyz".to_string()))
        .collect()
}

/// Resolves a site by built-in name, custom name, or any URL on its host
pub fn resolve(target: &str, custom: &[SiteConfig]) -> Result<SiteConfig, CrawlError> {
    if let Some(site) = custom.iter().find(|s| s.name == target) {
        return Ok(site.clone());
    }
    if let Ok(site) = target.parse::<Site>() {
        return Ok(site.config());
    }
    if let Ok(url) = Url::parse(target) {
        if let Some(host) = url.host_str() {
            if let Some(site) = custom.iter().find(|s| s.serves_host(host)) {
                return Ok(site.clone());
            }
        }
        if let Some(site) = Site::from_url(target) {
            return Ok(site.config());
        }
    }
    Err(CrawlError::UnknownSite(target.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::PageLink;
    use crate::patterns::{LinkPattern, LinkPredicate};

    fn matches(config: &LinkPatternConfig, link: &PageLink) -> bool {
        LinkPattern::new(config.clone()).unwrap().matches(link)
    }

    #[test]
    fn test_all_builtin_sites_are_valid() {
        for site in Site::ALL {
            site.config().validate().unwrap();
        }
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!("allrecipes".parse::<Site>().unwrap(), Site::AllRecipes);
        assert_eq!(" FoodNetwork ".parse::<Site>().unwrap(), Site::FoodNetwork);
        assert!(matches!(
            "epicurious".parse::<Site>(),
            Err(CrawlError::UnknownSite(_))
        ));
    }

    #[test]
    fn test_lookup_by_url() {
        assert_eq!(
            Site::from_url("https://www.budgetbytes.com/one-pot-chili/"),
            Some(Site::BudgetBytes)
        );
        assert_eq!(
            Site::from_url("https://allrecipes.com/recipe/123/"),
            Some(Site::AllRecipes)
        );
        assert_eq!(Site::from_url("https://notallrecipes.com/"), None);
        assert_eq!(Site::from_url("not a url"), None);
    }

    #[test]
    fn test_food_network_partitions() {
        let partitions = food_network_partitions();
        assert_eq!(partitions.len(), 25);
        assert_eq!(partitions.first().map(String::as_str), Some("123"));
        assert_eq!(partitions.last().map(String::as_str), Some("xyz"));
        assert!(!partitions.contains(&"x".to_string()));
    }

    #[test]
    fn test_allrecipes_predicates() {
        let Strategy::CategoryTree {
            category, recipe, ..
        } = Site::AllRecipes.config().strategy
        else {
            panic!("allrecipes is a category site");
        };

        let taxonomy = PageLink::new("https://www.allrecipes.com/recipes/79/desserts/")
            .with_class("taxonomy-nodes__link mntl-text-link");
        assert!(matches(&category, &taxonomy));
        assert!(!matches(&recipe, &taxonomy));

        let card = PageLink::new("https://www.allrecipes.com/recipe/10813/cookies/")
            .with_class("comp mntl-card-list-items card");
        assert!(matches(&recipe, &card));
        assert!(!matches(&category, &card));

        let gallery = PageLink::new("https://www.allrecipes.com/gallery/best-cookies/")
            .with_class("mntl-card-list-items");
        assert!(!matches(&recipe, &gallery));
    }

    #[test]
    fn test_budgetbytes_recipe_needs_image() {
        let Strategy::Paginated { recipe, .. } = Site::BudgetBytes.config().strategy else {
            panic!("budgetbytes is paginated");
        };
        let card = PageLink::new("https://www.budgetbytes.com/chili/").with_image();
        assert!(matches(&recipe, &card));
        assert!(!matches(&recipe, &PageLink::new("https://www.budgetbytes.com/chili/")));
    }

    #[test]
    fn test_resolve_prefers_custom_sites() {
        let mut custom = Site::BudgetBytes.config();
        custom.name = "bb-mirror".to_string();
        custom.base_url = "https://mirror.test/".to_string();

        let custom_list = vec![custom.clone()];
        assert_eq!(resolve("bb-mirror", &custom_list).unwrap(), custom);
        assert_eq!(
            resolve("https://mirror.test/some/page", &custom_list).unwrap(),
            custom
        );
        assert_eq!(
            resolve("foodandwine", &custom_list).unwrap().name,
            "foodandwine"
        );
        assert!(matches!(
            resolve("https://unknown.test/", &custom_list),
            Err(CrawlError::UnknownSite(_))
        ));
    }

    #[test]
    fn test_site_config_json_round_trip_shape() {
        let json = serde_json::to_value(Site::AllRecipes.config()).unwrap();
        assert_eq!(json["strategy"], "category_tree");
        assert_eq!(json["seed_url"], "https://www.allrecipes.com/recipes/");
    }
}
