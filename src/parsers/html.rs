use crate::parsers::PageLink;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("static selector"));
static IMAGE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img").expect("static selector"));

/// Extracts every anchor carrying an `href` attribute, in document order
pub fn extract_links(html: &str) -> Vec<PageLink> {
    let doc = Html::parse_document(html);

    let links = doc
        .select(&ANCHOR_SELECTOR)
        .filter_map(to_page_link)
        .collect::<Vec<PageLink>>();

    ::log::debug!("HTML parser found {} anchors", links.len());
    if !links.is_empty() {
        ::log::trace!(
            "First few anchors: {:?}",
            links.iter().take(5).map(|l| &l.href).collect::<Vec<_>>()
        );
    }

    links
}

fn to_page_link(element: ElementRef<'_>) -> Option<PageLink> {
    let href = element.value().attr("href")?;
    let classes: Vec<String> = element
        .value()
        .attr("class")
        .map(|c| c.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default();
    let text = element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let has_image = element.select(&IMAGE_SELECTOR).next().is_some();

    Some(PageLink {
        href: href.to_string(),
        classes,
        text,
        has_image,
    })
}
