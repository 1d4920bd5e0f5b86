use nc_core::{Error, NewsItem, Result};
use roxmltree::{Document, Node, ParsingOptions};

const FEED_ROOTS: &[&str] = &["rss", "feed", "RDF"];
const ITEM_TAGS: &[&str] = &["item", "entry"];

// First match wins. `encoded` is `content:encoded`, `date` is `dc:date`.
const CONTENT_TAGS: &[&str] = &["encoded", "content", "description", "summary"];
const DATE_TAGS: &[&str] = &["pubDate", "published", "updated", "date"];

/// Extract up to `limit` items from an RSS 2.0, RSS 1.0 or Atom document,
/// keeping the order the feed lists them in.
pub fn parse_feed(xml: &str, limit: usize) -> Result<Vec<NewsItem>> {
    // Older RSS 0.91 feeds still ship the Netscape DOCTYPE.
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let doc = Document::parse_with_options(xml, options)
        .map_err(|e| Error::Fetch(format!("Failed to parse feed: {}", e)))?;

    let root = doc.root_element();
    if !FEED_ROOTS.contains(&root.tag_name().name()) {
        return Err(Error::Fetch(format!(
            "Document is not a feed (root element <{}>)",
            root.tag_name().name()
        )));
    }

    Ok(root
        .descendants()
        .filter(|node| node.is_element() && ITEM_TAGS.contains(&node.tag_name().name()))
        .take(limit)
        .map(|node| NewsItem {
            title: child_text(&node, &["title"]).unwrap_or_default(),
            link: child_link(&node).unwrap_or_default(),
            content: child_text(&node, CONTENT_TAGS).unwrap_or_default(),
            date: child_text(&node, DATE_TAGS).unwrap_or_default(),
        })
        .collect())
}

fn child_elements<'a, 'input>(node: &Node<'a, 'input>, name: &'a str) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children()
        .filter(move |child| child.is_element() && child.tag_name().name() == name)
}

fn child_text(node: &Node<'_, '_>, names: &[&str]) -> Option<String> {
    names.iter().find_map(|name| {
        child_elements(node, name)
            .map(|child| element_text(&child))
            .find(|text| !text.is_empty())
    })
}

fn element_text(node: &Node<'_, '_>) -> String {
    node.descendants()
        .filter(|n| n.is_text())
        .filter_map(|n| n.text())
        .collect::<String>()
        .trim()
        .to_string()
}

fn child_link(node: &Node<'_, '_>) -> Option<String> {
    // Atom: <link rel="alternate" href="..."/>, where a missing rel means alternate.
    let alternate = child_elements(node, "link")
        .filter(|link| matches!(link.attribute("rel"), None | Some("alternate")))
        .find_map(|link| link.attribute("href").map(str::trim).filter(|href| !href.is_empty()));
    if let Some(href) = alternate {
        return Some(href.to_string());
    }

    child_elements(node, "link")
        .map(|link| element_text(&link))
        .find(|text| !text.is_empty())
        .or_else(|| {
            child_elements(node, "link")
                .find_map(|link| link.attribute("href"))
                .map(|href| href.trim().to_string())
        })
}
