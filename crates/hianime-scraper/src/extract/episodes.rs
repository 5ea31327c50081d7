//! Episode list of an anime.

use scraper::ElementRef;
use shared::models::Episode;

use super::selectors::*;
use super::{attr, first, href_id, item, non_empty_text, parse, ExtractError, PageExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct EpisodesExtractor;

impl PageExtractor for EpisodesExtractor {
    type Output = Vec<Episode>;

    fn extract(&self, html: &str) -> Vec<Episode> {
        let document = parse(html);
        let root = document.root_element();

        let Some(list) = first(root, &EPISODE_LIST)
            .or_else(|| first(root, &EPISODE_LIST_ALT))
            .or_else(|| first(root, &EPISODE_LIST_BARE))
        else {
            return Vec::new();
        };

        list.select(&EPISODE_ITEM)
            .enumerate()
            .filter_map(|(i, link)| item("episodes", i, || episode(link, i)))
            .collect()
    }
}

fn episode(link: ElementRef<'_>, index: usize) -> Result<Episode, ExtractError> {
    let number = attr(link, "data-number")
        .and_then(|n| n.parse().ok())
        .unwrap_or(index as u32 + 1);

    let title = attr(link, "title")
        .or_else(|| first(link, &EPISODE_TITLE).and_then(non_empty_text))
        .or_else(|| first(link, &EPISODE_NAME).and_then(non_empty_text));

    let alternative_title = first(link, &EPISODE_SUBTITLE)
        .and_then(non_empty_text)
        .or_else(|| first(link, &EPISODE_NAME).and_then(|name| attr(name, "data-jname")));

    let id = attr(link, "data-id").or_else(|| href_id(link));

    if id.is_none() && title.is_none() {
        return Err(ExtractError::MissingIdentity);
    }

    let is_filler = link
        .value()
        .classes()
        .any(|class| class == "filler" || class == "ssl-item-filler");

    Ok(Episode {
        id,
        number,
        title,
        alternative_title,
        is_filler,
    })
}
