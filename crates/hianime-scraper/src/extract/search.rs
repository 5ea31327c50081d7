//! Search results, category listings and search suggestions.
//!
//! Listing pages (`/top-airing`, `/genre/action`, ...) use the same markup as
//! the search page, so both go through [`SearchExtractor::extract`].

use scraper::ElementRef;
use shared::models::{AnimeSummary, PageInfo, SearchResultPage};

use super::selectors::*;
use super::{
    attr, episode_count, first, href_id, item, link_title, non_empty_text, parse, poster,
    require_identity, text, ExtractError, PageExtractor,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct SearchExtractor;

impl PageExtractor for SearchExtractor {
    type Output = SearchResultPage;

    fn extract(&self, html: &str) -> SearchResultPage {
        let document = parse(html);
        let root = document.root_element();

        let page_info = first(root, &PAGINATION)
            .map(page_info)
            .unwrap_or_default();

        let response = first(root, &RESULT_LIST)
            .or_else(|| first(root, &RESULT_LIST_ALT))
            .map(|list| {
                list.select(&RESULT_ITEM)
                    .enumerate()
                    .filter_map(|(i, card)| item("search", i, || result_card(card)))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default();

        SearchResultPage {
            page_info,
            response,
        }
    }
}

impl SearchExtractor {
    /// Extract the suggestion dropdown returned for a partial keyword
    pub fn extract_suggestions(&self, html: &str) -> Vec<AnimeSummary> {
        let document = parse(html);
        let root = document.root_element();

        // The AJAX fragment may come without its wrapper
        let list = first(root, &SUGGEST_LIST)
            .or_else(|| first(root, &SUGGEST_LIST_ALT))
            .unwrap_or(root);

        list.select(&SUGGEST_ITEM)
            .enumerate()
            .filter_map(|(i, entry)| item("suggestions", i, || suggestion(entry)))
            .collect()
    }
}

fn page_info(pagination: ElementRef<'_>) -> PageInfo {
    let mut info = PageInfo::default();

    if let Some(active) = first(pagination, &PAGE_ACTIVE) {
        info.current_page = page_number(active).unwrap_or(1);
    }

    info.total_pages = pagination
        .select(&PAGE_ITEM)
        .filter_map(page_number)
        .chain(std::iter::once(info.current_page))
        .max()
        .unwrap_or(1);

    info.has_next_page = first(pagination, &PAGE_NEXT)
        .map(|next| !next.value().classes().any(|class| class == "disabled"))
        .unwrap_or(false);

    info
}

/// Numeric label of a pagination entry; arrows and ellipses are ignored
fn page_number(entry: ElementRef<'_>) -> Option<u32> {
    let label = text(entry);
    if label.is_empty() || !label.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    label.parse().ok()
}

fn result_card(card: ElementRef<'_>) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary::default();

    if let Some(link) = first(card, &FILM_DETAIL_NAME_LINK) {
        anime.title = link_title(link);
        anime.alternative_title = attr(link, "data-jname");
        anime.id = href_id(link);
    }
    anime.poster = first(card, &FILM_POSTER_ANY_IMG).and_then(poster);

    let mut infor = card.select(&FD_INFOR_ITEM);
    anime.anime_type = infor.next().and_then(non_empty_text);
    anime.duration = infor.next().and_then(non_empty_text);

    if let Some(tick) = first(card, &FILM_POSTER_TICK) {
        anime.episodes = episode_count(tick);
    }

    require_identity(anime)
}

fn suggestion(entry: ElementRef<'_>) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary::default();

    if let Some(name) = first(entry, &FILM_NAME) {
        anime.title = non_empty_text(name);
        anime.alternative_title = attr(name, "data-jname");
    }

    // Entries are either the link itself or wrap one
    anime.id = if entry.value().name() == "a" {
        href_id(entry)
    } else {
        first(entry, &ANCHOR).and_then(href_id)
    };
    anime.poster = first(entry, &FILM_POSTER_ANY_IMG).and_then(poster);

    let mut info = entry.select(&SUGGEST_INFO);
    anime.aired = info.next().and_then(non_empty_text);
    anime.anime_type = info.next().and_then(non_empty_text);
    anime.duration = info.next().and_then(non_empty_text);

    require_identity(anime)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS: &str = r#"
<html><body>
<div class="film_list-wrap">
  <div class="flw-item">
    <div class="film-poster">
      <div class="tick"><div class="tick-item tick-sub">220</div><div class="tick-item tick-dub">220</div></div>
      <img class="film-poster-img" data-src="https://img/naruto.jpg" src="/lazy.png">
    </div>
    <div class="film-detail">
      <h3 class="film-name"><a href="/naruto-677" title="Naruto" data-jname="NARUTO">Naruto</a></h3>
      <div class="fd-infor"><span class="fdi-item">TV</span><span class="fdi-item">23m</span></div>
    </div>
  </div>
  <div class="flw-item"><div class="film-poster"><img src="/broken.png"></div></div>
  <div class="flw-item">
    <div class="film-detail"><h3 class="film-name"><a href="/naruto-shippuden-355/">Naruto: Shippuden</a></h3></div>
  </div>
</div>
<ul class="pagination">
  <li class="page-item active"><a class="page-link">1</a></li>
  <li class="page-item"><a class="page-link" href="?page=2">2</a></li>
  <li class="page-item"><a class="page-link" href="?page=3">3</a></li>
  <li class="page-item next"><a class="page-link" href="?page=2">&rsaquo;</a></li>
</ul>
</body></html>
"#;

    #[test]
    fn test_empty_document_gives_default() {
        assert_eq!(SearchExtractor.extract(""), SearchResultPage::default());
        assert!(SearchExtractor.extract_suggestions("").is_empty());
    }

    #[test]
    fn test_search_results() {
        let page = SearchExtractor.extract(RESULTS);

        assert_eq!(page.page_info.current_page, 1);
        assert_eq!(page.page_info.total_pages, 3);
        assert!(page.page_info.has_next_page);

        // Second card has no link and is skipped
        assert_eq!(page.response.len(), 2);
        let naruto = &page.response[0];
        assert_eq!(naruto.id.as_deref(), Some("naruto-677"));
        assert_eq!(naruto.title.as_deref(), Some("Naruto"));
        assert_eq!(naruto.alternative_title.as_deref(), Some("NARUTO"));
        assert_eq!(naruto.poster.as_deref(), Some("https://img/naruto.jpg"));
        assert_eq!(naruto.anime_type.as_deref(), Some("TV"));
        assert_eq!(naruto.duration.as_deref(), Some("23m"));
        assert_eq!(naruto.episodes.sub, Some(220));
        assert_eq!(naruto.episodes.eps, Some(220));

        let shippuden = &page.response[1];
        assert_eq!(shippuden.id.as_deref(), Some("naruto-shippuden-355"));
        assert_eq!(shippuden.title.as_deref(), Some("Naruto: Shippuden"));
        assert_eq!(shippuden.episodes.eps, None);
    }

    #[test]
    fn test_disabled_next_page() {
        let html = r#"<ul class="pagination">
            <li class="page-item"><a>1</a></li>
            <li class="page-item active"><a>2</a></li>
            <li class="page-item next disabled"><a>&rsaquo;</a></li>
        </ul>"#;
        let info = SearchExtractor.extract(html).page_info;
        assert_eq!(info.current_page, 2);
        assert_eq!(info.total_pages, 2);
        assert!(!info.has_next_page);
    }

    #[test]
    fn test_suggestions_from_ajax_body() {
        let body = serde_json::json!({
            "status": true,
            "html": "<a href=\"/bleach-806?ref=search\" class=\"nav-item\">\
                <div class=\"film-poster\"><img data-src=\"https://img/bleach.jpg\"></div>\
                <div class=\"srp-detail\"><h3 class=\"film-name\" data-jname=\"Bleach\">Bleach</h3>\
                <div class=\"film-infor\"><span>Oct 5, 2004</span><span>TV</span><span>24m</span></div></div></a>\
                <a class=\"nav-item\"><div class=\"film-infor\"><span>?</span></div></a>\
                <a href=\"/search?keyword=bleach\" class=\"nav-item nav-bottom\">View all results</a>"
        })
        .to_string();

        let suggestions = SearchExtractor.extract_suggestions(&body);
        assert_eq!(suggestions.len(), 1);
        let bleach = &suggestions[0];
        assert_eq!(bleach.id.as_deref(), Some("bleach-806?ref=search"));
        assert_eq!(bleach.title.as_deref(), Some("Bleach"));
        assert_eq!(bleach.aired.as_deref(), Some("Oct 5, 2004"));
        assert_eq!(bleach.anime_type.as_deref(), Some("TV"));
        assert_eq!(bleach.duration.as_deref(), Some("24m"));
    }
}
