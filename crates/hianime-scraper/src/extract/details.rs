//! Anime details page.

use scraper::{CaseSensitivity, ElementRef, Selector};
use shared::models::{AnimeDetails, AnimeSummary};

use super::selectors::*;
use super::{
    attr, episode_count, first, href_id, item, link_title, non_empty_text, parse, poster,
    require_identity, text, ExtractError, PageExtractor,
};

#[derive(Debug, Clone, Copy, Default)]
pub struct AnimeDetailsExtractor;

impl PageExtractor for AnimeDetailsExtractor {
    type Output = AnimeDetails;

    fn extract(&self, html: &str) -> AnimeDetails {
        let document = parse(html);
        let root = document.root_element();
        let mut anime = AnimeDetails::default();

        anime.title = first(root, &DETAIL_TITLE).and_then(non_empty_text);
        anime.alternative_title = first(root, &DETAIL_ALT_TITLE).and_then(non_empty_text);
        anime.japanese = first(root, &DETAIL_JAPANESE).and_then(non_empty_text);
        anime.id = first(root, &DATA_ID)
            .and_then(|element| attr(element, "data-id"))
            .or_else(|| first(root, &WATCH_PLAY).and_then(href_id));
        anime.poster = first(root, &DETAIL_POSTER).and_then(poster);
        anime.rating = first(root, &DETAIL_RATING).and_then(non_empty_text);
        anime.anime_type = first(root, &DETAIL_TYPE).and_then(non_empty_text);
        if let Some(stats) = first(root, &DETAIL_STATS) {
            anime.episodes = episode_count(stats);
        }
        anime.synopsis = first(root, &DETAIL_SYNOPSIS).and_then(non_empty_text);

        let info = InfoList::new(root);
        if let Some(aired) = info.value("Aired:").map(text) {
            match aired.split_once(" to ") {
                Some((from, to)) => {
                    anime.aired.from = Some(from.trim().to_string()).filter(|s| !s.is_empty());
                    anime.aired.to = Some(to.trim().to_string()).filter(|s| !s.is_empty());
                }
                None => anime.aired.from = Some(aired).filter(|s| !s.is_empty()),
            }
        }
        anime.premiered = info.value("Premiered:").and_then(non_empty_text);
        anime.duration = info.value("Duration:").and_then(non_empty_text);
        anime.status = info.value("Status:").and_then(non_empty_text);
        anime.mal_score = info.value("MAL Score:").and_then(non_empty_text);
        if let Some(synonyms) = info.value("Synonyms:").map(text) {
            anime.synonyms = synonyms
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(genres) = info.value("Genres:") {
            anime.genres = link_texts(genres);
        }
        if let Some(studios) = info.value("Studios:") {
            anime.studios = Some(link_texts(studios).join(", ")).filter(|s| !s.is_empty());
        }
        if let Some(producers) = info.value("Producers:") {
            anime.producers = link_texts(producers);
        }

        anime.more_seasons = cards(root, &SEASON_ITEM, "moreSeasons", season_card);
        anime.related = cards(root, &RELATED_ITEM, "related", |li| sidebar_card(li, true));
        anime.most_popular = cards(root, &POPULAR_ITEM, "mostPopular", |li| sidebar_card(li, false));
        anime.recommended = cards(root, &RECOMMENDED_ITEM, "recommended", |li| {
            sidebar_card(li, false)
        });

        anime
    }
}

/// The "Label: value" rows of the info panel
struct InfoList<'a> {
    labels: Vec<ElementRef<'a>>,
}

impl<'a> InfoList<'a> {
    fn new(root: ElementRef<'a>) -> Self {
        Self {
            labels: root.select(&DETAIL_ITEM_TITLE).collect(),
        }
    }

    /// First `div.item-list` following the first label that reads `label`
    fn value(&self, label: &str) -> Option<ElementRef<'a>> {
        let title = self.labels.iter().find(|title| text(**title) == label)?;
        title.next_siblings().filter_map(ElementRef::wrap).find(|sibling| {
            sibling.value().name() == "div"
                && sibling
                    .value()
                    .has_class("item-list", CaseSensitivity::CaseSensitive)
        })
    }
}

fn link_texts(scope: ElementRef<'_>) -> Vec<String> {
    scope.select(&ANCHOR).filter_map(non_empty_text).collect()
}

fn cards<'a>(
    root: ElementRef<'a>,
    selector: &Selector,
    section: &str,
    build: impl Fn(ElementRef<'a>) -> Result<AnimeSummary, ExtractError>,
) -> Vec<AnimeSummary> {
    root.select(selector)
        .enumerate()
        .filter_map(|(i, element)| item(section, i, || build(element)))
        .collect()
}

fn season_card(season: ElementRef<'_>) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary::default();

    if let Some(title) = first(season, &SEASON_TITLE) {
        anime.title = link_title(title);
        anime.id = href_id(title);
    }
    if anime.id.is_none() {
        anime.id = href_id(season);
    }
    anime.poster = first(season, &FILM_POSTER_IMG).and_then(poster);
    anime.anime_type = first(season, &TICK).and_then(non_empty_text);
    anime.episodes = episode_count(season);

    require_identity(anime)
}

fn sidebar_card(li: ElementRef<'_>, with_type: bool) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary::default();

    if let Some(link) = first(li, &FILM_NAME_LINK) {
        anime.title = link_title(link);
        anime.alternative_title = attr(link, "data-jname");
        anime.id = href_id(link);
    }
    anime.poster = first(li, &FILM_POSTER_IMG).and_then(poster);
    if with_type {
        anime.anime_type = first(li, &FD_INFOR_ITEM).and_then(non_empty_text);
    }
    anime.episodes = episode_count(li);

    require_identity(anime)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DETAILS: &str = r#"
<html><body>
<div id="ani_detail" data-id="112">
  <div class="anisc-poster"><img class="film-poster-img" src="https://img/aot.jpg"></div>
  <div class="anisc-detail">
    <div class="film-name">
      <h2>Attack on Titan</h2>
      <span class="film-name-a">Shingeki no Kyojin</span>
      <span class="film-name-jp">進撃の巨人</span>
    </div>
    <div class="film-stats">
      <div class="tick-item tick-rate">R</div>
      <div class="tick-item tick-sub">25</div>
      <div class="tick-item tick-dub">25</div>
    </div>
    <div class="film-description"><div class="text"> Centuries ago, mankind was slaughtered. </div></div>
    <div class="item"><span class="item-title">Synonyms:</span><div class="item-list">AoT, SnK ,</div></div>
    <div class="item"><span class="item-title">Aired:</span><div class="item-list">Apr 7, 2013 to Sep 29, 2013</div></div>
    <div class="item"><span class="item-title">Premiered:</span><div class="item-list">Spring 2013</div></div>
    <div class="item"><span class="item-title">Status:</span><span class="note">x</span><div class="item-list">Finished Airing</div></div>
    <div class="item"><span class="item-title">MAL Score:</span><div class="item-list">8.54</div></div>
    <div class="item"><span class="item-title">Genres:</span><div class="item-list"><a href="/genre/action">Action</a><a href="/genre/drama">Drama</a></div></div>
    <div class="item"><span class="item-title">Studios:</span><div class="item-list"><a>Wit Studio</a></div></div>
    <div class="item"><span class="item-title">Producers:</span><div class="item-list"><a>Production I.G</a><a>Kodansha</a></div></div>
  </div>
</div>
<div class="seasons"><div class="os-list">
  <a class="os-item" href="/attack-on-titan-season-2-2"><div class="title">Season 2</div></a>
  <a class="os-item"><div class="tick">TV</div></a>
</div></div>
<section class="block_area block_area_sidebar block_area-relationships"><div class="anif-block-ul"><ul>
  <li>
    <div class="film-poster"><img class="film-poster-img" data-src="https://img/junior.jpg"></div>
    <div class="film-detail"><h3 class="film-name"><a href="/aot-junior-high-3" title="Attack on Titan: Junior High">AoT JH</a></h3>
    <div class="fd-infor"><span class="fdi-item">TV</span><span class="tick-sub">12</span></div></div>
  </li>
</ul></div></section>
<section class="block_area block_area_sidebar block_area-popular"><div class="anif-block-ul"><ul>
  <li><div class="film-name"><a href="/one-piece-100" title="One Piece">One Piece</a></div><span class="tick-eps">1100</span></li>
  <li><div class="film-name">nothing</div></li>
</ul></div></section>
</body></html>
"#;

    #[test]
    fn test_empty_document_gives_default() {
        assert_eq!(AnimeDetailsExtractor.extract(""), AnimeDetails::default());
    }

    #[test]
    fn test_basic_fields() {
        let anime = AnimeDetailsExtractor.extract(DETAILS);

        assert_eq!(anime.id.as_deref(), Some("112"));
        assert_eq!(anime.title.as_deref(), Some("Attack on Titan"));
        assert_eq!(anime.alternative_title.as_deref(), Some("Shingeki no Kyojin"));
        assert_eq!(anime.japanese.as_deref(), Some("進撃の巨人"));
        assert_eq!(anime.poster.as_deref(), Some("https://img/aot.jpg"));
        assert_eq!(anime.rating.as_deref(), Some("R"));
        assert_eq!(anime.episodes.sub, Some(25));
        assert_eq!(anime.episodes.dub, Some(25));
        assert_eq!(anime.episodes.eps, Some(25));
        assert_eq!(
            anime.synopsis.as_deref(),
            Some("Centuries ago, mankind was slaughtered.")
        );
    }

    #[test]
    fn test_info_rows() {
        let anime = AnimeDetailsExtractor.extract(DETAILS);

        assert_eq!(anime.synonyms, vec!["AoT", "SnK"]);
        assert_eq!(anime.aired.from.as_deref(), Some("Apr 7, 2013"));
        assert_eq!(anime.aired.to.as_deref(), Some("Sep 29, 2013"));
        assert_eq!(anime.premiered.as_deref(), Some("Spring 2013"));
        assert_eq!(anime.status.as_deref(), Some("Finished Airing"));
        assert_eq!(anime.mal_score.as_deref(), Some("8.54"));
        assert_eq!(anime.duration, None);
        assert_eq!(anime.genres, vec!["Action", "Drama"]);
        assert_eq!(anime.studios.as_deref(), Some("Wit Studio"));
        assert_eq!(anime.producers, vec!["Production I.G", "Kodansha"]);
    }

    #[test]
    fn test_card_lists_skip_malformed_entries() {
        let anime = AnimeDetailsExtractor.extract(DETAILS);

        assert_eq!(anime.more_seasons.len(), 1);
        assert_eq!(anime.more_seasons[0].id.as_deref(), Some("attack-on-titan-season-2-2"));
        assert_eq!(anime.more_seasons[0].title.as_deref(), Some("Season 2"));

        assert_eq!(anime.related.len(), 1);
        let related = &anime.related[0];
        assert_eq!(related.title.as_deref(), Some("Attack on Titan: Junior High"));
        assert_eq!(related.anime_type.as_deref(), Some("TV"));
        assert_eq!(related.episodes.eps, Some(12));

        assert_eq!(anime.most_popular.len(), 1);
        assert_eq!(anime.most_popular[0].episodes.eps, Some(1100));
        assert_eq!(anime.most_popular[0].anime_type, None);
        assert!(anime.recommended.is_empty());
    }
}
