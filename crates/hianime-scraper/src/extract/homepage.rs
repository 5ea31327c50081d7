//! Homepage extraction: spotlight, trending, the headed sections, top 10
//! rankings and the genre sidebar.

use scraper::{ElementRef, Selector};
use shared::models::{AnimeSummary, HomepageSnapshot};

use super::selectors::*;
use super::{
    attr, episode_count, first, href_id, item, link_title, non_empty_text, parse, poster,
    require_identity, text, ExtractError, PageExtractor,
};

/// Headed homepage sections that hold a list of cards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeSection {
    TopAiring,
    MostPopular,
    MostFavorite,
    LatestCompleted,
    TopUpcoming,
    LatestEpisode,
    NewAdded,
}

impl HomeSection {
    /// Resolve a section heading such as "Top Airing" or "New On HiAnime".
    ///
    /// All whitespace is removed and the first character lowercased before
    /// the lookup. Unknown headings resolve to `None`.
    pub fn from_heading(heading: &str) -> Option<Self> {
        let compact: String = heading.chars().filter(|c| !c.is_whitespace()).collect();
        let mut chars = compact.chars();
        let key = match chars.next() {
            Some(head) => head.to_lowercase().chain(chars).collect::<String>(),
            None => return None,
        };

        match key.as_str() {
            "topAiring" | "topairing" => Some(Self::TopAiring),
            "mostPopular" | "mostpopular" => Some(Self::MostPopular),
            "mostFavorite" | "mostfavorite" => Some(Self::MostFavorite),
            "latestCompleted" | "latestcompleted" => Some(Self::LatestCompleted),
            "topUpcoming" | "topupcoming" => Some(Self::TopUpcoming),
            "latestEpisode" | "latestepisode" => Some(Self::LatestEpisode),
            "newOnHiAnime" | "newonhianime" | "newAdded" | "newadded" => Some(Self::NewAdded),
            _ => None,
        }
    }

    /// JSON key of the section in the snapshot
    pub fn key(&self) -> &'static str {
        match self {
            Self::TopAiring => "topAiring",
            Self::MostPopular => "mostPopular",
            Self::MostFavorite => "mostFavorite",
            Self::LatestCompleted => "latestCompleted",
            Self::TopUpcoming => "topUpcoming",
            Self::LatestEpisode => "latestEpisode",
            Self::NewAdded => "newAdded",
        }
    }

    fn slot<'a>(&self, snapshot: &'a mut HomepageSnapshot) -> &'a mut Vec<AnimeSummary> {
        match self {
            Self::TopAiring => &mut snapshot.top_airing,
            Self::MostPopular => &mut snapshot.most_popular,
            Self::MostFavorite => &mut snapshot.most_favorite,
            Self::LatestCompleted => &mut snapshot.latest_completed,
            Self::TopUpcoming => &mut snapshot.top_upcoming,
            Self::LatestEpisode => &mut snapshot.latest_episode,
            Self::NewAdded => &mut snapshot.new_added,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct HomepageExtractor;

impl PageExtractor for HomepageExtractor {
    type Output = HomepageSnapshot;

    fn extract(&self, html: &str) -> HomepageSnapshot {
        let document = parse(html);
        let root = document.root_element();
        let mut snapshot = HomepageSnapshot::default();

        snapshot.spotlight = root
            .select(&SPOTLIGHT_SLIDE)
            .enumerate()
            .filter_map(|(i, slide)| item("spotlight", i, || spotlight(slide, i)))
            .collect();

        snapshot.trending = root
            .select(&TRENDING_SLIDE)
            .enumerate()
            .filter_map(|(i, slide)| item("trending", i, || trending(slide, i)))
            .collect();

        for block in root.select(&FEATURED_BLOCK) {
            let Some(section) = first(block, &FEATURED_HEADER).and_then(heading) else {
                continue;
            };
            *section.slot(&mut snapshot) = block
                .select(&FEATURED_ITEM)
                .enumerate()
                .filter_map(|(i, li)| item(section.key(), i, || featured_card(li)))
                .collect();
        }

        for block in root.select(&HOME_BLOCK) {
            let Some(section) = first(block, &HOME_HEADING).and_then(heading) else {
                continue;
            };
            *section.slot(&mut snapshot) = block
                .select(&HOME_ITEM)
                .enumerate()
                .filter_map(|(i, card)| item(section.key(), i, || home_card(card)))
                .collect();
        }

        if let Some(top10) = first(root, &TOP10_BOX) {
            snapshot.top10.today = ranking(top10, &TOP10_DAY, "top10.today");
            snapshot.top10.week = ranking(top10, &TOP10_WEEK, "top10.week");
            snapshot.top10.month = ranking(top10, &TOP10_MONTH, "top10.month");
        }

        for link in root.select(&GENRE_LINK) {
            if let Some(genre) = link_title(link) {
                let genre = genre.to_lowercase();
                if !snapshot.genres.contains(&genre) {
                    snapshot.genres.push(genre);
                }
            }
        }

        snapshot
    }
}

fn heading(element: ElementRef<'_>) -> Option<HomeSection> {
    HomeSection::from_heading(&text(element))
}

fn spotlight(slide: ElementRef<'_>, index: usize) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary {
        rank: Some(index as u32 + 1),
        ..Default::default()
    };

    if let Some(link) = first(slide, &SPOTLIGHT_LINK) {
        anime.id = href_id(link);
    }
    if let Some(image) = first(slide, &SPOTLIGHT_POSTER) {
        anime.poster = poster(image);
    }
    if let Some(title) = first(slide, &SPOTLIGHT_TITLE) {
        anime.title = non_empty_text(title);
        anime.alternative_title = attr(title, "data-jname");
    }
    if let Some(synopsis) = first(slide, &SPOTLIGHT_SYNOPSIS) {
        anime.synopsis = non_empty_text(synopsis);
    }
    if let Some(detail) = first(slide, &SPOTLIGHT_DETAIL) {
        let mut items = detail.select(&SPOTLIGHT_DETAIL_ITEM);
        anime.anime_type = items.next().and_then(non_empty_text);
        anime.duration = items.next().and_then(non_empty_text);
        anime.aired = first(detail, &SPOTLIGHT_AIRED).and_then(non_empty_text);
        anime.quality = first(detail, &SPOTLIGHT_QUALITY).and_then(non_empty_text);
        anime.episodes = episode_count(detail);
    }

    require_identity(anime)
}

fn trending(slide: ElementRef<'_>, index: usize) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary {
        rank: Some(index as u32 + 1),
        ..Default::default()
    };

    if let Some(title) = first(slide, &TRENDING_TITLE) {
        anime.title = non_empty_text(title);
        anime.alternative_title = attr(title, "data-jname");
    }
    if let Some(link) = first(slide, &FILM_POSTER) {
        anime.poster = first(link, &IMAGE).and_then(poster);
        anime.id = href_id(link);
    }

    require_identity(anime)
}

fn featured_card(li: ElementRef<'_>) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary::default();

    if let Some(link) = first(li, &FILM_DETAIL_NAME_LINK) {
        anime.title = link_title(link);
        anime.alternative_title = attr(link, "data-jname");
        anime.id = href_id(link);
    }
    anime.poster = first(li, &FILM_POSTER_IMG).and_then(poster);
    anime.anime_type = first(li, &FD_INFOR_ITEM).and_then(non_empty_text);
    anime.episodes = match first(li, &FD_INFOR) {
        Some(infor) => episode_count(infor),
        None => episode_count(li),
    };

    require_identity(anime)
}

fn home_card(card: ElementRef<'_>) -> Result<AnimeSummary, ExtractError> {
    let mut anime = AnimeSummary::default();

    if let Some(link) = first(card, &HOME_ITEM_NAME) {
        anime.title = link_title(link);
        anime.alternative_title = attr(link, "data-jname");
        anime.id = href_id(link);
    }
    anime.poster = first(card, &FILM_POSTER_ANY_IMG).and_then(poster);
    if let Some(tick) = first(card, &FILM_POSTER_TICK) {
        anime.episodes = episode_count(tick);
    }

    require_identity(anime)
}

fn ranking(scope: ElementRef<'_>, period: &Selector, section: &str) -> Vec<AnimeSummary> {
    let Some(container) = first(scope, period) else {
        return Vec::new();
    };

    container
        .select(&LIST_ITEM)
        .enumerate()
        .filter_map(|(i, li)| {
            item(section, i, || {
                let mut anime = AnimeSummary {
                    rank: Some(i as u32 + 1),
                    ..Default::default()
                };
                if let Some(link) = first(li, &FILM_NAME_LINK) {
                    anime.title = non_empty_text(link).or_else(|| attr(link, "title"));
                    anime.alternative_title = attr(link, "data-jname");
                    anime.id = href_id(link);
                }
                anime.poster = first(li, &FILM_POSTER_ANY_IMG).and_then(poster);
                anime.episodes = episode_count(li);
                require_identity(anime)
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOMEPAGE: &str = r#"
<html><body>
<div class="deslide-wrap"><div class="swiper-wrapper">
  <div class="swiper-slide">
    <div class="deslide-cover"><img class="film-poster-img" data-src="https://img/op.jpg"></div>
    <div class="desi-head-title" data-jname="One Piece">One Piece</div>
    <div class="sc-detail">
      <div class="scd-item">TV</div>
      <div class="scd-item">24m</div>
      <div class="scd-item m-hide">Oct 20, 1999</div>
      <div class="scd-item"><span class="quality">HD</span></div>
      <div class="tick-item tick-sub">1122</div>
      <div class="tick-item tick-dub">1100</div>
    </div>
    <div class="desi-description">Gold Roger was known as the Pirate King.</div>
    <div class="desi-buttons"><a href="/watch/one-piece-100">Watch</a></div>
  </div>
  <div class="swiper-slide"><div class="desi-description">orphan slide</div></div>
  <div class="swiper-slide">
    <div class="desi-head-title">Bleach</div>
    <div class="desi-buttons"><a href="/watch/bleach-806">Watch</a></div>
  </div>
</div></div>

<div id="trending-home"><div class="swiper-container">
  <div class="swiper-slide"><div class="item">
    <div class="film-title" data-jname="Shingeki no Kyojin">Attack on Titan</div>
    <a class="film-poster" href="/attack-on-titan-112"><img data-src="https://img/aot.jpg"></a>
  </div></div>
</div></div>

<div id="anime-featured"><div class="anif-blocks"><div class="row">
  <div class="anif-block">
    <div class="anif-block-header">Top Airing</div>
    <div class="anif-block-ul"><ul>
      <li>
        <div class="film-poster"><img class="film-poster-img" src="https://img/fr.jpg"></div>
        <div class="film-detail">
          <h3 class="film-name"><a href="/frieren-18542" title="Frieren" data-jname="Sousou no Frieren">Frieren</a></h3>
          <div class="fd-infor"><span class="fdi-item">TV</span><span class="tick-sub">28</span></div>
        </div>
      </li>
      <li><div class="film-detail"><div class="fd-infor">no link here</div></div></li>
    </ul></div>
  </div>
  <div class="anif-block">
    <div class="anif-block-header">Something Else</div>
    <div class="anif-block-ul"><ul><li><div class="film-detail"><h3 class="film-name"><a href="/x-1" title="X">X</a></h3></div></li></ul></div>
  </div>
</div></div></div>

<section class="block_area block_area_home">
  <div class="cat-heading">New On HiAnime</div>
  <div class="tab-content"><div class="film_list-wrap">
    <div class="flw-item">
      <div class="film-poster"><div class="tick"><div class="tick-item tick-sub">3</div><div class="tick-item tick-eps">12</div></div><img data-src="https://img/new.jpg"></div>
      <div class="film-detail"><h3 class="film-name"><a class="dynamic-name" href="/new-show-1" title="New Show" data-jname="Shin">New Show</a></h3></div>
    </div>
  </div></div>
</section>

<section class="block_area">
  <div class="cbox">
    <div id="top-viewed-day"><ul>
      <li>
        <div class="film-poster"><img data-src="https://img/top1.jpg"></div>
        <div class="film-name"><a href="/solo-leveling-18718" data-jname="Ore dake">Solo Leveling</a></div>
        <div class="tick-item tick-sub">12</div>
      </li>
    </ul></div>
    <div id="top-viewed-week"><ul>
      <li><div class="film-name"><a href="/frieren-18542">Frieren</a></div></li>
      <li><div class="film-poster"><img data-src="https://img/none.jpg"></div><div class="film-name">untitled</div></li>
      <li><div class="film-name"><a href="/dandadan-19319" title="Dandadan"></a></div></li>
    </ul></div>
  </div>
</section>

<div class="sb-genre-list"><ul>
  <li><a href="/genre/action" title="Action">Action</a></li>
  <li><a href="/genre/comedy" title="Comedy">Comedy</a></li>
  <li><a href="/genre/action" title="ACTION">Action</a></li>
</ul></div>
</body></html>
"#;

    #[test]
    fn test_empty_document_gives_default() {
        assert_eq!(HomepageExtractor.extract(""), HomepageSnapshot::default());
        assert_eq!(
            HomepageExtractor.extract("<html><body><p>maintenance</p></body></html>"),
            HomepageSnapshot::default()
        );
    }

    #[test]
    fn test_spotlight_fields_and_skip() {
        let snapshot = HomepageExtractor.extract(HOMEPAGE);

        // The middle slide has no identity and is skipped
        assert_eq!(snapshot.spotlight.len(), 2);
        let first = &snapshot.spotlight[0];
        assert_eq!(first.id.as_deref(), Some("one-piece-100"));
        assert_eq!(first.title.as_deref(), Some("One Piece"));
        assert_eq!(first.poster.as_deref(), Some("https://img/op.jpg"));
        assert_eq!(first.anime_type.as_deref(), Some("TV"));
        assert_eq!(first.duration.as_deref(), Some("24m"));
        assert_eq!(first.aired.as_deref(), Some("Oct 20, 1999"));
        assert_eq!(first.quality.as_deref(), Some("HD"));
        assert_eq!(first.rank, Some(1));
        assert_eq!(first.episodes.sub, Some(1122));
        assert_eq!(first.episodes.dub, Some(1100));
        assert_eq!(first.episodes.eps, Some(1122));

        let last = &snapshot.spotlight[1];
        assert_eq!(last.id.as_deref(), Some("bleach-806"));
        assert_eq!(last.rank, Some(3));
        assert_eq!(last.episodes.eps, None);
    }

    #[test]
    fn test_sections_and_rankings() {
        let snapshot = HomepageExtractor.extract(HOMEPAGE);

        assert_eq!(snapshot.trending.len(), 1);
        assert_eq!(snapshot.trending[0].id.as_deref(), Some("attack-on-titan-112"));
        assert_eq!(snapshot.trending[0].alternative_title.as_deref(), Some("Shingeki no Kyojin"));

        assert_eq!(snapshot.top_airing.len(), 1);
        let frieren = &snapshot.top_airing[0];
        assert_eq!(frieren.title.as_deref(), Some("Frieren"));
        assert_eq!(frieren.anime_type.as_deref(), Some("TV"));
        assert_eq!(frieren.episodes.eps, Some(28));

        assert_eq!(snapshot.new_added.len(), 1);
        assert_eq!(snapshot.new_added[0].episodes.eps, Some(12));
        assert!(snapshot.most_popular.is_empty());

        assert_eq!(snapshot.top10.today.len(), 1);
        assert_eq!(snapshot.top10.today[0].title.as_deref(), Some("Solo Leveling"));
        assert_eq!(snapshot.top10.today[0].rank, Some(1));

        // A broken entry keeps its slot, so later entries keep their rank
        let week = &snapshot.top10.week;
        assert_eq!(week.len(), 2);
        assert_eq!(week[0].id.as_deref(), Some("frieren-18542"));
        assert_eq!(week[0].rank, Some(1));
        assert_eq!(week[1].title.as_deref(), Some("Dandadan"));
        assert_eq!(week[1].rank, Some(3));
        assert!(snapshot.top10.month.is_empty());

        assert_eq!(snapshot.genres, vec!["action", "comedy"]);
    }

    #[test]
    fn test_section_heading_lookup() {
        assert_eq!(HomeSection::from_heading("Top Airing"), Some(HomeSection::TopAiring));
        assert_eq!(HomeSection::from_heading("topairing"), Some(HomeSection::TopAiring));
        assert_eq!(HomeSection::from_heading("Latest Episode"), Some(HomeSection::LatestEpisode));
        assert_eq!(HomeSection::from_heading("New On HiAnime"), Some(HomeSection::NewAdded));
        assert_eq!(HomeSection::from_heading("Most\n Favorite"), Some(HomeSection::MostFavorite));
        assert_eq!(HomeSection::from_heading("Estimated Schedule"), None);
        assert_eq!(HomeSection::from_heading("   "), None);
    }
}
