//! Static CSS selectors and regexes used by the extractors.

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: Lazy<Selector> = Lazy::new(|| Selector::parse($css).unwrap());
    };
}

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: Lazy<Regex> = Lazy::new(|| Regex::new($regex).unwrap());
    };
}

// Card fragments shared by most list items
selector!(ANCHOR, "a");
selector!(IMAGE, "img");
selector!(FILM_POSTER, ".film-poster");
selector!(FILM_POSTER_IMG, ".film-poster-img");
selector!(FILM_POSTER_ANY_IMG, ".film-poster img");
selector!(FILM_POSTER_TICK, ".film-poster .tick");
selector!(FILM_NAME, ".film-name");
selector!(FILM_NAME_LINK, ".film-name a");
selector!(FILM_DETAIL_NAME_LINK, ".film-detail .film-name a");
selector!(FD_INFOR, ".fd-infor");
selector!(FD_INFOR_ITEM, ".fd-infor .fdi-item");
selector!(TICK, ".tick");
selector!(TICK_SUB, ".tick-sub");
selector!(TICK_DUB, ".tick-dub");
selector!(TICK_EPS, ".tick-eps");
selector!(LIST_ITEM, "ul li");

// Homepage
selector!(SPOTLIGHT_SLIDE, ".deslide-wrap .swiper-wrapper .swiper-slide");
selector!(SPOTLIGHT_LINK, ".desi-buttons a");
selector!(SPOTLIGHT_POSTER, ".deslide-cover .film-poster-img");
selector!(SPOTLIGHT_TITLE, ".desi-head-title");
selector!(SPOTLIGHT_SYNOPSIS, ".desi-description");
selector!(SPOTLIGHT_DETAIL, ".sc-detail");
selector!(SPOTLIGHT_DETAIL_ITEM, ".scd-item");
selector!(SPOTLIGHT_AIRED, ".scd-item.m-hide");
selector!(SPOTLIGHT_QUALITY, ".scd-item .quality");
selector!(TRENDING_SLIDE, "#trending-home .swiper-container .swiper-slide");
selector!(TRENDING_TITLE, ".item .film-title");
selector!(FEATURED_BLOCK, "#anime-featured .anif-blocks .row .anif-block");
selector!(FEATURED_HEADER, ".anif-block-header");
selector!(FEATURED_ITEM, ".anif-block-ul ul li");
selector!(HOME_BLOCK, ".block_area.block_area_home");
selector!(HOME_HEADING, ".cat-heading");
selector!(HOME_ITEM, ".tab-content .film_list-wrap .flw-item");
selector!(HOME_ITEM_NAME, ".film-detail .film-name .dynamic-name");
selector!(TOP10_BOX, ".block_area .cbox");
selector!(TOP10_DAY, "#top-viewed-day");
selector!(TOP10_WEEK, "#top-viewed-week");
selector!(TOP10_MONTH, "#top-viewed-month");
selector!(GENRE_LINK, ".sb-genre-list li a");

// Search results, listings and suggestions
selector!(PAGINATION, ".pagination");
selector!(PAGE_ITEM, ".page-item");
selector!(PAGE_ACTIVE, ".page-item.active");
selector!(PAGE_NEXT, ".page-item.next");
selector!(RESULT_LIST, ".film_list-wrap");
selector!(RESULT_LIST_ALT, ".search-results");
selector!(RESULT_ITEM, ".flw-item");
selector!(SUGGEST_LIST, ".film-search-result");
selector!(SUGGEST_LIST_ALT, ".search-suggestions");
selector!(SUGGEST_ITEM, ".film-item, a.nav-item:not(.nav-bottom)");
selector!(SUGGEST_INFO, ".film-infor span");

// Anime details
selector!(DETAIL_TITLE, ".anisc-detail .film-name h2, .anisc-detail h2.film-name");
selector!(DETAIL_ALT_TITLE, ".anisc-detail .film-name .film-name-a");
selector!(DETAIL_JAPANESE, ".anisc-detail .film-name .film-name-jp");
selector!(DATA_ID, "[data-id]");
selector!(WATCH_PLAY, ".watch-play");
selector!(DETAIL_POSTER, ".anisc-poster .film-poster-img");
selector!(DETAIL_STATS, ".anisc-detail .film-stats");
selector!(DETAIL_RATING, ".anisc-detail .film-stats .tick-rate");
selector!(DETAIL_TYPE, ".anisc-detail .film-stats .tick");
selector!(DETAIL_SYNOPSIS, ".anisc-detail .film-description .text");
selector!(DETAIL_ITEM_TITLE, ".anisc-detail .item-title");
selector!(SEASON_ITEM, ".seasons .os-list .os-item");
selector!(SEASON_TITLE, ".title");
selector!(
    RELATED_ITEM,
    ".block_area.block_area_sidebar.block_area-relationships .anif-block-ul li"
);
selector!(
    POPULAR_ITEM,
    ".block_area.block_area_sidebar.block_area-popular .anif-block-ul li"
);
selector!(
    RECOMMENDED_ITEM,
    ".block_area.block_area_sidebar.block_area-recommend .anif-block-ul li"
);

// Episode list
selector!(EPISODE_LIST, ".detail-infor-content .ss-list");
selector!(EPISODE_LIST_ALT, ".episodes-range .ss-list");
selector!(EPISODE_LIST_BARE, ".ss-list");
selector!(EPISODE_ITEM, "a.ss-item, a.ssl-item");
selector!(EPISODE_TITLE, ".ss-title .title");
selector!(EPISODE_SUBTITLE, ".ss-title .sub");
selector!(EPISODE_NAME, ".ep-name");

// Servers and streaming
selector!(SERVER_EPISODE, ".anime-detail .episode-title, .server-notice b");
selector!(SUB_SERVER, ".servers-sub .server-item");
selector!(DUB_SERVER, ".servers-dub .server-item");
selector!(SCRIPT, "script");
selector!(VIDEO_SOURCE, "video source");
selector!(IFRAME, "iframe");

regex!(STREAMING_VAR, r"(?s)var\s+streaming\s*=\s*(\{.*?\});");
regex!(SOURCES_VAR, r"(?s)var\s+sources\s*=\s*(\[.*?\]);");
regex!(EPISODE_NUMBER, r"(?i)Episode\s*(\d+)");
