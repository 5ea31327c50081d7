//! Streaming servers offered for an episode.

use scraper::{ElementRef, Selector};
use shared::models::{ServerEntry, ServerList, StreamType};

use super::selectors::*;
use super::{attr, first, item, non_empty_text, parse, text, ExtractError, PageExtractor};

#[derive(Debug, Clone, Copy, Default)]
pub struct ServersExtractor;

impl PageExtractor for ServersExtractor {
    type Output = ServerList;

    fn extract(&self, html: &str) -> ServerList {
        let document = parse(html);
        let root = document.root_element();

        let episode = first(root, &SERVER_EPISODE).and_then(|element| {
            EPISODE_NUMBER
                .captures(&text(element))
                .and_then(|caps| caps.get(1))
                .and_then(|number| number.as_str().parse().ok())
        });

        ServerList {
            episode,
            sub: servers(root, &SUB_SERVER, StreamType::Sub),
            dub: servers(root, &DUB_SERVER, StreamType::Dub),
        }
    }
}

fn servers(root: ElementRef<'_>, selector: &Selector, stream_type: StreamType) -> Vec<ServerEntry> {
    let mut entries: Vec<ServerEntry> = Vec::new();

    for (i, element) in root.select(selector).enumerate() {
        // Index stays contiguous across skipped entries
        let index = entries.len() as u32 + 1;
        if let Some(entry) = item(stream_type.as_str(), i, || server(element, stream_type, index)) {
            entries.push(entry);
        }
    }

    entries
}

fn server(
    element: ElementRef<'_>,
    stream_type: StreamType,
    index: u32,
) -> Result<ServerEntry, ExtractError> {
    let id = attr(element, "data-id").or_else(|| attr(element, "data-server-id"));
    let name = non_empty_text(element);

    if id.is_none() && name.is_none() {
        return Err(ExtractError::MissingServer);
    }

    Ok(ServerEntry {
        index,
        stream_type,
        id,
        name,
    })
}
