// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playlist expansion through the YouTube Data API.
//!
//! Fetching runs on a background thread and reports back over a channel,
//! so the UI loop never blocks on the network. Pages are fetched until the
//! playlist ends or `MAX_PAGES` is reached. A failure after the first page
//! keeps what was already gathered.

use crate::error::FetchError;
use serde::Deserialize;
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

const API_URL: &str = "https://www.googleapis.com/youtube/v3/playlistItems";
const PAGE_SIZE: u32 = 50;
const MAX_PAGES: usize = 10;
const TIMEOUT: Duration = Duration::from_secs(20);

/// Titles YouTube reports for entries that can no longer be played.
const UNAVAILABLE_TITLES: [&str; 2] = ["Private video", "Deleted video"];

/// One video of a playlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub video_id: String,
    pub title: String,
    /// Zero-based position in the playlist.
    pub position: u32,
}

impl PlaylistEntry {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

/// Result of a (possibly interrupted) expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub playlist_id: String,
    pub entries: Vec<PlaylistEntry>,
    /// Set when a later page failed; `entries` holds the earlier pages.
    pub interrupted: Option<FetchError>,
}

// --- API RESPONSE ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ItemsPage {
    #[serde(default)]
    items: Vec<Item>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Item {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    position: Option<u32>,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// One parsed response page.
#[derive(Debug)]
struct Page {
    entries: Vec<PlaylistEntry>,
    next: Option<String>,
    /// Raw items on the page, skipped ones included.
    items: u32,
}

/// Turn one response page into entries. `offset` is the number of raw
/// items on earlier pages and numbers entries lacking a position.
fn parse_page(body: &str, offset: u32) -> Result<Page, FetchError> {
    let page: ItemsPage = serde_json::from_str(body).map_err(|e| FetchError::Api {
        status: 200,
        message: format!("unexpected response: {}", e),
    })?;

    let items = page.items.len() as u32;
    let entries = page
        .items
        .into_iter()
        .zip(offset..)
        .filter_map(|(item, fallback)| {
            let snippet = item.snippet;
            let video_id = snippet.resource_id.video_id?;
            if UNAVAILABLE_TITLES.contains(&snippet.title.as_str()) {
                return None;
            }
            Some(PlaylistEntry {
                video_id,
                title: snippet.title,
                position: snippet.position.unwrap_or(fallback),
            })
        })
        .collect();

    Ok(Page {
        entries,
        next: page.next_page_token.filter(|t| !t.is_empty()),
        items,
    })
}

/// Blocking playlist fetcher.
pub struct PlaylistClient {
    http: reqwest::blocking::Client,
    api_key: String,
}

impl PlaylistClient {
    pub fn new(api_key: Option<String>) -> Result<Self, FetchError> {
        let api_key = api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or(FetchError::MissingApiKey)?;
        let http = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        Ok(Self { http, api_key })
    }

    fn fetch_page(&self, playlist_id: &str, page_token: Option<&str>) -> Result<String, FetchError> {
        let page_size = PAGE_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("maxResults", page_size.as_str()),
            ("playlistId", playlist_id),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .http
            .get(API_URL)
            .query(&query)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.canonical_reason().unwrap_or("error").to_string());
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(body)
    }

    /// Fetch every page of a playlist.
    pub fn expand(&self, playlist_id: &str) -> Result<Expansion, FetchError> {
        let mut entries = Vec::new();
        let mut seen = 0;
        let mut token: Option<String> = None;
        let mut interrupted = None;

        for page in 0..MAX_PAGES {
            let result = self
                .fetch_page(playlist_id, token.as_deref())
                .and_then(|body| parse_page(&body, seen));

            match result {
                Ok(mut parsed) => {
                    log::debug!(
                        "Playlist {} page {}: {} of {} items kept",
                        playlist_id,
                        page,
                        parsed.entries.len(),
                        parsed.items
                    );
                    seen += parsed.items;
                    entries.append(&mut parsed.entries);
                    token = parsed.next;
                    if token.is_none() {
                        break;
                    }
                }
                Err(e) if page == 0 => return Err(e),
                Err(e) => {
                    log::warn!("Playlist {} interrupted after {} entries: {}", playlist_id, entries.len(), e);
                    interrupted = Some(e);
                    break;
                }
            }
        }

        if entries.is_empty() {
            return Err(interrupted.unwrap_or(FetchError::Empty));
        }
        Ok(Expansion {
            playlist_id: playlist_id.to_string(),
            entries,
            interrupted,
        })
    }
}

/// Expand a playlist on a background thread.
pub fn spawn_expand(api_key: Option<String>, playlist_id: String) -> Receiver<Result<Expansion, FetchError>> {
    let (sender, receiver) = channel();

    std::thread::spawn(move || {
        let result = PlaylistClient::new(api_key).and_then(|client| client.expand(&playlist_id));
        match &result {
            Ok(expansion) => log::info!(
                "Expanded playlist {} into {} videos",
                playlist_id,
                expansion.entries.len()
            ),
            Err(e) => log::error!("Failed to expand playlist {}: {}", playlist_id, e),
        }
        let _ = sender.send(result);
    });

    receiver
}
