//! Test helpers: a canned-response HTTP server, an in-memory catalog source,
//! a tracing event recorder and proptest strategies for catalog records.

use crate::source::{CatalogSource, SourceError};
use async_trait::async_trait;
use proptest::prelude::*;
use shared::{CatalogRecord, MediaType};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{self, Layer, SubscriberExt};

const NOT_FOUND: &str = r#"{"status":404,"type":"BadResponseException","message":"Resource does not exist","error":null}"#;

/// Minimal HTTP/1.1 server answering request targets from a fixed table.
///
/// Unknown targets get a Jikan-style 404. Every connection is closed after
/// one response.
pub(crate) struct StubServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
}

impl StubServer {
    pub async fn start(routes: Vec<(&str, u16, &str)>) -> Self {
        let routes: Arc<HashMap<String, (u16, String)>> = Arc::new(
            routes
                .into_iter()
                .map(|(target, status, body)| (target.to_string(), (status, body.to_string())))
                .collect(),
        );
        let hits = Arc::new(AtomicUsize::new(0));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server_hits = hits.clone();
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let routes = routes.clone();
                let hits = server_hits.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    loop {
                        let n = socket.read(&mut buf[read..]).await.unwrap_or(0);
                        read += n;
                        if n == 0
                            || read == buf.len()
                            || buf[..read].windows(4).any(|w| w == b"\r\n\r\n")
                        {
                            break;
                        }
                    }

                    let request = String::from_utf8_lossy(&buf[..read]);
                    let target = request.split_whitespace().nth(1).unwrap_or("/").to_string();
                    hits.fetch_add(1, Ordering::SeqCst);

                    let (status, body) = routes
                        .get(&target)
                        .cloned()
                        .unwrap_or_else(|| (404, NOT_FOUND.to_string()));
                    let response = format!(
                        "HTTP/1.1 {} Stub\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
        }
    }

    /// Number of requests served so far
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

/// In-memory catalog source returning a fixed answer and counting calls
pub(crate) struct FakeSource {
    response: Result<Vec<CatalogRecord>, u16>,
    calls: Mutex<Vec<(MediaType, String)>>,
}

impl FakeSource {
    pub fn returning(records: Vec<CatalogRecord>) -> Self {
        Self {
            response: Ok(records),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Source whose every call fails with the given HTTP status
    pub fn failing(status: u16) -> Self {
        Self {
            response: Err(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<(MediaType, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CatalogSource for FakeSource {
    async fn search_catalog(
        &self,
        media_type: MediaType,
        query: &str,
    ) -> Result<Vec<CatalogRecord>, SourceError> {
        self.calls
            .lock()
            .unwrap()
            .push((media_type, query.to_string()));
        match &self.response {
            Ok(records) => Ok(records.clone()),
            Err(status) => Err(SourceError::Status {
                url: format!("fake://{}?q={}", media_type, query),
                status: *status,
                message: "fake failure".to_string(),
            }),
        }
    }
}

/// One tracing event as seen by [`CapturedEvents`]
#[derive(Debug, Clone)]
pub(crate) struct CapturedEvent {
    pub level: Level,
    pub fields: Vec<String>,
}

impl CapturedEvent {
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.iter().any(|field| field == name)
    }
}

/// Layer recording the level and field names of every event
#[derive(Clone, Default)]
pub(crate) struct CapturedEvents {
    events: Arc<Mutex<Vec<CapturedEvent>>>,
}

impl CapturedEvents {
    /// Subscriber that feeds this recorder, for `WithSubscriber::with_subscriber`
    pub fn subscriber(&self) -> impl Subscriber + Send + Sync + 'static {
        tracing_subscriber::registry().with(self.clone())
    }

    pub fn at_level(&self, level: Level) -> Vec<CapturedEvent> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|event| event.level == level)
            .cloned()
            .collect()
    }
}

struct FieldNames(Vec<String>);

impl Visit for FieldNames {
    fn record_debug(&mut self, field: &Field, _value: &dyn fmt::Debug) {
        self.0.push(field.name().to_string());
    }
}

impl<S: Subscriber> Layer<S> for CapturedEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: layer::Context<'_, S>) {
        let mut names = FieldNames(Vec::new());
        event.record(&mut names);
        self.events.lock().unwrap().push(CapturedEvent {
            level: *event.metadata().level(),
            fields: names.0,
        });
    }
}

/// Record builder for hand-written fixtures
pub(crate) fn record(id: u32, title: &str) -> CatalogRecord {
    CatalogRecord::new(id, title)
}

const STATUSES: &[&str] = &[
    "Currently Airing",
    "Finished Airing",
    "Not yet aired",
    "Publishing",
    "Finished",
    "On Hiatus",
];

const RATINGS: &[&str] = &[
    "G - All Ages",
    "PG - Children",
    "PG-13 - Teens 13 or older",
    "R - 17+ (violence & profanity)",
    "R+ - Mild Nudity",
    "Rx - Hentai",
];

const SEASONS: &[&str] = &["winter", "spring", "summer", "fall", "Fall"];

fn optional_label(labels: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    proptest::option::of(proptest::sample::select(labels).prop_map(|s| s.to_string()))
}

/// Arbitrary record with sparse optional fields and few distinct key values,
/// so ties are common.
pub(crate) fn arb_record() -> impl Strategy<Value = CatalogRecord> {
    (
        "[A-Za-zé ]{1,6}",
        optional_label(STATUSES),
        optional_label(RATINGS),
        optional_label(SEASONS),
        proptest::option::of((1u32..20).prop_map(|s| s as f64 / 2.0)),
        proptest::option::of(1u32..8),
        proptest::option::of(1u32..8),
    )
        .prop_map(|(title, status, rating, season, score, popularity, rank)| {
            let mut record = CatalogRecord::new(0, title);
            record.status = status;
            record.rating = rating;
            record.season = season;
            record.score = score;
            record.popularity = popularity;
            record.rank = rank;
            record
        })
}

/// Vector of arbitrary records with ids unique within the set
pub(crate) fn arb_records() -> impl Strategy<Value = Vec<CatalogRecord>> {
    proptest::collection::vec(arb_record(), 0..24).prop_map(|records| {
        records
            .into_iter()
            .enumerate()
            .map(|(i, mut record)| {
                record.id = i as u32;
                record
            })
            .collect()
    })
}
