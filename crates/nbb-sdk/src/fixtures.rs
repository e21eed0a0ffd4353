//! Canned NodeBB responses shared by the SDK tests.

use std::sync::Arc;

use nbb_transport::{HttpResponse, InMemoryTransport, Method};
use serde_json::{json, Value};

use crate::config::ClientConfig;
use crate::forum::Forum;
use crate::site::{parse_url, Site};

pub const BASE: &str = "https://forum.example.com/";
pub const API: &str = "https://forum.example.com/api/";
pub const CONFIG: &str = "https://forum.example.com/api/config";
pub const AVATAR: &str = "https://forum.example.com/assets/uploads/profile/1-profileavatar.png";

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();
}

pub fn user_url(username: &str) -> String {
    format!("{API}user/{username}")
}

pub fn front_page() -> Value {
    json!({
        "title": "Home",
        "loggedIn": false,
        "topicCount": 2,
        "topics": [
            {
                "tid": 1,
                "slug": "1/welcome-to-your-nodebb",
                "title": "Welcome to your NodeBB!",
                "timestamp": 1609459200000_u64,
                "lastposttimeISO": "2021-01-02T12:30:00.000Z",
                "category": {"cid": 2, "name": "Announcements", "slug": "2/announcements"},
                "user": {"uid": 1, "username": "Webmaster4o", "picture": null}
            },
            {
                "tid": 2,
                "slug": "2/release-notes",
                "title": "Release notes",
                "category": {"cid": 2, "name": "Announcements"},
                "user": {"uid": 3, "username": "ccc"}
            }
        ]
    })
}

pub fn site_config() -> Value {
    json!({
        "siteTitle": "Example Forum",
        "relative_path": "",
        "version": "1.18.6",
        "minimumTitleLength": 3
    })
}

pub fn user_document(username: &str) -> Value {
    json!({
        "uid": 1,
        "username": username,
        "userslug": username.to_lowercase(),
        "picture": "/assets/uploads/profile/1-profileavatar.png",
        "joindate": 1456789012345_u64,
        "reputation": 42,
        "postcount": 1337
    })
}

/// A transport that answers like a healthy NodeBB forum.
pub fn forum_transport() -> InMemoryTransport {
    InMemoryTransport::new()
        .with_route(
            Method::Head,
            BASE,
            HttpResponse::new(200).with_header("X-Powered-By", "NodeBB"),
        )
        .unwrap()
        .with_json(API, front_page())
        .unwrap()
        .with_json(CONFIG, site_config())
        .unwrap()
        .with_json(&user_url("Webmaster4o"), user_document("Webmaster4o"))
        .unwrap()
        .with_json(&user_url("ccc"), user_document("ccc"))
        .unwrap()
        .with_route(
            Method::Get,
            AVATAR,
            HttpResponse::new(200)
                .with_header("Content-Type", "image/png")
                .with_body(b"\x89PNG\r\n\x1a\n".to_vec()),
        )
        .unwrap()
}

pub fn connect(transport: &Arc<InMemoryTransport>) -> Forum {
    connect_with_config(transport, ClientConfig::default())
}

pub fn connect_with_config(transport: &Arc<InMemoryTransport>, config: ClientConfig) -> Forum {
    init_tracing();
    Forum::connect_with(BASE, transport.clone(), config).unwrap()
}

pub fn site(transport: &Arc<InMemoryTransport>, config: ClientConfig) -> Arc<Site> {
    Arc::new(Site::new(parse_url(BASE).unwrap(), transport.clone(), config).unwrap())
}
