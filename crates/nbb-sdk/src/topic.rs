use std::sync::{Arc, OnceLock};

use nbb_entity::{Entity, EntityError, Value};
use nbb_types::{attribute_map, AttributeMap};

use crate::error::{SdkError, SdkResult};
use crate::site::Site;
use crate::user::User;

const TOPIC_RECORD: &str = "topic record";

/// A topic listed on the forum's front page.
///
/// Built from one embedded record without any request. The `category`
/// attribute is flattened to the category name. The topic's author is only
/// fetched when [`author`](Topic::author) is called, and then kept.
#[derive(Debug)]
pub struct Topic {
    site: Arc<Site>,
    display_name: String,
    attributes: AttributeMap,
    author: OnceLock<User>,
}

impl Topic {
    pub fn from_record(record: Value, site: Arc<Site>) -> SdkResult<Self> {
        let mut attributes = attribute_map(record)
            .ok_or_else(|| SdkError::malformed(TOPIC_RECORD, "expected a JSON object"))?;
        flatten_category(&mut attributes)?;
        let display_name = topic_name(&attributes);

        Ok(Self {
            site,
            display_name,
            attributes,
            author: OnceLock::new(),
        })
    }

    /// Username of the topic's author, read from the embedded `user` record.
    pub fn author_username(&self) -> SdkResult<&str> {
        match self.attributes.get("user") {
            Some(Value::Object(user)) => user
                .get("username")
                .and_then(Value::as_str)
                .ok_or_else(|| SdkError::malformed(TOPIC_RECORD, "user has no username")),
            Some(_) => Err(SdkError::malformed(TOPIC_RECORD, "user is not an object")),
            None => Err(EntityError::AttributeNotFound("user".to_string()).into()),
        }
    }

    /// The topic's author as a full [`User`].
    ///
    /// The first call fetches the user document; later calls return the
    /// same entity without a request. A failed fetch is not remembered.
    pub fn author(&self) -> SdkResult<&User> {
        if let Some(user) = self.author.get() {
            return Ok(user);
        }
        let user = User::fetch(Arc::clone(&self.site), self.author_username()?)?;
        Ok(self.author.get_or_init(|| user))
    }

    /// Whether [`author`](Topic::author) has already been fetched.
    pub fn is_author_loaded(&self) -> bool {
        self.author.get().is_some()
    }
}

impl Entity for Topic {
    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn attributes(&self) -> &AttributeMap {
        &self.attributes
    }
}

/// Replace a `category` object with its `name`.
fn flatten_category(attributes: &mut AttributeMap) -> SdkResult<()> {
    let name = match attributes.get("category") {
        Some(Value::Object(category)) => match category.get("name") {
            Some(Value::String(name)) => name.clone(),
            _ => return Err(SdkError::malformed(TOPIC_RECORD, "category has no name")),
        },
        _ => return Ok(()),
    };
    attributes.insert("category".to_string(), Value::String(name));
    Ok(())
}

/// `slug`, falling back to `tid`.
fn topic_name(attributes: &AttributeMap) -> String {
    match (attributes.get("slug"), attributes.get("tid")) {
        (Some(Value::String(slug)), _) if !slug.is_empty() => slug.clone(),
        (_, Some(Value::Number(tid))) => tid.to_string(),
        (_, Some(Value::String(tid))) if !tid.is_empty() => tid.clone(),
        _ => "topic".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;
    use crate::fixtures::*;
    use chrono::{TimeZone, Utc};
    use nbb_transport::{InMemoryTransport, Method};
    use serde_json::json;

    fn topic(transport: &Arc<InMemoryTransport>, record: Value) -> SdkResult<Topic> {
        init_tracing();
        Topic::from_record(record, site(transport, ClientConfig::default()))
    }

    fn welcome() -> Value {
        front_page()["topics"][0].clone()
    }

    #[test]
    fn category_is_flattened() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, welcome()).unwrap();
        assert_eq!(t.resolve_str("category").unwrap(), "Announcements");
    }

    #[test]
    fn raw_fields_resolve_and_coerce() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, welcome()).unwrap();

        assert_eq!(t.resolve_str("title").unwrap(), "Welcome to your NodeBB!");
        assert_eq!(
            t.resolve_timestamp("timestamp").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap()
        );
        assert_eq!(
            t.resolve_timestamp("lastposttimeISO").unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 2, 12, 30, 0).unwrap()
        );
    }

    #[test]
    fn construction_does_not_fetch() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, welcome()).unwrap();
        assert_eq!(t.author_username().unwrap(), "Webmaster4o");
        assert!(!t.is_author_loaded());
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn author_is_fetched_once() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, welcome()).unwrap();

        let first = t.author().unwrap();
        assert_eq!(first.username(), "Webmaster4o");
        assert_eq!(first.resolve_i64("postcount").unwrap(), 1337);
        let second = t.author().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(t.is_author_loaded());
        assert_eq!(transport.count(Method::Get, &user_url("Webmaster4o")), 1);
    }

    #[test]
    fn raw_user_record_stays_resolvable() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, welcome()).unwrap();
        let user = t.resolve("user").unwrap();
        assert_eq!(user.as_json().unwrap()["uid"], 1);
    }

    #[test]
    fn failed_author_fetch_is_retried_on_next_call() {
        let transport = Arc::new(InMemoryTransport::new());
        let t = topic(&transport, welcome()).unwrap();

        assert!(t.author().is_err());
        assert!(!t.is_author_loaded());
        transport
            .route(
                Method::Get,
                &user_url("Webmaster4o"),
                nbb_transport::HttpResponse::json(&user_document("Webmaster4o")),
            )
            .unwrap();
        assert_eq!(t.author().unwrap().username(), "Webmaster4o");
    }

    #[test]
    fn category_without_name_is_malformed() {
        let transport = Arc::new(forum_transport());
        let record = json!({"tid": 9, "category": {"cid": 4}});
        assert!(matches!(topic(&transport, record), Err(SdkError::MalformedResponse { .. })));
    }

    #[test]
    fn scalar_category_is_kept() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, json!({"tid": 9, "category": "General"})).unwrap();
        assert_eq!(t.resolve_str("category").unwrap(), "General");
    }

    #[test]
    fn missing_user_record() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, json!({"tid": 9})).unwrap();
        assert!(matches!(
            t.author(),
            Err(SdkError::Entity(EntityError::AttributeNotFound(_)))
        ));
    }

    #[test]
    fn user_without_username_is_malformed() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, json!({"tid": 9, "user": {"uid": 3}})).unwrap();
        assert!(matches!(t.author(), Err(SdkError::MalformedResponse { .. })));
    }

    #[test]
    fn non_object_record_is_malformed() {
        let transport = Arc::new(forum_transport());
        assert!(matches!(topic(&transport, json!(7)), Err(SdkError::MalformedResponse { .. })));
    }

    #[test]
    fn display_name_prefers_slug() {
        let transport = Arc::new(forum_transport());
        assert_eq!(topic(&transport, welcome()).unwrap().display_name(), "1/welcome-to-your-nodebb");
        assert_eq!(topic(&transport, json!({"tid": 12})).unwrap().display_name(), "12");
        assert_eq!(topic(&transport, json!({})).unwrap().display_name(), "topic");
    }

    #[test]
    fn dump_flattens_slug_path() {
        let transport = Arc::new(forum_transport());
        let t = topic(&transport, welcome()).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let path = t.dump(dir.path()).unwrap();
        assert_eq!(path, dir.path().join("1_welcome-to-your-nodebb.json"));
        let written: Value = serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["category"], "Announcements");
    }
}
