use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nbb_types::{coerce_json, AttrValue, AttributeMap, Value};

use crate::alias::{AliasTable, MAX_ALIAS_HOPS};
use crate::dump;
use crate::error::{EntityError, EntityResult};

/// An immutable snapshot of one remote resource.
///
/// Implementors only supply their attribute map, a display name and, when
/// needed, an alias table. Every read goes through the shared resolution
/// path in the provided methods.
pub trait Entity {
    /// Alias declarations for this entity type.
    const ALIASES: AliasTable = AliasTable::empty();

    /// Name used for display and as the dump file stem.
    fn display_name(&self) -> &str;

    /// The attributes this entity was constructed with.
    fn attributes(&self) -> &AttributeMap;

    /// Resolve `key` to a coerced value.
    ///
    /// Direct attributes win over aliases. Unknown keys fail with
    /// [`EntityError::AttributeNotFound`].
    fn resolve(&self, key: &str) -> EntityResult<AttrValue> {
        resolve(self.attributes(), &Self::ALIASES, key)
    }

    /// Resolve `key` without coercion.
    fn get_raw(&self, key: &str) -> EntityResult<&Value> {
        locate(self.attributes(), &Self::ALIASES, key)
    }

    /// Returns `true` if `key` resolves, directly or through an alias.
    fn contains(&self, key: &str) -> bool {
        self.get_raw(key).is_ok()
    }

    /// Stored attribute keys in ascending order. Aliases are not listed.
    fn keys(&self) -> Vec<&str> {
        self.attributes().keys().map(String::as_str).collect()
    }

    /// Resolve `key` and require a JSON string.
    fn resolve_str(&self, key: &str) -> EntityResult<String> {
        let value = self.resolve(key)?;
        match value.as_str() {
            Some(s) => Ok(s.to_string()),
            None => Err(mismatch(key, "string", &value)),
        }
    }

    /// Resolve `key` and require an integer.
    fn resolve_i64(&self, key: &str) -> EntityResult<i64> {
        let value = self.resolve(key)?;
        value.as_i64().ok_or_else(|| mismatch(key, "integer", &value))
    }

    /// Resolve `key` and require a value the coercer turned into a timestamp.
    fn resolve_timestamp(&self, key: &str) -> EntityResult<DateTime<Utc>> {
        let value = self.resolve(key)?;
        value
            .as_timestamp()
            .ok_or_else(|| mismatch(key, "timestamp", &value))
    }

    /// Write the attributes to `<directory>/<display name>.json`.
    ///
    /// Keys are sorted and indented by two spaces. Returns the written path.
    fn dump(&self, directory: &Path) -> EntityResult<PathBuf> {
        dump::write_snapshot(directory, self.display_name(), self.attributes())
    }
}

/// Resolve `key` against an attribute map and alias table.
///
/// Follows at most [`MAX_ALIAS_HOPS`] aliases before failing with
/// [`EntityError::AliasCycle`].
pub fn resolve(
    attributes: &AttributeMap,
    aliases: &AliasTable,
    key: &str,
) -> EntityResult<AttrValue> {
    locate(attributes, aliases, key).map(coerce_json)
}

fn locate<'a>(
    attributes: &'a AttributeMap,
    aliases: &AliasTable,
    key: &str,
) -> EntityResult<&'a Value> {
    let mut current = key;
    for _ in 0..=MAX_ALIAS_HOPS {
        if let Some(raw) = attributes.get(current) {
            return Ok(raw);
        }
        match aliases.lookup(current) {
            Some(target) => current = target,
            None => return Err(EntityError::AttributeNotFound(current.to_string())),
        }
    }
    Err(EntityError::AliasCycle {
        alias: key.to_string(),
        hops: MAX_ALIAS_HOPS,
    })
}

/// Merge documents into one attribute map. Later documents win on
/// conflicting keys.
pub fn merge_documents<I>(documents: I) -> AttributeMap
where
    I: IntoIterator<Item = AttributeMap>,
{
    let mut merged = AttributeMap::new();
    for document in documents {
        merged.extend(document);
    }
    merged
}

fn mismatch(key: &str, expected: &'static str, found: &AttrValue) -> EntityError {
    EntityError::TypeMismatch {
        key: key.to_string(),
        expected,
        found: found.type_name(),
    }
}
