//! # Config Store
//!
//! Holds the three property groups (bot properties, ad preferences, search
//! parameters). Populated once at start; afterwards keys are fixed and values
//! change only through the typed set protocol.

use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::domain::errors::{PropertyError, StartError};
use crate::domain::paths::config_file;
use crate::domain::properties::{
    GroupKind, PropertyChange, PropertyGroup, PropertyKind, PropertyValue,
};
use crate::domain::types::Interval;

pub const NAME: &str = "name";
pub const CHAT_ID: &str = "chatId";
pub const SCRAPE_INTERVAL: &str = "scrapeInterval";
pub const REMOTE_ADMIN: &str = "remoteAdmin";

#[derive(Debug, Clone)]
pub struct ConfigStore {
    bot: PropertyGroup,
    source: PropertyGroup,
    query: PropertyGroup,
}

impl ConfigStore {
    /// Reads `botprops.json`, `adprefs.json` and `searchparams.json` from `dir`.
    pub fn load(dir: &Path) -> Result<Self, StartError> {
        let read = |kind: GroupKind| -> Result<Value, StartError> {
            let path = config_file(dir, kind.document());
            let content =
                fs::read_to_string(&path).map_err(|e| StartError::config(kind.document(), e))?;
            serde_json::from_str(&content).map_err(|e| StartError::config(kind.document(), e))
        };

        let store = Self::from_documents(
            &read(GroupKind::Bot)?,
            &read(GroupKind::Source)?,
            &read(GroupKind::Query)?,
        )?;
        tracing::info!(
            "Loaded configuration from {} ({} ad preferences, {} search parameters)",
            dir.display(),
            store.source.len(),
            store.query.len()
        );
        Ok(store)
    }

    pub fn from_documents(bot: &Value, source: &Value, query: &Value) -> Result<Self, StartError> {
        let group = |kind: GroupKind, doc: &Value| {
            PropertyGroup::from_json(doc).map_err(|e| StartError::config(kind.document(), e))
        };

        let mut bot = group(GroupKind::Bot, bot)?;
        validate_bot(&mut bot).map_err(|e| StartError::config(GroupKind::Bot.document(), e))?;

        Ok(Self {
            bot,
            source: group(GroupKind::Source, source)?,
            query: group(GroupKind::Query, query)?,
        })
    }

    pub fn group(&self, kind: GroupKind) -> &PropertyGroup {
        match kind {
            GroupKind::Bot => &self.bot,
            GroupKind::Source => &self.source,
            GroupKind::Query => &self.query,
        }
    }

    fn group_mut(&mut self, kind: GroupKind) -> &mut PropertyGroup {
        match kind {
            GroupKind::Bot => &mut self.bot,
            GroupKind::Source => &mut self.source,
            GroupKind::Query => &mut self.query,
        }
    }

    pub fn get(&self, kind: GroupKind, key: &str) -> Result<&PropertyValue, PropertyError> {
        self.group(kind).get(key)
    }

    /// Typed set. Callers changing `scrapeInterval` must rearm the scheduler;
    /// `BotContext::set_property` does this.
    pub fn set(
        &mut self,
        kind: GroupKind,
        key: &str,
        raw: &str,
    ) -> Result<PropertyChange, PropertyError> {
        if kind == GroupKind::Bot && key == NAME && !is_valid_name(raw) {
            return Err(PropertyError::Rejected {
                key: key.to_string(),
                reason: "name must be a single non-empty word".to_string(),
            });
        }
        self.group_mut(kind).set(key, raw)
    }

    pub fn bot_name(&self) -> &str {
        self.text(NAME)
    }

    pub fn chat_id(&self) -> &str {
        self.text(CHAT_ID)
    }

    pub fn scrape_interval(&self) -> Interval {
        let ms = self
            .bot
            .get(SCRAPE_INTERVAL)
            .ok()
            .and_then(PropertyValue::as_int)
            .unwrap_or(-1);
        Interval::from_millis(ms)
    }

    pub fn remote_admin(&self) -> bool {
        self.bot
            .get(REMOTE_ADMIN)
            .ok()
            .and_then(PropertyValue::as_bool)
            .unwrap_or(false)
    }

    fn text(&self, key: &str) -> &str {
        self.bot.get(key).ok().and_then(PropertyValue::as_str).unwrap_or_default()
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(char::is_whitespace)
}

fn require(group: &PropertyGroup, key: &str, kind: PropertyKind) -> Result<(), String> {
    match group.get(key) {
        Ok(value) if value.kind() == kind => Ok(()),
        Ok(value) => Err(format!("'{key}' must be a {kind}, found a {}", value.kind())),
        Err(_) => Err(format!("missing required property '{key}'")),
    }
}

/// Checks the well-known bot keys and registers defaults for the optional ones,
/// so they can be mutated later.
fn validate_bot(bot: &mut PropertyGroup) -> Result<(), String> {
    require(bot, NAME, PropertyKind::Text)?;
    require(bot, CHAT_ID, PropertyKind::Text)?;
    if !is_valid_name(bot.get(NAME).ok().and_then(PropertyValue::as_str).unwrap_or_default()) {
        return Err("'name' must be a single non-empty word".to_string());
    }

    if bot.contains(SCRAPE_INTERVAL) {
        require(bot, SCRAPE_INTERVAL, PropertyKind::Int)?;
    } else {
        bot.insert(SCRAPE_INTERVAL, PropertyValue::Int(-1));
    }

    if bot.contains(REMOTE_ADMIN) {
        require(bot, REMOTE_ADMIN, PropertyKind::Bool)?;
    } else {
        bot.insert(REMOTE_ADMIN, PropertyValue::Bool(false));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::time::Duration;

    fn store(bot: Value) -> Result<ConfigStore, StartError> {
        ConfigStore::from_documents(&bot, &json!({"locationId": 1700185}), &json!({"keywords": "bike"}))
    }

    #[test]
    fn test_defaults_registered() {
        let store = store(json!({"name": "Bot", "chatId": "!room:example.org"})).unwrap();
        assert_eq!(store.scrape_interval(), Interval::Disabled);
        assert!(!store.remote_admin());
        assert_eq!(store.get(GroupKind::Bot, REMOTE_ADMIN).unwrap(), &PropertyValue::Bool(false));
    }

    #[test]
    fn test_typed_accessors() {
        let store = store(json!({
            "name": "Bot",
            "chatId": "!room:example.org",
            "scrapeInterval": 1000,
            "remoteAdmin": true,
            "owner": "sam"
        }))
        .unwrap();
        assert_eq!(store.bot_name(), "Bot");
        assert_eq!(store.chat_id(), "!room:example.org");
        assert_eq!(store.scrape_interval(), Interval::Every(Duration::from_millis(1000)));
        assert!(store.remote_admin());
        assert_eq!(
            store.get(GroupKind::Bot, "owner").unwrap(),
            &PropertyValue::Text("sam".to_string())
        );
    }

    #[test]
    fn test_invalid_bot_documents() {
        assert!(store(json!({"chatId": "x"})).is_err());
        assert!(store(json!({"name": "Bot"})).is_err());
        assert!(store(json!({"name": "Two words", "chatId": "x"})).is_err());
        assert!(store(json!({"name": "Bot", "chatId": "x", "scrapeInterval": "fast"})).is_err());
        assert!(store(json!({"name": "Bot", "chatId": "x", "remoteAdmin": 1})).is_err());
    }

    #[test]
    fn test_set_interval_stays_integer() {
        let mut store = store(json!({"name": "Bot", "chatId": "x", "scrapeInterval": 1000})).unwrap();
        let change = store.set(GroupKind::Bot, SCRAPE_INTERVAL, "5000").unwrap();
        assert_eq!(change.old, PropertyValue::Int(1000));
        assert_eq!(change.new, PropertyValue::Int(5000));
        assert!(store.set(GroupKind::Bot, SCRAPE_INTERVAL, "5s").is_err());
        assert_eq!(store.scrape_interval(), Interval::Every(Duration::from_millis(5000)));
    }

    #[test]
    fn test_set_name_must_stay_a_word() {
        let mut store = store(json!({"name": "Bot", "chatId": "x"})).unwrap();
        assert!(matches!(
            store.set(GroupKind::Bot, NAME, "Big Bot"),
            Err(PropertyError::Rejected { .. })
        ));
        assert_eq!(store.bot_name(), "Bot");
        store.set(GroupKind::Bot, NAME, "Scout").unwrap();
        assert_eq!(store.bot_name(), "Scout");
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("botprops.json"), r#"{"name": "Bot", "chatId": "x"}"#).unwrap();
        fs::write(dir.path().join("adprefs.json"), r#"{"categoryId": 644}"#).unwrap();
        fs::write(dir.path().join("searchparams.json"), r#"{"keywords": "kayak"}"#).unwrap();

        let store = ConfigStore::load(dir.path()).unwrap();
        assert_eq!(store.get(GroupKind::Source, "categoryId").unwrap(), &PropertyValue::Int(644));
    }

    #[test]
    fn test_load_reports_failing_document() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("botprops.json"), r#"{"name": "Bot", "chatId": "x"}"#).unwrap();
        fs::write(dir.path().join("adprefs.json"), "{ not json").unwrap();

        match ConfigStore::load(dir.path()) {
            Err(StartError::ConfigLoad { document, .. }) => assert_eq!(document, "adprefs.json"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
