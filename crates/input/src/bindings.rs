use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Physical key to logical action mapping.
///
/// Many-to-many: a key may trigger several actions and an action may be bound
/// to several keys. Each key's action list is an ordered set. The reverse
/// (action to keys) index is computed on demand so it can never go stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyBindings {
    keys: BTreeMap<String, Vec<String>>,
}

impl KeyBindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// The default movement map: WASD plus arrow keys, and the debug/scene keys.
    pub fn wasd() -> Self {
        Self::new()
            .with("w", "forward")
            .with("a", "left")
            .with("s", "back")
            .with("d", "right")
            .with("ArrowUp", "forward")
            .with("ArrowLeft", "left")
            .with("ArrowDown", "back")
            .with("ArrowRight", "right")
            .with("i", "inspector")
            .with("p", "togglePhysics")
            .with("c", "toggleControl")
            .with("m", "mute")
            .with("l", "spawnLemming")
    }

    /// Builder form of [`KeyBindings::bind`].
    pub fn with(mut self, key: &str, action: &str) -> Self {
        self.bind(key, action);
        self
    }

    /// Bind `action` to `key`. Binding the same pair twice is a no-op.
    pub fn bind(&mut self, key: &str, action: &str) {
        let actions = self.keys.entry(key.to_string()).or_default();
        if !actions.iter().any(|a| a == action) {
            actions.push(action.to_string());
        }
    }

    /// Remove a key and all of its actions. Returns the removed actions.
    pub fn unbind_key(&mut self, key: &str) -> Option<Vec<String>> {
        self.keys.remove(key)
    }

    /// Actions bound to `key`, in binding order.
    pub fn actions_for_key(&self, key: &str) -> Option<&[String]> {
        self.keys.get(key).map(Vec::as_slice)
    }

    /// Keys bound to `action`, in key order.
    pub fn keys_for_action(&self, action: &str) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|(_, actions)| actions.iter().any(|a| a == action))
            .map(|(key, _)| key.as_str())
            .collect()
    }

    /// Every action name referenced by any binding.
    pub fn action_names(&self) -> BTreeSet<&str> {
        self.keys
            .values()
            .flat_map(|actions| actions.iter().map(String::as_str))
            .collect()
    }

    /// Key and bound actions, sorted by key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys.iter().map(|(k, a)| (k.as_str(), a.as_slice()))
    }

    /// Number of bound keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl<K, A> FromIterator<(K, A)> for KeyBindings
where
    K: AsRef<str>,
    A: AsRef<str>,
{
    fn from_iter<I: IntoIterator<Item = (K, A)>>(iter: I) -> Self {
        let mut bindings = Self::new();
        for (key, action) in iter {
            bindings.bind(key.as_ref(), action.as_ref());
        }
        bindings
    }
}
