use serde::{Deserialize, Serialize};

/// When an action's callback runs relative to its keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerType {
    /// Once on the key's down edge. Auto-repeat does not count.
    Pressed,
    /// Every tick while the key is down.
    Held,
    /// Once on the key's up edge.
    Released,
}

impl TriggerType {
    /// Lowercase name, as used in key-map files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pressed => "pressed",
            Self::Held => "held",
            Self::Released => "released",
        }
    }
}

impl std::fmt::Display for TriggerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a callback is told when its action fires.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEvent<'a> {
    /// Logical action name.
    pub action: &'a str,
    /// Physical key that caused the dispatch.
    pub key: &'a str,
    pub trigger: TriggerType,
    /// Seconds covered by the most recent tick.
    pub delta_time: f32,
    /// Key state at dispatch time.
    pub key_down: bool,
}

pub type ActionCallback = Box<dyn FnMut(&ActionEvent<'_>)>;

/// A logical action's dispatch semantics and behavior.
pub struct ActionDefinition {
    pub trigger: TriggerType,
    pub callback: ActionCallback,
}

impl ActionDefinition {
    /// Box `callback` for the given trigger.
    pub fn new<F>(trigger: TriggerType, callback: F) -> Self
    where
        F: FnMut(&ActionEvent<'_>) + 'static,
    {
        Self {
            trigger,
            callback: Box::new(callback),
        }
    }
}

impl std::fmt::Debug for ActionDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActionDefinition")
            .field("trigger", &self.trigger)
            .finish_non_exhaustive()
    }
}
