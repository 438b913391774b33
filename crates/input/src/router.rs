use std::collections::{BTreeMap, HashMap, HashSet};

use crate::action::{ActionDefinition, ActionEvent, TriggerType};
use crate::bindings::KeyBindings;

/// How `held` actions behave when several held keys map to the same action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeldDispatch {
    /// One callback per (key, action) pair each tick. Two movement keys bound
    /// to the same action double its effect.
    #[default]
    PerKey,
    /// At most one callback per action each tick.
    Dedup,
}

/// Routes raw key edges to logical action callbacks.
///
/// Key state is the only input state kept; `pressed` and `released` actions
/// fire from [`InputActionRouter::on_key_transition`], `held` actions from
/// [`InputActionRouter::tick`].
#[derive(Default)]
pub struct InputActionRouter {
    bindings: KeyBindings,
    actions: HashMap<String, ActionDefinition>,
    /// Key -> currently down. BTreeMap keeps held dispatch order stable.
    state: BTreeMap<String, bool>,
    held_dispatch: HeldDispatch,
    last_delta: f32,
}

impl InputActionRouter {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            bindings,
            ..Self::default()
        }
    }

    /// Choose how held actions bound to several down keys fire.
    pub fn with_held_dispatch(mut self, held_dispatch: HeldDispatch) -> Self {
        self.held_dispatch = held_dispatch;
        self
    }

    /// Replace the key -> actions mapping. Key state is kept.
    pub fn register_key_bindings(&mut self, bindings: KeyBindings) {
        tracing::debug!(keys = bindings.len(), "key bindings replaced");
        self.bindings = bindings;
    }

    /// Key map currently in effect.
    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Register or overwrite an action's trigger type and callback.
    pub fn define_action<F>(&mut self, name: impl Into<String>, trigger: TriggerType, callback: F)
    where
        F: FnMut(&ActionEvent<'_>) + 'static,
    {
        let name = name.into();
        if let Some(old) = self.actions.get(&name) {
            tracing::debug!(action = %name, old = %old.trigger, new = %trigger, "action redefined");
        }
        self.actions
            .insert(name, ActionDefinition::new(trigger, callback));
    }

    /// Remove an action's definition. Its bindings become no-ops.
    pub fn remove_action(&mut self, name: &str) -> Option<ActionDefinition> {
        self.actions.remove(name)
    }

    /// Trigger type of a defined action.
    pub fn trigger_of(&self, name: &str) -> Option<TriggerType> {
        self.actions.get(name).map(|d| d.trigger)
    }

    /// Defined action names, sorted.
    pub fn defined_actions(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Actions referenced by a binding that have no definition.
    pub fn unbound_actions(&self) -> Vec<&str> {
        self.bindings
            .action_names()
            .into_iter()
            .filter(|name| !self.actions.contains_key(*name))
            .collect()
    }

    /// Whether `key` is currently down. Unknown keys are not held.
    pub fn is_held(&self, key: &str) -> bool {
        self.state.get(key).copied().unwrap_or(false)
    }

    /// Keys currently down, sorted.
    pub fn held_keys(&self) -> impl Iterator<Item = &str> {
        self.state
            .iter()
            .filter(|(_, down)| **down)
            .map(|(key, _)| key.as_str())
    }

    /// Release every key without firing `released` actions (focus loss).
    pub fn clear_key_state(&mut self) {
        self.state.clear();
    }

    /// Feed one physical key edge. Returns how many callbacks ran.
    ///
    /// On a down edge, `pressed` actions fire unless the event is an
    /// auto-repeat or the key was already down. On an up edge, `released`
    /// actions always fire.
    pub fn on_key_transition(&mut self, key: &str, is_down: bool, repeat: bool) -> usize {
        let was_down = self.is_held(key);
        self.state.insert(key.to_string(), is_down);
        tracing::trace!(key, is_down, repeat, "key transition");

        if is_down {
            if repeat || was_down {
                return 0;
            }
            self.dispatch_key(key, TriggerType::Pressed, true)
        } else {
            self.dispatch_key(key, TriggerType::Released, false)
        }
    }

    /// Fire `held` actions for every key currently down. Returns how many
    /// callbacks ran.
    pub fn tick(&mut self, delta_time: f32) -> usize {
        self.last_delta = delta_time;
        let dedup = self.held_dispatch == HeldDispatch::Dedup;
        let mut seen: HashSet<&str> = HashSet::new();
        let mut fired = 0;

        for (key, down) in &self.state {
            if !*down {
                continue;
            }
            let Some(names) = self.bindings.actions_for_key(key) else {
                continue;
            };
            for name in names {
                let Some(def) = self.actions.get_mut(name) else {
                    continue;
                };
                if def.trigger != TriggerType::Held {
                    continue;
                }
                if dedup && !seen.insert(name.as_str()) {
                    continue;
                }
                tracing::trace!(action = %name, key = %key, "action held");
                (def.callback)(&ActionEvent {
                    action: name,
                    key,
                    trigger: TriggerType::Held,
                    delta_time,
                    key_down: true,
                });
                fired += 1;
            }
        }
        fired
    }

    fn dispatch_key(&mut self, key: &str, trigger: TriggerType, key_down: bool) -> usize {
        let Some(names) = self.bindings.actions_for_key(key) else {
            return 0;
        };
        let delta_time = self.last_delta;
        let mut fired = 0;
        for name in names {
            let Some(def) = self.actions.get_mut(name) else {
                tracing::trace!(action = %name, key, "bound action has no definition");
                continue;
            };
            if def.trigger != trigger {
                continue;
            }
            tracing::debug!(action = %name, key, %trigger, "action fired");
            (def.callback)(&ActionEvent {
                action: name,
                key,
                trigger,
                delta_time,
                key_down,
            });
            fired += 1;
        }
        fired
    }
}

impl std::fmt::Debug for InputActionRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InputActionRouter")
            .field("bindings", &self.bindings)
            .field("actions", &self.defined_actions())
            .field("state", &self.state)
            .field("held_dispatch", &self.held_dispatch)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, impl FnMut(&ActionEvent<'_>) + 'static) {
        let hits = Rc::new(Cell::new(0));
        let c = hits.clone();
        (hits, move |_: &ActionEvent<'_>| c.set(c.get() + 1))
    }

    #[test]
    fn pressed_fires_once_per_down_edge() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("inspector", TriggerType::Pressed, cb);

        assert_eq!(router.on_key_transition("i", true, false), 1);
        // OS auto-repeat while held
        router.on_key_transition("i", true, true);
        router.on_key_transition("i", true, true);
        for _ in 0..10 {
            router.tick(0.016);
        }
        assert_eq!(hits.get(), 1);

        router.on_key_transition("i", false, false);
        router.on_key_transition("i", true, false);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn pressed_ignores_down_while_already_down() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("inspector", TriggerType::Pressed, cb);

        router.on_key_transition("i", true, false);
        // Repeat without the repeat flag set
        router.on_key_transition("i", true, false);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn held_fires_every_tick_while_down() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let total = Rc::new(Cell::new(0.0f32));
        let t = total.clone();
        router.define_action("forward", TriggerType::Held, move |e| {
            t.set(t.get() + e.delta_time)
        });

        router.tick(0.1);
        assert_eq!(total.get(), 0.0);

        router.on_key_transition("w", true, false);
        router.tick(0.1);
        router.tick(0.2);
        assert!((total.get() - 0.3).abs() < 1e-6);

        router.on_key_transition("w", false, false);
        router.tick(0.1);
        assert!((total.get() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn held_does_not_fire_on_the_down_edge() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("forward", TriggerType::Held, cb);
        assert_eq!(router.on_key_transition("w", true, false), 0);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn released_fires_once_on_up_edge() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("mute", TriggerType::Released, cb);

        router.on_key_transition("m", true, false);
        router.tick(0.016);
        assert_eq!(hits.get(), 0);
        router.on_key_transition("m", false, false);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn released_fires_without_a_recorded_down() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("mute", TriggerType::Released, cb);
        router.on_key_transition("m", false, false);
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn two_held_keys_double_fire_by_default() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("forward", TriggerType::Held, cb);

        router.on_key_transition("w", true, false);
        router.on_key_transition("ArrowUp", true, false);
        assert_eq!(router.tick(0.016), 2);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn dedup_policy_fires_each_action_once_per_tick() {
        let mut router =
            InputActionRouter::new(KeyBindings::wasd()).with_held_dispatch(HeldDispatch::Dedup);
        let (hits, cb) = counter();
        router.define_action("forward", TriggerType::Held, cb);

        router.on_key_transition("w", true, false);
        router.on_key_transition("ArrowUp", true, false);
        router.tick(0.016);
        router.tick(0.016);
        assert_eq!(hits.get(), 2);
    }

    #[test]
    fn undefined_actions_are_silent_no_ops() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        assert_eq!(router.on_key_transition("w", true, false), 0);
        assert_eq!(router.tick(0.016), 0);
        assert_eq!(router.on_key_transition("w", false, false), 0);
        assert!(router.unbound_actions().contains(&"forward"));
    }

    #[test]
    fn unknown_keys_update_state_but_dispatch_nothing() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        assert!(!router.is_held("q"));
        router.on_key_transition("q", true, false);
        assert!(router.is_held("q"));
        assert_eq!(router.tick(0.016), 0);
    }

    #[test]
    fn trigger_type_filters_dispatch() {
        let mut router = InputActionRouter::new(KeyBindings::new().with("x", "fire"));
        let (hits, cb) = counter();
        router.define_action("fire", TriggerType::Released, cb);
        router.on_key_transition("x", true, false);
        router.tick(0.1);
        assert_eq!(hits.get(), 0);
    }

    #[test]
    fn last_definition_wins() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (first, cb1) = counter();
        let (second, cb2) = counter();
        router.define_action("inspector", TriggerType::Pressed, cb1);
        router.define_action("inspector", TriggerType::Released, cb2);
        assert_eq!(router.trigger_of("inspector"), Some(TriggerType::Released));

        router.on_key_transition("i", true, false);
        router.on_key_transition("i", false, false);
        assert_eq!(first.get(), 0);
        assert_eq!(second.get(), 1);
    }

    #[test]
    fn one_key_triggers_every_bound_action_in_order() {
        let bindings = KeyBindings::new().with("space", "jump").with("space", "confirm");
        let mut router = InputActionRouter::new(bindings);
        let log = Rc::new(RefCell::new(Vec::new()));
        for name in ["jump", "confirm"] {
            let l = log.clone();
            router.define_action(name, TriggerType::Pressed, move |e| {
                l.borrow_mut().push(e.action.to_string())
            });
        }
        router.on_key_transition("space", true, false);
        assert_eq!(*log.borrow(), vec!["jump", "confirm"]);
    }

    #[test]
    fn pressed_receives_last_tick_delta_and_key() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let seen = Rc::new(RefCell::new(None));
        let s = seen.clone();
        router.define_action("inspector", TriggerType::Pressed, move |e| {
            *s.borrow_mut() = Some((e.key.to_string(), e.delta_time, e.key_down));
        });
        router.tick(0.25);
        router.on_key_transition("i", true, false);
        assert_eq!(*seen.borrow(), Some(("i".to_string(), 0.25, true)));
    }

    #[test]
    fn rebinding_keeps_key_state() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("jump", TriggerType::Held, cb);
        router.on_key_transition("w", true, false);
        router.register_key_bindings(KeyBindings::new().with("w", "jump"));
        router.tick(0.016);
        assert_eq!(hits.get(), 1);
        assert_eq!(router.held_keys().collect::<Vec<_>>(), vec!["w"]);
    }

    #[test]
    fn clear_key_state_stops_held_dispatch() {
        let mut router = InputActionRouter::new(KeyBindings::wasd());
        let (hits, cb) = counter();
        router.define_action("forward", TriggerType::Held, cb);
        router.on_key_transition("w", true, false);
        router.clear_key_state();
        router.tick(0.016);
        assert_eq!(hits.get(), 0);
    }
}
