use std::sync::{Arc, OnceLock};

use tower_resilience_core::Registry;

use crate::config::ThrottleConfig;
use crate::throttle::Throttle;

fn global_registry() -> &'static Registry<Throttle> {
    static REGISTRY: OnceLock<Registry<Throttle>> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

/// Returns the named throttle, constructing it from `config` on first lookup.
///
/// Calls that share a `name` share the same rolling window and error history,
/// so e.g. every route hitting the same downstream dependency can be
/// throttled as one unit even if each route builds its own layer.
pub fn named_throttle(name: &str, config: ThrottleConfig) -> Arc<Throttle> {
    global_registry().get_or_insert(name, || Throttle::new(config))
}

/// Looks up a previously-created named throttle without constructing one.
pub fn get_throttle(name: &str) -> Option<Arc<Throttle>> {
    global_registry().get(name)
}

/// Removes a named throttle from the registry, e.g. in tests that need a
/// clean slate between cases sharing a process.
pub fn remove_throttle(name: &str) -> Option<Arc<Throttle>> {
    global_registry().remove(name)
}
