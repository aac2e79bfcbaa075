use std::sync::{Arc, OnceLock};

use tower_resilience_core::Registry;

use crate::breaker::Breaker;
use crate::config::BreakerConfig;

fn global_registry() -> &'static Registry<Breaker> {
    static REGISTRY: OnceLock<Registry<Breaker>> = OnceLock::new();
    REGISTRY.get_or_init(Registry::new)
}

/// Returns the named breaker, constructing it from `config` on first lookup.
pub fn named_breaker(name: &str, config: BreakerConfig) -> Arc<Breaker> {
    global_registry().get_or_insert(name, || Breaker::new(config))
}

/// Looks up a previously-created named breaker without constructing one.
pub fn get_breaker(name: &str) -> Option<Arc<Breaker>> {
    global_registry().get(name)
}

/// Removes every breaker from the registry, clearing their metrics.
pub fn flush() {
    global_registry().flush();
}

/// Removes a single named breaker.
pub fn remove_breaker(name: &str) -> Option<Arc<Breaker>> {
    global_registry().remove(name)
}
