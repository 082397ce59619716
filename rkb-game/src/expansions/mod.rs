//! Expansion parts and the registry that builds them by name.

pub mod activation;
pub mod capitol;
pub mod caves;
pub mod content;
pub mod crossroads;
pub mod island;

pub use activation::{
    RuleType, active_types, add_mini, check_mini_odds, find_expansion, mini_applies, minis,
    rule_type,
};
pub use capitol::Capitol;
pub use caves::Caves;
pub use content::ContentExpansion;
pub use crossroads::Crossroads;
pub use island::Island;

use crate::cards::SharedRandom;
use crate::error::{SetupError, SetupResult};
use crate::part::Part;

/// Builds an expansion part around the shared random source.
pub type PartFactory = fn(SharedRandom) -> Box<dyn Part>;

/// Expansions known out of the box, in the order they are usually loaded.
pub const BUILTIN_EXPANSIONS: [&str; 7] = [
    "nomads",
    "crossroads",
    "marshlands",
    "harvest",
    "island",
    "caves",
    "capitol",
];

/// Expansion identifiers mapped to part factories.
#[derive(Debug, Clone, Default)]
pub struct ExpansionRegistry {
    factories: Vec<(String, PartFactory)>,
}

impl ExpansionRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            factories: Vec::new(),
        }
    }

    /// Registry holding every built-in expansion.
    #[must_use]
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        registry.register("nomads", |_| Box::new(ContentExpansion::nomads()));
        registry.register("crossroads", |rng| Box::new(Crossroads::new(rng)));
        registry.register("marshlands", |_| Box::new(ContentExpansion::marshlands()));
        registry.register("harvest", |_| Box::new(ContentExpansion::harvest()));
        registry.register("island", |rng| Box::new(Island::new(rng)));
        registry.register("caves", |rng| Box::new(Caves::new(rng)));
        registry.register("capitol", |rng| Box::new(Capitol::new(rng)));
        registry
    }

    /// Add or replace the factory for `id`.
    pub fn register(&mut self, id: &str, factory: PartFactory) {
        if let Some(slot) = self.factories.iter_mut().find(|(known, _)| known == id) {
            slot.1 = factory;
        } else {
            self.factories.push((id.to_string(), factory));
        }
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.factories.iter().map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.factories.iter().any(|(known, _)| known == id)
    }

    /// Build the part registered as `id`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownExpansion`] when nothing is registered
    /// under `id`.
    pub fn resolve(&self, id: &str, rng: &SharedRandom) -> SetupResult<Box<dyn Part>> {
        self.factories
            .iter()
            .find(|(known, _)| known == id)
            .map(|(_, factory)| factory(rng.clone()))
            .ok_or_else(|| SetupError::UnknownExpansion(id.to_string()))
    }

    /// Build the parts for `names`, keeping their order.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError::UnknownExpansion`] for the first unknown name.
    pub fn register_expansions<S: AsRef<str>>(
        &self,
        names: &[S],
        rng: &SharedRandom,
    ) -> SetupResult<Vec<Box<dyn Part>>> {
        names
            .iter()
            .map(|name| self.resolve(name.as_ref().trim(), rng))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::{SeededRandom, shared};

    #[test]
    fn builtin_registry_knows_every_expansion_in_order() {
        let registry = ExpansionRegistry::with_builtin();
        assert_eq!(registry.ids().collect::<Vec<_>>(), BUILTIN_EXPANSIONS.to_vec());
    }

    #[test]
    fn register_expansions_keeps_requested_order() {
        let registry = ExpansionRegistry::with_builtin();
        let rng = shared(SeededRandom::from_seed(1));
        let parts = registry
            .register_expansions(&["capitol", "nomads", "island"], &rng)
            .unwrap();
        let ids: Vec<_> = parts.iter().map(|p| p.id()).collect();
        assert_eq!(ids, vec!["capitol", "nomads", "island"]);
    }

    #[test]
    fn unknown_expansion_is_an_error() {
        let registry = ExpansionRegistry::with_builtin();
        let rng = shared(SeededRandom::from_seed(1));
        let err = registry
            .register_expansions(&["nomads", "atlantis"], &rng)
            .unwrap_err();
        assert_eq!(err, SetupError::UnknownExpansion("atlantis".into()));
    }

    #[test]
    fn factories_can_be_added_and_replaced() {
        let mut registry = ExpansionRegistry::new();
        assert!(!registry.contains("nomads"));
        registry.register("nomads", |_| Box::new(ContentExpansion::harvest()));
        registry.register("nomads", |_| Box::new(ContentExpansion::nomads()));
        let rng = shared(SeededRandom::from_seed(1));
        assert_eq!(registry.resolve("nomads", &rng).unwrap().id(), "nomads");
        assert_eq!(registry.ids().count(), 1);
    }
}
