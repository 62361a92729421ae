//! Per-type cache of built entity types.

use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use crate::entity::{Entity, EntityConfig, EntityType};
use crate::error::{MapperError, Result};
use crate::naming::{EnglishPluralizer, Pluralizer};

type CachedType = Arc<dyn Any + Send + Sync>;

/// Builds each entity type once and hands out the shared instance afterwards.
///
/// The registry is an ordinary value: create one at startup and pass it to
/// whatever needs entity metadata. It is `Send + Sync`; concurrent first-time
/// registration of the same type publishes exactly one instance.
pub struct EntityRegistry {
    types: DashMap<TypeId, CachedType>,
    pluralizer: Arc<dyn Pluralizer>,
}

impl EntityRegistry {
    /// Creates an empty registry using [`EnglishPluralizer`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_pluralizer(EnglishPluralizer::new())
    }

    /// Creates an empty registry with a custom pluralization service.
    #[must_use]
    pub fn with_pluralizer(pluralizer: impl Pluralizer + 'static) -> Self {
        Self {
            types: DashMap::new(),
            pluralizer: Arc::new(pluralizer),
        }
    }

    /// Returns the entity type of `E`, building it on first use.
    ///
    /// # Errors
    ///
    /// Fails when the declared fields of `E` are invalid or no key is found.
    pub fn register<E: Entity>(&self) -> Result<Arc<EntityType<E>>> {
        self.register_with::<E, _>(|_| Ok(()))
    }

    /// Returns the entity type of `E`, building it on first use and running
    /// `configure` on the detected fields before it is published.
    ///
    /// `configure` only runs for the registration that builds the type; once
    /// `E` is cached, the cached instance is returned unchanged.
    ///
    /// # Errors
    ///
    /// Fails when introspection or `configure` fails, or no key remains.
    pub fn register_with<E, F>(&self, configure: F) -> Result<Arc<EntityType<E>>>
    where
        E: Entity,
        F: FnOnce(&mut EntityConfig<E>) -> Result<()>,
    {
        if let Some(cached) = self.lookup::<E>()? {
            debug!(entity = E::TYPE_NAME, "entity type already registered");
            return Ok(cached);
        }

        // Built without holding any map lock, so `configure` may use the
        // registry itself.
        let mut config = EntityConfig::<E>::introspect()?;
        configure(&mut config)?;
        let built: CachedType = Arc::new(config.build(self.pluralizer.as_ref())?);

        let published = match self.types.entry(TypeId::of::<E>()) {
            Entry::Occupied(entry) => {
                debug!(
                    entity = E::TYPE_NAME,
                    "entity type registered concurrently, discarding this build"
                );
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => Arc::clone(entry.insert(built).value()),
        };

        let entity_type = Self::downcast::<E>(published)?;
        debug!(
            entity = E::TYPE_NAME,
            table = entity_type.table_name(),
            key = entity_type.key_field().name(),
            fields = entity_type.fields().len(),
            "entity type registered"
        );
        Ok(entity_type)
    }

    /// Returns the entity type of `E` if it was registered.
    #[must_use]
    pub fn get<E: Entity>(&self) -> Option<Arc<EntityType<E>>> {
        self.lookup::<E>().ok().flatten()
    }

    /// Returns true when `E` was registered.
    #[must_use]
    pub fn contains<E: Entity>(&self) -> bool {
        self.types.contains_key(&TypeId::of::<E>())
    }

    /// Number of registered entity types.
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns true when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn lookup<E: Entity>(&self) -> Result<Option<Arc<EntityType<E>>>> {
        let cached = self
            .types
            .get(&TypeId::of::<E>())
            .map(|entry| Arc::clone(entry.value()));
        cached.map(Self::downcast::<E>).transpose()
    }

    fn downcast<E: Entity>(cached: CachedType) -> Result<Arc<EntityType<E>>> {
        cached
            .downcast::<EntityType<E>>()
            .map_err(|_| MapperError::TypeMismatch {
                entity: String::from(E::TYPE_NAME),
            })
    }
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for EntityRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityRegistry")
            .field("types", &self.types.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldDef;

    struct Tag {
        id: i64,
        label: String,
    }

    impl Entity for Tag {
        const TYPE_NAME: &'static str = "Tag";

        fn fields() -> Vec<FieldDef<Self>> {
            vec![
                FieldDef::<Self>::new::<i64>("Id", |t| &t.id, |t| &mut t.id),
                FieldDef::<Self>::new::<String>("Label", |t| &t.label, |t| &mut t.label),
            ]
        }
    }

    struct Keyless {
        label: String,
    }

    impl Entity for Keyless {
        const TYPE_NAME: &'static str = "Keyless";

        fn fields() -> Vec<FieldDef<Self>> {
            vec![FieldDef::<Self>::new::<String>(
                "Label",
                |k| &k.label,
                |k| &mut k.label,
            )]
        }
    }

    struct Shouty;

    impl Pluralizer for Shouty {
        fn pluralize(&self, word: &str) -> String {
            format!("{}S", word.to_uppercase())
        }

        fn is_plural(&self, _word: &str) -> bool {
            false
        }
    }

    #[test]
    fn test_register_caches_instance() {
        let registry = EntityRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get::<Tag>().is_none());

        let first = registry.register::<Tag>().unwrap();
        let second = registry.register::<Tag>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert!(registry.contains::<Tag>());
        assert_eq!(registry.len(), 1);
        assert_eq!(first.table_name(), "Tags");
    }

    #[test]
    fn test_configuration_only_applies_on_first_registration() {
        let registry = EntityRegistry::new();
        registry.register::<Tag>().unwrap();

        let mut ran = false;
        let tag = registry
            .register_with::<Tag, _>(|config| {
                ran = true;
                config.alias_table("Labels");
                Ok(())
            })
            .unwrap();

        assert!(!ran);
        assert_eq!(tag.table_name(), "Tags");
    }

    #[test]
    fn test_failed_registration_is_not_cached() {
        let registry = EntityRegistry::new();

        let err = registry.register::<Keyless>().unwrap_err();
        assert!(matches!(err, MapperError::MissingPrimaryKey { ref entity } if entity == "Keyless"));
        assert!(!registry.contains::<Keyless>());

        let keyed = registry
            .register_with::<Keyless, _>(|config| {
                config.key("Label", None)?;
                Ok(())
            })
            .unwrap();
        assert_eq!(keyed.key_field().name(), "Label");
    }

    #[test]
    fn test_custom_pluralizer() {
        let registry = EntityRegistry::with_pluralizer(Shouty);
        let tag = registry.register::<Tag>().unwrap();

        assert_eq!(tag.table_name(), "TAGS");
    }

    #[test]
    fn test_configure_may_use_the_registry() {
        let registry = EntityRegistry::new();
        let tag = registry
            .register_with::<Tag, _>(|_| {
                registry.register::<Tag>()?;
                Ok(())
            })
            .unwrap();

        let cached = registry.get::<Tag>().unwrap();
        assert!(Arc::ptr_eq(&tag, &cached));
    }
}
