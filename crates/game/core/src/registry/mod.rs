//! Keyed definition stores with inheritance resolution.
//!
//! A [`Registry`] holds raw definitions as loaded and hands out resolved
//! copies: the raw record merged with every ancestor along its `inherits`
//! chain, root defaults first, most-derived record last. Definitions are
//! immutable once loading finishes, so resolved values are memoized per id
//! and can be shared across readers.
mod definition;
mod error;

pub use definition::{Definition, DefinitionKind};
pub use error::RegistryError;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Arc, PoisonError, RwLock};

/// Read-only view over a registry, independent of its definition type.
///
/// This is the query surface handed to collaborators that only need to
/// enumerate or count content (UI, exploration, event scripting).
pub trait RegistryView: Send + Sync {
    /// Kind of content held by the registry.
    fn kind(&self) -> DefinitionKind;

    /// Number of registered definitions.
    fn count(&self) -> usize;

    /// Returns true if `id` is registered.
    fn contains(&self, id: &str) -> bool;

    /// All registered ids in sorted order.
    fn ids(&self) -> Vec<String>;

    /// Resolved display name of `id`, falling back to the id itself.
    fn display_name(&self, id: &str) -> Result<String, RegistryError>;

    /// Resolves every entry, collecting all failures instead of stopping at the first.
    fn resolve_all(&self) -> Result<(), Vec<RegistryError>>;
}

/// Store of definitions of one kind, keyed by id.
pub struct Registry<D: Definition> {
    entries: BTreeMap<String, D>,
    resolved: RwLock<HashMap<String, Arc<D>>>,
}

impl<D: Definition> Registry<D> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            resolved: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a raw definition under its id.
    ///
    /// Returns the definition previously stored under the same id. Registering
    /// drops every memoized resolution, since any descendant may be affected.
    pub fn register(&mut self, definition: D) -> Option<D> {
        let id = definition.id().to_owned();
        self.resolved
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();

        let previous = self.entries.insert(id, definition);
        if let Some(previous) = &previous {
            tracing::warn!(kind = %D::KIND, id = previous.id(), "overwriting definition");
        }
        previous
    }

    /// Returns the fully resolved definition for `id`.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::NotFound`] if `id` is not registered
    /// - [`RegistryError::Cycle`] if the inheritance chain loops
    /// - [`RegistryError::MissingParent`] if an ancestor is not registered
    pub fn get(&self, id: &str) -> Result<Arc<D>, RegistryError> {
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }
        self.resolve(id)
    }

    /// Returns the raw, unresolved definition for `id`.
    pub fn raw(&self, id: &str) -> Option<&D> {
        self.entries.get(id)
    }

    /// Returns true if `id` is registered.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of registered definitions.
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if nothing has been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registered ids in sorted order.
    pub fn ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    /// Raw definitions in id order.
    pub fn raw_definitions(&self) -> impl Iterator<Item = &D> + '_ {
        self.entries.values()
    }

    /// Resolves every registered id.
    ///
    /// Used once at load time so malformed tables are reported as a batch.
    pub fn resolve_all(&self) -> Result<(), Vec<RegistryError>> {
        let errors: Vec<RegistryError> = self
            .entries
            .keys()
            .filter_map(|id| self.get(id).err())
            .collect();

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn cached(&self, id: &str) -> Option<Arc<D>> {
        self.resolved
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(id)
            .cloned()
    }

    /// Walks the chain from `id` towards the root, then merges root-first.
    ///
    /// The walk stops early at the first ancestor that is already memoized.
    fn resolve(&self, id: &str) -> Result<Arc<D>, RegistryError> {
        let mut cursor = self.entries.get(id).ok_or_else(|| RegistryError::NotFound {
            kind: D::KIND,
            id: id.to_owned(),
        })?;

        let mut chain: Vec<&D> = Vec::new();
        let mut visited: HashSet<&str> = HashSet::new();
        let mut base: Option<Arc<D>> = None;

        loop {
            let current = cursor.id();
            if !visited.insert(current) {
                let mut path: Vec<String> = chain.iter().map(|d| d.id().to_owned()).collect();
                path.push(current.to_owned());
                return Err(RegistryError::Cycle {
                    kind: D::KIND,
                    chain: path,
                });
            }
            chain.push(cursor);

            let Some(parent_id) = cursor.inherits() else {
                break;
            };
            if let Some(hit) = self.cached(parent_id) {
                base = Some(hit);
                break;
            }
            cursor = self
                .entries
                .get(parent_id)
                .ok_or_else(|| RegistryError::MissingParent {
                    kind: D::KIND,
                    id: current.to_owned(),
                    parent: parent_id.to_owned(),
                })?;
        }

        let mut merged_chain = Vec::with_capacity(chain.len());
        let mut resolved = base;
        for raw in chain.into_iter().rev() {
            let mut merged = raw.clone();
            if let Some(parent) = &resolved {
                merged.inherit_from(parent);
            }
            let merged = Arc::new(merged);
            merged_chain.push(Arc::clone(&merged));
            resolved = Some(merged);
        }

        let mut cache = self.resolved.write().unwrap_or_else(PoisonError::into_inner);
        for definition in merged_chain {
            cache
                .entry(definition.id().to_owned())
                .or_insert(definition);
        }
        drop(cache);

        resolved.ok_or_else(|| RegistryError::NotFound {
            kind: D::KIND,
            id: id.to_owned(),
        })
    }
}

impl<D: Definition> Default for Registry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: Definition> FromIterator<D> for Registry<D> {
    fn from_iter<T: IntoIterator<Item = D>>(iter: T) -> Self {
        let mut registry = Self::new();
        for definition in iter {
            registry.register(definition);
        }
        registry
    }
}

impl<D: Definition> std::fmt::Debug for Registry<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("kind", &D::KIND)
            .field("count", &self.entries.len())
            .finish()
    }
}

impl<D: Definition> RegistryView for Registry<D> {
    fn kind(&self) -> DefinitionKind {
        D::KIND
    }

    fn count(&self) -> usize {
        Registry::count(self)
    }

    fn contains(&self, id: &str) -> bool {
        Registry::contains(self, id)
    }

    fn ids(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    fn display_name(&self, id: &str) -> Result<String, RegistryError> {
        let resolved = self.get(id)?;
        Ok(resolved.display_name().unwrap_or(id).to_owned())
    }

    fn resolve_all(&self) -> Result<(), Vec<RegistryError>> {
        Registry::resolve_all(self)
    }
}
