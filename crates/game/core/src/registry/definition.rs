//! The [`Definition`] contract shared by every registry content kind.

/// Content kinds stored in registries.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, strum::Display, strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefinitionKind {
    Species,
    Skill,
    Item,
    Passive,
    Status,
    Equipment,
    Dungeon,
    EventTemplate,
}

/// Immutable, load-time content record with single-parent inheritance.
///
/// Raw records keep every inheritable field as `Option` so resolution can
/// tell "unset" apart from "set to the default". [`Definition::inherit_from`]
/// copies the parent's value into every field the child left unset; it never
/// merges nested structures.
pub trait Definition: Clone + Send + Sync + 'static {
    /// Kind tag used in diagnostics.
    const KIND: DefinitionKind;

    /// Unique key inside the registry.
    fn id(&self) -> &str;

    /// Overwrites the key. Loaders call this with the table key.
    fn set_id(&mut self, id: String);

    /// Parent id, if this record inherits from another one.
    fn inherits(&self) -> Option<&str>;

    /// Fills every field left unset on `self` from the resolved `parent`.
    fn inherit_from(&mut self, parent: &Self);

    /// Human-readable name, when the kind carries one.
    fn display_name(&self) -> Option<&str> {
        None
    }
}

/// Implements the field-by-field fallback used by [`Definition::inherit_from`].
///
/// ```ignore
/// inherit_fields!(self, parent; name, base_hp, hp_growth);
/// ```
#[macro_export]
macro_rules! inherit_fields {
    ($child:expr, $parent:expr; $($field:ident),+ $(,)?) => {
        $(
            if $child.$field.is_none() {
                $child.$field = $parent.$field.clone();
            }
        )+
    };
}
