//! Definition table loader.
//!
//! Every table is a RON map from id to record:
//!
//! ```ron
//! #![enable(implicit_some)]
//! {
//!     "goblin": (inherits: "base_creature", name: "Goblin", base_hp: 18),
//! }
//! ```
//!
//! The map key is authoritative; an `id` inside the record is overwritten.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use game_core::{Definition, Registry};
use serde::de::DeserializeOwned;

use crate::loaders::{LoadResult, read_file};

/// Loader for keyed definition tables.
pub struct DefinitionLoader;

impl DefinitionLoader {
    /// Loads a definition table from a RON file.
    pub fn load<D>(path: &Path) -> LoadResult<Registry<D>>
    where
        D: Definition + DeserializeOwned,
    {
        let content = read_file(path)?;
        Self::parse(&content, &path.display().to_string())
    }

    /// Parses a definition table already in memory. `origin` names the
    /// source in error messages.
    pub fn parse<D>(content: &str, origin: &str) -> LoadResult<Registry<D>>
    where
        D: Definition + DeserializeOwned,
    {
        let table: BTreeMap<String, D> = ron::from_str(content)
            .with_context(|| format!("Failed to parse {} table RON at {origin}", D::KIND))?;

        let registry: Registry<D> = table
            .into_iter()
            .map(|(id, mut definition)| {
                definition.set_id(id);
                definition
            })
            .collect();

        tracing::debug!(kind = %D::KIND, count = registry.count(), origin, "loaded definitions");
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::{Element, SkillDefinition, SpeciesDefinition, env::TargetPattern};

    #[test]
    fn key_overrides_inner_id() {
        let registry: Registry<SpeciesDefinition> = DefinitionLoader::parse(
            r#"
            #![enable(implicit_some)]
            {
                "slime": (id: "ignored", name: "Slime", base_hp: 8, elements: [B]),
            }
            "#,
            "test",
        )
        .unwrap();

        let slime = registry.get("slime").unwrap();
        assert_eq!(slime.id, "slime");
        assert_eq!(slime.name(), "Slime");
        assert_eq!(slime.elements(), &[Element::B]);
        assert!(!registry.contains("ignored"));
    }

    #[test]
    fn parent_alias_and_snake_case_targets_parse() {
        let registry: Registry<SkillDefinition> = DefinitionLoader::parse(
            r#"
            #![enable(implicit_some)]
            {
                "base": (target: ally_all),
                "mass_cure": (parent: "base", effects: [HpHeal("2 * a.mat")]),
            }
            "#,
            "test",
        )
        .unwrap();
        assert_eq!(
            registry.get("mass_cure").unwrap().target(),
            TargetPattern::AllyAll
        );
    }

    #[test]
    fn bad_formula_is_a_load_error() {
        let result: LoadResult<Registry<SkillDefinition>> = DefinitionLoader::parse(
            r#"
            #![enable(implicit_some)]
            { "oops": (effects: [HpDamage("a.luck + 1")]) }
            "#,
            "test",
        );
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("skill"));
    }
}
