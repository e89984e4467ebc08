//! Explicit dependency-injection container for content services.
//!
//! [`ServicesBuilder`] enforces the startup order at registration time: a
//! service may only be registered once everything it depends on is present.
//! The frozen [`Services`] value is immutable and shared behind an `Arc`, so
//! any number of readers may query it concurrently.
use std::sync::Arc;

use crate::config::GameConfig;
use crate::registry::{Registry, RegistryView};
use crate::stats::ExpTable;

use super::{
    DungeonDefinition, EquipmentDefinition, EventTemplateDefinition, ItemDefinition, PassiveDefinition, ServiceError,
    SkillDefinition, SpeciesDefinition, StatusDefinition,
};

pub type StatusRegistry = Registry<StatusDefinition>;
pub type EquipmentRegistry = Registry<EquipmentDefinition>;
pub type PassiveRegistry = Registry<PassiveDefinition>;
pub type SkillRegistry = Registry<SkillDefinition>;
pub type ItemRegistry = Registry<ItemDefinition>;
pub type SpeciesRegistry = Registry<SpeciesDefinition>;
pub type DungeonRegistry = Registry<DungeonDefinition>;
pub type EventRegistry = Registry<EventTemplateDefinition>;

/// Names under which services are registered and queried.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ServiceName {
    Config,
    Statuses,
    Equipment,
    Passives,
    Skills,
    Items,
    Creatures,
    Dungeons,
    Events,
}

impl ServiceName {
    /// Services that must be registered before this one.
    pub const fn dependencies(self) -> &'static [ServiceName] {
        use ServiceName::*;
        match self {
            Config => &[],
            Statuses => &[Config],
            Equipment | Passives | Skills | Items => &[Statuses],
            Creatures => &[Passives, Skills, Items],
            Dungeons => &[Creatures],
            Events => &[Items],
        }
    }
}

/// A registrable service instance.
#[derive(Clone, Debug)]
pub enum Service {
    Config(Arc<GameConfig>),
    Statuses(Arc<StatusRegistry>),
    Equipment(Arc<EquipmentRegistry>),
    Passives(Arc<PassiveRegistry>),
    Skills(Arc<SkillRegistry>),
    Items(Arc<ItemRegistry>),
    Creatures(Arc<SpeciesRegistry>),
    Dungeons(Arc<DungeonRegistry>),
    Events(Arc<EventRegistry>),
}

impl Service {
    pub const fn name(&self) -> ServiceName {
        match self {
            Self::Config(_) => ServiceName::Config,
            Self::Statuses(_) => ServiceName::Statuses,
            Self::Equipment(_) => ServiceName::Equipment,
            Self::Passives(_) => ServiceName::Passives,
            Self::Skills(_) => ServiceName::Skills,
            Self::Items(_) => ServiceName::Items,
            Self::Creatures(_) => ServiceName::Creatures,
            Self::Dungeons(_) => ServiceName::Dungeons,
            Self::Events(_) => ServiceName::Events,
        }
    }

    /// Registry view of the service, or `None` for configuration.
    pub fn as_registry(&self) -> Option<&dyn RegistryView> {
        match self {
            Self::Config(_) => None,
            Self::Statuses(r) => Some(r.as_ref()),
            Self::Equipment(r) => Some(r.as_ref()),
            Self::Passives(r) => Some(r.as_ref()),
            Self::Skills(r) => Some(r.as_ref()),
            Self::Items(r) => Some(r.as_ref()),
            Self::Creatures(r) => Some(r.as_ref()),
            Self::Dungeons(r) => Some(r.as_ref()),
            Self::Events(r) => Some(r.as_ref()),
        }
    }
}

/// Generates typed accessors that fail with [`ServiceError::NotRegistered`].
macro_rules! service_accessors {
    ($($(#[$meta:meta])* $field:ident: $ty:ty => $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            pub fn $field(&self) -> Result<&$ty, ServiceError> {
                self.$field
                    .as_deref()
                    .ok_or(ServiceError::NotRegistered(ServiceName::$name))
            }
        )+
    };
}

/// Immutable container of every content service.
#[derive(Clone, Debug, Default)]
pub struct Services {
    config: Option<Arc<GameConfig>>,
    exp_table: Option<Arc<ExpTable>>,
    statuses: Option<Arc<StatusRegistry>>,
    equipment: Option<Arc<EquipmentRegistry>>,
    passives: Option<Arc<PassiveRegistry>>,
    skills: Option<Arc<SkillRegistry>>,
    items: Option<Arc<ItemRegistry>>,
    creatures: Option<Arc<SpeciesRegistry>>,
    dungeons: Option<Arc<DungeonRegistry>>,
    events: Option<Arc<EventRegistry>>,
}

impl Services {
    pub fn builder() -> ServicesBuilder {
        ServicesBuilder::default()
    }

    service_accessors! {
        config: GameConfig => Config,
        /// Level table precomputed from the configured experience curve.
        exp_table: ExpTable => Config,
        statuses: StatusRegistry => Statuses,
        equipment: EquipmentRegistry => Equipment,
        passives: PassiveRegistry => Passives,
        skills: SkillRegistry => Skills,
        items: ItemRegistry => Items,
        creatures: SpeciesRegistry => Creatures,
        dungeons: DungeonRegistry => Dungeons,
        events: EventRegistry => Events,
    }

    /// Returns true if `name` has been registered.
    pub fn has(&self, name: ServiceName) -> bool {
        self.get(name).is_ok()
    }

    /// Looks up a service by name.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::NotRegistered`] if the service is absent.
    pub fn get(&self, name: ServiceName) -> Result<Service, ServiceError> {
        let missing = || ServiceError::NotRegistered(name);
        Ok(match name {
            ServiceName::Config => Service::Config(self.config.clone().ok_or_else(missing)?),
            ServiceName::Statuses => Service::Statuses(self.statuses.clone().ok_or_else(missing)?),
            ServiceName::Equipment => {
                Service::Equipment(self.equipment.clone().ok_or_else(missing)?)
            }
            ServiceName::Passives => Service::Passives(self.passives.clone().ok_or_else(missing)?),
            ServiceName::Skills => Service::Skills(self.skills.clone().ok_or_else(missing)?),
            ServiceName::Items => Service::Items(self.items.clone().ok_or_else(missing)?),
            ServiceName::Creatures => {
                Service::Creatures(self.creatures.clone().ok_or_else(missing)?)
            }
            ServiceName::Dungeons => Service::Dungeons(self.dungeons.clone().ok_or_else(missing)?),
            ServiceName::Events => Service::Events(self.events.clone().ok_or_else(missing)?),
        })
    }

    /// Looks up a service by its string name, as used by scripting collaborators.
    pub fn get_by_name(&self, name: &str) -> Result<Service, ServiceError> {
        let name: ServiceName = name
            .parse()
            .map_err(|_| ServiceError::UnknownName(name.to_owned()))?;
        self.get(name)
    }

    /// Registry-typed query surface for `name`.
    pub fn registry(&self, name: ServiceName) -> Result<&dyn RegistryView, ServiceError> {
        let view: Option<&dyn RegistryView> = match name {
            ServiceName::Config => return Err(ServiceError::NotARegistry(name)),
            ServiceName::Statuses => self.statuses.as_deref().map(|r| r as _),
            ServiceName::Equipment => self.equipment.as_deref().map(|r| r as _),
            ServiceName::Passives => self.passives.as_deref().map(|r| r as _),
            ServiceName::Skills => self.skills.as_deref().map(|r| r as _),
            ServiceName::Items => self.items.as_deref().map(|r| r as _),
            ServiceName::Creatures => self.creatures.as_deref().map(|r| r as _),
            ServiceName::Dungeons => self.dungeons.as_deref().map(|r| r as _),
            ServiceName::Events => self.events.as_deref().map(|r| r as _),
        };
        view.ok_or(ServiceError::NotRegistered(name))
    }
}

/// Startup-time builder for [`Services`].
#[derive(Debug, Default)]
pub struct ServicesBuilder {
    inner: Services,
}

impl ServicesBuilder {
    /// Registers `service` after checking its dependencies are present.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::AlreadyRegistered`] if the name is taken
    /// - [`ServiceError::OutOfOrder`] if a dependency is missing
    pub fn register(&mut self, service: Service) -> Result<&mut Self, ServiceError> {
        let name = service.name();
        if self.inner.has(name) {
            return Err(ServiceError::AlreadyRegistered(name));
        }
        if let Some(missing) = name
            .dependencies()
            .iter()
            .find(|dependency| !self.inner.has(**dependency))
        {
            return Err(ServiceError::OutOfOrder {
                service: name,
                missing: *missing,
            });
        }

        let count = service.as_registry().map(RegistryView::count);
        match service {
            Service::Config(config) => {
                self.inner.exp_table = Some(Arc::new(ExpTable::from_config(&config)));
                self.inner.config = Some(config);
            }
            Service::Statuses(r) => self.inner.statuses = Some(r),
            Service::Equipment(r) => self.inner.equipment = Some(r),
            Service::Passives(r) => self.inner.passives = Some(r),
            Service::Skills(r) => self.inner.skills = Some(r),
            Service::Items(r) => self.inner.items = Some(r),
            Service::Creatures(r) => self.inner.creatures = Some(r),
            Service::Dungeons(r) => self.inner.dungeons = Some(r),
            Service::Events(r) => self.inner.events = Some(r),
        }

        match count {
            Some(count) => tracing::info!(service = %name, count, "registered service"),
            None => tracing::info!(service = %name, "registered service"),
        }
        Ok(self)
    }

    /// Chained form of [`ServicesBuilder::register`].
    pub fn with(mut self, service: Service) -> Result<Self, ServiceError> {
        self.register(service)?;
        Ok(self)
    }

    /// Freezes the container.
    pub fn build(self) -> Services {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statuses() -> Service {
        Service::Statuses(Arc::new(StatusRegistry::new()))
    }

    #[test]
    fn registration_respects_dependencies() {
        let mut builder = Services::builder();
        assert_eq!(
            builder.register(statuses()).unwrap_err(),
            ServiceError::OutOfOrder {
                service: ServiceName::Statuses,
                missing: ServiceName::Config,
            }
        );

        builder
            .register(Service::Config(Arc::new(GameConfig::default())))
            .unwrap()
            .register(statuses())
            .unwrap();
        assert_eq!(
            builder.register(statuses()).unwrap_err(),
            ServiceError::AlreadyRegistered(ServiceName::Statuses)
        );
    }

    #[test]
    fn unregistered_lookup_fails() {
        let services = Services::builder()
            .with(Service::Config(Arc::new(GameConfig::default())))
            .unwrap()
            .build();

        assert!(services.config().is_ok());
        assert_eq!(services.exp_table().unwrap().exp_for_level(2), 100);
        assert_eq!(
            services.creatures().unwrap_err(),
            ServiceError::NotRegistered(ServiceName::Creatures)
        );
        assert!(matches!(
            services.registry(ServiceName::Config),
            Err(ServiceError::NotARegistry(_))
        ));
        assert!(matches!(
            services.get_by_name("dragons"),
            Err(ServiceError::UnknownName(_))
        ));
    }

    #[test]
    fn registry_view_by_name() {
        let mut skills = SkillRegistry::new();
        skills.register(SkillDefinition::new("attack"));

        let services = Services::builder()
            .with(Service::Config(Arc::new(GameConfig::default())))
            .and_then(|b| b.with(statuses()))
            .and_then(|b| b.with(Service::Skills(Arc::new(skills))))
            .unwrap()
            .build();

        let view = services.registry(ServiceName::Skills).unwrap();
        assert_eq!(view.count(), 1);
        assert!(view.contains("attack"));
        assert!(matches!(
            services.get_by_name("skills"),
            Ok(Service::Skills(_))
        ));
    }
}
