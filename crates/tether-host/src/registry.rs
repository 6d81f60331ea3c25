//! Process-wide class registry.
//!
//! Classes are registered once at startup, in call order, through a
//! builder. The built registry is read-only. It can be installed globally
//! so host entry points without user data can reach it:
//!
//! ```ignore
//! ClassRegistry::builder()
//!     .register(ClientClass::<PeakFollower>::dual(CONFIG))
//!     .build()?
//!     .install()?;
//!
//! let object = ClassRegistry::global()
//!     .ok_or(WrapperError::UnknownClass(name.into()))?
//!     .create(name, host, &args)?;
//! ```

use std::sync::{Arc, OnceLock};

use tether_core::{Atom, Client};

use crate::class::ClientClass;
use crate::error::{WrapperError, WrapperResult};
use crate::host::Host;
use crate::object::HostObject;

/// Creates one instance of a registered class.
pub type Factory = Box<dyn Fn(Arc<dyn Host>, &[Atom]) -> Box<dyn HostObject> + Send + Sync>;

/// Global registry (set by [`ClassRegistry::install`]).
static REGISTRY: OnceLock<ClassRegistry> = OnceLock::new();

struct Registration {
    name: &'static str,
    factory: Factory,
}

/// Collects class registrations.
#[derive(Default)]
pub struct ClassRegistryBuilder {
    entries: Vec<Registration>,
}

impl ClassRegistryBuilder {
    pub fn register<C: Client>(mut self, class: ClientClass<C>) -> Self {
        let class = Arc::new(class);
        let name = class.name();
        let factory: Factory = Box::new(move |host: Arc<dyn Host>, args: &[Atom]| -> Box<dyn HostObject> {
            Box::new(class.instantiate(host, args))
        });
        self.entries.push(Registration { name, factory });
        self
    }

    /// Finish registration.
    ///
    /// Fails if two classes share a name.
    pub fn build(self) -> WrapperResult<ClassRegistry> {
        for (i, entry) in self.entries.iter().enumerate() {
            if self.entries[..i].iter().any(|other| other.name == entry.name) {
                return Err(WrapperError::DuplicateClass(entry.name.to_string()));
            }
        }
        log::debug!("Class registry built with {} classes", self.entries.len());
        Ok(ClassRegistry {
            classes: self.entries,
        })
    }
}

/// Read-only map from class name to factory.
pub struct ClassRegistry {
    classes: Vec<Registration>,
}

impl ClassRegistry {
    pub fn builder() -> ClassRegistryBuilder {
        ClassRegistryBuilder::default()
    }

    /// Instantiate class `name` with host construction arguments.
    pub fn create(&self, name: &str, host: Arc<dyn Host>, args: &[Atom]) -> WrapperResult<Box<dyn HostObject>> {
        let entry = self
            .classes
            .iter()
            .find(|entry| entry.name == name)
            .ok_or_else(|| WrapperError::UnknownClass(name.to_string()))?;
        Ok((entry.factory)(host, args))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.classes.iter().any(|entry| entry.name == name)
    }

    /// Class names in registration order.
    pub fn class_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.classes.iter().map(|entry| entry.name)
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Make this registry the process-wide one.
    ///
    /// Fails if a registry was installed before.
    pub fn install(self) -> WrapperResult<&'static ClassRegistry> {
        REGISTRY.set(self).map_err(|_| WrapperError::AlreadyInstalled)?;
        log::debug!("Class registry installed");
        REGISTRY.get().ok_or(WrapperError::AlreadyInstalled)
    }

    /// The installed registry, if any.
    pub fn global() -> Option<&'static ClassRegistry> {
        REGISTRY.get()
    }
}
