//! Group Registry Module
//!
//! Name-to-group lookup shared by everything that serves groups.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use crate::cache::{Getter, Group};

// == Group Registry ==
/// Maps group names to groups.
///
/// Registration takes the write lock; lookups share the read lock. Groups
/// are never removed, and registering a name twice replaces the earlier
/// group.
#[derive(Debug, Default)]
pub struct GroupRegistry {
    groups: RwLock<HashMap<String, Arc<Group>>>,
}

impl GroupRegistry {
    // == Constructor ==
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    // == New Group ==
    /// Creates a group and registers it under `name`.
    pub fn new_group(
        &self,
        name: impl Into<String>,
        cache_bytes: usize,
        getter: impl Getter + 'static,
    ) -> Arc<Group> {
        self.register(Group::new(name, cache_bytes, getter))
    }

    // == Register ==
    /// Registers a group under its own name and returns the shared handle.
    pub fn register(&self, group: Group) -> Arc<Group> {
        let group = Arc::new(group);
        let name = group.name().to_string();

        let previous = self.groups.write().insert(name.clone(), Arc::clone(&group));
        if previous.is_some() {
            warn!("Group '{}' re-registered, replacing the previous instance", name);
        } else {
            info!(
                "Registered group '{}' with budget of {} bytes",
                name,
                group.cache_bytes()
            );
        }
        group
    }

    // == Get Group ==
    /// Looks up a group by name. `None` means no such group.
    pub fn get_group(&self, name: &str) -> Option<Arc<Group>> {
        self.groups.read().get(name).cloned()
    }

    /// Returns registered names in sorted order.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.groups.read().keys().cloned().collect();
        names.sort();
        names
    }

    // == Length ==
    /// Returns the number of registered groups.
    pub fn len(&self) -> usize {
        self.groups.read().len()
    }

    // == Is Empty ==
    /// Returns true when no group is registered.
    pub fn is_empty(&self) -> bool {
        self.groups.read().is_empty()
    }
}
