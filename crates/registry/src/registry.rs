use crate::chains::{
    ChildChain,
    ParentChain,
    Teleporter,
};
use parking_lot::RwLock;
use std::collections::HashMap;
use thiserror::Error;

/// Errors produced by registry lookups and registration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum RegistryError {
    /// No chain with this id is registered.
    #[error("unknown chain {0}")]
    UnknownChain(u64),
    /// A chain with this id is already registered and `force` was not set.
    #[error("chain {0} is already registered")]
    AlreadyRegistered(u64),
    /// The chain is registered but carries no teleporter contracts.
    #[error("chain {0} has no teleporter contracts")]
    MissingTeleporter(u64),
}

/// Thread-safe directory of parent and child chains.
///
/// Interior mutability lets a registry be shared behind an `Arc` while
/// custom chains are registered at runtime.
#[derive(Debug, Default)]
pub struct ChainRegistry {
    parents: RwLock<HashMap<u64, ParentChain>>,
    children: RwLock<HashMap<u64, ChildChain>>,
}

impl ChainRegistry {
    /// An empty registry. Use [`ChainRegistry::with_public_networks`] to
    /// start from the well-known deployments.
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a parent chain.
    pub fn parent_chain(&self, chain_id: u64) -> Result<ParentChain, RegistryError> {
        self.parents
            .read()
            .get(&chain_id)
            .cloned()
            .ok_or(RegistryError::UnknownChain(chain_id))
    }

    /// Look up a child chain.
    pub fn child_chain(&self, chain_id: u64) -> Result<ChildChain, RegistryError> {
        self.children
            .read()
            .get(&chain_id)
            .cloned()
            .ok_or(RegistryError::UnknownChain(chain_id))
    }

    /// Look up the teleporter contracts of a child chain, failing if the
    /// chain is unknown or hosts none.
    pub fn teleporter(&self, chain_id: u64) -> Result<Teleporter, RegistryError> {
        self.child_chain(chain_id)?
            .teleporter
            .ok_or(RegistryError::MissingTeleporter(chain_id))
    }

    /// Register a parent chain. Errors if the id is taken, unless `force`
    /// replaces the existing entry.
    pub fn register_parent_chain(
        &self,
        entry: ParentChain,
        force: bool,
    ) -> Result<(), RegistryError> {
        let mut parents = self.parents.write();
        if !force && parents.contains_key(&entry.chain_id) {
            return Err(RegistryError::AlreadyRegistered(entry.chain_id));
        }
        tracing::debug!(chain_id = entry.chain_id, name = %entry.name, "registered parent chain");
        parents.insert(entry.chain_id, entry);
        Ok(())
    }

    /// Register a child chain under an already-registered parent. Errors
    /// if the parent is unknown, or if the id is taken and `force` is not
    /// set.
    pub fn register_child_chain(
        &self,
        entry: ChildChain,
        force: bool,
    ) -> Result<(), RegistryError> {
        // Lock order is parents then children, everywhere.
        let mut parents = self.parents.write();
        let mut children = self.children.write();

        let parent = parents
            .get_mut(&entry.parent_chain_id)
            .ok_or(RegistryError::UnknownChain(entry.parent_chain_id))?;
        if !force && children.contains_key(&entry.chain_id) {
            return Err(RegistryError::AlreadyRegistered(entry.chain_id));
        }

        if !parent.child_chain_ids.contains(&entry.chain_id) {
            parent.child_chain_ids.push(entry.chain_id);
        }
        tracing::debug!(
            chain_id = entry.chain_id,
            parent_chain_id = entry.parent_chain_id,
            name = %entry.name,
            "registered child chain"
        );
        children.insert(entry.chain_id, entry);
        Ok(())
    }

    /// Ids of all registered child chains.
    pub fn child_chain_ids(&self) -> Vec<u64> {
        let mut ids: Vec<u64> = self.children.read().keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}
