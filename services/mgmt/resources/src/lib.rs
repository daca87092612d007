//! Resource-manager bindings scoped to what the storage sample needs:
//! resource-group lifecycle plus the generic resource PUT used to provision
//! a key vault.

mod client;
mod models;
mod resource_groups;
mod resources;

pub use client::Client;
pub use models::{GenericResource, ResourceGroup};
pub use resource_groups::ResourceGroupsClient;
pub use resources::ResourcesClient;
