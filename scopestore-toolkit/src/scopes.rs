//! The standard scopes.

use crate::scope::{
    constant_id_entity, delete_by_constant_id, delete_by_name_prefix, long_id_entity,
    record_id_entity,
};
use crate::{Scope, ScopeBridge, ScopeBuilder, StorageResult};
use scopestore_types::{Action, GenericRecord, Issue, Project};
use std::sync::Arc;

pub const PROJECT_ENTITY: &str = "FacadeStorageProject";
pub const PROJECT_PREFIX: &str = "project-";

pub const ISSUE_ENTITY: &str = "FacadeStorageIssue";
pub const ISSUE_PREFIX: &str = "issue-";

pub const RECORD_ENTITY: &str = "FacadeStorageGv";
pub const RECORD_PREFIX: &str = "gv-";

/// Constant-name scopes append the name to this entity name.
pub const CONSTANT_ENTITY: &str = "FacadeStorageConstant-";
pub const CONSTANT_PREFIX: &str = "constant-";
pub const CONSTANT_ENTITY_ID: i64 = 2;

/// Action scopes append the action's name to this entity name.
pub const ACTION_ENTITY: &str = "FacadeStorageAction-";
pub const ACTION_PREFIX: &str = "class-";
pub const ACTION_ENTITY_ID: i64 = 3;

/// Registry of the standard scopes over one bridge.
///
/// Project, issue and record scopes are built once. Constant-name and
/// action scopes fold their variable part into the entity name and are
/// built on demand.
#[derive(Clone)]
pub struct Scopes {
    bridge: Arc<dyn ScopeBridge>,
    project: Scope<dyn Project>,
    issue: Scope<dyn Issue>,
    record: Scope<GenericRecord>,
}

impl Scopes {
    pub fn new(bridge: Arc<dyn ScopeBridge>) -> StorageResult<Self> {
        Ok(Self {
            project: Self::project_builder().build(Arc::clone(&bridge))?,
            issue: Self::issue_builder().build(Arc::clone(&bridge))?,
            record: Self::record_builder().build(Arc::clone(&bridge))?,
            bridge,
        })
    }

    pub fn bridge(&self) -> &Arc<dyn ScopeBridge> {
        &self.bridge
    }

    pub fn project(&self) -> &Scope<dyn Project> {
        &self.project
    }

    pub fn issue(&self) -> &Scope<dyn Issue> {
        &self.issue
    }

    pub fn record(&self) -> &Scope<GenericRecord> {
        &self.record
    }

    /// Scope of the constant partition named `name`.
    pub fn constant_name(&self, name: &str) -> StorageResult<Scope<str>> {
        Self::constant_builder(name).build(Arc::clone(&self.bridge))
    }

    /// Configuration scope shared by every instance of the action type `A`.
    pub fn action_configuration<A: Action>(&self) -> StorageResult<Scope<A>> {
        Self::action_builder(A::NAME)
            .adapt::<A, _>(|_| ())
            .build(Arc::clone(&self.bridge))
    }

    /// The partition of [`Scopes::action_configuration`], addressed by the
    /// type alone.
    pub fn action_class<A: Action>(&self) -> StorageResult<Scope<()>> {
        self.action_named(A::NAME)
    }

    /// The action partition for an [`Action::NAME`] known only at run time.
    pub fn action_named(&self, action_name: &str) -> StorageResult<Scope<()>> {
        Self::action_builder(action_name).build(Arc::clone(&self.bridge))
    }

    // ── Builders ──

    pub fn project_builder() -> ScopeBuilder<dyn Project> {
        ScopeBuilder::<i64>::new(
            long_id_entity(PROJECT_ENTITY, PROJECT_PREFIX),
            delete_by_name_prefix(PROJECT_ENTITY, PROJECT_PREFIX),
        )
        .adapt::<dyn Project, _>(|project| project.id())
    }

    pub fn issue_builder() -> ScopeBuilder<dyn Issue> {
        ScopeBuilder::<i64>::new(
            long_id_entity(ISSUE_ENTITY, ISSUE_PREFIX),
            delete_by_name_prefix(ISSUE_ENTITY, ISSUE_PREFIX),
        )
        .adapt::<dyn Issue, _>(|issue| issue.id())
    }

    pub fn record_builder() -> ScopeBuilder<GenericRecord> {
        ScopeBuilder::new(
            record_id_entity(RECORD_ENTITY, RECORD_PREFIX),
            delete_by_name_prefix(RECORD_ENTITY, RECORD_PREFIX),
        )
    }

    pub fn constant_builder(name: &str) -> ScopeBuilder<str> {
        let entity_name = format!("{CONSTANT_ENTITY}{name}");
        ScopeBuilder::new(
            constant_id_entity::<str>(CONSTANT_ENTITY_ID, &entity_name, CONSTANT_PREFIX),
            delete_by_constant_id(CONSTANT_ENTITY_ID, &entity_name, CONSTANT_PREFIX),
        )
    }

    pub fn action_builder(action_name: &str) -> ScopeBuilder<()> {
        let entity_name = format!("{ACTION_ENTITY}{action_name}");
        ScopeBuilder::new(
            constant_id_entity::<()>(ACTION_ENTITY_ID, &entity_name, ACTION_PREFIX),
            delete_by_constant_id(ACTION_ENTITY_ID, &entity_name, ACTION_PREFIX),
        )
    }
}
