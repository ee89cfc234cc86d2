//! Access scoping - resolves which rooming houses a caller may read and write.
//!
//! An admin sees exactly the rooming house encoded in its token. An owner sees every
//! rooming house whose `owner_id` is the owner's user id. All list and aggregate
//! operations filter on the resolved [`Scope`], and single-entity lookups check the
//! entity's own rooming house against it, reporting a mismatch as not found.

use crate::{
    entities::{RoomingHouse, rooming_house},
    errors::{Error, Result},
};
use sea_orm::{QueryOrder, QuerySelect, prelude::*};
use serde::{Deserialize, Serialize};

/// Role carried by an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Owns one or more rooming houses
    Owner,
    /// Manages a single rooming house
    Admin,
}

impl Role {
    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
        }
    }
}

/// Authenticated caller, as injected by the HTTP layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    /// Owner or admin account id
    pub user_id: Uuid,
    /// Caller role
    pub role: Role,
    /// Fixed rooming house of an admin; always `None` for owners
    pub rooming_house_id: Option<Uuid>,
}

impl Identity {
    /// Identity of an owner account.
    #[must_use]
    pub const fn owner(user_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Owner,
            rooming_house_id: None,
        }
    }

    /// Identity of an admin bound to one rooming house.
    #[must_use]
    pub const fn admin(user_id: Uuid, rooming_house_id: Uuid) -> Self {
        Self {
            user_id,
            role: Role::Admin,
            rooming_house_id: Some(rooming_house_id),
        }
    }

    /// Whether the caller is an owner.
    #[must_use]
    pub const fn is_owner(&self) -> bool {
        matches!(self.role, Role::Owner)
    }

    /// Fails with `Forbidden` unless the caller is an owner.
    pub fn require_owner(&self) -> Result<()> {
        if self.is_owner() {
            Ok(())
        } else {
            Err(Error::forbidden("only owner can access this resource"))
        }
    }

    /// Picks the rooming house a write targets.
    ///
    /// Owners name it in the request body; admins always write to their own
    /// rooming house and any requested id is ignored.
    pub fn target_rooming_house(&self, requested: Option<Uuid>) -> Result<Uuid> {
        match self.role {
            Role::Owner => requested.ok_or_else(|| Error::bad_request("rooming house id is required")),
            Role::Admin => self
                .rooming_house_id
                .ok_or_else(|| Error::unauthorized("admin token carries no rooming house")),
        }
    }
}

/// The set of rooming house ids visible to a caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    rooming_house_ids: Vec<Uuid>,
}

impl Scope {
    /// Builds a scope from explicit ids.
    #[must_use]
    pub const fn new(rooming_house_ids: Vec<Uuid>) -> Self {
        Self { rooming_house_ids }
    }

    /// Visible ids, in resolution order.
    #[must_use]
    pub fn rooming_house_ids(&self) -> &[Uuid] {
        &self.rooming_house_ids
    }

    /// Whether the caller sees no rooming house at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rooming_house_ids.is_empty()
    }

    /// Whether `id` is visible.
    #[must_use]
    pub fn contains(&self, id: Uuid) -> bool {
        self.rooming_house_ids.contains(&id)
    }

    /// First visible rooming house.
    #[must_use]
    pub fn first(&self) -> Option<Uuid> {
        self.rooming_house_ids.first().copied()
    }

    /// Fails with `NotFound` naming `what` unless `rooming_house_id` is visible.
    pub fn ensure(&self, rooming_house_id: Uuid, what: &str) -> Result<()> {
        if self.contains(rooming_house_id) {
            Ok(())
        } else {
            Err(Error::not_found(format!("{what} not found")))
        }
    }

    /// Narrows the scope to a single rooming house when one is requested.
    pub fn narrow(self, requested: Option<Uuid>) -> Result<Self> {
        match requested {
            None => Ok(self),
            Some(id) => {
                self.ensure(id, "rooming house")?;
                Ok(Self::new(vec![id]))
            }
        }
    }
}

/// Resolves the rooming houses visible to `identity`.
///
/// Owner scopes are ordered by creation time so "the first visible rooming house" is
/// stable across calls.
pub async fn resolve_scope<C>(db: &C, identity: &Identity) -> Result<Scope>
where
    C: ConnectionTrait,
{
    match identity.role {
        Role::Admin => {
            let id = identity
                .rooming_house_id
                .ok_or_else(|| Error::unauthorized("admin token carries no rooming house"))?;
            Ok(Scope::new(vec![id]))
        }
        Role::Owner => {
            let ids: Vec<Uuid> = RoomingHouse::find()
                .select_only()
                .column(rooming_house::Column::Id)
                .filter(rooming_house::Column::OwnerId.eq(identity.user_id))
                .order_by_asc(rooming_house::Column::CreatedAt)
                .order_by_asc(rooming_house::Column::Name)
                .into_tuple()
                .all(db)
                .await?;
            Ok(Scope::new(ids))
        }
    }
}
