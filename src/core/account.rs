//! Owner and admin accounts.
//!
//! Passwords are stored as argon2 PHC strings. Owners register themselves; admins are
//! registered by the owner of the rooming house they will manage.

use crate::{
    core::{
        property::find_rooming_house_by_id,
        scope::{Identity, Role, resolve_scope},
    },
    entities::{Admin, Owner, admin, owner},
    errors::{Error, Result},
};
use argon2::{
    Argon2,
    password_hash::{
        PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use chrono::Utc;
use sea_orm::{QueryOrder, Set, prelude::*};
use serde::Deserialize;
use tracing::{info, instrument, warn};

/// Registration payload shared by owners and admins.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterInput {
    /// Full name
    pub full_name: String,
    /// Display username
    pub username: String,
    /// Login email
    pub email: String,
    /// Plain-text password
    pub password: String,
}

struct ValidAccount {
    full_name: String,
    username: String,
    email: String,
    password_hash: String,
}

impl RegisterInput {
    fn validate(&self) -> Result<ValidAccount> {
        let full_name = self.full_name.trim();
        let username = self.username.trim();
        let email = normalize_email(&self.email);
        if full_name.is_empty() {
            return Err(Error::bad_request("full name is required"));
        }
        if username.is_empty() {
            return Err(Error::bad_request("username is required"));
        }
        if !email.contains('@') {
            return Err(Error::bad_request("email is invalid"));
        }
        if self.password.chars().count() < 8 {
            return Err(Error::bad_request(
                "password must be at least 8 characters",
            ));
        }
        Ok(ValidAccount {
            full_name: full_name.to_string(),
            username: username.to_string(),
            email,
            password_hash: hash_password(&self.password)?,
        })
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Hashes a password into an argon2 PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::internal(format!("Failed to hash password: {e}")))
}

/// Checks a password against a stored PHC string.
#[must_use]
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    PasswordHash::new(password_hash)
        .is_ok_and(|parsed| Argon2::default().verify_password(password.as_bytes(), &parsed).is_ok())
}

/// Registers an owner account.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn register_owner(db: &DatabaseConnection, input: &RegisterInput) -> Result<owner::Model> {
    let account = input.validate()?;
    let taken = Owner::find()
        .filter(owner::Column::Email.eq(account.email.as_str()))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(Error::bad_request("email already registered"));
    }

    let owner = owner::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(account.full_name),
        username: Set(account.username),
        email: Set(account.email),
        password_hash: Set(account.password_hash),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!(owner_id = %owner.id, "Registered owner");
    Ok(owner)
}

/// Registers an admin for a rooming house owned by the caller.
#[instrument(skip(db, input), fields(email = %input.email))]
pub async fn register_admin(
    db: &DatabaseConnection,
    identity: &Identity,
    rooming_house_id: Option<Uuid>,
    input: &RegisterInput,
) -> Result<admin::Model> {
    identity.require_owner()?;
    let rooming_house_id =
        rooming_house_id.ok_or_else(|| Error::bad_request("rooming house id is required"))?;
    let house = find_rooming_house_by_id(db, identity, rooming_house_id).await?;
    let account = input.validate()?;

    let taken = Admin::find()
        .filter(admin::Column::Email.eq(account.email.as_str()))
        .one(db)
        .await?
        .is_some();
    if taken {
        return Err(Error::bad_request("email already registered"));
    }

    let admin = admin::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set(account.full_name),
        username: Set(account.username),
        email: Set(account.email),
        password_hash: Set(account.password_hash),
        rooming_house_id: Set(house.id),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!(admin_id = %admin.id, rooming_house_id = %house.id, "Registered admin");
    Ok(admin)
}

/// Resolves credentials to an identity.
///
/// Unknown emails and wrong passwords fail the same way.
#[instrument(skip(db, password))]
pub async fn authenticate(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    role: Role,
) -> Result<Identity> {
    let email = normalize_email(email);
    let found = match role {
        Role::Owner => Owner::find()
            .filter(owner::Column::Email.eq(email.as_str()))
            .one(db)
            .await?
            .map(|o| (Identity::owner(o.id), o.password_hash)),
        Role::Admin => Admin::find()
            .filter(admin::Column::Email.eq(email.as_str()))
            .one(db)
            .await?
            .map(|a| (Identity::admin(a.id, a.rooming_house_id), a.password_hash)),
    };

    match found {
        Some((identity, hash)) if verify_password(password, &hash) => Ok(identity),
        _ => {
            warn!(role = role.as_str(), "Rejected login");
            Err(Error::unauthorized("invalid email or password"))
        }
    }
}

/// Lists the admins of the caller's rooming houses. Owner only.
pub async fn find_all_admins(
    db: &DatabaseConnection,
    identity: &Identity,
) -> Result<Vec<admin::Model>> {
    identity.require_owner()?;
    let scope = resolve_scope(db, identity).await?;
    Admin::find()
        .filter(admin::Column::RoomingHouseId.is_in(scope.rooming_house_ids().to_vec()))
        .order_by_asc(admin::Column::FullName)
        .all(db)
        .await
        .map_err(Into::into)
}
