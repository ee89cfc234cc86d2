//! Shared test utilities for the rooming house back office.
//!
//! This module provides common helper functions for setting up test databases
//! and creating test entities with sensible defaults.

use crate::{
    config::catalog::CatalogConfig,
    core::{
        catalog::{find_period_by_unit, seed_catalog},
        package::create_package,
        pricing::{PeriodPrices, PricedItem, PricedItemInput},
        property::{RoomingHouseInput, create_rooming_house},
        room::{RoomInput, create_room},
        scope::Identity,
        tenant::{TenantInput, create_tenant},
    },
    entities::{PeriodUnit, owner, period, room, rooming_house, tenant},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use uuid::Uuid;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// An owner with one rooming house, one package and one room, on a seeded catalog.
pub struct TestFixture {
    /// Owner of `house`
    pub owner: owner::Model,
    /// "Kos Melati", three floors
    pub house: rooming_house::Model,
    /// "Standard": 50k daily, 300k weekly, 1M monthly, 11M annually
    pub package: PricedItem,
    /// "A-101" on floor 1, capacity 2, billed with `package`
    pub room: room::Model,
    /// The Monthly period
    pub monthly: period::Model,
}

/// Creates an owner account without hashing a real password.
pub async fn create_custom_owner(db: &DatabaseConnection, email: &str) -> Result<owner::Model> {
    let owner = owner::ActiveModel {
        id: Set(Uuid::new_v4()),
        full_name: Set("Test Owner".to_string()),
        username: Set(email.split('@').next().unwrap_or(email).to_string()),
        email: Set(email.to_string()),
        password_hash: Set("not-a-real-hash".to_string()),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;
    Ok(owner)
}

/// Creates the default test owner (`owner@example.com`).
pub async fn create_test_owner(db: &DatabaseConnection) -> Result<owner::Model> {
    create_custom_owner(db, "owner@example.com").await
}

/// Creates a three-floor rooming house owned by `owner_id`.
pub async fn create_test_rooming_house(
    db: &DatabaseConnection,
    owner_id: Uuid,
    name: &str,
) -> Result<rooming_house::Model> {
    create_rooming_house(
        db,
        &Identity::owner(owner_id),
        &RoomingHouseInput {
            name: name.to_string(),
            address: "Jl. Kenanga 12".to_string(),
            description: None,
            floor_total: 3,
        },
    )
    .await
}

/// Seeds the catalog and creates the standard [`TestFixture`].
pub async fn create_test_fixture(db: &DatabaseConnection) -> Result<TestFixture> {
    seed_catalog(db, &CatalogConfig::default()).await?;
    let owner = create_test_owner(db).await?;
    let house = create_test_rooming_house(db, owner.id, "Kos Melati").await?;
    let identity = Identity::owner(owner.id);

    let package = create_package(
        db,
        &identity,
        &PricedItemInput {
            name: "Standard".to_string(),
            rooming_house_id: Some(house.id),
            prices: PeriodPrices {
                daily: 50_000.0,
                weekly: 300_000.0,
                monthly: 1_000_000.0,
                annual: 11_000_000.0,
            },
        },
    )
    .await?;

    let room = create_room(
        db,
        &identity,
        &RoomInput {
            name: "A-101".to_string(),
            floor: 1,
            max_capacity: 2,
            pricing_package_id: package.id,
            size_id: None,
            rooming_house_id: Some(house.id),
        },
    )
    .await?;
    let monthly = find_period_by_unit(db, PeriodUnit::Month).await?;

    Ok(TestFixture {
        owner,
        house,
        package,
        room,
        monthly,
    })
}

/// Creates another room in the fixture's rooming house, billed with its package.
pub async fn create_test_room(
    db: &DatabaseConnection,
    fixture: &TestFixture,
    name: &str,
    floor: i32,
    max_capacity: i32,
) -> Result<room::Model> {
    create_room(
        db,
        &Identity::owner(fixture.owner.id),
        &RoomInput {
            name: name.to_string(),
            floor,
            max_capacity,
            pricing_package_id: fixture.package.id,
            size_id: None,
            rooming_house_id: Some(fixture.house.id),
        },
    )
    .await
}

/// Registers a monthly primary tenant in the fixture room.
pub async fn create_test_primary_tenant(
    db: &DatabaseConnection,
    fixture: &TestFixture,
    name: &str,
    regular_payment_duration: i32,
    additional_ids: &[Uuid],
) -> Result<tenant::Model> {
    create_tenant(
        db,
        &Identity::owner(fixture.owner.id),
        &TenantInput {
            name: name.to_string(),
            gender: "male".to_string(),
            phone_number: "081234567890".to_string(),
            emergency_contact: Some("081111111111".to_string()),
            is_tenant: Some(true),
            regular_payment_duration: Some(regular_payment_duration),
            room_id: Some(fixture.room.id),
            period_id: Some(fixture.monthly.id),
            rooming_house_id: Some(fixture.house.id),
            parent_tenant_id: None,
            tenant_additional_ids: additional_ids.to_vec(),
        },
    )
    .await
}

/// Registers an assistant sharing the room of `parent_id`.
pub async fn create_test_assistant(
    db: &DatabaseConnection,
    fixture: &TestFixture,
    name: &str,
    parent_id: Uuid,
) -> Result<tenant::Model> {
    create_tenant(
        db,
        &Identity::owner(fixture.owner.id),
        &TenantInput {
            name: name.to_string(),
            gender: "female".to_string(),
            phone_number: "081298765432".to_string(),
            is_tenant: Some(false),
            rooming_house_id: Some(fixture.house.id),
            parent_tenant_id: Some(parent_id),
            ..TenantInput::default()
        },
    )
    .await
}
