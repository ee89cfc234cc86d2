//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the database tables and their relationships.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod additional_period;
pub mod additional_price;
pub mod admin;
pub mod owner;
pub mod period;
pub mod period_package;
pub mod pricing_package;
pub mod room;
pub mod rooming_house;
pub mod tenant;
pub mod tenant_additional_price;
pub mod transaction;
pub mod transaction_category;

// Re-export specific types to avoid conflicts
pub use additional_period::Entity as AdditionalPeriod;
pub use additional_price::Entity as AdditionalPrice;
pub use admin::Entity as Admin;
pub use owner::Entity as Owner;
pub use period::{Entity as Period, PeriodUnit};
pub use period_package::Entity as PeriodPackage;
pub use pricing_package::Entity as PricingPackage;
pub use room::Entity as Room;
pub use rooming_house::Entity as RoomingHouse;
pub use tenant::Entity as Tenant;
pub use tenant_additional_price::Entity as TenantAdditionalPrice;
pub use transaction::Entity as Transaction;
pub use transaction_category::{CategoryKind, Entity as TransactionCategory};
