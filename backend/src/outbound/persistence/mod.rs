//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the domain repository
//! ports backed by PostgreSQL via Diesel with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Validation and authorisation live in the domain services.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Typed errors**: pool and Diesel failures map onto
//!   [`PersistenceError`](crate::domain::ports::PersistenceError), keeping
//!   the violated constraint's name.
//!
//! # Example
//!
//! ```ignore
//! use safeplate::outbound::persistence::{DbPool, DieselDishRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/safeplate")).await?;
//! let dishes = DieselDishRepository::new(pool);
//! ```

mod diesel_dish_repository;
mod diesel_error_mapping;
mod diesel_pending_ingredient_repository;
mod diesel_restaurant_repository;
mod diesel_tag_repositories;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_dish_repository::DieselDishRepository;
pub use diesel_pending_ingredient_repository::DieselPendingIngredientRepository;
pub use diesel_restaurant_repository::DieselRestaurantRepository;
pub use diesel_tag_repositories::{DieselAllergyRepository, DieselIngredientRepository};
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_pending_migrations};
pub use pool::{DbPool, PgConn, PoolConfig, PoolError};
