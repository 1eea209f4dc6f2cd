#![allow(dead_code)]

use axum::{Router, routing::get};
use chrono::NaiveDate;
use querycrate::{FilterConfiguration, ListState, QueryTranslator, list_handler};
use sea_orm::{ActiveValue::Set, Database, DatabaseConnection, DbErr, EntityTrait, Schema};
use sea_orm_migration::prelude::*;

pub mod category_entity;
pub mod product_entity;

use product_entity::Product;

pub async fn setup_test_db() -> Result<DatabaseConnection, DbErr> {
    let db = Database::connect("sqlite::memory:").await?;

    // Run migrations
    Migrator::up(&db, None).await?;
    seed(&db).await?;

    Ok(db)
}

/// The configuration used by the `/api/v1/products` endpoint
pub fn product_config() -> FilterConfiguration {
    FilterConfiguration::new()
        .searchable(["name", "category.name"])
        .filterable(["status", "price", "featured", "category_id", "discontinued_at", "created_at"])
        .page_sizes(3, 5)
}

pub fn setup_test_app(db: DatabaseConnection) -> Router {
    setup_app_with_config(db, product_config())
}

pub fn setup_app_with_config(db: DatabaseConnection, config: FilterConfiguration) -> Router {
    let translator = QueryTranslator::new(config).expect("valid test configuration");

    let api = Router::new()
        .route("/products", get(list_handler::<Product>))
        .with_state(ListState::new(db, translator));

    Router::new().nest("/api/v1", api)
}

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(CreateCatalogTables)]
    }
}

pub struct CreateCatalogTables;

#[async_trait::async_trait]
impl MigrationName for CreateCatalogTables {
    fn name(&self) -> &'static str {
        "m20240101_000001_create_catalog_tables"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for CreateCatalogTables {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let schema = Schema::new(manager.get_database_backend());
        manager
            .create_table(schema.create_table_from_entity(category_entity::Entity))
            .await?;
        manager
            .create_table(schema.create_table_from_entity(product_entity::Entity))
            .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(product_entity::Entity).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(category_entity::Entity).to_owned())
            .await?;
        Ok(())
    }
}

fn category(id: i32, name: &str) -> category_entity::ActiveModel {
    category_entity::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
    }
}

#[allow(clippy::too_many_arguments)]
fn product(
    id: i32,
    name: &str,
    status: &str,
    price: i32,
    featured: bool,
    category_id: Option<i32>,
    discontinued_at: Option<NaiveDate>,
    created_day: u32,
) -> product_entity::ActiveModel {
    product_entity::ActiveModel {
        id: Set(id),
        name: Set(name.to_string()),
        status: Set(status.to_string()),
        price: Set(price),
        featured: Set(featured),
        category_id: Set(category_id),
        discontinued_at: Set(discontinued_at),
        created_at: Set(NaiveDate::from_ymd_opt(2024, 1, created_day)
            .and_then(|d| d.and_hms_opt(12, 0, 0))
            .expect("valid seed date")),
    }
}

/// Seed data
///
/// | id | name               | status   | price | featured | category         |
/// |----|--------------------|----------|-------|----------|------------------|
/// | 1  | Electro_nics Hub   | active   | 200   | true     | 1 Gadgets        |
/// | 2  | ElectroXnics Decoy | active   | 300   | false    | none             |
/// | 3  | Laptop             | active   | 450   | true     | 2 Electro_nics   |
/// | 4  | Phone              | inactive | 250   | false    | 2 Electro_nics   |
/// | 5  | Cable              | active   | 50    | false    | 2 Electro_nics   |
/// | 6  | Monitor            | active   | 150   | true     | 3 Furniture      |
/// | 7  | 100% Cotton Mat    | active   | 120   | false    | 3 Furniture      |
///
/// Product `n` was created on 2024-01-0n; only Phone is discontinued (2024-03-01).
async fn seed(db: &DatabaseConnection) -> Result<(), DbErr> {
    category_entity::Entity::insert_many([
        category(1, "Gadgets"),
        category(2, "Electro_nics"),
        category(3, "Furniture"),
    ])
    .exec(db)
    .await?;

    product_entity::Entity::insert_many([
        product(1, "Electro_nics Hub", "active", 200, true, Some(1), None, 1),
        product(2, "ElectroXnics Decoy", "active", 300, false, None, None, 2),
        product(3, "Laptop", "active", 450, true, Some(2), None, 3),
        product(4, "Phone", "inactive", 250, false, Some(2), NaiveDate::from_ymd_opt(2024, 3, 1), 4),
        product(5, "Cable", "active", 50, false, Some(2), None, 5),
        product(6, "Monitor", "active", 150, true, Some(3), None, 6),
        product(7, "100% Cotton Mat", "active", 120, false, Some(3), None, 7),
    ])
    .exec(db)
    .await?;

    Ok(())
}
