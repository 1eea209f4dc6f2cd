use querycrate::{ListResource, RelatedTable};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: i32,
    pub name: String,
    pub status: String,
    pub price: i32,
    pub featured: bool,
    pub category_id: Option<i32>,
    pub discontinued_at: Option<Date>,
    pub created_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// API representation of a product
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub status: String,
    pub price: i32,
    pub featured: bool,
    pub category_id: Option<i32>,
    pub discontinued_at: Option<chrono::NaiveDate>,
    pub created_at: chrono::NaiveDateTime,
}

impl From<Model> for Product {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            status: model.status,
            price: model.price,
            featured: model.featured,
            category_id: model.category_id,
            discontinued_at: model.discontinued_at,
            created_at: model.created_at,
        }
    }
}

impl ListResource for Product {
    type EntityType = Entity;
    type ColumnType = Column;

    const RESOURCE_NAME_PLURAL: &'static str = "products";
    const TABLE_NAME: &'static str = "products";

    fn columns() -> Vec<(&'static str, Self::ColumnType)> {
        vec![
            ("id", Column::Id),
            ("name", Column::Name),
            ("status", Column::Status),
            ("price", Column::Price),
            ("featured", Column::Featured),
            ("category_id", Column::CategoryId),
            ("discontinued_at", Column::DiscontinuedAt),
            ("created_at", Column::CreatedAt),
        ]
    }

    fn related_tables() -> Vec<RelatedTable> {
        vec![RelatedTable {
            relation: "category",
            table: "categories",
            related_key: "id",
            parent_key: "category_id",
        }]
    }
}
