use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QuerySelect,
};
use serde::Serialize;

use crate::database::{ColumnCatalog, RelatedTable, apply_to_select};
use crate::filtering::{Pagination, SortInstruction};
use crate::translator::TranslationResult;

/// One page of results together with the totals needed for metadata
#[derive(Debug, Clone, PartialEq)]
pub struct ListPage<T> {
    pub items: Vec<T>,
    /// Rows matching the predicates across all pages
    pub total: u64,
    pub pagination: Pagination,
    /// Ordering applied by the query
    pub sort: SortInstruction,
}

/// A sea-orm entity exposed through a list endpoint.
///
/// Implementors name the columns that filters, search and sort may touch
/// and, for `relation.column` search fields, the related tables.
#[async_trait]
pub trait ListResource: Sized + Send + Sync + Serialize
where
    Self::EntityType: EntityTrait + Sync,
    <Self::EntityType as EntityTrait>::Model: Sync,
    Self: From<<Self::EntityType as EntityTrait>::Model>,
{
    type EntityType: EntityTrait + Sync;
    type ColumnType: ColumnTrait + Copy + std::fmt::Debug + Send + Sync;

    const RESOURCE_NAME_PLURAL: &'static str;
    const TABLE_NAME: &'static str;

    /// Columns addressable by name in list parameters
    fn columns() -> Vec<(&'static str, Self::ColumnType)>;

    /// Tables reachable for `relation.column` search fields
    #[must_use]
    fn related_tables() -> Vec<RelatedTable> {
        vec![]
    }

    #[must_use]
    fn catalog() -> ColumnCatalog<Self::ColumnType> {
        ColumnCatalog::new(
            Self::TABLE_NAME,
            Self::columns(),
            Self::related_tables(),
        )
    }

    /// Run a translated query: count and fetch one page, or fetch every row
    /// when the translation allows it.
    async fn fetch(
        db: &DatabaseConnection,
        query: &TranslationResult,
        default_sort_column: &str,
    ) -> Result<ListPage<Self>, DbErr> {
        let catalog = Self::catalog();
        let (select, sort) = apply_to_select(
            Self::EntityType::find(),
            query,
            default_sort_column,
            &catalog,
        );

        let (models, total) = match query.pagination {
            Pagination::All => {
                let models = select.all(db).await?;
                let total = u64::try_from(models.len()).unwrap_or(u64::MAX);
                (models, total)
            }
            Pagination::Paginated { page_size, .. } => {
                let total = PaginatorTrait::count(select.clone(), db).await?;
                let models = select
                    .offset(query.pagination.offset())
                    .limit(page_size)
                    .all(db)
                    .await?;
                (models, total)
            }
        };

        Ok(ListPage {
            items: models.into_iter().map(Self::from).collect(),
            total,
            pagination: query.pagination,
            sort,
        })
    }
}
