use crate::auth::{AuthorizationContext, Caller, DenyAll};
use crate::core::ListResource;
use crate::errors::ApiError;
use crate::params::RawParameterMap;
use crate::response::ApiResponse;
use crate::translator::QueryTranslator;
use axum::{
    Extension, Json,
    extract::{RawQuery, State},
};
use sea_orm::{DatabaseConnection, EntityTrait};
use std::sync::Arc;

/// Shared state for list handlers
#[derive(Clone)]
pub struct ListState {
    pub db: DatabaseConnection,
    pub translator: Arc<QueryTranslator>,
}

impl ListState {
    pub fn new(db: DatabaseConnection, translator: QueryTranslator) -> Self {
        Self {
            db,
            translator: Arc::new(translator),
        }
    }
}

/// Translate, fetch and wrap one list request.
///
/// # Errors
///
/// `ApiError::ValidationFailed` for malformed reserved parameters,
/// `ApiError::Database` when the query fails.
pub async fn list_resources<R>(
    db: &DatabaseConnection,
    translator: &QueryTranslator,
    params: &RawParameterMap,
    auth: &dyn AuthorizationContext,
) -> Result<ApiResponse<Vec<R>>, ApiError>
where
    R: ListResource,
    <R::EntityType as EntityTrait>::Model: Sync,
{
    let query = translator.translate(params, auth)?;
    let page = R::fetch(db, &query, translator.config().default_sort_column()).await?;

    tracing::debug!(
        resource = R::RESOURCE_NAME_PLURAL,
        returned = page.items.len(),
        total = page.total,
        "Listed resources"
    );

    Ok(ApiResponse::list(page, &query))
}

/// `GET /<resources>` handler.
///
/// Callers are authorized through an optional [`Caller`] request extension;
/// without one, `all=true` is never honoured.
pub async fn list_handler<R>(
    State(state): State<ListState>,
    caller: Option<Extension<Caller>>,
    RawQuery(query): RawQuery,
) -> Result<Json<ApiResponse<Vec<R>>>, ApiError>
where
    R: ListResource + 'static,
    <R::EntityType as EntityTrait>::Model: Sync,
{
    let params = RawParameterMap::from_query_str(query.as_deref().unwrap_or_default());
    let auth: &dyn AuthorizationContext = match &caller {
        Some(Extension(caller)) => caller,
        None => &DenyAll,
    };

    list_resources::<R>(&state.db, &state.translator, &params, auth)
        .await
        .map(Json)
}
