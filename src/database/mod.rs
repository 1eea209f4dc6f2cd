// Storage layer: sea-orm interpretation of translated list queries

pub mod apply;

// Re-export commonly used items
pub use apply::{
    ColumnCatalog, RelatedTable, apply_to_select, build_condition, effective_sort, order_expr,
};
