// List resources: entity bindings and query execution

pub mod traits;

// Re-export commonly used items
pub use traits::{ListPage, ListResource};
