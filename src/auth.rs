//! Caller authorization for unpaginated listing.
//!
//! The translator asks a single question of the caller: may it receive every
//! matching row at once (`all=true`)? Integrators answer it by implementing
//! [`AuthorizationContext`], typically on the user type their authentication
//! middleware already inserts into request extensions.
//!
//! ```rust,ignore
//! async fn inject_user(mut req: Request<Body>, next: Next) -> Response {
//!     let user = Principal::new("42").with_fetch_all(true);
//!     req.extensions_mut().insert(Caller::new(user));
//!     next.run(req).await
//! }
//! ```

use std::fmt;
use std::sync::Arc;

/// Decides whether a caller may bypass pagination.
pub trait AuthorizationContext: Send + Sync {
    /// `true` lets an `all=true` request return every row
    fn may_fetch_all(&self) -> bool;

    /// Identity recorded with policy events, when known
    fn identity(&self) -> Option<String> {
        None
    }
}

/// Never allows fetching all rows. Used when no caller is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl AuthorizationContext for DenyAll {
    fn may_fetch_all(&self) -> bool {
        false
    }
}

/// Always allows fetching all rows
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl AuthorizationContext for AllowAll {
    fn may_fetch_all(&self) -> bool {
        true
    }
}

impl<F> AuthorizationContext for F
where
    F: Fn() -> bool + Send + Sync,
{
    fn may_fetch_all(&self) -> bool {
        self()
    }
}

/// An authenticated caller with an explicit fetch-all permission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub id: String,
    pub can_fetch_all: bool,
}

impl Principal {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            can_fetch_all: false,
        }
    }

    #[must_use]
    pub const fn with_fetch_all(mut self, allowed: bool) -> Self {
        self.can_fetch_all = allowed;
        self
    }
}

impl AuthorizationContext for Principal {
    fn may_fetch_all(&self) -> bool {
        self.can_fetch_all
    }

    fn identity(&self) -> Option<String> {
        Some(self.id.clone())
    }
}

/// Request extension carrying the caller's authorization
#[derive(Clone)]
pub struct Caller(Arc<dyn AuthorizationContext>);

impl Caller {
    pub fn new(context: impl AuthorizationContext + 'static) -> Self {
        Self(Arc::new(context))
    }

    #[must_use]
    pub fn context(&self) -> &dyn AuthorizationContext {
        self.0.as_ref()
    }
}

impl fmt::Debug for Caller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Caller")
            .field("identity", &self.0.identity())
            .field("may_fetch_all", &self.0.may_fetch_all())
            .finish()
    }
}

impl AuthorizationContext for Caller {
    fn may_fetch_all(&self) -> bool {
        self.0.may_fetch_all()
    }

    fn identity(&self) -> Option<String> {
        self.0.identity()
    }
}
