pub mod error;
pub mod models;
pub mod pool;
pub mod tenant_repository;

pub use error::DbError;
pub use models::*;
pub use pool::{Database, Session};
pub use tenant_repository::TenantRepository;
