use sqlx::FromRow;

/// A row of the `tenants` table, keyed by `shop_id`. Text columns are
/// nullable.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct Tenant {
    pub shop_id: i32,
    pub shop_name: Option<String>,
    pub user_name: Option<String>,
    pub user_email: Option<String>,
    pub user_phone: Option<String>,
}
