use sqlx::{Connection, MySqlConnection};
use tracing::{debug, error, info, instrument};

use crate::db::{DbError, Tenant};

pub struct TenantRepository<'c> {
    conn: &'c mut MySqlConnection,
}

impl<'c> TenantRepository<'c> {
    pub fn new(conn: &'c mut MySqlConnection) -> Self {
        Self { conn }
    }

    /// Create the `tenants` table if it does not exist.
    ///
    /// An existing table is left untouched even if its columns differ.
    #[instrument(skip(self))]
    pub async fn create_table(&mut self) -> Result<(), DbError> {
        info!("Executing table creation query...");
        let mut tx = self.conn.begin().await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tenants (
                shop_id INT PRIMARY KEY,
                shop_name VARCHAR(100),
                user_name VARCHAR(100),
                user_email VARCHAR(100),
                user_phone VARCHAR(100)
            )
            "#,
        )
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create tenants table");
            e
        })?;

        tx.commit().await?;
        info!("Table creation committed.");
        Ok(())
    }

    /// Insert a tenant or overwrite every non-key column of an existing one.
    /// Each call is its own transaction.
    #[instrument(skip(self, tenant), fields(shop_id = tenant.shop_id))]
    pub async fn upsert(&mut self, tenant: &Tenant) -> Result<u64, DbError> {
        info!("Inserting/updating record for shop_id: {}", tenant.shop_id);
        let mut tx = self.conn.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO tenants (shop_id, shop_name, user_name, user_email, user_phone)
            VALUES (?, ?, ?, ?, ?)
            ON DUPLICATE KEY UPDATE
                shop_name = VALUES(shop_name),
                user_name = VALUES(user_name),
                user_email = VALUES(user_email),
                user_phone = VALUES(user_phone)
            "#,
        )
        .bind(tenant.shop_id)
        .bind(&tenant.shop_name)
        .bind(&tenant.user_name)
        .bind(&tenant.user_email)
        .bind(&tenant.user_phone)
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            error!(
                shop_id = tenant.shop_id,
                shop_name = ?tenant.shop_name,
                error = %e,
                "Failed to upsert tenant"
            );
            e
        })?;

        tx.commit().await?;
        info!("Data for shop_id {} committed.", tenant.shop_id);
        Ok(result.rows_affected())
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&mut self, shop_id: i32) -> Result<Option<Tenant>, DbError> {
        debug!("Querying tenant by shop_id");

        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            SELECT shop_id, shop_name, user_name, user_email, user_phone
            FROM tenants
            WHERE shop_id = ?
            "#,
        )
        .bind(shop_id)
        .fetch_optional(&mut *self.conn)
        .await?;

        if tenant.is_some() {
            debug!("Found tenant");
        } else {
            debug!("Tenant not found");
        }

        Ok(tenant)
    }

    #[instrument(skip(self))]
    pub async fn count(&mut self) -> Result<usize, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tenants")
            .fetch_one(&mut *self.conn)
            .await?;

        Ok(count as usize)
    }
}
