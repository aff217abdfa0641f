#![allow(dead_code)]

use std::io::Write;

use sqlx::mysql::MySqlPoolOptions;
use sqlx::MySqlPool;
use tempfile::NamedTempFile;
use tenant_loader::config::Config;
use tenant_loader::db::Tenant;

pub const HEADER: &str = "shop_id,shop_name,user_name,user_email,user_phone\n";

/// Connection settings for the test database
/// Override with TEST_DB_HOST, TEST_DB_USERNAME, TEST_DB_PASSWORD, TEST_DB_NAME, TEST_DB_PORT
pub fn test_config() -> Config {
    let var = |name: &str, default: &str| {
        Some(std::env::var(name).unwrap_or_else(|_| default.to_string()))
    };

    Config {
        host: var("TEST_DB_HOST", "localhost"),
        username: var("TEST_DB_USERNAME", "root"),
        password: var("TEST_DB_PASSWORD", "password"),
        database: var("TEST_DB_NAME", "tenants_test"),
        port: var("TEST_DB_PORT", "3306"),
    }
}

/// Separate pool used only for setup and assertions
pub async fn test_pool() -> MySqlPool {
    let url = test_config()
        .database_url()
        .expect("Invalid test database config");

    MySqlPoolOptions::new()
        .max_connections(2)
        .connect(&url)
        .await
        .expect("Failed to connect to test database")
}

pub async fn drop_tenants_table(pool: &MySqlPool) {
    sqlx::query("DROP TABLE IF EXISTS tenants")
        .execute(pool)
        .await
        .expect("Failed to drop tenants table");
}

pub async fn tenants_table_exists(pool: &MySqlPool) -> bool {
    let count: i64 = sqlx::query_scalar(
        r#"
        SELECT COUNT(*) FROM information_schema.tables
        WHERE table_schema = DATABASE() AND table_name = 'tenants'
        "#,
    )
    .fetch_one(pool)
    .await
    .expect("Failed to query information_schema");

    count > 0
}

pub async fn all_tenants(pool: &MySqlPool) -> Vec<Tenant> {
    sqlx::query_as::<_, Tenant>(
        "SELECT shop_id, shop_name, user_name, user_email, user_phone FROM tenants ORDER BY shop_id",
    )
    .fetch_all(pool)
    .await
    .expect("Failed to select tenants")
}

pub fn csv_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temp file");
    file.flush().expect("Failed to flush temp file");
    file
}

pub fn tenant(shop_id: i32, shop_name: &str, user_name: &str) -> Tenant {
    Tenant {
        shop_id,
        shop_name: Some(shop_name.to_string()),
        user_name: Some(user_name.to_string()),
        user_email: Some(format!("{user_name}@x.com")),
        user_phone: Some(format!("555-{shop_id:04}")),
    }
}
