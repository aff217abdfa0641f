use std::path::Path;
use std::time::Instant;

use tracing::{error, info, instrument, warn};

use crate::config::Config;
use crate::db::{Database, DbError, Session, TenantRepository};
use crate::importers::{parse_tenant, read_csv_file, CsvImportError, TenantRecordError};

/// Error types for a tenant ingestion run
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error(transparent)]
    Database(#[from] DbError),

    #[error(transparent)]
    Csv(#[from] CsvImportError),

    #[error(transparent)]
    Record(#[from] TenantRecordError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestSummary {
    pub rows_read: usize,
    pub rows_upserted: usize,
}

/// Loads a tenants CSV into the database over a single session.
#[derive(Clone)]
pub struct IngestService {
    database: Database,
}

impl IngestService {
    pub fn new(config: &Config) -> Result<Self, IngestError> {
        Ok(Self {
            database: Database::new(config)?,
        })
    }

    /// Run one ingestion:
    /// 1. Acquire a session
    /// 2. Create the tenants table if absent
    /// 3. Read the CSV file
    /// 4. Upsert each row in file order, one transaction per row
    ///
    /// The session is closed whether or not the run succeeds. Rows committed
    /// before a failure stay committed.
    #[instrument(skip(self, csv_path), fields(csv_path = %csv_path.display()))]
    pub async fn run(&self, csv_path: &Path) -> Result<IngestSummary, IngestError> {
        let start_time = Instant::now();
        let mut session = self.database.acquire().await?;

        let outcome = Self::ingest(&mut session, csv_path).await;

        if let Err(e) = session.close().await {
            warn!(error = %e, "Failed to close database session");
        }

        match &outcome {
            Ok(summary) => info!(
                "Ingested {} of {} rows in {:.2}s",
                summary.rows_upserted,
                summary.rows_read,
                start_time.elapsed().as_secs_f64()
            ),
            Err(e) => error!(error = %e, "Ingestion aborted"),
        }

        outcome
    }

    /// Ingest a CSV file over an already open session.
    pub async fn ingest(
        session: &mut Session,
        csv_path: &Path,
    ) -> Result<IngestSummary, IngestError> {
        let mut repo = TenantRepository::new(session.connection());

        info!("Creating tenants table");
        repo.create_table().await?;
        info!("Tenants table created successfully");

        let rows = read_csv_file(csv_path)?;

        info!("Inserting data into tenants");
        let mut rows_upserted = 0;
        for (index, row) in rows.iter().enumerate() {
            let tenant = parse_tenant(row, index + 1)?;
            repo.upsert(&tenant).await?;
            rows_upserted += 1;
        }

        info!(
            "Data from {} has been successfully inserted into the database.",
            csv_path.display()
        );

        Ok(IngestSummary {
            rows_read: rows.len(),
            rows_upserted,
        })
    }

    pub async fn close(&self) {
        self.database.close().await;
    }
}
