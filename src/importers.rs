pub mod csv_importer;

pub use csv_importer::{parse_tenant, read_csv_file, CsvImportError, CsvRow, TenantRecordError};
