use crate::domain::model::{GeoTable, GeocodeOutcome, MissPolicy, Table};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &Path) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;

    /// Writes every file or none of them.
    fn write_files(
        &self,
        files: &[(PathBuf, Vec<u8>)],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn name_column(&self) -> &str;
    fn miss_policy(&self) -> MissPolicy;
    fn show_progress(&self) -> bool;
}

/// Resolves a place name to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, query: &str) -> Result<GeocodeOutcome>;
}

/// Awaited once before every geocoding lookup.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn wait(&self);
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Table>;
    async fn transform(&self, data: Table) -> Result<GeoTable>;
    async fn load(&self, result: GeoTable) -> Result<String>;
}
