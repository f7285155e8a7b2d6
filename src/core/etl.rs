use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load in order; returns the written shapefile path.
    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting geocoding run");

        tracing::info!("Loading input table...");
        let table = self.pipeline.extract().await?;
        tracing::info!("Loaded {} rows", table.len());

        tracing::info!("Geocoding rows...");
        let geo_table = self.pipeline.transform(table).await?;
        tracing::info!(
            "Built {} points (EPSG:{})",
            geo_table.len() - geo_table.data.missing_count(),
            geo_table.crs.epsg
        );

        tracing::info!("Writing shapefile...");
        let output_path = self.pipeline.load(geo_table).await?;
        tracing::info!("Finished in {:?}", started.elapsed());

        Ok(output_path)
    }
}
