use crate::core::assemble::to_geo_table;
use crate::core::geocode::get_coordinates;
use crate::core::geometry::get_points;
use crate::core::loader::load_table;
use crate::core::shapefile_writer::{encode, shp_path};
use crate::core::{ConfigProvider, GeoTable, Geocoder, Pipeline, RateLimiter, Storage, Table};
use crate::utils::error::Result;
use std::path::Path;

/// CSV in, geocoded points out. The geocoder and rate limiter are supplied by the
/// caller and reused for every row of the run.
pub struct GeocodePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    geocoder: Box<dyn Geocoder>,
    limiter: Box<dyn RateLimiter>,
}

impl<S: Storage, C: ConfigProvider> GeocodePipeline<S, C> {
    pub fn new(
        storage: S,
        config: C,
        geocoder: Box<dyn Geocoder>,
        limiter: Box<dyn RateLimiter>,
    ) -> Self {
        Self {
            storage,
            config,
            geocoder,
            limiter,
        }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for GeocodePipeline<S, C> {
    async fn extract(&self) -> Result<Table> {
        let input = self.config.input_path();
        tracing::debug!("Reading {}", input);

        let bytes = self.storage.read_file(Path::new(input)).await?;
        load_table(&bytes, self.config.name_column())
    }

    async fn transform(&self, data: Table) -> Result<GeoTable> {
        let enriched = get_coordinates(
            &data,
            self.config.name_column(),
            self.geocoder.as_ref(),
            self.limiter.as_ref(),
            self.config.miss_policy(),
            self.config.show_progress(),
        )
        .await?;

        if enriched.missing_count() > 0 {
            tracing::warn!(
                "{} of {} rows have no coordinates",
                enriched.missing_count(),
                enriched.len()
            );
        }

        let points = get_points(&enriched);
        to_geo_table(enriched, points)
    }

    async fn load(&self, result: GeoTable) -> Result<String> {
        let output_path = shp_path(self.config.output_path());

        let bundle = encode(&result)?;
        tracing::debug!(
            "Writing {} features to {}",
            bundle.feature_count,
            output_path.display()
        );

        let files = bundle.into_files(&output_path);
        self.storage.write_files(&files).await?;

        Ok(output_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::rate_limit::NoDelay;
    use crate::core::{Coordinates, GeocodeOutcome, MissPolicy};
    use crate::utils::error::GeocodeError;
    use std::collections::HashMap;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<PathBuf, Vec<u8>>>>,
    }

    impl MockStorage {
        fn with_input(path: &str, data: &str) -> Self {
            let mut files = HashMap::new();
            files.insert(PathBuf::from(path), data.as_bytes().to_vec());
            Self {
                files: Arc::new(Mutex::new(files)),
            }
        }

        async fn paths(&self) -> Vec<PathBuf> {
            let mut paths: Vec<_> = self.files.lock().await.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &Path) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                GeocodeError::file(
                    path,
                    std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                )
            })
        }

        async fn write_files(&self, files: &[(PathBuf, Vec<u8>)]) -> Result<()> {
            let mut stored = self.files.lock().await;
            for (path, data) in files {
                stored.insert(path.clone(), data.clone());
            }
            Ok(())
        }
    }

    struct MockConfig {
        input: String,
        output: String,
        policy: MissPolicy,
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input
        }

        fn output_path(&self) -> &str {
            &self.output
        }

        fn name_column(&self) -> &str {
            "name"
        }

        fn miss_policy(&self) -> MissPolicy {
            self.policy
        }

        fn show_progress(&self) -> bool {
            false
        }
    }

    struct StubGeocoder {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait::async_trait]
    impl Geocoder for StubGeocoder {
        async fn geocode(&self, query: &str) -> Result<GeocodeOutcome> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(match query {
                "California" => GeocodeOutcome::Found(Coordinates::new(-119.4, 36.7)),
                "Texas" => GeocodeOutcome::Found(Coordinates::new(-99.9, 31.9)),
                _ => GeocodeOutcome::NotFound,
            })
        }
    }

    fn pipeline(
        storage: MockStorage,
        input: &str,
        policy: MissPolicy,
    ) -> (GeocodePipeline<MockStorage, MockConfig>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let config = MockConfig {
            input: input.to_string(),
            output: "out/states".to_string(),
            policy,
        };
        let geocoder = StubGeocoder {
            calls: calls.clone(),
        };
        (
            GeocodePipeline::new(storage, config, Box::new(geocoder), Box::new(NoDelay)),
            calls,
        )
    }

    #[tokio::test]
    async fn test_transform_two_states() {
        let storage = MockStorage::with_input("states.csv", "name\nCalifornia\nTexas\n");
        let (pipeline, calls) = pipeline(storage, "states.csv", MissPolicy::Abort);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(result.len(), 2);
        assert_eq!(result.crs.epsg, 4326);
        assert_eq!(result.geometry[0], Some(geo::Point::new(-119.4, 36.7)));
        assert_eq!(result.geometry[1], Some(geo::Point::new(-99.9, 31.9)));
        assert_eq!(result.data.columns(), vec!["name", "longitude", "latitude"]);
    }

    #[tokio::test]
    async fn test_missing_input_fails_before_any_lookup() {
        let storage = MockStorage::with_input("other.csv", "name\nTexas\n");
        let (pipeline, calls) = pipeline(storage, "states.csv", MissPolicy::Abort);

        let err = pipeline.extract().await.unwrap_err();

        assert!(matches!(err, GeocodeError::FileError { .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_load_writes_all_components() {
        let storage = MockStorage::with_input("states.csv", "name\nCalifornia\nTexas\n");
        let (pipeline, _) = pipeline(storage.clone(), "states.csv", MissPolicy::Abort);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();
        let output = pipeline.load(result).await.unwrap();

        assert_eq!(output, Path::new("out/states.shp").display().to_string());
        assert_eq!(
            storage.paths().await,
            vec![
                PathBuf::from("out/states.dbf"),
                PathBuf::from("out/states.prj"),
                PathBuf::from("out/states.shp"),
                PathBuf::from("out/states.shx"),
                PathBuf::from("states.csv"),
            ]
        );
    }

    #[tokio::test]
    async fn test_skip_policy_keeps_row_count() {
        let storage = MockStorage::with_input("states.csv", "name\nAtlantis\nTexas\n");
        let (pipeline, _) = pipeline(storage, "states.csv", MissPolicy::Skip);

        let table = pipeline.extract().await.unwrap();
        let result = pipeline.transform(table).await.unwrap();

        assert_eq!(result.len(), 2);
        assert_eq!(result.geometry[0], None);
        assert_eq!(result.data.missing_count(), 1);
    }

    #[tokio::test]
    async fn test_rerun_is_identical() {
        let storage = MockStorage::with_input("states.csv", "name,abbr\nCalifornia,CA\nTexas,TX\n");
        let (pipeline, _) = pipeline(storage, "states.csv", MissPolicy::Abort);

        let first = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();
        let second = pipeline.transform(pipeline.extract().await.unwrap()).await.unwrap();

        assert_eq!(first, second);
    }
}
