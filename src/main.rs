use clap::Parser;
use csv_geocode::utils::{logger, validation::Validate};
use csv_geocode::{
    CliConfig, EtlEngine, FixedIntervalLimiter, GeocodePipeline, LocalStorage, NominatimGeocoder,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_logger(config.log_format(), config.verbose);

    tracing::info!("Starting csv-geocode");
    tracing::debug!("CLI config: {:?}", config);

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let geocoder = match NominatimGeocoder::new(&config.endpoint, &config.user_agent(), config.timeout()) {
        Ok(geocoder) => geocoder,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let limiter = FixedIntervalLimiter::new(config.delay());
    tracing::info!(
        "Geocoding with {} ({:?} between requests, on miss: {:?})",
        config.endpoint,
        limiter.interval(),
        config.on_miss
    );

    let pipeline = GeocodePipeline::new(
        LocalStorage::default(),
        config,
        Box::new(geocoder),
        Box::new(limiter),
    );
    let engine = EtlEngine::new(pipeline);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Shapefile written to {}", output_path);
            println!("✅ Shapefile written to {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
