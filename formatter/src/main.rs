//! FxView probe
//!
//! Diagnostic harness: loads configuration from the environment, refreshes
//! rates once against the configured quote endpoint and logs how sample
//! amounts render in every supported language.

use rust_decimal::Decimal;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fxview_formatter::{CurrencyFormatter, FormatterConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = FormatterConfig::from_env();

    // Initialize logging
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| config.log_level.clone()),
    );
    if config.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        return Err(anyhow::anyhow!("Configuration error: {}", e));
    }

    info!(
        base = %config.base_currency,
        quote_url = %config.quote_url,
        "Starting FxView probe"
    );

    let formatter = CurrencyFormatter::from_config(&config);
    let origin = formatter.refresh().await;
    info!(origin = ?origin, "Initial refresh complete");

    let samples = [Decimal::new(100, 0), Decimal::new(123456, 2), Decimal::new(-995, 1)];
    let base = formatter.base_currency().clone();

    for language in formatter.supported_languages() {
        let profile = formatter.set_language(language);
        for amount in samples {
            let rendered = formatter.format_amount(amount, &base).await;
            info!(
                language,
                locale = profile.locale_tag,
                amount = %amount,
                rendered = %rendered,
                "Sample"
            );
        }
    }

    formatter.set_language(&config.default_language);

    let status = formatter.status();
    info!(
        status = %serde_json::to_string(&status)?,
        degraded = status.last_origin.map(|o| o.is_fallback()).unwrap_or(false),
        cache = ?formatter.cache().stats(),
        "Probe finished"
    );

    Ok(())
}
