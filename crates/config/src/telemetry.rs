use std::{collections::HashMap, io, net::SocketAddr, time::Duration};

use clap::Parser;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use opentelemetry::KeyValue;
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{ExporterBuildError, LogExporter, WithExportConfig, WithHttpConfig};
use opentelemetry_sdk::{Resource, logs::SdkLoggerProvider};
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// The OpenTelemetry logs endpoint for Axiom.
const AXIOM_LOGS_API: &str = "https://api.axiom.co/v1/logs";

/// The log filter used when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

/// Errors that can occur while setting up telemetry.
#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    /// The Prometheus exporter could not be installed.
    #[error("failed to install metrics exporter: {0}")]
    Metrics(#[from] BuildError),
    /// The OTLP log exporter could not be built.
    #[error("failed to build log exporter: {0}")]
    LogExporter(#[from] ExporterBuildError),
}

/// Telemetry-related configuration options
#[derive(Debug, Clone, Parser)]
pub struct TelemetryOpts {
    /// Whether to use ANSI colors in the logs. Disable if you're piping logs to a file or using
    /// third party services to collect logs, like kubectl/cloudwatch/loki etc.
    #[clap(
        long = "telemetry.use-ansi",
        env = "TKB_TELEMETRY_USE_ANSI",
        default_value_t = true,
        global = true
    )]
    pub use_ansi: bool,
    /// Axiom API token. Logs are exported to Axiom when both the token and the dataset are set.
    #[clap(
        long = "telemetry.axiom-token",
        env = "AXIOM_TOKEN",
        hide_env_values = true,
        global = true
    )]
    pub axiom_token: Option<String>,
    /// Axiom dataset the logs are exported to.
    #[clap(long = "telemetry.axiom-dataset", env = "AXIOM_DATASET", global = true)]
    pub axiom_dataset: Option<String>,
    /// The port to listen for Prometheus metrics. Default is `9090`.
    #[clap(long = "metrics.port", env = "TKB_METRICS_PORT", default_value_t = 9090, global = true)]
    pub metrics_port: u16,
    /// Disable metrics collection. Default is `false`.
    #[clap(
        long = "metrics.disable",
        env = "TKB_DISABLE_METRICS",
        default_value_t = false,
        global = true
    )]
    pub disable_metrics: bool,
}

/// A wrapper around the OpenTelemetry logger provider.
#[derive(Debug, Default)]
pub struct LogProvider {
    inner: Option<SdkLoggerProvider>,
}

impl LogProvider {
    /// Flush and shut down the OTLP export, if any.
    pub fn shutdown(&self) {
        if let Some(provider) = self.inner.as_ref() {
            // We ignore the error because it's not critical
            let _ = provider.shutdown();
        }
    }
}

impl TelemetryOpts {
    /// Setup the telemetry stack.
    ///
    /// Logs are written to stderr, so that stdout only carries command output. They are also
    /// exported to Axiom when configured. Prometheus metrics are served unless disabled.
    pub fn setup(&self, instance_name: &str) -> Result<LogProvider, TelemetryError> {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
        let registry = tracing_subscriber::registry().with(filter).with(
            tracing_subscriber::fmt::layer().with_ansi(self.use_ansi).with_writer(io::stderr),
        );

        let provider = self.build_axiom_provider(instance_name)?;
        match &provider {
            Some(provider) => {
                registry.with(OpenTelemetryTracingBridge::new(provider)).init();
                info!("Axiom logging enabled");
            }
            None => registry.init(),
        }

        if !self.disable_metrics {
            let prometheus_address = SocketAddr::from(([0, 0, 0, 0], self.metrics_port));

            PrometheusBuilder::new()
                .with_http_listener(prometheus_address)
                .add_global_label("instance", instance_name)
                .install()?;

            info!(%prometheus_address, "Metrics enabled");
        }

        Ok(LogProvider { inner: provider })
    }

    /// Builds the Axiom log provider if both the token and the dataset are set.
    fn build_axiom_provider(
        &self,
        service_name: &str,
    ) -> Result<Option<SdkLoggerProvider>, ExporterBuildError> {
        let (Some(token), Some(dataset)) = (&self.axiom_token, &self.axiom_dataset) else {
            return Ok(None);
        };

        let headers = HashMap::from([
            ("Authorization".to_owned(), format!("Bearer {token}")),
            ("X-Axiom-Dataset".to_owned(), dataset.clone()),
        ]);

        let exporter = LogExporter::builder()
            .with_http()
            .with_headers(headers)
            .with_endpoint(AXIOM_LOGS_API)
            .with_timeout(Duration::from_secs(5))
            .build()?;

        let resource = Resource::builder()
            // OTLP convention
            .with_attribute(KeyValue::new("service.name", service_name.to_owned()))
            .build();

        Ok(Some(
            SdkLoggerProvider::builder()
                .with_batch_exporter(exporter)
                .with_resource(resource)
                .build(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axiom_needs_token_and_dataset() {
        let opts = TelemetryOpts::try_parse_from([
            "telemetry",
            "--telemetry.axiom-dataset",
            "tkb",
            "--metrics.disable",
        ])
        .unwrap();

        assert!(opts.disable_metrics);
        assert!(opts.use_ansi);
        assert!(opts.build_axiom_provider("tkb").unwrap().is_none());
    }
}
