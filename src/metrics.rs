//! Engine observability.
//!
//! - `metrics` feature: OpenTelemetry counters recorded through the global
//!   meter provider. Installing an exporter is left to the host application.
//! - `tracing` feature: span helpers wrapping each engine call.

#[cfg(feature = "metrics")]
pub use otel::{EngineMetrics, METRICS};

#[cfg(feature = "metrics")]
mod otel {
    use once_cell::sync::Lazy;
    use opentelemetry::{global, metrics::Counter, KeyValue};

    pub static METRICS: Lazy<EngineMetrics> = Lazy::new(EngineMetrics::init);

    pub struct EngineMetrics {
        pub dosage_calculations_total: Counter<u64>,
        pub high_dose_warnings_total: Counter<u64>,
        pub pairing_requests_total: Counter<u64>,
    }

    impl EngineMetrics {
        pub fn init() -> Self {
            let meter = global::meter("cdes_fs");

            let dosage_calculations_total = meter
                .u64_counter("cdes_fs_dosage_calculations_total")
                .with_description("Recipe dosage calculations completed")
                .build();

            let high_dose_warnings_total = meter
                .u64_counter("cdes_fs_high_dose_warnings_total")
                .with_description("Dosage calculations that raised a high-dose warning")
                .build();

            let pairing_requests_total = meter
                .u64_counter("cdes_fs_pairing_requests_total")
                .with_description("Terpene pairing requests")
                .build();

            Self {
                dosage_calculations_total,
                high_dose_warnings_total,
                pairing_requests_total,
            }
        }

        pub fn record_dosage_calculation(&self, high_dose_warning: bool) {
            self.dosage_calculations_total
                .add(1, &[KeyValue::new("high_dose", high_dose_warning)]);
            if high_dose_warning {
                self.high_dose_warnings_total.add(1, &[]);
            }
        }

        pub fn record_pairing_request(&self) {
            self.pairing_requests_total.add(1, &[]);
        }
    }
}

#[cfg(feature = "tracing")]
pub mod tracing_helpers {
    use tracing::{debug_span, Span};

    /// Span for a recipe dosage calculation
    pub fn calculate_dosage_span(recipe: &str) -> Span {
        debug_span!("cdes_fs.calculate_dosage", recipe = %recipe)
    }

    /// Span for a pairing lookup on the profile of COA `coa_id`
    pub fn suggest_pairings_span(coa_id: &str) -> Span {
        debug_span!("cdes_fs.suggest_pairings", coa_id = %coa_id)
    }

}

#[cfg(all(test, feature = "metrics"))]
mod tests {
    use super::*;

    #[test]
    fn test_recording_with_noop_provider() {
        METRICS.record_dosage_calculation(true);
        METRICS.record_dosage_calculation(false);
        METRICS.record_pairing_request();
    }
}
