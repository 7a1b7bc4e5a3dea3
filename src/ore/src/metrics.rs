//! Shared Prometheus collector construction helpers.
//!
//! Individual crates own their own metric *structs*; this module only
//! centralizes the boilerplate of registering a counter/gauge with a
//! consistent `sc_` metric namespace, the way the teacher centralizes
//! metrics construction helpers in `mz_ore::metrics`.

use prometheus::{IntCounter, IntCounterVec, IntGauge, Opts, Registry};

/// Registers and returns an [`IntCounter`] named `sc_{name}`.
pub fn counter(registry: &Registry, name: &str, help: &str) -> IntCounter {
    let counter = IntCounter::with_opts(Opts::new(format!("sc_{name}"), help))
        .expect("metric name and help are static and well-formed");
    registry
        .register(Box::new(counter.clone()))
        .expect("metric is only registered once");
    counter
}

/// Registers and returns an [`IntCounterVec`] named `sc_{name}` with the
/// given label names.
pub fn counter_vec(
    registry: &Registry,
    name: &str,
    help: &str,
    label_names: &[&str],
) -> IntCounterVec {
    let counter = IntCounterVec::new(Opts::new(format!("sc_{name}"), help), label_names)
        .expect("metric name, help, and labels are static and well-formed");
    registry
        .register(Box::new(counter.clone()))
        .expect("metric is only registered once");
    counter
}

/// Registers and returns an [`IntGauge`] named `sc_{name}`.
pub fn gauge(registry: &Registry, name: &str, help: &str) -> IntGauge {
    let gauge = IntGauge::with_opts(Opts::new(format!("sc_{name}"), help))
        .expect("metric name and help are static and well-formed");
    registry
        .register(Box::new(gauge.clone()))
        .expect("metric is only registered once");
    gauge
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_is_registered_and_incrementable() {
        let registry = Registry::new();
        let c = counter(&registry, "widgets_total", "widgets processed");
        c.inc();
        c.inc_by(4);
        assert_eq!(c.get(), 5);
    }
}
