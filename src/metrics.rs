use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus exporter and register all application metrics.
/// Returns a `PrometheusHandle` whose `render()` method produces the
/// text/plain Prometheus scrape payload.
pub fn init_metrics() -> PrometheusHandle {
    let builder = PrometheusBuilder::new();
    let handle = builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // Pre-register counters so they appear even before the first increment.
    counter!("signups_total").absolute(0);
    counter!("deposits_created_total").absolute(0);
    counter!("deposits_approved_total").absolute(0);
    counter!("deposits_rejected_total").absolute(0);
    counter!("withdrawals_created_total").absolute(0);
    counter!("withdrawals_approved_total").absolute(0);
    counter!("withdrawals_rejected_total").absolute(0);
    counter!("investments_created_total").absolute(0);
    counter!("investments_matured_total").absolute(0);
    counter!("referral_commissions_total").absolute(0);
    counter!("referral_payouts_total").absolute(0);
    counter!("emails_sent_total").absolute(0);
    counter!("emails_failed_total").absolute(0);

    handle
}
