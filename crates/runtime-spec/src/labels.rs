//! Label conventions shared by every object derived from a runtime spec.

use std::collections::BTreeMap;

/// Label key carrying the workload name.
pub const APP_LABEL: &str = "app";

/// Labels applied to the Deployment, its pod template and the Service.
///
/// The same map is the Deployment's `matchLabels` and the Service selector.
#[must_use]
pub fn selector_labels(name: &str) -> BTreeMap<String, String> {
    BTreeMap::from([(APP_LABEL.to_string(), name.to_string())])
}

/// Label selector string used to list the workload's pods (`app=<name>`).
#[must_use]
pub fn label_selector(name: &str) -> String {
    format!("{APP_LABEL}={name}")
}
