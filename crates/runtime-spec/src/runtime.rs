//! RuntimeSpec
//!
//! Desired deployment shape for a single containerized workload.

use crate::error::SpecError;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Longest name accepted as an RFC 1123 label.
const MAX_NAME_LEN: usize = 63;

/// Desired deployment shape: which image to run, under which name, how many
/// replicas, and which ports to expose.
///
/// YAML form:
///
/// ```yaml
/// image: nginx
/// name: web
/// replicas: 2
/// ports: [80]
/// publicAddress: true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSpec {
    /// Container image reference
    pub image: String,

    /// Workload name; becomes the Deployment, Service and container name
    pub name: String,

    /// Desired pod count
    #[serde(default = "default_replicas")]
    pub replicas: i32,

    /// Container ports, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<i32>,

    /// Expose the ports through a load balancer instead of a cluster-internal address
    #[serde(default)]
    pub public_address: bool,
}

fn default_replicas() -> i32 {
    1
}

impl RuntimeSpec {
    /// Creates a spec with one replica and no exposed ports.
    pub fn new(image: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            name: name.into(),
            replicas: default_replicas(),
            ports: Vec::new(),
            public_address: false,
        }
    }

    /// Sets the replica count.
    #[must_use]
    pub fn with_replicas(mut self, replicas: i32) -> Self {
        self.replicas = replicas;
        self
    }

    /// Sets the exposed ports.
    #[must_use]
    pub fn with_ports(mut self, ports: Vec<i32>) -> Self {
        self.ports = ports;
        self
    }

    /// Sets the public-address flag.
    #[must_use]
    pub fn with_public_address(mut self, public_address: bool) -> Self {
        self.public_address = public_address;
        self
    }

    /// Parses a spec from YAML. The result is not validated.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, SpecError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Reads and parses a spec file. The result is not validated.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SpecError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Whether a Service has to be reconciled for this spec.
    #[must_use]
    pub fn exposes_ports(&self) -> bool {
        !self.ports.is_empty()
    }

    /// Checks the invariants that must hold before any cluster call.
    pub fn validate(&self) -> Result<(), SpecError> {
        validate_name(&self.name)?;

        if self.image.trim().is_empty() {
            return Err(SpecError::EmptyImage);
        }

        if self.replicas < 0 {
            return Err(SpecError::NegativeReplicas(self.replicas));
        }

        let mut seen = HashSet::with_capacity(self.ports.len());
        for &port in &self.ports {
            if !(1..=65535).contains(&port) {
                return Err(SpecError::InvalidPort(port));
            }
            if !seen.insert(port) {
                return Err(SpecError::DuplicatePort(port));
            }
        }

        Ok(())
    }
}

/// Checks that a name referring to existing objects is present.
///
/// Lookups and deletions only need a name; the label rules of
/// [`validate_name`] apply when objects are created.
pub fn require_name(name: &str) -> Result<(), SpecError> {
    if name.is_empty() {
        return Err(SpecError::EmptyName);
    }
    Ok(())
}

/// Checks that `name` is usable as an object name, container name and label value.
pub fn validate_name(name: &str) -> Result<(), SpecError> {
    if name.is_empty() {
        return Err(SpecError::EmptyName);
    }

    let invalid = |reason| SpecError::InvalidName {
        name: name.to_string(),
        reason,
    };

    if name.len() > MAX_NAME_LEN {
        return Err(invalid("must be at most 63 characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            "must contain only lowercase alphanumeric characters or '-'",
        ));
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(invalid("must start and end with an alphanumeric character"));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_require_name() {
        assert!(matches!(require_name(""), Err(SpecError::EmptyName)));
        assert!(require_name("web").is_ok());
        // Only presence is checked, not the label rules
        assert!(require_name("Not_A_Label").is_ok());
    }

    #[test]
    fn test_new_defaults() {
        let spec = RuntimeSpec::new("nginx", "web");
        assert_eq!(spec.replicas, 1);
        assert!(spec.ports.is_empty());
        assert!(!spec.public_address);
        assert!(!spec.exposes_ports());
    }

    #[test]
    fn test_validate_accepts_web_scenario() {
        let spec = RuntimeSpec::new("nginx", "web")
            .with_replicas(2)
            .with_ports(vec![80])
            .with_public_address(true);
        assert!(spec.validate().is_ok());
        assert!(spec.exposes_ports());
    }

    #[test]
    fn test_validate_zero_replicas_allowed() {
        let spec = RuntimeSpec::new("nginx", "web").with_replicas(0);
        assert!(spec.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_name() {
        let spec = RuntimeSpec::new("nginx", "");
        assert!(matches!(spec.validate(), Err(SpecError::EmptyName)));
    }

    #[test]
    fn test_validate_empty_image() {
        let spec = RuntimeSpec::new("", "web");
        assert!(matches!(spec.validate(), Err(SpecError::EmptyImage)));

        let spec = RuntimeSpec::new("   ", "web");
        assert!(matches!(spec.validate(), Err(SpecError::EmptyImage)));
    }

    #[test]
    fn test_validate_name_checked_before_image() {
        // Both missing: the name is reported first
        let spec = RuntimeSpec::new("", "");
        assert!(matches!(spec.validate(), Err(SpecError::EmptyName)));
    }

    #[test]
    fn test_validate_invalid_names() {
        for name in ["Web", "web_app", "-web", "web-", "web.app"] {
            let spec = RuntimeSpec::new("nginx", name);
            assert!(
                matches!(spec.validate(), Err(SpecError::InvalidName { .. })),
                "expected {name} to be rejected"
            );
        }

        let long = "a".repeat(64);
        assert!(matches!(
            validate_name(&long),
            Err(SpecError::InvalidName { .. })
        ));
        assert!(validate_name(&"a".repeat(63)).is_ok());
    }

    #[test]
    fn test_validate_negative_replicas() {
        let spec = RuntimeSpec::new("nginx", "web").with_replicas(-1);
        assert!(matches!(spec.validate(), Err(SpecError::NegativeReplicas(-1))));
    }

    #[test]
    fn test_validate_ports() {
        let spec = RuntimeSpec::new("nginx", "web").with_ports(vec![0]);
        assert!(matches!(spec.validate(), Err(SpecError::InvalidPort(0))));

        let spec = RuntimeSpec::new("nginx", "web").with_ports(vec![65536]);
        assert!(matches!(spec.validate(), Err(SpecError::InvalidPort(65536))));

        let spec = RuntimeSpec::new("nginx", "web").with_ports(vec![80, 443, 80]);
        assert!(matches!(spec.validate(), Err(SpecError::DuplicatePort(80))));
    }

    #[test]
    fn test_from_yaml_camel_case() {
        let spec = RuntimeSpec::from_yaml_str(
            "image: nginx\nname: web\nreplicas: 2\nports: [80, 443]\npublicAddress: true\n",
        )
        .unwrap();
        assert_eq!(
            spec,
            RuntimeSpec::new("nginx", "web")
                .with_replicas(2)
                .with_ports(vec![80, 443])
                .with_public_address(true)
        );
    }

    #[test]
    fn test_from_yaml_defaults() {
        let spec = RuntimeSpec::from_yaml_str("image: nginx\nname: web\n").unwrap();
        assert_eq!(spec.replicas, 1);
        assert!(spec.ports.is_empty());
        assert!(!spec.public_address);
    }

    #[test]
    fn test_from_yaml_missing_image() {
        let result = RuntimeSpec::from_yaml_str("name: web\n");
        assert!(matches!(result, Err(SpecError::Parse(_))));
    }

    #[test]
    fn test_from_file_missing() {
        let result = RuntimeSpec::from_file("/nonexistent/runtime.yaml");
        assert!(matches!(result, Err(SpecError::Io(_))));
    }
}
