//! Runtime Descriptor
//!
//! Describes the desired shape of a containerized workload and derives the
//! Kubernetes objects that realize it.
//!
//! # Example
//!
//! ```
//! use runtime_spec::{RuntimeSpec, build_deployment, build_service};
//!
//! let spec = RuntimeSpec::new("nginx", "web")
//!     .with_replicas(2)
//!     .with_ports(vec![80])
//!     .with_public_address(true);
//! spec.validate().unwrap();
//!
//! let deployment = build_deployment(&spec, "default", None);
//! assert_eq!(deployment.metadata.name.as_deref(), Some("web"));
//!
//! // A Service only exists when ports are declared
//! assert!(build_service(&spec, "default").is_some());
//! ```

pub mod deployment;
pub mod error;
pub mod labels;
pub mod runtime;
pub mod service;

pub use deployment::build_deployment;
pub use error::SpecError;
pub use labels::{APP_LABEL, label_selector, selector_labels};
pub use runtime::{RuntimeSpec, require_name, validate_name};
pub use service::build_service;
