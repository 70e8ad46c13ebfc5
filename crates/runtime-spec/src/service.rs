//! Service derivation.

use crate::labels::selector_labels;
use crate::runtime::RuntimeSpec;
use k8s_openapi::api::core::v1::{Service, ServicePort, ServiceSpec};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use k8s_openapi::apimachinery::pkg::util::intstr::IntOrString;

/// Service type used when the workload asks for a public address.
pub const PUBLIC_SERVICE_TYPE: &str = "LoadBalancer";

/// Builds the Service for `spec` in `namespace`, or `None` when no ports are declared.
///
/// Each declared port becomes a TCP service port named by its index and
/// targeting the same container port. Without `public_address` the type is
/// left unset so the cluster assigns a cluster-internal address.
#[must_use]
pub fn build_service(spec: &RuntimeSpec, namespace: &str) -> Option<Service> {
    if !spec.exposes_ports() {
        return None;
    }

    let ports = spec
        .ports
        .iter()
        .enumerate()
        .map(|(index, &port)| ServicePort {
            name: Some(index.to_string()),
            port,
            target_port: Some(IntOrString::Int(port)),
            protocol: Some("TCP".to_string()),
            ..Default::default()
        })
        .collect();

    Some(Service {
        metadata: ObjectMeta {
            name: Some(spec.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(selector_labels(&spec.name)),
            ..Default::default()
        },
        spec: Some(ServiceSpec {
            ports: Some(ports),
            selector: Some(selector_labels(&spec.name)),
            type_: spec
                .public_address
                .then(|| PUBLIC_SERVICE_TYPE.to_string()),
            ..Default::default()
        }),
        status: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_service_none_without_ports() {
        let spec = RuntimeSpec::new("nginx", "web").with_public_address(true);
        assert!(build_service(&spec, "default").is_none());
    }

    #[test]
    fn test_build_service_public_web_scenario() {
        let spec = RuntimeSpec::new("nginx", "web")
            .with_replicas(2)
            .with_ports(vec![80])
            .with_public_address(true);
        let service = build_service(&spec, "default").unwrap();

        assert_eq!(service.metadata.name.as_deref(), Some("web"));
        assert_eq!(service.metadata.namespace.as_deref(), Some("default"));

        let sspec = service.spec.unwrap();
        assert_eq!(sspec.type_.as_deref(), Some("LoadBalancer"));
        assert_eq!(sspec.selector, Some(selector_labels("web")));

        let ports = sspec.ports.unwrap();
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].name.as_deref(), Some("0"));
        assert_eq!(ports[0].port, 80);
        assert_eq!(ports[0].target_port, Some(IntOrString::Int(80)));
        assert_eq!(ports[0].protocol.as_deref(), Some("TCP"));
    }

    #[test]
    fn test_build_service_internal_by_default() {
        let spec = RuntimeSpec::new("redis", "cache").with_ports(vec![6379]);
        let service = build_service(&spec, "default").unwrap();
        assert!(service.spec.unwrap().type_.is_none());
    }

    #[test]
    fn test_build_service_ports_named_by_index() {
        let spec = RuntimeSpec::new("app", "api").with_ports(vec![8080, 8443, 9090]);
        let ports = build_service(&spec, "default")
            .unwrap()
            .spec
            .unwrap()
            .ports
            .unwrap();

        let names: Vec<_> = ports.iter().filter_map(|p| p.name.as_deref()).collect();
        assert_eq!(names, vec!["0", "1", "2"]);
        let numbers: Vec<_> = ports.iter().map(|p| p.port).collect();
        assert_eq!(numbers, vec![8080, 8443, 9090]);
    }
}
