//! Deployment derivation.

use crate::labels::selector_labels;
use crate::runtime::RuntimeSpec;
use k8s_openapi::api::apps::v1::{Deployment, DeploymentSpec};
use k8s_openapi::api::core::v1::{
    Container, ContainerPort, LocalObjectReference, PodSpec, PodTemplateSpec,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::{LabelSelector, ObjectMeta};

/// Builds the Deployment for `spec` in `namespace`.
///
/// One container named after the workload runs the image, with one container
/// port per declared port. `app=<name>` labels the Deployment and its pod
/// template and is the only selector. When `image_pull_secret` is set the pod
/// template references it.
#[must_use]
pub fn build_deployment(
    spec: &RuntimeSpec,
    namespace: &str,
    image_pull_secret: Option<&str>,
) -> Deployment {
    let labels = selector_labels(&spec.name);

    let ports = spec
        .ports
        .iter()
        .map(|&port| ContainerPort {
            container_port: port,
            ..Default::default()
        })
        .collect::<Vec<_>>();

    let container = Container {
        name: spec.name.clone(),
        image: Some(spec.image.clone()),
        ports: if ports.is_empty() { None } else { Some(ports) },
        ..Default::default()
    };

    let image_pull_secrets = image_pull_secret.map(|secret| {
        vec![LocalObjectReference {
            name: secret.to_string(),
        }]
    });

    Deployment {
        metadata: ObjectMeta {
            name: Some(spec.name.clone()),
            namespace: Some(namespace.to_string()),
            labels: Some(labels.clone()),
            ..Default::default()
        },
        spec: Some(DeploymentSpec {
            replicas: Some(spec.replicas),
            selector: LabelSelector {
                match_labels: Some(labels.clone()),
                ..Default::default()
            },
            template: PodTemplateSpec {
                metadata: Some(ObjectMeta {
                    labels: Some(labels),
                    ..Default::default()
                }),
                spec: Some(PodSpec {
                    containers: vec![container],
                    image_pull_secrets,
                    ..Default::default()
                }),
            },
            ..Default::default()
        }),
        status: None,
    }
}
