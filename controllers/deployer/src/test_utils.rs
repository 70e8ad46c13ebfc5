//! Test utilities for unit testing the executor components
//!
//! This module provides helpers for creating test data and setting up test scenarios.

use crate::config::ExecutorConfig;
use crate::executor::KubernetesExecutor;
use cluster_client::MockClusterClient;
use k8s_openapi::api::core::v1::{
    Container, ContainerState, ContainerStateRunning, ContainerStateWaiting, ContainerStatus, Pod,
    PodSpec, PodStatus,
};
use k8s_openapi::apimachinery::pkg::apis::meta::v1::ObjectMeta;
use runtime_spec::{RuntimeSpec, selector_labels};
use std::sync::Arc;
use std::time::Duration;

/// Namespace used by every test
pub const TEST_NAMESPACE: &str = "default";

/// Helper to create the nginx "web" spec used across tests
pub fn create_test_spec(ports: Vec<i32>) -> RuntimeSpec {
    RuntimeSpec::new("nginx", "web")
        .with_replicas(2)
        .with_ports(ports)
        .with_public_address(true)
}

fn create_test_pod(app: &str, pod_name: &str, state: ContainerState) -> Pod {
    Pod {
        metadata: ObjectMeta {
            name: Some(pod_name.to_string()),
            namespace: Some(TEST_NAMESPACE.to_string()),
            labels: Some(selector_labels(app)),
            ..Default::default()
        },
        spec: Some(PodSpec {
            containers: vec![Container {
                name: app.to_string(),
                image: Some("nginx".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        }),
        status: Some(PodStatus {
            container_statuses: Some(vec![ContainerStatus {
                name: app.to_string(),
                image: "nginx".to_string(),
                image_id: String::new(),
                ready: true,
                restart_count: 0,
                state: Some(state),
                ..Default::default()
            }]),
            ..Default::default()
        }),
    }
}

/// Helper to create a pod of `app` whose container is running
pub fn create_running_pod(app: &str, pod_name: &str) -> Pod {
    create_test_pod(
        app,
        pod_name,
        ContainerState {
            running: Some(ContainerStateRunning::default()),
            ..Default::default()
        },
    )
}

/// Helper to create a pod of `app` whose container is still being created
pub fn create_pending_pod(app: &str, pod_name: &str) -> Pod {
    create_test_pod(
        app,
        pod_name,
        ContainerState {
            waiting: Some(ContainerStateWaiting {
                reason: Some("ContainerCreating".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        },
    )
}

/// Helper to create test configuration with a short poll interval
pub fn create_test_config(ready_timeout: Option<Duration>) -> ExecutorConfig {
    ExecutorConfig {
        namespace: TEST_NAMESPACE.to_string(),
        poll_interval: Duration::from_millis(100),
        ready_timeout,
        ..Default::default()
    }
}

/// Helper to create an executor backed by `mock`
pub fn create_test_executor(mock: &MockClusterClient, ready_timeout: Option<Duration>) -> KubernetesExecutor {
    KubernetesExecutor::new(create_test_config(ready_timeout), Arc::new(mock.clone()))
}
