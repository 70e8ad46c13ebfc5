//! Mock ClusterClient for unit testing
//!
//! This module provides a mock implementation of ClusterClientTrait that can be used
//! in unit tests without requiring a running cluster.
//!
//! The mock keeps Deployments, Services and Pods in memory and records every
//! call. Tests can make lookups, pod listings or deletions fail, make pod
//! listings hang, delay the appearance of pods and serve canned log output.

use crate::cluster_trait::ClusterClientTrait;
use crate::error::ClusterError;
use crate::types::{LogOptions, LogStream};
use bytes::Bytes;
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// A call made against the mock, in order of arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    GetDeployment(String),
    CreateDeployment(String),
    ReplaceDeployment(String),
    DeleteDeployment(String),
    GetService(String),
    CreateService(String),
    DeleteService(String),
    ListPods(String),
    StreamLogs(String),
}

impl MockCall {
    /// Whether the call touched a Service.
    #[must_use]
    pub fn is_service_call(&self) -> bool {
        matches!(
            self,
            Self::GetService(_) | Self::CreateService(_) | Self::DeleteService(_)
        )
    }
}

type Key = (String, String);

/// Mock ClusterClient for testing
#[derive(Clone, Default)]
pub struct MockClusterClient {
    pub(crate) deployments: Arc<Mutex<BTreeMap<Key, Deployment>>>,
    pub(crate) services: Arc<Mutex<BTreeMap<Key, Service>>>,
    pub(crate) pods: Arc<Mutex<Vec<Pod>>>,
    // Pods that become visible after the given number of further list calls
    pub(crate) pending_pods: Arc<Mutex<Vec<(usize, Pod)>>>,
    pub(crate) pod_list_failures: Arc<Mutex<VecDeque<String>>>,
    pub(crate) pod_list_hangs: Arc<Mutex<bool>>,
    pub(crate) get_failures: Arc<Mutex<HashMap<&'static str, String>>>,
    pub(crate) delete_failures: Arc<Mutex<HashMap<&'static str, String>>>,
    pub(crate) logs: Arc<Mutex<HashMap<String, Vec<Bytes>>>>,
    pub(crate) log_stream_failure: Arc<Mutex<Option<String>>>,
    pub(crate) calls: Arc<Mutex<Vec<MockCall>>>,
    pub(crate) next_version: Arc<Mutex<u64>>,
}

impl MockClusterClient {
    /// Create an empty mock cluster
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a Deployment to the mock store (for test setup)
    pub fn add_deployment(&self, namespace: &str, deployment: Deployment) {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        self.deployments
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name), deployment);
    }

    /// Add a Service to the mock store (for test setup)
    pub fn add_service(&self, namespace: &str, service: Service) {
        let name = service.metadata.name.clone().unwrap_or_default();
        self.services
            .lock()
            .unwrap()
            .insert((namespace.to_string(), name), service);
    }

    /// Add a Pod visible to every subsequent list call
    pub fn add_pod(&self, pod: Pod) {
        self.pods.lock().unwrap().push(pod);
    }

    /// Add a Pod that only shows up after `list_calls` more pod listings
    pub fn add_pod_after(&self, pod: Pod, list_calls: usize) {
        self.pending_pods.lock().unwrap().push((list_calls, pod));
    }

    /// Make the next pod listing fail with an API error carrying `message`
    pub fn fail_next_pod_list(&self, message: impl Into<String>) {
        self.pod_list_failures
            .lock()
            .unwrap()
            .push_back(message.into());
    }

    /// Make every further pod listing hang without ever returning
    pub fn hang_pod_lists(&self) {
        *self.pod_list_hangs.lock().unwrap() = true;
    }

    /// Make the next lookup of `kind` ("Deployment" or "Service") fail with a 403
    pub fn fail_next_get(&self, kind: &'static str, message: impl Into<String>) {
        self.get_failures
            .lock()
            .unwrap()
            .insert(kind, message.into());
    }

    /// Make every deletion of `kind` ("Deployment" or "Service") fail with a 500
    pub fn fail_deletes_of(&self, kind: &'static str, message: impl Into<String>) {
        self.delete_failures
            .lock()
            .unwrap()
            .insert(kind, message.into());
    }

    /// Serve `chunks` as the log output of `pod`
    pub fn set_logs(&self, pod: &str, chunks: &[&str]) {
        let chunks = chunks
            .iter()
            .map(|c| Bytes::copy_from_slice(c.as_bytes()))
            .collect();
        self.logs.lock().unwrap().insert(pod.to_string(), chunks);
    }

    /// Make the log stream break with `message` after the canned chunks
    pub fn fail_log_stream(&self, message: impl Into<String>) {
        *self.log_stream_failure.lock().unwrap() = Some(message.into());
    }

    /// Stored Deployment, if any
    pub fn deployment(&self, namespace: &str, name: &str) -> Option<Deployment> {
        self.deployments
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Stored Service, if any
    pub fn service(&self, namespace: &str, name: &str) -> Option<Service> {
        self.services
            .lock()
            .unwrap()
            .get(&(namespace.to_string(), name.to_string()))
            .cloned()
    }

    /// Every call made so far
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of pod listings made so far
    pub fn pod_list_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| matches!(c, MockCall::ListPods(_)))
            .count()
    }

    fn record(&self, call: MockCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn next_version(&self) -> String {
        let mut version = self.next_version.lock().unwrap();
        *version += 1;
        version.to_string()
    }

    fn get_failure(&self, kind: &'static str) -> Option<ClusterError> {
        self.get_failures
            .lock()
            .unwrap()
            .remove(kind)
            .map(|message| ClusterError::Api { code: 403, message })
    }

    fn delete_failure(&self, kind: &'static str) -> Option<ClusterError> {
        self.delete_failures
            .lock()
            .unwrap()
            .get(kind)
            .map(|message| ClusterError::Api {
                code: 500,
                message: message.clone(),
            })
    }
}

/// Checks `labels` against an equality-based selector such as `app=web,tier=api`.
fn matches_selector(labels: Option<&BTreeMap<String, String>>, selector: &str) -> bool {
    selector
        .split(',')
        .filter(|term| !term.is_empty())
        .all(|term| match term.split_once('=') {
            Some((key, value)) => labels
                .and_then(|l| l.get(key.trim()))
                .is_some_and(|v| v == value.trim()),
            None => false,
        })
}

fn already_exists(kind: &str, name: &str) -> ClusterError {
    ClusterError::Api {
        code: 409,
        message: format!("{kind} \"{name}\" already exists"),
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for MockClusterClient {
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError> {
        self.record(MockCall::GetDeployment(name.to_string()));
        if let Some(err) = self.get_failure("Deployment") {
            return Err(err);
        }
        self.deployment(namespace, name)
            .ok_or_else(|| ClusterError::NotFound {
                kind: "Deployment",
                name: name.to_string(),
            })
    }

    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> Result<Deployment, ClusterError> {
        let name = deployment.metadata.name.clone().unwrap_or_default();
        self.record(MockCall::CreateDeployment(name.clone()));

        let key = (namespace.to_string(), name.clone());
        if self.deployments.lock().unwrap().contains_key(&key) {
            return Err(already_exists("deployments", &name));
        }

        let mut stored = deployment.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        stored.metadata.resource_version = Some(self.next_version());
        self.deployments.lock().unwrap().insert(key, stored.clone());
        Ok(stored)
    }

    async fn replace_deployment(&self, namespace: &str, name: &str, deployment: &Deployment) -> Result<Deployment, ClusterError> {
        self.record(MockCall::ReplaceDeployment(name.to_string()));

        let key = (namespace.to_string(), name.to_string());
        let current_version = match self.deployments.lock().unwrap().get(&key) {
            Some(existing) => existing.metadata.resource_version.clone(),
            None => {
                return Err(ClusterError::NotFound {
                    kind: "Deployment",
                    name: name.to_string(),
                });
            }
        };

        // Optimistic concurrency: a stale resourceVersion is a conflict
        if deployment.metadata.resource_version.is_some()
            && deployment.metadata.resource_version != current_version
        {
            return Err(ClusterError::Api {
                code: 409,
                message: format!("the object has been modified; deployments \"{name}\""),
            });
        }

        let mut stored = deployment.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        stored.metadata.resource_version = Some(self.next_version());
        self.deployments.lock().unwrap().insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete_deployment(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.record(MockCall::DeleteDeployment(name.to_string()));
        if let Some(err) = self.delete_failure("Deployment") {
            return Err(err);
        }

        self.deployments
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ClusterError::NotFound {
                kind: "Deployment",
                name: name.to_string(),
            })
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ClusterError> {
        self.record(MockCall::GetService(name.to_string()));
        if let Some(err) = self.get_failure("Service") {
            return Err(err);
        }
        self.service(namespace, name)
            .ok_or_else(|| ClusterError::NotFound {
                kind: "Service",
                name: name.to_string(),
            })
    }

    async fn create_service(&self, namespace: &str, service: &Service) -> Result<Service, ClusterError> {
        let name = service.metadata.name.clone().unwrap_or_default();
        self.record(MockCall::CreateService(name.clone()));

        let key = (namespace.to_string(), name.clone());
        if self.services.lock().unwrap().contains_key(&key) {
            return Err(already_exists("services", &name));
        }

        let mut stored = service.clone();
        stored.metadata.namespace = Some(namespace.to_string());
        stored.metadata.resource_version = Some(self.next_version());
        self.services.lock().unwrap().insert(key, stored.clone());
        Ok(stored)
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.record(MockCall::DeleteService(name.to_string()));
        if let Some(err) = self.delete_failure("Service") {
            return Err(err);
        }

        self.services
            .lock()
            .unwrap()
            .remove(&(namespace.to_string(), name.to_string()))
            .map(|_| ())
            .ok_or_else(|| ClusterError::NotFound {
                kind: "Service",
                name: name.to_string(),
            })
    }

    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>, ClusterError> {
        self.record(MockCall::ListPods(label_selector.to_string()));

        let hangs = *self.pod_list_hangs.lock().unwrap();
        if hangs {
            futures::future::pending::<()>().await;
        }

        // Pending pods count down on every listing, failed or not
        {
            let mut pending = self.pending_pods.lock().unwrap();
            let mut pods = self.pods.lock().unwrap();
            let mut still_pending = Vec::with_capacity(pending.len());
            for (remaining, pod) in pending.drain(..) {
                if remaining <= 1 {
                    pods.push(pod);
                } else {
                    still_pending.push((remaining - 1, pod));
                }
            }
            *pending = still_pending;
        }

        if let Some(message) = self.pod_list_failures.lock().unwrap().pop_front() {
            return Err(ClusterError::Api { code: 503, message });
        }

        Ok(self
            .pods
            .lock()
            .unwrap()
            .iter()
            .filter(|pod| pod.metadata.namespace.as_deref().unwrap_or("default") == namespace)
            .filter(|pod| matches_selector(pod.metadata.labels.as_ref(), label_selector))
            .cloned()
            .collect())
    }

    async fn stream_logs(&self, _namespace: &str, pod: &str, _options: &LogOptions) -> Result<LogStream, ClusterError> {
        self.record(MockCall::StreamLogs(pod.to_string()));

        let known = self
            .pods
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.metadata.name.as_deref() == Some(pod));
        if !known {
            return Err(ClusterError::NotFound {
                kind: "Pod",
                name: pod.to_string(),
            });
        }

        let mut items: Vec<Result<Bytes, std::io::Error>> = self
            .logs
            .lock()
            .unwrap()
            .get(pod)
            .cloned()
            .unwrap_or_default()
            .into_iter()
            .map(Ok)
            .collect();
        if let Some(message) = self.log_stream_failure.lock().unwrap().clone() {
            items.push(Err(std::io::Error::new(
                std::io::ErrorKind::ConnectionReset,
                message,
            )));
        }

        Ok(Box::pin(futures::stream::iter(items)))
    }
}
