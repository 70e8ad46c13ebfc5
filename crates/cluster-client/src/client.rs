//! Kubernetes API client
//!
//! Implements [`ClusterClientTrait`] on top of `kube`, one `Api` handle per
//! call scoped to the requested namespace.

use crate::cluster_trait::ClusterClientTrait;
use crate::error::ClusterError;
use crate::types::{ClientConfig, LogOptions, LogStream};
use k8s_openapi::api::apps::v1::Deployment;
use k8s_openapi::api::core::v1::{Pod, Service};
use kube::api::{Api, DeleteParams, ListParams, LogParams, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use tokio_util::compat::FuturesAsyncReadCompatExt;
use tracing::debug;

/// Production cluster client backed by `kube`.
pub struct KubeClusterClient {
    client: Client,
}

impl KubeClusterClient {
    /// Connect to the cluster described by `config`.
    ///
    /// An explicit kubeconfig path is read directly. Otherwise the
    /// configuration is inferred (in-cluster service account, `KUBECONFIG`,
    /// `~/.kube/config`); a context, when given, selects the kubeconfig entry.
    pub async fn connect(config: &ClientConfig) -> Result<Self, ClusterError> {
        let options = KubeConfigOptions {
            context: config.context.clone(),
            ..Default::default()
        };

        let kube_config = match (&config.kubeconfig, &config.context) {
            (Some(path), _) => {
                debug!("Loading kubeconfig from {}", path.display());
                let kubeconfig = Kubeconfig::read_from(path)
                    .map_err(|e| ClusterError::Config(format!("{}: {}", path.display(), e)))?;
                Config::from_custom_kubeconfig(kubeconfig, &options)
                    .await
                    .map_err(|e| ClusterError::Config(e.to_string()))?
            }
            (None, Some(context)) => {
                debug!("Loading kubeconfig context {}", context);
                Config::from_kubeconfig(&options)
                    .await
                    .map_err(|e| ClusterError::Config(e.to_string()))?
            }
            (None, None) => Config::infer()
                .await
                .map_err(|e| ClusterError::Config(e.to_string()))?,
        };

        let client = Client::try_from(kube_config)?;
        debug!("Kubernetes client initialized");
        Ok(Self { client })
    }

    /// Wrap an already constructed `kube` client.
    #[must_use]
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn deployments(&self, namespace: &str) -> Api<Deployment> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn services(&self, namespace: &str) -> Api<Service> {
        Api::namespaced(self.client.clone(), namespace)
    }

    fn pods(&self, namespace: &str) -> Api<Pod> {
        Api::namespaced(self.client.clone(), namespace)
    }
}

#[async_trait::async_trait]
impl ClusterClientTrait for KubeClusterClient {
    async fn get_deployment(&self, namespace: &str, name: &str) -> Result<Deployment, ClusterError> {
        self.deployments(namespace)
            .get(name)
            .await
            .map_err(|e| ClusterError::from_kube(e, "Deployment", name))
    }

    async fn create_deployment(&self, namespace: &str, deployment: &Deployment) -> Result<Deployment, ClusterError> {
        let name = deployment.metadata.name.as_deref().unwrap_or_default();
        self.deployments(namespace)
            .create(&PostParams::default(), deployment)
            .await
            .map_err(|e| ClusterError::from_kube(e, "Deployment", name))
    }

    async fn replace_deployment(&self, namespace: &str, name: &str, deployment: &Deployment) -> Result<Deployment, ClusterError> {
        self.deployments(namespace)
            .replace(name, &PostParams::default(), deployment)
            .await
            .map_err(|e| ClusterError::from_kube(e, "Deployment", name))
    }

    async fn delete_deployment(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        // Background propagation removes the ReplicaSets and pods as well
        self.deployments(namespace)
            .delete(name, &DeleteParams::background())
            .await
            .map(|_| ())
            .map_err(|e| ClusterError::from_kube(e, "Deployment", name))
    }

    async fn get_service(&self, namespace: &str, name: &str) -> Result<Service, ClusterError> {
        self.services(namespace)
            .get(name)
            .await
            .map_err(|e| ClusterError::from_kube(e, "Service", name))
    }

    async fn create_service(&self, namespace: &str, service: &Service) -> Result<Service, ClusterError> {
        let name = service.metadata.name.as_deref().unwrap_or_default();
        self.services(namespace)
            .create(&PostParams::default(), service)
            .await
            .map_err(|e| ClusterError::from_kube(e, "Service", name))
    }

    async fn delete_service(&self, namespace: &str, name: &str) -> Result<(), ClusterError> {
        self.services(namespace)
            .delete(name, &DeleteParams::default())
            .await
            .map(|_| ())
            .map_err(|e| ClusterError::from_kube(e, "Service", name))
    }

    async fn list_pods(&self, namespace: &str, label_selector: &str) -> Result<Vec<Pod>, ClusterError> {
        let lp = ListParams::default().labels(label_selector);
        let pods = self
            .pods(namespace)
            .list(&lp)
            .await
            .map_err(|e| ClusterError::from_kube(e, "Pod", label_selector))?;
        Ok(pods.items)
    }

    async fn stream_logs(&self, namespace: &str, pod: &str, options: &LogOptions) -> Result<LogStream, ClusterError> {
        let lp = LogParams {
            container: options.container.clone(),
            follow: options.follow,
            ..Default::default()
        };

        let stream = self
            .pods(namespace)
            .log_stream(pod, &lp)
            .await
            .map_err(|e| match ClusterError::from_kube(e, "Pod", pod) {
                not_found @ ClusterError::NotFound { .. } => not_found,
                other => ClusterError::Stream(other.to_string()),
            })?;

        Ok(Box::pin(tokio_util::io::ReaderStream::new(stream.compat())))
    }
}
