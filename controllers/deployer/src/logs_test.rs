//! Unit tests for the LogStreamer

#[cfg(test)]
mod tests {
    use crate::error::ExecutorError;
    use crate::logs::LogStreamer;
    use crate::readiness::ReadinessPoller;
    use crate::test_utils::*;
    use cluster_client::{ClusterError, MockCall, MockClusterClient};
    use runtime_spec::SpecError;
    use std::sync::Arc;
    use std::time::Duration;

    fn create_test_streamer(mock: &MockClusterClient) -> LogStreamer {
        let pods = ReadinessPoller::new(
            Arc::new(mock.clone()),
            TEST_NAMESPACE,
            Duration::from_millis(100),
            None,
        );
        LogStreamer::new(Arc::new(mock.clone()), TEST_NAMESPACE, pods)
    }

    #[tokio::test]
    async fn test_stream_logs_without_running_pod() {
        let mock = MockClusterClient::new();
        mock.add_pod(create_pending_pod("web", "web-0"));
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let result = streamer.stream_logs("web", &mut sink).await;

        assert!(matches!(result, Err(ExecutorError::NoRunningPod(ref name)) if name == "web"));
        assert!(result.unwrap_err().is_not_found());
        assert!(sink.is_empty());
        assert!(
            !mock
                .calls()
                .iter()
                .any(|c| matches!(c, MockCall::StreamLogs(_)))
        );
    }

    #[tokio::test]
    async fn test_stream_logs_copies_into_sink() {
        let mock = MockClusterClient::new();
        mock.add_pod(create_running_pod("web", "web-1"));
        mock.set_logs("web-1", &["starting nginx\n", "ready\n"]);
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let copied = streamer.stream_logs("web", &mut sink).await.unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), "starting nginx\nready\n");
        assert_eq!(copied, 21);
        assert!(mock.calls().contains(&MockCall::StreamLogs("web-1".to_string())));
    }

    #[tokio::test]
    async fn test_stream_logs_empty_output() {
        let mock = MockClusterClient::new();
        mock.add_pod(create_running_pod("web", "web-1"));
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let copied = streamer.stream_logs("web", &mut sink).await.unwrap();
        assert_eq!(copied, 0);
        assert!(sink.is_empty());
    }

    #[tokio::test]
    async fn test_stream_logs_broken_stream() {
        let mock = MockClusterClient::new();
        mock.add_pod(create_running_pod("web", "web-1"));
        mock.set_logs("web-1", &["partial\n"]);
        mock.fail_log_stream("connection reset by peer");
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let result = streamer.stream_logs("web", &mut sink).await;

        match result {
            Err(ExecutorError::Cluster(ClusterError::Stream(message))) => {
                assert!(message.contains("connection reset by peer"));
            }
            other => panic!("expected stream error, got {other:?}"),
        }
        // Output received before the failure is kept
        assert_eq!(sink, b"partial\n");
    }

    #[tokio::test]
    async fn test_stream_logs_lookup_failure() {
        let mock = MockClusterClient::new();
        mock.add_pod(create_running_pod("web", "web-1"));
        mock.fail_next_pod_list("apiserver unavailable");
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let result = streamer.stream_logs("web", &mut sink).await;
        assert!(matches!(
            result,
            Err(ExecutorError::Cluster(ClusterError::Api { code: 503, .. }))
        ));
    }

    #[tokio::test]
    async fn test_stream_logs_rejects_empty_name() {
        let mock = MockClusterClient::new();
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let result = streamer.stream_logs("", &mut sink).await;
        assert!(matches!(
            result,
            Err(ExecutorError::InvalidArgument(SpecError::EmptyName))
        ));
        assert!(mock.calls().is_empty());
    }

    #[tokio::test]
    async fn test_stream_logs_non_label_name_is_looked_up() {
        let mock = MockClusterClient::new();
        let streamer = create_test_streamer(&mock);

        let mut sink = Vec::new();
        let result = streamer.stream_logs("Not_A_Label", &mut sink).await;
        assert!(matches!(result, Err(ExecutorError::NoRunningPod(_))));
        assert_eq!(mock.pod_list_count(), 1);
    }
}
