// Whole invocations: event in, report out, with mocked auth and ingestion.

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use httpmock::Method::POST;
    use httpmock::{Mock, MockServer};
    use serde_json::{json, Value};

    use crate::config::settings::ServiceConfig;
    use crate::handler::{Handler, Outcome};
    use crate::sinks::ScoreSink;
    use crate::sources::ClientCredentialsSource;
    use crate::tests::common::{
        build_reqwest_client, mock_token_endpoint, sample_score, service_config, token_manager, FixedStats,
    };

    const SCORES_PATH: &str = "/security-service/v2/sfid-1/ossf-scores";

    fn event() -> Value {
        json!({
            "project_id": "p-1",
            "project_sfid": "sfid-1",
            "repository_id": "435f5013-4406-4fcc-954c-d21a6a9f289b",
            "repository": "github.com/communitybridge/easycla",
            "github_auth_token": "gh-token"
        })
    }

    fn handler(config: ServiceConfig, stats: FixedStats) -> Handler<ClientCredentialsSource, FixedStats> {
        let tokens = token_manager(config.auth.clone());
        let sink = ScoreSink::new(build_reqwest_client(), &config.settings);
        Handler::new(Arc::new(config), tokens, stats, sink)
    }

    async fn mock_ingest(server: &MockServer) -> Mock<'_> {
        server
            .mock_async(|when, then| {
                when.method(POST).path(SCORES_PATH);
                then.status(200).json_body(json!({"status": "ok"}));
            })
            .await
    }

    #[tokio::test]
    async fn scores_are_delivered() {
        let auth_server = MockServer::start_async().await;
        let ingest_server = MockServer::start_async().await;
        mock_token_endpoint(&auth_server, "tok_abc123", 3600).await;
        let ingest_mock = mock_ingest(&ingest_server).await;

        let handler = handler(
            service_config("staging", &auth_server, &ingest_server),
            FixedStats(Ok(sample_score())),
        );
        let report = handler.handle(&event()).await.unwrap();

        assert_eq!(report.stage, "staging");
        assert_eq!(report.project_sfid, "sfid-1");
        assert_eq!(
            report.outcome,
            Outcome::Delivered { http_status: 200, criticality_score: 0.41234 }
        );
        ingest_mock.assert_calls_async(1).await;
    }

    #[tokio::test]
    async fn token_is_reused_across_invocations() {
        let auth_server = MockServer::start_async().await;
        let ingest_server = MockServer::start_async().await;
        let token_mock = mock_token_endpoint(&auth_server, "tok_shared", 3600).await;
        let ingest_mock = mock_ingest(&ingest_server).await;

        let handler = handler(
            service_config("dev", &auth_server, &ingest_server),
            FixedStats(Ok(sample_score())),
        );
        for _ in 0..3 {
            handler.handle(&event()).await.unwrap();
        }

        token_mock.assert_calls_async(1).await;
        ingest_mock.assert_calls_async(3).await;
        assert_eq!(handler.tokens().cached().await.unwrap().value, "tok_shared");
    }

    #[tokio::test]
    async fn incomplete_event_is_rejected_without_network() {
        let auth_server = MockServer::start_async().await;
        let ingest_server = MockServer::start_async().await;
        let token_mock = mock_token_endpoint(&auth_server, "tok_unused", 3600).await;
        let ingest_mock = mock_ingest(&ingest_server).await;

        let handler = handler(
            service_config("dev", &auth_server, &ingest_server),
            FixedStats(Ok(sample_score())),
        );
        let mut incomplete = event();
        incomplete.as_object_mut().unwrap().remove("github_auth_token");

        let err = handler.handle(&incomplete).await.unwrap_err();
        assert_eq!(err.missing, vec!["github_auth_token from event data".to_owned()]);
        token_mock.assert_calls_async(0).await;
        ingest_mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn stats_failure_finishes_gracefully() {
        let auth_server = MockServer::start_async().await;
        let ingest_server = MockServer::start_async().await;
        let token_mock = mock_token_endpoint(&auth_server, "tok_unused", 3600).await;
        let ingest_mock = mock_ingest(&ingest_server).await;

        let handler = handler(
            service_config("dev", &auth_server, &ingest_server),
            FixedStats(Err("rate limited".to_owned())),
        );
        let report = handler.handle(&event()).await.unwrap();

        assert!(matches!(report.outcome, Outcome::StatsFailed { .. }));
        token_mock.assert_calls_async(0).await;
        ingest_mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn unknown_stage_reports_delivery_failure() {
        let auth_server = MockServer::start_async().await;
        let ingest_server = MockServer::start_async().await;
        let ingest_mock = mock_ingest(&ingest_server).await;

        let handler = handler(
            service_config("qa", &auth_server, &ingest_server),
            FixedStats(Ok(sample_score())),
        );
        let report = handler.handle(&event()).await.unwrap();

        match report.outcome {
            Outcome::DeliveryFailed { reason } => assert!(reason.contains("invalid stage value qa")),
            other => panic!("unexpected outcome {:?}", other),
        }
        ingest_mock.assert_calls_async(0).await;
    }

    #[tokio::test]
    async fn json_encoded_body_is_unwrapped() {
        let auth_server = MockServer::start_async().await;
        let ingest_server = MockServer::start_async().await;
        mock_token_endpoint(&auth_server, "tok_body", 3600).await;
        let ingest_mock = mock_ingest(&ingest_server).await;

        let handler = handler(
            service_config("prod", &auth_server, &ingest_server),
            FixedStats(Ok(sample_score())),
        );
        let wrapped = json!({ "body": event().to_string() });
        let report = handler.handle(&wrapped).await.unwrap();

        assert_eq!(report.repository, "github.com/communitybridge/easycla");
        assert!(matches!(report.outcome, Outcome::Delivered { .. }));
        ingest_mock.assert_calls_async(1).await;
    }

    #[test]
    fn report_serializes_with_status_tag() {
        let report = crate::handler::InvocationReport {
            stage: "dev".to_owned(),
            repository: "github.com/a/b".to_owned(),
            project_sfid: "s".to_owned(),
            outcome: Outcome::StatsFailed { reason: "boom".to_owned() },
            duration_ms: 12,
        };
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["outcome"]["status"], "stats_failed");
        assert_eq!(value["outcome"]["reason"], "boom");
    }
}
