mod common;

use std::sync::Arc;

use common::*;
use liftoff_core::launch::SortOrder;
use liftoff_core::webhook::{self, WebhookRequest};
use liftoff_core::{InfoKind, InfoRecord, NavigationContext, UpstreamId, LAUNCH_CONTEXT};
use serde_json::{json, Value};

fn request(body: Value) -> WebhookRequest {
    serde_json::from_value(body).unwrap()
}

fn launch_context() -> Value {
    json!({
        "name": "launch",
        "lifespan": 3,
        "parameters": {
            "launch-id": 1234,
            "agency-id": 121,
            "rocket-id": 58,
            "mission-id": 600,
            "pad-location-id": 87,
            "offset": 0
        }
    })
}

mod envelope {
    use super::*;

    #[test]
    fn count_accepts_numbers_and_strings() {
        let req = request(json!({ "result": { "action": "upcomingLaunches", "parameters": { "count": "3" } } }));
        assert_eq!(req.result.count(), Some(3));
        let req = request(json!({ "result": { "action": "upcomingLaunches", "parameters": { "count": 4.0 } } }));
        assert_eq!(req.result.count(), Some(4));
        let req = request(json!({ "result": { "action": "upcomingLaunches" } }));
        assert_eq!(req.result.count(), None);
    }

    #[test]
    fn context_ids_survive_platform_reencoding() {
        // Platforms echo numbers back as floats or strings
        let req = request(json!({
            "result": {
                "action": "rocketInfo",
                "contexts": [
                    { "name": "generic", "parameters": {} },
                    {
                        "name": "Launch",
                        "lifespan": 4,
                        "parameters": {
                            "launch-id": "1234",
                            "rocket-id": 58.0,
                            "offset": "-2"
                        }
                    }
                ]
            }
        }));

        let ctx = NavigationContext::from_contexts(&req.result.contexts).unwrap();
        assert_eq!(ctx.launch_id.to_string(), "1234");
        assert_eq!(ctx.rocket_id, UpstreamId::from(58));
        assert!(ctx.mission_id.is_unknown());
        assert_eq!(ctx.offset, -2);
        assert_eq!(ctx.lifespan, 4);
    }

    #[test]
    fn context_parameters_use_hyphenated_keys() {
        let ctx = NavigationContext::for_launch(&iridium(), 2, 5);
        let entry = serde_json::to_value(ctx.to_entry()).unwrap();
        assert_eq!(
            entry,
            json!({
                "name": LAUNCH_CONTEXT,
                "lifespan": 5,
                "parameters": {
                    "launch-id": 1234,
                    "agency-id": 121,
                    "rocket-id": 58,
                    "mission-id": 600,
                    "pad-location-id": 87,
                    "offset": 2
                }
            })
        );
    }
}

mod handle {
    use super::*;

    #[tokio::test]
    async fn unknown_action_is_empty() {
        let source = Arc::new(FakeLaunches::with_launches(vec![iridium()]));
        let assistant = assistant(source.clone(), FakeSummaries::default());

        let res = webhook::handle(&assistant, &request(json!({ "result": { "action": "orderPizza" } })))
            .await
            .unwrap();
        assert!(res.is_none());
        assert!(source.queries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn mission_info_without_context_is_empty() {
        let source = Arc::new(FakeLaunches::with_launches(vec![iridium()]));
        let assistant = assistant(source.clone(), FakeSummaries::default());

        let res = webhook::handle(&assistant, &request(json!({ "result": { "action": "missionInfo" } })))
            .await
            .unwrap();
        assert!(res.is_none());
        assert!(source.info_calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn next_launch_renders_rich_messages() {
        let source = Arc::new(FakeLaunches::with_launches(vec![iridium()]));
        let assistant = assistant(source, FakeSummaries::default());

        let res = webhook::handle(&assistant, &request(json!({ "result": { "action": "nextLaunch" } })))
            .await
            .unwrap()
            .unwrap();

        assert!(res.speech.starts_with("The next SpaceX launch will be the Falcon 9 Full Thrust rocket"));
        assert_eq!(res.source, "com.jamiepitts.space-chatbot");
        assert_eq!(res.context_out.len(), 1);
        assert_eq!(res.context_out[0].name, "launch");
        assert_eq!(res.context_out[0].lifespan, 5);

        let kinds: Vec<u8> = res.messages.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![0, 1, 2, 4]);

        let body = serde_json::to_value(&res).unwrap();
        assert_eq!(body["messages"][1]["buttons"][0]["postback"], "https://www.youtube.com/watch?v=iridium");
        assert_eq!(body["messages"][2]["replies"].as_array().unwrap().len(), 4);
        assert_eq!(body["data"]["slack"]["text"], body["displayText"]);
        assert_eq!(body["data"]["facebook"]["quick_replies"][0]["content_type"], "text");
    }

    #[tokio::test]
    async fn info_offers_more_only_when_available() {
        let source = Arc::new(FakeLaunches::default().with_record(
            InfoKind::Rocket,
            "58",
            InfoRecord {
                wiki_url: Some("https://en.wikipedia.org/wiki/Falcon_9_Full_Thrust".into()),
                ..InfoRecord::named("Falcon 9 Full Thrust")
            },
        ));
        let summaries = FakeSummaries::with(
            "Falcon_9_Full_Thrust",
            "Falcon 9 Full Thrust is an upgraded Falcon 9.\nIt first flew in 2015.",
        );
        let assistant = assistant(source, summaries);

        let first = webhook::handle(
            &assistant,
            &request(json!({ "result": { "action": "rocketInfo", "contexts": [launch_context()] } })),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(first.speech, "Falcon 9 Full Thrust is an upgraded Falcon 9.");
        assert_eq!(first.context_out[0].lifespan, 5);
        let kinds: Vec<u8> = first.messages.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![0, 2, 4]);

        let more = webhook::handle(
            &assistant,
            &request(json!({ "result": { "action": "rocketInfoMore", "contexts": [launch_context()] } })),
        )
        .await
        .unwrap()
        .unwrap();
        assert_eq!(more.speech, "It first flew in 2015.");
        let kinds: Vec<u8> = more.messages.iter().map(|m| m.kind()).collect();
        assert_eq!(kinds, vec![0, 4]);
    }

    #[tokio::test]
    async fn upcoming_honours_count_parameter() {
        let source = Arc::new(FakeLaunches::with_launches(vec![iridium(), secret()]));
        let assistant = assistant(source.clone(), FakeSummaries::default());

        let res = webhook::handle(
            &assistant,
            &request(json!({ "result": { "action": "upcomingLaunches", "parameters": { "count": 2 } } })),
        )
        .await
        .unwrap()
        .unwrap();

        assert_eq!(source.last_query().unwrap().limit, 2);
        assert!(res.speech.starts_with("Here are the next 2 SpaceX launches."));
        assert!(res.context_out.is_empty());
    }

    #[tokio::test]
    async fn upstream_failure_propagates() {
        let source = Arc::new(FakeLaunches {
            fail: true,
            ..Default::default()
        });
        let assistant = assistant(source, FakeSummaries::default());

        let err = webhook::handle(&assistant, &request(json!({ "result": { "action": "nextLaunch" } })))
            .await
            .unwrap_err();
        assert!(matches!(err, liftoff_core::LiftoffError::Upstream(_)));
    }

    #[tokio::test]
    async fn context_out_feeds_the_next_turn() {
        let source = Arc::new(FakeLaunches::with_launches(vec![iridium()]));
        let assistant = assistant(source.clone(), FakeSummaries::default());

        let mut contexts = Value::Array(vec![]);
        for (action, skip) in [("nextLaunch", 0), ("launchAfter", 1), ("launchAfter", 2), ("launchBefore", 1)] {
            let res = webhook::handle(
                &assistant,
                &request(json!({ "result": { "action": action, "contexts": contexts } })),
            )
            .await
            .unwrap()
            .unwrap();

            let q = source.last_query().unwrap();
            assert_eq!(q.skip, skip, "{action}");
            assert_eq!(q.sort, SortOrder::Ascending);

            let body = serde_json::to_value(&res).unwrap();
            assert_eq!(body["contextOut"][0]["parameters"]["offset"], skip);
            contexts = body["contextOut"].clone();
        }
        assert_eq!(source.queries.lock().unwrap().len(), 4);
    }
}
