mod common;

use std::sync::Arc;

use common::*;
use liftoff_core::launch::{DateBound, SortOrder};
use liftoff_core::{
    Action, ActionRequest, InfoKind, InfoRecord, NavigationContext, Reply, UpstreamId,
};

fn launches() -> Arc<FakeLaunches> {
    Arc::new(FakeLaunches::with_launches(vec![iridium(), secret()]))
}

#[tokio::test]
async fn fetch_launch_skips_by_offset() {
    let source = launches();
    let assistant = assistant(source.clone(), FakeSummaries::default());

    for offset in [0_i64, 3] {
        assistant.fetch_launch(offset).await.unwrap();
        let q = source.last_query().unwrap();
        assert_eq!(q.sort, SortOrder::Ascending);
        assert_eq!(q.skip, offset as u64);
    }
    for offset in [-1_i64, -4] {
        assistant.fetch_launch(offset).await.unwrap();
        let q = source.last_query().unwrap();
        assert_eq!(q.sort, SortOrder::Descending);
        assert!(matches!(q.bound, DateBound::End(_)));
        assert_eq!(q.skip, offset.unsigned_abs() - 1);
    }
}

#[tokio::test]
async fn empty_upstream_is_not_found() {
    let source = Arc::new(FakeLaunches::default());
    let assistant = assistant(source, FakeSummaries::default());

    let reply = assistant
        .dispatch(ActionRequest::new(Action::NextLaunch), None)
        .await
        .unwrap();
    assert!(reply.is_none());
}

#[tokio::test]
async fn launch_before_steps_back_from_stored_offset() {
    let source = launches();
    let assistant = assistant(source.clone(), FakeSummaries::default());

    // Context as emitted for the launch two after next
    let reply = assistant.launch_at(2, true).await.unwrap().unwrap();
    assert_eq!(reply.context.offset, 2);

    let before = assistant
        .dispatch(ActionRequest::new(Action::LaunchBefore), Some(&reply.context))
        .await
        .unwrap()
        .unwrap();

    let q = source.last_query().unwrap();
    assert_eq!(q.sort, SortOrder::Ascending);
    assert_eq!(q.skip, 1);
    match before {
        Reply::Launch(r) => {
            assert_eq!(r.context.offset, 1);
            assert!(r.speech.starts_with("Before that, the next SpaceX launch will be the"));
        }
        other => panic!("expected launch reply, got {other:?}"),
    }
}

#[tokio::test]
async fn launch_after_crosses_into_the_future() {
    let source = launches();
    let assistant = assistant(source.clone(), FakeSummaries::default());
    let past = assistant.launch_at(-1, false).await.unwrap().unwrap().context;
    assert_eq!(past.offset, -1);

    let reply = assistant
        .dispatch(ActionRequest::new(Action::LaunchAfter), Some(&past))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(source.last_query().unwrap().skip, 0);
    assert_eq!(reply.context().unwrap().offset, 0);
    assert!(reply.speech().starts_with("The next SpaceX launch will be the"));
}

#[tokio::test]
async fn navigation_without_context_is_a_no_op() {
    let source = launches();
    let assistant = assistant(source.clone(), FakeSummaries::default());

    for action in [Action::LaunchAfter, Action::LaunchBefore, Action::Info(InfoKind::Mission)] {
        let reply = assistant
            .dispatch(ActionRequest::new(action), None)
            .await
            .unwrap();
        assert!(reply.is_none(), "{action} should need context");
    }
    assert!(source.queries.lock().unwrap().is_empty());
    assert!(source.info_calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn info_resolves_ids_from_context() {
    let source = Arc::new(
        FakeLaunches::with_launches(vec![iridium()]).with_record(
            InfoKind::Pad,
            "87",
            InfoRecord {
                agency: Some("U.S. Air Force".into()),
                ..InfoRecord::named("SLC-4E")
            },
        ),
    );
    let assistant = assistant(source.clone(), FakeSummaries::default());
    let ctx = assistant.launch_at(0, true).await.unwrap().unwrap().context;

    let reply = assistant
        .dispatch(ActionRequest::new(Action::Info(InfoKind::Pad)), Some(&ctx))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(
        source.info_calls.lock().unwrap().as_slice(),
        &[(InfoKind::Pad, "87".to_string())]
    );
    assert_eq!(reply.speech(), "SLC-4E is a launch site operated by U.S. Air Force.");
    // Re-emitted with a fresh lifespan
    assert_eq!(reply.context().unwrap().launch_id, UpstreamId::from(1234));
    assert_eq!(reply.context().unwrap().lifespan, 5);
}

#[tokio::test]
async fn info_uses_wikipedia_summary_when_linked() {
    let source = Arc::new(FakeLaunches::default().with_record(
        InfoKind::Agency,
        "121",
        InfoRecord {
            wiki_url: Some("https://en.wikipedia.org/wiki/SpaceX".into()),
            ..InfoRecord::named("SpaceX")
        },
    ));
    let summaries = FakeSummaries::with(
        "SpaceX",
        "SpaceX is an American aerospace manufacturer.\nIt was founded in 2002.",
    );
    let assistant = assistant(source, summaries);
    let ctx = NavigationContext::for_launch(&iridium(), 0, 5);

    let short = assistant.info(InfoKind::Agency, &ctx, false).await.unwrap().unwrap();
    assert_eq!(short.speech, "SpaceX is an American aerospace manufacturer.");
    assert!(short.more_available);

    let more = assistant.info(InfoKind::Agency, &ctx, true).await.unwrap().unwrap();
    assert_eq!(more.speech, "It was founded in 2002.");
}

#[tokio::test]
async fn upcoming_count_defaults_and_clamps() {
    let source = launches();
    let assistant = assistant(source.clone(), FakeSummaries::default());

    assistant.upcoming(None).await.unwrap();
    assert_eq!(source.last_query().unwrap().limit, 5);

    assistant.upcoming(Some(50)).await.unwrap();
    assert_eq!(source.last_query().unwrap().limit, 10);

    let reply = assistant.upcoming(Some(0)).await.unwrap();
    assert_eq!(source.last_query().unwrap().limit, 1);
    assert_eq!(reply.count, 1);
}

#[tokio::test]
async fn upstream_failure_is_an_error() {
    let source = Arc::new(FakeLaunches {
        fail: true,
        ..Default::default()
    });
    let assistant = assistant(source, FakeSummaries::default());

    assert!(assistant
        .dispatch(ActionRequest::new(Action::UpcomingLaunches), None)
        .await
        .is_err());
}
