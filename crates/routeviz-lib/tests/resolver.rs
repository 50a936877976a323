mod common;

use std::sync::Arc;

use routeviz_lib::{Error, ProviderError, ProviderKind, ProviderResolver, RoutePreference};

use common::{
    ors_body, resolver, FakeFallback, FakePrimary, Reply, CONNAUGHT_PLACE, DELHI,
};

#[tokio::test]
async fn primary_answers_both_preferences() {
    let primary = FakePrimary::routes(5230.0, 4980.0);
    let fallback = FakeFallback::route(5100.0);
    let resolver = resolver(primary.clone(), fallback.clone());

    let pair = resolver
        .resolve_pair(DELHI, CONNAUGHT_PLACE)
        .await
        .expect("primary succeeds");

    assert_eq!(pair.source, ProviderKind::Primary);
    assert_eq!(pair.fastest.summary.distance_meters, 5230.0);
    assert_eq!(pair.shortest.summary.distance_meters, 4980.0);
    assert!(!Arc::ptr_eq(&pair.fastest, &pair.shortest));
    assert_eq!(primary.call_count(), 2);
    assert_eq!(fallback.call_count(), 0);
}

#[tokio::test]
async fn one_primary_failure_falls_back_once_for_both() {
    let primary = FakePrimary::new(Reply::Route(ors_body(5230.0, 600.0, 4)), Reply::Status(502));
    let fallback = FakeFallback::route(5100.0);
    let resolver = resolver(primary.clone(), fallback.clone());

    let pair = resolver
        .resolve_pair(DELHI, CONNAUGHT_PLACE)
        .await
        .expect("fallback succeeds");

    assert_eq!(pair.source, ProviderKind::Fallback);
    assert!(Arc::ptr_eq(&pair.fastest, &pair.shortest));
    assert_eq!(pair.fastest.summary.distance_meters, 5100.0);
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn single_resolve_swallows_primary_error() {
    let primary = FakePrimary::new(Reply::MissingKey, Reply::MissingKey);
    let resolver = resolver(primary, FakeFallback::route(4200.0));

    let resolved = resolver
        .resolve(DELHI, CONNAUGHT_PLACE, RoutePreference::Shortest)
        .await
        .expect("fallback succeeds");

    assert_eq!(resolved.source, ProviderKind::Fallback);
    assert_eq!(resolved.payload.summary.distance_meters, 4200.0);
    let steps: Vec<&str> = resolved
        .payload
        .steps
        .iter()
        .map(|step| step.instruction.as_str())
        .collect();
    assert_eq!(steps, vec!["Janpath", "arrive"]);
}

#[tokio::test]
async fn malformed_primary_payload_triggers_fallback() {
    let empty = Reply::Route(serde_json::json!({ "type": "FeatureCollection", "features": [] }));
    let primary = FakePrimary::new(empty.clone(), empty);
    let fallback = FakeFallback::route(4700.0);
    let resolver = resolver(primary, fallback.clone());

    let pair = resolver
        .resolve_pair(DELHI, CONNAUGHT_PLACE)
        .await
        .expect("fallback succeeds");
    assert_eq!(pair.source, ProviderKind::Fallback);
    assert_eq!(fallback.call_count(), 1);
}

#[tokio::test]
async fn both_providers_failing_reports_both_errors() {
    let resolver = resolver(FakePrimary::failing(503), FakeFallback::new(Reply::Status(500)));

    let err = resolver
        .resolve_pair(DELHI, CONNAUGHT_PLACE)
        .await
        .expect_err("both fail");

    match err {
        Error::ProviderFailure { primary, fallback } => {
            assert!(matches!(primary, ProviderError::Status { status: 503, .. }));
            assert!(matches!(fallback, ProviderError::Status { status: 500, .. }));
            assert_eq!(fallback.provider(), "fake-fallback");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn missing_fallback_is_reported_separately() {
    let resolver: ProviderResolver<FakePrimary, FakeFallback> =
        ProviderResolver::primary_only(FakePrimary::new(Reply::MissingKey, Reply::MissingKey));
    assert!(!resolver.has_fallback());

    let err = resolver
        .resolve(DELHI, CONNAUGHT_PLACE, RoutePreference::Fastest)
        .await
        .expect_err("no fallback");

    assert!(matches!(
        err,
        Error::FallbackUnavailable {
            primary: ProviderError::MissingCredential { .. }
        }
    ));
}
