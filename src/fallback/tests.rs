use std::sync::Arc;
use std::time::Duration;

use serial_test::serial;
use tokio::time::Instant;

use super::*;
use crate::constants::{
    FALLBACK_CONFIDENCE_QUESTION_ONLY, FALLBACK_CONFIDENCE_WITH_REFERENCE, MAX_FALLBACK_CONFIDENCE,
};
use crate::request::{GradingRequest, QuestionType};
use crate::scoring::{
    DEFAULT_SEMANTIC_CONFIDENCE, MockOutcome, MockScoringBackend, SemanticScorer,
};

fn request(answer: &str, reference: Option<&str>, max_points: f64) -> GradingRequest {
    GradingRequest::new(
        "What do mitochondria produce for the cell?",
        answer,
        reference.map(String::from),
        max_points,
        QuestionType::Essay,
    )
    .unwrap()
}

fn sample() -> GradingRequest {
    request(
        "They make energy",
        Some("Mitochondria produce chemical energy"),
        10.0,
    )
}

fn controller(mock: &Arc<MockScoringBackend>, policy: RetryPolicy) -> FallbackController {
    FallbackController::new(Some(SemanticScorer::new(mock.clone())), policy)
}

fn assert_within(elapsed: Duration, expected: Duration) {
    assert!(
        elapsed >= expected && elapsed < expected + Duration::from_millis(10),
        "elapsed {:?}, expected about {:?}",
        elapsed,
        expected
    );
}

fn expect_fallback(outcome: ScoreOutcome) -> FallbackScore {
    match outcome {
        ScoreOutcome::Fallback(score) => score,
        other => panic!("expected fallback, got {:?}", other),
    }
}

#[test]
fn test_heuristic_irrelevant_answer_scores_zero() {
    let estimate = FallbackHeuristic::new().estimate(
        &request("Bananas are yellow", Some("Mitochondria produce chemical energy"), 10.0),
        FallbackReason::RetriesExhausted,
    );
    assert_eq!(estimate.raw_score, 0.0);
    assert_eq!(estimate.confidence, FALLBACK_CONFIDENCE_WITH_REFERENCE);
}

#[test]
fn test_heuristic_question_only_has_lower_confidence() {
    let estimate = FallbackHeuristic::new().estimate(
        &request("Mitochondria produce energy", None, 10.0),
        FallbackReason::NoBackend,
    );
    assert_eq!(estimate.confidence, FALLBACK_CONFIDENCE_QUESTION_ONLY);
    assert!(estimate.raw_score > 0.0);
    assert!(estimate.rationale.contains("the question"));
}

#[test]
fn test_heuristic_question_echo_earns_at_most_half() {
    let question = "What do mitochondria produce for the cell?";
    let estimate =
        FallbackHeuristic::new().estimate(&request(question, None, 10.0), FallbackReason::Rejected);

    assert_eq!(estimate.raw_score, 5.0);
    assert_eq!(estimate.confidence, FALLBACK_CONFIDENCE_QUESTION_ONLY);
}

#[test]
fn test_heuristic_scales_with_max_points() {
    let heuristic = FallbackHeuristic::new();
    let reference = Some("Mitochondria produce chemical energy");
    let ten = heuristic.estimate(
        &request("Mitochondria make energy", reference, 10.0),
        FallbackReason::Rejected,
    );
    let twenty = heuristic.estimate(
        &request("Mitochondria make energy", reference, 20.0),
        FallbackReason::Rejected,
    );
    assert_eq!(twenty.raw_score, ten.raw_score * 2.0);
    assert!(ten.confidence <= MAX_FALLBACK_CONFIDENCE);
}

#[tokio::test]
async fn test_no_backend_falls_back_immediately() {
    let controller = FallbackController::new(None, RetryPolicy::default());
    let score = expect_fallback(controller.score(&sample()).await);
    assert_eq!(score.reason, FallbackReason::NoBackend);
}

#[tokio::test]
async fn test_success_on_first_attempt() {
    let mock = Arc::new(MockScoringBackend::fixed(7.0, "Good answer."));
    let outcome = controller(&mock, RetryPolicy::default())
        .score(&sample())
        .await;

    match outcome {
        ScoreOutcome::Semantic {
            response,
            confidence,
            attempts,
        } => {
            assert_eq!(response.raw_score, 7.0);
            assert_eq!(confidence, DEFAULT_SEMANTIC_CONFIDENCE);
            assert_eq!(attempts, 1);
        }
        other => panic!("expected semantic, got {:?}", other),
    }
    assert_eq!(mock.calls(), 1);
}

#[tokio::test]
async fn test_rejected_is_not_retried() {
    let mock = Arc::new(MockScoringBackend::rejected());
    let score = expect_fallback(
        controller(&mock, RetryPolicy::default())
            .score(&sample())
            .await,
    );

    assert_eq!(score.reason, FallbackReason::Rejected);
    assert_eq!(mock.calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_retried_then_succeeds() {
    let mock = Arc::new(MockScoringBackend::scripted(
        vec![
            MockOutcome::Unavailable("503".into()),
            MockOutcome::Unavailable("503".into()),
        ],
        MockOutcome::score(6.0, "Recovered."),
    ));
    let start = Instant::now();
    let outcome = controller(&mock, RetryPolicy::default())
        .score(&sample())
        .await;

    assert!(matches!(outcome, ScoreOutcome::Semantic { attempts: 3, .. }));
    assert_eq!(mock.calls(), 3);
    // 100 ms + 200 ms of backoff
    assert_within(start.elapsed(), Duration::from_millis(300));
}

#[tokio::test(start_paused = true)]
async fn test_unavailable_exhausts_retries() {
    let mock = Arc::new(MockScoringBackend::unavailable());
    let score = expect_fallback(
        controller(&mock, RetryPolicy::default().with_max_retries(3))
            .score(&sample())
            .await,
    );

    assert_eq!(score.reason, FallbackReason::RetriesExhausted);
    assert_eq!(mock.calls(), 4);
    assert!(score.confidence <= MAX_FALLBACK_CONFIDENCE);
}

#[tokio::test(start_paused = true)]
async fn test_attempt_timeout_counts_as_unavailable() {
    let mock = Arc::new(MockScoringBackend::hanging());
    let policy = RetryPolicy::default().with_overall_budget(Duration::from_secs(60));
    let start = Instant::now();
    let score = expect_fallback(controller(&mock, policy).score(&sample()).await);

    assert_eq!(score.reason, FallbackReason::RetriesExhausted);
    assert_eq!(mock.calls(), 3);
    assert_within(start.elapsed(), Duration::from_millis(3 * 2_000 + 100 + 200));
}

#[tokio::test(start_paused = true)]
async fn test_overall_budget_cancels_in_flight_call() {
    let mock = Arc::new(MockScoringBackend::hanging());
    let start = Instant::now();
    let score = expect_fallback(
        controller(&mock, RetryPolicy::default())
            .score(&sample())
            .await,
    );

    assert_eq!(score.reason, FallbackReason::BudgetExhausted);
    assert_within(start.elapsed(), Duration::from_secs(5));
    assert_eq!(mock.calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_slow_backend_within_timeout_succeeds() {
    let mock = Arc::new(
        MockScoringBackend::fixed(4.0, "Fine.").with_latency(Duration::from_millis(1_500)),
    );
    let outcome = controller(&mock, RetryPolicy::default())
        .score(&sample())
        .await;
    assert!(!outcome.is_fallback());
}

#[test]
fn test_backoff_doubles_and_caps() {
    let policy = RetryPolicy::default()
        .with_backoff(Duration::from_millis(100), Duration::from_millis(350));
    assert_eq!(policy.backoff_for(0), Duration::from_millis(100));
    assert_eq!(policy.backoff_for(1), Duration::from_millis(200));
    assert_eq!(policy.backoff_for(2), Duration::from_millis(350));
    assert_eq!(policy.backoff_for(40), Duration::from_millis(350));
}

#[test]
fn test_retry_policy_validate() {
    assert!(RetryPolicy::default().validate().is_ok());
    assert!(RetryPolicy::no_retries().validate().is_ok());
    assert!(
        RetryPolicy::default()
            .with_attempt_timeout(Duration::ZERO)
            .validate()
            .is_err()
    );
    assert!(
        RetryPolicy::default()
            .with_backoff(Duration::from_secs(2), Duration::from_secs(1))
            .validate()
            .is_err()
    );
}

#[test]
#[serial]
fn test_retry_policy_from_env() {
    unsafe {
        std::env::set_var(RetryPolicy::ENV_ATTEMPT_TIMEOUT_MS, "750");
        std::env::set_var(RetryPolicy::ENV_MAX_RETRIES, "4");
        std::env::remove_var(RetryPolicy::ENV_BUDGET_MS);
    }

    let policy = RetryPolicy::from_env().unwrap();
    assert_eq!(policy.attempt_timeout, Duration::from_millis(750));
    assert_eq!(policy.max_retries, 4);
    assert_eq!(policy.overall_budget, RetryPolicy::default().overall_budget);

    unsafe {
        std::env::set_var(RetryPolicy::ENV_MAX_RETRIES, "-1");
    }
    assert!(RetryPolicy::from_env().is_err());

    unsafe {
        std::env::remove_var(RetryPolicy::ENV_ATTEMPT_TIMEOUT_MS);
        std::env::remove_var(RetryPolicy::ENV_MAX_RETRIES);
    }
}
