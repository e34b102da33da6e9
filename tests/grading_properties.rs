//! Properties that hold for every graded answer, exercised through the public API.

use std::sync::Arc;
use std::time::Duration;

use autograde::aggregate::{GradingMethod, GradingResult};
use autograde::constants::MAX_FALLBACK_CONFIDENCE;
use autograde::engine::{EngineConfig, GradingEngine};
use autograde::request::{GradingRequest, GradingRequestPayload, QuestionType};
use autograde::scoring::{KeywordBackend, MockOutcome, MockScoringBackend, TermVectorBackend};

fn request(
    student: &str,
    reference: Option<&str>,
    max_points: f64,
    question_type: QuestionType,
) -> GradingRequest {
    GradingRequest::new(
        "Explain the question.",
        student,
        reference.map(str::to_string),
        max_points,
        question_type,
    )
    .expect("valid request")
}

fn assert_in_range(result: &GradingResult, max_points: f64) {
    assert!(
        result.score >= 0.0 && result.score <= max_points,
        "score {} outside [0, {}]",
        result.score,
        max_points
    );
    assert!(
        (0.0..=1.0).contains(&result.confidence),
        "confidence {} outside [0, 1]",
        result.confidence
    );
    assert!(!result.feedback.trim().is_empty());
    assert_eq!(result.max_points, max_points);
}

#[tokio::test]
async fn test_score_always_within_bounds_whatever_the_backend_returns() {
    let raw_scores = [-3.0, 0.0, 2.5, 5.0, 5.01, 12.0, f64::NAN, f64::INFINITY, -0.0];

    for raw in raw_scores {
        let backend = Arc::new(MockScoringBackend::fixed(raw, "Looks reasonable."));
        let engine = GradingEngine::with_backend(&EngineConfig::default(), Some(backend));
        let req = request(
            "Something loosely related",
            Some("An entirely different reference answer"),
            5.0,
            QuestionType::ShortAnswer,
        );

        let result = engine.grade(&req).await;
        assert_in_range(&result, 5.0);
    }
}

#[tokio::test]
async fn test_out_of_range_backend_score_is_flagged() {
    let backend = Arc::new(MockScoringBackend::fixed(42.0, "Generous."));
    let engine = GradingEngine::with_backend(&EngineConfig::default(), Some(backend));
    let req = request("x y z", Some("a b c"), 10.0, QuestionType::Essay);

    let result = engine.grade(&req).await;
    assert_eq!(result.method, GradingMethod::FallbackHeuristic);
    assert_eq!(result.confidence, 0.0);
    assert!(result.score <= 10.0);
}

#[tokio::test]
async fn test_exact_answer_gets_full_points() {
    let backend = Arc::new(MockScoringBackend::fixed(0.0, "Should never be called."));
    let engine = GradingEngine::with_backend(&EngineConfig::default(), Some(backend.clone()));

    for max_points in [1.0, 2.5, 7.0, 100.0] {
        let req = request("Photosynthesis", Some("photosynthesis"), max_points, QuestionType::ShortAnswer);
        let result = engine.grade(&req).await;

        assert_eq!(result.score, max_points);
        assert_eq!(result.method, GradingMethod::ExactMatch);
        assert_eq!(result.confidence, 1.0);
    }
    assert_eq!(backend.calls(), 0);
}

#[tokio::test]
async fn test_case_and_whitespace_do_not_change_the_grade() {
    let engine = GradingEngine::with_backend(&EngineConfig::default(), None);
    let baseline = engine
        .grade(&request("Paris", Some("Paris"), 3.0, QuestionType::ShortAnswer))
        .await;

    for variant in ["  PARIS ", "paris", "Paris.", "\tparis\n"] {
        let result = engine
            .grade(&request(variant, Some("Paris"), 3.0, QuestionType::ShortAnswer))
            .await;
        assert_eq!(result.score, baseline.score, "variant {:?}", variant);
        assert_eq!(result.method, GradingMethod::ExactMatch);
    }
}

#[tokio::test]
async fn test_irrelevant_answer_scores_near_zero() {
    let engines = [
        GradingEngine::with_backend(&EngineConfig::default(), Some(Arc::new(KeywordBackend::new()))),
        GradingEngine::with_backend(&EngineConfig::default(), Some(Arc::new(TermVectorBackend::new()))),
        GradingEngine::with_backend(&EngineConfig::default(), None),
    ];
    let req = request(
        "Bananas grow in tropical climates",
        Some("Mitochondria produce cellular energy"),
        4.0,
        QuestionType::ShortAnswer,
    );

    for engine in &engines {
        let result = engine.grade(&req).await;
        assert_in_range(&result, 4.0);
        assert!(result.score <= 0.5, "irrelevant answer scored {}", result.score);
    }
}

#[tokio::test(start_paused = true)]
async fn test_total_outage_degrades_to_low_confidence_fallback() {
    let backend = Arc::new(MockScoringBackend::unavailable());
    let engine = GradingEngine::with_backend(&EngineConfig::default(), Some(backend.clone()));
    let req = request(
        "Water boils at one hundred degrees at sea level",
        Some("At sea level water boils at 100 degrees Celsius"),
        10.0,
        QuestionType::Essay,
    );

    let result = engine.grade(&req).await;

    assert_eq!(result.method, GradingMethod::FallbackHeuristic);
    assert!(result.confidence <= MAX_FALLBACK_CONFIDENCE);
    assert!(result.needs_review());
    assert_in_range(&result, 10.0);
    assert!(backend.calls() >= 1);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_backend_never_exceeds_budget() {
    let backend = Arc::new(MockScoringBackend::hanging());
    let config = EngineConfig::default();
    let budget = config.retry.overall_budget;
    let engine = GradingEngine::with_backend(&config, Some(backend));
    let req = request("Some answer", Some("A reference"), 2.0, QuestionType::ShortAnswer);

    let started = tokio::time::Instant::now();
    let result = engine.grade(&req).await;

    assert!(started.elapsed() <= budget + Duration::from_millis(10));
    assert_eq!(result.method, GradingMethod::FallbackHeuristic);
    assert_in_range(&result, 2.0);
}

#[tokio::test]
async fn test_grading_is_idempotent() {
    let engine = GradingEngine::with_backend(
        &EngineConfig::default(),
        Some(Arc::new(KeywordBackend::new())),
    );
    let req = request(
        "Plants turn sunlight into chemical energy",
        Some("Photosynthesis converts light energy into chemical energy"),
        6.0,
        QuestionType::Essay,
    );

    let first = engine.grade(&req).await;
    let second = engine.grade(&req).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_semantic_score_follows_max_points() {
    let backend = Arc::new(MockScoringBackend::scripted(
        [MockOutcome::score(1.0, "Half right."), MockOutcome::score(5.0, "Half right.")],
        MockOutcome::Rejected("unused".to_string()),
    ));
    let engine = GradingEngine::with_backend(&EngineConfig::default(), Some(backend));

    let small = engine
        .grade(&request("partial", Some("complete answer"), 2.0, QuestionType::Essay))
        .await;
    let large = engine
        .grade(&request("partial", Some("complete answer"), 10.0, QuestionType::Essay))
        .await;

    assert_eq!(small.method, GradingMethod::Semantic);
    assert_eq!(large.method, GradingMethod::Semantic);
    assert_eq!(small.fraction(), large.fraction());
}

#[tokio::test]
async fn test_essay_without_reference_is_graded() {
    let payload = GradingRequestPayload {
        question: Some("Why do we have seasons?".to_string()),
        student_answer: Some("Because the earth's axis is tilted relative to its orbit.".to_string()),
        correct_answer: None,
        max_points: Some(8.0),
        question_type: Some(QuestionType::Essay),
    };
    let engine = GradingEngine::with_backend(
        &EngineConfig::default(),
        Some(Arc::new(KeywordBackend::new())),
    );

    let result = engine.grade_payload(payload).await.expect("essay validates");
    assert_in_range(&result, 8.0);
    assert!(result.needs_review());
}

#[tokio::test]
async fn test_malformed_request_names_every_bad_field() {
    let engine = GradingEngine::with_backend(&EngineConfig::default(), None);
    let payload = GradingRequestPayload {
        question: Some("   ".to_string()),
        student_answer: None,
        correct_answer: None,
        max_points: Some(-1.0),
        question_type: Some(QuestionType::MultipleChoice),
    };

    let err = engine.grade_payload(payload).await.unwrap_err();
    let fields: Vec<&str> = err.fields.iter().map(|f| f.field.as_str()).collect();

    for expected in ["question", "studentAnswer", "correctAnswer", "maxPoints"] {
        assert!(fields.contains(&expected), "missing {} in {:?}", expected, fields);
    }
}
