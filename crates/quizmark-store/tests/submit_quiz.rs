//! End-to-end grading scenarios against the in-memory store.
//!
//! Fixture quiz 1: question 1 is worth 10 points (answer "4"), question 2
//! is worth 5 points (answer "true").

use std::path::Path;
use std::sync::Arc;

use quizmark_core::catalog::parse_catalog_str;
use quizmark_core::grader::Outcome;
use quizmark_core::model::{LearnerId, QuestionId, QuizId};
use quizmark_core::traits::SubmissionRecorder;
use quizmark_core::{AnswerSheet, GradingError, Resource, StorageError, SubmissionService};
use quizmark_store::{InMemoryStore, JsonFileStore};

const FIXTURE: &str = r#"
[[learners]]
id = 1
name = "Ada"

[[learners]]
id = 2
name = "Grace"

[[quizzes]]
id = 1
lesson_id = 100
title = "Fixture"

[[quizzes.questions]]
id = 1
text = "What is 2 + 2?"
kind = "multiple_choice"
options = ["3", "4", "5"]
correct_answer = "4"
points = 10

[[quizzes.questions]]
id = 2
text = "The sky is blue."
kind = "true_false"
options = ["true", "false"]
correct_answer = "true"
points = 5
"#;

fn setup() -> (Arc<InMemoryStore>, SubmissionService) {
    let catalog = parse_catalog_str(FIXTURE, Path::new("fixture.toml")).unwrap();
    let store = Arc::new(InMemoryStore::from_catalog(&catalog).unwrap());
    let service = SubmissionService::from_store(Arc::clone(&store));
    (store, service)
}

fn answers(json: &str) -> AnswerSheet {
    AnswerSheet::from_json_str(json).unwrap()
}

#[tokio::test]
async fn scenario_a_all_correct() {
    let (_, service) = setup();
    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), answers(r#"{"1": "4", "2": "true"}"#))
        .await
        .unwrap();
    assert_eq!(submission.score, Some(15));
    assert_eq!(submission.quiz_id, QuizId(1));
    assert_eq!(submission.learner_id, LearnerId(1));
}

#[tokio::test]
async fn scenario_b_one_wrong() {
    let (_, service) = setup();
    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), answers(r#"{"1": "4", "2": "false"}"#))
        .await
        .unwrap();
    assert_eq!(submission.score, Some(10));
}

#[tokio::test]
async fn scenario_c_empty_mapping() {
    let (_, service) = setup();
    let graded = service
        .submit_quiz_detailed(QuizId(1), LearnerId(1), AnswerSheet::new())
        .await
        .unwrap();
    assert_eq!(graded.submission.score, Some(0));
    assert!(graded
        .breakdown
        .outcomes
        .iter()
        .all(|o| o.outcome == Outcome::Unanswered));
}

#[tokio::test]
async fn scenario_d_extra_key_is_kept() {
    let (store, service) = setup();
    let input = answers(r#"{"1": "4", "2": "true", "9999": "extra"}"#);
    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), input.clone())
        .await
        .unwrap();
    assert_eq!(submission.score, Some(15));
    assert_eq!(submission.answers.get(QuestionId(9999)), Some("extra"));

    let stored = store.submissions_for_quiz(QuizId(1)).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].answers, input);
}

#[tokio::test]
async fn scenario_e_questions_deleted() {
    let (store, service) = setup();
    assert_eq!(store.clear_questions(QuizId(1)).await, 2);
    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), answers(r#"{"1": "4", "2": "true"}"#))
        .await
        .unwrap();
    assert_eq!(submission.score, Some(0));
}

#[tokio::test]
async fn no_case_folding_or_trimming() {
    let (_, service) = setup();
    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), answers(r#"{"1": " 4", "2": "TRUE"}"#))
        .await
        .unwrap();
    assert_eq!(submission.score, Some(0));
}

#[tokio::test]
async fn missing_quiz_or_learner_creates_nothing() {
    let (store, service) = setup();

    let err = service
        .submit_quiz(QuizId(2), LearnerId(1), AnswerSheet::new())
        .await
        .unwrap_err();
    assert!(matches!(err, GradingError::NotFound(Resource::Quiz(QuizId(2)))));

    let err = service
        .submit_quiz(QuizId(1), LearnerId(3), AnswerSheet::new())
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        GradingError::NotFound(Resource::Learner(LearnerId(3)))
    ));

    assert_eq!(store.submission_count().await, 0);
}

#[tokio::test]
async fn malformed_json_answers_create_nothing() {
    let (store, service) = setup();
    let err = service
        .submit_quiz_json(
            QuizId(1),
            LearnerId(1),
            &serde_json::json!({"1": "4", "2": true}),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, GradingError::Validation(_)));
    assert_eq!(store.submission_count().await, 0);
}

#[tokio::test]
async fn concurrent_submissions_are_independent() {
    let (store, service) = setup();

    let attempts = (0..20).map(|i| {
        let service = service.clone();
        let learner = LearnerId(1 + i % 2);
        let sheet = if i % 2 == 0 {
            answers(r#"{"1": "4", "2": "true"}"#)
        } else {
            answers(r#"{"1": "4"}"#)
        };
        async move { service.submit_quiz(QuizId(1), learner, sheet).await }
    });
    let results = futures::future::join_all(attempts).await;

    for (i, result) in results.into_iter().enumerate() {
        let expected = if i % 2 == 0 { 15 } else { 10 };
        assert_eq!(result.unwrap().score, Some(expected));
    }
    assert_eq!(store.submission_count().await, 20);

    let stats = service.quiz_stats(QuizId(1)).await.unwrap();
    assert_eq!(stats.attempts, 20);
    assert_eq!(stats.learners, 2);
    assert_eq!(stats.max_score, 15);
    assert_eq!(stats.best_by_learner[&LearnerId(1)], 15);
    assert_eq!(stats.best_by_learner[&LearnerId(2)], 10);
}

#[tokio::test]
async fn history_queries_check_existence() {
    let (_, service) = setup();
    service
        .submit_quiz(QuizId(1), LearnerId(2), answers(r#"{"2": "true"}"#))
        .await
        .unwrap();

    assert_eq!(service.submissions_for_learner(LearnerId(2)).await.unwrap().len(), 1);
    assert!(service.submissions_for_learner(LearnerId(1)).await.unwrap().is_empty());
    assert!(matches!(
        service.submissions_for_learner(LearnerId(7)).await,
        Err(GradingError::NotFound(_))
    ));
    assert!(matches!(
        service.submissions_for_quiz(QuizId(7)).await,
        Err(GradingError::NotFound(_))
    ));
}

#[tokio::test]
async fn json_file_store_grades_the_same_way() {
    let dir = tempfile::tempdir().unwrap();
    let catalog = parse_catalog_str(FIXTURE, Path::new("fixture.toml")).unwrap();
    let store = Arc::new(JsonFileStore::open(dir.path().join("store.json")).await.unwrap());
    store.import_catalog(&catalog).await.unwrap();
    let service = SubmissionService::from_store(Arc::clone(&store));

    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), answers(r#"{"1": "4", "2": "false"}"#))
        .await
        .unwrap();
    assert_eq!(submission.score, Some(10));

    let reopened = JsonFileStore::open(dir.path().join("store.json")).await.unwrap();
    assert_eq!(
        reopened.submissions_for_learner(LearnerId(1)).await.unwrap(),
        vec![submission]
    );
}

const DUPLICATE_QUESTIONS: &str = r#"
[[learners]]
id = 1
name = "Ada"

[[quizzes]]
id = 1
lesson_id = 100
title = "Copy-pasted"

[[quizzes.questions]]
id = 1
text = "What is 2 + 2?"
correct_answer = "4"
points = 10

[[quizzes.questions]]
id = 1
text = "What is 2 + 2, again?"
correct_answer = "4"
points = 10
"#;

#[tokio::test]
async fn duplicate_question_ids_are_rejected_at_import() {
    let catalog = parse_catalog_str(DUPLICATE_QUESTIONS, Path::new("dup.toml")).unwrap();
    assert!(matches!(
        InMemoryStore::from_catalog(&catalog),
        Err(StorageError::Constraint(_))
    ));

    // An existing store keeps grading against its previous question set.
    let (store, service) = setup();
    assert!(store.import_catalog(&catalog).await.is_err());
    let submission = service
        .submit_quiz(QuizId(1), LearnerId(1), answers(r#"{"1": "4"}"#))
        .await
        .unwrap();
    assert_eq!(submission.score, Some(10));

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.json");
    let json_store = JsonFileStore::open(&path).await.unwrap();
    assert!(json_store.import_catalog(&catalog).await.is_err());
    assert!(!path.exists());
    assert!(JsonFileStore::open(&path).await.is_ok());
}
