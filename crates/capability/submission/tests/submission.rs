use async_trait::async_trait;
use chrono::Utc;
use domain::{ReviewStatus, Role, SessionContext, ValidationMode};
use rounds_collection::PointCompletion;
use rounds_review::{NotifyError, ReviewNotifier};
use rounds_storage::{
    InMemoryPointStore, InMemoryReadingStore, InMemorySubmissionStore, PointStore,
    ReadingListRecord, ReadingPointRecord, ReadingStore, ReviewSubmissionRecord, SubmissionStore,
};
use rounds_submission::{SubmissionError, SubmissionOutcome, SubmissionPolicy, SubmissionService};
use std::sync::{Arc, Mutex};

fn admin() -> SessionContext {
    SessionContext::new("admin-1", "Site Admin", None, vec![Role::Admin])
}

fn field_user() -> SessionContext {
    SessionContext::new("user-1", "Field User", None, vec![Role::User])
}

fn sample_point(point_id: &str) -> ReadingPointRecord {
    ReadingPointRecord {
        point_id: point_id.to_string(),
        name: format!("Point {}", point_id),
        building: "B1".to_string(),
        floor: "2".to_string(),
        room: "201".to_string(),
        reading_type: "temperature".to_string(),
        component: Some("ahu".to_string()),
        unit: "C".to_string(),
        description: None,
        validation_mode: ValidationMode::Range,
        min_value: Some(10.0),
        max_value: Some(30.0),
        active: true,
        created_at: Utc::now(),
    }
}

fn completion(point_id: &str, value: &str, notes: Option<&str>) -> PointCompletion {
    PointCompletion {
        point_id: point_id.to_string(),
        completed_at: Utc::now(),
        completed_by: Some("user-1".to_string()),
        value: value.to_string(),
        notes: notes.map(|notes| notes.to_string()),
    }
}

fn sample_list(list_id: &str, point_ids: &[&str]) -> ReadingListRecord {
    ReadingListRecord {
        list_id: list_id.to_string(),
        name: "Morning round".to_string(),
        point_ids: point_ids.iter().map(|id| id.to_string()).collect(),
        expected_completion_date: None,
        created_by: "admin-1".to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
        is_model: false,
    }
}

#[derive(Default)]
struct RecordingNotifier {
    created: Mutex<Vec<(String, Vec<String>)>>,
}

#[async_trait]
impl ReviewNotifier for RecordingNotifier {
    async fn submission_created(
        &self,
        submission: &ReviewSubmissionRecord,
        reviewer_roles: &[Role],
        _submitter_name: &str,
    ) -> Result<(), NotifyError> {
        let mut created = self.created.lock().expect("lock");
        created.push((
            submission.submission_id.clone(),
            reviewer_roles.iter().map(|role| role.to_string()).collect(),
        ));
        Ok(())
    }

    async fn submission_reviewed(
        &self,
        _submission: &ReviewSubmissionRecord,
        _submitter_email: Option<&str>,
        _submitter_name: &str,
        _reviewer_name: &str,
    ) -> Result<(), NotifyError> {
        Ok(())
    }
}

struct Harness {
    readings: Arc<InMemoryReadingStore>,
    submissions: Arc<InMemorySubmissionStore>,
    notifier: Arc<RecordingNotifier>,
    service: SubmissionService,
}

async fn harness(policy: SubmissionPolicy) -> Harness {
    let points = Arc::new(InMemoryPointStore::new());
    let readings = Arc::new(InMemoryReadingStore::new());
    let submissions = Arc::new(InMemorySubmissionStore::new());
    let notifier = Arc::new(RecordingNotifier::default());
    points
        .create_point(&admin(), sample_point("point-1"))
        .await
        .expect("seed point");
    points
        .create_point(&admin(), sample_point("point-2"))
        .await
        .expect("seed point");
    let service = SubmissionService::new(
        points,
        readings.clone(),
        submissions.clone(),
        notifier.clone(),
        policy,
    );
    Harness {
        readings,
        submissions,
        notifier,
        service,
    }
}

#[tokio::test]
async fn adhoc_submission_requires_a_list_by_default() {
    let harness = harness(SubmissionPolicy::default()).await;
    let err = harness
        .service
        .submit(&field_user(), &[completion("point-1", "20", None)], None, None)
        .await
        .expect_err("list required");
    assert!(matches!(err, SubmissionError::ListRequired));

    let relaxed = harness_with_adhoc().await;
    let outcome = relaxed
        .service
        .submit(&admin(), &[completion("point-1", "20", None)], None, None)
        .await
        .expect("adhoc allowed");
    assert!(matches!(outcome, SubmissionOutcome::Committed { count: 1 }));
}

async fn harness_with_adhoc() -> Harness {
    harness(SubmissionPolicy {
        allow_adhoc_points: true,
        review_enabled: true,
    })
    .await
}

#[tokio::test]
async fn empty_batches_are_rejected() {
    let harness = harness(SubmissionPolicy::default()).await;
    let list = sample_list("list-1", &["point-1"]);
    let err = harness
        .service
        .submit(&field_user(), &[], Some(&list), None)
        .await
        .expect_err("no entries");
    assert!(matches!(err, SubmissionError::NoEntries));
}

#[tokio::test]
async fn invalid_values_reject_the_whole_operation() {
    let harness = harness(SubmissionPolicy::default()).await;
    let list = sample_list("list-1", &["point-1"]);
    let err = harness
        .service
        .submit(
            &admin(),
            &[completion("point-1", "not-a-number", None)],
            Some(&list),
            None,
        )
        .await
        .expect_err("invalid value");
    assert!(matches!(err, SubmissionError::InvalidValue(_)));
    assert_eq!(harness.readings.len(), 0);
}

#[tokio::test]
async fn unknown_point_aborts_the_whole_batch() {
    let harness = harness(SubmissionPolicy::default()).await;
    let list = sample_list("list-1", &["point-1", "point-ghost"]);
    let err = harness
        .service
        .submit(
            &admin(),
            &[
                completion("point-1", "20", None),
                completion("point-ghost", "21", None),
            ],
            Some(&list),
            None,
        )
        .await
        .expect_err("referential failure");
    assert!(matches!(err, SubmissionError::UnknownPoint(_)));
    assert_eq!(harness.readings.len(), 0);
}

#[tokio::test]
async fn admin_batches_commit_directly_with_shared_timestamp() {
    let harness = harness(SubmissionPolicy::default()).await;
    let list = sample_list("list-1", &["point-1", "point-2"]);
    let outcome = harness
        .service
        .submit(
            &admin(),
            &[
                completion("point-1", "20", None),
                completion("point-2", "35", Some("sensor drift, logged")),
            ],
            Some(&list),
            None,
        )
        .await
        .expect("commit");
    assert!(matches!(outcome, SubmissionOutcome::Committed { count: 2 }));

    let stored = harness
        .readings
        .list_readings(&admin())
        .await
        .expect("list");
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].recorded_at, stored[1].recorded_at);
    assert_eq!(stored[0].building, "B1");
    assert_eq!(stored[0].unit, "C");
    assert_eq!(stored[0].point_id.as_deref(), Some("point-1"));
    assert_eq!(stored[0].recorded_by.as_deref(), Some("Site Admin"));
    assert_eq!(stored[1].notes.as_deref(), Some("sensor drift, logged"));
    assert!(harness
        .submissions
        .list_submissions(&admin())
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn field_user_batches_route_through_review() {
    let harness = harness(SubmissionPolicy::default()).await;
    let list = sample_list("list-1", &["point-1"]);
    let outcome = harness
        .service
        .submit(
            &field_user(),
            &[completion("point-1", "20", None)],
            Some(&list),
            Some("night shift".to_string()),
        )
        .await
        .expect("submit");
    let submission = match outcome {
        SubmissionOutcome::PendingReview(submission) => submission,
        other => panic!("expected pending review, got {:?}", other),
    };
    assert_eq!(submission.status, ReviewStatus::Pending);
    assert_eq!(submission.submitted_by, "user-1");
    assert_eq!(submission.list_id.as_deref(), Some("list-1"));
    assert_eq!(submission.list_name.as_deref(), Some("Morning round"));
    assert_eq!(submission.notes.as_deref(), Some("night shift"));
    assert_eq!(submission.readings.len(), 1);

    // 送审批次不进入读数仓储
    assert_eq!(harness.readings.len(), 0);

    let created = harness.notifier.created.lock().expect("lock");
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].0, submission.submission_id);
    assert_eq!(created[0].1, vec!["reviewer", "superadmin"]);
}

#[tokio::test]
async fn disabling_review_commits_everyone_directly() {
    let harness = harness(SubmissionPolicy {
        allow_adhoc_points: false,
        review_enabled: false,
    })
    .await;
    let list = sample_list("list-1", &["point-1"]);
    let outcome = harness
        .service
        .submit(
            &field_user(),
            &[completion("point-1", "20", None)],
            Some(&list),
            None,
        )
        .await
        .expect("commit");
    assert!(matches!(outcome, SubmissionOutcome::Committed { count: 1 }));
    assert_eq!(harness.readings.len(), 1);
}

#[tokio::test]
async fn out_of_range_values_submit_with_their_notes() {
    let harness = harness(SubmissionPolicy::default()).await;
    let list = sample_list("list-1", &["point-2"]);
    let outcome = harness
        .service
        .submit(
            &admin(),
            &[completion("point-2", "35", Some("spike due to maintenance"))],
            Some(&list),
            None,
        )
        .await
        .expect("commit");
    assert!(matches!(outcome, SubmissionOutcome::Committed { count: 1 }));
    let stored = harness
        .readings
        .list_readings(&admin())
        .await
        .expect("list");
    assert_eq!(stored[0].value, domain::ReadingValue::Number(35.0));
    assert_eq!(stored[0].notes.as_deref(), Some("spike due to maintenance"));
}
