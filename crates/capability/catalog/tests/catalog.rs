use chrono::Utc;
use domain::{Role, SessionContext, ValidationMode};
use rounds_catalog::{CatalogError, CatalogService, ListPatch, NewList, NewPoint};
use rounds_storage::{InMemoryListStore, InMemoryPointStore, ReadingPointUpdate};
use std::sync::Arc;

fn admin() -> SessionContext {
    SessionContext::new("admin-1", "Site Admin", None, vec![Role::Admin])
}

fn field_user() -> SessionContext {
    SessionContext::new("user-1", "Field User", None, vec![Role::User])
}

fn service() -> CatalogService {
    CatalogService::new(
        Arc::new(InMemoryPointStore::new()),
        Arc::new(InMemoryListStore::new()),
    )
}

fn new_point(name: &str) -> NewPoint {
    NewPoint {
        name: name.to_string(),
        building: "B1".to_string(),
        floor: "2".to_string(),
        room: "201".to_string(),
        reading_type: "temperature".to_string(),
        component: Some("  chiller  ".to_string()),
        unit: "C".to_string(),
        description: Some("   ".to_string()),
        validation_mode: ValidationMode::Range,
        min_value: Some(10.0),
        max_value: Some(20.0),
    }
}

#[tokio::test]
async fn create_point_normalizes_inputs() {
    let service = service();
    let created = service
        .create_point(&admin(), new_point("  Supply temp  "))
        .await
        .expect("create");
    assert_eq!(created.name, "Supply temp");
    assert_eq!(created.component.as_deref(), Some("chiller"));
    assert_eq!(created.description, None);
    assert!(created.active);
}

#[tokio::test]
async fn blank_required_fields_are_rejected() {
    let service = service();
    let mut input = new_point("Supply temp");
    input.unit = "   ".to_string();
    let err = service
        .create_point(&admin(), input)
        .await
        .expect_err("missing unit");
    assert!(matches!(err, CatalogError::MissingField("unit")));
}

#[tokio::test]
async fn inverted_bounds_are_rejected_on_create_and_update() {
    let service = service();
    let mut input = new_point("Supply temp");
    input.min_value = Some(30.0);
    input.max_value = Some(20.0);
    let err = service
        .create_point(&admin(), input)
        .await
        .expect_err("inverted");
    assert!(matches!(err, CatalogError::InvertedBounds));

    let created = service
        .create_point(&admin(), new_point("Supply temp"))
        .await
        .expect("create");
    let err = service
        .update_point(
            &admin(),
            &created.point_id,
            ReadingPointUpdate {
                min_value: Some(25.0),
                ..ReadingPointUpdate::default()
            },
        )
        .await
        .expect_err("merged bounds inverted");
    assert!(matches!(err, CatalogError::InvertedBounds));

    let updated = service
        .update_point(
            &admin(),
            &created.point_id,
            ReadingPointUpdate {
                max_value: Some(40.0),
                active: Some(false),
                ..ReadingPointUpdate::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.max_value, Some(40.0));
    assert!(!updated.active);
}

#[tokio::test]
async fn non_admins_cannot_mutate_the_catalog() {
    let service = service();
    let err = service
        .create_point(&field_user(), new_point("Supply temp"))
        .await
        .expect_err("forbidden");
    assert!(matches!(err, CatalogError::Storage(_)));
}

#[tokio::test]
async fn lists_validate_dates_and_point_references() {
    let service = service();
    let point = service
        .create_point(&admin(), new_point("Supply temp"))
        .await
        .expect("create point");

    let err = service
        .create_list(
            &admin(),
            NewList {
                name: "Morning round".to_string(),
                point_ids: vec![point.point_id.clone()],
                expected_completion_date: Some("06/08/2026".to_string()),
                is_model: false,
            },
        )
        .await
        .expect_err("malformed date");
    assert!(matches!(err, CatalogError::InvalidDate(_)));

    let err = service
        .create_list(
            &admin(),
            NewList {
                name: "Morning round".to_string(),
                point_ids: vec!["ghost".to_string()],
                expected_completion_date: None,
                is_model: false,
            },
        )
        .await
        .expect_err("unknown point");
    assert!(matches!(err, CatalogError::PointNotFound(_)));

    let created = service
        .create_list(
            &admin(),
            NewList {
                name: "Morning round".to_string(),
                point_ids: vec![point.point_id.clone()],
                expected_completion_date: Some("2026-08-20".to_string()),
                is_model: false,
            },
        )
        .await
        .expect("create list");
    assert_eq!(
        created.expected_completion_date,
        Some(domain::dates::parse_calendar_date("2026-08-20").expect("date"))
    );

    // Some(None) 清除日期
    let updated = service
        .update_list(
            &admin(),
            &created.list_id,
            ListPatch {
                expected_completion_date: Some(None),
                ..ListPatch::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.expected_completion_date, None);
}

#[tokio::test]
async fn copying_a_list_resets_identity_and_due_date() {
    let service = service();
    let point = service
        .create_point(&admin(), new_point("Supply temp"))
        .await
        .expect("create point");
    let template = service
        .create_list(
            &admin(),
            NewList {
                name: "Quarterly template".to_string(),
                point_ids: vec![point.point_id.clone()],
                expected_completion_date: Some("2026-01-01".to_string()),
                is_model: true,
            },
        )
        .await
        .expect("create template");

    let copy = service
        .copy_list(&admin(), &template.list_id)
        .await
        .expect("copy");
    assert_ne!(copy.list_id, template.list_id);
    assert_eq!(copy.name, template.name);
    assert_eq!(copy.point_ids, template.point_ids);
    assert!(!copy.is_model);
    assert_eq!(copy.expected_completion_date, Some(Utc::now().date_naive()));

    let err = service
        .copy_list(&admin(), "ghost")
        .await
        .expect_err("unknown list");
    assert!(matches!(err, CatalogError::ListNotFound(_)));
}
