use sea_orm::{ConnectionTrait, Database, DatabaseConnection};

use engine::{
    DonationNew, Engine, EngineError, Fundable, ProjectNew, ProjectUpdate, format_duration,
};
use migration::MigratorTrait;
use uuid::Uuid;

const ADMIN: &str = "admin";
const ALICE: &str = "alice";
const BOB: &str = "bob";

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    engine.new_user(ADMIN, "secret", true).await.unwrap();
    engine.new_user(ALICE, "password", false).await.unwrap();
    engine.new_user(BOB, "password", false).await.unwrap();
    (engine, db)
}

async fn open_project(engine: &Engine, name: &str, full_amount: i64) -> engine::Project {
    engine
        .new_project(ProjectNew::new(
            ADMIN,
            name,
            format!("{name} description"),
            full_amount,
        ))
        .await
        .unwrap()
}

async fn donate(engine: &Engine, user: &str, full_amount: i64) -> engine::Donation {
    engine
        .new_donation(DonationNew::new(user, full_amount))
        .await
        .unwrap()
}

fn assert_consistent(item: &impl Fundable) {
    assert!(item.invested_amount() >= 0);
    assert!(item.invested_amount() <= item.target_amount());
    assert_eq!(
        item.is_fulfilled(),
        item.invested_amount() == item.target_amount()
    );
    assert_eq!(item.closed_at().is_some(), item.is_fulfilled());
}

#[tokio::test]
async fn project_without_donations_stays_open() {
    let (engine, _db) = engine_with_db().await;

    let project = open_project(&engine, "Shelter", 500).await;

    assert_eq!(project.invested_amount(), 0);
    assert!(!project.is_fulfilled());
    assert_eq!(project.closed_at(), None);

    let stored = engine.project(project.id).await.unwrap();
    assert_eq!(stored.name, "Shelter");
    assert_eq!(stored.target_amount(), 500);
    assert!(!stored.is_fulfilled());
}

#[tokio::test]
async fn donation_funds_projects_oldest_first() {
    let (engine, _db) = engine_with_db().await;
    let first = open_project(&engine, "First", 100).await;
    let second = open_project(&engine, "Second", 100).await;

    let donation = donate(&engine, ALICE, 150).await;

    assert!(donation.is_fulfilled());
    assert_eq!(donation.invested_amount(), 150);

    let first = engine.project(first.id).await.unwrap();
    let second = engine.project(second.id).await.unwrap();
    assert!(first.is_fulfilled());
    assert_eq!(first.invested_amount(), 100);
    assert!(!second.is_fulfilled());
    assert_eq!(second.invested_amount(), 50);
}

#[tokio::test]
async fn exact_match_closes_both_sides() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Exact", 300).await;

    let donation = donate(&engine, ALICE, 300).await;
    let project = engine.project(project.id).await.unwrap();

    assert!(donation.is_fulfilled());
    assert!(project.is_fulfilled());
    assert_consistent(&donation);
    assert_consistent(&project);
}

#[tokio::test]
async fn donation_without_projects_waits() {
    let (engine, _db) = engine_with_db().await;

    let donation = donate(&engine, ALICE, 80).await;

    assert_eq!(donation.invested_amount(), 0);
    assert!(!donation.is_fulfilled());
}

#[tokio::test]
async fn new_project_consumes_waiting_donations() {
    let (engine, _db) = engine_with_db().await;
    let d1 = donate(&engine, ALICE, 30).await;
    let d2 = donate(&engine, BOB, 50).await;
    let d3 = donate(&engine, ALICE, 40).await;

    let project = open_project(&engine, "Late", 100).await;

    assert!(project.is_fulfilled());
    assert_eq!(project.invested_amount(), 100);

    let donations = engine.donations(ADMIN).await.unwrap();
    let by_id = |id: Uuid| donations.iter().find(|d| d.id == id).unwrap();
    assert!(by_id(d1.id).is_fulfilled());
    assert!(by_id(d2.id).is_fulfilled());
    assert_eq!(by_id(d3.id).invested_amount(), 20);
    assert!(!by_id(d3.id).is_fulfilled());
}

#[tokio::test]
async fn money_is_conserved_across_a_sequence() {
    let (engine, _db) = engine_with_db().await;

    open_project(&engine, "A", 120).await;
    donate(&engine, ALICE, 70).await;
    donate(&engine, BOB, 90).await;
    open_project(&engine, "B", 25).await;
    donate(&engine, ALICE, 5).await;
    open_project(&engine, "C", 300).await;
    donate(&engine, BOB, 200).await;

    let projects = engine.projects().await.unwrap();
    let donations = engine.donations(ADMIN).await.unwrap();
    let invested_in_projects: i64 = projects.iter().map(|p| p.invested_amount()).sum();
    let invested_from_donations: i64 = donations.iter().map(|d| d.invested_amount()).sum();

    assert_eq!(invested_in_projects, invested_from_donations);
    assert_eq!(invested_in_projects, 365);
    projects.iter().for_each(assert_consistent);
    donations.iter().for_each(assert_consistent);
}

#[tokio::test]
async fn projects_are_listed_in_creation_order() {
    let (engine, _db) = engine_with_db().await;
    let names = ["one", "two", "three"];
    for name in names {
        open_project(&engine, name, 10).await;
    }

    let listed: Vec<_> = engine
        .projects()
        .await
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();

    assert_eq!(listed, names);
}

#[tokio::test]
async fn duplicate_project_name_is_rejected_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    open_project(&engine, "Food Bank", 10).await;

    let err = engine
        .new_project(ProjectNew::new(ADMIN, "  food bank ", "again", 10))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("food bank".to_string()));
    assert_eq!(engine.projects().await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_cyrillic_project_name_is_rejected_ignoring_case() {
    let (engine, _db) = engine_with_db().await;
    open_project(&engine, "ПРИЮТ", 10).await;
    let other = open_project(&engine, "Котики", 10).await;

    let exact = engine
        .new_project(ProjectNew::new(ADMIN, "ПРИЮТ", "again", 10))
        .await
        .unwrap_err();
    let lower = engine
        .new_project(ProjectNew::new(ADMIN, "приют", "again", 10))
        .await
        .unwrap_err();
    let renamed = engine
        .update_project(other.id, ProjectUpdate::new(ADMIN).name("Приют"))
        .await
        .unwrap_err();

    assert_eq!(exact, EngineError::ExistingKey("ПРИЮТ".to_string()));
    assert_eq!(lower, EngineError::ExistingKey("приют".to_string()));
    assert_eq!(renamed, EngineError::ExistingKey("Приют".to_string()));
    assert_eq!(engine.projects().await.unwrap().len(), 2);
}

#[tokio::test]
async fn invalid_project_input_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .new_project(ProjectNew::new(ADMIN, "Zero", "nothing", 0))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidAmount("full_amount must be > 0".to_string())
    );

    let err = engine
        .new_project(ProjectNew::new(ADMIN, "   ", "blank", 10))
        .await
        .unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidName("project name must not be empty".to_string())
    );

    let err = engine
        .new_project(ProjectNew::new(ADMIN, "x".repeat(101), "long", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn only_superusers_manage_projects() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Guarded", 10).await;

    let err = engine
        .new_project(ProjectNew::new(ALICE, "Mine", "nope", 10))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine
        .update_project(project.id, ProjectUpdate::new(ALICE).full_amount(20))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.delete_project(project.id, ALICE).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    let err = engine.donations(ALICE).await.unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn donation_from_unknown_user_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    open_project(&engine, "Any", 10).await;

    let err = engine
        .new_donation(DonationNew::new("mallory", 10))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("user not exists".to_string()));
    let project = engine.projects().await.unwrap().remove(0);
    assert_eq!(project.invested_amount(), 0);
}

#[tokio::test]
async fn update_changes_name_description_and_target() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Draft", 100).await;

    let updated = engine
        .update_project(
            project.id,
            ProjectUpdate::new(ADMIN)
                .name("Final")
                .description("Ready to go")
                .full_amount(250),
        )
        .await
        .unwrap();

    assert_eq!(updated.name, "Final");
    assert_eq!(updated.description, "Ready to go");
    assert_eq!(updated.target_amount(), 250);

    let stored = engine.project(project.id).await.unwrap();
    assert_eq!(stored.name, "Final");
    assert_eq!(stored.target_amount(), 250);
}

#[tokio::test]
async fn update_keeping_own_name_is_allowed() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Same", 100).await;

    let updated = engine
        .update_project(project.id, ProjectUpdate::new(ADMIN).name("SAME"))
        .await
        .unwrap();

    assert_eq!(updated.name, "SAME");
}

#[tokio::test]
async fn update_to_another_project_name_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    open_project(&engine, "Taken", 100).await;
    let project = open_project(&engine, "Free", 100).await;

    let err = engine
        .update_project(project.id, ProjectUpdate::new(ADMIN).name("taken"))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ExistingKey("taken".to_string()));
}

#[tokio::test]
async fn update_target_below_invested_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Half", 100).await;
    donate(&engine, ALICE, 60).await;

    let err = engine
        .update_project(project.id, ProjectUpdate::new(ADMIN).full_amount(50))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        EngineError::TargetBelowInvested {
            target: 50,
            invested: 60
        }
    );
    let stored = engine.project(project.id).await.unwrap();
    assert_eq!(stored.target_amount(), 100);
}

#[tokio::test]
async fn update_target_to_invested_closes_project() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Trimmed", 100).await;
    donate(&engine, ALICE, 60).await;

    let updated = engine
        .update_project(project.id, ProjectUpdate::new(ADMIN).full_amount(60))
        .await
        .unwrap();

    assert!(updated.is_fulfilled());
    assert!(updated.closed_at().is_some());
    assert_consistent(&updated);

    let donation = donate(&engine, BOB, 10).await;
    assert_eq!(donation.invested_amount(), 0);
}

#[tokio::test]
async fn closed_project_cannot_be_edited() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Done", 10).await;
    donate(&engine, ALICE, 10).await;

    let err = engine
        .update_project(project.id, ProjectUpdate::new(ADMIN).description("more"))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::ProjectClosed("Done".to_string()));
}

#[tokio::test]
async fn update_of_missing_project_is_not_found() {
    let (engine, _db) = engine_with_db().await;

    let err = engine
        .update_project(Uuid::now_v7(), ProjectUpdate::new(ADMIN).full_amount(10))
        .await
        .unwrap_err();

    assert_eq!(err, EngineError::KeyNotFound("project not exists".to_string()));
}

#[tokio::test]
async fn raised_target_is_funded_by_later_donations() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Grows", 50).await;
    donate(&engine, ALICE, 30).await;

    let raised = engine
        .update_project(project.id, ProjectUpdate::new(ADMIN).full_amount(200))
        .await
        .unwrap();
    assert_eq!(raised.invested_amount(), 30);
    assert!(!raised.is_fulfilled());

    donate(&engine, BOB, 170).await;
    let project = engine.project(project.id).await.unwrap();
    assert!(project.is_fulfilled());
    assert_eq!(project.invested_amount(), 200);
}

#[tokio::test]
async fn delete_project_without_funds() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Empty", 100).await;

    let deleted = engine.delete_project(project.id, ADMIN).await.unwrap();

    assert_eq!(deleted.id, project.id);
    assert_eq!(
        engine.project(project.id).await.unwrap_err(),
        EngineError::KeyNotFound("project not exists".to_string())
    );
}

#[tokio::test]
async fn delete_project_with_funds_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    let project = open_project(&engine, "Funded", 100).await;
    donate(&engine, ALICE, 1).await;

    let err = engine.delete_project(project.id, ADMIN).await.unwrap_err();

    assert_eq!(err, EngineError::ProjectInvested("Funded".to_string()));
    assert!(engine.project(project.id).await.is_ok());
}

#[tokio::test]
async fn users_see_only_their_donations() {
    let (engine, _db) = engine_with_db().await;
    donate(&engine, ALICE, 10).await;
    donate(&engine, BOB, 20).await;
    donate(&engine, ALICE, 30).await;

    let mine = engine.user_donations(ALICE).await.unwrap();

    let amounts: Vec<_> = mine.iter().map(|d| d.target_amount()).collect();
    assert_eq!(amounts, vec![10, 30]);
    assert!(mine.iter().all(|d| d.user_id == ALICE));
    assert_eq!(engine.donations(ADMIN).await.unwrap().len(), 3);
}

#[tokio::test]
async fn donation_comment_is_trimmed() {
    let (engine, _db) = engine_with_db().await;

    let with_comment = engine
        .new_donation(DonationNew::new(ALICE, 10).comment("  for the cats "))
        .await
        .unwrap();
    let blank = engine
        .new_donation(DonationNew::new(ALICE, 10).comment("   "))
        .await
        .unwrap();

    assert_eq!(with_comment.comment.as_deref(), Some("for the cats"));
    assert_eq!(blank.comment, None);
}

#[tokio::test]
async fn duplicate_user_is_rejected() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.new_user(ALICE, "other", false).await.unwrap_err();

    assert_eq!(err, EngineError::ExistingKey(ALICE.to_string()));
}

#[tokio::test]
async fn report_lists_closed_projects_only() {
    let (engine, _db) = engine_with_db().await;
    let closed = open_project(&engine, "Closed", 10).await;
    open_project(&engine, "Open", 1000).await;
    donate(&engine, ALICE, 50).await;

    let rows = engine.closed_projects_report(ADMIN).await.unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].id, closed.id);
    assert_eq!(rows[0].name, "Closed");
    assert!(rows[0].duration >= chrono::TimeDelta::zero());
    assert!(!format_duration(rows[0].duration).is_empty());
}

#[tokio::test]
async fn report_is_for_superusers() {
    let (engine, _db) = engine_with_db().await;

    let err = engine.closed_projects_report(ALICE).await.unwrap_err();

    assert!(matches!(err, EngineError::Forbidden(_)));
}

#[tokio::test]
async fn concurrent_donations_never_overfund() {
    let (engine, _db) = engine_with_db().await;
    let engine = std::sync::Arc::new(engine);
    let project = open_project(&engine, "Popular", 100).await;

    let mut handles = Vec::new();
    for i in 0..10 {
        let engine = engine.clone();
        let user = if i % 2 == 0 { ALICE } else { BOB };
        handles.push(tokio::spawn(async move {
            engine.new_donation(DonationNew::new(user, 15)).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let project = engine.project(project.id).await.unwrap();
    let donations = engine.donations(ADMIN).await.unwrap();
    let invested: i64 = donations.iter().map(|d| d.invested_amount()).sum();

    assert!(project.is_fulfilled());
    assert_eq!(project.invested_amount(), 100);
    assert_eq!(invested, 100);
    donations.iter().for_each(assert_consistent);
}

#[tokio::test]
async fn concurrent_writes_close_after_creation() {
    let (engine, _db) = engine_with_db().await;
    let engine = std::sync::Arc::new(engine);

    let mut projects = Vec::new();
    let mut donations = Vec::new();
    for i in 0..20 {
        let engine = engine.clone();
        if i % 2 == 0 {
            projects.push(tokio::spawn(async move {
                engine
                    .new_project(ProjectNew::new(ADMIN, format!("Project {i}"), "help", 7))
                    .await
            }));
        } else {
            donations.push(tokio::spawn(async move {
                engine.new_donation(DonationNew::new(ALICE, 5)).await
            }));
        }
    }
    for handle in projects {
        handle.await.unwrap().unwrap();
    }
    for handle in donations {
        handle.await.unwrap().unwrap();
    }

    let projects = engine.projects().await.unwrap();
    let donations = engine.donations(ADMIN).await.unwrap();
    for project in &projects {
        assert_consistent(project);
        if let Some(closed_at) = project.closed_at() {
            assert!(closed_at >= project.created_at());
        }
    }
    for donation in &donations {
        assert_consistent(donation);
        if let Some(closed_at) = donation.closed_at() {
            assert!(closed_at >= donation.created_at());
        }
    }
}

#[tokio::test]
async fn failed_sweep_leaves_no_partial_update() {
    let (engine, db) = engine_with_db().await;
    let project = open_project(&engine, "Shelter", 100).await;
    db.execute_unprepared(
        "CREATE TRIGGER donations_readonly BEFORE UPDATE ON donations \
         BEGIN SELECT RAISE(ABORT, 'storage unavailable'); END",
    )
    .await
    .unwrap();

    let err = engine
        .new_donation(DonationNew::new(ALICE, 40))
        .await
        .unwrap_err();

    assert!(matches!(err, EngineError::Database(_)));
    let project = engine.project(project.id).await.unwrap();
    assert_eq!(project.invested_amount(), 0);
    assert!(!project.is_fulfilled());
    assert!(engine.donations(ADMIN).await.unwrap().is_empty());
}

#[tokio::test]
async fn storage_rejects_invested_above_target() {
    let (_engine, db) = engine_with_db().await;

    let result = db
        .execute_unprepared(
            "INSERT INTO charity_projects \
             (id, name, name_key, description, full_amount, invested_amount, \
              fully_invested, create_date) \
             VALUES ('x', 'Broken', 'broken', 'd', 10, 20, 0, '2026-01-01T00:00:00Z')",
        )
        .await;

    assert!(result.is_err());
}
