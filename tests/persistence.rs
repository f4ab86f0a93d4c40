use hr_tests::{migrated, new_employee};
use platform_db::DatabaseSettings;
use products_hr::{
    process::{self, ONBOARDING_CHECKLIST},
    repo::employees,
    views::Snapshot,
};

#[tokio::test]
async fn rows_survive_reopening_a_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("hr.db").display());
    let settings = DatabaseSettings::new(url);

    let added = {
        let db = migrated(&settings).await;
        let added = employees::add(&db, new_employee("Durable Person"))
            .await
            .unwrap();
        db.close().await.unwrap();
        added
    };

    let reopened = migrated(&settings).await;
    assert_eq!(employees::all(&reopened).await.unwrap(), vec![added]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn snapshots_never_see_half_an_initiation() {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("hr.db").display());
    let db = migrated(&DatabaseSettings::new(url)).await;

    let mut ids = Vec::new();
    for i in 0..5 {
        let added = employees::add(&db, new_employee(&format!("New Hire {i}")))
            .await
            .unwrap();
        ids.push(added.id);
    }

    let writer = {
        let db = db.clone();
        tokio::spawn(async move {
            for id in ids {
                process::initiate_onboarding(&db, id).await.unwrap();
            }
        })
    };

    while !writer.is_finished() {
        let snapshot = Snapshot::load(&db).await.unwrap();
        assert_eq!(
            snapshot.tasks.len(),
            snapshot.onboardings.len() * ONBOARDING_CHECKLIST.len()
        );
    }
    writer.await.unwrap();

    let snapshot = Snapshot::load(&db).await.unwrap();
    assert_eq!(snapshot.onboardings.len(), 5);
    assert_eq!(snapshot.tasks.len(), 5 * ONBOARDING_CHECKLIST.len());
}
