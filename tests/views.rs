use entity::task::Category;
use hr_tests::{add_employee, add_tasks, test_db};
use products_hr::{
    process,
    repo::tasks,
    views::{self, Snapshot},
};

#[tokio::test]
async fn stats_count_employees_with_unfinished_work() {
    let db = test_db().await;
    let a = add_employee(&db, "Employee A").await;
    let b = add_employee(&db, "Employee B").await;
    add_tasks(&db, a.id, Category::Onboarding, 3, 1).await;
    add_tasks(&db, b.id, Category::Separation, 2, 2).await;

    let snapshot = Snapshot::load(&db).await.unwrap();
    let stats = views::stats(&snapshot);
    assert_eq!(stats.total_employees, 2);
    assert_eq!(stats.onboarding_active, 1);
    assert_eq!(stats.separation_active, 0);
    assert_eq!(stats.performance_active, 0);
}

#[tokio::test]
async fn category_views_partition_the_task_table() {
    let db = test_db().await;
    let employee = add_employee(&db, "Wafa Jaber").await;
    add_tasks(&db, employee.id, Category::Onboarding, 4, 0).await;
    add_tasks(&db, employee.id, Category::Separation, 2, 0).await;
    add_tasks(&db, employee.id, Category::Performance, 3, 0).await;

    let all = tasks::all(&db).await.unwrap();
    let partition = views::partition_tasks(all.clone());
    assert_eq!(partition.onboarding.len(), 4);
    assert_eq!(partition.separation.len(), 2);
    assert_eq!(partition.performance.len(), 3);

    let mut ids: Vec<i32> = partition
        .onboarding
        .iter()
        .chain(&partition.separation)
        .chain(&partition.performance)
        .map(|t| t.id)
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, all.iter().map(|t| t.id).collect::<Vec<_>>());

    for category in [Category::Onboarding, Category::Separation, Category::Performance] {
        let stored = tasks::by_category(&db, category).await.unwrap();
        assert!(stored.iter().all(|t| t.category == category));
    }
}

#[tokio::test]
async fn progress_rounds_to_nearest_percent() {
    let db = test_db().await;
    let employee = add_employee(&db, "Yara Hamdan").await;
    let created = add_tasks(&db, employee.id, Category::Onboarding, 7, 3).await;

    let progress = views::employee_progress(&created, employee.id, Category::Onboarding);
    assert_eq!((progress.total, progress.completed, progress.percent), (7, 3, 43));
    assert_eq!(
        views::employee_progress(&created, employee.id, Category::Separation).percent,
        0
    );
}

#[tokio::test]
async fn summaries_hide_finished_processes_and_name_the_lead() {
    let db = test_db().await;
    let busy = add_employee(&db, "Zaid Mourad").await;
    let done = add_employee(&db, "Zeina Harb").await;
    process::initiate_separation(&db, busy.id, Some("Lamees"))
        .await
        .unwrap();
    add_tasks(&db, done.id, Category::Separation, 2, 2).await;

    let snapshot = Snapshot::load(&db).await.unwrap();
    let summaries = views::process_summaries(&snapshot, Category::Separation);
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].employee_name, "Zaid Mourad");
    assert_eq!(summaries[0].lead, "Lamees");
    assert_eq!(summaries[0].progress.total, 14);

    let listed: Vec<i32> = views::active_process_employees(&snapshot, Category::Separation)
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(listed, vec![busy.id, done.id]);
}

#[tokio::test]
async fn performance_summaries_are_keyed_by_year() {
    let db = test_db().await;
    let employee = add_employee(&db, "Adel Sabbagh").await;
    process::initiate_performance(&db, employee.id, 2024, Some("Manager A"))
        .await
        .unwrap();
    process::initiate_performance(&db, employee.id, 2025, None)
        .await
        .unwrap();

    let snapshot = Snapshot::load(&db).await.unwrap();
    let summaries = views::process_summaries(&snapshot, Category::Performance);
    let keyed: Vec<_> = summaries
        .iter()
        .map(|s| (s.year, s.lead.as_str()))
        .collect();
    assert_eq!(keyed, vec![(Some(2024), "Manager A"), (Some(2025), "Unassigned")]);

    let board = views::dashboard(&snapshot);
    assert_eq!(board.performance_tasks.len(), 6);
    assert!(board.performance_tasks.windows(2).all(|w| w[0].id > w[1].id));
    assert_eq!(board.stats.performance_active, 1);
}
