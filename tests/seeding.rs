use entity::employee::Operator;
use hr_tests::test_db;
use products_hr::{repo::employees, seed::seed_rosters};

#[tokio::test]
async fn seeding_loads_both_rosters_once() {
    let db = test_db().await;

    assert_eq!(seed_rosters(&db).await.unwrap(), 443);
    assert_eq!(seed_rosters(&db).await.unwrap(), 0);

    let all = employees::all(&db).await.unwrap();
    assert_eq!(all.len(), 443);
    let ids: Vec<i32> = all.iter().map(|e| e.id).collect();
    assert_eq!(ids, (1..=443).collect::<Vec<_>>());

    let doha = all.iter().filter(|e| e.operator == Operator::DohaOasis).count();
    assert_eq!(doha, 208);
    assert!(all[..208].iter().all(|e| e.grade.as_deref() == Some("S1")));
    assert!(all[208..].iter().all(|e| e.grade.as_deref() == Some("K1")));
    assert_eq!(all[0].name, "Abbas Hussein Ahmad");
}

#[tokio::test]
async fn seeding_skips_a_populated_table() {
    let db = test_db().await;
    hr_tests::add_employee(&db, "Existing Person").await;

    assert_eq!(seed_rosters(&db).await.unwrap(), 0);
    assert_eq!(employees::count(&db).await.unwrap(), 1);
}

#[tokio::test]
async fn seeded_hr_team_excludes_drivers() {
    let db = test_db().await;
    seed_rosters(&db).await.unwrap();

    let team = employees::hr_team(&db).await.unwrap();
    assert_eq!(team.len(), 8);
    assert!(team.iter().all(|e| e.position != "Driver"));
    assert!(team.iter().any(|e| e.name == "LAMEES ILIAS"));
}
