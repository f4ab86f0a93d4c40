use entity::{employee::Operator, hr_request, position, task};
use hr_tests::{add_employee, new_employee, test_db};
use products_hr::{
    HrError,
    repo::{
        employees,
        positions::{self, NewPosition},
        requests::{self, NewRequest},
        tasks::{self, NewTask},
    },
};

#[tokio::test]
async fn ids_start_at_one_and_increase_by_one() {
    let db = test_db().await;
    let mut ids = Vec::new();
    for name in ["Amal Nasser", "Bilal Qasim", "Dana Yousef", "Fadi Salem"] {
        ids.push(add_employee(&db, name).await.id);
    }
    assert_eq!(ids, vec![1, 2, 3, 4]);

    let stored: Vec<i32> = employees::all(&db).await.unwrap().iter().map(|e| e.id).collect();
    assert_eq!(stored, ids);
}

#[tokio::test]
async fn added_rows_are_returned_by_all_and_by_id() {
    let db = test_db().await;
    let added = add_employee(&db, "Hala Mansour").await;

    let all = employees::all(&db).await.unwrap();
    assert_eq!(all, vec![added.clone()]);
    assert_eq!(employees::by_id(&db, added.id).await.unwrap(), Some(added));
    assert_eq!(employees::by_id(&db, 77).await.unwrap(), None);
}

#[tokio::test]
async fn update_twice_matches_update_once() {
    let db = test_db().await;
    let employee = add_employee(&db, "Jamal Haddad").await;
    let mut task = tasks::add(
        &db,
        NewTask::checklist_item(employee.id, "Issue badge", "HR", task::Category::Onboarding, None),
    )
    .await
    .unwrap();

    task.status = task::Status::Done;
    task.comments = Some("handed over at reception".into());
    let once = tasks::update(&db, task.clone()).await.unwrap();
    let after_once = tasks::all(&db).await.unwrap();
    let twice = tasks::update(&db, task).await.unwrap();
    let after_twice = tasks::all(&db).await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(after_once, after_twice);
}

#[tokio::test]
async fn update_of_unknown_id_is_a_no_op() {
    let db = test_db().await;
    let employee = add_employee(&db, "Karim Aoun").await;
    let task = tasks::add(
        &db,
        NewTask::checklist_item(employee.id, "Locker key", "HR", task::Category::Onboarding, None),
    )
    .await
    .unwrap();
    let before = tasks::all(&db).await.unwrap();

    let mut ghost = task.clone();
    ghost.id = 999;
    ghost.name = "Nothing".into();
    assert_eq!(tasks::update(&db, ghost).await.unwrap(), None);
    assert_eq!(tasks::all(&db).await.unwrap(), before);
}

#[tokio::test]
async fn invalid_input_is_rejected_before_insert() {
    let db = test_db().await;
    let mut blank = new_employee("   ");
    blank.operator = Operator::DohaOasis;
    let err = employees::add(&db, blank).await.unwrap_err();
    assert!(matches!(err, HrError::Validation(_)));
    assert_eq!(employees::count(&db).await.unwrap(), 0);

    let err = tasks::add(
        &db,
        NewTask::checklist_item(42, "Orphan", "HR", task::Category::Onboarding, None),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, HrError::NotFound { entity: "employee", id: 42 }));
}

#[tokio::test]
async fn hr_team_excludes_drivers() {
    let db = test_db().await;
    let mut specialist = new_employee("Lamees Ilias");
    specialist.department = employees::HR_DEPARTMENT.into();
    specialist.position = "HR Specialist".into();
    let mut driver = new_employee("Yaser Driver");
    driver.department = employees::HR_DEPARTMENT.into();
    driver.position = "Driver".into();
    employees::add(&db, specialist).await.unwrap();
    employees::add(&db, driver).await.unwrap();
    add_employee(&db, "Ops Person").await;

    let team: Vec<String> = employees::hr_team(&db)
        .await
        .unwrap()
        .into_iter()
        .map(|e| e.name)
        .collect();
    assert_eq!(team, vec!["Lamees Ilias".to_string()]);
}

#[tokio::test]
async fn request_update_keeps_created_at() {
    let db = test_db().await;
    let employee = add_employee(&db, "Maha Saeed").await;
    let request = requests::add(
        &db,
        NewRequest {
            employee_id: employee.id,
            request_type: "Salary Certificate".into(),
            status: hr_request::Status::New,
            description: None,
            assigned_to: Some("Lamees".into()),
        },
    )
    .await
    .unwrap();
    assert_eq!(request.created_at, request.updated_at);

    let mut edited = request.clone();
    edited.status = hr_request::Status::Completed;
    let updated = requests::update(&db, edited).await.unwrap().unwrap();
    assert_eq!(updated.created_at, request.created_at);
    assert!(updated.updated_at >= request.updated_at);
    assert_eq!(updated.status, hr_request::Status::Completed);
}

#[tokio::test]
async fn position_state_machine_rejects_illegal_moves() {
    let db = test_db().await;
    let position = positions::add(
        &db,
        NewPosition {
            title: "Cashier".into(),
            operator: Operator::Kien,
            department: "Retail".into(),
            grade: None,
            description: None,
            hiring_manager: None,
            target_hire_date: None,
            justification: None,
            request_date: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(position.status, position::Status::PendingApproval);
    assert!(position.request_date.is_some());

    let err = positions::fill(&db, position.id, "Rami").await.unwrap_err();
    assert!(matches!(err, HrError::InvalidTransition { .. }));

    let open = positions::approve(&db, position.id).await.unwrap();
    assert_eq!(open.status, position::Status::Open);
    let err = positions::reject(&db, position.id).await.unwrap_err();
    assert!(matches!(err, HrError::InvalidTransition { .. }));

    let filled = positions::fill(&db, position.id, "Rami").await.unwrap();
    assert_eq!(filled.status, position::Status::Filled);
    assert_eq!(filled.filled_by.as_deref(), Some("Rami"));
}

#[tokio::test]
async fn three_toggles_return_to_not_started() {
    let db = test_db().await;
    let employee = add_employee(&db, "Nadia Fares").await;
    let task = tasks::add(
        &db,
        NewTask::checklist_item(employee.id, "Bank account", "HR", task::Category::Onboarding, None),
    )
    .await
    .unwrap();

    let mut statuses = Vec::new();
    for _ in 0..3 {
        statuses.push(tasks::toggle_status(&db, task.id).await.unwrap().status);
    }
    assert_eq!(
        statuses,
        vec![
            task::Status::InProgress,
            task::Status::Done,
            task::Status::NotStarted
        ]
    );

    let err = tasks::toggle_status(&db, 500).await.unwrap_err();
    assert!(matches!(err, HrError::NotFound { entity: "task", .. }));
}
