use std::sync::Arc;

use async_graphql::{Request, Value, Variables};
use migration::{Migrator, MigratorTrait};
use platform_db::{DatabaseSettings, connect};
use products_hr::drafting::{Drafter, DraftingConfig, MISSING_CONFIG_DESCRIPTION};
use serde_json::json;

use super::*;

async fn test_schema() -> SchemaType {
    let pool = connect(&DatabaseSettings::in_memory()).await.unwrap();
    Migrator::up(&pool, None).await.unwrap();
    let drafter = Drafter::from_config(DraftingConfig::default()).unwrap();
    build_schema(GraphqlData {
        pool,
        drafter: Arc::new(drafter),
    })
}

async fn run(schema: &SchemaType, query: &str, vars: serde_json::Value) -> async_graphql::Response {
    schema
        .execute(Request::new(query).variables(Variables::from_json(vars)))
        .await
}

async fn data(schema: &SchemaType, query: &str, vars: serde_json::Value) -> serde_json::Value {
    let response = run(schema, query, vars).await;
    assert!(response.errors.is_empty(), "{:?}", response.errors);
    response.data.into_json().unwrap()
}

fn error_code(response: &async_graphql::Response) -> Option<Value> {
    response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code"))
        .cloned()
}

const ADD_EMPLOYEE: &str = r#"
    mutation($name: String!) {
        hr { addEmployee(input: {name: $name, operator: KIEN, department: "Operations", position: "Staff"}) { id name operator } }
    }
"#;

async fn add_employee(schema: &SchemaType, name: &str) -> i64 {
    let body = data(schema, ADD_EMPLOYEE, json!({ "name": name })).await;
    body["hr"]["addEmployee"]["id"].as_i64().unwrap()
}

#[tokio::test]
async fn employees_are_added_and_filtered() {
    let schema = test_schema().await;
    let first = add_employee(&schema, "Mariam Saleh").await;
    let second = add_employee(&schema, "Omar Farouk").await;
    assert_eq!(second, first + 1);

    let body = data(
        &schema,
        r#"{ hr { employees(filter: {search: "mariam"}) { name operator } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body,
        json!({"hr": {"employees": [{"name": "Mariam Saleh", "operator": "KIEN"}]}})
    );
}

#[tokio::test]
async fn onboarding_initiation_is_idempotent() {
    let schema = test_schema().await;
    let id = add_employee(&schema, "Noor Haddad").await;
    let mutation = r#"
        mutation($id: Int!) {
            hr { initiateOnboarding(employeeId: $id) { record { assignedHrName } tasks { id } } }
        }
    "#;

    let first = data(&schema, mutation, json!({ "id": id })).await;
    let episode = &first["hr"]["initiateOnboarding"];
    assert_eq!(episode["record"]["assignedHrName"], json!("Unassigned"));
    assert_eq!(episode["tasks"].as_array().unwrap().len(), 28);

    let second = data(&schema, mutation, json!({ "id": id })).await;
    assert!(second["hr"]["initiateOnboarding"]["tasks"]
        .as_array()
        .unwrap()
        .is_empty());

    let progress = data(
        &schema,
        r#"query($id: Int!) { hr { employee(id: $id) { progress { total completed percent } } } }"#,
        json!({ "id": id }),
    )
    .await;
    assert_eq!(
        progress["hr"]["employee"]["progress"],
        json!({"total": 28, "completed": 0, "percent": 0})
    );
}

#[tokio::test]
async fn duplicate_separation_reports_conflict() {
    let schema = test_schema().await;
    let id = add_employee(&schema, "Samir Aziz").await;
    let mutation = r#"
        mutation($id: Int!) { hr { initiateSeparation(employeeId: $id, assignedHrName: "Lamees") { tasks { id } } } }
    "#;
    let first = data(&schema, mutation, json!({ "id": id })).await;
    assert_eq!(
        first["hr"]["initiateSeparation"]["tasks"]
            .as_array()
            .unwrap()
            .len(),
        14
    );

    let second = run(&schema, mutation, json!({ "id": id })).await;
    assert_eq!(error_code(&second), Some(Value::from("CONFLICT")));
}

#[tokio::test]
async fn unknown_employee_is_not_found() {
    let schema = test_schema().await;
    let response = run(
        &schema,
        r#"mutation { hr { initiateOnboarding(employeeId: 999) { record { id } } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(error_code(&response), Some(Value::from("NOT_FOUND")));
}

#[tokio::test]
async fn position_workflow_enforces_transitions() {
    let schema = test_schema().await;
    let body = data(
        &schema,
        r#"mutation {
            hr { requestPosition(input: {title: "Driver", operator: DOHA_OASIS, department: "Logistics"}) { id status } }
        }"#,
        json!({}),
    )
    .await;
    let id = body["hr"]["requestPosition"]["id"].as_i64().unwrap();
    assert_eq!(body["hr"]["requestPosition"]["status"], json!("PENDING_APPROVAL"));

    let fill = r#"mutation($id: Int!) { hr { fillPosition(id: $id, candidate: "Ali") { status filledBy } } }"#;
    let early = run(&schema, fill, json!({ "id": id })).await;
    assert_eq!(error_code(&early), Some(Value::from("CONFLICT")));

    data(
        &schema,
        r#"mutation($id: Int!) { hr { approvePosition(id: $id) { status } } }"#,
        json!({ "id": id }),
    )
    .await;
    let filled = data(&schema, fill, json!({ "id": id })).await;
    assert_eq!(
        filled["hr"]["fillPosition"],
        json!({"status": "FILLED", "filledBy": "Ali"})
    );

    let pending = data(
        &schema,
        r#"{ hr { positions(filter: {pendingOnly: true}) { id } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(pending["hr"]["positions"], json!([]));
}

#[tokio::test]
async fn task_toggle_cycles_through_statuses() {
    let schema = test_schema().await;
    let id = add_employee(&schema, "Huda Karim").await;
    let body = data(
        &schema,
        r#"mutation($id: Int!) { hr { addTask(input: {employeeId: $id, name: "Issue badge"}) { id status owner category } } }"#,
        json!({ "id": id }),
    )
    .await;
    let task = &body["hr"]["addTask"];
    assert_eq!(task["owner"], json!("HR"));
    assert_eq!(task["category"], json!("ONBOARDING"));

    let toggle = r#"mutation($id: Int!) { hr { toggleTaskStatus(id: $id) { status } } }"#;
    let mut seen = Vec::new();
    for _ in 0..3 {
        let body = data(&schema, toggle, json!({ "id": task["id"] })).await;
        seen.push(body["hr"]["toggleTaskStatus"]["status"].clone());
    }
    assert_eq!(seen, vec![json!("IN_PROGRESS"), json!("DONE"), json!("NOT_STARTED")]);
}

#[tokio::test]
async fn update_of_unknown_request_returns_null() {
    let schema = test_schema().await;
    let body = data(
        &schema,
        r#"mutation { hr { updateRequest(input: {id: 42, status: COMPLETED}) { id } } }"#,
        json!({}),
    )
    .await;
    assert_eq!(body, json!({"hr": {"updateRequest": null}}));
}

#[tokio::test]
async fn other_request_type_uses_custom_text() {
    let schema = test_schema().await;
    let id = add_employee(&schema, "Rania Odeh").await;
    let body = data(
        &schema,
        r#"mutation($id: Int!) {
            hr { addRequest(input: {employeeId: $id, requestType: "Other", customType: "Parking permit"}) { requestType status } }
        }"#,
        json!({ "id": id }),
    )
    .await;
    assert_eq!(
        body["hr"]["addRequest"],
        json!({"requestType": "Parking permit", "status": "NEW"})
    );

    let stats = data(&schema, "{ hr { stats { pendingRequests totalEmployees } } }", json!({})).await;
    assert_eq!(
        stats["hr"]["stats"],
        json!({"pendingRequests": 1, "totalEmployees": 1})
    );
}

#[tokio::test]
async fn drafting_without_credentials_returns_fallback() {
    let schema = test_schema().await;
    let body = data(
        &schema,
        r#"mutation { hr { draftJobDescription(title: "Cashier", department: "Retail", operator: KIEN) } }"#,
        json!({}),
    )
    .await;
    assert_eq!(
        body["hr"]["draftJobDescription"],
        json!(MISSING_CONFIG_DESCRIPTION)
    );
}

#[tokio::test]
async fn schema_exposes_hr_namespaces() {
    let sdl = test_schema().await.sdl();
    assert!(sdl.contains("hr: HrQuery!"));
    assert!(sdl.contains("hr: HrMutation!"));
    assert!(sdl.contains("enum TaskCategory"));
}
