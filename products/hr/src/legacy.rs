//! Import and export of the browser-storage snapshot layout: seven JSON arrays
//! keyed by their storage keys.

use std::collections::HashSet;

use chrono::{DateTime, FixedOffset, NaiveDate, SecondsFormat, Utc};
use entity::{
    SCHEMA_VERSION, employee, employee::Operator, hr_request, onboarding_record,
    performance_record, position, separation_record, task, task::Category,
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DatabaseBackend, DatabaseConnection,
    EntityTrait, PaginatorTrait, Statement, TransactionTrait,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{HrError, HrResult};
use crate::repo::performance::check_year;
use crate::views::Snapshot;

const INSERT_CHUNK: usize = 100;
const PERFORMANCE_NAME_SEPARATOR: &str = " - ";

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LegacySnapshot {
    #[serde(rename = "do_positions_v3", default)]
    pub positions: Vec<LegacyPosition>,
    #[serde(rename = "do_employees_v5", default)]
    pub employees: Vec<LegacyEmployee>,
    #[serde(rename = "do_tasks_v3", default)]
    pub tasks: Vec<LegacyTask>,
    #[serde(rename = "do_requests", default)]
    pub requests: Vec<LegacyRequest>,
    #[serde(rename = "do_separations", default)]
    pub separations: Vec<LegacySeparation>,
    #[serde(rename = "do_onboardings_v2", default)]
    pub onboardings: Vec<LegacyOnboarding>,
    #[serde(rename = "do_performance", default)]
    pub performance: Vec<LegacyPerformance>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyPosition {
    pub id: i32,
    pub title: String,
    pub operator: Operator,
    pub department: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    pub status: position::Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hiring_manager: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_hire_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub justification: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filled_by: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyEmployee {
    pub id: i32,
    pub name: String,
    pub operator: Operator,
    pub department: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_joined: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyTask {
    pub id: i32,
    pub employee_id: i32,
    pub name: String,
    pub owner: String,
    pub status: task::Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyRequest {
    pub id: i32,
    pub employee_id: i32,
    pub request_type: String,
    pub status: hr_request::Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacySeparation {
    pub id: i32,
    pub employee_id: i32,
    pub assigned_hr_name: String,
    pub final_settlement_received: bool,
    pub initiated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyOnboarding {
    pub id: i32,
    pub employee_id: i32,
    pub assigned_hr_name: String,
    #[serde(default)]
    pub comments: String,
    pub initiated_at: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LegacyPerformance {
    pub id: i32,
    pub employee_id: i32,
    pub year: String,
    pub assigned_reviewer: String,
    pub initiated_at: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub employees: usize,
    pub positions: usize,
    pub tasks: usize,
    pub requests: usize,
    pub onboardings: usize,
    pub separations: usize,
    pub performance: usize,
    /// Rows left out because the store cannot hold them.
    pub skipped: usize,
}

fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_date(field: &str, value: Option<String>) -> HrResult<Option<NaiveDate>> {
    let Some(raw) = blank_to_none(value) else {
        return Ok(None);
    };
    let day = raw.trim().get(..10).unwrap_or(raw.trim());
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .map(Some)
        .map_err(|_| HrError::Seed(format!("{field}: invalid date {raw:?}")))
}

fn parse_timestamp(field: &str, raw: &str) -> HrResult<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map_err(|_| HrError::Seed(format!("{field}: invalid timestamp {raw:?}")))
}

fn format_date(date: Option<NaiveDate>) -> Option<String> {
    date.map(|d| d.format("%Y-%m-%d").to_string())
}

fn format_timestamp(at: DateTime<FixedOffset>) -> String {
    at.with_timezone(&Utc)
        .to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Splits `"2025 - Mid Review"` into `(Some(2025), "Mid Review")`. Names
/// without a leading year are kept whole.
pub fn split_performance_name(name: &str) -> (Option<i32>, String) {
    if let Some((prefix, stage)) = name.split_once(PERFORMANCE_NAME_SEPARATOR) {
        let prefix = prefix.trim();
        if prefix.len() == 4 && prefix.chars().all(|c| c.is_ascii_digit()) {
            if let Ok(year) = prefix.parse() {
                return (Some(year), stage.trim().to_string());
            }
        }
    }
    (None, name.to_string())
}

pub fn join_performance_name(year: Option<i32>, stage: &str) -> String {
    match year {
        Some(year) => format!("{year}{PERFORMANCE_NAME_SEPARATOR}{stage}"),
        None => stage.to_string(),
    }
}

async fn insert_chunked<A, C>(db: &C, rows: Vec<A>) -> HrResult<()>
where
    A: ActiveModelTrait + Send,
    C: ConnectionTrait,
{
    let mut rows = rows.into_iter().peekable();
    while rows.peek().is_some() {
        let batch: Vec<A> = rows.by_ref().take(INSERT_CHUNK).collect();
        <A::Entity as EntityTrait>::insert_many(batch).exec(db).await?;
    }
    Ok(())
}

async fn store_is_empty<C>(db: &C) -> HrResult<bool>
where
    C: ConnectionTrait,
{
    Ok(employee::Entity::find().count(db).await? == 0
        && position::Entity::find().count(db).await? == 0
        && task::Entity::find().count(db).await? == 0
        && hr_request::Entity::find().count(db).await? == 0
        && onboarding_record::Entity::find().count(db).await? == 0
        && separation_record::Entity::find().count(db).await? == 0
        && performance_record::Entity::find().count(db).await? == 0)
}

/// Postgres sequences do not advance on explicit ids.
async fn resync_sequences<C>(db: &C) -> HrResult<()>
where
    C: ConnectionTrait,
{
    if db.get_database_backend() != DatabaseBackend::Postgres {
        return Ok(());
    }
    for table in [
        "employee",
        "position",
        "task",
        "hr_request",
        "onboarding_record",
        "separation_record",
        "performance_record",
    ] {
        let sql = format!(
            "SELECT setval(pg_get_serial_sequence('\"{table}\"', 'id'), COALESCE(MAX(id), 0) + 1, false) FROM \"{table}\""
        );
        db.execute(Statement::from_string(DatabaseBackend::Postgres, sql))
            .await?;
    }
    Ok(())
}

impl LegacySnapshot {
    fn row_count(&self) -> usize {
        self.positions.len()
            + self.employees.len()
            + self.tasks.len()
            + self.requests.len()
            + self.separations.len()
            + self.onboardings.len()
            + self.performance.len()
    }
}

/// Drops rows that reference an employee absent from the snapshot, process
/// records after the first per employee (per employee and year for reviews)
/// and reviews dated outside the accepted year range. Returns how many rows
/// were dropped.
fn prune_unstorable(snapshot: &mut LegacySnapshot) -> usize {
    let before = snapshot.row_count();
    let known: HashSet<i32> = snapshot.employees.iter().map(|e| e.id).collect();

    snapshot.tasks.retain(|t| known.contains(&t.employee_id));
    snapshot.requests.retain(|r| known.contains(&r.employee_id));

    let mut seen = HashSet::new();
    snapshot
        .onboardings
        .retain(|r| known.contains(&r.employee_id) && seen.insert(r.employee_id));
    let mut seen = HashSet::new();
    snapshot
        .separations
        .retain(|r| known.contains(&r.employee_id) && seen.insert(r.employee_id));
    let mut seen = HashSet::new();
    snapshot.performance.retain(|r| {
        if !known.contains(&r.employee_id) {
            return false;
        }
        // unparseable years fall through to the import's own error
        match r.year.trim().parse::<i32>() {
            Ok(year) => check_year(year).is_ok() && seen.insert((r.employee_id, year)),
            Err(_) => true,
        }
    });

    before - snapshot.row_count()
}

/// Loads a snapshot into an empty store in one transaction, keeping ids.
///
/// Rows the store cannot hold are skipped and counted in
/// [`ImportSummary::skipped`].
pub async fn import_snapshot(
    db: &DatabaseConnection,
    mut snapshot: LegacySnapshot,
) -> HrResult<ImportSummary> {
    let txn = db.begin().await?;
    if !store_is_empty(&txn).await? {
        return Err(HrError::conflict("import requires an empty store"));
    }

    let skipped = prune_unstorable(&mut snapshot);
    if skipped > 0 {
        warn!(skipped, "legacy snapshot rows skipped on import");
    }

    let summary = ImportSummary {
        employees: snapshot.employees.len(),
        positions: snapshot.positions.len(),
        tasks: snapshot.tasks.len(),
        requests: snapshot.requests.len(),
        onboardings: snapshot.onboardings.len(),
        separations: snapshot.separations.len(),
        performance: snapshot.performance.len(),
        skipped,
    };

    let employees = snapshot
        .employees
        .into_iter()
        .map(|e| {
            Ok(employee::ActiveModel {
                id: Set(e.id),
                name: Set(e.name),
                operator: Set(e.operator),
                department: Set(e.department),
                position: Set(e.position),
                grade: Set(blank_to_none(e.grade)),
                date_joined: Set(parse_date("date_joined", e.date_joined)?),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, employees).await?;

    let positions = snapshot
        .positions
        .into_iter()
        .map(|p| {
            Ok(position::ActiveModel {
                id: Set(p.id),
                title: Set(p.title),
                operator: Set(p.operator),
                department: Set(p.department),
                grade: Set(blank_to_none(p.grade)),
                status: Set(p.status),
                description: Set(blank_to_none(p.description)),
                hiring_manager: Set(blank_to_none(p.hiring_manager)),
                target_hire_date: Set(parse_date("target_hire_date", p.target_hire_date)?),
                justification: Set(blank_to_none(p.justification)),
                request_date: Set(parse_date("request_date", p.request_date)?),
                filled_by: Set(blank_to_none(p.filled_by)),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, positions).await?;

    let tasks = snapshot
        .tasks
        .into_iter()
        .map(|t| {
            let category = t.category.unwrap_or_default();
            let (year, name) = match category {
                Category::Performance => split_performance_name(&t.name),
                Category::Onboarding | Category::Separation => (None, t.name),
            };
            Ok(task::ActiveModel {
                id: Set(t.id),
                employee_id: Set(t.employee_id),
                name: Set(name),
                owner: Set(t.owner),
                status: Set(t.status),
                due_date: Set(parse_date("due_date", t.due_date)?),
                comments: Set(blank_to_none(t.comments)),
                category: Set(category),
                year: Set(year),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, tasks).await?;

    let requests = snapshot
        .requests
        .into_iter()
        .map(|r| {
            Ok(hr_request::ActiveModel {
                id: Set(r.id),
                employee_id: Set(r.employee_id),
                request_type: Set(r.request_type),
                status: Set(r.status),
                description: Set(blank_to_none(r.description)),
                assigned_to: Set(blank_to_none(r.assigned_to)),
                created_at: Set(parse_timestamp("created_at", &r.created_at)?),
                updated_at: Set(parse_timestamp("updated_at", &r.updated_at)?),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, requests).await?;

    let onboardings = snapshot
        .onboardings
        .into_iter()
        .map(|r| {
            Ok(onboarding_record::ActiveModel {
                id: Set(r.id),
                employee_id: Set(r.employee_id),
                assigned_hr_name: Set(r.assigned_hr_name),
                comments: Set(r.comments),
                initiated_at: Set(parse_timestamp("initiated_at", &r.initiated_at)?),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, onboardings).await?;

    let separations = snapshot
        .separations
        .into_iter()
        .map(|r| {
            Ok(separation_record::ActiveModel {
                id: Set(r.id),
                employee_id: Set(r.employee_id),
                assigned_hr_name: Set(r.assigned_hr_name),
                final_settlement_received: Set(r.final_settlement_received),
                initiated_at: Set(parse_timestamp("initiated_at", &r.initiated_at)?),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, separations).await?;

    let performance = snapshot
        .performance
        .into_iter()
        .map(|r| {
            let year = r
                .year
                .trim()
                .parse::<i32>()
                .map_err(|_| HrError::Seed(format!("year: invalid value {:?}", r.year)))?;
            Ok(performance_record::ActiveModel {
                id: Set(r.id),
                employee_id: Set(r.employee_id),
                year: Set(year),
                assigned_reviewer: Set(r.assigned_reviewer),
                initiated_at: Set(parse_timestamp("initiated_at", &r.initiated_at)?),
                comments: Set(blank_to_none(r.comments)),
                schema_version: Set(SCHEMA_VERSION),
            })
        })
        .collect::<HrResult<Vec<_>>>()?;
    insert_chunked(&txn, performance).await?;

    resync_sequences(&txn).await?;
    txn.commit().await?;
    info!(
        employees = summary.employees,
        tasks = summary.tasks,
        requests = summary.requests,
        skipped = summary.skipped,
        "legacy snapshot imported"
    );
    Ok(summary)
}

/// Reads the whole store back into the snapshot layout.
pub async fn export_snapshot(db: &DatabaseConnection) -> HrResult<LegacySnapshot> {
    Ok(to_legacy(Snapshot::load(db).await?))
}

pub fn to_legacy(snapshot: Snapshot) -> LegacySnapshot {
    LegacySnapshot {
        positions: snapshot
            .positions
            .into_iter()
            .map(|p| LegacyPosition {
                id: p.id,
                title: p.title,
                operator: p.operator,
                department: p.department,
                grade: p.grade,
                status: p.status,
                description: p.description,
                hiring_manager: p.hiring_manager,
                target_hire_date: format_date(p.target_hire_date),
                justification: p.justification,
                request_date: format_date(p.request_date),
                filled_by: p.filled_by,
            })
            .collect(),
        employees: snapshot
            .employees
            .into_iter()
            .map(|e| LegacyEmployee {
                id: e.id,
                name: e.name,
                operator: e.operator,
                department: e.department,
                position: e.position,
                grade: e.grade,
                date_joined: format_date(e.date_joined),
            })
            .collect(),
        tasks: snapshot
            .tasks
            .into_iter()
            .map(|t| LegacyTask {
                id: t.id,
                employee_id: t.employee_id,
                name: match t.category {
                    Category::Performance => join_performance_name(t.year, &t.name),
                    Category::Onboarding | Category::Separation => t.name,
                },
                owner: t.owner,
                status: t.status,
                due_date: format_date(t.due_date),
                comments: t.comments,
                category: Some(t.category),
            })
            .collect(),
        requests: snapshot
            .requests
            .into_iter()
            .map(|r| LegacyRequest {
                id: r.id,
                employee_id: r.employee_id,
                request_type: r.request_type,
                status: r.status,
                description: r.description,
                assigned_to: r.assigned_to,
                created_at: format_timestamp(r.created_at),
                updated_at: format_timestamp(r.updated_at),
            })
            .collect(),
        separations: snapshot
            .separations
            .into_iter()
            .map(|r| LegacySeparation {
                id: r.id,
                employee_id: r.employee_id,
                assigned_hr_name: r.assigned_hr_name,
                final_settlement_received: r.final_settlement_received,
                initiated_at: format_timestamp(r.initiated_at),
            })
            .collect(),
        onboardings: snapshot
            .onboardings
            .into_iter()
            .map(|r| LegacyOnboarding {
                id: r.id,
                employee_id: r.employee_id,
                assigned_hr_name: r.assigned_hr_name,
                comments: r.comments,
                initiated_at: format_timestamp(r.initiated_at),
            })
            .collect(),
        performance: snapshot
            .performance
            .into_iter()
            .map(|r| LegacyPerformance {
                id: r.id,
                employee_id: r.employee_id,
                year: r.year.to_string(),
                assigned_reviewer: r.assigned_reviewer,
                initiated_at: format_timestamp(r.initiated_at),
                comments: r.comments,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn performance_names_split_on_leading_year() {
        assert_eq!(
            split_performance_name("2025 - Mid Review"),
            (Some(2025), "Mid Review".to_string())
        );
        assert_eq!(
            split_performance_name("Objective Setting"),
            (None, "Objective Setting".to_string())
        );
        assert_eq!(
            split_performance_name("Q3 - Final Review"),
            (None, "Q3 - Final Review".to_string())
        );
        assert_eq!(join_performance_name(Some(2024), "Final Review"), "2024 - Final Review");
    }

    #[test]
    fn snapshot_reads_storage_keys_and_optional_fields() {
        let raw = json!({
            "do_employees_v5": [
                {"id": 1, "name": "Amal", "operator": "Doha Oasis", "department": "Kitchen",
                 "position": "Chef", "grade": "", "date_joined": "2023-01-01"}
            ],
            "do_tasks_v3": [
                {"id": 4, "employee_id": 1, "name": "Laundry", "owner": "HR",
                 "status": "In Progress"}
            ],
            "do_performance": [
                {"id": 2, "employee_id": 1, "year": "2025", "assigned_reviewer": "Sarab",
                 "initiated_at": "2025-02-01T09:30:00.000Z"}
            ]
        });
        let snapshot: LegacySnapshot = serde_json::from_value(raw).unwrap();
        assert_eq!(snapshot.employees[0].operator, Operator::DohaOasis);
        assert_eq!(snapshot.tasks[0].category, None);
        assert_eq!(snapshot.tasks[0].status, task::Status::InProgress);
        assert!(snapshot.positions.is_empty());
        assert_eq!(blank_to_none(snapshot.employees[0].grade.clone()), None);
    }

    #[test]
    fn dates_accept_plain_days_and_iso_timestamps() {
        assert_eq!(
            parse_date("d", Some("2024-05-06".into())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
        assert_eq!(
            parse_date("d", Some("2024-05-06T10:00:00.000Z".into())).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 6)
        );
        assert_eq!(parse_date("d", Some(" ".into())).unwrap(), None);
        assert!(matches!(
            parse_date("d", Some("06/05/2024".into())),
            Err(HrError::Seed(_))
        ));
        let at = parse_timestamp("t", "2025-02-01T09:30:00.000Z").unwrap();
        assert_eq!(format_timestamp(at), "2025-02-01T09:30:00Z");
    }
}
