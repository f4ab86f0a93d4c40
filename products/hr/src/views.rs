//! Derived views over a snapshot of the store. Everything here is recomputed
//! on each call; nothing is cached.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use entity::{
    employee, employee::Operator, hr_request, onboarding_record, performance_record, position,
    separation_record, task, task::Category,
};
use sea_orm::{
    AccessMode, ConnectionTrait, DatabaseBackend, DatabaseConnection, DatabaseTransaction,
    IsolationLevel, TransactionTrait,
};

use crate::error::HrResult;
use crate::process::UNASSIGNED;
use crate::repo;

/// Every table, read once.
#[derive(Clone, Debug, Default)]
pub struct Snapshot {
    pub employees: Vec<employee::Model>,
    pub positions: Vec<position::Model>,
    pub tasks: Vec<task::Model>,
    pub requests: Vec<hr_request::Model>,
    pub onboardings: Vec<onboarding_record::Model>,
    pub separations: Vec<separation_record::Model>,
    pub performance: Vec<performance_record::Model>,
}

impl Snapshot {
    /// Reads every table inside one read transaction so the tables agree
    /// with each other even while writers are active.
    pub async fn load(db: &DatabaseConnection) -> HrResult<Self> {
        let txn = read_transaction(db).await?;
        let snapshot = Self {
            employees: repo::employees::all(&txn).await?,
            positions: repo::positions::all(&txn).await?,
            tasks: repo::tasks::all(&txn).await?,
            requests: repo::requests::all(&txn).await?,
            onboardings: repo::onboardings::all(&txn).await?,
            separations: repo::separations::all(&txn).await?,
            performance: repo::performance::all(&txn).await?,
        };
        txn.commit().await?;
        Ok(snapshot)
    }

    fn employee_names(&self) -> HashMap<i32, &str> {
        self.employees
            .iter()
            .map(|e| (e.id, e.name.as_str()))
            .collect()
    }
}

// Reads inside a SQLite transaction already share one snapshot, and the
// driver ignores isolation settings there.
async fn read_transaction(db: &DatabaseConnection) -> HrResult<DatabaseTransaction> {
    let txn = match db.get_database_backend() {
        DatabaseBackend::Postgres => {
            db.begin_with_config(
                Some(IsolationLevel::RepeatableRead),
                Some(AccessMode::ReadOnly),
            )
            .await?
        }
        _ => db.begin().await?,
    };
    Ok(txn)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_employees: usize,
    pub open_positions: usize,
    pub pending_requests: usize,
    pub onboarding_active: usize,
    pub separation_active: usize,
    pub performance_active: usize,
}

/// Headline counters. A process is active for an employee while at least one
/// of their tasks in that category is not Done.
pub fn stats(snapshot: &Snapshot) -> DashboardStats {
    let active = |category: Category| {
        snapshot
            .tasks
            .iter()
            .filter(|t| t.category == category && t.status != task::Status::Done)
            .map(|t| t.employee_id)
            .collect::<BTreeSet<_>>()
            .len()
    };
    DashboardStats {
        total_employees: snapshot.employees.len(),
        open_positions: snapshot
            .positions
            .iter()
            .filter(|p| p.status == position::Status::Open)
            .count(),
        pending_requests: snapshot
            .requests
            .iter()
            .filter(|r| r.status.is_pending())
            .count(),
        onboarding_active: active(Category::Onboarding),
        separation_active: active(Category::Separation),
        performance_active: active(Category::Performance),
    }
}

/// `round(100 * done / total)` with halves rounded up; 0 for no tasks.
pub fn progress_percent(done: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((200 * done + total) / (2 * total)) as u32
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Progress {
    pub total: usize,
    pub completed: usize,
    pub percent: u32,
}

impl Progress {
    fn of<'a>(tasks: impl Iterator<Item = &'a task::Model>) -> Self {
        let (total, completed) = tasks.fold((0, 0), |(total, done), t| {
            (total + 1, done + usize::from(t.status == task::Status::Done))
        });
        Self {
            total,
            completed,
            percent: progress_percent(completed, total),
        }
    }
}

pub fn employee_progress(tasks: &[task::Model], employee_id: i32, category: Category) -> Progress {
    Progress::of(
        tasks
            .iter()
            .filter(|t| t.employee_id == employee_id && t.category == category),
    )
}

pub fn performance_progress(tasks: &[task::Model], employee_id: i32, year: i32) -> Progress {
    Progress::of(tasks.iter().filter(|t| {
        t.employee_id == employee_id
            && t.category == Category::Performance
            && t.year == Some(year)
    }))
}

#[derive(Clone, Debug, Default)]
pub struct TaskPartition {
    pub onboarding: Vec<task::Model>,
    pub separation: Vec<task::Model>,
    pub performance: Vec<task::Model>,
}

/// Splits tasks into the three category views; each task lands in exactly one.
pub fn partition_tasks(tasks: Vec<task::Model>) -> TaskPartition {
    let mut partition = TaskPartition::default();
    for t in tasks {
        match t.category {
            Category::Onboarding => partition.onboarding.push(t),
            Category::Separation => partition.separation.push(t),
            Category::Performance => partition.performance.push(t),
        }
    }
    partition
}

/// Name shown for an employee id, `ID: <id>` when the employee is unknown.
pub fn display_name(names: &HashMap<i32, &str>, employee_id: i32) -> String {
    names
        .get(&employee_id)
        .map(|name| name.to_string())
        .unwrap_or_else(|| format!("ID: {employee_id}"))
}

/// Lead shown for a process, `Unassigned` when no record names one.
pub fn lead_name(lead: Option<&str>) -> String {
    lead.filter(|l| !l.trim().is_empty())
        .unwrap_or(UNASSIGNED)
        .to_string()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProcessSummary {
    pub employee_id: i32,
    pub employee_name: String,
    pub lead: String,
    /// Set for performance summaries only.
    pub year: Option<i32>,
    pub progress: Progress,
}

/// One row per employee (per employee and year for performance) with tasks in
/// `category`, limited to processes that are not yet complete.
pub fn process_summaries(snapshot: &Snapshot, category: Category) -> Vec<ProcessSummary> {
    let names = snapshot.employee_names();
    let mut groups: BTreeMap<(i32, Option<i32>), Vec<&task::Model>> = BTreeMap::new();
    for t in snapshot.tasks.iter().filter(|t| t.category == category) {
        let year = match category {
            Category::Performance => t.year,
            Category::Onboarding | Category::Separation => None,
        };
        groups.entry((t.employee_id, year)).or_default().push(t);
    }

    groups
        .into_iter()
        .map(|((employee_id, year), tasks)| {
            let lead = match category {
                Category::Onboarding => snapshot
                    .onboardings
                    .iter()
                    .find(|r| r.employee_id == employee_id)
                    .map(|r| r.assigned_hr_name.as_str()),
                Category::Separation => snapshot
                    .separations
                    .iter()
                    .find(|r| r.employee_id == employee_id)
                    .map(|r| r.assigned_hr_name.as_str()),
                Category::Performance => snapshot
                    .performance
                    .iter()
                    .find(|r| r.employee_id == employee_id && Some(r.year) == year)
                    .map(|r| r.assigned_reviewer.as_str()),
            };
            ProcessSummary {
                employee_id,
                employee_name: display_name(&names, employee_id),
                lead: lead_name(lead),
                year,
                progress: Progress::of(tasks.into_iter()),
            }
        })
        .filter(|summary| summary.progress.percent < 100)
        .collect()
}

#[derive(Clone, Debug)]
pub struct Dashboard {
    pub stats: DashboardStats,
    pub onboarding: Vec<ProcessSummary>,
    pub separation: Vec<ProcessSummary>,
    /// Newest first.
    pub recent_requests: Vec<hr_request::Model>,
    /// Newest first.
    pub performance_tasks: Vec<task::Model>,
}

pub fn dashboard(snapshot: &Snapshot) -> Dashboard {
    let mut recent_requests = snapshot.requests.clone();
    recent_requests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

    let mut performance_tasks: Vec<_> = snapshot
        .tasks
        .iter()
        .filter(|t| t.category == Category::Performance)
        .cloned()
        .collect();
    performance_tasks.sort_by(|a, b| b.id.cmp(&a.id));

    Dashboard {
        stats: stats(snapshot),
        onboarding: process_summaries(snapshot, Category::Onboarding),
        separation: process_summaries(snapshot, Category::Separation),
        recent_requests,
        performance_tasks,
    }
}

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

fn normalized_search(search: &Option<String>) -> Option<String> {
    search
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

/// Employee directory filter: case-insensitive search over name and
/// department, optionally limited to one operator.
#[derive(Clone, Debug, Default)]
pub struct EmployeeFilter {
    pub search: Option<String>,
    pub operator: Option<Operator>,
}

impl EmployeeFilter {
    pub fn apply(&self, employees: Vec<employee::Model>) -> Vec<employee::Model> {
        let needle = normalized_search(&self.search);
        employees
            .into_iter()
            .filter(|e| self.operator.is_none_or(|op| e.operator == op))
            .filter(|e| {
                needle.as_deref().is_none_or(|n| {
                    contains_folded(&e.name, n) || contains_folded(&e.department, n)
                })
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RequestStatusFilter {
    #[default]
    All,
    /// New or In Progress.
    Pending,
    /// Completed or Rejected.
    History,
}

#[derive(Clone, Debug, Default)]
pub struct RequestFilter {
    pub search: Option<String>,
    pub assignee: Option<String>,
    pub status: RequestStatusFilter,
}

impl RequestFilter {
    /// Search covers request type, employee name and assignee.
    pub fn apply(
        &self,
        requests: Vec<hr_request::Model>,
        employees: &[employee::Model],
    ) -> Vec<hr_request::Model> {
        let names: HashMap<i32, &str> = employees.iter().map(|e| (e.id, e.name.as_str())).collect();
        let needle = normalized_search(&self.search);
        let assignee = self
            .assignee
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty());
        requests
            .into_iter()
            .filter(|r| match self.status {
                RequestStatusFilter::All => true,
                RequestStatusFilter::Pending => r.status.is_pending(),
                RequestStatusFilter::History => !r.status.is_pending(),
            })
            .filter(|r| assignee.is_none_or(|a| r.assigned_to.as_deref() == Some(a)))
            .filter(|r| {
                needle.as_deref().is_none_or(|n| {
                    contains_folded(&r.request_type, n)
                        || names
                            .get(&r.employee_id)
                            .is_some_and(|name| contains_folded(name, n))
                        || r
                            .assigned_to
                            .as_deref()
                            .is_some_and(|a| contains_folded(a, n))
                })
            })
            .collect()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PositionFilter {
    #[default]
    All,
    /// Awaiting approval.
    Pending,
    Status(position::Status),
}

impl PositionFilter {
    pub fn apply(&self, positions: Vec<position::Model>) -> Vec<position::Model> {
        positions
            .into_iter()
            .filter(|p| match self {
                PositionFilter::All => true,
                PositionFilter::Pending => p.status == position::Status::PendingApproval,
                PositionFilter::Status(status) => p.status == *status,
            })
            .collect()
    }
}

/// Employees listed on a process page: those with tasks in the category, plus
/// those holding a separation or performance record.
pub fn active_process_employees(snapshot: &Snapshot, category: Category) -> Vec<employee::Model> {
    let mut ids: BTreeSet<i32> = snapshot
        .tasks
        .iter()
        .filter(|t| t.category == category)
        .map(|t| t.employee_id)
        .collect();
    match category {
        Category::Onboarding => {}
        Category::Separation => ids.extend(snapshot.separations.iter().map(|r| r.employee_id)),
        Category::Performance => ids.extend(snapshot.performance.iter().map(|r| r.employee_id)),
    }
    snapshot
        .employees
        .iter()
        .filter(|e| ids.contains(&e.id))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn employee(id: i32, name: &str, department: &str, operator: Operator) -> employee::Model {
        employee::Model {
            id,
            name: name.into(),
            operator,
            department: department.into(),
            position: "Staff".into(),
            grade: None,
            date_joined: None,
            schema_version: 1,
        }
    }

    fn task(id: i32, employee_id: i32, category: Category, status: task::Status) -> task::Model {
        task::Model {
            id,
            employee_id,
            name: format!("task {id}"),
            owner: "HR".into(),
            status,
            due_date: None,
            comments: None,
            category,
            year: (category == Category::Performance).then_some(2025),
            schema_version: 1,
        }
    }

    fn request(
        id: i32,
        employee_id: i32,
        kind: &str,
        status: hr_request::Status,
        assigned_to: Option<&str>,
        hour: u32,
    ) -> hr_request::Model {
        let at = Utc
            .with_ymd_and_hms(2025, 3, 1, hour, 0, 0)
            .unwrap()
            .fixed_offset();
        hr_request::Model {
            id,
            employee_id,
            request_type: kind.into(),
            status,
            description: None,
            assigned_to: assigned_to.map(str::to_string),
            created_at: at,
            updated_at: at,
            schema_version: 1,
        }
    }

    #[test]
    fn progress_rounds_half_up() {
        assert_eq!(progress_percent(3, 7), 43);
        assert_eq!(progress_percent(1, 8), 13);
        assert_eq!(progress_percent(1, 3), 33);
        assert_eq!(progress_percent(2, 3), 67);
        assert_eq!(progress_percent(4, 4), 100);
        assert_eq!(progress_percent(0, 0), 0);
    }

    #[test]
    fn stats_count_employees_with_open_tasks() {
        use task::Status::*;
        let snapshot = Snapshot {
            employees: vec![
                employee(1, "A", "Kitchen", Operator::Kien),
                employee(2, "B", "Kitchen", Operator::Kien),
            ],
            tasks: vec![
                task(1, 1, Category::Onboarding, Done),
                task(2, 1, Category::Onboarding, NotStarted),
                task(3, 1, Category::Onboarding, InProgress),
                task(4, 2, Category::Separation, Done),
                task(5, 2, Category::Separation, Done),
            ],
            requests: vec![
                request(1, 1, "Sim Card", hr_request::Status::New, None, 8),
                request(2, 1, "NOC", hr_request::Status::InProgress, None, 9),
                request(3, 2, "EOS", hr_request::Status::Completed, None, 10),
            ],
            ..Snapshot::default()
        };
        let stats = stats(&snapshot);
        assert_eq!(stats.total_employees, 2);
        assert_eq!(stats.onboarding_active, 1);
        assert_eq!(stats.separation_active, 0);
        assert_eq!(stats.performance_active, 0);
        assert_eq!(stats.pending_requests, 2);
    }

    #[test]
    fn partition_puts_each_task_in_one_view() {
        use task::Status::NotStarted;
        let tasks = vec![
            task(1, 1, Category::Onboarding, NotStarted),
            task(2, 1, Category::Performance, NotStarted),
            task(3, 2, Category::Separation, NotStarted),
            task(4, 2, Category::Onboarding, NotStarted),
        ];
        let partition = partition_tasks(tasks.clone());
        assert_eq!(partition.onboarding.len(), 2);
        assert_eq!(partition.separation.len(), 1);
        assert_eq!(partition.performance.len(), 1);
        let mut ids: Vec<i32> = partition
            .onboarding
            .iter()
            .chain(&partition.separation)
            .chain(&partition.performance)
            .map(|t| t.id)
            .collect();
        ids.sort();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn summaries_fall_back_and_skip_finished_processes() {
        use task::Status::*;
        let snapshot = Snapshot {
            employees: vec![employee(1, "Amal", "Kitchen", Operator::DohaOasis)],
            tasks: vec![
                task(1, 1, Category::Onboarding, Done),
                task(2, 1, Category::Onboarding, NotStarted),
                task(3, 9, Category::Onboarding, NotStarted),
                task(4, 1, Category::Separation, Done),
            ],
            ..Snapshot::default()
        };
        let onboarding = process_summaries(&snapshot, Category::Onboarding);
        assert_eq!(onboarding.len(), 2);
        assert_eq!(onboarding[0].employee_name, "Amal");
        assert_eq!(onboarding[0].lead, UNASSIGNED);
        assert_eq!(onboarding[0].progress.percent, 50);
        assert_eq!(onboarding[1].employee_name, "ID: 9");
        assert!(process_summaries(&snapshot, Category::Separation).is_empty());
    }

    #[test]
    fn dashboard_orders_newest_first() {
        use task::Status::NotStarted;
        let snapshot = Snapshot {
            tasks: vec![
                task(1, 1, Category::Performance, NotStarted),
                task(2, 1, Category::Onboarding, NotStarted),
                task(3, 1, Category::Performance, NotStarted),
            ],
            requests: vec![
                request(1, 1, "NOC", hr_request::Status::New, None, 12),
                request(2, 1, "EOS", hr_request::Status::New, None, 7),
                request(3, 1, "TAF", hr_request::Status::New, None, 15),
            ],
            ..Snapshot::default()
        };
        let board = dashboard(&snapshot);
        let request_ids: Vec<_> = board.recent_requests.iter().map(|r| r.id).collect();
        assert_eq!(request_ids, vec![3, 1, 2]);
        let task_ids: Vec<_> = board.performance_tasks.iter().map(|t| t.id).collect();
        assert_eq!(task_ids, vec![3, 1]);
    }

    #[test]
    fn employee_filter_matches_name_or_department() {
        let employees = vec![
            employee(1, "Sarab Zourob", "Human Resources", Operator::DohaOasis),
            employee(2, "Lamees Ilias", "Human Resources", Operator::Kien),
            employee(3, "Kamel Razik", "Logistics", Operator::DohaOasis),
        ];
        let filter = EmployeeFilter {
            search: Some("  human ".into()),
            operator: Some(Operator::DohaOasis),
        };
        let ids: Vec<_> = filter.apply(employees.clone()).iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1]);

        let by_name = EmployeeFilter {
            search: Some("RAZIK".into()),
            operator: None,
        };
        assert_eq!(by_name.apply(employees).len(), 1);
    }

    #[test]
    fn request_filter_combines_status_assignee_and_search() {
        let employees = vec![employee(1, "Amal Nasser", "Kitchen", Operator::Kien)];
        let requests = vec![
            request(1, 1, "Sim Card", hr_request::Status::New, Some("Kiddie"), 8),
            request(2, 1, "EOS", hr_request::Status::Completed, Some("Kiddie"), 9),
            request(3, 1, "Laundry", hr_request::Status::Rejected, None, 10),
        ];

        let history = RequestFilter {
            status: RequestStatusFilter::History,
            ..RequestFilter::default()
        };
        let ids: Vec<_> = history
            .apply(requests.clone(), &employees)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![2, 3]);

        let by_name = RequestFilter {
            search: Some("nasser".into()),
            assignee: Some("Kiddie".into()),
            status: RequestStatusFilter::Pending,
        };
        let ids: Vec<_> = by_name
            .apply(requests, &employees)
            .iter()
            .map(|r| r.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }
}
