use async_graphql::{ComplexObject, Context, Enum, InputObject, SimpleObject};
use chrono::{DateTime, NaiveDate, Utc};
use entity::{
    employee, hr_request, onboarding_record, performance_record, position, separation_record, task,
};
use products_hr::{
    process::ProcessEpisode,
    repo,
    views::{self, DashboardStats, Progress, ProcessSummary},
};

use super::{api, database};

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum Operator {
    #[graphql(name = "DOHA_OASIS")]
    DohaOasis,
    #[graphql(name = "KIEN")]
    Kien,
}

impl From<employee::Operator> for Operator {
    fn from(value: employee::Operator) -> Self {
        match value {
            employee::Operator::DohaOasis => Operator::DohaOasis,
            employee::Operator::Kien => Operator::Kien,
        }
    }
}

impl From<Operator> for employee::Operator {
    fn from(value: Operator) -> Self {
        match value {
            Operator::DohaOasis => employee::Operator::DohaOasis,
            Operator::Kien => employee::Operator::Kien,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum PositionStatus {
    #[graphql(name = "PENDING_APPROVAL")]
    PendingApproval,
    #[graphql(name = "OPEN")]
    Open,
    #[graphql(name = "FILLED")]
    Filled,
    #[graphql(name = "CLOSED")]
    Closed,
    #[graphql(name = "REJECTED")]
    Rejected,
}

impl From<position::Status> for PositionStatus {
    fn from(value: position::Status) -> Self {
        match value {
            position::Status::PendingApproval => PositionStatus::PendingApproval,
            position::Status::Open => PositionStatus::Open,
            position::Status::Filled => PositionStatus::Filled,
            position::Status::Closed => PositionStatus::Closed,
            position::Status::Rejected => PositionStatus::Rejected,
        }
    }
}

impl From<PositionStatus> for position::Status {
    fn from(value: PositionStatus) -> Self {
        match value {
            PositionStatus::PendingApproval => position::Status::PendingApproval,
            PositionStatus::Open => position::Status::Open,
            PositionStatus::Filled => position::Status::Filled,
            PositionStatus::Closed => position::Status::Closed,
            PositionStatus::Rejected => position::Status::Rejected,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum TaskStatus {
    #[graphql(name = "NOT_STARTED")]
    NotStarted,
    #[graphql(name = "IN_PROGRESS")]
    InProgress,
    #[graphql(name = "DONE")]
    Done,
}

impl From<task::Status> for TaskStatus {
    fn from(value: task::Status) -> Self {
        match value {
            task::Status::NotStarted => TaskStatus::NotStarted,
            task::Status::InProgress => TaskStatus::InProgress,
            task::Status::Done => TaskStatus::Done,
        }
    }
}

impl From<TaskStatus> for task::Status {
    fn from(value: TaskStatus) -> Self {
        match value {
            TaskStatus::NotStarted => task::Status::NotStarted,
            TaskStatus::InProgress => task::Status::InProgress,
            TaskStatus::Done => task::Status::Done,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TaskCategory {
    #[default]
    #[graphql(name = "ONBOARDING")]
    Onboarding,
    #[graphql(name = "SEPARATION")]
    Separation,
    #[graphql(name = "PERFORMANCE")]
    Performance,
}

impl From<task::Category> for TaskCategory {
    fn from(value: task::Category) -> Self {
        match value {
            task::Category::Onboarding => TaskCategory::Onboarding,
            task::Category::Separation => TaskCategory::Separation,
            task::Category::Performance => TaskCategory::Performance,
        }
    }
}

impl From<TaskCategory> for task::Category {
    fn from(value: TaskCategory) -> Self {
        match value {
            TaskCategory::Onboarding => task::Category::Onboarding,
            TaskCategory::Separation => task::Category::Separation,
            TaskCategory::Performance => task::Category::Performance,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Eq, PartialEq)]
pub enum RequestStatus {
    #[graphql(name = "NEW")]
    New,
    #[graphql(name = "IN_PROGRESS")]
    InProgress,
    #[graphql(name = "COMPLETED")]
    Completed,
    #[graphql(name = "REJECTED")]
    Rejected,
}

impl From<hr_request::Status> for RequestStatus {
    fn from(value: hr_request::Status) -> Self {
        match value {
            hr_request::Status::New => RequestStatus::New,
            hr_request::Status::InProgress => RequestStatus::InProgress,
            hr_request::Status::Completed => RequestStatus::Completed,
            hr_request::Status::Rejected => RequestStatus::Rejected,
        }
    }
}

impl From<RequestStatus> for hr_request::Status {
    fn from(value: RequestStatus) -> Self {
        match value {
            RequestStatus::New => hr_request::Status::New,
            RequestStatus::InProgress => hr_request::Status::InProgress,
            RequestStatus::Completed => hr_request::Status::Completed,
            RequestStatus::Rejected => hr_request::Status::Rejected,
        }
    }
}

#[derive(Enum, Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum RequestView {
    #[default]
    #[graphql(name = "ALL")]
    All,
    #[graphql(name = "PENDING")]
    Pending,
    #[graphql(name = "HISTORY")]
    History,
}

impl From<RequestView> for views::RequestStatusFilter {
    fn from(value: RequestView) -> Self {
        match value {
            RequestView::All => views::RequestStatusFilter::All,
            RequestView::Pending => views::RequestStatusFilter::Pending,
            RequestView::History => views::RequestStatusFilter::History,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Employee", complex)]
pub struct EmployeeNode {
    pub id: i32,
    pub name: String,
    pub operator: Operator,
    pub department: String,
    pub position: String,
    pub grade: Option<String>,
    pub date_joined: Option<NaiveDate>,
}

impl From<employee::Model> for EmployeeNode {
    fn from(model: employee::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            operator: model.operator.into(),
            department: model.department,
            position: model.position,
            grade: model.grade,
            date_joined: model.date_joined,
        }
    }
}

#[ComplexObject]
impl EmployeeNode {
    async fn tasks(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] category: TaskCategory,
    ) -> async_graphql::Result<Vec<TaskNode>> {
        let db = database(ctx)?;
        let tasks = repo::tasks::by_employee(&db, self.id, category.into())
            .await
            .map_err(api)?;
        Ok(tasks.into_iter().map(TaskNode::from).collect())
    }

    async fn requests(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<RequestNode>> {
        let db = database(ctx)?;
        let requests = repo::requests::by_employee(&db, self.id)
            .await
            .map_err(api)?;
        Ok(requests.into_iter().map(RequestNode::from).collect())
    }

    async fn onboarding(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<OnboardingRecordNode>> {
        let db = database(ctx)?;
        let record = repo::onboardings::by_employee(&db, self.id)
            .await
            .map_err(api)?;
        Ok(record.map(Into::into))
    }

    async fn separation(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Option<SeparationRecordNode>> {
        let db = database(ctx)?;
        let record = repo::separations::by_employee(&db, self.id)
            .await
            .map_err(api)?;
        Ok(record.map(Into::into))
    }

    async fn performance_reviews(
        &self,
        ctx: &Context<'_>,
    ) -> async_graphql::Result<Vec<PerformanceRecordNode>> {
        let db = database(ctx)?;
        let records = repo::performance::by_employee(&db, self.id)
            .await
            .map_err(api)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn progress(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] category: TaskCategory,
    ) -> async_graphql::Result<ProgressNode> {
        let db = database(ctx)?;
        let tasks = repo::tasks::by_employee(&db, self.id, category.into())
            .await
            .map_err(api)?;
        Ok(views::employee_progress(&tasks, self.id, category.into()).into())
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Position")]
pub struct PositionNode {
    pub id: i32,
    pub title: String,
    pub operator: Operator,
    pub department: String,
    pub grade: Option<String>,
    pub status: PositionStatus,
    pub description: Option<String>,
    pub hiring_manager: Option<String>,
    pub target_hire_date: Option<NaiveDate>,
    pub justification: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub filled_by: Option<String>,
}

impl From<position::Model> for PositionNode {
    fn from(model: position::Model) -> Self {
        Self {
            id: model.id,
            title: model.title,
            operator: model.operator.into(),
            department: model.department,
            grade: model.grade,
            status: model.status.into(),
            description: model.description,
            hiring_manager: model.hiring_manager,
            target_hire_date: model.target_hire_date,
            justification: model.justification,
            request_date: model.request_date,
            filled_by: model.filled_by,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Task")]
pub struct TaskNode {
    pub id: i32,
    pub employee_id: i32,
    pub name: String,
    pub owner: String,
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub comments: Option<String>,
    pub category: TaskCategory,
    pub year: Option<i32>,
}

impl From<task::Model> for TaskNode {
    fn from(model: task::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            name: model.name,
            owner: model.owner,
            status: model.status.into(),
            due_date: model.due_date,
            comments: model.comments,
            category: model.category.into(),
            year: model.year,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "HrRequest")]
pub struct RequestNode {
    pub id: i32,
    pub employee_id: i32,
    pub request_type: String,
    pub status: RequestStatus,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<hr_request::Model> for RequestNode {
    fn from(model: hr_request::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            request_type: model.request_type,
            status: model.status.into(),
            description: model.description,
            assigned_to: model.assigned_to,
            created_at: model.created_at.into(),
            updated_at: model.updated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "OnboardingRecord")]
pub struct OnboardingRecordNode {
    pub id: i32,
    pub employee_id: i32,
    pub assigned_hr_name: String,
    pub comments: String,
    pub initiated_at: DateTime<Utc>,
}

impl From<onboarding_record::Model> for OnboardingRecordNode {
    fn from(model: onboarding_record::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            assigned_hr_name: model.assigned_hr_name,
            comments: model.comments,
            initiated_at: model.initiated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "SeparationRecord")]
pub struct SeparationRecordNode {
    pub id: i32,
    pub employee_id: i32,
    pub assigned_hr_name: String,
    pub final_settlement_received: bool,
    pub initiated_at: DateTime<Utc>,
}

impl From<separation_record::Model> for SeparationRecordNode {
    fn from(model: separation_record::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            assigned_hr_name: model.assigned_hr_name,
            final_settlement_received: model.final_settlement_received,
            initiated_at: model.initiated_at.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "PerformanceRecord")]
pub struct PerformanceRecordNode {
    pub id: i32,
    pub employee_id: i32,
    pub year: i32,
    pub assigned_reviewer: String,
    pub initiated_at: DateTime<Utc>,
    pub comments: Option<String>,
}

impl From<performance_record::Model> for PerformanceRecordNode {
    fn from(model: performance_record::Model) -> Self {
        Self {
            id: model.id,
            employee_id: model.employee_id,
            year: model.year,
            assigned_reviewer: model.assigned_reviewer,
            initiated_at: model.initiated_at.into(),
            comments: model.comments,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct OnboardingEpisode {
    pub record: OnboardingRecordNode,
    /// Checklist items added by this call.
    pub tasks: Vec<TaskNode>,
}

impl From<ProcessEpisode<onboarding_record::Model>> for OnboardingEpisode {
    fn from(episode: ProcessEpisode<onboarding_record::Model>) -> Self {
        Self {
            record: episode.record.into(),
            tasks: episode.tasks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct SeparationEpisode {
    pub record: SeparationRecordNode,
    pub tasks: Vec<TaskNode>,
}

impl From<ProcessEpisode<separation_record::Model>> for SeparationEpisode {
    fn from(episode: ProcessEpisode<separation_record::Model>) -> Self {
        Self {
            record: episode.record.into(),
            tasks: episode.tasks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
pub struct PerformanceEpisode {
    pub record: PerformanceRecordNode,
    pub tasks: Vec<TaskNode>,
}

impl From<ProcessEpisode<performance_record::Model>> for PerformanceEpisode {
    fn from(episode: ProcessEpisode<performance_record::Model>) -> Self {
        Self {
            record: episode.record.into(),
            tasks: episode.tasks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Clone, Copy, Debug, SimpleObject)]
#[graphql(name = "DashboardStats")]
pub struct StatsNode {
    pub total_employees: u64,
    pub open_positions: u64,
    pub pending_requests: u64,
    pub onboarding_active: u64,
    pub separation_active: u64,
    pub performance_active: u64,
}

impl From<DashboardStats> for StatsNode {
    fn from(stats: DashboardStats) -> Self {
        Self {
            total_employees: stats.total_employees as u64,
            open_positions: stats.open_positions as u64,
            pending_requests: stats.pending_requests as u64,
            onboarding_active: stats.onboarding_active as u64,
            separation_active: stats.separation_active as u64,
            performance_active: stats.performance_active as u64,
        }
    }
}

#[derive(Clone, Copy, Debug, SimpleObject)]
#[graphql(name = "Progress")]
pub struct ProgressNode {
    pub total: u64,
    pub completed: u64,
    pub percent: u32,
}

impl From<Progress> for ProgressNode {
    fn from(progress: Progress) -> Self {
        Self {
            total: progress.total as u64,
            completed: progress.completed as u64,
            percent: progress.percent,
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "ProcessSummary")]
pub struct ProcessSummaryNode {
    pub employee_id: i32,
    pub employee_name: String,
    pub lead: String,
    pub year: Option<i32>,
    pub progress: ProgressNode,
}

impl From<ProcessSummary> for ProcessSummaryNode {
    fn from(summary: ProcessSummary) -> Self {
        Self {
            employee_id: summary.employee_id,
            employee_name: summary.employee_name,
            lead: summary.lead,
            year: summary.year,
            progress: summary.progress.into(),
        }
    }
}

#[derive(Clone, Debug, SimpleObject)]
#[graphql(name = "Dashboard")]
pub struct DashboardNode {
    pub stats: StatsNode,
    pub onboarding: Vec<ProcessSummaryNode>,
    pub separation: Vec<ProcessSummaryNode>,
    pub recent_requests: Vec<RequestNode>,
    pub performance_tasks: Vec<TaskNode>,
}

impl From<views::Dashboard> for DashboardNode {
    fn from(board: views::Dashboard) -> Self {
        Self {
            stats: board.stats.into(),
            onboarding: board.onboarding.into_iter().map(Into::into).collect(),
            separation: board.separation.into_iter().map(Into::into).collect(),
            recent_requests: board.recent_requests.into_iter().map(Into::into).collect(),
            performance_tasks: board.performance_tasks.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(InputObject, Default, Clone)]
pub struct EmployeeFilterInput {
    pub search: Option<String>,
    pub operator: Option<Operator>,
}

#[derive(InputObject, Default, Clone)]
pub struct RequestFilterInput {
    pub search: Option<String>,
    pub assignee: Option<String>,
    #[graphql(default)]
    pub view: RequestView,
}

#[derive(InputObject, Default, Clone)]
pub struct PositionFilterInput {
    /// Only positions awaiting approval; wins over `status`.
    #[graphql(default)]
    pub pending_only: bool,
    pub status: Option<PositionStatus>,
}

#[derive(InputObject, Clone)]
pub struct NewEmployeeInput {
    pub name: String,
    pub operator: Operator,
    pub department: String,
    pub position: String,
    pub grade: Option<String>,
    pub date_joined: Option<NaiveDate>,
}

#[derive(InputObject, Clone)]
pub struct NewPositionInput {
    pub title: String,
    pub operator: Operator,
    pub department: String,
    pub grade: Option<String>,
    pub description: Option<String>,
    pub hiring_manager: Option<String>,
    pub target_hire_date: Option<NaiveDate>,
    pub justification: Option<String>,
    pub request_date: Option<NaiveDate>,
}

#[derive(InputObject, Clone)]
pub struct UpdatePositionInput {
    pub id: i32,
    pub title: Option<String>,
    pub operator: Option<Operator>,
    pub department: Option<String>,
    pub grade: Option<String>,
    pub status: Option<PositionStatus>,
    pub description: Option<String>,
    pub hiring_manager: Option<String>,
    pub target_hire_date: Option<NaiveDate>,
    pub justification: Option<String>,
    pub request_date: Option<NaiveDate>,
    pub filled_by: Option<String>,
}

#[derive(InputObject, Clone)]
pub struct NewTaskInput {
    pub employee_id: i32,
    pub name: String,
    #[graphql(default_with = "String::from(\"HR\")")]
    pub owner: String,
    #[graphql(default_with = "TaskStatus::NotStarted")]
    pub status: TaskStatus,
    pub due_date: Option<NaiveDate>,
    pub comments: Option<String>,
    #[graphql(default)]
    pub category: TaskCategory,
    pub year: Option<i32>,
}

#[derive(InputObject, Clone)]
pub struct UpdateTaskInput {
    pub id: i32,
    pub name: Option<String>,
    pub owner: Option<String>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<NaiveDate>,
    pub comments: Option<String>,
}

#[derive(InputObject, Clone)]
pub struct NewRequestInput {
    pub employee_id: i32,
    pub request_type: String,
    /// Used as the type when `requestType` is `Other`.
    pub custom_type: Option<String>,
    #[graphql(default_with = "RequestStatus::New")]
    pub status: RequestStatus,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}

#[derive(InputObject, Clone)]
pub struct UpdateRequestInput {
    pub id: i32,
    pub request_type: Option<String>,
    pub status: Option<RequestStatus>,
    pub description: Option<String>,
    pub assigned_to: Option<String>,
}
