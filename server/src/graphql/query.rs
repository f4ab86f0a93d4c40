use async_graphql::{Context, Object};
use products_hr::{
    process::{ONBOARDING_CHECKLIST, PERFORMANCE_STAGES, SEPARATION_CHECKLIST},
    repo,
    views::{self, EmployeeFilter, PositionFilter, RequestFilter, Snapshot},
};
use tracing::instrument;

use super::{api, database, nodes::*};

pub struct HrQuery;

#[Object]
impl HrQuery {
    /// Headline counters for the dashboard.
    #[instrument(name = "graphql.hr.stats", skip_all)]
    async fn stats(&self, ctx: &Context<'_>) -> async_graphql::Result<StatsNode> {
        let db = database(ctx)?;
        let snapshot = Snapshot::load(&db).await.map_err(api)?;
        Ok(views::stats(&snapshot).into())
    }

    #[instrument(name = "graphql.hr.dashboard", skip_all)]
    async fn dashboard(&self, ctx: &Context<'_>) -> async_graphql::Result<DashboardNode> {
        let db = database(ctx)?;
        let snapshot = Snapshot::load(&db).await.map_err(api)?;
        Ok(views::dashboard(&snapshot).into())
    }

    #[instrument(name = "graphql.hr.employees", skip_all)]
    async fn employees(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] filter: EmployeeFilterInput,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let db = database(ctx)?;
        let employees = repo::employees::all(&db).await.map_err(api)?;
        let filter = EmployeeFilter {
            search: filter.search,
            operator: filter.operator.map(Into::into),
        };
        Ok(filter
            .apply(employees)
            .into_iter()
            .map(EmployeeNode::from)
            .collect())
    }

    async fn employee(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<Option<EmployeeNode>> {
        let db = database(ctx)?;
        let employee = repo::employees::by_id(&db, id).await.map_err(api)?;
        Ok(employee.map(Into::into))
    }

    /// People who can lead onboarding or separation.
    async fn hr_team(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<EmployeeNode>> {
        let db = database(ctx)?;
        let team = repo::employees::hr_team(&db).await.map_err(api)?;
        Ok(team.into_iter().map(Into::into).collect())
    }

    #[instrument(name = "graphql.hr.positions", skip_all)]
    async fn positions(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] filter: PositionFilterInput,
    ) -> async_graphql::Result<Vec<PositionNode>> {
        let db = database(ctx)?;
        let positions = repo::positions::all(&db).await.map_err(api)?;
        let filter = match (filter.pending_only, filter.status) {
            (true, _) => PositionFilter::Pending,
            (false, Some(status)) => PositionFilter::Status(status.into()),
            (false, None) => PositionFilter::All,
        };
        Ok(filter
            .apply(positions)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn position(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<Option<PositionNode>> {
        let db = database(ctx)?;
        let position = repo::positions::by_id(&db, id).await.map_err(api)?;
        Ok(position.map(Into::into))
    }

    /// Tasks of one employee in one category, or of every employee when
    /// `employeeId` is omitted.
    async fn tasks(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<i32>,
        #[graphql(default)] category: TaskCategory,
    ) -> async_graphql::Result<Vec<TaskNode>> {
        let db = database(ctx)?;
        let tasks = match employee_id {
            Some(employee_id) => repo::tasks::by_employee(&db, employee_id, category.into()).await,
            None => repo::tasks::by_category(&db, category.into()).await,
        }
        .map_err(api)?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }

    async fn performance_tasks(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
        year: i32,
    ) -> async_graphql::Result<Vec<TaskNode>> {
        let db = database(ctx)?;
        let tasks = repo::tasks::by_employee_and_year(&db, employee_id, year)
            .await
            .map_err(api)?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }

    #[instrument(name = "graphql.hr.requests", skip_all)]
    async fn requests(
        &self,
        ctx: &Context<'_>,
        #[graphql(default)] filter: RequestFilterInput,
    ) -> async_graphql::Result<Vec<RequestNode>> {
        let db = database(ctx)?;
        let requests = repo::requests::all(&db).await.map_err(api)?;
        let employees = repo::employees::all(&db).await.map_err(api)?;
        let filter = RequestFilter {
            search: filter.search,
            assignee: filter.assignee,
            status: filter.view.into(),
        };
        Ok(filter
            .apply(requests, &employees)
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn request(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<Option<RequestNode>> {
        let db = database(ctx)?;
        let request = repo::requests::by_id(&db, id).await.map_err(api)?;
        Ok(request.map(Into::into))
    }

    /// Selectable request types, `Other` last.
    async fn request_types(&self) -> Vec<String> {
        repo::requests::REQUEST_TYPES.map(String::from).to_vec()
    }

    /// Standard checklist names for a process category.
    async fn checklist(&self, category: TaskCategory) -> Vec<String> {
        let names: &[&str] = match category {
            TaskCategory::Onboarding => &ONBOARDING_CHECKLIST,
            TaskCategory::Separation => &SEPARATION_CHECKLIST,
            TaskCategory::Performance => &PERFORMANCE_STAGES,
        };
        names.iter().map(|name| name.to_string()).collect()
    }

    async fn onboarding_record(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
    ) -> async_graphql::Result<Option<OnboardingRecordNode>> {
        let db = database(ctx)?;
        let record = repo::onboardings::by_employee(&db, employee_id)
            .await
            .map_err(api)?;
        Ok(record.map(Into::into))
    }

    async fn separation_record(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
    ) -> async_graphql::Result<Option<SeparationRecordNode>> {
        let db = database(ctx)?;
        let record = repo::separations::by_employee(&db, employee_id)
            .await
            .map_err(api)?;
        Ok(record.map(Into::into))
    }

    async fn performance_records(
        &self,
        ctx: &Context<'_>,
        employee_id: Option<i32>,
    ) -> async_graphql::Result<Vec<PerformanceRecordNode>> {
        let db = database(ctx)?;
        let records = match employee_id {
            Some(employee_id) => repo::performance::by_employee(&db, employee_id).await,
            None => repo::performance::all(&db).await,
        }
        .map_err(api)?;
        Ok(records.into_iter().map(Into::into).collect())
    }

    /// Unfinished processes of a category with their lead and progress.
    #[instrument(name = "graphql.hr.process_summaries", skip_all)]
    async fn process_summaries(
        &self,
        ctx: &Context<'_>,
        category: TaskCategory,
    ) -> async_graphql::Result<Vec<ProcessSummaryNode>> {
        let db = database(ctx)?;
        let snapshot = Snapshot::load(&db).await.map_err(api)?;
        Ok(views::process_summaries(&snapshot, category.into())
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Employees shown on a process page.
    async fn process_employees(
        &self,
        ctx: &Context<'_>,
        category: TaskCategory,
    ) -> async_graphql::Result<Vec<EmployeeNode>> {
        let db = database(ctx)?;
        let snapshot = Snapshot::load(&db).await.map_err(api)?;
        Ok(views::active_process_employees(&snapshot, category.into())
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn performance_progress(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
        year: i32,
    ) -> async_graphql::Result<ProgressNode> {
        let db = database(ctx)?;
        let tasks = repo::tasks::by_employee_and_year(&db, employee_id, year)
            .await
            .map_err(api)?;
        Ok(views::performance_progress(&tasks, employee_id, year).into())
    }
}
