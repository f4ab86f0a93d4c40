use async_graphql::{Context, Object};
use products_hr::{
    process::{self, OnboardingPatch, SeparationPatch},
    repo::{
        self,
        employees::NewEmployee,
        positions::NewPosition,
        requests::{NewRequest, resolve_request_type},
        tasks::NewTask,
    },
};
use tracing::instrument;

use super::{api, database, drafter, nodes::*};

pub struct HrMutation;

#[Object]
impl HrMutation {
    #[instrument(name = "graphql.hr.add_employee", skip_all)]
    async fn add_employee(
        &self,
        ctx: &Context<'_>,
        input: NewEmployeeInput,
    ) -> async_graphql::Result<EmployeeNode> {
        let db = database(ctx)?;
        let employee = repo::employees::add(
            &db,
            NewEmployee {
                name: input.name,
                operator: input.operator.into(),
                department: input.department,
                position: input.position,
                grade: input.grade,
                date_joined: input.date_joined,
            },
        )
        .await
        .map_err(api)?;
        Ok(employee.into())
    }

    /// Files a position request; it starts as `PENDING_APPROVAL`.
    #[instrument(name = "graphql.hr.request_position", skip_all)]
    async fn request_position(
        &self,
        ctx: &Context<'_>,
        input: NewPositionInput,
    ) -> async_graphql::Result<PositionNode> {
        let db = database(ctx)?;
        let position = repo::positions::add(
            &db,
            NewPosition {
                title: input.title,
                operator: input.operator.into(),
                department: input.department,
                grade: input.grade,
                description: input.description,
                hiring_manager: input.hiring_manager,
                target_hire_date: input.target_hire_date,
                justification: input.justification,
                request_date: input.request_date,
            },
        )
        .await
        .map_err(api)?;
        Ok(position.into())
    }

    /// Edit form. Omitted fields keep their value, an empty string clears an
    /// optional text field. Returns null for an unknown id.
    #[instrument(name = "graphql.hr.update_position", skip_all, fields(id = input.id))]
    async fn update_position(
        &self,
        ctx: &Context<'_>,
        input: UpdatePositionInput,
    ) -> async_graphql::Result<Option<PositionNode>> {
        let db = database(ctx)?;
        let Some(mut position) = repo::positions::by_id(&db, input.id).await.map_err(api)?
        else {
            return Ok(None);
        };
        if let Some(title) = input.title {
            position.title = title;
        }
        if let Some(operator) = input.operator {
            position.operator = operator.into();
        }
        if let Some(department) = input.department {
            position.department = department;
        }
        if let Some(status) = input.status {
            position.status = status.into();
        }
        position.grade = input.grade.or(position.grade);
        position.description = input.description.or(position.description);
        position.hiring_manager = input.hiring_manager.or(position.hiring_manager);
        position.target_hire_date = input.target_hire_date.or(position.target_hire_date);
        position.justification = input.justification.or(position.justification);
        position.request_date = input.request_date.or(position.request_date);
        position.filled_by = input.filled_by.or(position.filled_by);
        let updated = repo::positions::update(&db, position)
            .await
            .map_err(api)?;
        Ok(updated.map(Into::into))
    }

    async fn approve_position(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<PositionNode> {
        let db = database(ctx)?;
        let position = repo::positions::approve(&db, id).await.map_err(api)?;
        Ok(position.into())
    }

    async fn reject_position(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<PositionNode> {
        let db = database(ctx)?;
        let position = repo::positions::reject(&db, id).await.map_err(api)?;
        Ok(position.into())
    }

    async fn fill_position(
        &self,
        ctx: &Context<'_>,
        id: i32,
        candidate: String,
    ) -> async_graphql::Result<PositionNode> {
        let db = database(ctx)?;
        let position = repo::positions::fill(&db, id, &candidate)
            .await
            .map_err(api)?;
        Ok(position.into())
    }

    /// AI draft for the position request form. Never fails: configuration
    /// and upstream problems come back as a fixed message.
    #[instrument(name = "graphql.hr.draft_job_description", skip_all)]
    async fn draft_job_description(
        &self,
        ctx: &Context<'_>,
        title: String,
        department: String,
        operator: Operator,
    ) -> async_graphql::Result<String> {
        let drafter = drafter(ctx)?;
        Ok(drafter
            .generate_job_description(&title, &department, operator.into())
            .await)
    }

    async fn add_task(
        &self,
        ctx: &Context<'_>,
        input: NewTaskInput,
    ) -> async_graphql::Result<TaskNode> {
        let db = database(ctx)?;
        let task = repo::tasks::add(
            &db,
            NewTask {
                employee_id: input.employee_id,
                name: input.name,
                owner: input.owner,
                status: input.status.into(),
                due_date: input.due_date,
                comments: input.comments,
                category: input.category.into(),
                year: input.year,
            },
        )
        .await
        .map_err(api)?;
        Ok(task.into())
    }

    async fn update_task(
        &self,
        ctx: &Context<'_>,
        input: UpdateTaskInput,
    ) -> async_graphql::Result<Option<TaskNode>> {
        let db = database(ctx)?;
        let Some(mut task) = repo::tasks::by_id(&db, input.id).await.map_err(api)? else {
            return Ok(None);
        };
        if let Some(name) = input.name {
            task.name = name;
        }
        if let Some(owner) = input.owner {
            task.owner = owner;
        }
        if let Some(status) = input.status {
            task.status = status.into();
        }
        task.due_date = input.due_date.or(task.due_date);
        task.comments = input.comments.or(task.comments);
        let updated = repo::tasks::update(&db, task).await.map_err(api)?;
        Ok(updated.map(Into::into))
    }

    /// Advances `NOT_STARTED -> IN_PROGRESS -> DONE -> NOT_STARTED`.
    async fn toggle_task_status(
        &self,
        ctx: &Context<'_>,
        id: i32,
    ) -> async_graphql::Result<TaskNode> {
        let db = database(ctx)?;
        let task = repo::tasks::toggle_status(&db, id).await.map_err(api)?;
        Ok(task.into())
    }

    #[instrument(name = "graphql.hr.add_request", skip_all)]
    async fn add_request(
        &self,
        ctx: &Context<'_>,
        input: NewRequestInput,
    ) -> async_graphql::Result<RequestNode> {
        let db = database(ctx)?;
        let request_type = resolve_request_type(&input.request_type, input.custom_type.as_deref());
        let request = repo::requests::add(
            &db,
            NewRequest {
                employee_id: input.employee_id,
                request_type,
                status: input.status.into(),
                description: input.description,
                assigned_to: input.assigned_to,
            },
        )
        .await
        .map_err(api)?;
        Ok(request.into())
    }

    async fn update_request(
        &self,
        ctx: &Context<'_>,
        input: UpdateRequestInput,
    ) -> async_graphql::Result<Option<RequestNode>> {
        let db = database(ctx)?;
        let Some(mut request) = repo::requests::by_id(&db, input.id).await.map_err(api)? else {
            return Ok(None);
        };
        if let Some(request_type) = input.request_type {
            request.request_type = request_type;
        }
        if let Some(status) = input.status {
            request.status = status.into();
        }
        request.description = input.description.or(request.description);
        request.assigned_to = input.assigned_to.or(request.assigned_to);
        let updated = repo::requests::update(&db, request).await.map_err(api)?;
        Ok(updated.map(Into::into))
    }

    #[instrument(name = "graphql.hr.initiate_onboarding", skip_all)]
    async fn initiate_onboarding(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
    ) -> async_graphql::Result<OnboardingEpisode> {
        let db = database(ctx)?;
        let episode = process::initiate_onboarding(&db, employee_id)
            .await
            .map_err(api)?;
        Ok(episode.into())
    }

    #[instrument(name = "graphql.hr.initiate_separation", skip_all)]
    async fn initiate_separation(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
        assigned_hr_name: Option<String>,
    ) -> async_graphql::Result<SeparationEpisode> {
        let db = database(ctx)?;
        let episode =
            process::initiate_separation(&db, employee_id, assigned_hr_name.as_deref())
                .await
                .map_err(api)?;
        Ok(episode.into())
    }

    #[instrument(name = "graphql.hr.initiate_performance", skip_all)]
    async fn initiate_performance(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
        year: i32,
        reviewer: Option<String>,
    ) -> async_graphql::Result<PerformanceEpisode> {
        let db = database(ctx)?;
        let episode = process::initiate_performance(&db, employee_id, year, reviewer.as_deref())
            .await
            .map_err(api)?;
        Ok(episode.into())
    }

    /// Sets lead HR and/or comments, creating the record when absent.
    async fn update_onboarding_record(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
        assigned_hr_name: Option<String>,
        comments: Option<String>,
    ) -> async_graphql::Result<OnboardingRecordNode> {
        let db = database(ctx)?;
        let record = process::patch_onboarding(
            &db,
            employee_id,
            OnboardingPatch {
                assigned_hr_name,
                comments,
            },
        )
        .await
        .map_err(api)?;
        Ok(record.into())
    }

    /// Sets lead HR and/or the settlement flag, creating the record when
    /// absent.
    async fn update_separation_record(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
        assigned_hr_name: Option<String>,
        final_settlement_received: Option<bool>,
    ) -> async_graphql::Result<SeparationRecordNode> {
        let db = database(ctx)?;
        let record = process::patch_separation(
            &db,
            employee_id,
            SeparationPatch {
                assigned_hr_name,
                final_settlement_received,
            },
        )
        .await
        .map_err(api)?;
        Ok(record.into())
    }

    async fn update_performance_record(
        &self,
        ctx: &Context<'_>,
        id: i32,
        assigned_reviewer: Option<String>,
        comments: Option<String>,
    ) -> async_graphql::Result<Option<PerformanceRecordNode>> {
        let db = database(ctx)?;
        let Some(mut record) = repo::performance::by_id(&db, id).await.map_err(api)? else {
            return Ok(None);
        };
        if let Some(reviewer) = assigned_reviewer {
            record.assigned_reviewer = reviewer;
        }
        record.comments = comments.or(record.comments);
        let updated = repo::performance::update(&db, record)
            .await
            .map_err(api)?;
        Ok(updated.map(Into::into))
    }

    async fn add_standard_onboarding_tasks(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
    ) -> async_graphql::Result<Vec<TaskNode>> {
        let db = database(ctx)?;
        let tasks = process::add_standard_onboarding_tasks(&db, employee_id)
            .await
            .map_err(api)?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }

    /// Appends AI-suggested onboarding tasks for the employee's position.
    #[instrument(name = "graphql.hr.add_suggested_onboarding_tasks", skip_all)]
    async fn add_suggested_onboarding_tasks(
        &self,
        ctx: &Context<'_>,
        employee_id: i32,
    ) -> async_graphql::Result<Vec<TaskNode>> {
        let db = database(ctx)?;
        let drafter = drafter(ctx)?;
        let tasks = process::add_suggested_onboarding_tasks(&db, employee_id, drafter.as_ref())
            .await
            .map_err(api)?;
        Ok(tasks.into_iter().map(Into::into).collect())
    }
}
