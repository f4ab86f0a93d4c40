//! Onboarding, separation and performance episodes.
//!
//! Each initiation writes its record and checklist in one transaction: either
//! everything is committed or nothing is.

use std::collections::HashSet;

use entity::{onboarding_record, performance_record, separation_record, task, task::Category};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, DatabaseConnection, IntoActiveModel, TransactionTrait,
};
use tracing::{info, instrument};

use crate::drafting::{Drafter, TextGenerator};
use crate::error::{HrError, HrResult};
use crate::repo::{
    comment_text, employees, onboardings, onboardings::NewOnboardingRecord, performance,
    performance::NewPerformanceRecord, required_text, separations,
    separations::NewSeparationRecord, tasks, tasks::NewTask, today,
};

pub const UNASSIGNED: &str = "Unassigned";
pub const DEFAULT_TASK_OWNER: &str = "HR";

pub const ONBOARDING_CHECKLIST: [&str; 28] = [
    "Uniform Issuance",
    "Laundry",
    "Canteen Access",
    "Accommodation Allocation",
    "HR Orientation",
    "Facility Tour",
    "Open Bank Account",
    "ID Card Issuance",
    "Quest Barcode Setup",
    "Weekly Meal Plan",
    "Food Handler Certificate",
    "Transportation",
    "IT Assets Request",
    "IT Email Creation",
    "Oasys HR System Access",
    "Share Folder Access",
    "Doha Oasis Whatsapp Group",
    "Private Medical Insurance",
    "Hamad Card",
    "Name Tag",
    "Office Telephone",
    "Stationary",
    "Welcome Card",
    "Door Access",
    "Parking Allocation",
    "Doha Oasis Buddy",
    "HR Check",
    "Confirmation of Employment",
];

pub const SEPARATION_CHECKLIST: [&str; 14] = [
    "Resignation Letter",
    "Acceptance of Resignation",
    "EOS",
    "TAF",
    "Exit Interview",
    "Task Handover Paper",
    "Clearance Form",
    "Accommodation Clearance",
    "Bank Leaving Employee Notification",
    "IT System",
    "Insurance",
    "QID Cancelation",
    "Sponsorship Transfer",
    "Employment Certificate",
];

pub const PERFORMANCE_STAGES: [&str; 3] = ["Objective Setting", "Mid Review", "Final Review"];

/// A process record together with the tasks written alongside it.
#[derive(Clone, Debug)]
pub struct ProcessEpisode<R> {
    pub record: R,
    pub tasks: Vec<task::Model>,
}

#[derive(Clone, Debug, Default)]
pub struct OnboardingPatch {
    pub assigned_hr_name: Option<String>,
    pub comments: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct SeparationPatch {
    pub assigned_hr_name: Option<String>,
    pub final_settlement_received: Option<bool>,
}

fn lead_or_unassigned(name: Option<&str>) -> String {
    name.map(str::trim)
        .filter(|n| !n.is_empty())
        .unwrap_or(UNASSIGNED)
        .to_string()
}

/// Starts (or resumes) onboarding. The record is created once; checklist items
/// already present by name are skipped, so repeating the call only fills gaps.
/// `tasks` holds the items added by this call.
#[instrument(name = "hr.initiate_onboarding", skip(db))]
pub async fn initiate_onboarding(
    db: &DatabaseConnection,
    employee_id: i32,
) -> HrResult<ProcessEpisode<onboarding_record::Model>> {
    let txn = db.begin().await?;
    employees::require(&txn, employee_id).await?;

    let record = match onboardings::by_employee(&txn, employee_id).await? {
        Some(record) => record,
        None => {
            onboardings::add(
                &txn,
                NewOnboardingRecord {
                    employee_id,
                    assigned_hr_name: UNASSIGNED.to_string(),
                    comments: String::new(),
                },
            )
            .await?
        }
    };

    let existing: HashSet<String> = tasks::by_employee(&txn, employee_id, Category::Onboarding)
        .await?
        .into_iter()
        .map(|t| t.name)
        .collect();
    let due = Some(today());
    let mut added = Vec::new();
    for name in ONBOARDING_CHECKLIST
        .iter()
        .filter(|name| !existing.contains(**name))
    {
        let item = NewTask::checklist_item(
            employee_id,
            *name,
            DEFAULT_TASK_OWNER,
            Category::Onboarding,
            due,
        );
        added.push(tasks::insert(&txn, item).await?);
    }
    txn.commit().await?;

    info!(employee_id, added = added.len(), "onboarding initiated");
    Ok(ProcessEpisode {
        record,
        tasks: added,
    })
}

/// Starts separation. Refused when the employee already has a separation
/// record or any separation task.
#[instrument(name = "hr.initiate_separation", skip(db))]
pub async fn initiate_separation(
    db: &DatabaseConnection,
    employee_id: i32,
    assigned_hr: Option<&str>,
) -> HrResult<ProcessEpisode<separation_record::Model>> {
    let txn = db.begin().await?;
    employees::require(&txn, employee_id).await?;

    let has_record = separations::by_employee(&txn, employee_id).await?.is_some();
    let has_tasks = !tasks::by_employee(&txn, employee_id, Category::Separation)
        .await?
        .is_empty();
    if has_record || has_tasks {
        return Err(HrError::conflict(format!(
            "separation already initiated for employee {employee_id}"
        )));
    }

    let record = separations::add(
        &txn,
        NewSeparationRecord {
            employee_id,
            assigned_hr_name: lead_or_unassigned(assigned_hr),
            final_settlement_received: false,
        },
    )
    .await?;

    let due = Some(today());
    let mut created = Vec::with_capacity(SEPARATION_CHECKLIST.len());
    for name in SEPARATION_CHECKLIST {
        let item = NewTask::checklist_item(
            employee_id,
            name,
            DEFAULT_TASK_OWNER,
            Category::Separation,
            due,
        );
        created.push(tasks::insert(&txn, item).await?);
    }
    txn.commit().await?;

    info!(employee_id, "separation initiated");
    Ok(ProcessEpisode {
        record,
        tasks: created,
    })
}

/// Starts the review cycle for `year`. One cycle per employee and year.
#[instrument(name = "hr.initiate_performance", skip(db))]
pub async fn initiate_performance(
    db: &DatabaseConnection,
    employee_id: i32,
    year: i32,
    reviewer: Option<&str>,
) -> HrResult<ProcessEpisode<performance_record::Model>> {
    let txn = db.begin().await?;
    employees::require(&txn, employee_id).await?;

    if performance::by_employee_and_year(&txn, employee_id, year)
        .await?
        .is_some()
    {
        return Err(HrError::conflict(format!(
            "performance review {year} already initiated for employee {employee_id}"
        )));
    }

    let reviewer = reviewer.map(str::trim).filter(|r| !r.is_empty());
    let record = performance::add(
        &txn,
        NewPerformanceRecord {
            employee_id,
            year,
            assigned_reviewer: lead_or_unassigned(reviewer),
            comments: None,
        },
    )
    .await?;

    let owner = reviewer.unwrap_or(DEFAULT_TASK_OWNER);
    let due = Some(today());
    let mut created = Vec::with_capacity(PERFORMANCE_STAGES.len());
    for stage in PERFORMANCE_STAGES {
        let item = NewTask::checklist_item(employee_id, stage, owner, Category::Performance, due)
            .with_year(year);
        created.push(tasks::insert(&txn, item).await?);
    }
    txn.commit().await?;

    info!(employee_id, year, "performance review initiated");
    Ok(ProcessEpisode {
        record,
        tasks: created,
    })
}

/// Edits lead HR and comments, creating the record when the employee has none.
pub async fn patch_onboarding(
    db: &DatabaseConnection,
    employee_id: i32,
    patch: OnboardingPatch,
) -> HrResult<onboarding_record::Model> {
    let txn = db.begin().await?;
    let record = match onboardings::by_employee(&txn, employee_id).await? {
        Some(existing) => {
            let mut active = existing.clone().into_active_model();
            if let Some(name) = patch.assigned_hr_name {
                active.assigned_hr_name = Set(required_text("assigned HR", &name)?);
            }
            if let Some(comments) = patch.comments {
                active.comments = Set(comment_text("comments", &comments)?);
            }
            if active.is_changed() {
                active.update(&txn).await?
            } else {
                existing
            }
        }
        None => {
            onboardings::add(
                &txn,
                NewOnboardingRecord {
                    employee_id,
                    assigned_hr_name: lead_or_unassigned(patch.assigned_hr_name.as_deref()),
                    comments: patch.comments.unwrap_or_default(),
                },
            )
            .await?
        }
    };
    txn.commit().await?;
    Ok(record)
}

/// Edits lead HR and the settlement flag, creating the record when absent.
pub async fn patch_separation(
    db: &DatabaseConnection,
    employee_id: i32,
    patch: SeparationPatch,
) -> HrResult<separation_record::Model> {
    let txn = db.begin().await?;
    let record = match separations::by_employee(&txn, employee_id).await? {
        Some(existing) => {
            let mut active = existing.clone().into_active_model();
            if let Some(name) = patch.assigned_hr_name {
                active.assigned_hr_name = Set(required_text("assigned HR", &name)?);
            }
            if let Some(received) = patch.final_settlement_received {
                active.final_settlement_received = Set(received);
            }
            if active.is_changed() {
                active.update(&txn).await?
            } else {
                existing
            }
        }
        None => {
            separations::add(
                &txn,
                NewSeparationRecord {
                    employee_id,
                    assigned_hr_name: lead_or_unassigned(patch.assigned_hr_name.as_deref()),
                    final_settlement_received: patch.final_settlement_received.unwrap_or(false),
                },
            )
            .await?
        }
    };
    txn.commit().await?;
    Ok(record)
}

/// Appends the whole onboarding checklist, duplicates included.
pub async fn add_standard_onboarding_tasks(
    db: &DatabaseConnection,
    employee_id: i32,
) -> HrResult<Vec<task::Model>> {
    let names = Vec::from(ONBOARDING_CHECKLIST.map(String::from));
    append_onboarding_tasks(db, employee_id, names).await
}

/// Asks the drafter for tasks suited to the employee's position and appends
/// whatever comes back, fallbacks included.
pub async fn add_suggested_onboarding_tasks<G>(
    db: &DatabaseConnection,
    employee_id: i32,
    drafter: &Drafter<G>,
) -> HrResult<Vec<task::Model>>
where
    G: TextGenerator,
{
    let employee = employees::require(db, employee_id).await?;
    let names = drafter.suggest_onboarding_tasks(&employee.position).await;
    append_onboarding_tasks(db, employee_id, names).await
}

async fn append_onboarding_tasks(
    db: &DatabaseConnection,
    employee_id: i32,
    names: Vec<String>,
) -> HrResult<Vec<task::Model>> {
    let txn = db.begin().await?;
    employees::require(&txn, employee_id).await?;
    let due = Some(today());
    let mut created = Vec::with_capacity(names.len());
    for name in names {
        let item = NewTask::checklist_item(
            employee_id,
            name,
            DEFAULT_TASK_OWNER,
            Category::Onboarding,
            due,
        );
        created.push(tasks::insert(&txn, item).await?);
    }
    txn.commit().await?;
    Ok(created)
}
