//! First-start roster seeding.

use chrono::NaiveDate;
use entity::{SCHEMA_VERSION, employee, employee::Operator};
use sea_orm::{ActiveValue::Set, DatabaseConnection, EntityTrait, TransactionTrait};
use serde::Deserialize;
use tracing::info;

use crate::error::{HrError, HrResult};
use crate::repo::employees;

const ROSTERS_JSON: &str = include_str!("../data/rosters.json");
const INSERT_CHUNK: usize = 100;
const DEFAULT_DEPARTMENT: &str = "Operations";

#[derive(Debug, Deserialize)]
struct Rosters {
    doha_oasis: Vec<RosterEntry>,
    kien: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
struct RosterEntry {
    name: String,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    position: Option<String>,
}

struct RosterSpec {
    operator: Operator,
    grade: &'static str,
    default_position: &'static str,
}

const DOHA_OASIS: RosterSpec = RosterSpec {
    operator: Operator::DohaOasis,
    grade: "S1",
    default_position: "Team Member",
};

const KIEN: RosterSpec = RosterSpec {
    operator: Operator::Kien,
    grade: "K1",
    default_position: "Staff",
};

fn joined_on() -> HrResult<NaiveDate> {
    NaiveDate::from_ymd_opt(2023, 1, 1).ok_or_else(|| HrError::Seed("invalid join date".into()))
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn roster_models() -> HrResult<Vec<employee::ActiveModel>> {
    let rosters: Rosters =
        serde_json::from_str(ROSTERS_JSON).map_err(|err| HrError::Seed(err.to_string()))?;
    let date_joined = joined_on()?;
    let mut models = Vec::with_capacity(rosters.doha_oasis.len() + rosters.kien.len());
    for (spec, entries) in [(DOHA_OASIS, rosters.doha_oasis), (KIEN, rosters.kien)] {
        for entry in entries {
            if entry.name.trim().is_empty() {
                return Err(HrError::Seed("roster entry without a name".into()));
            }
            models.push(employee::ActiveModel {
                name: Set(entry.name.trim().to_string()),
                operator: Set(spec.operator),
                department: Set(or_default(entry.department, DEFAULT_DEPARTMENT)),
                position: Set(or_default(entry.position, spec.default_position)),
                grade: Set(Some(spec.grade.to_string())),
                date_joined: Set(Some(date_joined)),
                schema_version: Set(SCHEMA_VERSION),
                ..Default::default()
            });
        }
    }
    Ok(models)
}

/// Loads both rosters (Doha Oasis first, then Kien) when the employee table is
/// empty. Returns how many employees were inserted; 0 when already seeded.
pub async fn seed_rosters(db: &DatabaseConnection) -> HrResult<usize> {
    let txn = db.begin().await?;
    if employees::count(&txn).await? > 0 {
        info!("employee table already populated; skipping roster seed");
        return Ok(0);
    }
    let models = roster_models()?;
    let total = models.len();
    let mut batch = Vec::with_capacity(INSERT_CHUNK);
    for model in models {
        batch.push(model);
        if batch.len() == INSERT_CHUNK {
            employee::Entity::insert_many(std::mem::take(&mut batch))
                .exec(&txn)
                .await?;
        }
    }
    if !batch.is_empty() {
        employee::Entity::insert_many(batch).exec(&txn).await?;
    }
    txn.commit().await?;
    info!(employees = total, "rosters seeded");
    Ok(total)
}
