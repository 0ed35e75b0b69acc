use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::Gender;

// 教师实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct Teacher {
    pub teacher_id: String,
    pub user_id: Option<i64>,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub hire_date: chrono::NaiveDate,
    pub dept_id: String,
    pub title: Option<String>,
    pub specialty: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
