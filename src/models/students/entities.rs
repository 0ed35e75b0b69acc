use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::Gender;

// 学籍状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub enum StudentStatus {
    #[default]
    Enrolled, // 在籍
    Graduated, // 毕业
    Suspended, // 休学
    Withdrawn, // 退学
}

impl std::fmt::Display for StudentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StudentStatus::Enrolled => write!(f, "enrolled"),
            StudentStatus::Graduated => write!(f, "graduated"),
            StudentStatus::Suspended => write!(f, "suspended"),
            StudentStatus::Withdrawn => write!(f, "withdrawn"),
        }
    }
}

impl std::str::FromStr for StudentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "enrolled" => Ok(StudentStatus::Enrolled),
            "graduated" => Ok(StudentStatus::Graduated),
            "suspended" => Ok(StudentStatus::Suspended),
            "withdrawn" => Ok(StudentStatus::Withdrawn),
            _ => Err(format!("Invalid student status: {s}")),
        }
    }
}

// 学生实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct Student {
    pub student_id: String,
    pub user_id: Option<i64>,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub enrollment_date: chrono::NaiveDate,
    pub dept_id: String,
    pub status: StudentStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
