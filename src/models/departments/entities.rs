use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 系部实体
//
// dean_id 只是指向教师的查找键，不构成归属关系。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/department.ts")]
pub struct Department {
    pub dept_id: String,
    pub dept_name: String,
    pub dean_id: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}
