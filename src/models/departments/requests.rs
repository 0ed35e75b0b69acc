use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/department.ts")]
pub struct DepartmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/department.ts")]
pub struct CreateDepartmentRequest {
    pub dept_id: String,
    pub dept_name: String,
    pub dean_id: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}

/// 系部更新请求
///
/// `dean_id` 传空字符串表示清除系主任。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/department.ts")]
pub struct UpdateDepartmentRequest {
    pub dept_name: Option<String>,
    pub dean_id: Option<String>,
    pub phone: Option<String>,
    pub description: Option<String>,
}
