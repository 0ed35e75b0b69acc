use crate::models::Gender;
use crate::models::common::PaginationQuery;
use crate::models::users::requests::AccountRequest;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct TeacherListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub dept_id: Option<String>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct CreateTeacherRequest {
    pub teacher_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub hire_date: chrono::NaiveDate,
    pub dept_id: String,
    pub title: Option<String>,
    pub specialty: Option<String>,
    /// 同时开通登录账号
    pub account: Option<AccountRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/teacher.ts")]
pub struct UpdateTeacherRequest {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub hire_date: Option<chrono::NaiveDate>,
    pub dept_id: Option<String>,
    pub title: Option<String>,
    pub specialty: Option<String>,
}
