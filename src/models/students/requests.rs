use super::entities::StudentStatus;
use crate::models::Gender;
use crate::models::common::PaginationQuery;
use crate::models::users::requests::AccountRequest;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct StudentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub dept_id: Option<String>,
    pub status: Option<StudentStatus>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct CreateStudentRequest {
    pub student_id: String,
    pub name: String,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub enrollment_date: chrono::NaiveDate,
    pub dept_id: String,
    #[serde(default)]
    pub status: StudentStatus,
    /// 同时开通登录账号
    pub account: Option<AccountRequest>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/student.ts")]
pub struct UpdateStudentRequest {
    pub name: Option<String>,
    pub gender: Option<Gender>,
    pub birth_date: Option<chrono::NaiveDate>,
    pub enrollment_date: Option<chrono::NaiveDate>,
    pub dept_id: Option<String>,
    pub status: Option<StudentStatus>,
}
