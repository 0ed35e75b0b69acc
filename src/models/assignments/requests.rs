use super::entities::Semester;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub academic_year: Option<String>,
    pub semester: Option<Semester>,
    pub teacher_id: Option<String>,
    pub course_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct CreateAssignmentRequest {
    pub course_id: String,
    pub teacher_id: String,
    pub academic_year: String,
    pub semester: Semester,
    pub class_time: Option<String>,
    pub location: Option<String>,
    pub exam_time: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub enrollment_limit: i32,
}

/// 教学任务更新请求
///
/// 课程、教师、学年学期构成唯一键，创建后不可修改。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct UpdateAssignmentRequest {
    pub class_time: Option<String>,
    pub location: Option<String>,
    pub exam_time: Option<chrono::DateTime<chrono::Utc>>,
    pub enrollment_limit: Option<i32>,
}
