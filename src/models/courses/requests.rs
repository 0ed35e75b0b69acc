use super::entities::CourseType;
use crate::models::common::PaginationQuery;
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CourseListParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    pub course_type: Option<CourseType>,
    pub search: Option<String>,
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct CreateCourseRequest {
    pub course_id: String,
    pub course_name: String,
    pub course_type: CourseType,
    #[serde(default)]
    pub hours: i32,
    #[serde(default)]
    pub credits: f64,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct UpdateCourseRequest {
    pub course_name: Option<String>,
    pub course_type: Option<CourseType>,
    pub hours: Option<i32>,
    pub credits: Option<f64>,
    pub description: Option<String>,
}
