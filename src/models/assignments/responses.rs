use super::entities::Assignment;
use crate::models::courses::entities::CourseType;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 教学任务展示行：附带课程、教师信息和实时选课人数
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct AssignmentView {
    #[serde(flatten)]
    #[ts(flatten)]
    pub assignment: Assignment,
    pub course_name: String,
    pub course_type: CourseType,
    pub credits: f64,
    pub teacher_name: String,
    pub current_enrollment: i64,
}

impl AssignmentView {
    pub fn is_full(&self) -> bool {
        !self.assignment.has_capacity_for(self.current_enrollment)
    }
}
