use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::assignments::entities::Semester;
use crate::models::courses::entities::CourseType;

// 成绩单条目：一条选课记录及其课程学分、总评
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transcript.ts")]
pub struct TranscriptEntry {
    pub selection_id: i64,
    pub course_id: String,
    pub course_name: String,
    pub course_type: CourseType,
    pub credits: f64,
    pub teacher_name: String,
    pub academic_year: String,
    pub semester: Semester,
    pub usual_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub total_grade: Option<f64>,
}

// 成绩汇总
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/transcript.ts")]
pub struct TranscriptSummary {
    pub total_courses: i64,
    pub graded_courses: i64,
    pub passed_courses: i64,
    pub earned_credits: f64,
    pub gpa: f64,
}
