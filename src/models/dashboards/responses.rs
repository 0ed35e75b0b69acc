use crate::models::assignments::entities::Semester;
use crate::models::students::entities::Student;
use crate::models::teachers::entities::Teacher;
use crate::models::transcripts::entities::TranscriptSummary;
use serde::Serialize;
use ts_rs::TS;

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct StudentDashboard {
    pub student: Student,
    pub summary: TranscriptSummary,
    pub academic_year: String,
    pub semester: Semester,
    pub current_term_selections: i64,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/dashboard.ts")]
pub struct TeacherDashboard {
    pub teacher: Teacher,
    pub total_assignments: i64,
    pub total_students: i64,
    pub academic_year: String,
    pub current_year_assignments: i64,
}
