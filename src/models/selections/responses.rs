use super::entities::Selection;
use crate::models::assignments::entities::Semester;
use crate::models::assignments::responses::AssignmentView;
use crate::models::students::entities::Student;
use serde::Serialize;
use ts_rs::TS;

// 选课记录及总评
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct SelectionResponse {
    #[serde(flatten)]
    #[ts(flatten)]
    pub selection: Selection,
    pub total_grade: Option<f64>,
}

impl From<Selection> for SelectionResponse {
    fn from(selection: Selection) -> Self {
        let total_grade = selection.total_grade();
        Self {
            selection,
            total_grade,
        }
    }
}

// 学生"我的选课"行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct SelectionDetail {
    #[serde(flatten)]
    #[ts(flatten)]
    pub selection: SelectionResponse,
    pub course_id: String,
    pub course_name: String,
    pub credits: f64,
    pub teacher_name: String,
    pub academic_year: String,
    pub semester: Semester,
    pub class_time: Option<String>,
    pub location: Option<String>,
}

// 教师花名册行
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct RosterEntry {
    pub selection_id: i64,
    pub student_id: String,
    pub student_name: String,
    pub usual_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub total_grade: Option<f64>,
    pub grade_time: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct RosterResponse {
    pub assignment: AssignmentView,
    pub items: Vec<RosterEntry>,
}

// 教师"我的学生"行：学生在本人某个教学任务中的一条选课
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct TeacherStudentEntry {
    #[serde(flatten)]
    #[ts(flatten)]
    pub selection: SelectionResponse,
    pub student_name: String,
    pub dept_id: String,
    pub course_id: String,
    pub course_name: String,
    pub academic_year: String,
    pub semester: Semester,
}

#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct TeacherStudentDetail {
    pub student: Student,
    pub items: Vec<TeacherStudentEntry>,
}
