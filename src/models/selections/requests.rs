use super::entities::GradeUpdate;
use serde::Deserialize;
use ts_rs::TS;

// 单条成绩录入
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct RecordGradeRequest {
    pub usual_grade: Option<f64>,
    pub final_grade: Option<f64>,
}

// 批量成绩录入（整体成功或整体失败）
#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct BatchGradeRequest {
    pub grades: Vec<GradeUpdate>,
}
