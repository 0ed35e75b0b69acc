use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{EduAdminError, Result};

/// 平时成绩权重
pub const USUAL_WEIGHT: f64 = 0.3;
/// 期末成绩权重
pub const FINAL_WEIGHT: f64 = 0.7;
/// 成绩取值上限
pub const MAX_GRADE: f64 = 100.0;

// 选课记录
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct Selection {
    pub id: i64,
    pub student_id: String,
    pub assignment_id: i64,
    pub usual_grade: Option<f64>,
    pub final_grade: Option<f64>,
    pub selection_time: chrono::DateTime<chrono::Utc>,
    /// 仅在写入任一成绩项时设置
    pub grade_time: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Selection {
    /// 总评成绩
    pub fn total_grade(&self) -> Option<f64> {
        total_grade(self.usual_grade, self.final_grade)
    }

    /// 已录入任一成绩项后不可退选
    pub fn is_withdrawal_locked(&self) -> bool {
        self.usual_grade.is_some() || self.final_grade.is_some()
    }

    pub fn is_owned_by(&self, student_id: &str) -> bool {
        self.student_id == student_id
    }
}

/// 计算总评成绩
///
/// - 两项都未录入：无总评
/// - 只录入一项：取该项
/// - 都已录入：`平时 * 0.3 + 期末 * 0.7`，保留两位小数
pub fn total_grade(usual: Option<f64>, final_grade: Option<f64>) -> Option<f64> {
    match (usual, final_grade) {
        (None, None) => None,
        (Some(u), None) => Some(u),
        (None, Some(f)) => Some(f),
        (Some(u), Some(f)) => Some(round2(u * USUAL_WEIGHT + f * FINAL_WEIGHT)),
    }
}

/// 四舍五入到两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 单项成绩校验，NaN 视为越界
pub fn validate_grade_value(field: &str, value: Option<f64>) -> Result<()> {
    match value {
        Some(v) if !(0.0..=MAX_GRADE).contains(&v) => Err(EduAdminError::invalid_grade_range(
            format!("{field}={v} not in [0, 100]"),
        )),
        _ => Ok(()),
    }
}

// 一次成绩录入（None 表示该项保持不变）
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/selection.ts")]
pub struct GradeUpdate {
    pub selection_id: i64,
    pub usual_grade: Option<f64>,
    pub final_grade: Option<f64>,
}

impl GradeUpdate {
    pub fn new(selection_id: i64, usual_grade: Option<f64>, final_grade: Option<f64>) -> Self {
        Self {
            selection_id,
            usual_grade,
            final_grade,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.usual_grade.is_none() && self.final_grade.is_none() {
            return Err(EduAdminError::validation(format!(
                "selection {}: no grade component supplied",
                self.selection_id
            )));
        }
        validate_grade_value("usual_grade", self.usual_grade)?;
        validate_grade_value("final_grade", self.final_grade)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_grade_rules() {
        assert_eq!(total_grade(Some(80.0), Some(90.0)), Some(87.0));
        assert_eq!(total_grade(None, Some(70.0)), Some(70.0));
        assert_eq!(total_grade(Some(65.5), None), Some(65.5));
        assert_eq!(total_grade(None, None), None);
    }

    #[test]
    fn test_total_grade_rounds_to_two_places() {
        // 77 * 0.3 + 88 * 0.7 = 84.7
        assert_eq!(total_grade(Some(77.0), Some(88.0)), Some(84.7));
        // 33.3 * 0.3 + 66.6 * 0.7 = 56.61
        assert_eq!(total_grade(Some(33.3), Some(66.6)), Some(56.61));
    }

    #[test]
    fn test_grade_range_validation() {
        assert!(GradeUpdate::new(1, Some(0.0), Some(100.0)).validate().is_ok());
        assert!(matches!(
            GradeUpdate::new(1, Some(105.0), None).validate(),
            Err(EduAdminError::InvalidGradeRange(_))
        ));
        assert!(matches!(
            GradeUpdate::new(1, None, Some(-0.5)).validate(),
            Err(EduAdminError::InvalidGradeRange(_))
        ));
        assert!(matches!(
            GradeUpdate::new(1, Some(f64::NAN), None).validate(),
            Err(EduAdminError::InvalidGradeRange(_))
        ));
        assert!(matches!(
            GradeUpdate::new(1, None, None).validate(),
            Err(EduAdminError::Validation(_))
        ));
    }

    #[test]
    fn test_withdrawal_lock() {
        let now = chrono::Utc::now();
        let mut selection = Selection {
            id: 1,
            student_id: "S001".into(),
            assignment_id: 1,
            usual_grade: None,
            final_grade: None,
            selection_time: now,
            grade_time: None,
            created_at: now,
            updated_at: now,
        };
        assert!(!selection.is_withdrawal_locked());
        selection.final_grade = Some(0.0);
        assert!(selection.is_withdrawal_locked());
    }
}
