use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 课程类型
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub enum CourseType {
    Required, // 必修
    Elective, // 选修
}

impl std::fmt::Display for CourseType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CourseType::Required => write!(f, "required"),
            CourseType::Elective => write!(f, "elective"),
        }
    }
}

impl std::str::FromStr for CourseType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "required" => Ok(CourseType::Required),
            "elective" => Ok(CourseType::Elective),
            _ => Err(format!("Invalid course type: {s}")),
        }
    }
}

// 课程实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/course.ts")]
pub struct Course {
    pub course_id: String,
    pub course_name: String,
    pub course_type: CourseType,
    pub hours: i32,
    pub credits: f64,
    pub description: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

/// 学分必须是非负有限数
pub fn validate_credits(credits: f64) -> Result<(), &'static str> {
    if credits.is_finite() && credits >= 0.0 {
        Ok(())
    } else {
        Err("Credits must be a non-negative number")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credits() {
        assert!(validate_credits(0.0).is_ok());
        assert!(validate_credits(3.5).is_ok());
        assert!(validate_credits(-1.0).is_err());
        assert!(validate_credits(f64::NAN).is_err());
        assert!(validate_credits(f64::INFINITY).is_err());
    }
}
