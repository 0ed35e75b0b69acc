use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// 学期
///
/// 存储与传输均使用 `"1"`（第一学期）、`"2"`（第二学期）、`"3"`（夏季学期）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub enum Semester {
    #[ts(rename = "1")]
    First,
    #[ts(rename = "2")]
    Second,
    #[ts(rename = "3")]
    Summer,
}

impl Semester {
    pub fn as_str(&self) -> &'static str {
        match self {
            Semester::First => "1",
            Semester::Second => "2",
            Semester::Summer => "3",
        }
    }
}

impl std::fmt::Display for Semester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Semester {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" => Ok(Semester::First),
            "2" => Ok(Semester::Second),
            "3" => Ok(Semester::Summer),
            _ => Err(format!("Invalid semester: {s}")),
        }
    }
}

impl Serialize for Semester {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

// 同时接受字符串和整数（环境变量覆盖配置时会被解析成整数）
impl<'de> Deserialize<'de> for Semester {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        use serde::de::{Error, Unexpected, Visitor};
        use std::fmt;

        struct SemesterVisitor;

        impl<'de> Visitor<'de> for SemesterVisitor {
            type Value = Semester;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a semester: \"1\", \"2\" or \"3\"")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: Error,
            {
                value
                    .parse()
                    .map_err(|_| Error::invalid_value(Unexpected::Str(value), &self))
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: Error,
            {
                match value {
                    1 => Ok(Semester::First),
                    2 => Ok(Semester::Second),
                    3 => Ok(Semester::Summer),
                    _ => Err(Error::invalid_value(Unexpected::Unsigned(value), &self)),
                }
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: Error,
            {
                if value < 0 {
                    return Err(Error::invalid_value(Unexpected::Signed(value), &self));
                }
                self.visit_u64(value as u64)
            }
        }

        deserializer.deserialize_any(SemesterVisitor)
    }
}

// 教学任务（某教师在某学年学期讲授某门课程）
//
// 当前选课人数不在此存储，一律实时统计。
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/assignment.ts")]
pub struct Assignment {
    pub id: i64,
    pub course_id: String,
    pub teacher_id: String,
    pub academic_year: String,
    pub semester: Semester,
    pub class_time: Option<String>,
    pub location: Option<String>,
    pub exam_time: Option<chrono::DateTime<chrono::Utc>>,
    /// 0 表示不限人数
    pub enrollment_limit: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl Assignment {
    pub fn is_unlimited(&self) -> bool {
        self.enrollment_limit <= 0
    }

    /// 当前已有 `live` 条选课记录时，是否还能再接收一名学生
    pub fn has_capacity_for(&self, live: i64) -> bool {
        self.is_unlimited() || live < i64::from(self.enrollment_limit)
    }

    pub fn is_taught_by(&self, teacher_id: &str) -> bool {
        self.teacher_id == teacher_id
    }
}

/// 人数上限调整是否可行：不能低于当前实际人数（0 表示不限）
pub fn limit_fits_live_count(new_limit: i32, live: i64) -> bool {
    new_limit <= 0 || i64::from(new_limit) >= live
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(limit: i32) -> Assignment {
        let now = chrono::Utc::now();
        Assignment {
            id: 1,
            course_id: "C001".into(),
            teacher_id: "T001".into(),
            academic_year: "2024-2025".into(),
            semester: Semester::First,
            class_time: None,
            location: None,
            exam_time: None,
            enrollment_limit: limit,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_capacity_with_limit() {
        let a = assignment(2);
        assert!(a.has_capacity_for(0));
        assert!(a.has_capacity_for(1));
        assert!(!a.has_capacity_for(2));
        assert!(!a.has_capacity_for(3));
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let a = assignment(0);
        assert!(a.is_unlimited());
        assert!(a.has_capacity_for(10_000));
    }

    #[test]
    fn test_limit_adjustment() {
        assert!(limit_fits_live_count(5, 5));
        assert!(!limit_fits_live_count(4, 5));
        assert!(limit_fits_live_count(0, 500));
    }

    #[test]
    fn test_semester_serde() {
        assert_eq!(serde_json::to_string(&Semester::Summer).unwrap(), r#""3""#);
        let s: Semester = serde_json::from_str(r#""2""#).unwrap();
        assert_eq!(s, Semester::Second);
        let s: Semester = serde_json::from_str("1").unwrap();
        assert_eq!(s, Semester::First);
        assert!(serde_json::from_str::<Semester>(r#""4""#).is_err());
    }

    #[test]
    fn test_semester_order() {
        assert!(Semester::Summer > Semester::Second);
        assert!(Semester::Second > Semester::First);
    }
}
