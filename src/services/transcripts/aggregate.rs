use crate::models::selections::entities::round2;
use crate::models::transcripts::entities::{TranscriptEntry, TranscriptSummary};

/// 及格线
pub const PASSING_GRADE: f64 = 60.0;

/// 总评对应的绩点
///
/// | 总评 | 绩点 |
/// |------|------|
/// | [90, 100] | 4.0 |
/// | [80, 90)  | 3.0 |
/// | [70, 80)  | 2.0 |
/// | [60, 70)  | 1.0 |
/// | [0, 60)   | 0.0 |
pub fn grade_point(total: f64) -> f64 {
    if total >= 90.0 {
        4.0
    } else if total >= 80.0 {
        3.0
    } else if total >= 70.0 {
        2.0
    } else if total >= PASSING_GRADE {
        1.0
    } else {
        0.0
    }
}

/// 学分加权平均绩点，保留两位小数
///
/// 只有已有总评的课程参与计算，总学分为 0 时返回 0.0。
pub fn gpa(entries: &[TranscriptEntry]) -> f64 {
    let (points, weight) = entries
        .iter()
        .filter_map(|e| e.total_grade.map(|total| (grade_point(total), e.credits)))
        .fold((0.0, 0.0), |(points, weight), (gp, credits)| {
            (points + gp * credits, weight + credits)
        });

    if weight <= 0.0 {
        0.0
    } else {
        round2(points / weight)
    }
}

/// 已获学分：总评及格的课程学分之和
pub fn earned_credits(entries: &[TranscriptEntry]) -> f64 {
    let sum: f64 = entries
        .iter()
        .filter(|e| e.total_grade.is_some_and(|t| t >= PASSING_GRADE))
        .map(|e| e.credits)
        .sum();
    round2(sum)
}

pub fn summarize(entries: &[TranscriptEntry]) -> TranscriptSummary {
    let graded = entries.iter().filter(|e| e.total_grade.is_some()).count();
    let passed = entries
        .iter()
        .filter(|e| e.total_grade.is_some_and(|t| t >= PASSING_GRADE))
        .count();

    TranscriptSummary {
        total_courses: entries.len() as i64,
        graded_courses: graded as i64,
        passed_courses: passed as i64,
        earned_credits: earned_credits(entries),
        gpa: gpa(entries),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::assignments::entities::Semester;
    use crate::models::courses::entities::CourseType;

    fn entry(total: Option<f64>, credits: f64) -> TranscriptEntry {
        TranscriptEntry {
            selection_id: 1,
            course_id: "C001".into(),
            course_name: "Course".into(),
            course_type: CourseType::Required,
            credits,
            teacher_name: "Teacher".into(),
            academic_year: "2024-2025".into(),
            semester: Semester::First,
            usual_grade: None,
            final_grade: total,
            total_grade: total,
        }
    }

    #[test]
    fn test_grade_point_boundaries() {
        assert_eq!(grade_point(100.0), 4.0);
        assert_eq!(grade_point(90.0), 4.0);
        assert_eq!(grade_point(89.99), 3.0);
        assert_eq!(grade_point(80.0), 3.0);
        assert_eq!(grade_point(70.0), 2.0);
        assert_eq!(grade_point(60.0), 1.0);
        assert_eq!(grade_point(59.99), 0.0);
        assert_eq!(grade_point(0.0), 0.0);
    }

    #[test]
    fn test_gpa_is_credit_weighted() {
        // (4.0 * 4 + 1.0 * 2) / 6
        assert_eq!(gpa(&[entry(Some(95.0), 4.0), entry(Some(65.0), 2.0)]), 3.0);
        // (4.0 * 4 + 0.0 * 2) / 6 = 2.666...
        assert_eq!(gpa(&[entry(Some(95.0), 4.0), entry(Some(55.0), 2.0)]), 2.67);
    }

    #[test]
    fn test_gpa_ignores_ungraded_and_handles_empty() {
        assert_eq!(gpa(&[]), 0.0);
        assert_eq!(gpa(&[entry(None, 3.0)]), 0.0);
        assert_eq!(gpa(&[entry(Some(85.0), 0.0)]), 0.0);
        assert_eq!(gpa(&[entry(None, 3.0), entry(Some(72.0), 2.0)]), 2.0);
    }

    #[test]
    fn test_earned_credits_pass_line() {
        assert_eq!(earned_credits(&[entry(Some(59.0), 3.0)]), 0.0);
        assert_eq!(earned_credits(&[entry(Some(60.0), 3.0)]), 3.0);
        assert_eq!(
            earned_credits(&[entry(Some(88.0), 2.5), entry(None, 4.0), entry(Some(61.0), 0.5)]),
            3.0
        );
    }

    #[test]
    fn test_summary_counts() {
        let summary = summarize(&[
            entry(Some(95.0), 4.0),
            entry(Some(55.0), 2.0),
            entry(None, 3.0),
        ]);
        assert_eq!(summary.total_courses, 3);
        assert_eq!(summary.graded_courses, 2);
        assert_eq!(summary.passed_courses, 1);
        assert_eq!(summary.earned_credits, 4.0);
        assert_eq!(summary.gpa, 2.67);
    }
}
