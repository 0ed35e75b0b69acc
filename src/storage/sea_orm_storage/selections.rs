//! 选课记录存储操作
//!
//! 选课与退选都在单个事务内完成。选课事务以锁定教学任务行开始，
//! 同一教学任务上的并发选课因此串行执行，人数上限不会被突破。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Assignments, Courses, Students, Teachers};
use crate::entity::selections::{ActiveModel, Column, Entity as Selections, Model};
use crate::entity::{assignments, courses, students, teachers};
use crate::errors::{EduAdminError, Result};
use crate::models::assignments::entities::Semester;
use crate::models::selections::{
    entities::Selection,
    responses::{RosterEntry, SelectionDetail, SelectionResponse, TeacherStudentEntry},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use tracing::debug;

impl SeaOrmStorage {
    /// 组装"我的选课"行
    async fn build_selection_details<C: ConnectionTrait>(
        conn: &C,
        models: Vec<Model>,
    ) -> Result<Vec<SelectionDetail>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let assignment_ids: Vec<i64> = models.iter().map(|m| m.assignment_id).collect();
        let assignment_map: HashMap<i64, assignments::Model> = Assignments::find()
            .filter(assignments::Column::Id.is_in(assignment_ids))
            .all(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务", e))?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();

        let course_ids: Vec<String> = assignment_map.values().map(|a| a.course_id.clone()).collect();
        let teacher_ids: Vec<String> = assignment_map
            .values()
            .map(|a| a.teacher_id.clone())
            .collect();

        let course_map: HashMap<String, courses::Model> = Courses::find()
            .filter(courses::Column::CourseId.is_in(course_ids))
            .all(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程", e))?
            .into_iter()
            .map(|c| (c.course_id.clone(), c))
            .collect();

        let teacher_names: HashMap<String, String> = Teachers::find()
            .filter(teachers::Column::TeacherId.is_in(teacher_ids))
            .all(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?
            .into_iter()
            .map(|t| (t.teacher_id, t.name))
            .collect();

        let mut details = Vec::with_capacity(models.len());
        for model in models {
            // 外键保证教学任务存在，缺失时跳过该行
            let Some(assignment) = assignment_map.get(&model.assignment_id) else {
                continue;
            };
            let course = course_map.get(&assignment.course_id);
            details.push(SelectionDetail {
                course_id: assignment.course_id.clone(),
                course_name: course.map(|c| c.course_name.clone()).unwrap_or_default(),
                credits: course.map(|c| c.credits).unwrap_or(0.0),
                teacher_name: teacher_names
                    .get(&assignment.teacher_id)
                    .cloned()
                    .unwrap_or_default(),
                academic_year: assignment.academic_year.clone(),
                semester: assignment.semester.parse().unwrap_or(Semester::First),
                class_time: assignment.class_time.clone(),
                location: assignment.location.clone(),
                selection: SelectionResponse::from(model.into_selection()),
            });
        }

        Ok(details)
    }

    /// 选课
    ///
    /// 事务内依次检查：教学任务存在、学生存在、未重复选课、人数未满。
    pub async fn enroll_impl(&self, student_id: &str, assignment_id: i64) -> Result<Selection> {
        let txn = self.begin_txn().await?;

        let Some(assignment) = Self::lock_assignment(&txn, assignment_id).await? else {
            return Err(EduAdminError::not_found(format!(
                "assignment {assignment_id}"
            )));
        };
        let assignment = assignment.into_assignment();

        let student_exists = Students::find_by_id(student_id.to_string())
            .one(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生", e))?
            .is_some();
        if !student_exists {
            return Err(EduAdminError::not_found(format!("student {student_id}")));
        }

        let already_selected = Selections::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::AssignmentId.eq(assignment_id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课记录", e))?
            > 0;
        if already_selected {
            return Err(EduAdminError::duplicate_enrollment(format!(
                "student {student_id} already selected assignment {assignment_id}"
            )));
        }

        let live = Self::count_live_selections(&txn, assignment_id).await?;
        if !assignment.has_capacity_for(live) {
            debug!(
                "Assignment {} is full ({}/{})",
                assignment_id, live, assignment.enrollment_limit
            );
            return Err(EduAdminError::capacity_exceeded(format!(
                "assignment {assignment_id} is full ({live}/{})",
                assignment.enrollment_limit
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(student_id.to_string()),
            assignment_id: Set(assignment_id),
            usual_grade: Set(None),
            final_grade: Set(None),
            selection_time: Set(now),
            grade_time: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建选课记录", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.into_selection())
    }

    /// 退选
    ///
    /// 仅本人且尚未录入任何成绩项时可退选。事务的第一条语句就是带条件的删除，
    /// 先拿到写锁，与并发的成绩录入之间不会出现已录成绩却被删除的情况。
    /// 未删除任何行时再读取记录判断拒绝原因。
    pub async fn withdraw_impl(&self, student_id: &str, selection_id: i64) -> Result<()> {
        let txn = self.begin_txn().await?;

        let result = Selections::delete_many()
            .filter(Column::Id.eq(selection_id))
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::UsualGrade.is_null())
            .filter(Column::FinalGrade.is_null())
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除选课记录", e))?;

        if result.rows_affected > 0 {
            Self::commit_txn(txn).await?;
            return Ok(());
        }

        let Some(existing) = Selections::find_by_id(selection_id)
            .one(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课记录", e))?
        else {
            return Err(EduAdminError::not_found(format!("selection {selection_id}")));
        };
        let selection = existing.into_selection();

        if !selection.is_owned_by(student_id) {
            return Err(EduAdminError::not_owner(format!(
                "selection {selection_id} does not belong to student {student_id}"
            )));
        }
        if selection.is_withdrawal_locked() {
            return Err(EduAdminError::grade_already_recorded(format!(
                "selection {selection_id} already has grades"
            )));
        }
        Err(EduAdminError::store_conflict(format!(
            "selection {selection_id} changed during withdrawal"
        )))
    }

    /// 通过 ID 获取选课记录
    pub async fn get_selection_impl(&self, id: i64) -> Result<Option<Selection>> {
        let result = Selections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课记录", e))?;

        Ok(result.map(|m| m.into_selection()))
    }

    pub async fn get_selection_detail_impl(&self, id: i64) -> Result<Option<SelectionDetail>> {
        let Some(model) = Selections::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课记录", e))?
        else {
            return Ok(None);
        };

        Ok(Self::build_selection_details(&self.db, vec![model])
            .await?
            .into_iter()
            .next())
    }

    /// 学生的全部选课，最近选的在前
    pub async fn list_student_selections_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<SelectionDetail>> {
        let models = Selections::find()
            .filter(Column::StudentId.eq(student_id))
            .order_by_desc(Column::SelectionTime)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课列表", e))?;

        Self::build_selection_details(&self.db, models).await
    }

    /// 学生已选的教学任务 ID
    pub async fn list_selected_assignment_ids_impl(&self, student_id: &str) -> Result<Vec<i64>> {
        Selections::find()
            .select_only()
            .column(Column::AssignmentId)
            .filter(Column::StudentId.eq(student_id))
            .into_tuple::<i64>()
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课列表", e))
    }

    /// 学生在指定学年学期的选课数
    pub async fn count_student_selections_in_term_impl(
        &self,
        student_id: &str,
        academic_year: &str,
        semester: Semester,
    ) -> Result<i64> {
        let count = Selections::find()
            .inner_join(Assignments)
            .filter(Column::StudentId.eq(student_id))
            .filter(assignments::Column::AcademicYear.eq(academic_year))
            .filter(assignments::Column::Semester.eq(semester.as_str()))
            .count(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计选课数", e))?;

        Ok(count as i64)
    }

    /// 教学任务花名册，按学生姓名排序
    pub async fn list_roster_impl(&self, assignment_id: i64) -> Result<Vec<RosterEntry>> {
        let models = Selections::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询花名册", e))?;

        if models.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<String> = models.iter().map(|m| m.student_id.clone()).collect();
        let student_names: HashMap<String, String> = Students::find()
            .filter(students::Column::StudentId.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生", e))?
            .into_iter()
            .map(|s| (s.student_id, s.name))
            .collect();

        let mut roster: Vec<RosterEntry> = models
            .into_iter()
            .map(|m| {
                let selection = m.into_selection();
                RosterEntry {
                    selection_id: selection.id,
                    student_name: student_names
                        .get(&selection.student_id)
                        .cloned()
                        .unwrap_or_default(),
                    total_grade: selection.total_grade(),
                    student_id: selection.student_id,
                    usual_grade: selection.usual_grade,
                    final_grade: selection.final_grade,
                    grade_time: selection.grade_time,
                }
            })
            .collect();

        roster.sort_by(|a, b| {
            a.student_name
                .cmp(&b.student_name)
                .then_with(|| a.student_id.cmp(&b.student_id))
        });
        Ok(roster)
    }

    /// 教师全部教学任务中的选课记录
    pub async fn list_teacher_student_selections_impl(
        &self,
        teacher_id: &str,
        student_id: Option<&str>,
    ) -> Result<Vec<TeacherStudentEntry>> {
        let assignment_map: HashMap<i64, assignments::Model> = Assignments::find()
            .filter(assignments::Column::TeacherId.eq(teacher_id))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务", e))?
            .into_iter()
            .map(|a| (a.id, a))
            .collect();
        if assignment_map.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = Selections::find()
            .filter(Column::AssignmentId.is_in(assignment_map.keys().copied().collect::<Vec<_>>()));
        if let Some(student_id) = student_id {
            query = query.filter(Column::StudentId.eq(student_id));
        }
        let models = query
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询选课记录", e))?;
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<String> = assignment_map.values().map(|a| a.course_id.clone()).collect();
        let course_names: HashMap<String, String> = Courses::find()
            .filter(courses::Column::CourseId.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程", e))?
            .into_iter()
            .map(|c| (c.course_id, c.course_name))
            .collect();

        let student_ids: Vec<String> = models.iter().map(|m| m.student_id.clone()).collect();
        let student_map: HashMap<String, students::Model> = Students::find()
            .filter(students::Column::StudentId.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生", e))?
            .into_iter()
            .map(|s| (s.student_id.clone(), s))
            .collect();

        let mut entries = Vec::with_capacity(models.len());
        for model in models {
            let Some(assignment) = assignment_map.get(&model.assignment_id) else {
                continue;
            };
            let student = student_map.get(&model.student_id);
            entries.push(TeacherStudentEntry {
                student_name: student.map(|s| s.name.clone()).unwrap_or_default(),
                dept_id: student.map(|s| s.dept_id.clone()).unwrap_or_default(),
                course_id: assignment.course_id.clone(),
                course_name: course_names
                    .get(&assignment.course_id)
                    .cloned()
                    .unwrap_or_default(),
                academic_year: assignment.academic_year.clone(),
                semester: assignment.semester.parse().unwrap_or(Semester::First),
                selection: SelectionResponse::from(model.into_selection()),
            });
        }

        entries.sort_by(|a, b| {
            b.academic_year
                .cmp(&a.academic_year)
                .then_with(|| b.semester.cmp(&a.semester))
                .then_with(|| a.course_id.cmp(&b.course_id))
                .then_with(|| a.student_name.cmp(&b.student_name))
                .then_with(|| a.selection.selection.student_id.cmp(&b.selection.selection.student_id))
        });
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::errors::EduAdminError;
    use crate::models::assignments::entities::Semester;
    use crate::models::selections::entities::GradeUpdate;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_enroll_and_duplicate() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;

        let selection = storage.enroll("S001", campus.assignment.id).await.unwrap();
        assert_eq!(selection.student_id, "S001");
        assert!(selection.usual_grade.is_none());
        assert!(selection.grade_time.is_none());

        let err = storage
            .enroll("S001", campus.assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::DuplicateEnrollment(_)));
    }

    #[tokio::test]
    async fn test_enroll_unknown_targets() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;

        let err = storage.enroll("S001", 9999).await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));

        let err = storage
            .enroll("S404", campus.assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_capacity_exceeded() {
        let campus = campus(1).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;

        storage.enroll("S001", campus.assignment.id).await.unwrap();
        let err = storage
            .enroll("S002", campus.assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::CapacityExceeded(_)));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_enrollment_respects_limit() {
        let campus = file_campus(1).await;
        let assignment_id = campus.assignment.id;
        for i in 0..16 {
            seed_student(&campus.storage, &format!("S{i:03}"), "CS").await;
        }

        let mut handles = Vec::new();
        for i in 0..16 {
            let storage = campus.storage.clone();
            handles.push(tokio::spawn(async move {
                storage.enroll(&format!("S{i:03}"), assignment_id).await
            }));
        }

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(e) => assert!(
                    matches!(
                        e,
                        EduAdminError::CapacityExceeded(_) | EduAdminError::StoreConflict(_)
                    ),
                    "unexpected error: {}",
                    e.format_simple()
                ),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(campus.storage.list_roster(assignment_id).await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_withdrawals() {
        let campus = file_campus(0).await;
        let assignment_id = campus.assignment.id;
        let mut selections = Vec::new();
        for i in 0..16 {
            let student_id = format!("S{i:03}");
            seed_student(&campus.storage, &student_id, "CS").await;
            let selection = campus.storage.enroll(&student_id, assignment_id).await.unwrap();
            selections.push((student_id, selection.id));
        }

        let mut handles = Vec::new();
        for (student_id, selection_id) in selections {
            let storage = campus.storage.clone();
            handles.push(tokio::spawn(async move {
                storage.withdraw(&student_id, selection_id).await
            }));
        }

        let mut withdrawn = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => withdrawn += 1,
                Err(e) => assert!(
                    matches!(e, EduAdminError::StoreConflict(_)),
                    "unexpected error: {}",
                    e.format_simple()
                ),
            }
        }
        let remaining = campus.storage.list_roster(assignment_id).await.unwrap().len();
        assert_eq!(withdrawn + remaining, 16);
        assert!(withdrawn > 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_withdraw_racing_grade_entry() {
        let campus = file_campus(0).await;
        let assignment_id = campus.assignment.id;
        let mut selections = Vec::new();
        for i in 0..8 {
            let student_id = format!("S{i:03}");
            seed_student(&campus.storage, &student_id, "CS").await;
            let selection = campus.storage.enroll(&student_id, assignment_id).await.unwrap();
            selections.push((student_id, selection.id));
        }

        let mut handles = Vec::new();
        for (student_id, selection_id) in selections {
            let withdraw_storage = campus.storage.clone();
            let grade_storage = campus.storage.clone();
            let withdraw = tokio::spawn(async move {
                withdraw_storage.withdraw(&student_id, selection_id).await
            });
            let grade = tokio::spawn(async move {
                grade_storage
                    .record_grades(
                        "T001",
                        None,
                        &[GradeUpdate::new(selection_id, None, Some(75.0))],
                    )
                    .await
            });
            handles.push((selection_id, withdraw, grade));
        }

        for (selection_id, withdraw, grade) in handles {
            let withdraw = withdraw.await.unwrap();
            let grade = grade.await.unwrap();
            for err in withdraw.as_ref().err().into_iter().chain(grade.as_ref().err()) {
                assert_typed_rejection(err);
            }

            // 不会既退选成功又录入成功
            assert!(!(withdraw.is_ok() && grade.is_ok()));
            let stored = campus.storage.get_selection(selection_id).await.unwrap();
            if withdraw.is_ok() {
                assert!(stored.is_none());
            }
            if grade.is_ok() {
                assert_eq!(stored.and_then(|s| s.final_grade), Some(75.0));
            }
        }
    }

    #[tokio::test]
    async fn test_withdraw_rules() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        let selection = storage.enroll("S001", campus.assignment.id).await.unwrap();

        let err = storage.withdraw("S002", selection.id).await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotOwner(_)));

        let err = storage.withdraw("S001", 9999).await.unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));

        storage.withdraw("S001", selection.id).await.unwrap();
        assert!(storage.get_selection(selection.id).await.unwrap().is_none());

        // 退选后可重新选课
        storage.enroll("S001", campus.assignment.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_withdraw_refused_after_any_grade() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        let selection = storage.enroll("S001", campus.assignment.id).await.unwrap();

        storage
            .record_grades("T001", None, &[GradeUpdate::new(selection.id, Some(0.0), None)])
            .await
            .unwrap();

        let err = storage.withdraw("S001", selection.id).await.unwrap_err();
        assert!(matches!(err, EduAdminError::GradeAlreadyRecorded(_)));
        assert!(storage.get_selection(selection.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_student_views_and_roster() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_named_student(storage, "S002", "Bob", "CS").await;
        seed_named_student(storage, "S001", "Alice", "CS").await;
        let other = seed_assignment(storage, "C001", "T001", "2024-2025", Semester::Second, 0).await;

        storage.enroll("S002", campus.assignment.id).await.unwrap();
        storage.enroll("S001", campus.assignment.id).await.unwrap();
        storage.enroll("S001", other.id).await.unwrap();

        let roster = storage.list_roster(campus.assignment.id).await.unwrap();
        let names: Vec<&str> = roster.iter().map(|r| r.student_name.as_str()).collect();
        assert_eq!(names, vec!["Alice", "Bob"]);

        let details = storage.list_student_selections("S001").await.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].course_name, "Course C001");
        assert_eq!(details[0].teacher_name, "Teacher T001");

        let mut ids = storage.list_selected_assignment_ids("S001").await.unwrap();
        ids.sort();
        assert_eq!(ids, vec![campus.assignment.id, other.id]);

        let in_term = storage
            .count_student_selections_in_term("S001", "2024-2025", Semester::Second)
            .await
            .unwrap();
        assert_eq!(in_term, 1);

        let detail = storage
            .get_selection_detail(details[0].selection.selection.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(detail.academic_year, "2024-2025");
    }
}
