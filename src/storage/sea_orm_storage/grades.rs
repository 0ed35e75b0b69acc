//! 成绩存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::prelude::{Assignments, Courses, Teachers};
use crate::entity::selections::{ActiveModel, Column, Entity as Selections};
use crate::entity::{assignments, courses, teachers};
use crate::errors::{EduAdminError, Result};
use crate::models::{
    assignments::entities::Semester,
    courses::entities::CourseType,
    selections::entities::{GradeUpdate, Selection, total_grade},
    transcripts::entities::TranscriptEntry,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    sea_query::Expr,
};

impl SeaOrmStorage {
    /// 录入成绩（单条或批量）
    ///
    /// 全部条目在一个事务内写入，任一条目失败则整体回滚。
    /// `scope` 给出时，每条选课记录都必须属于该教学任务。
    /// 取值范围在调用前由服务层校验。
    pub async fn record_grades_impl(
        &self,
        teacher_id: &str,
        scope: Option<i64>,
        updates: &[GradeUpdate],
    ) -> Result<Vec<Selection>> {
        let txn = self.begin_txn().await?;
        let now = chrono::Utc::now().timestamp();
        Self::lock_selections(&txn, updates, now).await?;
        let mut taught: HashMap<i64, bool> = HashMap::new();
        let mut recorded = Vec::with_capacity(updates.len());

        for update in updates {
            let Some(existing) = Selections::find_by_id(update.selection_id)
                .one(&txn)
                .await
                .map_err(|e| EduAdminError::from_db_err("查询选课记录", e))?
            else {
                return Err(EduAdminError::not_found(format!(
                    "selection {}",
                    update.selection_id
                )));
            };

            if let Some(assignment_id) = scope
                && existing.assignment_id != assignment_id
            {
                return Err(EduAdminError::not_found(format!(
                    "selection {} in assignment {assignment_id}",
                    update.selection_id
                )));
            }

            let is_taught = match taught.get(&existing.assignment_id) {
                Some(flag) => *flag,
                None => {
                    let flag = Assignments::find_by_id(existing.assignment_id)
                        .one(&txn)
                        .await
                        .map_err(|e| EduAdminError::from_db_err("查询教学任务", e))?
                        .map(|a| a.into_assignment().is_taught_by(teacher_id))
                        .unwrap_or(false);
                    taught.insert(existing.assignment_id, flag);
                    flag
                }
            };
            if !is_taught {
                return Err(EduAdminError::not_authorized(format!(
                    "teacher {teacher_id} does not teach the assignment of selection {}",
                    update.selection_id
                )));
            }

            let mut model: ActiveModel = existing.into();
            if let Some(usual) = update.usual_grade {
                model.usual_grade = Set(Some(usual));
            }
            if let Some(final_grade) = update.final_grade {
                model.final_grade = Set(Some(final_grade));
            }
            model.grade_time = Set(Some(now));
            model.updated_at = Set(now);

            let result = model
                .update(&txn)
                .await
                .map_err(|e| EduAdminError::from_db_err("录入成绩", e))?;
            recorded.push(result.into_selection());
        }

        Self::commit_txn(txn).await?;
        Ok(recorded)
    }

    /// 事务的第一条语句先写目标选课行，拿到写锁后再读取
    ///
    /// 先读后写的事务在 SQLite 上无法从读快照升级为写事务，会直接返回 BUSY。
    async fn lock_selections<C: ConnectionTrait>(
        conn: &C,
        updates: &[GradeUpdate],
        now: i64,
    ) -> Result<()> {
        let ids: Vec<i64> = updates.iter().map(|u| u.selection_id).collect();
        Selections::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::Id.is_in(ids))
            .exec(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("锁定选课记录", e))?;
        Ok(())
    }

    /// 学生全部选课的成绩单条目（含尚无总评的）
    pub async fn list_transcript_entries_impl(
        &self,
        student_id: &str,
    ) -> Result<Vec<TranscriptEntry>> {
        let rows = Selections::find()
            .filter(Column::StudentId.eq(student_id))
            .find_also_related(Assignments)
            .order_by_asc(Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询成绩单", e))?;

        let assignment_models: Vec<assignments::Model> =
            rows.iter().filter_map(|(_, a)| a.clone()).collect();
        if assignment_models.is_empty() {
            return Ok(Vec::new());
        }

        let course_ids: Vec<String> = assignment_models
            .iter()
            .map(|a| a.course_id.clone())
            .collect();
        let teacher_ids: Vec<String> = assignment_models
            .iter()
            .map(|a| a.teacher_id.clone())
            .collect();

        let course_map: HashMap<String, courses::Model> = Courses::find()
            .filter(courses::Column::CourseId.is_in(course_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程", e))?
            .into_iter()
            .map(|c| (c.course_id.clone(), c))
            .collect();

        let teacher_names: HashMap<String, String> = Teachers::find()
            .filter(teachers::Column::TeacherId.is_in(teacher_ids))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?
            .into_iter()
            .map(|t| (t.teacher_id, t.name))
            .collect();

        let mut entries: Vec<TranscriptEntry> = rows
            .into_iter()
            .filter_map(|(selection, assignment)| {
                let assignment = assignment?;
                let course = course_map.get(&assignment.course_id);
                Some(TranscriptEntry {
                    selection_id: selection.id,
                    course_name: course.map(|c| c.course_name.clone()).unwrap_or_default(),
                    course_type: course
                        .and_then(|c| c.course_type.parse().ok())
                        .unwrap_or(CourseType::Required),
                    credits: course.map(|c| c.credits).unwrap_or(0.0),
                    teacher_name: teacher_names
                        .get(&assignment.teacher_id)
                        .cloned()
                        .unwrap_or_default(),
                    semester: assignment.semester.parse().unwrap_or(Semester::First),
                    academic_year: assignment.academic_year,
                    course_id: assignment.course_id,
                    usual_grade: selection.usual_grade,
                    final_grade: selection.final_grade,
                    total_grade: total_grade(selection.usual_grade, selection.final_grade),
                })
            })
            .collect();

        // 学年、学期正序
        entries.sort_by(|a, b| {
            a.academic_year
                .cmp(&b.academic_year)
                .then_with(|| a.semester.cmp(&b.semester))
                .then_with(|| a.course_id.cmp(&b.course_id))
        });
        Ok(entries)
    }
}
