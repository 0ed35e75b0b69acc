//! 教学任务存储操作
//!
//! 选课人数一律由 selections 表实时统计，不落库。

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::assignments::{ActiveModel, Column, Entity as Assignments, Model};
use crate::entity::prelude::{Courses, Selections, Teachers};
use crate::entity::{courses, selections, teachers};
use crate::errors::{EduAdminError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    assignments::{
        entities::{Assignment, limit_fits_live_count},
        requests::{AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentView,
    },
    courses::entities::CourseType,
};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Select, Set,
};

impl SeaOrmStorage {
    /// 教学任务的展示排序：学年倒序、学期倒序、id 正序
    fn ordered(select: Select<Assignments>) -> Select<Assignments> {
        select
            .order_by_desc(Column::AcademicYear)
            .order_by_desc(Column::Semester)
            .order_by_asc(Column::Id)
    }

    /// 锁定教学任务行并重新读取
    ///
    /// 事务内第一条语句即为写操作：PostgreSQL/MySQL 上取得行锁，SQLite 上取得数据库写锁。
    /// 同一教学任务上的并发事务在此串行化。
    pub(crate) async fn lock_assignment<C: ConnectionTrait>(
        conn: &C,
        assignment_id: i64,
    ) -> Result<Option<Model>> {
        Assignments::update_many()
            .col_expr(Column::UpdatedAt, Expr::value(chrono::Utc::now().timestamp()))
            .filter(Column::Id.eq(assignment_id))
            .exec(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("锁定教学任务", e))?;

        Assignments::find_by_id(assignment_id)
            .one(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务", e))
    }

    /// 单个教学任务的实时选课人数
    pub(crate) async fn count_live_selections<C: ConnectionTrait>(
        conn: &C,
        assignment_id: i64,
    ) -> Result<i64> {
        let count = Selections::find()
            .filter(selections::Column::AssignmentId.eq(assignment_id))
            .count(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计选课人数", e))?;
        Ok(count as i64)
    }

    /// 批量统计实时选课人数
    async fn live_counts<C: ConnectionTrait>(
        conn: &C,
        assignment_ids: &[i64],
    ) -> Result<HashMap<i64, i64>> {
        if assignment_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = Selections::find()
            .select_only()
            .column(selections::Column::AssignmentId)
            .column_as(selections::Column::Id.count(), "count")
            .filter(selections::Column::AssignmentId.is_in(assignment_ids.iter().copied()))
            .group_by(selections::Column::AssignmentId)
            .into_tuple::<(i64, i64)>()
            .all(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计选课人数", e))?;

        Ok(rows.into_iter().collect())
    }

    /// 组装展示行：课程、教师信息与实时人数
    pub(crate) async fn build_assignment_views<C: ConnectionTrait>(
        conn: &C,
        models: Vec<Model>,
    ) -> Result<Vec<AssignmentView>> {
        if models.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = models.iter().map(|m| m.id).collect();
        let course_ids: Vec<String> = models.iter().map(|m| m.course_id.clone()).collect();
        let teacher_ids: Vec<String> = models.iter().map(|m| m.teacher_id.clone()).collect();

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

        let counts = Self::live_counts(conn, &ids).await?;

        Ok(models
            .into_iter()
            .map(|m| {
                let course = course_map.get(&m.course_id);
                let teacher_name = teacher_names.get(&m.teacher_id).cloned().unwrap_or_default();
                let current_enrollment = counts.get(&m.id).copied().unwrap_or(0);
                AssignmentView {
                    course_name: course.map(|c| c.course_name.clone()).unwrap_or_default(),
                    course_type: course
                        .and_then(|c| c.course_type.parse().ok())
                        .unwrap_or(CourseType::Required),
                    credits: course.map(|c| c.credits).unwrap_or(0.0),
                    teacher_name,
                    current_enrollment,
                    assignment: m.into_assignment(),
                }
            })
            .collect())
    }

    /// 创建教学任务
    pub async fn create_assignment_impl(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        let course_exists = Courses::find_by_id(req.course_id.clone())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程", e))?
            .is_some();
        if !course_exists {
            return Err(EduAdminError::not_found(format!("course {}", req.course_id)));
        }

        let teacher_exists = Teachers::find_by_id(req.teacher_id.clone())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?
            .is_some();
        if !teacher_exists {
            return Err(EduAdminError::not_found(format!("teacher {}", req.teacher_id)));
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            course_id: Set(req.course_id),
            teacher_id: Set(req.teacher_id),
            academic_year: Set(req.academic_year),
            semester: Set(req.semester.as_str().to_string()),
            class_time: Set(req.class_time),
            location: Set(req.location),
            exam_time: Set(req.exam_time.map(|t| t.timestamp())),
            enrollment_limit: Set(req.enrollment_limit.max(0)),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        // (课程, 教师, 学年, 学期) 重复由唯一索引拒绝
        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建教学任务", e))?;

        Ok(result.into_assignment())
    }

    /// 通过 ID 获取教学任务
    pub async fn get_assignment_impl(&self, id: i64) -> Result<Option<Assignment>> {
        let result = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务", e))?;

        Ok(result.map(|m| m.into_assignment()))
    }

    /// 通过 ID 获取教学任务展示行
    pub async fn get_assignment_view_impl(&self, id: i64) -> Result<Option<AssignmentView>> {
        let Some(model) = Assignments::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务", e))?
        else {
            return Ok(None);
        };

        Ok(Self::build_assignment_views(&self.db, vec![model])
            .await?
            .into_iter()
            .next())
    }

    /// 分页列出教学任务
    pub async fn list_assignments_impl(
        &self,
        query: AssignmentListParams,
    ) -> Result<PaginatedResponse<AssignmentView>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Assignments::find();

        if let Some(ref academic_year) = query.academic_year {
            select = select.filter(Column::AcademicYear.eq(academic_year.as_str()));
        }
        if let Some(semester) = query.semester {
            select = select.filter(Column::Semester.eq(semester.as_str()));
        }
        if let Some(ref teacher_id) = query.teacher_id {
            select = select.filter(Column::TeacherId.eq(teacher_id.as_str()));
        }
        if let Some(ref course_id) = query.course_id {
            select = select.filter(Column::CourseId.eq(course_id.as_str()));
        }

        let paginator = Self::ordered(select).paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务总数", e))?;

        let models = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务列表", e))?;

        Ok(PaginatedResponse {
            items: Self::build_assignment_views(&self.db, models).await?,
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 全部教学任务展示行
    pub async fn list_assignment_views_impl(&self) -> Result<Vec<AssignmentView>> {
        let models = Self::ordered(Assignments::find())
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务列表", e))?;

        Self::build_assignment_views(&self.db, models).await
    }

    /// 某教师的全部教学任务
    pub async fn list_teacher_assignments_impl(
        &self,
        teacher_id: &str,
    ) -> Result<Vec<AssignmentView>> {
        let models = Self::ordered(Assignments::find().filter(Column::TeacherId.eq(teacher_id)))
            .all(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教学任务列表", e))?;

        Self::build_assignment_views(&self.db, models).await
    }

    /// 更新教学任务
    ///
    /// 调整人数上限时先锁定教学任务，与选课事务互斥，新上限不得低于当前人数。
    pub async fn update_assignment_impl(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        let txn = self.begin_txn().await?;

        let Some(existing) = Self::lock_assignment(&txn, id).await? else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();

        if let Some(limit) = update.enrollment_limit {
            let limit = limit.max(0);
            let live = Self::count_live_selections(&txn, id).await?;
            if !limit_fits_live_count(limit, live) {
                return Err(EduAdminError::capacity_exceeded(format!(
                    "assignment {id}: limit {limit} below current enrollment {live}"
                )));
            }
            model.enrollment_limit = Set(limit);
        }
        if let Some(class_time) = update.class_time {
            model.class_time = Set(Some(class_time));
        }
        if let Some(location) = update.location {
            model.location = Set(Some(location));
        }
        if let Some(exam_time) = update.exam_time {
            model.exam_time = Set(Some(exam_time.timestamp()));
        }
        model.updated_at = Set(chrono::Utc::now().timestamp());

        let result = model
            .update(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新教学任务", e))?;

        Self::commit_txn(txn).await?;
        Ok(Some(result.into_assignment()))
    }

    /// 删除教学任务
    ///
    /// 仍有选课记录时拒绝。
    pub async fn delete_assignment_impl(&self, id: i64) -> Result<bool> {
        let txn = self.begin_txn().await?;

        if Self::lock_assignment(&txn, id).await?.is_none() {
            return Ok(false);
        }

        let live = Self::count_live_selections(&txn, id).await?;
        if live > 0 {
            return Err(EduAdminError::store_conflict(format!(
                "assignment {id} still has {live} selection(s)"
            )));
        }

        let result = Assignments::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除教学任务", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::errors::EduAdminError;
    use crate::models::PaginationQuery;
    use crate::models::assignments::entities::Semester;
    use crate::models::assignments::requests::{
        AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest,
    };
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_duplicate_assignment_is_store_conflict() {
        let campus = campus(0).await;
        let err = campus
            .storage
            .create_assignment(CreateAssignmentRequest {
                course_id: "C001".into(),
                teacher_id: "T001".into(),
                academic_year: "2024-2025".into(),
                semester: Semester::First,
                class_time: None,
                location: None,
                exam_time: None,
                enrollment_limit: 30,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
    }

    #[tokio::test]
    async fn test_assignment_requires_existing_course() {
        let campus = campus(0).await;
        let err = campus
            .storage
            .create_assignment(CreateAssignmentRequest {
                course_id: "C404".into(),
                teacher_id: "T001".into(),
                academic_year: "2024-2025".into(),
                semester: Semester::Second,
                class_time: None,
                location: None,
                exam_time: None,
                enrollment_limit: 0,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_views_carry_live_counts_and_order() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        let summer = seed_assignment(storage, "C001", "T001", "2024-2025", Semester::Summer, 0).await;
        let older = seed_assignment(storage, "C001", "T001", "2023-2024", Semester::Second, 0).await;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        storage.enroll("S001", summer.id).await.unwrap();
        storage.enroll("S002", summer.id).await.unwrap();

        let views = storage.list_assignment_views().await.unwrap();
        let ids: Vec<i64> = views.iter().map(|v| v.assignment.id).collect();
        assert_eq!(ids, vec![summer.id, campus.assignment.id, older.id]);
        assert_eq!(views[0].current_enrollment, 2);
        assert_eq!(views[0].course_name, "Course C001");
        assert_eq!(views[0].teacher_name, "Teacher T001");
        assert_eq!(views[0].credits, 3.0);
        assert_eq!(views[1].current_enrollment, 0);

        let page = storage
            .list_assignments(AssignmentListParams {
                pagination: PaginationQuery::default(),
                academic_year: Some("2024-2025".into()),
                semester: None,
                teacher_id: None,
                course_id: None,
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 2);
    }

    #[tokio::test]
    async fn test_limit_cannot_drop_below_live_count() {
        let campus = campus(5).await;
        let storage = &campus.storage;
        let id = campus.assignment.id;
        seed_student(storage, "S001", "CS").await;
        seed_student(storage, "S002", "CS").await;
        storage.enroll("S001", id).await.unwrap();
        storage.enroll("S002", id).await.unwrap();

        let err = storage
            .update_assignment(
                id,
                UpdateAssignmentRequest {
                    enrollment_limit: Some(1),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::CapacityExceeded(_)));

        let updated = storage
            .update_assignment(
                id,
                UpdateAssignmentRequest {
                    enrollment_limit: Some(2),
                    location: Some("B202".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.enrollment_limit, 2);
        assert_eq!(updated.location.as_deref(), Some("B202"));
    }

    #[tokio::test]
    async fn test_assignment_with_selections_cannot_be_deleted() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        seed_student(storage, "S001", "CS").await;
        storage.enroll("S001", campus.assignment.id).await.unwrap();

        let err = storage
            .delete_assignment(campus.assignment.id)
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
        assert!(!storage.delete_assignment(9999).await.unwrap());
    }
}
