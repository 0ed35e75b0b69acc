//! 课程存储操作

use super::SeaOrmStorage;
use crate::entity::assignments;
use crate::entity::courses::{ActiveModel, Column, Entity as Courses};
use crate::entity::prelude::Assignments;
use crate::errors::{EduAdminError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    courses::{
        entities::Course,
        requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 创建课程
    pub async fn create_course_impl(&self, req: CreateCourseRequest) -> Result<Course> {
        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            course_id: Set(req.course_id),
            course_name: Set(req.course_name),
            course_type: Set(req.course_type.to_string()),
            hours: Set(req.hours),
            credits: Set(req.credits),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建课程", e))?;

        Ok(result.into_course())
    }

    /// 通过课程号获取课程
    pub async fn get_course_impl(&self, course_id: &str) -> Result<Option<Course>> {
        let result = Courses::find_by_id(course_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程", e))?;

        Ok(result.map(|m| m.into_course()))
    }

    /// 分页列出课程
    pub async fn list_courses_impl(
        &self,
        query: CourseListParams,
    ) -> Result<PaginatedResponse<Course>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Courses::find();

        if let Some(course_type) = query.course_type {
            select = select.filter(Column::CourseType.eq(course_type.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::CourseId.contains(&escaped))
                    .add(Column::CourseName.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::CourseId)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程总数", e))?;

        let courses = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程列表", e))?;

        Ok(PaginatedResponse {
            items: courses.into_iter().map(|m| m.into_course()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新课程信息
    pub async fn update_course_impl(
        &self,
        course_id: &str,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        let Some(existing) = Courses::find_by_id(course_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询课程", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(course_name) = update.course_name {
            model.course_name = Set(course_name);
        }
        if let Some(course_type) = update.course_type {
            model.course_type = Set(course_type.to_string());
        }
        if let Some(hours) = update.hours {
            model.hours = Set(hours);
        }
        if let Some(credits) = update.credits {
            model.credits = Set(credits);
        }
        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新课程", e))?;

        Ok(Some(result.into_course()))
    }

    /// 删除课程
    ///
    /// 仍有教学任务时拒绝。
    pub async fn delete_course_impl(&self, course_id: &str) -> Result<bool> {
        let txn = self.begin_txn().await?;

        Courses::update_many()
            .col_expr(Column::UpdatedAt, Expr::col(Column::UpdatedAt))
            .filter(Column::CourseId.eq(course_id))
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("锁定课程", e))?;

        let assignment_count = Assignments::find()
            .filter(assignments::Column::CourseId.eq(course_id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计教学任务", e))?;

        if assignment_count > 0 {
            return Err(EduAdminError::store_conflict(format!(
                "course {course_id} still has {assignment_count} assignment(s)"
            )));
        }

        let result = Courses::delete_by_id(course_id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除课程", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::errors::EduAdminError;
    use crate::models::courses::requests::UpdateCourseRequest;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_course_update_and_delete_guard() {
        let campus = campus(0).await;
        let storage = &campus.storage;

        let updated = storage
            .update_course(
                "C001",
                UpdateCourseRequest {
                    credits: Some(4.5),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.credits, 4.5);
        assert_eq!(updated.course_name, campus.course.course_name);

        let err = storage.delete_course("C001").await.unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));

        seed_course(storage, "C002", 2.0).await;
        assert!(storage.delete_course("C002").await.unwrap());
    }
}
