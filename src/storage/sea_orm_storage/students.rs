//! 学生存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::Selections;
use crate::entity::selections;
use crate::entity::students::{ActiveModel, Column, Entity as Students};
use crate::errors::{EduAdminError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListParams, UpdateStudentRequest},
    },
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use tracing::info;

impl SeaOrmStorage {
    /// 创建学生，可同时开通登录账号
    pub async fn create_student_impl(&self, req: CreateStudentRequest) -> Result<Student> {
        let txn = self.begin_txn().await?;
        Self::ensure_department_exists(&txn, &req.dept_id).await?;

        let user_id = match req.account {
            Some(account) => {
                let user = Self::insert_user(
                    &txn,
                    CreateUserRequest {
                        username: account.username,
                        email: account.email,
                        password: account.password,
                        role: UserRole::Student,
                    },
                )
                .await?;
                Some(user.id)
            }
            None => None,
        };

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            student_id: Set(req.student_id),
            user_id: Set(user_id),
            name: Set(req.name),
            gender: Set(req.gender.map(|g| g.to_string())),
            birth_date: Set(req.birth_date),
            enrollment_date: Set(req.enrollment_date),
            dept_id: Set(req.dept_id),
            status: Set(req.status.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建学生", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.into_student())
    }

    /// 通过学号获取学生
    pub async fn get_student_impl(&self, student_id: &str) -> Result<Option<Student>> {
        let result = Students::find_by_id(student_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 通过登录账号获取学生档案
    pub async fn get_student_by_user_id_impl(&self, user_id: i64) -> Result<Option<Student>> {
        let result = Students::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生", e))?;

        Ok(result.map(|m| m.into_student()))
    }

    /// 分页列出学生
    pub async fn list_students_impl(
        &self,
        query: StudentListParams,
    ) -> Result<PaginatedResponse<Student>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Students::find();

        if let Some(ref dept_id) = query.dept_id {
            select = select.filter(Column::DeptId.eq(dept_id.as_str()));
        }

        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::StudentId.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::StudentId)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生总数", e))?;

        let students = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生列表", e))?;

        Ok(PaginatedResponse {
            items: students.into_iter().map(|m| m.into_student()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新学生信息
    pub async fn update_student_impl(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        let Some(existing) = Students::find_by_id(student_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询学生", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(name) = update.name {
            model.name = Set(name);
        }
        if let Some(gender) = update.gender {
            model.gender = Set(Some(gender.to_string()));
        }
        if let Some(birth_date) = update.birth_date {
            model.birth_date = Set(Some(birth_date));
        }
        if let Some(enrollment_date) = update.enrollment_date {
            model.enrollment_date = Set(enrollment_date);
        }
        if let Some(dept_id) = update.dept_id {
            Self::ensure_department_exists(&self.db, &dept_id).await?;
            model.dept_id = Set(dept_id);
        }
        if let Some(status) = update.status {
            model.status = Set(status.to_string());
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新学生", e))?;

        Ok(Some(result.into_student()))
    }

    /// 删除学生
    ///
    /// 先删除其全部选课记录（含已录入成绩的），再删除学生本身，整体在一个事务内。
    /// 关联的登录账号保留。
    pub async fn delete_student_impl(&self, student_id: &str) -> Result<bool> {
        let txn = self.begin_txn().await?;

        let removed = Selections::delete_many()
            .filter(selections::Column::StudentId.eq(student_id))
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除学生选课记录", e))?;

        let result = Students::delete_by_id(student_id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除学生", e))?;

        Self::commit_txn(txn).await?;

        if result.rows_affected > 0 {
            info!(
                "Student {} deleted with {} selection(s)",
                student_id, removed.rows_affected
            );
        }
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::models::PaginationQuery;
    use crate::models::selections::entities::GradeUpdate;
    use crate::models::students::entities::StudentStatus;
    use crate::models::students::requests::{StudentListParams, UpdateStudentRequest};
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_cascade_delete_removes_graded_selections() {
        let campus = campus(0).await;
        let storage = &campus.storage;
        let student = seed_student_with_account(storage, "S001", "CS", "stu1").await;
        let selection = storage
            .enroll(&student.student_id, campus.assignment.id)
            .await
            .unwrap();
        storage
            .record_grades(
                &campus.teacher.teacher_id,
                None,
                &[GradeUpdate::new(selection.id, Some(90.0), Some(80.0))],
            )
            .await
            .unwrap();

        assert!(storage.delete_student("S001").await.unwrap());
        assert!(storage.get_student("S001").await.unwrap().is_none());
        assert!(storage.get_selection(selection.id).await.unwrap().is_none());

        // 登录账号保留，档案关联随之消失
        let user = storage.get_user_by_username("stu1").await.unwrap().unwrap();
        assert!(storage.get_student_by_user_id(user.id).await.unwrap().is_none());

        assert!(!storage.delete_student("S001").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_update_students() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_named_student(&storage, "S001", "Alice", "CS").await;
        seed_named_student(&storage, "S002", "Bob", "CS").await;

        storage
            .update_student(
                "S002",
                UpdateStudentRequest {
                    status: Some(StudentStatus::Suspended),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        let page = storage
            .list_students(StudentListParams {
                pagination: PaginationQuery::default(),
                dept_id: Some("CS".into()),
                status: Some(StudentStatus::Enrolled),
                search: None,
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].name, "Alice");

        assert!(
            storage
                .update_student("S404", UpdateStudentRequest::default())
                .await
                .unwrap()
                .is_none()
        );
    }
}
