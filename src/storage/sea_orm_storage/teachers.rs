//! 教师存储操作

use super::SeaOrmStorage;
use crate::entity::prelude::{Assignments, Departments};
use crate::entity::teachers::{ActiveModel, Column, Entity as Teachers};
use crate::entity::{assignments, departments};
use crate::errors::{EduAdminError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest},
    },
    users::{entities::UserRole, requests::CreateUserRequest},
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 所属系部必须存在
    ///
    /// 先以不改变数据的 UPDATE 锁住系部行，在事务内作为首条语句时直接拿到写锁。
    pub(crate) async fn ensure_department_exists<C: ConnectionTrait>(
        conn: &C,
        dept_id: &str,
    ) -> Result<()> {
        Departments::update_many()
            .col_expr(
                departments::Column::UpdatedAt,
                Expr::col(departments::Column::UpdatedAt),
            )
            .filter(departments::Column::DeptId.eq(dept_id))
            .exec(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("锁定系部", e))?;

        let exists = Departments::find_by_id(dept_id.to_string())
            .one(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询系部", e))?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(EduAdminError::not_found(format!("department {dept_id}")))
        }
    }

    /// 创建教师，可同时开通登录账号
    pub async fn create_teacher_impl(&self, req: CreateTeacherRequest) -> Result<Teacher> {
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
                        role: UserRole::Teacher,
                    },
                )
                .await?;
                Some(user.id)
            }
            None => None,
        };

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            teacher_id: Set(req.teacher_id),
            user_id: Set(user_id),
            name: Set(req.name),
            gender: Set(req.gender.map(|g| g.to_string())),
            birth_date: Set(req.birth_date),
            hire_date: Set(req.hire_date),
            dept_id: Set(req.dept_id),
            title: Set(req.title),
            specialty: Set(req.specialty),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建教师", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.into_teacher())
    }

    /// 通过工号获取教师
    pub async fn get_teacher_impl(&self, teacher_id: &str) -> Result<Option<Teacher>> {
        let result = Teachers::find_by_id(teacher_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 通过登录账号获取教师档案
    pub async fn get_teacher_by_user_id_impl(&self, user_id: i64) -> Result<Option<Teacher>> {
        let result = Teachers::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?;

        Ok(result.map(|m| m.into_teacher()))
    }

    /// 分页列出教师
    pub async fn list_teachers_impl(
        &self,
        query: TeacherListParams,
    ) -> Result<PaginatedResponse<Teacher>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Teachers::find();

        // 系部筛选
        if let Some(ref dept_id) = query.dept_id {
            select = select.filter(Column::DeptId.eq(dept_id.as_str()));
        }

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::TeacherId.contains(&escaped))
                    .add(Column::Name.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::TeacherId)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师总数", e))?;

        let teachers = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师列表", e))?;

        Ok(PaginatedResponse {
            items: teachers.into_iter().map(|m| m.into_teacher()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新教师信息
    pub async fn update_teacher_impl(
        &self,
        teacher_id: &str,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        let Some(existing) = Teachers::find_by_id(teacher_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?
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
        if let Some(hire_date) = update.hire_date {
            model.hire_date = Set(hire_date);
        }
        if let Some(dept_id) = update.dept_id {
            Self::ensure_department_exists(&self.db, &dept_id).await?;
            model.dept_id = Set(dept_id);
        }
        if let Some(title) = update.title {
            model.title = Set(Some(title));
        }
        if let Some(specialty) = update.specialty {
            model.specialty = Set(Some(specialty));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新教师", e))?;

        Ok(Some(result.into_teacher()))
    }

    /// 删除教师
    ///
    /// 仍有教学任务时拒绝；指向该教师的系主任引用在同一事务内清除。
    /// 清除系主任引用是事务的首条语句，拒绝时随事务一起回滚。
    pub async fn delete_teacher_impl(&self, teacher_id: &str) -> Result<bool> {
        let txn = self.begin_txn().await?;

        Departments::update_many()
            .col_expr(
                departments::Column::DeanId,
                Expr::value(Option::<String>::None),
            )
            .col_expr(
                departments::Column::UpdatedAt,
                Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(departments::Column::DeanId.eq(teacher_id))
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("清除系主任", e))?;

        let assignment_count = Assignments::find()
            .filter(assignments::Column::TeacherId.eq(teacher_id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计教学任务", e))?;

        if assignment_count > 0 {
            return Err(EduAdminError::store_conflict(format!(
                "teacher {teacher_id} still has {assignment_count} assignment(s)"
            )));
        }

        let result = Teachers::delete_by_id(teacher_id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除教师", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::errors::EduAdminError;
    use crate::models::assignments::entities::Semester;
    use crate::models::departments::requests::UpdateDepartmentRequest;
    use crate::models::users::entities::UserRole;
    use crate::storage::Storage;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_teacher_creation_in_one_department() {
        let (storage, _file) = file_storage().await;
        seed_department(&storage, "CS").await;

        let mut handles = Vec::new();
        for i in 0..12 {
            let storage = storage.clone();
            handles.push(tokio::spawn(async move {
                storage
                    .create_teacher(teacher_request(&format!("T{i:03}"), "CS"))
                    .await
            }));
        }

        let mut created = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => created += 1,
                Err(e) => assert!(
                    matches!(e, EduAdminError::StoreConflict(_)),
                    "unexpected error: {}",
                    e.format_simple()
                ),
            }
        }
        assert!(created > 0);
    }

    #[tokio::test]
    async fn test_create_teacher_with_account() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        let teacher = seed_teacher_with_account(&storage, "T001", "CS", "tom").await;

        let user = storage.get_user_by_username("tom").await.unwrap().unwrap();
        assert_eq!(user.role, UserRole::Teacher);
        assert_eq!(teacher.user_id, Some(user.id));

        let linked = storage.get_teacher_by_user_id(user.id).await.unwrap();
        assert_eq!(linked.map(|t| t.teacher_id), Some("T001".to_string()));
    }

    #[tokio::test]
    async fn test_failed_teacher_insert_rolls_back_account() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_teacher(&storage, "T001", "CS").await;

        // 工号重复：账号插入成功后教师插入失败，整体回滚
        let mut req = teacher_request("T001", "CS");
        req.account = Some(crate::models::users::requests::AccountRequest {
            username: "ghost".into(),
            email: "ghost@example.com".into(),
            password: "hash".into(),
        });
        let err = storage.create_teacher(req).await.unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
        assert!(storage.get_user_by_username("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_department_is_not_found() {
        let storage = memory_storage().await;
        let err = storage
            .create_teacher(teacher_request("T009", "XX"))
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_teacher_refused_with_assignments() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_teacher(&storage, "T001", "CS").await;
        seed_course(&storage, "C001", 3.0).await;
        seed_assignment(&storage, "C001", "T001", "2024-2025", Semester::First, 0).await;

        let err = storage.delete_teacher("T001").await.unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
    }

    #[tokio::test]
    async fn test_delete_teacher_clears_dean() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_teacher(&storage, "T001", "CS").await;
        storage
            .update_department(
                "CS",
                UpdateDepartmentRequest {
                    dean_id: Some("T001".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert!(storage.delete_teacher("T001").await.unwrap());
        let dept = storage.get_department("CS").await.unwrap().unwrap();
        assert_eq!(dept.dean_id, None);
        assert!(!storage.delete_teacher("T001").await.unwrap());
    }
}
