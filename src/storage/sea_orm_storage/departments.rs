//! 系部存储操作

use super::SeaOrmStorage;
use crate::entity::departments::{ActiveModel, Column, Entity as Departments};
use crate::entity::prelude::{Students, Teachers};
use crate::entity::{students, teachers};
use crate::errors::{EduAdminError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 系主任必须是已存在的教师
    async fn ensure_dean_exists<C: ConnectionTrait>(conn: &C, dean_id: &str) -> Result<()> {
        let exists = Teachers::find_by_id(dean_id.to_string())
            .one(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询教师", e))?
            .is_some();
        if exists {
            Ok(())
        } else {
            Err(EduAdminError::not_found(format!("teacher {dean_id}")))
        }
    }

    /// 创建系部
    pub async fn create_department_impl(&self, req: CreateDepartmentRequest) -> Result<Department> {
        let dean_id = req.dean_id.filter(|d| !d.trim().is_empty());
        if let Some(ref dean_id) = dean_id {
            Self::ensure_dean_exists(&self.db, dean_id).await?;
        }

        let now = chrono::Utc::now().timestamp();
        let model = ActiveModel {
            dept_id: Set(req.dept_id),
            dept_name: Set(req.dept_name),
            dean_id: Set(dean_id),
            phone: Set(req.phone),
            description: Set(req.description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = model
            .insert(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建系部", e))?;

        Ok(result.into_department())
    }

    /// 通过编号获取系部
    pub async fn get_department_impl(&self, dept_id: &str) -> Result<Option<Department>> {
        let result = Departments::find_by_id(dept_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询系部", e))?;

        Ok(result.map(|m| m.into_department()))
    }

    /// 分页列出系部
    pub async fn list_departments_impl(
        &self,
        query: DepartmentListParams,
    ) -> Result<PaginatedResponse<Department>> {
        let (page, size) = query.pagination.normalized();

        let mut select = Departments::find();

        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::DeptId.contains(&escaped))
                    .add(Column::DeptName.contains(&escaped)),
            );
        }

        let paginator = select
            .order_by_asc(Column::DeptId)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduAdminError::from_db_err("查询系部总数", e))?;

        let departments = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询系部列表", e))?;

        Ok(PaginatedResponse {
            items: departments
                .into_iter()
                .map(|m| m.into_department())
                .collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新系部信息
    ///
    /// `dean_id` 为空字符串时清除系主任。
    pub async fn update_department_impl(
        &self,
        dept_id: &str,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        let Some(existing) = Departments::find_by_id(dept_id.to_string())
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询系部", e))?
        else {
            return Ok(None);
        };

        let mut model: ActiveModel = existing.into();
        model.updated_at = Set(chrono::Utc::now().timestamp());

        if let Some(dept_name) = update.dept_name {
            model.dept_name = Set(dept_name);
        }

        if let Some(dean_id) = update.dean_id {
            let dean_id = dean_id.trim().to_string();
            if dean_id.is_empty() {
                model.dean_id = Set(None);
            } else {
                Self::ensure_dean_exists(&self.db, &dean_id).await?;
                model.dean_id = Set(Some(dean_id));
            }
        }

        if let Some(phone) = update.phone {
            model.phone = Set(Some(phone));
        }

        if let Some(description) = update.description {
            model.description = Set(Some(description));
        }

        let result = model
            .update(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新系部", e))?;

        Ok(Some(result.into_department()))
    }

    /// 删除系部
    ///
    /// 仍有教师或学生归属时拒绝。
    pub async fn delete_department_impl(&self, dept_id: &str) -> Result<bool> {
        let txn = self.begin_txn().await?;

        Departments::update_many()
            .col_expr(Column::UpdatedAt, Expr::col(Column::UpdatedAt))
            .filter(Column::DeptId.eq(dept_id))
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("锁定系部", e))?;

        let teacher_count = Teachers::find()
            .filter(teachers::Column::DeptId.eq(dept_id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计系部教师", e))?;
        let student_count = Students::find()
            .filter(students::Column::DeptId.eq(dept_id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计系部学生", e))?;

        if teacher_count > 0 || student_count > 0 {
            return Err(EduAdminError::store_conflict(format!(
                "department {dept_id} still has {teacher_count} teacher(s) and {student_count} student(s)"
            )));
        }

        let result = Departments::delete_by_id(dept_id.to_string())
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除系部", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::errors::EduAdminError;
    use crate::models::departments::requests::{DepartmentListParams, UpdateDepartmentRequest};
    use crate::models::PaginationQuery;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_dean_set_and_cleared() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_teacher(&storage, "T001", "CS").await;

        let dept = storage
            .update_department(
                "CS",
                UpdateDepartmentRequest {
                    dean_id: Some("T001".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dept.dean_id.as_deref(), Some("T001"));

        let dept = storage
            .update_department(
                "CS",
                UpdateDepartmentRequest {
                    dean_id: Some(String::new()),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(dept.dean_id, None);

        let err = storage
            .update_department(
                "CS",
                UpdateDepartmentRequest {
                    dean_id: Some("T404".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_department_with_members_cannot_be_deleted() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_department(&storage, "EE").await;
        seed_student(&storage, "S001", "CS").await;

        let err = storage.delete_department("CS").await.unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
        assert!(storage.delete_department("EE").await.unwrap());
        assert!(storage.get_department("EE").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_departments_search() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        seed_department(&storage, "EE").await;

        let page = storage
            .list_departments(DepartmentListParams {
                pagination: PaginationQuery::default(),
                search: Some("EE".into()),
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].dept_id, "EE");
    }
}
