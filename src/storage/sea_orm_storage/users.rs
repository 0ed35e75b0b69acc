use super::SeaOrmStorage;
use crate::entity::prelude::{Students, Teachers};
use crate::entity::users::{ActiveModel, Column, Entity as Users};
use crate::entity::{students, teachers};
use crate::errors::{EduAdminError, Result};
use crate::models::{
    PaginatedResponse, PaginationInfo,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UserListQuery},
    },
};
use crate::utils::escape_like_pattern;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

impl SeaOrmStorage {
    /// 创建用户
    pub async fn create_user_impl(&self, req: CreateUserRequest) -> Result<User> {
        Self::insert_user(&self.db, req).await
    }

    /// 在给定连接（或事务）上插入用户
    pub(crate) async fn insert_user<C: ConnectionTrait>(
        conn: &C,
        req: CreateUserRequest,
    ) -> Result<User> {
        let now = chrono::Utc::now().timestamp();

        let model = ActiveModel {
            username: Set(req.username),
            email: Set(req.email),
            password_hash: Set(req.password),
            role: Set(req.role.to_string()),
            status: Set(UserStatus::Active.to_string()),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };

        let result = model
            .insert(conn)
            .await
            .map_err(|e| EduAdminError::from_db_err("创建用户", e))?;

        Ok(result.into_user())
    }

    /// 通过 ID 获取用户
    pub async fn get_user_by_id_impl(&self, id: i64) -> Result<Option<User>> {
        let result = Users::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询用户", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名获取用户
    pub async fn get_user_by_username_impl(&self, username: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询用户", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过邮箱获取用户
    pub async fn get_user_by_email_impl(&self, email: &str) -> Result<Option<User>> {
        let result = Users::find()
            .filter(Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询用户", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 通过用户名或邮箱获取用户
    pub async fn get_user_by_username_or_email_impl(
        &self,
        identifier: &str,
    ) -> Result<Option<User>> {
        let result = Users::find()
            .filter(
                Condition::any()
                    .add(Column::Username.eq(identifier))
                    .add(Column::Email.eq(identifier)),
            )
            .one(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询用户", e))?;

        Ok(result.map(|m| m.into_user()))
    }

    /// 分页列出用户
    pub async fn list_users_with_pagination_impl(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        let page = query.page.max(1);
        let size = query.size.clamp(1, 100);

        let mut select = Users::find();

        // 搜索条件
        if let Some(ref search) = query.search
            && !search.trim().is_empty()
        {
            let escaped = escape_like_pattern(search.trim());
            select = select.filter(
                Condition::any()
                    .add(Column::Username.contains(&escaped))
                    .add(Column::Email.contains(&escaped)),
            );
        }

        // 角色筛选
        if let Some(role) = query.role {
            select = select.filter(Column::Role.eq(role.to_string()));
        }

        // 状态筛选
        if let Some(status) = query.status {
            select = select.filter(Column::Status.eq(status.to_string()));
        }

        let paginator = select
            .order_by_desc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .paginate(&self.db, size);

        let total = paginator
            .num_items()
            .await
            .map_err(|e| EduAdminError::from_db_err("查询用户总数", e))?;

        let users = paginator
            .fetch_page(page - 1)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询用户列表", e))?;

        Ok(PaginatedResponse {
            items: users.into_iter().map(|m| m.into_user()).collect(),
            pagination: PaginationInfo::new(page, size, total),
        })
    }

    /// 更新用户状态
    pub async fn update_user_status_impl(
        &self,
        id: i64,
        status: UserStatus,
    ) -> Result<Option<User>> {
        let result = Users::update_many()
            .col_expr(Column::Status, sea_orm::sea_query::Expr::value(status.to_string()))
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::value(chrono::Utc::now().timestamp()),
            )
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新用户状态", e))?;

        if result.rows_affected == 0 {
            return Ok(None);
        }
        self.get_user_by_id_impl(id).await
    }

    /// 更新用户最后登录时间
    pub async fn update_last_login_impl(&self, id: i64) -> Result<bool> {
        let now = chrono::Utc::now().timestamp();

        let result = Users::update_many()
            .col_expr(Column::LastLogin, sea_orm::sea_query::Expr::value(now))
            .filter(Column::Id.eq(id))
            .exec(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("更新最后登录时间", e))?;

        Ok(result.rows_affected > 0)
    }

    /// 删除用户
    ///
    /// 仍关联教师或学生档案的账号不能删除。
    pub async fn delete_user_impl(&self, id: i64) -> Result<bool> {
        let txn = self.begin_txn().await?;

        Users::update_many()
            .col_expr(
                Column::UpdatedAt,
                sea_orm::sea_query::Expr::col(Column::UpdatedAt),
            )
            .filter(Column::Id.eq(id))
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("锁定用户", e))?;

        let linked_teachers = Teachers::find()
            .filter(teachers::Column::UserId.eq(id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询关联教师", e))?;
        let linked_students = Students::find()
            .filter(students::Column::UserId.eq(id))
            .count(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("查询关联学生", e))?;

        if linked_teachers + linked_students > 0 {
            return Err(EduAdminError::store_conflict(format!(
                "user {id} is linked to a teacher or student profile"
            )));
        }

        let result = Users::delete_by_id(id)
            .exec(&txn)
            .await
            .map_err(|e| EduAdminError::from_db_err("删除用户", e))?;

        Self::commit_txn(txn).await?;
        Ok(result.rows_affected > 0)
    }

    /// 统计用户数量
    pub async fn count_users_impl(&self) -> Result<u64> {
        let count = Users::find()
            .count(&self.db)
            .await
            .map_err(|e| EduAdminError::from_db_err("统计用户数量", e))?;

        Ok(count)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::errors::EduAdminError;
    use crate::models::users::entities::{UserRole, UserStatus};
    use crate::models::users::requests::UserListQuery;
    use crate::storage::Storage;

    #[tokio::test]
    async fn test_user_lookup_by_username_or_email() {
        let storage = memory_storage().await;
        let user = create_user(&storage, "alice", UserRole::Student).await;

        let by_name = storage.get_user_by_username_or_email("alice").await.unwrap();
        let by_email = storage
            .get_user_by_username_or_email("alice@example.com")
            .await
            .unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(user.id));
        assert_eq!(by_email.map(|u| u.id), Some(user.id));
        assert!(storage.get_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_is_store_conflict() {
        let storage = memory_storage().await;
        create_user(&storage, "alice", UserRole::Student).await;

        let err = storage
            .create_user(crate::models::users::requests::CreateUserRequest {
                username: "alice".into(),
                email: "other@example.com".into(),
                password: "hash".into(),
                role: UserRole::Teacher,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));
    }

    #[tokio::test]
    async fn test_list_and_toggle_status() {
        let storage = memory_storage().await;
        let alice = create_user(&storage, "alice", UserRole::Student).await;
        create_user(&storage, "tom", UserRole::Teacher).await;

        let page = storage
            .list_users_with_pagination(UserListQuery {
                page: 1,
                size: 10,
                role: Some(UserRole::Student),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(page.pagination.total, 1);
        assert_eq!(page.items[0].username, "alice");

        let updated = storage
            .update_user_status(alice.id, UserStatus::Inactive)
            .await
            .unwrap()
            .unwrap();
        assert!(!updated.is_active());
        assert!(
            storage
                .update_user_status(9999, UserStatus::Active)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_linked_user_cannot_be_deleted() {
        let storage = memory_storage().await;
        seed_department(&storage, "CS").await;
        let student = seed_student_with_account(&storage, "S001", "CS", "stu1").await;
        let user_id = student.user_id.unwrap();

        let err = storage.delete_user(user_id).await.unwrap_err();
        assert!(matches!(err, EduAdminError::StoreConflict(_)));

        let free = create_user(&storage, "free", UserRole::Admin).await;
        assert!(storage.delete_user(free.id).await.unwrap());
        assert!(!storage.delete_user(free.id).await.unwrap());
    }
}
