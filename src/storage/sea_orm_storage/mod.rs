//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。
//! 选课、退选、批量录入成绩均在单个数据库事务内完成，事务对象被丢弃即回滚。

mod assignments;
mod courses;
mod departments;
mod grades;
mod selections;
mod students;
mod teachers;
mod users;

#[cfg(test)]
pub(crate) mod test_support;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{EduAdminError, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection, DatabaseTransaction, TransactionTrait};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 按全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        // 运行迁移
        Migrator::up(&db, None)
            .await
            .map_err(|e| EduAdminError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", db_url);

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    ///
    /// 内存数据库只存在于单个连接上，因此固定一个连接且不回收。
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let in_memory = Self::is_memory_url(url);

        let mut opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| EduAdminError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(config.timeout));

        if !in_memory {
            opt = opt
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal)
                .synchronous(SqliteSynchronous::Normal)
                .pragma("cache_size", "-64000")
                .pragma("temp_store", "memory")
                .pragma("wal_autocheckpoint", "1000");
        }

        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
                .max_connections(config.pool_size.max(1))
                .min_connections(1)
                .test_before_acquire(true)
                .idle_timeout(Duration::from_secs(300))
        };

        let pool = pool_options
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| EduAdminError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false)
            .sqlx_logging_level(tracing::log::LevelFilter::Debug);

        Database::connect(opt)
            .await
            .map_err(|e| EduAdminError::database_connection(format!("无法连接到数据库: {e}")))
    }

    fn is_memory_url(url: &str) -> bool {
        url.contains(":memory:") || url.contains("mode=memory")
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(EduAdminError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite:, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 开启事务
    pub(crate) async fn begin_txn(&self) -> Result<DatabaseTransaction> {
        self.db
            .begin()
            .await
            .map_err(|e| EduAdminError::from_db_err("开启事务", e))
    }

    /// 提交事务
    pub(crate) async fn commit_txn(txn: DatabaseTransaction) -> Result<()> {
        txn.commit()
            .await
            .map_err(|e| EduAdminError::from_db_err("提交事务", e))
    }
}

// Storage trait 实现
use crate::models::{
    PaginatedResponse,
    assignments::{
        entities::{Assignment, Semester},
        requests::{AssignmentListParams, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentView,
    },
    courses::{
        entities::Course,
        requests::{CourseListParams, CreateCourseRequest, UpdateCourseRequest},
    },
    departments::{
        entities::Department,
        requests::{CreateDepartmentRequest, DepartmentListParams, UpdateDepartmentRequest},
    },
    selections::{
        entities::{GradeUpdate, Selection},
        responses::{RosterEntry, SelectionDetail, TeacherStudentEntry},
    },
    students::{
        entities::Student,
        requests::{CreateStudentRequest, StudentListParams, UpdateStudentRequest},
    },
    teachers::{
        entities::Teacher,
        requests::{CreateTeacherRequest, TeacherListParams, UpdateTeacherRequest},
    },
    transcripts::entities::TranscriptEntry,
    users::{
        entities::{User, UserStatus},
        requests::{CreateUserRequest, UserListQuery},
    },
};
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户模块
    async fn create_user(&self, user: CreateUserRequest) -> Result<User> {
        self.create_user_impl(user).await
    }

    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>> {
        self.get_user_by_id_impl(id).await
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.get_user_by_username_impl(username).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        self.get_user_by_email_impl(email).await
    }

    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>> {
        self.get_user_by_username_or_email_impl(identifier).await
    }

    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>> {
        self.list_users_with_pagination_impl(query).await
    }

    async fn update_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>> {
        self.update_user_status_impl(id, status).await
    }

    async fn update_last_login(&self, id: i64) -> Result<bool> {
        self.update_last_login_impl(id).await
    }

    async fn delete_user(&self, id: i64) -> Result<bool> {
        self.delete_user_impl(id).await
    }

    async fn count_users(&self) -> Result<u64> {
        self.count_users_impl().await
    }

    // 系部模块
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department> {
        self.create_department_impl(req).await
    }

    async fn get_department(&self, dept_id: &str) -> Result<Option<Department>> {
        self.get_department_impl(dept_id).await
    }

    async fn list_departments(
        &self,
        query: DepartmentListParams,
    ) -> Result<PaginatedResponse<Department>> {
        self.list_departments_impl(query).await
    }

    async fn update_department(
        &self,
        dept_id: &str,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>> {
        self.update_department_impl(dept_id, update).await
    }

    async fn delete_department(&self, dept_id: &str) -> Result<bool> {
        self.delete_department_impl(dept_id).await
    }

    // 教师模块
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<Teacher> {
        self.create_teacher_impl(req).await
    }

    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>> {
        self.get_teacher_impl(teacher_id).await
    }

    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>> {
        self.get_teacher_by_user_id_impl(user_id).await
    }

    async fn list_teachers(&self, query: TeacherListParams) -> Result<PaginatedResponse<Teacher>> {
        self.list_teachers_impl(query).await
    }

    async fn update_teacher(
        &self,
        teacher_id: &str,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>> {
        self.update_teacher_impl(teacher_id, update).await
    }

    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool> {
        self.delete_teacher_impl(teacher_id).await
    }

    // 学生模块
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student> {
        self.create_student_impl(req).await
    }

    async fn get_student(&self, student_id: &str) -> Result<Option<Student>> {
        self.get_student_impl(student_id).await
    }

    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>> {
        self.get_student_by_user_id_impl(user_id).await
    }

    async fn list_students(&self, query: StudentListParams) -> Result<PaginatedResponse<Student>> {
        self.list_students_impl(query).await
    }

    async fn update_student(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>> {
        self.update_student_impl(student_id, update).await
    }

    async fn delete_student(&self, student_id: &str) -> Result<bool> {
        self.delete_student_impl(student_id).await
    }

    // 课程模块
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course> {
        self.create_course_impl(req).await
    }

    async fn get_course(&self, course_id: &str) -> Result<Option<Course>> {
        self.get_course_impl(course_id).await
    }

    async fn list_courses(&self, query: CourseListParams) -> Result<PaginatedResponse<Course>> {
        self.list_courses_impl(query).await
    }

    async fn update_course(
        &self,
        course_id: &str,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>> {
        self.update_course_impl(course_id, update).await
    }

    async fn delete_course(&self, course_id: &str) -> Result<bool> {
        self.delete_course_impl(course_id).await
    }

    // 教学任务模块
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(req).await
    }

    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_impl(id).await
    }

    async fn get_assignment_view(&self, id: i64) -> Result<Option<AssignmentView>> {
        self.get_assignment_view_impl(id).await
    }

    async fn list_assignments(
        &self,
        query: AssignmentListParams,
    ) -> Result<PaginatedResponse<AssignmentView>> {
        self.list_assignments_impl(query).await
    }

    async fn list_assignment_views(&self) -> Result<Vec<AssignmentView>> {
        self.list_assignment_views_impl().await
    }

    async fn list_teacher_assignments(&self, teacher_id: &str) -> Result<Vec<AssignmentView>> {
        self.list_teacher_assignments_impl(teacher_id).await
    }

    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(id, update).await
    }

    async fn delete_assignment(&self, id: i64) -> Result<bool> {
        self.delete_assignment_impl(id).await
    }

    // 选课模块
    async fn enroll(&self, student_id: &str, assignment_id: i64) -> Result<Selection> {
        self.enroll_impl(student_id, assignment_id).await
    }

    async fn withdraw(&self, student_id: &str, selection_id: i64) -> Result<()> {
        self.withdraw_impl(student_id, selection_id).await
    }

    async fn get_selection(&self, id: i64) -> Result<Option<Selection>> {
        self.get_selection_impl(id).await
    }

    async fn get_selection_detail(&self, id: i64) -> Result<Option<SelectionDetail>> {
        self.get_selection_detail_impl(id).await
    }

    async fn list_student_selections(&self, student_id: &str) -> Result<Vec<SelectionDetail>> {
        self.list_student_selections_impl(student_id).await
    }

    async fn list_selected_assignment_ids(&self, student_id: &str) -> Result<Vec<i64>> {
        self.list_selected_assignment_ids_impl(student_id).await
    }

    async fn count_student_selections_in_term(
        &self,
        student_id: &str,
        academic_year: &str,
        semester: Semester,
    ) -> Result<i64> {
        self.count_student_selections_in_term_impl(student_id, academic_year, semester)
            .await
    }

    async fn list_roster(&self, assignment_id: i64) -> Result<Vec<RosterEntry>> {
        self.list_roster_impl(assignment_id).await
    }

    async fn list_teacher_student_selections(
        &self,
        teacher_id: &str,
        student_id: Option<&str>,
    ) -> Result<Vec<TeacherStudentEntry>> {
        self.list_teacher_student_selections_impl(teacher_id, student_id)
            .await
    }

    // 成绩模块
    async fn record_grades(
        &self,
        teacher_id: &str,
        scope: Option<i64>,
        updates: &[GradeUpdate],
    ) -> Result<Vec<Selection>> {
        self.record_grades_impl(teacher_id, scope, updates).await
    }

    async fn list_transcript_entries(&self, student_id: &str) -> Result<Vec<TranscriptEntry>> {
        self.list_transcript_entries_impl(student_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_database_url() {
        assert_eq!(
            SeaOrmStorage::build_database_url("eduadmin.db").unwrap(),
            "sqlite://eduadmin.db?mode=rwc"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url(":memory:").unwrap(),
            "sqlite::memory:"
        );
        assert_eq!(
            SeaOrmStorage::build_database_url("sqlite::memory:").unwrap(),
            "sqlite::memory:"
        );
        assert!(SeaOrmStorage::build_database_url("postgres://u:p@localhost/edu").is_ok());
        assert!(matches!(
            SeaOrmStorage::build_database_url("redis://localhost"),
            Err(EduAdminError::DatabaseConfig(_))
        ));
    }

    #[tokio::test]
    async fn test_connect_in_memory_runs_migrations() {
        let storage = test_support::memory_storage().await;
        assert_eq!(storage.count_users().await.unwrap(), 0);
    }
}
