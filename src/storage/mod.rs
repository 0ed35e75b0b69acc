use std::sync::Arc;

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

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 为哈希后的值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(
        &self,
        query: UserListQuery,
    ) -> Result<PaginatedResponse<User>>;
    // 更新用户状态
    async fn update_user_status(&self, id: i64, status: UserStatus) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 删除用户（仍关联教师/学生档案时拒绝）
    async fn delete_user(&self, id: i64) -> Result<bool>;
    // 用户总数
    async fn count_users(&self) -> Result<u64>;

    /// 系部管理方法
    async fn create_department(&self, req: CreateDepartmentRequest) -> Result<Department>;
    async fn get_department(&self, dept_id: &str) -> Result<Option<Department>>;
    async fn list_departments(
        &self,
        query: DepartmentListParams,
    ) -> Result<PaginatedResponse<Department>>;
    async fn update_department(
        &self,
        dept_id: &str,
        update: UpdateDepartmentRequest,
    ) -> Result<Option<Department>>;
    // 仍有教师或学生归属时拒绝
    async fn delete_department(&self, dept_id: &str) -> Result<bool>;

    /// 教师管理方法
    // account.password 须为哈希后的值
    async fn create_teacher(&self, req: CreateTeacherRequest) -> Result<Teacher>;
    async fn get_teacher(&self, teacher_id: &str) -> Result<Option<Teacher>>;
    async fn get_teacher_by_user_id(&self, user_id: i64) -> Result<Option<Teacher>>;
    async fn list_teachers(&self, query: TeacherListParams) -> Result<PaginatedResponse<Teacher>>;
    async fn update_teacher(
        &self,
        teacher_id: &str,
        update: UpdateTeacherRequest,
    ) -> Result<Option<Teacher>>;
    // 仍有教学任务时拒绝；同时清除指向该教师的系主任引用
    async fn delete_teacher(&self, teacher_id: &str) -> Result<bool>;

    /// 学生管理方法
    // account.password 须为哈希后的值
    async fn create_student(&self, req: CreateStudentRequest) -> Result<Student>;
    async fn get_student(&self, student_id: &str) -> Result<Option<Student>>;
    async fn get_student_by_user_id(&self, user_id: i64) -> Result<Option<Student>>;
    async fn list_students(&self, query: StudentListParams) -> Result<PaginatedResponse<Student>>;
    async fn update_student(
        &self,
        student_id: &str,
        update: UpdateStudentRequest,
    ) -> Result<Option<Student>>;
    // 级联删除该学生的选课记录
    async fn delete_student(&self, student_id: &str) -> Result<bool>;

    /// 课程管理方法
    async fn create_course(&self, req: CreateCourseRequest) -> Result<Course>;
    async fn get_course(&self, course_id: &str) -> Result<Option<Course>>;
    async fn list_courses(&self, query: CourseListParams) -> Result<PaginatedResponse<Course>>;
    async fn update_course(
        &self,
        course_id: &str,
        update: UpdateCourseRequest,
    ) -> Result<Option<Course>>;
    // 仍有教学任务时拒绝
    async fn delete_course(&self, course_id: &str) -> Result<bool>;

    /// 教学任务管理方法
    async fn create_assignment(&self, req: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment(&self, id: i64) -> Result<Option<Assignment>>;
    async fn get_assignment_view(&self, id: i64) -> Result<Option<AssignmentView>>;
    async fn list_assignments(
        &self,
        query: AssignmentListParams,
    ) -> Result<PaginatedResponse<AssignmentView>>;
    // 全部教学任务，按学年、学期倒序，id 正序
    async fn list_assignment_views(&self) -> Result<Vec<AssignmentView>>;
    async fn list_teacher_assignments(&self, teacher_id: &str) -> Result<Vec<AssignmentView>>;
    // 人数上限低于当前人数时拒绝
    async fn update_assignment(
        &self,
        id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    // 仍有选课记录时拒绝
    async fn delete_assignment(&self, id: i64) -> Result<bool>;

    /// 选课方法
    // 加锁、查重、计数、插入在同一事务内完成
    async fn enroll(&self, student_id: &str, assignment_id: i64) -> Result<Selection>;
    // 条件删除：两项成绩均未录入
    async fn withdraw(&self, student_id: &str, selection_id: i64) -> Result<()>;
    async fn get_selection(&self, id: i64) -> Result<Option<Selection>>;
    async fn get_selection_detail(&self, id: i64) -> Result<Option<SelectionDetail>>;
    // 学生的全部选课，最新在前
    async fn list_student_selections(&self, student_id: &str) -> Result<Vec<SelectionDetail>>;
    async fn list_selected_assignment_ids(&self, student_id: &str) -> Result<Vec<i64>>;
    async fn count_student_selections_in_term(
        &self,
        student_id: &str,
        academic_year: &str,
        semester: Semester,
    ) -> Result<i64>;
    // 按学生姓名排序
    async fn list_roster(&self, assignment_id: i64) -> Result<Vec<RosterEntry>>;
    // 教师全部教学任务中的选课，可限定某个学生；学年、学期倒序，再按学生姓名
    async fn list_teacher_student_selections(
        &self,
        teacher_id: &str,
        student_id: Option<&str>,
    ) -> Result<Vec<TeacherStudentEntry>>;

    /// 成绩方法
    // 单事务内校验归属并写入；scope 限定所有选课记录须属于该教学任务
    async fn record_grades(
        &self,
        teacher_id: &str,
        scope: Option<i64>,
        updates: &[GradeUpdate],
    ) -> Result<Vec<Selection>>;
    async fn list_transcript_entries(&self, student_id: &str) -> Result<Vec<TranscriptEntry>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
