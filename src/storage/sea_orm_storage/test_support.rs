//! 测试夹具：内存 SQLite、多连接的临时文件 SQLite 与基础数据

use std::path::PathBuf;

use super::SeaOrmStorage;
use crate::config::DatabaseConfig;
use crate::models::assignments::entities::{Assignment, Semester};
use crate::models::assignments::requests::CreateAssignmentRequest;
use crate::models::courses::entities::{Course, CourseType};
use crate::models::courses::requests::CreateCourseRequest;
use crate::models::departments::requests::CreateDepartmentRequest;
use crate::models::students::entities::{Student, StudentStatus};
use crate::models::students::requests::CreateStudentRequest;
use crate::models::teachers::entities::Teacher;
use crate::models::teachers::requests::CreateTeacherRequest;
use crate::models::users::entities::{User, UserRole};
use crate::models::users::requests::{AccountRequest, CreateUserRequest};
use crate::storage::Storage;

pub(crate) async fn memory_storage() -> SeaOrmStorage {
    SeaOrmStorage::connect(&DatabaseConfig {
        url: "sqlite::memory:".to_string(),
        pool_size: 1,
        timeout: 5,
    })
    .await
    .expect("in-memory sqlite")
}

/// 临时数据库文件，离开作用域时连同 WAL 文件一起删除
pub(crate) struct TempDbFile(PathBuf);

impl Drop for TempDbFile {
    fn drop(&mut self) {
        for suffix in ["", "-wal", "-shm"] {
            let mut path = self.0.clone().into_os_string();
            path.push(suffix);
            let _ = std::fs::remove_file(path);
        }
    }
}

/// 文件 SQLite（WAL，多连接），并发事务真正在数据库层面竞争
pub(crate) async fn file_storage() -> (SeaOrmStorage, TempDbFile) {
    let path = std::env::temp_dir().join(format!(
        "eduadmin-test-{}-{:016x}.db",
        std::process::id(),
        rand::random::<u64>()
    ));
    let file = TempDbFile(path.clone());
    let storage = SeaOrmStorage::connect(&DatabaseConfig {
        url: path.to_string_lossy().into_owned(),
        pool_size: 8,
        timeout: 30,
    })
    .await
    .expect("file sqlite");
    (storage, file)
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

fn account(username: &str) -> AccountRequest {
    AccountRequest {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password: "hash".to_string(),
    }
}

pub(crate) async fn create_user(storage: &SeaOrmStorage, username: &str, role: UserRole) -> User {
    storage
        .create_user(CreateUserRequest {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password: "hash".to_string(),
            role,
        })
        .await
        .expect("create user")
}

pub(crate) async fn seed_department(storage: &SeaOrmStorage, dept_id: &str) {
    storage
        .create_department(CreateDepartmentRequest {
            dept_id: dept_id.to_string(),
            dept_name: format!("{dept_id} Department"),
            dean_id: None,
            phone: None,
            description: None,
        })
        .await
        .expect("create department");
}

pub(crate) fn teacher_request(teacher_id: &str, dept_id: &str) -> CreateTeacherRequest {
    CreateTeacherRequest {
        teacher_id: teacher_id.to_string(),
        name: format!("Teacher {teacher_id}"),
        gender: None,
        birth_date: None,
        hire_date: date(2015, 9, 1),
        dept_id: dept_id.to_string(),
        title: None,
        specialty: None,
        account: None,
    }
}

pub(crate) async fn seed_teacher(storage: &SeaOrmStorage, teacher_id: &str, dept_id: &str) -> Teacher {
    storage
        .create_teacher(teacher_request(teacher_id, dept_id))
        .await
        .expect("create teacher")
}

pub(crate) async fn seed_teacher_with_account(
    storage: &SeaOrmStorage,
    teacher_id: &str,
    dept_id: &str,
    username: &str,
) -> Teacher {
    let mut req = teacher_request(teacher_id, dept_id);
    req.account = Some(account(username));
    storage.create_teacher(req).await.expect("create teacher")
}

pub(crate) fn student_request(student_id: &str, name: &str, dept_id: &str) -> CreateStudentRequest {
    CreateStudentRequest {
        student_id: student_id.to_string(),
        name: name.to_string(),
        gender: None,
        birth_date: None,
        enrollment_date: date(2023, 9, 1),
        dept_id: dept_id.to_string(),
        status: StudentStatus::Enrolled,
        account: None,
    }
}

pub(crate) async fn seed_student(storage: &SeaOrmStorage, student_id: &str, dept_id: &str) -> Student {
    storage
        .create_student(student_request(student_id, &format!("Student {student_id}"), dept_id))
        .await
        .expect("create student")
}

pub(crate) async fn seed_named_student(
    storage: &SeaOrmStorage,
    student_id: &str,
    name: &str,
    dept_id: &str,
) -> Student {
    storage
        .create_student(student_request(student_id, name, dept_id))
        .await
        .expect("create student")
}

pub(crate) async fn seed_student_with_account(
    storage: &SeaOrmStorage,
    student_id: &str,
    dept_id: &str,
    username: &str,
) -> Student {
    let mut req = student_request(student_id, &format!("Student {student_id}"), dept_id);
    req.account = Some(account(username));
    storage.create_student(req).await.expect("create student")
}

pub(crate) async fn seed_course(storage: &SeaOrmStorage, course_id: &str, credits: f64) -> Course {
    storage
        .create_course(CreateCourseRequest {
            course_id: course_id.to_string(),
            course_name: format!("Course {course_id}"),
            course_type: CourseType::Required,
            hours: 48,
            credits,
            description: None,
        })
        .await
        .expect("create course")
}

pub(crate) async fn seed_assignment(
    storage: &SeaOrmStorage,
    course_id: &str,
    teacher_id: &str,
    academic_year: &str,
    semester: Semester,
    enrollment_limit: i32,
) -> Assignment {
    storage
        .create_assignment(CreateAssignmentRequest {
            course_id: course_id.to_string(),
            teacher_id: teacher_id.to_string(),
            academic_year: academic_year.to_string(),
            semester,
            class_time: Some("Mon 1-2".to_string()),
            location: Some("A101".to_string()),
            exam_time: None,
            enrollment_limit,
        })
        .await
        .expect("create assignment")
}

/// 一个系、一名教师、一门课程、一个教学任务
pub(crate) struct Campus {
    pub storage: SeaOrmStorage,
    pub teacher: Teacher,
    pub course: Course,
    pub assignment: Assignment,
    _file: Option<TempDbFile>,
}

async fn seed_campus(
    storage: SeaOrmStorage,
    enrollment_limit: i32,
    file: Option<TempDbFile>,
) -> Campus {
    seed_department(&storage, "CS").await;
    let teacher = seed_teacher(&storage, "T001", "CS").await;
    let course = seed_course(&storage, "C001", 3.0).await;
    let assignment = seed_assignment(
        &storage,
        "C001",
        "T001",
        "2024-2025",
        Semester::First,
        enrollment_limit,
    )
    .await;
    Campus {
        storage,
        teacher,
        course,
        assignment,
        _file: file,
    }
}

pub(crate) async fn campus(enrollment_limit: i32) -> Campus {
    seed_campus(memory_storage().await, enrollment_limit, None).await
}

/// 同 `campus`，但建在多连接的文件数据库上
pub(crate) async fn file_campus(enrollment_limit: i32) -> Campus {
    let (storage, file) = file_storage().await;
    seed_campus(storage, enrollment_limit, Some(file)).await
}

/// 并发失败只能是可重试或业务拒绝，不能是数据库故障
pub(crate) fn assert_typed_rejection(err: &crate::errors::EduAdminError) {
    assert!(
        err.is_rejection(),
        "expected a typed rejection, got {}",
        err.format_simple()
    );
}
