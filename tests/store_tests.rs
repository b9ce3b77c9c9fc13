use studytrack::config::{Config, SortBy};
use studytrack::core::data::{
    CourseFilter, CourseInput, CourseStatus, Document, DocumentType, ImportantDate, ImportantDateType,
};
use studytrack::utils::error::AppError;
use studytrack::utils::format::parse_date_input;
use studytrack::{CourseCrud, CourseOperations, CourseSearch, CourseStorage};
use tempfile::TempDir;

fn setup() -> (TempDir, CourseOperations) {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::in_dir(dir.path());
    (dir, CourseOperations::new(&config))
}

fn input(name: &str, abbreviation: &str, credits: &str, semester: &str) -> CourseInput {
    CourseInput {
        name: name.to_string(),
        abbreviation: Some(abbreviation.to_string()),
        credits: credits.to_string(),
        semester: semester.to_string(),
        instructor: "Prof. Example".to_string(),
        day: "Monday".to_string(),
        time: "10:00".to_string(),
        room: "A 101".to_string(),
    }
}

#[test]
fn test_add_and_find_course() {
    let (_dir, ops) = setup();
    let created = ops
        .add_course(input("Softwaretechnik", "ST", "6", "SS25").validate().unwrap())
        .unwrap();

    let by_id = ops.find_course(&created.id).unwrap().unwrap();
    assert_eq!(by_id.name, "Softwaretechnik");
    assert_eq!(by_id.status, CourseStatus::Enrolled);

    let by_abbr = ops.find_course("st").unwrap().unwrap();
    assert_eq!(by_abbr.id, created.id);
    assert!(ops.find_course("missing").unwrap().is_none());
}

#[test]
fn test_empty_store_file_reads_as_empty() {
    let (dir, ops) = setup();
    std::fs::write(dir.path().join("courses.json"), "").unwrap();
    assert!(ops.load_courses().unwrap().courses.is_empty());
    assert!(ops.list_courses(&CourseFilter::default()).unwrap().is_empty());
}

#[test]
fn test_corrupt_store_is_parse_error() {
    let (dir, ops) = setup();
    std::fs::write(dir.path().join("courses.json"), "{ not json").unwrap();
    assert!(matches!(ops.load_courses(), Err(AppError::Parse(_))));
}

#[test]
fn test_semesters_are_chronological() {
    let (_dir, ops) = setup();
    for (name, semester) in [("C", "WS25/26"), ("A", "SS25"), ("B", "WS24/25"), ("D", "SS25")] {
        ops.add_course(input(name, name, "6", semester).validate().unwrap())
            .unwrap();
    }

    assert_eq!(ops.get_semesters().unwrap(), vec!["WS24/25", "SS25", "WS25/26"]);

    let listed: Vec<String> = ops
        .list_courses(&CourseFilter::default())
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(listed, vec!["B", "A", "D", "C"]);

    let stats = ops.get_course_stats().unwrap();
    assert_eq!(stats.total_courses, 4);
    assert_eq!(stats.total_credits, 24);
    assert_eq!(stats.semesters, 3);
}

#[test]
fn test_list_sorted_by_credits() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::in_dir(dir.path());
    config.general.sort_by = SortBy::Credits;
    let ops = CourseOperations::new(&config);

    ops.add_course(input("Small", "S", "3", "SS25").validate().unwrap())
        .unwrap();
    ops.add_course(input("Thesis", "MT", "30", "SS26").validate().unwrap())
        .unwrap();

    let names: Vec<String> = ops
        .list_courses(&CourseFilter::default())
        .unwrap()
        .into_iter()
        .map(|c| c.name)
        .collect();
    assert_eq!(names, vec!["Thesis", "Small"]);
}

#[test]
fn test_filter_by_semester_and_query() {
    let (_dir, ops) = setup();
    ops.add_course(input("Datenbanken 1", "DW1", "6", "WS24/25").validate().unwrap())
        .unwrap();
    ops.add_course(input("Datenbanken 2", "DW2", "6", "SS25").validate().unwrap())
        .unwrap();
    ops.add_course(input("Softwaretechnik", "ST", "6", "SS25").validate().unwrap())
        .unwrap();

    let filter = CourseFilter {
        semester: Some("SS25".to_string()),
        query: Some("daten".to_string()),
        status: None,
    };
    let found = ops.list_courses(&filter).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name, "Datenbanken 2");
}

#[test]
fn test_update_and_move_course() {
    let (_dir, ops) = setup();
    let course = ops
        .add_course(input("Softwaretechnik", "ST", "6", "SS25").validate().unwrap())
        .unwrap();

    let updated = ops
        .update_course(&course.id, input("Software Engineering", "SE", "8", "SS25").validate().unwrap())
        .unwrap();
    assert_eq!(updated.name, "Software Engineering");
    assert_eq!(updated.credits, 8);
    assert_eq!(updated.created_at.timestamp(), course.created_at.timestamp());

    let moved = ops.move_course(&course.id, "WS25/26").unwrap();
    assert_eq!(moved.semester, "WS25/26");

    assert!(matches!(
        ops.move_course(&course.id, "Fall 2025"),
        Err(AppError::Validation(_))
    ));
    assert!(matches!(
        ops.move_course("nope", "SS25"),
        Err(AppError::NotFound(_))
    ));
    assert_eq!(ops.find_course(&course.id).unwrap().unwrap().semester, "WS25/26");
}

#[test]
fn test_invalid_input_rejected() {
    let missing_room = CourseInput {
        room: "  ".to_string(),
        ..input("X", "X", "6", "SS25")
    };
    assert_eq!(
        missing_room.validate().unwrap_err(),
        AppError::Validation("All fields are required".to_string())
    );
    assert!(input("X", "X", "0", "SS25").validate().is_err());
    assert!(input("X", "X", "6", "WS24/26").validate().is_err());
}

#[test]
fn test_documents_and_dates() {
    let (_dir, ops) = setup();
    let course = ops
        .add_course(input("Softwaretechnik", "ST", "6", "SS25").validate().unwrap())
        .unwrap();

    let doc = Document::new("Slides".to_string(), DocumentType::Lecture, "#".to_string());
    let doc_id = doc.id.clone();
    ops.add_document(&course.id, doc).unwrap();

    let late = ImportantDate::new(
        "Exam".to_string(),
        parse_date_input("2025-07-20 09:00").unwrap(),
        ImportantDateType::ExamDate,
    );
    let early = ImportantDate::new(
        "Sheet 1".to_string(),
        parse_date_input("2025-05-02").unwrap(),
        ImportantDateType::AssignmentDue,
    );
    ops.add_important_date(&course.id, late).unwrap();
    let with_dates = ops.add_important_date(&course.id, early.clone()).unwrap();
    let titles: Vec<&str> = with_dates.important_dates.iter().map(|d| d.title.as_str()).collect();
    assert_eq!(titles, vec!["Sheet 1", "Exam"]);

    let after = ops.remove_document(&course.id, &doc_id).unwrap();
    assert!(after.documents.is_empty());
    assert!(matches!(
        ops.remove_document(&course.id, &doc_id),
        Err(AppError::NotFound(_))
    ));

    let after = ops.remove_important_date(&course.id, &early.id).unwrap();
    assert_eq!(after.important_dates.len(), 1);
}

#[test]
fn test_delete_status_and_clear() {
    let (_dir, ops) = setup();
    let a = ops
        .add_course(input("A", "A", "6", "SS25").validate().unwrap())
        .unwrap();
    ops.add_course(input("B", "B", "6", "SS25").validate().unwrap())
        .unwrap();

    let passed = ops.set_status(&a.id, CourseStatus::Passed).unwrap();
    assert_eq!(passed.status, CourseStatus::Passed);

    let removed = ops.delete_course(&a.id).unwrap();
    assert_eq!(removed.name, "A");
    assert!(ops.find_course(&a.id).unwrap().is_none());

    assert_eq!(ops.clear_all().unwrap(), 1);
    assert_eq!(ops.get_course_stats().unwrap().total_courses, 0);
}
