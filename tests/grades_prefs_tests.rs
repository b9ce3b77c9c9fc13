use serde_json::json;
use std::cell::RefCell;
use std::rc::Rc;
use studytrack::config::Config;
use studytrack::core::data::{CourseFilter, CourseInput};
use studytrack::core::deadlines::{Deadline, DeadlineKind, DeadlineList};
use studytrack::core::preferences::SEMESTER_FILTER_KEY;
use studytrack::core::seed::demo_courses;
use studytrack::{
    calculate_average, group_by_semester, CourseCrud, CourseSearch, FilePreferences, GradeBook,
    GradeEntry, PreferencesStore, StudyTrack,
};

fn course_input(name: &str, credits: &str, semester: &str) -> CourseInput {
    CourseInput {
        name: name.to_string(),
        abbreviation: None,
        credits: credits.to_string(),
        semester: semester.to_string(),
        instructor: "n.a.".to_string(),
        day: "n.a.".to_string(),
        time: "n.a.".to_string(),
        room: "n.a.".to_string(),
    }
}

#[test]
fn test_grade_book_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let app = StudyTrack::new(Config::in_dir(dir.path()));
    let ops = app.operations();

    let small = ops
        .add_course(course_input("Seminar", "6", "WS24/25").validate().unwrap())
        .unwrap();
    let thesis = ops
        .add_course(course_input("Master Thesis", "30", "SS26").validate().unwrap())
        .unwrap();

    {
        let mut prefs = app.preferences().unwrap();
        let mut book = GradeBook::default();
        book.set(&small.id, "1.3");
        book.set(&thesis.id, "2.7");
        prefs.set_value(GradeBook::KEY, book.to_value()).unwrap();
    }

    let prefs = app.preferences().unwrap();
    let book = GradeBook::from_value(prefs.get_value(GradeBook::KEY).unwrap()).unwrap();
    let courses = ops.list_courses(&CourseFilter::default()).unwrap();
    let summary = book.summary(&courses);

    assert_eq!(summary.average, 2.47);
    assert_eq!(summary.graded_credits, 36);
    assert_eq!(summary.total_credits, 36);
    assert_eq!(summary.graded_count, 2);
}

#[test]
fn test_average_ignores_invalid_and_missing_grades() {
    let courses = demo_courses(chrono::Utc::now());
    let grades = vec![
        GradeEntry::new(courses[0].id.clone(), "1.0"),
        GradeEntry::new(courses[1].id.clone(), "5.5"),
        GradeEntry::new(courses[2].id.clone(), "abc"),
        GradeEntry::new("unknown-course", "1.0"),
    ];

    let summary = calculate_average(&courses, &grades);
    assert_eq!(summary.average, 1.0);
    assert_eq!(summary.graded_count, 1);
    assert_eq!(summary.graded_credits, 6);
    assert_eq!(summary.total_credits, 108);
    assert_eq!(summary.open_credits(), 102);
}

#[test]
fn test_file_preferences_persist_and_notify() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("preferences.json");

    let seen = Rc::new(RefCell::new(Vec::new()));
    {
        let mut prefs = FilePreferences::open(&path).unwrap();
        let log = Rc::clone(&seen);
        let id = prefs.subscribe(Box::new(move |key, value| {
            log.borrow_mut().push((key.to_string(), value.clone()));
        }));

        prefs.set(SEMESTER_FILTER_KEY, &"SS25").unwrap();
        prefs.remove(SEMESTER_FILTER_KEY).unwrap();
        assert!(prefs.unsubscribe(id));
        prefs.set("coursesViewMode", &"list").unwrap();
    }

    assert_eq!(
        *seen.borrow(),
        vec![
            (SEMESTER_FILTER_KEY.to_string(), json!("SS25")),
            (SEMESTER_FILTER_KEY.to_string(), serde_json::Value::Null),
        ]
    );

    let reopened = FilePreferences::open(&path).unwrap();
    assert_eq!(reopened.get::<String>("coursesViewMode").as_deref(), Some("list"));
    assert!(reopened.get_value(SEMESTER_FILTER_KEY).is_none());
}

#[test]
fn test_deadlines_stored_next_to_grades() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("preferences.json");

    let mut prefs = FilePreferences::open(&path).unwrap();
    prefs.set_value(GradeBook::KEY, json!([])).unwrap();
    let mut list = DeadlineList::load(&prefs);
    list.add(Deadline::new("Re-register", DeadlineKind::Administrative).unwrap());
    list.save(&mut prefs).unwrap();

    let reopened = FilePreferences::open(&path).unwrap();
    let mut keys = reopened.keys();
    keys.sort();
    assert_eq!(keys, vec!["courseGrades", "deadlines"]);
    assert_eq!(DeadlineList::load(&reopened).items()[0].title, "Re-register");
}

#[test]
fn test_seed_data_groups_by_semester() {
    let groups = group_by_semester(&demo_courses(chrono::Utc::now()));
    let summary: Vec<(String, usize, u32)> = groups
        .iter()
        .map(|g| (g.label.clone(), g.courses.len(), g.total_credits()))
        .collect();
    assert_eq!(
        summary,
        vec![
            ("WS24/25".to_string(), 5, 30),
            ("SS25".to_string(), 4, 24),
            ("WS25/26".to_string(), 4, 24),
            ("SS26".to_string(), 1, 30),
        ]
    );
}
