use chrono::NaiveDate;
use sleeplog_core::export::spreadsheet::{
    write_respondents, RESPONDENT_HEADERS, SLEEP_RECORD_HEADERS,
};
use sleeplog_core::{
    export_respondents, export_sleep_records, AppContext, NewRespondent, SleepMeasurements,
};

#[test]
fn sleep_record_export_writes_header_and_one_row_per_record() {
    let app = AppContext::open_in_memory().unwrap();
    let respondent = app
        .respondent_service()
        .add(&NewRespondent {
            first_name: "Kim".to_string(),
            last_name: "Lee".to_string(),
            email: "kim@example.com".to_string(),
            gender: "F".to_string(),
            country: "KR".to_string(),
            age: 27,
        })
        .unwrap();
    let service = app.sleep_record_service();
    let record = service
        .add_on(
            respondent.id,
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
            SleepMeasurements {
                sleep_start_time: 22.5,
                sleep_end_time: 6.0,
                total_sleep_hours: 7.5,
                sleep_quality: 9,
                exercise_minutes: 30,
                caffeine_intake_mg: 0,
                screen_time: 15,
                work_hours: 8.25,
                productivity_score: 8,
                mood_score: 7,
                stress_level: 2,
            },
        )
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("records.csv");
    let rows = export_sleep_records(&path, &service.list().unwrap()).unwrap();
    assert_eq!(rows, 1);

    let text = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.split("\r\n").collect();
    assert_eq!(lines[0], SLEEP_RECORD_HEADERS.join(","));
    assert_eq!(
        lines[1],
        format!(
            "{},2024-02-29,{},22.5,6,7.5,9,30,0,15,8.25,8,7,2",
            record.id, respondent.id
        )
    );
    assert_eq!(lines[2], "");
    assert_eq!(lines.len(), 3);
}

#[test]
fn respondent_export_quotes_cells_with_delimiters() {
    let app = AppContext::open_in_memory().unwrap();
    let service = app.respondent_service();
    let created = service
        .add(&NewRespondent {
            first_name: "Mary \"May\"".to_string(),
            last_name: "Smith, Jr.".to_string(),
            email: "may@example.com".to_string(),
            gender: "F".to_string(),
            country: "US".to_string(),
            age: 52,
        })
        .unwrap();

    let mut out = Vec::new();
    write_respondents(&mut out, &service.list().unwrap()).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = format!(
        "{}\r\n{},\"Mary \"\"May\"\"\",\"Smith, Jr.\",may@example.com,F,US,52\r\n",
        RESPONDENT_HEADERS.join(","),
        created.id
    );
    assert_eq!(text, expected);
}

#[test]
fn empty_export_still_writes_header_row() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("respondents.csv");

    let rows = export_respondents(&path, &[]).unwrap();

    assert_eq!(rows, 0);
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "ID,First Name,Last Name,Email,Gender,Country,Age\r\n"
    );
}
