use chrono::NaiveDate;
use rusqlite::Connection;
use sleeplog_core::{
    AppContext, NewRespondent, NewSleepRecord, RepoError, RespondentId, SleepMeasurements,
    SleepRecordRepository, SqliteSleepRecordRepository,
};

fn add_respondent(app: &AppContext) -> RespondentId {
    app.respondent_service()
        .add(&NewRespondent {
            first_name: "Tess".to_string(),
            last_name: "Wake".to_string(),
            email: "tess@example.com".to_string(),
            gender: "F".to_string(),
            country: "AU".to_string(),
            age: 38,
        })
        .unwrap()
        .id
}

fn new_record(person_id: RespondentId) -> NewSleepRecord {
    NewSleepRecord {
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        person_id,
        measurements: SleepMeasurements {
            total_sleep_hours: 6.5,
            sleep_quality: 5,
            ..SleepMeasurements::default()
        },
    }
}

fn record_count(conn: &Connection) -> i64 {
    conn.query_row("SELECT COUNT(*) FROM sleep_data;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn failure_after_successful_write_discards_the_write() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app);
    let repo = SqliteSleepRecordRepository::new(app.connection());

    let outcome: Result<(), RepoError> = repo.with_transaction(|| {
        repo.create_record(&new_record(person_id))?;
        assert_eq!(record_count(app.connection()), 1);
        Err(RepoError::NotFound {
            table: "sleep_data",
            id: 0,
        })
    });

    assert!(matches!(
        outcome,
        Err(RepoError::NotFound {
            table: "sleep_data",
            id: 0
        })
    ));
    assert_eq!(record_count(app.connection()), 0);
}

#[test]
fn successful_work_is_committed() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app);
    let repo = SqliteSleepRecordRepository::new(app.connection());

    let created = repo
        .with_transaction(|| -> Result<_, RepoError> {
            let first = repo.create_record(&new_record(person_id))?;
            repo.create_record(&new_record(person_id))?;
            Ok(first)
        })
        .unwrap();

    assert_eq!(record_count(app.connection()), 2);
    assert_eq!(repo.get_record(created.id).unwrap(), Some(created));
}

#[test]
fn stored_date_text_is_read_as_calendar_date() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app);
    app.connection()
        .execute(
            "INSERT INTO sleep_data (
                date, person_id, sleep_start_time, sleep_end_time, total_sleep_hours,
                sleep_quality, exercise_minutes, caffeine_intake_mg, screen_time_before_bed,
                work_hours, productivity_score, mood_score, stress_level
            ) VALUES ('2022-07-09', ?1, 22.0, 6.0, 8.0, 7, 0, 0, 0, 0.0, 5, 5, 5);",
            [person_id],
        )
        .unwrap();

    let records = app.sleep_record_service().list().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2022, 7, 9).unwrap());
    assert_eq!(records[0].measurements.total_sleep_hours, 8.0);
}
