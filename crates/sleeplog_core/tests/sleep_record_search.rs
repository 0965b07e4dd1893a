use chrono::NaiveDate;
use sleeplog_core::{
    AppContext, NewRespondent, RangeFilter, RespondentId, SleepMeasurements, SleepRecord,
    SleepRecordQuery, SqliteSleepRecordService, ZeroSentinelBounds,
};

fn add_respondent(app: &AppContext, email: &str) -> RespondentId {
    app.respondent_service()
        .add(&NewRespondent {
            first_name: "Rae".to_string(),
            last_name: "Night".to_string(),
            email: email.to_string(),
            gender: "F".to_string(),
            country: "IE".to_string(),
            age: 34,
        })
        .unwrap()
        .id
}

fn add_record(
    service: &SqliteSleepRecordService<'_>,
    person_id: RespondentId,
    measurements: SleepMeasurements,
) -> SleepRecord {
    service
        .add_on(
            person_id,
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            measurements,
        )
        .unwrap()
}

fn ids(records: &[SleepRecord]) -> Vec<i64> {
    records.iter().map(|record| record.id).collect()
}

#[test]
fn range_bound_keeps_only_matching_records() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app, "rae@example.com");
    let service = app.sleep_record_service();

    let mut created = Vec::new();
    for quality in [2, 5, 8] {
        created.push(add_record(
            &service,
            person_id,
            SleepMeasurements {
                sleep_quality: quality,
                ..SleepMeasurements::default()
            },
        ));
    }

    let query = SleepRecordQuery {
        sleep_quality: RangeFilter::between(3, 9),
        ..SleepRecordQuery::default()
    };
    let found = service.search(&query).unwrap();

    assert_eq!(ids(&found), vec![created[1].id, created[2].id]);
}

#[test]
fn every_active_dimension_must_match() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app, "rae@example.com");
    let service = app.sleep_record_service();

    let both = add_record(
        &service,
        person_id,
        SleepMeasurements {
            total_sleep_hours: 8.0,
            stress_level: 2,
            ..SleepMeasurements::default()
        },
    );
    add_record(
        &service,
        person_id,
        SleepMeasurements {
            total_sleep_hours: 8.0,
            stress_level: 7,
            ..SleepMeasurements::default()
        },
    );
    add_record(
        &service,
        person_id,
        SleepMeasurements {
            total_sleep_hours: 5.5,
            stress_level: 2,
            ..SleepMeasurements::default()
        },
    );

    let query = SleepRecordQuery {
        total_sleep_hours: RangeFilter::at_least(7.0),
        stress_level: RangeFilter::at_most(4),
        ..SleepRecordQuery::default()
    };
    assert_eq!(ids(&service.search(&query).unwrap()), vec![both.id]);
}

#[test]
fn all_zero_sentinel_bounds_return_every_record_in_id_order() {
    let app = AppContext::open_in_memory().unwrap();
    let first = add_respondent(&app, "one@example.com");
    let second = add_respondent(&app, "two@example.com");
    let service = app.sleep_record_service();

    let a = add_record(&service, second, SleepMeasurements::default());
    let b = add_record(&service, first, SleepMeasurements::default());
    let c = add_record(&service, second, SleepMeasurements::default());

    let query = SleepRecordQuery::from(&ZeroSentinelBounds::default());
    let found = service.search(&query).unwrap();

    assert_eq!(ids(&found), vec![a.id, b.id, c.id]);
    assert_eq!(found, service.list().unwrap());
}

#[test]
fn explicit_zero_bound_is_applied() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app, "rae@example.com");
    let service = app.sleep_record_service();

    let no_coffee = add_record(&service, person_id, SleepMeasurements::default());
    add_record(
        &service,
        person_id,
        SleepMeasurements {
            caffeine_intake_mg: 80,
            ..SleepMeasurements::default()
        },
    );

    let query = SleepRecordQuery {
        caffeine_intake_mg: RangeFilter::at_most(0),
        ..SleepRecordQuery::default()
    };
    assert_eq!(ids(&service.search(&query).unwrap()), vec![no_coffee.id]);

    let legacy = SleepRecordQuery::from(&ZeroSentinelBounds {
        caffeine_intake_mg_max: 0,
        ..ZeroSentinelBounds::default()
    });
    assert_eq!(service.search(&legacy).unwrap().len(), 2);
}

#[test]
fn respondent_restriction_combines_with_ranges() {
    let app = AppContext::open_in_memory().unwrap();
    let first = add_respondent(&app, "one@example.com");
    let second = add_respondent(&app, "two@example.com");
    let service = app.sleep_record_service();

    let wanted = add_record(
        &service,
        first,
        SleepMeasurements {
            screen_time: 90,
            ..SleepMeasurements::default()
        },
    );
    add_record(
        &service,
        second,
        SleepMeasurements {
            screen_time: 90,
            ..SleepMeasurements::default()
        },
    );
    add_record(&service, first, SleepMeasurements::default());

    let query = SleepRecordQuery {
        screen_time: RangeFilter::at_least(60),
        ..SleepRecordQuery::for_respondent(first)
    };
    assert_eq!(ids(&service.search(&query).unwrap()), vec![wanted.id]);
}

#[test]
fn no_match_is_an_empty_success() {
    let app = AppContext::open_in_memory().unwrap();
    let person_id = add_respondent(&app, "rae@example.com");
    let service = app.sleep_record_service();
    add_record(&service, person_id, SleepMeasurements::default());

    let query = SleepRecordQuery {
        work_hours: RangeFilter::between(10.0, 12.0),
        ..SleepRecordQuery::default()
    };
    assert!(service.search(&query).unwrap().is_empty());
}
