use std::sync::{Arc, Mutex};

use chrono::{NaiveDate, TimeZone, Utc};
use dp_config::{DatePartsConfig, DurationConfig, UnknownFieldPolicy};

use super::*;
use crate::event::{Event, Instant, Timestamp, Value};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const ERROR_TAG: &str = "_dateparts_error";

fn t0() -> Instant {
    Utc.with_ymd_and_hms(2016, 1, 1, 23, 0, 0).unwrap()
}

/// An event carrying a pipeline timestamp under `@timestamp`.
fn stamped_event() -> Event {
    let mut event = Event::new();
    event.set(
        "@timestamp",
        Value::Timestamp(Timestamp::from_instant(&t0()).unwrap()),
    );
    event.set("message", Value::from("hello"));
    event
}

fn build(config: &DatePartsConfig) -> DateParts {
    DateParts::with_diagnostics(config, Arc::new(crate::report::NoopDiagnostics)).unwrap()
}

fn with_duration(duration: DurationConfig) -> DatePartsConfig {
    DatePartsConfig {
        duration: Some(duration),
        ..DatePartsConfig::default()
    }
}

#[derive(Default)]
struct Recorder {
    debug: Mutex<Vec<String>>,
    errors: Mutex<Vec<String>>,
}

impl Diagnostics for Recorder {
    fn debug(&self, filter: &str, message: &str) {
        self.debug.lock().unwrap().push(format!("{filter}: {message}"));
    }

    fn error(&self, filter: &str, fault: &Fault) {
        self.errors.lock().unwrap().push(format!("{filter}: {fault}"));
    }
}

// ---------------------------------------------------------------------------
// Construction
// ---------------------------------------------------------------------------

#[test]
fn default_config_builds() {
    let f = build(&DatePartsConfig::default());
    assert_eq!(f.id(), "dateparts");
    assert_eq!(f.fields().len(), 9);
    assert_eq!(f.time_field(), "@timestamp");
    assert_eq!(f.error_tags(), ["_dateparts_error".to_string()]);
    assert!(f.duration().is_none());
}

#[test]
fn custom_fields_and_time_field() {
    let cfg = DatePartsConfig {
        time_field: "zxlk".to_string(),
        ..DatePartsConfig::with_fields(["sec", "hour"])
    };
    let f = build(&cfg);
    assert_eq!(f.fields().len(), 2);
    assert_eq!(f.fields()[0], FieldSpec::Known(Component::Second));
    assert_eq!(f.time_field(), "zxlk");
}

#[test]
fn unknown_field_rejected_at_construction() {
    let cfg = DatePartsConfig::with_fields(["hour", "bogus"]);
    let err = DateParts::new(&cfg).unwrap_err();
    assert!(format!("{err:?}").contains("bogus"));
}

#[test]
fn empty_field_list_rejected() {
    let cfg = DatePartsConfig::with_fields(Vec::<String>::new());
    assert!(DateParts::new(&cfg).is_err());
}

#[test]
fn duplicate_field_rejected() {
    let cfg = DatePartsConfig::with_fields(["hour", "hour"]);
    let err = DateParts::new(&cfg).unwrap_err();
    assert!(format!("{err:?}").contains("FieldList"));
}

#[test]
fn empty_error_tags_rejected() {
    let cfg = DatePartsConfig {
        error_tags: vec![],
        ..DatePartsConfig::default()
    };
    assert!(DateParts::new(&cfg).is_err());
}

#[test]
fn invalid_setting_is_conf_error() {
    let cfg = DatePartsConfig {
        time_field: String::new(),
        ..DatePartsConfig::default()
    };
    let err = DateParts::new(&cfg).unwrap_err();
    let dbg = format!("{err:?}");
    assert!(dbg.contains("Uvs"), "{dbg}");
    assert!(!dbg.contains("FieldList"), "{dbg}");
}

#[test]
fn registration_is_logged() {
    let rec = Arc::new(Recorder::default());
    DateParts::with_diagnostics(&DatePartsConfig::default(), rec.clone()).unwrap();
    assert_eq!(
        *rec.debug.lock().unwrap(),
        vec!["dateparts: DateParts filter registered".to_string()]
    );
}

#[test]
fn duration_defaults_resolved_at_construction() {
    let f = build(&with_duration(DurationConfig::default()));
    let d = f.duration().unwrap();
    assert_eq!(d.start_field, "@timestamp");
    assert_eq!(d.end_field, "@timestamp");
    assert_eq!(d.result_field, "duration_result");
}

// ---------------------------------------------------------------------------
// Field projection
// ---------------------------------------------------------------------------

#[test]
fn default_fields_added() {
    let mut event = stamped_event();
    let before = event.len();
    let outcome = build(&DatePartsConfig::default()).filter(&mut event);

    assert!(outcome.is_matched());
    assert_eq!(event.len(), before + 9);
    for name in ["sec", "min", "hour", "day", "wday", "mday", "month", "year", "yday"] {
        assert!(event.contains(name), "missing {name}");
    }
    assert!(!event.contains("tags"));

    // 2016-01-01 23:00:00 UTC was a Friday.
    assert_eq!(event.fields["sec"], Value::Int(0));
    assert_eq!(event.fields["min"], Value::Int(0));
    assert_eq!(event.fields["hour"], Value::Int(23));
    assert_eq!(event.fields["day"], Value::Int(1));
    assert_eq!(event.fields["mday"], Value::Int(1));
    assert_eq!(event.fields["wday"], Value::Int(5));
    assert_eq!(event.fields["month"], Value::Int(1));
    assert_eq!(event.fields["year"], Value::Int(2016));
    assert_eq!(event.fields["yday"], Value::Int(1));
}

#[test]
fn only_listed_fields_added() {
    let mut event = stamped_event();
    let before = event.len();
    let outcome = build(&DatePartsConfig::with_fields(["sec", "hour"])).filter(&mut event);

    assert!(outcome.is_matched());
    assert_eq!(event.len(), before + 2);
    assert!(event.contains("sec"));
    assert!(event.contains("hour"));
    for absent in ["min", "month", "year", "day", "wday", "yday", "mday", "tags"] {
        assert!(!event.contains(absent), "unexpected {absent}");
    }
}

#[test]
fn every_subset_adds_exactly_its_fields() {
    let names = dp_config::DEFAULT_FIELDS;
    for n in 1..=names.len() {
        let subset: Vec<&str> = names.iter().copied().take(n).collect();
        let mut event = stamped_event();
        let before = event.len();
        build(&DatePartsConfig::with_fields(subset.clone())).filter(&mut event);
        assert_eq!(event.len(), before + n, "subset {subset:?}");
        for name in &names[n..] {
            assert!(!event.contains(name));
        }
    }
}

#[test]
fn native_and_convertible_time_fields() {
    let f = build(&DatePartsConfig::with_fields(["hour", "yday"]));

    let mut native = Event::new();
    native.set("@timestamp", Value::Time(t0()));
    assert!(f.filter(&mut native).is_matched());
    assert_eq!(native.fields["hour"], Value::Int(23));

    let mut date = Event::new();
    date.set(
        "@timestamp",
        Value::Date(NaiveDate::from_ymd_opt(2016, 2, 29).unwrap()),
    );
    assert!(f.filter(&mut date).is_matched());
    assert_eq!(date.fields["hour"], Value::Int(0));
    assert_eq!(date.fields["yday"], Value::Int(60));
}

// ---------------------------------------------------------------------------
// Failures
// ---------------------------------------------------------------------------

#[test]
fn missing_time_field_tags_and_adds_nothing() {
    let cfg = DatePartsConfig {
        time_field: "zxlk".to_string(),
        ..DatePartsConfig::with_fields(["sec", "hour"])
    };
    let mut event = stamped_event();
    let before = event.len();
    let outcome = build(&cfg).filter(&mut event);

    assert_eq!(
        outcome,
        FilterOutcome::Failed(vec![Fault::unresolvable(TimeRole::Primary, "zxlk")])
    );
    assert!(event.has_tag(ERROR_TAG));
    assert!(!event.contains("sec"));
    assert!(!event.contains("hour"));
    // only the tags field was added
    assert_eq!(event.len(), before + 1);
}

#[test]
fn string_time_field_is_not_a_time() {
    let mut event = Event::new();
    event.set("@timestamp", Value::from("2016-01-01T23:00:00Z"));
    let outcome = build(&DatePartsConfig::default()).filter(&mut event);
    assert!(!outcome.is_matched());
    assert_eq!(event.tags(), vec![ERROR_TAG]);
    assert_eq!(event.len(), 2);
}

#[test]
fn primary_failure_skips_duration() {
    let cfg = DatePartsConfig {
        time_field: "missing".to_string(),
        ..with_duration(DurationConfig {
            start_field: Some("@timestamp".to_string()),
            end_field: Some("@timestamp".to_string()),
            result_field: None,
        })
    };
    let mut event = stamped_event();
    let outcome = build(&cfg).filter(&mut event);
    assert_eq!(outcome.faults().len(), 1);
    assert!(!event.contains("duration_result"));
}

#[test]
fn unknown_field_tagged_under_tag_policy() {
    let cfg = DatePartsConfig {
        unknown_fields: UnknownFieldPolicy::Tag,
        ..DatePartsConfig::with_fields(["sec", "bogus", "hour"])
    };
    let mut event = stamped_event();
    let before = event.len();
    let outcome = build(&cfg).filter(&mut event);

    assert_eq!(
        outcome,
        FilterOutcome::Failed(vec![Fault::unknown_component("bogus")])
    );
    assert!(event.has_tag(ERROR_TAG));
    // fields either side of the bad name are still written
    assert!(event.contains("sec"));
    assert!(event.contains("hour"));
    assert!(!event.contains("bogus"));
    assert_eq!(event.len(), before + 3);
}

#[test]
fn several_faults_tag_once() {
    let cfg = DatePartsConfig {
        unknown_fields: UnknownFieldPolicy::Tag,
        error_tags: vec![ERROR_TAG.to_string(), "_enrich".to_string()],
        duration: Some(DurationConfig {
            start_field: Some("tstart".to_string()),
            end_field: Some("tend".to_string()),
            result_field: None,
        }),
        ..DatePartsConfig::with_fields(["bad1", "hour", "bad2"])
    };
    let rec = Arc::new(Recorder::default());
    let f = DateParts::with_diagnostics(&cfg, rec.clone()).unwrap();
    let mut event = stamped_event();
    let outcome = f.filter(&mut event);

    assert_eq!(outcome.faults().len(), 4);
    assert_eq!(event.tags(), vec![ERROR_TAG, "_enrich"]);
    assert_eq!(rec.errors.lock().unwrap().len(), 4);
    assert!(event.contains("hour"));
}

#[test]
fn failed_event_filtered_twice_keeps_single_tag() {
    let cfg = DatePartsConfig {
        time_field: "zxlk".to_string(),
        ..DatePartsConfig::default()
    };
    let f = build(&cfg);
    let mut event = stamped_event();
    f.filter(&mut event);
    f.filter(&mut event);
    assert_eq!(event.tags(), vec![ERROR_TAG]);
}

#[test]
fn error_message_names_the_field() {
    let rec = Arc::new(Recorder::default());
    let cfg = DatePartsConfig {
        time_field: "zxlk".to_string(),
        ..DatePartsConfig::default()
    };
    let f = DateParts::with_diagnostics(&cfg, rec.clone()).unwrap();
    f.filter(&mut stamped_event());
    let errors = rec.errors.lock().unwrap();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("dateparts: invalid time field \"zxlk\""));
}

// ---------------------------------------------------------------------------
// Duration
// ---------------------------------------------------------------------------

fn endpoints_event(start: Instant, end: Instant) -> Event {
    let mut event = stamped_event();
    event.set("tstart", Value::Time(start));
    event.set(
        "tend",
        Value::Timestamp(Timestamp::from_instant(&end).unwrap()),
    );
    event
}

fn start_end(result_field: Option<&str>) -> DurationConfig {
    DurationConfig {
        start_field: Some("tstart".to_string()),
        end_field: Some("tend".to_string()),
        result_field: result_field.map(str::to_string),
    }
}

#[test]
fn duration_one_second() {
    let end = Utc.with_ymd_and_hms(2016, 1, 1, 23, 0, 1).unwrap();
    let mut event = endpoints_event(t0(), end);
    let outcome = build(&with_duration(start_end(None))).filter(&mut event);

    assert!(outcome.is_matched());
    assert_eq!(event.fields["duration_result"], Value::Float(1.0));
    assert!(!event.contains("tags"));
}

#[test]
fn duration_custom_result_field() {
    let end = Utc.with_ymd_and_hms(2016, 1, 1, 23, 1, 0).unwrap();
    let mut event = endpoints_event(t0(), end);
    build(&with_duration(start_end(Some("elapsed")))).filter(&mut event);

    assert_eq!(event.fields["elapsed"], Value::Float(60.0));
    assert!(!event.contains("duration_result"));
}

#[test]
fn duration_negative_when_end_first() {
    let end = Utc.with_ymd_and_hms(2016, 1, 1, 22, 59, 58).unwrap();
    let mut event = endpoints_event(t0(), end);
    let outcome = build(&with_duration(start_end(None))).filter(&mut event);

    assert!(outcome.is_matched());
    assert_eq!(event.fields["duration_result"], Value::Float(-2.0));
}

#[test]
fn duration_default_endpoints_are_zero() {
    let mut event = stamped_event();
    let outcome = build(&with_duration(DurationConfig::default())).filter(&mut event);

    assert!(outcome.is_matched());
    assert_eq!(event.fields["duration_result"], Value::Float(0.0));
}

#[test]
fn duration_missing_endpoint_tags_and_writes_nothing() {
    let mut event = stamped_event();
    event.set("tstart", Value::Time(t0()));
    event.set("tend", Value::Null);
    let outcome = build(&with_duration(start_end(None))).filter(&mut event);

    assert_eq!(
        outcome.faults(),
        [Fault::unresolvable(TimeRole::DurationEnd, "tend")]
    );
    assert!(event.has_tag(ERROR_TAG));
    assert!(!event.contains("duration_result"));
    // component fields are independent of the duration and remain
    assert!(event.contains("hour"));
}

#[test]
fn duration_unresolvable_start() {
    let mut event = stamped_event();
    event.set("tstart", Value::Int(1_451_689_200));
    event.set("tend", Value::Time(t0()));
    let outcome = build(&with_duration(start_end(None))).filter(&mut event);

    assert_eq!(
        outcome.faults(),
        [Fault::unresolvable(TimeRole::DurationStart, "tstart")]
    );
    assert!(!event.contains("duration_result"));
}

// ---------------------------------------------------------------------------
// Concurrency
// ---------------------------------------------------------------------------

#[test]
fn shared_across_threads() {
    let f = Arc::new(build(&DatePartsConfig::with_fields(["hour", "min"])));
    std::thread::scope(|scope| {
        for minute in 0..8u32 {
            let f = Arc::clone(&f);
            scope.spawn(move || {
                let mut event = Event::new();
                event.set(
                    "@timestamp",
                    Value::Time(Utc.with_ymd_and_hms(2020, 6, 1, 12, minute, 0).unwrap()),
                );
                assert!(f.filter(&mut event).is_matched());
                assert_eq!(event.fields["min"], Value::Int(minute as i64));
            });
        }
    });
}
