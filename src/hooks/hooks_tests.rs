//! Tests for the save hooks.

use super::*;
use serde_json::json;
use std::time::Duration;

#[test]
fn kinds_without_hook_pass_through() {
    let mut hooks = SaveHookRegistry::new();
    let args = vec![json!("a"), json!({"nested": [1, 2]}), json!(null)];

    for kind in MethodKind::ALL {
        if SaveHookRegistry::has_hook(kind) {
            continue;
        }
        assert_eq!(hooks.apply(kind, args.clone()), Ok(args.clone()), "{kind}");
    }
}

#[test]
fn assert_builds_a_sentence() {
    let mut hooks = SaveHookRegistry::new();

    let ok = hooks
        .apply(MethodKind::Assert, vec![json!(true), json!("sum matches")])
        .unwrap();
    let failed = hooks
        .apply(MethodKind::Assert, vec![json!(0), json!("sum matches")])
        .unwrap();

    assert_eq!(ok, vec![json!("Assertion successful: sum matches")]);
    assert_eq!(failed, vec![json!("Assertion failed: sum matches")]);
}

#[test]
fn assert_without_message_renders_undefined() {
    let mut hooks = SaveHookRegistry::new();
    let out = hooks.apply(MethodKind::Assert, vec![json!(false)]).unwrap();
    assert_eq!(out, vec![json!("Assertion failed: undefined")]);
}

#[test]
fn titled_counter_increments() {
    let mut hooks = SaveHookRegistry::new();
    let outputs: Vec<_> = (0..3)
        .map(|_| hooks.apply(MethodKind::Count, vec![json!("x")]).unwrap())
        .collect();

    assert_eq!(
        outputs,
        vec![vec![json!("x 1")], vec![json!("x 2")], vec![json!("x 3")]]
    );
    assert_eq!(hooks.counters().get("x"), Some(3));
}

#[test]
fn untitled_counters_get_distinct_titles() {
    let mut hooks = SaveHookRegistry::new();

    let first = hooks.apply(MethodKind::Count, Vec::new()).unwrap();
    let second = hooks.apply(MethodKind::Count, Vec::new()).unwrap();

    assert_eq!(hooks.counters().len(), 2);
    assert_ne!(first, second);
    for out in [first, second] {
        let text = out[0].as_str().unwrap().to_string();
        let (title, count) = text.rsplit_once(' ').unwrap();
        assert!(title.parse::<u32>().is_ok(), "title {title:?} is not numeric");
        assert_eq!(count, "1");
    }
}

#[test]
fn untitled_count_after_random_range_is_used_up() {
    let mut hooks = SaveHookRegistry::new();
    for title in 1..=SYNTHETIC_TITLE_MAX {
        hooks.counters.increment(&title.to_string());
    }

    let first = hooks.apply(MethodKind::Count, Vec::new()).unwrap();
    let second = hooks.apply(MethodKind::Count, Vec::new()).unwrap();

    assert_eq!(first, vec![json!("100001 1")]);
    assert_eq!(second, vec![json!("100002 1")]);
    assert_eq!(hooks.counters().len(), 100_002);
}

#[test]
fn sequential_titles_skip_numeric_titles_already_in_use() {
    let mut hooks = SaveHookRegistry::new();
    for title in 1..=SYNTHETIC_TITLE_MAX {
        hooks.counters.increment(&title.to_string());
    }
    hooks.apply(MethodKind::Count, vec![json!("100001")]).unwrap();

    let out = hooks.apply(MethodKind::Count, Vec::new()).unwrap();

    assert_eq!(out, vec![json!("100002 1")]);
}

#[test]
fn falsy_title_is_treated_as_untitled() {
    let mut hooks = SaveHookRegistry::new();
    hooks.apply(MethodKind::Count, vec![json!("")]).unwrap();
    assert!(!hooks.counters().contains(""));
    assert_eq!(hooks.counters().len(), 1);
}

#[test]
fn time_requires_a_name() {
    let mut hooks = SaveHookRegistry::new();
    let err = hooks.apply(MethodKind::Time, Vec::new()).unwrap_err();
    assert_eq!(
        err,
        ConsoleError::MissingArgument {
            method: MethodKind::Time,
            what: "a title for the timer",
        }
    );
}

#[test]
fn time_records_name_and_starts_timer() {
    let mut hooks = SaveHookRegistry::new();
    let out = hooks.apply(MethodKind::Time, vec![json!("lookup")]).unwrap();
    assert_eq!(out, vec![json!("lookup")]);
    assert!(hooks.timers().started_at("lookup").is_some());
}

#[test]
fn time_end_reports_elapsed_milliseconds() {
    let mut hooks = SaveHookRegistry::new();
    let start = Instant::now();
    hooks.time_hook(Some(&json!("t")), start).unwrap();

    let out = hooks.time_end_hook(Some(&json!("t")), start + Duration::from_millis(25));

    assert_eq!(out, vec![json!("t: 25ms")]);
    assert!(hooks.timers().started_at("t").is_some(), "timeEnd must not remove the timer");
}

#[test]
fn time_end_for_unknown_timer_is_nan() {
    let mut hooks = SaveHookRegistry::new();
    let out = hooks
        .apply(MethodKind::TimeEnd, vec![json!("never-started")])
        .unwrap();
    assert_eq!(out, vec![json!("never-started: NaNms")]);
}

#[test]
fn time_stamp_records_millis_and_label() {
    assert_eq!(
        time_stamp_hook(Some(&json!("render")), 1_700_000_000_000),
        vec![json!(1_700_000_000_000_i64), json!("render")]
    );
    assert_eq!(time_stamp_hook(None, 5), vec![json!(5), json!(null)]);
}

#[test]
fn trace_produces_one_string() {
    let mut hooks = SaveHookRegistry::new();
    let out = hooks.apply(MethodKind::Trace, vec![json!("ignored")]).unwrap();
    assert_eq!(out.len(), 1);
    assert!(!out[0].as_str().unwrap().is_empty());
}
