use super::*;
use crate::call::{ArgValue, ArgumentList, CallOutcome, FakeHandle, MemberRef, PendingCall};
use crate::matching::ArgumentValidator;

struct Factory;
struct Widget;

#[derive(Debug, Clone, PartialEq)]
struct Date {
    year: u16,
    month: u8,
    day: u8,
}

fn record(recorder: &CallRecorder, member: MemberRef, values: Vec<ArgValue>) {
    let args = ArgumentList::for_member(&member, values).unwrap();
    let call = PendingCall::new(FakeHandle::new("Faked Factory"), member, args)
        .complete(CallOutcome::Returned(ArgValue::none()));
    recorder.record(call).unwrap();
}

fn bar_nullary() -> MemberRef {
    MemberRef::method::<Factory>("bar").build().unwrap()
}

fn bar_string() -> MemberRef {
    MemberRef::method::<Factory>("bar")
        .parameter::<String>("text")
        .build()
        .unwrap()
}

fn bar_dated() -> MemberRef {
    MemberRef::method::<Factory>("bar")
        .parameter::<Date>("date")
        .parameter::<String>("label")
        .build()
        .unwrap()
}

fn biz() -> MemberRef {
    MemberRef::method::<Factory>("biz").build().unwrap()
}

/// Recorder holding bar(), bar(), bar("test"), bar(date, "birthday"),
/// biz().
fn mixed_history() -> CallRecorder {
    let recorder = CallRecorder::new();
    record(&recorder, bar_nullary(), vec![]);
    record(&recorder, bar_nullary(), vec![]);
    record(
        &recorder,
        bar_string(),
        vec![ArgValue::of("test".to_string())],
    );
    record(
        &recorder,
        bar_dated(),
        vec![
            ArgValue::of(Date {
                year: 1977,
                month: 4,
                day: 5,
            }),
            ArgValue::of("birthday".to_string()),
        ],
    );
    record(&recorder, biz(), vec![]);
    recorder
}

#[test]
fn test_satisfied_constraint_passes() {
    let recorder = mixed_history();
    assert_repeated(
        &recorder,
        "Factory.bar",
        &CallFilter::named::<Factory>("bar"),
        &ArgumentsPredicate::any(),
        &RepeatConstraint::exactly(4),
    )
    .unwrap();
}

#[test]
fn test_failed_assertion_enumerates_full_history() {
    let recorder = mixed_history();
    let err = assert_repeated(
        &recorder,
        "Factory.bar(\"\")",
        &CallFilter::Exact(bar_string()),
        &ArgumentsPredicate::positional(vec![ArgumentValidator::equal_to(String::new())]),
        &RepeatConstraint::custom(|n| n > 2, "repeat > 2"),
    )
    .unwrap_err();

    let AssertionError::Expectation(failure) = err else {
        panic!("expected an expectation failure");
    };
    let report = &failure.report;
    assert_eq!(report.observed, 0);
    // Five recorded calls collapse to four lines: the two bare bar() calls
    // share one.
    assert_eq!(report.calls.len(), 4);
    assert_eq!(report.calls[0].rendering, "Factory.bar()");
    assert_eq!(report.calls[0].repeated, 2);
    assert_eq!(report.calls[1].rendering, "Factory.bar(\"test\")");
    assert_eq!(
        report.calls[2].rendering,
        "Factory.bar(Date { year: 1977, month: 4, day: 5 }, \"birthday\")"
    );
    assert_eq!(report.calls[3].rendering, "Factory.biz()");

    let text = failure.to_string();
    assert!(text.starts_with(
        "Assertion failed for the following call:\n  Factory.bar(\"\")\n"
    ));
    assert!(text.contains("Expected to find it repeat > 2 but found it 0 times"));
    assert!(text.contains("1. Factory.bar() repeated 2 times"));
    assert!(text.contains("4. Factory.biz()"));
}

#[test]
fn test_never_transitions_to_failure_after_first_call() {
    let create = MemberRef::method::<Factory>("create")
        .returning::<Widget>()
        .build()
        .unwrap();
    let recorder = CallRecorder::new();
    let filter = CallFilter::Exact(create.clone());

    // No call made: the never-constraint holds.
    assert_repeated(
        &recorder,
        "Factory.create()",
        &filter,
        &ArgumentsPredicate::any(),
        &RepeatConstraint::never(),
    )
    .unwrap();

    record(&recorder, create, vec![]);

    let err = assert_repeated(
        &recorder,
        "Factory.create()",
        &filter,
        &ArgumentsPredicate::any(),
        &RepeatConstraint::never(),
    )
    .unwrap_err();
    let AssertionError::Expectation(failure) = err else {
        panic!("expected an expectation failure");
    };
    assert_eq!(failure.report.observed, 1);
    assert_eq!(failure.report.expected, "never");
}

#[test]
fn test_sequence_in_order_passes() {
    let recorder = mixed_history();
    assert_sequence(
        &recorder,
        &[
            SequenceStep::new(
                "Factory.bar()",
                CallFilter::Exact(bar_nullary()),
                ArgumentsPredicate::any(),
            ),
            SequenceStep::new(
                "Factory.bar(\"test\")",
                CallFilter::Exact(bar_string()),
                ArgumentsPredicate::any(),
            ),
            SequenceStep::new(
                "Factory.biz()",
                CallFilter::Exact(biz()),
                ArgumentsPredicate::any(),
            ),
        ],
    )
    .unwrap();
}

#[test]
fn test_sequence_out_of_order_fails_on_unplaceable_step() {
    let recorder = mixed_history();
    let err = assert_sequence(
        &recorder,
        &[
            SequenceStep::new(
                "Factory.biz()",
                CallFilter::Exact(biz()),
                ArgumentsPredicate::any(),
            ),
            SequenceStep::new(
                "Factory.bar(\"test\")",
                CallFilter::Exact(bar_string()),
                ArgumentsPredicate::any(),
            ),
        ],
    )
    .unwrap_err();

    let AssertionError::Expectation(failure) = err else {
        panic!("expected an expectation failure");
    };
    // bar("test") happened, but only before biz(); the report says it was
    // observed once overall.
    assert_eq!(failure.report.observed, 1);
    assert_eq!(failure.report.target, "Factory.bar(\"test\")");
    assert_eq!(
        failure.report.expected,
        "as step 2 of the expected call sequence"
    );
    assert_eq!(failure.report.calls.len(), 4);
}

#[test]
fn test_sequence_consumes_calls_greedily() {
    // Two steps matching the same filter need two distinct calls.
    let recorder = CallRecorder::new();
    record(&recorder, bar_nullary(), vec![]);
    let steps = || {
        vec![
            SequenceStep::new(
                "Factory.bar()",
                CallFilter::Exact(bar_nullary()),
                ArgumentsPredicate::any(),
            ),
            SequenceStep::new(
                "Factory.bar()",
                CallFilter::Exact(bar_nullary()),
                ArgumentsPredicate::any(),
            ),
        ]
    };
    assert!(assert_sequence(&recorder, &steps()).is_err());

    record(&recorder, bar_nullary(), vec![]);
    assert_sequence(&recorder, &steps()).unwrap();
}

#[test]
fn test_empty_sequence_always_passes() {
    let recorder = CallRecorder::new();
    assert_sequence(&recorder, &[]).unwrap();
}

#[test]
fn test_report_includes_nonmatching_calls() {
    // The dump enumerates every recorded call, not only those matching the
    // filter under test.
    let recorder = mixed_history();
    let err = assert_repeated(
        &recorder,
        "Factory.biz()",
        &CallFilter::Exact(biz()),
        &ArgumentsPredicate::any(),
        &RepeatConstraint::twice(),
    )
    .unwrap_err();
    let AssertionError::Expectation(failure) = err else {
        panic!("expected an expectation failure");
    };
    assert_eq!(failure.report.observed, 1);
    let total: u64 = failure.report.calls.iter().map(|line| line.repeated).sum();
    assert_eq!(total, 5);
}

#[test]
fn test_history_snapshot_keeps_reports_stable() {
    let recorder = mixed_history();
    let failing = || {
        assert_repeated(
            &recorder,
            "Factory.biz()",
            &CallFilter::Exact(biz()),
            &ArgumentsPredicate::any(),
            &RepeatConstraint::never(),
        )
    };
    let first = failing().unwrap_err();
    let second = failing().unwrap_err();
    let (AssertionError::Expectation(a), AssertionError::Expectation(b)) = (first, second)
    else {
        panic!("expected expectation failures");
    };
    assert_eq!(a.report, b.report);
}
