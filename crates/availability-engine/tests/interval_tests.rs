//! Tests for the half-open interval primitive.

use availability_engine::{EngineError, TimeInterval};
use chrono::{DateTime, Duration, TimeZone, Utc};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn iv(sh: u32, sm: u32, eh: u32, em: u32) -> TimeInterval {
    TimeInterval::new(at(sh, sm), at(eh, em)).unwrap()
}

#[test]
fn zero_length_interval_rejected() {
    let err = TimeInterval::new(at(9, 0), at(9, 0)).unwrap_err();
    assert_eq!(
        err,
        EngineError::InvalidInterval {
            start: at(9, 0),
            end: at(9, 0)
        }
    );
}

#[test]
fn inverted_interval_rejected() {
    assert!(TimeInterval::new(at(10, 0), at(9, 0)).is_err());
}

#[test]
fn partial_overlap_detected() {
    assert!(iv(9, 0, 9, 30).overlaps(&iv(9, 15, 9, 45)));
}

#[test]
fn adjacent_intervals_do_not_overlap() {
    let a = iv(9, 0, 10, 0);
    let b = iv(10, 0, 11, 0);
    assert!(!a.overlaps(&b));
    assert!(!b.overlaps(&a));
    assert!(a.intersection(&b).is_none());
    assert_eq!(a.intersection_length(&b), Duration::zero());
}

#[test]
fn containment_is_an_overlap() {
    let outer = iv(9, 0, 12, 0);
    let inner = iv(10, 0, 11, 0);
    assert!(outer.overlaps(&inner));
    assert!(inner.overlaps(&outer));
    assert!(outer.contains_interval(&inner));
    assert!(!inner.contains_interval(&outer));
    assert_eq!(outer.intersection(&inner), Some(inner));
}

#[test]
fn identical_intervals_overlap_fully() {
    let a = iv(9, 0, 10, 0);
    assert!(a.overlaps(&a));
    assert_eq!(a.intersection_length(&a), Duration::minutes(60));
}

#[test]
fn intersection_length_of_partial_overlap() {
    let a = iv(9, 0, 10, 0);
    let b = iv(9, 30, 10, 30);
    assert_eq!(a.intersection_length(&b), Duration::minutes(30));
    assert_eq!(a.intersection(&b), Some(iv(9, 30, 10, 0)));
}

#[test]
fn clip_to_window_trims_both_ends() {
    let window = iv(9, 0, 17, 0);
    assert_eq!(iv(8, 0, 18, 0).clip_to(&window), Some(window));
    assert_eq!(iv(8, 0, 9, 30).clip_to(&window), Some(iv(9, 0, 9, 30)));
    assert_eq!(iv(17, 0, 18, 0).clip_to(&window), None);
}

#[test]
fn duration_accessors() {
    let a = iv(9, 0, 10, 45);
    assert_eq!(a.duration(), Duration::minutes(105));
    assert_eq!(a.duration_minutes(), 105);
}
