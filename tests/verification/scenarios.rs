//! Scenario tests: fixed specifications with known outputs and known failures.

// Allow test-specific patterns that are appropriate for test code
#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing
)]

use intvec::rng::{Pcg32, Rng, SeedableRng};
use intvec::telemetry::ViolationKind;
use intvec::{
    corner_cases_by_bounds, corner_cases_by_exponent, range_generate,
    sample_without_duplicates, wildcard_expand, wildcard_format, wildcard_parse, GenError,
    GenerationRequest, IntegerListGenerator, RandomListGenerator, SamplingConfig,
    UniqueRandomSamples, WildcardConfig, WildcardMask,
};
use parking_lot::Mutex;
use std::io;
use std::sync::Arc;

// ============================================================================
// Documented Outputs
// ============================================================================

#[test]
fn linear_range_documented_output() {
    assert_eq!(&*range_generate(1, 10, 4).unwrap(), &[1, 5, 9]);
    assert_eq!(&*range_generate(-2, 2, 1).unwrap(), &[-2, -1, 0, 1, 2]);
}

#[test]
fn corner_cases_documented_output() {
    let expected = [4, 5, 7, 8, 9, 15];
    assert_eq!(&*corner_cases_by_bounds(4, 15, 1).unwrap(), &expected);
    assert_eq!(&*corner_cases_by_exponent(2, 4, 1).unwrap(), &expected);
}

#[test]
fn corner_cases_mixed_sign_bounds() {
    let values = corner_cases_by_bounds(-10, 10, 1).unwrap();
    assert_eq!(
        &*values,
        &[-10, -9, -8, -7, -5, -4, -3, -2, -1, 0, 1, 2, 3, 4, 5, 7, 8, 9, 10]
    );
}

#[test]
fn corner_cases_full_domain_hits_extremes() {
    let values = corner_cases_by_bounds(i64::MIN, i64::MAX, 1).unwrap();
    assert_eq!(values[0], i64::MIN);
    assert_eq!(values[1], i64::MIN + 1);
    assert_eq!(*values.last().unwrap(), i64::MAX);
    assert!(values.contains(&(1 << 62)));
    assert!(values.contains(&-(1 << 62)));
    assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn wildcard_documented_output() {
    assert_eq!(&*wildcard_expand(9, 18).unwrap(), &[9, 11, 25, 27]);
    assert_eq!(wildcard_format(9, 18), "*10*1");
    assert_eq!(wildcard_parse("*10*1").unwrap(), (9, 18));
    assert_eq!(wildcard_parse("?10X1").unwrap(), (9, 18));
}

#[test]
fn wildcard_sign_bit() {
    let values = wildcard_expand(0, i64::MIN).unwrap();
    assert_eq!(&*values, &[i64::MIN, 0]);
    let values = wildcard_expand(0, i64::MIN | 1).unwrap();
    assert_eq!(&*values, &[i64::MIN, i64::MIN | 1, 0, 1]);
}

// ============================================================================
// Documented Failures
// ============================================================================

#[test]
fn linear_range_overflowing_span_is_invalid() {
    for step in [1, 2, 1000, i64::MAX] {
        let err = range_generate(i64::MIN, -1, step).unwrap_err();
        assert!(err.is_invalid_specification(), "step {step}: {err}");
    }
}

#[test]
fn exponent_limits_are_invalid() {
    for (start, stop) in [(0, 63), (1, 64), (-63, 0), (-64, -1)] {
        assert!(corner_cases_by_exponent(start, stop, 1)
            .unwrap_err()
            .is_invalid_specification());
    }
    corner_cases_by_exponent(-62, 62, 1).unwrap();
}

#[test]
fn unique_samples_beyond_range_are_invalid() {
    let mut rng = Pcg32::seed_from_u64(0);
    let err = sample_without_duplicates(1, 3, 5, &mut rng).unwrap_err();
    assert!(err.is_invalid_specification());
    assert!(err.to_string().starts_with("Invalid specification: "));
}

#[test]
fn wildcard_too_many_bits() {
    let err = wildcard_expand(0, -1).unwrap_err();
    assert!(err.is_too_many_values(), "{err}");
    let err = wildcard_expand(0, (1 << 25) - 1).unwrap_err();
    assert_eq!(
        err,
        GenError::TooManyValues {
            requested: 1 << 25,
            limit: 1 << 24,
        }
    );
}

#[test]
fn narrowing_failure_names_value() {
    let err = intvec::LinearRange
        .generate_i32(i64::from(i32::MAX) - 1, i64::from(i32::MAX) + 1, 1)
        .unwrap_err();
    assert_eq!(
        err,
        GenError::OutOfRange {
            value: i64::from(i32::MAX) + 1,
            target: "i32",
        }
    );
}

// ============================================================================
// Configuration Applied to Generators
// ============================================================================

#[test]
fn wildcard_config_caps_expansion() {
    let small = WildcardMask::with_config(WildcardConfig::small()).unwrap();
    assert_eq!(small.expand(0, 0xFFFF).unwrap().len(), 1 << 16);
    assert!(small.expand(0, 0x1FFFF).unwrap_err().is_too_many_values());
}

#[test]
fn invalid_configs_are_rejected_at_construction() {
    assert!(WildcardMask::with_config(WildcardConfig { max_values: 0 })
        .unwrap_err()
        .is_invalid_specification());
    assert!(UniqueRandomSamples::with_config(SamplingConfig {
        density_factor: -1,
        ..SamplingConfig::default()
    })
    .unwrap_err()
    .is_invalid_specification());
}

#[test]
fn sampling_config_from_json_document() {
    let config: SamplingConfig =
        serde_json::from_str(r#"{"density_factor": 2, "sort_output": false}"#).unwrap();
    let sampler = UniqueRandomSamples::with_config(config).unwrap();
    let mut rng = Pcg32::seed_from_u64(8);
    let values = sampler.generate_with(0, 9, 10, &mut rng).unwrap();
    let mut sorted = values.to_vec();
    sorted.sort_unstable();
    assert_eq!(sorted, (0..10).collect::<Vec<_>>());
}

// ============================================================================
// Requests
// ============================================================================

#[test]
fn request_batch_from_text() {
    let batch = "range 0 6 3\ncorners 2 4 1\nbounds 4 15 1\nmask *10*1\nunique 1 5 5";
    let mut rng = Pcg32::seed_from_u64(1);
    let outputs: Vec<Vec<i64>> = batch
        .lines()
        .map(|line| {
            line.parse::<GenerationRequest>()
                .unwrap()
                .generate(&mut rng)
                .unwrap()
                .into_vec()
        })
        .collect();
    assert_eq!(
        outputs,
        vec![
            vec![0, 3, 6],
            vec![4, 5, 7, 8, 9, 15],
            vec![4, 5, 7, 8, 9, 15],
            vec![9, 11, 25, 27],
            vec![1, 2, 3, 4, 5],
        ]
    );
}

#[test]
fn request_documents_round_trip_through_json() {
    let requests = vec![
        GenerationRequest::Range {
            start: -1,
            stop: 1,
            step: 1,
        },
        GenerationRequest::Mask { base: 9, mask: 18 },
        GenerationRequest::Random {
            min: 0,
            max: 9,
            amount: 3,
        },
    ];
    let json = serde_json::to_string(&requests).unwrap();
    let back: Vec<GenerationRequest> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, requests);
}

// ============================================================================
// Telemetry
// ============================================================================

/// `io::Write` sink shared with a `fmt` subscriber.
#[derive(Clone, Default)]
struct CapturedLog(Arc<Mutex<Vec<u8>>>);

impl CapturedLog {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock()).into_owned()
    }
}

impl io::Write for CapturedLog {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn empty_draw_range_is_logged_as_violation() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .finish();

    let drawn = tracing::subscriber::with_default(subscriber, || {
        Pcg32::seed_from_u64(3).gen_range(5..5)
    });

    assert_eq!(drawn, 5);
    let text = log.text();
    assert!(text.contains("WARN"), "{text}");
    assert!(text.contains("gen_range called with empty range [5..5)"), "{text}");
    assert!(text.contains(ViolationKind::Random.as_str()), "{text}");
}

#[test]
fn valid_requests_log_no_violations() {
    let log = CapturedLog::default();
    let writer = log.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    tracing::subscriber::with_default(subscriber, || {
        let mut rng = Pcg32::seed_from_u64(8);
        range_generate(i64::MAX - 10, i64::MAX, 3).unwrap();
        corner_cases_by_bounds(i64::MIN, i64::MAX, 1).unwrap();
        wildcard_expand(0, i64::MIN | 0xFF).unwrap();
        sample_without_duplicates(-5, 5, 11, &mut rng).unwrap();
    });

    assert!(log.text().is_empty(), "{}", log.text());
}

#[test]
fn generators_log_through_tracing() {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .finish();
    tracing::subscriber::with_default(subscriber, || {
        let mut rng = Pcg32::seed_from_u64(4);
        range_generate(0, 100, 10).unwrap();
        corner_cases_by_bounds(-100, 100, 2).unwrap();
        wildcard_expand(3, 12).unwrap();
        sample_without_duplicates(0, 1_000_000, 10, &mut rng).unwrap();
    });
}
