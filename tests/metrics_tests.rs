// Host-side tests for metrics table rows and download progress.

use mobrave_core::{
    fmt2, readiness_rows, DownloadProgress, EngineMetrics, TrackState, MAX_DOWNLOAD_RESERVE,
};

#[test]
fn engine_metrics_missing_fields_are_zero() {
    let m = EngineMetrics::from_lookup(|name| match name {
        "decodeTime" => Some(1.234),
        "samplesAvailable" => Some(512.0),
        _ => None,
    });
    assert_eq!(m.decode_time, 1.234);
    assert_eq!(m.input_overflows, 0.0);

    let rows = m.rows();
    assert_eq!(rows.len(), EngineMetrics::FIELDS.len());
    assert_eq!(rows[0], ("decodeTime".to_string(), "1.23".to_string()));
    assert_eq!(rows[1], ("updateLatentsTime".to_string(), "0.00".to_string()));
    assert_eq!(rows[4], ("samplesAvailable".to_string(), "512.00".to_string()));
}

#[test]
fn readiness_rows_label_each_tracker() {
    let rows = readiness_rows(&[
        ("engine", TrackState::Resolved),
        ("device", TrackState::Pending),
        ("midi", TrackState::Rejected),
    ]);
    assert_eq!(
        rows,
        vec![
            ("engine.state".to_string(), "resolved".to_string()),
            ("device.state".to_string(), "pending".to_string()),
            ("midi.state".to_string(), "rejected".to_string()),
        ]
    );
}

#[test]
fn fmt2_rounds_to_two_decimals() {
    assert_eq!(fmt2(0.0), "0.00");
    assert_eq!(fmt2(3.14159), "3.14");
    assert_eq!(fmt2(-9.8), "-9.80");
}

#[test]
fn download_percent_rounds_up() {
    let mut p = DownloadProgress {
        total: 300,
        ..DownloadProgress::default()
    };
    assert_eq!(p.percent(), 0);
    p.advance(1);
    assert_eq!(p.percent(), 1);
    p.advance(149);
    assert_eq!(p.percent(), 50);
    p.advance(150);
    assert_eq!(p.percent(), 100);
    assert!(!p.done);
    p.finish();
    assert!(p.done);
}

#[test]
fn download_percent_never_exceeds_hundred() {
    let p = DownloadProgress {
        received: 5000,
        total: 1000,
        done: false,
    };
    assert_eq!(p.percent(), 100);
}

#[test]
fn unknown_total_reports_zero_until_done() {
    let mut p = DownloadProgress::default();
    p.advance(4096);
    assert_eq!(p.percent(), 0);
    p.finish();
    assert_eq!(p.percent(), 100);
}

#[test]
fn reserve_hint_caps_an_untrusted_content_length() {
    let unknown = DownloadProgress::default();
    assert_eq!(unknown.reserve_hint(), 0);

    let model = DownloadProgress {
        total: 3_000_000,
        ..DownloadProgress::default()
    };
    assert_eq!(model.reserve_hint(), 3_000_000);

    let bogus = DownloadProgress {
        total: u64::MAX,
        ..DownloadProgress::default()
    };
    assert_eq!(bogus.reserve_hint() as u64, MAX_DOWNLOAD_RESERVE);
}
