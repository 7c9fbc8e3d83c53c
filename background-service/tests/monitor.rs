use background_service::{MonitorTarget, TrendMonitor, MAX_POLLING_INTERVAL};
use content_engine::Studio;
use llm_interface::testing::RecordingBackend;
use socialarch_core::{Settings, TrendCategory};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

const TRENDS_JSON: &str = r#"[{"platform": "TikTok", "trendName": "Clay Morph", "description": "Objects melt into clay", "hypeReason": "Satisfying loop"}]"#;

fn monitor(backend: &Arc<RecordingBackend>, interval: Duration) -> TrendMonitor {
    TrendMonitor::with_interval(Arc::new(Studio::hosted(backend.clone())), interval)
}

fn target(category: TrendCategory) -> MonitorTarget {
    MonitorTarget::new(Settings::default(), category)
}

#[tokio::test]
async fn test_first_scan_waits_one_interval() {
    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON));
    let (handle, mut reports) =
        monitor(&backend, Duration::from_millis(200)).spawn(target(TrendCategory::Audio));

    sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.call_count(), 0);

    let report = timeout(Duration::from_secs(2), reports.recv())
        .await
        .expect("no report before timeout")
        .expect("monitor closed the channel");
    assert_eq!(report.category, TrendCategory::Audio);
    assert!(report.outcome.is_fresh());
    assert_eq!(report.outcome.value()[0].category, Some(TrendCategory::Audio));

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_scans_never_overlap() {
    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON).with_delay(Duration::from_millis(60)));
    let (handle, mut reports) =
        monitor(&backend, Duration::from_millis(10)).spawn(target(TrendCategory::General));

    for _ in 0..3 {
        timeout(Duration::from_secs(2), reports.recv())
            .await
            .expect("no report before timeout")
            .expect("monitor closed the channel");
    }
    handle.stop().await.unwrap();

    assert!(backend.call_count() >= 3);
    assert_eq!(backend.peak_concurrency(), 1);
}

#[tokio::test]
async fn test_retarget_applies_on_next_tick() {
    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON));
    let (handle, mut reports) =
        monitor(&backend, Duration::from_millis(30)).spawn(target(TrendCategory::Audio));

    let first = timeout(Duration::from_secs(2), reports.recv()).await.unwrap().unwrap();
    assert_eq!(first.category, TrendCategory::Audio);

    handle.retarget(target(TrendCategory::Plots));
    let mut report = timeout(Duration::from_secs(2), reports.recv()).await.unwrap().unwrap();
    // A scan may already have been in flight when the target changed.
    if report.category == TrendCategory::Audio {
        report = timeout(Duration::from_secs(2), reports.recv()).await.unwrap().unwrap();
    }
    assert_eq!(report.category, TrendCategory::Plots);

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_failed_scan_is_reported_degraded() {
    let backend = Arc::new(RecordingBackend::refusing("connection refused"));
    let (handle, mut reports) =
        monitor(&backend, Duration::from_millis(20)).spawn(target(TrendCategory::Formats));

    let report = timeout(Duration::from_secs(2), reports.recv()).await.unwrap().unwrap();
    assert!(report.outcome.is_degraded());
    assert_eq!(report.outcome.value()[0].trend_name, "Search Error");

    handle.stop().await.unwrap();
}

#[tokio::test]
async fn test_stop_abandons_in_flight_scan() {
    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON).with_delay(Duration::from_secs(30)));
    let (handle, _reports) =
        monitor(&backend, Duration::from_millis(10)).spawn(target(TrendCategory::General));

    sleep(Duration::from_millis(50)).await;
    assert_eq!(backend.call_count(), 1);
    assert!(handle.is_running());

    timeout(Duration::from_secs(1), handle.stop())
        .await
        .expect("stop waited for the scan")
        .unwrap();
}

#[tokio::test]
async fn test_stop_finishes_when_reports_are_never_read() {
    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON));
    let (handle, _reports) =
        monitor(&backend, Duration::from_millis(1)).spawn(target(TrendCategory::Formats));

    // Enough ticks to fill the report queue and park the task on send.
    sleep(Duration::from_millis(150)).await;
    assert!(backend.call_count() > 16);

    timeout(Duration::from_secs(2), handle.stop())
        .await
        .expect("stop hung on a full report queue")
        .unwrap();
}

#[test]
fn test_huge_minute_interval_is_clamped() {
    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON));
    let monitor = TrendMonitor::new(Arc::new(Studio::hosted(backend)), u64::MAX);
    assert_eq!(monitor.polling_interval(), MAX_POLLING_INTERVAL);

    let backend = Arc::new(RecordingBackend::replying(TRENDS_JSON));
    let monitor = TrendMonitor::new(Arc::new(Studio::hosted(backend)), 5);
    assert_eq!(monitor.polling_interval(), Duration::from_secs(300));
}
