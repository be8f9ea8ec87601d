//! HTTP 指标标签测试
//!
//! 安装全局 Prometheus recorder，因此单独放在一个测试二进制中。

use axum::{Router, body::Body, http::Request, middleware, routing::get};
use cloblox_shared::observability::middleware::{UNMATCHED_ROUTE, http_tracing};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

#[tokio::test]
async fn test_unknown_paths_share_one_series() {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("安装 Prometheus recorder 失败");

    let app = Router::new()
        .route("/ping", get(|| async { "pong" }))
        .layer(middleware::from_fn(http_tracing));

    for uri in ["/scan-1", "/scan-2", "/scan-3/deeper", "/ping"] {
        app.clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
    }

    let rendered = handle.render();
    let series: Vec<&str> = rendered
        .lines()
        .filter(|line| line.starts_with("http_requests_total{"))
        .collect();

    assert!(
        series.iter().all(|line| !line.contains("/scan-")),
        "原始路径不应出现在标签中: {series:?}"
    );
    let unmatched_label = format!("path=\"{UNMATCHED_ROUTE}\"");
    assert_eq!(
        series.iter().filter(|line| line.contains(&unmatched_label)).count(),
        1,
        "{series:?}"
    );
    assert!(
        series.iter().any(|line| line.contains("path=\"/ping\"")),
        "{series:?}"
    );
}
