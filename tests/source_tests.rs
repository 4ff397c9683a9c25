// SPDX-License-Identifier: PMPL-1.0-or-later

//! On-disk documents: data fetch, configuration and persisted preferences

use dashbind::config::Configuration;
use dashbind::i18n::Lang;
use dashbind::render::DashboardSchema;
use dashbind::session::DashboardSession;
use dashbind::source::{default_candidates, load_document, AutoFetcher, FetchError, FileFetcher};
use dashbind::storage::{persist_render, FileStore, PreferenceStore, LANGUAGE_KEY};
use dashbind::report::OutputFormat;
use std::fs;
use std::net::SocketAddr;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

const APPLICATIONS: &str = r#"{
  "projects": [{"id": "p1", "nameJA": "アルファ", "nameEN": "Alpha"}],
  "applications": [{"id": "a1", "name": "Orders", "projects": ["p1"], "eolStatus": "critical"}]
}"#;

#[tokio::test]
async fn sibling_data_directory_is_found() {
    let temp = TempDir::new().unwrap();
    let site = temp.path().join("site");
    fs::create_dir_all(&site).unwrap();
    fs::create_dir_all(temp.path().join("data")).unwrap();
    fs::write(temp.path().join("data").join("view.json"), APPLICATIONS).unwrap();

    let fetcher = FileFetcher::new(&site);
    let (location, document) = load_document(&fetcher, &default_candidates("view.json"))
        .await
        .unwrap();
    assert_eq!(location, "../data/view.json");
    assert_eq!(document.ids("projects"), vec!["p1"]);
}

#[tokio::test]
async fn missing_file_reports_every_candidate() {
    let temp = TempDir::new().unwrap();
    let fetcher = FileFetcher::new(temp.path());
    let err = load_document(&fetcher, &default_candidates("absent.json"))
        .await
        .unwrap_err();
    assert_eq!(err.candidates(), default_candidates("absent.json").as_slice());
    assert!(err.to_string().contains("./absent.json"));
}

#[tokio::test]
async fn malformed_json_is_a_parse_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.json"), "[1, 2").unwrap();
    let fetcher = FileFetcher::new(temp.path());
    let err = load_document(&fetcher, &["bad.json".to_string()]).await.unwrap_err();
    match err {
        FetchError::Parse { location, .. } => assert_eq!(location, "bad.json"),
        other => panic!("unexpected error: {other:?}"),
    }
}

/// Minimal HTTP server: `/data/view.json` answers 200, everything else 404.
async fn serve_documents() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else { break };
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match socket.read(&mut buf).await {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let head = String::from_utf8_lossy(&request);
            let (status, body) = if head.starts_with("GET /data/view.json ") {
                ("200 OK", APPLICATIONS)
            } else {
                ("404 Not Found", "")
            };
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;
        }
    });
    addr
}

#[tokio::test]
async fn remote_base_walks_candidates_over_http() {
    let addr = serve_documents().await;
    let fetcher = AutoFetcher::new(&format!("http://{}/site", addr));
    let (location, document) = load_document(&fetcher, &default_candidates("view.json"))
        .await
        .unwrap();
    assert_eq!(location, "../data/view.json");
    assert_eq!(document.ids("applications"), vec!["a1"]);

    let err = load_document(&fetcher, &default_candidates("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::NotFound { .. }));
}

#[tokio::test]
async fn local_base_routes_by_location_kind() {
    let addr = serve_documents().await;
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("local.json"), r#"{"projects": [{"id": "p9"}]}"#).unwrap();
    let fetcher = AutoFetcher::new(temp.path().to_str().unwrap());

    let (_, local) = load_document(&fetcher, &["./local.json".to_string()]).await.unwrap();
    assert_eq!(local.ids("projects"), vec!["p9"]);

    let remote = format!("http://{}/data/view.json", addr);
    let (location, document) = load_document(&fetcher, &[remote.clone()]).await.unwrap();
    assert_eq!(location, remote);
    assert_eq!(document.ids("projects"), vec!["p1"]);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let fetcher = AutoFetcher::new(&format!("http://{}/", addr));
    let err = load_document(&fetcher, &["x.json".to_string()]).await.unwrap_err();
    assert!(matches!(err, FetchError::Transport { .. }));
}

#[tokio::test]
async fn configuration_overlays_builtins() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dashbind.yaml");
    fs::write(
        &path,
        r#"
default-language: en
styles:
  eol:
    states:
      critical: { background: bg-fuchsia-600 }
localization:
  en:
    app:
      title: Estate
data-candidates: [./custom.json]
"#,
    )
    .unwrap();

    let fetcher = AutoFetcher::new(temp.path().to_str().unwrap());
    let config = Configuration::load(&fetcher, "dashbind.yaml").await.unwrap();
    assert_eq!(config.default_lang, Lang::En);
    assert_eq!(config.localization.resolve(Lang::En, "app.title"), "Estate");
    assert_eq!(
        config.localization.resolve(Lang::Ja, "app.title"),
        "アプリケーションレイヤー鳥瞰図"
    );
    assert_eq!(config.styles.resolve("eol", "critical").background, "bg-fuchsia-600");
    assert_eq!(config.data_candidates, vec!["./custom.json"]);
}

#[tokio::test]
async fn broken_configuration_is_an_error() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("bad.yaml"), "styles: [unclosed").unwrap();
    let fetcher = FileFetcher::new(temp.path());
    assert!(Configuration::load(&fetcher, "bad.yaml").await.is_err());
    assert!(Configuration::load(&fetcher, "nowhere.yaml").await.is_err());
}

#[tokio::test]
async fn language_preference_survives_sessions() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("application_layer_view_data.json"), APPLICATIONS).unwrap();
    let prefs = temp.path().join("state").join("prefs.json");
    let fetcher = FileFetcher::new(temp.path());

    let schema = DashboardSchema::bundled("application-layer").unwrap();
    let mut first = DashboardSession::new(schema.clone(), Configuration::builtin(), FileStore::new(&prefs));
    first.load(&fetcher).await.unwrap();
    first.set_language(Lang::En, None);
    first.select("p1");
    assert_eq!(first.title_annotation(), "Alpha");

    assert_eq!(FileStore::new(&prefs).get(LANGUAGE_KEY).as_deref(), Some("en"));

    let mut second = DashboardSession::new(schema, Configuration::builtin(), FileStore::new(&prefs));
    second.load(&fetcher).await.unwrap();
    assert_eq!(second.load_preference(), Lang::En);
    assert_eq!(second.page().doc.attr(second.page().body, "data-lang"), Some("en"));
}

#[test]
fn exports_are_timestamped_per_dashboard() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("exports");
    let path = persist_render("{}", &out, "tbm-tower", OutputFormat::Json).unwrap();
    let name = path.file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("tbm-tower-"));
    assert!(name.ends_with(".json"));
    assert_eq!(fs::read_to_string(path).unwrap(), "{}");
}
