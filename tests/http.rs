use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct CountRow {
    label: String,
    counts: Vec<u64>,
}

#[derive(Debug, Deserialize)]
struct CountTable {
    view: String,
    index: String,
    columns: Vec<String>,
    rows: Vec<CountRow>,
}

#[derive(Debug, Deserialize)]
struct CountsResponse {
    header: String,
    title: String,
    table: CountTable,
    available_moods: Vec<String>,
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StoredRecord {
    timestamp: Option<String>,
    mood: String,
    note: String,
}

#[derive(Debug, Deserialize)]
struct RecordsResponse {
    records: Vec<StoredRecord>,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_path() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("mood_queue_http_{}_{}.json", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/counts")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let data_path = unique_data_path();
    let child = Command::new(env!("CARGO_BIN_EXE_mood_queue"))
        .env("PORT", port.to_string())
        .env("MOOD_STORE", "file")
        .env("MOOD_DATA_PATH", data_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn counts(client: &Client, server: &TestServer, query: &str) -> CountsResponse {
    client
        .get(format!("{}/api/counts?{query}", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn record(client: &Client, server: &TestServer, mood: &str, note: &str) -> StatusCode {
    client
        .post(format!("{}/api/moods", server.base_url))
        .json(&serde_json::json!({ "mood": mood, "note": note }))
        .send()
        .await
        .unwrap()
        .status()
}

fn today_count(response: &CountsResponse, mood: &str) -> u64 {
    response
        .table
        .rows
        .iter()
        .find(|row| row.label == mood)
        .map(|row| row.counts[0])
        .unwrap_or(0)
}

#[tokio::test]
async fn http_record_shows_up_in_todays_counts() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = counts(&client, &server, "").await;
    assert_eq!(record(&client, &server, "😊", "queue is calm").await, StatusCode::CREATED);
    let after = counts(&client, &server, "").await;

    assert_eq!(after.table.view, "today");
    assert_eq!(after.table.index, "mood");
    assert_eq!(after.header, "Today's Mood Trends");
    assert_eq!(after.title, "Mood Frequency for Today");
    assert_eq!(today_count(&after, "😊"), today_count(&before, "😊") + 1);
    assert!(after.available_moods.contains(&"😊".to_string()));
    assert!(after.error.is_none());

    let labels: Vec<_> = after.table.rows.iter().map(|row| row.label.clone()).collect();
    let mut sorted = labels.clone();
    sorted.sort();
    assert_eq!(labels, sorted);
}

#[tokio::test]
async fn http_blank_mood_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    assert_eq!(record(&client, &server, "   ", "").await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_grouped_counts_pivot_by_day() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    for _ in 0..2 {
        assert_eq!(record(&client, &server, "grouped-probe", "").await, StatusCode::CREATED);
    }

    let grouped = counts(&client, &server, "moods=grouped-probe&group_by_day=true").await;
    assert_eq!(grouped.table.view, "by_day");
    assert_eq!(grouped.table.index, "date");
    assert_eq!(grouped.table.columns, vec!["grouped-probe"]);
    assert_eq!(grouped.table.rows.len(), 1);
    assert_eq!(grouped.table.rows[0].counts, vec![2]);
    assert_eq!(grouped.table.rows[0].label.len(), "2024-01-01".len());

    let overall = counts(&client, &server, "moods=grouped-probe").await;
    assert_eq!(overall.table.view, "overall");
    assert_eq!(overall.table.rows.len(), 1);
    assert_eq!(overall.table.rows[0].counts, vec![2]);
}

#[tokio::test]
async fn http_records_keep_notes() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    assert_eq!(
        record(&client, &server, "😕", "lots of Rx delays today").await,
        StatusCode::CREATED
    );

    let listed: RecordsResponse = client
        .get(format!("{}/api/moods", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entry = listed
        .records
        .iter()
        .find(|r| r.mood == "😕" && r.note == "lots of Rx delays today")
        .expect("recorded entry");
    assert!(entry.timestamp.is_some());
}

#[tokio::test]
async fn http_form_submit_redirects_home() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/mood", server.base_url))
        .form(&[("mood", "🎉"), ("note", "")])
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let page = response.text().await.unwrap();
    assert!(page.contains("Mood of the Queue"));
}
