#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tempfile::TempDir;

pub const USER: &str = "meliban";
pub const PASSWORD: &str = "2chatons";
/// base64("meliban" + "2chatons")
pub const TOKEN: &str = "bWVsaWJhbjJjaGF0b25z";

/// A quest-api process with its own port and data file. Killed on drop.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    pub data_file: PathBuf,
    child: Child,
}

impl TestServer {
    /// Spawn on a fresh data file inside `dir`
    pub async fn start(dir: &TempDir) -> Result<Self> {
        Self::start_with(dir.path().join("bdd").join("quests"), dir.path().join("quests.json")).await
    }

    /// Spawn on an explicit data file; reusing a path simulates a restart
    pub async fn start_with(data_file: PathBuf, seed_file: PathBuf) -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let child = Command::new(env!("CARGO_BIN_EXE_quest-api"))
            .arg("serve")
            .env("QUEST_API_PORT", port.to_string())
            .env("QUEST_DATA_FILE", &data_file)
            .env("QUEST_SEED_FILE", &seed_file)
            .env("QUEST_AUTH_USER", USER)
            .env("QUEST_AUTH_PASSWORD", PASSWORD)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .context("failed to spawn server binary")?;

        let server = Self { port, base_url, data_file, child };
        server.wait_ready(Duration::from_secs(10)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            if let Ok(resp) = client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Client that sends the shared-secret token on every request
    pub fn authed_client(&self) -> Result<reqwest::Client> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(reqwest::header::AUTHORIZATION, reqwest::header::HeaderValue::from_static(TOKEN));
        Ok(reqwest::Client::builder().default_headers(headers).build()?)
    }

    pub fn stop(mut self) {
        self.kill();
    }

    fn kill(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.kill();
    }
}

pub fn write_seed(path: &Path, quests: &serde_json::Value) -> Result<()> {
    std::fs::write(path, serde_json::to_vec_pretty(quests)?)?;
    Ok(())
}
