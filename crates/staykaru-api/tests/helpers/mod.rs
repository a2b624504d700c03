#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use staykaru_api::setup::build_app;
use staykaru_core::{BaseConfig, Config, UploadConfig};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test application with an isolated uploads root
pub struct TestApp {
    pub server: TestServer,
    pub uploads_root: PathBuf,
    pub token: String,
    pub _temp_dir: TempDir,
}

impl TestApp {
    /// Get the HTTP test client
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    /// Path of a stored file, e.g. `stored_path("accommodations", "image-1-2.jpg")`
    pub fn stored_path(&self, dir: &str, filename: &str) -> PathBuf {
        self.uploads_root.join(dir).join(filename)
    }

    /// Number of regular files in a category directory
    pub fn file_count(&self, dir: &str) -> usize {
        count_files(&self.uploads_root.join(dir))
    }
}

pub fn count_files(dir: &Path) -> usize {
    std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .filter(|e| e.path().is_file())
                .count()
        })
        .unwrap_or(0)
}

pub fn test_config(uploads_root: &Path) -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            cors_origins: vec!["*".to_string()],
            jwt_secret: auth::TEST_JWT_SECRET.to_string(),
            environment: "test".to_string(),
            request_timeout_secs: 30,
        },
        upload: UploadConfig {
            uploads_root_dir: uploads_root.to_path_buf(),
            ..UploadConfig::default()
        },
    }
}

/// Setup a test application backed by a temporary uploads root
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(|_| {}).await
}

/// Same as `setup_test_app`, with a chance to adjust the config first
pub async fn setup_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let uploads_root = temp_dir.path().join("uploads");

    let mut config = test_config(&uploads_root);
    configure(&mut config);

    let (_state, app) = build_app(config)
        .await
        .expect("Failed to build app");
    let server = TestServer::new(app).expect("Failed to create test server");

    TestApp {
        server,
        uploads_root,
        token: auth::bearer_token("user-1"),
        _temp_dir: temp_dir,
    }
}
