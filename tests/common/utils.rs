use std::fs;
use std::path::PathBuf;

use tokio::runtime::Runtime;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// `tests/fixtures` served over HTTP on a random local port.
///
/// Unknown paths get a 404. The server stops when this value is dropped.
pub struct FixtureServer {
    server: MockServer,
    _runtime: Runtime,
}

impl FixtureServer {
    /// Origin without a trailing slash, e.g. `http://127.0.0.1:41234`.
    pub fn origin(&self) -> String {
        self.server.uri()
    }
}

pub fn serve_fixtures() -> FixtureServer {
    let runtime = Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        for entry in fs::read_dir(fixtures_dir()).unwrap() {
            let file = entry.unwrap().path();
            let name = file.file_name().unwrap().to_string_lossy().into_owned();
            let body = fs::read(&file).unwrap();
            if name == "index.html" {
                mount_page(&server, "/", body.clone()).await;
            }
            mount_page(&server, &format!("/{}", name), body).await;
        }
        server
    });

    FixtureServer {
        server,
        _runtime: runtime,
    }
}

async fn mount_page(server: &MockServer, route: &str, body: Vec<u8>) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "text/html"))
        .mount(server)
        .await;
}
