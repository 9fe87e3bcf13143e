use requrl::utils::FileUtils;
use requrl::RequestUrl;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn fresh_jar(file_id: &str) {
    let _ = std::fs::remove_file(FileUtils::cookie_dir().join(file_id));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_cookie_persists_across_builders() {
    if !can_bind_localhost() {
        return;
    }
    let jar_id = "requrl-test-roundtrip.tmp";
    fresh_jar(jar_id);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/login"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "session=abc; Path=/")
                .set_body_string("ok"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/whoami"))
        .and(header("Cookie", "session=abc"))
        .respond_with(ResponseTemplate::new(200).set_body_string("abc"))
        .mount(&server)
        .await;

    let mut first = RequestUrl::new();
    let login = first
        .enable_cookie(jar_id)
        .get(&format!("{}/login", server.uri()))
        .await;
    assert_eq!(login.info.http_code, 200);

    // A different builder instance picks the cookie up from the jar file.
    let mut second = RequestUrl::new();
    let whoami = second
        .enable_cookie(jar_id)
        .get(&format!("{}/whoami", server.uri()))
        .await;
    assert_eq!(whoami.info.http_code, 200);
    assert_eq!(whoami.body.as_deref(), Some("abc"));
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_no_cookie_sent_when_disabled() {
    if !can_bind_localhost() {
        return;
    }
    let jar_id = "requrl-test-disabled.tmp";
    fresh_jar(jar_id);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "session=abc; Path=/")
                .set_body_string("ok"),
        )
        .mount(&server)
        .await;

    let mut builder = RequestUrl::new();
    let seed = builder
        .enable_cookie(jar_id)
        .get(&format!("{}/login", server.uri()))
        .await;
    assert_eq!(seed.info.http_code, 200);

    // Cookies stay off without enable_cookie, even though the jar exists.
    let plain = builder.get(&format!("{}/page", server.uri())).await;
    assert_eq!(plain.info.http_code, 200);

    let requests = server.received_requests().await.expect("requests");
    let page_request = requests
        .iter()
        .find(|r| r.url.path() == "/page")
        .expect("page request");
    assert!(page_request.headers.get("Cookie").is_none());
}

#[cfg_attr(miri, ignore)]
#[tokio::test]
async fn test_jar_file_written_to_cookie_directory() {
    if !can_bind_localhost() {
        return;
    }
    let jar_id = "requrl-test-jarfile.tmp";
    fresh_jar(jar_id);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "a=1; Path=/")
                .set_body_string("ok"),
        )
        .mount(&server)
        .await;

    let mut builder = RequestUrl::new();
    let result = builder
        .enable_cookie(jar_id)
        .get(&format!("{}/login", server.uri()))
        .await;
    assert_eq!(result.info.http_code, 200);

    let jar_path = FileUtils::cookie_dir().join(jar_id);
    let contents = std::fs::read_to_string(jar_path).expect("jar file");
    assert!(contents.contains("\"a\""));
}
