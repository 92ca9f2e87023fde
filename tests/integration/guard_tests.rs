use crate::create_transport;
use robots_guard::robots::{fetch_robots, LoadOutcome, RobotsGuard};
use robots_guard::GuardError;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn serve_robots(server: &MockServer, status: u16, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(status).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_published_rules_are_enforced() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve_robots(&mock_server, 200, "User-agent: *\nDisallow: /private\n").await;

    let mut guard = RobotsGuard::for_all_agents(&base_url).expect("Invalid base URL");
    let outcome = guard.load(&create_transport()).await.expect("Load failed");

    assert_eq!(outcome, LoadOutcome::Parsed);
    assert!(!guard.can_fetch(&format!("{}/private/x", base_url)).unwrap());
    assert!(guard.can_fetch(&format!("{}/public", base_url)).unwrap());
}

#[tokio::test]
async fn test_missing_robots_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve_robots(&mock_server, 404, "not found").await;

    let mut guard = RobotsGuard::new(&base_url, "TestBot").unwrap();
    let outcome = guard.load(&create_transport()).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Absent);
    for target in ["/", "/private", "/a/b/c?d=e"] {
        assert!(guard.can_fetch(&format!("{}{}", base_url, target)).unwrap());
    }
    assert!(guard.sitemaps().unwrap().is_empty());
    assert_eq!(guard.crawl_delay().unwrap(), None);
}

#[tokio::test]
async fn test_server_error_denies_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve_robots(&mock_server, 500, "User-agent: *\nAllow: /\n").await;

    let mut guard = RobotsGuard::new(&base_url, "TestBot").unwrap();
    let outcome = guard.load(&create_transport()).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Unavailable { status: 500 });
    assert!(guard.is_loaded());
    assert!(!guard.can_fetch(&format!("{}/", base_url)).unwrap());
    assert!(!guard.can_fetch(&format!("{}/anything", base_url)).unwrap());
}

#[tokio::test]
async fn test_forbidden_denies_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve_robots(&mock_server, 403, "").await;

    let mut guard = RobotsGuard::new(&base_url, "TestBot").unwrap();
    let outcome = guard.load(&create_transport()).await.unwrap();

    assert_eq!(outcome, LoadOutcome::Unavailable { status: 403 });
    assert!(!guard.can_fetch(&format!("{}/page", base_url)).unwrap());
}

#[tokio::test]
async fn test_crawl_delay_and_sitemaps_reported() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let body = format!(
        "Sitemap: {base}/sitemap-a.xml\n\
         User-agent: *\n\
         Crawl-delay: 5\n\
         Disallow: /tmp\n\
         Sitemap: {base}/sitemap-b.xml\n",
        base = base_url
    );
    serve_robots(&mock_server, 200, &body).await;

    let mut guard = RobotsGuard::new(&base_url, "TestBot").unwrap();
    guard.load(&create_transport()).await.unwrap();

    assert_eq!(guard.crawl_delay().unwrap(), Some(5.0));
    let expected = vec![
        format!("{}/sitemap-a.xml", base_url),
        format!("{}/sitemap-b.xml", base_url),
    ];
    assert_eq!(guard.sitemaps().unwrap(), expected.as_slice());
    assert_eq!(guard.sitemaps().unwrap(), expected.as_slice());
}

#[tokio::test]
async fn test_identity_group_preferred_over_wildcard() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let body = "User-agent: TestBot\nAllow: /\nCrawl-delay: 1\n\n\
                User-agent: *\nDisallow: /\nCrawl-delay: 60\n";
    serve_robots(&mock_server, 200, body).await;

    let mut guard = RobotsGuard::new(&base_url, "TestBot/1.0").unwrap();
    guard.load(&create_transport()).await.unwrap();

    assert!(guard.can_fetch(&format!("{}/page", base_url)).unwrap());
    assert_eq!(guard.crawl_delay().unwrap(), Some(1.0));
}

#[tokio::test]
async fn test_load_is_performed_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    // expect(1) is verified when the server is dropped
    serve_robots(&mock_server, 200, "User-agent: *\nDisallow: /x\n").await;

    let transport = create_transport();
    let mut guard = RobotsGuard::new(&base_url, "TestBot").unwrap();
    guard.load(&transport).await.unwrap();
    guard.load(&transport).await.unwrap();

    assert!(!guard.can_fetch(&format!("{}/x", base_url)).unwrap());
}

#[tokio::test]
async fn test_slow_server_times_out_and_stays_unloaded() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("User-agent: *\nAllow: /\n")
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&mock_server)
        .await;

    let mut guard = RobotsGuard::new(&base_url, "TestBot")
        .unwrap()
        .with_fetch_timeout(Duration::from_millis(200));
    let result = guard.load(&create_transport()).await;

    assert!(matches!(result, Err(GuardError::Transport(_))));
    assert!(!guard.is_loaded());
    assert!(matches!(
        guard.can_fetch(&format!("{}/", base_url)),
        Err(GuardError::NotReady { .. })
    ));
}

#[tokio::test]
async fn test_unreachable_host_is_transport_error() {
    let mut guard = RobotsGuard::new("http://127.0.0.1:1", "TestBot").unwrap();
    let result = guard.load(&create_transport()).await;

    assert!(matches!(result, Err(GuardError::Transport(_))));
    assert!(!guard.is_loaded());
    assert!(matches!(guard.sitemaps(), Err(GuardError::NotReady { .. })));
}

#[tokio::test]
async fn test_fetch_robots_helper() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    serve_robots(&mock_server, 200, "User-agent: *\nDisallow: /admin\n").await;

    let guard = fetch_robots(
        &format!("{}/", base_url),
        "TestBot",
        Duration::from_secs(10),
        &create_transport(),
    )
    .await
    .expect("fetch_robots failed");

    assert!(guard.is_loaded());
    assert!(!guard.can_fetch(&format!("{}/admin/users", base_url)).unwrap());
    assert!(guard.can_fetch(&format!("{}/home", base_url)).unwrap());
}
