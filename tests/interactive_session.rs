// file: tests/interactive_session.rs
// description: interactive session reruns against a mock arXiv feed

use semantic_arxiv::{
    Capability, Config, EngineRegistry, InteractiveSession, SearchConfig, SearchPipeline,
};
use std::io::Cursor;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn feed(titles: &[&str]) -> String {
    let published = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ");
    let entries: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                "<entry><id>http://arxiv.org/abs/2503.0000{i}v1</id>\
                 <published>{published}</published><title>{title}</title>\
                 <summary>About {title}.</summary>\
                 <link href=\"http://arxiv.org/abs/2503.0000{i}v1\" rel=\"alternate\"/></entry>"
            )
        })
        .collect();
    format!("<feed xmlns=\"http://www.w3.org/2005/Atom\">{}</feed>", entries)
}

#[tokio::test]
async fn test_each_change_reruns_with_current_settings() {
    colored::control::set_override(false);

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", r#"all:"bandits""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(&["One", "Two", "Three"])))
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/query"))
        .and(query_param("search_query", r#"all:"bandits" AND all:"Finance""#))
        .respond_with(ResponseTemplate::new(200).set_body_string(feed(&["Priced"])))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = Config::default_config();
    config.feed.base_url = format!("{}/api/query", server.uri());
    let registry = EngineRegistry::with_engines(
        &config,
        Capability::Unavailable("offline".to_string()),
        Capability::Unavailable("offline".to_string()),
    );
    let pipeline = SearchPipeline::new(&config, &registry).unwrap();
    let mut session = InteractiveSession::new(pipeline, SearchConfig::default());

    let input = Cursor::new("bandits\n:display 1\n:domain finance\n:quit\n");
    let mut out = Vec::new();
    session.run(input, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Displayed 3 papers (from 3 fetched)."));
    assert!(text.contains("Displayed 1 papers (from 3 fetched)."));
    assert!(text.contains("1. Priced"));
    assert!(text.contains("Displayed 1 papers (from 1 fetched)."));
    assert_eq!(session.settings().technique, "bandits");
}
