//! Loading datasets from HTTP and local sources.
use deadlines::client::{DataSource, SourceClient};
use deadlines::config::{Config, TaxonomySource};
use deadlines::context::{AppContext, TestContext};
use deadlines::loader::{DEFAULT_TAXONOMY_NAME, DatasetSources, load_dataset};

const CONFERENCES: &str = r#"
- name: ICSE
  year: 2026
  deadline: "2025-07-18 23:59"
  place: Rio de Janeiro, Brazil
- name: CVPR
  year: 2026
  deadline: 2025-11-14T23:59:59-12:00
"#;

const CSRANKINGS: &str = "ConferenceTitle,Area,AreaTitle,ParentArea\n\
                          ICSE,se,Software Engineering,Systems\n\
                          CVPR,vision,Computer Vision,AI\n";

const CORE: &str = "ConferenceTitle,Area,AreaTitle,ParentArea,NextTier\n\
                    ICSE,4612,Software Engineering,Engineering,False\n";

#[tokio::test]
async fn test_load_over_http() {
    let mut server = mockito::Server::new_async().await;
    let conf_mock = server
        .mock("GET", "/conferences.yaml")
        .with_status(200)
        .with_header("content-type", "text/yaml")
        .with_body(CONFERENCES)
        .create_async()
        .await;
    let csr_mock = server
        .mock("GET", "/csrankings.csv")
        .with_status(200)
        .with_body(CSRANKINGS)
        .create_async()
        .await;
    let core_mock = server
        .mock("GET", "/core.csv")
        .with_status(200)
        .with_body(CORE)
        .create_async()
        .await;

    let base = server.url();
    let sources = DatasetSources {
        conferences: DataSource::parse(&format!("{}/conferences.yaml", base)).unwrap(),
        taxonomies: vec![
            (
                "CSRankings".into(),
                DataSource::parse(&format!("{}/csrankings.csv", base)).unwrap(),
            ),
            (
                "CORE".into(),
                DataSource::parse(&format!("{}/core.csv", base)).unwrap(),
            ),
        ],
    };

    let client = SourceClient::new().unwrap();
    let dataset = load_dataset(&client, &sources).await.unwrap();

    conf_mock.assert_async().await;
    csr_mock.assert_async().await;
    core_mock.assert_async().await;

    assert_eq!(dataset.conferences.len(), 2);
    assert_eq!(dataset.taxonomies.len(), 2);
    assert_eq!(dataset.taxonomies[0].name, "CSRankings");
    assert_eq!(dataset.taxonomies[1].rows[0].next_tier, Some(false));
}

#[tokio::test]
async fn test_http_error_status_fails_whole_load() {
    let mut server = mockito::Server::new_async().await;
    let _conf = server
        .mock("GET", "/conferences.yaml")
        .with_status(200)
        .with_body(CONFERENCES)
        .create_async()
        .await;
    let _missing = server
        .mock("GET", "/conferences.csv")
        .with_status(404)
        .create_async()
        .await;

    let base = server.url();
    let sources = DatasetSources {
        conferences: DataSource::parse(&format!("{}/conferences.yaml", base)).unwrap(),
        taxonomies: vec![(
            "CSRankings".into(),
            DataSource::parse(&format!("{}/conferences.csv", base)).unwrap(),
        )],
    };

    let client = SourceClient::new().unwrap();
    let err = load_dataset(&client, &sources).await.unwrap_err();
    assert!(format!("{:#}", err).contains("404"));
}

#[tokio::test]
async fn test_redirect_is_followed() {
    let mut server = mockito::Server::new_async().await;
    let _old = server
        .mock("GET", "/old.csv")
        .with_status(301)
        .with_header("location", "/new.csv")
        .create_async()
        .await;
    let _new = server
        .mock("GET", "/new.csv")
        .with_status(200)
        .with_body(CSRANKINGS)
        .create_async()
        .await;

    let client = SourceClient::new().unwrap();
    let text = client
        .fetch_text(&DataSource::parse(&format!("{}/old.csv", server.url())).unwrap())
        .await
        .unwrap();
    assert!(text.starts_with("ConferenceTitle"));
}

#[tokio::test]
async fn test_default_sources_live_in_data_dir() {
    let ctx = TestContext::new();
    let data = ctx.get_data_dir().unwrap();
    std::fs::write(data.join("conferences.yaml"), CONFERENCES).unwrap();
    std::fs::write(data.join("conferences.csv"), CSRANKINGS).unwrap();

    let sources = DatasetSources::resolve(&Config::default(), &ctx).unwrap();
    assert_eq!(sources.taxonomies[0].0, DEFAULT_TAXONOMY_NAME);

    let client = SourceClient::new().unwrap();
    let dataset = load_dataset(&client, &sources).await.unwrap();
    assert_eq!(dataset.conferences.len(), 2);
    assert_eq!(dataset.taxonomy_rows().len(), 2);
}

#[tokio::test]
async fn test_empty_conference_file_is_empty_list() {
    let ctx = TestContext::new();
    let data = ctx.get_data_dir().unwrap();
    std::fs::write(data.join("conferences.yaml"), "").unwrap();
    std::fs::write(data.join("conferences.csv"), CSRANKINGS).unwrap();

    let sources = DatasetSources::resolve(&Config::default(), &ctx).unwrap();
    let client = SourceClient::new().unwrap();
    let dataset = load_dataset(&client, &sources).await.unwrap();
    assert!(dataset.conferences.is_empty());
}

#[tokio::test]
async fn test_missing_conference_file_is_empty_list() {
    let ctx = TestContext::new();
    let data = ctx.get_data_dir().unwrap();
    std::fs::write(data.join("conferences.csv"), CSRANKINGS).unwrap();

    let sources = DatasetSources {
        conferences: DataSource::Local(data.join("absent.yaml")),
        taxonomies: vec![("CSRankings".into(), DataSource::Local(data.join("conferences.csv")))],
    };
    let client = SourceClient::new().unwrap();
    let dataset = load_dataset(&client, &sources).await.unwrap();
    assert!(dataset.conferences.is_empty());
    assert_eq!(dataset.taxonomy_rows().len(), 2);
}

#[tokio::test]
async fn test_conference_list_404_is_empty_list() {
    let mut server = mockito::Server::new_async().await;
    let _missing = server
        .mock("GET", "/conferences.yaml")
        .with_status(404)
        .create_async()
        .await;
    let _csr = server
        .mock("GET", "/csrankings.csv")
        .with_status(200)
        .with_body(CSRANKINGS)
        .create_async()
        .await;

    let base = server.url();
    let sources = DatasetSources {
        conferences: DataSource::parse(&format!("{}/conferences.yaml", base)).unwrap(),
        taxonomies: vec![(
            "CSRankings".into(),
            DataSource::parse(&format!("{}/csrankings.csv", base)).unwrap(),
        )],
    };
    let client = SourceClient::new().unwrap();
    let dataset = load_dataset(&client, &sources).await.unwrap();
    assert!(dataset.conferences.is_empty());
    assert_eq!(dataset.taxonomies.len(), 1);
}

#[tokio::test]
async fn test_missing_taxonomy_file_fails_whole_load() {
    let ctx = TestContext::new();
    let data = ctx.get_data_dir().unwrap();
    std::fs::write(data.join("conferences.yaml"), CONFERENCES).unwrap();

    let sources = DatasetSources::resolve(&Config::default(), &ctx).unwrap();
    let client = SourceClient::new().unwrap();
    let err = load_dataset(&client, &sources).await.unwrap_err();
    assert!(format!("{:#}", err).contains("not found"));
}

#[tokio::test]
async fn test_relative_redirect_without_slash() {
    let mut server = mockito::Server::new_async().await;
    let _old = server
        .mock("GET", "/data/old.csv")
        .with_status(302)
        .with_header("location", "new.csv")
        .create_async()
        .await;
    let _new = server
        .mock("GET", "/data/new.csv")
        .with_status(200)
        .with_body(CSRANKINGS)
        .create_async()
        .await;

    let client = SourceClient::new().unwrap();
    let text = client
        .fetch_text(&DataSource::parse(&format!("{}/data/old.csv", server.url())).unwrap())
        .await
        .unwrap();
    assert!(text.starts_with("ConferenceTitle"));
}

#[test]
fn test_configured_and_overridden_sources() {
    let ctx = TestContext::new();
    let cfg = Config {
        conferences_source: Some("https://example.org/conferences.yaml".into()),
        taxonomies: vec![TaxonomySource {
            name: "CORE".into(),
            source: "file:///srv/core.csv".into(),
        }],
        ..Config::default()
    };

    let sources = DatasetSources::resolve(&cfg, &ctx).unwrap();
    assert!(matches!(sources.conferences, DataSource::Remote(_)));
    assert_eq!(sources.taxonomies[0].0, "CORE");
    assert!(matches!(&sources.taxonomies[0].1, DataSource::Local(p) if p.ends_with("core.csv")));

    let sources = sources
        .with_overrides(Some("local.yaml"), &["a.csv".to_string(), "b.csv".to_string()])
        .unwrap();
    assert!(matches!(sources.conferences, DataSource::Local(_)));
    assert_eq!(sources.taxonomies.len(), 2);
    assert_eq!(sources.taxonomies[0].0, DEFAULT_TAXONOMY_NAME);
}
