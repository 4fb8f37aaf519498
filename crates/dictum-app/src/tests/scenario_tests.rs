use std::sync::Arc;

use dictum_config::FormatConfig;
use dictum_types::{DatabaseInfo, DatabaseSelector, Definition, MatchResult, StrategyInfo};

use super::fake::{Catalog, Fault, FakeProvider, RecordingSink};
use crate::controller::dispatch;
use crate::handlers::{CommandError, CommandHandlers};
use crate::router::parse_command;

fn plain_config() -> FormatConfig {
    FormatConfig {
        headword_format: "<headword>".to_string(),
        database_format: "<database>".to_string(),
        ..FormatConfig::default()
    }
}

fn apple_catalog() -> Catalog {
    Catalog {
        definitions: vec![
            Definition::new("apple", "fruit with red or yellow or green skin", "wn"),
            Definition::new("apple", "native Eurasian tree widely cultivated", "wn"),
            Definition::new("apple", "The fleshy pome or fruit of a rosaceous tree", "gcide"),
            Definition::new("apple", "Any tree genus Pyrus which has the stamens", "gcide"),
            Definition::new("apple", "A computer company", "foldoc"),
        ],
        ..Catalog::default()
    }
}

fn handlers(catalog: Catalog, fault: Fault) -> CommandHandlers<FakeProvider> {
    CommandHandlers::new(FakeProvider::new(catalog, fault), Some("localhost".to_string()))
}

#[tokio::test]
async fn test_many_databases_collapse_to_names() {
    let handlers = handlers(apple_catalog(), Fault::None);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers
        .define(&config, "apple", Some(DatabaseSelector::All), &sink)
        .await;

    let reply = sink.single();
    assert_eq!(reply, "Definitions for apple found in: wn, gcide, foldoc");
    assert!(!reply.contains("fleshy pome"));
    assert_eq!(handlers.provider().counters.releases(), 1);
}

#[tokio::test]
async fn test_long_body_truncated_to_limit() {
    let body = "x".repeat(500);
    let catalog = Catalog {
        definitions: vec![Definition::new("apple", body.clone(), "wn")],
        ..Catalog::default()
    };
    let handlers = handlers(catalog, Fault::None);
    let config = FormatConfig {
        max_length_per_def: 200,
        ..FormatConfig::default()
    };
    let sink = RecordingSink::default();

    handlers
        .define(&config, "apple", Some(DatabaseSelector::from("wn")), &sink)
        .await;

    let reply = sink.single();
    let (header, text) = reply.split_once("): ").unwrap();
    assert_eq!(header, "\u{2}apple\u{2} (wn");
    assert_eq!(text.chars().count(), 200);
    assert!(text.ends_with("..."));
    assert_eq!(
        handlers.provider().requests.lock().unwrap().as_slice(),
        ["DEFINE wn apple"]
    );
}

#[tokio::test]
async fn test_no_definition_found() {
    let handlers = handlers(apple_catalog(), Fault::None);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers.define(&config, "zzqq", None, &sink).await;

    let reply = sink.single();
    assert_eq!(reply, "No definition for zzqq found in ALL.");
    assert_eq!(
        handlers.provider().requests.lock().unwrap().as_slice(),
        ["DEFINE * zzqq"]
    );
}

#[tokio::test]
async fn test_connection_failure_message() {
    let handlers = handlers(apple_catalog(), Fault::RefuseConnect);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers.define(&config, "apple", None, &sink).await;

    let reply = sink.single();
    assert_eq!(reply, "Sorry, I could not reach the dictionary server.");
    assert!(!reply.contains("apple"));
    assert_eq!(handlers.provider().counters.connects(), 0);
    assert_eq!(handlers.provider().counters.releases(), 0);
}

#[tokio::test]
async fn test_rejected_request_releases_and_reports() {
    let handlers = handlers(apple_catalog(), Fault::RejectRequest);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers
        .define(&config, "apple", Some(DatabaseSelector::from("nope")), &sink)
        .await;

    assert_eq!(
        sink.single(),
        "Sorry, the dictionary server could not answer that request."
    );
    assert_eq!(handlers.provider().counters.connects(), 1);
    assert_eq!(handlers.provider().counters.releases(), 1);
}

#[tokio::test]
async fn test_dropped_connection_is_generic_failure() {
    let handlers = handlers(apple_catalog(), Fault::DropMidway);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers.list_databases(&config, &sink).await;

    assert_eq!(
        sink.single(),
        "Sorry, something went wrong while looking that up."
    );
    assert_eq!(handlers.provider().counters.releases(), 1);
}

#[tokio::test]
async fn test_try_variant_leaves_reporting_to_caller() {
    let handlers = handlers(apple_catalog(), Fault::RefuseConnect);
    let config = plain_config();

    let err = handlers
        .try_define(&config, "apple", None)
        .await
        .unwrap_err();
    assert!(matches!(err, CommandError::Session(_)));
}

#[tokio::test]
async fn test_empty_phrase_never_connects() {
    let handlers = handlers(apple_catalog(), Fault::None);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers.define(&config, "   ", None, &sink).await;

    assert_eq!(sink.single(), "Give me a word or phrase to look up.");
    assert_eq!(handlers.provider().counters.connects(), 0);
}

#[tokio::test]
async fn test_match_defaults() {
    let catalog = Catalog {
        matches: vec![
            MatchResult {
                database: "wn".to_string(),
                headwords: vec!["apple".to_string(), "applejack".to_string()],
            },
            MatchResult {
                database: "gcide".to_string(),
                headwords: vec!["Appleton".to_string()],
            },
        ],
        ..Catalog::default()
    };
    let handlers = handlers(catalog, Fault::None);
    let config = plain_config();
    let sink = RecordingSink::default();

    handlers
        .match_words(&config, "apple", None, None, &sink)
        .await;

    assert_eq!(sink.single(), "wn: apple, applejack gcide: Appleton");
    assert_eq!(
        handlers.provider().requests.lock().unwrap().as_slice(),
        ["MATCH * . apple"]
    );
}

#[tokio::test]
async fn test_nothing_matched() {
    let handlers = handlers(Catalog::default(), Fault::None);
    let config = plain_config();
    let sink = RecordingSink::default();

    let command = parse_command("match zzqq using soundex from wn").unwrap();
    dispatch(&handlers, &config, command, &sink).await;

    assert_eq!(sink.single(), "Nothing matched zzqq in wn using soundex.");
}

#[tokio::test]
async fn test_listings_through_router() {
    let catalog = Catalog {
        databases: vec![
            DatabaseInfo {
                identifier: "wn".to_string(),
                description: "WordNet (r) 3.0 (2006)".to_string(),
            },
            DatabaseInfo {
                identifier: "foldoc".to_string(),
                description: "The Free On-line Dictionary of Computing".to_string(),
            },
        ],
        strategies: vec![
            StrategyInfo {
                identifier: "exact".to_string(),
                description: "Match headwords exactly".to_string(),
            },
            StrategyInfo {
                identifier: "prefix".to_string(),
                description: "Match prefixes".to_string(),
            },
        ],
        ..Catalog::default()
    };
    let handlers = handlers(catalog, Fault::None);
    let config = plain_config();

    let sink = RecordingSink::default();
    dispatch(&handlers, &config, parse_command("list databases").unwrap(), &sink).await;
    assert_eq!(
        sink.single(),
        "wn: WordNet (r) 3.0 (2006); foldoc: The Free On-line Dictionary of Computing"
    );

    let sink = RecordingSink::default();
    dispatch(&handlers, &config, parse_command("!list strategies").unwrap(), &sink).await;
    assert_eq!(
        sink.single(),
        "exact: Match headwords exactly; prefix: Match prefixes"
    );

    assert_eq!(handlers.provider().counters.connects(), 2);
    assert_eq!(handlers.provider().counters.releases(), 2);
}

#[tokio::test]
async fn test_concurrent_invocations_use_own_sessions() {
    let handlers = Arc::new(handlers(apple_catalog(), Fault::None));
    let config = Arc::new(plain_config());

    let mut tasks = tokio::task::JoinSet::new();
    for db in ["wn", "gcide", "foldoc", "wn"] {
        let handlers = handlers.clone();
        let config = config.clone();
        tasks.spawn(async move {
            let sink = RecordingSink::default();
            handlers
                .define(&config, "apple", Some(DatabaseSelector::from(db)), &sink)
                .await;
            sink.single()
        });
    }

    let mut replies = Vec::new();
    while let Some(reply) = tasks.join_next().await {
        replies.push(reply.unwrap());
    }

    assert_eq!(replies.len(), 4);
    assert!(replies.iter().any(|r| r.contains("A computer company")));
    assert_eq!(handlers.provider().counters.connects(), 4);
    assert_eq!(handlers.provider().counters.releases(), 4);
}
