// src/pipeline/crawl.rs

//! Crawl pipeline: the fetcher that drives the traversal.

use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};

use crate::error::Result;
use crate::models::{Config, Page};
use crate::services::{FetchRequest, Handler, Traversal, TraversalOptions};
use crate::storage::RecordSink;
use crate::utils::http::{create_async_client, fetch_page_async};

/// Summary of a crawl run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlOutcome {
    pub pages_visited: usize,
    pub records_written: usize,
    pub fetch_failures: usize,
    pub branch_failures: usize,
    pub duplicates_skipped: usize,
}

/// Crawl from the configured start page and write every record to `sink`.
///
/// Failed fetches and structurally broken pages end only their own branch;
/// they are logged and counted while sibling branches continue. A
/// configuration error aborts the run.
pub async fn run_crawler(config: &Config, sink: &mut dyn RecordSink) -> Result<CrawlOutcome> {
    let start_time = Utc::now();
    log::info!(
        "Crawling {} ({} layout{})",
        config.crawler.start_url,
        config.site.era,
        if config.crawler.test_mode { ", test mode" } else { "" }
    );

    let layout = config.site.layout()?;
    layout.validate()?;
    let traversal = Traversal::new(Arc::new(layout), TraversalOptions::from(&config.crawler))?;
    let client = create_async_client(&config.crawler)?;

    let delay = Duration::from_millis(config.crawler.request_delay_ms);
    let concurrency = config.crawler.max_concurrent.max(1);

    let start = FetchRequest::new(config.crawler.start_url.clone(), Handler::Root);
    let mut seen = HashSet::from([start.clone()]);
    let mut queue = VecDeque::from([start]);
    let mut in_flight = FuturesUnordered::new();
    let mut outcome = CrawlOutcome::default();

    loop {
        while in_flight.len() < concurrency {
            let Some(request) = queue.pop_front() else {
                break;
            };
            let client = client.clone();
            in_flight.push(async move {
                let result = fetch_page_async(&client, &request.url).await;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                (request, result)
            });
        }

        let Some((request, result)) = in_flight.next().await else {
            break;
        };

        match result {
            Ok(fetched) => {
                outcome.pages_visited += 1;
                let visit = {
                    let page = Page::with_charset(
                        request.url.as_str(),
                        fetched.bytes,
                        fetched.charset.as_deref(),
                    );
                    traversal.visit(request.handler, &page)
                };
                match visit {
                    Ok(visit) => {
                        for record in &visit.records {
                            sink.write(record).await?;
                            outcome.records_written += 1;
                        }
                        for follow_up in visit.follow_ups {
                            if seen.insert(follow_up.clone()) {
                                queue.push_back(follow_up);
                            } else {
                                outcome.duplicates_skipped += 1;
                            }
                        }
                    }
                    Err(error) if error.is_structural() => {
                        outcome.branch_failures += 1;
                        log::warn!("Branch {} abandoned: {}", request.handler, error);
                    }
                    Err(error) => {
                        log::error!("{} failed on {}: {}", request.handler, request.url, error);
                        sink.flush().await?;
                        return Err(error);
                    }
                }
            }
            Err(error) => {
                outcome.fetch_failures += 1;
                log::warn!(
                    "Failed to fetch {} ({}): {}",
                    request.url,
                    request.handler,
                    error
                );
            }
        }
    }

    sink.flush().await?;

    let elapsed = Utc::now() - start_time;
    log::info!(
        "Crawl finished in {}s: {} pages, {} records, {} failed fetches, {} failed branches",
        elapsed.num_seconds(),
        outcome.pages_visited,
        outcome.records_written,
        outcome.fetch_failures,
        outcome.branch_failures
    );

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use mockito::{Server, ServerGuard};
    use tempfile::TempDir;

    use super::*;
    use crate::fixtures::{self, RESULTS_LINK, ResultsTable, TURNOUT_LINK, TurnoutTable};
    use crate::models::{Level, Record, ReportKind};
    use crate::storage::JsonLinesSink;

    async fn serve(server: &mut ServerGuard, path: &str, body: String) {
        server
            .mock("GET", path)
            .with_status(200)
            .with_header("content-type", "text/html; charset=utf-8")
            .with_body(body)
            .create_async()
            .await;
    }

    /// One region with results and turnout; territory 2 of the results
    /// branch is only mocked when `complete`.
    async fn site(server: &mut ServerGuard, region_links: &[(&str, &str)], complete: bool) {
        serve(server, "/", fixtures::root_html(&["/region"])).await;
        serve(server, "/region", fixtures::region_home_html(region_links)).await;
        serve(
            server,
            "/results",
            fixtures::results_html(Level::Region, &ResultsTable::sample()),
        )
        .await;
        serve(
            server,
            "/turnout",
            fixtures::turnout_html(Level::Region, &TurnoutTable::sample()),
        )
        .await;
        for i in 0..3 {
            serve(
                server,
                &format!("/tik/{i}"),
                fixtures::intermediate_html(Some(&format!("/uik/{i}"))),
            )
            .await;
            serve(server, &format!("/turnout/{i}"), fixtures::intermediate_html(None)).await;
            if complete || i != 2 {
                serve(
                    server,
                    &format!("/uik/{i}"),
                    fixtures::results_html(Level::Station, &ResultsTable::sample()),
                )
                .await;
            }
        }
    }

    fn config(server: &ServerGuard) -> Config {
        let mut config = Config::default();
        config.crawler.start_url = format!("{}/", server.url());
        config.crawler.request_delay_ms = 0;
        config.crawler.max_concurrent = 2;
        config
    }

    async fn read_records(path: &std::path::Path) -> Vec<Record> {
        let content = tokio::fs::read_to_string(path).await.unwrap();
        content
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_full_crawl() {
        let mut server = Server::new_async().await;
        site(
            &mut server,
            &[(RESULTS_LINK, "/results"), (TURNOUT_LINK, "/turnout")],
            true,
        )
        .await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        let mut sink = JsonLinesSink::create(&path).await.unwrap();
        let outcome = run_crawler(&config(&server), &mut sink).await.unwrap();

        // root, region, 2 reports, 6 intermediate pages, 3 station tables
        assert_eq!(outcome.pages_visited, 13);
        assert_eq!(outcome.records_written, 5);
        assert_eq!(outcome.fetch_failures, 0);
        assert_eq!(outcome.branch_failures, 0);

        let records = read_records(&path).await;
        let count = |kind| records.iter().filter(|r| r.data_type == kind).count();
        assert_eq!(count(ReportKind::ResultsTerritory), 1);
        assert_eq!(count(ReportKind::TurnoutTerritory), 1);
        assert_eq!(count(ReportKind::ResultsStation), 3);
        assert!(records.iter().all(|r| r.url.starts_with(&server.url())));
    }

    #[tokio::test]
    async fn test_failed_fetch_spares_siblings() {
        let mut server = Server::new_async().await;
        site(
            &mut server,
            &[(RESULTS_LINK, "/results"), (TURNOUT_LINK, "/turnout")],
            false,
        )
        .await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        let mut sink = JsonLinesSink::create(&path).await.unwrap();
        let outcome = run_crawler(&config(&server), &mut sink).await.unwrap();

        assert_eq!(outcome.fetch_failures, 1);
        assert_eq!(outcome.records_written, 4);
        assert_eq!(read_records(&path).await.len(), 4);
    }

    #[tokio::test]
    async fn test_incomplete_region_is_a_branch_failure() {
        let mut server = Server::new_async().await;
        site(&mut server, &[(RESULTS_LINK, "/results")], true).await;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("records.jsonl");
        let mut sink = JsonLinesSink::create(&path).await.unwrap();
        let outcome = run_crawler(&config(&server), &mut sink).await.unwrap();

        assert_eq!(outcome.pages_visited, 2);
        assert_eq!(outcome.branch_failures, 1);
        assert_eq!(outcome.records_written, 0);
    }

    #[tokio::test]
    async fn test_test_mode_limits_breadth() {
        let mut server = Server::new_async().await;
        site(
            &mut server,
            &[(RESULTS_LINK, "/results"), (TURNOUT_LINK, "/turnout")],
            true,
        )
        .await;

        let mut config = config(&server);
        config.crawler.test_mode = true;
        let dir = TempDir::new().unwrap();
        let mut sink = JsonLinesSink::create(dir.path().join("records.jsonl"))
            .await
            .unwrap();
        let outcome = run_crawler(&config, &mut sink).await.unwrap();

        // one territory per report: /tik/0, /uik/0 and /turnout/0
        assert_eq!(outcome.pages_visited, 7);
        assert_eq!(outcome.records_written, 3);
    }

    #[tokio::test]
    async fn test_request_delay_overlaps_fetches() {
        let mut server = Server::new_async().await;
        site(
            &mut server,
            &[(RESULTS_LINK, "/results"), (TURNOUT_LINK, "/turnout")],
            true,
        )
        .await;

        let mut config = config(&server);
        config.crawler.request_delay_ms = 200;
        config.crawler.max_concurrent = 4;
        let dir = TempDir::new().unwrap();
        let mut sink = JsonLinesSink::create(dir.path().join("records.jsonl"))
            .await
            .unwrap();

        let started = std::time::Instant::now();
        let outcome = run_crawler(&config, &mut sink).await.unwrap();
        let elapsed = started.elapsed();

        assert_eq!(outcome.pages_visited, 13);
        assert_eq!(outcome.records_written, 5);
        // Serialized delays would take 13 x 200ms
        assert!(
            elapsed < Duration::from_millis(13 * 200 - 400),
            "crawl took {elapsed:?}"
        );
    }
}
