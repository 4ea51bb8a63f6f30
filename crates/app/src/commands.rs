use std::fmt::Write as _;

use thiserror::Error;
use tracing::{info, warn};

use crate::cli::{SearchArgs, TagsArgs};
use crate::state::AppState;
use bugboard_core::domain::filter::FilterSet;
use bugboard_core::domain::pager::Pager;
use bugboard_core::domain::search::{SearchOptions, SearchOutcome};
use bugboard_core::domain::sort::DEFAULT_SORT;
use bugboard_core::domain::tag_cloud::{bucketize, TagCloudEntry};
use bugboard_core::error::CoreError;
use bugboard_core::types::page_size::PageSize;
use bugboard_infra::api::ApiError;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("search failed: {0}")]
    Search(String),
    #[error("backend error: {0}")]
    Api(#[from] ApiError),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub async fn search(state: &AppState, args: SearchArgs) -> Result<(), CommandError> {
    let page_size = match args.rpp {
        Some(rpp) => PageSize::try_from(rpp)?,
        None => preferred_page_size(state).await,
    };
    let options = search_options(&args, page_size);
    let outcome = state.api.run_search(&args.query, options).await;
    if outcome.is_error() {
        return Err(CommandError::Search(outcome.error_message));
    }
    if !outcome.warning_message.is_empty() {
        eprintln!("warning: {}", outcome.warning_message);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print!("{}", format_hits(&outcome));
    }
    Ok(())
}

pub async fn tags(state: &AppState, args: TagsArgs) -> Result<(), CommandError> {
    let frequencies = state.api.tag_frequencies().await?;
    let cloud = bucketize(frequencies, args.top, args.buckets);
    info!(tags = cloud.len(), "tag cloud built");
    if args.json {
        println!("{}", serde_json::to_string_pretty(&cloud)?);
    } else {
        print!("{}", format_cloud(&cloud));
    }
    Ok(())
}

async fn preferred_page_size(state: &AppState) -> PageSize {
    match state.api.user_prefs().await {
        Ok(prefs) => prefs.page_size(),
        Err(err) => {
            warn!(error = %err, "user prefs unavailable, using default page size");
            PageSize::default()
        }
    }
}

fn search_options(args: &SearchArgs, page_size: PageSize) -> SearchOptions {
    SearchOptions {
        page: args.page.max(1),
        results_per_page: page_size,
        status: FilterSet::from_iter(args.status.iter().map(String::as_str)),
        tags: FilterSet::from_iter(args.tags.iter().map(String::as_str)),
        last_modified: args.modified.clone().filter(|value| !value.is_empty()),
        sort: args.sort.clone().unwrap_or_else(|| DEFAULT_SORT.to_string()),
        ..SearchOptions::default()
    }
}

fn format_hits(outcome: &SearchOutcome) -> String {
    let mut out = String::new();
    for hit in &outcome.hits {
        let _ = writeln!(out, "{}\t{}", hit.id, hit.title().unwrap_or_default());
    }
    if let Some(pager) = outcome.pager.as_ref() {
        let _ = writeln!(out, "{}", pager_summary(pager));
    }
    out
}

fn pager_summary(pager: &Pager) -> String {
    let pages: Vec<String> = pager
        .valid_pages
        .iter()
        .map(|page| {
            if *page == pager.current_page {
                format!("[{page}]")
            } else {
                page.to_string()
            }
        })
        .collect();
    format!(
        "results {}-{} of {} | page {} of {} | {}",
        pager.first_result,
        pager.last_result,
        pager.total_results,
        pager.current_page,
        pager.num_pages,
        pages.join(" ")
    )
}

fn format_cloud(cloud: &[TagCloudEntry]) -> String {
    let mut out = String::new();
    for entry in cloud {
        let _ = writeln!(out, "{}\t{}\t{}", entry.weight, entry.count, entry.key);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use bugboard_core::domain::pager::compute_pager;
    use bugboard_core::domain::search::SearchResponse;
    use bugboard_core::types::page_size::PageWindow;

    fn args() -> SearchArgs {
        SearchArgs {
            query: "crash".to_string(),
            page: 0,
            rpp: None,
            status: vec!["open".to_string(), "open".to_string(), "inbox".to_string()],
            tags: Vec::new(),
            modified: Some(String::new()),
            sort: None,
            json: false,
        }
    }

    #[test]
    fn search_options_normalize_cli_input() {
        let options = search_options(&args(), PageSize::default());
        assert_eq!(options.page, 1);
        assert_eq!(options.status.to_csv(), "open,inbox");
        assert!(options.tags.is_empty());
        assert_eq!(options.last_modified, None);
        assert_eq!(options.sort, DEFAULT_SORT);
    }

    #[test]
    fn pager_summary_marks_current_page() {
        let pager = compute_pager(
            2,
            45,
            PageSize::try_from(10).unwrap(),
            PageWindow::try_from(3).unwrap(),
        );
        assert_eq!(
            pager_summary(&pager),
            "results 11-20 of 45 | page 2 of 5 | 1 [2] 3"
        );
    }

    #[test]
    fn hits_print_id_and_title() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"hits":{"hits":[{"_id":"bug-1","_score":1.5,"source":{"doc":{"title":"Crash on save"}}}],"total":1},"_shards":{"total":1,"successful":1}}"#,
        )
        .unwrap();
        let outcome = SearchOutcome::from_response("crash", SearchOptions::default(), response);
        assert_eq!(
            format_hits(&outcome),
            "bug-1\tCrash on save\nresults 1-1 of 1 | page 1 of 1 | [1]\n"
        );
    }

    #[test]
    fn cloud_lines_start_with_weight() {
        let cloud = vec![TagCloudEntry {
            key: "ui".to_string(),
            count: 4,
            weight: 2,
        }];
        assert_eq!(format_cloud(&cloud), "2\t4\tui\n");
    }
}
