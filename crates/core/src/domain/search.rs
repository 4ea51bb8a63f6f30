use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::filter::{toggle_modified_filter, FilterSet};
use crate::domain::pager::{compute_pager, Pager};
use crate::domain::sort::{toggle_sort_field, DEFAULT_SORT};
use crate::types::page_size::{PageSize, PageWindow};

/// Page, filter and sort state of one search view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchOptions {
    pub page: usize,
    #[serde(rename = "rpp")]
    pub results_per_page: PageSize,
    pub status: FilterSet,
    pub tags: FilterSet,
    pub last_modified: Option<String>,
    pub sort: String,
    #[serde(rename = "maxPagesToShow")]
    pub max_pages_to_show: PageWindow,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            page: 1,
            results_per_page: PageSize::default(),
            status: FilterSet::new(),
            tags: FilterSet::new(),
            last_modified: None,
            sort: DEFAULT_SORT.to_string(),
            max_pages_to_show: PageWindow::default(),
        }
    }
}

impl SearchOptions {
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        Self::default().with_query_pairs(pairs)
    }

    /// Overlays recognized query-string keys on `self`. Values that do not
    /// parse leave the current setting untouched, except `page`, which falls
    /// back to 1.
    pub fn with_query_pairs<I, K, V>(mut self, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "page" => {
                    self.page = value.parse::<usize>().ok().filter(|p| *p > 0).unwrap_or(1);
                }
                "rpp" => {
                    if let Some(size) = value
                        .parse::<usize>()
                        .ok()
                        .and_then(|raw| PageSize::try_from(raw).ok())
                    {
                        self.results_per_page = size;
                    }
                }
                "status" => self.status = FilterSet::from_csv(value),
                "tags" => self.tags = FilterSet::from_csv(value),
                "last_modified" => {
                    self.last_modified = if value.is_empty() {
                        None
                    } else {
                        Some(value.to_string())
                    };
                }
                "sort" => {
                    if !value.is_empty() {
                        self.sort = value.to_string();
                    }
                }
                _ => {}
            }
        }
        self
    }

    /// Query-string pairs for the view URL. Only non-default values appear.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.page != 1 {
            pairs.push(("page", self.page.to_string()));
        }
        if self.results_per_page != PageSize::default() {
            pairs.push(("rpp", self.results_per_page.to_string()));
        }
        if !self.status.is_empty() {
            pairs.push(("status", self.status.to_csv()));
        }
        if !self.tags.is_empty() {
            pairs.push(("tags", self.tags.to_csv()));
        }
        if let Some(value) = self.last_modified.as_ref() {
            pairs.push(("last_modified", value.clone()));
        }
        if self.sort != DEFAULT_SORT {
            pairs.push(("sort", self.sort.clone()));
        }
        pairs
    }

    /// Parameters of the backend search request. Every key is always sent.
    pub fn api_params(&self, query: &str) -> Vec<(&'static str, String)> {
        vec![
            ("query", query.to_string()),
            ("from", self.from_offset().to_string()),
            ("size", self.results_per_page.to_string()),
            ("status", self.status.to_csv()),
            ("tags", self.tags.to_csv()),
            ("modified", self.last_modified.clone().unwrap_or_default()),
            ("sort", self.sort.clone()),
        ]
    }

    pub fn from_offset(&self) -> usize {
        (self.page.max(1) - 1).saturating_mul(self.results_per_page.get())
    }

    pub fn pager(&self, total_results: usize) -> Pager {
        compute_pager(
            self.page,
            total_results,
            self.results_per_page,
            self.max_pages_to_show,
        )
    }

    pub fn jump_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn toggle_status(&mut self, value: &str) {
        self.status.toggle(value);
        self.page = 1;
    }

    pub fn toggle_tag(&mut self, value: &str) {
        self.tags.toggle(value);
        self.page = 1;
    }

    pub fn toggle_modified(&mut self, value: &str) {
        self.last_modified = toggle_modified_filter(self.last_modified.as_deref(), value);
        self.page = 1;
    }

    pub fn toggle_sort(&mut self, field: &str) {
        self.sort = toggle_sort_field(&self.sort, field);
        self.page = 1;
    }

    pub fn change_page_size(&mut self, size: PageSize) {
        self.results_per_page = size;
        self.page = 1;
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    pub hits: SearchHits,
    #[serde(default)]
    pub facets: Facets,
    #[serde(rename = "_shards", default)]
    pub shards: ShardStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchHit>,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "_score", default)]
    pub score: Option<f64>,
    #[serde(default, alias = "_source")]
    pub source: serde_json::Value,
}

impl SearchHit {
    /// Title of the underlying bug document, if the hit carries one.
    pub fn title(&self) -> Option<&str> {
        self.source
            .get("doc")
            .and_then(|doc| doc.get("title"))
            .or_else(|| self.source.get("title"))
            .and_then(|value| value.as_str())
    }
}

pub type Facets = BTreeMap<String, Facet>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Facet {
    pub total: u64,
    pub missing: u64,
    pub terms: Vec<FacetTerm>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetTerm {
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShardStatus {
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub successful: u64,
}

impl ShardStatus {
    pub fn warning(&self) -> Option<String> {
        if self.successful < self.total {
            Some(format!(
                "Search only contains results from {} of {} shards",
                self.successful, self.total
            ))
        } else {
            None
        }
    }
}

/// Result of one search as shown to the view.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchOutcome {
    pub error_message: String,
    pub warning_message: String,
    pub query_string: String,
    pub options: SearchOptions,
    pub hits: Vec<SearchHit>,
    pub facets: Facets,
    pub pager: Option<Pager>,
}

impl SearchOutcome {
    pub fn from_response(query: &str, options: SearchOptions, response: SearchResponse) -> Self {
        let pager = options.pager(response.hits.total);
        let warning_message = response.shards.warning().unwrap_or_default();
        Self {
            error_message: String::new(),
            warning_message,
            query_string: query.to_string(),
            options,
            hits: response.hits.hits,
            facets: response.facets,
            pager: Some(pager),
        }
    }

    pub fn failed(query: &str, options: SearchOptions, message: impl Into<String>) -> Self {
        Self {
            error_message: message.into(),
            warning_message: String::new(),
            query_string: query.to_string(),
            options,
            hits: Vec::new(),
            facets: Facets::new(),
            pager: None,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.error_message.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMPTY_RESPONSE: &str = r#"{"hits":{"hits":[],"total":0},"_shards":{"total":5,"successful":5}}"#;
    const PARTIAL_RESPONSE: &str = r#"{"hits":{"hits":[],"total":0},"_shards":{"total":5,"successful":4}}"#;

    #[test]
    fn default_options_build_backend_params() {
        let params = SearchOptions::default().api_params("bug");
        let rendered: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        assert_eq!(
            rendered.join("&"),
            "query=bug&from=0&size=15&status=&tags=&modified=&sort=-_score"
        );
    }

    #[test]
    fn params_carry_filters_and_offset() {
        let options = SearchOptions::from_query_pairs([
            ("page", "3"),
            ("status", "open,inbox"),
            ("tags", "ui"),
            ("last_modified", "7d"),
            ("sort", "title"),
        ]);
        let params: BTreeMap<_, _> = options.api_params("crash").into_iter().collect();
        assert_eq!(params["from"], "30");
        assert_eq!(params["status"], "open,inbox");
        assert_eq!(params["tags"], "ui");
        assert_eq!(params["modified"], "7d");
        assert_eq!(params["sort"], "title");
    }

    #[test]
    fn query_pairs_round_trip_non_defaults_only() {
        assert!(SearchOptions::default().to_query_pairs().is_empty());

        let options = SearchOptions::from_query_pairs([
            ("page", "2"),
            ("tags", "ui,docs"),
            ("unknown", "x"),
        ]);
        let pairs = options.to_query_pairs();
        assert_eq!(
            pairs,
            vec![("page", "2".to_string()), ("tags", "ui,docs".to_string())]
        );
        assert_eq!(SearchOptions::from_query_pairs(pairs), options);
    }

    #[test]
    fn invalid_page_falls_back_to_first() {
        assert_eq!(SearchOptions::from_query_pairs([("page", "0")]).page, 1);
        assert_eq!(SearchOptions::from_query_pairs([("page", "abc")]).page, 1);
    }

    #[test]
    fn zero_rpp_keeps_default() {
        let options = SearchOptions::from_query_pairs([("rpp", "0")]);
        assert_eq!(options.results_per_page, PageSize::default());
    }

    #[test]
    fn toggles_reset_page() {
        let mut options = SearchOptions::from_query_pairs([("page", "4")]);
        options.toggle_status("open");
        assert_eq!(options.page, 1);
        assert!(options.status.contains("open"));

        options.jump_to_page(3);
        options.toggle_sort("_score");
        assert_eq!(options.sort, "_score");
        assert_eq!(options.page, 1);

        options.jump_to_page(2);
        options.toggle_modified("7d");
        assert_eq!(options.last_modified.as_deref(), Some("7d"));
        assert_eq!(options.page, 1);
    }

    #[test]
    fn full_shard_response_has_no_warning() {
        let response: SearchResponse = serde_json::from_str(EMPTY_RESPONSE).unwrap();
        let outcome = SearchOutcome::from_response("bug", SearchOptions::default(), response);
        assert!(!outcome.is_error());
        assert_eq!(outcome.warning_message, "");
        assert!(outcome.hits.is_empty());
        let pager = outcome.pager.unwrap();
        assert_eq!(pager.num_pages, 0);
        assert_eq!(pager.first_result, 0);
    }

    #[test]
    fn partial_shard_response_warns_but_keeps_results() {
        let response: SearchResponse = serde_json::from_str(PARTIAL_RESPONSE).unwrap();
        let outcome = SearchOutcome::from_response("bug", SearchOptions::default(), response);
        assert_eq!(
            outcome.warning_message,
            "Search only contains results from 4 of 5 shards"
        );
        assert!(outcome.pager.is_some());
    }

    #[test]
    fn failed_outcome_has_no_pager() {
        let outcome = SearchOutcome::failed(
            "bug",
            SearchOptions::default(),
            "dial tcp 127.0.0.1:9200: connection refused",
        );
        assert!(outcome.is_error());
        assert_eq!(
            outcome.error_message,
            "dial tcp 127.0.0.1:9200: connection refused"
        );
        assert!(outcome.pager.is_none());
    }

    #[test]
    fn hits_and_facets_deserialize() {
        let raw = r#"{
            "hits": {"total": 1, "hits": [
                {"_id": "bug-1", "_score": 1.5, "source": {"doc": {"title": "Crash on save"}}}
            ]},
            "facets": {"statuses": {"_type": "terms", "total": 1, "terms": [{"term": "open", "count": 1}]}},
            "_shards": {"total": 1, "successful": 1}
        }"#;
        let response: SearchResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.hits.hits[0].title(), Some("Crash on save"));
        assert_eq!(response.facets["statuses"].terms[0].term, "open");
    }

    #[test]
    fn outcome_serializes_camel_case_keys() {
        let outcome = SearchOutcome::failed("bug", SearchOptions::default(), "backend down");
        let value = serde_json::to_value(&outcome).unwrap();
        assert_eq!(value["errorMessage"], "backend down");
        assert_eq!(value["warningMessage"], "");
        assert_eq!(value["queryString"], "bug");
        assert!(value["pager"].is_null());
        assert!(value.get("error_message").is_none());
    }
}
