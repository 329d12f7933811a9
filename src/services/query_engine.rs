//! Query Engine: the read paths over a [`HistoryStore`].
//!
//! Both paths fail soft. An uninitialized store, a blank query or a
//! backing-store error yields an empty result rather than an error.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Datelike, Days, Local, TimeZone};
use tracing::{debug, warn};

use crate::managers::record_store::HistoryStore;
use crate::services::folder_index::day_segments;
use crate::services::title_codec;
use crate::tree_store::TreeStore;
use crate::types::history::HistoryRecord;
use crate::types::node::{SearchQuery, TreeNode};
use crate::types::query::ParsedQuery;

const SITE_PREFIX: &str = "site:";

/// Splits a query into lower-cased text and `site:` filters.
///
/// `site:` is matched case-insensitively and an empty site term is dropped.
/// Text terms come back longest first.
pub fn parse_query(query: &str) -> ParsedQuery {
    let mut parsed = ParsedQuery::default();
    for term in query.split_whitespace() {
        let lower = term.to_lowercase();
        match lower.strip_prefix(SITE_PREFIX) {
            Some("") => {}
            Some(site) => parsed.site_terms.push(site.to_string()),
            None => parsed.text_terms.push(lower),
        }
    }
    // Stable sort keeps input order among equal lengths.
    parsed
        .text_terms
        .sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));
    parsed
}

/// True when `record` satisfies every term of `parsed`.
///
/// Site terms look at the domain and url only; text terms at title and url.
pub fn matches_record(parsed: &ParsedQuery, record: &HistoryRecord) -> bool {
    let title = record.title.to_lowercase();
    let url = record.url.to_lowercase();
    let domain = record.domain.to_lowercase();

    parsed
        .site_terms
        .iter()
        .all(|s| domain.contains(s.as_str()) || url.contains(s.as_str()))
        && parsed
            .text_terms
            .iter()
            .all(|t| title.contains(t.as_str()) || url.contains(t.as_str()))
}

/// Text handed to the backing store's native search for candidate retrieval.
///
/// The text terms, or the site terms for a site-only query.
fn candidate_text(parsed: &ParsedQuery) -> String {
    if parsed.text_terms.is_empty() {
        parsed.site_terms.join(" ")
    } else {
        parsed.text_terms.join(" ")
    }
}

/// Walks parent links from `node` up to the top of the tree.
///
/// Returns true when `folder_id` is an ancestor. A failed or empty lookup
/// ends the walk with `false`. `memo` carries answers between calls of one
/// search so shared ancestors are resolved once.
pub async fn is_under_folder<S: TreeStore + ?Sized>(
    tree: &S,
    node: &TreeNode,
    folder_id: &str,
    memo: &mut HashMap<String, bool>,
) -> bool {
    let mut visited: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut next = node.parent_id.clone();

    let answer = loop {
        let Some(current) = next.take() else {
            break false;
        };
        if current == folder_id {
            break true;
        }
        if let Some(known) = memo.get(&current) {
            break *known;
        }
        if !seen.insert(current.clone()) {
            // Parent cycle.
            break false;
        }
        match tree.get(&current).await {
            Ok(mut nodes) if !nodes.is_empty() => {
                next = nodes.swap_remove(0).parent_id;
                visited.push(current);
            }
            Ok(_) => break false,
            Err(e) => {
                debug!(id = %current, error = %e, "ancestor lookup failed");
                break false;
            }
        }
    };

    for id in visited {
        memo.insert(id, answer);
    }
    answer
}

/// Sorts records by last visit, newest first, keeping traversal order for ties.
fn sort_newest_first(records: &mut [HistoryRecord]) {
    records.sort_by(|a, b| b.last_visit_time.cmp(&a.last_visit_time));
}

impl<S: TreeStore> HistoryStore<S> {
    /// AND search over stored records, scoped to the root folder.
    ///
    /// Results are newest first and capped at `max_results` (0 = no cap).
    pub async fn search(&self, query: &str) -> Vec<HistoryRecord> {
        let Some(root_id) = self.root_id() else {
            return Vec::new();
        };
        let parsed = parse_query(query);
        if query.trim().is_empty() || parsed.is_empty() {
            debug!(query, "search query has no usable terms");
            return Vec::new();
        }

        let candidates = match self
            .tree
            .search(SearchQuery::Text(candidate_text(&parsed)))
            .await
        {
            Ok(nodes) => nodes,
            Err(e) => {
                warn!(error = %e, "history search failed");
                return Vec::new();
            }
        };

        let mut memo = HashMap::new();
        let mut results = Vec::new();
        for node in candidates.iter().filter(|n| !n.is_container()) {
            if !is_under_folder(self.tree.as_ref(), node, &root_id, &mut memo).await {
                continue;
            }
            let record = title_codec::record_from_node(node);
            if matches_record(&parsed, &record) {
                results.push(record);
            }
        }

        sort_newest_first(&mut results);
        let cap = self.search_settings.max_results;
        if cap > 0 {
            results.truncate(cap);
        }
        results
    }

    /// Records from the last `days` calendar days (today included), newest first.
    pub async fn get_recent(&self, days: u32) -> Vec<HistoryRecord> {
        self.get_recent_at(&Local::now(), days).await
    }

    /// [`get_recent`](Self::get_recent) with an explicit "now".
    ///
    /// Day buckets follow `now`'s time zone. Missing folders are skipped,
    /// never created. `days` is clamped to `max_recent_days`.
    pub async fn get_recent_at<Tz: TimeZone>(
        &self,
        now: &DateTime<Tz>,
        days: u32,
    ) -> Vec<HistoryRecord> {
        let Some(root_id) = self.root_id() else {
            return Vec::new();
        };

        let Some(oldest_year) = self.oldest_year(&root_id).await else {
            return Vec::new();
        };

        let days = self.search_settings.recent_window(days);
        let today = now.date_naive();
        // Dates only move further back, so the walk ends at the first date
        // out of range or older than any stored year.
        let buckets = (0..days)
            .map_while(|offset| today.checked_sub_days(Days::new(u64::from(offset))))
            .take_while(|date| date.year() >= oldest_year)
            .map(day_segments);

        let mut results = Vec::new();
        for [year, month, day] in buckets {
            let Some(day_id) = self
                .folders
                .find_path(&root_id, &[year.as_str(), month.as_str(), day.as_str()])
                .await
            else {
                continue;
            };
            results.extend(self.collect_leaves(&day_id).await);
        }

        sort_newest_first(&mut results);
        results
    }

    /// Smallest year folder under the root, or `None` when there is none.
    async fn oldest_year(&self, root_id: &str) -> Option<i32> {
        match self.tree.get_children(root_id).await {
            Ok(children) => children
                .iter()
                .filter(|c| c.is_container())
                .filter_map(|c| c.title.parse::<i32>().ok())
                .min(),
            Err(e) => {
                debug!(id = %root_id, error = %e, "root folder unreadable");
                None
            }
        }
    }

    /// Every leaf below `folder_id`, depth first, decoded.
    async fn collect_leaves(&self, folder_id: &str) -> Vec<HistoryRecord> {
        let mut records = Vec::new();
        let mut stack = vec![folder_id.to_string()];
        while let Some(current) = stack.pop() {
            let children = match self.tree.get_children(&current).await {
                Ok(children) => children,
                Err(e) => {
                    debug!(id = %current, error = %e, "skipping unreadable folder");
                    continue;
                }
            };
            // Reverse so containers pop in position order.
            for child in children.iter().rev() {
                if child.is_container() {
                    stack.push(child.id.clone());
                }
            }
            records.extend(
                children
                    .iter()
                    .filter(|c| !c.is_container())
                    .map(title_codec::record_from_node),
            );
        }
        records
    }
}
