use indexmap::IndexSet;
use std::collections::HashSet;

/// Frontier and visited set of a single domain crawl.
///
/// Owned by exactly one crawl, so nothing here is locked. A url is never
/// pending and visited at the same time.
#[derive(Debug)]
pub struct CrawlerState {
    /// Urls waiting to be crawled. Which one comes out next is unspecified.
    frontier: IndexSet<String>,
    /// Urls already taken from the frontier
    visited: HashSet<String>,
}

impl CrawlerState {
    pub fn new(seed_url: impl Into<String>) -> Self {
        let mut frontier = IndexSet::new();
        frontier.insert(seed_url.into());

        Self {
            frontier,
            visited: HashSet::new(),
        }
    }

    /// Removes and returns any pending url. `None` means the crawl is done.
    pub fn pop_next(&mut self) -> Option<String> {
        self.frontier.pop()
    }

    /// Moves `url` to the visited set, dropping it from the frontier if pending.
    pub fn mark_visited(&mut self, url: &str) {
        self.frontier.swap_remove(url);
        self.visited.insert(url.to_string());
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Adds `url` to the frontier unless it was already visited.
    pub fn offer(&mut self, url: &str) {
        if self.is_visited(url) || self.frontier.contains(url) {
            return;
        }
        self.frontier.insert(url.to_string());
    }

    pub fn pending_count(&self) -> usize {
        self.frontier.len()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}
