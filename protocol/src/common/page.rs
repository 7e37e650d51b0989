//! Paginated collections

use serde::{Deserialize, Serialize};

/// One page of a server-paginated collection
///
/// `next` and `previous` are opaque cursor URLs. The page size is fixed by
/// the server and never sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub count: u64,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    pub results: Vec<T>,
}

impl<T> Paginated<T> {
    /// Total pages for the given page size; at least one.
    pub fn page_count(&self, page_size: u32) -> u64 {
        page_count(self.count, page_size)
    }

    pub fn has_next(&self) -> bool {
        self.next.is_some()
    }

    pub fn has_previous(&self) -> bool {
        self.previous.is_some()
    }
}

/// `ceil(count / page_size)`, never less than one page.
pub fn page_count(count: u64, page_size: u32) -> u64 {
    if page_size == 0 {
        return 1;
    }
    count.div_ceil(u64::from(page_size)).max(1)
}
