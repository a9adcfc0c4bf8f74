use std::collections::{HashSet, VecDeque};
use url::Url;

/// FIFO queue of discovered URLs plus the set already processed.
///
/// A URL is accepted at most once: pushes of anything queued, visited or
/// aliased are ignored, so traversal is breadth-first in discovery order.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<Url>,
    queued: HashSet<String>,
    visited: HashSet<String>,
    // Redirect targets already served under another URL
    aliases: HashSet<String>,
}

impl Frontier {
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::default();
        frontier.push(seed);
        frontier
    }

    /// Append `url` unless it was already seen. Returns whether it was added.
    pub fn push(&mut self, url: Url) -> bool {
        let key = url.as_str();
        if self.visited.contains(key) || self.queued.contains(key) || self.aliases.contains(key) {
            return false;
        }
        self.queued.insert(url.as_str().to_owned());
        self.queue.push_back(url);
        true
    }

    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(url.as_str());
        Some(url)
    }

    /// Record `url` as processed. Returns false if it already was.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.as_str().to_owned())
    }

    /// Remember `url` as already fetched through a redirect so it is never
    /// queued. Aliases do not count towards `visited_len`.
    pub fn alias(&mut self, url: &Url) {
        if !self.visited.contains(url.as_str()) {
            self.aliases.insert(url.as_str().to_owned());
        }
    }

    pub fn visited_len(&self) -> usize {
        self.visited.len()
    }

    /// Number of URLs waiting to be visited.
    pub fn queued_len(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(path: &str) -> Url {
        Url::parse("https://example.com/").unwrap().join(path).unwrap()
    }

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::with_seed(url("/"));
        frontier.push(url("/a"));
        frontier.push(url("/b"));

        assert_eq!(frontier.pop(), Some(url("/")));
        assert_eq!(frontier.pop(), Some(url("/a")));
        assert_eq!(frontier.pop(), Some(url("/b")));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_rejects_queued_and_visited() {
        let mut frontier = Frontier::with_seed(url("/"));
        assert!(!frontier.push(url("/")));

        let seed = frontier.pop().unwrap();
        assert!(frontier.mark_visited(&seed));
        assert!(!frontier.mark_visited(&seed));
        assert!(!frontier.push(url("/")));
        assert!(frontier.push(url("/next")));
        assert_eq!(frontier.queued_len(), 1);
        assert_eq!(frontier.visited_len(), 1);
    }

    #[test]
    fn test_aliased_url_is_never_queued() {
        let mut frontier = Frontier::with_seed(Url::parse("http://example.com/").unwrap());
        let seed = frontier.pop().unwrap();
        frontier.mark_visited(&seed);

        frontier.alias(&url("/"));
        assert!(!frontier.push(url("/")));
        assert!(frontier.push(url("/a")));
        assert_eq!(frontier.visited_len(), 1);
    }
}
