use std::collections::BinaryHeap;

use log::debug;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, VertexId};

/// A candidate article for a free-text query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleMatch {
    pub id: VertexId,
    pub title: String,
    /// Edit distance between the query and the equally long title prefix.
    pub distance: u32,
}

/// Approximate title lookup, best match first.
///
/// Implemented locally by [`TitleIndex`]; a remote search service can stand
/// in as long as it is safe to query from several threads at once.
pub trait TitleSearch: Sync {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<TitleMatch>>;
}

/// Titles of all loaded articles, sorted by raw title.
#[derive(Debug, Default)]
pub struct TitleIndex {
    entries: Vec<(String, VertexId)>,
}

impl TitleIndex {
    pub fn new(mut entries: Vec<(String, VertexId)>) -> Self {
        entries.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));
        Self { entries }
    }

    /// Index every titled article in `graph`.
    pub fn from_graph(graph: &Graph) -> Self {
        Self::new(
            graph
                .articles()
                .filter_map(|a| a.title.as_ref().map(|t| (t.clone(), a.id)))
                .collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, VertexId)] {
        &self.entries
    }

    /// Up to `limit` titles closest to `query`, lowest distance first.
    ///
    /// Only titles that share the query's first character (case-insensitive)
    /// and are at least as long as the query are scored. The score is the
    /// Levenshtein distance to the title's prefix of query length, so longer
    /// titles are not penalized for trailing characters. Equal distances keep
    /// the alphabetically earlier title.
    pub fn search(&self, query: &str, limit: usize) -> Result<Vec<TitleMatch>> {
        if query.trim().is_empty() {
            return Err(GraphError::InvalidQuery("query is empty".into()));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        let needle = lowercase_chars(query);
        let first = needle[0];

        // Max-heap on (distance, entry index): the top is the worst kept match.
        let mut heap: BinaryHeap<(u32, usize)> = BinaryHeap::with_capacity(limit + 1);
        let mut scored = 0usize;
        let mut prefix: Vec<char> = Vec::with_capacity(needle.len());

        for (idx, (title, _)) in self.entries.iter().enumerate() {
            prefix.clear();
            let mut chars = title.chars().flat_map(char::to_lowercase);
            match chars.next() {
                Some(c) if c == first => prefix.push(c),
                _ => continue,
            }
            prefix.extend(chars.take(needle.len() - 1));
            if prefix.len() < needle.len() {
                continue;
            }

            scored += 1;
            let distance = levenshtein(&needle, &prefix);
            if heap.len() == limit {
                if let Some(&worst) = heap.peek() {
                    if (distance, idx) > worst {
                        continue;
                    }
                }
            }
            heap.push((distance, idx));
            if heap.len() > limit {
                heap.pop();
            }
        }

        debug!(
            "title search '{}': {} candidates scored, {} kept",
            query,
            scored,
            heap.len()
        );

        Ok(heap
            .into_sorted_vec()
            .into_iter()
            .map(|(distance, idx)| {
                let (title, id) = &self.entries[idx];
                TitleMatch {
                    id: *id,
                    title: title.clone(),
                    distance,
                }
            })
            .collect())
    }
}

impl TitleSearch for TitleIndex {
    fn search(&self, query: &str, limit: usize) -> Result<Vec<TitleMatch>> {
        TitleIndex::search(self, query, limit)
    }
}

fn lowercase_chars(s: &str) -> Vec<char> {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Levenshtein distance over two char slices (two-row dynamic programming).
pub fn levenshtein(a: &[char], b: &[char]) -> u32 {
    if a.is_empty() {
        return b.len() as u32;
    }
    if b.is_empty() {
        return a.len() as u32;
    }

    let mut prev: Vec<u32> = (0..=b.len() as u32).collect();
    let mut curr: Vec<u32> = vec![0; b.len() + 1];

    for (i, &ca) in a.iter().enumerate() {
        curr[0] = i as u32 + 1;
        for (j, &cb) in b.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            let deletion = prev[j + 1] + 1;
            let insertion = curr[j] + 1;
            let substitution = prev[j] + cost;
            curr[j + 1] = deletion.min(insertion).min(substitution);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    fn index(titles: &[(&str, VertexId)]) -> TitleIndex {
        TitleIndex::new(titles.iter().map(|(t, id)| (t.to_string(), *id)).collect())
    }

    fn animals() -> TitleIndex {
        index(&[("Cat", 1), ("Dog", 2), ("Bird", 3)])
    }

    #[test]
    fn test_levenshtein_basics() {
        assert_eq!(levenshtein(&chars("kitten"), &chars("sitting")), 3);
        assert_eq!(levenshtein(&chars(""), &chars("abc")), 3);
        assert_eq!(levenshtein(&chars("abc"), &chars("")), 3);
        assert_eq!(levenshtein(&chars("same"), &chars("same")), 0);
        assert_eq!(levenshtein(&chars("flaw"), &chars("lawn")), 2);
    }

    #[test]
    fn test_exact_title_is_top_with_zero_distance() {
        let results = animals().search("Dog", 1).unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 2);
        assert_eq!(results[0].distance, 0);
        assert_eq!(results[0].title, "Dog");
    }

    #[test]
    fn test_case_insensitive() {
        let results = animals().search("bIRD", 5).unwrap();
        assert_eq!(results[0].id, 3);
        assert_eq!(results[0].distance, 0);
    }

    #[test]
    fn test_scores_against_title_prefix() {
        let idx = index(&[("Scooby-Doo", 10), ("Scotland", 11), ("Score", 12)]);
        let results = idx.search("scoob", 3).unwrap();
        assert_eq!(results[0].id, 10);
        assert_eq!(results[0].distance, 0);
        // "scotl" and "score" are both two edits from "scoob"
        assert_eq!(results[1].distance, 2);
        assert_eq!(results[2].distance, 2);
    }

    #[test]
    fn test_misspelling_resolves() {
        let idx = index(&[("ICarly", 1), ("Iceland", 2), ("Icarus", 3)]);
        let results = idx.search("icarli", 1).unwrap();
        assert_eq!(results[0].id, 1);
        assert_eq!(results[0].distance, 1);
    }

    #[test]
    fn test_prefilter_first_char_and_length() {
        let idx = index(&[("Do", 1), ("Xdog", 2), ("Dogma", 3)]);
        let results = idx.search("dog", 10).unwrap();
        // "Do" is shorter than the query, "Xdog" starts with another letter
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].id, 3);
    }

    #[test]
    fn test_result_bounded_by_limit() {
        let idx = index(&[("Aa", 1), ("Ab", 2), ("Ac", 3), ("Ad", 4), ("Ae", 5)]);
        assert_eq!(idx.search("ax", 3).unwrap().len(), 3);
        assert_eq!(idx.search("ax", 10).unwrap().len(), 5);
        assert!(idx.search("ax", 0).unwrap().is_empty());
    }

    #[test]
    fn test_results_ordered_best_first() {
        let idx = index(&[("Apple", 1), ("Apply", 2), ("Azzzz", 3), ("Appzz", 4)]);
        let results = idx.search("apple", 4).unwrap();
        let distances: Vec<u32> = results.iter().map(|m| m.distance).collect();
        assert_eq!(distances, vec![0, 1, 2, 4]);
        assert_eq!(results[0].id, 1);
    }

    #[test]
    fn test_ties_keep_alphabetically_first() {
        let idx = index(&[("Bx", 2), ("By", 3), ("Bw", 1)]);
        let results = idx.search("ba", 2).unwrap();
        let titles: Vec<&str> = results.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(titles, vec!["Bw", "Bx"]);
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(matches!(
            animals().search("", 5),
            Err(GraphError::InvalidQuery(_))
        ));
        assert!(matches!(
            animals().search("   ", 5),
            Err(GraphError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_no_candidates() {
        assert!(animals().search("zebra", 5).unwrap().is_empty());
    }

    #[test]
    fn test_from_graph_skips_untitled() {
        let mut g = Graph::new();
        g.add_article(1, Some("Cat".into()), vec![]);
        g.add_article(2, None, vec![]);
        let idx = TitleIndex::from_graph(&g);
        assert_eq!(idx.len(), 1);
        assert_eq!(idx.entries()[0], ("Cat".to_string(), 1));
    }

    #[test]
    fn test_sorted_by_raw_title() {
        let idx = index(&[("b", 1), ("B", 2), ("a", 3)]);
        let titles: Vec<&str> = idx.entries().iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(titles, vec!["B", "a", "b"]);
    }
}
