//! Topic routing-key matching
//!
//! Keys and patterns are lists of words separated by `.`. In a pattern `*`
//! stands for exactly one word and `#` for zero or more words.
//!
//! Matching walks the pattern one word at a time over a row of "key prefix
//! matched" flags, so it costs O(pattern words x key words) however many `#`
//! the pattern contains.

pub fn matches(pattern: &str, routing_key: &str) -> bool {
    let key: Vec<&str> = routing_key.split('.').collect();

    // matched[j]: the pattern words seen so far match the first j key words
    let mut matched = vec![false; key.len() + 1];
    matched[0] = true;

    for word in pattern.split('.') {
        let mut next = vec![false; key.len() + 1];
        match word {
            "#" => {
                next[0] = matched[0];
                for j in 1..=key.len() {
                    next[j] = matched[j] || next[j - 1];
                }
            }
            "*" => {
                for j in 1..=key.len() {
                    next[j] = matched[j - 1];
                }
            }
            literal => {
                for j in 1..=key.len() {
                    next[j] = matched[j - 1] && key[j - 1] == literal;
                }
            }
        }
        if !next.contains(&true) {
            return false;
        }
        matched = next;
    }

    matched[key.len()]
}
