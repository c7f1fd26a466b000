//! Fragment merging: folds degenerate short fragments into their neighbours.

use super::Fragment;

/// Merge fragments with fewer than `min_tokens` tokens into the following
/// fragment of the same page.
///
/// A short fragment at the end of the page is appended to the preceding
/// fragment instead. A page consisting of a single short fragment keeps it.
/// `token_count` recomputes the token count of a merged byte span.
pub fn merge_short_fragments<F>(
    fragments: Vec<Fragment>,
    min_tokens: usize,
    token_count: F,
) -> Vec<Fragment>
where
    F: Fn(usize, usize) -> usize,
{
    let mut merged: Vec<Fragment> = Vec::with_capacity(fragments.len());
    let mut pending: Option<Fragment> = None;
    let last = fragments.len().saturating_sub(1);

    for (i, fragment) in fragments.into_iter().enumerate() {
        let current = match pending.take() {
            Some(prev) => join(&prev, &fragment, &token_count),
            None => fragment,
        };

        if current.tokens >= min_tokens {
            merged.push(current);
        } else if i < last {
            pending = Some(current);
        } else if let Some(prev) = merged.pop() {
            merged.push(join(&prev, &current, &token_count));
        } else {
            merged.push(current);
        }
    }

    merged
}

fn join<F>(first: &Fragment, second: &Fragment, token_count: &F) -> Fragment
where
    F: Fn(usize, usize) -> usize,
{
    Fragment {
        start: first.start,
        end: second.end,
        tokens: token_count(first.start, second.end),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frag(start: usize, end: usize, tokens: usize) -> Fragment {
        Fragment { start, end, tokens }
    }

    // Token counts in these tests are byte lengths divided by ten.
    fn count(start: usize, end: usize) -> usize {
        (end - start) / 10
    }

    #[test]
    fn test_short_fragment_merges_forward() {
        let fragments = vec![frag(0, 20, 2), frag(22, 100, 7), frag(102, 200, 9)];
        let merged = merge_short_fragments(fragments, 5, count);

        assert_eq!(merged, vec![frag(0, 100, 10), frag(102, 200, 9)]);
    }

    #[test]
    fn test_consecutive_short_fragments_accumulate() {
        let fragments = vec![frag(0, 10, 1), frag(12, 20, 1), frag(22, 90, 6)];
        let merged = merge_short_fragments(fragments, 5, count);

        assert_eq!(merged, vec![frag(0, 90, 9)]);
    }

    #[test]
    fn test_trailing_short_fragment_merges_backward() {
        let fragments = vec![frag(0, 80, 8), frag(82, 90, 1)];
        let merged = merge_short_fragments(fragments, 5, count);

        assert_eq!(merged, vec![frag(0, 90, 9)]);
    }

    #[test]
    fn test_lone_short_fragment_is_kept() {
        let fragments = vec![frag(0, 10, 1)];
        let merged = merge_short_fragments(fragments, 5, count);

        assert_eq!(merged, vec![frag(0, 10, 1)]);
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_short_fragments(Vec::new(), 5, count).is_empty());
    }
}
