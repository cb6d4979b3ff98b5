//! Natural version ordering
//!
//! Tags are split into alternating text and digit runs, starting with a
//! (possibly empty) text run. Text runs compare lexically and digit runs
//! numerically, so `v10` sorts after `v9`.

use std::cmp::Ordering;

#[derive(Debug, PartialEq, Eq)]
enum Run<'a> {
    Text(&'a str),
    Digits(&'a str),
}

fn runs(tag: &str) -> Vec<Run<'_>> {
    let mut out = Vec::new();
    let mut rest = tag;
    let mut digits = false;

    loop {
        let end = rest
            .find(|c: char| c.is_ascii_digit() != digits)
            .unwrap_or(rest.len());
        let (run, tail) = rest.split_at(end);
        out.push(if digits { Run::Digits(run) } else { Run::Text(run) });
        if tail.is_empty() {
            break;
        }
        rest = tail;
        digits = !digits;
    }
    out
}

fn compare_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Compare two tags by natural version order.
///
/// Tags that only differ in leading zeros fall back to plain string order
/// so the ordering stays total.
pub fn compare(a: &str, b: &str) -> Ordering {
    let (runs_a, runs_b) = (runs(a), runs(b));

    for (x, y) in runs_a.iter().zip(&runs_b) {
        let ordering = match (x, y) {
            (Run::Text(x), Run::Text(y)) => x.cmp(y),
            (Run::Digits(x), Run::Digits(y)) => compare_digits(x, y),
            // runs alternate from the same starting kind, so kinds line up
            _ => Ordering::Equal,
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    runs_a.len().cmp(&runs_b.len()).then_with(|| a.cmp(b))
}

/// Sort tags newest first.
pub fn sort_descending(tags: &mut [String]) {
    tags.sort_by(|a, b| compare(b, a));
}

/// The newest tag.
pub fn max<'a>(tags: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
    tags.into_iter().max_by(|a, b| compare(a, b))
}
