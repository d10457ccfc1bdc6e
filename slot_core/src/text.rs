//! Character-offset string helpers.
//!
//! Caret offsets count characters, not bytes; these helpers keep the
//! engine correct for non-ASCII field text.

pub(crate) fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn byte_index(s: &str, char_index: usize) -> usize {
    s.char_indices()
        .nth(char_index)
        .map(|(b, _)| b)
        .unwrap_or(s.len())
}

pub(crate) fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

pub(crate) fn suffix(s: &str, n: usize) -> String {
    s.chars().skip(n).collect()
}

pub(crate) fn substring(s: &str, from: usize, to: usize) -> String {
    s.chars().skip(from).take(to.saturating_sub(from)).collect()
}

pub(crate) fn insert_char_at(s: &mut String, char_index: usize, c: char) {
    let b = byte_index(s, char_index);
    s.insert(b, c);
}

pub(crate) fn remove_char_at(s: &mut String, char_index: usize) {
    let b = byte_index(s, char_index);
    if b < s.len() {
        s.remove(b);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_offsets_are_not_bytes() {
        let mut s = String::from("aéb");
        assert_eq!(char_len(&s), 3);
        assert_eq!(substring(&s, 1, 3), "éb");
        insert_char_at(&mut s, 2, 'x');
        assert_eq!(s, "aéxb");
        remove_char_at(&mut s, 1);
        assert_eq!(s, "axb");
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        let mut s = String::from("ab");
        assert_eq!(substring(&s, 1, 9), "b");
        remove_char_at(&mut s, 5);
        assert_eq!(s, "ab");
    }
}
