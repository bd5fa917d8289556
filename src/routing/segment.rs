//! Slash-delimited path segmentation.
//!
//! The cursor always points at a delimiter: the character under it is
//! consumed, and the segment runs up to (not including) the next `/`.
//! Starting from cursor `0` on `/a/b` therefore yields `a`, then `b`.
//! A trailing slash produces a final empty segment, so `/a/` and `/a`
//! split differently.

/// Segment delimiter.
pub const SEPARATOR: char = '/';

/// Returns the segment following `cursor` and the cursor for the next call.
///
/// `None` in the second position is the terminal marker: the returned
/// segment is the last one. A cursor at or past the end of `path` yields an
/// empty final segment.
pub fn split(path: &str, cursor: usize) -> (&str, Option<usize>) {
    let Some(delim) = path.get(cursor..).and_then(|rest| rest.chars().next()) else {
        return ("", None);
    };

    let begin = cursor + delim.len_utf8();
    let rest = &path[begin..];
    match rest.find(SEPARATOR) {
        Some(end) => (&rest[..end], Some(begin + end)),
        None => (rest, None),
    }
}

/// Iterator over every segment of a path.
///
/// Always yields at least one segment. Cloning it replays the sequence from
/// the current position.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    path: &'a str,
    cursor: Option<usize>,
}

impl<'a> Segments<'a> {
    pub fn new(path: &'a str) -> Self {
        Self {
            path,
            cursor: Some(0),
        }
    }
}

impl<'a> Iterator for Segments<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        let cursor = self.cursor?;
        let (segment, next) = split(self.path, cursor);
        self.cursor = next;
        Some(segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(path: &str) -> Vec<&str> {
        Segments::new(path).collect()
    }

    #[test]
    fn test_split_cursor_walk() {
        assert_eq!(split("/users/42", 0), ("users", Some(6)));
        assert_eq!(split("/users/42", 6), ("42", None));
    }

    #[test]
    fn test_leading_slash_is_a_delimiter() {
        assert_eq!(collect("/a/b"), vec!["a", "b"]);
        assert_eq!(collect("/a"), vec!["a"]);
    }

    #[test]
    fn test_trailing_slash_yields_empty_segment() {
        assert_eq!(collect("/a/"), vec!["a", ""]);
        assert_ne!(collect("/a/"), collect("/a"));
    }

    #[test]
    fn test_root_and_empty_paths() {
        assert_eq!(collect("/"), vec![""]);
        assert_eq!(collect(""), vec![""]);
        assert_eq!(collect("//"), vec!["", ""]);
    }

    #[test]
    fn test_restartable_from_any_returned_cursor() {
        let path = "/a/bb/ccc";
        let (_, next) = split(path, 0);
        let resumed: Vec<_> = {
            let mut out = Vec::new();
            let mut cursor = next;
            while let Some(c) = cursor {
                let (seg, n) = split(path, c);
                out.push(seg);
                cursor = n;
            }
            out
        };
        assert_eq!(resumed, vec!["bb", "ccc"]);

        // Replaying gives the same answer.
        assert_eq!(split(path, 2), split(path, 2));
    }

    #[test]
    fn test_cursor_out_of_range_is_terminal() {
        assert_eq!(split("/a", 2), ("", None));
        assert_eq!(split("/a", 100), ("", None));
    }

    #[test]
    fn test_multibyte_segments() {
        assert_eq!(collect("/café/ü"), vec!["café", "ü"]);
    }

    #[test]
    fn test_iterator_clone_replays() {
        let mut segments = Segments::new("/x/y/z");
        segments.next();
        let replay = segments.clone();
        assert_eq!(segments.collect::<Vec<_>>(), replay.collect::<Vec<_>>());
    }
}
