//! Diagnostic fragments
//!
//! A fragment is plain text describing what a value looked like at one
//! schema position. A highlight layer wraps text in `>>` / `<<`; nesting
//! layers marks how deep inside a structure the wrong part sits.
//!
//! Composition per schema level:
//! - scalar leaves, containers, function types: embed and add one layer
//! - single-element tuples: embed the element's fragment as-is
//! - multi-element tuples: place every position side by side, no layer
//!
//! Colour is applied by callers on top of [`segments`]; the plain text
//! never changes.

use crate::Error;

pub const HIGHLIGHT_OPEN: &str = ">>";
pub const HIGHLIGHT_CLOSE: &str = "<<";

/// Wrap `s` in one highlight layer
pub fn highlight(s: &str) -> String {
    format!("{}{}{}", HIGHLIGHT_OPEN, s, HIGHLIGHT_CLOSE)
}

/// `[..<elem>..]`-style container with the failing element highlighted
pub fn container(open: char, element: &str, close: char) -> String {
    highlight(&format!("{}..{}..{}", open, highlight(element), close))
}

/// One side of a dict entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side<'a> {
    /// The side matched; shown as its schema text
    Passed(&'a str),
    /// The side failed; shown as its fragment, highlighted
    Failed(&'a str),
}

impl Side<'_> {
    fn render(self) -> String {
        match self {
            Side::Passed(span) => span.to_string(),
            Side::Failed(fragment) => highlight(fragment),
        }
    }
}

/// `{..<key>:<value>..}` for a failing dict entry
pub fn dict_entry(key: Side<'_>, value: Side<'_>) -> String {
    highlight(&format!("{{..{}:{}..}}", key.render(), value.render()))
}

/// `(<elem>,)` for a failing single-element tuple
pub fn single(element: &str) -> String {
    format!("({},)", element)
}

/// A single-element tuple slot that held nothing
pub fn missing_element() -> String {
    single(&highlight("_"))
}

/// Wildcard tuple of the given arity, e.g. `(_,_,_)` or `(_,)`
pub fn wildcard_tuple(arity: usize) -> String {
    let body = match arity {
        0 => String::new(),
        1 => "_,".to_string(),
        n => vec!["_"; n].join(","),
    };
    highlight(&format!("({})", body))
}

/// Positions of a multi-element tuple, joined without an extra layer
pub fn positions(parts: &[String]) -> String {
    format!("({})", parts.join(","))
}

/// Error for a failed input side
pub fn input_mismatch(expected: &str, got: String) -> Error {
    Error::InputMismatch {
        expected: expected.to_string(),
        got,
    }
}

/// Error for a failed output side
pub fn output_mismatch(expected: &str, got: String) -> Error {
    Error::OutputMismatch {
        expected: expected.to_string(),
        got,
    }
}

/// A run of text at a fixed highlight depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub depth: usize,
    pub text: &'a str,
}

/// Split a message into runs of equal highlight depth
///
/// Markers belong to the layer they open or close, so a colouring pass
/// can style them together with their contents.
pub fn segments(message: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut i = 0usize;

    while i < message.len() {
        let rest = &message[i..];
        if rest.starts_with(HIGHLIGHT_OPEN) {
            push_run(&mut out, message, start, i, depth);
            depth += 1;
            push_run(&mut out, message, i, i + HIGHLIGHT_OPEN.len(), depth);
            i += HIGHLIGHT_OPEN.len();
            start = i;
        } else if rest.starts_with(HIGHLIGHT_CLOSE) && depth > 0 {
            push_run(&mut out, message, start, i, depth);
            push_run(&mut out, message, i, i + HIGHLIGHT_CLOSE.len(), depth);
            depth -= 1;
            i += HIGHLIGHT_CLOSE.len();
            start = i;
        } else {
            i += rest.chars().next().map_or(1, char::len_utf8);
        }
    }
    push_run(&mut out, message, start, message.len(), depth);
    out
}

fn push_run<'a>(out: &mut Vec<Segment<'a>>, message: &'a str, start: usize, end: usize, depth: usize) {
    if start < end {
        out.push(Segment {
            depth,
            text: &message[start..end],
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight() {
        assert_eq!(highlight("int"), ">>int<<");
        assert_eq!(highlight(&highlight("int")), ">>>>int<<<<");
    }

    #[test]
    fn test_container_layers() {
        assert_eq!(container('[', ">>str<<", ']'), ">>[..>>>>str<<<<..]<<");
        assert_eq!(container('{', ">>int<<", '}'), ">>{..>>>>int<<<<..}<<");
    }

    #[test]
    fn test_dict_entry_sides() {
        assert_eq!(
            dict_entry(Side::Passed("int"), Side::Failed(">>int<<")),
            ">>{..int:>>>>int<<<<..}<<"
        );
        assert_eq!(
            dict_entry(Side::Failed(">>str<<"), Side::Passed("str")),
            ">>{..>>>>str<<<<:str..}<<"
        );
    }

    #[test]
    fn test_tuple_shapes() {
        assert_eq!(single(">>int<<"), "(>>int<<,)");
        assert_eq!(missing_element(), "(>>_<<,)");
        assert_eq!(wildcard_tuple(0), ">>()<<");
        assert_eq!(wildcard_tuple(1), ">>(_,)<<");
        assert_eq!(wildcard_tuple(3), ">>(_,_,_)<<");
        assert_eq!(
            positions(&["int".to_string(), ">>str<<".to_string()]),
            "(int,>>str<<)"
        );
    }

    #[test]
    fn test_segments_track_depth() {
        let segs = segments("(>>[..>>>>str<<<<..]<<,)");
        let depths: Vec<(usize, &str)> = segs.iter().map(|s| (s.depth, s.text)).collect();
        assert_eq!(
            depths,
            vec![
                (0, "("),
                (1, ">>"),
                (1, "[.."),
                (2, ">>"),
                (3, ">>"),
                (3, "str"),
                (3, "<<"),
                (2, "<<"),
                (1, "..]"),
                (1, "<<"),
                (0, ",)"),
            ]
        );
    }

    #[test]
    fn test_segments_preserve_text() {
        let message = "expected input is `(int:str,int)`, but got `(>>{..int:>>>>int<<<<..}<<,int)`";
        let joined: String = segments(message).iter().map(|s| s.text).collect();
        assert_eq!(joined, message);
    }

    #[test]
    fn test_segments_plain_text() {
        let segs = segments("no markers -> here");
        assert_eq!(segs, vec![Segment { depth: 0, text: "no markers -> here" }]);
    }

    #[test]
    fn test_segments_skip_empty_runs() {
        assert!(segments("").is_empty());
        assert_eq!(
            segments(">><<"),
            vec![
                Segment { depth: 1, text: ">>" },
                Segment { depth: 1, text: "<<" },
            ]
        );
        assert!(segments(">>int<<").iter().all(|s| !s.text.is_empty()));
    }
}
