use crate::prelude::*;

/// One physical line of a script, with its position in the source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceLine<'s> {
    /// 1-based line number.
    pub number: usize,
    /// The line as written, without the line terminator.
    pub text: &'s str,
    /// Character offsets of the line within the whole script.
    pub span: Span,
}

impl SourceLine<'_> {
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Splits a script into lines. Spans are counted in chars, which is what
/// ariadne expects when rendering reports.
pub fn source_lines(code: &str) -> Vec<SourceLine<'_>> {
    let mut offset = 0;

    code.split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let text = raw.strip_suffix('\r').unwrap_or(raw);
            let len = text.chars().count();
            let line = SourceLine {
                number: i + 1,
                text,
                span: offset..offset + len,
            };
            offset += raw.chars().count() + 1;
            line
        })
        .collect()
}

/// Splits `s` on `sep`, ignoring separators inside single or double quotes so
/// that literals like `','` and `'='` survive.
pub fn split_top_level(s: &str, sep: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in s.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == sep => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            None => {}
        }
    }
    parts.push(&s[start..]);

    parts
}

pub fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lines_carry_char_spans() {
        let lines = source_lines("BEGIN CODE\r\nINT é\nEND CODE");
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].text, "BEGIN CODE");
        assert_eq!(lines[0].span, 0..10);
        assert_eq!(lines[1].text, "INT é");
        assert_eq!(lines[1].span, 12..17);
        assert_eq!(lines[2].number, 3);
        assert_eq!(lines[2].span, 18..26);
    }

    #[test]
    fn quoted_separators_are_kept() {
        assert_eq!(
            split_top_level("a = ',', b, c='='", ','),
            vec!["a = ','", " b", " c='='"]
        );
        assert_eq!(split_top_level("c='='", '='), vec!["c", "'='"]);
        assert_eq!(split_top_level("x,", ','), vec!["x", ""]);
    }

    #[test]
    fn whitespace_is_removed_everywhere() {
        assert_eq!(strip_whitespace(" a b\t"), "ab");
    }
}
