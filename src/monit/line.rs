/// What a single report line holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// `Process 'gitea'`: an unindented kind token followed by a quoted name.
    SectionHeader { kind: &'a str, name: &'a str },
    /// An indented `key<2+ spaces>value` pair.
    Field { key: &'a str, value: &'a str },
    Blank,
    Unrecognized,
}

pub fn classify(line: &str) -> Line<'_> {
    if line.trim().is_empty() {
        return Line::Blank;
    }
    let classified = if line.starts_with(char::is_whitespace) {
        field(line).map(|(key, value)| Line::Field { key, value })
    } else {
        section_header(line).map(|(kind, name)| Line::SectionHeader { kind, name })
    };
    classified.unwrap_or(Line::Unrecognized)
}

fn section_header(line: &str) -> Option<(&str, &str)> {
    let (kind, rest) = line.trim_end().split_once(' ')?;
    if kind.contains(char::is_whitespace) {
        return None;
    }
    let name = rest.strip_prefix('\'')?.strip_suffix('\'')?;
    Some((kind, name))
}

fn field(line: &str) -> Option<(&str, &str)> {
    let body = line.trim_start();
    let mut gap_start = None;
    for (idx, ch) in body.char_indices() {
        if !ch.is_whitespace() {
            gap_start = None;
            continue;
        }
        match gap_start {
            Some(start) => return Some((&body[..start], body[idx..].trim())),
            None => gap_start = Some(idx),
        }
    }
    None
}
