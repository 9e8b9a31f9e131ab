//! Title line tokenizer
//!
//! A passage title line, marker stripped, reads
//! `<title>[ [<tags>]][ <metaBlob>]`. A single left-to-right scan splits
//! it into the three raw segments. A backslash escapes the following
//! character in any segment; the meta segment runs to end of line and is
//! captured verbatim.

/// Raw segments of one title line, before metadata decoding
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TitleParts {
    /// Trimmed title text, escape sequences kept verbatim
    pub title: String,
    /// Trimmed tag segment with its first and last character removed, an
    /// inherited quirk of the format (see [`split_title_line`])
    pub tags_part: String,
    /// Trimmed metadata blob, `{` included when present
    pub meta_part: String,
}

enum ScanState {
    Title,
    Tags,
}

/// Split a title line (without its `::` marker) into raw segments.
///
/// In the title, an unescaped `[` opens the tag segment and an unescaped
/// `{` opens the meta segment directly. In the tag segment, an unescaped
/// `]` closes it; the meta segment starts at the following character.
/// Escaped delimiters stay in their segment, backslash included, so a
/// reserialized title matches the original bytes.
///
/// The tag segment keeps a quirk of the format this tooling has to stay
/// compatible with: after trimming, its first and last character are
/// dropped before the list is split on spaces. `[bar baz]` therefore
/// yields the tag text `ar ba`, and an absent segment yields the empty
/// string (which splits into one empty tag and reserializes as ` []`).
pub fn split_title_line(line: &str) -> TitleParts {
    let mut title = String::new();
    let mut tag_buf = String::new();
    let mut meta_raw = "";
    let mut state = ScanState::Title;

    let mut chars = line.char_indices();
    while let Some((idx, ch)) = chars.next() {
        if ch == '\\' {
            let buf = match state {
                ScanState::Title => &mut title,
                ScanState::Tags => &mut tag_buf,
            };
            buf.push(ch);
            if let Some((_, escaped)) = chars.next() {
                buf.push(escaped);
            }
            continue;
        }

        match state {
            ScanState::Title => match ch {
                '[' => state = ScanState::Tags,
                '{' => {
                    meta_raw = &line[idx..];
                    break;
                }
                _ => title.push(ch),
            },
            ScanState::Tags => {
                if ch == ']' {
                    meta_raw = &line[idx + 1..];
                    break;
                }
                tag_buf.push(ch);
            }
        }
    }

    TitleParts {
        title: title.trim().to_string(),
        tags_part: strip_outer_chars(tag_buf.trim()).to_string(),
        meta_part: meta_raw.trim().to_string(),
    }
}

// Removes the first and last character, whatever they are. Empty and
// one-character inputs collapse to the empty string.
fn strip_outer_chars(s: &str) -> &str {
    let mut chars = s.chars();
    chars.next();
    chars.next_back();
    chars.as_str()
}
