//! Locating a JSON object inside free text.
//!
//! Text-generation services wrap their JSON in prose or code fences. The
//! first balanced `{...}` span is taken; braces inside JSON strings do not
//! count towards the balance.

/// Return the first balanced `{...}` span in `text`.
///
/// A `{` that is never closed (truncated output) is skipped and the scan
/// resumes at the next `{`.
pub fn extract_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| balanced_end(&text[start..]).map(|end| &text[start..start + end]))
}

/// Byte length of the balanced object at the start of `s`, which must begin
/// with `{`.
fn balanced_end(s: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (i, c) in s.char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(i + c.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
