pub const FALLBACK_STEM: &str = "untitled";

pub fn sanitize_filename(value: &str) -> String {
    value
        .chars()
        .map(|ch| if is_disallowed_char(ch) { '_' } else { ch })
        .collect()
}

pub fn cleanup_filename(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut prev_underscore = false;

    for ch in value.chars() {
        if ch == '_' {
            if prev_underscore {
                continue;
            }
            prev_underscore = true;
        } else {
            prev_underscore = false;
        }
        out.push(ch);
    }

    out.trim_matches('_').to_string()
}

/// Full stem pipeline: replace, collapse, trim, never empty.
pub fn finalize_stem(rendered: &str) -> String {
    let cleaned = cleanup_filename(&sanitize_filename(rendered));
    if cleaned.is_empty() {
        FALLBACK_STEM.to_string()
    } else {
        cleaned
    }
}

fn is_disallowed_char(ch: char) -> bool {
    matches!(ch, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
