//! Item identifier to file name.

const NAME_MAX: usize = 255;
/// Room left for the `-<n>` collision suffix and the `.json.part` extension.
const STEM_MAX: usize = NAME_MAX - 32;

/// Turns an item identifier into a safe file stem.
///
/// - Replaces NUL, `/`, `\`, whitespace and control characters with `_`
/// - Trims leading/trailing dots and underscores
/// - Collapses consecutive underscores
/// - Limits length so the final name stays under Linux NAME_MAX
///
/// Returns `"item"` when nothing usable is left.
pub fn file_stem_for_item(item: &str) -> String {
    let mut out = String::with_capacity(item.len());
    let mut prev_underscore = false;

    for c in item.chars() {
        let replacement = if c == '\0' || c == '/' || c == '\\' || c.is_control() || c.is_whitespace()
        {
            '_'
        } else {
            c
        };

        if replacement == '_' {
            if !prev_underscore {
                out.push('_');
            }
            prev_underscore = true;
        } else {
            out.push(replacement);
            prev_underscore = false;
        }
    }

    let trimmed = out.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        return "item".to_string();
    }

    if trimmed.len() > STEM_MAX {
        let mut take = STEM_MAX;
        while take > 0 && !trimmed.is_char_boundary(take) {
            take -= 1;
        }
        trimmed[..take].to_string()
    } else {
        trimmed.to_string()
    }
}
