//! Splits text into bounded pieces for backends with an input limit.

pub const PARAGRAPH_SEPARATOR: &str = "\n\n";

/// Splits `text` into chunks of at most `max_length` characters.
///
/// Paragraphs (separated by a blank line) are packed greedily. When every
/// paragraph fits, `chunks.join("\n\n")` reproduces the input. A paragraph
/// longer than `max_length` is sliced into fixed-width pieces of its own.
/// Text without a blank line is sliced the same way, so `chunks.concat()`
/// is the input.
pub fn split(text: &str, max_length: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    let max_length = max_length.max(1);
    if !text.contains(PARAGRAPH_SEPARATOR) {
        return fixed_width(text, max_length);
    }

    let sep_len = PARAGRAPH_SEPARATOR.len();
    let mut chunks = Vec::new();
    let mut current: Option<(String, usize)> = None;
    for para in text.split(PARAGRAPH_SEPARATOR) {
        let para_len = para.chars().count();
        if para_len > max_length {
            if let Some((buf, _)) = current.take() {
                if !buf.is_empty() {
                    chunks.push(buf);
                }
            }
            chunks.extend(fixed_width(para, max_length));
            continue;
        }
        current = Some(match current.take() {
            None => (para.to_string(), para_len),
            Some((buf, len)) if !buf.is_empty() && para_len > 0 && len + sep_len + para_len > max_length => {
                chunks.push(buf);
                (para.to_string(), para_len)
            }
            Some((mut buf, len)) => {
                buf.push_str(PARAGRAPH_SEPARATOR);
                buf.push_str(para);
                (buf, len + sep_len + para_len)
            }
        });
    }
    if let Some((buf, _)) = current {
        if !buf.is_empty() {
            chunks.push(buf);
        }
    }
    chunks
}

fn fixed_width(text: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}
