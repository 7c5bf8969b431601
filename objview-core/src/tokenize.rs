//! Line tokenizers for OBJ directives

/// Split `line` on `delim`, keeping empty entries.
///
/// Face references depend on this: `1//3` must yield `["1", "", "3"]` so the
/// missing texture coordinate stays in its slot. A trailing delimiter does not
/// produce a trailing empty entry, matching a stream-based `getline` split.
pub fn split(line: &str, delim: char) -> Vec<&str> {
    if line.is_empty() {
        return Vec::new();
    }
    let body = line.strip_suffix(delim).unwrap_or(line);
    body.split(delim).collect()
}

/// Split `line` on `delim`, dropping empty entries.
///
/// Runs of delimiters and leading/trailing delimiters are tolerated.
pub fn split_nonempty(line: &str, delim: char) -> Vec<&str> {
    line.split(delim).filter(|token| !token.is_empty()).collect()
}
