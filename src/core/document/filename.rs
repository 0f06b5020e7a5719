/// Derive the output filename for a source file path.
///
/// Leading and trailing `/`, `\` and `.` characters are trimmed, remaining `\`
/// separators collapse to `_`, and the base name of the last `/` segment loses
/// its extension before `.html` is appended. Cross-reference links are built
/// from this value, so it must stay deterministic.
pub fn generate_filename(path: &str) -> String {
    let trimmed = path.trim_matches(|c| c == '/' || c == '\\' || c == '.');
    let flattened = trimmed.replace('\\', "_");
    let base = flattened.rsplit('/').next().unwrap_or_default();
    let stem = match base.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem,
        _ => base,
    };
    format!("{}.html", stem)
}
