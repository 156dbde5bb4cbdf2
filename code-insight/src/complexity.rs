//! Deterministic, model-independent complexity heuristic.

use std::sync::OnceLock;

use regex::Regex;

const LENGTH_WEIGHT_CAP: f64 = 60.0;
const IMPORT_WEIGHT_CAP: f64 = 40.0;
const POINTS_PER_IMPORT: f64 = 8.0;

fn import_line_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^import\s+").expect("import pattern is a valid regex"))
}

/// Counts lines that start with an `import` statement.
pub fn count_imports(code: &str) -> usize {
    import_line_re().find_iter(code).count()
}

/// Scores `code` in `0..=100`: up to 60 points for length (60 at 1000 chars)
/// and up to 40 for import lines (8 each).
pub fn complexity_score(code: &str) -> u8 {
    let len = code.chars().count() as f64;
    let imports = count_imports(code) as f64;

    let length_part = (len / 1000.0 * 60.0).min(LENGTH_WEIGHT_CAP);
    let import_part = (imports * POINTS_PER_IMPORT).min(IMPORT_WEIGHT_CAP);

    (length_part + import_part).round().clamp(0.0, 100.0) as u8
}
