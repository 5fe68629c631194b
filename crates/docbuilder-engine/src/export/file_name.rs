use regex::Regex;
use std::sync::OnceLock;

fn invalid_chars() -> &'static Regex {
    static INVALID_CHARS: OnceLock<Regex> = OnceLock::new();
    INVALID_CHARS.get_or_init(|| Regex::new(r"[^a-z0-9-]").expect("Invalid file name regex"))
}

fn dash_runs() -> &'static Regex {
    static DASH_RUNS: OnceLock<Regex> = OnceLock::new();
    DASH_RUNS.get_or_init(|| Regex::new(r"-+").expect("Invalid dash regex"))
}

fn fold_accent(c: char) -> char {
    match c {
        'ç' => 'c',
        'á' | 'à' | 'ã' | 'â' => 'a',
        'é' | 'ê' => 'e',
        'í' => 'i',
        'ó' | 'ô' | 'õ' => 'o',
        'ú' | 'ü' => 'u',
        'ñ' => 'n',
        other => other,
    }
}

/// Turn arbitrary text into a lowercase, dash-separated file/URL name
pub fn normalize(name: &str) -> String {
    let folded: String = name.to_lowercase().chars().map(fold_accent).collect();
    let dashed = invalid_chars().replace_all(&folded, "-");
    let collapsed = dash_runs().replace_all(&dashed, "-");
    collapsed.trim_matches('-').to_string()
}

/// Make a title safe to use as an archive entry name
///
/// Path separators would create directories inside the archive.
pub fn entry_stem(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}

/// Human-readable byte count for size estimates
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    }
}
