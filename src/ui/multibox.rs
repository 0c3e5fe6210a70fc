/// Options whose text contains the search term, ignoring case. A blank term
/// keeps everything.
pub fn matching_options<'a>(options: &'a [String], term: &str) -> Vec<&'a String> {
    let needle = term.trim().to_lowercase();
    options
        .iter()
        .filter(|option| needle.is_empty() || option.to_lowercase().contains(&needle))
        .collect()
}

/// Line shown under a multi-select box.
pub fn status_text(total: usize, visible: usize, term: &str, selected: usize) -> String {
    if total == 0 {
        return "Nenhum resultado".to_string();
    }
    let term = term.trim();
    let term_text = if term.is_empty() {
        String::new()
    } else {
        format!(" para \"{term}\"")
    };
    format!("Mostrando {visible}/{total}{term_text} • Selecionados {selected}")
}

/// Render key of a multi-select box. Changes on every clear so the box
/// remounts with an empty search term.
pub fn box_key(filter_id: &str, clear_revision: u64) -> String {
    format!("{filter_id}#{clear_revision}")
}
