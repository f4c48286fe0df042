use lingoflow::CanonicalEntry;
use unicode_width::UnicodeWidthStr;

/// Print parsed entries as an aligned `key  value` listing, or as JSON.
pub fn print_view(entries: &[CanonicalEntry], json_output: bool) -> Result<(), String> {
    if json_output {
        let out = serde_json::to_string_pretty(entries).map_err(|e| e.to_string())?;
        println!("{}", out);
        return Ok(());
    }
    for line in render_lines(entries) {
        println!("{}", line);
    }
    Ok(())
}

/// One line per entry, with the value column aligned on display width so
/// CJK keys line up with ASCII ones.
pub fn render_lines(entries: &[CanonicalEntry]) -> Vec<String> {
    let width = entries
        .iter()
        .map(|e| UnicodeWidthStr::width(e.key.as_str()))
        .max()
        .unwrap_or(0);

    entries
        .iter()
        .map(|entry| {
            let pad = width - UnicodeWidthStr::width(entry.key.as_str());
            let mut line = format!("{}{}  {}", entry.key, " ".repeat(pad), entry.value);
            if let Some(description) = &entry.description {
                line.push_str(&format!("  # {}", description));
            }
            if !entry.translatable {
                line.push_str("  [non-translatable]");
            }
            line
        })
        .collect()
}
