use lingoflow::CodecRegistry;

/// `identifier  .extension` for every registered codec.
pub fn format_lines(registry: &CodecRegistry) -> Vec<String> {
    registry
        .formats()
        .map(|format| format!("{:<8}.{}", format.to_string(), format.extension()))
        .collect()
}

pub fn print_formats() {
    for line in format_lines(&CodecRegistry::with_defaults()) {
        println!("{}", line);
    }
}
