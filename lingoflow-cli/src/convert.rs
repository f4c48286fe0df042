use std::path::Path;

use lingoflow::{CodecRegistry, ExportEntry, FormatCodec};
use tracing::info;

use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub input_format: Option<String>,
    pub output_format: Option<String>,
}

/// Picks the codec named by `explicit`, falling back to the file extension.
pub fn resolve_codec<'r>(
    registry: &'r CodecRegistry,
    explicit: Option<&str>,
    path: &Path,
) -> Result<&'r dyn FormatCodec, String> {
    let codec = match explicit {
        Some(name) => registry.get_by_name(name),
        None => registry.for_path(path),
    };
    codec.map_err(|e| e.to_string())
}

/// Reads `input` and writes its entries to `output` as source text.
///
/// The output format is `--to`, then the output extension, then the
/// `[export] format` config default.
pub fn run_convert_command(
    input: &str,
    output: &str,
    options: &ConvertOptions,
    config: &Config,
) -> Result<usize, String> {
    let registry = CodecRegistry::with_defaults();
    let input_path = Path::new(input);
    let output_path = Path::new(output);

    let reader = resolve_codec(&registry, options.input_format.as_deref(), input_path)?;
    let writer = match options.output_format.as_deref() {
        Some(name) => registry.get_by_name(name).map_err(|e| e.to_string())?,
        None => match (registry.for_path(output_path), config.export.format.as_deref()) {
            (Ok(codec), _) => codec,
            (Err(_), Some(name)) => registry.get_by_name(name).map_err(|e| e.to_string())?,
            (Err(e), None) => return Err(e.to_string()),
        },
    };

    let entries = reader
        .read_from_with(input_path, &config.parse_options())
        .map_err(|e| format!("Failed to read {}: {}", input, e))?;
    let count = entries.len();
    let entries: Vec<ExportEntry> = entries.into_iter().map(ExportEntry::from).collect();
    writer
        .write_to(output_path, &entries)
        .map_err(|e| format!("Failed to write {}: {}", output, e))?;

    info!(
        count,
        from = %reader.format_type(),
        to = %writer.format_type(),
        "converted"
    );
    Ok(count)
}
