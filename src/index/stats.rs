use crate::index::reader::FmIndexReader;
use anyhow::Result;
use std::path::Path;

/// Display index statistics as a table, or as JSON with `json`
pub fn show_stats(index_path: &Path, json: bool) -> Result<()> {
    let Some(reader) = FmIndexReader::open(index_path)? else {
        anyhow::bail!("No index found at {}", index_path.display());
    };
    let stats = reader.index().stats();

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }

    println!("Index Statistics");
    println!("================");
    println!();
    println!("Index location:   {}", index_path.display());
    println!("Rows:             {}", stats.size);
    println!("Document count:   {}", stats.documents);
    println!("Sample interval:  {}", stats.sample_interval);
    println!("Samples:          {}", stats.samples);
    println!("Max char code:    {}", stats.max_char_code);
    println!("Wavelet levels:   {}", stats.bitsize);
    println!("Distinct symbols: {}", stats.distinct_symbols);
    println!("Memory (approx):  {}", format_size(stats.heap_bytes as u64));

    if let Ok(size) = dir_size(index_path) {
        println!("Index size:       {}", format_size(size));
    }

    if let Some(meta) = reader.meta() {
        println!();
        println!("Created:          {}", format_timestamp(meta.created_at));
        if !meta.sources.is_empty() {
            println!("Sources:");
            for source in meta.sources.iter().take(15) {
                println!("  {}", source);
            }
            if meta.sources.len() > 15 {
                println!("  ... and {} more", meta.sources.len() - 15);
            }
        }
    }

    Ok(())
}

/// Total size of the files directly inside an index directory
fn dir_size(path: &Path) -> std::io::Result<u64> {
    let mut size = 0;
    for entry in std::fs::read_dir(path)? {
        let entry = entry?;
        if entry.path().is_file() {
            size += entry.metadata()?.len();
        }
    }
    Ok(size)
}

/// Format byte size to human readable
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

fn format_timestamp(ts: u64) -> String {
    use std::time::{Duration, UNIX_EPOCH};
    let datetime = UNIX_EPOCH + Duration::from_secs(ts);
    format!("{:?}", datetime)
}
