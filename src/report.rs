use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// Outcome of a successful conversion
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub total_poems: u64,
    pub collections_processed: u64,
    pub unique_authors: u64,
    pub average_content_length: Option<f64>,
    pub input_bytes: u64,
    pub output_bytes: u64,

    /// Input size minus output size; negative when the database is larger
    pub size_delta_bytes: i64,
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Database Statistics:")?;
        writeln!(f, "   - Total poems: {}", format_number(self.total_poems))?;
        writeln!(f, "   - Collections processed: {}", self.collections_processed)?;
        writeln!(f, "   - Unique authors: {}", self.unique_authors)?;
        match self.average_content_length {
            Some(avg) => writeln!(f, "   - Average content length: {avg:.0} characters")?,
            None => writeln!(f, "   - Average content length: n/a")?,
        }
        writeln!(f, "   - Database size: {}", format_mb(self.output_bytes as f64))?;
        if self.size_delta_bytes >= 0 {
            writeln!(f, "   - Size reduction: {} smaller", format_mb(self.size_delta_bytes as f64))?;
        } else {
            writeln!(f, "   - Size increase: {} larger", format_mb(-self.size_delta_bytes as f64))?;
        }
        write!(f, "Output database: {}", self.output_path.display())
    }
}

/// Format a byte count in megabytes with one decimal
pub fn format_mb(bytes: f64) -> String {
    format!("{:.1} MB", bytes / (1024.0 * 1024.0))
}

/// Format a number with thousands separators
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
