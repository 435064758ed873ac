use std::fmt;
use std::time::Duration;

/// How a compression run turned out, relative to the original size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    VeryEffective,
    Effective,
    Unchanged,
    Larger,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::VeryEffective => "very effective compression",
            Verdict::Effective => "effective compression",
            Verdict::Unchanged => "file size unchanged",
            Verdict::Larger => "file grew larger (compression not effective)",
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompressionReport {
    pub original_size: u64,
    pub compressed_size: u64,
    pub elapsed: Duration,
}

impl CompressionReport {
    pub fn new(original_size: u64, compressed_size: u64, elapsed: Duration) -> Self {
        CompressionReport {
            original_size,
            compressed_size,
            elapsed,
        }
    }

    /// Compressed size as a percentage of the original.
    pub fn ratio(&self) -> f64 {
        if self.original_size == 0 {
            return 100.0;
        }
        self.compressed_size as f64 / self.original_size as f64 * 100.0
    }

    pub fn space_saving(&self) -> f64 {
        100.0 - self.ratio()
    }

    /// Bytes saved; negative when the output grew.
    pub fn size_reduction(&self) -> i64 {
        self.original_size as i64 - self.compressed_size as i64
    }

    pub fn verdict(&self) -> Verdict {
        match self.compressed_size.cmp(&self.original_size) {
            std::cmp::Ordering::Equal => Verdict::Unchanged,
            std::cmp::Ordering::Greater => Verdict::Larger,
            std::cmp::Ordering::Less if self.ratio() < 80.0 => Verdict::VeryEffective,
            std::cmp::Ordering::Less => Verdict::Effective,
        }
    }
}

impl fmt::Display for CompressionReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let reduction = self.size_reduction();
        let reduction_shown = if reduction < 0 {
            format!("-{}", format_size(reduction.unsigned_abs()))
        } else {
            format_size(reduction as u64)
        };
        writeln!(f, "Original size:    {} bytes ({})", self.original_size, format_size(self.original_size))?;
        writeln!(f, "Compressed size:  {} bytes ({})", self.compressed_size, format_size(self.compressed_size))?;
        writeln!(f, "Reduction:        {} bytes ({})", reduction, reduction_shown)?;
        writeln!(f, "Ratio:            {}%", two_decimals(self.ratio()))?;
        writeln!(f, "Space saving:     {}%", two_decimals(self.space_saving()))?;
        writeln!(f, "Time:             {} ms", self.elapsed.as_millis())?;
        write!(f, "Verdict:          {}", self.verdict())
    }
}

/// Human-readable size in B, KB or MB (1024-based), at most two decimals.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes} B")
    } else if bytes < MB {
        format!("{} KB", two_decimals(bytes as f64 / KB as f64))
    } else {
        format!("{} MB", two_decimals(bytes as f64 / MB as f64))
    }
}

// 1.50 -> "1.5", 2.00 -> "2"
fn two_decimals(value: f64) -> String {
    let s = format!("{value:.2}");
    s.trim_end_matches('0').trim_end_matches('.').to_string()
}
