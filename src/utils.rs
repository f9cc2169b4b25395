/// Formats a byte count as kilobytes to 2 decimal places, e.g. `"1.50 KB"`.
pub fn fmt_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}
