/// Format a second count as zero-padded `HH:MM:SS`.
///
/// The hour field keeps widening past 99 (`100:00:00`), so very large
/// totals remain readable and internally consistent.
pub fn format_duration(total_seconds: u64) -> String {
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
}
