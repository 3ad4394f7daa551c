//! Display formatting for the presentation layer

/// Format remaining milliseconds as `MM:SS`, dropping partial seconds
pub fn format_clock(ms: u64) -> String {
    let total_seconds = ms / 1000;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Format a lap counter as `Lap 2 / 3`
pub fn format_lap(current_lap: u32, total_laps: u32) -> String {
    format!("Lap {} / {}", current_lap, total_laps)
}

/// Format a duration as `1h 2m 3s`, omitting leading zero units
pub fn format_uptime(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let seconds = seconds % 60;

    if hours > 0 {
        format!("{}h {}m {}s", hours, minutes, seconds)
    } else if minutes > 0 {
        format!("{}m {}s", minutes, seconds)
    } else {
        format!("{}s", seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_floors_partial_seconds() {
        assert_eq!(format_clock(0), "00:00");
        assert_eq!(format_clock(999), "00:00");
        assert_eq!(format_clock(10_000), "00:10");
        assert_eq!(format_clock(61_500), "01:01");
        assert_eq!(format_clock(6_000_000), "100:00");
    }

    #[test]
    fn lap_label() {
        assert_eq!(format_lap(2, 3), "Lap 2 / 3");
    }

    #[test]
    fn uptime_units() {
        assert_eq!(format_uptime(5), "5s");
        assert_eq!(format_uptime(125), "2m 5s");
        assert_eq!(format_uptime(3725), "1h 2m 5s");
    }
}
