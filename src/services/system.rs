//! System status service
//!
//! CPU and memory readings sampled from `/proc`. CPU usage is computed from
//! two samples ~200ms apart, so the call blocks briefly; handlers run it on
//! a blocking thread.

use std::time::Duration;

use serde::Serialize;

use super::error::ServiceError;

/// Gap between the two CPU samples
const CPU_SAMPLE_INTERVAL: Duration = Duration::from_millis(200);

/// Memory usage snapshot, in bytes
#[derive(Debug, Clone, Serialize)]
pub struct MemoryStatus {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub percent: f64,
}

/// Combined CPU + memory snapshot
#[derive(Debug, Clone, Serialize)]
pub struct SystemStatus {
    pub cpu_percent: f64,
    pub memory: MemoryStatus,
}

/// Aggregate CPU counters from one `/proc/stat` sample
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct CpuSample {
    idle: u64,
    total: u64,
}

/// Parse the aggregate `cpu` line of `/proc/stat`
fn parse_cpu_line(stat: &str) -> Option<CpuSample> {
    let line = stat.lines().find(|l| l.starts_with("cpu "))?;
    let fields: Vec<u64> = line
        .split_whitespace()
        .skip(1)
        .filter_map(|f| f.parse().ok())
        .collect();
    if fields.len() < 5 {
        return None;
    }

    // idle + iowait count as idle time
    let idle = fields[3] + fields.get(4).copied().unwrap_or(0);
    let total: u64 = fields.iter().sum();
    Some(CpuSample { idle, total })
}

/// Extract a field value (kB) from `/proc/meminfo`
fn meminfo_field(meminfo: &str, name: &str) -> Option<u64> {
    meminfo
        .lines()
        .find(|l| l.starts_with(name))?
        .split_whitespace()
        .nth(1)?
        .parse()
        .ok()
}

fn cpu_percent(first: CpuSample, second: CpuSample) -> f64 {
    let total_delta = second.total.saturating_sub(first.total);
    if total_delta == 0 {
        return 0.0;
    }
    let idle_delta = second.idle.saturating_sub(first.idle);
    let busy = total_delta.saturating_sub(idle_delta);
    (busy as f64 / total_delta as f64 * 1000.0).round() / 10.0
}

/// Read the current CPU and memory status
///
/// Blocks for the CPU sampling interval.
#[cfg(target_os = "linux")]
pub fn system_status() -> Result<SystemStatus, ServiceError> {
    let read = |path: &str| {
        std::fs::read_to_string(path)
            .map_err(|e| ServiceError::Backend(format!("reading {}: {}", path, e)))
    };

    let first = parse_cpu_line(&read("/proc/stat")?)
        .ok_or_else(|| ServiceError::Backend("malformed /proc/stat".into()))?;
    std::thread::sleep(CPU_SAMPLE_INTERVAL);
    let second = parse_cpu_line(&read("/proc/stat")?)
        .ok_or_else(|| ServiceError::Backend("malformed /proc/stat".into()))?;

    let meminfo = read("/proc/meminfo")?;
    let total = meminfo_field(&meminfo, "MemTotal:")
        .ok_or_else(|| ServiceError::Backend("malformed /proc/meminfo".into()))?
        * 1024;
    let available = meminfo_field(&meminfo, "MemAvailable:").unwrap_or(0) * 1024;
    let used = total.saturating_sub(available);
    let percent = if total > 0 {
        (used as f64 / total as f64 * 1000.0).round() / 10.0
    } else {
        0.0
    };

    Ok(SystemStatus {
        cpu_percent: cpu_percent(first, second),
        memory: MemoryStatus {
            total,
            available,
            used,
            percent,
        },
    })
}

#[cfg(not(target_os = "linux"))]
pub fn system_status() -> Result<SystemStatus, ServiceError> {
    Err(ServiceError::Unsupported(
        "system status is only wired up on Linux",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAT: &str = "cpu  100 0 100 700 100 0 0 0 0 0\n\
                        cpu0 50 0 50 350 50 0 0 0 0 0\n";

    #[test]
    fn test_parse_cpu_line() {
        let sample = parse_cpu_line(STAT).unwrap();
        assert_eq!(sample.idle, 800);
        assert_eq!(sample.total, 1000);
    }

    #[test]
    fn test_parse_cpu_line_rejects_garbage() {
        assert!(parse_cpu_line("intr 12345\n").is_none());
        assert!(parse_cpu_line("cpu 1 2\n").is_none());
    }

    #[test]
    fn test_cpu_percent_from_deltas() {
        let first = CpuSample {
            idle: 800,
            total: 1000,
        };
        let second = CpuSample {
            idle: 850,
            total: 1100,
        };
        // 100 total delta, 50 idle delta -> 50% busy
        assert_eq!(cpu_percent(first, second), 50.0);
        // No movement between samples reads as 0
        assert_eq!(cpu_percent(first, first), 0.0);
    }

    #[test]
    fn test_meminfo_field() {
        let meminfo = "MemTotal:       16316412 kB\nMemFree:         563432 kB\nMemAvailable:    8000000 kB\n";
        assert_eq!(meminfo_field(meminfo, "MemTotal:"), Some(16316412));
        assert_eq!(meminfo_field(meminfo, "MemAvailable:"), Some(8000000));
        assert_eq!(meminfo_field(meminfo, "SwapTotal:"), None);
    }
}
