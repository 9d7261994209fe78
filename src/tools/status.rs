//! Status Tool
//!
//! Runtime status information and usage counters for the conversion service.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;
use sysinfo::{Pid, ProcessesToUpdate, System};

use crate::build_info::BuildInfo;

/// Conversion instructions for AI assistants
pub const CONVERSION_INSTRUCTIONS: &str = r#"
# Temperature Conversion Instructions

## Units

| Unit | Accepted names | Absolute zero |
|------|----------------|---------------|
| Celsius | `celsius`, `c`, `°c`, `degc` | -273.15 |
| Fahrenheit | `fahrenheit`, `f`, `°f`, `degf` | -459.67 |
| Kelvin | `kelvin`, `k` | 0 |

Unit names are case-insensitive and surrounding whitespace is ignored.

Values below absolute zero in their own unit are rejected. Absolute zero itself is accepted.

## Precision Contexts

| Context | Rounding |
|---------|----------|
| consumer | 2 decimal places |
| medical | 3 decimal places |
| industrial | 4 decimal places |
| scientific | 15 significant digits (default) |

Rounding is applied once, after conversion. Converting a value to its own unit
returns it unchanged, with no rounding.

## Single Conversion

```
convert_temperature(value: 25.123456, unit: "celsius", target_unit: "fahrenheit", precision: "consumer")
```
→ `converted.value` is 77.22

## Batch Conversion

Use `batch_convert_temperatures` when converting more than one value. Each item
carries its own unit; all items share the target unit and precision.

```
batch_convert_temperatures(
  items: [
    { value: 0, unit: "celsius" },
    { value: 98.6, unit: "fahrenheit" }
  ],
  target_unit: "kelvin"
)
```

- Results come back in the same order as the items.
- If any item is invalid the whole batch fails and the error names the item `index`.
- Items are checked in order. For each item the value, its unit, the target unit
  and the absolute-zero bound are checked before moving on, so the error reported
  is the first problem of the first bad item.
- A batch must contain at least one item and no more than the configured limit
  (see `list_temperature_units`).

## Errors

Failed calls return a problem-details body:

| type | status | meaning |
|------|--------|---------|
| /problems/invalid-value | 400 | value is NaN or infinite |
| /problems/invalid-unit | 400 | unknown unit name |
| /problems/invalid-precision | 400 | unknown precision context |
| /problems/below-absolute-zero | 422 | physically impossible temperature |
| /problems/out-of-range | 400 | result does not fit in a 64-bit float |
| /problems/empty-batch | 400 | batch has no items |
| /problems/batch-too-large | 400 | batch exceeds the limit |
| /problems/internal-error | 500 | the service failed to encode its response |

Only internal-error is worth retrying. Every other type needs the input fixed.
"#;

/// Runtime status of the conversion service
#[derive(Debug, Clone, Serialize)]
pub struct ServiceStatus {
    /// Build information
    pub build_number: u64,
    pub build_timestamp: &'static str,
    pub version: &'static str,
    pub api_version: &'static str,

    /// Limits
    pub max_batch_size: usize,

    /// Usage since startup
    pub conversions: u64,
    pub batches: u64,
    pub batch_items: u64,
    pub rejected_requests: u64,

    /// Process information
    pub uptime_seconds: u64,
    pub process_id: u32,
    pub memory_usage_bytes: u64,
}

/// Status tracker for collecting runtime information
///
/// Counters are atomics so concurrent tool calls never wait on each other.
pub struct StatusTracker {
    start_time: Instant,
    max_batch_size: usize,
    next_request_id: AtomicU64,
    conversions: AtomicU64,
    batches: AtomicU64,
    batch_items: AtomicU64,
    rejected: AtomicU64,
}

impl StatusTracker {
    pub fn new(max_batch_size: usize) -> Self {
        Self {
            start_time: Instant::now(),
            max_batch_size,
            next_request_id: AtomicU64::new(1),
            conversions: AtomicU64::new(0),
            batches: AtomicU64::new(0),
            batch_items: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
        }
    }

    /// Allocate the next request correlation id
    pub fn next_request_id(&self) -> u64 {
        self.next_request_id.fetch_add(1, Ordering::Relaxed)
    }

    pub fn record_conversion(&self) {
        self.conversions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_batch(&self, items: usize) {
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.batch_items.fetch_add(items as u64, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current status
    pub fn get_status(&self) -> ServiceStatus {
        let build_info = BuildInfo::current();

        let pid = std::process::id();
        let mut sys = System::new();
        sys.refresh_processes(ProcessesToUpdate::Some(&[Pid::from_u32(pid)]));

        let memory_usage_bytes = sys
            .process(Pid::from_u32(pid))
            .map(|p| p.memory())
            .unwrap_or(0);

        ServiceStatus {
            build_number: build_info.build_number,
            build_timestamp: build_info.build_timestamp,
            version: build_info.version,
            api_version: build_info.api_version,
            max_batch_size: self.max_batch_size,
            conversions: self.conversions.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            batch_items: self.batch_items.load(Ordering::Relaxed),
            rejected_requests: self.rejected.load(Ordering::Relaxed),
            uptime_seconds: self.start_time.elapsed().as_secs(),
            process_id: pid,
            memory_usage_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversion::TemperatureUnit;

    #[test]
    fn test_instructions_list_every_alias() {
        let aliases = [
            ("celsius", TemperatureUnit::Celsius),
            ("c", TemperatureUnit::Celsius),
            ("°c", TemperatureUnit::Celsius),
            ("degc", TemperatureUnit::Celsius),
            ("fahrenheit", TemperatureUnit::Fahrenheit),
            ("f", TemperatureUnit::Fahrenheit),
            ("°f", TemperatureUnit::Fahrenheit),
            ("degf", TemperatureUnit::Fahrenheit),
            ("kelvin", TemperatureUnit::Kelvin),
            ("k", TemperatureUnit::Kelvin),
        ];
        for (alias, unit) in aliases {
            assert!(CONVERSION_INSTRUCTIONS.contains(&format!("`{}`", alias)), "{}", alias);
            assert_eq!(TemperatureUnit::from_str(alias), Some(unit));
        }
    }

    #[test]
    fn test_instructions_list_every_problem_type() {
        for problem_type in [
            "/problems/invalid-value",
            "/problems/invalid-unit",
            "/problems/invalid-precision",
            "/problems/below-absolute-zero",
            "/problems/out-of-range",
            "/problems/empty-batch",
            "/problems/batch-too-large",
            "/problems/internal-error",
        ] {
            assert!(CONVERSION_INSTRUCTIONS.contains(problem_type), "{}", problem_type);
        }
    }

    #[test]
    fn test_request_ids_increase() {
        let tracker = StatusTracker::new(10);
        let first = tracker.next_request_id();
        let second = tracker.next_request_id();
        assert_eq!(first, 1);
        assert_eq!(second, 2);
    }

    #[test]
    fn test_counters() {
        let tracker = StatusTracker::new(10);
        tracker.record_conversion();
        tracker.record_conversion();
        tracker.record_batch(5);
        tracker.record_rejection();

        let status = tracker.get_status();
        assert_eq!(status.conversions, 2);
        assert_eq!(status.batches, 1);
        assert_eq!(status.batch_items, 5);
        assert_eq!(status.rejected_requests, 1);
        assert_eq!(status.max_batch_size, 10);
        assert_eq!(status.process_id, std::process::id());
    }
}
