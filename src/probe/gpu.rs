//! NVIDIA driver probe via `nvidia-smi`.
//!
//! CSV query output is parsed line-per-device. A machine without the tool
//! (or without an NVIDIA GPU) reports an empty list, not an error.

use serde::{Deserialize, Serialize};

use crate::shell::{self, CommandOptions};

/// One GPU as reported by the driver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GpuDevice {
    /// Marketing name (`NVIDIA GeForce RTX 3080`).
    pub name: String,
    /// Driver version string.
    pub driver_version: String,
    /// Total memory in MiB.
    pub memory_total_mib: Option<u64>,
}

const QUERY_ARGS: &[&str] = &[
    "--query-gpu=name,driver_version,memory.total",
    "--format=csv,noheader,nounits",
];

/// Query the driver for installed GPUs. Missing tool or non-zero exit
/// yields an empty list.
pub fn query() -> Vec<GpuDevice> {
    match shell::run("nvidia-smi", &shell::argv(QUERY_ARGS), &CommandOptions::default()) {
        Ok(result) if result.success => parse_query_output(&result.stdout),
        Ok(_) | Err(_) => {
            tracing::debug!("nvidia-smi unavailable");
            Vec::new()
        }
    }
}

/// Parse `nvidia-smi` CSV output (one device per line).
pub fn parse_query_output(output: &str) -> Vec<GpuDevice> {
    output
        .lines()
        .filter_map(|line| {
            let fields: Vec<&str> = line.split(',').map(str::trim).collect();
            if fields.len() < 3 || fields[0].is_empty() {
                return None;
            }
            Some(GpuDevice {
                name: fields[0].to_string(),
                driver_version: fields[1].to_string(),
                memory_total_mib: fields[2].parse().ok(),
            })
        })
        .collect()
}
