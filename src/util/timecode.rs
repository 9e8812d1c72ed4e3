// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Playback timestamp formatting.
//!
//! Positions are shown as `m:ss` below an hour and `h:mm:ss` from an hour
//! on. The leading field is never padded.

/// Format a position in seconds. Fractions are floored; missing, negative
/// and non-finite values format as `0:00`.
pub fn format_seconds(seconds: impl Into<Option<f64>>) -> String {
    let seconds = seconds.into().unwrap_or(0.0);
    format_whole_seconds(crate::models::clamp_seconds(seconds))
}

/// Format a whole number of seconds.
pub fn format_whole_seconds(total: u32) -> String {
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;

    if hours > 0 {
        format!("{}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{}:{:02}", minutes, seconds)
    }
}

/// Parse `s`, `m:ss` or `h:mm:ss` back to seconds. Fields after the first
/// must be below 60.
pub fn parse_timestamp(input: &str) -> Option<u32> {
    let fields = input
        .trim()
        .split(':')
        .map(|f| f.trim().parse::<u32>().ok())
        .collect::<Option<Vec<_>>>()?;

    let (lead, rest) = fields.split_first()?;
    if fields.len() > 3 || rest.iter().any(|&f| f >= 60) {
        return None;
    }

    rest.iter()
        .try_fold(*lead, |acc, &f| acc.checked_mul(60)?.checked_add(f))
}
