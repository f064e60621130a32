/// OpenGL debug output - forwards KHR_debug driver messages to the engine logger
///
/// Messages are mapped to engine log severities, counted, and grouped so a
/// message repeated every frame shows its occurrence count instead of
/// flooding the log.

use colored::*;
use cube_3d_engine::cube3d::Engine;
use cube_3d_engine::cube3d::log::LogSeverity;
use glow::HasContext;
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

/// Global debug message statistics (thread-safe atomic counters)
static DEBUG_STATS: DebugStatsTracker = DebugStatsTracker::new();

/// Global message tracker for grouping identical messages
static MESSAGE_TRACKER: Mutex<Option<FxHashMap<String, u32>>> = Mutex::new(None);

/// Counts of driver messages by severity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DebugStats {
    pub high: u32,
    pub medium: u32,
    pub low: u32,
    pub notification: u32,
}

impl DebugStats {
    pub fn total(&self) -> u32 {
        self.high + self.medium + self.low + self.notification
    }
}

struct DebugStatsTracker {
    high: AtomicU32,
    medium: AtomicU32,
    low: AtomicU32,
    notification: AtomicU32,
}

impl DebugStatsTracker {
    const fn new() -> Self {
        Self {
            high: AtomicU32::new(0),
            medium: AtomicU32::new(0),
            low: AtomicU32::new(0),
            notification: AtomicU32::new(0),
        }
    }

    fn increment(&self, severity: u32) {
        let counter = match severity {
            glow::DEBUG_SEVERITY_HIGH => &self.high,
            glow::DEBUG_SEVERITY_MEDIUM => &self.medium,
            glow::DEBUG_SEVERITY_LOW => &self.low,
            _ => &self.notification,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    fn get_stats(&self) -> DebugStats {
        DebugStats {
            high: self.high.load(Ordering::Relaxed),
            medium: self.medium.load(Ordering::Relaxed),
            low: self.low.load(Ordering::Relaxed),
            notification: self.notification.load(Ordering::Relaxed),
        }
    }

    fn reset(&self) {
        self.high.store(0, Ordering::Relaxed);
        self.medium.store(0, Ordering::Relaxed);
        self.low.store(0, Ordering::Relaxed);
        self.notification.store(0, Ordering::Relaxed);
    }
}

/// Occurrence count of `message`, including this one
fn track_message(message: &str) -> u32 {
    let Ok(mut guard) = MESSAGE_TRACKER.lock() else {
        return 1;
    };
    let count = guard.get_or_insert_with(FxHashMap::default).entry(message.to_string()).or_insert(0);
    *count += 1;
    *count
}

// ============================================================================
// Mapping tables
// ============================================================================

/// Engine log severity for a `GL_DEBUG_SEVERITY_*` value
pub(crate) fn log_severity(severity: u32) -> LogSeverity {
    match severity {
        glow::DEBUG_SEVERITY_HIGH => LogSeverity::Error,
        glow::DEBUG_SEVERITY_MEDIUM => LogSeverity::Warn,
        glow::DEBUG_SEVERITY_LOW => LogSeverity::Info,
        _ => LogSeverity::Debug,
    }
}

pub(crate) fn source_name(source: u32) -> &'static str {
    match source {
        glow::DEBUG_SOURCE_API => "API",
        glow::DEBUG_SOURCE_WINDOW_SYSTEM => "Window system",
        glow::DEBUG_SOURCE_SHADER_COMPILER => "Shader compiler",
        glow::DEBUG_SOURCE_THIRD_PARTY => "Third party",
        glow::DEBUG_SOURCE_APPLICATION => "Application",
        _ => "Other",
    }
}

pub(crate) fn type_name(message_type: u32) -> &'static str {
    match message_type {
        glow::DEBUG_TYPE_ERROR => "Error",
        glow::DEBUG_TYPE_DEPRECATED_BEHAVIOR => "Deprecated",
        glow::DEBUG_TYPE_UNDEFINED_BEHAVIOR => "Undefined behavior",
        glow::DEBUG_TYPE_PORTABILITY => "Portability",
        glow::DEBUG_TYPE_PERFORMANCE => "Performance",
        glow::DEBUG_TYPE_MARKER => "Marker",
        _ => "Other",
    }
}

// ============================================================================
// Callback
// ============================================================================

/// Format one driver message as a log line
pub(crate) fn format_message(source: u32, message_type: u32, id: u32, message: &str, occurrences: u32) -> String {
    let repeat = if occurrences > 1 {
        format!(" [x{}]", occurrences)
    } else {
        String::new()
    };
    format!("[{} / {}] #{}{}: {}", source_name(source), type_name(message_type), id, repeat, message)
}

fn forward_debug_message(source: u32, message_type: u32, id: u32, severity: u32, message: &str) {
    DEBUG_STATS.increment(severity);
    let occurrences = track_message(message);
    Engine::log(
        log_severity(severity),
        "cube3d::gl",
        format_message(source, message_type, id, message, occurrences),
    );
}

/// Enable synchronous debug output on `gl` if the context supports it
///
/// Returns whether the callback was installed.
pub(crate) fn install(gl: &mut glow::Context) -> bool {
    DEBUG_STATS.reset();
    if let Ok(mut guard) = MESSAGE_TRACKER.lock() {
        *guard = Some(FxHashMap::default());
    }

    unsafe {
        if !gl.supports_debug() {
            return false;
        }
        gl.enable(glow::DEBUG_OUTPUT);
        gl.enable(glow::DEBUG_OUTPUT_SYNCHRONOUS);
        gl.debug_message_callback(forward_debug_message);
    }
    true
}

// ============================================================================
// Statistics
// ============================================================================

/// Driver messages received since the debug output was installed
pub fn debug_stats() -> DebugStats {
    DEBUG_STATS.get_stats()
}

/// Print a coloured summary of the driver messages
pub fn print_debug_stats_report() {
    let stats = debug_stats();

    if stats.total() == 0 {
        println!("\n{}", "✓ No GL debug messages".green().bold());
        return;
    }

    println!("\n{}", "=== GL Debug Output Report ===".bright_blue().bold());

    if stats.high > 0 {
        println!("  {} {}", "High:".red().bold(), stats.high);
    }
    if stats.medium > 0 {
        println!("  {} {}", "Medium:".yellow().bold(), stats.medium);
    }
    if stats.low > 0 {
        println!("  {} {}", "Low:".cyan(), stats.low);
    }
    if stats.notification > 0 {
        println!("  {} {}", "Notification:".bright_black(), stats.notification);
    }

    println!("  {} {}", "Total:".white().bold(), stats.total());

    if let Ok(guard) = MESSAGE_TRACKER.lock() {
        if let Some(tracker) = guard.as_ref() {
            let repeated = tracker.values().filter(|&&count| count > 1).count();
            if repeated > 0 {
                println!("\n  {} {} message(s) appeared multiple times", "ℹ".cyan(), repeated);
            }
        }
    }

    println!("{}\n", "==============================".bright_blue().bold());
}

#[cfg(test)]
#[path = "gl_debug_tests.rs"]
mod tests;
