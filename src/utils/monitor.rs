#[cfg(feature = "cli")]
use std::sync::Mutex;
#[cfg(feature = "cli")]
use std::time::{Duration, Instant};
#[cfg(feature = "cli")]
use sysinfo::{Pid, ProcessesToUpdate, System};

/// 某個階段結束時的資源使用量
#[cfg(feature = "cli")]
#[derive(Debug, Clone)]
pub struct PhaseSnapshot {
    pub cpu_usage: f32,
    pub memory_mb: u64,
    pub memory_percent: f32,
    pub peak_memory_mb: u64,
    /// 自上一個快照以來的時間
    pub phase_time: Duration,
    pub total_time: Duration,
}

#[cfg(feature = "cli")]
struct MonitorState {
    system: System,
    peak_memory_mb: u64,
    last_phase: Instant,
}

/// 逐階段記錄本程序的 CPU 與記憶體使用量
#[cfg(feature = "cli")]
pub struct SystemMonitor {
    state: Mutex<MonitorState>,
    pid: Option<Pid>,
    started: Instant,
    enabled: bool,
}

#[cfg(feature = "cli")]
impl SystemMonitor {
    pub fn new(enabled: bool) -> Self {
        let pid = sysinfo::get_current_pid().ok();
        if enabled && pid.is_none() {
            tracing::warn!("🔶 Unable to resolve current PID, process stats disabled");
        }

        let mut system = System::new();
        if enabled {
            system.refresh_memory();
            if let Some(pid) = pid {
                system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
            }
        }

        let now = Instant::now();
        Self {
            state: Mutex::new(MonitorState {
                system,
                peak_memory_mb: 0,
                last_phase: now,
            }),
            pid,
            started: now,
            enabled,
        }
    }

    pub fn snapshot(&self) -> Option<PhaseSnapshot> {
        if !self.enabled {
            return None;
        }
        let pid = self.pid?;
        let mut state = self.state.lock().ok()?;

        state.system.refresh_memory();
        state
            .system
            .refresh_processes(ProcessesToUpdate::Some(&[pid]), true);

        let (cpu_usage, memory_mb) = {
            let process = state.system.process(pid)?;
            (process.cpu_usage(), process.memory() / 1024 / 1024)
        };
        let total_mb = state.system.total_memory() / 1024 / 1024;
        let memory_percent = if total_mb > 0 {
            memory_mb as f32 / total_mb as f32 * 100.0
        } else {
            0.0
        };

        state.peak_memory_mb = state.peak_memory_mb.max(memory_mb);
        let now = Instant::now();
        let phase_time = now.duration_since(state.last_phase);
        state.last_phase = now;

        Some(PhaseSnapshot {
            cpu_usage,
            memory_mb,
            memory_percent,
            peak_memory_mb: state.peak_memory_mb,
            phase_time,
            total_time: self.started.elapsed(),
        })
    }

    pub fn log_stats(&self, phase: &str) {
        if let Some(stats) = self.snapshot() {
            tracing::info!(
                "📊 {} - CPU: {:.1}%, Memory: {}MB ({:.1}%), Peak: {}MB, Phase: {:?}",
                phase,
                stats.cpu_usage,
                stats.memory_mb,
                stats.memory_percent,
                stats.peak_memory_mb,
                stats.phase_time
            );
        }
    }

    pub fn log_final_stats(&self) {
        if let Some(stats) = self.snapshot() {
            tracing::info!(
                "📊 Final Stats - Total Time: {:?}, Peak Memory: {}MB",
                stats.total_time,
                stats.peak_memory_mb
            );
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}

#[cfg(feature = "cli")]
impl Default for SystemMonitor {
    fn default() -> Self {
        Self::new(false)
    }
}

// 非 CLI 環境提供空實現
#[cfg(not(feature = "cli"))]
#[derive(Default)]
pub struct SystemMonitor;

#[cfg(not(feature = "cli"))]
impl SystemMonitor {
    pub fn new(_enabled: bool) -> Self {
        Self
    }

    pub fn log_stats(&self, _phase: &str) {}

    pub fn log_final_stats(&self) {}

    pub fn is_enabled(&self) -> bool {
        false
    }
}
