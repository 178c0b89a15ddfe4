//! Haptic transport: best-effort serial link to the actuator
//!
//! The device may be absent from the start or vanish mid-session. Neither
//! case stops the session: with no channel every send is a no-op, and a
//! failed write is logged and dropped. The next tick carries a fresh state
//! anyway, so there is no retry.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use super::command::HapticCommand;
use crate::error::{HapticError, Result};
use crate::settings::DeviceSettings;

/// Counters for the researcher's end-of-session summary
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransportStats {
    pub sent: u64,
    pub failed: u64,
}

/// Owner of the (optional) output channel
pub struct HapticTransport {
    channel: Option<Box<dyn Write + Send>>,
    label: String,
    stats: TransportStats,
    last_sent: Option<HapticCommand>,
}

impl HapticTransport {
    /// Software-only mode: nothing is ever written
    pub fn disconnected() -> Self {
        Self {
            channel: None,
            label: "none".to_string(),
            stats: TransportStats::default(),
            last_sent: None,
        }
    }

    /// Wrap an already-open channel
    pub fn attached(label: impl Into<String>, channel: Box<dyn Write + Send>) -> Self {
        Self {
            channel: Some(channel),
            label: label.into(),
            stats: TransportStats::default(),
            last_sent: None,
        }
    }

    /// Open the configured serial port
    pub fn try_open(device: &DeviceSettings) -> Result<Self> {
        let port = serialport::new(&device.port, device.baud_rate)
            .timeout(Duration::from_millis(device.write_timeout_ms))
            .open()
            .map_err(|source| HapticError::DeviceUnavailable {
                port: device.port.clone(),
                source,
            })?;
        Ok(Self::attached(device.port.clone(), Box::new(SerialChannel(port))))
    }

    /// Open the serial port, or fall back to software-only mode.
    ///
    /// Waits `boot_delay_ms` after a successful open: most boards reset when
    /// the port is opened and drop anything sent while booting.
    pub fn open_or_disconnected(device: &DeviceSettings) -> Self {
        match Self::try_open(device) {
            Ok(transport) => {
                log::info!(
                    "Connected to haptic device on {} at {} baud",
                    device.port,
                    device.baud_rate
                );
                if device.boot_delay_ms > 0 {
                    thread::sleep(Duration::from_millis(device.boot_delay_ms));
                }
                transport
            }
            Err(e) => {
                log::warn!("{e}");
                log::warn!("Running in software-only mode");
                Self::disconnected()
            }
        }
    }

    pub fn is_attached(&self) -> bool {
        self.channel.is_some()
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stats(&self) -> TransportStats {
        self.stats
    }

    /// Last command that reached the channel successfully
    pub fn last_sent(&self) -> Option<HapticCommand> {
        self.last_sent
    }

    /// Write one command. Never fails from the caller's point of view.
    pub fn send(&mut self, command: HapticCommand) {
        let Some(channel) = self.channel.as_mut() else {
            return;
        };

        match write_line(channel.as_mut(), &command) {
            Ok(()) => {
                self.stats.sent += 1;
                self.last_sent = Some(command);
            }
            Err(e) => {
                self.stats.failed += 1;
                log::warn!("{}", HapticError::TransportWriteFailure(e));
            }
        }
    }

    /// Turn the motor off and release the channel. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.channel.is_none() {
            return;
        }
        self.send(HapticCommand::off());
        if let Some(channel) = self.channel.take() {
            log::info!(
                "Released haptic channel {} ({} sent, {} failed)",
                self.label,
                self.stats.sent,
                self.stats.failed
            );
            drop(channel);
        }
    }
}

impl Drop for HapticTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl std::fmt::Debug for HapticTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HapticTransport")
            .field("label", &self.label)
            .field("attached", &self.is_attached())
            .field("stats", &self.stats)
            .finish()
    }
}

fn write_line(channel: &mut dyn Write, command: &HapticCommand) -> io::Result<()> {
    channel.write_all(command.to_line().as_bytes())?;
    channel.flush()
}

/// `Write` adapter over an open serial port
struct SerialChannel(Box<dyn serialport::SerialPort>);

impl Write for SerialChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.flush()
    }
}

/// In-memory channel that records every byte written.
///
/// Clones share the same buffer, so one end can be handed to the transport
/// while the other inspects what the device would have received.
#[derive(Debug, Clone, Default)]
pub struct CaptureChannel {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl CaptureChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, split into lines
    pub fn lines(&self) -> Vec<String> {
        let bytes = match self.buffer.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Recorded lines parsed back into commands (unparseable lines skipped)
    pub fn commands(&self) -> Vec<HapticCommand> {
        self.lines().iter().filter_map(|l| l.parse().ok()).collect()
    }
}

impl Write for CaptureChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buffer
            .lock()
            .map_err(|_| io::Error::other("capture buffer poisoned"))?;
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
