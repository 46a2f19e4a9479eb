//! Wearable: start button, pulse sensor and accelerometer.
//!
//! ```text
//!  IDLE ──[StartTracking]──▶ TRACKING
//!   ▲  │                        │  pulse → HR latch
//!   │  └─ button → 0x88 once    │  accel → speed latch
//!   └───────[AbortToIdle]───────┘
//!
//!  RequestBonusReport (any mode) → 0x80 | accel<<1 | hr
//! ```
//!
//! Latches survive a report so a retried request gets the same answer;
//! `StartTracking` and `AbortToIdle` clear them. `AbortToIdle` also
//! re-arms the start button. Bytes without bit 7 belong to the floor
//! panel and are skipped.

use log::{debug, info};

use crate::config::WearableConfig;
use crate::drivers::button::{ButtonEvent, DebouncedButton};
use crate::protocol::codec::ORIGIN_BIT;
use crate::protocol::{ByteLink, Command, Message, WearableReport, decode_command};
use crate::sensors::{AccelMonitor, HeartRateMonitor, ZeroG};

use super::WearableSensors;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WearableMode {
    Idle,
    Tracking,
}

pub struct Wearable {
    mode: WearableMode,
    config: WearableConfig,
    button: DebouncedButton,
    /// Start signal may be sent.
    start_armed: bool,
    heart: HeartRateMonitor,
    accel: AccelMonitor,
}

impl Wearable {
    pub fn new(config: WearableConfig, baseline: ZeroG) -> Self {
        Self {
            mode: WearableMode::Idle,
            button: DebouncedButton::new(config.button_debounce_ms),
            config,
            start_armed: true,
            heart: HeartRateMonitor::new(),
            accel: AccelMonitor::new(baseline),
        }
    }

    pub fn mode(&self) -> WearableMode {
        self.mode
    }

    pub fn start_armed(&self) -> bool {
        self.start_armed
    }

    /// Current latch state as it would be reported.
    pub fn report(&self) -> WearableReport {
        WearableReport::bonus(self.heart.is_latched(), self.accel.is_latched())
    }

    fn clear_latches(&mut self) {
        self.heart.reset();
        self.accel.reset();
    }

    /// Act on one received byte. Returns the reply, if any.
    pub fn handle_byte(&mut self, byte: u8) -> Option<Message> {
        if byte & ORIGIN_BIT == 0 {
            return None;
        }

        match decode_command(byte) {
            Some(Command::StartTracking) => {
                self.mode = WearableMode::Tracking;
                self.clear_latches();
                debug!("Wearable: tracking");
                None
            }
            Some(Command::AbortToIdle) => {
                self.mode = WearableMode::Idle;
                self.clear_latches();
                self.start_armed = true;
                debug!("Wearable: idle, start re-armed");
                None
            }
            Some(Command::RequestBonusReport) => {
                let report = self.report();
                debug!(
                    "Wearable: report hr={} accel={}",
                    report.heart_rate_bonus, report.accel_bonus
                );
                Some(Message::Wearable(report))
            }
            _ => {
                debug!("Wearable: ignoring 0x{byte:02X}");
                None
            }
        }
    }

    /// Read sensors once. Returns a start signal when one should be sent.
    pub fn sample(&mut self, now_ms: u64, sensors: &mut impl WearableSensors) -> Option<Message> {
        let event = self.button.tick(now_ms, sensors.button());

        match self.mode {
            WearableMode::Idle => {
                if event == Some(ButtonEvent::Pressed) && self.start_armed {
                    self.start_armed = false;
                    info!("Wearable: start pressed");
                    return Some(Message::Wearable(WearableReport::start_signal()));
                }
            }
            WearableMode::Tracking => {
                if self.heart.update(sensors.pulse(), now_ms, &self.config) {
                    info!(
                        "Wearable: heart-rate bonus latched at {} bpm",
                        self.heart.last_bpm().unwrap_or_default()
                    );
                }
                if self.accel.update(sensors.accel(), &self.config) {
                    info!("Wearable: speed bonus latched");
                }
            }
        }
        None
    }

    /// One loop iteration: drain inbound (replying as needed) → sensors → transmit.
    pub fn poll<L: ByteLink>(
        &mut self,
        link: &mut L,
        now_ms: u64,
        sensors: &mut impl WearableSensors,
    ) -> Result<(), L::Error> {
        while let Some(byte) = link.read_byte()? {
            if let Some(reply) = self.handle_byte(byte) {
                link.write_byte(reply.to_byte())?;
            }
        }

        if let Some(msg) = self.sample(now_ms, sensors) {
            link.write_byte(msg.to_byte())?;
        }
        Ok(())
    }
}
