//! Both peripherals and a virtual player wired behind one [`ByteLink`].
//!
//! ```text
//!                   ┌──────────── SimRig ─────────────┐
//!   HostController  │  MemoryLink ──▶ FloorPanel      │
//!     write_byte ───┼─▶ (broadcast)                   │
//!                   │  MemoryLink ──▶ Wearable        │
//!     read_byte ◀───┼── panel bytes, then wearable    │
//!                   │        ▲ sensors                │
//!                   │   VirtualPlayer                 │
//!                   └─────────────────────────────────┘
//! ```
//!
//! The peripherals run one loop iteration every time the host touches
//! the link, at the time shown by the rig's clock.

use log::warn;

use crate::adapters::memory_link::MemoryLink;
use crate::app::ports::Clock;
use crate::config::SystemConfig;
use crate::error::{LinkError, Result};
use crate::peripherals::{FloorPanel, Wearable, WearableSensors};
use crate::protocol::{ByteLink, decode_command};
use crate::sensors::ZeroG;

use super::player::{PlayerProfile, VirtualPlayer};

/// Samples averaged for the wearable's zero-G baseline at power-on.
const CALIBRATION_SAMPLES: usize = 32;

pub struct SimRig<C: Clock> {
    clock: C,
    host_panel: MemoryLink,
    panel_end: MemoryLink,
    host_wearable: MemoryLink,
    wearable_end: MemoryLink,
    panel: FloorPanel,
    wearable: Wearable,
    player: VirtualPlayer,
}

impl<C: Clock> SimRig<C> {
    pub fn new(config: &SystemConfig, profile: PlayerProfile, clock: C) -> Self {
        let mut player = VirtualPlayer::new(profile);

        let samples: Vec<_> = (0..CALIBRATION_SAMPLES).map(|_| player.accel()).collect();
        let baseline = ZeroG::from_samples(&samples).unwrap_or_default();

        let (host_panel, panel_end) = MemoryLink::pair();
        let (host_wearable, wearable_end) = MemoryLink::pair();

        Self {
            clock,
            host_panel,
            panel_end,
            host_wearable,
            wearable_end,
            panel: FloorPanel::new(config.panel.clone()),
            wearable: Wearable::new(config.wearable.clone(), baseline),
            player,
        }
    }

    /// Run one loop iteration of both peripherals.
    pub fn try_step(&mut self) -> Result<()> {
        let now = self.clock.now_ms();
        self.player.set_now(now);

        self.panel.poll(&mut self.panel_end, now, &mut self.player)?;
        self.wearable.poll(&mut self.wearable_end, now, &mut self.player)?;
        Ok(())
    }

    /// [`try_step`](Self::try_step), logging instead of failing. A
    /// peripheral that hits a full buffer just loses that byte.
    pub fn step(&mut self) {
        if let Err(e) = self.try_step() {
            warn!("Sim: {e}");
        }
    }

    pub fn panel(&self) -> &FloorPanel {
        &self.panel
    }

    pub fn wearable(&self) -> &Wearable {
        &self.wearable
    }

    pub fn player(&self) -> &VirtualPlayer {
        &self.player
    }
}

impl<C: Clock> ByteLink for SimRig<C> {
    type Error = LinkError;

    fn read_byte(&mut self) -> core::result::Result<Option<u8>, LinkError> {
        self.step();
        if let Some(byte) = self.host_panel.read_byte()? {
            return Ok(Some(byte));
        }
        self.host_wearable.read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> core::result::Result<(), LinkError> {
        if let Some(cmd) = decode_command(byte) {
            self.player.observe(cmd, self.clock.now_ms());
        }
        self.host_panel.write_byte(byte)?;
        self.host_wearable.write_byte(byte)?;
        // Deliver right away so long playbacks never fill the buffers.
        self.step();
        Ok(())
    }
}
