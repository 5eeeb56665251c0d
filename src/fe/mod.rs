pub mod error;
pub mod rffe_dsa;
pub mod rffe_gain;
mod rffe_gain_table;
pub mod rffe_reg;
pub mod rffe_switches;
pub mod rffe_trx;

use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::error;

use error::Error;
use rffe_reg::RffeRegTrait;
use rffe_switches::RffeSwitchTrait;
use rffe_trx::RffeTrxTrait;

pub use rffe_gain_table::{
    Band, BandGainParams, GainTable, GainTuple, Lookup, ALL_RX_MAX_GAIN, ALL_RX_MIN_GAIN,
    ALL_TX_MAX_GAIN, ALL_TX_MIN_GAIN, DSA_MAX_ATT, DSA_MIN_ATT, TRX_MAX_RX_GAIN, TRX_MAX_TX_GAIN,
};

/* board-level parameters */
pub const RFFE_NUM_CHAN: u8 = 2; /* number of radio channels */

/// Scope of a gain-control operation across a channel's RX and TX paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum Direction {
    RX,
    TX,
    BOTH,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::RX => "RX",
            Direction::TX => "TX",
            Direction::BOTH => "BOTH",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a set operation: the nominal request, the value the
/// subsystem actually settled on, and whether range clamping kicked in.
/// Range clamping is normal operation, not an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Applied {
    pub requested: f64,
    pub applied: f64,
    pub clamped: bool,
}

/// Cached gain state of one radio channel. Mutated only by the gain and
/// attenuation operations, and only after the corresponding hardware
/// writes succeeded, so it never diverges from the hardware.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChanGainState {
    pub rx_gain: f64,
    pub tx_gain: f64,
    pub rx_dsa_att: f64,
    pub tx_dsa_att: f64,
    pub rx_bypass: bool,
    pub tx_bypass: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RffeConfChan {
    #[serde(default = "default_chan_enable")]
    pub enable: bool, /* enable or disable that radio channel */
}

fn default_chan_enable() -> bool {
    true
}

impl Default for RffeConfChan {
    fn default() -> Self {
        Self { enable: true }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct RffeConfig {
    #[serde(default)]
    pub chan: [RffeConfChan; RFFE_NUM_CHAN as usize],
}

impl RffeConfig {
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: RffeConfig = serde_json::from_str(s)?;
        Ok(cfg)
    }
}

/// The RF front-end gain path of one board: gain table, per-channel
/// cached state and the three hardware collaborators.
///
/// All operations block until the hardware writes complete; there is no
/// internal parallelism. `&mut self` makes the one-call-at-a-time model
/// explicit. Serializing concurrent access to a physical register word
/// shared between channels is the register sink's responsibility.
pub struct Frontend {
    pub cfg: RffeConfig,
    trx: Box<dyn RffeTrxTrait>,
    switches: Box<dyn RffeSwitchTrait>,
    dsa_reg: Box<dyn RffeRegTrait>,
    gain_table: GainTable,
    chan_state: [ChanGainState; RFFE_NUM_CHAN as usize],
}

impl Frontend {
    pub fn new(
        cfg: RffeConfig,
        trx: Box<dyn RffeTrxTrait>,
        switches: Box<dyn RffeSwitchTrait>,
        dsa_reg: Box<dyn RffeRegTrait>,
    ) -> Self {
        Self {
            cfg,
            trx,
            switches,
            dsa_reg,
            gain_table: GainTable::new(),
            chan_state: Default::default(),
        }
    }

    /// Front end wired to simulated backends. The returned register bank
    /// handle shares storage with the one the front end writes through.
    pub fn with_sim_backends(cfg: RffeConfig) -> (Self, rffe_reg::SharedDsaReg) {
        let reg = rffe_reg::SharedDsaReg::new();
        let fe = Self::new(
            cfg,
            Box::new(rffe_trx::SimTrx::new()),
            Box::new(rffe_switches::SimSwitches::new()),
            Box::new(reg.clone()),
        );
        (fe, reg)
    }

    pub fn chan_state(&self, chan: u8) -> Result<ChanGainState> {
        if chan >= RFFE_NUM_CHAN {
            error!("ERROR: INVALID CHAN NUMBER");
            return Err(Error::RFFE_HAL_ERROR.into());
        }
        Ok(self.chan_state[chan as usize])
    }

    /* guard shared by all mutating operations */
    fn check_chan(&self, chan: u8) -> Result<()> {
        if chan >= RFFE_NUM_CHAN {
            error!("ERROR: INVALID CHAN NUMBER");
            return Err(Error::RFFE_HAL_ERROR.into());
        }
        if !self.cfg.chan[chan as usize].enable {
            error!("ERROR: SELECTED CHAN IS DISABLED");
            return Err(Error::RFFE_HAL_ERROR.into());
        }
        Ok(())
    }
}
