use std::fmt;

use anyhow::Result;
use tracing::{debug, error};

use super::error::Error;
use super::rffe_gain_table::Band;
use super::RFFE_NUM_CHAN;

/// RF-path routing contract. Updates are synchronous and idempotent:
/// re-applying the current arguments is side-effect free.
pub trait RffeSwitchTrait {
    fn update_rx_freq_switches(&mut self, freq_hz: f64, bypass_lna: bool, chan: u8) -> Result<()>;
    fn update_tx_freq_switches(&mut self, freq_hz: f64, bypass_amp: bool, chan: u8) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum RxSwPath {
    RX_SW_LOWBAND_LNA,
    RX_SW_MIDBAND_LNA,
    RX_SW_HIGHBAND_LNA,
    RX_SW_BYPASS,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum TxSwPath {
    TX_SW_LOWBAND_AMP,
    TX_SW_MIDBAND_AMP,
    TX_SW_HIGHBAND_AMP,
    TX_SW_BYPASS,
}

impl fmt::Display for RxSwPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RxSwPath::RX_SW_LOWBAND_LNA => "RX_SW_LOWBAND_LNA",
            RxSwPath::RX_SW_MIDBAND_LNA => "RX_SW_MIDBAND_LNA",
            RxSwPath::RX_SW_HIGHBAND_LNA => "RX_SW_HIGHBAND_LNA",
            RxSwPath::RX_SW_BYPASS => "RX_SW_BYPASS",
        };
        write!(f, "{}", s)
    }
}

impl fmt::Display for TxSwPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TxSwPath::TX_SW_LOWBAND_AMP => "TX_SW_LOWBAND_AMP",
            TxSwPath::TX_SW_MIDBAND_AMP => "TX_SW_MIDBAND_AMP",
            TxSwPath::TX_SW_HIGHBAND_AMP => "TX_SW_HIGHBAND_AMP",
            TxSwPath::TX_SW_BYPASS => "TX_SW_BYPASS",
        };
        write!(f, "{}", s)
    }
}

/// RX path for a tune frequency: bypass wins over band filtering, else the
/// band filter plus LNA for that range is switched in.
pub fn rx_path_for(freq_hz: f64, bypass_lna: bool) -> RxSwPath {
    if bypass_lna {
        return RxSwPath::RX_SW_BYPASS;
    }
    match Band::of_freq(freq_hz) {
        Band::LOW => RxSwPath::RX_SW_LOWBAND_LNA,
        Band::MID => RxSwPath::RX_SW_MIDBAND_LNA,
        Band::HIGH => RxSwPath::RX_SW_HIGHBAND_LNA,
    }
}

pub fn tx_path_for(freq_hz: f64, bypass_amp: bool) -> TxSwPath {
    if bypass_amp {
        return TxSwPath::TX_SW_BYPASS;
    }
    match Band::of_freq(freq_hz) {
        Band::LOW => TxSwPath::TX_SW_LOWBAND_AMP,
        Band::MID => TxSwPath::TX_SW_MIDBAND_AMP,
        Band::HIGH => TxSwPath::TX_SW_HIGHBAND_AMP,
    }
}

/// Simulated switch controller; records the routed path per channel.
#[derive(Debug, Clone, Default)]
pub struct SimSwitches {
    rx_path: [Option<RxSwPath>; RFFE_NUM_CHAN as usize],
    tx_path: [Option<TxSwPath>; RFFE_NUM_CHAN as usize],
}

impl SimSwitches {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rx_path(&self, chan: u8) -> Option<RxSwPath> {
        self.rx_path[chan as usize]
    }

    pub fn tx_path(&self, chan: u8) -> Option<TxSwPath> {
        self.tx_path[chan as usize]
    }
}

impl RffeSwitchTrait for SimSwitches {
    fn update_rx_freq_switches(&mut self, freq_hz: f64, bypass_lna: bool, chan: u8) -> Result<()> {
        if chan >= RFFE_NUM_CHAN {
            error!("ERROR: INVALID CHAN FOR RX SWITCH UPDATE");
            return Err(Error::RFFE_SW_ERROR.into());
        }
        let path = rx_path_for(freq_hz, bypass_lna);
        debug!("SimSwitches: chan {:} RX path {:}", chan, path);
        self.rx_path[chan as usize] = Some(path);
        Ok(())
    }

    fn update_tx_freq_switches(&mut self, freq_hz: f64, bypass_amp: bool, chan: u8) -> Result<()> {
        if chan >= RFFE_NUM_CHAN {
            error!("ERROR: INVALID CHAN FOR TX SWITCH UPDATE");
            return Err(Error::RFFE_SW_ERROR.into());
        }
        let path = tx_path_for(freq_hz, bypass_amp);
        debug!("SimSwitches: chan {:} TX path {:}", chan, path);
        self.tx_path[chan as usize] = Some(path);
        Ok(())
    }
}
