use anyhow::Result;
use tracing::{debug, error};

use super::error::Error;
use super::rffe_gain_table::{TRX_MAX_RX_GAIN, TRX_MAX_TX_GAIN};
use super::{Direction, RFFE_NUM_CHAN};

/// Driver contract for the continuously adjustable transceiver-IC gain
/// stage. Synchronous; fails only on hardware access errors.
pub trait RffeTrxTrait {
    fn set_trx_gain(&mut self, gain_db: f64, chan: u8, dir: Direction) -> Result<()>;
}

/// Simulated transceiver IC. Applies the same range guards the real part
/// enforces and keeps the last gain per channel and direction.
#[derive(Debug, Clone, Default)]
pub struct SimTrx {
    rx_gain: [f64; RFFE_NUM_CHAN as usize],
    tx_gain: [f64; RFFE_NUM_CHAN as usize],
}

impl SimTrx {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rx_gain(&self, chan: u8) -> f64 {
        self.rx_gain[chan as usize]
    }

    pub fn tx_gain(&self, chan: u8) -> f64 {
        self.tx_gain[chan as usize]
    }
}

impl RffeTrxTrait for SimTrx {
    fn set_trx_gain(&mut self, gain_db: f64, chan: u8, dir: Direction) -> Result<()> {
        if chan >= RFFE_NUM_CHAN {
            error!("ERROR: INVALID CHAN FOR TRX GAIN");
            return Err(Error::RFFE_TRX_ERROR.into());
        }
        if dir == Direction::RX || dir == Direction::BOTH {
            if !(0.0..=TRX_MAX_RX_GAIN).contains(&gain_db) {
                error!("ERROR: TRX RX GAIN {:} dB OUT OF RANGE", gain_db);
                return Err(Error::RFFE_TRX_ERROR.into());
            }
            self.rx_gain[chan as usize] = gain_db;
        }
        if dir == Direction::TX || dir == Direction::BOTH {
            /* a BOTH request carries an RX-scaled gain, which is within
             * the TX stage range as well */
            if !(0.0..=TRX_MAX_TX_GAIN).contains(&gain_db) {
                error!("ERROR: TRX TX GAIN {:} dB OUT OF RANGE", gain_db);
                return Err(Error::RFFE_TRX_ERROR.into());
            }
            self.tx_gain[chan as usize] = gain_db;
        }
        debug!("SimTrx: chan {:} dir {:} gain {:} dB", chan, dir, gain_db);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sim_trx_caches_per_direction() {
        let mut trx = SimTrx::new();
        trx.set_trx_gain(12.5, 0, Direction::RX).unwrap();
        trx.set_trx_gain(30.0, 0, Direction::TX).unwrap();
        assert_eq!(trx.rx_gain(0), 12.5);
        assert_eq!(trx.tx_gain(0), 30.0);
        assert_eq!(trx.rx_gain(1), 0.0);
    }

    #[test]
    fn test_sim_trx_both_sets_both() {
        let mut trx = SimTrx::new();
        trx.set_trx_gain(10.0, 1, Direction::BOTH).unwrap();
        assert_eq!(trx.rx_gain(1), 10.0);
        assert_eq!(trx.tx_gain(1), 10.0);
    }

    #[test]
    fn test_sim_trx_guards() {
        let mut trx = SimTrx::new();
        assert!(trx.set_trx_gain(10.0, RFFE_NUM_CHAN, Direction::RX).is_err());
        assert!(trx.set_trx_gain(TRX_MAX_RX_GAIN + 1.0, 0, Direction::RX).is_err());
        assert!(trx.set_trx_gain(-0.5, 0, Direction::TX).is_err());
    }
}
