use anyhow::Result;
use tracing::{debug, trace};

use super::rffe_dsa::RffeDsaTrait;
use super::rffe_gain_table::{TRX_MAX_RX_GAIN, TRX_MAX_TX_GAIN};
use super::rffe_switches::RffeSwitchTrait;
use super::rffe_trx::RffeTrxTrait;
use super::{Applied, Direction, Frontend};

/// Maximum gain of the continuous IC stage for a direction. The table is
/// expressed as attenuation from this maximum, which keeps table units
/// decoupled from the IC driver's raw-gain units. BOTH resolves against
/// the RX table, so it carries the RX stage maximum.
fn trx_stage_max_gain(dir: Direction) -> f64 {
    match dir {
        Direction::TX => TRX_MAX_TX_GAIN,
        Direction::RX | Direction::BOTH => TRX_MAX_RX_GAIN,
    }
}

pub trait RffeGainTrait {
    fn set_gain(&mut self, gain_db: f64, freq_hz: f64, chan: u8, dir: Direction)
        -> Result<Applied>;
    fn get_gain(&self, chan: u8, dir: Direction) -> Result<f64>;
}

impl RffeGainTrait for Frontend {
    /// Distribute one nominal gain over the IC stage, the DSA and the
    /// bypass switches.
    ///
    /// The returned `applied` value is the nominal (clamped) request, not
    /// a hardware-quantized gain: DSA step rounding is deliberately not
    /// reflected in the caller-visible gain.
    fn set_gain(
        &mut self,
        gain_db: f64,
        freq_hz: f64,
        chan: u8,
        dir: Direction,
    ) -> Result<Applied> {
        trace!(
            "set_gain(gain={:} dB, freq={:} Hz, chan={:}, dir={:})",
            gain_db,
            freq_hz,
            chan,
            dir
        );
        self.check_chan(chan)?;

        /* one lookup; for BOTH it is reused for RX and TX */
        let lut = self.gain_table.lookup(gain_db, freq_hz, dir);
        if lut.clamped {
            debug!(
                "Note: requested gain {:} dB out of range, clamped to {:} dB",
                gain_db, lut.gain_db
            );
        }
        let trx_gain = trx_stage_max_gain(dir) - lut.tuple.trx_att;
        trace!(
            "TRX attenuation {:} dB, TRX gain {:} dB, DSA attenuation {:} dB, bypass {:}",
            lut.tuple.trx_att,
            trx_gain,
            lut.tuple.dsa_att,
            lut.tuple.bypass
        );

        /* IC stage first: the DSA must never see a transient over-driven
         * signal from an IC stage still at its previous gain */
        self.trx.set_trx_gain(trx_gain, chan, dir)?;
        self.set_attenuation(lut.tuple.dsa_att, chan, dir)?;

        /* switches after both gain stages; caches commit only once the
         * routing for the new settings is in effect */
        if dir == Direction::RX || dir == Direction::BOTH {
            self.switches
                .update_rx_freq_switches(freq_hz, lut.tuple.bypass, chan)?;
            let state = &mut self.chan_state[chan as usize];
            state.rx_gain = lut.gain_db;
            state.rx_bypass = lut.tuple.bypass;
        }
        if dir == Direction::TX || dir == Direction::BOTH {
            self.switches
                .update_tx_freq_switches(freq_hz, lut.tuple.bypass, chan)?;
            let state = &mut self.chan_state[chan as usize];
            state.tx_gain = lut.gain_db;
            state.tx_bypass = lut.tuple.bypass;
        }

        Ok(Applied {
            requested: gain_db,
            applied: lut.gain_db,
            clamped: lut.clamped,
        })
    }

    fn get_gain(&self, chan: u8, dir: Direction) -> Result<f64> {
        let state = self.chan_state(chan)?;
        match dir {
            Direction::RX => Ok(state.rx_gain),
            /* TX value is the documented default for any non-RX scope */
            Direction::TX | Direction::BOTH => Ok(state.tx_gain),
        }
    }
}
