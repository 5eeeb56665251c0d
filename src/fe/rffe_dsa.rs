use anyhow::Result;
use tracing::trace;

use super::rffe_gain_table::{DSA_MAX_ATT, DSA_MIN_ATT};
use super::rffe_reg::{RffeRegTrait, RFFE_DSA_RX_MASK, RFFE_DSA_TX_MASK, RFFE_DSA_TX_SHIFT};
use super::{Applied, Direction, Frontend};

pub trait RffeDsaTrait {
    fn set_attenuation(&mut self, att_db: f64, chan: u8, dir: Direction) -> Result<Applied>;
    fn get_attenuation(&self, chan: u8, dir: Direction) -> Result<f64>;
}

impl RffeDsaTrait for Frontend {
    /// Program the step attenuator. The request is clamped to the DSA
    /// range and truncated toward zero to a half-dB step code (10.3 dB
    /// programs 10.0 dB, not 10.5); the quantized value is what gets
    /// cached and returned in `applied`.
    fn set_attenuation(&mut self, att_db: f64, chan: u8, dir: Direction) -> Result<Applied> {
        trace!(
            "set_attenuation(att={:} dB, chan={:}, dir={:})",
            att_db,
            chan,
            dir
        );
        self.check_chan(chan)?;

        let clamped_att = att_db.clamp(DSA_MIN_ATT, DSA_MAX_ATT);
        let step = (clamped_att * 2.0).trunc() as u16;
        let applied = step as f64 / 2.0;

        /* BOTH programs each direction independently: two masked writes,
         * each committing its own cache entry on success */
        if dir == Direction::RX || dir == Direction::BOTH {
            trace!("DSA chan {:} dir RX step {:}", chan, step);
            self.dsa_reg.dsa_masked_write(step, RFFE_DSA_RX_MASK, chan)?;
            self.chan_state[chan as usize].rx_dsa_att = applied;
        }
        if dir == Direction::TX || dir == Direction::BOTH {
            trace!("DSA chan {:} dir TX step {:}", chan, step);
            self.dsa_reg
                .dsa_masked_write(step << RFFE_DSA_TX_SHIFT, RFFE_DSA_TX_MASK, chan)?;
            self.chan_state[chan as usize].tx_dsa_att = applied;
        }

        Ok(Applied {
            requested: att_db,
            applied,
            clamped: clamped_att != att_db,
        })
    }

    fn get_attenuation(&self, chan: u8, dir: Direction) -> Result<f64> {
        let state = self.chan_state(chan)?;
        match dir {
            Direction::RX => Ok(state.rx_dsa_att),
            /* same TX default as the gain accessor */
            Direction::TX | Direction::BOTH => Ok(state.tx_dsa_att),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fe() -> (Frontend, super::super::rffe_reg::SharedDsaReg) {
        Frontend::with_sim_backends(Default::default())
    }

    #[test]
    fn test_truncation_toward_zero() {
        let (mut fe, reg) = fe();
        let r = fe.set_attenuation(10.3, 0, Direction::RX).unwrap();
        /* half-dB steps truncate: 10.3 dB is code 20 (10.0 dB), not 21 */
        assert_eq!(reg.word(0) & RFFE_DSA_RX_MASK, 20);
        assert_eq!(r.applied, 10.0);
        assert!(!r.clamped);
        assert_eq!(fe.get_attenuation(0, Direction::RX).unwrap(), 10.0);
    }

    #[test]
    fn test_mask_isolation_between_directions() {
        let (mut fe, reg) = fe();
        fe.set_attenuation(1.5, 0, Direction::TX).unwrap();
        assert_eq!(reg.word(0), 0x0C0);
        fe.set_attenuation(2.5, 0, Direction::RX).unwrap();
        assert_eq!(reg.word(0), 0x0C5);

        /* rewriting RX leaves the TX field alone and vice versa */
        fe.set_attenuation(6.0, 0, Direction::TX).unwrap();
        assert_eq!(reg.word(0), 0x305); /* code 12 in the TX field */
        fe.set_attenuation(0.0, 0, Direction::RX).unwrap();
        assert_eq!(reg.word(0), 0x300);
    }

    #[test]
    fn test_both_issues_two_writes() {
        let (mut fe, reg) = fe();
        fe.set_attenuation(4.0, 1, Direction::BOTH).unwrap();
        assert_eq!(reg.word(1), 0x208); /* code 8 in both fields */
        let state = fe.chan_state(1).unwrap();
        assert_eq!(state.rx_dsa_att, 4.0);
        assert_eq!(state.tx_dsa_att, 4.0);
    }

    #[test]
    fn test_clamped_to_dsa_range() {
        let (mut fe, reg) = fe();
        let r = fe.set_attenuation(40.0, 0, Direction::RX).unwrap();
        assert!(r.clamped);
        assert_eq!(r.applied, DSA_MAX_ATT);
        assert_eq!(reg.word(0) & RFFE_DSA_RX_MASK, 63);

        let r = fe.set_attenuation(-2.0, 0, Direction::RX).unwrap();
        assert!(r.clamped);
        assert_eq!(r.applied, 0.0);
    }

    #[test]
    fn test_get_attenuation_defaults_to_tx() {
        let (mut fe, _reg) = fe();
        fe.set_attenuation(2.0, 0, Direction::RX).unwrap();
        fe.set_attenuation(7.5, 0, Direction::TX).unwrap();
        assert_eq!(fe.get_attenuation(0, Direction::RX).unwrap(), 2.0);
        assert_eq!(fe.get_attenuation(0, Direction::BOTH).unwrap(), 7.5);
    }
}
