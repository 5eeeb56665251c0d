use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use tracing::{error, trace};

use super::error::Error;
use super::RFFE_NUM_CHAN;

/* DSA control word: one 12-bit field per channel, RX and TX side by side */
pub const RFFE_DSA_REG_WIDTH: u16 = 0x0FFF;
pub const RFFE_DSA_RX_MASK: u16 = 0x003F; /* RX step code, bits 0..5 */
pub const RFFE_DSA_TX_MASK: u16 = 0x0FC0; /* TX step code, bits 6..11 */
pub const RFFE_DSA_TX_SHIFT: u16 = 6;

/// Register sink for the per-channel DSA control word.
///
/// A write must be an atomic read-modify-write: bits outside `mask` keep
/// their previous value. Atomicity covers one channel's register instance
/// only; if several logical channels alias the same physical word, the
/// implementation behind this trait is responsible for serializing them.
pub trait RffeRegTrait {
    fn dsa_masked_write(&mut self, value: u16, mask: u16, chan: u8) -> Result<()>;
}

/// In-memory DSA register bank, one 12-bit word per channel.
///
/// Clones share the same storage, so a clone kept by the caller observes
/// the words written through the front end. Used for hardware-free
/// bring-up and for tests.
#[derive(Debug, Clone, Default)]
pub struct SharedDsaReg {
    regs: Rc<RefCell<[u16; RFFE_NUM_CHAN as usize]>>,
}

impl SharedDsaReg {
    pub fn new() -> Self {
        Self {
            regs: Rc::new(RefCell::new([0u16; RFFE_NUM_CHAN as usize])),
        }
    }

    /// Current raw register word of a channel.
    pub fn word(&self, chan: u8) -> u16 {
        self.regs.borrow()[chan as usize]
    }
}

impl RffeRegTrait for SharedDsaReg {
    fn dsa_masked_write(&mut self, value: u16, mask: u16, chan: u8) -> Result<()> {
        if chan >= RFFE_NUM_CHAN {
            error!("ERROR: INVALID CHAN FOR DSA REGISTER WRITE");
            return Err(Error::RFFE_REG_ERROR.into());
        }
        if mask & !RFFE_DSA_REG_WIDTH != 0 {
            error!("ERROR: DSA REGISTER MASK 0x{:04X} EXCEEDS 12-BIT FIELD", mask);
            return Err(Error::RFFE_REG_ERROR.into());
        }

        let mut regs = self.regs.borrow_mut();
        let prev = regs[chan as usize];
        regs[chan as usize] = (prev & !mask) | (value & mask);
        trace!(
            "==> RMW DSA word chan {:}: value 0x{:03X} mask 0x{:03X} (0x{:03X} -> 0x{:03X})",
            chan,
            value,
            mask,
            prev,
            regs[chan as usize]
        );

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masked_write_preserves_other_field() {
        let mut reg = SharedDsaReg::new();
        reg.dsa_masked_write(0x0C0, RFFE_DSA_TX_MASK, 0).unwrap();
        reg.dsa_masked_write(0x005, RFFE_DSA_RX_MASK, 0).unwrap();
        assert_eq!(reg.word(0), 0x0C5);

        /* overwrite RX only, TX bits stay */
        reg.dsa_masked_write(0x03F, RFFE_DSA_RX_MASK, 0).unwrap();
        assert_eq!(reg.word(0), 0x0FF);
    }

    #[test]
    fn test_value_outside_mask_is_dropped() {
        let mut reg = SharedDsaReg::new();
        reg.dsa_masked_write(0xFFF, RFFE_DSA_RX_MASK, 1).unwrap();
        assert_eq!(reg.word(1), 0x03F);
    }

    #[test]
    fn test_channels_are_independent() {
        let mut reg = SharedDsaReg::new();
        reg.dsa_masked_write(0x012, RFFE_DSA_RX_MASK, 0).unwrap();
        assert_eq!(reg.word(1), 0x000);
    }

    #[test]
    fn test_invalid_chan_rejected() {
        let mut reg = SharedDsaReg::new();
        assert!(reg
            .dsa_masked_write(0x001, RFFE_DSA_RX_MASK, RFFE_NUM_CHAN)
            .is_err());
    }

    #[test]
    fn test_mask_wider_than_register_rejected() {
        let mut reg = SharedDsaReg::new();
        assert!(reg.dsa_masked_write(0x000, 0xF000, 0).is_err());
    }
}
