use std::fmt;

use super::Direction;

/* Stage limits, from the transceiver IC and DSA datasheet ratings */
pub const TRX_MAX_RX_GAIN: f64 = 30.0;
pub const TRX_MAX_TX_GAIN: f64 = 41.95;
pub const DSA_MIN_ATT: f64 = 0.0;
pub const DSA_MAX_ATT: f64 = 31.5;

pub const ALL_RX_MIN_GAIN: f64 = 0.0;
pub const ALL_RX_MAX_GAIN: f64 = 60.0;
pub const ALL_TX_MIN_GAIN: f64 = 0.0;
pub const ALL_TX_MAX_GAIN: f64 = 65.0;

/* RF band edges used for breakpoint selection */
pub const RFFE_LOWBAND_FREQ_MAX: f64 = 1.0e9;
pub const RFFE_MIDBAND_FREQ_MAX: f64 = 2.7e9;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum Band {
    LOW,
    MID,
    HIGH,
}

impl Band {
    pub fn of_freq(freq_hz: f64) -> Band {
        if freq_hz < RFFE_LOWBAND_FREQ_MAX {
            Band::LOW
        } else if freq_hz < RFFE_MIDBAND_FREQ_MAX {
            Band::MID
        } else {
            Band::HIGH
        }
    }

    fn idx(self) -> usize {
        match self {
            Band::LOW => 0,
            Band::MID => 1,
            Band::HIGH => 2,
        }
    }
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Band::LOW => "LOW",
            Band::MID => "MID",
            Band::HIGH => "HIGH",
        };
        write!(f, "{}", s)
    }
}

/// One gain-table entry: how the two stages share the total attenuation
/// and whether the bypassable amplifier stage is routed around.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainTuple {
    pub trx_att: f64, /* continuous IC stage, attenuation from its maximum gain */
    pub dsa_att: f64, /* discrete step attenuator, half-dB multiples */
    pub bypass: bool,
}

/// Per-band calibration block for one direction.
pub struct BandGainParams {
    pub max_gain: f64,
    pub trx_att_max: f64,
    pub dsa_att_max: f64,
    pub bypass_thresh: f64, /* bypass the amp stage at and above this gain */
}

pub const RX_BAND_PARAMS: [BandGainParams; 3] = [
    BandGainParams {
        max_gain: ALL_RX_MAX_GAIN,
        trx_att_max: TRX_MAX_RX_GAIN,
        dsa_att_max: DSA_MAX_ATT,
        bypass_thresh: 51.0,
    },
    BandGainParams {
        max_gain: ALL_RX_MAX_GAIN,
        trx_att_max: TRX_MAX_RX_GAIN,
        dsa_att_max: DSA_MAX_ATT,
        bypass_thresh: 45.0,
    },
    BandGainParams {
        max_gain: ALL_RX_MAX_GAIN,
        trx_att_max: TRX_MAX_RX_GAIN,
        dsa_att_max: DSA_MAX_ATT,
        bypass_thresh: 38.0,
    },
];

pub const TX_BAND_PARAMS: [BandGainParams; 3] = [
    BandGainParams {
        max_gain: ALL_TX_MAX_GAIN,
        trx_att_max: TRX_MAX_TX_GAIN,
        dsa_att_max: DSA_MAX_ATT,
        bypass_thresh: 53.0,
    },
    BandGainParams {
        max_gain: ALL_TX_MAX_GAIN,
        trx_att_max: TRX_MAX_TX_GAIN,
        dsa_att_max: DSA_MAX_ATT,
        bypass_thresh: 47.0,
    },
    BandGainParams {
        max_gain: ALL_TX_MAX_GAIN,
        trx_att_max: TRX_MAX_TX_GAIN,
        dsa_att_max: DSA_MAX_ATT,
        bypass_thresh: 40.0,
    },
];

/// Result of a table lookup. `gain_db` is the gain the entry corresponds
/// to after range clamping; `clamped` tells the caller the request was
/// saturated to a boundary entry instead of applied as asked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lookup {
    pub gain_db: f64,
    pub tuple: GainTuple,
    pub clamped: bool,
}

/// Gain distribution table: per direction and band, one precomputed entry
/// per integer dB of gain. Pure data, no side effects.
#[derive(Debug)]
pub struct GainTable {
    rx: [Vec<GainTuple>; 3],
    tx: [Vec<GainTuple>; 3],
}

fn half_db_ceil(att: f64) -> f64 {
    (att * 2.0).ceil() / 2.0
}

fn build_band(p: &BandGainParams) -> Vec<GainTuple> {
    let n = p.max_gain.trunc() as usize;
    (0..=n)
        .map(|i| {
            let att_total = p.max_gain - i as f64;
            /* DSA takes only what the IC stage cannot, rounded up to a
             * half-dB step; the continuous stage absorbs the remainder */
            let dsa_att = half_db_ceil((att_total - p.trx_att_max).max(0.0)).min(p.dsa_att_max);
            let trx_att = att_total - dsa_att;
            GainTuple {
                trx_att,
                dsa_att,
                bypass: (i as f64) >= p.bypass_thresh,
            }
        })
        .collect()
}

impl GainTable {
    pub fn new() -> Self {
        Self {
            rx: [
                build_band(&RX_BAND_PARAMS[0]),
                build_band(&RX_BAND_PARAMS[1]),
                build_band(&RX_BAND_PARAMS[2]),
            ],
            tx: [
                build_band(&TX_BAND_PARAMS[0]),
                build_band(&TX_BAND_PARAMS[1]),
                build_band(&TX_BAND_PARAMS[2]),
            ],
        }
    }

    /// Look up the gain tuple for a request. Out-of-range gains clamp to
    /// the nearest boundary entry; the lookup itself cannot fail.
    ///
    /// The BOTH direction resolves against the RX table.
    pub fn lookup(&self, gain_db: f64, freq_hz: f64, dir: Direction) -> Lookup {
        let band = Band::of_freq(freq_hz);
        let (params, entries) = match dir {
            Direction::TX => (&TX_BAND_PARAMS[band.idx()], &self.tx[band.idx()]),
            Direction::RX | Direction::BOTH => {
                (&RX_BAND_PARAMS[band.idx()], &self.rx[band.idx()])
            }
        };

        let min_gain = match dir {
            Direction::TX => ALL_TX_MIN_GAIN,
            Direction::RX | Direction::BOTH => ALL_RX_MIN_GAIN,
        };
        let clamped_gain = gain_db.clamp(min_gain, params.max_gain);
        let clamped = clamped_gain != gain_db;

        let idx = clamped_gain.trunc() as usize;
        let frac = clamped_gain - idx as f64;
        let mut tuple = entries[idx];
        /* fractional dB goes into the continuous stage, never the DSA */
        tuple.trx_att = (tuple.trx_att - frac).max(0.0);

        Lookup {
            gain_db: clamped_gain,
            tuple,
            clamped,
        }
    }
}

impl Default for GainTable {
    fn default() -> Self {
        Self::new()
    }
}
