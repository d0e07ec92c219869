//! Per-channel RGBA histogram.

use serde::{Deserialize, Serialize};

use crate::buffer::PixelBuffer;

/// Number of bins per channel.
pub const BINS: usize = 256;

/// One RGBA channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

const ALL_CHANNELS: [Channel; 4] = [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha];

impl Channel {
    pub fn all() -> &'static [Self] {
        &ALL_CHANNELS
    }

    pub const fn label(&self) -> &'static str {
        match self {
            Self::Red => "Red",
            Self::Green => "Green",
            Self::Blue => "Blue",
            Self::Alpha => "Alpha",
        }
    }

    /// Position of the channel within an RGBA pixel.
    pub const fn index(self) -> usize {
        match self {
            Self::Red => 0,
            Self::Green => 1,
            Self::Blue => 2,
            Self::Alpha => 3,
        }
    }
}

/// Bin counts for the R, G, B and A channels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin counts for `[R, G, B, A]`. Each `Vec` has 256 entries.
    pub bins: [Vec<u32>; 4],
}

impl Histogram {
    /// Count every channel value of `buffer`.
    pub fn compute(buffer: &PixelBuffer) -> Self {
        let mut bins: [Vec<u32>; 4] = std::array::from_fn(|_| vec![0u32; BINS]);
        for px in buffer.as_rgba() {
            for (channel, &value) in px.iter().enumerate() {
                bins[channel][value as usize] += 1;
            }
        }
        Self { bins }
    }

    /// Bins of one channel.
    pub fn channel(&self, channel: Channel) -> &[u32] {
        &self.bins[channel.index()]
    }

    pub fn red(&self) -> &[u32] {
        self.channel(Channel::Red)
    }

    pub fn green(&self) -> &[u32] {
        self.channel(Channel::Green)
    }

    pub fn blue(&self) -> &[u32] {
        self.channel(Channel::Blue)
    }

    pub fn alpha(&self) -> &[u32] {
        self.channel(Channel::Alpha)
    }

    /// Largest bin of one channel.
    pub fn peak(&self, channel: Channel) -> u32 {
        self.channel(channel).iter().copied().max().unwrap_or(0)
    }

    /// Scale one channel so its peak maps to `height`, flooring each bin.
    ///
    /// An all-zero channel stays all zero.
    pub fn normalized(&self, channel: Channel, height: u32) -> Vec<u32> {
        let peak = self.peak(channel);
        if peak == 0 {
            return vec![0; BINS];
        }
        self.channel(channel)
            .iter()
            .map(|&v| (v as u64 * height as u64 / peak as u64) as u32)
            .collect()
    }
}
