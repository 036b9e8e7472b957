//! Mapping normalized values onto visual channels.

use std::fmt;

use ringplot_common::types::Rgba;
use ringplot_scales::color::colormap::Colormap;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantNames};

use crate::error::RingplotError;
use crate::node::{Node, NEUTRAL_COLOR};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EncodingChannel {
    Height,
    Color,
    Opacity,
}

impl EncodingChannel {
    pub const ALL: [EncodingChannel; 3] = [
        EncodingChannel::Height,
        EncodingChannel::Color,
        EncodingChannel::Opacity,
    ];

    pub fn from_name(name: &str) -> Result<Self, RingplotError> {
        name.parse::<Self>().map_err(|_| {
            RingplotError::UnknownChannel(name.to_string(), Self::VARIANTS.join(", "))
        })
    }

    fn bit(&self) -> u8 {
        match self {
            EncodingChannel::Height => 1,
            EncodingChannel::Color => 1 << 1,
            EncodingChannel::Opacity => 1 << 2,
        }
    }
}

/// Set of channels a ring encodes its values into.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<EncodingChannel>", into = "Vec<EncodingChannel>")]
pub struct ChannelSet(u8);

impl ChannelSet {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn all() -> Self {
        EncodingChannel::ALL.into_iter().collect()
    }

    /// Parse channel names, failing on the first unknown one
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, RingplotError> {
        names
            .iter()
            .map(|n| EncodingChannel::from_name(n.as_ref()))
            .collect()
    }

    pub fn with(mut self, channel: EncodingChannel) -> Self {
        self.insert(channel);
        self
    }

    pub fn insert(&mut self, channel: EncodingChannel) {
        self.0 |= channel.bit();
    }

    pub fn contains(&self, channel: EncodingChannel) -> bool {
        self.0 & channel.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = EncodingChannel> + '_ {
        EncodingChannel::ALL
            .into_iter()
            .filter(move |c| self.contains(*c))
    }

    /// Fail on the first channel outside `supported`
    pub fn ensure_within(
        &self,
        supported: ChannelSet,
        ring: &'static str,
    ) -> Result<(), RingplotError> {
        match self.iter().find(|c| !supported.contains(*c)) {
            Some(channel) => Err(RingplotError::UnsupportedChannel { ring, channel }),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<EncodingChannel> for ChannelSet {
    fn from_iter<T: IntoIterator<Item = EncodingChannel>>(iter: T) -> Self {
        let mut set = Self::empty();
        for channel in iter {
            set.insert(channel);
        }
        set
    }
}

impl<const N: usize> From<[EncodingChannel; N]> for ChannelSet {
    fn from(channels: [EncodingChannel; N]) -> Self {
        channels.into_iter().collect()
    }
}

impl From<Vec<EncodingChannel>> for ChannelSet {
    fn from(channels: Vec<EncodingChannel>) -> Self {
        channels.into_iter().collect()
    }
}

impl From<ChannelSet> for Vec<EncodingChannel> {
    fn from(set: ChannelSet) -> Self {
        set.iter().collect()
    }
}

/// Writes channel values onto nodes from their relative value.
#[derive(Debug, Clone)]
pub struct AttributeEncoder<'a> {
    pub channels: ChannelSet,
    /// Drawn extent of a node at relative value 1
    pub max_extent: f32,
    pub colormap: &'a Colormap,
    pub default_color: Rgba,
}

impl<'a> AttributeEncoder<'a> {
    pub fn new(channels: ChannelSet, max_extent: f32, colormap: &'a Colormap) -> Self {
        Self {
            channels,
            max_extent,
            colormap,
            default_color: NEUTRAL_COLOR,
        }
    }

    pub fn with_default_color(mut self, color: Rgba) -> Self {
        self.default_color = color;
        self
    }

    pub fn color(&self, value: f32) -> Rgba {
        if self.channels.contains(EncodingChannel::Color) {
            self.colormap.sample(value)
        } else {
            self.default_color
        }
    }

    pub fn opacity(&self, value: f32) -> f32 {
        if self.channels.contains(EncodingChannel::Opacity) {
            value
        } else {
            1.0
        }
    }

    /// Set the node's color and opacity and return its drawn extent
    pub fn encode(&self, node: &mut Node) -> f32 {
        let value = node.relative_value;
        node.color = self.color(value);
        node.opacity = self.opacity(value);
        if self.channels.contains(EncodingChannel::Height) {
            self.max_extent * value
        } else {
            self.max_extent
        }
    }
}
