use ringplot_common::types::Rgba;

use super::hex_rgb;

const CATEGORY10: [u32; 10] = [
    0x1f77b4, 0xff7f0e, 0x2ca02c, 0xd62728, 0x9467bd, 0x8c564b, 0xe377c2, 0x7f7f7f, 0xbcbd22,
    0x17becf,
];

/// Discrete palette handing out one color per category index, cycling once
/// the colors run out.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoricalPalette {
    colors: Vec<Rgba>,
}

impl CategoricalPalette {
    pub fn new(colors: Vec<Rgba>) -> Self {
        if colors.is_empty() {
            return Self::default();
        }
        Self { colors }
    }

    pub fn color(&self, index: usize) -> Rgba {
        self.colors[index % self.colors.len()]
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

impl Default for CategoricalPalette {
    fn default() -> Self {
        Self {
            colors: CATEGORY10.iter().map(|hex| hex_rgb(*hex)).collect(),
        }
    }
}
