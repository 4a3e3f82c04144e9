use vello::peniko::Color;

use crate::tree::arena::{NodeId, NodeTree};

/// Our custom color representation for easy manipulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AppColor {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl AppColor {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    /// Parse `#rgb` or `#rrggbb` (leading `#` and surrounding whitespace optional).
    pub fn parse_hex(text: &str) -> Option<Self> {
        let hex = text.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).ok();
        match hex.len() {
            6 => Some(Self::from_rgb8(
                channel(&hex[0..2])?,
                channel(&hex[2..4])?,
                channel(&hex[4..6])?,
            )),
            3 => {
                let mut rgb = [0u8; 3];
                for (i, slot) in rgb.iter_mut().enumerate() {
                    *slot = channel(&hex[i..i + 1])? * 17;
                }
                Some(Self::from_rgb8(rgb[0], rgb[1], rgb[2]))
            }
            _ => None,
        }
    }

    /// Same color with alpha scaled by `opacity`.
    pub fn with_opacity(self, opacity: f32) -> Self {
        Self {
            a: self.a * opacity.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert to vello's peniko Color (AlphaColor<Srgb>).
    pub fn to_peniko(self) -> Color {
        Color::new([self.r, self.g, self.b, self.a])
    }
}

/// d3's `category20c` ordinal scheme: five hue groups of four shades.
pub const CATEGORY20C: [AppColor; 20] = [
    AppColor::from_rgb8(0x31, 0x82, 0xbd),
    AppColor::from_rgb8(0x6b, 0xae, 0xd6),
    AppColor::from_rgb8(0x9e, 0xca, 0xe1),
    AppColor::from_rgb8(0xc6, 0xdb, 0xef),
    AppColor::from_rgb8(0xe6, 0x55, 0x0d),
    AppColor::from_rgb8(0xfd, 0x8d, 0x3c),
    AppColor::from_rgb8(0xfd, 0xae, 0x6b),
    AppColor::from_rgb8(0xfd, 0xd0, 0xa2),
    AppColor::from_rgb8(0x31, 0xa3, 0x54),
    AppColor::from_rgb8(0x74, 0xc4, 0x76),
    AppColor::from_rgb8(0xa1, 0xd9, 0x9b),
    AppColor::from_rgb8(0xc7, 0xe9, 0xc0),
    AppColor::from_rgb8(0x75, 0x6b, 0xb1),
    AppColor::from_rgb8(0x9e, 0x9a, 0xc8),
    AppColor::from_rgb8(0xbc, 0xbd, 0xdc),
    AppColor::from_rgb8(0xda, 0xda, 0xeb),
    AppColor::from_rgb8(0x63, 0x63, 0x63),
    AppColor::from_rgb8(0x96, 0x96, 0x96),
    AppColor::from_rgb8(0xbd, 0xbd, 0xbd),
    AppColor::from_rgb8(0xd9, 0xd9, 0xd9),
];

/// Ordinal palette color for the `index`-th sibling.
pub fn ordinal_color(index: u32) -> AppColor {
    CATEGORY20C[index as usize % CATEGORY20C.len()]
}

/// Fill for a node: its supplied color if it parses, otherwise the palette
/// entry for its sibling index.
pub fn node_color(tree: &NodeTree, id: NodeId) -> AppColor {
    let node = tree.get(id);
    node.color
        .as_deref()
        .and_then(AppColor::parse_hex)
        .unwrap_or_else(|| ordinal_color(node.sibling_index))
}
