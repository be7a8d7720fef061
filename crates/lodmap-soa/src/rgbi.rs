//! Packed color/intensity words.
//!
//! Byte layout, most significant first: intensity, red, green, blue
//! (`I << 24 | R << 16 | G << 8 | B`). Reading and writing both use this
//! layout.

/// Unpacked RGBI word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgbi {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Intensity.
    pub intensity: u8,
}

impl Rgbi {
    /// Create from color bytes and an intensity byte.
    pub fn new(rgb: [u8; 3], intensity: u8) -> Self {
        Self {
            r: rgb[0],
            g: rgb[1],
            b: rgb[2],
            intensity,
        }
    }

    /// Split a packed word into its channels.
    pub fn unpack(word: u32) -> Self {
        let [intensity, r, g, b] = word.to_be_bytes();
        Self { r, g, b, intensity }
    }

    /// Pack into a single word.
    pub fn pack(self) -> u32 {
        u32::from_be_bytes([self.intensity, self.r, self.g, self.b])
    }

    /// Color channels as `[r, g, b]`.
    pub fn rgb(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}
