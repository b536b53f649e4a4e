use image::RgbaImage;
use serde::Deserialize;

/// Entry of the texture table: points at a source image.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Texture {
    /// Index into the image table. Negative when the asset leaves it unset.
    #[serde(default = "Texture::no_source")]
    pub source: i32,
    #[serde(default)]
    pub name: Option<String>,
}

impl Texture {
    pub fn new(source: i32) -> Self {
        Self { source, name: None }
    }

    fn no_source() -> i32 {
        -1
    }
}

/// A decoded RGBA8 source image.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub name: Option<String>,
    pub pixels: RgbaImage,
}

impl DecodedImage {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { name: None, pixels }
    }

    pub fn named(name: impl Into<String>, pixels: RgbaImage) -> Self {
        Self {
            name: Some(name.into()),
            pixels,
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }
}
