use tracing::trace;

use crate::diagnostics::{Diagnostic, DiagnosticsSink, LogCode};
use crate::types::{DecodedImage, Texture, TextureInfo};

/// A texture reference resolved all the way to its decoded image.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedImage<'a> {
    /// Index into the image table.
    pub index: usize,
    pub image: &'a DecodedImage,
}

impl ResolvedImage<'_> {
    /// Name used when deriving names for generated images.
    pub fn display_name(&self) -> String {
        match &self.image.name {
            Some(name) => name.clone(),
            None => format!("image_{}", self.index),
        }
    }
}

/// Look up the image behind `info`.
///
/// A missing reference or a negative index means "no texture" and is silent.
/// A texture index past the texture table, or a texture whose source is not
/// in the image table, is reported once through `sink`.
pub fn resolve_texture<'a>(
    info: Option<&TextureInfo>,
    textures: &[Texture],
    images: &'a [DecodedImage],
    sink: &mut dyn DiagnosticsSink,
) -> Option<ResolvedImage<'a>> {
    let info = info?;
    let texture_index = usize::try_from(info.index).ok()?;

    let Some(texture) = textures.get(texture_index) else {
        sink.report(Diagnostic::new(
            LogCode::TextureNotFound,
            format!("Texture #{} not found", info.index),
        ));
        return None;
    };

    let image = usize::try_from(texture.source)
        .ok()
        .and_then(|index| images.get(index).map(|image| ResolvedImage { index, image }));

    if image.is_none() {
        sink.report(Diagnostic::new(
            LogCode::ImageNotFound,
            format!("Image #{} not found", texture.source),
        ));
    } else {
        trace!(texture = texture_index, source = texture.source, "Resolved texture");
    }

    image
}
