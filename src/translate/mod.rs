pub mod alpha;
pub mod repack;
pub mod resolve;
pub mod template;

use image::RgbaImage;
use serde::Serialize;
use tracing::debug;

use crate::config::TranslatorConfig;
use crate::diagnostics::{Diagnostic, DiagnosticsSink, LogCode};
use crate::error::Result;
use crate::types::{
    DecodedImage, Keyword, Material, MaterialParameterSet, PbrMetallicRoughness,
    PbrSpecularGlossiness, ShadingModel, Slot, Texture, TextureBinding, TextureHandle,
    TextureInfo, WrapMode,
};

pub use repack::{RepackMode, repack, repack_with_threshold};
pub use resolve::{ResolvedImage, resolve_texture};
pub use template::default_template;

/// Image produced by the repacker during translation.
///
/// Owned by the caller once returned.
#[derive(Debug, Clone, Serialize)]
pub struct AuxiliaryImage {
    pub name: String,
    pub mode: RepackMode,
    /// Image-table index the buffer was derived from.
    pub source: usize,
    #[serde(skip)]
    pub pixels: RgbaImage,
}

/// Output of a single material translation.
#[derive(Debug, Clone)]
pub struct Translation {
    pub params: MaterialParameterSet,
    /// Indexed by [`TextureHandle::Generated`].
    pub auxiliary: Vec<AuxiliaryImage>,
}

impl Translation {
    /// Pixels behind a binding, looked up in the image table or the
    /// auxiliary list.
    pub fn pixels<'a>(
        &'a self,
        handle: TextureHandle,
        images: &'a [DecodedImage],
    ) -> Option<&'a RgbaImage> {
        match handle {
            TextureHandle::Source(i) => images.get(i).map(|img| &img.pixels),
            TextureHandle::Generated(i) => self.auxiliary.get(i).map(|aux| &aux.pixels),
        }
    }
}

/// Translates glTF materials into shader-ready parameter sets.
///
/// Holds only configuration, so one translator can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct Translator {
    config: TranslatorConfig,
}

/// Per-call state: borrowed inputs plus the outputs being assembled.
struct Session<'a> {
    config: &'a TranslatorConfig,
    textures: &'a [Texture],
    images: &'a [DecodedImage],
    sink: &'a mut dyn DiagnosticsSink,
    params: MaterialParameterSet,
    auxiliary: Vec<AuxiliaryImage>,
}

impl<'a> Session<'a> {
    fn resolve(&mut self, info: Option<&TextureInfo>) -> Option<ResolvedImage<'a>> {
        resolve_texture(info, self.textures, self.images, self.sink)
    }

    /// Bind `info` to `slot` unchanged. Returns whether anything was bound.
    fn bind(&mut self, slot: Slot, info: Option<&TextureInfo>, wrap: WrapMode) -> bool {
        match self.resolve(info) {
            Some(resolved) => {
                let binding = TextureBinding::new(TextureHandle::Source(resolved.index));
                self.params.set_texture(slot, binding.with_wrap(wrap));
                true
            }
            None => false,
        }
    }

    /// Repack the image behind `info` and bind the result to `slot`.
    fn bind_repacked(
        &mut self,
        slot: Slot,
        info: Option<&TextureInfo>,
        mode: RepackMode,
    ) -> Result<bool> {
        let Some(resolved) = self.resolve(info) else {
            return Ok(false);
        };

        let pixels =
            repack_with_threshold(&resolved.image.pixels, mode, self.config.parallel_threshold)?;
        let handle = TextureHandle::Generated(self.auxiliary.len());
        self.auxiliary.push(AuxiliaryImage {
            name: format!("{}_{}", resolved.display_name(), mode.suffix()),
            mode,
            source: resolved.index,
            pixels,
        });
        self.params.set_texture(slot, TextureBinding::new(handle));
        Ok(true)
    }

    fn apply_specular_glossiness(&mut self, sg: &PbrSpecularGlossiness) {
        self.params.shading_model = ShadingModel::SpecularSetup;

        if !self.bind(Slot::BaseColorMap, sg.diffuse_texture.as_ref(), WrapMode::Repeat) {
            self.params.set_color(Slot::BaseColor, sg.diffuse_factor);
        }

        if self.bind(
            Slot::SpecGlossMap,
            sg.specular_glossiness_texture.as_ref(),
            WrapMode::Repeat,
        ) {
            self.params.enable_keyword(Keyword::SpecGlossMap);
        } else {
            let [r, g, b] = sg.specular_factor;
            self.params.set_color(Slot::SpecularColor, [r, g, b, 1.0]);
            self.params.set_scalar(Slot::Smoothness, sg.glossiness_factor);
        }
    }

    fn apply_metallic_roughness(&mut self, pbr: &PbrMetallicRoughness) -> Result<()> {
        self.params.set_color(Slot::BaseColor, pbr.base_color_factor);
        self.params.set_scalar(Slot::Metallic, pbr.metallic_factor);
        self.params
            .set_scalar(Slot::Smoothness, 1.0 - pbr.roughness_factor);

        let wrap = if self.config.clamp_base_color {
            WrapMode::Clamp
        } else {
            WrapMode::Repeat
        };
        self.bind(Slot::BaseColorMap, pbr.base_color_texture.as_ref(), wrap);

        if self.bind_repacked(
            Slot::MetallicGlossMap,
            pbr.metallic_roughness_texture.as_ref(),
            RepackMode::MetallicSmoothness,
        )? {
            self.params.enable_keyword(Keyword::MetallicGlossMap);
        }
        Ok(())
    }
}

impl Translator {
    pub fn new(config: TranslatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TranslatorConfig {
        &self.config
    }

    /// Translate one material.
    ///
    /// Missing textures leave their slot empty and are reported to `sink`.
    /// Fails only when a referenced image cannot be repacked, in which case
    /// no partial result is returned.
    pub fn translate(
        &self,
        material: &Material,
        textures: &[Texture],
        images: &[DecodedImage],
        sink: &mut dyn DiagnosticsSink,
    ) -> Result<Translation> {
        let mut params = default_template().clone();
        params.name = material.name.clone();
        params.uv_transform = self.config.uv_transform();

        let mut session = Session {
            config: &self.config,
            textures,
            images,
            sink,
            params,
            auxiliary: Vec::new(),
        };

        if let Some(sg) = material.specular_glossiness() {
            session.apply_specular_glossiness(sg);
        }

        if let Some(pbr) = &material.pbr_metallic_roughness {
            session.apply_metallic_roughness(pbr)?;
        }

        if session.bind(Slot::NormalMap, material.normal_texture.as_ref(), WrapMode::Repeat) {
            session.params.enable_keyword(Keyword::NormalMap);
        }

        session.bind_repacked(
            Slot::OcclusionMap,
            material.occlusion_texture.as_ref(),
            RepackMode::Occlusion,
        )?;

        if session.bind(
            Slot::EmissionMap,
            material.emissive_texture.as_ref(),
            WrapMode::Repeat,
        ) {
            session.params.enable_keyword(Keyword::Emission);
        }

        session
            .params
            .apply_alpha_mode(material.alpha_mode, material.alpha_cutoff);

        // Only ever turns emission on; a texture-enabled keyword stays.
        if material.is_emissive() {
            let [r, g, b] = material.emissive_factor;
            session.params.set_color(Slot::EmissionColor, [r, g, b, 1.0]);
            session.params.enable_keyword(Keyword::Emission);
        }

        if material.double_sided {
            session.sink.report(Diagnostic::new(
                LogCode::DoubleSidedUnsupported,
                "Double sided shading is not supported",
            ));
        }

        let Session {
            params, auxiliary, ..
        } = session;

        debug!(
            material = %material.name,
            shading = ?params.shading_model,
            alpha = %material.alpha_mode,
            slots = params.slots().count(),
            keywords = params.keywords().count(),
            generated = auxiliary.len(),
            "Translated material"
        );

        Ok(Translation { params, auxiliary })
    }
}

/// Translate one material with the default configuration.
pub fn translate(
    material: &Material,
    textures: &[Texture],
    images: &[DecodedImage],
    sink: &mut dyn DiagnosticsSink,
) -> Result<Translation> {
    Translator::default().translate(material, textures, images, sink)
}
