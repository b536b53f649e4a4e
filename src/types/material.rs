use serde::Deserialize;

/// Reference from a material into the texture table.
///
/// The index is signed because it comes straight from the asset; a negative
/// or out-of-range index means "no texture".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureInfo {
    pub index: i32,
    #[serde(default)]
    pub tex_coord: u32,
}

impl TextureInfo {
    pub fn new(index: i32) -> Self {
        Self {
            index,
            tex_coord: 0,
        }
    }
}

/// Surface compositing behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlphaMode {
    #[default]
    Opaque,
    Mask,
    Blend,
}

impl std::fmt::Display for AlphaMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlphaMode::Opaque => write!(f, "OPAQUE"),
            AlphaMode::Mask => write!(f, "MASK"),
            AlphaMode::Blend => write!(f, "BLEND"),
        }
    }
}

/// PBR metallic-roughness block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PbrMetallicRoughness {
    /// Base color factor [r, g, b, a].
    pub base_color_factor: [f32; 4],
    pub metallic_factor: f32,
    pub roughness_factor: f32,
    pub base_color_texture: Option<TextureInfo>,
    /// Roughness in green, metalness in blue.
    pub metallic_roughness_texture: Option<TextureInfo>,
}

impl Default for PbrMetallicRoughness {
    fn default() -> Self {
        Self {
            base_color_factor: [1.0, 1.0, 1.0, 1.0],
            metallic_factor: 1.0,
            roughness_factor: 1.0,
            base_color_texture: None,
            metallic_roughness_texture: None,
        }
    }
}

/// `KHR_materials_pbrSpecularGlossiness` extension block.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PbrSpecularGlossiness {
    pub diffuse_factor: [f32; 4],
    pub diffuse_texture: Option<TextureInfo>,
    pub specular_factor: [f32; 3],
    pub glossiness_factor: f32,
    pub specular_glossiness_texture: Option<TextureInfo>,
}

impl Default for PbrSpecularGlossiness {
    fn default() -> Self {
        Self {
            diffuse_factor: [1.0, 1.0, 1.0, 1.0],
            diffuse_texture: None,
            specular_factor: [1.0, 1.0, 1.0],
            glossiness_factor: 1.0,
            specular_glossiness_texture: None,
        }
    }
}

/// Material extensions understood by the translator.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MaterialExtensions {
    #[serde(rename = "KHR_materials_pbrSpecularGlossiness")]
    pub pbr_specular_glossiness: Option<PbrSpecularGlossiness>,
}

/// A glTF material description, as handed over by the parser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Material {
    pub name: String,
    pub pbr_metallic_roughness: Option<PbrMetallicRoughness>,
    pub extensions: Option<MaterialExtensions>,
    pub normal_texture: Option<TextureInfo>,
    pub occlusion_texture: Option<TextureInfo>,
    pub emissive_texture: Option<TextureInfo>,
    /// Emissive color [r, g, b].
    pub emissive_factor: [f32; 3],
    pub alpha_mode: AlphaMode,
    pub alpha_cutoff: f32,
    pub double_sided: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: String::new(),
            pbr_metallic_roughness: None,
            extensions: None,
            normal_texture: None,
            occlusion_texture: None,
            emissive_texture: None,
            emissive_factor: [0.0, 0.0, 0.0],
            alpha_mode: AlphaMode::Opaque,
            alpha_cutoff: 0.5,
            double_sided: false,
        }
    }
}

impl Material {
    /// The specular-glossiness block, if the extension is present.
    pub fn specular_glossiness(&self) -> Option<&PbrSpecularGlossiness> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.pbr_specular_glossiness.as_ref())
    }

    pub fn is_emissive(&self) -> bool {
        self.emissive_factor != [0.0, 0.0, 0.0]
    }
}
