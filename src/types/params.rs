use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

/// Typed parameter slot of a translated material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    BaseColor,
    BaseColorMap,
    Metallic,
    /// Smoothness for the metallic path, glossiness for the specular path.
    Smoothness,
    MetallicGlossMap,
    SpecularColor,
    SpecGlossMap,
    NormalMap,
    OcclusionMap,
    EmissionMap,
    EmissionColor,
    Cutoff,
}

/// Kind of value a slot accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Scalar,
    Color,
    Texture,
}

impl Slot {
    pub fn kind(self) -> SlotKind {
        match self {
            Slot::Metallic | Slot::Smoothness | Slot::Cutoff => SlotKind::Scalar,
            Slot::BaseColor | Slot::SpecularColor | Slot::EmissionColor => SlotKind::Color,
            Slot::BaseColorMap
            | Slot::MetallicGlossMap
            | Slot::SpecGlossMap
            | Slot::NormalMap
            | Slot::OcclusionMap
            | Slot::EmissionMap => SlotKind::Texture,
        }
    }
}

/// Where a bound texture lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextureHandle {
    /// Index into the caller's image table.
    Source(usize),
    /// Index into the auxiliary images returned with the translation.
    Generated(usize),
}

/// Sampler wrap hint attached to a binding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    #[default]
    Repeat,
    Clamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TextureBinding {
    pub handle: TextureHandle,
    pub wrap: WrapMode,
}

impl TextureBinding {
    pub fn new(handle: TextureHandle) -> Self {
        Self {
            handle,
            wrap: WrapMode::Repeat,
        }
    }

    pub fn with_wrap(mut self, wrap: WrapMode) -> Self {
        self.wrap = wrap;
        self
    }
}

/// Tagged slot value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlotValue {
    Scalar(f32),
    /// Linear color [r, g, b, a].
    Color([f32; 4]),
    Texture(TextureBinding),
}

impl SlotValue {
    pub fn kind(&self) -> SlotKind {
        match self {
            SlotValue::Scalar(_) => SlotKind::Scalar,
            SlotValue::Color(_) => SlotKind::Color,
            SlotValue::Texture(_) => SlotKind::Texture,
        }
    }
}

/// Shader feature keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Keyword {
    NormalMap,
    MetallicGlossMap,
    SpecGlossMap,
    Emission,
    AlphaTestOn,
    AlphaBlendOn,
    AlphaPremultiplyOn,
}

impl Keyword {
    /// The mutually exclusive alpha keywords.
    pub const ALPHA: [Keyword; 3] = [
        Keyword::AlphaTestOn,
        Keyword::AlphaBlendOn,
        Keyword::AlphaPremultiplyOn,
    ];
}

/// Shading path selected for the material.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ShadingModel {
    #[default]
    MetallicSetup,
    SpecularSetup,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BlendFactor {
    One,
    Zero,
    SrcAlpha,
    OneMinusSrcAlpha,
}

/// Draw-order classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawBucket {
    Opaque,
    AlphaTest,
    Transparent,
}

impl DrawBucket {
    /// Render-type tag used for shader replacement.
    pub fn render_type(self) -> &'static str {
        match self {
            DrawBucket::Opaque => "Opaque",
            DrawBucket::AlphaTest => "TransparentCutout",
            DrawBucket::Transparent => "Transparent",
        }
    }

    /// Explicit render queue, or `None` to keep the shader default.
    pub fn render_queue(self) -> Option<i32> {
        match self {
            DrawBucket::Opaque => None,
            DrawBucket::AlphaTest => Some(2450),
            DrawBucket::Transparent => Some(3000),
        }
    }
}

/// Blend function, depth write and draw bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RenderState {
    pub src_blend: BlendFactor,
    pub dst_blend: BlendFactor,
    pub depth_write: bool,
    pub bucket: DrawBucket,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            src_blend: BlendFactor::One,
            dst_blend: BlendFactor::Zero,
            depth_write: true,
            bucket: DrawBucket::Opaque,
        }
    }
}

/// Main texture scale/offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UvTransform {
    pub scale: [f32; 2],
    pub offset: [f32; 2],
}

impl UvTransform {
    pub const IDENTITY: UvTransform = UvTransform {
        scale: [1.0, 1.0],
        offset: [0.0, 0.0],
    };

    /// Flips V so glTF's top-left UV origin samples correctly on a
    /// bottom-left origin renderer.
    pub const FLIP_V: UvTransform = UvTransform {
        scale: [1.0, -1.0],
        offset: [0.0, 1.0],
    };
}

impl Default for UvTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Shader-ready material parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MaterialParameterSet {
    pub name: String,
    pub shading_model: ShadingModel,
    pub render_state: RenderState,
    pub uv_transform: UvTransform,
    slots: BTreeMap<Slot, SlotValue>,
    keywords: BTreeSet<Keyword>,
}

impl Default for MaterialParameterSet {
    fn default() -> Self {
        Self {
            name: String::new(),
            shading_model: ShadingModel::default(),
            render_state: RenderState::default(),
            uv_transform: UvTransform::default(),
            slots: BTreeMap::new(),
            keywords: BTreeSet::new(),
        }
    }
}

impl MaterialParameterSet {
    /// Empty parameter set with the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    fn set(&mut self, slot: Slot, value: SlotValue) {
        debug_assert_eq!(slot.kind(), value.kind(), "wrong value kind for {slot:?}");
        self.slots.insert(slot, value);
    }

    pub fn set_scalar(&mut self, slot: Slot, value: f32) {
        self.set(slot, SlotValue::Scalar(value));
    }

    pub fn set_color(&mut self, slot: Slot, color: [f32; 4]) {
        self.set(slot, SlotValue::Color(color));
    }

    pub fn set_texture(&mut self, slot: Slot, binding: TextureBinding) {
        self.set(slot, SlotValue::Texture(binding));
    }

    pub fn remove(&mut self, slot: Slot) -> Option<SlotValue> {
        self.slots.remove(&slot)
    }

    pub fn get(&self, slot: Slot) -> Option<&SlotValue> {
        self.slots.get(&slot)
    }

    pub fn has(&self, slot: Slot) -> bool {
        self.slots.contains_key(&slot)
    }

    pub fn scalar(&self, slot: Slot) -> Option<f32> {
        match self.slots.get(&slot) {
            Some(SlotValue::Scalar(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn color(&self, slot: Slot) -> Option<[f32; 4]> {
        match self.slots.get(&slot) {
            Some(SlotValue::Color(c)) => Some(*c),
            _ => None,
        }
    }

    pub fn texture(&self, slot: Slot) -> Option<TextureBinding> {
        match self.slots.get(&slot) {
            Some(SlotValue::Texture(t)) => Some(*t),
            _ => None,
        }
    }

    pub fn slots(&self) -> impl Iterator<Item = (Slot, &SlotValue)> {
        self.slots.iter().map(|(slot, value)| (*slot, value))
    }

    /// All texture bindings, in slot order.
    pub fn textures(&self) -> impl Iterator<Item = (Slot, TextureBinding)> + '_ {
        self.slots.iter().filter_map(|(slot, value)| match value {
            SlotValue::Texture(t) => Some((*slot, *t)),
            _ => None,
        })
    }

    pub fn enable_keyword(&mut self, keyword: Keyword) {
        self.keywords.insert(keyword);
    }

    pub fn disable_keyword(&mut self, keyword: Keyword) {
        self.keywords.remove(&keyword);
    }

    pub fn has_keyword(&self, keyword: Keyword) -> bool {
        self.keywords.contains(&keyword)
    }

    pub fn keywords(&self) -> impl Iterator<Item = Keyword> + '_ {
        self.keywords.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_set_defaults() {
        let params = MaterialParameterSet::default();
        assert_eq!(params.shading_model, ShadingModel::MetallicSetup);
        assert_eq!(params.render_state, RenderState::default());
        assert_eq!(params.uv_transform, UvTransform::IDENTITY);
        assert_eq!(params.slots().count(), 0);
        assert_eq!(params.keywords().count(), 0);
    }

    #[test]
    fn named_set_is_otherwise_empty() {
        let params = MaterialParameterSet::named("brick");
        assert_eq!(params.name, "brick");
        assert_eq!(params.render_state, RenderState::default());
        assert_eq!(params.slots().count(), 0);
        assert_eq!(params.keywords().count(), 0);
    }

    #[test]
    fn typed_accessors() {
        let mut params = MaterialParameterSet::default();
        params.set_scalar(Slot::Metallic, 0.25);
        params.set_color(Slot::BaseColor, [1.0, 0.5, 0.0, 1.0]);
        params.set_texture(
            Slot::NormalMap,
            TextureBinding::new(TextureHandle::Source(2)),
        );

        assert_eq!(params.scalar(Slot::Metallic), Some(0.25));
        assert_eq!(params.color(Slot::BaseColor), Some([1.0, 0.5, 0.0, 1.0]));
        assert_eq!(
            params.texture(Slot::NormalMap).map(|t| t.handle),
            Some(TextureHandle::Source(2))
        );

        // Asking for the wrong kind yields nothing
        assert_eq!(params.color(Slot::Metallic), None);
        assert_eq!(params.scalar(Slot::NormalMap), None);

        assert_eq!(params.remove(Slot::Metallic), Some(SlotValue::Scalar(0.25)));
        assert!(!params.has(Slot::Metallic));
        assert_eq!(params.textures().count(), 1);
    }

    #[test]
    fn keywords_are_a_set() {
        let mut params = MaterialParameterSet::default();
        params.enable_keyword(Keyword::Emission);
        params.enable_keyword(Keyword::Emission);
        assert_eq!(params.keywords().count(), 1);
        params.disable_keyword(Keyword::Emission);
        assert!(!params.has_keyword(Keyword::Emission));
    }

    #[test]
    fn slot_kinds() {
        assert_eq!(Slot::Cutoff.kind(), SlotKind::Scalar);
        assert_eq!(Slot::EmissionColor.kind(), SlotKind::Color);
        assert_eq!(Slot::OcclusionMap.kind(), SlotKind::Texture);
    }

    #[test]
    fn draw_bucket_tags() {
        assert_eq!(DrawBucket::Opaque.render_type(), "Opaque");
        assert_eq!(DrawBucket::AlphaTest.render_type(), "TransparentCutout");
        assert_eq!(DrawBucket::Transparent.render_type(), "Transparent");
        assert_eq!(DrawBucket::Opaque.render_queue(), None);
        assert_eq!(DrawBucket::AlphaTest.render_queue(), Some(2450));
        assert_eq!(DrawBucket::Transparent.render_queue(), Some(3000));
    }

    #[test]
    fn serializes_to_json() {
        let mut params = MaterialParameterSet::named("m");
        params.set_scalar(Slot::Cutoff, 0.5);
        params.enable_keyword(Keyword::AlphaTestOn);

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["name"], "m");
        assert_eq!(json["slots"]["cutoff"]["scalar"], 0.5);
        assert_eq!(json["keywords"][0], "alpha_test_on");
        assert_eq!(json["render_state"]["bucket"], "opaque");
    }
}
