pub mod material;
pub mod params;
pub mod texture;

pub use material::{
    AlphaMode, Material, MaterialExtensions, PbrMetallicRoughness, PbrSpecularGlossiness,
    TextureInfo,
};
pub use params::{
    BlendFactor, DrawBucket, Keyword, MaterialParameterSet, RenderState, ShadingModel, Slot,
    SlotKind, SlotValue, TextureBinding, TextureHandle, UvTransform, WrapMode,
};
pub use texture::{DecodedImage, Texture};
