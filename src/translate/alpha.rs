//! Alpha mode to render state.
//!
//! Each mode maps to one fixed row of blend factors, depth write, draw bucket
//! and alpha keyword. Applying a mode replaces the whole row at once.

use crate::types::{
    AlphaMode, BlendFactor, DrawBucket, Keyword, MaterialParameterSet, RenderState, Slot,
};

impl AlphaMode {
    pub fn render_state(self) -> RenderState {
        match self {
            AlphaMode::Opaque => RenderState {
                src_blend: BlendFactor::One,
                dst_blend: BlendFactor::Zero,
                depth_write: true,
                bucket: DrawBucket::Opaque,
            },
            AlphaMode::Mask => RenderState {
                src_blend: BlendFactor::One,
                dst_blend: BlendFactor::Zero,
                depth_write: true,
                bucket: DrawBucket::AlphaTest,
            },
            AlphaMode::Blend => RenderState {
                src_blend: BlendFactor::SrcAlpha,
                dst_blend: BlendFactor::OneMinusSrcAlpha,
                depth_write: false,
                bucket: DrawBucket::Transparent,
            },
        }
    }

    /// The alpha keyword this mode turns on, if any.
    pub fn keyword(self) -> Option<Keyword> {
        match self {
            AlphaMode::Opaque => None,
            AlphaMode::Mask => Some(Keyword::AlphaTestOn),
            AlphaMode::Blend => Some(Keyword::AlphaBlendOn),
        }
    }
}

impl MaterialParameterSet {
    /// Put the material into `mode`.
    ///
    /// `cutoff` is only stored under [`AlphaMode::Mask`]; any other mode
    /// drops a previously stored cutoff.
    pub fn apply_alpha_mode(&mut self, mode: AlphaMode, cutoff: f32) {
        self.render_state = mode.render_state();

        for keyword in Keyword::ALPHA {
            self.disable_keyword(keyword);
        }
        if let Some(keyword) = mode.keyword() {
            self.enable_keyword(keyword);
        }

        if mode == AlphaMode::Mask {
            self.set_scalar(Slot::Cutoff, cutoff);
        } else {
            self.remove(Slot::Cutoff);
        }
    }

    /// The alpha keyword currently enabled, if exactly one is.
    pub fn alpha_keyword(&self) -> Option<Keyword> {
        let mut enabled = Keyword::ALPHA.into_iter().filter(|k| self.has_keyword(*k));
        match (enabled.next(), enabled.next()) {
            (Some(k), None) => Some(k),
            _ => None,
        }
    }
}
