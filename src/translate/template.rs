use std::sync::OnceLock;

use tracing::debug;

use crate::types::{AlphaMode, MaterialParameterSet, Slot};

const WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

static DEFAULT_TEMPLATE: OnceLock<MaterialParameterSet> = OnceLock::new();

/// Process-wide fallback material every translation starts from.
///
/// Built on first use; concurrent first callers all get the same instance.
pub fn default_template() -> &'static MaterialParameterSet {
    DEFAULT_TEMPLATE.get_or_init(build_template)
}

fn build_template() -> MaterialParameterSet {
    debug!("Initializing default material template");
    let mut params = MaterialParameterSet::named("default");
    params.set_color(Slot::BaseColor, WHITE);
    params.apply_alpha_mode(AlphaMode::Opaque, 0.5);
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DrawBucket, ShadingModel};

    #[test]
    fn template_is_white_and_opaque() {
        let t = default_template();
        assert_eq!(t.color(Slot::BaseColor), Some(WHITE));
        assert_eq!(t.shading_model, ShadingModel::MetallicSetup);
        assert_eq!(t.render_state.bucket, DrawBucket::Opaque);
        assert!(t.render_state.depth_write);
        assert_eq!(t.keywords().count(), 0);
        assert_eq!(t.slots().count(), 1);
    }

    #[test]
    fn racing_callers_share_one_instance() {
        let addrs: Vec<usize> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| s.spawn(|| default_template() as *const _ as usize))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert!(addrs.windows(2).all(|w| w[0] == w[1]));
    }
}
