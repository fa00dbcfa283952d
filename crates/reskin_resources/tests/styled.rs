//! Override-aware styled attribute arrays.


use std::sync::Arc;

use reskin_core::{AssetHandle, Forwarder, ResId, ResourceProvider, StyledAttributes};
use test_utils::*;

/// Attribute array where index `i` was resolved from `ids[i]` and holds `values[i]`.
struct Attrs {
    ids: Vec<ResId>,
    values: Vec<i32>,
}

impl StyledAttributes for Attrs {
    fn len(&self) -> usize {
        self.ids.len()
    }

    fn resource_id(&self, index: usize) -> ResId {
        self.ids.get(index).copied().unwrap_or(ResId::NULL)
    }

    fn boolean(&self, index: usize, default: bool) -> bool {
        self.values.get(index).map_or(default, |v| *v != 0)
    }

    fn color(&self, index: usize, default: i32) -> i32 {
        self.integer(index, default)
    }

    fn dimension(&self, index: usize, default: f32) -> f32 {
        self.values.get(index).map_or(default, |v| *v as f32)
    }

    fn dimension_pixel_offset(&self, index: usize, default: i32) -> i32 {
        self.integer(index, default)
    }

    fn dimension_pixel_size(&self, index: usize, default: i32) -> i32 {
        self.integer(index, default)
    }

    fn drawable(&self, _index: usize) -> Option<AssetHandle> {
        None
    }

    fn float(&self, index: usize, default: f32) -> f32 {
        self.dimension(index, default)
    }

    fn fraction(&self, index: usize, _base: i32, _parent_base: i32, default: f32) -> f32 {
        self.dimension(index, default)
    }

    fn int(&self, index: usize, default: i32) -> i32 {
        self.integer(index, default)
    }

    fn integer(&self, index: usize, default: i32) -> i32 {
        self.values.get(index).copied().unwrap_or(default)
    }

    fn layout_dimension(&self, index: usize, default: i32) -> i32 {
        self.integer(index, default)
    }

    fn string(&self, index: usize) -> Option<Arc<str>> {
        self.values.get(index).map(|v| Arc::from(v.to_string()))
    }

    fn text(&self, index: usize) -> Option<Arc<str>> {
        self.string(index)
    }

    fn text_array(&self, _index: usize) -> Option<Arc<[Arc<str>]>> {
        None
    }
}

#[test]
fn direct_replacements_apply_per_kind() {
    let (overlay, _) = overlay();
    let res = overlay.resources_for(app_scope(), app().shared());
    res.set_replacement(FW_BACKGROUND, 0x0012_3456).unwrap();
    res.set_replacement(APP_TITLE, "Patched").unwrap();

    let attrs = res.styled(Attrs {
        ids: vec![FW_BACKGROUND, APP_TITLE, APP_MARGIN],
        values: vec![1, 2, 3],
    });

    assert_eq!(attrs.len(), 3);
    assert_eq!(attrs.color(0, 0), 0x0012_3456);
    assert_eq!(attrs.integer(0, 0), 0x0012_3456);
    // Int replacements do not answer text getters.
    assert_eq!(attrs.text(0).as_deref(), Some("1"));
    assert_eq!(attrs.string(1).as_deref(), Some("Patched"));
    // No replacement: the wrapped value.
    assert_eq!(attrs.integer(2, 0), 3);
}

#[test]
fn forwarders_apply_to_every_getter() {
    let (overlay, _) = overlay();
    let foreign: Arc<dyn ResourceProvider> = module().shared();
    let res = overlay.resources_for(app_scope(), app().shared());
    res.set_replacement(APP_MARGIN, Forwarder::new(&foreign, MOD_MARGIN))
        .unwrap();
    res.set_replacement(APP_ICON, Forwarder::new(&foreign, MOD_ICON))
        .unwrap();

    let attrs = res.styled(Attrs {
        ids: vec![APP_MARGIN, APP_ICON],
        values: vec![8, 0],
    });

    assert_eq!(attrs.dimension(0, 0.0), 24.0);
    assert_eq!(attrs.float(0, 0.0), 24.0);
    assert_eq!(attrs.dimension_pixel_size(0, 0), 24);
    assert_eq!(attrs.layout_dimension(0, 0), 24);
    assert_eq!(solid(attrs.drawable(1).unwrap()), MOD_ICON_ASSET);
}

#[test]
fn failed_forwarded_lookup_uses_wrapped_value() {
    let (overlay, _) = overlay();
    let foreign: Arc<dyn ResourceProvider> = module().shared();
    let res = overlay.resources_for(app_scope(), app().shared());
    // The module's margin is a dimension, not a color.
    res.set_replacement(APP_MARGIN, Forwarder::new(&foreign, MOD_MARGIN))
        .unwrap();

    let attrs = res.styled(Attrs {
        ids: vec![APP_MARGIN],
        values: vec![8],
    });
    assert_eq!(attrs.color(0, -1), 8);
    assert_eq!(attrs.into_inner().values, vec![8]);
}
