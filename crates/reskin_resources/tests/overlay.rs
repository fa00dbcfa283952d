//! Replacement precedence and registration through the overlay.


use std::sync::Arc;

use reskin_core::testing::SolidAsset;
use reskin_core::{
    Forwarder, InvalidIdentifier, Replacement, ResId, ResourceError, ResourceProvider, Scope,
};
use reskin_resources::{Overlay, ReskinPlugin};
use reskin_system::host::Host;
use test_utils::*;

#[test]
fn system_wide_replacement_reaches_every_origin() {
    let (overlay, _) = overlay();
    overlay
        .set_system_wide_replacement(FW_CONFIG_ENABLED, true)
        .unwrap();

    let a = overlay.resources_for(app_scope(), app().shared());
    let b = overlay.resources_for(Scope::origin(OTHER_ORIGIN), app().shared());
    let fw = overlay.framework().unwrap();

    assert_eq!(a.boolean(FW_CONFIG_ENABLED), Ok(true));
    assert_eq!(b.boolean(FW_CONFIG_ENABLED), Ok(true));
    assert_eq!(fw.boolean(FW_CONFIG_ENABLED), Ok(true));
}

#[test]
fn origin_replacement_shadows_global_for_that_origin_only() {
    let (overlay, _) = overlay();
    overlay
        .set_system_wide_replacement(FW_BACKGROUND, 0x0000_0000)
        .unwrap();

    let a = overlay.resources_for(app_scope(), app().shared());
    let b = overlay.resources_for(Scope::origin(OTHER_ORIGIN), app().shared());
    a.set_replacement(FW_BACKGROUND, 0x00ff_0000).unwrap();

    assert_eq!(a.color(FW_BACKGROUND), Ok(0x00ff_0000));
    assert_eq!(a.integer(FW_BACKGROUND), Ok(0x00ff_0000));
    assert_eq!(b.color(FW_BACKGROUND), Ok(0x0000_0000));
}

#[test]
fn no_replacement_returns_original() {
    let (overlay, _) = overlay();
    let a = overlay.resources_for(app_scope(), app().shared());
    assert_eq!(&*a.text(APP_TITLE).unwrap(), "Title");
    assert_eq!(solid(a.drawable(APP_ICON).unwrap()), APP_ICON_ASSET);
    assert!(matches!(a.text(ResId::new(0x7f04_00ff)), Err(ResourceError::NotFound(_))));
}

#[test]
fn forwarder_is_indistinguishable_from_direct_lookup() {
    let (overlay, _) = overlay();
    let module: Arc<dyn ResourceProvider> = module().shared();
    let a = overlay.resources_for(app_scope(), app().shared());

    a.set_replacement(APP_ICON, Forwarder::new(&module, MOD_ICON))
        .unwrap();
    a.set_replacement(APP_MARGIN, Forwarder::new(&module, MOD_MARGIN))
        .unwrap();

    assert_eq!(solid(a.drawable(APP_ICON).unwrap()), solid(module.drawable(MOD_ICON).unwrap()));
    assert_eq!(
        solid(a.drawable_for_density(APP_ICON, 480).unwrap()),
        MOD_ICON_ASSET
    );
    assert_eq!(a.dimension(APP_MARGIN), module.dimension(MOD_MARGIN));
    assert_eq!(a.dimension_pixel_size(APP_MARGIN), Ok(24));
    // The forwarded value has no text; the error comes from the module.
    assert!(a.text(APP_MARGIN).is_err());
}

#[test]
fn forwarding_into_overlay_resources_sees_their_overrides() {
    const MODULE_ORIGIN: &str = "/data/app/com.example.module.apk";
    let (overlay, _) = overlay();

    // Every provider in the chain stays alive: forwarders hold them weakly.
    let margins: Arc<dyn ResourceProvider> = app().shared();
    let module = overlay.resources_for(Scope::origin(MODULE_ORIGIN), module().shared());
    let module_target: Arc<dyn ResourceProvider> = Arc::clone(&module) as Arc<dyn ResourceProvider>;
    let a = overlay.resources_for(app_scope(), app().shared());

    module
        .set_replacement(MOD_ICON, Replacement::Drawable(Arc::new(SolidAsset(7))))
        .unwrap();
    module
        .set_replacement(MOD_MARGIN, Forwarder::new(&margins, APP_MARGIN))
        .unwrap();
    a.set_replacement(APP_ICON, Forwarder::new(&module_target, MOD_ICON))
        .unwrap();
    a.set_replacement(APP_MARGIN, Forwarder::new(&module_target, MOD_MARGIN))
        .unwrap();

    // Direct override registered by the forwarding target.
    assert_eq!(solid(a.drawable(APP_ICON).unwrap()), SolidAsset(7));
    assert_eq!(solid(a.drawable(APP_ICON).unwrap()), solid(module.drawable(MOD_ICON).unwrap()));
    // Forwarder registered by the forwarding target, followed to the end.
    assert_eq!(a.dimension(APP_MARGIN), Ok(8.0));
    assert_eq!(a.dimension(APP_MARGIN), module.dimension(MOD_MARGIN));
}

#[test]
fn direct_text_array_answers_both_array_accessors() {
    let (overlay, _) = overlay();
    let a = overlay.resources_for(app_scope(), app().shared());
    let id = ResId::new(0x7f08_0001);
    let values: Arc<[Arc<str>]> = vec![Arc::from("one"), Arc::from("two")].into();

    a.set_replacement(id, Replacement::StringArray(Arc::clone(&values)))
        .unwrap();

    assert_eq!(a.string_array(id).unwrap().len(), 2);
    assert_eq!(a.text_array(id).unwrap().len(), 2);
    assert!(a.int_array(id).is_err());
}

#[test]
fn rejected_identifiers_leave_table_untouched() {
    let (overlay, _) = overlay();
    assert_eq!(
        overlay.set_system_wide_replacement(ResId::NULL, true),
        Err(ResourceError::InvalidIdentifier(InvalidIdentifier::Zero))
    );
    assert_eq!(
        overlay.set_system_wide_replacement(APP_ICON, true),
        Err(ResourceError::InvalidIdentifier(
            InvalidIdentifier::AppPrivateInGlobalScope(APP_ICON)
        ))
    );
    assert!(overlay.table().is_empty());

    // Framework resources are the global scope too.
    let fw = overlay.framework().unwrap();
    assert!(fw.set_replacement(APP_ICON, true).is_err());
}

#[test]
fn replacement_by_name_and_parts() {
    let (overlay, _) = overlay();
    let a = overlay.resources_for(app_scope(), app().shared());

    a.set_replacement_by_name("com.example.app:string/title", "Patched")
        .unwrap();
    assert_eq!(&*a.text(APP_TITLE).unwrap(), "Patched");

    overlay
        .set_system_wide_replacement_by_parts("android", "bool", "config_enabled", true)
        .unwrap();
    assert_eq!(a.boolean(FW_CONFIG_ENABLED), Ok(true));

    overlay
        .set_system_wide_replacement_by_name("android:color/background", 7)
        .unwrap();
    assert_eq!(a.color(FW_BACKGROUND), Ok(7));

    assert!(matches!(
        overlay.set_system_wide_replacement_by_name("android:color/nope", 1),
        Err(ResourceError::NotFound(_))
    ));
}

#[test]
fn name_based_global_registration_needs_framework() {
    let overlay = Overlay::new();
    assert!(matches!(
        overlay.set_system_wide_replacement_by_name("android:bool/config_enabled", true),
        Err(ResourceError::NotFound(_))
    ));
    // Id-based registration does not.
    overlay
        .set_system_wide_replacement(FW_CONFIG_ENABLED, true)
        .unwrap();
}

#[test]
fn latest_registration_wins() {
    let (overlay, _) = overlay();
    let a = overlay.resources_for(app_scope(), app().shared());
    a.set_replacement(APP_TITLE, "first").unwrap();
    a.set_replacement(APP_TITLE, "second").unwrap();
    assert_eq!(&*a.text(APP_TITLE).unwrap(), "second");
}

#[test]
fn plugin_installs_overlay_with_framework() {
    let mut host = Host::new();
    host.add_plugins(ReskinPlugin::default().with_framework(framework()));
    host.finish();

    let overlay = host.api::<Overlay>().unwrap();
    let fw = overlay.framework().unwrap();
    assert_eq!(fw.package_name(), "android");
    assert_eq!(fw.scope(), &Scope::Global);
}

#[test]
fn overlays_are_isolated() {
    let (first, _) = overlay();
    let (second, _) = overlay();
    first
        .set_system_wide_replacement(FW_CONFIG_ENABLED, true)
        .unwrap();

    let a = second.resources_for(app_scope(), app().shared());
    assert_eq!(a.boolean(FW_CONFIG_ENABLED), Ok(false));
}

#[test]
fn system_names_resolve_through_framework() {
    let (overlay, _) = overlay();
    let names = overlay.system_names(FW_BACKGROUND).unwrap();
    assert_eq!(names.full_name, "android:color/background");
    assert!(names.matches(Some("android"), Some("background"), None, None));
    assert!(overlay.names().get(FW_BACKGROUND, &Scope::Global).is_some());

    assert!(Overlay::new().system_names(FW_BACKGROUND).is_err());
}
