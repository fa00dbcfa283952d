//! Stale-override invalidation when an origin changes on disk.


use std::time::{Duration, SystemTime};

use reskin_core::{ResourceProvider, Scope};
use test_utils::*;

#[test]
fn unchanged_origin_keeps_its_replacements() {
    let (overlay, source) = overlay();
    source.set(APP_ORIGIN, SystemTime::UNIX_EPOCH + Duration::from_secs(1_000));
    let res = overlay.resources_for(app_scope(), app().shared());

    assert!(res.check_first_load());
    res.set_replacement(APP_TITLE, "Patched").unwrap();

    let reloaded = overlay.resources_for(app_scope(), app().shared());
    assert!(!reloaded.check_first_load());
    assert_eq!(&*reloaded.text(APP_TITLE).unwrap(), "Patched");
}

#[test]
fn changed_origin_drops_only_its_own_replacements() {
    let (overlay, source) = overlay();
    let other = Scope::origin(OTHER_ORIGIN);
    let res = overlay.resources_for(app_scope(), app().shared());
    let other_res = overlay.resources_for(other.clone(), app().shared());

    assert!(res.check_first_load());
    assert!(other_res.check_first_load());
    res.set_replacement(APP_TITLE, "Stale").unwrap();
    other_res.set_replacement(APP_TITLE, "Other").unwrap();
    overlay
        .set_system_wide_replacement(FW_CONFIG_ENABLED, true)
        .unwrap();

    source.touch(APP_ORIGIN);

    assert!(res.check_first_load());
    assert_eq!(&*res.text(APP_TITLE).unwrap(), "Title");
    assert_eq!(&*other_res.text(APP_TITLE).unwrap(), "Other");
    assert_eq!(res.boolean(FW_CONFIG_ENABLED), Ok(true));
    assert!(!other_res.check_first_load());
}

#[test]
fn framework_scope_is_never_first_load() {
    let (overlay, _) = overlay();
    let fw = overlay.framework().unwrap();
    assert!(!fw.check_first_load());
    assert!(!overlay.check_first_load(&Scope::Global));
}

#[test]
fn re_registration_after_change_is_kept() {
    let (overlay, source) = overlay();
    let res = overlay.resources_for(app_scope(), app().shared());
    assert!(res.check_first_load());

    source.touch(APP_ORIGIN);
    assert!(res.check_first_load());
    res.set_replacement(APP_TITLE, "Fresh").unwrap();

    assert!(!res.check_first_load());
    assert_eq!(&*res.text(APP_TITLE).unwrap(), "Fresh");
}
