//! Concurrent access tests for `reskin_resources`.


use core::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};
use std::thread;

use reskin_core::{ResId, ResourceProvider, Scope};
use test_utils::*;

/// Writers on distinct identifiers never lose entries.
#[test]
fn parallel_writers_on_distinct_ids() {
    let (overlay, _) = overlay();
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8u32)
        .map(|t| {
            let overlay = overlay.clone();
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let scope = Scope::origin(format!("/data/app/{t}.apk"));
                barrier.wait();
                for i in 0..100u32 {
                    let id = ResId::new(0x7f01_0000 + t * 1_000 + i + 1);
                    overlay
                        .table()
                        .set(id, scope.clone(), (i as i32).into())
                        .unwrap();
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    assert_eq!(overlay.table().len(), 800);
}

/// Readers see either the original or a replacement, never a torn value.
#[test]
fn readers_during_writes() {
    let (overlay, _) = overlay();
    let res = overlay.resources_for(app_scope(), app().shared());
    let barrier = Arc::new(Barrier::new(5));

    let writer = {
        let res = Arc::clone(&res);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..200 {
                res.set_replacement(APP_TITLE, format!("v{i}")).unwrap();
            }
        })
    };
    let readers: Vec<_> = (0..4)
        .map(|_| {
            let res = Arc::clone(&res);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for _ in 0..200 {
                    let text = res.text(APP_TITLE).unwrap();
                    assert!(&*text == "Title" || text.starts_with('v'));
                }
            })
        })
        .collect();

    writer.join().expect("Thread panicked");
    for reader in readers {
        reader.join().expect("Thread panicked");
    }
    assert_eq!(&*res.text(APP_TITLE).unwrap(), "v199");
}

/// Exactly one of many concurrent checks observes a change.
#[test]
fn one_first_load_per_change() {
    let (overlay, source) = overlay();
    assert!(overlay.check_first_load(&app_scope()));
    source.touch(APP_ORIGIN);

    let firsts = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let overlay = overlay.clone();
            let firsts = Arc::clone(&firsts);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                if overlay.check_first_load(&app_scope()) {
                    firsts.fetch_add(1, Ordering::SeqCst);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    assert_eq!(firsts.load(Ordering::SeqCst), 1);
}

/// Purging one origin never drops another origin's concurrent registrations.
#[test]
fn purge_does_not_touch_concurrent_writers_of_other_origins() {
    let (overlay, source) = overlay();
    let other = Scope::origin(OTHER_ORIGIN);
    assert!(overlay.check_first_load(&app_scope()));
    let barrier = Arc::new(Barrier::new(2));

    let purger = {
        let overlay = overlay.clone();
        let source = Arc::clone(&source);
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for _ in 0..100 {
                source.touch(APP_ORIGIN);
                overlay.check_first_load(&app_scope());
            }
        })
    };
    let writer = {
        let overlay = overlay.clone();
        let other = other.clone();
        let barrier = Arc::clone(&barrier);
        thread::spawn(move || {
            barrier.wait();
            for i in 0..500u32 {
                let id = ResId::new(0x7f01_0001 + i);
                overlay.table().set(id, other.clone(), true.into()).unwrap();
            }
        })
    };

    purger.join().expect("Thread panicked");
    writer.join().expect("Thread panicked");

    for i in 0..500u32 {
        assert!(overlay.table().contains(ResId::new(0x7f01_0001 + i), &other));
    }
}

/// Dispatch from many threads fires each parser's callbacks exactly once.
#[test]
fn concurrent_dispatch_fires_once_per_parser() {
    let (overlay, _) = overlay();
    let res = overlay.resources_for(app_scope(), app().shared());
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let fired = Arc::clone(&fired);
        res.hook_layout(
            APP_MAIN,
            reskin_resources::LayoutCallback::new(move |_| {
                fired.fetch_add(1, Ordering::SeqCst);
            }),
        )
        .unwrap();
    }

    let parsers: Vec<_> = (0..16)
        .map(|_| res.load_document(APP_MAIN, "layout").unwrap().parser)
        .collect();
    let parsers = Arc::new(parsers);
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let overlay = overlay.clone();
            let parsers = Arc::clone(&parsers);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                for parser in parsers.iter() {
                    overlay.dispatch_inflated(parser.as_ref(), &());
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    assert_eq!(fired.load(Ordering::SeqCst), 16);
}
