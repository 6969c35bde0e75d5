//! Integration tests for layered settings resolution.

#![allow(unsafe_code)] // For env var manipulation in tests

mod support;

use config::ValueKind;
use std::env;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use strata_config::error::{Result, SettingsError};
use strata_config::loaders::{ConfigStore, EnvLoaderFactory, LoaderFactory, StoreLoaderFactory};
use strata_config::secrets::{
    CachedSource, SecretBackend, SecretCache, SecretSource, StaticSecrets,
};
use strata_config::settings::Settings;
use support::count_warnings;

struct CountingSecrets {
    calls: Arc<AtomicUsize>,
    secret: Option<String>,
}

impl SecretSource for CountingSecrets {
    fn fetch(&self, _key: &str) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.secret.clone())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

fn fish_backend() -> SecretBackend {
    SecretBackend::new(StaticSecrets::new().with_secret("fish", "goodbye"))
}

fn get_str(settings: &Settings, name: &str) -> String {
    settings.get(name).unwrap().into_string().unwrap()
}

#[test]
fn test_defaults_without_loaders() {
    let settings = Settings::new([("A", "DEFAULT")], "STRATA_IT_DFLT", vec![], vec![]);

    assert_eq!(get_str(&settings, "A"), "DEFAULT");
    assert!(matches!(
        settings.get("B"),
        Err(SettingsError::UnknownSetting(name)) if name == "B"
    ));
}

#[test]
fn test_environ_settings() {
    unsafe {
        env::set_var("STRATA_IT_ENV_A_SETTING", "NEW_VALUE");
    }

    let settings = Settings::new(
        [("A_SETTING", "DEFAULT")],
        "STRATA_IT_ENV",
        vec![Arc::new(EnvLoaderFactory::new())],
        vec![],
    );
    assert_eq!(get_str(&settings, "A_SETTING"), "NEW_VALUE");

    unsafe {
        env::remove_var("STRATA_IT_ENV_A_SETTING");
    }
}

#[test]
fn test_store_settings() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_STORE", "A_SETTING", "NEW_VALUE");

    let settings = Settings::new(
        [("A_SETTING", "DEFAULT")],
        "STRATA_IT_STORE",
        vec![Arc::new(StoreLoaderFactory::new(store))],
        vec![],
    );
    assert_eq!(get_str(&settings, "A_SETTING"), "NEW_VALUE");
}

#[test]
fn test_store_precedes_environ() {
    unsafe {
        env::set_var("STRATA_IT_PREC_A_SETTING", "environ");
    }
    let store = ConfigStore::new();
    store.set("STRATA_IT_PREC", "A_SETTING", "store");

    let settings = Settings::new(
        [("A_SETTING", "DEFAULT")],
        "STRATA_IT_PREC",
        vec![
            Arc::new(StoreLoaderFactory::new(store)),
            Arc::new(EnvLoaderFactory::new()),
        ],
        vec![],
    );
    assert_eq!(get_str(&settings, "A_SETTING"), "store");

    unsafe {
        env::remove_var("STRATA_IT_PREC_A_SETTING");
    }
}

#[test]
fn test_store_writes_visible_without_rebuild() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_LIVE", "A_SETTING", "before");

    let settings = Settings::new(
        [("A_SETTING", "DEFAULT")],
        "STRATA_IT_LIVE",
        vec![Arc::new(StoreLoaderFactory::new(store.clone()))],
        vec![],
    );
    assert_eq!(get_str(&settings, "A_SETTING"), "before");

    store.set("STRATA_IT_LIVE", "A_SETTING", "after");
    assert_eq!(get_str(&settings, "A_SETTING"), "after");
}

#[test]
fn test_secret_substitution_from_store() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_SECSTORE", "FISH", "%%fish%%");

    let settings = Settings::new(
        [("FISH", "thanks")],
        "STRATA_IT_SECSTORE",
        vec![Arc::new(StoreLoaderFactory::new(store))],
        vec![fish_backend()],
    );
    assert_eq!(get_str(&settings, "FISH"), "goodbye");
}

#[test]
fn test_secret_substitution_from_environ() {
    unsafe {
        env::set_var("STRATA_IT_SECENV_FISH", "%%fish%%");
    }

    let settings = Settings::new(
        [("FISH", "thanks")],
        "STRATA_IT_SECENV",
        vec![Arc::new(EnvLoaderFactory::new())],
        vec![fish_backend()],
    );
    assert_eq!(get_str(&settings, "FISH"), "goodbye");

    unsafe {
        env::remove_var("STRATA_IT_SECENV_FISH");
    }
}

#[test]
fn test_secret_substitution_of_default() {
    let settings = Settings::new(
        [("FISH", "%%fish%%")],
        "STRATA_IT_SECDFLT",
        vec![],
        vec![fish_backend()],
    );
    assert_eq!(get_str(&settings, "FISH"), "goodbye");
}

#[test]
fn test_placeholder_without_backends_warns_once() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_NOBACK", "FISH", "%%fish%%");

    let settings = Settings::new(
        [("FISH", "thanks")],
        "STRATA_IT_NOBACK",
        vec![Arc::new(StoreLoaderFactory::new(store))],
        vec![],
    );

    let (value, warnings) = count_warnings(|| get_str(&settings, "FISH"));
    assert_eq!(value, "%%fish%%");
    assert_eq!(warnings, 1);
}

#[test]
fn test_missing_secret_warns_once_and_falls_back() {
    let settings = Settings::new(
        [("FISH", "%%fish%%")],
        "STRATA_IT_MISSING",
        vec![],
        vec![SecretBackend::new(StaticSecrets::new())],
    );

    let (value, warnings) = count_warnings(|| get_str(&settings, "FISH"));
    assert_eq!(value, "%%fish%%");
    assert_eq!(warnings, 1);
}

#[test]
fn test_second_backend_fills_first_miss() {
    let settings = Settings::new(
        [("FISH", "%%fish%%")],
        "STRATA_IT_SECOND",
        vec![],
        vec![
            SecretBackend::new(StaticSecrets::new()),
            SecretBackend::new(StaticSecrets::new().with_secret("fish", "ok")),
        ],
    );
    assert_eq!(get_str(&settings, "FISH"), "ok");
}

#[test]
fn test_non_string_value_with_backends() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_NONSTR", "FISH", 17_i64);

    let settings = Settings::new(
        [("FISH", 42_i64)],
        "STRATA_IT_NONSTR",
        vec![Arc::new(StoreLoaderFactory::new(store))],
        vec![fish_backend()],
    );

    let (value, warnings) = count_warnings(|| settings.get("FISH").unwrap());
    match value.kind {
        ValueKind::I64(n) => assert_eq!(n, 17),
        other => panic!("unexpected kind {other:?}"),
    }
    assert_eq!(warnings, 0);
}

#[test]
fn test_reconfigure_without_secret_backends() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_RECONF", "FISH", "%%fish%%");

    let settings = Settings::new(
        [("FISH", "thanks")],
        "STRATA_IT_RECONF",
        vec![Arc::new(StoreLoaderFactory::new(store))],
        vec![fish_backend()],
    );
    assert_eq!(get_str(&settings, "FISH"), "goodbye");

    settings.reconfigure(None, Some(vec![]));
    assert_eq!(get_str(&settings, "FISH"), "%%fish%%");
}

#[test]
fn test_reconfigure_without_store_loader() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_DROPSTORE", "THE_ANSWER", 42_i64);

    let settings = Settings::new(
        [("THE_ANSWER", "DEFAULT")],
        "STRATA_IT_DROPSTORE",
        vec![
            Arc::new(StoreLoaderFactory::new(store)) as Arc<dyn LoaderFactory>,
            Arc::new(EnvLoaderFactory::new()),
        ],
        vec![],
    );

    match settings.get("THE_ANSWER").unwrap().kind {
        ValueKind::I64(n) => assert_eq!(n, 42),
        other => panic!("unexpected kind {other:?}"),
    }

    settings.reconfigure(Some(vec![Arc::new(EnvLoaderFactory::new())]), None);
    assert_eq!(get_str(&settings, "THE_ANSWER"), "DEFAULT");
}

#[test]
fn test_secret_lookup_reinvoked_every_access() {
    let calls = Arc::new(AtomicUsize::new(0));
    let backend = SecretBackend::new(CountingSecrets {
        calls: Arc::clone(&calls),
        secret: Some("foo".to_string()),
    });

    let settings = Settings::new(
        [("FISH", "%%fish%%")],
        "STRATA_IT_FRESH",
        vec![],
        vec![backend],
    );

    for _ in 0..3 {
        assert_eq!(get_str(&settings, "FISH"), "foo");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_cached_backend_fetches_once_until_flush() {
    let calls = Arc::new(AtomicUsize::new(0));
    let cache = SecretCache::new();
    let backend = SecretBackend::new(CachedSource::with_cache(
        CountingSecrets {
            calls: Arc::clone(&calls),
            secret: Some("foo".to_string()),
        },
        cache.clone(),
    ));

    let settings = Settings::new(
        [("SECRET", "%%the-key%%")],
        "STRATA_IT_CACHE",
        vec![],
        vec![backend],
    );

    // Any number of accesses for the same key, one underlying lookup.
    for _ in 0..3 {
        assert_eq!(get_str(&settings, "SECRET"), "foo");
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Until the cache is flushed.
    cache.flush();
    assert_eq!(get_str(&settings, "SECRET"), "foo");
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_keys_in_declaration_order() {
    let settings = Settings::new(
        [("ANOTHER_SETTING", "AMAZING"), ("A_SETTING", "DEFAULT")],
        "STRATA_IT_KEYS",
        vec![],
        vec![],
    );
    assert_eq!(settings.keys(), vec!["ANOTHER_SETTING", "A_SETTING"]);
}

#[test]
fn test_store_not_ready_warns_once_per_build() {
    let store = ConfigStore::new();
    store.set("STRATA_IT_NOTREADY", "A", "present");
    store.set_ready(false);

    let settings = Settings::new(
        [("A", "DEFAULT_A"), ("B", "DEFAULT_B")],
        "STRATA_IT_NOTREADY",
        vec![Arc::new(StoreLoaderFactory::new(store.clone()))],
        vec![],
    );

    // Two keys probe the not-ready store during one table build; the
    // warning is emitted once and every key falls back.
    let (values, warnings) = count_warnings(|| {
        (get_str(&settings, "A"), get_str(&settings, "B"))
    });
    assert_eq!(values, ("DEFAULT_A".to_string(), "DEFAULT_B".to_string()));
    assert_eq!(warnings, 1);

    // Once the store is ready, a rebuild picks its values up.
    store.set_ready(true);
    settings.reconfigure(None, None);
    assert_eq!(get_str(&settings, "A"), "present");
}
