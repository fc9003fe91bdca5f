use locator_core_types::{ElementName, LocatorStrategy};
use locator_store::LocatorStore;
use serde_json::{json, Value};

fn name(raw: &str) -> ElementName {
    ElementName::new(raw).unwrap()
}

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn missing_file_is_created_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config").join("element-locators.json");

    let store = LocatorStore::load(&path);

    assert!(store.is_empty());
    assert!(store.is_persistent());
    assert_eq!(read_json(&path), json!({}));
}

#[test]
fn invalid_json_yields_empty_cache_and_is_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("element-locators.json");
    std::fs::write(&path, "{\"addToCartButton\": ").unwrap();

    let store = LocatorStore::load(&path);

    assert!(store.is_empty());
    assert!(store.get(&name("addToCartButton")).is_none());
    assert_eq!(read_json(&path), json!({}));
}

#[test]
fn put_is_visible_to_a_fresh_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("element-locators.json");

    let store = LocatorStore::load(&path);
    store.put(
        &name("addToCartButton"),
        &LocatorStrategy::xpath("//button[contains(text(),'Add')]"),
    );

    assert_eq!(
        read_json(&path),
        json!({
            "addToCartButton": {"by": "xpath", "value": "//button[contains(text(),'Add')]"}
        })
    );

    let reloaded = LocatorStore::load(&path);
    assert_eq!(
        reloaded.get(&name("addToCartButton")),
        Some(LocatorStrategy::xpath("//button[contains(text(),'Add')]"))
    );
}

#[test]
fn unknown_entries_survive_rewrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("element-locators.json");
    std::fs::write(
        &path,
        r#"{
  "legacyLink": {"by": "linkText", "value": "Checkout"},
  "_meta": {"owner": "qa"}
}"#,
    )
    .unwrap();

    let store = LocatorStore::load(&path);
    assert!(store.get(&name("legacyLink")).is_none());
    store.put(&name("cartIcon"), &LocatorStrategy::id("cart"));

    let doc = read_json(&path);
    assert_eq!(doc["legacyLink"], json!({"by": "linkText", "value": "Checkout"}));
    assert_eq!(doc["_meta"], json!({"owner": "qa"}));
    assert_eq!(doc["cartIcon"], json!({"by": "id", "value": "cart"}));
    assert_eq!(store.names(), vec![name("cartIcon")]);
}

#[test]
fn put_merges_entries_written_by_another_store() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("element-locators.json");

    let worker_a = LocatorStore::load(&path);
    let worker_b = LocatorStore::load(&path);

    worker_a.put(&name("searchBox"), &LocatorStrategy::name("q"));
    worker_b.put(&name("cartIcon"), &LocatorStrategy::css("#cart"));

    let reloaded = LocatorStore::load(&path);
    assert_eq!(
        reloaded.get(&name("searchBox")),
        Some(LocatorStrategy::name("q"))
    );
    assert_eq!(
        reloaded.get(&name("cartIcon")),
        Some(LocatorStrategy::css("#cart"))
    );
}

#[test]
fn concurrent_puts_never_tear_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("element-locators.json");
    let store = std::sync::Arc::new(LocatorStore::load(&path));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = store.clone();
            std::thread::spawn(move || {
                for round in 0..10 {
                    let key = name(&format!("element{worker}"));
                    store.put(&key, &LocatorStrategy::css(format!(".item-{round}")));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    let doc = read_json(&path);
    assert_eq!(doc.as_object().unwrap().len(), 8);
    assert_eq!(doc["element3"], json!({"by": "css", "value": ".item-9"}));

    let leftovers: Vec<_> = std::fs::read_dir(dir.path())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty());
}
