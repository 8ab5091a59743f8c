use super::*;
use crate::error::KotobaError;
use tempfile::tempdir;

#[test]
fn test_operations_before_initialize_fail() {
    let dir = tempdir().unwrap();
    let db = Database::new(dir.path().join(DATABASE_FILE), StoreConfig::default());

    assert!(!db.is_initialized());
    assert!(matches!(db.summarize(), Err(KotobaError::NotInitialized)));
    assert!(matches!(
        db.find_terms("打つ", &titles(&["d"])),
        Err(KotobaError::NotInitialized)
    ));
    assert!(matches!(
        db.find_terms_bulk(&[], &titles(&["d"])),
        Err(KotobaError::NotInitialized)
    ));
    assert!(matches!(
        db.find_tag_for_title("v5", "d"),
        Err(KotobaError::NotInitialized)
    ));
}

#[test]
fn test_initialize_twice_fails() {
    let dir = tempdir().unwrap();
    let mut db = open_db(&dir);
    assert!(matches!(
        db.initialize(),
        Err(KotobaError::AlreadyInitialized)
    ));
}

#[test]
fn test_close_then_operate_fails() {
    let dir = tempdir().unwrap();
    let mut db = open_db(&dir);
    seed_dictionary(&db, "d");

    db.close().unwrap();
    assert!(matches!(db.close(), Err(KotobaError::NotInitialized)));
    assert!(matches!(
        db.get_dictionary_counts(&strings(&["d"]), true),
        Err(KotobaError::NotInitialized)
    ));
    assert!(matches!(db.purge(), Err(KotobaError::NotInitialized)));
}

#[test]
fn test_reopen_keeps_records() {
    let dir = tempdir().unwrap();
    {
        let db = open_db(&dir);
        seed_dictionary(&db, "d");
    }

    let db = open_db(&dir);
    assert_eq!(db.summarize().unwrap(), vec![summary("d")]);
    assert_eq!(db.find_terms("打つ", &titles(&["d"])).unwrap().len(), 1);
}

#[test]
fn test_close_and_reinitialize() {
    let dir = tempdir().unwrap();
    let mut db = open_db(&dir);
    seed_dictionary(&db, "d");

    db.close().unwrap();
    db.initialize().unwrap();
    assert_eq!(db.summarize().unwrap().len(), 1);
}

#[test]
fn test_purge_leaves_empty_usable_store() {
    let dir = tempdir().unwrap();
    let mut db = open_db(&dir);
    seed_dictionary(&db, "d");
    db.find_tag_for_title("v5", "d").unwrap();

    db.purge().unwrap();

    assert!(db.summarize().unwrap().is_empty());
    let counts = db.get_dictionary_counts(&strings(&["d"]), true).unwrap();
    assert!(counts.counts[0].is_empty());
    assert!(counts.total.unwrap().is_empty());
    assert_eq!(db.find_tag_for_title_cached("v5", "d").unwrap(), None);

    // Same title can be imported again after a purge
    seed_dictionary(&db, "d");
    assert_eq!(db.summarize().unwrap().len(), 1);
}

#[test]
fn test_duplicate_registration_rejected() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    db.register_dictionary(&summary("d")).unwrap();

    let err = db.register_dictionary(&summary("d")).unwrap_err();
    assert!(matches!(err, KotobaError::DuplicateDictionary { ref title } if title == "d"));
    assert_eq!(db.summarize().unwrap().len(), 1);
}

#[test]
fn test_concurrent_registration_admits_one_handle() {
    let dir = tempdir().unwrap();
    let first = open_db(&dir);
    let second = open_db(&dir);

    let results: Vec<_> = [first, second]
        .into_iter()
        .map(|db| {
            std::thread::spawn(move || {
                let result = db.register_dictionary(&summary("d"));
                (db, result)
            })
        })
        .collect::<Vec<_>>()
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();

    let registered = results.iter().filter(|(_, r)| r.is_ok()).count();
    let duplicates = results
        .iter()
        .filter(|(_, r)| matches!(r, Err(KotobaError::DuplicateDictionary { title }) if title == "d"))
        .count();
    assert_eq!(registered, 1);
    assert_eq!(duplicates, 1);
    assert_eq!(results[0].0.summarize().unwrap().len(), 1);
    assert_eq!(results[1].0.summarize().unwrap().len(), 1);
}

#[test]
fn test_records_require_registered_dictionary() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);

    assert!(db.bulk_add(&[term("ghost", "打つ", "うつ", 1)]).is_err());
    assert_eq!(
        db.get_dictionary_counts(&[], true).unwrap().total.unwrap().terms,
        0
    );
}

#[test]
fn test_summarize_in_import_order() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    db.register_dictionary(&summary("b")).unwrap();
    db.register_dictionary(&summary("a")).unwrap();

    let names: Vec<String> = db.summarize().unwrap().into_iter().map(|s| s.title).collect();
    assert_eq!(names, strings(&["b", "a"]));
}

#[test]
fn test_dictionary_counts() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "a");
    seed_dictionary(&db, "b");

    let counts = db
        .get_dictionary_counts(&strings(&["a", "missing"]), true)
        .unwrap();
    assert_eq!(counts.counts.len(), 2);
    assert_eq!(counts.counts[0].terms, 3);
    assert_eq!(counts.counts[0].term_meta, 1);
    assert_eq!(counts.counts[0].kanji, 2);
    assert_eq!(counts.counts[0].kanji_meta, 1);
    assert_eq!(counts.counts[0].tag_meta, 1);
    assert!(counts.counts[1].is_empty());

    let total = counts.total.unwrap();
    assert_eq!(total.terms, 6);
    assert_eq!(total.tag_meta, 2);

    let without_total = db.get_dictionary_counts(&strings(&["a"]), false).unwrap();
    assert!(without_total.total.is_none());
}
