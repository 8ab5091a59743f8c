use super::*;
use tempfile::tempdir;

#[test]
fn test_find_terms_matches_expression_or_reading() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "d");

    let found = db.find_terms("うつ", &titles(&["d"])).unwrap();
    let expressions: Vec<&str> = found.iter().map(|t| t.expression.as_str()).collect();
    assert_eq!(expressions, vec!["打つ", "うつ"]);
    assert!(found.iter().all(|t| t.index.is_none()));
}

#[test]
fn test_find_terms_filters_titles() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "a");
    seed_dictionary(&db, "b");

    let found = db.find_terms("打つ", &titles(&["b"])).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].dictionary, "b");

    assert!(db.find_terms("打つ", &titles(&[])).unwrap().is_empty());
}

#[test]
fn test_find_terms_decodes_record() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "d");

    let found = db.find_terms("打ち込む", &titles(&["d"])).unwrap();
    let entry = &found[0];
    assert_eq!(entry.reading, "うちこむ");
    assert_eq!(entry.definition_tags, strings(&["v5"]));
    assert_eq!(entry.glossary, vec![json!("打ち込む gloss")]);
    assert_eq!(entry.sequence, 2);
    assert_eq!(entry.score, 1.0);
}

#[test]
fn test_find_terms_exact() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "d");

    let found = db.find_terms_exact("打つ", "うつ", &titles(&["d"])).unwrap();
    assert_eq!(found.len(), 1);
    assert!(db
        .find_terms_exact("打つ", "だ", &titles(&["d"]))
        .unwrap()
        .is_empty());
}

#[test]
fn test_find_terms_by_sequence() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "d");

    let found = db.find_terms_by_sequence(3, &titles(&["d"])).unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].expression, "うつ");
}

#[test]
fn test_find_meta_and_kanji() {
    let dir = tempdir().unwrap();
    let db = open_db(&dir);
    seed_dictionary(&db, "d");
    let d = titles(&["d"]);

    let meta = db.find_term_meta("打つ", &d).unwrap();
    assert_eq!(meta.len(), 1);
    assert_eq!(meta[0].mode, "freq");
    assert_eq!(meta[0].data, json!(1));

    let kanji = db.find_kanji("打", &d).unwrap();
    assert_eq!(kanji.len(), 1);
    assert_eq!(kanji[0].glossary, strings(&["strike"]));
    assert_eq!(kanji[0].stats.as_ref().unwrap()["strokes"], json!("5"));

    let kanji_meta = db.find_kanji_meta("打", &d).unwrap();
    assert_eq!(kanji_meta[0].data, json!(2));
    assert!(db.find_kanji_meta("込", &d).unwrap().is_empty());
}
