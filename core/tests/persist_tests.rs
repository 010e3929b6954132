use bookrank::persist::{catalog_exists, load_catalog, load_meta, save_catalog, save_meta, CatalogPaths, MetaFile};
use bookrank::{Author, Book, Catalog, NewBook};
use tempfile::tempdir;
use time::macros::date;

fn sample_catalog() -> Catalog {
    let mut dune = Book::with_author("Dune", "Chilton", date!(1965 - 08 - 01), Author::new("Frank", "Herbert"));
    for tag in ["scifi", "scifi", "scifi", "desert", "desert"] {
        dune.add_tag(tag);
    }
    let foundation: Book = NewBook {
        title: "Foundation".into(),
        authors: vec![Author::new("Isaac", "Asimov")],
        publisher: "Gnome".into(),
        publication_date: date!(1951 - 06 - 01),
        tags: vec!["scifi".into(), "scifi".into(), "empire".into()],
    }
    .into();
    vec![dune, foundation].into_iter().collect()
}

#[test]
fn catalog_survives_save_and_load() {
    let dir = tempdir().unwrap();
    let paths = CatalogPaths::new(dir.path());
    assert!(!catalog_exists(&paths));

    let catalog = sample_catalog();
    save_catalog(&paths, &catalog).unwrap();
    assert!(catalog_exists(&paths));

    let meta = load_meta(&paths).unwrap();
    assert_eq!(meta.num_books, 2);
    assert_eq!(meta.version, 1);

    let loaded = load_catalog(&paths).unwrap();
    assert_eq!(loaded.len(), 2);
    let dune = loaded.get_book("Dune").unwrap();
    assert_eq!(dune.tag_weight("scifi"), Some(2));
    assert_eq!(dune.tag_weight("desert"), Some(1));
    assert_eq!(dune.tags().get(0).map(String::as_str), Ok("scifi"));
    assert_eq!(dune.publication_date(), date!(1965 - 08 - 01));
    assert_eq!(dune.authors()[0].full_name(), "Frank Herbert");

    let related = loaded.related("Dune").unwrap();
    assert_eq!(related.len(), 1);
    assert_eq!(related.weight_at(0), Ok(2));
}

#[test]
fn rejects_unknown_version() {
    let dir = tempdir().unwrap();
    let paths = CatalogPaths::new(dir.path());
    save_catalog(&paths, &sample_catalog()).unwrap();
    save_meta(&paths, &MetaFile { num_books: 2, created_at: String::new(), version: 99 }).unwrap();
    assert!(load_catalog(&paths).is_err());
}

#[test]
fn missing_catalog_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(load_catalog(&CatalogPaths::new(dir.path().join("nothing"))).is_err());
}
