use catalog_core::{AuthorId, BookId, Catalog, CatalogStats, NewAuthor, NewBook};
use serde_json::json;

#[test]
fn book_document_uses_original_field_names() {
    let mut catalog = Catalog::new();
    let book = catalog
        .insert_book(NewBook::new("The Great Gatsby", 1925, 180).with_id(BookId(1)))
        .unwrap();
    let author = catalog
        .insert_author(NewAuthor::new("F. Scott", "Fitzgerald", 1896).with_id(AuthorId(2)))
        .unwrap();
    catalog.add_author(book, author).unwrap();
    catalog.add_tag_by_name(book, "fiction").unwrap();

    let document = catalog.book_document(book).unwrap();
    let value = serde_json::to_value(&document).unwrap();

    assert_eq!(
        value,
        json!({
            "id": 1,
            "title": "The Great Gatsby",
            "year": 1925,
            "numberOfPages": 180,
            "authors": [
                {"id": 2, "firstname": "F. Scott", "lastName": "Fitzgerald", "birthYear": 1896}
            ],
            "tags": [{"id": 1, "name": "fiction"}]
        })
    );
}

#[test]
fn author_and_tag_omit_book_sets() {
    let mut catalog = Catalog::new();
    let book = catalog.insert_book(NewBook::new("Emma", 1815, 474)).unwrap();
    let author = catalog
        .insert_author(NewAuthor::new("Jane", "Austen", 1775))
        .unwrap();
    catalog.add_author(book, author).unwrap();
    let tag = catalog.add_tag_by_name(book, "classic").unwrap();

    let author_json = serde_json::to_value(catalog.author(author).unwrap()).unwrap();
    let tag_json = serde_json::to_value(&tag).unwrap();

    assert!(author_json.get("books").is_none());
    assert!(tag_json.get("books").is_none());
}

#[test]
fn create_payload_accepts_optional_id() {
    let without_id: NewBook =
        serde_json::from_str(r#"{"title":"Dune","year":1965,"numberOfPages":412}"#).unwrap();
    assert_eq!(without_id, NewBook::new("Dune", 1965, 412));

    let with_id: NewAuthor = serde_json::from_str(
        r#"{"id":7,"firstname":"Frank","lastName":"Herbert","birthYear":1920}"#,
    )
    .unwrap();
    assert_eq!(with_id, NewAuthor::new("Frank", "Herbert", 1920).with_id(AuthorId(7)));
}

#[test]
fn stats_serialize_camel_case() {
    let stats = CatalogStats {
        book_count: 3,
        author_count: 2,
        tag_count: 1,
    };

    assert_eq!(
        serde_json::to_value(stats).unwrap(),
        json!({"bookCount": 3, "authorCount": 2, "tagCount": 1})
    );
}
