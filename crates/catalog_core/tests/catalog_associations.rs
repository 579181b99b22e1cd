use catalog_core::{AuthorId, BookId, Catalog, CatalogError, NewAuthor, NewBook, TagId};

fn gatsby_catalog() -> (Catalog, BookId, AuthorId) {
    let mut catalog = Catalog::new();
    let book = catalog
        .insert_book(NewBook::new("The Great Gatsby", 1925, 180).with_id(BookId(1)))
        .unwrap();
    let author = catalog
        .insert_author(NewAuthor::new("F. Scott", "Fitzgerald", 1896).with_id(AuthorId(1)))
        .unwrap();
    (catalog, book, author)
}

#[test]
fn linking_gatsby_and_fitzgerald_is_visible_from_both_sides() {
    let (mut catalog, book, author) = gatsby_catalog();

    assert!(catalog.add_author(book, author).unwrap());

    let authors = catalog.authors_of(book);
    let books = catalog.books_of(author);
    assert_eq!(authors.len(), 1);
    assert_eq!(authors[0], *catalog.author(author).unwrap());
    assert_eq!(books.len(), 1);
    assert_eq!(books[0], *catalog.book(book).unwrap());
    assert!(catalog.has_author(book, author));
    assert!(catalog.has_written(author, book));
}

#[test]
fn add_then_remove_round_trips() {
    let (mut catalog, book, author) = gatsby_catalog();

    catalog.add_author(book, author).unwrap();
    assert!(catalog.remove_author_from_book(book, author).unwrap());

    assert!(!catalog.has_author(book, author));
    assert!(!catalog.has_written(author, book));
    assert!(catalog.is_consistent());
}

#[test]
fn second_add_reports_no_change() {
    let (mut catalog, book, author) = gatsby_catalog();

    assert!(catalog.add_author(book, author).unwrap());
    assert!(!catalog.add_author(book, author).unwrap());
    assert!(!catalog.add_book_to_author(author, book).unwrap());
    assert_eq!(catalog.book(book).unwrap().author_ids().len(), 1);
    assert_eq!(catalog.author(author).unwrap().book_ids().len(), 1);
}

#[test]
fn removing_absent_link_reports_no_change() {
    let (mut catalog, book, author) = gatsby_catalog();

    assert!(!catalog.remove_author_from_book(book, author).unwrap());
    assert!(!catalog.remove_book_from_author(author, book).unwrap());
}

#[test]
fn author_side_operations_mirror_book_side() {
    let (mut catalog, book, author) = gatsby_catalog();

    assert!(catalog.add_book_to_author(author, book).unwrap());
    assert!(catalog.has_author(book, author));

    assert!(catalog.remove_book_from_author(author, book).unwrap());
    assert!(!catalog.has_author(book, author));
    assert!(!catalog.has_written(author, book));
}

#[test]
fn symmetry_holds_after_every_step_of_a_mixed_sequence() {
    let mut catalog = Catalog::new();
    let books = (0..4)
        .map(|idx| {
            catalog
                .insert_book(NewBook::new(format!("Book {idx}"), 1900 + idx, 100))
                .unwrap()
        })
        .collect::<Vec<_>>();
    let authors = (0..3)
        .map(|idx| {
            catalog
                .insert_author(NewAuthor::new("First", format!("Last {idx}"), 1850))
                .unwrap()
        })
        .collect::<Vec<_>>();

    // (add?, book index, author index, author-side?)
    let steps = [
        (true, 0, 0, false),
        (true, 0, 1, true),
        (true, 1, 0, false),
        (false, 0, 0, true),
        (true, 2, 2, true),
        (true, 0, 0, false),
        (false, 1, 0, false),
        (true, 3, 1, false),
        (false, 3, 1, true),
        (true, 1, 2, false),
        (false, 2, 2, false),
    ];

    for (add, book_idx, author_idx, author_side) in steps {
        let (book, author) = (books[book_idx], authors[author_idx]);
        match (add, author_side) {
            (true, false) => catalog.add_author(book, author).unwrap(),
            (true, true) => catalog.add_book_to_author(author, book).unwrap(),
            (false, false) => catalog.remove_author_from_book(book, author).unwrap(),
            (false, true) => catalog.remove_book_from_author(author, book).unwrap(),
        };

        for &book in &books {
            for &author in &authors {
                assert_eq!(
                    catalog.has_author(book, author),
                    catalog.has_written(author, book),
                    "asymmetric link between book {book} and author {author}"
                );
            }
        }
        assert!(catalog.is_consistent());
    }

    assert!(catalog.has_author(books[0], authors[0]));
    assert!(catalog.has_author(books[0], authors[1]));
    assert!(!catalog.has_author(books[1], authors[0]));
    assert!(catalog.has_author(books[1], authors[2]));
    assert!(!catalog.has_author(books[2], authors[2]));
    assert!(!catalog.has_author(books[3], authors[1]));
}

#[test]
fn snapshots_are_detached_copies() {
    let (mut catalog, book, author) = gatsby_catalog();
    catalog.add_author(book, author).unwrap();

    let mut ids = catalog.book(book).unwrap().author_ids();
    ids.clear();
    let mut authors = catalog.authors_of(book);
    authors.clear();

    assert!(catalog.has_author(book, author));
    assert_eq!(catalog.authors_of(book).len(), 1);
}

#[test]
fn add_tag_by_name_links_and_is_found_by_name() {
    let (mut catalog, book, _) = gatsby_catalog();

    let tag = catalog.add_tag_by_name(book, "fiction").unwrap();

    assert_eq!(tag.name(), "fiction");
    assert!(tag.is_on(book));
    assert!(catalog.has_tag_named(book, "fiction"));
    assert!(catalog.has_tag(book, tag.id()));
    assert!(!catalog.has_tag_named(book, "poetry"));
}

#[test]
fn add_tag_by_name_reuses_existing_tag() {
    let (mut catalog, book, _) = gatsby_catalog();
    let other = catalog
        .insert_book(NewBook::new("Tender Is the Night", 1934, 320))
        .unwrap();

    let first = catalog.add_tag_by_name(book, "classic").unwrap();
    let second = catalog.add_tag_by_name(other, " classic ").unwrap();

    assert_eq!(first.id(), second.id());
    assert_eq!(catalog.tag_count(), 1);
    let tagged = catalog.books_tagged(first.id());
    assert_eq!(tagged.len(), 2);
}

#[test]
fn insert_tag_rejects_duplicate_and_blank_names() {
    let mut catalog = Catalog::new();
    catalog.insert_tag("fiction").unwrap();

    let duplicate = catalog.insert_tag("fiction").unwrap_err();
    assert_eq!(duplicate, CatalogError::DuplicateTagName("fiction".to_string()));

    let blank = catalog.insert_tag("   ").unwrap_err();
    assert!(matches!(blank, CatalogError::Validation(_)));
    assert_eq!(catalog.tag_count(), 1);
}

#[test]
fn removing_entities_severs_every_link() {
    let (mut catalog, book, author) = gatsby_catalog();
    let other_book = catalog.insert_book(NewBook::new("The Beautiful and Damned", 1922, 449)).unwrap();
    catalog.add_author(book, author).unwrap();
    catalog.add_author(other_book, author).unwrap();
    let tag = catalog.add_tag_by_name(book, "jazz age").unwrap();
    catalog.add_tag(other_book, tag.id()).unwrap();

    let removed = catalog.remove_book(book).unwrap();
    assert!(removed.author_ids().is_empty());
    assert!(!catalog.has_written(author, book));
    assert!(!catalog.tag(tag.id()).unwrap().is_on(book));
    assert!(catalog.is_consistent());

    catalog.remove_tag(tag.id()).unwrap();
    assert!(catalog.book(other_book).unwrap().tag_ids().is_empty());

    catalog.remove_author(author).unwrap();
    assert!(catalog.book(other_book).unwrap().author_ids().is_empty());
    assert!(catalog.is_consistent());
}

#[test]
fn unknown_ids_are_reported_and_queries_are_false() {
    let (mut catalog, book, author) = gatsby_catalog();

    assert_eq!(
        catalog.add_author(BookId(99), author).unwrap_err(),
        CatalogError::UnknownBook(BookId(99))
    );
    assert_eq!(
        catalog.add_tag(book, TagId(5)).unwrap_err(),
        CatalogError::UnknownTag(TagId(5))
    );
    assert_eq!(
        catalog.remove_author(AuthorId(42)).unwrap_err(),
        CatalogError::UnknownAuthor(AuthorId(42))
    );
    assert!(!catalog.has_author(BookId(99), author));
    assert!(catalog.authors_of(BookId(99)).is_empty());
}

#[test]
fn field_setters_do_not_touch_links() {
    let (mut catalog, book, author) = gatsby_catalog();
    catalog.add_author(book, author).unwrap();

    let entry = catalog.book_mut(book).unwrap();
    entry.set_title("Trimalchio in West Egg");
    entry.set_number_of_pages(200);

    let entry = catalog.book(book).unwrap();
    assert_eq!(entry.title(), "Trimalchio in West Egg");
    assert!(entry.has_author(author));
    assert!(catalog.is_consistent());
}

#[test]
fn padded_tag_name_round_trips() {
    let (mut catalog, book, _) = gatsby_catalog();

    let tag = catalog.add_tag_by_name(book, " fiction ").unwrap();

    assert_eq!(tag.name(), "fiction");
    assert!(catalog.has_tag_named(book, " fiction "));
    assert!(catalog.has_tag_named(book, "fiction"));
}

#[test]
fn tag_add_then_remove_clears_both_sides() {
    let (mut catalog, book, _) = gatsby_catalog();
    let tag = catalog.insert_tag("classic").unwrap();

    assert!(catalog.add_tag(book, tag).unwrap());
    assert!(catalog.has_tag(book, tag));
    assert!(catalog.tag(tag).unwrap().is_on(book));

    assert!(catalog.remove_tag_from_book(book, tag).unwrap());
    assert!(!catalog.has_tag(book, tag));
    assert!(!catalog.tag(tag).unwrap().is_on(book));
    assert!(!catalog.has_tag_named(book, "classic"));

    assert!(!catalog.remove_tag_from_book(book, tag).unwrap());
    assert!(catalog.is_consistent());
}
