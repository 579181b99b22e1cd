use catalog_core::db::open_db_in_memory;
use catalog_core::{
    catalog_stats, AuthorId, AuthorService, AuthorServiceError, BookRepository, NewAuthor,
    NewBook, SqliteAuthorRepository, SqliteBookRepository, SqliteTagRepository, TagId,
    TagService, TagServiceError,
};

#[test]
fn author_crud_round_trip() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());

    let author = service
        .create_author(NewAuthor::new("Octavia", "Butler", 1947))
        .unwrap();
    assert_eq!(author.first_name(), "Octavia");

    let updated = service
        .update_author(author.id(), NewAuthor::new("Octavia E.", "Butler", 1947))
        .unwrap();
    assert_eq!(updated.first_name(), "Octavia E.");
    assert_eq!(service.list_authors().unwrap(), vec![updated.clone()]);
    assert_eq!(service.author_count().unwrap(), 1);

    service.delete_author(author.id()).unwrap();
    assert!(matches!(
        service.get_author(author.id()).unwrap_err(),
        AuthorServiceError::AuthorNotFound(_)
    ));
}

#[test]
fn author_errors_map_to_service_variants() {
    let conn = open_db_in_memory().unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    service
        .create_author(NewAuthor::new("Stanislaw", "Lem", 1921).with_id(AuthorId(5)))
        .unwrap();

    assert!(matches!(
        service
            .create_author(NewAuthor::new("Someone", "Else", 1900).with_id(AuthorId(5)))
            .unwrap_err(),
        AuthorServiceError::DuplicateAuthorId(AuthorId(5))
    ));
    assert!(matches!(
        service
            .update_author(AuthorId(6), NewAuthor::new("No", "One", 1))
            .unwrap_err(),
        AuthorServiceError::AuthorNotFound(AuthorId(6))
    ));
    assert!(matches!(
        service.delete_author(AuthorId(6)).unwrap_err(),
        AuthorServiceError::AuthorNotFound(AuthorId(6))
    ));
}

#[test]
fn deleting_author_unlinks_books() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let service = AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap());
    let author = service
        .create_author(NewAuthor::new("Octavia", "Butler", 1947))
        .unwrap();
    let book = books.create_book(&NewBook::new("Kindred", 1979, 264)).unwrap();
    books.link_author(book, author.id()).unwrap();

    service.delete_author(author.id()).unwrap();

    let book = books.get_book(book).unwrap().unwrap();
    assert!(book.author_ids().is_empty());
}

#[test]
fn tag_names_are_trimmed_unique_and_non_blank() {
    let conn = open_db_in_memory().unwrap();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());

    let tag = service.create_tag("  fiction ").unwrap();
    assert_eq!(tag.name(), "fiction");

    assert!(matches!(
        service.create_tag("fiction").unwrap_err(),
        TagServiceError::DuplicateTagName(name) if name == "fiction"
    ));
    assert!(matches!(
        service.create_tag("   ").unwrap_err(),
        TagServiceError::InvalidTag(_)
    ));
    assert_eq!(service.tag_count().unwrap(), 1);
    assert_eq!(service.find_tag(" fiction").unwrap(), Some(tag));
    assert_eq!(service.find_tag("poetry").unwrap(), None);
}

#[test]
fn tag_rename_list_and_delete() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let service = TagService::new(SqliteTagRepository::try_new(&conn).unwrap());
    let scifi = service.create_tag("scifi").unwrap();
    let classic = service.create_tag("classic").unwrap();
    let book = books.create_book(&NewBook::new("Dune", 1965, 412)).unwrap();
    books.link_tag(book, scifi.id()).unwrap();

    let renamed = service.rename_tag(scifi.id(), "science fiction").unwrap();
    assert_eq!(renamed.name(), "science fiction");
    assert!(renamed.is_on(book));

    assert!(matches!(
        service.rename_tag(scifi.id(), "classic").unwrap_err(),
        TagServiceError::DuplicateTagName(_)
    ));

    let names = service
        .list_tags()
        .unwrap()
        .iter()
        .map(|tag| tag.name().to_string())
        .collect::<Vec<_>>();
    assert_eq!(names, vec!["classic", "science fiction"]);

    service.delete_tag(scifi.id()).unwrap();
    assert!(books.get_book(book).unwrap().unwrap().tag_ids().is_empty());
    assert!(matches!(
        service.get_tag(scifi.id()).unwrap_err(),
        TagServiceError::TagNotFound(_)
    ));
    assert!(matches!(
        service.delete_tag(TagId(99)).unwrap_err(),
        TagServiceError::TagNotFound(TagId(99))
    ));
    assert_eq!(service.get_tag(classic.id()).unwrap(), classic);
}

#[test]
fn catalog_stats_counts_every_table() {
    let conn = open_db_in_memory().unwrap();
    let books = SqliteBookRepository::try_new(&conn).unwrap();
    let authors = SqliteAuthorRepository::try_new(&conn).unwrap();
    let tags = SqliteTagRepository::try_new(&conn).unwrap();

    let book = books.create_book(&NewBook::new("Dune", 1965, 412)).unwrap();
    books.create_book(&NewBook::new("Emma", 1815, 474)).unwrap();
    AuthorService::new(SqliteAuthorRepository::try_new(&conn).unwrap())
        .create_author(NewAuthor::new("Frank", "Herbert", 1920))
        .unwrap();
    books.tag_book_by_name(book, "scifi").unwrap();

    let stats = catalog_stats(&books, &authors, &tags).unwrap();
    assert_eq!(stats.book_count, 2);
    assert_eq!(stats.author_count, 1);
    assert_eq!(stats.tag_count, 1);
}
