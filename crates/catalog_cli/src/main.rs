//! Command-line front end for the library catalog.
//!
//! # Responsibility
//! - Resolve configuration from flags and `CATALOG_*` environment variables.
//! - Drive `catalog_core` services and print JSON for listing commands.

use anyhow::{anyhow, Context, Result};
use catalog_core::db::open_db;
use catalog_core::{
    catalog_stats, default_log_level, init_logging, load_catalog, AuthorId, AuthorService,
    BookId, BookService, NewAuthor, NewBook, SqliteAuthorRepository, SqliteBookRepository,
    SqliteTagRepository, TagService,
};
use clap::Parser;
use log::info;
use std::path::PathBuf;

#[derive(Debug, clap::Parser)]
#[command(author, version, about = "Manage a library catalog of books, authors and tags")]
pub struct App {
    #[command(subcommand)]
    pub command: SubCommands,

    #[command(flatten)]
    global: Global,
}

#[derive(Debug, Clone, clap::Args)]
pub struct Global {
    /// SQLite database file
    #[arg(long, env = "CATALOG_DB", global = true, default_value = "catalog.sqlite3")]
    db: PathBuf,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "CATALOG_LOG_DIR", global = true)]
    log_dir: Option<String>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, env = "CATALOG_LOG_LEVEL", global = true)]
    log_level: Option<String>,
}

#[derive(Debug, clap::Subcommand)]
pub enum SubCommands {
    /// Show book, author and tag counts
    About,
    /// List books with their authors and tags as JSON
    Books,
    /// List authors as JSON
    Authors,
    /// List tags as JSON
    Tags,
    /// Add a book
    AddBook {
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 0)]
        year: i32,
        #[arg(long, default_value_t = 0)]
        pages: i32,
        /// Explicit id; generated when omitted
        #[arg(long)]
        id: Option<i64>,
    },
    /// Replace a book's title, year and page count
    UpdateBook {
        #[arg(long)]
        id: i64,
        #[arg(long)]
        title: String,
        #[arg(long, default_value_t = 0)]
        year: i32,
        #[arg(long, default_value_t = 0)]
        pages: i32,
    },
    /// Delete a book and its links
    DeleteBook {
        #[arg(long)]
        id: i64,
    },
    /// Add an author
    AddAuthor {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long, default_value_t = 0)]
        birth_year: i32,
    },
    /// Link an author to a book
    LinkAuthor {
        #[arg(long)]
        book: i64,
        #[arg(long)]
        author: i64,
    },
    /// Unlink an author from a book
    UnlinkAuthor {
        #[arg(long)]
        book: i64,
        #[arg(long)]
        author: i64,
    },
    /// Tag a book by name, creating the tag if needed
    Tag {
        #[arg(long)]
        book: i64,
        #[arg(long)]
        name: String,
    },
}

fn main() -> Result<()> {
    let app = App::parse();

    if let Some(log_dir) = app.global.log_dir.as_deref() {
        let level = app
            .global
            .log_level
            .clone()
            .unwrap_or_else(|| default_log_level().to_string());
        init_logging(&level, log_dir).map_err(|err| anyhow!(err))?;
    }

    let conn = open_db(&app.global.db)
        .with_context(|| format!("failed to open {}", app.global.db.display()))?;
    info!("event=cli_command module=cli status=start command={:?}", app.command);

    match app.command {
        SubCommands::About => {
            let stats = catalog_stats(
                &SqliteBookRepository::try_new(&conn)?,
                &SqliteAuthorRepository::try_new(&conn)?,
                &SqliteTagRepository::try_new(&conn)?,
            )?;
            println!("books={}", stats.book_count);
            println!("authors={}", stats.author_count);
            println!("tags={}", stats.tag_count);
        }
        SubCommands::Books => {
            let catalog = load_catalog(&conn)?;
            let documents = catalog
                .books()
                .filter_map(|book| catalog.book_document(book.id()))
                .collect::<Vec<_>>();
            println!("{}", serde_json::to_string_pretty(&documents)?);
        }
        SubCommands::Authors => {
            let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn)?);
            println!("{}", serde_json::to_string_pretty(&authors.list_authors()?)?);
        }
        SubCommands::Tags => {
            let tags = TagService::new(SqliteTagRepository::try_new(&conn)?);
            println!("{}", serde_json::to_string_pretty(&tags.list_tags()?)?);
        }
        SubCommands::AddBook {
            title,
            year,
            pages,
            id,
        } => {
            let books = BookService::new(SqliteBookRepository::try_new(&conn)?);
            let mut draft = NewBook::new(title, year, pages);
            draft.id = id.map(BookId);
            let book = books.create_book(draft)?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        SubCommands::UpdateBook {
            id,
            title,
            year,
            pages,
        } => {
            let books = BookService::new(SqliteBookRepository::try_new(&conn)?);
            let book = books.update_book(BookId(id), NewBook::new(title, year, pages))?;
            println!("{}", serde_json::to_string_pretty(&book)?);
        }
        SubCommands::DeleteBook { id } => {
            let books = BookService::new(SqliteBookRepository::try_new(&conn)?);
            books.delete_book(BookId(id))?;
            println!("Book deleted");
        }
        SubCommands::AddAuthor {
            first_name,
            last_name,
            birth_year,
        } => {
            let authors = AuthorService::new(SqliteAuthorRepository::try_new(&conn)?);
            let author = authors.create_author(NewAuthor::new(first_name, last_name, birth_year))?;
            println!("{}", serde_json::to_string_pretty(&author)?);
        }
        SubCommands::LinkAuthor { book, author } => {
            let books = BookService::new(SqliteBookRepository::try_new(&conn)?);
            let added = books.add_author(BookId(book), AuthorId(author))?;
            println!("{}", if added { "linked" } else { "already linked" });
        }
        SubCommands::UnlinkAuthor { book, author } => {
            let books = BookService::new(SqliteBookRepository::try_new(&conn)?);
            let removed = books.remove_author(BookId(book), AuthorId(author))?;
            println!("{}", if removed { "unlinked" } else { "not linked" });
        }
        SubCommands::Tag { book, name } => {
            let books = BookService::new(SqliteBookRepository::try_new(&conn)?);
            let tag = books.add_tag_by_name(BookId(book), &name)?;
            println!("{}", serde_json::to_string_pretty(&tag)?);
        }
    }

    Ok(())
}
