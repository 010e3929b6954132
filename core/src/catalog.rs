use crate::entity::Book;
use crate::related::related_to;
use crate::weighted::WeightedList;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("no book titled {0:?}")]
    UnknownBook(String),
}

/// In-memory corpus of books keyed by title.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    books: HashMap<String, Book>,
}

impl Catalog {
    pub fn new() -> Self { Self::default() }

    pub fn len(&self) -> usize { self.books.len() }

    pub fn is_empty(&self) -> bool { self.books.is_empty() }

    /// Stores `book`, replacing any book with the same title. Returns the replaced book.
    pub fn add_book(&mut self, book: Book) -> Option<Book> {
        self.books.insert(book.title().to_string(), book)
    }

    pub fn get_book(&self, title: &str) -> Option<&Book> { self.books.get(title) }

    pub fn remove_book(&mut self, title: &str) -> Option<Book> { self.books.remove(title) }

    /// All books ordered by title.
    pub fn books(&self) -> Vec<&Book> {
        let mut all: Vec<&Book> = self.books.values().collect();
        all.sort_by(|a, b| a.title().cmp(b.title()));
        all
    }

    /// Adds `tag` to the named book. Returns true when the tag is new to the book.
    pub fn tag_book(&mut self, title: &str, tag: &str) -> Result<bool, CatalogError> {
        let book = self
            .books
            .get_mut(title)
            .ok_or_else(|| CatalogError::UnknownBook(title.to_string()))?;
        Ok(book.add_tag(tag))
    }

    /// Books ranked by similarity to the named book.
    pub fn related(&self, title: &str) -> Result<WeightedList<&Book>, CatalogError> {
        let query = self
            .get_book(title)
            .ok_or_else(|| CatalogError::UnknownBook(title.to_string()))?;
        Ok(related_to(query, self.books.values()))
    }
}

impl FromIterator<Book> for Catalog {
    fn from_iter<I: IntoIterator<Item = Book>>(iter: I) -> Self {
        let mut catalog = Catalog::new();
        for book in iter {
            catalog.add_book(book);
        }
        catalog
    }
}
