use crate::similarity::{rank, shared_tags};
use crate::weighted::{Weight, WeightedList};
use serde::{Deserialize, Serialize};
use std::fmt;
use time::Date;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Anything that carries weighted tags and a stable key.
///
/// The key identifies the logical entity across instances; two values with the
/// same key are treated as the same entity when excluding a query from its own
/// results.
pub trait TaggedEntity {
    fn key(&self) -> &str;
    fn tags(&self) -> &WeightedList<String>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub middle_name: String,
    /// Honorific such as "Dr." or "Captain"; empty when absent.
    #[serde(default)]
    pub title: String,
    /// "Jr.", "PhD" and the like; empty when absent.
    #[serde(default)]
    pub suffix: String,
}

impl Author {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self { first_name: first_name.into(), last_name: last_name.into(), ..Self::default() }
    }

    pub fn with_middle_name(mut self, middle_name: impl Into<String>) -> Self {
        self.middle_name = middle_name.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn full_name(&self) -> String {
        if self.middle_name.is_empty() {
            format!("{} {}", self.first_name, self.last_name)
        } else {
            format!("{} {} {}", self.first_name, self.middle_name, self.last_name)
        }
    }
}

impl fmt::Display for Author {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let full = self.full_name();
        let parts = [self.title.as_str(), full.as_str(), self.suffix.as_str()];
        let mut first = true;
        for part in parts.iter().filter(|p| !p.is_empty()) {
            if !first {
                f.write_str(" ")?;
            }
            f.write_str(part)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Book {
    title: String,
    authors: Vec<Author>,
    publisher: String,
    /// Date of the first edition; editions are not told apart.
    #[serde(with = "iso_date")]
    publication_date: Date,
    #[serde(default)]
    tags: WeightedList<String>,
}

impl Book {
    pub fn new(
        title: impl Into<String>,
        publisher: impl Into<String>,
        publication_date: Date,
        authors: impl IntoIterator<Item = Author>,
    ) -> Self {
        Self {
            title: title.into(),
            authors: authors.into_iter().collect(),
            publisher: publisher.into(),
            publication_date,
            tags: WeightedList::new(),
        }
    }

    pub fn with_author(
        title: impl Into<String>,
        publisher: impl Into<String>,
        publication_date: Date,
        author: Author,
    ) -> Self {
        Self::new(title, publisher, publication_date, [author])
    }

    pub fn title(&self) -> &str { &self.title }

    pub fn authors(&self) -> &[Author] { &self.authors }

    pub fn add_author(&mut self, author: Author) { self.authors.push(author) }

    pub fn publisher(&self) -> &str { &self.publisher }

    pub fn set_publisher(&mut self, publisher: impl Into<String>) { self.publisher = publisher.into() }

    pub fn publication_date(&self) -> Date { self.publication_date }

    pub fn set_publication_date(&mut self, date: Date) { self.publication_date = date }

    pub fn tags(&self) -> &WeightedList<String> { &self.tags }

    /// Tags the book. A repeated tag raises its weight by one.
    pub fn add_tag(&mut self, tag: impl Into<String>) -> bool { self.tags.add(tag.into()) }

    pub fn has_tag(&self, tag: &str) -> bool { self.tag_weight(tag).is_some() }

    pub fn tag_weight(&self, tag: &str) -> Option<Weight> {
        self.tags.entries().find(|(t, _)| t.as_str() == tag).map(|(_, w)| w)
    }

    pub fn compare_tags(&self, other: &Book) -> WeightedList<String> { shared_tags(self, other) }

    pub fn similarity(&self, other: &Book) -> Weight { rank(self, other) }
}

impl PartialEq for Book {
    fn eq(&self, other: &Self) -> bool { self.title == other.title }
}

impl Eq for Book {}

impl TaggedEntity for Book {
    fn key(&self) -> &str { &self.title }

    fn tags(&self) -> &WeightedList<String> { &self.tags }
}

/// Book record as submitted by clients and import files. Tags are a plain list;
/// repeats count toward the tag's weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub publisher: String,
    #[serde(with = "iso_date")]
    pub publication_date: Date,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl From<NewBook> for Book {
    fn from(input: NewBook) -> Self {
        let mut book = Book::new(input.title, input.publisher, input.publication_date, input.authors);
        book.tags.bulk_add(input.tags);
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn author_names() {
        let plain = Author::new("Frank", "Herbert");
        assert_eq!(plain.full_name(), "Frank Herbert");
        assert_eq!(plain.to_string(), "Frank Herbert");
        let full = Author::new("Ursula", "Le Guin").with_middle_name("K.").with_title("Dr.").with_suffix("PhD");
        assert_eq!(full.full_name(), "Ursula K. Le Guin");
        assert_eq!(full.to_string(), "Dr. Ursula K. Le Guin PhD");
    }

    #[test]
    fn tagging_raises_weight() {
        let mut book = Book::with_author("Dune", "Chilton", date!(1965 - 08 - 01), Author::new("Frank", "Herbert"));
        assert!(book.add_tag("scifi"));
        assert!(!book.add_tag("scifi"));
        assert!(book.has_tag("scifi"));
        assert!(!book.has_tag("romance"));
        assert_eq!(book.tag_weight("scifi"), Some(1));
        assert_eq!(book.tag_weight("romance"), None);
    }

    #[test]
    fn books_are_equal_by_title() {
        let mut a = Book::new("Dune", "Chilton", date!(1965 - 08 - 01), Vec::new());
        let b = Book::new("Dune", "Ace", date!(1990 - 01 - 01), Vec::new());
        a.add_tag("desert");
        assert_eq!(a, b);
        assert_eq!(a.key(), "Dune");
    }

    #[test]
    fn new_book_json_roundtrip() {
        let json = r#"{
            "title": "Foundation",
            "authors": [{"first_name": "Isaac", "last_name": "Asimov"}],
            "publisher": "Gnome",
            "publication_date": "1951-06-01",
            "tags": ["scifi", "empire", "scifi"]
        }"#;
        let input: NewBook = serde_json::from_str(json).unwrap();
        let book = Book::from(input);
        assert_eq!(book.publication_date(), date!(1951 - 06 - 01));
        assert_eq!(book.authors()[0].full_name(), "Isaac Asimov");
        assert_eq!(book.tags().get(0).map(String::as_str), Ok("scifi"));
        assert_eq!(book.tag_weight("scifi"), Some(1));

        let stored = serde_json::to_value(&book).unwrap();
        assert_eq!(stored["publication_date"], "1951-06-01");
        assert_eq!(stored["tags"][0]["value"], "scifi");
        let back: Book = serde_json::from_value(stored).unwrap();
        assert_eq!(back.tag_weight("empire"), Some(0));
    }
}
