use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ClientError, Result};
use crate::validation::{require_non_blank, validate_isbn};

/// Account that added a book to the catalogue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookCreator {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub isbn: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub created_by: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<BookCreator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBook {
    pub title: String,
    pub author: String,
    pub isbn: String,
}

impl CreateBook {
    pub fn validate(&self) -> Result<()> {
        require_non_blank("Title", &self.title)?;
        require_non_blank("Author", &self.author)?;
        validate_isbn(&self.isbn)
    }
}

/// Partial update; only present fields are sent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBook {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
}

impl UpdateBook {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.author.is_none() && self.isbn.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(ClientError::invalid_input("Nothing to update"));
        }
        if let Some(title) = &self.title {
            require_non_blank("Title", title)?;
        }
        if let Some(author) = &self.author {
            require_non_blank("Author", author)?;
        }
        if let Some(isbn) = &self.isbn {
            validate_isbn(isbn)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_decodes_api_shape() {
        let json = r#"{
            "id": 1,
            "title": "Dune",
            "author": "Frank Herbert",
            "isbn": "9780441013593",
            "createdAt": "2024-03-01T10:00:00.000Z",
            "updatedAt": "2024-03-02T10:00:00.000Z",
            "createdBy": 4,
            "creator": {"id": 4, "firstName": "Ann", "lastName": "Lee", "email": "ann@example.com"}
        }"#;
        let book: Book = serde_json::from_str(json).unwrap();
        assert_eq!(book.title, "Dune");
        assert_eq!(book.creator.as_ref().map(|c| c.id), Some(4));
    }

    #[test]
    fn test_create_book_validation() {
        let ok = CreateBook {
            title: "Dune".into(),
            author: "Frank Herbert".into(),
            isbn: "978-0-441-01359-3".into(),
        };
        assert!(ok.validate().is_ok());

        let blank_title = CreateBook {
            title: "  ".into(),
            ..ok.clone()
        };
        assert_eq!(
            blank_title.validate().unwrap_err().message(),
            "Title is required"
        );

        let bad_isbn = CreateBook {
            isbn: "12345".into(),
            ..ok
        };
        assert!(bad_isbn.validate().is_err());
    }

    #[test]
    fn test_update_book_serializes_only_present_fields() {
        let update = UpdateBook {
            title: Some("New title".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"title": "New title"})
        );
        assert!(UpdateBook::default().validate().is_err());
    }
}
