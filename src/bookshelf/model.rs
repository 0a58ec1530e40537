use crate::dates;
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Server-assigned record identifier.
///
/// Backends disagree on whether ids are numbers or strings, so both are
/// accepted. `Int(7)` and `Text("7")` refer to the same record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookId {
    Int(i64),
    Text(String),
}

impl BookId {
    pub fn same_as(&self, other: &BookId) -> bool {
        match (self, other) {
            (BookId::Int(a), BookId::Int(b)) => a == b,
            (BookId::Text(a), BookId::Text(b)) => a == b,
            (BookId::Int(n), BookId::Text(s)) | (BookId::Text(s), BookId::Int(n)) => {
                *s == n.to_string()
            }
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Int(n) => write!(f, "{}", n),
            BookId::Text(s) => write!(f, "{}", s),
        }
    }
}

impl FromStr for BookId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Book id cannot be empty".to_string());
        }
        Ok(s.parse::<i64>()
            .map(BookId::Int)
            .unwrap_or_else(|_| BookId::Text(s.to_string())))
    }
}

impl From<i64> for BookId {
    fn from(n: i64) -> Self {
        BookId::Int(n)
    }
}

impl From<i32> for BookId {
    fn from(n: i32) -> Self {
        BookId::Int(i64::from(n))
    }
}

impl From<&str> for BookId {
    fn from(s: &str) -> Self {
        BookId::Text(s.to_string())
    }
}

/// One catalog entry as exchanged with the backend.
///
/// The typed fields are a view over the JSON object the server sent. That
/// object is kept as-is: on save, fields nobody changed are written back
/// exactly as they arrived (same key, same JSON type), and columns this
/// client does not model travel along untouched. Equality compares the
/// typed view only.
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub shelf: String,
    pub isbn: String,
    pub published_date: String,
    pub pages: Option<u32>,
    pub added_at: String,
    wire: Map<String, Value>,
}

impl BookRecord {
    pub fn new(id: impl Into<BookId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            author: String::new(),
            publisher: String::new(),
            shelf: String::new(),
            isbn: String::new(),
            published_date: String::new(),
            pages: None,
            added_at: String::new(),
            wire: Map::new(),
        }
    }

    /// Builds the typed view over a wire object. Fails only when the object
    /// has no usable `id`.
    pub fn from_wire(wire: Map<String, Value>) -> Result<Self, String> {
        let id = match wire.get("id") {
            Some(Value::Number(n)) => n
                .as_i64()
                .map(BookId::Int)
                .ok_or_else(|| format!("record id {} is not an integer", n))?,
            Some(Value::String(s)) => BookId::Text(s.clone()),
            Some(other) => return Err(format!("record id {} is not a number or string", other)),
            None => return Err("record has no id".to_string()),
        };
        let text = |field| lenient_text(wire.get(wire_key(field, &wire)));

        Ok(Self {
            id,
            title: text(BookField::Title),
            author: text(BookField::Author),
            publisher: text(BookField::Publisher),
            shelf: text(BookField::Shelf),
            isbn: text(BookField::Isbn),
            published_date: text(BookField::PublishedDate),
            pages: lenient_pages(wire.get(wire_key(BookField::Pages, &wire))),
            added_at: text(BookField::AddedAt),
            wire,
        })
    }

    /// The object to send back: the received object with every field whose
    /// typed value differs from what was received written over it.
    pub fn to_wire(&self) -> Map<String, Value> {
        let mut wire = self.wire.clone();

        let id_unchanged = match (wire.get("id"), &self.id) {
            (Some(Value::Number(n)), BookId::Int(id)) => n.as_i64() == Some(*id),
            (Some(Value::String(s)), BookId::Text(id)) => s == id,
            _ => false,
        };
        if !id_unchanged {
            let id = match &self.id {
                BookId::Int(n) => Value::from(*n),
                BookId::Text(s) => Value::String(s.clone()),
            };
            wire.insert("id".to_string(), id);
        }

        for field in BookField::ALL {
            let key = wire_key(field, &self.wire);
            let typed = self.typed_value(field);
            if decoded_value(field, self.wire.get(key)) != typed {
                wire.insert(key.to_string(), typed);
            }
        }
        wire
    }

    fn typed_value(&self, field: BookField) -> Value {
        match field {
            BookField::Pages => self.pages.map_or(Value::Null, Value::from),
            _ => Value::String(self.text(field).unwrap_or_default().to_string()),
        }
    }

    /// Text value of a string column; `None` for `pages`.
    pub fn text(&self, field: BookField) -> Option<&str> {
        match field {
            BookField::Title => Some(&self.title),
            BookField::Author => Some(&self.author),
            BookField::Publisher => Some(&self.publisher),
            BookField::Shelf => Some(&self.shelf),
            BookField::PublishedDate => Some(&self.published_date),
            BookField::Isbn => Some(&self.isbn),
            BookField::AddedAt => Some(&self.added_at),
            BookField::Pages => None,
        }
    }

    pub fn published_year(&self) -> Option<i32> {
        dates::published_year(&self.published_date)
    }

    pub fn added_date(&self) -> Option<&str> {
        dates::comparable_date(&self.added_at)
    }

    /// Returns a copy of this record with exactly one field replaced.
    pub fn with_value(&self, value: FieldValue) -> BookRecord {
        let field = value.field();
        let mut next = self.clone();
        match value {
            FieldValue::Title(v) => next.title = v,
            FieldValue::Author(v) => next.author = v,
            FieldValue::Publisher(v) => next.publisher = v,
            FieldValue::Shelf(v) => next.shelf = v,
            FieldValue::PublishedDate(v) => next.published_date = v,
            FieldValue::Isbn(v) => next.isbn = v,
            FieldValue::Pages(v) => next.pages = v,
            FieldValue::AddedAt(v) => next.added_at = v,
        }
        let key = wire_key(field, &next.wire);
        let typed = next.typed_value(field);
        next.wire.insert(key.to_string(), typed);
        next
    }
}

/// Editable and sortable record columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Publisher,
    Shelf,
    PublishedDate,
    Isbn,
    Pages,
    AddedAt,
}

impl BookField {
    pub const ALL: [BookField; 8] = [
        BookField::Title,
        BookField::Author,
        BookField::Publisher,
        BookField::Shelf,
        BookField::PublishedDate,
        BookField::Isbn,
        BookField::Pages,
        BookField::AddedAt,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Publisher => "publisher",
            BookField::Shelf => "shelf",
            BookField::PublishedDate => "published_date",
            BookField::Isbn => "isbn",
            BookField::Pages => "pages",
            BookField::AddedAt => "added_at",
        }
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "title" => Ok(BookField::Title),
            "author" => Ok(BookField::Author),
            "publisher" => Ok(BookField::Publisher),
            "shelf" => Ok(BookField::Shelf),
            "published_date" | "published" | "year" => Ok(BookField::PublishedDate),
            "isbn" => Ok(BookField::Isbn),
            "pages" => Ok(BookField::Pages),
            "added_at" | "added" => Ok(BookField::AddedAt),
            other => Err(format!(
                "Unknown field '{}' (expected one of: {})",
                other,
                BookField::ALL
                    .iter()
                    .map(BookField::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )),
        }
    }
}

/// A typed replacement value for a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Title(String),
    Author(String),
    Publisher(String),
    Shelf(String),
    PublishedDate(String),
    Isbn(String),
    Pages(Option<u32>),
    AddedAt(String),
}

impl FieldValue {
    /// Parses raw user input for `field`.
    ///
    /// Text columns take the input as-is. `pages` accepts an empty string
    /// (unset) or a non-negative integer; anything else is an error.
    pub fn parse(field: BookField, raw: &str) -> Result<Self, String> {
        let value = raw.to_string();
        Ok(match field {
            BookField::Title => FieldValue::Title(value),
            BookField::Author => FieldValue::Author(value),
            BookField::Publisher => FieldValue::Publisher(value),
            BookField::Shelf => FieldValue::Shelf(value),
            BookField::PublishedDate => FieldValue::PublishedDate(value),
            BookField::Isbn => FieldValue::Isbn(value),
            BookField::AddedAt => FieldValue::AddedAt(value),
            BookField::Pages => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    FieldValue::Pages(None)
                } else {
                    let pages = trimmed.parse::<u32>().map_err(|_| {
                        format!("pages must be a non-negative whole number, got '{}'", raw)
                    })?;
                    FieldValue::Pages(Some(pages))
                }
            }
        })
    }

    pub fn field(&self) -> BookField {
        match self {
            FieldValue::Title(_) => BookField::Title,
            FieldValue::Author(_) => BookField::Author,
            FieldValue::Publisher(_) => BookField::Publisher,
            FieldValue::Shelf(_) => BookField::Shelf,
            FieldValue::PublishedDate(_) => BookField::PublishedDate,
            FieldValue::Isbn(_) => BookField::Isbn,
            FieldValue::Pages(_) => BookField::Pages,
            FieldValue::AddedAt(_) => BookField::AddedAt,
        }
    }
}

impl PartialEq for BookRecord {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.title == other.title
            && self.author == other.author
            && self.publisher == other.publisher
            && self.shelf == other.shelf
            && self.isbn == other.isbn
            && self.published_date == other.published_date
            && self.pages == other.pages
            && self.added_at == other.added_at
    }
}

impl Eq for BookRecord {}

impl Serialize for BookRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_wire().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for BookRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = Map::<String, Value>::deserialize(deserializer)?;
        BookRecord::from_wire(wire).map_err(de::Error::custom)
    }
}

/// Keys a field may arrive under, canonical name first.
fn wire_names(field: BookField) -> &'static [&'static str] {
    match field {
        BookField::Title => &["title"],
        BookField::Author => &["author"],
        BookField::Publisher => &["publisher"],
        BookField::Shelf => &["shelf"],
        BookField::Isbn => &["isbn"],
        BookField::PublishedDate => &["published_date", "year"],
        BookField::Pages => &["pages"],
        BookField::AddedAt => &["added_at", "added"],
    }
}

/// The key a field is read from and written back to: the first name holding
/// a non-null value, else the first name present, else the canonical name.
fn wire_key(field: BookField, wire: &Map<String, Value>) -> &'static str {
    let names = wire_names(field);
    names
        .iter()
        .find(|name| wire.get(**name).map_or(false, |v| !v.is_null()))
        .or_else(|| names.iter().find(|name| wire.contains_key(**name)))
        .copied()
        .unwrap_or(names[0])
}

/// What the typed view reads from a raw value, in the form `typed_value` emits.
fn decoded_value(field: BookField, raw: Option<&Value>) -> Value {
    match field {
        BookField::Pages => lenient_pages(raw).map_or(Value::Null, Value::from),
        _ => Value::String(lenient_text(raw)),
    }
}

fn lenient_text(raw: Option<&Value>) -> String {
    match raw {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn lenient_pages(raw: Option<&Value>) -> Option<u32> {
    match raw {
        Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_canonical_record() {
        let record: BookRecord = serde_json::from_value(json!({
            "id": 1,
            "title": "吾輩は猫である",
            "author": "夏目漱石",
            "publisher": "大倉書店",
            "shelf": "A-1",
            "isbn": "9784003101018",
            "published_date": "1905-10",
            "pages": 300,
            "added_at": "2024-01-10"
        }))
        .unwrap();

        assert_eq!(record.id, BookId::Int(1));
        assert_eq!(record.pages, Some(300));
        assert_eq!(record.published_year(), Some(1905));
        assert_eq!(record.added_date(), Some("2024-01-10"));
    }

    #[test]
    fn decodes_alternate_field_names_and_loose_values() {
        let record: BookRecord = serde_json::from_value(json!({
            "id": "b-7",
            "title": null,
            "year": 1940,
            "pages": "96",
            "added": "0000-00-00"
        }))
        .unwrap();

        assert_eq!(record.id, BookId::Text("b-7".into()));
        assert_eq!(record.title, "");
        assert_eq!(record.author, "");
        assert_eq!(record.published_date, "1940");
        assert_eq!(record.pages, Some(96));
        assert_eq!(record.added_date(), None);
    }

    #[test]
    fn invalid_pages_decode_as_unset() {
        for pages in [json!(-3), json!(12.5), json!("many"), json!(null), json!("")] {
            let record: BookRecord =
                serde_json::from_value(json!({ "id": 1, "pages": pages })).unwrap();
            assert_eq!(record.pages, None);
        }
    }

    #[test]
    fn serializes_canonical_field_names() {
        let mut record = BookRecord::new(2, "走れメロス");
        record.published_date = "1940".into();
        record.added_at = "2024-02-01".into();
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(2));
        assert_eq!(value["published_date"], json!("1940"));
        assert_eq!(value["added_at"], json!("2024-02-01"));
        assert_eq!(value["pages"], json!(null));
    }

    #[test]
    fn untouched_record_is_written_back_verbatim() {
        let raw = r#"{"id":2,"title":"t","year":"1940","pages":-3,"added":"2024-02-15","cover_url":"c.jpg"}"#;
        let record: BookRecord = serde_json::from_str(raw).unwrap();

        assert_eq!(record.published_date, "1940");
        assert_eq!(record.pages, None);
        assert_eq!(serde_json::to_string(&record).unwrap(), raw);
    }

    #[test]
    fn edits_land_on_the_received_key() {
        let raw = json!({"id": 5, "title": "t", "year": 1940, "pages": "96", "cover_url": "c.jpg"});
        let record: BookRecord = serde_json::from_value(raw).unwrap();

        let edited = record.with_value(FieldValue::PublishedDate("1941-03".into()));
        let value = serde_json::to_value(&edited).unwrap();
        assert_eq!(value["year"], json!("1941-03"));
        assert!(value.get("published_date").is_none());
        assert_eq!(value["pages"], json!("96"));
        assert_eq!(value["cover_url"], json!("c.jpg"));

        let cleared = record.with_value(FieldValue::Pages(None));
        assert_eq!(serde_json::to_value(&cleared).unwrap()["pages"], json!(null));
    }

    #[test]
    fn direct_field_changes_are_written() {
        let mut record: BookRecord =
            serde_json::from_value(json!({"id": 1, "title": "t", "shelf": "A-1"})).unwrap();
        record.shelf = "B-2".into();
        record.pages = Some(120);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value, json!({"id": 1, "title": "t", "shelf": "B-2", "pages": 120}));
    }

    #[test]
    fn both_date_keys_decode() {
        let record: BookRecord = serde_json::from_value(json!({
            "id": 3, "published_date": "1914-04", "year": "1914"
        }))
        .unwrap();
        assert_eq!(record.published_date, "1914-04");
        assert_eq!(
            serde_json::to_value(&record).unwrap(),
            json!({"id": 3, "published_date": "1914-04", "year": "1914"})
        );
    }

    #[test]
    fn records_without_usable_id_do_not_decode() {
        for raw in [json!({"title": "x"}), json!({"id": 1.5}), json!({"id": null})] {
            assert!(serde_json::from_value::<BookRecord>(raw).is_err());
        }
    }

    #[test]
    fn ids_compare_across_representations() {
        assert!(BookId::Int(7).same_as(&BookId::Text("7".into())));
        assert!(BookId::Text("7".into()).same_as(&BookId::Int(7)));
        assert!(!BookId::Int(7).same_as(&BookId::Text("07".into())));
        assert!(!BookId::Int(7).same_as(&BookId::Int(8)));
    }

    #[test]
    fn id_from_str_prefers_integers() {
        assert_eq!("12".parse::<BookId>().unwrap(), BookId::Int(12));
        assert_eq!("abc".parse::<BookId>().unwrap(), BookId::Text("abc".into()));
        assert!("  ".parse::<BookId>().is_err());
    }

    #[test]
    fn field_names_and_aliases() {
        assert_eq!("year".parse::<BookField>().unwrap(), BookField::PublishedDate);
        assert_eq!("added".parse::<BookField>().unwrap(), BookField::AddedAt);
        assert_eq!("Added-At".parse::<BookField>().unwrap(), BookField::AddedAt);
        assert!("colour".parse::<BookField>().is_err());
    }

    #[test]
    fn with_value_replaces_only_one_field() {
        let mut original = BookRecord::new(3, "こころ");
        original.author = "夏目漱石".into();
        original.pages = Some(280);

        let edited = original.with_value(FieldValue::Title("心".into()));
        assert_eq!(edited.title, "心");
        assert_eq!(
            BookRecord {
                title: original.title.clone(),
                ..edited
            },
            original
        );
    }

    #[test]
    fn parse_pages_value() {
        assert_eq!(
            FieldValue::parse(BookField::Pages, " 120 ").unwrap(),
            FieldValue::Pages(Some(120))
        );
        assert_eq!(
            FieldValue::parse(BookField::Pages, "").unwrap(),
            FieldValue::Pages(None)
        );
        assert!(FieldValue::parse(BookField::Pages, "12a").is_err());
        assert!(FieldValue::parse(BookField::Pages, "-1").is_err());
    }
}
