/// Storage kind of a mapped field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Text,
    Integer,
    Float,
    Boolean,
    Date,
    DateTime,
    Time,
}

impl FieldKind {
    /// Kinds that can hold a slug.
    pub fn holds_slug(self) -> bool {
        matches!(self, Self::String | Self::Text)
    }

    /// Kinds whose values can be rendered into slug source text.
    pub fn is_sluggable_source(self) -> bool {
        !matches!(self, Self::Boolean)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMapping {
    pub name: String,
    pub kind: FieldKind,
    pub length: Option<usize>,
    pub nullable: bool,
    pub identifier: bool,
}

impl FieldMapping {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            length: None,
            nullable: false,
            identifier: false,
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = Some(length);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn identifier(mut self) -> Self {
        self.identifier = true;
        self
    }
}

/// Storage mapping of one record type: its root type (the uniqueness
/// scope) and the constraints of each mapped field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordMetadata {
    pub record_type: String,
    pub root_type: String,
    pub fields: Vec<FieldMapping>,
}

impl RecordMetadata {
    pub fn new(record_type: impl Into<String>) -> Self {
        let record_type = record_type.into();
        Self {
            root_type: record_type.clone(),
            record_type,
            fields: Vec::new(),
        }
    }

    /// Places this type under `root_type` so it shares slug uniqueness with
    /// its siblings.
    pub fn with_root(mut self, root_type: impl Into<String>) -> Self {
        self.root_type = root_type.into();
        self
    }

    pub fn with_field(mut self, field: FieldMapping) -> Self {
        self.fields.push(field);
        self
    }

    pub fn field(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    pub fn is_identifier_field(&self, name: &str) -> bool {
        self.field(name).is_some_and(|field| field.identifier)
    }

    pub fn field_length_limit(&self, name: &str) -> Option<usize> {
        self.field(name).and_then(|field| field.length)
    }

    pub fn field_is_nullable(&self, name: &str) -> bool {
        self.field(name).is_some_and(|field| field.nullable)
    }

    pub fn identifier_field(&self) -> Option<&str> {
        self.fields
            .iter()
            .find(|field| field.identifier)
            .map(|field| field.name.as_str())
    }
}
