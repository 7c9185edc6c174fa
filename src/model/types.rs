//! Datatypes carried by attributes, parameters and function responses

use crate::model::reference::Reference;
use crate::model::{EnumX, LocalEntity};
use std::fmt;

/// The closed set of primitive datatypes a generator knows how to map
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    String,
    Integer,
    Decimal,
    Boolean,
    Date,
    DateTime,
    Time,
    Email,
    Uuid,
    File,
    Currency,
    Cpf,
    Cnpj,
    ZipCode,
    PhoneNumber,
    MobilePhoneNumber,
}

impl DataType {
    pub const ALL: [DataType; 16] = [
        DataType::String,
        DataType::Integer,
        DataType::Decimal,
        DataType::Boolean,
        DataType::Date,
        DataType::DateTime,
        DataType::Time,
        DataType::Email,
        DataType::Uuid,
        DataType::File,
        DataType::Currency,
        DataType::Cpf,
        DataType::Cnpj,
        DataType::ZipCode,
        DataType::PhoneNumber,
        DataType::MobilePhoneNumber,
    ];

    /// The tag used for this datatype in model sources
    pub fn tag(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Time => "time",
            Self::Email => "email",
            Self::Uuid => "uuid",
            Self::File => "file",
            Self::Currency => "currency",
            Self::Cpf => "cpf",
            Self::Cnpj => "cnpj",
            Self::ZipCode => "zipcode",
            Self::PhoneNumber => "phonenumber",
            Self::MobilePhoneNumber => "mobilephonenumber",
        }
    }

    /// Exact tag lookup; tags are case-sensitive
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|data_type| data_type.tag() == tag)
    }

    /// Comma-separated list of every known tag
    pub fn known_tags() -> String {
        Self::ALL.iter().map(|data_type| data_type.tag()).collect::<Vec<_>>().join(", ")
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Type of an attribute: a primitive tag as written, or an enum reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeType {
    /// Literal primitive tag; not guaranteed to be a known [`DataType`]
    Primitive(String),
    Enum(Reference<EnumX>),
}

impl AttributeType {
    pub fn primitive(data_type: DataType) -> Self {
        Self::Primitive(data_type.tag().to_string())
    }

    /// The known datatype, if this is a literal in the closed set
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Self::Primitive(tag) => DataType::from_tag(tag),
            Self::Enum(_) => None,
        }
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, Self::Enum(_))
    }

    /// Source text of the type
    pub fn text(&self) -> &str {
        match self {
            Self::Primitive(tag) => tag,
            Self::Enum(reference) => reference.ref_text(),
        }
    }
}

/// Type of a function parameter or response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueType {
    Primitive(String),
    Enum(Reference<EnumX>),
    Entity(Reference<LocalEntity>),
}

impl ValueType {
    /// Source text of the type
    pub fn text(&self) -> &str {
        match self {
            Self::Primitive(tag) => tag,
            Self::Enum(reference) => reference.ref_text(),
            Self::Entity(reference) => reference.ref_text(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_are_exact() {
        assert_eq!(DataType::from_tag("datetime"), Some(DataType::DateTime));
        assert_eq!(DataType::from_tag("DateTime"), None);
        assert_eq!(DataType::from_tag("varchar"), None);
    }

    #[test]
    fn test_attribute_type_text() {
        let primitive = AttributeType::primitive(DataType::Integer);
        assert_eq!(primitive.text(), "integer");
        assert_eq!(primitive.data_type(), Some(DataType::Integer));

        let enumerated = AttributeType::Enum(Reference::unresolved("Status"));
        assert!(enumerated.is_enum());
        assert_eq!(enumerated.text(), "Status");
        assert_eq!(enumerated.data_type(), None);
    }
}
