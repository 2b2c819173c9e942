//! Conversion between CMIS properties and store-native attributes.
//!
//! The store rejects `:` in attribute keys, so property ids are escaped on
//! the way in and unescaped on the way out. Value conversion is driven by
//! the property definition: a caller-supplied value of the wrong kind is a
//! constraint violation, while a *stored* value of the wrong kind is a
//! repository-data error, since the store returned something the schema
//! says it cannot contain.

use cmisbridge_core::CmisError;
use cmisbridge_core::result::CmisResult;
use cmisbridge_core::traits::AttributeValue;
use cmisbridge_core::types::{
    Cardinality, PropertyDefinition, PropertyKind, PropertyValue,
};

/// Replacement for the namespace separator in attribute keys.
const NAMESPACE_ESCAPE: &str = "__";

/// Escape a property id into a store-legal attribute key.
pub fn attribute_key(property_id: &str) -> String {
    property_id.replacen(':', NAMESPACE_ESCAPE, 1)
}

/// Invert [`attribute_key`].
pub fn property_id(attribute_key: &str) -> String {
    attribute_key.replacen(NAMESPACE_ESCAPE, ":", 1)
}

/// Convert caller-supplied property values into one native attribute,
/// validating kind and cardinality against the definition.
pub fn to_attribute(
    def: &PropertyDefinition,
    values: &[PropertyValue],
) -> CmisResult<AttributeValue> {
    for value in values {
        if value.kind() != def.kind {
            return Err(CmisError::constraint(format!(
                "Property '{}' expects {} values, got {}",
                def.id,
                def.kind,
                value.kind()
            )));
        }
    }
    match def.cardinality {
        Cardinality::Single => {
            if values.len() != 1 {
                return Err(CmisError::constraint(format!(
                    "Property '{}' is single-valued",
                    def.id
                )));
            }
            Ok(scalar_to_attribute(&values[0]))
        }
        Cardinality::Multi => Ok(AttributeValue::List(
            values.iter().map(scalar_to_attribute).collect(),
        )),
    }
}

/// Convert a stored attribute back into property values, validating the
/// stored shape against the definition.
pub fn to_property_values(
    def: &PropertyDefinition,
    attribute: &AttributeValue,
) -> CmisResult<Vec<PropertyValue>> {
    match (def.cardinality, attribute) {
        (Cardinality::Multi, AttributeValue::List(items)) => items
            .iter()
            .map(|item| attribute_to_scalar(def, item))
            .collect(),
        (Cardinality::Multi, single) => {
            Ok(vec![attribute_to_scalar(def, single)?])
        }
        (Cardinality::Single, AttributeValue::List(_)) => {
            Err(CmisError::repository_data(format!(
                "Stored value for single-valued property '{}' is a list",
                def.id
            )))
        }
        (Cardinality::Single, single) => Ok(vec![attribute_to_scalar(def, single)?]),
    }
}

fn scalar_to_attribute(value: &PropertyValue) -> AttributeValue {
    match value {
        PropertyValue::String(s) | PropertyValue::Id(s) => AttributeValue::String(s.clone()),
        PropertyValue::Integer(i) => AttributeValue::Long(*i),
        PropertyValue::Decimal(d) => AttributeValue::Decimal(*d),
        PropertyValue::Boolean(b) => AttributeValue::Boolean(*b),
        PropertyValue::DateTime(t) => AttributeValue::DateTime(*t),
    }
}

fn attribute_to_scalar(
    def: &PropertyDefinition,
    attribute: &AttributeValue,
) -> CmisResult<PropertyValue> {
    let value = match (def.kind, attribute) {
        (PropertyKind::String, AttributeValue::String(s)) => {
            PropertyValue::String(s.clone())
        }
        (PropertyKind::Id, AttributeValue::String(s)) => PropertyValue::Id(s.clone()),
        (PropertyKind::Integer, AttributeValue::Long(i)) => PropertyValue::Integer(*i),
        (PropertyKind::Decimal, AttributeValue::Decimal(d)) => PropertyValue::Decimal(*d),
        (PropertyKind::Boolean, AttributeValue::Boolean(b)) => PropertyValue::Boolean(*b),
        (PropertyKind::DateTime, AttributeValue::DateTime(t)) => PropertyValue::DateTime(*t),
        (kind, stored) => {
            return Err(CmisError::repository_data(format!(
                "Stored value for property '{}' does not match its declared {kind} kind: {stored:?}",
                def.id
            )));
        }
    };
    Ok(value)
}
