//! Delivery addresses

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;

/// A required delivery address field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressField {
    /// Street and house number.
    Street,
    /// City or town.
    City,
    /// State.
    State,
    /// Postal (PIN) code.
    PostalCode,
    /// Contact phone number.
    Phone,
}

impl Display for AddressField {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(match self {
            Self::Street => "street",
            Self::City => "city",
            Self::State => "state",
            Self::PostalCode => "postal code",
            Self::Phone => "phone",
        })
    }
}

/// Fields found empty while validating an address.
pub type MissingFields = SmallVec<[AddressField; 5]>;

/// Address validation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    /// One or more required fields are empty.
    #[error("delivery address is incomplete; missing {}", join(.0))]
    Incomplete(MissingFields),
}

fn join(fields: &MissingFields) -> String {
    fields
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Where a buyer's orders are shipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryAddress {
    /// Street and house number.
    pub street: String,
    /// City or town.
    pub city: String,
    /// State.
    pub state: String,
    /// Postal (PIN) code.
    pub postal_code: String,
    /// Contact phone number.
    pub phone: String,
}

impl DeliveryAddress {
    /// Fields that are empty or whitespace only.
    pub fn missing_fields(&self) -> MissingFields {
        [
            (AddressField::Street, &self.street),
            (AddressField::City, &self.city),
            (AddressField::State, &self.state),
            (AddressField::PostalCode, &self.postal_code),
            (AddressField::Phone, &self.phone),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }

    /// Whether every field is filled in; orders cannot be placed otherwise.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }

    /// Check the address is complete.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::Incomplete`] naming every empty field.
    pub fn validate(&self) -> Result<(), AddressError> {
        let missing = self.missing_fields();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AddressError::Incomplete(missing))
        }
    }
}
