//! Signed-in session
//!
//! The bearer token and the buyer's profile, read-only once signed in. The
//! profile's saved address pre-fills checkout.

use haat::address::DeliveryAddress;
use serde::{Deserialize, Serialize};

/// An address saved on the buyer's profile. Any part may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedAddress {
    /// Street line.
    pub street: String,
    /// City.
    pub city: String,
    /// State.
    pub state: String,
    /// Postal code.
    #[serde(alias = "pincode", alias = "zipCode")]
    pub postal_code: String,
    /// Contact phone for this address.
    pub phone: Option<String>,
}

/// The signed-in buyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Account phone number.
    #[serde(default)]
    pub phone: Option<String>,
    /// Saved delivery address.
    #[serde(default)]
    pub address: Option<SavedAddress>,
}

impl UserProfile {
    /// Delivery address pre-filled from the profile.
    ///
    /// The address's own phone wins over the account phone. Missing parts
    /// stay empty for the buyer to complete.
    pub fn prefill_address(&self) -> DeliveryAddress {
        let saved = self.address.clone().unwrap_or_default();
        let phone = saved
            .phone
            .filter(|phone| !phone.trim().is_empty())
            .or_else(|| self.phone.clone())
            .unwrap_or_default();

        DeliveryAddress {
            street: saved.street,
            city: saved.city,
            state: saved.state,
            postal_code: saved.postal_code,
            phone,
        }
    }
}

/// Credentials and profile of the signed-in buyer.
#[derive(Debug, Clone)]
pub struct Session {
    token: String,
    profile: UserProfile,
}

impl Session {
    /// Start a session.
    pub fn new(token: impl Into<String>, profile: UserProfile) -> Self {
        Self {
            token: token.into(),
            profile,
        }
    }

    /// Bearer token for API calls.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// The buyer's profile.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// See [`UserProfile::prefill_address`].
    pub fn prefill_address(&self) -> DeliveryAddress {
        self.profile.prefill_address()
    }
}

#[cfg(test)]
mod tests {
    use haat::address::AddressField;
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn saved_address_prefills_checkout() -> TestResult {
        let profile: UserProfile = serde_json::from_value(json!({
            "name": "Asha",
            "email": "asha@example.test",
            "phone": "+91 91111 11111",
            "address": {
                "street": "7 Gandhi Chowk",
                "city": "Ujjain",
                "state": "Madhya Pradesh",
                "pincode": "456001"
            }
        }))?;

        let address = profile.prefill_address();

        assert_eq!(address.postal_code, "456001");
        assert_eq!(address.phone, "+91 91111 11111");
        assert!(address.is_complete());

        Ok(())
    }

    #[test]
    fn profile_without_address_leaves_fields_to_fill() {
        let session = Session::new(
            "token",
            UserProfile {
                name: "Ravi".to_string(),
                email: "ravi@example.test".to_string(),
                phone: None,
                address: None,
            },
        );

        let missing = session.prefill_address().missing_fields();

        assert_eq!(session.token(), "token");
        assert_eq!(missing.len(), 5);
        assert!(missing.contains(&AddressField::Phone));
    }

    #[test]
    fn address_phone_wins_over_account_phone() {
        let profile = UserProfile {
            name: "Ravi".to_string(),
            email: "ravi@example.test".to_string(),
            phone: Some("account".to_string()),
            address: Some(SavedAddress {
                phone: Some("delivery".to_string()),
                ..SavedAddress::default()
            }),
        };

        assert_eq!(profile.prefill_address().phone, "delivery");
    }
}
