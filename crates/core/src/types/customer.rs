//! Customer delivery details collected during checkout.
//!
//! Validation is presence-only: every field must be non-blank. Phone number
//! and pincode formats are not checked.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Kind of delivery address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    Home,
    Work,
    Other,
}

impl AddressType {
    /// All address types in display order.
    pub const ALL: [Self; 3] = [Self::Home, Self::Work, Self::Other];

    /// Returns the form/wire value.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "Home",
            Self::Work => "Work",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for AddressType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when an address type string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown address type: {0}")]
pub struct UnknownAddressType(pub String);

impl FromStr for AddressType {
    type Err = UnknownAddressType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownAddressType(s.to_string()))
    }
}

/// A required customer-details field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerField {
    Name,
    PhoneNumber,
    Pincode,
    Locality,
    Address,
    City,
    Landmark,
    AddressType,
}

impl CustomerField {
    /// Every required field, in form order.
    pub const ALL: [Self; 8] = [
        Self::Name,
        Self::PhoneNumber,
        Self::Pincode,
        Self::Locality,
        Self::Address,
        Self::City,
        Self::Landmark,
        Self::AddressType,
    ];

    /// HTML form field name.
    #[must_use]
    pub const fn form_name(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::PhoneNumber => "phone_number",
            Self::Pincode => "pincode",
            Self::Locality => "locality",
            Self::Address => "address",
            Self::City => "city",
            Self::Landmark => "landmark",
            Self::AddressType => "address_type",
        }
    }

    /// Message shown when the field is left empty.
    #[must_use]
    pub const fn required_message(&self) -> &'static str {
        match self {
            Self::Name => "Name is required",
            Self::PhoneNumber => "Phone number is required",
            Self::Pincode => "Pincode is required",
            Self::Locality => "Locality is required",
            Self::Address => "Address is required",
            Self::City => "City/Town is required",
            Self::Landmark => "Landmark is required",
            Self::AddressType => "Type is required",
        }
    }
}

/// Per-field validation errors, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(Vec<CustomerField>);

impl FieldErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fields that failed validation.
    #[must_use]
    pub fn fields(&self) -> &[CustomerField] {
        &self.0
    }

    /// Error message for a form field name, if that field failed.
    #[must_use]
    pub fn get(&self, form_name: &str) -> Option<&'static str> {
        self.0
            .iter()
            .find(|f| f.form_name() == form_name)
            .map(CustomerField::required_message)
    }

    /// All messages, in form order.
    pub fn messages(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.0.iter().map(CustomerField::required_message)
    }
}

/// Raw customer-details form input, possibly incomplete.
///
/// Kept between requests so a failed submission re-renders with what the
/// customer already typed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerDetailsForm {
    pub name: String,
    pub phone_number: String,
    pub pincode: String,
    pub locality: String,
    pub address: String,
    pub city: String,
    pub landmark: String,
    pub address_type: String,
}

impl CustomerDetailsForm {
    fn value(&self, field: CustomerField) -> &str {
        match field {
            CustomerField::Name => &self.name,
            CustomerField::PhoneNumber => &self.phone_number,
            CustomerField::Pincode => &self.pincode,
            CustomerField::Locality => &self.locality,
            CustomerField::Address => &self.address,
            CustomerField::City => &self.city,
            CustomerField::Landmark => &self.landmark,
            CustomerField::AddressType => &self.address_type,
        }
    }

    /// Validate the form, collecting an error for every missing field.
    ///
    /// # Errors
    ///
    /// Returns the full set of missing fields when any required field is
    /// blank or the address type is not one of the known values.
    pub fn validate(&self) -> Result<CustomerDetails, FieldErrors> {
        let address_type = self.address_type.trim().parse::<AddressType>().ok();

        let missing: Vec<CustomerField> = CustomerField::ALL
            .into_iter()
            .filter(|field| match field {
                CustomerField::AddressType => address_type.is_none(),
                other => self.value(*other).trim().is_empty(),
            })
            .collect();

        match address_type {
            Some(address_type) if missing.is_empty() => Ok(CustomerDetails {
                name: self.name.trim().to_string(),
                phone_number: self.phone_number.trim().to_string(),
                pincode: self.pincode.trim().to_string(),
                locality: self.locality.trim().to_string(),
                address: self.address.trim().to_string(),
                city: self.city.trim().to_string(),
                landmark: self.landmark.trim().to_string(),
                address_type,
            }),
            _ => Err(FieldErrors(missing)),
        }
    }
}

/// Validated customer details, ready to be sent with an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub phone_number: String,
    pub pincode: String,
    pub locality: String,
    pub address: String,
    pub city: String,
    pub landmark: String,
    pub address_type: AddressType,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::CustomerDetailsForm;

    pub fn complete_form() -> CustomerDetailsForm {
        CustomerDetailsForm {
            name: "Asha Rao".to_string(),
            phone_number: "9876543210".to_string(),
            pincode: "560034".to_string(),
            locality: "HSR Layout".to_string(),
            address: "42, 14th Main".to_string(),
            city: "Bangalore".to_string(),
            landmark: "Near BDA complex".to_string(),
            address_type: "Home".to_string(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::fixtures::complete_form;
    use super::*;

    #[test]
    fn test_empty_form_reports_every_field() {
        let errors = CustomerDetailsForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 8);
        assert_eq!(
            errors.messages().collect::<Vec<_>>(),
            vec![
                "Name is required",
                "Phone number is required",
                "Pincode is required",
                "Locality is required",
                "Address is required",
                "City/Town is required",
                "Landmark is required",
                "Type is required",
            ]
        );
    }

    #[test]
    fn test_complete_form_validates() {
        let details = complete_form().validate().unwrap();
        assert_eq!(details.address_type, AddressType::Home);
        assert_eq!(details.city, "Bangalore");
    }

    #[test]
    fn test_whitespace_counts_as_missing() {
        let mut form = complete_form();
        form.landmark = "   ".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields(), &[CustomerField::Landmark]);
        assert_eq!(errors.get("landmark"), Some("Landmark is required"));
        assert_eq!(errors.get("name"), None);
    }

    #[test]
    fn test_unknown_address_type_is_missing() {
        let mut form = complete_form();
        form.address_type = "Castle".to_string();
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.fields(), &[CustomerField::AddressType]);
    }

    #[test]
    fn test_no_format_validation_on_phone() {
        let mut form = complete_form();
        form.phone_number = "call me".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_address_type_is_case_sensitive() {
        assert_eq!("Work".parse::<AddressType>().unwrap(), AddressType::Work);
        assert!("home".parse::<AddressType>().is_err());
    }
}
