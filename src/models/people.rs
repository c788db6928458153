use std::collections::BTreeMap;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::domain::checks::is_iso_date;
use crate::domain::{
    FieldPath, FieldValue, JsonPayload, Rule, Rules, Schema, Validate, ValidationReport,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Body of `POST /people/2/persons`.
pub struct PersonRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub middle_name: Option<String>,
    /// `MALE` or `FEMALE`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// `YYYY-MM-DD`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birthday: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_information: Option<PersonContacts>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonContacts {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub phone: Vec<PersonPhone>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub email: Vec<PersonEmail>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonPhone {
    pub number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersonEmail {
    pub address: String,
}

static PERSON: LazyLock<Schema<PersonRequest>> = LazyLock::new(|| {
    Schema::<PersonRequest>::builder()
        .field("externalId", [Rule::OmitEmpty, Rule::lte(256)], |p| {
            (&p.external_id).into()
        })
        .field("firstName", [Rule::OmitEmpty, Rule::lte(255)], |p| {
            (&p.first_name).into()
        })
        .field("lastName", [Rule::OmitEmpty, Rule::lte(255)], |p| {
            (&p.last_name).into()
        })
        .field("middleName", [Rule::OmitEmpty, Rule::lte(50)], |p| {
            (&p.middle_name).into()
        })
        .field(
            "gender",
            [Rule::OmitEmpty, Rule::one_of(["MALE", "FEMALE"])],
            |p| (&p.gender).into(),
        )
        .field("profilePicture", [Rule::OmitEmpty, Rule::Url], |p| {
            (&p.profile_picture).into()
        })
        .field("contactInformation", Rules::default(), |p| {
            FieldValue::nested_opt(&p.contact_information)
        })
        .struct_rule(|p, level| {
            let birthday = p.birthday.as_deref().unwrap_or_default();
            if !birthday.is_empty() && !is_iso_date(birthday) {
                level.report("birthday", "iso_date", "YYYY-MM-DD");
            }
        })
        .build()
});

static CONTACTS: LazyLock<Schema<PersonContacts>> = LazyLock::new(|| {
    Schema::<PersonContacts>::builder()
        .field("phone", [Rule::OmitEmpty, Rule::Dive], |c| {
            FieldValue::nested_seq(&c.phone)
        })
        .field("email", [Rule::OmitEmpty, Rule::Dive], |c| {
            FieldValue::nested_seq(&c.email)
        })
        .build()
});

static PHONE: LazyLock<Schema<PersonPhone>> = LazyLock::new(|| {
    Schema::<PersonPhone>::builder()
        .field("number", [Rule::Required, Rule::E164], |p| (&p.number).into())
        .build()
});

static EMAIL: LazyLock<Schema<PersonEmail>> = LazyLock::new(|| {
    Schema::<PersonEmail>::builder()
        .field("address", [Rule::Required, Rule::Email], |e| {
            (&e.address).into()
        })
        .build()
});

impl Validate for PersonRequest {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        PERSON.check(self, path, report);
    }
}

impl Validate for PersonContacts {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        CONTACTS.check(self, path, report);
    }
}

impl Validate for PersonPhone {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        PHONE.check(self, path, report);
    }
}

impl Validate for PersonEmail {
    fn validate_into(&self, path: &FieldPath, report: &mut ValidationReport) {
        EMAIL.check(self, path, report);
    }
}

impl JsonPayload for PersonRequest {}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// A person record as returned by the People API.
pub struct Person {
    pub external_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub gender: Option<String>,
    pub birthday: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub created_at: Option<String>,
    pub modified_at: Option<String>,
    pub contact_information: PersonContacts,
    pub tags: Vec<String>,
    pub custom_attributes: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PersonRequest {
        PersonRequest {
            first_name: Some("Jane".to_owned()),
            last_name: Some("Doe".to_owned()),
            gender: Some("FEMALE".to_owned()),
            birthday: Some("1990-02-28".to_owned()),
            contact_information: Some(PersonContacts {
                phone: vec![PersonPhone {
                    number: "41793026727".to_owned(),
                }],
                email: vec![PersonEmail {
                    address: "jane.doe@example.com".to_owned(),
                }],
            }),
            ..Default::default()
        }
    }

    #[test]
    fn valid_person() {
        let report = person().validate();
        assert!(report.is_empty(), "{report}");
    }

    #[test]
    fn gender_tokens_are_case_sensitive() {
        let mut p = person();
        p.gender = Some("female".to_owned());
        let report = p.validate();
        assert_eq!(report.violations()[0].field, "gender");
        assert_eq!(report.violations()[0].param, "MALE FEMALE");
    }

    #[test]
    fn birthday_must_be_an_iso_date() {
        let mut p = person();
        p.birthday = Some("28/02/1990".to_owned());
        let report = p.validate();
        assert_eq!(report.len(), 1);
        assert_eq!(report.violations()[0].field, "birthday");
        assert_eq!(report.violations()[0].rule, "iso_date");

        p.birthday = Some(String::new());
        assert!(p.validate().is_empty());
    }

    #[test]
    fn contacts_are_validated_per_element() {
        let mut p = person();
        if let Some(contacts) = p.contact_information.as_mut() {
            contacts.email.push(PersonEmail {
                address: "broken".to_owned(),
            });
        }
        let report = p.validate();
        assert_eq!(
            report.violations()[0].field,
            "contactInformation.email[1].address"
        );
    }

    #[test]
    fn custom_attributes_round_trip() {
        let mut p = person();
        p.custom_attributes
            .insert("loyaltyTier".to_owned(), serde_json::json!("gold"));
        p.tags.push("vip".to_owned());
        let bytes = p.to_json().unwrap();
        let decoded: PersonRequest = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(decoded, p);
    }
}
