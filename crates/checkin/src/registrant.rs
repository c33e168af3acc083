//! Core registrant type for checkin.
//!
//! A registrant is read from a roster row by the generator and rebuilt from
//! query parameters by the handler; both sides agree on the parameter names
//! defined here.

use std::collections::BTreeMap;

use csv::StringRecord;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::slug::slugify;

/// Roster column holding the first name.
pub const COLUMN_FIRST_NAME: &str = "First Name";
/// Roster column holding the last name.
pub const COLUMN_LAST_NAME: &str = "Last Name";
/// Roster column holding the company.
pub const COLUMN_COMPANY: &str = "Company";
/// Roster column holding the job title.
pub const COLUMN_TITLE: &str = "Title";
/// Roster column holding the email address.
pub const COLUMN_EMAIL: &str = "Email";

/// Query parameter names in canonical order.
pub const PARAMETER_NAMES: [&str; 5] = ["firstname", "lastname", "company", "title", "email"];

/// A person attending the event.
///
/// Field order is the canonical order used for query strings and JSON.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Registrant {
    /// First name.
    pub firstname: String,
    /// Last name.
    pub lastname: String,
    /// Company or organization.
    pub company: String,
    /// Job title.
    pub title: String,
    /// Email address.
    pub email: String,
}

impl Registrant {
    /// Build a registrant from a roster record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`] if one of the five roster columns is
    /// absent from the header or the record is shorter than the header.
    pub fn from_record(headers: &StringRecord, record: &StringRecord) -> Result<Self> {
        let field = |column: &'static str| -> Result<String> {
            headers
                .iter()
                .position(|h| h == column)
                .and_then(|idx| record.get(idx))
                .map(str::to_string)
                .ok_or(Error::MissingColumn { column })
        };

        Ok(Self {
            firstname: field(COLUMN_FIRST_NAME)?,
            lastname: field(COLUMN_LAST_NAME)?,
            company: field(COLUMN_COMPANY)?,
            title: field(COLUMN_TITLE)?,
            email: field(COLUMN_EMAIL)?,
        })
    }

    /// Build a registrant from request query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] naming the first absent parameter.
    pub fn from_params(params: &BTreeMap<String, String>) -> Result<Self> {
        let param = |name: &'static str| -> Result<String> {
            params
                .get(name)
                .cloned()
                .ok_or(Error::MissingParameter { name })
        };

        Ok(Self {
            firstname: param("firstname")?,
            lastname: param("lastname")?,
            company: param("company")?,
            title: param("title")?,
            email: param("email")?,
        })
    }

    /// The five `(name, value)` pairs in canonical order.
    #[must_use]
    pub fn query_pairs(&self) -> [(&'static str, &str); 5] {
        [
            (PARAMETER_NAMES[0], self.firstname.as_str()),
            (PARAMETER_NAMES[1], self.lastname.as_str()),
            (PARAMETER_NAMES[2], self.company.as_str()),
            (PARAMETER_NAMES[3], self.title.as_str()),
            (PARAMETER_NAMES[4], self.email.as_str()),
        ]
    }

    /// `first_last_company`, the raw identity the slug is derived from.
    #[must_use]
    pub fn identity(&self) -> String {
        format!("{}_{}_{}", self.firstname, self.lastname, self.company)
    }

    /// Filesystem-safe name for this registrant's QR image.
    #[must_use]
    pub fn slug(&self) -> String {
        slugify(&self.identity(), false)
    }

    /// The five fields as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ada() -> Registrant {
        Registrant {
            firstname: "Ada".to_string(),
            lastname: "Lovelace".to_string(),
            company: "Analytical Engines".to_string(),
            title: "Programmer".to_string(),
            email: "ada@example.com".to_string(),
        }
    }

    fn params(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn test_from_record() {
        let headers = StringRecord::from(vec!["Email", "First Name", "Last Name", "Company", "Title"]);
        let record = StringRecord::from(vec![
            "ada@example.com",
            "Ada",
            "Lovelace",
            "Analytical Engines",
            "Programmer",
        ]);
        assert_eq!(Registrant::from_record(&headers, &record).unwrap(), ada());
    }

    #[test]
    fn test_from_record_missing_column() {
        let headers = StringRecord::from(vec!["First Name", "Last Name", "Company", "Email"]);
        let record = StringRecord::from(vec!["Ada", "Lovelace", "AE", "ada@example.com"]);
        let err = Registrant::from_record(&headers, &record).unwrap_err();
        assert!(matches!(err, Error::MissingColumn { column: "Title" }));
    }

    #[test]
    fn test_from_params() {
        let p = params(&[
            ("firstname", "Ada"),
            ("lastname", "Lovelace"),
            ("company", "Analytical Engines"),
            ("title", "Programmer"),
            ("email", "ada@example.com"),
            ("source", "scanner"),
        ]);
        assert_eq!(Registrant::from_params(&p).unwrap(), ada());
    }

    #[test]
    fn test_from_params_missing() {
        let p = params(&[("firstname", "Ada"), ("lastname", "Lovelace")]);
        let err = Registrant::from_params(&p).unwrap_err();
        assert_eq!(err.to_string(), "missing required parameter 'company'");
    }

    #[test]
    fn test_query_pairs_order() {
        let names: Vec<_> = ada().query_pairs().iter().map(|(k, _)| *k).collect();
        assert_eq!(names, PARAMETER_NAMES);
    }

    #[test]
    fn test_identity_and_slug() {
        let r = ada();
        assert_eq!(r.identity(), "Ada_Lovelace_Analytical Engines");
        assert_eq!(r.slug(), "ada_lovelace_analytical-engines");
    }

    #[test]
    fn test_to_json_pretty_order() {
        let json = ada().to_json_pretty().unwrap();
        let first = json.find("firstname").unwrap();
        let email = json.find("email").unwrap();
        assert!(first < email);
        assert!(json.starts_with("{\n  \"firstname\": \"Ada\""));
    }
}
