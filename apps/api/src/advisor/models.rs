use std::fmt;

use serde::{Deserialize, Serialize};

use crate::llm_client::prompts::PromptFields;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[default]
    Household,
    Business,
}

impl UserType {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserType::Household => "Household",
            UserType::Business => "Business",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submission of the recommendations form. Immutable once built.
#[derive(Debug, Clone, Deserialize)]
pub struct UserQuery {
    pub user_type: UserType,
    pub appliances: String,
    pub concerns: String,
    #[serde(default)]
    pub location: Option<String>,
}

impl UserQuery {
    /// Fields for the recommendation template. An absent location is sent as "".
    pub fn prompt_fields(&self) -> PromptFields<'_> {
        PromptFields::from([
            ("user_type", self.user_type.as_str()),
            ("appliances", self.appliances.as_str()),
            ("concerns", self.concerns.as_str()),
            ("location", self.location.as_deref().unwrap_or("")),
        ])
    }
}

/// Monthly savings derived from a kWh figure. See `co2::co2_estimate`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SavingsEstimate {
    pub kwh_saved: f64,
    pub co2_kg: f64,
    pub co2_tonnes: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_type_serde_uses_display_names() {
        let ut: UserType = serde_json::from_str(r#""Business""#).unwrap();
        assert_eq!(ut, UserType::Business);
        assert_eq!(serde_json::to_string(&UserType::Household).unwrap(), r#""Household""#);
        assert!(serde_json::from_str::<UserType>(r#""household""#).is_err());
    }

    #[test]
    fn test_user_query_location_is_optional() {
        let query: UserQuery = serde_json::from_value(serde_json::json!({
            "user_type": "Household",
            "appliances": "AC, Refrigerator",
            "concerns": "High bill"
        }))
        .unwrap();
        assert!(query.location.is_none());

        let fields = query.prompt_fields();
        assert_eq!(fields["location"], "");
        assert_eq!(fields["user_type"], "Household");
        assert_eq!(fields["appliances"], "AC, Refrigerator");
    }

    #[test]
    fn test_user_query_requires_appliances() {
        let result = serde_json::from_value::<UserQuery>(serde_json::json!({
            "user_type": "Business",
            "concerns": "eco-friendly"
        }));
        assert!(result.is_err());
    }
}
