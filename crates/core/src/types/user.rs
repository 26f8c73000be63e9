//! User transfer record.

use serde::{Deserialize, Serialize};

use super::id::UserId;

/// A user as exchanged over the User Service API.
///
/// Every attribute except the id is free text; the email is not validated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserDto {
    /// Assigned by the service on create; required on update.
    pub user_id: Option<UserId>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl UserDto {
    /// Build a transfer record for a user that does not exist yet.
    #[must_use]
    pub fn new(first_name: &str, last_name: &str, email: &str) -> Self {
        Self {
            user_id: None,
            first_name: Some(first_name.to_owned()),
            last_name: Some(last_name.to_owned()),
            email: Some(email.to_owned()),
            phone: None,
        }
    }

    /// Set the phone number.
    #[must_use]
    pub fn with_phone(mut self, phone: &str) -> Self {
        self.phone = Some(phone.to_owned());
        self
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_camel_case_wire_names() {
        let user = UserDto::new("John", "Doe", "john.doe@test.com").with_phone("1234567890");
        let value = serde_json::to_value(&user).unwrap();
        assert_eq!(
            value,
            json!({
                "userId": null,
                "firstName": "John",
                "lastName": "Doe",
                "email": "john.doe@test.com",
                "phone": "1234567890"
            })
        );
    }

    #[test]
    fn test_partial_body_deserializes() {
        let user: UserDto = serde_json::from_value(json!({"userId": 4, "firstName": "Ann"})).unwrap();
        assert_eq!(user.user_id, Some(UserId::new(4)));
        assert_eq!(user.first_name.as_deref(), Some("Ann"));
        assert!(user.email.is_none());
    }
}
