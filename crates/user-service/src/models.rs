//! User domain model.

use chrono::{DateTime, Utc};
use emporium_core::{UserDto, UserId};

/// A persisted user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A user that has not been assigned an id yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewUser {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl User {
    /// Overwrite every attribute present in `dto`. The id never changes.
    pub fn apply(&mut self, dto: UserDto) {
        if let Some(first_name) = dto.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = dto.last_name {
            self.last_name = Some(last_name);
        }
        if let Some(email) = dto.email {
            self.email = Some(email);
        }
        if let Some(phone) = dto.phone {
            self.phone = Some(phone);
        }
    }
}

/// Client-supplied ids are ignored on create.
impl From<UserDto> for NewUser {
    fn from(dto: UserDto) -> Self {
        Self {
            first_name: dto.first_name,
            last_name: dto.last_name,
            email: dto.email,
            phone: dto.phone,
        }
    }
}

impl From<User> for UserDto {
    fn from(user: User) -> Self {
        Self {
            user_id: Some(user.id),
            first_name: user.first_name,
            last_name: user.last_name,
            email: user.email,
            phone: user.phone,
        }
    }
}
