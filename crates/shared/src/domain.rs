use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub i64);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(UserId);

/// A directory entry as returned by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl User {
    pub fn fields(&self) -> UserFields {
        UserFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// The editable part of a user; also the create/update request body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFields {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserFields {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
    ) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: email.into(),
        }
    }
}

/// What the form is editing: a brand new record, or a snapshot of an existing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditTarget {
    #[default]
    Create,
    Update(User),
}

impl EditTarget {
    pub fn is_create(&self) -> bool {
        matches!(self, Self::Create)
    }

    pub fn initial_fields(&self) -> UserFields {
        match self {
            Self::Create => UserFields::default(),
            Self::Update(user) => user.fields(),
        }
    }
}
