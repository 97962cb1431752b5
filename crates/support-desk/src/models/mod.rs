use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub member_since: DateTime<Utc>,
    pub current_plan: Plan,
}

impl Client {
    /// A record with blank text fields on the basic plan
    pub fn empty(id: impl Into<String>, member_since: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            member_since,
            current_plan: Plan::Basic,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = email.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = phone.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_plan(mut self, plan: Plan) -> Self {
        self.current_plan = plan;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    #[default]
    Basic,
    Pro,
    Premium,
    Enterprise,
}

/// One turn of a client/agent conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    /// Not checked against the directory; orphan messages are allowed
    pub client_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender: Sender,
    pub like: Reaction,
}

impl Message {
    /// Materialize a send request under an allocated id
    pub fn from_input(id: impl Into<String>, input: NewMessage) -> Self {
        Self {
            id: id.into(),
            client_id: input.client_id,
            content: input.content,
            created_at: input.created_at,
            sender: input.sender,
            like: Reaction::Neutral,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Agent,
    Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Reaction {
    Liked,
    Disliked,
    #[default]
    Neutral,
}

/// Input for sending a message
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMessage {
    pub client_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub sender: Sender,
}

impl NewMessage {
    pub fn new(
        client_id: impl Into<String>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
        sender: Sender,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            content: content.into(),
            created_at,
            sender,
        }
    }
}

/// Identity yielded by a successful session check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub name: String,
}

/// Login result
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub token: String,
}

impl From<LoginResponse> for Identity {
    fn from(login: LoginResponse) -> Self {
        Self {
            id: login.id,
            name: login.name,
        }
    }
}
