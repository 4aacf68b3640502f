use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

#[cfg(test)]
mod tests {
    use super::{ChatMessage, Role};
    use serde_json::json;

    #[test]
    fn roles_serialize_lowercase() {
        let msg = ChatMessage::assistant("hi");
        assert_eq!(
            serde_json::to_value(&msg).expect("serialize"),
            json!({"role": "assistant", "content": "hi"})
        );
    }

    #[test]
    fn unknown_roles_are_rejected() {
        let err = serde_json::from_value::<ChatMessage>(json!({"role": "tool", "content": "x"}));
        assert!(err.is_err());
        let ok = serde_json::from_value::<ChatMessage>(json!({"role": "system", "content": "x"}))
            .expect("system role");
        assert_eq!(ok.role, Role::System);
    }
}
