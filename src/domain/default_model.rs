/// Identifier of the chat model a user starts new conversations with.
#[derive(Debug, Clone)]
pub struct DefaultModel(String);

const MAX_LENGTH: usize = 64;

impl DefaultModel {
    pub fn parse(s: String) -> Result<DefaultModel, String> {
        if s.trim().is_empty() {
            return Err("A default model must be provided.".to_string());
        }
        if s.len() > MAX_LENGTH || s.chars().any(char::is_whitespace) {
            return Err(format!("{} is not a valid model identifier.", s));
        }
        Ok(Self(s))
    }
}

impl AsRef<str> for DefaultModel {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
