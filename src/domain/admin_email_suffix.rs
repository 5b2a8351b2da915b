/// Organisational email suffix (e.g. `@newsagent.ai`) that grants admin access.
#[derive(Debug, Clone)]
pub struct AdminEmailSuffix(String);

impl AdminEmailSuffix {
    pub fn parse(s: String) -> Result<AdminEmailSuffix, String> {
        let domain = s
            .strip_prefix('@')
            .ok_or_else(|| format!("{} must start with '@'.", s))?;
        if domain.is_empty() || domain.chars().any(char::is_whitespace) || domain.contains('@') {
            return Err(format!("{} is not a valid admin email suffix.", s));
        }
        Ok(Self(s))
    }

    /// True if at least one of `email_addresses` ends with this suffix.
    pub fn permits<S: AsRef<str>>(&self, email_addresses: &[S]) -> bool {
        email_addresses
            .iter()
            .any(|email| email.as_ref().ends_with(self.0.as_str()))
    }
}

impl AsRef<str> for AdminEmailSuffix {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
