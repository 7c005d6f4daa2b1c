use secrecy::SecretString;

#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub secret_key: SecretString,
    pub template_dir: String,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(secret_key: SecretString, template_dir: String) -> Self {
        Self {
            secret_key,
            template_dir,
        }
    }
}
