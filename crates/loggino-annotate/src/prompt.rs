pub const SYSTEM_PROMPT: &str = "You are an AI expert in log analysis. Help analyze errors.";

pub fn build_user_prompt(error: &str, description: &str, resource: &str) -> String {
    format!(
        "This is a log error: {} from system {}. How can it be fixed? \
         If necessary use this resource: {}",
        error, description, resource
    )
}
