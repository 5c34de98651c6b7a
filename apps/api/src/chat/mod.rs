// Chat: answers free-text questions about the loaded CV.
// Direct field lookups first, completion model as fallback.

pub mod handlers;
pub mod prompts;
pub mod router;
