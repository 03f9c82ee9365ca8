/// Static behavioural profile for a conversational agent.
///
/// An `Agent` is plain configuration: a system prompt fixed at construction
/// time. One is created per job invocation, handed to
/// [`AgentSession::start`](crate::session::AgentSession::start), and discarded
/// when the session ends.
#[derive(Debug, Clone)]
pub struct Agent {
    instructions: String,
}

impl Agent {
    pub fn new(instructions: impl Into<String>) -> Self {
        Self {
            instructions: instructions.into(),
        }
    }

    /// The system prompt sent ahead of every language-model call.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }
}
