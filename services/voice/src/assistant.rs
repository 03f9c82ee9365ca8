use rooftops_agents::Agent;

/// System prompt for the Rooftops assistant. Fixed for every invocation.
pub const ASSISTANT_INSTRUCTIONS: &str = "\
You are a friendly, conversational AI assistant for Rooftops AI.
You help users with roofing-related questions in a natural, relaxed way.
Keep your responses concise and conversational - like you're chatting with a friend.
Don't be overly formal. Use natural speech patterns.";

/// Instruction text for the one unprompted greeting issued after the session
/// starts.
pub const GREETING_INSTRUCTIONS: &str =
    "Greet the user casually and offer to help. Be warm and friendly, not robotic.";

/// Builds the assistant profile handed to the session.
pub fn assistant() -> Agent {
    Agent::new(ASSISTANT_INSTRUCTIONS)
}
