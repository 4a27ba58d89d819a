pub mod llm_instructions;
pub mod sentiment;
pub mod youtube_chat;
