static ANALYSIS_PROMPT: &str = r#"Analyze the uploaded video's content and context in detail.
Respond to the following query: "{query}"

Base your answer on insights from the video{research}.
Provide a detailed, user-friendly, and well-structured response."#;

const RESEARCH_CLAUSE: &str = " and supplement it with web research using your available tools";

/// Build the instruction sent alongside the video. `query` is embedded trimmed.
pub fn build_analysis_prompt(query: &str, web_search: bool) -> String {
    let research = if web_search { RESEARCH_CLAUSE } else { "" };
    ANALYSIS_PROMPT
        .replace("{research}", research)
        .replace("{query}", query.trim())
}

/// System instruction describing the agent.
pub fn build_system_instruction(agent_name: &str, markdown: bool) -> String {
    let mut instruction = format!("You are {agent_name}, an assistant that analyzes videos.");
    if markdown {
        instruction.push_str(" Use markdown to format your answers.");
    }
    instruction
}
