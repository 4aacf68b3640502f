use crate::agent::message::ChatMessage;

const END_OF_CODE_MARKER: &str = "-----END_CODE-------";

const REPAIR_SYSTEM_MESSAGE: &str = "This AI takes a JSON string and ensures that it is parseable and fully compliant with the provided schema. If an object or field specified in the schema isn't contained within the correct JSON, it is omitted. It also escapes any double quotes within JSON string values so they are valid. Any None or NaN values are replaced with null.";

/// Conversation for a structured request: the role description goes first as
/// a user turn, the instruction prompt follows as a system turn.
pub fn build_ask_messages(
    role_description: &str,
    instruction: &str,
    expected_schema: &str,
    code: &str,
) -> Vec<ChatMessage> {
    let prompt = format!(
        "- INSTRUCTIONS: {instruction}\n\
         THIS IS THE CODE: {code}\n\
         {END_OF_CODE_MARKER}\n\
         - PLEASE RETURN JSON RESPONSE. THIS RESPONSE MESSAGE WILL BE PASSED TO A JSON PARSER AND IT MUST PASS\n\
         - RETURN ONLY THE JSON, WITHOUT ANY OTHER TEXT OR FORMATTING, OR THE PROGRAM WILL FAIL\n\
         - MUST FOLLOW THIS SCHEMA: {expected_schema}"
    );
    vec![ChatMessage::user(role_description), ChatMessage::system(prompt)]
}

pub fn build_repair_messages(dirty_text: &str, schema: &str, prior_error: &str) -> Vec<ChatMessage> {
    let prompt = format!(
        "- This is the JSON that needs to be fixed: {dirty_text}\n\
         - IT MUST BE PARSABLE BY A STRICT JSON PARSER\n\
         - AND THE RESPONSE MUST BE COMPLIANT WITH THIS SCHEMA: {schema}\n\
         - WHEN TRYING TO PARSE THIS JSON, THE FOLLOWING ERROR OCCURRED: {prior_error}\n\
         - Please fix the JSON string so that it is parseable and fully compliant with the provided schema.\n\
         - ONLY RETURN THE JSON RESPONSE. THIS RESPONSE MESSAGE WILL BE PASSED TO A JSON PARSER AND IT MUST PASS\n\
         - RETURN THE FIXED JSON AND NO OTHER TEXT, OR THE PROGRAM WILL FAIL"
    );
    vec![
        ChatMessage::system(REPAIR_SYSTEM_MESSAGE),
        ChatMessage::user(prompt),
    ]
}
