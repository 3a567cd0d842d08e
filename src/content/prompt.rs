use crate::content::LessonRequest;

pub const SYSTEM_PROMPT: &str = "You write short, game-like algorithm lessons. \
Reply with a single JSON object and nothing else.";

const SCHEMA: &str = r#"{
  "title": string,
  "screens": [
    {
      "id": string (unique),
      "header": string,
      "widgets": [ one or two widgets, at most one of them checkable ]
    }
  ]
}
Widget shapes (every widget also has a unique "id"):
  {"type": "dialogue", "speaker", "text"}
  {"type": "callout", "title", "text"}
  {"type": "flipcard", "front", "back", "mode": "learn" | "assessment"}
  {"type": "interactive-code", "language", "code", "annotations": [string]}
  {"type": "steps-list", "items": [string], "interactive": bool}
  {"type": "parsons", "prompt", "lines": [string] in the correct order}
  {"type": "fill-in", "code" with "__" per blank, "correctValues": [string], "options": [string], "inputMode": "select" | "type"}
  {"type": "quiz", "question", "options": [string], "correctIndex": number, "explanation"}
  {"type": "leetcode", "title", "description", "starterCode"}
  {"type": "code", "language", "code"}"#;

pub fn lesson_prompt(request: &LessonRequest) -> String {
    format!(
        "Create lesson {node} of a course on \"{topic}\".\n\
         Use {language} for all code. Aim for 6 to 10 screens, starting with \
         dialogue that motivates the idea and ending with a practice problem.\n\
         Output JSON matching this shape:\n{SCHEMA}",
        node = request.node_index + 1,
        topic = request.topic,
        language = request.language,
    )
}
